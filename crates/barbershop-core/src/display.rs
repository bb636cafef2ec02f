//! Display helpers for the booking screens.

use std::borrow::Cow;

use chrono::NaiveDate;

/// Formats a price in Brazilian reais, e.g. `R$ 1.234,50`.
pub fn format_price_brl(value: f64) -> String {
    let cents = (value * 100.0).round();
    let sign = if cents < 0.0 { "-" } else { "" };
    let cents = cents.abs() as u64;

    let digits = (cents / 100).to_string();
    let mut integer = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            integer.push('.');
        }
        integer.push(ch);
    }

    format!("{sign}R$ {integer},{:02}", cents % 100)
}

/// Returns up to two uppercase initials for an avatar.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// Formats a day the way the date field shows it (`DD/MM/YYYY`).
pub fn format_day_br(day: NaiveDate) -> String {
    day.format("%d/%m/%Y").to_string()
}

/// Truncates text to `max_len` characters, ending with `...` when cut.
pub fn ellipsis(text: &str, max_len: usize) -> Cow<'_, str> {
    if text.chars().count() <= max_len {
        return Cow::Borrowed(text);
    }
    if max_len <= 3 {
        return Cow::Owned(text.chars().take(max_len).collect());
    }

    let truncated: String = text.chars().take(max_len - 3).collect();
    Cow::Owned(format!("{truncated}..."))
}
