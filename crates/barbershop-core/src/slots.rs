//! Slot resolution for the booking calendar.
//!
//! Given the time slots of a barber, this module answers two questions for
//! the date picker:
//! - which calendar days have at least one bookable slot ([`has_slots_on`],
//!   [`available_days`])
//! - which slots to offer once a day is picked ([`slots_on`]), each reduced
//!   to an `HH:mm` label
//!
//! Slot dates arrive as free text in several conventions, so
//! [`parse_date_time`] tries a chain of parsers and stops at the first hit.
//! Times are wall-clock values; offsets in RFC 3339 input are not converted.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::entity::TimeSlot;
use crate::normalize::normalize_time_slots;

/// Label shown for a slot whose time could not be determined.
pub const UNLABELED_SLOT: &str = "Horário disponível";

/// `DD/MM/YYYY[ HH:mm[:ss]]`
static PT_BR_DATE_TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2})/(\d{2})/(\d{4})(?:\s+(\d{2}):(\d{2})(?::(\d{2}))?)?$")
        .expect("Invalid pt-BR date regex")
});

/// `YYYY-MM-DD[ HH:mm[:ss]]`, with `T` or a space before the time.
static ISO_LIKE_DATE_TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})(?:[ T](\d{2}):(\d{2})(?::(\d{2}))?)?$")
        .expect("Invalid ISO-like date regex")
});

/// Any `HH:mm` token inside free text.
static CLOCK_TIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{2}:\d{2}\b").expect("Invalid clock time regex"));

/// Wall-clock formats accepted by the direct parse, besides RFC 3339.
///
/// A trailing `Z` is matched literally; the offset is dropped like any other.
const DIRECT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.fZ",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

/// Formats carrying a numeric offset that RFC 3339 rejects.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
];

/// Date-only formats; the time is midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// A slot offered for the selected day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotOption {
    /// Identifier submitted as the reservation's `timeId`.
    pub id: String,
    /// `HH:mm`, or a degraded label when the time is unknown.
    pub label: String,
    /// When the slot starts, if its date could be parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<NaiveDateTime>,
}

impl SlotOption {
    /// Builds the option shown for a slot.
    pub fn from_slot(slot: &TimeSlot) -> Self {
        Self {
            id: slot.id.clone(),
            label: slot_label(slot),
            starts_at: slot_date(slot),
        }
    }
}

/// Parses a slot date/time text.
///
/// The text is trimmed, its first comma becomes a space and whitespace runs
/// collapse. Then, in order: a direct ISO 8601 / RFC 3339 parse, the
/// Brazilian `DD/MM/YYYY[ HH:mm[:ss]]` form and the ISO-like
/// `YYYY-MM-DD[ HH:mm[:ss]]` form. A missing time means midnight.
///
/// # Example
///
/// ```
/// use barbershop_core::slots::parse_date_time;
///
/// let br = parse_date_time("25/12/2024 14:30").unwrap();
/// let iso = parse_date_time("2024-12-25 14:30").unwrap();
/// assert_eq!(br, iso);
/// assert!(parse_date_time("amanhã").is_none());
/// ```
pub fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    let text = text
        .replacen(',', " ", 1)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let parsed = parse_direct(&text)
        .or_else(|| {
            PT_BR_DATE_TIME_REGEX
                .captures(&text)
                .and_then(|caps| from_captures(&caps, 3, 2, 1))
        })
        .or_else(|| {
            ISO_LIKE_DATE_TIME_REGEX
                .captures(&text)
                .and_then(|caps| from_captures(&caps, 1, 2, 3))
        });

    if parsed.is_none() {
        trace!(text = %text, "unparseable slot date");
    }
    parsed
}

/// Parses a day picked by the user (`YYYY-MM-DD`, `DD/MM/YYYY`, ...).
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    parse_date_time(raw).map(|dt| dt.date())
}

fn parse_direct(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }

    DIRECT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|format| DateTime::parse_from_str(text, format).ok())
                .map(|dt| dt.naive_local())
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Builds a datetime from regex groups; the time groups are 4, 5 and 6.
fn from_captures(caps: &Captures<'_>, year: usize, month: usize, day: usize) -> Option<NaiveDateTime> {
    let group = |index: usize| -> Option<u32> {
        caps.get(index)
            .map_or(Some(0), |m| m.as_str().parse().ok())
    };

    let date = NaiveDate::from_ymd_opt(
        caps.get(year)?.as_str().parse().ok()?,
        group(month)?,
        group(day)?,
    )?;
    date.and_hms_opt(group(4)?, group(5)?, group(6)?)
}

/// Resolves when a slot happens: the date field first, then the time label.
pub fn slot_date(slot: &TimeSlot) -> Option<NaiveDateTime> {
    parse_date_time(&slot.date).or_else(|| slot.time.as_deref().and_then(parse_date_time))
}

/// Returns the label shown for a slot.
///
/// `HH:mm` when the slot date parses; otherwise the first `HH:mm` token in
/// the time label or the date text; otherwise [`UNLABELED_SLOT`].
pub fn slot_label(slot: &TimeSlot) -> String {
    if let Some(dt) = slot_date(slot) {
        return dt.format("%H:%M").to_string();
    }

    slot.time
        .as_deref()
        .into_iter()
        .chain(std::iter::once(slot.date.as_str()))
        .find_map(|text| CLOCK_TIME_REGEX.find(text))
        .map_or_else(|| UNLABELED_SLOT.to_string(), |m| m.as_str().to_string())
}

/// Returns true if at least one available slot falls on `day`.
///
/// Only slots with a resolvable date count; this is the predicate used to
/// enable days in the date picker.
pub fn has_slots_on(slots: &[TimeSlot], day: NaiveDate) -> bool {
    slots
        .iter()
        .filter(|slot| slot.available)
        .any(|slot| slot_date(slot).is_some_and(|dt| dt.date() == day))
}

/// Returns every day that has at least one available slot, in order.
pub fn available_days(slots: &[TimeSlot]) -> BTreeSet<NaiveDate> {
    slots
        .iter()
        .filter(|slot| slot.available)
        .filter_map(slot_date)
        .map(|dt| dt.date())
        .collect()
}

/// Returns the slots to offer once `day` is picked, in their original order.
///
/// Unavailable slots are excluded. Available slots whose date cannot be
/// resolved are kept with a degraded label rather than hidden.
pub fn slots_on(slots: &[TimeSlot], day: NaiveDate) -> Vec<SlotOption> {
    slots
        .iter()
        .filter(|slot| slot.available)
        .filter(|slot| slot_date(slot).is_none_or(|dt| dt.date() == day))
        .map(SlotOption::from_slot)
        .collect()
}

/// [`has_slots_on`] over an unnormalized listing response.
pub fn has_slots_on_raw(value: &Value, day: NaiveDate) -> bool {
    has_slots_on(&normalize_time_slots(value), day)
}

/// [`slots_on`] over an unnormalized listing response.
pub fn slots_on_raw(value: &Value, day: NaiveDate) -> Vec<SlotOption> {
    slots_on(&normalize_time_slots(value), day)
}
