//! Offline normalization of saved API responses.

use std::io::Read;
use std::path::Path;

use barbershop_api::user_from_body;
use barbershop_core::{
    normalize_appointments, normalize_barbers, normalize_reservas, normalize_services,
    normalize_time_slots,
};
use serde_json::Value;

use crate::cli::NormalizeKind;
use crate::error::{ClientError, ClientResult};
use crate::output::json;

/// Normalizes the JSON in `file` (`-` reads stdin) and prints the result as JSON.
pub fn normalize(kind: NormalizeKind, file: &Path) -> ClientResult<String> {
    let content = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(file)?
    };

    let value: Value = serde_json::from_str(&content)
        .map_err(|e| ClientError::Input(format!("{} is not JSON: {}", file.display(), e)))?;
    normalize_value(kind, &value)
}

/// Normalizes an already parsed response.
pub fn normalize_value(kind: NormalizeKind, value: &Value) -> ClientResult<String> {
    match kind {
        NormalizeKind::Barbers => json(&normalize_barbers(value)),
        NormalizeKind::Services => json(&normalize_services(value)),
        NormalizeKind::Slots => json(&normalize_time_slots(value)),
        NormalizeKind::Reservas => json(&normalize_reservas(value)),
        NormalizeKind::Appointments => json(&normalize_appointments(value)),
        NormalizeKind::User => json(&user_from_body(value)?),
    }
}
