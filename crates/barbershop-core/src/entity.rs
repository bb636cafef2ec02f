//! Typed view models for the booking screens.
//!
//! These are the records the normalizer produces and the forms consume:
//! - [`Barber`], [`Service`] and [`TimeSlot`] feed the booking selectors
//! - [`Reserva`] and [`BarberAppointment`] back the reservation list and the
//!   barber's daily agenda
//! - [`ReservaPayload`] is what gets submitted to create a reservation
//! - [`User`] is the authenticated identity returned at login
//!
//! Identifiers are always strings, whatever the backend sent.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Name shown for a barber whose record has no usable name.
pub const UNNAMED_BARBER: &str = "Barbeiro sem nome";

/// Name shown for a service whose record has no usable name.
pub const UNNAMED_SERVICE: &str = "Serviço sem nome";

/// Name shown for a reservation's client when the record has none.
pub const UNNAMED_CLIENT: &str = "Cliente";

/// Minimum password length accepted at login.
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

/// A barber offered in the booking form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Barber {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialties: Option<Vec<String>>,
    pub available: bool,
}

/// A service from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Price in reais.
    pub price: f64,
    /// Duration in minutes.
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A bookable time unit offered by a barber.
///
/// `date` is the primary date/time text and `time` a secondary label; both
/// are kept verbatim since the backend mixes several formats. See
/// [`crate::slots`] for how they are interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barber_id: Option<String>,
}

impl TimeSlot {
    /// Creates an available slot with only a date text.
    pub fn new(id: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            time: None,
            available: true,
            barber_id: None,
        }
    }

    /// Builder method to set the time label.
    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    /// Builder method to set availability.
    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Builder method to set the owning barber.
    pub fn with_barber_id(mut self, barber_id: impl Into<String>) -> Self {
        self.barber_id = Some(barber_id.into());
        self
    }
}

/// Lifecycle state of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservaStatus {
    Scheduled,
    Completed,
    Canceled,
}

impl ReservaStatus {
    /// Parses the wire value. Only the exact upper-case literals are accepted.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "SCHEDULED" => Some(Self::Scheduled),
            "COMPLETED" => Some(Self::Completed),
            "CANCELED" => Some(Self::Canceled),
            _ => None,
        }
    }

    /// Returns the wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::Completed => "COMPLETED",
            Self::Canceled => "CANCELED",
        }
    }

    /// Returns the label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scheduled => "Agendada",
            Self::Completed => "Atendida",
            Self::Canceled => "Cancelada",
        }
    }

    /// Returns true while the barber can still attend or cancel it.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Scheduled)
    }
}

impl fmt::Display for ReservaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reservation as listed to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reserva {
    pub id: String,
    pub client: String,
    pub barber: String,
    pub service: String,
    pub time: String,
    pub status: ReservaStatus,
}

/// An entry in the barber's agenda for the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarberAppointment {
    pub id: String,
    pub client_id: String,
    pub client: String,
    pub barber_id: String,
    pub barber: String,
    pub service_id: String,
    pub service: String,
    pub time: String,
    pub status: ReservaStatus,
}

/// Kind of account behind a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserKind {
    Barber,
    Client,
}

impl UserKind {
    /// Parses English or Portuguese account kinds, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "barber" | "barbeiro" => Some(Self::Barber),
            "client" | "cliente" | "customer" => Some(Self::Client),
            _ => None,
        }
    }
}

/// The authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<UserKind>,
}

impl User {
    /// Returns true if this account belongs to a barber.
    pub fn is_barber(&self) -> bool {
        self.kind == Some(UserKind::Barber)
    }
}

/// Request body to create a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservaPayload {
    pub client_id: String,
    pub barber_id: String,
    pub service_id: String,
    pub time_id: String,
}

impl ReservaPayload {
    /// Creates a payload from the four selected identifiers.
    pub fn new(
        client_id: impl Into<String>,
        barber_id: impl Into<String>,
        service_id: impl Into<String>,
        time_id: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            barber_id: barber_id.into(),
            service_id: service_id.into(),
            time_id: time_id.into(),
        }
    }

    /// Checks that every identifier is a UUID.
    ///
    /// # Errors
    ///
    /// Returns a [`PayloadError`] listing every malformed field.
    pub fn validate(&self) -> Result<(), PayloadError> {
        let fields: Vec<PayloadField> = [
            (PayloadField::Client, &self.client_id),
            (PayloadField::Barber, &self.barber_id),
            (PayloadField::Service, &self.service_id),
            (PayloadField::Time, &self.time_id),
        ]
        .into_iter()
        .filter(|(_, value)| Uuid::parse_str(value.trim()).is_err())
        .map(|(field, _)| field)
        .collect();

        if fields.is_empty() {
            Ok(())
        } else {
            Err(PayloadError { fields })
        }
    }
}

/// A field of [`ReservaPayload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadField {
    Client,
    Barber,
    Service,
    Time,
}

impl PayloadField {
    /// Returns the wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "clientId",
            Self::Barber => "barberId",
            Self::Service => "serviceId",
            Self::Time => "timeId",
        }
    }

    /// Returns the message shown next to the form field.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Client => "ID do cliente inválido",
            Self::Barber => "ID do barbeiro inválido",
            Self::Service => "ID do serviço inválido",
            Self::Time => "ID do horário inválido",
        }
    }
}

/// A reservation payload with malformed identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid reservation payload: {}", .fields.iter().map(PayloadField::message).collect::<Vec<_>>().join(", "))]
pub struct PayloadError {
    pub fields: Vec<PayloadField>,
}

/// Login form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Creates credentials; the email is trimmed, the password kept as typed.
    pub fn new(email: impl AsRef<str>, password: impl Into<String>) -> Self {
        Self {
            email: email.as_ref().trim().to_string(),
            password: password.into(),
        }
    }

    /// Checks the email shape and the password length.
    ///
    /// # Errors
    ///
    /// Returns a [`CredentialsError`] listing every rejected field.
    pub fn validate(&self) -> Result<(), CredentialsError> {
        let mut fields = Vec::new();
        if !EMAIL_REGEX.is_match(&self.email) {
            fields.push(CredentialsField::Email);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            fields.push(CredentialsField::Password);
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(CredentialsError { fields })
        }
    }
}

/// A field of [`Credentials`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsField {
    Email,
    Password,
}

impl CredentialsField {
    /// Returns the message shown next to the form field.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Email => "Email inválido",
            Self::Password => "Senha deve ter no mínimo 6 caracteres",
        }
    }
}

/// Login input rejected before reaching the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid login: {}", .fields.iter().map(CredentialsField::message).collect::<Vec<_>>().join(", "))]
pub struct CredentialsError {
    pub fields: Vec<CredentialsField>,
}
