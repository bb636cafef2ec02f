//! Output rendering for terminal and JSON.

use std::collections::BTreeSet;

use barbershop_core::{
    Barber, BarberAppointment, Reserva, Service, SlotOption, User, ellipsis, format_day_br,
    format_price_brl, initials,
};
use chrono::NaiveDate;
use serde::Serialize;

use crate::config::DisplaySettings;
use crate::error::{ClientError, ClientResult};

/// The output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable terminal output.
    #[default]
    Tty,
    /// Machine-readable JSON output.
    Json,
}

/// Renders normalized entities in the selected format.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    format: OutputFormat,
    display: DisplaySettings,
}

impl Renderer {
    /// Creates a renderer.
    pub fn new(format: OutputFormat, display: DisplaySettings) -> Self {
        Self { format, display }
    }

    /// Returns the output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn name<'a>(&self, name: &'a str) -> std::borrow::Cow<'a, str> {
        match self.display.max_name_length {
            Some(max) => ellipsis(name, max),
            None => std::borrow::Cow::Borrowed(name),
        }
    }

    /// Renders `value` as JSON, or with `tty` otherwise.
    fn render<T: Serialize + ?Sized>(&self, value: &T, tty: impl FnOnce() -> String) -> ClientResult<String> {
        match self.format {
            OutputFormat::Json => json(value),
            OutputFormat::Tty => Ok(tty()),
        }
    }

    /// Renders the barber list.
    pub fn barbers(&self, barbers: &[Barber]) -> ClientResult<String> {
        self.render(barbers, || {
            if barbers.is_empty() {
                return "Nenhum barbeiro encontrado".to_string();
            }
            lines(barbers.iter().map(|barber| {
                let mut line = format!(
                    "[{}] {}  {}",
                    initials(&barber.name),
                    barber.id,
                    self.name(&barber.name)
                );
                if let Some(ref specialties) = barber.specialties {
                    line.push_str(&format!("  ({})", specialties.join(", ")));
                }
                if !barber.available {
                    line.push_str("  indisponível");
                }
                line
            }))
        })
    }

    /// Renders the service catalog.
    pub fn services(&self, services: &[Service]) -> ClientResult<String> {
        self.render(services, || {
            if services.is_empty() {
                return "Nenhum serviço encontrado".to_string();
            }
            lines(services.iter().map(|service| {
                format!(
                    "{}  {}  {}  {} min",
                    service.id,
                    self.name(&service.name),
                    format_price_brl(service.price),
                    service.duration
                )
            }))
        })
    }

    /// Renders the slots offered on a day.
    pub fn slots(&self, day: NaiveDate, slots: &[SlotOption]) -> ClientResult<String> {
        self.render(slots, || {
            if slots.is_empty() {
                return format!("{}: {}", format_day_br(day), self.display.no_slots_text);
            }
            let header = format!("Horários em {}:", format_day_br(day));
            let body = lines(
                slots
                    .iter()
                    .map(|slot| format!("  {}  (id {})", slot.label, slot.id)),
            );
            format!("{header}\n{body}")
        })
    }

    /// Renders the days that still have free slots.
    pub fn days(&self, days: &BTreeSet<NaiveDate>) -> ClientResult<String> {
        self.render(days, || {
            if days.is_empty() {
                return self.display.no_slots_text.clone();
            }
            lines(days.iter().map(|day| format_day_br(*day)))
        })
    }

    /// Renders the reservation list.
    pub fn reservas(&self, reservas: &[Reserva]) -> ClientResult<String> {
        self.render(reservas, || {
            if reservas.is_empty() {
                return "Nenhuma reserva".to_string();
            }
            lines(reservas.iter().map(|reserva| {
                format!(
                    "{}  {}  {} com {}  [{}]",
                    reserva.id,
                    reserva.time,
                    self.name(&reserva.service),
                    self.name(&reserva.barber),
                    reserva.status.label()
                )
            }))
        })
    }

    /// Renders the barber's agenda.
    pub fn agenda(&self, appointments: &[BarberAppointment]) -> ClientResult<String> {
        self.render(appointments, || {
            if appointments.is_empty() {
                return "Nenhum atendimento hoje".to_string();
            }
            lines(appointments.iter().map(|appointment| {
                format!(
                    "{}  {}  {} - {}  [{}]",
                    appointment.id,
                    appointment.time,
                    self.name(&appointment.client),
                    self.name(&appointment.service),
                    appointment.status.label()
                )
            }))
        })
    }

    /// Renders a user profile.
    pub fn user(&self, user: &User) -> ClientResult<String> {
        self.render(user, || {
            let mut line = format!("{} <{}>", user.name, user.email);
            if user.is_barber() {
                line.push_str("  (barbeiro)");
            }
            line
        })
    }

    /// Renders a confirmation message; JSON output wraps it as `{"message": ...}`.
    pub fn message(&self, message: &str) -> ClientResult<String> {
        self.render(&serde_json::json!({ "message": message }), || message.to_string())
    }
}

/// Serializes a value as pretty JSON.
pub fn json<T: Serialize + ?Sized>(value: &T) -> ClientResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ClientError::Input(format!("failed to serialize output: {}", e)))
}

fn lines(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use barbershop_core::ReservaStatus;

    fn tty() -> Renderer {
        Renderer::default()
    }

    fn barber() -> Barber {
        Barber {
            id: "1".to_string(),
            name: "João Silva".to_string(),
            email: None,
            phone: None,
            specialties: Some(vec!["Corte".to_string(), "Barba".to_string()]),
            available: false,
        }
    }

    #[test]
    fn barbers_tty() {
        assert_eq!(
            tty().barbers(&[barber()]).unwrap(),
            "[JS] 1  João Silva  (Corte, Barba)  indisponível"
        );
        assert_eq!(tty().barbers(&[]).unwrap(), "Nenhum barbeiro encontrado");
    }

    #[test]
    fn names_are_truncated() {
        let renderer = Renderer::new(
            OutputFormat::Tty,
            DisplaySettings {
                max_name_length: Some(7),
                ..DisplaySettings::default()
            },
        );
        let services = [Service {
            id: "10".to_string(),
            name: "Corte degradê".to_string(),
            description: None,
            price: 35.0,
            duration: 30,
            category: None,
        }];
        assert_eq!(renderer.services(&services).unwrap(), "10  Cort...  R$ 35,00  30 min");
    }

    #[test]
    fn slots_for_day() {
        let day = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        let slots = [
            SlotOption {
                id: "1".to_string(),
                label: "09:00".to_string(),
                starts_at: None,
            },
            SlotOption {
                id: "5".to_string(),
                label: "Horário disponível".to_string(),
                starts_at: None,
            },
        ];
        assert_eq!(
            tty().slots(day, &slots).unwrap(),
            "Horários em 25/12/2024:\n  09:00  (id 1)\n  Horário disponível  (id 5)"
        );
        assert_eq!(
            tty().slots(day, &[]).unwrap(),
            "25/12/2024: Nenhum horário disponível"
        );
    }

    #[test]
    fn days_as_json() {
        let renderer = Renderer::new(OutputFormat::Json, DisplaySettings::default());
        let days: BTreeSet<_> = [
            NaiveDate::from_ymd_opt(2024, 12, 26).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
        ]
        .into_iter()
        .collect();
        let out = renderer.days(&days).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, vec!["2024-12-25", "2024-12-26"]);
    }

    #[test]
    fn reservas_show_status_label() {
        let reservas = [Reserva {
            id: "r1".to_string(),
            client: "Ana".to_string(),
            barber: "João".to_string(),
            service: "Corte".to_string(),
            time: "25/12/2024 09:00".to_string(),
            status: ReservaStatus::Canceled,
        }];
        assert_eq!(
            tty().reservas(&reservas).unwrap(),
            "r1  25/12/2024 09:00  Corte com João  [Cancelada]"
        );
    }

    #[test]
    fn message_as_json() {
        let renderer = Renderer::new(OutputFormat::Json, DisplaySettings::default());
        let out = renderer.message("ok").unwrap();
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&out).unwrap(),
            serde_json::json!({ "message": "ok" })
        );
    }
}
