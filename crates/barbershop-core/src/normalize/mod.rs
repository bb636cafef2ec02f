//! Response normalization.
//!
//! Converts whatever the backend returned into the typed entities of
//! [`crate::entity`]. Each attribute has an ordered list of alias paths
//! (English/Portuguese, camelCase/snake_case, accented/unaccented, nested
//! under `user`/`usuario`); the first path holding a value wins.
//!
//! Normalization is total. An empty object yields a placeholder entity and a
//! response of the wrong shape yields an empty list. The only records ever
//! dropped are reservations whose status is not one of the known values.


use serde_json::Value;
use tracing::{debug, warn};

use crate::entity::{
    Barber, BarberAppointment, Reserva, ReservaStatus, Service, TimeSlot, UNNAMED_BARBER,
    UNNAMED_CLIENT, UNNAMED_SERVICE, User, UserKind,
};
use crate::json::{
    Record, extract_record_list, read_boolean, read_number, read_optional_string, read_string,
    read_string_list,
};

/// Alias paths per attribute.
///
/// Paths that descend into a sub-object come before the bare key they share
/// a prefix with, so `{"client": {"name": ..}}` is not shadowed by `client`.
pub mod aliases {
    pub const BARBER_ID: &[&str] = &[
        "id", "_id", "uuid", "barberId", "barber_id", "barbeiroId", "barbeiro_id", "user.id",
        "usuario.id",
    ];
    pub const BARBER_NAME: &[&str] = &[
        "name", "nome", "fullName", "full_name", "nomeCompleto", "nome_completo", "user.name",
        "user.nome", "usuario.nome", "usuario.name",
    ];
    pub const BARBER_EMAIL: &[&str] = &["email", "e-mail", "user.email", "usuario.email"];
    pub const BARBER_PHONE: &[&str] = &[
        "phone", "telefone", "celular", "phoneNumber", "phone_number", "user.phone",
        "usuario.telefone",
    ];
    pub const BARBER_SPECIALTIES: &[&str] =
        &["specialties", "especialidades", "specialities", "skills"];
    pub const BARBER_AVAILABLE: &[&str] = &[
        "available", "disponivel", "disponível", "isAvailable", "is_available", "active", "ativo",
        "status",
    ];

    pub const SERVICE_ID: &[&str] = &[
        "id", "_id", "uuid", "serviceId", "service_id", "servicoId", "servico_id",
    ];
    pub const SERVICE_NAME: &[&str] = &["name", "nome", "title", "titulo", "título"];
    pub const SERVICE_DESCRIPTION: &[&str] =
        &["description", "descrição", "descricao", "details", "detalhes"];
    pub const SERVICE_PRICE: &[&str] = &["price", "preço", "preco", "valor", "value", "amount"];
    pub const SERVICE_DURATION: &[&str] = &[
        "duration", "duração", "duracao", "durationMinutes", "duration_minutes", "duracaoMinutos",
        "minutes", "tempo",
    ];
    pub const SERVICE_CATEGORY: &[&str] = &["category", "categoria", "type", "tipo"];

    pub const SLOT_ID: &[&str] = &[
        "id", "_id", "uuid", "timeId", "time_id", "horarioId", "horario_id", "slotId", "slot_id",
    ];
    pub const SLOT_DATE: &[&str] = &[
        "data", "date", "dateTime", "date_time", "datetime", "dataHora", "data_hora", "startTime",
        "start_time", "start", "inicio", "início",
    ];
    pub const SLOT_TIME: &[&str] = &[
        "time", "hora", "horario", "horário", "hour", "timeLabel", "time_label", "label",
    ];
    pub const SLOT_AVAILABLE: &[&str] = &[
        "available", "disponivel", "disponível", "isAvailable", "is_available", "livre", "status",
    ];
    pub const SLOT_BARBER_ID: &[&str] = &[
        "barber.id", "barbeiro.id", "barberId", "barber_id", "barbeiroId", "barbeiro_id",
    ];

    pub const RESERVA_ID: &[&str] = &[
        "id", "_id", "uuid", "reservaId", "reserva_id", "appointmentId", "appointment_id",
    ];
    pub const RESERVA_CLIENT: &[&str] = &[
        "client.name", "client.nome", "cliente.nome", "cliente.name", "clientName",
        "client_name", "nomeCliente", "client", "cliente",
    ];
    pub const RESERVA_CLIENT_ID: &[&str] = &[
        "client.id", "cliente.id", "clientId", "client_id", "clienteId", "cliente_id",
    ];
    pub const RESERVA_BARBER: &[&str] = &[
        "barber.name", "barber.nome", "barbeiro.nome", "barbeiro.name", "barberName",
        "barber_name", "nomeBarbeiro", "barber", "barbeiro",
    ];
    pub const RESERVA_BARBER_ID: &[&str] = SLOT_BARBER_ID;
    pub const RESERVA_SERVICE: &[&str] = &[
        "service.name", "service.nome", "servico.nome", "serviço.nome", "serviceName",
        "service_name", "nomeServico", "service", "servico", "serviço",
    ];
    pub const RESERVA_SERVICE_ID: &[&str] = &[
        "service.id", "servico.id", "serviceId", "service_id", "servicoId", "servico_id",
    ];
    pub const RESERVA_TIME: &[&str] = &[
        "time.data", "time.date", "horario.data", "horario.date", "time", "horario", "dateTime",
        "date_time", "data", "date",
    ];
    pub const RESERVA_STATUS: &[&str] = &["status", "situacao", "situação", "state"];

    pub const USER_ID: &[&str] = &["id", "_id", "uuid", "userId", "user_id"];
    pub const USER_NAME: &[&str] = &["name", "nome", "fullName", "full_name"];
    pub const USER_EMAIL: &[&str] = &["email", "e-mail"];
    pub const USER_PHONE: &[&str] = &["phone", "telefone", "celular"];
    pub const USER_KIND: &[&str] = &["type", "tipo", "role", "kind"];
}

/// Normalizes a single barber record.
pub fn normalize_barber(record: &Record) -> Barber {
    Barber {
        id: read_string(record, aliases::BARBER_ID, ""),
        name: read_optional_string(record, aliases::BARBER_NAME)
            .unwrap_or_else(|| UNNAMED_BARBER.to_string()),
        email: read_optional_string(record, aliases::BARBER_EMAIL),
        phone: read_optional_string(record, aliases::BARBER_PHONE),
        specialties: read_string_list(record, aliases::BARBER_SPECIALTIES),
        available: read_boolean(record, aliases::BARBER_AVAILABLE, true),
    }
}

/// Normalizes a barber listing response.
pub fn normalize_barbers(value: &Value) -> Vec<Barber> {
    let barbers: Vec<Barber> = extract_record_list(value)
        .into_iter()
        .map(normalize_barber)
        .collect();
    debug!(count = barbers.len(), "normalized barbers");
    barbers
}

/// Normalizes a single service record.
pub fn normalize_service(record: &Record) -> Service {
    Service {
        id: read_string(record, aliases::SERVICE_ID, ""),
        name: read_optional_string(record, aliases::SERVICE_NAME)
            .unwrap_or_else(|| UNNAMED_SERVICE.to_string()),
        description: read_optional_string(record, aliases::SERVICE_DESCRIPTION),
        price: read_number(record, aliases::SERVICE_PRICE, 0.0),
        duration: whole_minutes(read_number(record, aliases::SERVICE_DURATION, 0.0)),
        category: read_optional_string(record, aliases::SERVICE_CATEGORY),
    }
}

/// Normalizes a service listing response.
pub fn normalize_services(value: &Value) -> Vec<Service> {
    let services: Vec<Service> = extract_record_list(value)
        .into_iter()
        .map(normalize_service)
        .collect();
    debug!(count = services.len(), "normalized services");
    services
}

/// Normalizes a single time slot record.
pub fn normalize_time_slot(record: &Record) -> TimeSlot {
    TimeSlot {
        id: read_string(record, aliases::SLOT_ID, ""),
        date: read_string(record, aliases::SLOT_DATE, ""),
        time: read_optional_string(record, aliases::SLOT_TIME),
        available: read_boolean(record, aliases::SLOT_AVAILABLE, true),
        barber_id: read_optional_string(record, aliases::SLOT_BARBER_ID),
    }
}

/// Normalizes a time slot listing response.
pub fn normalize_time_slots(value: &Value) -> Vec<TimeSlot> {
    let slots: Vec<TimeSlot> = extract_record_list(value)
        .into_iter()
        .map(normalize_time_slot)
        .collect();
    debug!(count = slots.len(), "normalized time slots");
    slots
}

/// Normalizes a reservation record.
///
/// Returns `None` when the status is not one of the known values.
pub fn normalize_reserva(record: &Record) -> Option<Reserva> {
    let id = read_string(record, aliases::RESERVA_ID, "");
    let status = read_status(record, &id)?;

    Some(Reserva {
        client: read_optional_string(record, aliases::RESERVA_CLIENT)
            .unwrap_or_else(|| UNNAMED_CLIENT.to_string()),
        barber: read_optional_string(record, aliases::RESERVA_BARBER)
            .unwrap_or_else(|| UNNAMED_BARBER.to_string()),
        service: read_optional_string(record, aliases::RESERVA_SERVICE)
            .unwrap_or_else(|| UNNAMED_SERVICE.to_string()),
        time: read_string(record, aliases::RESERVA_TIME, ""),
        id,
        status,
    })
}

/// Normalizes a reservation listing response.
pub fn normalize_reservas(value: &Value) -> Vec<Reserva> {
    let reservas: Vec<Reserva> = extract_record_list(value)
        .into_iter()
        .filter_map(normalize_reserva)
        .collect();
    debug!(count = reservas.len(), "normalized reservations");
    reservas
}

/// Normalizes an agenda entry.
///
/// Returns `None` when the status is not one of the known values.
pub fn normalize_appointment(record: &Record) -> Option<BarberAppointment> {
    let id = read_string(record, aliases::RESERVA_ID, "");
    let status = read_status(record, &id)?;

    Some(BarberAppointment {
        client_id: read_string(record, aliases::RESERVA_CLIENT_ID, ""),
        client: read_optional_string(record, aliases::RESERVA_CLIENT)
            .unwrap_or_else(|| UNNAMED_CLIENT.to_string()),
        barber_id: read_string(record, aliases::RESERVA_BARBER_ID, ""),
        barber: read_optional_string(record, aliases::RESERVA_BARBER)
            .unwrap_or_else(|| UNNAMED_BARBER.to_string()),
        service_id: read_string(record, aliases::RESERVA_SERVICE_ID, ""),
        service: read_optional_string(record, aliases::RESERVA_SERVICE)
            .unwrap_or_else(|| UNNAMED_SERVICE.to_string()),
        time: read_string(record, aliases::RESERVA_TIME, ""),
        id,
        status,
    })
}

/// Normalizes the barber's agenda response.
pub fn normalize_appointments(value: &Value) -> Vec<BarberAppointment> {
    let appointments: Vec<BarberAppointment> = extract_record_list(value)
        .into_iter()
        .filter_map(normalize_appointment)
        .collect();
    debug!(count = appointments.len(), "normalized appointments");
    appointments
}

/// Normalizes a user record (login and `me` responses).
pub fn normalize_user(record: &Record) -> User {
    User {
        id: read_string(record, aliases::USER_ID, ""),
        name: read_string(record, aliases::USER_NAME, ""),
        email: read_string(record, aliases::USER_EMAIL, ""),
        phone: read_optional_string(record, aliases::USER_PHONE),
        kind: read_optional_string(record, aliases::USER_KIND)
            .as_deref()
            .and_then(UserKind::parse),
    }
}

fn read_status(record: &Record, id: &str) -> Option<ReservaStatus> {
    let raw = read_string(record, aliases::RESERVA_STATUS, "");
    let status = ReservaStatus::parse(&raw);
    if status.is_none() {
        warn!(id, status = %raw, "skipping record with unknown status");
    }
    status
}

/// Rounds a duration to whole, non-negative minutes.
fn whole_minutes(value: f64) -> u32 {
    value.round().clamp(0.0, f64::from(u32::MAX)) as u32
}
