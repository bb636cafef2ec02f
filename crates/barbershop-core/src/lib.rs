//! Core types: entities, response normalization, slot resolution, formatting

pub mod display;
pub mod entity;
pub mod json;
pub mod normalize;
pub mod slots;
pub mod tracing;

pub use display::{ellipsis, format_day_br, format_price_brl, initials};
pub use entity::{
    Barber, BarberAppointment, Credentials, CredentialsError, CredentialsField, PayloadError,
    PayloadField, Reserva, ReservaPayload, ReservaStatus, Service, TimeSlot, User, UserKind,
};
pub use json::{Record, extract_record_list};
pub use normalize::{
    normalize_appointments, normalize_barbers, normalize_reservas, normalize_services,
    normalize_time_slots, normalize_user,
};
pub use slots::{
    SlotOption, available_days, has_slots_on, has_slots_on_raw, parse_date_time, parse_day,
    slot_date, slot_label, slots_on, slots_on_raw,
};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
