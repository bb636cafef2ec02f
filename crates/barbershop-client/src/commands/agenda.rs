//! Reservations and the barber's daily agenda.

use barbershop_core::{normalize_appointments, normalize_reservas};
use tracing::info;

use super::Context;
use crate::error::ClientResult;

/// Lists reservations.
pub async fn reservas(ctx: &Context) -> ClientResult<String> {
    let body = ctx.api.list_reservas().await?;
    ctx.output.reservas(&normalize_reservas(&body))
}

/// Shows today's appointments for the logged-in barber.
pub async fn agenda(ctx: &Context) -> ClientResult<String> {
    let body = ctx.api.today_appointments().await?;
    ctx.output.agenda(&normalize_appointments(&body))
}

/// Marks an appointment as attended.
pub async fn attend(ctx: &Context, appointment_id: &str) -> ClientResult<String> {
    ctx.api.attend_appointment(appointment_id).await?;
    info!(appointment_id, "appointment attended");
    ctx.output
        .message(&format!("Atendimento {} marcado como atendido", appointment_id))
}

/// Cancels an appointment.
pub async fn cancel(ctx: &Context, appointment_id: &str) -> ClientResult<String> {
    ctx.api.cancel_appointment(appointment_id).await?;
    info!(appointment_id, "appointment canceled");
    ctx.output
        .message(&format!("Atendimento {} cancelado", appointment_id))
}
