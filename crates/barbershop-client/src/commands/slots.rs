//! Slot picking for a barber.

use barbershop_core::{available_days, normalize_time_slots, parse_day, slots_on};
use tracing::debug;

use super::Context;
use crate::error::{ClientError, ClientResult};

/// Shows the free slots of a barber on `date`, or the bookable days without one.
pub async fn slots(ctx: &Context, barber_id: &str, date: Option<&str>) -> ClientResult<String> {
    let day = date
        .map(|raw| {
            parse_day(raw).ok_or_else(|| {
                ClientError::Input(format!(
                    "invalid date {:?}, expected YYYY-MM-DD or DD/MM/YYYY",
                    raw
                ))
            })
        })
        .transpose()?;

    let body = ctx.api.list_time_slots(barber_id).await?;
    let slots = normalize_time_slots(&body);
    debug!(barber_id, count = slots.len(), "fetched time slots");

    match day {
        Some(day) => ctx.output.slots(day, &slots_on(&slots, day)),
        None => ctx.output.days(&available_days(&slots)),
    }
}
