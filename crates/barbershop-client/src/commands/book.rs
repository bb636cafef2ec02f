//! Reservation booking.

use barbershop_core::ReservaPayload;
use barbershop_core::json::read_optional_string;
use tracing::info;

use super::Context;
use crate::error::{ClientError, ClientResult};
use crate::output::{OutputFormat, json};

/// The selections made in the booking form.
#[derive(Debug, Clone)]
pub struct BookRequest<'a> {
    pub barber_id: &'a str,
    pub service_id: &'a str,
    pub time_id: &'a str,
    /// Explicit client; the logged-in user otherwise.
    pub client_id: Option<&'a str>,
    /// Check that every identifier is a UUID before sending.
    pub validate: bool,
}

/// Creates a reservation.
pub async fn book(ctx: &Context, request: BookRequest<'_>) -> ClientResult<String> {
    let client_id = match request.client_id {
        Some(id) => id.to_string(),
        None => ctx
            .session
            .get()?
            .map(|session| session.user.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                ClientError::Input(
                    "no client: pass --client or run `barbershop login` first".to_string(),
                )
            })?,
    };

    let payload = ReservaPayload::new(
        client_id,
        request.barber_id,
        request.service_id,
        request.time_id,
    );
    if request.validate {
        payload.validate()?;
    }

    let response = ctx.api.create_reserva(&payload).await?;
    info!(time_id = %payload.time_id, "reservation created");

    if ctx.output.format() == OutputFormat::Json {
        return json(&response);
    }

    let id = response
        .as_object()
        .and_then(|record| read_optional_string(record, &["id", "_id", "reservaId"]));
    let message = match id {
        Some(id) => format!("Reserva criada (id {})", id),
        None => "Reserva criada".to_string(),
    };
    ctx.output.message(&message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::context;
    use barbershop_api::{FixtureBookingApi, Session};
    use barbershop_core::{PayloadField, User};

    const CLIENT: &str = "6f1c1f5e-9a0b-4c7e-8d2a-0b7e4f3a9c11";
    const BARBER: &str = "0e8f9a7b-1c2d-4e3f-9a8b-7c6d5e4f3a2b";
    const SERVICE: &str = "3b2a1c0d-4e5f-4a6b-8c7d-9e0f1a2b3c4d";
    const SLOT: &str = "a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d";

    fn request(client_id: Option<&str>) -> BookRequest<'_> {
        BookRequest {
            barber_id: BARBER,
            service_id: SERVICE,
            time_id: SLOT,
            client_id,
            validate: true,
        }
    }

    #[tokio::test]
    async fn books_for_logged_in_user() {
        let (ctx, api) = context(FixtureBookingApi::new());
        ctx.session
            .set(Session::new(
                Some("tok".to_string()),
                User {
                    id: CLIENT.to_string(),
                    name: "Ana".to_string(),
                    email: "ana@example.com".to_string(),
                    phone: None,
                    kind: None,
                },
            ))
            .unwrap();

        assert_eq!(book(&ctx, request(None)).await.unwrap(), "Reserva criada");
        assert_eq!(api.calls().await, vec!["POST /reservas"]);
    }

    #[tokio::test]
    async fn requires_a_client() {
        let (ctx, api) = context(FixtureBookingApi::new());
        let err = book(&ctx, request(None)).await.unwrap_err();
        assert!(matches!(err, ClientError::Input(_)));
        assert!(api.calls().await.is_empty());
    }

    #[tokio::test]
    async fn validation_stops_malformed_ids() {
        let (ctx, api) = context(FixtureBookingApi::new());
        let mut req = request(Some(CLIENT));
        req.time_id = "10";

        match book(&ctx, req).await.unwrap_err() {
            ClientError::Validation(err) => assert_eq!(err.fields, vec![PayloadField::Time]),
            other => panic!("unexpected error: {other}"),
        }
        assert!(api.calls().await.is_empty());
    }

    #[tokio::test]
    async fn validation_can_be_skipped() {
        let (ctx, api) = context(FixtureBookingApi::new());
        let req = BookRequest {
            barber_id: "1",
            service_id: "2",
            time_id: "3",
            client_id: Some("4"),
            validate: false,
        };
        book(&ctx, req).await.unwrap();
        assert_eq!(api.calls().await.len(), 1);
    }
}
