//! BookingApi trait definition.
//!
//! [`BookingApi`] is the boundary to the barbershop backend. Listing methods
//! hand back the raw JSON body: the server's field naming drifts, so shaping
//! it into entities is left to `barbershop_core::normalize` on the caller's
//! side.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use barbershop_core::json::{Record, read_optional_string};
use barbershop_core::normalize::normalize_user;
use barbershop_core::{ReservaPayload, User};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::session::Session;

/// A boxed future for async trait methods.
///
/// Boxed futures keep the trait object-safe so the CLI can pick an
/// implementation at runtime.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Token keys accepted in a login response.
const TOKEN_PATHS: &[&str] = &["token", "accessToken", "access_token", "jwt"];

/// The barbershop backend.
///
/// # Example
///
/// ```ignore
/// use barbershop_api::BookingApi;
/// use barbershop_core::normalize_barbers;
///
/// async fn barbers(api: &dyn BookingApi) -> ApiResult<Vec<Barber>> {
///     let body = api.list_barbers().await?;
///     Ok(normalize_barbers(&body))
/// }
/// ```
pub trait BookingApi: Send + Sync {
    /// Returns the name of this implementation (e.g. "http", "fixture").
    fn name(&self) -> &str;

    /// `GET /barbers`
    fn list_barbers(&self) -> BoxFuture<'_, ApiResult<Value>>;

    /// `GET /services`
    fn list_services(&self) -> BoxFuture<'_, ApiResult<Value>>;

    /// `GET /times/barber/{id}`
    fn list_time_slots<'a>(&'a self, barber_id: &'a str) -> BoxFuture<'a, ApiResult<Value>>;

    /// `GET /reservas`
    fn list_reservas(&self) -> BoxFuture<'_, ApiResult<Value>>;

    /// `POST /reservas`
    ///
    /// Returns whatever the server answers with; the payload is sent as-is.
    fn create_reserva<'a>(
        &'a self,
        payload: &'a ReservaPayload,
    ) -> BoxFuture<'a, ApiResult<Value>>;

    /// `GET /barber/today-appointments`
    fn today_appointments(&self) -> BoxFuture<'_, ApiResult<Value>>;

    /// `PATCH /appointment/attend/{id}`
    fn attend_appointment<'a>(&'a self, appointment_id: &'a str) -> BoxFuture<'a, ApiResult<()>>;

    /// `PATCH /appointment/cancel/{id}`
    fn cancel_appointment<'a>(&'a self, appointment_id: &'a str) -> BoxFuture<'a, ApiResult<()>>;

    /// `POST /user/login`
    ///
    /// Does not store the session; the caller decides where it goes.
    fn login<'a>(&'a self, email: &'a str, password: &'a str) -> BoxFuture<'a, ApiResult<Session>>;

    /// `GET /user/me`
    fn me(&self) -> BoxFuture<'_, ApiResult<User>>;

    /// `POST /user/logout`
    fn logout(&self) -> BoxFuture<'_, ApiResult<()>>;
}

/// Builds a session from a login response body.
///
/// The user may be nested under `user` or be the body itself. A missing token
/// is allowed: some deployments authenticate by cookie.
pub fn session_from_login(body: &Value) -> ApiResult<Session> {
    let record = body
        .as_object()
        .ok_or_else(|| ApiError::invalid_response("login response is not an object"))?;

    let user_record = record
        .get("user")
        .and_then(Value::as_object)
        .unwrap_or(record);

    Ok(Session::new(
        read_optional_string(record, TOKEN_PATHS),
        user_from_record(user_record)?,
    ))
}

/// Builds the user from a `me` response body, unwrapping `user` if present.
pub fn user_from_body(body: &Value) -> ApiResult<User> {
    let record = body
        .as_object()
        .ok_or_else(|| ApiError::invalid_response("user response is not an object"))?;

    let user_record = record
        .get("user")
        .and_then(Value::as_object)
        .unwrap_or(record);
    user_from_record(user_record)
}

fn user_from_record(record: &Record) -> ApiResult<User> {
    let user = normalize_user(record);
    if user.id.is_empty() && user.email.is_empty() {
        return Err(ApiError::invalid_response(
            "user record carries neither id nor email",
        ));
    }
    Ok(user)
}

/// Canned responses for tests and offline runs.
///
/// Mutating calls are recorded and can be inspected with [`calls`](Self::calls).
#[derive(Debug, Default)]
pub struct FixtureBookingApi {
    barbers: Value,
    services: Value,
    time_slots: HashMap<String, Value>,
    reservas: Value,
    appointments: Value,
    user: Option<Value>,
    calls: Mutex<Vec<String>>,
}

impl FixtureBookingApi {
    /// Creates a fixture where every listing is empty.
    pub fn new() -> Self {
        Self {
            barbers: Value::Array(Vec::new()),
            services: Value::Array(Vec::new()),
            reservas: Value::Array(Vec::new()),
            appointments: Value::Array(Vec::new()),
            ..Self::default()
        }
    }

    /// Sets the `GET /barbers` body.
    pub fn with_barbers(mut self, body: Value) -> Self {
        self.barbers = body;
        self
    }

    /// Sets the `GET /services` body.
    pub fn with_services(mut self, body: Value) -> Self {
        self.services = body;
        self
    }

    /// Sets the `GET /times/barber/{id}` body for one barber.
    pub fn with_time_slots(mut self, barber_id: impl Into<String>, body: Value) -> Self {
        self.time_slots.insert(barber_id.into(), body);
        self
    }

    /// Sets the `GET /reservas` body.
    pub fn with_reservas(mut self, body: Value) -> Self {
        self.reservas = body;
        self
    }

    /// Sets the `GET /barber/today-appointments` body.
    pub fn with_appointments(mut self, body: Value) -> Self {
        self.appointments = body;
        self
    }

    /// Sets the user returned by `login` and `me`.
    pub fn with_user(mut self, body: Value) -> Self {
        self.user = Some(body);
        self
    }

    /// Returns the mutating calls made so far, e.g. `PATCH /appointment/attend/7`.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: String) {
        debug!(%call, "fixture call");
        self.calls.lock().await.push(call);
    }

    fn user_body(&self) -> ApiResult<&Value> {
        self.user
            .as_ref()
            .ok_or_else(|| ApiError::not_logged_in("no user configured in fixture"))
    }
}

impl BookingApi for FixtureBookingApi {
    fn name(&self) -> &str {
        "fixture"
    }

    fn list_barbers(&self) -> BoxFuture<'_, ApiResult<Value>> {
        Box::pin(async move { Ok(self.barbers.clone()) })
    }

    fn list_services(&self) -> BoxFuture<'_, ApiResult<Value>> {
        Box::pin(async move { Ok(self.services.clone()) })
    }

    fn list_time_slots<'a>(&'a self, barber_id: &'a str) -> BoxFuture<'a, ApiResult<Value>> {
        Box::pin(async move {
            self.time_slots
                .get(barber_id)
                .cloned()
                .ok_or_else(|| ApiError::not_found(format!("barber {} not found", barber_id)))
        })
    }

    fn list_reservas(&self) -> BoxFuture<'_, ApiResult<Value>> {
        Box::pin(async move { Ok(self.reservas.clone()) })
    }

    fn create_reserva<'a>(
        &'a self,
        payload: &'a ReservaPayload,
    ) -> BoxFuture<'a, ApiResult<Value>> {
        Box::pin(async move {
            self.record("POST /reservas".to_string()).await;
            serde_json::to_value(payload)
                .map_err(|e| ApiError::internal(format!("failed to encode payload: {}", e)))
        })
    }

    fn today_appointments(&self) -> BoxFuture<'_, ApiResult<Value>> {
        Box::pin(async move { Ok(self.appointments.clone()) })
    }

    fn attend_appointment<'a>(&'a self, appointment_id: &'a str) -> BoxFuture<'a, ApiResult<()>> {
        Box::pin(async move {
            self.record(format!("PATCH /appointment/attend/{}", appointment_id))
                .await;
            Ok(())
        })
    }

    fn cancel_appointment<'a>(&'a self, appointment_id: &'a str) -> BoxFuture<'a, ApiResult<()>> {
        Box::pin(async move {
            self.record(format!("PATCH /appointment/cancel/{}", appointment_id))
                .await;
            Ok(())
        })
    }

    fn login<'a>(&'a self, email: &'a str, _password: &'a str) -> BoxFuture<'a, ApiResult<Session>> {
        Box::pin(async move {
            self.record(format!("POST /user/login {}", email)).await;
            session_from_login(self.user_body()?)
        })
    }

    fn me(&self) -> BoxFuture<'_, ApiResult<User>> {
        Box::pin(async move { user_from_body(self.user_body()?) })
    }

    fn logout(&self) -> BoxFuture<'_, ApiResult<()>> {
        Box::pin(async move {
            self.record("POST /user/logout".to_string()).await;
            Ok(())
        })
    }
}
