//! Booking API client.
//!
//! This crate is the boundary between the booking screens and the backend:
//!
//! - [`BookingApi`] - The trait every backend implementation provides
//! - [`HttpBookingApi`] - reqwest-backed implementation
//! - [`FixtureBookingApi`] - Canned responses for tests and offline runs
//! - [`SessionStore`] - Where the logged-in session lives
//! - [`ApiError`] - Transport error taxonomy
//!
//! # Architecture
//!
//! ```text
//!  ┌──────────────┐  raw JSON   ┌──────────────────────┐
//!  │ HttpBookingApi├───────────►│ barbershop_core::     │
//!  └──────┬───────┘             │   normalize / slots   │
//!         │ bearer token        └──────────┬───────────┘
//!  ┌──────┴───────┐                        ▼
//!  │ SessionStore │             Barber, Service, SlotOption ...
//!  └──────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use barbershop_api::{ApiConfig, BookingApi, HttpBookingApi, MemorySessionStore};
//!
//! let api = HttpBookingApi::new(ApiConfig::default(), Arc::new(MemorySessionStore::new()))?;
//! let services = barbershop_core::normalize_services(&api.list_services().await?);
//! ```

pub mod booking;
pub mod error;
pub mod http;
pub mod session;

pub use booking::{BookingApi, BoxFuture, FixtureBookingApi, session_from_login, user_from_body};
pub use error::{ApiError, ApiErrorCode, ApiResult};
pub use http::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpBookingApi};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
