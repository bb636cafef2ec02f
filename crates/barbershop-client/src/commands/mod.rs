//! Command implementations.
//!
//! Each command returns the rendered text; `main` prints it.

pub mod agenda;
pub mod auth;
pub mod book;
pub mod catalog;
pub mod config;
pub mod normalize;
pub mod slots;

use std::sync::Arc;

use barbershop_api::{BookingApi, SessionStore};

use crate::output::Renderer;

/// What a command needs to talk to the backend and print.
pub struct Context {
    /// The backend.
    pub api: Arc<dyn BookingApi>,
    /// The current login session.
    pub session: Arc<dyn SessionStore>,
    /// Output renderer.
    pub output: Renderer,
}

impl Context {
    /// Creates a command context.
    pub fn new(api: Arc<dyn BookingApi>, session: Arc<dyn SessionStore>, output: Renderer) -> Self {
        Self {
            api,
            session,
            output,
        }
    }
}
