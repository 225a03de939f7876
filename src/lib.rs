//! Flags under-checked homework and low grades in uploaded journal sheets.
//!
//! Sheets arrive as CSV or Excel files with loosely spelled headers. The
//! analyzers in [`services::sheet`] find their columns by approximate name
//! and return either flagged rows or a single status line; [`routes`]
//! exposes them per session over HTTP.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;

use services::session::SessionStore;

// Application state
pub struct AppState {
    pub config: config::Config,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: config::Config) -> Self {
        let sessions = SessionStore::new(config.data_dir.clone(), config.session_idle);
        Self { config, sessions }
    }
}
