//! HTTP gateway for the Portal URL shortener.
//!
//! Exposes `POST /url` and `GET /url/{identifier}` on top of any
//! [`Shortener`](portal_shortener::Shortener).

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
