//! HTTP front-end for the permalink store.
//!
//! Serves the reporter's `?make_redir=` / `?do_redir=` query interface and a
//! small JSON API on top of any [`PermalinkStore`](permalink_core::PermalinkStore).

pub mod app;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
