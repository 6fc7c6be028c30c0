//! Anuncio - terminal wizard for composing and publishing marketplace service listings
//!
//! The library holds the draft model, its session persistence, the wizard
//! flow and the backend client; the `anuncio` binary wraps them in a TUI.

pub mod api;
pub mod app;
pub mod config;
pub mod draft;
pub mod logging;
pub mod photos;
pub mod submission;
pub mod ui;
pub mod wizard;
