//! Wizard flow independent of any UI
//!
//! - `screen`: the screens and the fields each one edits
//! - `navigator`: history stack and transition rules
//! - `controller`: draft ownership, persistence and submission

pub mod controller;
pub mod navigator;
pub mod screen;

pub use controller::{ScreenForm, WizardController};
pub use navigator::{NavigationError, Navigator};
pub use screen::{Field, Screen};
