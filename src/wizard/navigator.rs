//! Screen history and transition rules

use thiserror::Error;

use super::Screen;
use crate::draft::ServiceType;

/// Forward transitions that are not allowed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Choose a service type before continuing")]
    NoServiceType,

    #[error("Photos is the last step, publish the listing instead")]
    AtLastScreen,
}

/// Stack of visited screens; never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    history: Vec<Screen>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            history: vec![Screen::INITIAL],
        }
    }

    pub fn current(&self) -> Screen {
        self.history.last().copied().unwrap_or(Screen::INITIAL)
    }

    pub fn history(&self) -> &[Screen] {
        &self.history
    }

    /// Screen that follows the current one.
    ///
    /// `service_type` picks the detail screen when leaving the type selection.
    pub fn next(&self, service_type: Option<ServiceType>) -> Result<Screen, NavigationError> {
        match self.current() {
            Screen::SelectType => service_type
                .map(Screen::Detail)
                .ok_or(NavigationError::NoServiceType),
            Screen::Detail(_) => Ok(Screen::Photos),
            Screen::Photos => Err(NavigationError::AtLastScreen),
        }
    }

    pub fn forward(&mut self, service_type: Option<ServiceType>) -> Result<Screen, NavigationError> {
        let next = self.next(service_type)?;
        self.history.push(next);
        Ok(next)
    }

    /// Pop to the previous screen; on the initial screen, stay put
    pub fn back(&mut self) -> Screen {
        if self.history.len() > 1 {
            self.history.pop();
        }
        self.current()
    }

    /// Unwind to `target`, rebuilding the path to it when it was never visited
    pub fn return_to(&mut self, target: Screen) -> Screen {
        if let Some(pos) = self.history.iter().rposition(|s| *s == target) {
            self.history.truncate(pos + 1);
        } else {
            self.history = vec![Screen::INITIAL];
            match target {
                Screen::SelectType => {}
                Screen::Detail(_) => self.history.push(target),
                Screen::Photos => {}
            }
        }
        self.current()
    }

    pub fn reset(&mut self) {
        self.history = vec![Screen::INITIAL];
    }
}
