//! Change notification
//!
//! A notifier receives the dependencies found by a reconcile run:
//! - new: sources the store did not know about
//! - updated: sources with a newer resolved version

mod console;

pub use console::ConsoleNotifier;

use crate::domain::Spec;
use crate::error::NotifyError;

/// Delivers a report of new and updated dependencies
pub trait Notifier {
    /// Report the changes; sending nothing for two empty lists is allowed
    fn send(&mut self, new: &[Spec], updated: &[Spec]) -> Result<(), NotifyError>;
}
