//! Notifier writing to a terminal or any other writer

use super::Notifier;
use crate::domain::Spec;
use crate::error::NotifyError;
use colored::Colorize;
use std::io::Write;

/// Writes change reports to a writer, one dependency per line
pub struct ConsoleNotifier<W: Write> {
    writer: W,
    color: bool,
}

impl<W: Write> ConsoleNotifier<W> {
    /// Create a notifier; `color` enables colored section headers
    pub fn new(writer: W, color: bool) -> Self {
        Self { writer, color }
    }

    fn section(&mut self, title: &str, specs: &[Spec], new: bool) -> Result<(), NotifyError> {
        if specs.is_empty() {
            return Ok(());
        }

        if self.color {
            let title = if new {
                title.green().bold()
            } else {
                title.yellow().bold()
            };
            writeln!(self.writer, "{}", title)?;
        } else {
            writeln!(self.writer, "{}", title)?;
        }

        for spec in specs {
            writeln!(self.writer, "{}", spec)?;
        }
        Ok(())
    }
}

impl<W: Write> Notifier for ConsoleNotifier<W> {
    fn send(&mut self, new: &[Spec], updated: &[Spec]) -> Result<(), NotifyError> {
        self.section("New Dependencies:", new, true)?;
        self.section("Updated Dependencies:", updated, false)?;
        self.writer.flush()?;
        Ok(())
    }
}
