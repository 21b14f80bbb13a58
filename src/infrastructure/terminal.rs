//! Terminal implementations of the presentation boundaries.

use arboard::Clipboard as SystemClipboardHandle;
use colored::Colorize;
use tracing::debug;

use crate::domain::effects::{Clipboard, Navigator, Notifier};
use crate::error::AppError;

/// Prints notifications to stderr, green for success and red for errors.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green().bold(), message);
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }
}

/// System clipboard via `arboard`.
///
/// A new handle is opened per copy; on headless systems every copy fails and
/// the caller decides how to degrade.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<(), AppError> {
        let mut handle = SystemClipboardHandle::new()
            .map_err(|e| AppError::storage(format!("clipboard unavailable: {e}")))?;
        handle
            .set_text(text.to_string())
            .map_err(|e| AppError::storage(format!("clipboard write failed: {e}")))?;
        debug!("Copied to clipboard");
        Ok(())
    }
}

/// Prints the navigation target. A terminal cannot follow a redirect itself,
/// so the user opens the printed address.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, url: &str) {
        println!("{} {}", "Redirecting to".dimmed(), url.cyan().underline());
    }
}
