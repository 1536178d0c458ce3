//! Clipboard access through the terminal
//!
//! Uses the OSC 52 escape sequence, which most modern terminals (and tmux
//! with `set-clipboard on`) forward to the system clipboard. Copying is
//! fire-and-forget: failures are logged and never reported to the user.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::io::{self, Write};

/// Clipboard collaborator
pub trait Clipboard {
    fn copy(&self, text: &str);
}

/// Writes OSC 52 sequences to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct Osc52Clipboard;

impl Osc52Clipboard {
    pub fn sequence(text: &str) -> String {
        format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
    }
}

impl Clipboard for Osc52Clipboard {
    fn copy(&self, text: &str) {
        let mut stdout = io::stdout();
        let result = stdout
            .write_all(Self::sequence(text).as_bytes())
            .and_then(|_| stdout.flush());
        match result {
            Ok(()) => tracing::debug!(bytes = text.len(), "copied to clipboard"),
            Err(err) => tracing::debug!(%err, "clipboard copy failed"),
        }
    }
}
