//! Terminal implementation of the settings surface.
//!
//! Keeps the rendered form for the command handlers, prints field errors
//! and the SSL warning to stderr, and opens links with the platform opener.

use std::process::{Command, Stdio};

use tunedeck_core::{LinkError, RawProfileFields, SettingsSurface, ValidationError};

use crate::output;

const SSL_WARNING: &str = "SSL is enabled. The server must be set up to accept encrypted \
    connections, and servers using a self-signed certificate need extra setup \
    before the client will trust them.";

pub struct TerminalSurface {
    form: Option<RawProfileFields>,
    /// Print field errors as they happen (interactive editing).
    interactive: bool,
    /// Announce completion on stderr.
    announce: bool,
    color: bool,
    pending_warning: bool,
}

impl TerminalSurface {
    pub fn new(interactive: bool, announce: bool, color: bool) -> Self {
        Self {
            form: None,
            interactive,
            announce,
            color,
            pending_warning: false,
        }
    }

    /// The form as last rendered by the controller.
    pub fn form(&self) -> Option<&RawProfileFields> {
        self.form.as_ref()
    }

    /// Whether the SSL warning was shown and still awaits a response.
    pub fn take_pending_warning(&mut self) -> bool {
        std::mem::take(&mut self.pending_warning)
    }
}

impl SettingsSurface for TerminalSurface {
    fn render(&mut self, fields: &RawProfileFields) {
        self.form = Some(fields.clone());
    }

    fn show_field_error(&mut self, error: &ValidationError) {
        if self.interactive {
            eprintln!("{}", output::failure(&error.to_string(), self.color));
        }
    }

    fn show_ssl_warning(&mut self) {
        eprintln!("{}", output::warning(SSL_WARNING, self.color));
        self.pending_warning = true;
    }

    fn open_link(&mut self, url: &str) -> Result<(), LinkError> {
        let status = opener(url)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(format!("link opener exited with {status}").into())
        }
    }

    fn finish(&mut self) {
        if self.announce {
            eprintln!("{}", output::success("Connection profile saved", self.color));
        }
    }
}

#[cfg(target_os = "macos")]
fn opener(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn opener(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}
