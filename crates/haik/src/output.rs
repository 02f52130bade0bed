//! Terminal output: rendered documents to stdout, diagnostics to stderr.

use std::io;

use console::{Style, Term};

pub(crate) struct Output {
    stdout: Term,
    stderr: Term,
    success: Style,
    warning: Style,
    error: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            stdout: Term::stdout(),
            stderr: Term::stderr(),
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
        }
    }

    /// Write document output to stdout unchanged.
    pub(crate) fn document(&self, text: &str) -> io::Result<()> {
        self.stdout.write_str(text)?;
        self.stdout.flush()
    }

    pub(crate) fn note(&self, msg: &str) {
        let _ = self.stderr.write_line(msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        let _ = self.stderr.write_line(&self.success.apply_to(msg).to_string());
    }

    /// Print render warnings, one per line.
    pub(crate) fn warnings(&self, warnings: &[String]) {
        for warning in warnings {
            let line = format!("{} {warning}", self.warning.apply_to("warning:"));
            let _ = self.stderr.write_line(&line);
        }
    }

    pub(crate) fn error(&self, msg: &str) {
        let _ = self.stderr.write_line(&self.error.apply_to(msg).to_string());
    }
}
