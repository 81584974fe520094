use std::io::{self, Write};

use chrono::Local;
use indicatif::ProgressBar;

use crate::render::{MarkupDocument, Theme};
use crate::ui;

/// Passive display surface driven by the session.
pub trait View {
    /// Disable the submit control and show the progress indicator, or the
    /// reverse.
    fn set_busy(&mut self, busy: bool);
    fn show_markup(&mut self, document: &MarkupDocument);
    fn show_text(&mut self, text: &str);
    /// Result area, plain text.
    fn show_error(&mut self, text: &str);
    /// Blocking notification.
    fn notify_error(&mut self, message: &str);
    /// Lightweight inline warning, used for input problems.
    fn warn(&mut self, message: &str);
    fn clear(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Html,
}

/// What the session renders into, besides the view itself.
#[derive(Debug, Clone, Copy)]
pub struct Presentation {
    pub format: OutputFormat,
    pub theme: Theme,
}

pub struct TerminalView {
    spinner: Option<ProgressBar>,
    notices: Box<dyn Write + Send>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::with_notices(Box::new(io::stderr()))
    }

    /// Input warnings go to `notices`, in quiet mode too.
    pub fn with_notices(notices: Box<dyn Write + Send>) -> Self {
        Self {
            spinner: None,
            notices,
        }
    }

    fn stamp() -> String {
        format!("Results ({})", Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for TerminalView {
    fn set_busy(&mut self, busy: bool) {
        if busy {
            self.spinner = Some(ui::spinner("Querying Hacienda..."));
        } else if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    fn show_markup(&mut self, document: &MarkupDocument) {
        // The document is the payload: printed even in quiet mode.
        println!("{}", document.as_str());
    }

    fn show_text(&mut self, text: &str) {
        ui::print_header(&Self::stamp());
        print!("{text}");
        ui::print_separator();
    }

    fn show_error(&mut self, text: &str) {
        ui::print_error(text);
    }

    fn notify_error(&mut self, message: &str) {
        ui::print_alert("Error", message);
    }

    fn warn(&mut self, message: &str) {
        if let Err(e) = writeln!(self.notices, "{}", ui::warning_line(message)) {
            tracing::debug!(error = %e, "could not write warning");
        }
    }

    fn clear(&mut self) {
        ui::print_info("Cleared.");
    }
}
