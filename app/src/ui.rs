use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

static QUIET: AtomicBool = AtomicBool::new(false);
static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn init(quiet: bool, verbose: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
    VERBOSE.store(verbose, Ordering::Relaxed);
}

fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

pub fn print_info(message: &str) {
    if !is_quiet() {
        println!("{} {}", "ℹ".blue(), message);
    }
}

/// Warning line, not gated by quiet mode: input problems must always reach
/// the user.
pub fn warning_line(message: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), message.yellow())
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

pub fn print_header(message: &str) {
    if !is_quiet() {
        println!("\n{}", message.bold().cyan());
        println!("{}", "─".repeat(message.chars().count()).cyan());
    }
}

pub fn print_verbose(message: &str) {
    if is_verbose() && !is_quiet() {
        println!("  {}", message.dimmed());
    }
}

pub fn print_separator() {
    if !is_quiet() {
        println!("{}", "=".repeat(60).dimmed());
    }
}

/// Framed alert on stderr. Shown even in quiet mode: it stands in for the
/// modal error dialog.
pub fn print_alert(title: &str, message: &str) {
    let width = message
        .lines()
        .map(|l| l.chars().count())
        .chain(std::iter::once(title.chars().count()))
        .max()
        .unwrap_or(0)
        + 2;

    eprintln!("{}", format!("┌{}┐", "─".repeat(width)).red());
    let title = format!("{:<w$}", title, w = width - 2);
    eprintln!("{} {} {}", "│".red(), title.red().bold(), "│".red());
    eprintln!("{}", format!("├{}┤", "─".repeat(width)).red());
    for line in message.lines() {
        eprintln!("{} {:<w$} {}", "│".red(), line, "│".red(), w = width - 2);
    }
    eprintln!("{}", format!("└{}┘", "─".repeat(width)).red());
}

/// Indeterminate progress indicator. Hidden in quiet mode.
pub fn spinner(message: &str) -> ProgressBar {
    if is_quiet() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
