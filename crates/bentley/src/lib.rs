//! Plain-text console logging.
//!
//! Every message is split into lines and each line is written to stdout with a
//! short level prefix, e.g. `[info]  connected to model server`. Nothing is
//! structured; the output is meant to be read in `docker logs`.
//!
//! Use the macros (`bentley::info!`, `bentley::warn!`, ...) at call sites so
//! coverage tooling can skip the lines.

use colored::*;
use std::fmt;
use std::io::Write;

/// Severity of a console message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  Verbose,
  Info,
  Warn,
  Error,
  Success,
}

impl Level {
  fn tag(self) -> &'static str {
    match self {
      Level::Verbose => "verb",
      Level::Info => "info",
      Level::Warn => "warn",
      Level::Error => "error",
      Level::Success => "sccs",
    }
  }

  fn color(self) -> Color {
    match self {
      Level::Verbose => Color::Cyan,
      Level::Info => Color::Blue,
      Level::Warn => Color::Yellow,
      Level::Error => Color::Red,
      Level::Success => Color::Green,
    }
  }
}

impl fmt::Display for Level {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.tag())
  }
}

/// Prefix padded so that message bodies line up across levels
fn format_prefix(level: Level) -> String {
  let tag = level.tag();
  let pad = 7usize.saturating_sub(tag.len() + 2);
  format!("[{}]{:<pad$}", tag.color(level.color()).bold(), "")
}

/// Render a message as the lines that would be printed for it
pub fn format_lines(level: Level, message: &str) -> Vec<String> {
  let prefix = format_prefix(level);
  message.lines().map(|line| format!("{prefix} {line}")).collect()
}

/// Write a message at the given level
pub fn log(level: Level, message: &str) {
  let stdout = std::io::stdout();
  let mut out = stdout.lock();
  for line in format_lines(level, message) {
    let _ = writeln!(out, "{line}");
  }
}

/// Detail that is usually only interesting while debugging
pub fn verbose(message: &str) {
  log(Level::Verbose, message);
}

/// General progress information
pub fn info(message: &str) {
  log(Level::Info, message);
}

/// Something is off but the run continues
pub fn warn(message: &str) {
  log(Level::Warn, message);
}

/// Something failed
pub fn error(message: &str) {
  log(Level::Error, message);
}

/// A step completed
pub fn success(message: &str) {
  log(Level::Success, message);
}

/// Banner line of the given length
pub fn banner_line(length: usize, ch: char) -> String {
  ch.to_string().repeat(length)
}

/// Step heading framed by dashes
pub fn announce(message: &str) {
  let banner = banner_line(50, '-');
  let stdout = std::io::stdout();
  let mut out = stdout.lock();
  let _ = writeln!(out, "{}", banner.blue().bold());
  for line in message.lines() {
    let _ = writeln!(out, "{}", line.blue().bold());
  }
  let _ = writeln!(out, "{}", banner.blue().bold());
}

#[macro_export]
macro_rules! info {
  ($msg:expr) => {
    $crate::info($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! warn {
  ($msg:expr) => {
    $crate::warn($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! error {
  ($msg:expr) => {
    $crate::error($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! verbose {
  ($msg:expr) => {
    $crate::verbose($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! success {
  ($msg:expr) => {
    $crate::success($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! announce {
  ($msg:expr) => {
    $crate::announce($msg); // LCOV_EXCL_LINE
  };
}
