//! Shared CLI output helpers.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success, checkmarks
//! - Red: errors
//! - Yellow: warnings
//! - Cyan: names, hints
//! - Bold: headers
//! - Dimmed: secondary info
//!
//! Status lines go to stderr so that stdout stays machine-readable. Every
//! stdout line goes through [`data`]; a closed pipe (`pipegen synth | head`)
//! ends the process with status 0 instead of panicking.

use console::style;
use std::fmt::Display;
use std::io::{self, Write};

const RULE_WIDTH: usize = 56;

fn stderr_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none() && console::colors_enabled_stderr()
}

fn stdout_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none() && console::colors_enabled()
}

/// Print a success message with checkmark (green).
///
/// Example: `✓ no collisions`
pub fn success(msg: &str) {
    if stderr_colors() {
        eprintln!("{} {}", style("✓").for_stderr().green(), msg);
    } else {
        eprintln!("✓ {}", msg);
    }
}

/// Print an error message (red).
///
/// Example: `✗ unknown environment 'qa'`
pub fn error(msg: &str) {
    if stderr_colors() {
        eprintln!("{} {}", style("✗").for_stderr().red(), msg);
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// Print a warning message (yellow).
pub fn warn(msg: &str) {
    if stderr_colors() {
        eprintln!("{} {}", style("⚠").for_stderr().yellow(), msg);
    } else {
        eprintln!("⚠ {}", msg);
    }
}

/// Print a hint message (cyan).
///
/// Example: `→ run: pipegen envs`
pub fn hint(msg: &str) {
    if stderr_colors() {
        eprintln!(
            "{} {}",
            style("→").for_stderr().cyan(),
            style(msg).for_stderr().cyan()
        );
    } else {
        eprintln!("→ {}", msg);
    }
}

/// Print a bold header.
pub fn header(title: &str) {
    if stdout_colors() {
        data(&style(title).bold().to_string());
    } else {
        data(title);
    }
}

/// Print a key-value pair (label dimmed).
///
/// Example: `  account  884162918988`
pub fn kv(label: &str, value: impl Display) {
    if stdout_colors() {
        data(&format!("  {}  {}", style(label).dim(), value));
    } else {
        data(&format!("  {}  {}", label, value));
    }
}

/// Print a horizontal rule separator.
pub fn rule() {
    if stdout_colors() {
        data(&style("─".repeat(RULE_WIDTH)).dim().to_string());
    } else {
        data(&"─".repeat(RULE_WIDTH));
    }
}

/// Format a generated name in cyan.
pub fn name(n: &str) -> String {
    if stdout_colors() {
        style(n).cyan().to_string()
    } else {
        n.to_string()
    }
}

/// Format a path in cyan, for status lines.
pub fn path(p: &std::path::Path) -> String {
    if stderr_colors() {
        style(p.display()).for_stderr().cyan().to_string()
    } else {
        p.display().to_string()
    }
}

/// Print one line of data to stdout.
pub fn data(text: &str) {
    if let Ok(false) = write_line(&mut io::stdout().lock(), text) {
        std::process::exit(0);
    }
}

/// Print a blank line.
pub fn blank() {
    data("");
}

/// Write `text` and a newline. `Ok(false)` means the reader went away.
fn write_line(out: &mut impl Write, text: &str) -> io::Result<bool> {
    match writeln!(out, "{}", text) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(false),
        Err(e) => Err(e),
    }
}
