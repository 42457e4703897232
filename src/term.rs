//! Terminal helpers - centering, ANSI stripping, timed pauses, status lines
//!
//! All artificial UI delays go through [`pause`], which scales durations by
//! the lite-mode factor. The resolved lite-mode flag travels through the
//! `XTL_LITE_MODE` environment variable so delay scaling is process-global.

use std::io::{self, Write};
use std::time::Duration;

use colored::{Color, Colorize};
use crossterm::terminal;
use crossterm::{cursor, execute};
use once_cell::sync::Lazy;
use regex::Regex;

/// Environment variable carrying the resolved lite-mode flag ("1"/"0").
pub const LITE_MODE_ENV: &str = "XTL_LITE_MODE";

/// Divisor applied to every delay when lite mode is on (0.25x).
const LITE_DIVISOR: u32 = 4;

static ANSI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"[\u{1b}\u{9b}][\[()#;?]*(?:[0-9]{1,4}(?:;[0-9]{0,4})*)?[0-9A-ORZcf-nqry=><]",
    )
    .expect("ANSI pattern is valid")
});

/// Remove ANSI escape sequences from a string.
pub fn strip_ansi(s: &str) -> String {
    ANSI_RE.replace_all(s, "").into_owned()
}

/// Current terminal width in columns, 80 when undetectable.
pub fn term_width() -> usize {
    terminal::size().map(|(w, _)| w as usize).unwrap_or(80)
}

fn visible_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

pub(crate) fn center_text_in(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(visible_width(s)) / 2;
    format!("{}{}", " ".repeat(padding), s)
}

pub(crate) fn center_block_in(s: &str, width: usize) -> String {
    let lines: Vec<&str> = s.split('\n').collect();
    let content_width = lines.iter().map(|l| visible_width(l)).max().unwrap_or(0);
    let padding = width.saturating_sub(content_width) / 2;
    let pad = " ".repeat(padding);
    lines
        .iter()
        .map(|l| {
            if l.is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, l)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Center a single line against the current terminal width.
pub fn center_text(s: &str) -> String {
    center_text_in(s, term_width())
}

/// Center a multi-line block as a unit, preserving internal alignment.
pub fn center_block(s: &str) -> String {
    center_block_in(s, term_width())
}

/// Clear the screen and scrollback, homing the cursor.
pub fn clear_screen() {
    let _ = execute!(
        io::stdout(),
        terminal::Clear(terminal::ClearType::All),
        terminal::Clear(terminal::ClearType::Purge),
        cursor::MoveTo(0, 0)
    );
}

/// Whether lite mode is active for this process.
pub fn lite_mode() -> bool {
    std::env::var(LITE_MODE_ENV).map(|v| v == "1").unwrap_or(false)
}

pub(crate) fn scale_for(d: Duration, lite: bool) -> Duration {
    if lite {
        d / LITE_DIVISOR
    } else {
        d
    }
}

/// Sleep for `d`, scaled by the lite-mode factor.
pub async fn pause(d: Duration) {
    tokio::time::sleep(scale_for(d, lite_mode())).await;
}

/// Sleep for `ms` milliseconds, scaled by the lite-mode factor.
pub async fn pause_ms(ms: u64) {
    pause(Duration::from_millis(ms)).await;
}

/// Render a progress bar like `[████░░░░]  42%`.
pub fn progress_bar(percent: u8, width: usize) -> String {
    let pct = percent.min(100) as usize;
    let filled = (pct * width + 50) / 100;
    let empty = width.saturating_sub(filled);
    format!(
        "[{}{}] {:>3}%",
        "█".repeat(filled),
        "░".repeat(empty),
        pct
    )
}

/// Wrap lines in a rounded box with one space of horizontal padding.
pub fn boxed(lines: &[String], border: Color) -> String {
    let inner = lines.iter().map(|l| visible_width(l)).max().unwrap_or(0);
    let horizontal = "─".repeat(inner + 2);
    let mut out = Vec::with_capacity(lines.len() + 2);
    out.push(format!("╭{}╮", horizontal).color(border).to_string());
    for line in lines {
        let fill = " ".repeat(inner - visible_width(line));
        out.push(format!(
            "{} {}{} {}",
            "│".color(border),
            line,
            fill,
            "│".color(border)
        ));
    }
    out.push(format!("╰{}╯", horizontal).color(border).to_string());
    out.join("\n")
}

/// Print a titled, centered note block.
pub fn note(body: &str, title: &str) {
    println!("{}", center_text(title));
    let lines: Vec<String> = body.split('\n').map(str::to_string).collect();
    println!("{}", center_block(&boxed(&lines, Color::Cyan)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Log lines
// ─────────────────────────────────────────────────────────────────────────────

pub fn log_info(msg: &str) {
    println!("{} {}", "●".cyan(), msg);
}

pub fn log_warn(msg: &str) {
    println!("{} {}", "▲".yellow(), msg);
}

pub fn log_error(msg: &str) {
    println!("{} {}", "✖".red(), msg);
}

pub fn log_step(msg: &str) {
    println!("{} {}", "◆".green(), msg);
}

// ─────────────────────────────────────────────────────────────────────────────
// Status line (line-based spinner)
// ─────────────────────────────────────────────────────────────────────────────

/// Line-based progress reporter for long operations.
///
/// Prints one status line per update instead of animating in place, so it
/// interleaves cleanly with inherited subprocess output.
#[derive(Debug, Default)]
pub struct Spinner {
    active: bool,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, message: &str) {
        println!("{} {}", "◐".cyan(), message);
        let _ = io::stdout().flush();
        self.active = true;
    }

    pub fn message(&mut self, message: &str) {
        println!("{} {}", "◐".cyan(), message);
        let _ = io::stdout().flush();
    }

    pub fn stop(&mut self, message: &str) {
        println!("{} {}", "◇".green(), message);
        let _ = io::stdout().flush();
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_ansi_removes_color_codes() {
        let colored = "\u{1b}[31mred\u{1b}[0m plain";
        assert_eq!(strip_ansi(colored), "red plain");
    }

    #[test]
    fn strip_ansi_passes_plain_text_through() {
        assert_eq!(strip_ansi("no escapes here"), "no escapes here");
    }

    #[test]
    fn center_text_pads_to_width() {
        assert_eq!(center_text_in("ab", 10), "    ab");
        // Colored content is measured by visible width only.
        let line = format!("{}", "ab".red());
        assert!(center_text_in(&line, 10).starts_with("    "));
    }

    #[test]
    fn center_text_never_truncates_wide_content() {
        assert_eq!(center_text_in("abcdef", 4), "abcdef");
    }

    #[test]
    fn center_block_keeps_internal_alignment() {
        let block = "ab\nabcd";
        let centered = center_block_in(block, 8);
        let lines: Vec<&str> = centered.split('\n').collect();
        assert_eq!(lines[0], "  ab");
        assert_eq!(lines[1], "  abcd");
    }

    #[test]
    fn progress_bar_bounds() {
        assert_eq!(progress_bar(0, 10), "[░░░░░░░░░░]   0%");
        assert_eq!(progress_bar(100, 10), "[██████████] 100%");
        assert_eq!(progress_bar(50, 10), "[█████░░░░░]  50%");
        // Values above 100 clamp.
        assert_eq!(progress_bar(255, 10), "[██████████] 100%");
    }

    #[test]
    fn scale_for_applies_lite_factor() {
        let nominal = Duration::from_millis(1000);
        assert_eq!(scale_for(nominal, false), Duration::from_millis(1000));
        assert_eq!(scale_for(nominal, true), Duration::from_millis(250));
    }

    #[test]
    fn boxed_surrounds_content() {
        let boxed = boxed(&["hi".to_string()], Color::White);
        let plain = strip_ansi(&boxed);
        assert!(plain.contains("╭────╮"));
        assert!(plain.contains("│ hi │"));
        assert!(plain.contains("╰────╯"));
    }
}
