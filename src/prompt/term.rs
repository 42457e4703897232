//! Terminal prompt implementation (crossterm raw-mode)
//!
//! Blocking keyboard loops run on the async runtime's blocking pool, the
//! same way subprocess waits do. Esc and Ctrl+C inside a prompt resolve to
//! the cancellation sentinel; the process-level interrupt handler only sees
//! SIGINT outside raw mode.

use std::io::{self, Write};

use anyhow::Result;
use async_trait::async_trait;
use colored::Colorize;
use crossterm::cursor::{MoveToColumn, MoveUp};
use crossterm::event::{read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};

use super::{Answer, Prompt, SelectItem, Validator};

#[derive(Debug, Default)]
pub struct TermPrompt;

impl TermPrompt {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Prompt for TermPrompt {
    async fn select(&mut self, message: &str, items: &[SelectItem]) -> Result<Answer<String>> {
        let message = message.to_string();
        let items = items.to_vec();
        tokio::task::spawn_blocking(move || select_blocking(&message, &items)).await?
    }

    async fn text(
        &mut self,
        message: &str,
        placeholder: &str,
        validate: Option<Validator>,
    ) -> Result<Answer<String>> {
        let message = message.to_string();
        let placeholder = placeholder.to_string();
        tokio::task::spawn_blocking(move || text_blocking(&message, &placeholder, validate))
            .await?
    }

    async fn confirm(&mut self, message: &str) -> Result<Answer<bool>> {
        let message = message.to_string();
        tokio::task::spawn_blocking(move || confirm_blocking(&message)).await?
    }
}

/// Restores cooked mode even when a prompt loop errors out.
struct RawGuard;

impl RawGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

fn next_key() -> Result<KeyEvent> {
    loop {
        if let Event::Key(key) = read()? {
            if key.kind == KeyEventKind::Press || key.kind == KeyEventKind::Repeat {
                return Ok(key);
            }
        }
    }
}

fn is_cancel(key: &KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c'))
}

fn line(out: &mut impl Write, text: &str) -> Result<()> {
    execute!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    write!(out, "{}\r\n", text)?;
    Ok(())
}

fn render_items(out: &mut impl Write, items: &[SelectItem], cursor: usize) -> Result<()> {
    for (i, item) in items.iter().enumerate() {
        let hint = item
            .hint
            .as_deref()
            .map(|h| format!(" ({})", h).bright_black().to_string())
            .unwrap_or_default();
        let text = if i == cursor {
            format!("{} {}{}", "❯".cyan(), item.label.clone().bold(), hint)
        } else {
            format!("  {}{}", item.label.clone().bright_black(), hint)
        };
        line(out, &text)?;
    }
    out.flush()?;
    Ok(())
}

fn select_blocking(message: &str, items: &[SelectItem]) -> Result<Answer<String>> {
    if items.is_empty() {
        return Ok(Answer::Cancelled);
    }

    let mut out = io::stdout();
    writeln!(out, "{} {}", "◆".cyan(), message)?;

    let _guard = RawGuard::new()?;
    let mut cursor = 0usize;
    render_items(&mut out, items, cursor)?;

    loop {
        let key = next_key()?;
        if is_cancel(&key) {
            return Ok(Answer::Cancelled);
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                cursor = cursor.checked_sub(1).unwrap_or(items.len() - 1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                cursor = (cursor + 1) % items.len();
            }
            KeyCode::Enter => {
                let chosen = &items[cursor];
                execute!(out, MoveUp(items.len() as u16))?;
                for _ in 0..items.len() {
                    execute!(out, Clear(ClearType::CurrentLine), MoveToColumn(0))?;
                    write!(out, "\r\n")?;
                }
                execute!(out, MoveUp(items.len() as u16))?;
                line(&mut out, &format!("{} {}", "◇".green(), chosen.label))?;
                out.flush()?;
                return Ok(Answer::Value(chosen.value.clone()));
            }
            _ => continue,
        }
        execute!(out, MoveUp(items.len() as u16))?;
        render_items(&mut out, items, cursor)?;
    }
}

fn text_blocking(
    message: &str,
    placeholder: &str,
    validate: Option<Validator>,
) -> Result<Answer<String>> {
    let mut out = io::stdout();
    let hint = if placeholder.is_empty() {
        String::new()
    } else {
        format!(" {}", format!("({})", placeholder).bright_black())
    };
    writeln!(out, "{} {}{}", "◆".cyan(), message, hint)?;

    let _guard = RawGuard::new()?;
    let mut buffer = String::new();
    render_input(&mut out, &buffer)?;

    loop {
        let key = next_key()?;
        if is_cancel(&key) {
            write!(out, "\r\n")?;
            out.flush()?;
            return Ok(Answer::Cancelled);
        }
        match key.code {
            KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
                buffer.push(c);
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Enter => {
                if let Some(validate) = validate {
                    if let Some(err) = validate(&buffer) {
                        write!(out, "\r\n")?;
                        line(&mut out, &format!("{} {}", "✖".red(), err.red()))?;
                        render_input(&mut out, &buffer)?;
                        continue;
                    }
                }
                write!(out, "\r\n")?;
                out.flush()?;
                return Ok(Answer::Value(buffer));
            }
            _ => continue,
        }
        render_input(&mut out, &buffer)?;
    }
}

fn render_input(out: &mut impl Write, buffer: &str) -> Result<()> {
    execute!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    write!(out, "{} {}", "›".cyan(), buffer)?;
    out.flush()?;
    Ok(())
}

fn confirm_blocking(message: &str) -> Result<Answer<bool>> {
    let mut out = io::stdout();
    writeln!(
        out,
        "{} {} {}",
        "◆".cyan(),
        message,
        "(y/n)".bright_black()
    )?;

    let _guard = RawGuard::new()?;
    loop {
        let key = next_key()?;
        if is_cancel(&key) {
            return Ok(Answer::Cancelled);
        }
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                line(&mut out, &format!("{} yes", "◇".green()))?;
                return Ok(Answer::Value(true));
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                line(&mut out, &format!("{} no", "◇".green()))?;
                return Ok(Answer::Value(false));
            }
            _ => continue,
        }
    }
}
