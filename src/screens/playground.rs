//! Playground - pre-install command loop
//!
//! Shown while no guest is installed. A tiny command interpreter that leads
//! the user into the installer.

use colored::Colorize;

use crate::ascii;
use crate::context::Ctx;
use crate::error::XtlError;
use crate::prompt::Answer;
use crate::router::ScreenState;
use crate::screens::panic::DEFAULT_PANIC_CODE;
use crate::term::{center_block, center_text, clear_screen, log_error, log_info, log_step, log_warn};
use crate::theme;

fn banner(ctx: &mut Ctx) {
    let settings = ctx.settings.load();
    let th = theme::get(&settings.theme);
    clear_screen();
    println!(
        "{}",
        center_block(&ascii::colorize(ascii::logo_for(&settings.logo), th.logo))
    );
    log_warn(&center_text(
        &"SYSTEM STATUS: UNINITIALIZED".yellow().to_string(),
    ));
}

fn validate_nonempty(value: &str) -> Option<String> {
    if value.is_empty() {
        Some("Please enter a command".to_string())
    } else {
        None
    }
}

pub async fn show(ctx: &mut Ctx) -> Result<ScreenState, XtlError> {
    banner(ctx);
    log_info(&center_text(
        &"Sys info: Type \"install\" to begin system setup."
            .bright_black()
            .to_string(),
    ));
    println!();

    loop {
        let answer = ctx
            .prompt
            .text(
                &format!("{}", "xtl@install:~$".cyan()),
                "",
                Some(validate_nonempty),
            )
            .await?;

        let Answer::Value(cmd) = answer else {
            return Ok(ScreenState::Exit);
        };

        match cmd.trim().to_lowercase().as_str() {
            "help" => {
                log_step("Available Commands:");
                println!(
                    "{}{}",
                    "  install  ".white(),
                    "- Start Real Arch Linux Installation".bright_black()
                );
                println!("{}{}", "  clear    ".white(), "- Clear screen".bright_black());
                println!("{}{}", "  exit     ".white(), "- Exit program".bright_black());
            }
            "install" => {
                let confirm = ctx
                    .prompt
                    .confirm("This will download ~700MB data. Continue?")
                    .await?;
                if confirm == Answer::Value(true) {
                    return Ok(ScreenState::Installer);
                }
            }
            "clear" => banner(ctx),
            "panic" => {
                return Ok(ScreenState::KernelPanic {
                    stop_code: DEFAULT_PANIC_CODE.to_string(),
                })
            }
            "exit" => return Ok(ScreenState::Exit),
            other => log_error(&format!("Command not found: {}", other)),
        }
    }
}
