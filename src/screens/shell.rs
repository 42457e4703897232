//! Shell screen - privileged guest session
//!
//! With the runtime present, the boot checklist gates the login and the
//! terminal is handed to the guest shell. Without it, a simulated
//! pseudo-shell keeps the flow usable on dev machines.

use colored::Colorize;

use crate::ascii;
use crate::context::Ctx;
use crate::error::XtlError;
use crate::guest::{self, ARCH_ALIAS};
use crate::prompt::Answer;
use crate::router::ScreenState;
use crate::term::{self, center_block, center_text, clear_screen, log_info};
use crate::theme;
use crate::verify::{BootCheckResult, VerifyOptions};

pub async fn show(ctx: &mut Ctx) -> Result<ScreenState, XtlError> {
    let settings = ctx.settings.load();
    let th = theme::get(&settings.theme);

    if !ctx.probe.has_runtime() {
        return pseudo_shell(ctx).await;
    }

    // Preflight the guest before handing over the terminal.
    let preflight = ctx
        .verifier()
        .verify(
            ARCH_ALIAS,
            VerifyOptions {
                title: Some(format!("Booting {}", ARCH_ALIAS)),
                ..VerifyOptions::default()
            },
        )
        .await;
    if let BootCheckResult::Fail(code) = preflight {
        return Ok(ScreenState::KernelPanic {
            stop_code: code.to_string(),
        });
    }

    clear_screen();
    println!(
        "{}",
        center_block(&ascii::colorize(ascii::logo_for(&settings.logo), th.logo))
    );
    log_info(&center_text(
        &"Initializing Arch Linux Environment...".green().to_string(),
    ));
    term::pause_ms(800).await;

    ctx.runner.run(&guest::login(ARCH_ALIAS)).await;

    // The user typed `exit` inside the guest; back to the menu.
    Ok(ScreenState::MainMenu)
}

async fn pseudo_shell(ctx: &mut Ctx) -> Result<ScreenState, XtlError> {
    let settings = ctx.settings.load();
    let th = theme::get(&settings.theme);

    clear_screen();
    println!(
        "{}",
        center_block(&ascii::colorize(ascii::logo_for(&settings.logo), th.logo))
    );
    log_info(&center_text(
        &"Container runtime not found. Starting XTL Pseudo-Shell..."
            .yellow()
            .to_string(),
    ));
    println!();

    let prompt_line = format!(
        "{}{}{}{}",
        "root@archlinux".green(),
        ":".white(),
        "~".blue(),
        "$".white()
    );

    loop {
        let answer = ctx.prompt.text(&prompt_line, "", None).await?;
        let Answer::Value(cmd) = answer else {
            return Ok(ScreenState::MainMenu);
        };

        match cmd.trim() {
            "exit" => return Ok(ScreenState::MainMenu),
            "clear" => {
                clear_screen();
                println!(
                    "{}",
                    center_block(&ascii::colorize(ascii::logo_for(&settings.logo), th.logo))
                );
            }
            "ls" => {
                println!("bin  etc  home  lib  mnt  opt  proc  root  sbin  tmp  usr  var");
            }
            "neofetch" => {
                println!("{}", "      /\\".cyan());
                println!("{}{}", "     /  \\      ".cyan(), "OS: Arch Linux ARM aarch64");
                println!("{}{}", "    / /\\ \\     ".cyan(), "Kernel: 5.10.117-android");
                println!("{}{}", "   / /  \\ \\    ".cyan(), "Shell: zsh 5.9");
                println!("{}{}", "  / /    \\ \\   ".cyan(), "Terminal: xterm-256color");
                println!("{}", " / /  /\\  \\ \\  ".cyan());
                println!("{}", "/ /__/  \\__\\ \\ ".cyan());
            }
            "" => continue,
            other => println!("{}", format!("zsh: command not found: {}", other).red()),
        }
    }
}
