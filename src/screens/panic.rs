//! Kernel panic and kernel corrupt screens
//!
//! Both render a stop code verbatim. Panic is transient and reboots the
//! state machine; corrupt locks into a maintenance prompt until the user
//! picks a recovery path.

use colored::{Color, Colorize};

use crate::ascii;
use crate::context::Ctx;
use crate::error::XtlError;
use crate::prompt::Answer;
use crate::router::ScreenState;
use crate::term::{self, center_block, center_text, clear_screen};

/// Stop code shown when a panic is raised without a verifier result.
pub const DEFAULT_PANIC_CODE: &str = "CRITICAL_PROCESS_DIED";

/// Stop code shown when the corrupt screen is entered without one.
pub const DEFAULT_CORRUPT_CODE: &str = "ROOTFS_INSTALL_FAILED";

const PANIC_FIGURE: &str = r"
  _  ________ _____  _   _ ______ _
 | |/ /  ____|  __ \| \ | |  ____| |
 | ' /| |__  | |__) |  \| | |__  | |
 |  < |  __| |  _  /| . ` |  __| | |
 | . \| |____| | \ \| |\  | |____| |____
 |_|\_\______|_|  \_\_| \_|______|______|
";

const CORRUPT_FIGURE: &str = r"
  _  __ _____ _
 | |/ // ____| |
 | ' /| |    | |     CORRUPT
 |  < | |    | |
 | . \| |____| |____
 |_|\_\\_____|______|
";

pub async fn kernel_panic(ctx: &mut Ctx, stop_code: &str) -> Result<ScreenState, XtlError> {
    let settings = ctx.settings.load();

    clear_screen();
    println!(
        "{}",
        center_block(&ascii::colorize(ascii::logo_for(&settings.logo), Color::Red))
    );
    println!("{}", center_block(&PANIC_FIGURE.red().bold().to_string()));
    println!();
    println!(
        "{}",
        center_text(&" SYSTEM FAILURE DETECTED ".on_red().black().bold().to_string())
    );
    println!();
    println!(
        "{}",
        center_text(&format!("STOP CODE: {}", stop_code).red().to_string())
    );
    println!(
        "{}",
        center_text(&"Collecting crash report... 100%".bright_black().to_string())
    );
    println!(
        "{}",
        center_text(&"Kernel state: HALTED".bright_black().to_string())
    );
    println!(
        "{}",
        center_text(&"Rebooting XTL...".yellow().to_string())
    );

    term::pause_ms(5000).await;

    Ok(ScreenState::Boot)
}

pub async fn kernel_corrupt(ctx: &mut Ctx, stop_code: &str) -> Result<ScreenState, XtlError> {
    let settings = ctx.settings.load();

    loop {
        clear_screen();
        println!(
            "{}",
            center_block(&ascii::colorize(ascii::logo_for(&settings.logo), Color::Red))
        );
        println!(
            "{}",
            center_block(&CORRUPT_FIGURE.red().bold().to_string())
        );
        println!();
        println!(
            "{}",
            center_text(&" KERNEL CORRUPT ".on_red().black().bold().to_string())
        );
        println!();
        println!(
            "{}",
            center_text(&format!("STOP CODE: {}", stop_code).red().to_string())
        );
        println!(
            "{}",
            center_text(
                &"System locked to prevent further damage."
                    .bright_black()
                    .to_string()
            )
        );
        println!(
            "{}",
            center_text(&"Maintenance input required.".bright_black().to_string())
        );
        println!();

        let answer = ctx
            .prompt
            .text(&format!("{}", "xtl@safemode:~#".red()), "", None)
            .await?;

        let Answer::Value(input) = answer else {
            // Cancellation does not leave the locked screen.
            continue;
        };

        match input.trim().to_lowercase().as_str() {
            "reinstall" => return Ok(ScreenState::Installer),
            "switch" | "distro" => return Ok(ScreenState::RecoveryAdvanced),
            _ => continue,
        }
    }
}
