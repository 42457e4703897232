//! Basic recovery - maintenance menu
//!
//! Bootloader update (git-based, with auto-repair of a missing `.git`),
//! runtime optimizer, shell repair, soft reset and factory reset. Update
//! failures are reported inline; the screen never takes the process down.

use std::path::Path;

use colored::Colorize;

use crate::context::Ctx;
use crate::error::XtlError;
use crate::guest::{self, ARCH_ALIAS};
use crate::proc::{CmdOutput, Exec};
use crate::prompt::{Answer, SelectItem};
use crate::router::ScreenState;
use crate::term::{self, center_block, center_text, clear_screen, log_error, log_warn, note, Spinner};

const REPO_URL: &str = "https://github.com/xtl-project/xtl.git";

const HEADER: &str = r"
   ___  ___  ___  ___  _  _  ___  ___  _  _
  | _ \| __|/ __|/ _ \| || || __|| _ \| || |
  |   /| _| | (__| (_) | \/ || _| |   / \  /
  |_|_\|___|\___|\___/ \__/ |___||_|_\  |_|
";

pub async fn show(ctx: &mut Ctx) -> Result<ScreenState, XtlError> {
    clear_screen();
    println!("{}", center_block(&HEADER.red().bold().to_string()));
    println!(
        "{}",
        center_text(&" SYSTEM MAINTENANCE MODE ".on_red().white().bold().to_string())
    );
    println!();

    let items = [
        SelectItem::new("UPDATE", format!("{}", "bootloader-update".green()))
            .hint("Stable, Beta, or Downgrade"),
        SelectItem::new("OPTIMIZE", format!("{}", "optimizer".cyan()))
            .hint("Speed up UI & clean caches"),
        SelectItem::new("FIX_SHELL", format!("{}", "repair-shell".cyan()))
            .hint("Restore default Bash/Zsh configs"),
        SelectItem::new("SOFT_RESET", format!("{}", "soft-reset".cyan()))
            .hint("Clear XTL specific configs"),
        SelectItem::new("WIPE", format!("{}", "factory-reset".red()))
            .hint("Uninstall Arch Linux completely"),
        SelectItem::new("EXIT", format!("{}", "back".bright_black()))
            .hint("Return to Main Menu"),
    ];

    let choice = ctx
        .prompt
        .select(&"Select Operation:".white().to_string(), &items)
        .await?;
    let Answer::Value(choice) = choice else {
        return Ok(ScreenState::MainMenu);
    };

    match choice.as_str() {
        "UPDATE" => {
            if update_system(ctx).await? {
                // Restart to apply the new version, through the normal
                // shutdown sequence.
                return Ok(ScreenState::Exit);
            }
        }
        "OPTIMIZE" => optimize_runtime(ctx).await?,
        "FIX_SHELL" => fix_shell(ctx).await,
        "SOFT_RESET" => soft_reset(ctx).await,
        "WIPE" => {
            log_warn(&"CRITICAL WARNING".red().bold().to_string());
            let confirm = ctx
                .prompt
                .confirm("This action cannot be undone. Uninstall Arch Linux?")
                .await?;
            if confirm == Answer::Value(true) {
                wipe_data(ctx).await;
                return Ok(ScreenState::Boot);
            }
        }
        _ => return Ok(ScreenState::MainMenu),
    }

    term::pause_ms(1500).await;
    Ok(ScreenState::MainMenu)
}

async fn git(ctx: &mut Ctx, args: &[&str]) -> CmdOutput {
    ctx.runner
        .output(&Exec::new("git").args(args.iter().copied()))
        .await
}

/// Returns true when the working copy was switched and a restart is due.
async fn update_system(ctx: &mut Ctx) -> Result<bool, XtlError> {
    let mut spinner = Spinner::new();
    spinner.start("Connecting to repository...");

    if which::which("git").is_err() {
        spinner.stop(&"Initialization Failed".red().to_string());
        log_error("Git not installed.");
        return Ok(false);
    }

    // Auto-repair: a missing .git gets re-initialized from the remote.
    if !Path::new(".git").is_dir() {
        spinner.message(&"Missing .git detected. Repairing...".yellow().to_string());
        term::pause_ms(1000).await;

        git(ctx, &["init"]).await;
        git(ctx, &["remote", "add", "origin", REPO_URL]).await;

        spinner.message("Fetching latest firmware...");
        if !git(ctx, &["fetch", "origin"]).await.success() {
            spinner.stop(&"Repair failed: Cannot reach GitHub.".red().to_string());
            return Ok(false);
        }

        git(ctx, &["reset", "--hard", "origin/main"]).await;
        spinner.stop(&"Repository Repaired & Updated!".green().to_string());
        note("System restored to latest version.", "Update Complete");
        term::pause_ms(2000).await;
        return Ok(true);
    }

    spinner.stop("Connection established.");
    show_update_menu(ctx).await
}

async fn show_update_menu(ctx: &mut Ctx) -> Result<bool, XtlError> {
    let items = [
        SelectItem::new("STABLE", "Stable Release").hint("Recommended (main branch)"),
        SelectItem::new("BETA", "Beta Version").hint("Experimental features (beta branch)"),
        SelectItem::new("DOWNGRADE", "Downgrade / Specific Version")
            .hint("Switch to a previous tag"),
        SelectItem::new("BACK", format!("{}", "Back".bright_black())),
    ];
    let choice = ctx.prompt.select("Select Update Channel:", &items).await?;
    let Answer::Value(choice) = choice else {
        return Ok(false);
    };

    match choice.as_str() {
        "STABLE" => perform_update(ctx, "main", false).await,
        "BETA" => perform_update(ctx, "beta", false).await,
        "DOWNGRADE" => downgrade_menu(ctx).await,
        _ => Ok(false),
    }
}

async fn downgrade_menu(ctx: &mut Ctx) -> Result<bool, XtlError> {
    let mut spinner = Spinner::new();
    spinner.start("Fetching available versions...");
    git(ctx, &["fetch", "origin", "--tags"]).await;
    let tags_output = git(ctx, &["tag", "-l", "--sort=-v:refname"]).await;
    let tags: Vec<String> = tags_output
        .stdout
        .lines()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    spinner.stop("Versions fetched.");

    if tags.is_empty() {
        log_warn("No version tags found in repository. Using recent commits instead.");
        let logs = git(ctx, &["log", "-n", "10", "--oneline"]).await;
        let mut options: Vec<SelectItem> = logs
            .stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|line| {
                let (hash, msg) = line.split_once(' ').unwrap_or((line, ""));
                SelectItem::new(hash, hash).hint(msg)
            })
            .collect();
        options.push(SelectItem::new("BACK", "Back"));

        let choice = ctx
            .prompt
            .select("Select commit to roll back to:", &options)
            .await?;
        if let Answer::Value(hash) = choice {
            if hash != "BACK" {
                return perform_update(ctx, &hash, true).await;
            }
        }
        return Ok(false);
    }

    let mut options: Vec<SelectItem> = tags.iter().map(|t| SelectItem::new(t, t)).collect();
    options.push(SelectItem::new("BACK", "Back"));

    let choice = ctx.prompt.select("Select version tag:", &options).await?;
    if let Answer::Value(tag) = choice {
        if tag != "BACK" {
            return perform_update(ctx, &tag, true).await;
        }
    }
    Ok(false)
}

async fn perform_update(ctx: &mut Ctx, refname: &str, is_tag: bool) -> Result<bool, XtlError> {
    let mut spinner = Spinner::new();
    spinner.start(&format!("Switching to {}...", refname));

    if !git(ctx, &["fetch", "origin", "--tags"]).await.success() {
        spinner.stop(&"Update Failed".red().to_string());
        log_error("Failed to reach GitHub.");
        return Ok(false);
    }

    let switched = if is_tag {
        git(ctx, &["checkout", "-f", refname]).await.success()
    } else {
        let branch_spec = format!("origin/{}", refname);
        let ok = git(ctx, &["checkout", "-B", refname, &branch_spec])
            .await
            .success();
        if ok {
            git(ctx, &["reset", "--hard", &branch_spec]).await;
        }
        ok
    };

    if !switched {
        spinner.stop(&"Update Failed".red().to_string());
        log_error(&format!("Could not switch to {}", refname));
        return Ok(false);
    }

    spinner.stop(&format!("System updated to {}!", refname).green().to_string());
    note("System will now restart to apply changes.", "Update Complete");
    term::pause_ms(2000).await;
    Ok(true)
}

async fn optimize_runtime(ctx: &mut Ctx) -> Result<(), XtlError> {
    let mut settings = ctx.settings.load();

    let items = [
        SelectItem::new("ON", "ON (faster UI)"),
        SelectItem::new("OFF", "OFF (normal delays)"),
        SelectItem::new("SKIP", format!("{}", "Skip".bright_black())),
    ];
    let choice = ctx
        .prompt
        .select(
            &format!(
                "Lite Mode is currently: {}. Set to:",
                if settings.lite_mode { "ON" } else { "OFF" }
            ),
            &items,
        )
        .await?;

    if let Answer::Value(choice) = choice {
        if choice != "SKIP" {
            settings.lite_mode = choice == "ON";
            ctx.settings.save(settings.clone())?;
            note(
                &format!(
                    "Lite Mode set to: {}",
                    if settings.lite_mode { "ON" } else { "OFF" }
                ),
                "Optimizer",
            );
        }
    }

    if ctx.probe.is_distro_installed(ARCH_ALIAS).await {
        let confirm = ctx
            .prompt
            .confirm("Clean Arch pacman cache to free storage?")
            .await?;
        if confirm == Answer::Value(true) {
            let mut spinner = Spinner::new();
            spinner.start("Cleaning Arch pacman cache...");
            let code = ctx
                .runner
                .run(&guest::exec_bash(ARCH_ALIAS, guest::pacman_cache_clean()))
                .await;
            if code == 0 {
                spinner.stop(&"Pacman cache cleaned.".green().to_string());
            } else {
                spinner.stop(&"Pacman cache cleanup skipped/failed.".yellow().to_string());
            }
        }
    }
    Ok(())
}

async fn fix_shell(ctx: &mut Ctx) {
    let mut spinner = Spinner::new();
    spinner.start("Repairing Shell Environment...");
    let code = ctx
        .runner
        .run(&guest::exec_bash(ARCH_ALIAS, guest::shell_repair_script()))
        .await;
    if code == 0 {
        spinner.stop("Shell reset to BASH default.");
    } else {
        spinner.stop(&"Failed to repair shell.".red().to_string());
    }
}

async fn soft_reset(ctx: &mut Ctx) {
    let mut spinner = Spinner::new();
    spinner.start("Performing Soft Reset...");
    let code = ctx
        .runner
        .run(&guest::exec_bash(ARCH_ALIAS, guest::soft_reset_script()))
        .await;
    if code == 0 {
        spinner.stop("Soft Reset Complete. Configs cleaned.");
    } else {
        spinner.stop(&"Soft Reset Failed.".red().to_string());
    }
}

async fn wipe_data(ctx: &mut Ctx) {
    let mut spinner = Spinner::new();
    spinner.start("Wiping Arch Linux Data...");
    ctx.runner.run(&guest::remove(ARCH_ALIAS)).await;
    spinner.stop(&"System Wiped Successfully.".green().to_string());
}
