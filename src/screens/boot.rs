//! Boot screen - startup banner, update check, installation probe
//!
//! Routes to the main menu when the Arch guest is installed, or to the
//! playground (pre-install shell) when it is not.

use std::time::Duration;

use colored::{Color, Colorize};

use crate::ascii;
use crate::context::Ctx;
use crate::error::XtlError;
use crate::guest::{self, ARCH_ALIAS};
use crate::proc::Exec;
use crate::router::ScreenState;
use crate::term::{self, center_block, center_text, clear_screen, note, Spinner};
use crate::theme;

const GIT_FETCH_TIMEOUT: Duration = Duration::from_secs(4);
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_millis(3500);

pub async fn show(ctx: &mut Ctx) -> Result<ScreenState, XtlError> {
    let settings = ctx.settings.load();
    let th = theme::get(&settings.theme);

    clear_screen();
    println!(
        "{}",
        center_block(&ascii::colorize(ascii::logo_for(&settings.logo), th.logo))
    );

    let header = term::boxed(
        &[
            format!(
                "{} {}",
                "XTL".bright_cyan().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
            ),
            "Arch guest manager for Termux".bright_black().to_string(),
            String::new(),
            format!(
                "{}{}",
                "Project: ".blue(),
                "https://github.com/xtl-project/xtl".blue().underline()
            ),
        ],
        Color::Cyan,
    );
    println!("{}", center_block(&header));

    println!(
        "{}",
        center_text(&th.primary(" INITIALIZING XTL ").reversed().to_string())
    );

    let mut spinner = Spinner::new();
    spinner.start(&center_text("Checking system status..."));

    let update_available = check_for_update(ctx, &mut spinner).await;
    term::pause_ms(1000).await;

    spinner.message(&center_text("Checking Arch Linux installation..."));
    let installed = ctx.probe.is_distro_installed(ARCH_ALIAS).await;

    if update_available {
        spinner.stop(&center_text(&"New Update Available!".yellow().to_string()));
        note(
            &format!(
                "{}\n{}",
                "Update detected".yellow().bold(),
                "Open: Recovery Mode -> bootloader-update"
            ),
            &"SYSTEM NOTIFICATION".yellow().to_string(),
        );
        term::pause_ms(2000).await;
    } else if installed {
        spinner.stop(&center_text(&"System Ready.".green().to_string()));
    } else {
        spinner.stop(&center_text(
            &"Not installed. Entering setup...".yellow().to_string(),
        ));
    }

    if installed {
        spinner.start(&center_text("Health check: WM & Terminal..."));
        let results = health_checks(ctx).await;
        spinner.stop(&center_text("Health check complete."));
        if !results.is_empty() {
            let lines: Vec<String> = results
                .iter()
                .map(|(label, ok)| {
                    format!(
                        "{} {} {}",
                        if *ok {
                            "OK".green().to_string()
                        } else {
                            "MISSING".yellow().to_string()
                        },
                        "•".bright_black(),
                        label
                    )
                })
                .collect();
            note(&lines.join("\n"), &"HEALTH CHECK".cyan().to_string());
            term::pause_ms(800).await;
        }
    }

    term::pause_ms(1000).await;
    Ok(if installed {
        ScreenState::MainMenu
    } else {
        ScreenState::Playground
    })
}

/// Silent update check: fetch with a hard timeout, then scan `git status`
/// for the behind-remote marker. Any failure just means "no update".
async fn check_for_update(ctx: &mut Ctx, spinner: &mut Spinner) -> bool {
    if which::which("git").is_err() {
        return false;
    }
    spinner.message(&center_text("Checking for updates..."));

    let fetched = ctx
        .runner
        .run(
            &Exec::new("git")
                .args(["fetch", "origin"])
                .timeout(GIT_FETCH_TIMEOUT),
        )
        .await
        == 0;
    if !fetched {
        return false;
    }

    let status = ctx
        .runner
        .output(&Exec::new("git").args(["status", "-uno"]))
        .await;
    status.stdout.contains("behind")
}

/// Probe the guest for the window-manager and terminal tooling the GUI
/// screens rely on. Purely informational.
async fn health_checks(ctx: &mut Ctx) -> Vec<(&'static str, bool)> {
    let checks = [
        ("WM Terminal (tmux)", "command -v tmux >/dev/null 2>&1"),
        ("XFCE4", "command -v startxfce4 >/dev/null 2>&1"),
        ("i3wm", "command -v i3 >/dev/null 2>&1"),
        ("VNC Server", "command -v vncserver >/dev/null 2>&1"),
    ];

    let mut results = Vec::with_capacity(checks.len());
    for (label, cmd) in checks {
        let code = ctx
            .runner
            .run(&guest::exec_sh(ARCH_ALIAS, cmd).timeout(HEALTH_CHECK_TIMEOUT))
            .await;
        results.push((label, code == 0));
    }
    results
}
