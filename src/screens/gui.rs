//! GUI screen - desktop environment manager for the Arch guest
//!
//! Install and start flows both run the boot checklist first; a failed
//! preflight escalates to the kernel-panic screen with its stop code.

use once_cell::sync::Lazy;
use regex::Regex;

use colored::Colorize;

use crate::ascii;
use crate::context::Ctx;
use crate::error::XtlError;
use crate::guest::{self, DesktopEnv, DisplayMethod, ARCH_ALIAS};
use crate::proc::StdioPolicy;
use crate::prompt::{Answer, SelectItem};
use crate::router::ScreenState;
use crate::term::{self, center_block, clear_screen, log_error, log_info, log_warn, note, Spinner};
use crate::theme;
use crate::verify::{BootCheckResult, VerifyOptions};

pub async fn show(ctx: &mut Ctx) -> Result<ScreenState, XtlError> {
    let installed = ctx.probe.is_distro_installed(ARCH_ALIAS).await;
    let settings = ctx.settings.load();
    let th = theme::get(&settings.theme);
    let logo = ascii::colorize(ascii::logo_for(&settings.logo), th.logo);

    if !installed {
        clear_screen();
        println!("{}", center_block(&logo));
        log_error("Arch Linux is not installed. Please install it first from the Main Menu.");
        term::pause_ms(2000).await;
        return Ok(ScreenState::MainMenu);
    }

    loop {
        clear_screen();
        println!("{}", center_block(&logo));

        let items = [
            SelectItem::new("START", "Start Desktop").hint("Launch installed GUI"),
            SelectItem::new("INSTALL", "Install/Reinstall GUI").hint("Setup XFCE or i3wm"),
            SelectItem::new("BACK", "Back to Main Menu"),
        ];
        let choice = ctx
            .prompt
            .select(&th.primary("Desktop Environment Manager:").to_string(), &items)
            .await?;

        let Answer::Value(choice) = choice else {
            return Ok(ScreenState::MainMenu);
        };
        if choice == "BACK" {
            return Ok(ScreenState::MainMenu);
        }

        if cfg!(not(unix)) {
            note("GUI is not available on this platform.", "GUI");
            term::pause_ms(1200).await;
            continue;
        }

        // Preflight before touching the guest.
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

        match choice.as_str() {
            "INSTALL" => {
                let Some(de) = select_de(ctx, "Select Desktop Environment:").await? else {
                    continue;
                };
                let Some(display) = select_display(ctx).await? else {
                    continue;
                };
                install_gui(ctx, de, display).await?;
                term::pause_ms(2000).await;
            }
            "START" => {
                let Some(de) = select_de(ctx, "Select DE to start:").await? else {
                    continue;
                };
                let Some(display) = select_display(ctx).await? else {
                    continue;
                };
                let Some(username) = ensure_user(ctx).await? else {
                    continue;
                };
                start_gui(ctx, de, display, &username).await?;
            }
            _ => {}
        }
    }
}

async fn select_de(ctx: &mut Ctx, message: &str) -> Result<Option<DesktopEnv>, XtlError> {
    let items = [
        SelectItem::new("XFCE", "XFCE4").hint("Classic & Stable"),
        SelectItem::new("I3", "i3wm").hint("Lightweight Tiling"),
    ];
    Ok(match ctx.prompt.select(message, &items).await? {
        Answer::Value(v) if v == "XFCE" => Some(DesktopEnv::Xfce),
        Answer::Value(_) => Some(DesktopEnv::I3),
        Answer::Cancelled => None,
    })
}

async fn select_display(ctx: &mut Ctx) -> Result<Option<DisplayMethod>, XtlError> {
    let items = [
        SelectItem::new("VNC", "VNC Server").hint("Compatible with all devices"),
        SelectItem::new("X11", "Termux-X11").hint("Faster, needs Termux-X11 app"),
    ];
    Ok(
        match ctx.prompt.select("Select Display Method:", &items).await? {
            Answer::Value(v) if v == "VNC" => Some(DisplayMethod::Vnc),
            Answer::Value(_) => Some(DisplayMethod::X11),
            Answer::Cancelled => None,
        },
    )
}

fn validate_username(value: &str) -> Option<String> {
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_-]*$").expect("username pattern is valid"));
    if value.is_empty() {
        Some("Username cannot be empty".to_string())
    } else if !RE.is_match(value) {
        Some("Invalid username format".to_string())
    } else {
        None
    }
}

/// Make sure the configured guest user exists, prompting for a name when no
/// username is persisted yet. Returns `None` on cancellation or failure.
async fn ensure_user(ctx: &mut Ctx) -> Result<Option<String>, XtlError> {
    let mut settings = ctx.settings.load();
    let mut spinner = Spinner::new();

    if let Some(name) = settings.username.clone() {
        spinner.start(&format!("Verifying user {}...", name));
        let code = ctx
            .runner
            .run(&guest::exec_bash(ARCH_ALIAS, &guest::user_setup_script(&name)))
            .await;
        if code == 0 {
            spinner.stop(&format!("User {} ready.", name));
            return Ok(Some(name));
        }
        spinner.stop(
            &format!("Failed to prepare user \"{}\" inside Arch", name)
                .red()
                .to_string(),
        );
        term::pause_ms(1200).await;
        return Ok(None);
    }

    let answer = ctx
        .prompt
        .text(
            "Enter username for GUI login:",
            "e.g. xtluser",
            Some(validate_username),
        )
        .await?;
    let Answer::Value(name) = answer else {
        return Ok(None);
    };

    spinner.start(&format!("Creating user {}...", name));
    let code = ctx
        .runner
        .run(&guest::exec_bash(ARCH_ALIAS, &guest::user_setup_script(&name)))
        .await;
    if code != 0 {
        spinner.stop(&format!("Failed to create user \"{}\"", name).red().to_string());
        term::pause_ms(1200).await;
        return Ok(None);
    }

    settings.username = Some(name.clone());
    ctx.settings.save(settings)?;

    spinner.stop(&format!("User {} created (Password: 1234).", name));
    term::pause_ms(1000).await;
    Ok(Some(name))
}

async fn install_gui(
    ctx: &mut Ctx,
    de: DesktopEnv,
    display: DisplayMethod,
) -> Result<(), XtlError> {
    let mut spinner = Spinner::new();
    spinner.start(&format!(
        "Installing {} ({})...",
        de.label(),
        display.label()
    ));

    let packages = guest::gui_packages(de, display);
    let code = ctx
        .runner
        .run(
            &guest::exec_bash(ARCH_ALIAS, &guest::pacman_install(&packages))
                .stdio(StdioPolicy::Inherit),
        )
        .await;

    if code != 0 {
        spinner.stop(&"Pacman failed while installing GUI packages".red().to_string());
        term::pause_ms(1200).await;
        return Ok(());
    }

    spinner.stop(&format!("{} installation complete!", de.label()));
    Ok(())
}

async fn start_gui(
    ctx: &mut Ctx,
    de: DesktopEnv,
    display: DisplayMethod,
    username: &str,
) -> Result<(), XtlError> {
    clear_screen();
    log_info(
        &format!("Starting {} via {}...", de.label(), display.label())
            .green()
            .to_string(),
    );

    match display {
        DisplayMethod::Vnc => start_vnc(ctx, de, username).await?,
        DisplayMethod::X11 => start_x11(ctx, de, username).await?,
    }
    Ok(())
}

async fn start_vnc(ctx: &mut Ctx, _de: DesktopEnv, username: &str) -> Result<(), XtlError> {
    log_info("VNC Server will start on :1 (Port 5901)");

    let available = ctx
        .runner
        .run(&guest::exec_bash(
            ARCH_ALIAS,
            &guest::as_guest_user(username, "command -v vncserver >/dev/null 2>&1"),
        ))
        .await
        == 0;
    if !available {
        log_error("vncserver not found. Install GUI with VNC first.");
        term::pause_ms(1500).await;
        return Ok(());
    }

    // Stale session from a previous run is fine to ignore.
    ctx.runner
        .run(&guest::exec_bash(
            ARCH_ALIAS,
            &guest::as_guest_user(username, "vncserver -kill :1 >/dev/null 2>&1 || true"),
        ))
        .await;

    let code = ctx
        .runner
        .run(
            &guest::exec_bash(
                ARCH_ALIAS,
                &guest::as_guest_user(username, "vncserver :1 -geometry 1280x720 -depth 24"),
            )
            .stdio(StdioPolicy::Inherit),
        )
        .await;
    if code != 0 {
        log_error("Failed to start VNC server");
        term::pause_ms(1500).await;
        return Ok(());
    }

    note("VNC Server is running. Connect using any VNC Viewer.", "VNC Status");
    let _ = ctx
        .prompt
        .text("Press Enter to stop VNC server and return...", "", None)
        .await?;

    ctx.runner
        .run(&guest::exec_bash(
            ARCH_ALIAS,
            &guest::as_guest_user(username, "vncserver -kill :1 >/dev/null 2>&1 || true"),
        ))
        .await;
    Ok(())
}

fn validate_display(value: &str) -> Option<String> {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:[0-9]+$").expect("display pattern is valid"));
    if value.is_empty() {
        Some("DISPLAY cannot be empty".to_string())
    } else if !RE.is_match(value) {
        Some("Invalid DISPLAY format (example: :0)".to_string())
    } else {
        None
    }
}

async fn start_x11(ctx: &mut Ctx, de: DesktopEnv, username: &str) -> Result<(), XtlError> {
    log_warn("Make sure Termux-X11 app is running and X11 server is started in Termux.");

    let answer = ctx
        .prompt
        .text("Enter DISPLAY value:", ":0", Some(validate_display))
        .await?;
    let Answer::Value(display_value) = answer else {
        return Ok(());
    };

    let session = format!(
        "env DISPLAY={} {}",
        display_value,
        de.session_command()
    );
    let code = ctx
        .runner
        .run(
            &guest::exec_bash(ARCH_ALIAS, &guest::as_guest_user(username, &session))
                .stdio(StdioPolicy::Inherit),
        )
        .await;
    if code != 0 {
        log_error("Failed to start desktop via Termux-X11");
        term::pause_ms(1500).await;
    }
    Ok(())
}
