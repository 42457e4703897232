//! Advanced recovery (XTL) - power tools
//!
//! Multi-distro management, storage permission, bind-mounted sessions and
//! DNS repair. The storage trigger is the one fire-and-forget subprocess in
//! the application, expressed through the two-phase trigger/assume API.

use std::time::Duration;

use colored::Colorize;

use crate::context::Ctx;
use crate::error::XtlError;
use crate::guest::{self, ARCH_ALIAS};
use crate::proc::Exec;
use crate::prompt::{Answer, SelectItem};
use crate::router::ScreenState;
use crate::term::{self, center_block, center_text, clear_screen, log_info, note, Spinner};

const STORAGE_TRIGGER_WAIT: Duration = Duration::from_secs(3);

const HEADER: &str = r"
  __  __ _____ __
  \ \/ /|_   _|  |
   >  <   | | |  |__
  /_/\_\  |_| |_____|
";

const DISTROS: &[(&str, &str)] = &[
    ("ubuntu", "Ubuntu LTS"),
    ("debian", "Debian Stable"),
    ("kali", "Kali Linux"),
    ("alpine", "Alpine Linux"),
    ("fedora", "Fedora Workstation"),
];

pub async fn show(ctx: &mut Ctx) -> Result<ScreenState, XtlError> {
    clear_screen();
    println!("{}", center_block(&HEADER.magenta().bold().to_string()));
    println!(
        "{}",
        center_text(&" ADVANCED POWER TOOLS ".on_magenta().black().bold().to_string())
    );
    println!();

    loop {
        let items = [
            SelectItem::new("MULTI_DISTRO", "distro-manager").hint("Install Ubuntu, Kali, etc."),
            SelectItem::new("SETUP_STORAGE", "grant-storage")
                .hint("Request Android Storage Permission"),
            SelectItem::new("MOUNT_SESSION", "mount-session")
                .hint("Login with internal storage access"),
            SelectItem::new("WIFI_FIX", "net-fix").hint("Reset DNS configuration"),
            SelectItem::new("EXIT", format!("{}", "back".bright_black()))
                .hint("Return to Main Menu"),
        ];

        let choice = ctx
            .prompt
            .select(&"Available Tools:".magenta().to_string(), &items)
            .await?;
        let Answer::Value(choice) = choice else {
            return Ok(ScreenState::MainMenu);
        };

        match choice.as_str() {
            "MULTI_DISTRO" => distro_manager(ctx).await?,
            "SETUP_STORAGE" => grant_storage(ctx).await,
            "MOUNT_SESSION" => mount_session(ctx).await,
            "WIFI_FIX" => net_fix(ctx).await,
            _ => return Ok(ScreenState::MainMenu),
        }
    }
}

async fn distro_manager(ctx: &mut Ctx) -> Result<(), XtlError> {
    let mut options: Vec<SelectItem> = DISTROS
        .iter()
        .map(|(alias, label)| SelectItem::new(*alias, *label))
        .collect();
    options.push(SelectItem::new("BACK", format!("{}", "back".bright_black())));

    let choice = ctx.prompt.select("Select Distribution:", &options).await?;
    let Answer::Value(alias) = choice else {
        return Ok(());
    };
    if alias == "BACK" {
        return Ok(());
    }

    if ctx.probe.is_distro_installed(&alias).await {
        let actions = [
            SelectItem::new("LOGIN", "Login"),
            SelectItem::new("REMOVE", "Remove"),
        ];
        let action = ctx
            .prompt
            .select(&format!("{} detected. Action?", alias), &actions)
            .await?;
        match action {
            Answer::Value(a) if a == "LOGIN" => {
                clear_screen();
                log_info(
                    &format!("Booting into {}... (Type 'exit' to return)", alias)
                        .green()
                        .to_string(),
                );
                term::pause_ms(1000).await;
                ctx.runner.run(&guest::login(&alias)).await;
            }
            Answer::Value(a) if a == "REMOVE" => {
                let mut spinner = Spinner::new();
                spinner.start(&format!("Removing {}...", alias));
                ctx.runner.run(&guest::remove(&alias)).await;
                spinner.stop(&format!("{} removed.", alias));
            }
            _ => {}
        }
    } else {
        let confirm = ctx.prompt.confirm(&format!("Install {}?", alias)).await?;
        if confirm == Answer::Value(true) {
            let mut spinner = Spinner::new();
            spinner.start(&format!("Installing {}...", alias));
            let code = ctx.runner.run(&guest::install(&alias)).await;
            if code == 0 {
                spinner.stop(&format!("{} Installed!", alias));
            } else {
                spinner.stop(&"Installation failed.".red().to_string());
            }
        }
    }
    Ok(())
}

async fn grant_storage(ctx: &mut Ctx) {
    let mut spinner = Spinner::new();
    spinner.start("Requesting Android Storage Permissions...");
    // The permission popup never reports back; trigger and assume.
    ctx.runner.trigger(&Exec::new("termux-setup-storage"));
    ctx.runner.assume_complete_after(STORAGE_TRIGGER_WAIT).await;
    spinner.stop("Permission prompt triggered.");
    note("Please \"Allow\" storage access if prompted.", "Android Permission");
}

async fn mount_session(ctx: &mut Ctx) {
    clear_screen();
    // The raw path is more reliable than the /sdcard symlink.
    let android_storage = "/storage/emulated/0";
    log_info(
        &format!("Mounting {} -> /sdcard inside Arch...", android_storage)
            .yellow()
            .to_string(),
    );
    term::pause_ms(1000).await;
    ctx.runner
        .run(&guest::login_bind(ARCH_ALIAS, android_storage, "/sdcard"))
        .await;
}

async fn net_fix(ctx: &mut Ctx) {
    let mut spinner = Spinner::new();
    spinner.start("Fixing DNS...");
    ctx.runner
        .run(&guest::exec_bash(ARCH_ALIAS, guest::dns_fix_script()))
        .await;
    term::pause_ms(1000).await;
    spinner.stop("DNS reset to Google DNS (8.8.8.8).");
}
