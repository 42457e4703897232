//! Screen flows driven end-to-end through the scripted prompt service
//!
//! Each test builds a context around a temp settings file and a scripted
//! prompt, runs one handler, and asserts on the returned state.

use tempfile::TempDir;

use xtl::prompt::{ScriptedAnswer, ScriptedPrompt};
use xtl::router::{recovery_menu, ScreenState};
use xtl::screens;
use xtl::settings::SettingsStore;
use xtl::Ctx;

fn ctx_with(answers: Vec<ScriptedAnswer>) -> (TempDir, Ctx) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    // Lite mode keeps the scripted runs fast; loading exports it to the env.
    std::fs::write(&path, r#"{"liteMode":true}"#).unwrap();
    let store = SettingsStore::with_path(path);
    let ctx = Ctx::new(store, Box::new(ScriptedPrompt::new(answers)));
    (dir, ctx)
}

// ─────────────────────────────────────────────────────────────────────────────
// Main menu
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn main_menu_shutdown_exits() {
    let (_dir, mut ctx) = ctx_with(vec![ScriptedAnswer::select("EXIT")]);
    let next = screens::menu::show(&mut ctx).await.unwrap();
    assert_eq!(next, ScreenState::Exit);
}

#[tokio::test]
async fn main_menu_cancel_exits() {
    let (_dir, mut ctx) = ctx_with(vec![ScriptedAnswer::Cancel]);
    let next = screens::menu::show(&mut ctx).await.unwrap();
    assert_eq!(next, ScreenState::Exit);
}

#[tokio::test]
async fn main_menu_routes_each_action() {
    for (value, expected) in [
        ("SHELL", ScreenState::Shell),
        ("GUI", ScreenState::Gui),
        ("CUSTOM", ScreenState::Custom),
        ("RECOVERY", ScreenState::RecoveryMenu),
    ] {
        let (_dir, mut ctx) = ctx_with(vec![ScriptedAnswer::select(value)]);
        let next = screens::menu::show(&mut ctx).await.unwrap();
        assert_eq!(next, expected);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Playground and installer
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn playground_exit_command_exits() {
    let (_dir, mut ctx) = ctx_with(vec![ScriptedAnswer::text("exit")]);
    let next = screens::playground::show(&mut ctx).await.unwrap();
    assert_eq!(next, ScreenState::Exit);
}

#[tokio::test]
async fn playground_cancel_exits() {
    let (_dir, mut ctx) = ctx_with(vec![ScriptedAnswer::Cancel]);
    let next = screens::playground::show(&mut ctx).await.unwrap();
    assert_eq!(next, ScreenState::Exit);
}

#[tokio::test]
async fn playground_install_needs_confirmation() {
    let (_dir, mut ctx) = ctx_with(vec![
        ScriptedAnswer::text("install"),
        ScriptedAnswer::Confirm(false),
        ScriptedAnswer::text("exit"),
    ]);
    let next = screens::playground::show(&mut ctx).await.unwrap();
    assert_eq!(next, ScreenState::Exit);

    let (_dir, mut ctx) = ctx_with(vec![
        ScriptedAnswer::text("install"),
        ScriptedAnswer::Confirm(true),
    ]);
    let next = screens::playground::show(&mut ctx).await.unwrap();
    assert_eq!(next, ScreenState::Installer);
}

#[tokio::test]
async fn playground_panic_command_raises_kernel_panic() {
    let (_dir, mut ctx) = ctx_with(vec![ScriptedAnswer::text("panic")]);
    let next = screens::playground::show(&mut ctx).await.unwrap();
    assert_eq!(
        next,
        ScreenState::KernelPanic {
            stop_code: "CRITICAL_PROCESS_DIED".to_string()
        }
    );
}

#[tokio::test]
async fn playground_unknown_command_reprompts() {
    let (_dir, mut ctx) = ctx_with(vec![
        ScriptedAnswer::text("frobnicate"),
        ScriptedAnswer::text("help"),
        ScriptedAnswer::text("exit"),
    ]);
    let next = screens::playground::show(&mut ctx).await.unwrap();
    assert_eq!(next, ScreenState::Exit);
}

#[tokio::test]
async fn installer_returns_to_playground() {
    let (_dir, mut ctx) = ctx_with(vec![]);
    let next = screens::installer::show(&mut ctx).await.unwrap();
    assert_eq!(next, ScreenState::Playground);
}

// ─────────────────────────────────────────────────────────────────────────────
// Personalization
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn theme_change_persists_and_returns_to_menu() {
    let (dir, mut ctx) = ctx_with(vec![
        ScriptedAnswer::select("THEME"),
        ScriptedAnswer::select("Matrix"),
        ScriptedAnswer::select("BACK"),
    ]);
    let next = screens::custom::show(&mut ctx).await.unwrap();
    assert_eq!(next, ScreenState::MainMenu);

    let mut reread = SettingsStore::with_path(dir.path().join("settings.json"));
    assert_eq!(reread.load().theme, "Matrix");
}

#[tokio::test]
async fn logo_change_persists() {
    let (dir, mut ctx) = ctx_with(vec![
        ScriptedAnswer::select("LOGO"),
        ScriptedAnswer::select("Linux"),
        ScriptedAnswer::Cancel,
    ]);
    let next = screens::custom::show(&mut ctx).await.unwrap();
    assert_eq!(next, ScreenState::MainMenu);

    let mut reread = SettingsStore::with_path(dir.path().join("settings.json"));
    assert_eq!(reread.load().logo, "Linux");
}

#[tokio::test]
async fn cancelled_theme_pick_saves_nothing() {
    let (dir, mut ctx) = ctx_with(vec![
        ScriptedAnswer::select("THEME"),
        ScriptedAnswer::Cancel,
        ScriptedAnswer::select("BACK"),
    ]);
    let next = screens::custom::show(&mut ctx).await.unwrap();
    assert_eq!(next, ScreenState::MainMenu);

    // The seeded file was never rewritten with a theme.
    let mut reread = SettingsStore::with_path(dir.path().join("settings.json"));
    assert_eq!(reread.load().theme, "Classic Arch");
}

// ─────────────────────────────────────────────────────────────────────────────
// Panic screens
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn kernel_panic_reboots_to_boot() {
    let (_dir, mut ctx) = ctx_with(vec![]);
    let next = screens::panic::kernel_panic(&mut ctx, "CRITICAL_PROCESS_DIED")
        .await
        .unwrap();
    assert_eq!(next, ScreenState::Boot);
}

#[tokio::test]
async fn kernel_corrupt_routes_reinstall_to_installer() {
    let (_dir, mut ctx) = ctx_with(vec![ScriptedAnswer::text("REINSTALL")]);
    let next = screens::panic::kernel_corrupt(&mut ctx, "ROOTFS_INSTALL_FAILED")
        .await
        .unwrap();
    assert_eq!(next, ScreenState::Installer);
}

#[tokio::test]
async fn kernel_corrupt_routes_switch_to_advanced_recovery() {
    for cmd in ["switch", "distro"] {
        let (_dir, mut ctx) = ctx_with(vec![ScriptedAnswer::text(cmd)]);
        let next = screens::panic::kernel_corrupt(&mut ctx, "ROOTFS_INSTALL_FAILED")
            .await
            .unwrap();
        assert_eq!(next, ScreenState::RecoveryAdvanced);
    }
}

#[tokio::test]
async fn kernel_corrupt_ignores_unknown_maintenance_input() {
    let (_dir, mut ctx) = ctx_with(vec![
        ScriptedAnswer::text("ls"),
        ScriptedAnswer::Cancel,
        ScriptedAnswer::text("reinstall"),
    ]);
    let next = screens::panic::kernel_corrupt(&mut ctx, "ROOTFS_INSTALL_FAILED")
        .await
        .unwrap();
    assert_eq!(next, ScreenState::Installer);
}

// ─────────────────────────────────────────────────────────────────────────────
// Recovery routing
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn recovery_menu_offers_exactly_three_tiers() {
    for (value, expected) in [
        ("BASIC", ScreenState::RecoveryBasic),
        ("ADVANCED", ScreenState::RecoveryAdvanced),
        ("BACK", ScreenState::MainMenu),
    ] {
        let (_dir, mut ctx) = ctx_with(vec![ScriptedAnswer::select(value)]);
        let next = recovery_menu(&mut ctx).await.unwrap();
        assert_eq!(next, expected);
    }
}

#[tokio::test]
async fn recovery_menu_cancel_returns_to_main_menu() {
    let (_dir, mut ctx) = ctx_with(vec![ScriptedAnswer::Cancel]);
    let next = recovery_menu(&mut ctx).await.unwrap();
    assert_eq!(next, ScreenState::MainMenu);
}

#[tokio::test]
async fn basic_recovery_back_returns_to_main_menu() {
    let (_dir, mut ctx) = ctx_with(vec![ScriptedAnswer::select("EXIT")]);
    let next = screens::recovery::basic::show(&mut ctx).await.unwrap();
    assert_eq!(next, ScreenState::MainMenu);
}

#[tokio::test]
async fn advanced_recovery_back_returns_to_main_menu() {
    let (_dir, mut ctx) = ctx_with(vec![ScriptedAnswer::select("EXIT")]);
    let next = screens::recovery::advanced::show(&mut ctx).await.unwrap();
    assert_eq!(next, ScreenState::MainMenu);
}

// ─────────────────────────────────────────────────────────────────────────────
// Full loop
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn router_runs_boot_to_exit_once() {
    // Without a container runtime the boot screen lands in the playground;
    // `exit` there ends the loop and the shutdown sequence returns.
    let (_dir, ctx) = ctx_with(vec![ScriptedAnswer::text("exit")]);
    xtl::Router::new(ctx).run().await;
}

#[tokio::test]
async fn optimizer_persists_lite_mode() {
    let (dir, mut ctx) = ctx_with(vec![
        ScriptedAnswer::select("OPTIMIZE"),
        ScriptedAnswer::select("ON"),
    ]);
    // Without the runtime installed the cache-clean confirm never fires.
    let next = screens::recovery::basic::show(&mut ctx).await.unwrap();
    assert_eq!(next, ScreenState::MainMenu);

    let mut reread = SettingsStore::with_path(dir.path().join("settings.json"));
    assert!(reread.load().lite_mode);
}
