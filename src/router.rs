//! Screen router - the application state machine
//!
//! Holds the current screen state, dispatches to the matching handler, and
//! advances on the handler's returned next state. Dispatch is an exhaustive
//! match over a closed enumeration, so every state has a handler by
//! construction. A handler error is logged and treated as `Exit` to
//! guarantee a clean termination instead of a crash or a stuck loop.

use std::time::Duration;

use colored::Colorize;

use crate::context::Ctx;
use crate::error::XtlError;
use crate::prompt::{Answer, SelectItem};
use crate::screens;
use crate::term::{self, center_text, clear_screen};

/// The active screen. Exactly one at a time; transitions are total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenState {
    Boot,
    Playground,
    Installer,
    MainMenu,
    Shell,
    Custom,
    Gui,
    KernelPanic { stop_code: String },
    KernelCorrupt { stop_code: String },
    RecoveryMenu,
    RecoveryBasic,
    RecoveryAdvanced,
    Exit,
}

pub struct Router {
    ctx: Ctx,
}

impl Router {
    pub fn new(ctx: Ctx) -> Self {
        Self { ctx }
    }

    /// Run the state machine to completion, then the shutdown sequence.
    pub async fn run(&mut self) {
        let mut current = ScreenState::Boot;

        while current != ScreenState::Exit {
            current = match dispatch(&mut self.ctx, current).await {
                Ok(next) => next,
                Err(err) => {
                    tracing::error!(error = %err, "screen handler failed, shutting down");
                    ScreenState::Exit
                }
            };
        }

        shutdown().await;
    }
}

async fn dispatch(ctx: &mut Ctx, state: ScreenState) -> Result<ScreenState, XtlError> {
    match state {
        ScreenState::Boot => screens::boot::show(ctx).await,
        ScreenState::Playground => screens::playground::show(ctx).await,
        ScreenState::Installer => screens::installer::show(ctx).await,
        ScreenState::MainMenu => screens::menu::show(ctx).await,
        ScreenState::Shell => screens::shell::show(ctx).await,
        ScreenState::Custom => screens::custom::show(ctx).await,
        ScreenState::Gui => screens::gui::show(ctx).await,
        ScreenState::KernelPanic { stop_code } => {
            screens::panic::kernel_panic(ctx, &stop_code).await
        }
        ScreenState::KernelCorrupt { stop_code } => {
            screens::panic::kernel_corrupt(ctx, &stop_code).await
        }
        ScreenState::RecoveryMenu => recovery_menu(ctx).await,
        ScreenState::RecoveryBasic => screens::recovery::basic::show(ctx).await,
        ScreenState::RecoveryAdvanced => screens::recovery::advanced::show(ctx).await,
        ScreenState::Exit => Ok(ScreenState::Exit),
    }
}

/// Inline recovery-tier menu; not a screen module of its own.
pub async fn recovery_menu(ctx: &mut Ctx) -> Result<ScreenState, XtlError> {
    clear_screen();
    let items = [
        SelectItem::new("BASIC", "Basic Recovery").hint("Fix Shell, Reset Config, Wipe"),
        SelectItem::new("ADVANCED", "XTL Advanced").hint("Multi-Distro, Storage, Network"),
        SelectItem::new("BACK", "Back to Main Menu"),
    ];
    let choice = ctx
        .prompt
        .select(&format!("{}", "Select Recovery Tier:".red()), &items)
        .await?;

    Ok(match choice {
        Answer::Value(v) if v == "BASIC" => ScreenState::RecoveryBasic,
        Answer::Value(v) if v == "ADVANCED" => ScreenState::RecoveryAdvanced,
        _ => ScreenState::MainMenu,
    })
}

async fn shutdown() {
    println!();
    println!(
        "{}",
        center_text(&"XTL Engine Offline.".cyan().to_string())
    );
    term::pause(Duration::from_millis(500)).await;
}
