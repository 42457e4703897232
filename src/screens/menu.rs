//! Main menu

use colored::Colorize;

use crate::ascii;
use crate::context::Ctx;
use crate::error::XtlError;
use crate::prompt::{Answer, SelectItem};
use crate::router::ScreenState;
use crate::term::{center_block, clear_screen};
use crate::theme;

pub async fn show(ctx: &mut Ctx) -> Result<ScreenState, XtlError> {
    let settings = ctx.settings.load();
    let th = theme::get(&settings.theme);

    clear_screen();
    println!(
        "{}",
        center_block(&ascii::colorize(ascii::logo_for(&settings.logo), th.logo))
    );

    let items = [
        SelectItem::new("SHELL", "🐚 Open Arch Shell").hint("Login to proot-distro"),
        SelectItem::new("GUI", "🖥  Start Desktop (GUI)").hint("VNC or Termux-X11"),
        SelectItem::new("CUSTOM", "🎨 Personalize").hint("Theme & Logo"),
        SelectItem::new("RECOVERY", "🔧 Recovery Mode").hint("Maintenance & Power Tools"),
        SelectItem::new("EXIT", "❌ Shutdown").hint("Exit"),
    ];

    let choice = ctx
        .prompt
        .select(
            &format!(
                "{}{}",
                " [ root@arch-term ]~# ".cyan(),
                "Select Action:".white()
            ),
            &items,
        )
        .await?;

    Ok(match choice {
        Answer::Value(v) if v == "SHELL" => ScreenState::Shell,
        Answer::Value(v) if v == "GUI" => ScreenState::Gui,
        Answer::Value(v) if v == "CUSTOM" => ScreenState::Custom,
        Answer::Value(v) if v == "RECOVERY" => ScreenState::RecoveryMenu,
        _ => ScreenState::Exit,
    })
}
