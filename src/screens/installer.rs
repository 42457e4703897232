//! Installer screen
//!
//! The automatic installer is disabled; the screen points at the manual
//! curl-based install and returns to the playground.

use crate::context::Ctx;
use crate::error::XtlError;
use crate::router::ScreenState;
use crate::term::{self, note};

const INSTALLER_URL: &str =
    "https://raw.githubusercontent.com/xtl-project/xtl-tools/main/install.sh";

pub async fn show(_ctx: &mut Ctx) -> Result<ScreenState, XtlError> {
    println!();
    note(
        "Auto installer is disabled. Use manual installer via curl.",
        "INSTALLER",
    );
    note(
        &format!(
            "curl -L {} -o xtl-installer.sh && bash xtl-installer.sh",
            INSTALLER_URL
        ),
        "Manual Install",
    );
    note("If curl is not installed: pkg install curl", "Termux");
    term::pause_ms(1200).await;
    Ok(ScreenState::Playground)
}
