//! Screen handlers
//!
//! Every handler is `async fn show(&mut Ctx) -> Result<ScreenState>` and
//! returns the next state; the router owns the loop.

pub mod boot;
pub mod custom;
pub mod gui;
pub mod installer;
pub mod menu;
pub mod panic;
pub mod playground;
pub mod recovery;
pub mod shell;
