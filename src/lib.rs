//! XTL - terminal manager for proot-distro Linux guests

pub mod ascii;
pub mod context;
pub mod error;
pub mod guest;
pub mod probe;
pub mod proc;
pub mod prompt;
pub mod router;
pub mod screens;
pub mod settings;
pub mod term;
pub mod theme;
pub mod verify;

pub use context::Ctx;
pub use error::XtlError;
pub use probe::EnvProbe;
pub use proc::{CmdOutput, Exec, ProcessRunner, StdioPolicy};
pub use router::{Router, ScreenState};
pub use settings::{Settings, SettingsStore};
pub use verify::{BootCheckResult, BootVerifier, StopCode, VerifyOptions};
