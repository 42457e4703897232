//! XTL binary entry point

use clap::{Parser, Subcommand};
use colored::Colorize;

use xtl::error::FixSuggestion;
use xtl::guest::ARCH_ALIAS;
use xtl::prompt::TermPrompt;
use xtl::verify::{BootCheckResult, BootVerifier, FailAt, StepId, VerifyOptions};
use xtl::{Ctx, EnvProbe, ProcessRunner, Router, SettingsStore, XtlError};

#[derive(Parser)]
#[command(name = "xtl")]
#[command(about = "XTL - terminal manager for proot-distro Linux guests")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check host and guest environment status
    Doctor,

    /// Run the boot checklist without entering the menu
    Verify {
        /// Guest alias to verify
        #[arg(short, long, default_value = ARCH_ALIAS)]
        alias: String,

        /// Skip real checks and use the simulated sequence
        #[arg(long)]
        simulate: bool,

        /// Force a simulated failure at a step id or index
        #[arg(long)]
        fail_at: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (ignore if not present)
    let _ = dotenvy::dotenv();

    // Initialize tracing; default WARN keeps the menu rendering clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Doctor) => doctor().await,
        Some(Commands::Verify {
            alias,
            simulate,
            fail_at,
        }) => verify_cmd(&alias, simulate, fail_at.as_deref()).await,
        None => run_app().await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

async fn run_app() -> Result<(), XtlError> {
    spawn_interrupt_watch();

    let settings = SettingsStore::open_default();
    let ctx = Ctx::new(settings, Box::new(TermPrompt::new()));
    Router::new(ctx).run().await;
    Ok(())
}

/// Operator-requested immediate termination: bypasses the router loop and
/// exits with a distinct non-zero status.
fn spawn_interrupt_watch() {
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!();
            eprintln!("{}", "Emergency Shutdown.".red());
            std::process::exit(1);
        }
    });
}

async fn doctor() -> Result<(), XtlError> {
    let runner = ProcessRunner::new();
    let probe = EnvProbe::new(runner);

    println!("{}", "XTL doctor".bold());

    match which::which(xtl::guest::RUNTIME_BIN) {
        Ok(path) => println!(
            "{} Container runtime: {}",
            "✓".green(),
            path.display()
        ),
        Err(_) => println!("{} Container runtime: not found on PATH", "✗".red()),
    }

    if probe.has_runtime() {
        let installed = probe.is_distro_installed(ARCH_ALIAS).await;
        println!(
            "{} Guest \"{}\": {}",
            if installed { "✓".green() } else { "✗".red() },
            ARCH_ALIAS,
            if installed { "installed" } else { "not installed" }
        );
    }

    match which::which("git") {
        Ok(_) => println!("{} git: available", "✓".green()),
        Err(_) => println!("{} git: not found (updates disabled)", "✗".red()),
    }

    Ok(())
}

async fn verify_cmd(alias: &str, simulate: bool, fail_at: Option<&str>) -> Result<(), XtlError> {
    let simulate_fail_at = match fail_at {
        None => None,
        Some(step) => Some(parse_fail_at(step)?),
    };

    let verifier = BootVerifier::default();
    let result = verifier
        .verify(
            alias,
            VerifyOptions {
                title: None,
                simulate,
                simulate_fail_at,
            },
        )
        .await;

    match result {
        BootCheckResult::Ok => {
            println!("{} Boot checks passed.", "✓".green());
            Ok(())
        }
        BootCheckResult::Fail(code) => {
            println!("{} STOP CODE: {}", "✗".red(), code);
            std::process::exit(1);
        }
    }
}

fn parse_fail_at(step: &str) -> Result<FailAt, XtlError> {
    if let Ok(index) = step.parse::<usize>() {
        return Ok(FailAt::Index(index));
    }
    StepId::parse(step).map(FailAt::Id).ok_or_else(|| {
        XtlError::Prompt(anyhow::anyhow!(
            "unknown step {:?} (expected host, installed, integrity, system, pkg or an index)",
            step
        ))
    })
}
