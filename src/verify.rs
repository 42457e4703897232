//! Boot verifier - staged preflight checks against a guest distribution
//!
//! Runs an ordered checklist with live rendering and halts at the first
//! failing step with a typed stop code. Simulate mode swaps the check
//! implementation behind the same trait, so rendering and the result
//! contract are identical to a live run.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use colored::{Color, Colorize};

use crate::ascii;
use crate::guest::{self, ARCH_ALIAS};
use crate::probe::EnvProbe;
use crate::proc::ProcessRunner;
use crate::term::{self, center_block, center_text, clear_screen, progress_bar};

// ─────────────────────────────────────────────────────────────────────────────
// Steps and stop codes
// ─────────────────────────────────────────────────────────────────────────────

/// Stable identity of a boot-check step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepId {
    Host,
    Installed,
    Integrity,
    System,
    Pkg,
}

impl StepId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Installed => "installed",
            Self::Integrity => "integrity",
            Self::System => "system",
            Self::Pkg => "pkg",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "host" => Some(Self::Host),
            "installed" => Some(Self::Installed),
            "integrity" => Some(Self::Integrity),
            "system" => Some(Self::System),
            "pkg" => Some(Self::Pkg),
            _ => None,
        }
    }

    /// Fixed per-step stop code raised when this step fails.
    fn stop_code(&self, alias: &str) -> StopCode {
        match self {
            Self::Host => StopCode::HostDependencyMissing,
            Self::Installed => StopCode::DistroNotInstalled,
            Self::Integrity => StopCode::DistroCorrupted(alias.to_string()),
            Self::System => StopCode::SystemFilesMissing(alias.to_string()),
            Self::Pkg => StopCode::PackageManagerMissing(alias.to_string()),
        }
    }
}

/// One named verification unit.
#[derive(Debug, Clone)]
pub struct BootStep {
    pub id: StepId,
    pub label: String,
}

/// Typed boot-verification failure, rendered verbatim on the panic screen.
///
/// These strings are a stable contract; recovery flows branch on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopCode {
    HostDependencyMissing,
    DistroNotInstalled,
    DistroCorrupted(String),
    SystemFilesMissing(String),
    PackageManagerMissing(String),
    BootCheckFailed,
}

impl fmt::Display for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HostDependencyMissing => write!(f, "HOST_DEPENDENCY_MISSING"),
            Self::DistroNotInstalled => write!(f, "DISTRO_NOT_INSTALLED"),
            Self::DistroCorrupted(alias) => write!(f, "DISTRO_CORRUPTED:{}", alias),
            Self::SystemFilesMissing(alias) => write!(f, "SYSTEM_FILES_MISSING:{}", alias),
            Self::PackageManagerMissing(alias) => {
                write!(f, "PACKAGE_MANAGER_MISSING:{}", alias)
            }
            Self::BootCheckFailed => write!(f, "BOOT_CHECK_FAILED"),
        }
    }
}

/// Outcome of one verification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootCheckResult {
    Ok,
    Fail(StopCode),
}

impl BootCheckResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn stop_code(&self) -> Option<&StopCode> {
        match self {
            Self::Ok => None,
            Self::Fail(code) => Some(code),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Running,
    Ok,
    Fail,
}

/// Where a simulated run is told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Index(usize),
    Id(StepId),
}

#[derive(Debug, Clone, Default)]
pub struct VerifyOptions {
    /// Checklist title; defaults to "Booting <alias>".
    pub title: Option<String>,
    /// Use the simulated checks (forced on non-Unix hosts).
    pub simulate: bool,
    /// Simulated failure point; only honored in simulate mode.
    pub simulate_fail_at: Option<FailAt>,
}

/// Build the step sequence for an alias.
///
/// Base sequence of four; the package-manager step is appended only for the
/// Arch-family target.
pub fn steps_for(alias: &str) -> Vec<BootStep> {
    let mut steps = vec![
        BootStep {
            id: StepId::Host,
            label: "Host dependencies".to_string(),
        },
        BootStep {
            id: StepId::Installed,
            label: format!("Distro \"{}\" installed", alias),
        },
        BootStep {
            id: StepId::Integrity,
            label: "Rootfs integrity".to_string(),
        },
        BootStep {
            id: StepId::System,
            label: "System files".to_string(),
        },
    ];
    if alias == ARCH_ALIAS {
        steps.push(BootStep {
            id: StepId::Pkg,
            label: "Package manager (pacman)".to_string(),
        });
    }
    steps
}

// ─────────────────────────────────────────────────────────────────────────────
// Check execution
// ─────────────────────────────────────────────────────────────────────────────

/// Executable predicate behind each step.
///
/// Simulation substitutes this trait only; the driving loop, rendering and
/// result mapping are shared between live and simulated runs.
#[async_trait]
trait StepCheck: Send + Sync {
    async fn check(&self, index: usize, step: &BootStep, alias: &str) -> bool;

    /// Artificial pacing delay before each step.
    fn step_delay(&self) -> Duration;
}

struct LiveCheck {
    probe: EnvProbe,
    runner: ProcessRunner,
}

#[async_trait]
impl StepCheck for LiveCheck {
    async fn check(&self, _index: usize, step: &BootStep, alias: &str) -> bool {
        match step.id {
            StepId::Host => self.probe.has_runtime(),
            StepId::Installed => self.probe.is_distro_installed(alias).await,
            StepId::Integrity => self.runner.run(&guest::guest_true(alias)).await == 0,
            StepId::System => {
                self.runner
                    .run(&guest::exec_sh(alias, "test -r /etc/os-release"))
                    .await
                    == 0
            }
            StepId::Pkg => {
                self.runner
                    .run(&guest::exec_sh(alias, "command -v pacman >/dev/null 2>&1"))
                    .await
                    == 0
            }
        }
    }

    fn step_delay(&self) -> Duration {
        Duration::from_millis(120)
    }
}

struct SimulatedCheck {
    fail_index: Option<usize>,
}

#[async_trait]
impl StepCheck for SimulatedCheck {
    async fn check(&self, index: usize, _step: &BootStep, _alias: &str) -> bool {
        self.fail_index != Some(index)
    }

    fn step_delay(&self) -> Duration {
        Duration::from_millis(220)
    }
}

fn resolve_fail_index(fail_at: Option<FailAt>, steps: &[BootStep]) -> Option<usize> {
    match fail_at? {
        FailAt::Index(i) => Some(i),
        FailAt::Id(id) => steps.iter().position(|s| s.id == id),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Verifier
// ─────────────────────────────────────────────────────────────────────────────

pub struct BootVerifier {
    probe: EnvProbe,
    runner: ProcessRunner,
}

impl BootVerifier {
    pub fn new(probe: EnvProbe, runner: ProcessRunner) -> Self {
        Self { probe, runner }
    }

    /// Run the full checklist for `alias`.
    pub async fn verify(&self, alias: &str, options: VerifyOptions) -> BootCheckResult {
        let alias = alias.trim();
        let alias = if alias.is_empty() { "unknown" } else { alias };
        let title = options
            .title
            .unwrap_or_else(|| format!("Booting {}", alias));

        let steps = steps_for(alias);
        let simulate = options.simulate || cfg!(not(unix));
        let checks: Box<dyn StepCheck> = if simulate {
            Box::new(SimulatedCheck {
                fail_index: resolve_fail_index(options.simulate_fail_at, &steps),
            })
        } else {
            Box::new(LiveCheck {
                probe: self.probe,
                runner: self.runner,
            })
        };

        drive(&title, alias, &steps, checks.as_ref()).await
    }
}

impl Default for BootVerifier {
    fn default() -> Self {
        let runner = ProcessRunner::new();
        Self::new(EnvProbe::new(runner), runner)
    }
}

/// Run steps strictly in order, stopping at the first failure.
async fn drive(
    title: &str,
    alias: &str,
    steps: &[BootStep],
    checks: &dyn StepCheck,
) -> BootCheckResult {
    let mut statuses = vec![StepStatus::Pending; steps.len()];

    for (i, step) in steps.iter().enumerate() {
        statuses[i] = StepStatus::Running;
        render(title, "Running boot checks...", steps, &statuses);
        term::pause(checks.step_delay()).await;

        if checks.check(i, step, alias).await {
            statuses[i] = StepStatus::Ok;
            render(title, "Running boot checks...", steps, &statuses);
        } else {
            statuses[i] = StepStatus::Fail;
            render(title, "Boot check failed.", steps, &statuses);
            return BootCheckResult::Fail(step.id.stop_code(alias));
        }
    }

    render(title, "Boot checks completed.", steps, &statuses);
    term::pause(Duration::from_millis(250)).await;
    BootCheckResult::Ok
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

/// Percent-complete for the current checklist state, floored.
///
/// Progress freezes at the failing step instead of jumping to a completed
/// fraction.
pub(crate) fn compute_percent(statuses: &[StepStatus]) -> u8 {
    let total = statuses.len().max(1);
    if let Some(fail_index) = statuses.iter().position(|s| *s == StepStatus::Fail) {
        ((fail_index * 100) / total) as u8
    } else {
        let done = statuses.iter().filter(|s| **s == StepStatus::Ok).count();
        ((done * 100) / total) as u8
    }
}

fn step_icon(status: StepStatus) -> String {
    match status {
        StepStatus::Ok => "✓".green().to_string(),
        StepStatus::Fail => "✗".red().to_string(),
        StepStatus::Running => "›".cyan().to_string(),
        StepStatus::Pending => "·".bright_black().to_string(),
    }
}

fn render(title: &str, subtitle: &str, steps: &[BootStep], statuses: &[StepStatus]) {
    clear_screen();
    println!(
        "{}",
        center_block(&ascii::colorize(ascii::LOGO_ARCH, Color::Cyan))
    );
    println!();
    println!(
        "{}",
        center_text(&format!("XTL : {}", title).bright_cyan().bold().to_string())
    );
    println!("{}", center_text(&subtitle.bright_black().to_string()));
    println!();

    let pct = compute_percent(statuses);
    println!(
        "{}",
        center_text(&progress_bar(pct, 28).bright_black().to_string())
    );
    println!();

    for (step, status) in steps.iter().zip(statuses) {
        let line = format!("{} {}", step_icon(*status), step.label);
        let line = match status {
            StepStatus::Fail => line.red().to_string(),
            StepStatus::Ok => line.green().to_string(),
            StepStatus::Running => line,
            StepStatus::Pending => line.bright_black().to_string(),
        };
        println!("{}", center_text(&line));
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arch_sequence_appends_package_manager_step() {
        let steps = steps_for("archlinux");
        assert_eq!(steps.len(), 5);
        assert_eq!(steps[4].id, StepId::Pkg);
    }

    #[test]
    fn non_arch_sequence_is_base_four() {
        let steps = steps_for("ubuntu");
        assert_eq!(steps.len(), 4);
        assert!(steps.iter().all(|s| s.id != StepId::Pkg));
    }

    #[test]
    fn step_order_is_fixed() {
        let ids: Vec<StepId> = steps_for("archlinux").iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            [
                StepId::Host,
                StepId::Installed,
                StepId::Integrity,
                StepId::System,
                StepId::Pkg
            ]
        );
    }

    #[test]
    fn stop_codes_render_stable_strings() {
        assert_eq!(
            StepId::Host.stop_code("ubuntu").to_string(),
            "HOST_DEPENDENCY_MISSING"
        );
        assert_eq!(
            StepId::Installed.stop_code("ubuntu").to_string(),
            "DISTRO_NOT_INSTALLED"
        );
        assert_eq!(
            StepId::Integrity.stop_code("archlinux").to_string(),
            "DISTRO_CORRUPTED:archlinux"
        );
        assert_eq!(
            StepId::System.stop_code("ubuntu").to_string(),
            "SYSTEM_FILES_MISSING:ubuntu"
        );
        assert_eq!(
            StepId::Pkg.stop_code("archlinux").to_string(),
            "PACKAGE_MANAGER_MISSING:archlinux"
        );
        assert_eq!(StopCode::BootCheckFailed.to_string(), "BOOT_CHECK_FAILED");
    }

    #[test]
    fn step_ids_round_trip_through_parse() {
        for id in [
            StepId::Host,
            StepId::Installed,
            StepId::Integrity,
            StepId::System,
            StepId::Pkg,
        ] {
            assert_eq!(StepId::parse(id.as_str()), Some(id));
        }
        assert_eq!(StepId::parse("bogus"), None);
    }

    #[test]
    fn fail_index_resolution() {
        let steps = steps_for("archlinux");
        assert_eq!(resolve_fail_index(None, &steps), None);
        assert_eq!(
            resolve_fail_index(Some(FailAt::Index(2)), &steps),
            Some(2)
        );
        assert_eq!(
            resolve_fail_index(Some(FailAt::Id(StepId::System)), &steps),
            Some(3)
        );
        // An id outside the sequence forces nothing.
        let base = steps_for("ubuntu");
        assert_eq!(resolve_fail_index(Some(FailAt::Id(StepId::Pkg)), &base), None);
    }

    #[test]
    fn percent_counts_completed_steps_while_passing() {
        use StepStatus::*;
        assert_eq!(compute_percent(&[Pending, Pending, Pending, Pending]), 0);
        assert_eq!(compute_percent(&[Ok, Running, Pending, Pending]), 25);
        assert_eq!(compute_percent(&[Ok, Ok, Ok, Running]), 75);
        assert_eq!(compute_percent(&[Ok, Ok, Ok, Ok]), 100);
    }

    #[test]
    fn percent_freezes_at_failing_step() {
        use StepStatus::*;
        // Failure at index 2 of 4: progress pinned to 50, not 75.
        assert_eq!(compute_percent(&[Ok, Ok, Fail, Pending]), 50);
        // Immediate failure reports zero progress.
        assert_eq!(compute_percent(&[Fail, Pending, Pending, Pending]), 0);
    }

    #[test]
    fn percent_is_floored() {
        use StepStatus::*;
        // 1 of 3 complete = 33.3..% floors to 33.
        assert_eq!(compute_percent(&[Ok, Running, Pending]), 33);
    }

    #[test]
    fn percent_is_monotonic_across_a_passing_run() {
        use StepStatus::*;
        let frames: Vec<Vec<StepStatus>> = vec![
            vec![Running, Pending, Pending, Pending],
            vec![Ok, Pending, Pending, Pending],
            vec![Ok, Running, Pending, Pending],
            vec![Ok, Ok, Pending, Pending],
            vec![Ok, Ok, Running, Pending],
            vec![Ok, Ok, Ok, Running],
            vec![Ok, Ok, Ok, Ok],
        ];
        let mut last = 0;
        for frame in frames {
            let pct = compute_percent(&frame);
            assert!(pct >= last, "percent regressed: {} -> {}", last, pct);
            last = pct;
        }
        assert_eq!(last, 100);
    }
}
