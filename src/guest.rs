//! Guest command builders
//!
//! Every guest-side operation is a typed builder from structured parameters
//! to a fixed argument vector. Shell quoting happens in exactly one place,
//! [`sh_single_quote`]; nothing else interpolates untrusted strings into a
//! shell line.

use crate::proc::{Exec, StdioPolicy};

/// Host-side container runtime binary.
pub const RUNTIME_BIN: &str = "proot-distro";

/// Alias of the primary guest distribution.
pub const ARCH_ALIAS: &str = "archlinux";

/// List installed guest distributions (output captured).
pub fn list() -> Exec {
    Exec::new(RUNTIME_BIN).arg("list").stdio(StdioPolicy::Piped)
}

/// Install a guest distribution, sharing the terminal for progress output.
pub fn install(alias: &str) -> Exec {
    Exec::new(RUNTIME_BIN)
        .args(["install", alias])
        .stdio(StdioPolicy::Inherit)
}

/// Remove a guest distribution.
pub fn remove(alias: &str) -> Exec {
    Exec::new(RUNTIME_BIN).args(["remove", alias])
}

/// Interactive login session inside a guest.
pub fn login(alias: &str) -> Exec {
    Exec::new(RUNTIME_BIN)
        .args(["login", alias])
        .stdio(StdioPolicy::Inherit)
}

/// Interactive login with a host path bind-mounted into the guest.
pub fn login_bind(alias: &str, host_path: &str, guest_path: &str) -> Exec {
    Exec::new(RUNTIME_BIN)
        .args(["login", alias, "--bind"])
        .arg(format!("{}:{}", host_path, guest_path))
        .stdio(StdioPolicy::Inherit)
}

/// Run a trivial command inside the guest; exit 0 proves a working rootfs.
pub fn guest_true(alias: &str) -> Exec {
    Exec::new(RUNTIME_BIN).args(["login", alias, "--", "true"])
}

/// Run a shell snippet inside the guest through a login shell, silently.
pub fn exec_sh(alias: &str, script: &str) -> Exec {
    Exec::new(RUNTIME_BIN).args(["login", alias, "--", "sh", "-lc", script])
}

/// Run a bash snippet inside the guest through a login shell, silently.
pub fn exec_bash(alias: &str, script: &str) -> Exec {
    Exec::new(RUNTIME_BIN).args(["login", alias, "--", "bash", "-lc", script])
}

/// The single shell-quoting boundary: POSIX single-quote escaping.
pub fn sh_single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

/// Wrap a command so it runs as the given guest user.
///
/// Root (or an empty name) runs the command directly; any other user goes
/// through `sudo -iu`.
pub fn as_guest_user(username: &str, command: &str) -> String {
    let quoted = sh_single_quote(command);
    if username.is_empty() || username == "root" {
        format!("bash -lc {}", quoted)
    } else {
        format!("sudo -iu {} bash -lc {}", username, quoted)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Desktop environment parameters
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesktopEnv {
    Xfce,
    I3,
}

impl DesktopEnv {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Xfce => "XFCE4",
            Self::I3 => "i3wm",
        }
    }

    /// Command that launches the desktop session.
    pub fn session_command(&self) -> &'static str {
        match self {
            Self::Xfce => "startxfce4",
            Self::I3 => "i3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMethod {
    Vnc,
    X11,
}

impl DisplayMethod {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Vnc => "VNC",
            Self::X11 => "Termux-X11",
        }
    }
}

/// Package set for a desktop environment and display method.
pub fn gui_packages(de: DesktopEnv, display: DisplayMethod) -> Vec<&'static str> {
    let mut packages = vec!["xorg-server", "xorg-xinit"];
    match de {
        DesktopEnv::Xfce => packages.extend(["xfce4", "xfce4-goodies"]),
        DesktopEnv::I3 => packages.extend(["i3-wm", "i3status", "i3lock", "dmenu"]),
    }
    if display == DisplayMethod::Vnc {
        packages.push("tigervnc");
    }
    packages
}

/// Guest package-manager install line for a package set.
pub fn pacman_install(packages: &[&str]) -> String {
    format!("pacman -S --noconfirm {}", packages.join(" "))
}

/// Prepare a login user inside the guest (idempotent).
pub fn user_setup_script(username: &str) -> String {
    format!(
        "set -e\n\
         pacman -S --noconfirm sudo >/dev/null 2>&1 || true\n\
         if ! id {u} >/dev/null 2>&1; then\n\
         \x20   useradd -m -G wheel {u}\n\
         \x20   echo {u}:1234 | chpasswd\n\
         fi",
        u = username
    )
}

/// Restore the guest's default shell configuration.
pub fn shell_repair_script() -> &'static str {
    "cp /etc/skel/.bashrc /root/.bashrc\n\
     chsh -s /bin/bash root\n\
     rm -rf /root/.oh-my-zsh\n\
     rm -f /root/.zshrc"
}

/// Strip injected configuration markers from guest shell rc files.
pub fn soft_reset_script() -> &'static str {
    "sed -i '/XTL_INJECT/d' /root/.bashrc 2>/dev/null || true\n\
     sed -i '/XTL_INJECT/d' /root/.zshrc 2>/dev/null || true"
}

/// Clean the guest package-manager cache.
pub fn pacman_cache_clean() -> &'static str {
    "pacman -Sc --noconfirm"
}

/// Point the guest resolver at a public DNS server.
pub fn dns_fix_script() -> &'static str {
    "echo \"nameserver 8.8.8.8\" > /etc/resolv.conf"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_is_captured() {
        let exec = list();
        assert_eq!(exec.program(), RUNTIME_BIN);
        assert_eq!(exec.argv(), ["list"]);
    }

    #[test]
    fn login_vector_is_fixed() {
        let exec = login("ubuntu");
        assert_eq!(exec.argv(), ["login", "ubuntu"]);
    }

    #[test]
    fn bind_spec_joins_host_and_guest_paths() {
        let exec = login_bind(ARCH_ALIAS, "/storage/emulated/0", "/sdcard");
        assert_eq!(
            exec.argv(),
            [
                "login",
                "archlinux",
                "--bind",
                "/storage/emulated/0:/sdcard"
            ]
        );
    }

    #[test]
    fn exec_sh_wraps_script_verbatim() {
        let exec = exec_sh("ubuntu", "test -r /etc/os-release");
        assert_eq!(
            exec.argv(),
            ["login", "ubuntu", "--", "sh", "-lc", "test -r /etc/os-release"]
        );
    }

    #[test]
    fn single_quote_survives_embedded_quotes() {
        assert_eq!(sh_single_quote("plain"), "'plain'");
        assert_eq!(sh_single_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn root_user_runs_directly() {
        assert_eq!(as_guest_user("root", "whoami"), "bash -lc 'whoami'");
        assert_eq!(as_guest_user("", "whoami"), "bash -lc 'whoami'");
    }

    #[test]
    fn non_root_user_goes_through_sudo() {
        assert_eq!(
            as_guest_user("panda", "whoami"),
            "sudo -iu panda bash -lc 'whoami'"
        );
    }

    #[test]
    fn xfce_vnc_package_set() {
        let packages = gui_packages(DesktopEnv::Xfce, DisplayMethod::Vnc);
        assert!(packages.contains(&"xfce4"));
        assert!(packages.contains(&"tigervnc"));
        assert!(!packages.contains(&"i3-wm"));
    }

    #[test]
    fn i3_x11_package_set_has_no_vnc() {
        let packages = gui_packages(DesktopEnv::I3, DisplayMethod::X11);
        assert!(packages.contains(&"i3-wm"));
        assert!(!packages.contains(&"tigervnc"));
    }

    #[test]
    fn pacman_line_joins_packages() {
        assert_eq!(
            pacman_install(&["sudo", "git"]),
            "pacman -S --noconfirm sudo git"
        );
    }

    #[test]
    fn user_setup_is_parameterized() {
        let script = user_setup_script("panda");
        assert!(script.contains("useradd -m -G wheel panda"));
        assert!(script.contains("panda:1234"));
    }
}
