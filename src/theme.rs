//! UI theme registry
//!
//! Named color palettes applied to menus and logos. The registry always
//! falls back to the baseline theme for unknown names, so a stale settings
//! file can never break rendering.

use colored::{Color, ColoredString, Colorize};

/// Name of the baseline theme used as the fallback.
pub const DEFAULT_THEME: &str = "Classic Arch";

/// A named color palette.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub name: &'static str,
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub logo: Color,
}

impl Theme {
    pub fn primary(&self, text: &str) -> ColoredString {
        text.color(self.primary)
    }

    pub fn secondary(&self, text: &str) -> ColoredString {
        text.color(self.secondary)
    }

    pub fn accent(&self, text: &str) -> ColoredString {
        text.color(self.accent)
    }

    pub fn logo(&self, text: &str) -> ColoredString {
        text.color(self.logo).bold()
    }
}

static THEMES: &[Theme] = &[
    Theme {
        name: "Classic Arch",
        primary: Color::Cyan,
        secondary: Color::Blue,
        accent: Color::White,
        logo: Color::Cyan,
    },
    Theme {
        name: "Cyberpunk",
        primary: Color::Magenta,
        secondary: Color::Cyan,
        accent: Color::Yellow,
        logo: Color::Magenta,
    },
    Theme {
        name: "Matrix",
        primary: Color::Green,
        secondary: Color::BrightGreen,
        accent: Color::BrightBlack,
        logo: Color::Green,
    },
    Theme {
        name: "Dracula",
        primary: Color::TrueColor {
            r: 0xbd,
            g: 0x93,
            b: 0xf9,
        },
        secondary: Color::TrueColor {
            r: 0xff,
            g: 0x79,
            b: 0xc6,
        },
        accent: Color::TrueColor {
            r: 0xf8,
            g: 0xf8,
            b: 0xf2,
        },
        logo: Color::TrueColor {
            r: 0xbd,
            g: 0x93,
            b: 0xf9,
        },
    },
];

/// All registered themes.
pub fn all() -> &'static [Theme] {
    THEMES
}

/// Look up a theme by name, falling back to the baseline.
pub fn get(name: &str) -> &'static Theme {
    THEMES
        .iter()
        .find(|t| t.name == name)
        .unwrap_or(&THEMES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_contains_baseline() {
        assert!(all().iter().any(|t| t.name == DEFAULT_THEME));
    }

    #[test]
    fn unknown_name_falls_back_to_baseline() {
        assert_eq!(get("Nonexistent").name, DEFAULT_THEME);
    }

    #[test]
    fn known_names_resolve() {
        assert_eq!(get("Matrix").name, "Matrix");
        assert_eq!(get("Dracula").name, "Dracula");
    }

    #[test]
    fn theme_names_are_unique() {
        let mut names: Vec<&str> = all().iter().map(|t| t.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), all().len());
    }
}
