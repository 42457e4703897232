//! ASCII logos and figures

use colored::{Color, Colorize};

pub const LOGO_ARCH: &str = r"
          /\
         /  \
        / /\ \
       / /  \ \
      / /    \ \
     / /  /\  \ \
    / /__/  \__\ \
   /____________  \
                \__\
";

pub const LOGO_TUX: &str = r"
        .--.
       |o_o |
       |:_/ |
      //   \ \
     (|     | )
    /'\_   _/`\
    \___)=(___/
";

pub const LOGO_TEXT: &str = r"
 __  _______ _
 \ \/ /_   _| |
  >  <  | | | |__
 /_/\_\ |_| |____|
";

/// Resolve the logo for a settings variant tag.
pub fn logo_for(variant: &str) -> &'static str {
    match variant {
        "Linux" => LOGO_TUX,
        "XTerm" => LOGO_TEXT,
        _ => LOGO_ARCH,
    }
}

/// Apply one color to every non-empty line of a logo.
pub fn colorize(logo: &str, color: Color) -> String {
    logo.split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                line.color(color).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
