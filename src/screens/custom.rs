//! Personalization screen - theme and logo selection

use crate::ascii;
use crate::context::Ctx;
use crate::error::XtlError;
use crate::prompt::{Answer, SelectItem};
use crate::router::ScreenState;
use crate::term::{center_block, clear_screen};
use crate::theme;

pub async fn show(ctx: &mut Ctx) -> Result<ScreenState, XtlError> {
    loop {
        let mut settings = ctx.settings.load();
        let th = theme::get(&settings.theme);

        clear_screen();
        println!(
            "{}",
            center_block(&ascii::colorize(ascii::logo_for(&settings.logo), th.logo))
        );
        println!();

        let items = [
            SelectItem::new("THEME", "Change UI Theme")
                .hint(format!("Current: {}", settings.theme)),
            SelectItem::new("LOGO", "Change ASCII Logo")
                .hint(format!("Current: {}", settings.logo)),
            SelectItem::new("BACK", "Back to Main Menu"),
        ];

        let choice = ctx
            .prompt
            .select(&th.primary("Personalization Menu:").to_string(), &items)
            .await?;

        let Answer::Value(choice) = choice else {
            return Ok(ScreenState::MainMenu);
        };

        match choice.as_str() {
            "THEME" => {
                let options: Vec<SelectItem> = theme::all()
                    .iter()
                    .map(|t| SelectItem::new(t.name, t.name))
                    .collect();
                if let Answer::Value(name) =
                    ctx.prompt.select("Select Theme:", &options).await?
                {
                    settings.theme = name;
                    ctx.settings.save(settings)?;
                }
            }
            "LOGO" => {
                let options = [
                    SelectItem::new("Arch", "Arch Linux"),
                    SelectItem::new("Linux", "Linux (Tux)"),
                    SelectItem::new("XTerm", "XTL Text"),
                ];
                if let Answer::Value(logo) =
                    ctx.prompt.select("Select Logo:", &options).await?
                {
                    settings.logo = logo;
                    ctx.settings.save(settings)?;
                }
            }
            _ => return Ok(ScreenState::MainMenu),
        }
    }
}
