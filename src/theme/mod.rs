mod colors;

use ratatui::style::Color;

pub use colors::AlpineColors;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub name: &'static str,
    pub accent: Color,
    pub selected_trail: Color,
    pub trail: Color,
    pub border: Color,
    pub surface: Color,
    pub bar_bg: Color,
    pub text_on_bar: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Theme {
    pub fn alpine() -> Self {
        Self {
            name: "Alpine",
            accent: AlpineColors::GLACIER,
            selected_trail: AlpineColors::SUMMIT,
            trail: AlpineColors::ROCK,
            border: AlpineColors::ROCK,
            surface: AlpineColors::SNOW,
            bar_bg: AlpineColors::SLATE,
            text_on_bar: AlpineColors::TEXT_ON_SLATE,
            text_primary: AlpineColors::TEXT_PRIMARY,
            text_secondary: AlpineColors::TEXT_SECONDARY,
            success: AlpineColors::PINE,
            warning: AlpineColors::LARCH,
            error: AlpineColors::SUMMIT,
        }
    }

    pub fn terminal() -> Self {
        Self {
            name: "Terminal",
            accent: Color::Cyan,
            selected_trail: Color::LightRed,
            trail: Color::DarkGray,
            border: Color::Gray,
            surface: Color::Black,
            bar_bg: Color::Blue,
            text_on_bar: Color::White,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
        }
    }

    pub fn next(self) -> Self {
        if self.name == "Alpine" {
            Self::terminal()
        } else {
            Self::alpine()
        }
    }
}
