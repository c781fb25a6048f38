//! Alpine palette as ratatui Color::Rgb constants.

use ratatui::style::Color;

pub struct AlpineColors;

impl AlpineColors {
    // Primary palette
    pub const SLATE: Color = Color::Rgb(38, 50, 56); // #263238
    pub const GLACIER: Color = Color::Rgb(79, 142, 171); // #4F8EAB
    pub const SUMMIT: Color = Color::Rgb(224, 83, 62); // #E0533E
    pub const PINE: Color = Color::Rgb(46, 110, 72); // #2E6E48
    pub const LARCH: Color = Color::Rgb(214, 158, 46); // #D69E2E

    // Surfaces
    pub const SNOW: Color = Color::Rgb(248, 250, 250); // #F8FAFA
    pub const ROCK: Color = Color::Rgb(176, 190, 197); // #B0BEC5

    // Text
    pub const TEXT_PRIMARY: Color = Color::Rgb(75, 75, 75); // #4B4B4B
    pub const TEXT_SECONDARY: Color = Color::Rgb(120, 134, 140); // #78868C
    pub const TEXT_ON_SLATE: Color = Color::Rgb(255, 255, 255);
}
