pub mod chart;
pub mod description;
pub mod map;

pub use chart::{render_chart, sample_at};
pub use description::description_lines;
pub use map::{render_map, MapViewport};

/// Terminal glyph for a Font Awesome icon class.
pub fn icon_glyph(icon: &str) -> &'static str {
    match icon {
        "fa fa-line-chart" => "↗",
        "fa fa-wrench" => "⚒",
        "fa fa-clock-o" => "◷",
        "fa fa-calendar-check-o" => "✓",
        "fa fa-calendar-times-o" => "✗",
        "fa fa-question-circle-o" => "?",
        _ => "?",
    }
}
