//! Elevation chart drawing for the terminal host.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Line;
use ratatui::widgets::{Axis, Block, Chart, Dataset, GraphType};
use ratatui::Frame;

use trail_explorer::panel::ChartConfig;

use crate::theme::Theme;

/// Width reserved for the y-axis labels (`3500` plus the axis line).
const Y_LABEL_WIDTH: u16 = 5;

/// Draw `config` into `area`, marking `cursor` if a sample is active.
/// Returns the cells covered by the plot itself, for hover hit-testing.
pub fn render_chart(
    frame: &mut Frame,
    area: Rect,
    config: &ChartConfig,
    cursor: Option<usize>,
    theme: &Theme,
) -> Rect {
    let line: Vec<(f64, f64)> = config
        .data_provider
        .iter()
        .map(|s| (s.length, s.value))
        .collect();
    let marker: Vec<(f64, f64)> = cursor
        .and_then(|i| config.data_provider.get(i))
        .map(|s| vec![(s.length, s.value)])
        .unwrap_or_default();

    let (y_min, y_max) = config.value_bounds();
    let (x_min, x_max) = config.category_bounds();
    let x_max = if x_max > x_min { x_max } else { x_min + 1.0 };

    let mut datasets = vec![Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(theme.selected_trail))
        .data(&line)];
    if !marker.is_empty() {
        datasets.push(
            Dataset::default()
                .marker(Marker::Block)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(theme.warning))
                .data(&marker),
        );
    }

    let mut block = Block::bordered()
        .border_style(Style::default().fg(theme.border))
        .title(" Elevation profile ");
    if let Some(text) = cursor.and_then(|i| config.balloon_text(i)) {
        block = block.title_bottom(Line::styled(
            format!(" {} ", strip_tags(&text)),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ));
    }
    let inner = block.inner(area);

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(theme.text_secondary))
                .bounds([x_min, x_max])
                .labels(vec![
                    Line::from(format!("{x_min}")),
                    Line::from(format!("{x_max} km")),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(theme.text_secondary))
                .bounds([y_min, y_max])
                .labels(vec![
                    Line::from(format!("{y_min}")),
                    Line::from(format!("{y_max}")),
                ]),
        );

    frame.render_widget(chart, area);

    Rect {
        x: inner.x + Y_LABEL_WIDTH,
        y: inner.y,
        width: inner.width.saturating_sub(Y_LABEL_WIDTH),
        height: inner.height.saturating_sub(2),
    }
}

/// Sample nearest to the screen column `column` inside `plot`.
pub fn sample_at(config: &ChartConfig, plot: Rect, column: u16) -> Option<usize> {
    if config.data_provider.is_empty() || plot.width == 0 {
        return None;
    }
    if column < plot.x || column >= plot.x + plot.width {
        return None;
    }
    let (x_min, x_max) = config.category_bounds();
    let fraction = if plot.width > 1 {
        f64::from(column - plot.x) / f64::from(plot.width - 1)
    } else {
        0.0
    };
    let length = x_min + fraction * (x_max - x_min);

    config
        .data_provider
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (a.length - length)
                .abs()
                .total_cmp(&(b.length - length).abs())
        })
        .map(|(i, _)| i)
}

fn strip_tags(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;
    let mut tag = String::new();
    for c in markup.chars() {
        match c {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                if tag.eq_ignore_ascii_case("br") || tag.eq_ignore_ascii_case("br/") {
                    out.push_str("  ");
                }
            }
            _ if in_tag => tag.push(c),
            _ => out.push(c),
        }
    }
    out
}
