//! Map view: trail geometry on a braille canvas, with the profile popup
//! drawn at its anchor point.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine, Points};
use ratatui::widgets::Block;
use ratatui::Frame;

use trail_explorer::model::{TrailDirectory, TrailId};
use trail_explorer::panel::PopupState;

use crate::theme::Theme;

/// Geographic window shown by the map and the screen cells it occupies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub area: Rect,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl MapViewport {
    /// Fit the directory's extent into `area`, with a margin so trails
    /// don't touch the border.
    pub fn fit(directory: &TrailDirectory, area: Rect) -> Self {
        let (min_x, min_y, max_x, max_y) = directory.bounds().unwrap_or((0.0, 0.0, 1.0, 1.0));
        let pad_x = ((max_x - min_x) * 0.1).max(0.005);
        let pad_y = ((max_y - min_y) * 0.1).max(0.005);
        Self {
            area,
            x_bounds: [min_x - pad_x, max_x + pad_x],
            y_bounds: [min_y - pad_y, max_y + pad_y],
        }
    }

    /// Geographic coordinate under a screen cell, if the cell is on the map.
    pub fn locate(&self, column: u16, row: u16) -> Option<(f64, f64)> {
        if self.area.width == 0
            || self.area.height == 0
            || !self.area.contains((column, row).into())
        {
            return None;
        }
        let fx = (f64::from(column - self.area.x) + 0.5) / f64::from(self.area.width);
        let fy = (f64::from(row - self.area.y) + 0.5) / f64::from(self.area.height);
        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        Some((x0 + fx * (x1 - x0), y1 - fy * (y1 - y0)))
    }
}

pub fn render_map(
    frame: &mut Frame,
    area: Rect,
    directory: &TrailDirectory,
    selected: Option<TrailId>,
    popup: &PopupState,
    theme: &Theme,
) -> MapViewport {
    let block = Block::bordered()
        .border_style(Style::default().fg(theme.border))
        .title(" Map ");
    let inner = block.inner(area);
    let viewport = MapViewport::fit(directory, inner);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(viewport.x_bounds)
        .y_bounds(viewport.y_bounds)
        .paint(|ctx| {
            // Unselected trails first so the selection is drawn on top
            let ordered = directory
                .iter()
                .filter(|t| Some(t.id) != selected)
                .chain(directory.iter().filter(|t| Some(t.id) == selected));

            for trail in ordered {
                let color = if Some(trail.id) == selected {
                    theme.selected_trail
                } else {
                    theme.trail
                };
                for path in &trail.geometry.paths {
                    for pair in path.windows(2) {
                        ctx.draw(&CanvasLine {
                            x1: pair[0][0],
                            y1: pair[0][1],
                            x2: pair[1][0],
                            y2: pair[1][1],
                            color,
                        });
                    }
                }
            }

            if let Some(content) = popup.content() {
                let (x, y) = (content.location.longitude, content.location.latitude);
                ctx.layer();
                ctx.draw(&Points {
                    coords: &[(x, y)],
                    color: theme.warning,
                });
                ctx.print(
                    x,
                    y,
                    Line::from(Span::styled(
                        format!(" ◆ {}", content.title),
                        Style::default()
                            .fg(theme.text_on_bar)
                            .bg(theme.bar_bg)
                            .add_modifier(Modifier::BOLD),
                    )),
                );
            }
        });

    frame.render_widget(canvas, area);
    viewport
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> MapViewport {
        MapViewport {
            area: Rect::new(10, 5, 20, 10),
            x_bounds: [7.0, 8.0],
            y_bounds: [46.0, 47.0],
        }
    }

    #[test]
    fn test_locate_outside_is_none() {
        assert!(viewport().locate(0, 0).is_none());
        assert!(viewport().locate(30, 5).is_none());
    }

    #[test]
    fn test_locate_maps_corners() {
        let (x, y) = viewport().locate(10, 5).unwrap();
        assert!((x - 7.025).abs() < 1e-9);
        assert!((y - 46.95).abs() < 1e-9);

        let (x, y) = viewport().locate(29, 14).unwrap();
        assert!((x - 7.975).abs() < 1e-9);
        assert!((y - 46.05).abs() < 1e-9);
    }

    #[test]
    fn test_fit_pads_extent() {
        let vp = MapViewport::fit(&TrailDirectory::default(), Rect::new(0, 0, 10, 10));
        assert!(vp.x_bounds[0] < 0.0 && vp.x_bounds[1] > 1.0);
    }
}
