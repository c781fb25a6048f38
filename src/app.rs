//! Main application state, event handling, and rendering.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use chrono::{DateTime, Local};
use color_eyre::eyre::eyre;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use tracing::{info, warn};

use trail_explorer::model::{SourceCache, TrailDirectory, TrailId};
use trail_explorer::panel::{
    ChartRuntime, PanelController, PanelSurface, PopupState, RegionContent,
};
use trail_explorer::parser;
use trail_explorer::state::{SelectionState, SelectionWatch};

use crate::event::Event;
use crate::theme::Theme;
use crate::view::{self, MapViewport};

/// Return value from event handling.
#[derive(Debug, PartialEq)]
pub enum Action {
    Continue,
    Quit,
    ForceRefresh,
}

/// Input mode for modal states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Help,
}

/// Core application state.
pub struct App {
    // Core data
    pub directory: TrailDirectory,
    pub data_path: PathBuf,

    // Shared selection and the detail panel observing it
    pub selection: SelectionState,
    selection_watch: Option<SelectionWatch>,
    initial_selection: Option<TrailId>,
    pub panel: PanelController<ChartRuntime, PopupState>,
    pub popup: Rc<RefCell<PopupState>>,

    // UI state
    pub table_state: TableState,
    pub mode: InputMode,
    pub detail_scroll: u16,
    pub split_percent: u16,

    // Theme
    pub theme: Theme,

    // Status
    pub watcher_active: bool,
    pub no_watch: bool,
    pub last_refresh: Option<DateTime<Local>>,
    pub error_message: Option<(String, Instant)>,
    pub clock: String,

    // Layout areas for mouse hit-testing
    pub list_area: Rect,
    pub chart_plot: Rect,
    pub map_viewport: Option<MapViewport>,

    // Cache for reload decisions
    pub source_cache: SourceCache,
}

impl App {
    pub fn new(
        data_path: PathBuf,
        no_watch: bool,
        initial_selection: Option<TrailId>,
    ) -> color_eyre::Result<Self> {
        let loaded = parser::load_trails(&data_path)?;
        let mut source_cache = SourceCache::new();
        source_cache.update_mtime(&data_path);

        let surface = PanelSurface::complete();
        let popup = Rc::new(RefCell::new(PopupState::new()));
        let panel = PanelController::new(
            loaded.directory.clone(),
            &surface,
            ChartRuntime::new(),
            Rc::clone(&popup),
        )?;

        let selection = SelectionState::new();
        let selection_watch = selection.subscribe();

        let mut app = Self {
            directory: loaded.directory,
            data_path,
            selection,
            selection_watch: Some(selection_watch),
            initial_selection,
            panel,
            popup,
            table_state: TableState::default(),
            mode: InputMode::Normal,
            detail_scroll: 0,
            split_percent: 30,
            theme: Theme::alpine(),
            watcher_active: !no_watch,
            no_watch,
            last_refresh: Some(Local::now()),
            error_message: None,
            clock: Local::now().format("%H:%M:%S").to_string(),
            list_area: Rect::default(),
            chart_plot: Rect::default(),
            map_viewport: None,
            source_cache,
        };
        app.report_rejected(&loaded.rejected);
        Ok(app)
    }

    fn report_rejected(&mut self, rejected: &[parser::error::ParseError]) {
        if let Some(first) = rejected.first() {
            let msg = if rejected.len() == 1 {
                format!("1 trail record rejected: {first}")
            } else {
                format!("{} trail records rejected, first: {first}", rejected.len())
            };
            self.error_message = Some((msg, Instant::now()));
        }
    }

    /// Reload the trail directory from disk and re-resolve the selection.
    pub fn reload_trails(&mut self) {
        match parser::load_trails(&self.data_path) {
            Ok(loaded) => {
                self.source_cache.update_mtime(&self.data_path);
                self.directory = loaded.directory.clone();
                self.panel
                    .replace_directory(loaded.directory, self.selection.current());
                self.last_refresh = Some(Local::now());
                self.sync_table_to_selection();
                self.error_message = None;
                self.report_rejected(&loaded.rejected);
                info!(trails = self.directory.len(), "trail directory reloaded");
            }
            Err(e) => {
                warn!(error = %e, "trail reload failed, keeping previous data");
                self.error_message = Some((e.to_string(), Instant::now()));
            }
        }
    }

    /// Main event loop.
    pub async fn run(
        &mut self,
        terminal: &mut ratatui::DefaultTerminal,
    ) -> color_eyre::Result<()> {
        let watch = self
            .selection_watch
            .take()
            .ok_or_else(|| eyre!("selection observer already in use"))?;

        // Start event handler
        let mut events =
            crate::event::EventHandler::new(self.data_path.clone(), !self.no_watch, watch);

        // First paint is always the empty panel; an initial selection
        // arrives as an ordinary change notification.
        if let Some(id) = self.initial_selection.take() {
            self.selection.select(id);
        }

        loop {
            // RENDER
            terminal.draw(|frame| self.render(frame))?;

            // WAIT FOR EVENT
            let Some(event) = events.next().await else {
                break;
            };

            // UPDATE
            match self.handle_event(event) {
                Action::Quit => break,
                Action::ForceRefresh => self.reload_trails(),
                Action::Continue => {}
            }
        }

        Ok(())
    }

    /// Handle a single event.
    pub fn handle_event(&mut self, event: Event) -> Action {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
            Event::SelectionChanged(selected) => {
                self.panel.on_selection(selected);
                self.detail_scroll = 0;
                self.sync_table_to_selection();
                Action::Continue
            }
            Event::Tick => {
                self.clock = Local::now().format("%H:%M:%S").to_string();
                // Auto-dismiss errors after 10 seconds
                if let Some((_, when)) = &self.error_message {
                    if when.elapsed().as_secs() >= 10 {
                        self.error_message = None;
                    }
                }
                Action::Continue
            }
            Event::FilesChanged(paths) => {
                self.watcher_active = true;
                if self.source_cache.touches(&self.data_path, &paths)
                    && self.source_cache.has_changed(&self.data_path)
                {
                    self.reload_trails();
                }
                Action::Continue
            }
            Event::Resize => Action::Continue,
        }
    }

    /// Handle key events.
    fn handle_key_event(&mut self, key: KeyEvent) -> Action {
        // Help mode: any key dismisses
        if self.mode == InputMode::Help {
            self.mode = InputMode::Normal;
            return Action::Continue;
        }

        match key.code {
            KeyCode::Char('q') => return Action::Quit,
            KeyCode::Char('?') => self.mode = InputMode::Help,
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Home => self.select_index(0),
            KeyCode::End => self.select_index(self.directory.len().saturating_sub(1)),
            KeyCode::Esc | KeyCode::Char('c') => {
                self.selection.clear();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.panel.engine_mut().step_cursor(1);
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.panel.engine_mut().step_cursor(-1);
            }
            KeyCode::Char('x') => {
                self.panel.engine_mut().set_cursor(None);
            }
            KeyCode::Char('r') => return Action::ForceRefresh,
            KeyCode::Char('t') => self.theme = self.theme.next(),
            KeyCode::Char('[') => {
                self.split_percent = self.split_percent.saturating_sub(5).max(20);
            }
            KeyCode::Char(']') => {
                self.split_percent = (self.split_percent + 5).min(60);
            }
            KeyCode::Char('d') => self.detail_scroll = self.detail_scroll.saturating_add(3),
            KeyCode::Char('u') => self.detail_scroll = self.detail_scroll.saturating_sub(3),
            _ => {}
        }

        Action::Continue
    }

    /// Handle mouse events.
    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Action {
        let position = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.list_area.contains(position) {
                    // Border (1) + header row (1)
                    let row_offset = mouse.row.saturating_sub(self.list_area.y + 2) as usize;
                    let index = row_offset + self.table_state.offset();
                    if index < self.directory.len() {
                        self.select_index(index);
                    }
                } else if let Some((lon, lat)) = self
                    .map_viewport
                    .and_then(|vp| vp.locate(mouse.column, mouse.row))
                {
                    if let Some(trail) = self.directory.nearest(lon, lat) {
                        self.selection.select(trail.id);
                    }
                }
            }
            MouseEventKind::Moved => {
                let hovered = if self.chart_plot.contains(position) {
                    self.panel.regions().elevation_profile.with(|content| match content {
                        RegionContent::Chart(config) => {
                            view::sample_at(config, self.chart_plot, mouse.column)
                        }
                        _ => None,
                    })
                } else {
                    None
                };
                if hovered.is_some() || self.panel.engine().cursor().is_some() {
                    self.panel.engine_mut().set_cursor(hovered);
                }
            }
            MouseEventKind::ScrollDown if self.list_area.contains(position) => self.select_next(),
            MouseEventKind::ScrollUp if self.list_area.contains(position) => {
                self.select_previous()
            }
            _ => {}
        }
        Action::Continue
    }

    // ─────────────────────────────────────────────────────────
    // Selection helpers. The list writes the shared selection and the
    // panel and the list highlight both follow it.
    // ─────────────────────────────────────────────────────────

    fn selected_index(&self) -> Option<usize> {
        self.selection
            .current()
            .and_then(|id| self.directory.position(id))
    }

    fn select_index(&mut self, index: usize) {
        if let Some(trail) = self.directory.get(index) {
            self.selection.select(trail.id);
        }
    }

    fn select_next(&mut self) {
        let len = self.directory.len();
        if len == 0 {
            return;
        }
        let i = self.selected_index().map(|s| (s + 1).min(len - 1)).unwrap_or(0);
        self.select_index(i);
    }

    fn select_previous(&mut self) {
        if self.directory.is_empty() {
            return;
        }
        let i = self.selected_index().map(|s| s.saturating_sub(1)).unwrap_or(0);
        self.select_index(i);
    }

    fn sync_table_to_selection(&mut self) {
        self.table_state.select(self.selected_index());
    }

    // ─────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // Graceful degradation for tiny terminals
        if area.width < 60 || area.height < 20 {
            let msg = Paragraph::new("Terminal too small. Resize to at least 100x30.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(self.theme.error));
            frame.render_widget(msg, area);
            return;
        }

        let has_error = self.error_message.is_some();
        let constraints = if has_error {
            vec![
                Constraint::Length(1), // title bar
                Constraint::Length(1), // error bar
                Constraint::Fill(1),   // main content
                Constraint::Length(1), // status bar
            ]
        } else {
            vec![
                Constraint::Length(1), // title bar
                Constraint::Fill(1),   // main content
                Constraint::Length(1), // status bar
            ]
        };

        let areas: Vec<Rect> = Layout::vertical(constraints).split(area).to_vec();
        let (title_area, main_area, status_area) = if has_error {
            (areas[0], areas[2], areas[3])
        } else {
            (areas[0], areas[1], areas[2])
        };

        self.render_title_bar(frame, title_area);
        if has_error {
            self.render_error_bar(frame, areas[1]);
        }
        self.render_status_bar(frame, status_area);

        let [list_area, right_area] = Layout::horizontal([
            Constraint::Percentage(self.split_percent),
            Constraint::Percentage(100 - self.split_percent),
        ])
        .areas(main_area);

        self.list_area = list_area;
        self.render_trail_list(frame, list_area);

        if right_area.width >= 90 {
            let [detail_area, map_area] =
                Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                    .areas(right_area);
            self.render_detail_panel(frame, detail_area);
            self.render_map(frame, map_area);
        } else {
            let [detail_area, map_area] =
                Layout::vertical([Constraint::Fill(1), Constraint::Percentage(40)])
                    .areas(right_area);
            self.render_detail_panel(frame, detail_area);
            self.render_map(frame, map_area);
        }

        if self.mode == InputMode::Help {
            self.render_help_overlay(frame, area);
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let watcher_indicator = if self.no_watch {
            Span::styled("○ STATIC", Style::default().fg(self.theme.text_secondary))
        } else if self.watcher_active {
            Span::styled("● WATCHING", Style::default().fg(self.theme.success))
        } else {
            Span::styled("● WATCHER ERROR", Style::default().fg(self.theme.error))
        };

        let open = self.directory.iter().filter(|t| t.status.is_open()).count();
        let counts = format!(
            "{} trails · {} open · {} closed",
            self.directory.len(),
            open,
            self.directory.len() - open
        );
        let loaded = self
            .last_refresh
            .map(|t| format!("loaded {}", t.format("%H:%M")))
            .unwrap_or_default();

        let left = " ▲ Trail Explorer";
        let used = left.chars().count()
            + counts.chars().count()
            + loaded.chars().count()
            + self.clock.len()
            + 20;
        let padding = (area.width as usize).saturating_sub(used);

        let title = Line::from(vec![
            Span::styled(left, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("   "),
            Span::raw(counts),
            Span::raw(" ".repeat(padding)),
            Span::raw(loaded),
            Span::raw("  "),
            Span::raw(&self.clock),
            Span::raw("  "),
            watcher_indicator,
            Span::raw(" "),
        ]);

        frame.render_widget(
            Paragraph::new(title).style(
                Style::default()
                    .bg(self.theme.bar_bg)
                    .fg(self.theme.text_on_bar),
            ),
            area,
        );
    }

    fn render_error_bar(&self, frame: &mut Frame, area: Rect) {
        if let Some((ref msg, _)) = self.error_message {
            let line = Line::from(vec![Span::styled(
                format!(" ⚠ {msg}"),
                Style::default().fg(self.theme.bar_bg).bg(self.theme.warning),
            )]);
            frame.render_widget(
                Paragraph::new(line).style(Style::default().bg(self.theme.warning)),
                area,
            );
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let theme_name = self.theme.name;

        let shortcuts = Line::from(vec![
            Span::styled(" ↑↓", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" Select  "),
            Span::styled("←→", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" Profile  "),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" Clear  "),
            Span::styled("r", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" Reload  "),
            Span::styled("t", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" Theme  "),
            Span::styled("?", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" Help  "),
            Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(" Quit  │ {theme_name}")),
        ]);

        frame.render_widget(
            Paragraph::new(shortcuts).style(
                Style::default()
                    .bg(self.theme.bar_bg)
                    .fg(self.theme.text_on_bar),
            ),
            area,
        );
    }

    fn render_trail_list(&mut self, frame: &mut Frame, area: Rect) {
        let theme = self.theme;

        let header = Row::new(vec!["Hike", "Level", "Time", "Status"]).style(
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        );

        let rows: Vec<Row> = self
            .directory
            .iter()
            .map(|trail| {
                let status_style = if trail.status.is_open() {
                    Style::default().fg(theme.success)
                } else {
                    Style::default().fg(theme.text_secondary)
                };
                Row::new(vec![
                    Cell::from(Span::styled(
                        trail.name.as_str(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Cell::from(trail.difficulty.as_str()),
                    Cell::from(format!("{} hr", trail.walktime)),
                    Cell::from(Span::styled(trail.status.label(), status_style)),
                ])
            })
            .collect();

        let widths = [
            Constraint::Fill(1),
            Constraint::Length(10),
            Constraint::Length(7),
            Constraint::Length(7),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::bordered()
                    .border_style(Style::default().fg(theme.border))
                    .title(" Hikes "),
            )
            .row_highlight_style(
                Style::default()
                    .bg(theme.accent)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");

        frame.render_stateful_widget(table, area, &mut self.table_state);
    }

    /// Draw the four panel regions exactly as the controller left them.
    fn render_detail_panel(&mut self, frame: &mut Frame, area: Rect) {
        let theme = self.theme;

        let block = Block::bordered()
            .border_style(Style::default().fg(theme.border))
            .title(" Details ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chart_height = if self.panel.regions().elevation_profile.is_empty() {
            0
        } else {
            (inner.height / 2).clamp(6, 14)
        };
        let [title_area, infograph_area, description_area, chart_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(chart_height),
        ])
        .areas(inner);

        let regions = self.panel.regions();

        let title = regions.title.with(|content| match content {
            RegionContent::Text(text) => Line::styled(
                text.clone(),
                Style::default()
                    .fg(theme.selected_trail)
                    .add_modifier(Modifier::BOLD),
            ),
            _ => Line::raw(""),
        });
        frame.render_widget(Paragraph::new(title), title_area);

        let facts = regions.infograph.with(|content| match content {
            RegionContent::Infograph(graph) => graph
                .facts
                .iter()
                .flat_map(|fact| {
                    [
                        Span::styled(
                            format!("{} ", view::icon_glyph(fact.icon)),
                            Style::default().fg(theme.accent),
                        ),
                        Span::raw(format!("{}   ", fact.text)),
                    ]
                })
                .collect::<Vec<_>>(),
            _ => Vec::new(),
        });
        frame.render_widget(Paragraph::new(Line::from(facts)), infograph_area);

        let description: Vec<Line> = regions.description.with(|content| match content {
            RegionContent::Text(text) => vec![Line::styled(
                text.clone(),
                Style::default().fg(theme.text_secondary),
            )],
            RegionContent::Markup(markup) => view::description_lines(markup)
                .into_iter()
                .map(|line| Line::styled(line, Style::default().fg(theme.text_primary)))
                .collect(),
            _ => Vec::new(),
        });
        frame.render_widget(
            Paragraph::new(description)
                .wrap(Wrap { trim: true })
                .scroll((self.detail_scroll, 0)),
            description_area,
        );

        let cursor = self.panel.engine().cursor();
        let plot = regions.elevation_profile.with(|content| match content {
            RegionContent::Chart(config) if chart_area.height > 0 => {
                view::render_chart(frame, chart_area, config, cursor, &theme)
            }
            _ => Rect::default(),
        });
        self.chart_plot = plot;
    }

    fn render_map(&mut self, frame: &mut Frame, area: Rect) {
        let popup = self.popup.borrow();
        let viewport = view::render_map(
            frame,
            area,
            &self.directory,
            self.selection.current(),
            &popup,
            &self.theme,
        );
        drop(popup);
        self.map_viewport = Some(viewport);
    }

    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 18, area);
        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            Line::styled(
                "Keyboard Shortcuts",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Line::raw(""),
            Line::raw("  ↑/k ↓/j   Select previous/next hike"),
            Line::raw("  Home/End  First/last hike"),
            Line::raw("  Esc/c     Clear selection"),
            Line::raw("  ←/h →/l   Move along the elevation profile"),
            Line::raw("  x         Leave the elevation profile"),
            Line::raw("  d/u       Scroll description down/up"),
            Line::raw("  r         Reload trail data"),
            Line::raw("  t         Cycle theme"),
            Line::raw("  [/]       Resize list (narrower/wider)"),
            Line::raw("  ?         Toggle this help"),
            Line::raw("  q         Quit"),
            Line::raw(""),
            Line::styled(
                "Click a hike in the list or near a trail on the map to select it",
                Style::default().fg(self.theme.text_secondary),
            ),
        ];

        let help = Paragraph::new(help_text).block(
            Block::bordered()
                .title(" Help ")
                .border_style(Style::default().fg(self.theme.accent))
                .style(Style::default().bg(self.theme.surface)),
        );

        frame.render_widget(help, popup_area);
    }
}

// ─────────────────────────────────────────────────────────
// Standalone helper functions
// ─────────────────────────────────────────────────────────

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}
