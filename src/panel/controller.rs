//! Detail panel controller.
//!
//! Observes the selection, resolves it against the trail directory and
//! keeps the four panel regions consistent with it.  Renders are
//! synchronous: each notification is fully applied before the next one is
//! looked at.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::model::{Trail, TrailDirectory, TrailId};
use crate::panel::bridge::{attach_chart, ChartBinding, ChartCursor};
use crate::panel::chart::{ChartEngine, ChartStyle};
use crate::panel::error::PanelError;
use crate::panel::infograph::infograph;
use crate::panel::popup::MapPopup;
use crate::panel::region::{PanelRegions, PanelSnapshot, RegionHost};
use crate::state::SelectionWatch;

/// Description shown while no trail is selected.
pub const PLACEHOLDER: &str =
    "Select a hike in the map or in the Hikes panel to see more details about it.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Empty,
    Populated(TrailId),
}

impl PanelState {
    pub fn trail_id(self) -> Option<TrailId> {
        match self {
            Self::Empty => None,
            Self::Populated(id) => Some(id),
        }
    }
}

pub struct PanelController<E: ChartEngine, P> {
    directory: TrailDirectory,
    regions: PanelRegions,
    engine: E,
    popup: Rc<RefCell<P>>,
    style: ChartStyle,
    chart: Option<ChartBinding<E::Handle, P>>,
    state: PanelState,
}

impl<E, P> PanelController<E, P>
where
    E: ChartEngine,
    P: MapPopup + 'static,
{
    /// Locate the panel regions on `host` and paint the empty panel.
    ///
    /// Fails if any region is missing; nothing is rendered in that case.
    pub fn new(
        directory: TrailDirectory,
        host: &impl RegionHost,
        engine: E,
        popup: Rc<RefCell<P>>,
    ) -> Result<Self, PanelError> {
        Self::with_style(directory, host, engine, popup, ChartStyle::default())
    }

    pub fn with_style(
        directory: TrailDirectory,
        host: &impl RegionHost,
        engine: E,
        popup: Rc<RefCell<P>>,
        style: ChartStyle,
    ) -> Result<Self, PanelError> {
        let regions = PanelRegions::locate(host)?;
        let mut controller = Self {
            directory,
            regions,
            engine,
            popup,
            style,
            chart: None,
            state: PanelState::Empty,
        };
        controller.render_empty();
        Ok(controller)
    }

    /// Apply a selection notification.
    pub fn on_selection(&mut self, selected: Option<TrailId>) -> PanelState {
        let Some(id) = selected else {
            self.render_empty();
            return self.state;
        };

        let directory = self.directory.clone();
        match directory.resolve(id) {
            Some(trail) => self.render_trail(trail),
            None => {
                warn!(trail_id = %id, "selected trail not in directory, showing empty panel");
                self.render_empty();
            }
        }
        self.state
    }

    /// Apply the latest pending notification from `watch`, if any.
    pub fn sync(&mut self, watch: &mut SelectionWatch) -> Option<PanelState> {
        watch.latest().map(|selected| self.on_selection(selected))
    }

    pub fn render_empty(&mut self) {
        self.destroy_chart();
        self.regions.title.empty();
        self.regions.infograph.empty();
        self.regions.elevation_profile.empty();
        self.regions.description.set_text(PLACEHOLDER);
        self.state = PanelState::Empty;
    }

    pub fn render_trail(&mut self, trail: &Trail) {
        debug!(trail_id = %trail.id, name = %trail.name, "rendering trail details");
        self.destroy_chart();

        self.regions.title.set_text(trail.name.as_str());
        self.regions.infograph.set_infograph(infograph(trail));
        self.regions.description.set_markup(trail.description.as_str());

        self.regions.elevation_profile.empty();
        self.chart = Some(attach_chart(
            &mut self.engine,
            &self.regions.elevation_profile,
            trail,
            &self.style,
            &self.popup,
        ));
        self.state = PanelState::Populated(trail.id);
    }

    /// Swap in a reloaded directory and re-resolve the current selection
    /// against it.
    pub fn replace_directory(&mut self, directory: TrailDirectory, selected: Option<TrailId>) -> PanelState {
        self.directory = directory;
        self.on_selection(selected)
    }

    fn destroy_chart(&mut self) {
        if let Some(chart) = self.chart.take() {
            chart.destroy();
        }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn cursor(&self) -> ChartCursor {
        self.chart
            .as_ref()
            .map_or(ChartCursor::NoActiveSample, ChartBinding::cursor)
    }

    pub fn directory(&self) -> &TrailDirectory {
        &self.directory
    }

    pub fn regions(&self) -> &PanelRegions {
        &self.regions
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        self.regions.snapshot()
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn popup(&self) -> &Rc<RefCell<P>> {
        &self.popup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::chart::ChartRuntime;
    use crate::panel::popup::PopupState;
    use crate::panel::region::{PanelSurface, RegionContent, RegionId};

    fn controller() -> PanelController<ChartRuntime, PopupState> {
        let trail = Trail {
            id: TrailId::new(1),
            name: "Ridge Walk".into(),
            ..Trail::default()
        };
        PanelController::new(
            TrailDirectory::new(vec![trail]),
            &PanelSurface::complete(),
            ChartRuntime::new(),
            Rc::new(RefCell::new(PopupState::new())),
        )
        .unwrap()
    }

    #[test]
    fn test_construction_paints_empty() {
        let panel = controller();
        assert_eq!(panel.state(), PanelState::Empty);
        assert_eq!(
            panel.regions().description.content(),
            RegionContent::Text(PLACEHOLDER.into())
        );
    }

    #[test]
    fn test_missing_region_is_fatal() {
        let mut surface = PanelSurface::complete();
        surface.remove(RegionId::ElevationProfile);
        let result = PanelController::new(
            TrailDirectory::default(),
            &surface,
            ChartRuntime::new(),
            Rc::new(RefCell::new(PopupState::new())),
        );
        assert!(matches!(
            result,
            Err(PanelError::MissingRegion(RegionId::ElevationProfile))
        ));
    }

    #[test]
    fn test_unknown_id_falls_back_to_empty() {
        let mut panel = controller();
        panel.on_selection(Some(TrailId::new(1)));
        assert_eq!(panel.on_selection(Some(TrailId::new(99))), PanelState::Empty);
        assert!(panel.regions().title.is_empty());
    }

    #[test]
    fn test_replace_directory_rerenders() {
        let mut panel = controller();
        panel.on_selection(Some(TrailId::new(1)));
        let state = panel.replace_directory(TrailDirectory::default(), Some(TrailId::new(1)));
        assert_eq!(state, PanelState::Empty);
    }
}
