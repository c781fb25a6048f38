//! Chart → map bridge.  Keeps the map popup in lock-step with the
//! elevation chart's cursor: open at the hovered sample's position while a
//! sample is active, closed otherwise.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use tracing::{debug, error};

use crate::model::{GeoPoint, ProfileSample, Trail, TrailId};
use crate::panel::chart::{ChartConfig, ChartEngine, ChartHandle, ChartStyle};
use crate::panel::error::PanelError;
use crate::panel::popup::MapPopup;
use crate::panel::region::RegionHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartCursor {
    #[default]
    NoActiveSample,
    ActiveSample(usize),
}

impl ChartCursor {
    pub fn index(self) -> Option<usize> {
        match self {
            Self::NoActiveSample => None,
            Self::ActiveSample(i) => Some(i),
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Self::ActiveSample(_))
    }
}

/// Cursor state machine for one chart instance.
pub struct ElevationBridge<P> {
    trail_id: TrailId,
    samples: Arc<[ProfileSample]>,
    cursor: ChartCursor,
    popup: Rc<RefCell<P>>,
}

impl<P: MapPopup> ElevationBridge<P> {
    pub fn new(trail_id: TrailId, samples: Arc<[ProfileSample]>, popup: Rc<RefCell<P>>) -> Self {
        Self {
            trail_id,
            samples,
            cursor: ChartCursor::NoActiveSample,
            popup,
        }
    }

    pub fn cursor(&self) -> ChartCursor {
        self.cursor
    }

    /// Handle a chart "changed" notification.
    ///
    /// An index outside the profile is reported as an error; the popup is
    /// closed rather than left at a stale position.
    pub fn changed(&mut self, index: Option<usize>) -> Result<(), PanelError> {
        let Some(index) = index else {
            self.popup.borrow_mut().close();
            self.cursor = ChartCursor::NoActiveSample;
            return Ok(());
        };

        let Some(sample) = self.samples.get(index) else {
            self.popup.borrow_mut().close();
            self.cursor = ChartCursor::NoActiveSample;
            return Err(PanelError::SampleOutOfRange {
                index,
                len: self.samples.len(),
            });
        };

        let location = GeoPoint::wgs84(
            sample.point.longitude,
            sample.point.latitude,
            sample.point.elevation,
        );
        debug!(trail_id = %self.trail_id, index, elevation = sample.value, "opening profile popup");

        let mut popup = self.popup.borrow_mut();
        popup.set_dock_enabled(false);
        popup.open(format!("{} m", sample.value), location);
        self.cursor = ChartCursor::ActiveSample(index);
        Ok(())
    }

    /// Drop the cursor as the chart goes away, closing the popup if this
    /// chart had opened it.
    pub fn release(&mut self) {
        if self.cursor.is_active() {
            self.popup.borrow_mut().close();
        }
        self.cursor = ChartCursor::NoActiveSample;
    }
}

/// A rendered chart together with its bridge.
pub struct ChartBinding<H, P> {
    handle: H,
    bridge: Rc<RefCell<ElevationBridge<P>>>,
}

impl<H: ChartHandle, P: MapPopup> ChartBinding<H, P> {
    pub fn cursor(&self) -> ChartCursor {
        self.bridge.borrow().cursor()
    }

    /// Destroy the chart and reset its cursor.
    pub fn destroy(mut self) {
        self.handle.destroy();
        self.bridge.borrow_mut().release();
    }
}

/// Render the elevation chart for `trail` into `region` and wire its
/// cursor to `popup`.  The new chart starts with no active sample.
pub fn attach_chart<E, P>(
    engine: &mut E,
    region: &RegionHandle,
    trail: &Trail,
    style: &ChartStyle,
    popup: &Rc<RefCell<P>>,
) -> ChartBinding<E::Handle, P>
where
    E: ChartEngine,
    P: MapPopup + 'static,
{
    let config = ChartConfig::elevation_profile(Arc::clone(&trail.profile_data), style);
    let mut handle = engine.render(region, config);

    let bridge = Rc::new(RefCell::new(ElevationBridge::new(
        trail.id,
        Arc::clone(&trail.profile_data),
        Rc::clone(popup),
    )));

    let listener = Rc::clone(&bridge);
    handle.on_sample_change(Box::new(move |event| {
        if let Err(e) = listener.borrow_mut().changed(event.index) {
            error!(error = %e, "chart cursor outside elevation profile");
        }
    }));

    ChartBinding { handle, bridge }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::popup::PopupState;

    fn samples() -> Arc<[ProfileSample]> {
        Arc::from(vec![
            ProfileSample {
                length: 0.0,
                value: 1200.0,
                point: GeoPoint::wgs84(7.1, 46.2, 1200.0),
            },
            ProfileSample {
                length: 1.0,
                value: 1300.0,
                point: GeoPoint::wgs84(7.11, 46.21, 1300.0),
            },
        ])
    }

    fn bridge() -> (ElevationBridge<PopupState>, Rc<RefCell<PopupState>>) {
        let popup = Rc::new(RefCell::new(PopupState::new()));
        (
            ElevationBridge::new(TrailId::new(1), samples(), Rc::clone(&popup)),
            popup,
        )
    }

    #[test]
    fn test_starts_inactive() {
        let (bridge, popup) = bridge();
        assert_eq!(bridge.cursor(), ChartCursor::NoActiveSample);
        assert!(!popup.borrow().is_open());
    }

    #[test]
    fn test_active_sample_opens_popup() {
        let (mut bridge, popup) = bridge();
        bridge.changed(Some(1)).unwrap();

        let state = popup.borrow();
        let content = state.content().unwrap();
        assert_eq!(content.title, "1300 m");
        assert_eq!(content.location, GeoPoint::wgs84(7.11, 46.21, 1300.0));
        assert_eq!(content.location.spatial_reference.wkid, 4326);
        assert!(!state.dock_enabled);
        assert_eq!(bridge.cursor(), ChartCursor::ActiveSample(1));
    }

    #[test]
    fn test_first_sample_is_a_real_sample() {
        let (mut bridge, popup) = bridge();
        bridge.changed(Some(0)).unwrap();
        assert_eq!(popup.borrow().content().unwrap().title, "1200 m");
    }

    #[test]
    fn test_no_index_closes_popup() {
        let (mut bridge, popup) = bridge();
        bridge.changed(Some(1)).unwrap();
        bridge.changed(None).unwrap();
        assert!(!popup.borrow().is_open());
        assert_eq!(bridge.cursor(), ChartCursor::NoActiveSample);
    }

    #[test]
    fn test_out_of_range_is_an_error_and_closes() {
        let (mut bridge, popup) = bridge();
        bridge.changed(Some(0)).unwrap();
        let err = bridge.changed(Some(2)).unwrap_err();
        assert_eq!(err, PanelError::SampleOutOfRange { index: 2, len: 2 });
        assert!(!popup.borrow().is_open());
        assert!(!bridge.cursor().is_active());
    }

    #[test]
    fn test_release_leaves_foreign_popup_alone() {
        let (mut bridge, popup) = bridge();
        popup
            .borrow_mut()
            .open("Trailhead".into(), GeoPoint::wgs84(7.0, 46.0, 900.0));
        bridge.release();
        assert!(popup.borrow().is_open());

        bridge.changed(Some(1)).unwrap();
        bridge.release();
        assert!(!popup.borrow().is_open());
    }
}
