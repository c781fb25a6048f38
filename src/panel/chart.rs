//! Elevation chart: declarative configuration plus the narrow engine
//! interface the panel renders through.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::model::ProfileSample;
use crate::panel::region::RegionHandle;

pub const GRAPH_ID: &str = "g1";
pub const CATEGORY_FIELD: &str = "length";
pub const VALUE_FIELD: &str = "value";
pub const BALLOON_TEXT: &str = "Distance: <b>[[category]] km</b><br>Elevation:<b>[[value]] m</b>";

// ---------------------------------------------------------------------------
// Styling
// ---------------------------------------------------------------------------

/// Visual parameters of the elevation chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub theme: String,
    pub text_color: String,
    pub font_family: String,
    /// Colour used for the selected trail, on the map and in the chart.
    pub selected_trail_color: String,
    pub min_elevation: f64,
    pub max_elevation: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            theme: "light".into(),
            text_color: "#4b4b4b".into(),
            font_family: "Open Sans Condensed".into(),
            selected_trail_color: "#e0533e".into(),
            min_elevation: 1000.0,
            max_elevation: 3500.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Declarative configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: &'static str,
    pub theme: String,
    pub data_provider: Arc<[ProfileSample]>,
    pub color: String,
    pub font_family: String,
    pub balloon: BalloonConfig,
    pub graphs: Vec<GraphConfig>,
    pub chart_cursor: CursorConfig,
    pub category_field: &'static str,
    pub category_axis: CategoryAxisConfig,
    pub value_axes: Vec<ValueAxisConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalloonConfig {
    pub border_alpha: f64,
    pub fill_alpha: f64,
    pub fill_color: String,
    pub shadow_alpha: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphConfig {
    pub id: &'static str,
    pub balloon_text: &'static str,
    pub fill_alphas: f64,
    pub bullet_alpha: f64,
    pub line_color: String,
    pub line_thickness: u32,
    pub value_field: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorConfig {
    pub limit_to_graph: &'static str,
    pub category_balloon_enabled: bool,
    pub zoomable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAxisConfig {
    pub grid_thickness: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueAxisConfig {
    pub strict_min_max: bool,
    pub auto_grid_count: bool,
    pub minimum: f64,
    pub maximum: f64,
}

impl ChartConfig {
    /// Filled-line elevation profile over `samples`, one graph, fixed
    /// vertical band.
    pub fn elevation_profile(samples: Arc<[ProfileSample]>, style: &ChartStyle) -> Self {
        Self {
            chart_type: "serial",
            theme: style.theme.clone(),
            data_provider: samples,
            color: style.text_color.clone(),
            font_family: style.font_family.clone(),
            balloon: BalloonConfig {
                border_alpha: 0.0,
                fill_alpha: 0.8,
                fill_color: style.selected_trail_color.clone(),
                shadow_alpha: 0.0,
            },
            graphs: vec![GraphConfig {
                id: GRAPH_ID,
                balloon_text: BALLOON_TEXT,
                fill_alphas: 0.2,
                bullet_alpha: 0.0,
                line_color: style.selected_trail_color.clone(),
                line_thickness: 1,
                value_field: VALUE_FIELD,
            }],
            chart_cursor: CursorConfig {
                limit_to_graph: GRAPH_ID,
                category_balloon_enabled: false,
                zoomable: false,
            },
            category_field: CATEGORY_FIELD,
            category_axis: CategoryAxisConfig { grid_thickness: 0 },
            value_axes: vec![ValueAxisConfig {
                strict_min_max: true,
                auto_grid_count: false,
                minimum: style.min_elevation,
                maximum: style.max_elevation,
            }],
        }
    }

    /// Number of points in the (single) series.
    pub fn series_len(&self) -> usize {
        self.data_provider.len()
    }

    /// Vertical axis band.
    pub fn value_bounds(&self) -> (f64, f64) {
        self.value_axes
            .first()
            .map(|axis| (axis.minimum, axis.maximum))
            .unwrap_or((0.0, 0.0))
    }

    /// First and last category value.
    pub fn category_bounds(&self) -> (f64, f64) {
        let first = self.data_provider.first().map_or(0.0, |s| s.length);
        let last = self.data_provider.last().map_or(0.0, |s| s.length);
        (first, last)
    }

    /// Tooltip text for the sample at `index`, with the template's
    /// placeholders filled in.
    pub fn balloon_text(&self, index: usize) -> Option<String> {
        let sample = self.data_provider.get(index)?;
        let template = self.graphs.first()?.balloon_text;
        Some(
            template
                .replace("[[category]]", &sample.length.to_string())
                .replace("[[value]]", &sample.value.to_string()),
        )
    }
}

// ---------------------------------------------------------------------------
// Engine interface
// ---------------------------------------------------------------------------

/// A chart "changed" notification: the cursor moved onto a sample, or off
/// the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartChanged {
    pub index: Option<usize>,
}

pub type ChangedListener = Box<dyn FnMut(ChartChanged)>;

/// Something that can draw a chart into a region.
pub trait ChartEngine {
    type Handle: ChartHandle;

    fn render(&mut self, region: &RegionHandle, config: ChartConfig) -> Self::Handle;
}

/// A live chart instance.
pub trait ChartHandle {
    /// Register a listener for cursor changes on the configured graph.
    fn on_sample_change(&mut self, listener: ChangedListener);

    /// Tear the chart down.  No further notifications are delivered.
    fn destroy(&mut self);
}

// ---------------------------------------------------------------------------
// ChartRuntime: in-process engine
// ---------------------------------------------------------------------------

struct ChartInstance {
    serial: u64,
    len: usize,
    cursor: Option<usize>,
    listeners: Vec<ChangedListener>,
    destroyed: bool,
}

/// In-process chart engine.  Stores the configuration in the target region
/// and lets the host move the cursor of the most recently rendered chart.
#[derive(Default)]
pub struct ChartRuntime {
    rendered: u64,
    active: Option<Rc<RefCell<ChartInstance>>>,
}

/// Handle to a chart created by [`ChartRuntime`].
pub struct RuntimeChart {
    instance: Rc<RefCell<ChartInstance>>,
    region: RegionHandle,
}

impl ChartRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of charts rendered so far.
    pub fn rendered(&self) -> u64 {
        self.rendered
    }

    fn live(&self) -> Option<&Rc<RefCell<ChartInstance>>> {
        self.active.as_ref().filter(|i| !i.borrow().destroyed)
    }

    /// Whether a chart is currently on screen.
    pub fn has_chart(&self) -> bool {
        self.live().is_some()
    }

    /// Active sample of the live chart.
    pub fn cursor(&self) -> Option<usize> {
        self.live().and_then(|i| i.borrow().cursor)
    }

    pub fn series_len(&self) -> usize {
        self.live().map_or(0, |i| i.borrow().len)
    }

    /// Move the cursor of the live chart and notify its listeners.  An
    /// index past the last sample means the cursor left the chart.
    /// Returns whether a notification was sent.
    pub fn set_cursor(&mut self, index: Option<usize>) -> bool {
        let Some(instance) = self.live().cloned() else {
            return false;
        };

        let (serial, mut listeners, index) = {
            let mut inst = instance.borrow_mut();
            let index = index.filter(|&i| i < inst.len);
            if inst.cursor == index {
                return false;
            }
            inst.cursor = index;
            (inst.serial, std::mem::take(&mut inst.listeners), index)
        };

        debug!(chart = serial, ?index, "chart cursor changed");
        let event = ChartChanged { index };
        for listener in listeners.iter_mut() {
            listener(event);
        }

        let mut inst = instance.borrow_mut();
        if !inst.destroyed {
            listeners.append(&mut inst.listeners);
            inst.listeners = listeners;
        }
        true
    }

    /// Step the cursor by `delta` samples, entering from the nearest end
    /// when no sample is active.
    pub fn step_cursor(&mut self, delta: isize) -> bool {
        let len = self.series_len();
        if len == 0 {
            return false;
        }
        let next = match self.cursor() {
            Some(current) => current.saturating_add_signed(delta).min(len - 1),
            None if delta < 0 => len - 1,
            None => 0,
        };
        self.set_cursor(Some(next))
    }
}

impl ChartEngine for ChartRuntime {
    type Handle = RuntimeChart;

    fn render(&mut self, region: &RegionHandle, config: ChartConfig) -> RuntimeChart {
        self.rendered += 1;
        let instance = Rc::new(RefCell::new(ChartInstance {
            serial: self.rendered,
            len: config.series_len(),
            cursor: None,
            listeners: Vec::new(),
            destroyed: false,
        }));
        debug!(chart = self.rendered, samples = config.series_len(), "chart rendered");
        region.set_chart(config);
        self.active = Some(Rc::clone(&instance));
        RuntimeChart {
            instance,
            region: region.clone(),
        }
    }
}

impl ChartHandle for RuntimeChart {
    fn on_sample_change(&mut self, listener: ChangedListener) {
        let mut inst = self.instance.borrow_mut();
        if !inst.destroyed {
            inst.listeners.push(listener);
        }
    }

    fn destroy(&mut self) {
        let mut inst = self.instance.borrow_mut();
        if inst.destroyed {
            return;
        }
        inst.destroyed = true;
        inst.cursor = None;
        inst.listeners.clear();
        self.region.empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GeoPoint;
    use crate::panel::region::RegionContent;

    fn samples() -> Arc<[ProfileSample]> {
        Arc::from(vec![
            ProfileSample {
                length: 0.0,
                value: 1200.0,
                point: GeoPoint::wgs84(7.1, 46.2, 1200.0),
            },
            ProfileSample {
                length: 1.5,
                value: 1300.0,
                point: GeoPoint::wgs84(7.11, 46.21, 1300.0),
            },
        ])
    }

    #[test]
    fn test_config_shape() {
        let config = ChartConfig::elevation_profile(samples(), &ChartStyle::default());
        assert_eq!(config.series_len(), 2);
        assert_eq!(config.value_bounds(), (1000.0, 3500.0));
        assert_eq!(config.category_field, "length");
        assert_eq!(config.graphs.len(), 1);
        assert_eq!(config.graphs[0].value_field, "value");
        assert_eq!(config.graphs[0].bullet_alpha, 0.0);
        assert_eq!(config.chart_cursor.limit_to_graph, config.graphs[0].id);
        assert!(!config.chart_cursor.zoomable);
    }

    #[test]
    fn test_config_serializes_camel_case() {
        let config = ChartConfig::elevation_profile(samples(), &ChartStyle::default());
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["type"], "serial");
        assert_eq!(json["categoryField"], "length");
        assert_eq!(json["valueAxes"][0]["strictMinMax"], true);
        assert_eq!(json["valueAxes"][0]["minimum"], 1000.0);
        assert_eq!(json["chartCursor"]["limitToGraph"], "g1");
        assert_eq!(json["dataProvider"][1]["point"][0], 7.11);
    }

    #[test]
    fn test_balloon_text_interpolates() {
        let config = ChartConfig::elevation_profile(samples(), &ChartStyle::default());
        assert_eq!(
            config.balloon_text(1).unwrap(),
            "Distance: <b>1.5 km</b><br>Elevation:<b>1300 m</b>"
        );
        assert!(config.balloon_text(2).is_none());
    }

    #[test]
    fn test_runtime_notifies_listeners() {
        let mut runtime = ChartRuntime::new();
        let region = RegionHandle::new();
        let config = ChartConfig::elevation_profile(samples(), &ChartStyle::default());
        let mut chart = runtime.render(&region, config);
        assert!(matches!(region.content(), RegionContent::Chart(_)));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        chart.on_sample_change(Box::new(move |e| sink.borrow_mut().push(e.index)));

        assert!(runtime.set_cursor(Some(1)));
        assert!(!runtime.set_cursor(Some(1)));
        assert!(runtime.set_cursor(None));
        assert_eq!(*seen.borrow(), vec![Some(1), None]);
    }

    #[test]
    fn test_runtime_out_of_range_leaves_chart() {
        let mut runtime = ChartRuntime::new();
        let region = RegionHandle::new();
        let _chart = runtime.render(
            &region,
            ChartConfig::elevation_profile(samples(), &ChartStyle::default()),
        );
        runtime.set_cursor(Some(0));
        runtime.set_cursor(Some(9));
        assert_eq!(runtime.cursor(), None);
    }

    #[test]
    fn test_step_cursor_clamps() {
        let mut runtime = ChartRuntime::new();
        let region = RegionHandle::new();
        let _chart = runtime.render(
            &region,
            ChartConfig::elevation_profile(samples(), &ChartStyle::default()),
        );
        runtime.step_cursor(-1);
        assert_eq!(runtime.cursor(), Some(1));
        runtime.step_cursor(5);
        assert_eq!(runtime.cursor(), Some(1));
        runtime.step_cursor(-3);
        assert_eq!(runtime.cursor(), Some(0));
    }

    #[test]
    fn test_destroy_silences_chart() {
        let mut runtime = ChartRuntime::new();
        let region = RegionHandle::new();
        let mut chart = runtime.render(
            &region,
            ChartConfig::elevation_profile(samples(), &ChartStyle::default()),
        );
        let hits = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&hits);
        chart.on_sample_change(Box::new(move |_| *sink.borrow_mut() += 1));

        chart.destroy();
        assert!(region.is_empty());
        assert!(!runtime.has_chart());
        assert!(!runtime.set_cursor(Some(0)));
        assert_eq!(*hits.borrow(), 0);
    }
}
