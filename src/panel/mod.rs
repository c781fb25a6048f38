//! The trail detail panel: regions, summary renderer, elevation chart,
//! chart → map bridge, and the controller tying them to the selection.

pub mod bridge;
pub mod chart;
pub mod controller;
pub mod error;
pub mod infograph;
pub mod popup;
pub mod region;

pub use bridge::{attach_chart, ChartBinding, ChartCursor, ElevationBridge};
pub use chart::{
    ChangedListener, ChartChanged, ChartConfig, ChartEngine, ChartHandle, ChartRuntime, ChartStyle,
    RuntimeChart,
};
pub use controller::{PanelController, PanelState, PLACEHOLDER};
pub use error::PanelError;
pub use infograph::{infograph, Infograph, InfographFact};
pub use popup::{MapPopup, PopupContent, PopupState};
pub use region::{
    PanelRegions, PanelSnapshot, PanelSurface, RegionContent, RegionHandle, RegionHost, RegionId,
};
