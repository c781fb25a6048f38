//! Map popup: a location-anchored overlay on the map view.

use serde::Serialize;

use crate::model::GeoPoint;

pub trait MapPopup {
    /// Allow or forbid the popup docking to a corner of the view instead of
    /// anchoring at its location.
    fn set_dock_enabled(&mut self, enabled: bool);

    fn open(&mut self, title: String, location: GeoPoint);

    fn close(&mut self);

    fn is_open(&self) -> bool;
}

/// Content of an open popup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupContent {
    pub title: String,
    pub location: GeoPoint,
}

/// Plain popup model: remembers what is shown and where.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupState {
    pub dock_enabled: bool,
    pub content: Option<PopupContent>,
}

impl Default for PopupState {
    fn default() -> Self {
        Self {
            dock_enabled: true,
            content: None,
        }
    }
}

impl PopupState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> Option<&PopupContent> {
        self.content.as_ref()
    }
}

impl MapPopup for PopupState {
    fn set_dock_enabled(&mut self, enabled: bool) {
        self.dock_enabled = enabled;
    }

    fn open(&mut self, title: String, location: GeoPoint) {
        self.content = Some(PopupContent { title, location });
    }

    fn close(&mut self) {
        self.content = None;
    }

    fn is_open(&self) -> bool {
        self.content.is_some()
    }
}
