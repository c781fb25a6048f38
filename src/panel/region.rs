//! Panel regions: the four named content slots the controller owns.
//!
//! Regions are plain shared cells.  A host (terminal UI, headless renderer,
//! test) creates them, exposes them through [`RegionHost`], and reads them
//! back to draw.  The controller only ever writes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::panel::chart::ChartConfig;
use crate::panel::error::PanelError;
use crate::panel::infograph::Infograph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionId {
    Title,
    Infograph,
    Description,
    ElevationProfile,
}

impl RegionId {
    pub const ALL: [RegionId; 4] = [
        Self::Title,
        Self::Infograph,
        Self::Description,
        Self::ElevationProfile,
    ];

    /// Stable element identifier of the region.
    pub fn element_id(self) -> &'static str {
        match self {
            Self::Title => "detailTitle",
            Self::Infograph => "detailInfograph",
            Self::Description => "detailDescription",
            Self::ElevationProfile => "detailElevationProfile",
        }
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

/// What a region currently holds.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "lowercase")]
pub enum RegionContent {
    #[default]
    Empty,
    /// Plain text, never interpreted as markup.
    Text(String),
    /// Trusted markup fragment.
    Markup(String),
    Infograph(Infograph),
    Chart(ChartConfig),
}

impl RegionContent {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Markup form for hosts that render HTML.  Plain text and charts have
    /// none.
    pub fn markup(&self) -> Option<String> {
        match self {
            Self::Markup(markup) => Some(markup.clone()),
            Self::Infograph(graph) => Some(graph.markup()),
            _ => None,
        }
    }
}

/// Shared handle to one region's content.
#[derive(Debug, Clone, Default)]
pub struct RegionHandle(Rc<RefCell<RegionContent>>);

impl RegionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all content.
    pub fn empty(&self) {
        self.replace(RegionContent::Empty);
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.replace(RegionContent::Text(text.into()));
    }

    pub fn set_markup(&self, markup: impl Into<String>) {
        self.replace(RegionContent::Markup(markup.into()));
    }

    pub fn set_infograph(&self, infograph: Infograph) {
        self.replace(RegionContent::Infograph(infograph));
    }

    pub fn set_chart(&self, config: ChartConfig) {
        self.replace(RegionContent::Chart(config));
    }

    pub fn replace(&self, content: RegionContent) {
        *self.0.borrow_mut() = content;
    }

    /// Copy of the current content.
    pub fn content(&self) -> RegionContent {
        self.0.borrow().clone()
    }

    /// Run `f` against the content without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&RegionContent) -> R) -> R {
        f(&self.0.borrow())
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

/// Anything that can hand out regions by id.
pub trait RegionHost {
    fn region(&self, id: RegionId) -> Option<RegionHandle>;
}

/// In-memory region host.
#[derive(Debug, Clone, Default)]
pub struct PanelSurface {
    regions: HashMap<RegionId, RegionHandle>,
}

impl PanelSurface {
    /// Surface with no regions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface holding all four panel regions.
    pub fn complete() -> Self {
        let mut surface = Self::new();
        for id in RegionId::ALL {
            surface.insert(id);
        }
        surface
    }

    pub fn insert(&mut self, id: RegionId) -> RegionHandle {
        self.regions.entry(id).or_default().clone()
    }

    pub fn remove(&mut self, id: RegionId) -> Option<RegionHandle> {
        self.regions.remove(&id)
    }
}

impl RegionHost for PanelSurface {
    fn region(&self, id: RegionId) -> Option<RegionHandle> {
        self.regions.get(&id).cloned()
    }
}

/// The four regions the controller writes to, located up front.
#[derive(Debug, Clone)]
pub struct PanelRegions {
    pub title: RegionHandle,
    pub infograph: RegionHandle,
    pub description: RegionHandle,
    pub elevation_profile: RegionHandle,
}

impl PanelRegions {
    /// Locate every region, failing on the first one missing.
    pub fn locate(host: &impl RegionHost) -> Result<Self, PanelError> {
        let find = |id| host.region(id).ok_or(PanelError::MissingRegion(id));
        Ok(Self {
            title: find(RegionId::Title)?,
            infograph: find(RegionId::Infograph)?,
            description: find(RegionId::Description)?,
            elevation_profile: find(RegionId::ElevationProfile)?,
        })
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        PanelSnapshot {
            title: self.title.content(),
            infograph: self.infograph.content(),
            description: self.description.content(),
            elevation_profile: self.elevation_profile.content(),
        }
    }
}

/// Serializable copy of all four regions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSnapshot {
    pub title: RegionContent,
    pub infograph: RegionContent,
    pub description: RegionContent,
    pub elevation_profile: RegionContent,
}

impl PanelSnapshot {
    /// Canonical JSON form, for byte-level comparison.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
