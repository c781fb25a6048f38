use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Trail status (integer code in the source data)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TrailStatus {
    Closed,
    Open,
    /// Any code outside the two-entry status table.  The raw code is kept
    /// so it can be reported.
    Unknown(i64),
}

impl TrailStatus {
    /// Map a raw status code.  Never fails: codes outside {0, 1} become
    /// `Unknown`.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Closed,
            1 => Self::Open,
            other => Self::Unknown(other),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Closed => "Closed",
            Self::Open => "Open",
            Self::Unknown(_) => "Unknown",
        }
    }

    /// Font Awesome icon class shown next to the label.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Closed => "fa fa-calendar-times-o",
            Self::Open => "fa fa-calendar-check-o",
            Self::Unknown(_) => "fa fa-question-circle-o",
        }
    }

    pub fn is_open(self) -> bool {
        self == Self::Open
    }
}

impl fmt::Display for TrailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for TrailStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let code = i64::deserialize(deserializer)?;
        Ok(TrailStatus::from_code(code))
    }
}

// ---------------------------------------------------------------------------
// Data format of a trail file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataFormat {
    #[default]
    Json,
    Yaml,
}

impl DataFormat {
    /// Pick a format from a file extension, defaulting to JSON.
    pub fn from_extension(ext: Option<&str>) -> Self {
        match ext.map(|e| e.to_ascii_lowercase()).as_deref() {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}
