pub mod error;
pub mod trails;

use std::path::Path;

use tracing::{debug, info};

use crate::model::{DataFormat, TrailDirectory};
use crate::parser::error::ParseError;

/// A loaded trail directory plus any records that failed validation.
#[derive(Debug)]
pub struct LoadedTrails {
    pub directory: TrailDirectory,
    pub rejected: Vec<ParseError>,
}

/// Load the trail directory from a JSON or YAML file.
///
/// The format follows the file extension (`.yaml`/`.yml` → YAML, anything
/// else → JSON).  A file that can't be read or doesn't deserialize is an
/// error; individual records that fail validation are skipped and returned
/// in `rejected` so the caller can surface them.
pub fn load_trails(path: &Path) -> Result<LoadedTrails, ParseError> {
    if !path.exists() {
        return Err(ParseError::SourceNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| ParseError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let format = DataFormat::from_extension(path.extension().and_then(|e| e.to_str()));
    debug!(path = %path.display(), format = format.label(), "parsing trail data");

    let loaded = parse_trails_str(&content, format)?;
    info!(
        trails = loaded.directory.len(),
        rejected = loaded.rejected.len(),
        "loaded trail directory"
    );
    Ok(loaded)
}

/// Parse trail data already held in memory.
pub fn parse_trails_str(content: &str, format: DataFormat) -> Result<LoadedTrails, ParseError> {
    let parsed = trails::parse_trails_content(content, format)?;
    Ok(LoadedTrails {
        directory: TrailDirectory::new(parsed.trails),
        rejected: parsed.rejected,
    })
}
