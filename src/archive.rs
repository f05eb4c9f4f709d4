use std::io::Read;

use flate2::read::GzDecoder;
use log::{debug, trace};
use tar::Archive;
use thiserror::Error;

use crate::model::metadata::ModuleMetadata;

pub const METADATA_FILE_NAME: &str = "metadata.json";

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("No metadata.json found in archive {archive}")]
    MissingMetadata { archive: String },
    #[error("Malformed metadata.json in archive {archive}: {reason}")]
    MalformedMetadata { archive: String, reason: String },
    #[error("Could not read archive {archive}: {source}")]
    Archive {
        archive: String,
        #[source]
        source: std::io::Error,
    },
}

/// Reads the module metadata out of a gzipped module tarball.
///
/// `archive` names the tarball in errors. When several entries end with
/// `metadata.json` (test fixtures often ship their own), the one closest to
/// the archive root is used.
pub fn extract(archive: &str, data: &[u8]) -> Result<ModuleMetadata, ExtractError> {
    let io_error = |source: std::io::Error| ExtractError::Archive {
        archive: archive.to_owned(),
        source,
    };

    let mut tarball = Archive::new(GzDecoder::new(data));
    let mut found: Option<(usize, String, Vec<u8>)> = None;

    for entry in tarball.entries().map_err(io_error)? {
        let mut entry = entry.map_err(io_error)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let path = entry.path().map_err(io_error)?.to_string_lossy().into_owned();
        if !path.ends_with(METADATA_FILE_NAME) {
            continue;
        }

        let depth = path.matches('/').count();
        if found.as_ref().is_some_and(|(best, _, _)| *best <= depth) {
            trace!("Ignoring nested {} in {}", path, archive);
            continue;
        }
        let mut content = Vec::new();
        entry.read_to_end(&mut content).map_err(io_error)?;
        found = Some((depth, path, content));
    }

    let (_, path, content) = found.ok_or_else(|| ExtractError::MissingMetadata {
        archive: archive.to_owned(),
    })?;
    debug!("Reading module metadata from {}:{}", archive, path);

    ModuleMetadata::from_slice(&content).map_err(|error| ExtractError::MalformedMetadata {
        archive: archive.to_owned(),
        reason: error.to_string(),
    })
}
