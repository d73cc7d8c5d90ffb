//! Discovery and loading of site documents.
//!
//! Documents are found anywhere below a base directory by file name and
//! loaded in path order, so runs are reproducible regardless of how the
//! filesystem lists entries.

use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::normalizer::normalize_document;
use super::schema::SiteDocument;
use crate::utils::config::SITE_DOCUMENT_FILE_NAME;
use crate::utils::error::LoadError;

/// Find every site document below `base_dir`
///
/// **Public** - first step of an aggregation run
///
/// # Returns
/// Matching paths, sorted
///
/// # Errors
/// * `LoadError::Discovery` - the base directory itself cannot be read
///
/// Unreadable subdirectories are skipped with a warning.
pub fn find_site_documents(base_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, LoadError> {
    let base_dir = base_dir.as_ref();
    debug!("Scanning {} for {}", base_dir.display(), SITE_DOCUMENT_FILE_NAME);

    let mut files = Vec::new();

    for entry in WalkDir::new(base_dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(LoadError::Discovery(e)),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if entry.file_type().is_file() && entry.file_name() == SITE_DOCUMENT_FILE_NAME {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Parse a site document from JSON text
///
/// `path` is only used to label errors.
pub fn parse_site_document(json: &str, path: &Path) -> Result<SiteDocument, LoadError> {
    let raw: serde_json::Value =
        serde_json::from_str(json).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    if !raw.get("cohort_groups").is_some_and(serde_json::Value::is_object) {
        return Err(LoadError::MissingCohortGroups {
            path: path.to_path_buf(),
        });
    }

    let mut document: SiteDocument =
        serde_json::from_value(raw).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    normalize_document(&mut document);
    Ok(document)
}

/// Read, parse and normalize one site document
///
/// # Errors
/// * `LoadError::Io` - file cannot be read
/// * `LoadError::Json` - invalid JSON or wrong shape
/// * `LoadError::MissingCohortGroups` - no `cohort_groups` object
pub fn load_site_document(path: impl AsRef<Path>) -> Result<SiteDocument, LoadError> {
    let path = path.as_ref();

    let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let document = parse_site_document(&json, path)?;

    debug!(
        "Loaded {} from {} ({} cohorts, generated {})",
        document.site_name,
        path.display(),
        document.cohort_groups.len(),
        document
            .generated_at()
            .map(|ts| ts.to_string())
            .unwrap_or_else(|| "at unknown time".to_string())
    );

    Ok(document)
}

/// Load all documents, failing on the first malformed one
pub fn load_site_documents(paths: &[PathBuf]) -> Result<Vec<SiteDocument>, LoadError> {
    let documents = paths
        .iter()
        .map(load_site_document)
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::new();
    for document in &documents {
        if !seen.insert(document.site_name.as_str()) {
            warn!(
                "Site name '{}' appears in more than one document; each keeps its own column",
                document.site_name
            );
        }
    }

    info!("Loaded {} site documents", documents.len());
    Ok(documents)
}
