use std::fs;
use std::path::{Path, PathBuf};

use tx_core::TestXmlError;
use walkdir::WalkDir;

use crate::error_map::{map_cli_source_path, map_cli_source_read, map_cli_source_scan, map_cli_write};

pub(crate) const CONFIGURATION_FILE_NAME: &str = "TestConfiguration.xml";

pub(crate) fn read_document(path: &Path) -> Result<String, TestXmlError> {
    if !path.exists() {
        return Err(TestXmlError::new(
            "CLI_SOURCE_NOT_FOUND",
            format!("Document not found: {}", path.display()),
        ));
    }
    if !path.is_file() {
        return Err(TestXmlError::new(
            "CLI_SOURCE_NOT_FILE",
            format!("Document path is not a file: {}", path.display()),
        ));
    }
    fs::read_to_string(path).map_err(map_cli_source_read)
}

pub(crate) fn read_optional(path: Option<&Path>) -> Result<Option<String>, TestXmlError> {
    path.map(read_document).transpose()
}

pub(crate) fn resolve_configuration(explicit: Option<&Path>, test_path: &Path) -> Option<PathBuf> {
    if let Some(explicit) = explicit {
        return Some(explicit.to_path_buf());
    }
    let sibling = test_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(CONFIGURATION_FILE_NAME);
    if sibling.is_file() {
        tracing::debug!(path = %sibling.display(), "using sibling configuration");
        Some(sibling)
    } else {
        None
    }
}

pub(crate) fn require_configuration(
    explicit: Option<&Path>,
    test_path: &Path,
) -> Result<PathBuf, TestXmlError> {
    resolve_configuration(explicit, test_path).ok_or_else(|| {
        TestXmlError::new(
            "CLI_CONFIG_REQUIRED",
            format!(
                "No --config given and no {CONFIGURATION_FILE_NAME} next to {}",
                test_path.display()
            ),
        )
    })
}

pub(crate) fn collect_xml_files(dir: &Path) -> Result<Vec<PathBuf>, TestXmlError> {
    if !dir.exists() {
        return Err(TestXmlError::new(
            "CLI_SOURCE_NOT_FOUND",
            format!("Directory not found: {}", dir.display()),
        ));
    }
    if !dir.is_dir() {
        return Err(TestXmlError::new(
            "CLI_SOURCE_NOT_DIR",
            format!("Path is not a directory: {}", dir.display()),
        ));
    }
    let root = dir.canonicalize().map_err(map_cli_source_path)?;

    let mut files = Vec::new();
    for entry in WalkDir::new(&root) {
        let entry = entry.map_err(map_cli_source_scan)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("xml") {
            continue;
        }
        if path.file_name().and_then(|name| name.to_str()) == Some(CONFIGURATION_FILE_NAME) {
            continue;
        }
        files.push(path.to_path_buf());
    }
    files.sort();
    Ok(files)
}

pub(crate) fn write_output(path: &Path, content: &str) -> Result<(), TestXmlError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(map_cli_write)?;
    }
    fs::write(path, content).map_err(map_cli_write)
}
