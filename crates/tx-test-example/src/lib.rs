use std::path::{Path, PathBuf};

use walkdir::WalkDir;

pub const TEST_FILE: &str = "test.xml";
pub const CONFIGURATION_FILE: &str = "TestConfiguration.xml";
pub const TEST_SCHEMA_FILE: &str = "test-schema-1.0.xsd";
pub const CONFIGURATION_SCHEMA_FILE: &str = "test-configuration-schema.xsd";

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

pub fn samples_root() -> PathBuf {
    workspace_root().join("samples")
}

pub fn sample_path(name: &str) -> PathBuf {
    samples_root().join(name)
}

pub fn schema_path(name: &str) -> PathBuf {
    samples_root().join("schemas").join(name)
}

pub fn golden_path(name: &str) -> PathBuf {
    samples_root().join("golden").join(name)
}

pub fn sample_documents() -> Vec<PathBuf> {
    let root = samples_root();
    let mut documents = WalkDir::new(&root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|extension| extension == "xml"))
        .filter(|path| !is_under(path, &root.join("golden")))
        .collect::<Vec<_>>();
    documents.sort();
    documents
}

fn is_under(path: &Path, dir: &Path) -> bool {
    path.starts_with(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_root_points_to_workspace() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }

    #[test]
    fn samples_root_points_to_samples_directory() {
        assert!(samples_root().is_dir());
    }

    #[test]
    fn sample_paths_exist() {
        assert!(sample_path(TEST_FILE).is_file());
        assert!(sample_path(CONFIGURATION_FILE).is_file());
        assert!(schema_path(TEST_SCHEMA_FILE).is_file());
        assert!(schema_path(CONFIGURATION_SCHEMA_FILE).is_file());
    }

    #[test]
    fn golden_path_joins_golden_directory() {
        let path = golden_path("test.canonical.xml");
        assert!(path.ends_with("golden/test.canonical.xml"));
    }

    #[test]
    fn sample_documents_skip_golden_files() {
        let documents = sample_documents();
        assert!(documents.iter().any(|path| path.ends_with(TEST_FILE)));
        assert!(documents
            .iter()
            .all(|path| !path.components().any(|part| part.as_os_str() == "golden")));
    }
}
