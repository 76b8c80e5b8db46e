use anyhow::{Context, Result};
use pctx_core::ContextStore;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A throwaway project root seeded with context files
pub struct TestWorkspace {
    root: TempDir,
}

impl TestWorkspace {
    /// Project root holding the given files, keyed by relative path
    pub fn with_files(files: HashMap<String, Vec<u8>>) -> Result<Self> {
        let workspace = Self {
            root: TempDir::new().context("Failed to create project root")?,
        };
        for (path, content) in files {
            workspace.write_file(&path, &content)?;
        }
        Ok(workspace)
    }

    /// Project root seeded from the flat `fixtures/<name>` directory
    pub fn from_fixture(name: &str) -> Result<Self> {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join(name);
        let mut files = HashMap::new();
        for entry in
            fs::read_dir(&dir).with_context(|| format!("Fixture not found: {}", dir.display()))?
        {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            files.insert(file_name, fs::read(entry.path())?);
        }
        Self::with_files(files)
    }

    pub fn open_store(&self) -> Result<ContextStore> {
        Ok(ContextStore::open(self.root.path())?)
    }

    /// Writes a file under the root, creating `archive/` and the like on demand
    pub fn write_file(&self, path: &str, content: &[u8]) -> Result<()> {
        let full_path = self.root.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full_path, content).with_context(|| format!("Failed to write {}", path))
    }

    pub fn read_string(&self, path: &str) -> Result<String> {
        fs::read_to_string(self.root.path().join(path))
            .with_context(|| format!("Failed to read {}", path))
    }

    pub fn file_exists(&self, path: &str) -> bool {
        self.root.path().join(path).exists()
    }
}
