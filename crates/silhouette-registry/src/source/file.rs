use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::TemplateSource;
use crate::composition::DiscoveredTemplate;
use crate::descriptor::{Provenance, TemplateHandle};
use crate::error::{RegistryError, Result};

/// File-based source walking one feature directory
///
/// Every file below the root is reported with its path relative to the
/// root, `/`-separated. Entries are visited in name order so enumeration is
/// stable across platforms.
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    feature: String,
    provenance: Provenance,
    root: PathBuf,
}

impl FileSystemSource {
    /// Create a new file source for the feature rooted at `root`
    pub fn new(feature: impl Into<String>, provenance: Provenance, root: impl AsRef<Path>) -> Self {
        Self {
            feature: feature.into(),
            provenance,
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists every file below the root, depth first in name order
    async fn list_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir)
                .await
                .map_err(|e| RegistryError::source(dir.display().to_string(), e))?;

            let mut children = Vec::new();
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| RegistryError::source(dir.display().to_string(), e))?
            {
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| RegistryError::source(entry.path().display().to_string(), e))?;
                children.push((entry.path(), file_type.is_dir()));
            }
            children.sort();

            let mut subdirs = Vec::new();
            for (path, is_dir) in children {
                if is_dir {
                    subdirs.push(path);
                } else {
                    files.push(path);
                }
            }
            // reversed so the first subdirectory is walked next
            pending.extend(subdirs.into_iter().rev());
        }

        Ok(files)
    }
}

#[async_trait]
impl TemplateSource for FileSystemSource {
    fn feature(&self) -> &str {
        &self.feature
    }

    fn provenance(&self) -> Provenance {
        self.provenance
    }

    async fn discover(&self) -> Result<Vec<DiscoveredTemplate>> {
        let files = self.list_files().await?;

        let mut templates = Vec::with_capacity(files.len());
        for file in files {
            let Ok(relative) = file.strip_prefix(&self.root) else {
                continue;
            };
            let Some(relative) = relative.to_str() else {
                tracing::warn!(path = %file.display(), "skipping template path that is not valid UTF-8");
                continue;
            };
            templates.push(DiscoveredTemplate {
                feature: self.feature.clone(),
                path: relative.replace('\\', "/"),
                provenance: self.provenance,
                handle: TemplateHandle::new(file.display().to_string()),
            });
        }

        tracing::debug!(
            feature = %self.feature,
            count = templates.len(),
            "discovered template files"
        );
        Ok(templates)
    }
}
