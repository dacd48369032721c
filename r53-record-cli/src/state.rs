//! 本地文件：记录声明、收敛参数与持久化状态

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use r53_record_core::{RecordConfig, RecordState, SyncSettings};

/// Read a JSON record declaration.
pub fn load_config(path: &Path) -> Result<RecordConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read record config {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid record config {}", path.display()))
}

/// Read convergence settings; defaults when no file is given.
pub fn load_settings(path: Option<&Path>) -> Result<SyncSettings> {
    let Some(path) = path else {
        return Ok(SyncSettings::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid settings {}", path.display()))
}

/// 单条记录的状态文件
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when the file does not exist.
    pub fn load(&self) -> Result<Option<RecordState>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read state {}", self.path.display()));
            }
        };
        let state = serde_json::from_str(&raw)
            .with_context(|| format!("Corrupt state file {}", self.path.display()))?;
        Ok(Some(state))
    }

    /// Like [`Self::load`], but a missing file is an error.
    pub fn require(&self) -> Result<RecordState> {
        self.load()?.with_context(|| {
            format!(
                "No state at {}; run `apply` or `import` first",
                self.path.display()
            )
        })
    }

    /// 先写临时文件再改名，避免留下半截状态
    pub fn save(&self, state: &RecordState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("Failed to write state {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to write state {}", self.path.display()))?;
        Ok(())
    }

    /// Remove the state file; a missing file is fine.
    pub fn remove(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to remove state {}", self.path.display()))
            }
        }
    }
}
