//! JSON description of a dataset: the files to load and their formats.
//!
//! ```json
//! {
//!   "sources": [
//!     { "file": "people.nt" },
//!     { "file": "dump.bin", "format": "binary" }
//!   ]
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codec::Format;
use crate::errors::{Error, Result};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SourceConfig {
    pub file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
}

impl SourceConfig {
    /// The configured format, or the one implied by the file extension.
    pub fn resolved_format(&self) -> Result<Format> {
        self.format
            .or_else(|| Format::from_extension(&self.file))
            .ok_or_else(|| {
                Error::Config(format!(
                    "cannot tell the format of {}; set \"format\"",
                    self.file.display()
                ))
            })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DatasetConfig {
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

impl DatasetConfig {
    /// Reads a config file. Relative source paths are resolved against the
    /// directory holding the config.
    pub fn from_file(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut config: DatasetConfig = serde_json::from_reader(reader)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        if let Some(dir) = path.parent() {
            for source in &mut config.sources {
                if source.file.is_relative() {
                    source.file = dir.join(&source.file);
                }
            }
        }
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let mut w = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut w, self).map_err(|e| Error::Config(e.to_string()))?;
        w.flush()?;
        Ok(())
    }
}
