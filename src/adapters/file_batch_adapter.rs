//! Batch file adapter: one `<text>|<engagement>|<timestamp>` message per line.

use crate::domain::error::SentraderError;
use crate::ports::batch_port::BatchPort;
use std::fs;
use std::path::PathBuf;

pub struct FileBatchAdapter {
    path: PathBuf,
}

impl FileBatchAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl BatchPort for FileBatchAdapter {
    fn source_name(&self) -> String {
        self.path.display().to_string()
    }

    fn read_lines(&self) -> Result<Vec<String>, SentraderError> {
        let content =
            fs::read_to_string(&self.path).map_err(|e| SentraderError::UnreadableBatch {
                source_name: self.source_name(),
                reason: e.to_string(),
            })?;

        // `lines` drops "\n" and "\r\n" terminators.
        Ok(content.lines().map(str::to_string).collect())
    }
}
