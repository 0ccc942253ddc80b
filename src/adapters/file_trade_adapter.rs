//! Trade file adapter: `<direction>, <canonical_id>, <intensity>, <timestamp>` per line.

use crate::domain::error::SentraderError;
use crate::domain::signal::TradeDirective;
use crate::ports::trade_port::TradePort;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct FileTradeAdapter {
    path: PathBuf,
}

impl FileTradeAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn format_directive(directive: &TradeDirective) -> String {
    format!(
        "{}, {}, {}, {}",
        directive.direction, directive.canonical_id, directive.intensity, directive.timestamp
    )
}

impl TradePort for FileTradeAdapter {
    fn write(&self, directives: &[TradeDirective]) -> Result<(), SentraderError> {
        let mut sorted: Vec<&TradeDirective> = directives.iter().collect();
        sorted.sort_by(|a, b| a.canonical_id.cmp(&b.canonical_id));

        let mut content = String::new();
        for directive in sorted {
            content.push_str(&format_directive(directive));
            content.push('\n');
        }

        fs::write(&self.path, content).map_err(|e| SentraderError::Persist {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        info!(path = %self.path.display(), directives = directives.len(), "trades written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signal::{Direction, Intensity};
    use tempfile::TempDir;

    fn directive(id: &str, direction: Direction, intensity: Intensity) -> TradeDirective {
        TradeDirective {
            canonical_id: id.into(),
            direction,
            intensity,
            timestamp: "2024-01-01T00:00:00".into(),
        }
    }

    #[test]
    fn formats_one_line() {
        let d = directive("NASDAQ: TSLA", Direction::Call, Intensity::Hard);
        assert_eq!(
            format_directive(&d),
            "call, NASDAQ: TSLA, hard, 2024-01-01T00:00:00"
        );
    }

    #[test]
    fn writes_sorted_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let adapter = FileTradeAdapter::new(dir.path().join(".app.trades"));
        fs::write(adapter.path(), "stale, line\n").unwrap();

        adapter
            .write(&[
                directive("NYSE: UAL", Direction::Put, Intensity::Soft),
                directive("NASDAQ: AMD", Direction::Call, Intensity::Soft),
            ])
            .unwrap();

        let content = fs::read_to_string(adapter.path()).unwrap();
        assert_eq!(
            content,
            "call, NASDAQ: AMD, soft, 2024-01-01T00:00:00\n\
             put, NYSE: UAL, soft, 2024-01-01T00:00:00\n"
        );
    }

    #[test]
    fn no_directives_truncates_file() {
        let dir = TempDir::new().unwrap();
        let adapter = FileTradeAdapter::new(dir.path().join(".app.trades"));
        fs::write(adapter.path(), "call, X, hard, t\n").unwrap();
        adapter.write(&[]).unwrap();
        assert_eq!(fs::read_to_string(adapter.path()).unwrap(), "");
    }
}
