//! Order sources: turn export files into validated `Order` records

mod csv_rows;
mod json_orders;
pub mod validate;

pub use csv_rows::CsvOrderSource;
pub use json_orders::JsonOrderSource;
pub use validate::parse_date_ydm;

use crate::types::{Order, OrderStatsError, Result};
use std::path::Path;

/// Trait for reading orders from one export format
pub trait OrderSource {
    /// Source identifier (e.g., "csv")
    fn name(&self) -> &str;

    /// File extensions handled by this source, lowercase and without the dot
    fn extensions(&self) -> &[&str];

    /// Parse already-loaded file content
    fn parse_str(&self, content: &str) -> Result<Vec<Order>>;

    /// Read and parse a file
    fn parse_file(&self, path: &Path) -> Result<Vec<Order>> {
        let content = std::fs::read_to_string(path)?;
        self.parse_str(&content)
    }
}

/// Input format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    /// Pick by file extension
    #[default]
    Auto,
    /// Flat order-line rows
    Csv,
    /// Nested order records
    Json,
}

/// Registry of all available order sources
pub struct SourceRegistry {
    sources: Vec<Box<dyn OrderSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: vec![Box::new(CsvOrderSource::new()), Box::new(JsonOrderSource::new())],
        }
    }

    pub fn sources(&self) -> &[Box<dyn OrderSource>] {
        &self.sources
    }

    pub fn get(&self, name: &str) -> Option<&dyn OrderSource> {
        self.sources
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.as_ref())
    }

    /// Pick the source for `path`, by explicit format or by extension
    pub fn for_path(&self, path: &Path, format: InputFormat) -> Result<&dyn OrderSource> {
        let name = match format {
            InputFormat::Csv => Some("csv"),
            InputFormat::Json => Some("json"),
            InputFormat::Auto => None,
        };
        if let Some(name) = name {
            return self
                .get(name)
                .ok_or_else(|| OrderStatsError::UnsupportedFormat(name.to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        self.sources
            .iter()
            .find(|s| s.extensions().contains(&ext.as_str()))
            .map(|s| s.as_ref())
            .ok_or_else(|| OrderStatsError::UnsupportedFormat(path.display().to_string()))
    }

    /// Load and validate all orders from `path`
    pub fn load(&self, path: &Path, format: InputFormat) -> Result<Vec<Order>> {
        let source = self.for_path(path, format)?;
        tracing::debug!(source = source.name(), path = %path.display(), "Reading orders");
        source.parse_file(path)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
