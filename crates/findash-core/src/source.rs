//! Where monthly records come from

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::CoreResult;
use crate::models::MonthlyRecord;

/// Bundled twelve-month sample dataset
pub const SAMPLE_DATA: &str = include_str!("../data/sample_data.json");

/// Record source reference type
pub type SourceRef = Arc<dyn RecordSource>;

/// A provider of monthly records
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Load every record, in file order
    async fn load(&self) -> CoreResult<Vec<MonthlyRecord>>;

    /// Short description for logs and the settings page
    fn describe(&self) -> String;
}

/// JSON array of records on disk
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    async fn load(&self) -> CoreResult<Vec<MonthlyRecord>> {
        log::debug!("Reading dataset from {:?}", self.path);
        let content = tokio::fs::read_to_string(&self.path).await?;
        let records: Vec<MonthlyRecord> = serde_json::from_str(&content)?;
        Ok(records)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Sample data compiled into the binary
#[derive(Debug, Clone, Default)]
pub struct SampleSource;

#[async_trait]
impl RecordSource for SampleSource {
    async fn load(&self) -> CoreResult<Vec<MonthlyRecord>> {
        Ok(serde_json::from_str(SAMPLE_DATA)?)
    }

    fn describe(&self) -> String {
        "bundled sample data".to_string()
    }
}
