//! Validated dataset and the shared dashboard state

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::models::MonthlyRecord;
use crate::source::SourceRef;
use crate::time::{Month, MonthRange};

/// Monthly records in strictly ascending month order
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<MonthlyRecord>,
}

impl Dataset {
    /// Validate and wrap a list of records
    pub fn from_records(records: Vec<MonthlyRecord>) -> CoreResult<Self> {
        if records.is_empty() {
            return Err(CoreError::EmptyDataset);
        }

        for pair in records.windows(2) {
            if pair[1].month <= pair[0].month {
                return Err(CoreError::UnorderedMonths {
                    previous: pair[0].month.key(),
                    month: pair[1].month.key(),
                });
            }
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[MonthlyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Month keys in order
    pub fn months(&self) -> Vec<Month> {
        self.records.iter().map(|r| r.month).collect()
    }

    pub fn first_month(&self) -> Option<Month> {
        self.records.first().map(|r| r.month)
    }

    pub fn last_month(&self) -> Option<Month> {
        self.records.last().map(|r| r.month)
    }

    /// Record of a given month
    pub fn record(&self, month: &Month) -> Option<&MonthlyRecord> {
        self.index_of(month).ok().map(|i| &self.records[i])
    }

    fn index_of(&self, month: &Month) -> CoreResult<usize> {
        self.records
            .binary_search_by(|r| r.month.cmp(month))
            .map_err(|_| CoreError::MonthNotFound { month: month.key() })
    }

    /// Whole dataset, first to last month
    pub fn full_range(&self) -> CoreResult<MonthRange> {
        match (self.first_month(), self.last_month()) {
            (Some(first), Some(last)) => Ok(MonthRange::new(first, last)),
            _ => Err(CoreError::EmptyDataset),
        }
    }

    /// Range from optional request parameters, defaulting to the full range
    pub fn resolve_range(&self, start: Option<&str>, end: Option<&str>) -> CoreResult<MonthRange> {
        let full = self.full_range()?;
        let parse = |value: Option<&str>, fallback: Month| -> CoreResult<Month> {
            match value.map(str::trim).filter(|v| !v.is_empty()) {
                Some(v) => Month::parse(v),
                None => Ok(fallback),
            }
        };
        Ok(MonthRange::new(parse(start, full.start)?, parse(end, full.end)?))
    }

    /// Records between the range's start and end months, inclusive.
    ///
    /// Empty when the start comes after the end. Both months must exist
    /// in the dataset.
    pub fn filter(&self, range: &MonthRange) -> CoreResult<&[MonthlyRecord]> {
        let start = self.index_of(&range.start)?;
        let end = self.index_of(&range.end)?;
        if start <= end {
            Ok(&self.records[start..=end])
        } else {
            Ok(&self.records[..0])
        }
    }
}

/// Loaded dataset plus the source it came from
pub struct Dashboard {
    source: SourceRef,
    dataset: Option<Dataset>,
    loaded_at: Option<DateTime<Utc>>,
}

impl Dashboard {
    pub fn new(source: SourceRef) -> Self {
        Self {
            source,
            dataset: None,
            loaded_at: None,
        }
    }

    /// Load (or replace) the dataset from the source
    pub async fn load(&mut self) -> CoreResult<()> {
        let records = self.source.load().await?;
        let dataset = Dataset::from_records(records)?;
        log::info!(
            "Loaded {} monthly records from {}",
            dataset.len(),
            self.source.describe()
        );
        self.dataset = Some(dataset);
        self.loaded_at = Some(Utc::now());
        Ok(())
    }

    /// Reload from the source; the previous dataset is kept on failure
    pub async fn reload(&mut self) -> CoreResult<()> {
        self.load().await.map_err(|e| {
            log::warn!("Reload failed, keeping previous dataset: {}", e);
            e
        })
    }

    pub fn dataset(&self) -> CoreResult<&Dataset> {
        self.dataset.as_ref().ok_or(CoreError::NotLoaded)
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }
}
