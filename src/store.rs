// Data Store - the immutable in-memory SSBG table
//
// Loaded once at startup and shared read-only (`Arc<DataStore>`) with every
// request handler. There is no mutation API: all query results are new
// derived values.

use crate::error::{DashboardError, Result};
use crate::record::{GrantRecord, NumericField};
use crate::validation::{validate_batch, ValidationReport};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

/// Distinct values offered by the filter controls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub years: Vec<u16>,
    pub states: Vec<String>,
    pub service_categories: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Reject the table when any record breaks a total invariant
    pub strict_invariants: bool,
}

#[derive(Debug)]
pub struct DataStore {
    records: Vec<GrantRecord>,
    options: FilterOptions,
    report: ValidationReport,
}

impl DataStore {
    /// Read the cleaned CSV table.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, LoadOptions::default())
    }

    pub fn load_with(path: &Path, options: LoadOptions) -> Result<Self> {
        let file = File::open(path).map_err(|source| DashboardError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(file);

        let records = rdr
            .deserialize::<GrantRecord>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|source| DashboardError::Csv {
                path: path.to_path_buf(),
                source,
            })?;

        if records.is_empty() {
            return Err(DashboardError::EmptyDataset {
                path: path.to_path_buf(),
            });
        }

        let store = Self::from_records(records, options)?;
        let (min_year, max_year) = store.year_bounds();
        info!(
            path = %path.display(),
            records = store.len(),
            states = store.options.states.len(),
            service_categories = store.options.service_categories.len(),
            min_year,
            max_year,
            "loaded ssbg table"
        );
        Ok(store)
    }

    /// Build a store from records already in memory.
    pub fn from_records(records: Vec<GrantRecord>, options: LoadOptions) -> Result<Self> {
        check_column_totals(&records)?;
        let report = validate_batch(&records);

        if !report.is_clean() {
            if options.strict_invariants {
                return Err(DashboardError::InvariantViolation {
                    count: report.issues.len(),
                    first: report.issues[0].clone(),
                });
            }
            warn!(
                mismatches = report.issues.len(),
                first = %report.issues[0],
                "{}",
                report.summary()
            );
        }

        let options = FilterOptions {
            years: distinct(records.iter().map(|r| r.year)),
            states: distinct(records.iter().map(|r| r.state_name.clone())),
            service_categories: distinct(records.iter().map(|r| r.service_category.clone())),
        };

        Ok(DataStore {
            records,
            options,
            report,
        })
    }

    /// Read-only handle to every record, in file order.
    pub fn get_all(&self) -> &[GrantRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn filter_options(&self) -> &FilterOptions {
        &self.options
    }

    /// Earliest and latest fiscal year, (0, 0) for an empty store
    pub fn year_bounds(&self) -> (u16, u16) {
        match (self.options.years.first(), self.options.years.last()) {
            (Some(min), Some(max)) => (*min, *max),
            _ => (0, 0),
        }
    }

    pub fn has_state(&self, state_name: &str) -> bool {
        self.options.states.iter().any(|s| s == state_name)
    }

    /// Invariant check results from load time
    pub fn validation_report(&self) -> &ValidationReport {
        &self.report
    }
}

fn distinct<T: Ord>(values: impl Iterator<Item = T>) -> Vec<T> {
    values.collect::<BTreeSet<_>>().into_iter().collect()
}

/// Every query sums a subset of a column, so the whole column must fit in u64
fn check_column_totals(records: &[GrantRecord]) -> Result<()> {
    for field in NumericField::ALL {
        records
            .iter()
            .try_fold(0u64, |acc, r| acc.checked_add(r.value(field)))
            .ok_or(DashboardError::TotalOverflow {
                column: field.column(),
            })?;
    }
    Ok(())
}
