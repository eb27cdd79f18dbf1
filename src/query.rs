// Query Layer - filters and aggregations over the SSBG table
//
// Every operation is pure: it borrows records from the store and returns a
// new derived value. Empty inputs produce empty outputs (or zero sums),
// never errors.

use crate::record::{GrantRecord, Metric, NumericField};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// RECORD SET
// ============================================================================

/// A filtered, borrowed view of the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet<'a> {
    records: Vec<&'a GrantRecord>,
}

impl<'a> RecordSet<'a> {
    pub fn new(records: &'a [GrantRecord]) -> Self {
        RecordSet {
            records: records.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a GrantRecord> + '_ {
        self.records.iter().copied()
    }

    fn retain(&self, keep: impl Fn(&GrantRecord) -> bool) -> RecordSet<'a> {
        RecordSet {
            records: self.iter().filter(|r| keep(r)).collect(),
        }
    }

    // ------------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------------

    /// Records with `min_year <= year <= max_year`; an inverted range is empty.
    pub fn filter_by_years(&self, min_year: u16, max_year: u16) -> RecordSet<'a> {
        self.retain(|r| r.year >= min_year && r.year <= max_year)
    }

    pub fn filter_by_year(&self, year: u16) -> RecordSet<'a> {
        self.filter_by_years(year, year)
    }

    /// Records whose category is in `categories`; an empty set selects nothing.
    pub fn filter_by_categories(&self, categories: &BTreeSet<String>) -> RecordSet<'a> {
        self.retain(|r| categories.contains(&r.service_category))
    }

    pub fn filter_by_state(&self, state_name: &str) -> RecordSet<'a> {
        self.retain(|r| r.state_name == state_name)
    }

    // ------------------------------------------------------------------------
    // Aggregations
    // ------------------------------------------------------------------------

    /// Saturates at `u64::MAX`; a loaded store never gets there.
    pub fn sum(&self, field: NumericField) -> u64 {
        self.iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.value(field)))
    }

    /// (year, sum) pairs, strictly ascending by year.
    pub fn aggregate_by_year(&self, field: NumericField) -> Vec<(u16, u64)> {
        group_sum(self.iter(), |r| r.year, field).into_iter().collect()
    }

    /// state → sum, drives the choropleth colour scale.
    pub fn aggregate_by_state(&self, field: NumericField) -> BTreeMap<String, u64> {
        group_sum(self.iter(), |r| r.state_name.clone(), field)
    }

    /// category → sum, drives the pie and bar breakdowns.
    pub fn aggregate_by_category(&self, field: NumericField) -> BTreeMap<String, u64> {
        group_sum(self.iter(), |r| r.service_category.clone(), field)
    }

    /// Summary-card figures: (total SSBG expenditures, total recipients).
    pub fn national_totals(&self) -> (u64, u64) {
        (
            self.sum(NumericField::TotalSsbgExpenditures),
            self.sum(NumericField::TotalRecipients),
        )
    }

    /// Sums of every numeric column plus distinct counts.
    pub fn totals(&self) -> Totals {
        let mut sums = BTreeMap::new();
        for field in NumericField::ALL {
            sums.insert(field, self.sum(field));
        }

        Totals {
            sums,
            years: self.iter().map(|r| r.year).collect::<BTreeSet<_>>().len(),
            states: self.iter().map(|r| r.state_name.as_str()).collect::<BTreeSet<_>>().len(),
            service_categories: self
                .iter()
                .map(|r| r.service_category.as_str())
                .collect::<BTreeSet<_>>()
                .len(),
        }
    }

    /// One point per (year, category), ordered by year then category.
    pub fn aggregate_by_year_and_category(&self, field: NumericField) -> Vec<SeriesPoint> {
        group_sum(
            self.iter(),
            |r| (r.year, r.service_category.clone()),
            field,
        )
        .into_iter()
        .map(|((year, service_category), value)| SeriesPoint {
            year,
            service_category,
            value,
        })
        .collect()
    }

    /// Per-state totals for both toggle metrics, ordered by state name.
    pub fn state_summaries(&self) -> Vec<StateSummary> {
        let expenditures = self.aggregate_by_state(Metric::Expenditures.field());
        let recipients = self.aggregate_by_state(Metric::Recipients.field());

        expenditures
            .into_iter()
            .map(|(state_name, total_ssbg_expenditures)| StateSummary {
                total_recipients: recipients.get(&state_name).copied().unwrap_or(0),
                state_name,
                total_ssbg_expenditures,
            })
            .collect()
    }

    /// Per-category totals for both metrics, largest expenditures first.
    pub fn category_breakdown(&self) -> Vec<CategoryBreakdown> {
        let expenditures = self.aggregate_by_category(Metric::Expenditures.field());
        let recipients = self.aggregate_by_category(Metric::Recipients.field());

        let mut rows: Vec<CategoryBreakdown> = expenditures
            .into_iter()
            .map(|(service_category, expenditures)| CategoryBreakdown {
                recipients: recipients.get(&service_category).copied().unwrap_or(0),
                service_category,
                expenditures,
            })
            .collect();

        // BTreeMap order is by name, so a stable sort keeps ties alphabetical
        rows.sort_by(|a, b| b.expenditures.cmp(&a.expenditures));
        rows
    }

    /// The `n` largest categories by `field`, descending.
    pub fn top_categories(&self, field: NumericField, n: usize) -> Vec<(String, u64)> {
        let mut rows: Vec<(String, u64)> = self.aggregate_by_category(field).into_iter().collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        rows.truncate(n);
        rows
    }
}

impl<'a> FromIterator<&'a GrantRecord> for RecordSet<'a> {
    fn from_iter<I: IntoIterator<Item = &'a GrantRecord>>(iter: I) -> Self {
        RecordSet {
            records: iter.into_iter().collect(),
        }
    }
}

fn group_sum<'a, K: Ord>(
    records: impl Iterator<Item = &'a GrantRecord>,
    key: impl Fn(&GrantRecord) -> K,
    field: NumericField,
) -> BTreeMap<K, u64> {
    let mut groups = BTreeMap::new();
    for r in records {
        let sum: &mut u64 = groups.entry(key(r)).or_insert(0);
        *sum = sum.saturating_add(r.value(field));
    }
    groups
}

// ============================================================================
// DERIVED VIEWS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    pub sums: BTreeMap<NumericField, u64>,
    pub years: usize,
    pub states: usize,
    pub service_categories: usize,
}

impl Totals {
    pub fn get(&self, field: NumericField) -> u64 {
        self.sums.get(&field).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub year: u16,
    pub service_category: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSummary {
    pub state_name: String,
    pub total_ssbg_expenditures: u64,
    pub total_recipients: u64,
}

impl StateSummary {
    pub fn value(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Expenditures => self.total_ssbg_expenditures,
            Metric::Recipients => self.total_recipients,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    pub service_category: String,
    pub expenditures: u64,
    pub recipients: u64,
}
