// Pages - explicit data flow from filter state to rendered components
//
// Each page is a pure function: filter state → Query Layer → Presentation
// Components → serialisable view. Each control declares which components
// it invalidates, so a control change re-renders only those.

pub mod national;
pub mod state;

use crate::components::{DataTable, Figure, SummaryCard};
use crate::query::RecordSet;
use crate::record::Metric;
use crate::store::DataStore;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use thiserror::Error;

pub use national::NationalFilters;
pub use state::StateFilters;

// ============================================================================
// CONTROLS & COMPONENTS
// ============================================================================

/// A filter control on one of the pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Year,
    Categories,
    Metric,
    Range,
    SeriesCategories,
    State,
}

impl FromStr for Control {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "year" => Ok(Control::Year),
            "categories" => Ok(Control::Categories),
            "metric" => Ok(Control::Metric),
            "range" => Ok(Control::Range),
            "series_categories" => Ok(Control::SeriesCategories),
            "state" => Ok(Control::State),
            other => Err(ParamError::UnknownControl(other.to_string())),
        }
    }
}

/// A rendered slot on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Title,
    SummaryCards,
    TopServicesExpenditures,
    TopServicesRecipients,
    Map,
    ServiceBar,
    ServicePie,
    ExpendituresTimeSeries,
    RecipientsTimeSeries,
    DataTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentView {
    Text { text: String },
    Cards { cards: Vec<SummaryCard> },
    Chart { figure: Figure },
    Table { table: DataTable },
}

/// Rendered components keyed by slot
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageView {
    pub components: BTreeMap<Component, ComponentView>,
}

impl PageView {
    pub fn get(&self, component: Component) -> Option<&ComponentView> {
        self.components.get(&component)
    }
}

// ============================================================================
// FILTER PARAMETERS
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("invalid year '{0}' (expected a fiscal year or 'all')")]
    InvalidYear(String),

    #[error("unknown control '{0}'")]
    UnknownControl(String),

    #[error("control '{0:?}' does not exist on this page")]
    ControlNotOnPage(Control),
}

/// Raw query-string filter state shared by both pages
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
    /// Fiscal year, `all`, or absent for the latest year
    pub year: Option<String>,
    /// Comma separated service categories; empty selects all
    pub categories: Option<String>,
    pub metric: Option<Metric>,
    pub range_min: Option<u16>,
    pub range_max: Option<u16>,
    pub series_categories: Option<String>,
}

/// Defaults that are not derived from the data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDefaults {
    pub metric: Metric,
    pub state: String,
}

impl Default for PageDefaults {
    fn default() -> Self {
        PageDefaults {
            metric: Metric::Recipients,
            state: "Alabama".to_string(),
        }
    }
}

impl FilterParams {
    /// Year dropdown: `None` means every year
    pub(crate) fn year_selection(&self, year_bounds: (u16, u16)) -> Result<Option<u16>, ParamError> {
        match self.year.as_deref().map(str::trim) {
            None => Ok(Some(year_bounds.1)),
            Some("") | Some("all") => Ok(None),
            Some(raw) => raw
                .parse::<u16>()
                .map(Some)
                .map_err(|_| ParamError::InvalidYear(raw.to_string())),
        }
    }

    pub(crate) fn year_range(&self, year_bounds: (u16, u16)) -> (u16, u16) {
        (
            self.range_min.unwrap_or(year_bounds.0),
            self.range_max.unwrap_or(year_bounds.1),
        )
    }
}

/// Multi-select value; `None` when nothing is selected (all categories)
pub(crate) fn category_selection(raw: Option<&str>) -> Option<BTreeSet<String>> {
    let set: BTreeSet<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    (!set.is_empty()).then_some(set)
}

/// Apply a multi-select: nothing selected keeps every category
pub(crate) fn select_categories<'a>(
    records: RecordSet<'a>,
    categories: &Option<BTreeSet<String>>,
) -> RecordSet<'a> {
    match categories {
        Some(set) => records.filter_by_categories(set),
        None => records,
    }
}

pub(crate) fn select_year<'a>(records: RecordSet<'a>, year: Option<u16>) -> RecordSet<'a> {
    match year {
        Some(y) => records.filter_by_year(y),
        None => records,
    }
}

pub(crate) fn metric_axis_title(metric: Metric) -> &'static str {
    match metric {
        Metric::Expenditures => "Total SSBG Expenditures ($)",
        Metric::Recipients => "Total Recipients",
    }
}

pub(crate) fn all_records(store: &DataStore) -> RecordSet<'_> {
    RecordSet::new(store.get_all())
}
