// Per-state report page

use super::{
    all_records, category_selection, metric_axis_title, select_categories, select_year, Component,
    ComponentView, Control, FilterParams, PageView, ParamError,
};
use crate::components::format::fiscal_year_label;
use crate::components::{
    breakdown_chart, category_time_series, data_table, state_cards, time_series, CardContext,
    ChartType, DisplayOptions, Figure,
};
use crate::query::RecordSet;
use crate::record::Metric;
use crate::store::DataStore;
use std::collections::BTreeSet;
use tracing::debug;

pub const COMPONENTS: [Component; 7] = [
    Component::Title,
    Component::SummaryCards,
    Component::ServiceBar,
    Component::ServicePie,
    Component::ExpendituresTimeSeries,
    Component::RecipientsTimeSeries,
    Component::DataTable,
];

const ON_STATE: &[Component] = &COMPONENTS;
const ON_YEAR: &[Component] = &[
    Component::SummaryCards,
    Component::ServiceBar,
    Component::ServicePie,
    Component::DataTable,
];
const ON_CATEGORIES: &[Component] = &[Component::SummaryCards, Component::DataTable];
const ON_SERIES: &[Component] = &[
    Component::ExpendituresTimeSeries,
    Component::RecipientsTimeSeries,
];

pub fn invalidated_by(control: Control) -> Result<&'static [Component], ParamError> {
    match control {
        Control::State => Ok(ON_STATE),
        Control::Year => Ok(ON_YEAR),
        Control::Categories => Ok(ON_CATEGORIES),
        Control::Range | Control::SeriesCategories => Ok(ON_SERIES),
        Control::Metric => Err(ParamError::ControlNotOnPage(control)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateFilters {
    pub state_name: String,
    pub year: Option<u16>,
    pub categories: Option<BTreeSet<String>>,
    pub range: (u16, u16),
    pub series_categories: Option<BTreeSet<String>>,
    pub year_bounds: (u16, u16),
}

impl StateFilters {
    /// Unknown state names are accepted and simply match no rows
    pub fn from_params(
        state_name: &str,
        params: &FilterParams,
        store: &DataStore,
    ) -> Result<Self, ParamError> {
        let year_bounds = store.year_bounds();
        Ok(StateFilters {
            state_name: state_name.to_string(),
            year: params.year_selection(year_bounds)?,
            categories: category_selection(params.categories.as_deref()),
            range: params.year_range(year_bounds),
            series_categories: category_selection(params.series_categories.as_deref()),
            year_bounds,
        })
    }

    fn period(&self) -> String {
        fiscal_year_label(self.year, self.year_bounds)
    }
}

/// Every row of the state, regardless of the other filters
pub fn state_slice<'a>(store: &'a DataStore, state_name: &str) -> RecordSet<'a> {
    all_records(store).filter_by_state(state_name)
}

/// The year + category slice behind the cards, table and export
pub fn current_slice<'a>(store: &'a DataStore, filters: &StateFilters) -> RecordSet<'a> {
    filtered(&state_slice(store, &filters.state_name), filters)
}

fn filtered<'a>(state: &RecordSet<'a>, filters: &StateFilters) -> RecordSet<'a> {
    select_categories(select_year(state.clone(), filters.year), &filters.categories)
}

pub fn render(store: &DataStore, filters: &StateFilters) -> PageView {
    render_components(store, filters, &COMPONENTS)
}

pub fn update(
    store: &DataStore,
    filters: &StateFilters,
    control: Control,
) -> Result<PageView, ParamError> {
    let components = invalidated_by(control)?;
    Ok(render_components(store, filters, components))
}

pub fn render_components(
    store: &DataStore,
    filters: &StateFilters,
    components: &[Component],
) -> PageView {
    debug!(state = %filters.state_name, ?components, "Rendering state page");
    let state = state_slice(store, &filters.state_name);
    let mut view = PageView::default();
    for &component in components {
        if let Some(rendered) = render_component(&state, filters, component) {
            view.components.insert(component, rendered);
        }
    }
    view
}

fn render_component(
    state: &RecordSet<'_>,
    filters: &StateFilters,
    component: Component,
) -> Option<ComponentView> {
    let in_year = || select_year(state.clone(), filters.year);

    let view = match component {
        Component::Title => ComponentView::Text {
            text: format!("SSBG Recipient Report: {}", filters.state_name),
        },
        Component::SummaryCards => {
            let current = filtered(state, filters).totals();
            let all_time = select_categories(state.clone(), &filters.categories).totals();
            let ctx = CardContext {
                period: filters.period(),
                since_year: filters.year_bounds.0,
            };
            ComponentView::Cards {
                cards: state_cards(&current, &all_time, &ctx),
            }
        }
        Component::ServiceBar => ComponentView::Chart {
            figure: breakdown(&in_year(), filters, Metric::Expenditures),
        },
        Component::ServicePie => ComponentView::Chart {
            figure: breakdown(&in_year(), filters, Metric::Recipients),
        },
        Component::ExpendituresTimeSeries => ComponentView::Chart {
            figure: series(state, filters, Metric::Expenditures),
        },
        Component::RecipientsTimeSeries => ComponentView::Chart {
            figure: series(state, filters, Metric::Recipients),
        },
        Component::DataTable => ComponentView::Table {
            table: data_table(&filtered(state, filters)),
        },
        Component::TopServicesExpenditures
        | Component::TopServicesRecipients
        | Component::Map => return None,
    };
    Some(view)
}

/// Expenditures as a horizontal bar, recipients as a pie
fn breakdown(records: &RecordSet<'_>, filters: &StateFilters, metric: Metric) -> Figure {
    let rows: Vec<(String, u64)> = records
        .category_breakdown()
        .into_iter()
        .map(|b| {
            let value = match metric {
                Metric::Expenditures => b.expenditures,
                Metric::Recipients => b.recipients,
            };
            (b.service_category, value)
        })
        .collect();

    let title = format!(
        "{} by Service Category {} - {}",
        metric.label(),
        filters.period(),
        filters.state_name
    );
    let options = match metric {
        Metric::Expenditures => DisplayOptions::new(ChartType::HorizontalBar, title)
            .axes(metric_axis_title(metric), "Service Category")
            .height(600),
        Metric::Recipients => DisplayOptions::new(ChartType::Pie, title).height(600),
    }
    .metric(metric);
    breakdown_chart(&rows, &options)
}

fn series(state: &RecordSet<'_>, filters: &StateFilters, metric: Metric) -> Figure {
    let (min, max) = filters.range;
    let in_range = select_categories(state.filter_by_years(min, max), &filters.series_categories);
    let options = DisplayOptions::new(
        ChartType::Line,
        format!("SSBG {} Over Time - {}", metric.label(), filters.state_name),
    )
    .metric(metric)
    .axes("Year", metric_axis_title(metric))
    .height(450);

    match filters.series_categories {
        Some(_) => {
            category_time_series(&in_range.aggregate_by_year_and_category(metric.field()), &options)
        }
        None => time_series(&in_range.aggregate_by_year(metric.field()), &options),
    }
}
