// National overview page

use super::{
    all_records, category_selection, metric_axis_title, select_categories, select_year, Component, ComponentView,
    Control, FilterParams, PageDefaults, PageView, ParamError,
};
use crate::components::format::fiscal_year_label;
use crate::components::{
    breakdown_chart, category_time_series, choropleth, data_table, national_cards, time_series,
    CardContext, ChartType, DisplayOptions, Figure,
};
use crate::query::RecordSet;
use crate::record::Metric;
use crate::store::DataStore;
use std::collections::BTreeSet;
use tracing::debug;

pub const TOP_N: usize = 10;

pub const COMPONENTS: [Component; 7] = [
    Component::SummaryCards,
    Component::TopServicesExpenditures,
    Component::TopServicesRecipients,
    Component::Map,
    Component::ExpendituresTimeSeries,
    Component::RecipientsTimeSeries,
    Component::DataTable,
];

const ON_YEAR: &[Component] = &[
    Component::SummaryCards,
    Component::TopServicesExpenditures,
    Component::TopServicesRecipients,
    Component::Map,
    Component::DataTable,
];
const ON_CATEGORIES: &[Component] = &[Component::SummaryCards, Component::Map, Component::DataTable];
const ON_METRIC: &[Component] = &[Component::Map];
const ON_SERIES: &[Component] = &[
    Component::ExpendituresTimeSeries,
    Component::RecipientsTimeSeries,
];

/// Components recomputed when `control` changes
pub fn invalidated_by(control: Control) -> Result<&'static [Component], ParamError> {
    match control {
        Control::Year => Ok(ON_YEAR),
        Control::Categories => Ok(ON_CATEGORIES),
        Control::Metric => Ok(ON_METRIC),
        Control::Range | Control::SeriesCategories => Ok(ON_SERIES),
        Control::State => Err(ParamError::ControlNotOnPage(control)),
    }
}

/// Resolved filter state of the national page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NationalFilters {
    /// `None` = all years
    pub year: Option<u16>,
    /// `None` = all categories
    pub categories: Option<BTreeSet<String>>,
    pub metric: Metric,
    /// Time-series year range, inclusive
    pub range: (u16, u16),
    pub series_categories: Option<BTreeSet<String>>,
    pub year_bounds: (u16, u16),
}

impl NationalFilters {
    pub fn from_params(
        params: &FilterParams,
        store: &DataStore,
        defaults: &PageDefaults,
    ) -> Result<Self, ParamError> {
        let year_bounds = store.year_bounds();
        Ok(NationalFilters {
            year: params.year_selection(year_bounds)?,
            categories: category_selection(params.categories.as_deref()),
            metric: params.metric.unwrap_or(defaults.metric),
            range: params.year_range(year_bounds),
            series_categories: category_selection(params.series_categories.as_deref()),
            year_bounds,
        })
    }

    fn period(&self) -> String {
        fiscal_year_label(self.year, self.year_bounds)
    }
}

/// The year + category slice behind the cards, map, table and export
pub fn current_slice<'a>(store: &'a DataStore, filters: &NationalFilters) -> RecordSet<'a> {
    select_categories(select_year(all_records(store), filters.year), &filters.categories)
}

pub fn render(store: &DataStore, filters: &NationalFilters) -> PageView {
    render_components(store, filters, &COMPONENTS)
}

/// Recompute only what `control` invalidates
pub fn update(
    store: &DataStore,
    filters: &NationalFilters,
    control: Control,
) -> Result<PageView, ParamError> {
    let components = invalidated_by(control)?;
    Ok(render_components(store, filters, components))
}

pub fn render_components(
    store: &DataStore,
    filters: &NationalFilters,
    components: &[Component],
) -> PageView {
    debug!(?filters, ?components, "Rendering national page");
    let mut view = PageView::default();
    for &component in components {
        if let Some(rendered) = render_component(store, filters, component) {
            view.components.insert(component, rendered);
        }
    }
    view
}

fn render_component(
    store: &DataStore,
    filters: &NationalFilters,
    component: Component,
) -> Option<ComponentView> {
    let all = all_records(store);
    let period = filters.period();

    let view = match component {
        Component::SummaryCards => {
            let current = current_slice(store, filters).totals();
            let all_time = select_categories(all, &filters.categories).totals();
            let ctx = CardContext {
                period,
                since_year: filters.year_bounds.0,
            };
            ComponentView::Cards {
                cards: national_cards(&current, &all_time, &ctx),
            }
        }
        Component::TopServicesExpenditures => ComponentView::Chart {
            figure: top_services(&all, filters, Metric::Expenditures),
        },
        Component::TopServicesRecipients => ComponentView::Chart {
            figure: top_services(&all, filters, Metric::Recipients),
        },
        Component::Map => {
            let summaries = current_slice(store, filters).state_summaries();
            let title = format!("SSBG {} by State {}", filters.metric.label(), period);
            ComponentView::Chart {
                figure: choropleth(&summaries, filters.metric, title),
            }
        }
        Component::ExpendituresTimeSeries => ComponentView::Chart {
            figure: series(&all, filters, Metric::Expenditures),
        },
        Component::RecipientsTimeSeries => ComponentView::Chart {
            figure: series(&all, filters, Metric::Recipients),
        },
        Component::DataTable => ComponentView::Table {
            table: data_table(&current_slice(store, filters)),
        },
        Component::Title | Component::ServiceBar | Component::ServicePie => return None,
    };
    Some(view)
}

/// Top categories for the selected year, ignoring the category filter
fn top_services(all: &RecordSet<'_>, filters: &NationalFilters, metric: Metric) -> Figure {
    let rows = select_year(all.clone(), filters.year).top_categories(metric.field(), TOP_N);
    let options = DisplayOptions::new(
        ChartType::HorizontalBar,
        format!(
            "Top {} Service Categories by {} {}",
            TOP_N,
            metric.label(),
            filters.period()
        ),
    )
    .metric(metric)
    .axes(metric_axis_title(metric), "Service Category")
    .height(500);
    breakdown_chart(&rows, &options)
}

/// Line per selected category, or one national line when none are selected
fn series(all: &RecordSet<'_>, filters: &NationalFilters, metric: Metric) -> Figure {
    let (min, max) = filters.range;
    let in_range = select_categories(all.filter_by_years(min, max), &filters.series_categories);
    let options = DisplayOptions::new(
        ChartType::Line,
        format!("SSBG {} Over Time", metric.label()),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Trace;
    use crate::record::fixtures::record;
    use crate::record::NumericField;
    use crate::store::LoadOptions;

    fn store() -> DataStore {
        DataStore::from_records(
            vec![
                record(2019, "Alabama", "Child Care", 100, 10),
                record(2020, "Alabama", "Adult Day Care", 200, 20),
                record(2020, "Alaska", "Child Care", 50, 5),
                record(2020, "Atlantis", "Child Care", 7, 1),
            ],
            LoadOptions::default(),
        )
        .unwrap()
    }

    fn filters(store: &DataStore, params: FilterParams) -> NationalFilters {
        NationalFilters::from_params(&params, store, &PageDefaults::default()).unwrap()
    }

    #[test]
    fn test_defaults_select_latest_year_and_recipients() {
        let store = store();
        let f = filters(&store, FilterParams::default());

        assert_eq!(f.year, Some(2020));
        assert_eq!(f.metric, Metric::Recipients);
        assert_eq!(f.range, (2019, 2020));
        assert_eq!(f.categories, None);
    }

    #[test]
    fn test_full_render_has_every_component() {
        let store = store();
        let view = render(&store, &filters(&store, FilterParams::default()));

        assert_eq!(view.components.len(), COMPONENTS.len());
        for component in COMPONENTS {
            assert!(view.get(component).is_some(), "missing {:?}", component);
        }
    }

    #[test]
    fn test_cards_follow_year_and_categories() {
        let store = store();
        let f = filters(
            &store,
            FilterParams {
                categories: Some("Child Care".into()),
                ..FilterParams::default()
            },
        );
        let view = render_components(&store, &f, &[Component::SummaryCards]);
        let Some(ComponentView::Cards { cards }) = view.get(Component::SummaryCards) else {
            panic!("expected cards");
        };

        assert_eq!(cards[0].title, "Total SSBG Expenditures FY20");
        assert_eq!(cards[0].value, "$57");
    }

    #[test]
    fn test_map_title_and_unknown_states_dropped() {
        let store = store();
        let f = filters(
            &store,
            FilterParams {
                metric: Some(Metric::Expenditures),
                ..FilterParams::default()
            },
        );
        let view = render_components(&store, &f, &[Component::Map]);
        let Some(ComponentView::Chart { figure }) = view.get(Component::Map) else {
            panic!("expected chart");
        };

        assert_eq!(figure.layout.title.text, "SSBG Expenditures by State FY20");
        let Trace::Choropleth(map) = &figure.data[0] else {
            panic!("expected choropleth");
        };
        assert_eq!(map.locations, vec!["AL", "AK"]);
        assert_eq!(map.z, vec![200, 50]);
    }

    #[test]
    fn test_top_services_ignore_category_filter() {
        let store = store();
        let f = filters(
            &store,
            FilterParams {
                categories: Some("Nothing Here".into()),
                ..FilterParams::default()
            },
        );
        let figure = top_services(&all_records(&store), &f, Metric::Expenditures);
        assert_eq!(figure.data.len(), 1);
        assert_eq!(
            figure.layout.title.text,
            "Top 10 Service Categories by Expenditures FY20"
        );
    }

    #[test]
    fn test_time_series_range_and_categories() {
        let store = store();
        let f = filters(
            &store,
            FilterParams {
                range_min: Some(2020),
                ..FilterParams::default()
            },
        );
        let figure = series(&all_records(&store), &f, Metric::Expenditures);
        let Trace::Scatter(line) = &figure.data[0] else {
            panic!("expected scatter");
        };
        assert_eq!(line.x, vec![2020]);
        assert_eq!(line.y, vec![257]);

        let f = filters(
            &store,
            FilterParams {
                series_categories: Some("Child Care,Adult Day Care".into()),
                ..FilterParams::default()
            },
        );
        let figure = series(&all_records(&store), &f, Metric::Recipients);
        assert_eq!(figure.data.len(), 2);
    }

    #[test]
    fn test_inverted_range_renders_empty_chart() {
        let store = store();
        let f = filters(
            &store,
            FilterParams {
                range_min: Some(2022),
                range_max: Some(2019),
                ..FilterParams::default()
            },
        );
        let figure = series(&all_records(&store), &f, Metric::Recipients);
        assert!(figure.is_empty());
        assert_eq!(figure.layout.annotations.len(), 1);
    }

    #[test]
    fn test_update_renders_only_invalidated_components() {
        let store = store();
        let f = filters(&store, FilterParams::default());

        let view = update(&store, &f, Control::Metric).unwrap();
        assert_eq!(view.components.len(), 1);
        assert!(view.get(Component::Map).is_some());

        let view = update(&store, &f, Control::Range).unwrap();
        assert_eq!(view.components.len(), 2);
        assert!(view.get(Component::DataTable).is_none());

        assert_eq!(
            update(&store, &f, Control::State),
            Err(ParamError::ControlNotOnPage(Control::State))
        );
    }

    #[test]
    fn test_all_years_selection() {
        let store = store();
        let f = filters(
            &store,
            FilterParams {
                year: Some("all".into()),
                ..FilterParams::default()
            },
        );
        assert_eq!(f.period(), "FY19-FY20");
        let slice = current_slice(&store, &f);
        assert_eq!(slice.len(), 4);
        assert_eq!(slice.sum(NumericField::TotalSsbgExpenditures), 357);
    }
}
