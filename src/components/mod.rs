// Presentation Components
//
// Pure functions from Query Layer outputs + display options to renderable
// specifications. Charts are emitted as Plotly-style figures
// (`{ data: [...], layout: {...} }`) which the page shell hands straight to
// the browser charting library. Components never aggregate.

pub mod cards;
pub mod charts;
pub mod format;
pub mod map;
pub mod table;

use crate::record::Metric;
use serde::{Deserialize, Serialize};

pub use cards::{national_cards, state_cards, CardContext, SummaryCard};
pub use charts::{breakdown_chart, category_time_series, time_series};
pub use map::choropleth;
pub use table::{data_table, DataTable, TableColumn};

// ============================================================================
// PALETTE
// ============================================================================

pub const COLOR_PRIMARY: &str = "rgb(51, 106, 144)";
pub const COLOR_SECONDARY: &str = "rgb(90, 169, 230)";

// ============================================================================
// DISPLAY OPTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Line,
    Bar,
    HorizontalBar,
    Pie,
    Choropleth,
}

/// How a component should present the view it is given.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    pub metric: Metric,
    pub chart_type: ChartType,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub height: Option<u32>,
}

impl DisplayOptions {
    pub fn new(chart_type: ChartType, title: impl Into<String>) -> Self {
        DisplayOptions {
            metric: Metric::default(),
            chart_type,
            title: title.into(),
            x_title: String::new(),
            y_title: String::new(),
            height: None,
        }
    }

    pub fn metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn axes(mut self, x_title: impl Into<String>, y_title: impl Into<String>) -> Self {
        self.x_title = x_title.into();
        self.y_title = y_title.into();
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }
}

// ============================================================================
// FIGURE SPEC
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter(ScatterTrace),
    Bar(BarTrace),
    Pie(PieTrace),
    Choropleth(ChoroplethTrace),
}

/// Axis data is either numbers or category labels
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Values {
    Numbers(Vec<u64>),
    Labels(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: Vec<u16>,
    pub y: Vec<u64>,
    pub mode: &'static str,
    pub line: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    pub x: Values,
    pub y: Values,
    /// "v" or "h"
    pub orientation: &'static str,
    pub marker: MarkerStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieTrace {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethTrace {
    pub locations: Vec<String>,
    pub z: Vec<u64>,
    pub text: Vec<String>,
    /// Report page link per location, followed on click
    pub customdata: Vec<String>,
    pub locationmode: &'static str,
    pub colorscale: Vec<(f64, &'static str)>,
    pub hovertemplate: &'static str,
    pub marker: ChoroplethMarker,
    pub colorbar: ColorBar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethMarker {
    pub line: BorderLine,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BorderLine {
    pub color: &'static str,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub title: Title,
}

// ----------------------------------------------------------------------------
// Layout
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub paper_bgcolor: &'static str,
    pub plot_bgcolor: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovermode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl Layout {
    /// White background layout with a title, the dashboard's base look
    pub fn titled(title: impl Into<String>) -> Self {
        Layout {
            title: Title::new(title),
            paper_bgcolor: "white",
            plot_bgcolor: "white",
            height: None,
            hovermode: None,
            showlegend: None,
            xaxis: None,
            yaxis: None,
            geo: None,
            margin: None,
            annotations: Vec::new(),
        }
    }

    /// Centered notice shown in place of an empty chart
    pub fn with_empty_notice(mut self) -> Self {
        self.annotations.push(Annotation {
            text: "No data for the selected filters".to_string(),
            showarrow: false,
            xref: "paper",
            yref: "paper",
            x: 0.5,
            y: 0.5,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Title {
            text: text.into(),
            x: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickmode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickvals: Option<Vec<u16>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickformat: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangemode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoryorder: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geo {
    pub scope: &'static str,
    pub projection: Projection,
    pub showlakes: bool,
    pub lakecolor: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub text: String,
    pub showarrow: bool,
    pub xref: &'static str,
    pub yref: &'static str,
    pub x: f64,
    pub y: f64,
}
