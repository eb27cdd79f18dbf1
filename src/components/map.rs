// Choropleth map of states and territories

use super::format::{currency, thousands};
use super::{
    BorderLine, ChoroplethMarker, ChoroplethTrace, ColorBar, Figure, Geo, Layout, Margin,
    Projection, Title, Trace,
};
use crate::query::StateSummary;
use crate::record::Metric;
use crate::states::{abbreviation, report_path};

/// White through mid blue to the primary dark blue
const COLORSCALE: [(f64, &str); 3] = [
    (0.0, "rgb(255, 255, 255)"),
    (0.5, "rgb(70, 137, 187)"),
    (1.0, "rgb(38, 74, 100)"),
];

/// Shade each state by `metric`; hover text always shows both metrics.
///
/// Rows whose state has no USPS code are dropped.
pub fn choropleth(summaries: &[StateSummary], metric: Metric, title: impl Into<String>) -> Figure {
    let mut locations = Vec::new();
    let mut z = Vec::new();
    let mut text = Vec::new();
    let mut customdata = Vec::new();

    for s in summaries {
        let Some(code) = abbreviation(&s.state_name) else {
            continue;
        };
        locations.push(code.to_string());
        z.push(s.value(metric));
        text.push(format!(
            "<b>{}</b><br>Expenditures: {}<br>Recipients: {}",
            s.state_name,
            currency(s.total_ssbg_expenditures),
            thousands(s.total_recipients)
        ));
        customdata.push(report_path(&s.state_name));
    }

    let mut layout = Layout::titled(title);
    layout.title.x = Some(0.5);
    layout.height = Some(600);
    layout.geo = Some(Geo {
        scope: "usa",
        projection: Projection { kind: "albers usa" },
        showlakes: true,
        lakecolor: "rgb(255, 255, 255)",
    });
    layout.margin = Some(Margin { l: 0, r: 0, t: 50, b: 0 });

    if locations.is_empty() {
        return Figure {
            data: Vec::new(),
            layout: layout.with_empty_notice(),
        };
    }

    let trace = ChoroplethTrace {
        locations,
        z,
        text,
        customdata,
        locationmode: "USA-states",
        colorscale: COLORSCALE.to_vec(),
        hovertemplate: "%{text}<extra></extra>",
        marker: ChoroplethMarker {
            line: BorderLine {
                color: "black",
                width: 1.0,
            },
        },
        colorbar: ColorBar {
            title: Title::new(metric.label()),
        },
    };

    Figure {
        data: vec![Trace::Choropleth(trace)],
        layout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summaries() -> Vec<StateSummary> {
        vec![
            StateSummary {
                state_name: "Alabama".into(),
                total_ssbg_expenditures: 300,
                total_recipients: 30,
            },
            StateSummary {
                state_name: "Atlantis".into(),
                total_ssbg_expenditures: 1,
                total_recipients: 1,
            },
            StateSummary {
                state_name: "New York".into(),
                total_ssbg_expenditures: 1200,
                total_recipients: 45,
            },
        ]
    }

    #[test]
    fn test_metric_selects_z() {
        let fig = choropleth(&summaries(), Metric::Expenditures, "SSBG Expenditures by State");
        let Trace::Choropleth(trace) = &fig.data[0] else {
            panic!("expected choropleth trace");
        };

        assert_eq!(trace.locations, vec!["AL", "NY"]);
        assert_eq!(trace.z, vec![300, 1200]);
        assert_eq!(trace.customdata[1], "/state/New%20York");
        assert!(trace.text[1].contains("Expenditures: $1,200"));
        assert!(trace.text[1].contains("Recipients: 45"));

        let fig = choropleth(&summaries(), Metric::Recipients, "t");
        let Trace::Choropleth(trace) = &fig.data[0] else {
            panic!("expected choropleth trace");
        };
        assert_eq!(trace.z, vec![30, 45]);
        assert_eq!(trace.colorbar.title.text, "Recipients");
    }

    #[test]
    fn test_serialized_geo() {
        let json = serde_json::to_value(choropleth(&summaries(), Metric::Recipients, "t")).unwrap();
        assert_eq!(json["data"][0]["type"], "choropleth");
        assert_eq!(json["data"][0]["locationmode"], "USA-states");
        assert_eq!(json["layout"]["geo"]["projection"]["type"], "albers usa");
        assert_eq!(json["data"][0]["colorscale"][2][1], "rgb(38, 74, 100)");
    }

    #[test]
    fn test_empty_map() {
        let fig = choropleth(&[], Metric::Recipients, "t");
        assert!(fig.is_empty());
        assert_eq!(fig.layout.geo.as_ref().unwrap().scope, "usa");
    }
}
