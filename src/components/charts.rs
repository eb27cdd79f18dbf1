// Time-series and breakdown charts

use super::{
    Axis, BarTrace, ChartType, DisplayOptions, Figure, Layout, LineStyle, MarkerStyle, PieTrace,
    ScatterTrace, Title, Trace, Values, COLOR_PRIMARY, COLOR_SECONDARY,
};
use crate::query::SeriesPoint;
use crate::record::Metric;
use std::collections::BTreeMap;

fn base_layout(options: &DisplayOptions) -> Layout {
    let mut layout = Layout::titled(options.title.clone());
    layout.height = options.height;
    layout
}

fn axis_title(text: &str) -> Option<Title> {
    (!text.is_empty()).then(|| Title::new(text))
}

/// Integer year ticks, y axis anchored at zero
fn year_axes(layout: &mut Layout, options: &DisplayOptions, years: Vec<u16>) {
    layout.hovermode = Some("x unified");
    layout.xaxis = Some(Axis {
        title: axis_title(&options.x_title),
        tickmode: Some("array"),
        tickvals: Some(years),
        tickformat: Some("d"),
        ..Axis::default()
    });
    layout.yaxis = Some(Axis {
        title: axis_title(&options.y_title),
        rangemode: Some("tozero"),
        ..Axis::default()
    });
}

/// Single line over (year, value) pairs from `aggregate_by_year`.
pub fn time_series(series: &[(u16, u64)], options: &DisplayOptions) -> Figure {
    let mut layout = base_layout(options);
    let years: Vec<u16> = series.iter().map(|(y, _)| *y).collect();
    year_axes(&mut layout, options, years.clone());

    if series.is_empty() {
        return Figure {
            data: Vec::new(),
            layout: layout.with_empty_notice(),
        };
    }

    Figure {
        data: vec![Trace::Scatter(ScatterTrace {
            name: None,
            x: years,
            y: series.iter().map(|(_, v)| *v).collect(),
            mode: "lines+markers",
            line: LineStyle {
                color: Some(match options.metric {
                    Metric::Expenditures => COLOR_PRIMARY,
                    Metric::Recipients => COLOR_SECONDARY,
                }),
            },
        })],
        layout,
    }
}

/// One line per service category over `aggregate_by_year_and_category` output.
pub fn category_time_series(points: &[SeriesPoint], options: &DisplayOptions) -> Figure {
    let mut layout = base_layout(options);

    let mut lines: BTreeMap<&str, (Vec<u16>, Vec<u64>)> = BTreeMap::new();
    let mut years: Vec<u16> = Vec::new();
    for p in points {
        let line = lines.entry(p.service_category.as_str()).or_default();
        line.0.push(p.year);
        line.1.push(p.value);
        if !years.contains(&p.year) {
            years.push(p.year);
        }
    }
    years.sort_unstable();
    year_axes(&mut layout, options, years);
    layout.showlegend = Some(true);

    if lines.is_empty() {
        return Figure {
            data: Vec::new(),
            layout: layout.with_empty_notice(),
        };
    }

    Figure {
        data: lines
            .into_iter()
            .map(|(category, (x, y))| {
                Trace::Scatter(ScatterTrace {
                    name: Some(category.to_string()),
                    x,
                    y,
                    mode: "lines+markers",
                    line: LineStyle { color: None },
                })
            })
            .collect(),
        layout,
    }
}

/// Category breakdown as a bar, horizontal bar or pie chart.
///
/// Rows are drawn in the order given; horizontal bars are additionally
/// ordered by total so the largest sits on top.
pub fn breakdown_chart(rows: &[(String, u64)], options: &DisplayOptions) -> Figure {
    let mut layout = base_layout(options);
    let labels: Vec<String> = rows.iter().map(|(l, _)| l.clone()).collect();
    let values: Vec<u64> = rows.iter().map(|(_, v)| *v).collect();

    let trace = match options.chart_type {
        ChartType::Pie => Trace::Pie(PieTrace {
            labels,
            values,
            hovertemplate: Some(format!(
                "<b>%{{label}}</b><br>{}: %{{value:,}}<br>Percent: %{{percent}}<extra></extra>",
                options.metric.label()
            )),
        }),
        ChartType::HorizontalBar => {
            layout.showlegend = Some(false);
            layout.xaxis = Some(Axis {
                title: axis_title(&options.x_title),
                ..Axis::default()
            });
            layout.yaxis = Some(Axis {
                title: axis_title(&options.y_title),
                categoryorder: Some("total ascending"),
                ..Axis::default()
            });
            Trace::Bar(BarTrace {
                x: Values::Numbers(values),
                y: Values::Labels(labels),
                orientation: "h",
                marker: MarkerStyle {
                    color: COLOR_PRIMARY,
                },
            })
        }
        // Line and choropleth make no sense for a category breakdown
        ChartType::Bar | ChartType::Line | ChartType::Choropleth => {
            layout.showlegend = Some(false);
            layout.xaxis = Some(Axis {
                title: axis_title(&options.x_title),
                ..Axis::default()
            });
            layout.yaxis = Some(Axis {
                title: axis_title(&options.y_title),
                ..Axis::default()
            });
            Trace::Bar(BarTrace {
                x: Values::Labels(labels),
                y: Values::Numbers(values),
                orientation: "v",
                marker: MarkerStyle {
                    color: COLOR_PRIMARY,
                },
            })
        }
    };

    if rows.is_empty() {
        return Figure {
            data: Vec::new(),
            layout: layout.with_empty_notice(),
        };
    }

    Figure {
        data: vec![trace],
        layout,
    }
}
