// Figure descriptions sent to the browser and drawn there by plotly.js.
//
// Only the subset of the plotly figure schema the dashboard uses is modelled:
// bar traces with categorical x values and a layout with titles.

use serde::{Deserialize, Serialize};

/// Axis label used by the per-player metric charts.
pub const METRIC_AXIS: &str = "Metric";
/// Value axis label used by the per-player metric charts.
pub const VALUE_AXIS: &str = "Value";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Bar,
}

/// How multiple traces share a category slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    /// Stacked, with negative values below the axis.
    Relative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: impl Into<String>) -> Self {
        Title { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: Vec<String>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barmode: Option<BarMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
}

/// A complete chart: traces plus layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

/// One named series of category counts, e.g. matches per city won by a team.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub categories: Vec<String>,
    pub counts: Vec<f64>,
}

impl Figure {
    /// Single-trace bar chart, one bar per label.
    pub fn bar(
        title: impl Into<String>,
        x_label: &str,
        y_label: &str,
        labels: &[&str],
        values: Vec<f64>,
    ) -> Self {
        Figure {
            data: vec![Trace {
                kind: TraceKind::Bar,
                name: None,
                x: labels.iter().map(|l| l.to_string()).collect(),
                y: values,
            }],
            layout: Layout {
                title: Title::new(title),
                xaxis: Axis {
                    title: Title::new(x_label),
                },
                yaxis: Axis {
                    title: Title::new(y_label),
                },
                barmode: None,
                legend: None,
            },
        }
    }

    /// The "nothing to show" chart: one bar at zero titled after the subject.
    pub fn placeholder(subject: &str) -> Self {
        Figure::bar(
            format!("No data for {subject}"),
            METRIC_AXIS,
            VALUE_AXIS,
            &[METRIC_AXIS],
            vec![0.0],
        )
    }

    /// Stacked count histogram, one trace per series.
    pub fn stacked_counts(
        title: impl Into<String>,
        x_label: &str,
        legend_title: &str,
        series: Vec<Series>,
    ) -> Self {
        Figure {
            data: series
                .into_iter()
                .map(|s| Trace {
                    kind: TraceKind::Bar,
                    name: Some(s.name),
                    x: s.categories,
                    y: s.counts,
                })
                .collect(),
            layout: Layout {
                title: Title::new(title),
                xaxis: Axis {
                    title: Title::new(x_label),
                },
                yaxis: Axis {
                    title: Title::new("count"),
                },
                barmode: Some(BarMode::Relative),
                legend: Some(Legend {
                    title: Title::new(legend_title),
                }),
            },
        }
    }

    pub fn title(&self) -> &str {
        &self.layout.title.text
    }

    /// Values of the first trace, or empty for a figure without traces.
    pub fn values(&self) -> &[f64] {
        self.data.first().map(|t| t.y.as_slice()).unwrap_or(&[])
    }

    /// Category labels of the first trace.
    pub fn labels(&self) -> Vec<&str> {
        self.data
            .first()
            .map(|t| t.x.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Sum of all bar heights across every trace.
    pub fn total(&self) -> f64 {
        self.data.iter().flat_map(|t| t.y.iter()).sum()
    }
}
