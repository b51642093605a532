use std::collections::BTreeSet;

use crate::schemas::analytics::{ChartData, ChartDataset, GraphConfig, ProgressPoint};

const PALETTE: [&str; 10] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#FF6384", "#C9CBCF",
    "#7BC225", "#E7E9ED",
];
const PROGRESS_COLOR: &str = "#36A2EB";
const AVERAGE_COLOR: &str = "#FF6384";
/// Hex alpha suffix for translucent fills.
const FILL_ALPHA: &str = "33";

/// Sorted union of every day that appears in any series.
pub(crate) fn date_axis<'a, I>(series: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [ProgressPoint]>,
{
    series
        .into_iter()
        .flatten()
        .map(|point| point.formatted_date.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// One value per label; the first entry recorded on a day wins, missing days are `None`.
pub(crate) fn align(labels: &[String], points: &[ProgressPoint]) -> Vec<Option<f64>> {
    labels
        .iter()
        .map(|label| {
            points.iter().find(|point| &point.formatted_date == label).map(|point| point.marks)
        })
        .collect()
}

pub(crate) fn class_dataset(
    index: usize,
    label: String,
    labels: &[String],
    points: &[ProgressPoint],
) -> ChartDataset {
    let color = PALETTE[index % PALETTE.len()];
    ChartDataset {
        label,
        data: align(labels, points),
        border_color: color.to_string(),
        background_color: Some(format!("{color}{FILL_ALPHA}")),
        border_dash: None,
        fill: false,
        tension: Some(0.1),
    }
}

/// Per-entry axis with the score series and a flat average line.
pub(crate) fn student_chart(name: &str, points: &[ProgressPoint], average: f64) -> ChartData {
    let labels = points.iter().map(|point| point.formatted_date.clone()).collect();
    let progress = ChartDataset {
        label: format!("{name}'s Progress"),
        data: points.iter().map(|point| Some(point.marks)).collect(),
        border_color: PROGRESS_COLOR.to_string(),
        background_color: Some(format!("{PROGRESS_COLOR}{FILL_ALPHA}")),
        border_dash: None,
        fill: true,
        tension: Some(0.4),
    };
    let average_line = ChartDataset {
        label: "Average Line".to_string(),
        data: vec![Some(average); points.len()],
        border_color: AVERAGE_COLOR.to_string(),
        background_color: None,
        border_dash: Some(vec![5, 5]),
        fill: false,
        tension: None,
    };

    ChartData { labels, datasets: vec![progress, average_line] }
}

pub(crate) fn class_graph_config() -> GraphConfig {
    GraphConfig {
        chart_type: "line",
        title: "Student Progress Over Time".to_string(),
        x_axis_label: "Date",
        y_axis_label: "Marks",
        description: Some(
            "Marks trend for students over time; each dataset shares the labels axis.",
        ),
    }
}

pub(crate) fn student_graph_config(name: &str) -> GraphConfig {
    GraphConfig {
        chart_type: "line",
        title: format!("Progress Graph for {name}"),
        x_axis_label: "Date",
        y_axis_label: "Marks",
        description: None,
    }
}
