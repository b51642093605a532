use serde::Serialize;

use crate::schemas::mark::MarkResponse;
use crate::services::analytics::trend::Trend;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClassStats {
    pub(crate) total_students: usize,
    pub(crate) total_mark_entries: usize,
    pub(crate) highest_mark: f64,
    pub(crate) lowest_mark: f64,
    pub(crate) average_mark: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StudentSummary {
    pub(crate) student_id: String,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) total_marks: f64,
    pub(crate) average_marks: f64,
    pub(crate) subjects_count: usize,
    pub(crate) marks: Vec<MarkResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClassSummaryResponse {
    pub(crate) message: String,
    pub(crate) class_id: String,
    #[serde(rename = "classname")]
    pub(crate) class_name: String,
    pub(crate) class_stats: ClassStats,
    pub(crate) students: Vec<StudentSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProgressPoint {
    pub(crate) marks: f64,
    pub(crate) subject: String,
    pub(crate) subject_id: String,
    pub(crate) date: String,
    pub(crate) formatted_date: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChartDataset {
    pub(crate) label: String,
    pub(crate) data: Vec<Option<f64>>,
    pub(crate) border_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) border_dash: Option<Vec<u32>>,
    pub(crate) fill: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) tension: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub(crate) struct ChartData {
    pub(crate) labels: Vec<String>,
    pub(crate) datasets: Vec<ChartDataset>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GraphConfig {
    #[serde(rename = "type")]
    pub(crate) chart_type: &'static str,
    pub(crate) title: String,
    pub(crate) x_axis_label: &'static str,
    pub(crate) y_axis_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentRef {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StudentStats {
    pub(crate) total_entries: usize,
    pub(crate) total_marks: f64,
    pub(crate) average_marks: f64,
    pub(crate) highest_mark: f64,
    pub(crate) lowest_mark: f64,
    pub(crate) standard_deviation: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StudentProgressResponse {
    pub(crate) message: String,
    pub(crate) student: StudentRef,
    pub(crate) stats: StudentStats,
    pub(crate) trend: Trend,
    pub(crate) trend_percentage: Option<f64>,
    pub(crate) progress_data: Vec<ProgressPoint>,
    pub(crate) chart_data: ChartData,
    pub(crate) graph_config: GraphConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StudentProgressDetail {
    pub(crate) student_id: String,
    pub(crate) student_name: String,
    pub(crate) student_email: String,
    pub(crate) progress_data: Vec<ProgressPoint>,
    pub(crate) total_marks: f64,
    pub(crate) average_marks: f64,
    pub(crate) highest_mark: f64,
    pub(crate) lowest_mark: f64,
    pub(crate) trend: Trend,
    pub(crate) trend_percentage: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OverallStats {
    pub(crate) total_students: usize,
    pub(crate) class_average: f64,
    pub(crate) highest_overall: f64,
    pub(crate) lowest_overall: f64,
    pub(crate) students_improving: usize,
    pub(crate) students_declining: usize,
    pub(crate) students_stable: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClassProgressResponse {
    pub(crate) message: String,
    pub(crate) overall_stats: OverallStats,
    pub(crate) chart_data: ChartData,
    pub(crate) student_details: Vec<StudentProgressDetail>,
    pub(crate) graph_config: GraphConfig,
}
