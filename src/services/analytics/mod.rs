pub(crate) mod chart;
pub(crate) mod stats;
pub(crate) mod trend;

use std::collections::HashMap;

use sqlx::PgPool;
use thiserror::Error;
use time::PrimitiveDateTime;

use crate::core::metrics;
use crate::core::time::{format_day, format_primitive, parse_bound, DayBound};
use crate::db::models::{MarkDetail, UserBrief};
use crate::repositories::{classes, marks, users};
use crate::schemas::analytics::{
    ChartData, ClassProgressResponse, ClassStats, ClassSummaryResponse, OverallStats,
    ProgressPoint, StudentProgressDetail, StudentProgressResponse, StudentRef, StudentStats,
    StudentSummary,
};
use crate::schemas::mark::MarkResponse;
use crate::services::roster::{validate_id, RosterError};
use stats::round2;
use trend::Trend;

const UNKNOWN: &str = "Unknown";
const UNKNOWN_SUBJECT: &str = "Unknown Subject";

#[derive(Debug, Error)]
pub(crate) enum AnalyticsError {
    #[error("{0}")]
    Invalid(String),
    #[error("Class not found")]
    ClassNotFound,
    #[error("No students enrolled in this class")]
    NoStudents,
    #[error("No marks found for this class")]
    NoClassMarks,
    #[error("Student not found")]
    StudentNotFound,
    #[error("No marks found for this student")]
    NoStudentMarks,
    #[error("No marks data found for the given criteria")]
    NoMatchingMarks,
    #[error("analytics query failed: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<RosterError> for AnalyticsError {
    fn from(error: RosterError) -> Self {
        match error {
            RosterError::Database(error) => Self::Database(error),
            other => Self::Invalid(other.to_string()),
        }
    }
}

/// Query for the multi-student progress graph. Every present field narrows the result.
#[derive(Debug, Default, Clone)]
pub(crate) struct ProgressFilter {
    pub(crate) student_id: Option<String>,
    pub(crate) class_id: Option<String>,
    pub(crate) start: Option<PrimitiveDateTime>,
    pub(crate) end: Option<PrimitiveDateTime>,
}

impl ProgressFilter {
    /// Accepts RFC 3339 timestamps or plain dates; a plain `end` date covers that whole day.
    pub(crate) fn parse(
        student_id: Option<&str>,
        class_id: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Self, AnalyticsError> {
        let student_id = non_blank(student_id).map(|id| validate_id(id, "student")).transpose()?;
        let class_id = non_blank(class_id).map(|id| validate_id(id, "class")).transpose()?;

        let start = non_blank(start)
            .map(|raw| {
                parse_bound(raw, DayBound::Start)
                    .ok_or_else(|| AnalyticsError::Invalid("Invalid startDate".to_string()))
            })
            .transpose()?;
        let end = non_blank(end)
            .map(|raw| {
                parse_bound(raw, DayBound::End)
                    .ok_or_else(|| AnalyticsError::Invalid("Invalid endDate".to_string()))
            })
            .transpose()?;

        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(AnalyticsError::Invalid(
                    "startDate must not be after endDate".to_string(),
                ));
            }
        }

        Ok(Self { student_id, class_id, start, end })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

pub(crate) async fn class_summary(
    pool: &PgPool,
    class_id: &str,
) -> Result<ClassSummaryResponse, AnalyticsError> {
    metrics::record_analytics_request("class_summary");
    let class_id = validate_id(class_id, "class")?;

    let class = classes::find_by_id(pool, &class_id).await?.ok_or(AnalyticsError::ClassNotFound)?;
    let student_ids = classes::list_student_ids(pool, &class.id).await?;
    if student_ids.is_empty() {
        return Err(AnalyticsError::NoStudents);
    }

    let filter =
        marks::MarkFilter { student_ids: Some(student_ids.clone()), ..Default::default() };
    let entries = marks::list_details(pool, &filter).await?;
    let people = users::list_briefs_by_ids(pool, &student_ids).await?;

    summarize_class(class.id, class.name, &student_ids, &people, &entries)
}

/// Stats over every entry of the enrolled students, then one summary per student in roster order.
pub(crate) fn summarize_class(
    class_id: String,
    class_name: String,
    student_ids: &[String],
    people: &[UserBrief],
    entries: &[MarkDetail],
) -> Result<ClassSummaryResponse, AnalyticsError> {
    if student_ids.is_empty() {
        return Err(AnalyticsError::NoStudents);
    }
    let scores: Vec<f64> = entries.iter().map(|entry| entry.score).collect();
    let (Some(highest_mark), Some(lowest_mark), Some(average_mark)) =
        (stats::max(&scores), stats::min(&scores), stats::mean(&scores))
    else {
        return Err(AnalyticsError::NoClassMarks);
    };

    let people: HashMap<&str, &UserBrief> =
        people.iter().map(|person| (person.id.as_str(), person)).collect();

    let students = student_ids
        .iter()
        .map(|student_id| {
            let own: Vec<&MarkDetail> =
                entries.iter().filter(|entry| &entry.student_id == student_id).collect();
            let own_scores: Vec<f64> = own.iter().map(|entry| entry.score).collect();
            let person = people.get(student_id.as_str());

            StudentSummary {
                student_id: student_id.clone(),
                name: person.map_or_else(|| UNKNOWN.to_string(), |p| p.name.clone()),
                email: person.map_or_else(|| UNKNOWN.to_string(), |p| p.email.clone()),
                total_marks: own_scores.iter().sum(),
                average_marks: stats::mean(&own_scores).unwrap_or(0.0),
                subjects_count: own.len(),
                marks: own.into_iter().map(MarkResponse::from_detail).collect(),
            }
        })
        .collect();

    Ok(ClassSummaryResponse {
        message: "Class result summary".to_string(),
        class_id,
        class_name,
        class_stats: ClassStats {
            total_students: student_ids.len(),
            total_mark_entries: entries.len(),
            highest_mark,
            lowest_mark,
            average_mark,
        },
        students,
    })
}

pub(crate) async fn student_progress(
    pool: &PgPool,
    student_id: &str,
) -> Result<StudentProgressResponse, AnalyticsError> {
    metrics::record_analytics_request("student_progress");
    let student_id = validate_id(student_id, "student")?;

    let student =
        users::find_by_id(pool, &student_id).await?.ok_or(AnalyticsError::StudentNotFound)?;
    let filter = marks::MarkFilter { student_id: Some(student.id.clone()), ..Default::default() };
    let entries = marks::list_details(pool, &filter).await?;

    build_student_progress(
        StudentRef { id: student.id, name: student.name, email: student.email },
        &entries,
    )
}

/// `entries` must already be in chronological order.
pub(crate) fn build_student_progress(
    student: StudentRef,
    entries: &[MarkDetail],
) -> Result<StudentProgressResponse, AnalyticsError> {
    let progress_data: Vec<ProgressPoint> = entries.iter().map(progress_point).collect();
    let scores: Vec<f64> = entries.iter().map(|entry| entry.score).collect();
    let (Some(highest_mark), Some(lowest_mark), Some(average)) =
        (stats::max(&scores), stats::min(&scores), stats::mean(&scores))
    else {
        return Err(AnalyticsError::NoStudentMarks);
    };

    let average_marks = round2(average);
    let summary = trend::classify(&scores);
    let chart_data = chart::student_chart(&student.name, &progress_data, average_marks);
    let graph_config = chart::student_graph_config(&student.name);

    Ok(StudentProgressResponse {
        message: "Student progress graph generated successfully".to_string(),
        stats: StudentStats {
            total_entries: scores.len(),
            total_marks: scores.iter().sum(),
            average_marks,
            highest_mark,
            lowest_mark,
            standard_deviation: round2(stats::population_std_dev(&scores)),
        },
        student,
        trend: summary.trend,
        trend_percentage: summary.percentage,
        progress_data,
        chart_data,
        graph_config,
    })
}

pub(crate) async fn class_progress(
    pool: &PgPool,
    filter: &ProgressFilter,
) -> Result<ClassProgressResponse, AnalyticsError> {
    metrics::record_analytics_request("class_progress");

    let mut mark_filter = marks::MarkFilter {
        student_id: filter.student_id.clone(),
        student_ids: None,
        created_from: filter.start,
        created_to: filter.end,
    };
    if let Some(class_id) = filter.class_id.as_deref() {
        let class =
            classes::find_by_id(pool, class_id).await?.ok_or(AnalyticsError::ClassNotFound)?;
        mark_filter.student_ids = Some(classes::list_student_ids(pool, &class.id).await?);
    }

    let entries = marks::list_details(pool, &mark_filter).await?;
    build_class_progress(&entries)
}

/// Groups chronologically ordered entries by student (first appearance order) and rolls them up.
pub(crate) fn build_class_progress(
    entries: &[MarkDetail],
) -> Result<ClassProgressResponse, AnalyticsError> {
    let mut order: Vec<&str> = Vec::new();
    let mut grouped: HashMap<&str, Vec<&MarkDetail>> = HashMap::new();
    for entry in entries {
        let bucket = grouped.entry(entry.student_id.as_str()).or_default();
        if bucket.is_empty() {
            order.push(entry.student_id.as_str());
        }
        bucket.push(entry);
    }

    let details: Vec<StudentProgressDetail> = order
        .iter()
        .filter_map(|student_id| grouped.get(student_id))
        .filter_map(|own| student_detail(own))
        .collect();
    if details.is_empty() {
        return Err(AnalyticsError::NoMatchingMarks);
    }

    let labels = chart::date_axis(details.iter().map(|detail| detail.progress_data.as_slice()));
    let datasets = details
        .iter()
        .enumerate()
        .map(|(index, detail)| {
            chart::class_dataset(
                index,
                detail.student_name.clone(),
                &labels,
                &detail.progress_data,
            )
        })
        .collect();

    let averages: Vec<f64> = details.iter().map(|detail| detail.average_marks).collect();
    let highs: Vec<f64> = details.iter().map(|detail| detail.highest_mark).collect();
    let lows: Vec<f64> = details.iter().map(|detail| detail.lowest_mark).collect();
    let count = |trend: Trend| details.iter().filter(|detail| detail.trend == trend).count();

    let overall_stats = OverallStats {
        total_students: details.len(),
        class_average: round2(stats::mean(&averages).unwrap_or(0.0)),
        highest_overall: stats::max(&highs).unwrap_or(0.0),
        lowest_overall: stats::min(&lows).unwrap_or(0.0),
        students_improving: count(Trend::Improving),
        students_declining: count(Trend::Declining),
        students_stable: count(Trend::Stable),
    };

    Ok(ClassProgressResponse {
        message: "Student progress graph data generated successfully".to_string(),
        overall_stats,
        chart_data: ChartData { labels, datasets },
        student_details: details,
        graph_config: chart::class_graph_config(),
    })
}

fn student_detail(own: &[&MarkDetail]) -> Option<StudentProgressDetail> {
    let first = own.first()?;
    let scores: Vec<f64> = own.iter().map(|entry| entry.score).collect();
    let summary = trend::classify(&scores);

    Some(StudentProgressDetail {
        student_id: first.student_id.clone(),
        student_name: first.student_name.clone().unwrap_or_else(|| UNKNOWN.to_string()),
        student_email: first.student_email.clone().unwrap_or_else(|| UNKNOWN.to_string()),
        progress_data: own.iter().map(|entry| progress_point(entry)).collect(),
        total_marks: scores.iter().sum(),
        average_marks: round2(stats::mean(&scores)?),
        highest_mark: stats::max(&scores)?,
        lowest_mark: stats::min(&scores)?,
        trend: summary.trend,
        trend_percentage: summary.percentage,
    })
}

fn progress_point(entry: &MarkDetail) -> ProgressPoint {
    ProgressPoint {
        marks: entry.score,
        subject: entry.class_name.clone().unwrap_or_else(|| UNKNOWN_SUBJECT.to_string()),
        subject_id: entry.class_id.clone(),
        date: format_primitive(entry.created_at),
        formatted_date: format_day(entry.created_at),
    }
}
