//! Report endpoints: grouped aggregation, time series, CSV export.
//!
//! Query parsing is deliberately permissive: unknown status values, bad
//! dates, and non-numeric age bounds are dropped rather than rejected, so a
//! stale dashboard URL still renders.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use member_audience::{FilterSpec, Predicate};
use member_reporting::{aggregate, timeseries, to_csv, Granularity, GroupBy, TimeSeriesPoint};
use serde::Deserialize;

use crate::rest::{map_error, ApiError, AppState, DataEnvelope};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportQuery {
    pub group_by: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub granularity: Option<String>,
    /// Comma-separated lists.
    pub status: Option<String>,
    pub gender: Option<String>,
    pub region: Option<String>,
    pub industry_type: Option<String>,
    pub age_min: Option<String>,
    pub age_max: Option<String>,
}

fn split_list(raw: Option<&String>) -> Option<Vec<String>> {
    let values: Vec<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp; anything else is
/// treated as absent.
fn parse_date(raw: Option<&String>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc().date())
        })
}

fn filter_spec(q: &ReportQuery) -> FilterSpec {
    FilterSpec {
        status: split_list(q.status.as_ref()),
        gender: split_list(q.gender.as_ref()),
        region: split_list(q.region.as_ref()),
        industry_type: split_list(q.industry_type.as_ref()),
        age_min: q.age_min.clone().map(serde_json::Value::String),
        age_max: q.age_max.clone().map(serde_json::Value::String),
    }
}

/// The date window applies only when both endpoints parse.
fn predicate(q: &ReportQuery) -> Predicate {
    let pred = Predicate::build(&filter_spec(q));
    match (parse_date(q.from.as_ref()), parse_date(q.to.as_ref())) {
        (Some(from), Some(to)) => pred.joined_between(from, to),
        _ => pred,
    }
}

/// GET /api/v1/reports/aggregate
pub async fn handle_aggregate(
    State(state): State<AppState>,
    Query(q): Query<ReportQuery>,
) -> Result<Json<DataEnvelope<Vec<member_reporting::AggregationBucket>>>, ApiError> {
    let group_by = q
        .group_by
        .as_deref()
        .and_then(GroupBy::parse)
        .unwrap_or(GroupBy::Region);
    let pred = predicate(&q);

    let data = aggregate(&*state.registry, &pred, group_by).map_err(map_error)?;
    metrics::counter!("reports.aggregate.requests").increment(1);
    Ok(Json(DataEnvelope { data }))
}

/// GET /api/v1/reports/timeseries
pub async fn handle_timeseries(
    State(state): State<AppState>,
    Query(q): Query<ReportQuery>,
) -> Result<Json<DataEnvelope<Vec<TimeSeriesPoint>>>, ApiError> {
    let granularity = q
        .granularity
        .as_deref()
        .and_then(Granularity::parse)
        .unwrap_or(Granularity::Month);

    // Without a usable window there is nothing to gap-fill.
    let (Some(from), Some(to)) = (parse_date(q.from.as_ref()), parse_date(q.to.as_ref())) else {
        return Ok(Json(DataEnvelope { data: Vec::new() }));
    };

    let pred = Predicate::build(&filter_spec(&q));
    let data =
        timeseries(&*state.registry, &pred, from, to, granularity).map_err(map_error)?;
    metrics::counter!("reports.timeseries.requests").increment(1);
    Ok(Json(DataEnvelope { data }))
}

/// GET /api/v1/reports/export — aggregate, rendered as a CSV attachment.
pub async fn handle_export(
    State(state): State<AppState>,
    Query(q): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let group_by = q
        .group_by
        .as_deref()
        .and_then(GroupBy::parse)
        .unwrap_or(GroupBy::Region);
    let pred = predicate(&q);

    let rows = aggregate(&*state.registry, &pred, group_by).map_err(map_error)?;
    metrics::counter!("reports.export.requests").increment(1);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"report.csv\"",
            ),
        ],
        to_csv(&rows),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_trims_and_drops_empties() {
        let raw = Some(" Kuching, ,Miri,".to_string());
        assert_eq!(
            split_list(raw.as_ref()),
            Some(vec!["Kuching".to_string(), "Miri".to_string()])
        );
        assert_eq!(split_list(Some(&",,".to_string())), None);
        assert_eq!(split_list(None), None);
    }

    #[test]
    fn parse_date_accepts_plain_and_rfc3339() {
        assert_eq!(
            parse_date(Some(&"2025-01-01".to_string())),
            NaiveDate::from_ymd_opt(2025, 1, 1)
        );
        assert_eq!(
            parse_date(Some(&"2025-06-30T12:00:00Z".to_string())),
            NaiveDate::from_ymd_opt(2025, 6, 30)
        );
        assert_eq!(parse_date(Some(&"last tuesday".to_string())), None);
    }

    #[test]
    fn filter_spec_carries_age_bounds_as_raw_strings() {
        let q = ReportQuery {
            age_min: Some("30".into()),
            age_max: Some("nope".into()),
            ..Default::default()
        };
        let spec = filter_spec(&q);
        // The bad bound survives here; the predicate builder drops it.
        assert_eq!(spec.age_min, Some(serde_json::Value::String("30".into())));
        let pred = Predicate::build(&spec);
        assert_eq!(pred, {
            let only_min = FilterSpec {
                age_min: Some(serde_json::Value::String("30".into())),
                ..Default::default()
            };
            Predicate::build(&only_min)
        });
    }
}
