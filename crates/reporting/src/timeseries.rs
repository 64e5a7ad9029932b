//! Membership-growth time series.
//!
//! Unlike a plain SQL `GROUP BY`, the output is dense: every period between
//! `from` and `to` appears, zero counts included, so charts never skip
//! quiet months.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use member_audience::Predicate;
use member_core::MemberResult;
use member_registry::{MemberStore, SelectOrder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Month,
    Year,
}

impl Granularity {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "day" => Some(Granularity::Day),
            "month" => Some(Granularity::Month),
            "year" => Some(Granularity::Year),
            _ => None,
        }
    }
}

/// One point in a dense, ascending series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub period: String,
    pub count: u64,
}

/// Bucket matching members by membership date over `[from, to]` inclusive.
/// An inverted range yields an empty series; members without a membership
/// date never tally.
pub fn timeseries(
    store: &dyn MemberStore,
    pred: &Predicate,
    from: NaiveDate,
    to: NaiveDate,
    granularity: Granularity,
) -> MemberResult<Vec<TimeSeriesPoint>> {
    if from > to {
        return Ok(Vec::new());
    }

    let scoped = pred.clone().joined_between(from, to);
    let rows = store.select(&scoped, SelectOrder::IdAsc, 0, None)?;

    let mut tally: HashMap<String, u64> = HashMap::new();
    for member in rows {
        if let Some(date) = member.membership_date {
            *tally.entry(period_key(date, granularity)).or_insert(0) += 1;
        }
    }

    Ok(periods(from, to, granularity)
        .into_iter()
        .map(|period| {
            let count = tally.get(&period).copied().unwrap_or(0);
            TimeSeriesPoint { period, count }
        })
        .collect())
}

/// Format a date into its period key. UTC calendar fields throughout; no
/// timezone drift.
fn period_key(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day => format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day()),
        Granularity::Month => format!("{:04}-{:02}", date.year(), date.month()),
        Granularity::Year => format!("{:04}", date.year()),
    }
}

/// Every period key in `[from, to]` inclusive, ascending.
fn periods(from: NaiveDate, to: NaiveDate, granularity: Granularity) -> Vec<String> {
    match granularity {
        Granularity::Day => from
            .iter_days()
            .take_while(|d| *d <= to)
            .map(|d| period_key(d, granularity))
            .collect(),
        Granularity::Month => {
            let mut out = Vec::new();
            let (mut year, mut month) = (from.year(), from.month());
            let end = (to.year(), to.month());
            while (year, month) <= end {
                out.push(format!("{year:04}-{month:02}"));
                month += 1;
                if month > 12 {
                    month = 1;
                    year += 1;
                }
            }
            out
        }
        Granularity::Year => (from.year()..=to.year())
            .map(|y| format!("{y:04}"))
            .collect(),
    }
}
