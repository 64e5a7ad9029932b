//! Filter specification — the structured, multi-dimensional query input
//! shared by reports and blast audiences.

use serde::{Deserialize, Serialize};

/// Which members match a query. Absent keys mean "no constraint on that
/// dimension"; dimensions AND together, values within one dimension OR.
/// Built per-request from UI input or loaded from a persisted audience and
/// never mutated afterwards.
///
/// Age bounds arrive as either numbers or strings depending on whether the
/// caller read them from a form field, so they stay loose here and are
/// parsed when the predicate is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    pub status: Option<Vec<String>>,
    pub gender: Option<Vec<String>>,
    pub region: Option<Vec<String>>,
    pub industry_type: Option<Vec<String>>,
    pub age_min: Option<serde_json::Value>,
    pub age_max: Option<serde_json::Value>,
}

/// Lenient age-bound parsing: numbers pass through, numeric strings parse,
/// everything else is silently ignored.
pub(crate) fn parse_age_bound(value: &serde_json::Value) -> Option<i64> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if n.is_finite() {
        Some(n as i64)
    } else {
        None
    }
}
