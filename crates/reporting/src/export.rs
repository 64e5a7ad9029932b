//! CSV export of grouped report rows.

use crate::aggregate::AggregationBucket;

/// Serialize report rows to CSV in input order.
///
/// Every field is quoted, needed or not, with embedded quotes doubled.
/// Downstream spreadsheets consume this exact shape; keep it byte-stable.
pub fn to_csv(rows: &[AggregationBucket]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format!("{},{}", quote("Label"), quote("Count")));
    for row in rows {
        lines.push(format!("{},{}", quote(&row.label), quote(&row.count.to_string())));
    }
    lines.join("\n")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
