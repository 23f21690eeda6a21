//! Monthly order counts per geographical region

use crate::data::OrderRecord;
use crate::error::AnalyticsError;
use crate::period::MonthKey;
use std::collections::BTreeMap;

/// Count orders per (calendar month, region) pair.
///
/// Records with a null region or an unparseable purchase timestamp are
/// excluded. Pairs with zero orders are absent from the map; rendering treats
/// the missing cells as zero when it builds a dense matrix. Keys iterate in
/// chronological order, so repeated runs yield identical tables.
pub fn monthly_order_counts(
    records: &[OrderRecord],
) -> Result<BTreeMap<(MonthKey, String), u64>, AnalyticsError> {
    let mut counts: BTreeMap<(MonthKey, String), u64> = BTreeMap::new();

    for record in records {
        let (Some(ts), Some(region)) = (record.purchase_ts, record.customer_state.as_ref()) else {
            continue;
        };
        *counts
            .entry((MonthKey::from_datetime(ts), region.clone()))
            .or_insert(0) += 1;
    }

    if counts.is_empty() {
        return Err(AnalyticsError::EmptyResult {
            analytic: "monthly order trend",
        });
    }
    Ok(counts)
}

/// Distinct months present in the counts, chronologically ordered.
pub fn months(counts: &BTreeMap<(MonthKey, String), u64>) -> Vec<MonthKey> {
    let mut months: Vec<MonthKey> = counts.keys().map(|(month, _)| *month).collect();
    months.dedup();
    months
}

/// Distinct regions present in the counts, sorted by name.
pub fn regions(counts: &BTreeMap<(MonthKey, String), u64>) -> Vec<String> {
    let mut regions: Vec<String> = counts.keys().map(|(_, region)| region.clone()).collect();
    regions.sort();
    regions.dedup();
    regions
}
