//! Product category revenue ranking over the recent sales window

use crate::data::{max_purchase_timestamp, OrderRecord};
use crate::error::AnalyticsError;
use chrono::Months;
use std::collections::HashMap;

/// How many calendar months of history count as "recent".
const WINDOW_MONTHS: u32 = 6;

/// How many categories the ranking retains.
const TOP_CATEGORIES: usize = 10;

/// Summed revenue for one product category within the window.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: f64,
}

/// Rank product categories by revenue over the last six calendar months.
///
/// The window is anchored at the dataset's latest purchase timestamp and is
/// inclusive at its lower bound. Output holds at most the top ten categories,
/// strictly descending by revenue; equal revenues keep the order in which the
/// categories first appeared in the input. Categories without a matching
/// record are never emitted.
pub fn top_categories(records: &[OrderRecord]) -> Result<Vec<CategoryRevenue>, AnalyticsError> {
    let Some(max_ts) = max_purchase_timestamp(records) else {
        return Err(AnalyticsError::EmptyResult {
            analytic: "category ranking",
        });
    };
    let cutoff = max_ts.checked_sub_months(Months::new(WINDOW_MONTHS));

    struct Accum {
        revenue: f64,
        first_seen: usize,
    }
    let mut by_category: HashMap<String, Accum> = HashMap::new();

    for record in records {
        let (Some(ts), Some(category), Some(price)) = (
            record.purchase_ts,
            record.product_category.as_ref(),
            record.price,
        ) else {
            continue;
        };
        if let Some(cutoff) = cutoff {
            if ts < cutoff {
                continue;
            }
        }
        let next_index = by_category.len();
        let entry = by_category.entry(category.clone()).or_insert(Accum {
            revenue: 0.0,
            first_seen: next_index,
        });
        entry.revenue += price;
    }

    if by_category.is_empty() {
        return Err(AnalyticsError::EmptyResult {
            analytic: "category ranking",
        });
    }

    let mut ranked: Vec<(String, Accum)> = by_category.into_iter().collect();
    ranked.sort_by(|(_, a), (_, b)| {
        b.revenue
            .total_cmp(&a.revenue)
            .then(a.first_seen.cmp(&b.first_seen))
    });
    ranked.truncate(TOP_CATEGORIES);

    Ok(ranked
        .into_iter()
        .map(|(category, accum)| CategoryRevenue {
            category,
            revenue: accum.revenue,
        })
        .collect())
}
