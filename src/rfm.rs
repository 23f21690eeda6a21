//! RFM customer segmentation
//!
//! Recency, frequency and monetary value per customer, each scored into
//! population quintiles, then classified into a segment by ordered rules.

use crate::data::{max_purchase_timestamp, OrderRecord};
use crate::error::AnalyticsError;
use chrono::{Duration, NaiveDateTime};
use std::collections::BTreeMap;
use std::fmt;

/// Customer value segment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    LowValue,
    MidValue,
    Churn,
    HighValue,
}

impl Segment {
    pub const ALL: [Segment; 4] = [
        Segment::HighValue,
        Segment::MidValue,
        Segment::LowValue,
        Segment::Churn,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Segment::LowValue => "Low Value",
            Segment::MidValue => "Mid Value",
            Segment::Churn => "Churn",
            Segment::HighValue => "High Value",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One scored and classified customer.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRfm {
    pub customer_id: String,
    /// Whole days since the customer's latest purchase, measured against the
    /// dataset's maximum purchase timestamp plus one day.
    pub recency_days: i64,
    pub frequency: u64,
    pub monetary: f64,
    pub r_score: u8,
    pub f_score: u8,
    pub m_score: u8,
    /// The three score digits concatenated, e.g. "545".
    pub rfm_code: String,
    pub segment: Segment,
}

/// Compute RFM metrics, quintile scores and segment labels per customer.
///
/// Rows without a parseable purchase timestamp are excluded. Output is sorted
/// by customer id, so repeated runs over the same dataset are identical.
pub fn rfm_segments(records: &[OrderRecord]) -> Result<Vec<CustomerRfm>, AnalyticsError> {
    struct Accum {
        last_purchase: NaiveDateTime,
        frequency: u64,
        monetary: f64,
    }

    let Some(max_ts) = max_purchase_timestamp(records) else {
        return Err(AnalyticsError::EmptyResult { analytic: "rfm" });
    };
    let today = max_ts + Duration::days(1);

    let mut customers: BTreeMap<String, Accum> = BTreeMap::new();
    for record in records {
        let Some(ts) = record.purchase_ts else {
            continue;
        };
        let entry = customers
            .entry(record.customer_id.clone())
            .or_insert(Accum {
                last_purchase: ts,
                frequency: 0,
                monetary: 0.0,
            });
        entry.last_purchase = entry.last_purchase.max(ts);
        entry.frequency += 1;
        entry.monetary += record.price.unwrap_or(0.0);
    }

    if customers.is_empty() {
        return Err(AnalyticsError::EmptyResult { analytic: "rfm" });
    }

    let recencies: Vec<f64> = customers
        .values()
        .map(|c| (today - c.last_purchase).num_days() as f64)
        .collect();
    let frequencies: Vec<f64> = customers.values().map(|c| c.frequency as f64).collect();
    let monetaries: Vec<f64> = customers.values().map(|c| c.monetary).collect();

    let recency_bins = Quintiles::fit(&recencies);
    let frequency_bins = Quintiles::fit(&frequencies);
    let monetary_bins = Quintiles::fit(&monetaries);

    let rows = customers
        .into_iter()
        .map(|(customer_id, accum)| {
            let recency_days = (today - accum.last_purchase).num_days();
            let r_score = recency_bins.score_descending(recency_days as f64);
            let f_score = frequency_bins.score_ascending(accum.frequency as f64);
            let m_score = monetary_bins.score_ascending(accum.monetary);
            CustomerRfm {
                customer_id,
                recency_days,
                frequency: accum.frequency,
                monetary: accum.monetary,
                r_score,
                f_score,
                m_score,
                rfm_code: format!("{r_score}{f_score}{m_score}"),
                segment: classify(r_score, f_score, m_score),
            }
        })
        .collect();

    Ok(rows)
}

/// Count customers per segment, in `Segment::ALL` order. Empty segments are
/// reported with zero so charts always show all four bars.
pub fn segment_counts(rows: &[CustomerRfm]) -> Vec<(Segment, u64)> {
    Segment::ALL
        .iter()
        .map(|&segment| {
            let count = rows.iter().filter(|r| r.segment == segment).count() as u64;
            (segment, count)
        })
        .collect()
}

/// Ordered classification rules; the last matching rule wins.
fn classify(r: u8, f: u8, m: u8) -> Segment {
    let mut segment = Segment::LowValue;
    if r >= 3 && f >= 3 {
        segment = Segment::MidValue;
    }
    if r <= 2 && f <= 2 && m <= 2 {
        segment = Segment::Churn;
    }
    if r >= 4 && f >= 4 && m >= 4 {
        segment = Segment::HighValue;
    }
    segment
}

/// Quintile bucketing fitted on one metric's population.
///
/// Edges sit at the 0/20/40/60/80/100th percentiles, computed with linear
/// interpolation between order statistics. Duplicate edges collapse, so a
/// distribution with too few distinct values yields fewer than five effective
/// buckets instead of failing. Intervals are right-closed: a value equal to an
/// edge falls in the lower bucket.
#[derive(Debug, Clone)]
struct Quintiles {
    edges: Vec<f64>,
}

impl Quintiles {
    fn fit(values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mut edges: Vec<f64> = (0..=5)
            .map(|i| interpolated_quantile(&sorted, f64::from(i) / 5.0))
            .collect();
        edges.dedup();
        Self { edges }
    }

    /// Number of effective buckets after collapsing.
    fn bucket_count(&self) -> u8 {
        (self.edges.len().saturating_sub(1)).max(1) as u8
    }

    fn bucket_of(&self, value: f64) -> u8 {
        if self.edges.len() < 3 {
            return 0;
        }
        let inner = &self.edges[1..self.edges.len() - 1];
        inner.iter().filter(|edge| value > **edge).count() as u8
    }

    /// Higher value, higher score (frequency, monetary).
    fn score_ascending(&self, value: f64) -> u8 {
        self.bucket_of(value) + 1
    }

    /// Lower value, higher score (recency: most recent quintile scores top).
    fn score_descending(&self, value: f64) -> u8 {
        self.bucket_count() - self.bucket_of(value)
    }
}

fn interpolated_quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
