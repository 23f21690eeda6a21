//! Delivery duration vs. review satisfaction

use crate::data::OrderRecord;
use crate::error::AnalyticsError;
use std::collections::BTreeMap;

/// Mean review score for one delivery duration.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryReviewPoint {
    /// Whole days between purchase and delivery. Negative values (delivered
    /// before purchase in the source data) are preserved, not filtered.
    pub delivery_days: i64,
    pub mean_score: f64,
    pub review_count: u64,
}

/// Least-squares line over (delivery_days, mean_score) pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Derived table for the delivery-satisfaction analytic.
#[derive(Debug, Clone)]
pub struct DeliverySatisfaction {
    /// One point per distinct duration, ascending by day count.
    pub points: Vec<DeliveryReviewPoint>,
    /// `None` when fewer than two distinct durations exist to fit through.
    pub trend: Option<TrendLine>,
}

/// Compute mean review score per whole-day delivery duration.
///
/// Records missing either the delivery date or the review score are excluded
/// before aggregation; nothing is imputed.
pub fn delivery_satisfaction(
    records: &[OrderRecord],
) -> Result<DeliverySatisfaction, AnalyticsError> {
    let mut buckets: BTreeMap<i64, (f64, u64)> = BTreeMap::new();

    for record in records {
        let (Some(purchase), Some(delivered), Some(score)) =
            (record.purchase_ts, record.delivered_ts, record.review_score)
        else {
            continue;
        };
        let days = (delivered - purchase).num_days();
        let entry = buckets.entry(days).or_insert((0.0, 0));
        entry.0 += f64::from(score);
        entry.1 += 1;
    }

    if buckets.is_empty() {
        return Err(AnalyticsError::EmptyResult {
            analytic: "delivery satisfaction",
        });
    }

    let points: Vec<DeliveryReviewPoint> = buckets
        .into_iter()
        .map(|(delivery_days, (sum, count))| DeliveryReviewPoint {
            delivery_days,
            mean_score: sum / count as f64,
            review_count: count,
        })
        .collect();
    let trend = fit_trend(&points);

    Ok(DeliverySatisfaction { points, trend })
}

/// Fit a least-squares line through the aggregated points.
///
/// Returns `None` when fewer than two distinct x-values exist; the caller
/// simply omits the trend reference line in that case.
pub fn fit_trend(points: &[DeliveryReviewPoint]) -> Option<TrendLine> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;

    for point in points {
        let x = point.delivery_days as f64;
        let y = point.mean_score;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator.abs() < f64::EPSILON {
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    Some(TrendLine { slope, intercept })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::parse_timestamp;

    fn delivered_order(purchase: &str, delivered: &str, score: u8) -> OrderRecord {
        OrderRecord {
            customer_id: "c".to_string(),
            order_id: "o".to_string(),
            customer_state: Some("SP".to_string()),
            purchase_ts: Some(parse_timestamp(purchase).unwrap()),
            delivered_ts: Some(parse_timestamp(delivered).unwrap()),
            product_category: None,
            price: None,
            review_score: Some(score),
            review_comment: None,
        }
    }

    #[test]
    fn test_mean_score_per_duration() {
        let records = vec![
            delivered_order("2024-01-01 00:00:00", "2024-01-03 00:00:00", 5),
            delivered_order("2024-01-01 00:00:00", "2024-01-03 00:00:00", 3),
            delivered_order("2024-01-01 00:00:00", "2024-01-05 00:00:00", 4),
        ];

        let analysis = delivery_satisfaction(&records).unwrap();
        assert_eq!(analysis.points.len(), 2);
        assert_eq!(analysis.points[0].delivery_days, 2);
        assert_eq!(analysis.points[0].mean_score, 4.0);
        assert_eq!(analysis.points[0].review_count, 2);
        assert_eq!(analysis.points[1].delivery_days, 4);
        assert_eq!(analysis.points[1].mean_score, 4.0);
    }

    #[test]
    fn test_partial_days_truncate() {
        let records = vec![delivered_order(
            "2024-01-01 10:00:00",
            "2024-01-04 09:59:00",
            5,
        )];
        let analysis = delivery_satisfaction(&records).unwrap();
        assert_eq!(analysis.points[0].delivery_days, 2);
    }

    #[test]
    fn test_negative_duration_preserved() {
        let records = vec![delivered_order(
            "2024-01-10 00:00:00",
            "2024-01-05 00:00:00",
            1,
        )];
        let analysis = delivery_satisfaction(&records).unwrap();
        assert_eq!(analysis.points[0].delivery_days, -5);
    }

    #[test]
    fn test_missing_fields_excluded() {
        let mut incomplete = delivered_order("2024-01-01 00:00:00", "2024-01-02 00:00:00", 5);
        incomplete.review_score = None;
        let records = vec![
            incomplete,
            delivered_order("2024-01-01 00:00:00", "2024-01-04 00:00:00", 2),
        ];

        let analysis = delivery_satisfaction(&records).unwrap();
        assert_eq!(analysis.points.len(), 1);
        assert_eq!(analysis.points[0].delivery_days, 3);
    }

    #[test]
    fn test_trend_fit_on_known_line() {
        // y = 0.5x + 1 exactly
        let points = vec![
            DeliveryReviewPoint { delivery_days: 0, mean_score: 1.0, review_count: 1 },
            DeliveryReviewPoint { delivery_days: 2, mean_score: 2.0, review_count: 1 },
            DeliveryReviewPoint { delivery_days: 4, mean_score: 3.0, review_count: 1 },
        ];

        let line = fit_trend(&points).unwrap();
        assert!((line.slope - 0.5).abs() < 1e-9);
        assert!((line.intercept - 1.0).abs() < 1e-9);
        assert!((line.value_at(6.0) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_needs_two_points() {
        let points = vec![DeliveryReviewPoint {
            delivery_days: 3,
            mean_score: 4.5,
            review_count: 7,
        }];
        assert!(fit_trend(&points).is_none());

        let records = vec![delivered_order(
            "2024-01-01 00:00:00",
            "2024-01-04 00:00:00",
            4,
        )];
        let analysis = delivery_satisfaction(&records).unwrap();
        assert!(analysis.trend.is_none());
    }
}
