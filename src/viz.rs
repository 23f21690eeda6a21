//! Chart rendering with Plotters
//!
//! Each function turns one derived table into a PNG. The analytics emit
//! sparse tables; densification (absent cells drawn as zero) happens here.

use crate::category::CategoryRevenue;
use crate::delivery::DeliverySatisfaction;
use crate::period::MonthKey;
use crate::rfm::Segment;
use crate::sentiment::{Sentiment, SentimentCounts};
use crate::trend;
use plotters::prelude::*;
use std::collections::BTreeMap;

/// Sentiment bar colors, in `Sentiment::ALL` order.
const SENTIMENT_COLORS: [RGBColor; 3] = [GREEN, RED, BLUE];

/// Line chart of monthly order counts, one series per region.
///
/// Cells absent from the counts map are drawn as zero.
pub fn plot_monthly_trend(
    counts: &BTreeMap<(MonthKey, String), u64>,
    output_path: &str,
) -> crate::Result<()> {
    let months = trend::months(counts);
    let regions = trend::regions(counts);

    let max_count = counts.values().copied().max().unwrap_or(1) as f64;

    let root = BitMapBackend::new(output_path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Monthly Orders by Region", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..months.len() as f64, 0f64..max_count * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("Month")
        .y_desc("Number of Orders")
        .x_labels(months.len().min(12))
        .x_label_formatter(&|x| {
            months
                .get(x.round() as usize)
                .map(ToString::to_string)
                .unwrap_or_default()
        })
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (idx, region) in regions.iter().enumerate() {
        let color = Palette99::pick(idx);
        let series: Vec<(f64, f64)> = months
            .iter()
            .enumerate()
            .map(|(i, month)| {
                let count = counts
                    .get(&(*month, region.clone()))
                    .copied()
                    .unwrap_or(0);
                (i as f64, count as f64)
            })
            .collect();

        chart
            .draw_series(LineSeries::new(series, color.stroke_width(2)))?
            .label(region.clone())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 4), (x + 10, y + 4)], Palette99::pick(idx).filled())
            });
    }

    chart.configure_series_labels().draw()?;
    root.present()?;
    println!("Monthly trend chart saved to: {}", output_path);

    Ok(())
}

/// Scatter of mean review score per delivery duration, with the fitted trend
/// line drawn in red when one exists.
pub fn plot_delivery_satisfaction(
    analysis: &DeliverySatisfaction,
    output_path: &str,
) -> crate::Result<()> {
    let x_min = analysis
        .points
        .iter()
        .map(|p| p.delivery_days)
        .min()
        .unwrap_or(0) as f64
        - 1.0;
    let x_max = analysis
        .points
        .iter()
        .map(|p| p.delivery_days)
        .max()
        .unwrap_or(0) as f64
        + 1.0;

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Delivery Time vs Average Review Score", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0f64..5.5f64)?;

    chart
        .configure_mesh()
        .x_desc("Delivery Time (Days)")
        .y_desc("Average Review Score")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    chart.draw_series(analysis.points.iter().map(|p| {
        Circle::new((p.delivery_days as f64, p.mean_score), 4, BLUE.filled())
    }))?;

    if let Some(line) = analysis.trend {
        chart.draw_series(LineSeries::new(
            vec![(x_min, line.value_at(x_min)), (x_max, line.value_at(x_max))],
            RED.stroke_width(2),
        ))?;
    }

    root.present()?;
    println!("Delivery satisfaction chart saved to: {}", output_path);

    Ok(())
}

/// Bar chart of the top revenue categories in the recent window.
pub fn plot_top_categories(ranked: &[CategoryRevenue], output_path: &str) -> crate::Result<()> {
    let max_revenue = ranked.iter().map(|r| r.revenue).fold(0.0f64, f64::max);

    let root = BitMapBackend::new(output_path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Top Selling Categories (Last 6 Months)", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(80)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..ranked.len() as f64, 0f64..max_revenue * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("Product Category")
        .y_desc("Total Sales")
        .x_labels(ranked.len())
        .x_label_formatter(&|x| {
            let i = (x - 0.5).round() as usize;
            ranked
                .get(i)
                .map(|row| truncate_label(&row.category))
                .unwrap_or_default()
        })
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (i, row) in ranked.iter().enumerate() {
        let x = i as f64;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x + 0.1, 0.0), (x + 0.9, row.revenue)],
            RGBColor(135, 206, 235).filled(),
        )))?;
    }

    root.present()?;
    println!("Category ranking chart saved to: {}", output_path);

    Ok(())
}

/// Bar chart of customer counts per RFM segment.
pub fn plot_rfm_segments(counts: &[(Segment, u64)], output_path: &str) -> crate::Result<()> {
    let max_count = counts.iter().map(|(_, n)| *n).max().unwrap_or(1) as f64;

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Customer Segments (RFM)", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..counts.len() as f64, 0f64..max_count * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("Segment")
        .y_desc("Number of Customers")
        .x_labels(counts.len())
        .x_label_formatter(&|x| {
            let i = (x - 0.5).round() as usize;
            counts
                .get(i)
                .map(|(segment, _)| segment.label().to_string())
                .unwrap_or_default()
        })
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (i, (_, count)) in counts.iter().enumerate() {
        let x = i as f64;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x + 0.1, 0.0), (x + 0.9, *count as f64)],
            Palette99::pick(i).filled(),
        )))?;
    }

    root.present()?;
    println!("RFM segment chart saved to: {}", output_path);

    Ok(())
}

/// Bar chart of sentiment label counts.
pub fn plot_sentiment(counts: &SentimentCounts, output_path: &str) -> crate::Result<()> {
    let max_count = Sentiment::ALL
        .iter()
        .map(|&s| counts.get(s))
        .max()
        .unwrap_or(1) as f64;

    let root = BitMapBackend::new(output_path, (700, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Customer Review Sentiment", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..Sentiment::ALL.len() as f64, 0f64..max_count * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("Sentiment")
        .y_desc("Number of Reviews")
        .x_labels(Sentiment::ALL.len())
        .x_label_formatter(&|x| {
            let i = (x - 0.5).round() as usize;
            Sentiment::ALL
                .get(i)
                .map(|s| s.label().to_string())
                .unwrap_or_default()
        })
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (i, &sentiment) in Sentiment::ALL.iter().enumerate() {
        let x = i as f64;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x + 0.1, 0.0), (x + 0.9, counts.get(sentiment) as f64)],
            SENTIMENT_COLORS[i].filled(),
        )))?;
    }

    root.present()?;
    println!("Sentiment chart saved to: {}", output_path);

    Ok(())
}

fn truncate_label(name: &str) -> String {
    const MAX: usize = 14;
    if name.chars().count() <= MAX {
        name.to_string()
    } else {
        name.chars().take(MAX).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::{DeliveryReviewPoint, TrendLine};
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn test_plot_monthly_trend() {
        let mut counts = BTreeMap::new();
        counts.insert((MonthKey { year: 2024, month: 1 }, "SP".to_string()), 3u64);
        counts.insert((MonthKey { year: 2024, month: 2 }, "SP".to_string()), 5u64);
        counts.insert((MonthKey { year: 2024, month: 2 }, "RJ".to_string()), 2u64);

        let dir = tempdir().unwrap();
        let path = dir.path().join("trend.png");
        let path_str = path.to_str().unwrap();

        assert!(plot_monthly_trend(&counts, path_str).is_ok());
        assert!(Path::new(path_str).exists());
    }

    #[test]
    fn test_plot_delivery_satisfaction() {
        let analysis = DeliverySatisfaction {
            points: vec![
                DeliveryReviewPoint { delivery_days: 2, mean_score: 4.5, review_count: 2 },
                DeliveryReviewPoint { delivery_days: 10, mean_score: 2.0, review_count: 1 },
            ],
            trend: Some(TrendLine { slope: -0.3125, intercept: 5.125 }),
        };

        let dir = tempdir().unwrap();
        let path = dir.path().join("delivery.png");
        let path_str = path.to_str().unwrap();

        assert!(plot_delivery_satisfaction(&analysis, path_str).is_ok());
        assert!(Path::new(path_str).exists());
    }

    #[test]
    fn test_plot_top_categories() {
        let ranked = vec![
            CategoryRevenue { category: "toys".to_string(), revenue: 120.0 },
            CategoryRevenue { category: "a_rather_long_category_name".to_string(), revenue: 60.0 },
        ];

        let dir = tempdir().unwrap();
        let path = dir.path().join("categories.png");
        let path_str = path.to_str().unwrap();

        assert!(plot_top_categories(&ranked, path_str).is_ok());
        assert!(Path::new(path_str).exists());
    }

    #[test]
    fn test_plot_rfm_segments() {
        let counts = vec![
            (Segment::HighValue, 4u64),
            (Segment::MidValue, 10),
            (Segment::LowValue, 7),
            (Segment::Churn, 3),
        ];

        let dir = tempdir().unwrap();
        let path = dir.path().join("rfm.png");
        let path_str = path.to_str().unwrap();

        assert!(plot_rfm_segments(&counts, path_str).is_ok());
        assert!(Path::new(path_str).exists());
    }

    #[test]
    fn test_plot_sentiment() {
        let counts = SentimentCounts { positive: 12, negative: 4, neutral: 9 };

        let dir = tempdir().unwrap();
        let path = dir.path().join("sentiment.png");
        let path_str = path.to_str().unwrap();

        assert!(plot_sentiment(&counts, path_str).is_ok());
        assert!(Path::new(path_str).exists());
    }
}
