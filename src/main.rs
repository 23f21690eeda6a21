//! OrderLens: e-commerce order analytics CLI
//!
//! This is the main entrypoint that loads the dataset, lets the user pick an
//! analysis (flag or interactive menu), computes the derived table and renders
//! it as a chart.

use anyhow::Result;
use clap::Parser;
use orderlens::{
    category, delivery, rfm, sentiment, trend, viz, AnalysisKind, Args, Dataset, LexiconScorer,
};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::time::Instant;

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        println!("OrderLens - E-Commerce Order Analytics");
        println!("======================================\n");
        println!("Loading dataset from: {}", args.input);
    }

    let load_start = Instant::now();
    let dataset = orderlens::load_orders(&args.input)?;
    println!("✓ Data loaded: {} records", dataset.len());
    if args.verbose {
        println!("  Loading time: {:.2}s", load_start.elapsed().as_secs_f64());
    }

    std::fs::create_dir_all(&args.output_dir)?;

    match args.analysis {
        Some(kind) => run_analysis(kind, &dataset, &args)?,
        None => run_menu(&dataset, &args)?,
    }

    Ok(())
}

/// Interactive selection loop, one analysis per round trip.
fn run_menu(dataset: &Dataset, args: &Args) -> Result<()> {
    loop {
        println!("\n=== Analysis Menu ===");
        for (i, kind) in AnalysisKind::ALL.iter().enumerate() {
            println!("  {}. {}", i + 1, kind.title());
        }
        println!("  0. Quit");
        print!("Select> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let choice = line.trim();
        if choice == "0" || choice.eq_ignore_ascii_case("q") {
            break;
        }

        let selected = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| AnalysisKind::ALL.get(i).copied());
        match selected {
            Some(kind) => {
                // A failed analysis (e.g. nothing valid to aggregate) should
                // not end the session.
                if let Err(err) = run_analysis(kind, dataset, args) {
                    println!("Analysis failed: {err:#}");
                }
            }
            None => println!("Unrecognized selection: {choice}"),
        }
    }
    Ok(())
}

/// Compute one analytic from scratch and render its chart.
fn run_analysis(kind: AnalysisKind, dataset: &Dataset, args: &Args) -> Result<()> {
    println!("\n=== {} ===", kind.title());
    let start = Instant::now();
    let chart_path = args.chart_path(kind);

    match kind {
        AnalysisKind::Trend => {
            let counts = trend::monthly_order_counts(&dataset.records)?;
            print_trend_summary(&counts);
            viz::plot_monthly_trend(&counts, &chart_path)?;
        }
        AnalysisKind::DeliverySatisfaction => {
            let analysis = delivery::delivery_satisfaction(&dataset.records)?;
            print_delivery_summary(&analysis);
            viz::plot_delivery_satisfaction(&analysis, &chart_path)?;
        }
        AnalysisKind::CategoryRanking => {
            let ranked = category::top_categories(&dataset.records)?;
            print_category_summary(&ranked);
            viz::plot_top_categories(&ranked, &chart_path)?;
        }
        AnalysisKind::Rfm => {
            let rows = rfm::rfm_segments(&dataset.records)?;
            let counts = rfm::segment_counts(&rows);
            print_rfm_summary(&rows, &counts);
            viz::plot_rfm_segments(&counts, &chart_path)?;
        }
        AnalysisKind::Sentiment => {
            let counts = sentiment::review_sentiment(&dataset.records, &LexiconScorer)?;
            print_sentiment_summary(&counts);
            viz::plot_sentiment(&counts, &chart_path)?;
        }
    }

    if args.verbose {
        println!("  Processing time: {:.2}s", start.elapsed().as_secs_f64());
    }
    Ok(())
}

fn print_trend_summary(counts: &BTreeMap<(orderlens::MonthKey, String), u64>) {
    let months = trend::months(counts);
    let total: u64 = counts.values().sum();
    println!(
        "Months: {} ({} .. {})",
        months.len(),
        months.first().map(ToString::to_string).unwrap_or_default(),
        months.last().map(ToString::to_string).unwrap_or_default(),
    );
    println!("Orders counted: {}", total);

    let mut by_region: BTreeMap<&String, u64> = BTreeMap::new();
    for ((_, region), count) in counts {
        *by_region.entry(region).or_insert(0) += count;
    }
    println!("\n  {:10} {:>10}", "Region", "Orders");
    println!("  {}", "-".repeat(21));
    for (region, count) in by_region {
        println!("  {:10} {:>10}", region, count);
    }
}

fn print_delivery_summary(analysis: &delivery::DeliverySatisfaction) {
    println!("Distinct delivery durations: {}", analysis.points.len());
    match analysis.trend {
        Some(line) => println!(
            "Trend: score ≈ {:.4} × days + {:.2}",
            line.slope, line.intercept
        ),
        None => println!("Trend: not enough distinct durations to fit a line"),
    }
}

fn print_category_summary(ranked: &[orderlens::CategoryRevenue]) {
    println!("  {:>4}  {:30} {:>12}", "Rank", "Category", "Revenue");
    println!("  {}", "-".repeat(50));
    for (i, row) in ranked.iter().enumerate() {
        println!("  {:>4}  {:30} {:>12.2}", i + 1, row.category, row.revenue);
    }
}

fn print_rfm_summary(rows: &[orderlens::CustomerRfm], counts: &[(rfm::Segment, u64)]) {
    println!("Customers scored: {}", rows.len());
    println!("\n  {:12} {:>10} {:>8}", "Segment", "Customers", "Share");
    println!("  {}", "-".repeat(33));
    for (segment, count) in counts {
        let share = *count as f64 / rows.len() as f64 * 100.0;
        println!("  {:12} {:>10} {:>7.1}%", segment.label(), count, share);
    }
}

fn print_sentiment_summary(counts: &orderlens::SentimentCounts) {
    println!("Reviews classified: {}", counts.total());
    println!("\n  {:10} {:>10}", "Label", "Reviews");
    println!("  {}", "-".repeat(21));
    for sentiment in sentiment::Sentiment::ALL {
        println!("  {:10} {:>10}", sentiment.label(), counts.get(sentiment));
    }
}
