//! Command-line interface definitions and argument parsing

use clap::{Parser, ValueEnum};

/// E-commerce order analytics CLI: trends, delivery satisfaction, category
/// rankings, RFM segmentation and review sentiment, rendered as PNG charts.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the merged order/review CSV file
    #[arg(short, long, default_value = "all_data.csv")]
    pub input: String,

    /// Analysis to run; an interactive menu is shown when omitted
    #[arg(short, long, value_enum)]
    pub analysis: Option<AnalysisKind>,

    /// Directory where chart PNGs are written
    #[arg(short, long, default_value = "charts")]
    pub output_dir: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// The five analytics, addressable by stable tag.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    #[value(name = "trend")]
    Trend,
    #[value(name = "delivery_satisfaction")]
    DeliverySatisfaction,
    #[value(name = "category_ranking")]
    CategoryRanking,
    #[value(name = "rfm")]
    Rfm,
    #[value(name = "sentiment")]
    Sentiment,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 5] = [
        AnalysisKind::Trend,
        AnalysisKind::DeliverySatisfaction,
        AnalysisKind::CategoryRanking,
        AnalysisKind::Rfm,
        AnalysisKind::Sentiment,
    ];

    /// Stable name used for chart files and `--analysis` values.
    pub fn tag(self) -> &'static str {
        match self {
            AnalysisKind::Trend => "trend",
            AnalysisKind::DeliverySatisfaction => "delivery_satisfaction",
            AnalysisKind::CategoryRanking => "category_ranking",
            AnalysisKind::Rfm => "rfm",
            AnalysisKind::Sentiment => "sentiment",
        }
    }

    /// Human-readable menu title.
    pub fn title(self) -> &'static str {
        match self {
            AnalysisKind::Trend => "Monthly Order Trends",
            AnalysisKind::DeliverySatisfaction => "Delivery Time vs Satisfaction",
            AnalysisKind::CategoryRanking => "Best Selling Product Categories",
            AnalysisKind::Rfm => "RFM Analysis",
            AnalysisKind::Sentiment => "Customer Review Sentiment",
        }
    }
}

impl Args {
    /// Path of the chart PNG for one analysis under the output directory.
    pub fn chart_path(&self, kind: AnalysisKind) -> String {
        format!("{}/{}.png", self.output_dir.trim_end_matches('/'), kind.tag())
    }
}
