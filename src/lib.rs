//! OrderLens: descriptive and segmentation analytics over e-commerce order data
//!
//! This library turns a merged order/review dataset into derived tables:
//! monthly order trends by region, delivery time vs. satisfaction, category
//! revenue rankings, RFM customer segments and review sentiment counts. Each
//! analytic is a pure function over the loaded records; rendering the results
//! as charts lives in [`viz`].

pub mod category;
pub mod cli;
pub mod data;
pub mod delivery;
pub mod error;
pub mod period;
pub mod rfm;
pub mod sentiment;
pub mod trend;
pub mod viz;

// Re-export public items for easier access
pub use category::{top_categories, CategoryRevenue};
pub use cli::{AnalysisKind, Args};
pub use data::{load_orders, Dataset, OrderRecord};
pub use delivery::{delivery_satisfaction, DeliverySatisfaction};
pub use error::AnalyticsError;
pub use period::MonthKey;
pub use rfm::{rfm_segments, segment_counts, CustomerRfm, Segment};
pub use sentiment::{review_sentiment, LexiconScorer, SentimentCounts, SentimentScorer};
pub use trend::monthly_order_counts;

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
