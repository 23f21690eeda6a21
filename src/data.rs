//! Dataset loading and the in-memory order record store
//!
//! The CSV is read through Polars at the boundary only; every analytic then
//! works over the plain `OrderRecord` slice so derived tables are built by
//! explicit accumulation rather than dataframe expressions.

use crate::error::AnalyticsError;
use crate::period::parse_timestamp;
use chrono::NaiveDateTime;
use polars::prelude::*;

/// Header columns the input file must provide.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "customer_id",
    "order_id",
    "customer_state",
    "order_purchase_timestamp",
    "order_delivered_customer_date",
    "product_category",
    "price",
    "review_score",
    "review_comment",
];

/// One row of the merged order/review dataset. Immutable once loaded.
///
/// Timestamps are `None` when the source field is missing or unparseable;
/// such rows are silently excluded from time-based aggregations.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub customer_id: String,
    pub order_id: String,
    pub customer_state: Option<String>,
    pub purchase_ts: Option<NaiveDateTime>,
    pub delivered_ts: Option<NaiveDateTime>,
    pub product_category: Option<String>,
    pub price: Option<f64>,
    pub review_score: Option<u8>,
    pub review_comment: Option<String>,
}

/// The loaded dataset. Treated as read-only by every analytic.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<OrderRecord>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Latest purchase timestamp present in the dataset, if any row has one.
pub fn max_purchase_timestamp(records: &[OrderRecord]) -> Option<NaiveDateTime> {
    records.iter().filter_map(|r| r.purchase_ts).max()
}

/// Load the merged order/review CSV into memory.
///
/// Fails fast when a required column is missing or the file has no rows;
/// malformed values inside a row degrade to `None` fields instead.
pub fn load_orders(file_path: &str) -> crate::Result<Dataset> {
    let df = CsvReader::from_path(file_path)?.has_header(true).finish()?;

    let present = df.get_column_names();
    for column in REQUIRED_COLUMNS {
        if !present.contains(&column) {
            return Err(AnalyticsError::MissingColumn(column.to_string()).into());
        }
    }

    if df.height() == 0 {
        return Err(AnalyticsError::EmptyDataset.into());
    }

    let customer_id = utf8_column(&df, "customer_id")?;
    let order_id = utf8_column(&df, "order_id")?;
    let customer_state = utf8_column(&df, "customer_state")?;
    let purchase_raw = utf8_column(&df, "order_purchase_timestamp")?;
    let delivered_raw = utf8_column(&df, "order_delivered_customer_date")?;
    let product_category = utf8_column(&df, "product_category")?;
    let price = f64_column(&df, "price")?;
    let review_score = f64_column(&df, "review_score")?;
    let review_comment = utf8_column(&df, "review_comment")?;

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        records.push(OrderRecord {
            customer_id: customer_id[i].clone().unwrap_or_default(),
            order_id: order_id[i].clone().unwrap_or_default(),
            customer_state: customer_state[i].clone(),
            purchase_ts: parse_optional_timestamp(purchase_raw[i].as_deref()),
            delivered_ts: parse_optional_timestamp(delivered_raw[i].as_deref()),
            product_category: product_category[i].clone(),
            price: price[i],
            review_score: review_score[i].map(|v| v as u8),
            review_comment: review_comment[i].clone(),
        });
    }

    Ok(Dataset { records })
}

fn parse_optional_timestamp(raw: Option<&str>) -> Option<NaiveDateTime> {
    raw.and_then(|s| parse_timestamp(s).ok())
}

fn utf8_column(df: &DataFrame, name: &str) -> crate::Result<Vec<Option<String>>> {
    let values = df
        .column(name)?
        .cast(&DataType::Utf8)?
        .utf8()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

fn f64_column(df: &DataFrame, name: &str) -> crate::Result<Vec<Option<f64>>> {
    let values = df
        .column(name)?
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .collect();
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "customer_id,order_id,customer_state,order_purchase_timestamp,order_delivered_customer_date,product_category,price,review_score,review_comment"
        )
        .unwrap();
        writeln!(
            file,
            "c1,o1,SP,2024-01-10 08:26:00,2024-01-15 10:00:00,toys,25.50,5,great product"
        )
        .unwrap();
        writeln!(file, "c2,o2,RJ,2024-01-12 09:00:00,,toys,10.00,,").unwrap();
        writeln!(file, "c3,o3,,bad-timestamp,,furniture,99.90,1,terrible").unwrap();
        file
    }

    #[test]
    fn test_load_orders() {
        let file = create_test_csv();
        let dataset = load_orders(file.path().to_str().unwrap()).unwrap();

        assert_eq!(dataset.len(), 3);
        let first = &dataset.records[0];
        assert_eq!(first.customer_id, "c1");
        assert_eq!(first.customer_state.as_deref(), Some("SP"));
        assert!(first.purchase_ts.is_some());
        assert!(first.delivered_ts.is_some());
        assert_eq!(first.price, Some(25.50));
        assert_eq!(first.review_score, Some(5));
    }

    #[test]
    fn test_unparseable_timestamp_becomes_none() {
        let file = create_test_csv();
        let dataset = load_orders(file.path().to_str().unwrap()).unwrap();

        let third = &dataset.records[2];
        assert!(third.purchase_ts.is_none());
        assert!(third.customer_state.is_none());
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "customer_id,order_id,price").unwrap();
        writeln!(file, "c1,o1,10.0").unwrap();

        let err = load_orders(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("customer_state"));
    }

    #[test]
    fn test_empty_dataset_is_fatal() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "customer_id,order_id,customer_state,order_purchase_timestamp,order_delivered_customer_date,product_category,price,review_score,review_comment"
        )
        .unwrap();

        assert!(load_orders(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_max_purchase_timestamp() {
        let file = create_test_csv();
        let dataset = load_orders(file.path().to_str().unwrap()).unwrap();

        let max = max_purchase_timestamp(&dataset.records).unwrap();
        assert_eq!(max, parse_timestamp("2024-01-12 09:00:00").unwrap());
    }
}
