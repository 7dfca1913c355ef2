//! Data Processor Module
//! Derived-column computation and reshaping for charts.

use super::error::Result;
use super::schema::{
    DATE, GOLD_CHANGE_PCT, GOLD_PRICE, GOLD_RETURN, GOLD_SILVER_RATIO, RISK_PCT_CHANGES,
    SILVER_CHANGE_PCT, SILVER_PRICE, SILVER_RETURN,
};
use super::table::PriceTable;
use polars::prelude::*;

/// Long-format output column holding the source column name.
pub const SERIES: &str = "series";
/// Long-format output column holding the cell value.
pub const VALUE: &str = "value";

/// Pure transforms over a normalized frame.
pub struct DataProcessor;

impl DataProcessor {
    /// Add the derived columns to a frame already sorted by `date`.
    ///
    /// Expects Float64 base columns, including all three risk indices (absent
    /// ones as all-null). Nulls propagate through every formula; a zero silver
    /// price yields a null ratio.
    pub fn derive_columns(df: DataFrame) -> Result<DataFrame> {
        let mut exprs = vec![
            (col(GOLD_CHANGE_PCT) / lit(100.0)).alias(GOLD_RETURN),
            (col(SILVER_CHANGE_PCT) / lit(100.0)).alias(SILVER_RETURN),
            when(col(SILVER_PRICE).eq(lit(0.0)))
                .then(lit(NULL).cast(DataType::Float64))
                .otherwise(col(GOLD_PRICE) / col(SILVER_PRICE))
                .alias(GOLD_SILVER_RATIO),
        ];
        for (base, derived) in RISK_PCT_CHANGES {
            exprs.push(Self::pct_change(base).alias(derived));
        }

        Ok(df.lazy().with_columns(exprs).collect()?)
    }

    /// Change relative to the previous row, in percent. No fill: a null on
    /// either side yields null, and the first row is always null.
    fn pct_change(name: &str) -> Expr {
        let previous = col(name).shift(lit(1));
        (col(name) - previous.clone()) / previous * lit(100.0)
    }

    /// Transform selected columns to long format (melt).
    ///
    /// Output columns: [`date`, `series`, `value`]; series appear in the order
    /// given, each in date order. Nulls are kept so charts can show gaps.
    /// Columns missing from the table are skipped.
    pub fn stack_to_long(table: &PriceTable, value_cols: &[&str]) -> Result<DataFrame> {
        let days = table.day_numbers()?;

        let mut dates: Vec<i32> = Vec::new();
        let mut series: Vec<String> = Vec::new();
        let mut values: Vec<Option<f64>> = Vec::new();

        for &value_col in value_cols {
            if !table.has_column(value_col) {
                continue;
            }
            let column = table.values(value_col)?;
            for (day, value) in days.iter().zip(column) {
                dates.push(*day);
                series.push(value_col.to_string());
                values.push(value);
            }
        }

        let date_column = Series::new(DATE.into(), dates).cast(&DataType::Date)?;
        let df = DataFrame::new(vec![
            Column::from(date_column),
            Column::new(SERIES.into(), series),
            Column::new(VALUE.into(), values),
        ])?;

        Ok(df)
    }
}
