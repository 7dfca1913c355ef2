//! The normalized, chronologically ordered price / risk table.

use super::error::Result;
use super::quality::CoercionReport;
use super::schema::DATE;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use std::path::PathBuf;

/// Day number of 1970-01-01 counted from 0001-01-01 (day 1).
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Days since the Unix epoch, the physical representation of a polars `Date`.
pub fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

pub fn days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + EPOCH_DAYS_FROM_CE)
}

/// Immutable table of records sorted by `date` ascending.
///
/// Row position is the index: rows are contiguous from 0 after loading.
#[derive(Debug, Clone)]
pub struct PriceTable {
    df: DataFrame,
}

impl PriceTable {
    pub(crate) fn new(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.get_column_index(name).is_some()
    }

    /// Values of a numeric column as `Option<f64>`, null preserved.
    pub fn values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let column = self.df.column(name)?.cast(&DataType::Float64)?;
        Ok(column.as_materialized_series().f64()?.into_iter().collect())
    }

    /// Dates as days since the Unix epoch.
    pub fn day_numbers(&self) -> Result<Vec<i32>> {
        let column = self.df.column(DATE)?.cast(&DataType::Int32)?;
        Ok(column
            .as_materialized_series()
            .i32()?
            .into_iter()
            .flatten()
            .collect())
    }

    pub fn dates(&self) -> Result<Vec<NaiveDate>> {
        Ok(self
            .day_numbers()?
            .into_iter()
            .filter_map(days_to_date)
            .collect())
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> PriceTable {
        Self::new(self.df.head(Some(n)))
    }

    /// Display text of one cell; nulls render as an empty string.
    pub fn cell_text(&self, row: usize, column: &str) -> String {
        self.df
            .column(column)
            .ok()
            .and_then(|col| col.get(row).ok())
            .map(|val| {
                if val.is_null() {
                    String::new()
                } else {
                    val.to_string().trim_matches('"').to_string()
                }
            })
            .unwrap_or_default()
    }

    /// Cell-wise equality with nulls comparing equal.
    pub fn same_contents(&self, other: &PriceTable) -> bool {
        self.df.equals_missing(&other.df)
    }
}

/// Inclusive year range covered by a table's `date` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBounds {
    pub min_year: i32,
    pub max_year: i32,
}

impl YearBounds {
    pub fn contains(&self, year: i32) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }

    pub fn clamp(&self, year: i32) -> i32 {
        year.clamp(self.min_year, self.max_year)
    }
}

/// A loaded table plus the data-quality signals gathered while building it.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub source: PathBuf,
    pub table: PriceTable,
    pub report: CoercionReport,
}
