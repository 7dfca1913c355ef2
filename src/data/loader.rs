//! CSV Data Loader Module
//! Reads the dataset with Polars and normalizes it into a `PriceTable`.

use super::error::{DataError, Result};
use super::processor::DataProcessor;
use super::quality::{Cell, CoercionReport, ColumnQuality};
use super::schema::{self, DATE, REQUIRED_COLUMNS, RISK_COLUMNS};
use super::table::{date_to_days, LoadedTable, PriceTable};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%Y%m%d",
    "%d %b %Y",
    "%b %d, %Y",
];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a calendar date, dropping any time of day.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}

/// Handles CSV file loading and normalization with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load, normalize and derive. Never returns a partially built table.
    pub fn load(path: impl AsRef<Path>) -> Result<LoadedTable> {
        let path = path.as_ref();
        let raw = Self::read_csv(path)?;
        let (df, report) = Self::normalize(raw)?;
        let table = Self::finish(df)?;

        info!(
            path = %path.display(),
            rows = table.height(),
            coerced = report.total_coerced(),
            "dataset loaded"
        );

        Ok(LoadedTable {
            source: path.to_path_buf(),
            table,
            report,
        })
    }

    /// Read every column as text; typing happens in `normalize`.
    pub fn read_csv(path: &Path) -> Result<DataFrame> {
        let io_error = |source| DataError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = std::fs::File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DataError::FileNotFound(path.to_path_buf()),
            _ => io_error(e),
        })?;
        if !file.metadata().map_err(io_error)?.is_file() {
            return Err(io_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(file)
            .finish()?;

        debug!(rows = df.height(), columns = df.width(), "csv read");
        Ok(df)
    }

    /// Lowercase headers, parse dates, coerce numeric columns and add any
    /// absent risk index as an all-null column. Output is not yet sorted.
    pub fn normalize(raw: DataFrame) -> Result<(DataFrame, CoercionReport)> {
        let mut seen: HashSet<String> = HashSet::new();
        for column in raw.get_columns() {
            let name = column.name().as_str().to_lowercase();
            if !seen.insert(name.clone()) {
                return Err(DataError::DuplicateColumn(name));
            }
        }
        for required in REQUIRED_COLUMNS {
            if !seen.contains(required) {
                return Err(DataError::MissingColumn(required.to_string()));
            }
        }

        let height = raw.height();
        let mut report = CoercionReport::default();
        let mut columns: Vec<Column> = Vec::with_capacity(raw.width() + RISK_COLUMNS.len());

        for column in raw.get_columns() {
            let name = column.name().as_str().to_lowercase();
            if name == DATE {
                columns.push(Self::parse_date_column(column)?);
            } else if schema::is_numeric(&name) {
                let (coerced, quality) = Self::coerce_numeric(&name, column)?;
                if quality.coerced > 0 {
                    warn!(
                        column = %name,
                        coerced = quality.coerced,
                        first_row = ?quality.first_coerced_row,
                        "non-numeric cells coerced to null"
                    );
                }
                report.record(&name, quality);
                columns.push(coerced);
            } else {
                let mut kept = column.clone();
                kept.rename(name.into());
                columns.push(kept);
            }
        }

        for risk in RISK_COLUMNS {
            if !seen.contains(risk) {
                debug!(column = risk, "optional risk column absent");
                columns.push(Column::from(Series::full_null(
                    risk.into(),
                    height,
                    &DataType::Float64,
                )));
            }
        }

        Ok((DataFrame::new(columns)?, report))
    }

    /// Sort by date (stable, duplicates stay adjacent) and derive columns.
    pub fn finish(df: DataFrame) -> Result<PriceTable> {
        let sorted = df.sort([DATE], SortMultipleOptions::default().with_maintain_order(true))?;
        Ok(PriceTable::new(DataProcessor::derive_columns(sorted)?))
    }

    fn parse_date_column(column: &Column) -> Result<Column> {
        let text = column.cast(&DataType::String)?;
        let mut days: Vec<i32> = Vec::with_capacity(text.len());

        for (i, cell) in text.as_materialized_series().str()?.into_iter().enumerate() {
            let raw = cell.unwrap_or("");
            let date = parse_date(raw).ok_or_else(|| DataError::UnparseableDate {
                row: i + 1,
                value: raw.to_string(),
            })?;
            days.push(date_to_days(date));
        }

        let dates = Series::new(DATE.into(), days).cast(&DataType::Date)?;
        Ok(Column::from(dates))
    }

    fn coerce_numeric(name: &str, column: &Column) -> Result<(Column, ColumnQuality)> {
        let text = column.cast(&DataType::String)?;
        let mut quality = ColumnQuality::default();
        let mut values: Vec<Option<f64>> = Vec::with_capacity(text.len());

        for (i, cell) in text.as_materialized_series().str()?.into_iter().enumerate() {
            let parsed = Cell::parse(cell);
            match parsed {
                Cell::Value(_) => {}
                Cell::Missing => quality.missing += 1,
                Cell::Invalid => {
                    quality.coerced += 1;
                    quality.first_coerced_row.get_or_insert(i + 1);
                }
            }
            values.push(parsed.value());
        }

        Ok((Column::new(name.into(), values), quality))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{
        GOLD_CHANGE_PCT, GOLD_PRICE, GPRD, GPRD_ACT, GPRD_PCT_CHANGE, SILVER_PRICE,
    };

    fn raw_frame(headers: &[&str], rows: &[&[&str]]) -> DataFrame {
        let columns = headers
            .iter()
            .enumerate()
            .map(|(j, header)| {
                let cells: Vec<&str> = rows.iter().map(|row| row[j]).collect();
                Column::new((*header).into(), cells)
            })
            .collect();
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn parses_common_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2020, 1, 2);
        assert_eq!(parse_date("2020-01-02"), expected);
        assert_eq!(parse_date("2020/01/02"), expected);
        assert_eq!(parse_date("01/02/2020"), expected);
        assert_eq!(parse_date("20200102"), expected);
        assert_eq!(parse_date("2020-01-02 15:30:00"), expected);
        assert_eq!(parse_date("2020-01-02T00:00:00"), expected);
        assert_eq!(parse_date("2020-01-02T00:00:00+00:00"), expected);
        assert_eq!(parse_date("02 Jan 2020"), expected);
        assert_eq!(parse_date("Jan 02, 2020"), expected);
        assert_eq!(parse_date(" 2020-01-02 "), expected);
        assert_eq!(parse_date("2020-01-02 15:30:00.250"), expected);
        assert_eq!(parse_date("2020-01-02T23:59:59.5"), expected);
        assert_eq!(parse_date("2020-01-02T08:00:00-05:00"), expected);
        assert_eq!(parse_date("2020-13-02"), None);
        assert_eq!(parse_date("2020010"), None);
        assert_eq!(parse_date("someday"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn normalize_lowercases_headers_and_keeps_extra_columns() {
        let raw = raw_frame(
            &["Date", "GOLD_PRICE", "Silver_Price", "Gold_Change_%", "Silver_Change_%", "Note"],
            &[&["2020-01-01", "1000", "20", "1.0", "2.0", "x"]],
        );
        let (df, report) = DataLoader::normalize(raw).unwrap();

        for name in [DATE, GOLD_PRICE, SILVER_PRICE, GOLD_CHANGE_PCT, "note", GPRD, GPRD_ACT] {
            assert!(df.get_column_index(name).is_some(), "missing {name}");
        }
        assert_eq!(df.column(DATE).unwrap().dtype(), &DataType::Date);
        assert_eq!(df.column(GOLD_PRICE).unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column(GPRD).unwrap().null_count(), 1);
        assert!(report.is_clean());
    }

    #[test]
    fn normalize_counts_coerced_cells() {
        let raw = raw_frame(
            &["date", "gold_price", "silver_price", "gold_change_%", "silver_change_%", "gprd"],
            &[
                &["2020-01-01", "1000", "N/A", "1.0", "2.0", "100"],
                &["2020-01-02", "abc", "20", "", "2.0", "oops"],
            ],
        );
        let (_, report) = DataLoader::normalize(raw).unwrap();

        assert_eq!(report.coerced(GOLD_PRICE), 1);
        assert_eq!(report.coerced(SILVER_PRICE), 0);
        assert_eq!(report.column(SILVER_PRICE).unwrap().missing, 1);
        assert_eq!(report.column(GOLD_CHANGE_PCT).unwrap().missing, 1);
        assert_eq!(report.column(GPRD).unwrap().first_coerced_row, Some(2));
        assert_eq!(report.total_coerced(), 2);
    }

    #[test]
    fn normalize_rejects_missing_required_column() {
        let raw = raw_frame(
            &["date", "gold_price", "gold_change_%", "silver_change_%"],
            &[&["2020-01-01", "1000", "1.0", "2.0"]],
        );
        let err = DataLoader::normalize(raw).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(ref c) if c == SILVER_PRICE));
    }

    #[test]
    fn normalize_rejects_headers_equal_after_lowercasing() {
        let raw = raw_frame(
            &["date", "DATE", "gold_price", "silver_price", "gold_change_%", "silver_change_%"],
            &[&["2020-01-01", "2020-01-01", "1", "1", "1", "1"]],
        );
        let err = DataLoader::normalize(raw).unwrap_err();
        assert!(matches!(err, DataError::DuplicateColumn(ref c) if c == DATE));
    }

    #[test]
    fn normalize_fails_on_bad_date_with_row_number() {
        let raw = raw_frame(
            &["date", "gold_price", "silver_price", "gold_change_%", "silver_change_%"],
            &[
                &["2020-01-01", "1000", "20", "1.0", "2.0"],
                &["not a date", "1000", "20", "1.0", "2.0"],
            ],
        );
        match DataLoader::normalize(raw).unwrap_err() {
            DataError::UnparseableDate { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "not a date");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn finish_sorts_rows_by_date() {
        let raw = raw_frame(
            &["date", "gold_price", "silver_price", "gold_change_%", "silver_change_%", "gprd"],
            &[
                &["2020-01-03", "1020", "20", "1.0", "2.0", "121"],
                &["2020-01-01", "1000", "20", "1.0", "2.0", "100"],
                &["2020-01-02", "1010", "20", "1.0", "2.0", "110"],
            ],
        );
        let (df, _) = DataLoader::normalize(raw).unwrap();
        let table = DataLoader::finish(df).unwrap();

        assert_eq!(
            table.values(GOLD_PRICE).unwrap(),
            vec![Some(1000.0), Some(1010.0), Some(1020.0)]
        );
        let pct = table.values(GPRD_PCT_CHANGE).unwrap();
        assert_eq!(pct[0], None);
        assert!((pct[1].unwrap() - 10.0).abs() < 1e-9);
        assert!((pct[2].unwrap() - 10.0).abs() < 1e-9);
    }
}
