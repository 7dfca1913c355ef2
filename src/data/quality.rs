//! Data-quality signals collected while coercing numeric columns.

use std::collections::BTreeMap;

/// Tokens read as missing values rather than coercion failures (case-insensitive).
const MISSING_TOKENS: [&str; 7] = ["na", "n/a", "nan", "null", "none", "#n/a", "-"];

/// Outcome of coercing a single raw cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Value(f64),
    Missing,
    Invalid,
}

impl Cell {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(text) = raw.map(str::trim) else {
            return Cell::Missing;
        };
        if text.is_empty() || MISSING_TOKENS.iter().any(|t| text.eq_ignore_ascii_case(t)) {
            return Cell::Missing;
        }
        match text.parse::<f64>() {
            Ok(v) => Cell::Value(v),
            Err(_) => Cell::Invalid,
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Cell::Value(v) => Some(v),
            Cell::Missing | Cell::Invalid => None,
        }
    }
}

/// Per-column counts of null cells, split by cause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnQuality {
    /// Empty or NA-token cells.
    pub missing: usize,
    /// Non-empty cells that could not be parsed as a number.
    pub coerced: usize,
    /// Data row (1-based, header excluded) of the first coerced cell.
    pub first_coerced_row: Option<usize>,
}

impl ColumnQuality {
    pub fn nulls(&self) -> usize {
        self.missing + self.coerced
    }
}

/// Coercion issues for every numeric column present in the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoercionReport {
    columns: BTreeMap<String, ColumnQuality>,
}

impl CoercionReport {
    pub fn record(&mut self, column: &str, quality: ColumnQuality) {
        self.columns.insert(column.to_string(), quality);
    }

    pub fn column(&self, column: &str) -> Option<&ColumnQuality> {
        self.columns.get(column)
    }

    /// Number of cells that failed coercion in `column` (0 if absent).
    pub fn coerced(&self, column: &str) -> usize {
        self.columns.get(column).map(|q| q.coerced).unwrap_or(0)
    }

    pub fn total_coerced(&self) -> usize {
        self.columns.values().map(|q| q.coerced).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.total_coerced() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnQuality)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers_and_tokens() {
        assert_eq!(Cell::parse(Some(" 1010.5 ")), Cell::Value(1010.5));
        assert_eq!(Cell::parse(Some("-0.25")), Cell::Value(-0.25));
        assert_eq!(Cell::parse(None), Cell::Missing);
        assert_eq!(Cell::parse(Some("")), Cell::Missing);
        assert_eq!(Cell::parse(Some("N/A")), Cell::Missing);
        assert_eq!(Cell::parse(Some("nan")), Cell::Missing);
        assert_eq!(Cell::parse(Some("abc")), Cell::Invalid);
        assert_eq!(Cell::parse(Some("1,234")), Cell::Invalid);
    }

    #[test]
    fn report_sums_coerced_cells() {
        let mut report = CoercionReport::default();
        report.record(
            "gold_price",
            ColumnQuality {
                missing: 1,
                coerced: 2,
                first_coerced_row: Some(4),
            },
        );
        report.record("silver_price", ColumnQuality::default());

        assert_eq!(report.coerced("gold_price"), 2);
        assert_eq!(report.coerced("gprd"), 0);
        assert_eq!(report.total_coerced(), 2);
        assert_eq!(report.column("gold_price").map(|q| q.nulls()), Some(3));
        assert!(!report.is_clean());
    }
}
