//! Year-bounded views over a loaded table.

use super::error::Result;
use super::schema::DATE;
use super::table::{PriceTable, YearBounds};
use polars::prelude::*;
use tracing::debug;

/// Year range of the table's dates, or `None` for an empty table.
pub fn year_bounds(table: &PriceTable) -> Result<Option<YearBounds>> {
    let bounds = table
        .dataframe()
        .clone()
        .lazy()
        .select([
            col(DATE).dt().year().min().alias("min_year"),
            col(DATE).dt().year().max().alias("max_year"),
        ])
        .collect()?;

    let min_year = bounds.column("min_year")?.as_materialized_series().i32()?.get(0);
    let max_year = bounds.column("max_year")?.as_materialized_series().i32()?.get(0);

    Ok(min_year
        .zip(max_year)
        .map(|(min_year, max_year)| YearBounds { min_year, max_year }))
}

/// Rows dated on or before 31 December of `end_year`, in their original order.
///
/// The input is never modified. Years outside the table's range are not an
/// error: they yield an empty or a complete table.
pub fn filter_up_to_year(table: &PriceTable, end_year: i32) -> Result<PriceTable> {
    let df = table
        .dataframe()
        .clone()
        .lazy()
        .filter(col(DATE).dt().year().lt_eq(lit(end_year)))
        .collect()?;

    if df.height() == 0 || df.height() == table.height() {
        debug!(
            end_year,
            rows = df.height(),
            total = table.height(),
            "end year selects all or none of the rows"
        );
    }

    Ok(PriceTable::new(df))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::DataLoader;
    use crate::data::schema::GOLD_PRICE;

    fn sample_table() -> PriceTable {
        let dates = ["2018-06-01", "2019-01-01", "2019-12-31", "2020-01-01", "2021-03-15"];
        let n = dates.len();
        let raw = DataFrame::new(vec![
            Column::new(DATE.into(), dates.to_vec()),
            Column::new("gold_price".into(), vec!["1300", "1280", "1515", "1520", "1730"]),
            Column::new("silver_price".into(), vec!["16"; n]),
            Column::new("gold_change_%".into(), vec!["0.1"; n]),
            Column::new("silver_change_%".into(), vec!["0.2"; n]),
        ])
        .unwrap();
        let (df, _) = DataLoader::normalize(raw).unwrap();
        DataLoader::finish(df).unwrap()
    }

    #[test]
    fn bounds_span_first_and_last_year() {
        let bounds = year_bounds(&sample_table()).unwrap().unwrap();
        assert_eq!(
            bounds,
            YearBounds {
                min_year: 2018,
                max_year: 2021
            }
        );
    }

    #[test]
    fn keeps_whole_end_year() {
        let filtered = filter_up_to_year(&sample_table(), 2019).unwrap();
        assert_eq!(
            filtered.values(GOLD_PRICE).unwrap(),
            vec![Some(1300.0), Some(1280.0), Some(1515.0)]
        );
    }

    #[test]
    fn max_year_returns_everything() {
        let table = sample_table();
        let filtered = filter_up_to_year(&table, 2021).unwrap();
        assert!(filtered.same_contents(&table));
    }

    #[test]
    fn years_past_the_end_return_everything() {
        let table = sample_table();
        for end_year in [2022, 2026, i32::MAX] {
            let filtered = filter_up_to_year(&table, end_year).unwrap();
            assert!(filtered.same_contents(&table), "end year {end_year}");
        }
    }

    #[test]
    fn before_min_year_is_empty() {
        let filtered = filter_up_to_year(&sample_table(), 2017).unwrap();
        assert!(filtered.is_empty());
        assert_eq!(year_bounds(&filtered).unwrap(), None);
    }

    #[test]
    fn source_table_is_untouched() {
        let table = sample_table();
        let _ = filter_up_to_year(&table, 2018).unwrap();
        assert_eq!(table.height(), 5);
    }
}
