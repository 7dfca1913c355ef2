//! Data module - CSV loading, normalization and year filtering

mod cache;
mod error;
mod filter;
mod loader;
mod processor;
mod quality;
pub mod schema;
mod table;

pub use cache::{load_cached, MemoCache, TableCache};
pub use error::{DataError, ErrorKind, Result};
pub use filter::{filter_up_to_year, year_bounds};
pub use loader::{parse_date, DataLoader};
pub use processor::{DataProcessor, SERIES, VALUE};
pub use quality::{Cell, CoercionReport, ColumnQuality};
pub use table::{date_to_days, days_to_date, LoadedTable, PriceTable, YearBounds};
