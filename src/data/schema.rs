//! Column names of the gold / silver / geopolitical-risk dataset.
//!
//! Headers are matched case-insensitively on ingestion; every name below is
//! the lowercase form used after normalization.

pub const DATE: &str = "date";

pub const GOLD_PRICE: &str = "gold_price";
pub const SILVER_PRICE: &str = "silver_price";
pub const GOLD_CHANGE_PCT: &str = "gold_change_%";
pub const SILVER_CHANGE_PCT: &str = "silver_change_%";

pub const GPRD: &str = "gprd";
pub const GPRD_ACT: &str = "gprd_act";
pub const GPRD_THREAT: &str = "gprd_threat";

pub const GOLD_RETURN: &str = "gold_return";
pub const SILVER_RETURN: &str = "silver_return";
pub const GOLD_SILVER_RATIO: &str = "gold_silver_ratio";

pub const GPRD_PCT_CHANGE: &str = "gprd_pct_change";
pub const GPRD_ACT_PCT_CHANGE: &str = "gprd_act_pct_change";
pub const GPRD_THREAT_PCT_CHANGE: &str = "gprd_threat_pct_change";

/// Columns that must be present in every input file.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    DATE,
    GOLD_PRICE,
    SILVER_PRICE,
    GOLD_CHANGE_PCT,
    SILVER_CHANGE_PCT,
];

/// Optional risk indices.
pub const RISK_COLUMNS: [&str; 3] = [GPRD, GPRD_ACT, GPRD_THREAT];

/// Columns coerced to Float64 when present.
pub const NUMERIC_COLUMNS: [&str; 7] = [
    GOLD_PRICE,
    SILVER_PRICE,
    GOLD_CHANGE_PCT,
    SILVER_CHANGE_PCT,
    GPRD,
    GPRD_ACT,
    GPRD_THREAT,
];

/// Risk index -> its day-over-day percentage change column.
pub const RISK_PCT_CHANGES: [(&str, &str); 3] = [
    (GPRD, GPRD_PCT_CHANGE),
    (GPRD_ACT, GPRD_ACT_PCT_CHANGE),
    (GPRD_THREAT, GPRD_THREAT_PCT_CHANGE),
];

pub fn is_numeric(column: &str) -> bool {
    NUMERIC_COLUMNS.contains(&column)
}
