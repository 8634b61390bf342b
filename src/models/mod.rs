mod date_range;
mod price_point;

pub use date_range::{DateRange, CANONICAL_DATE_FORMAT, DATE_MAX, DATE_MIN};
pub use price_point::{HistoricalSeries, PricePoint};
