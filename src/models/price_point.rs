use bigdecimal::BigDecimal;
use chrono::NaiveDate;

// One trading day for a symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: BigDecimal,
    pub close: BigDecimal,
}

impl PricePoint {
    pub fn new(date: NaiveDate, open: BigDecimal, close: BigDecimal) -> Self {
        Self { date, open, close }
    }
}

/// Price history for one symbol, ordered by ascending date.
#[derive(Debug, Clone)]
pub struct HistoricalSeries {
    pub symbol: String,
    points: Vec<PricePoint>,
}

impl HistoricalSeries {
    pub fn new(symbol: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self::new(symbol, Vec::new())
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
