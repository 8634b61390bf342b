use std::fmt;

use bigdecimal::{num_bigint::Sign, BigDecimal, RoundingMode, Zero};

use crate::models::HistoricalSeries;

/// Excess return of a stock over its benchmark, in percent, two decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct Alpha(BigDecimal);

impl Alpha {
    pub fn value(&self) -> &BigDecimal {
        &self.0
    }
}

impl fmt::Display for Alpha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", to_fixed(&self.0, 2))
    }
}

/// Plain decimal text with exactly `scale` fractional digits, zero included.
pub fn to_fixed(value: &BigDecimal, scale: u32) -> String {
    let width = scale as usize;
    if value.is_zero() {
        return if width == 0 { "0".to_string() } else { format!("0.{}", "0".repeat(width)) };
    }

    let (digits, exponent) = value
        .with_scale_round(i64::from(scale), RoundingMode::HalfEven)
        .as_bigint_and_exponent();
    let sign = if digits.sign() == Sign::Minus { "-" } else { "" };
    let mut magnitude = digits.magnitude().to_string();
    let frac_len = exponent.max(0) as usize;
    if frac_len == 0 {
        return format!("{}{}", sign, magnitude);
    }
    if magnitude.len() <= frac_len {
        magnitude = format!("{}{}", "0".repeat(frac_len - magnitude.len() + 1), magnitude);
    }
    let (int_part, frac_part) = magnitude.split_at(magnitude.len() - frac_len);
    format!("{}{}.{}", sign, int_part, frac_part)
}

fn fractional_digits(value: &BigDecimal) -> u32 {
    u32::try_from(value.as_bigint_and_exponent().1.max(0)).unwrap_or(0)
}

/// `close - open` for every day, in series order.
pub fn compute_daily_deltas(series: &HistoricalSeries) -> Vec<BigDecimal> {
    series.points().iter().map(|p| &p.close - &p.open).collect()
}

/// Daily deltas as text, keeping the precision of the quoted prices.
pub fn render_daily_deltas(series: &HistoricalSeries) -> Vec<String> {
    compute_daily_deltas(series)
        .iter()
        .zip(series.points())
        .map(|(delta, p)| {
            let scale = fractional_digits(&p.open).max(fractional_digits(&p.close));
            to_fixed(delta, scale)
        })
        .collect()
}

/// `(last close - first open) / first open` over the ascending series.
///
/// `None` when the series is empty or the first open is zero.
pub fn compute_period_return(series: &HistoricalSeries) -> Option<BigDecimal> {
    let first = series.first()?;
    let last = series.last()?;
    if first.open.is_zero() {
        return None;
    }
    Some((&last.close - &first.open) / &first.open)
}

/// `(stock - benchmark) * 100`, rounded half-to-even to two decimals.
pub fn compute_alpha(stock_return: Option<&BigDecimal>, benchmark_return: Option<&BigDecimal>) -> Option<Alpha> {
    let excess = stock_return? - benchmark_return?;
    let percent = excess * BigDecimal::from(100);
    Some(Alpha(percent.with_scale_round(2, RoundingMode::HalfEven)))
}
