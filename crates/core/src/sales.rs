//! Sales series for the sales report.
//!
//! The report plots monthly sales values. The storefront ships with a fixed
//! series; [`SalesSeries::bars`] turns it into chart geometry so templates
//! only have to emit the shapes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One data point: sales value for the period starting at `time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesPoint {
    pub time: NaiveDate,
    pub value: u32,
}

/// A bar ready to be drawn, in chart coordinates (origin top-left).
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub label: String,
    pub value: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Ordered sales points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSeries {
    points: Vec<SalesPoint>,
}

/// Monthly values bundled with the storefront.
const BUNDLED: [(i32, u32, u32); 13] = [
    (2023, 1, 100),
    (2023, 2, 200),
    (2023, 3, 150),
    (2023, 4, 400),
    (2023, 5, 300),
    (2023, 6, 250),
    (2023, 7, 350),
    (2024, 1, 450),
    (2024, 2, 500),
    (2024, 3, 550),
    (2024, 4, 600),
    (2024, 5, 650),
    (2024, 6, 700),
];

impl SalesSeries {
    /// Build a series, sorting points by time.
    #[must_use]
    pub fn new(mut points: Vec<SalesPoint>) -> Self {
        points.sort_by_key(|p| p.time);
        Self { points }
    }

    /// The series bundled with the storefront.
    #[must_use]
    pub fn bundled() -> Self {
        Self::new(
            BUNDLED
                .iter()
                .filter_map(|&(year, month, value)| {
                    NaiveDate::from_ymd_opt(year, month, 1).map(|time| SalesPoint { time, value })
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn points(&self) -> &[SalesPoint] {
        &self.points
    }

    /// Largest value in the series, 0 when empty.
    #[must_use]
    pub fn max_value(&self) -> u32 {
        self.points.iter().map(|p| p.value).max().unwrap_or(0)
    }

    /// Sum of all values.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.points.iter().map(|p| u64::from(p.value)).sum()
    }

    /// Bars scaled to a `width` x `height` plotting area.
    ///
    /// Bars share the width evenly with a 20% gap; the tallest bar spans the
    /// full height.
    #[must_use]
    pub fn bars(&self, width: f64, height: f64) -> Vec<ChartBar> {
        let max = f64::from(self.max_value());
        if self.points.is_empty() || max <= 0.0 {
            return Vec::new();
        }

        #[allow(clippy::cast_precision_loss)] // a handful of points
        let slot = width / self.points.len() as f64;
        let bar_width = slot * 0.8;

        self.points
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let bar_height = f64::from(point.value) / max * height;
                #[allow(clippy::cast_precision_loss)]
                let x = (i as f64).mul_add(slot, (slot - bar_width) / 2.0);
                ChartBar {
                    label: point.time.format("%Y-%m").to_string(),
                    value: point.value,
                    x,
                    y: height - bar_height,
                    width: bar_width,
                    height: bar_height,
                }
            })
            .collect()
    }
}
