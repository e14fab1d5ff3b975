// Monthly trend: distinct casual-rider values per calendar month

use super::{Chart, ChartGroup, ChartKind, ChartRenderer, Point};
use crate::error::RenderError;
use crate::filter::FilteredView;
use std::collections::{BTreeMap, HashSet};

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Label for a 1-based month number
pub fn month_label(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_LABELS.get(i as usize))
        .copied()
        .unwrap_or("?")
}

/// Distinct casual values per month, months with no rows left out
pub fn distinct_casual_by_month(view: &FilteredView<'_>) -> BTreeMap<u32, usize> {
    let mut seen: BTreeMap<u32, HashSet<u32>> = BTreeMap::new();
    for record in view.records() {
        seen.entry(record.month()).or_default().insert(record.casual);
    }

    seen.into_iter().map(|(month, ids)| (month, ids.len())).collect()
}

pub struct MonthlyTrendRenderer;

impl ChartRenderer for MonthlyTrendRenderer {
    fn id(&self) -> &'static str {
        "monthly"
    }

    fn title(&self) -> &'static str {
        "Monthly Rentals"
    }

    fn render(&self, view: &FilteredView<'_>) -> Result<ChartGroup, RenderError> {
        let points = distinct_casual_by_month(view)
            .into_iter()
            .map(|(month, count)| Point {
                label: month_label(month).to_string(),
                x: f64::from(month),
                y: count as f64,
            })
            .collect();

        Ok(self.group(vec![Chart::new(
            "Rentals per Month",
            "Month",
            "Casual riders (distinct)",
            ChartKind::Line { points },
        )]))
    }
}
