// Chart Renderers
//
// Every renderer is a pure function of the filtered view. It produces chart
// models, never pixels: the TUI and the web page each draw the same models
// with their own toolkit.

pub mod calendar;
pub mod monthly;
pub mod rfm;
pub mod seasonal;

use crate::error::RenderError;
use crate::filter::FilteredView;
use serde::Serialize;

pub use calendar::HolidayWorkingDayRenderer;
pub use monthly::MonthlyTrendRenderer;
pub use rfm::RfmRenderer;
pub use seasonal::SeasonalWeatherRenderer;

// ============================================================================
// CHART MODEL
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

impl Bar {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Five-number summary for one box, whiskers at 1.5 IQR
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub label: String,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartKind {
    Line { points: Vec<Point> },
    Bar { bars: Vec<Bar>, horizontal: bool },
    BoxPlot { boxes: Vec<BoxStats> },
    Histogram { bins: Vec<HistogramBin> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: ChartKind,
    /// False when the chart was built from no rows
    pub has_data: bool,
}

impl Chart {
    /// `has_data` follows the series: a chart without points, bars, boxes or
    /// bins has nothing to draw
    pub fn new(title: &str, x_label: &str, y_label: &str, kind: ChartKind) -> Self {
        let has_data = match &kind {
            ChartKind::Line { points } => !points.is_empty(),
            ChartKind::Bar { bars, .. } => !bars.is_empty(),
            ChartKind::BoxPlot { boxes } => !boxes.is_empty(),
            ChartKind::Histogram { bins } => !bins.is_empty(),
        };

        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            kind,
            has_data,
        }
    }

    /// Override for zero-filled series, where the bars exist even without rows
    pub fn with_data(mut self, has_data: bool) -> Self {
        self.has_data = has_data;
        self
    }

    /// True when there is nothing to draw; shells show a "No data" placeholder
    pub fn is_empty(&self) -> bool {
        !self.has_data
    }
}

/// Charts rendered side by side under one heading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartGroup {
    pub id: String,
    pub title: String,
    pub charts: Vec<Chart>,
}

// ============================================================================
// RENDERER TRAIT
// ============================================================================

pub trait ChartRenderer: Send + Sync {
    /// Stable identifier used by the API and the page anchors
    fn id(&self) -> &'static str;

    fn title(&self) -> &'static str;

    fn render(&self, view: &FilteredView<'_>) -> Result<ChartGroup, RenderError>;

    fn group(&self, charts: Vec<Chart>) -> ChartGroup {
        ChartGroup {
            id: self.id().to_string(),
            title: self.title().to_string(),
            charts,
        }
    }
}

/// The four chart groups, in display order
pub fn default_renderers(histogram_bins: usize) -> Vec<Box<dyn ChartRenderer>> {
    vec![
        Box::new(MonthlyTrendRenderer),
        Box::new(SeasonalWeatherRenderer),
        Box::new(HolidayWorkingDayRenderer),
        Box::new(RfmRenderer::new(histogram_bins)),
    ]
}

// ============================================================================
// STATISTICS HELPERS
// ============================================================================

/// Quantile of sorted data with linear interpolation between closest ranks
pub(crate) fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub(crate) fn sorted_values(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut values: Vec<f64> = values.into_iter().collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_interpolates() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&data, 0.0), Some(1.0));
        assert_eq!(quantile(&data, 0.5), Some(2.5));
        assert_eq!(quantile(&data, 0.25), Some(1.75));
        assert_eq!(quantile(&data, 1.0), Some(4.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_zero_valued_bars_are_not_empty() {
        let zeros = ChartKind::Bar {
            bars: vec![Bar::new("a", 0.0), Bar::new("b", 0.0)],
            horizontal: false,
        };

        let chart = Chart::new("t", "x", "y", zeros);
        assert!(!chart.is_empty());
        assert!(chart.clone().with_data(false).is_empty());

        let no_bars = ChartKind::Bar {
            bars: vec![],
            horizontal: false,
        };
        assert!(Chart::new("t", "x", "y", no_bars).is_empty());
    }

    #[test]
    fn test_default_renderers_order() {
        let ids: Vec<_> = default_renderers(20).iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["monthly", "seasonal", "calendar", "rfm"]);
    }

    #[test]
    fn test_chart_kind_serializes_with_tag() {
        let chart = Chart::new("t", "x", "y", ChartKind::Line { points: vec![] });
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["kind"]["type"], "line");
    }
}
