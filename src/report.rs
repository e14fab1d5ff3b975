// Plain-text rendering of a dashboard view, used by `bike-dashboard report`

use crate::charts::{Chart, ChartKind};
use crate::dashboard::{DashboardView, GroupOutcome};
use std::fmt::Write;

const BAR_WIDTH: usize = 40;

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.min(BAR_WIDTH))
}

fn write_chart(out: &mut String, chart: &Chart) {
    let _ = writeln!(out, "  {} ({} / {})", chart.title, chart.x_label, chart.y_label);

    if chart.is_empty() {
        let _ = writeln!(out, "    No data");
        return;
    }

    match &chart.kind {
        ChartKind::Line { points } => {
            let max = points.iter().map(|p| p.y).fold(0.0, f64::max);
            for p in points {
                let _ = writeln!(out, "    {:<16} {:>10.0} {}", p.label, p.y, bar(p.y, max));
            }
        }
        ChartKind::Bar { bars, .. } => {
            let max = bars.iter().map(|b| b.value).fold(0.0, f64::max);
            for b in bars {
                let _ = writeln!(out, "    {:<16} {:>10.1} {}", b.label, b.value, bar(b.value, max));
            }
        }
        ChartKind::BoxPlot { boxes } => {
            let _ = writeln!(out, "    {:<6} {:>6} {:>8} {:>8} {:>8} {:>8} {:>8}", "month", "n", "low", "q1", "median", "q3", "high");
            for b in boxes {
                let _ = writeln!(
                    out,
                    "    {:<6} {:>6} {:>8.1} {:>8.1} {:>8.1} {:>8.1} {:>8.1}",
                    b.label, b.count, b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker
                );
            }
        }
        ChartKind::Histogram { bins } => {
            let max = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;
            for b in bins {
                let range = format!("{:.0}-{:.0}", b.start, b.end);
                let _ = writeln!(out, "    {:<16} {:>10} {}", range, b.count, bar(b.count as f64, max));
            }
        }
    }
}

/// Text report of every chart group in display order
pub fn render_text(view: &DashboardView) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", view.header);
    let _ = writeln!(out, "{}", view.subheader);
    let _ = writeln!(
        out,
        "Range {} .. {} (data {} .. {}) | days: {} | rentals: {} | casual: {} | registered: {}",
        view.range.start,
        view.range.end,
        view.min_date,
        view.max_date,
        view.summary.days,
        view.summary.total_rentals,
        view.summary.casual_rentals,
        view.summary.registered_rentals,
    );

    for outcome in &view.groups {
        let _ = writeln!(out);
        let _ = writeln!(out, "== {} ==", outcome.title());
        match outcome {
            GroupOutcome::Rendered(group) => {
                for chart in &group.charts {
                    write_chart(&mut out, chart);
                }
            }
            GroupOutcome::Failed { message, .. } => {
                let _ = writeln!(out, "  Unable to render: {}", message);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::dashboard::Dashboard;
    use crate::data::Dataset;
    use crate::filter::DateRange;
    use chrono::NaiveDate;

    const CSV: &str = "dteday,season,weathersit,holiday,workingday,casual,cnt\n\
                       2011-01-01,1,2,0,0,331,985\n\
                       2011-01-02,1,2,0,0,131,801";

    #[test]
    fn test_report_lists_every_group() {
        let dataset = Dataset::from_reader(CSV.as_bytes()).unwrap();
        let dashboard = Dashboard::new(dataset, DashboardConfig::default());
        let text = render_text(&dashboard.render(dashboard.full_range()));

        assert!(text.starts_with("Bike Sharing Dashboard"));
        assert!(text.contains("== Monthly Rentals =="));
        assert!(text.contains("== Rentals by Season and Weather =="));
        assert!(text.contains("== Holidays and Working Days =="));
        assert!(text.contains("== RFM Customer Analysis =="));
        assert!(text.contains("rentals: 1786"));
    }

    #[test]
    fn test_empty_range_prints_placeholders() {
        let dataset = Dataset::from_reader(CSV.as_bytes()).unwrap();
        let dashboard = Dashboard::new(dataset, DashboardConfig::default());
        let inverted = DateRange::new(
            NaiveDate::from_ymd_opt(2011, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
        );

        let text = render_text(&dashboard.render(inverted));
        assert!(text.contains("No data"));
        assert!(!text.contains("Unable to render"));
    }
}
