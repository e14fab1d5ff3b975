// Seasonal & weather breakdown
// (a) total rentals per season in fixed order, (b) mean rentals per weather situation

use super::{Bar, Chart, ChartGroup, ChartKind, ChartRenderer};
use crate::data::{weather_label, Season};
use crate::error::RenderError;
use crate::filter::FilteredView;
use std::collections::BTreeMap;

/// Sum of total rentals for each season. Always four entries in
/// Spring, Summer, Fall, Winter order; absent seasons sum to zero.
pub fn rentals_by_season(view: &FilteredView<'_>) -> [(Season, u64); 4] {
    let mut sums = Season::ALL.map(|s| (s, 0u64));
    for record in view.records() {
        let slot = usize::from(record.season.code() - 1);
        sums[slot].1 += u64::from(record.total);
    }
    sums
}

/// Mean total rentals per weather code, ascending by mean
pub fn mean_rentals_by_weather(view: &FilteredView<'_>) -> Vec<(u8, f64)> {
    let mut acc: BTreeMap<u8, (u64, usize)> = BTreeMap::new();
    for record in view.records() {
        let entry = acc.entry(record.weather).or_insert((0, 0));
        entry.0 += u64::from(record.total);
        entry.1 += 1;
    }

    let mut means: Vec<(u8, f64)> = acc
        .into_iter()
        .map(|(code, (sum, n))| (code, sum as f64 / n as f64))
        .collect();

    // BTreeMap order makes ties fall back to the weather code
    means.sort_by(|a, b| a.1.total_cmp(&b.1));
    means
}

pub struct SeasonalWeatherRenderer;

impl ChartRenderer for SeasonalWeatherRenderer {
    fn id(&self) -> &'static str {
        "seasonal"
    }

    fn title(&self) -> &'static str {
        "Rentals by Season and Weather"
    }

    fn render(&self, view: &FilteredView<'_>) -> Result<ChartGroup, RenderError> {
        let season_bars = rentals_by_season(view)
            .iter()
            .map(|(season, sum)| Bar::new(season.label(), *sum as f64))
            .collect();

        let weather_bars = mean_rentals_by_weather(view)
            .into_iter()
            .map(|(code, mean)| Bar::new(weather_label(code), mean))
            .collect();

        Ok(self.group(vec![
            Chart::new(
                "Rentals by Season",
                "Season",
                "Total rentals",
                ChartKind::Bar {
                    bars: season_bars,
                    horizontal: false,
                },
            )
            .with_data(!view.is_empty()),
            Chart::new(
                "Rentals by Weather",
                "Average rentals",
                "Weather",
                ChartKind::Bar {
                    bars: weather_bars,
                    horizontal: true,
                },
            ),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Dataset, RentalRecord};
    use crate::filter::DateRange;
    use chrono::NaiveDate;

    fn record(day: u32, season: Season, weather: u8, total: u32) -> RentalRecord {
        RentalRecord {
            date: NaiveDate::from_ymd_opt(2011, 7, day).unwrap(),
            season,
            weather,
            holiday: false,
            working_day: true,
            casual: day,
            registered: None,
            total,
        }
    }

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            record(1, Season::Fall, 1, 500),
            record(2, Season::Summer, 2, 300),
            record(3, Season::Fall, 1, 700),
            record(4, Season::Summer, 3, 100),
        ])
        .unwrap()
    }

    #[test]
    fn test_seasons_fixed_order_with_zeros() {
        let ds = sample();
        let sums = rentals_by_season(&ds.filter(&DateRange::full(&ds)));

        assert_eq!(
            sums,
            [
                (Season::Spring, 0),
                (Season::Summer, 400),
                (Season::Fall, 1200),
                (Season::Winter, 0),
            ]
        );
    }

    #[test]
    fn test_weather_sorted_by_mean() {
        let ds = sample();
        let means = mean_rentals_by_weather(&ds.filter(&DateRange::full(&ds)));

        assert_eq!(means, vec![(3, 100.0), (2, 300.0), (1, 600.0)]);
    }

    #[test]
    fn test_empty_view_still_has_four_seasons() {
        let ds = sample();
        let empty = ds.filter(&DateRange::new(ds.max_date(), ds.min_date()));
        let group = SeasonalWeatherRenderer.render(&empty).unwrap();

        match &group.charts[0].kind {
            ChartKind::Bar { bars, .. } => {
                let labels: Vec<_> = bars.iter().map(|b| b.label.as_str()).collect();
                assert_eq!(labels, vec!["Spring", "Summer", "Fall", "Winter"]);
            }
            other => panic!("expected bar chart, got {:?}", other),
        }
        assert!(group.charts[0].is_empty());
        assert!(group.charts[1].is_empty());
    }

    #[test]
    fn test_zero_rentals_are_data_not_placeholder() {
        let ds = Dataset::from_records(vec![
            record(1, Season::Fall, 1, 0),
            record(2, Season::Fall, 2, 0),
        ])
        .unwrap();
        let group = SeasonalWeatherRenderer
            .render(&ds.filter(&DateRange::full(&ds)))
            .unwrap();

        assert!(!group.charts[0].is_empty());
        assert!(!group.charts[1].is_empty());
    }
}
