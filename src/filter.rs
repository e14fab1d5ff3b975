// Date Range Filter
// Narrows the loaded table to an inclusive [start, end] window

use crate::data::{Dataset, RentalRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The whole span of the dataset
    pub fn full(dataset: &Dataset) -> Self {
        Self::new(dataset.min_date(), dataset.max_date())
    }

    /// `start > end` selects nothing
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// A forward range lying completely before `min` or after `max`
    pub fn is_disjoint(&self, min: NaiveDate, max: NaiveDate) -> bool {
        !self.is_inverted() && (self.start > max || self.end < min)
    }

    /// Pull both ends into `[min, max]`. Inverted and disjoint ranges are
    /// returned as-is: clamping could turn them into a one-day window.
    pub fn clamp_to(&self, min: NaiveDate, max: NaiveDate) -> Self {
        if self.is_inverted() || self.is_disjoint(min, max) {
            return *self;
        }
        Self::new(self.start.clamp(min, max), self.end.clamp(min, max))
    }
}

/// Parse a `YYYY-MM-DD` query or form value
pub fn parse_date_param(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Headline numbers for a filtered view
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RentalSummary {
    pub days: usize,
    pub total_rentals: u64,
    pub casual_rentals: u64,
    pub registered_rentals: u64,
}

/// Borrowed, date-sorted rows inside a range
#[derive(Debug, Clone, Copy)]
pub struct FilteredView<'a> {
    range: DateRange,
    records: &'a [RentalRecord],
}

impl<'a> FilteredView<'a> {
    pub fn new(range: DateRange, records: &'a [RentalRecord]) -> Self {
        Self { range, records }
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn records(&self) -> &'a [RentalRecord] {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn min_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn max_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    pub fn summary(&self) -> RentalSummary {
        let mut summary = RentalSummary {
            days: self.records.len(),
            ..RentalSummary::default()
        };

        for record in self.records {
            summary.total_rentals += u64::from(record.total);
            summary.casual_rentals += u64::from(record.casual);
            // Fall back to total - casual when the column is absent
            summary.registered_rentals += u64::from(
                record
                    .registered
                    .unwrap_or_else(|| record.total.saturating_sub(record.casual)),
            );
        }

        summary
    }
}

impl Dataset {
    /// Rows with `range.start <= date <= range.end`
    pub fn filter(&self, range: &DateRange) -> FilteredView<'_> {
        if range.is_inverted() {
            return FilteredView::new(*range, &[]);
        }

        let records = self.records();
        let lo = records.partition_point(|r| r.date < range.start);
        let hi = records.partition_point(|r| r.date <= range.end);

        FilteredView::new(*range, &records[lo..hi])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Season;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dataset(days: u32) -> Dataset {
        let records = (1..=days)
            .map(|d| RentalRecord {
                date: date(2011, 3, d),
                season: Season::Spring,
                weather: 1,
                holiday: false,
                working_day: d % 7 != 0,
                casual: d * 10,
                registered: None,
                total: d * 100,
            })
            .collect();
        Dataset::from_records(records).unwrap()
    }

    #[test]
    fn test_full_range_keeps_every_row() {
        let ds = dataset(20);
        let view = ds.filter(&DateRange::full(&ds));
        assert_eq!(view.len(), ds.len());
    }

    #[test]
    fn test_inclusive_bounds() {
        let ds = dataset(20);
        let view = ds.filter(&DateRange::new(date(2011, 3, 5), date(2011, 3, 7)));

        let days: Vec<_> = view.records().iter().map(|r| r.date).collect();
        assert!(days.iter().all(|d| view.range().contains(*d)));
        assert_eq!(days, vec![date(2011, 3, 5), date(2011, 3, 6), date(2011, 3, 7)]);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let ds = dataset(20);
        let view = ds.filter(&DateRange::new(date(2011, 3, 10), date(2011, 3, 2)));
        assert!(view.is_empty());
        assert_eq!(view.max_date(), None);
        assert_eq!(view.summary().days, 0);
    }

    #[test]
    fn test_range_outside_data_is_empty() {
        let ds = dataset(20);
        let view = ds.filter(&DateRange::new(date(2012, 1, 1), date(2012, 2, 1)));
        assert!(view.is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let ds = dataset(31);
        let range = DateRange::new(date(2011, 3, 3), date(2011, 3, 17));

        let first: Vec<_> = ds.filter(&range).records().to_vec();
        let again = Dataset::from_records(first.clone()).unwrap();
        let second: Vec<_> = again.filter(&range).records().to_vec();

        assert_eq!(first, second);
    }

    #[test]
    fn test_clamp_keeps_order() {
        let min = date(2011, 1, 1);
        let max = date(2011, 12, 31);

        let wide = DateRange::new(date(2010, 5, 1), date(2013, 1, 1)).clamp_to(min, max);
        assert_eq!(wide, DateRange::new(min, max));

        let inverted = DateRange::new(date(2012, 5, 1), date(2011, 6, 1)).clamp_to(min, max);
        assert!(inverted.is_inverted());

        let after = DateRange::new(date(2012, 3, 1), date(2012, 4, 1));
        assert_eq!(after.clamp_to(min, max), after);
    }

    #[test]
    fn test_inverted_range_past_one_edge_stays_empty() {
        let ds = dataset(3);
        let (min, max) = (ds.min_date(), ds.max_date());

        let above = DateRange::new(date(2013, 5, 1), date(2013, 1, 1));
        let clamped = above.clamp_to(min, max);
        assert!(clamped.is_inverted());
        assert!(ds.filter(&clamped).is_empty());

        let below = DateRange::new(date(2010, 5, 1), date(2010, 1, 1));
        let clamped = below.clamp_to(min, max);
        assert!(clamped.is_inverted());
        assert!(ds.filter(&clamped).is_empty());
    }

    #[test]
    fn test_summary_falls_back_to_total_minus_casual() {
        let ds = dataset(2);
        let summary = ds.filter(&DateRange::full(&ds)).summary();

        assert_eq!(summary.days, 2);
        assert_eq!(summary.total_rentals, 300);
        assert_eq!(summary.casual_rentals, 30);
        assert_eq!(summary.registered_rentals, 270);
    }

    #[test]
    fn test_parse_date_param() {
        assert_eq!(parse_date_param("2011-06-01"), Some(date(2011, 6, 1)));
        assert_eq!(parse_date_param("06/01/2011"), None);
    }
}
