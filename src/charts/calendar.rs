// Holiday & working-day comparison

use super::{Bar, Chart, ChartGroup, ChartKind, ChartRenderer};
use crate::data::RentalRecord;
use crate::error::RenderError;
use crate::filter::FilteredView;

pub const HOLIDAY_LABELS: [&str; 2] = ["Non-Holiday", "Holiday"];
pub const WORKING_DAY_LABELS: [&str; 2] = ["Non-Working Day", "Working Day"];

/// Total rentals split by a boolean flag: `[false, true]`
pub fn rentals_by_flag(view: &FilteredView<'_>, flag: impl Fn(&RentalRecord) -> bool) -> [u64; 2] {
    let mut sums = [0u64; 2];
    for record in view.records() {
        sums[usize::from(flag(record))] += u64::from(record.total);
    }
    sums
}

fn flag_chart(
    title: &str,
    x_label: &str,
    labels: [&str; 2],
    sums: [u64; 2],
    has_data: bool,
) -> Chart {
    let bars = labels
        .iter()
        .zip(sums)
        .map(|(label, sum)| Bar::new(*label, sum as f64))
        .collect();

    Chart::new(
        title,
        x_label,
        "Total rentals",
        ChartKind::Bar {
            bars,
            horizontal: false,
        },
    )
    .with_data(has_data)
}

pub struct HolidayWorkingDayRenderer;

impl ChartRenderer for HolidayWorkingDayRenderer {
    fn id(&self) -> &'static str {
        "calendar"
    }

    fn title(&self) -> &'static str {
        "Holidays and Working Days"
    }

    fn render(&self, view: &FilteredView<'_>) -> Result<ChartGroup, RenderError> {
        Ok(self.group(vec![
            flag_chart(
                "Rentals on Holidays",
                "Holiday",
                HOLIDAY_LABELS,
                rentals_by_flag(view, |r| r.holiday),
                !view.is_empty(),
            ),
            flag_chart(
                "Rentals on Working Days",
                "Working Day",
                WORKING_DAY_LABELS,
                rentals_by_flag(view, |r| r.working_day),
                !view.is_empty(),
            ),
        ]))
    }
}
