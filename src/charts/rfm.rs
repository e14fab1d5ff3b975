// RFM-style customer segmentation
//
// Each distinct casual value is treated as one customer. Recency is measured
// against the latest date in the view; Frequency and Monetary are both the
// customer's summed total rentals.

use super::{quantile, sorted_values, Bar, BoxStats, Chart, ChartGroup, ChartKind, ChartRenderer, HistogramBin};
use crate::charts::monthly::month_label;
use crate::data::RentalRecord;
use crate::error::RenderError;
use crate::filter::FilteredView;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

// ============================================================================
// PER-CUSTOMER METRICS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerMetrics {
    pub customer: u32,
    pub registration_month: u32,
    pub last_rental: NaiveDate,
    pub recency_days: i64,
    pub total_rentals: u64,
    pub active_months: usize,
}

impl CustomerMetrics {
    /// Group a date-sorted slice by customer. Output is ordered by customer key.
    pub fn from_records(records: &[RentalRecord]) -> Vec<CustomerMetrics> {
        let Some(reference) = records.last().map(|r| r.date) else {
            return Vec::new();
        };

        struct Acc {
            first_month: u32,
            last_rental: NaiveDate,
            total: u64,
            months: BTreeSet<u32>,
        }

        let mut by_customer: BTreeMap<u32, Acc> = BTreeMap::new();
        for record in records {
            let acc = by_customer.entry(record.casual).or_insert_with(|| Acc {
                first_month: record.month(),
                last_rental: record.date,
                total: 0,
                months: BTreeSet::new(),
            });
            acc.last_rental = acc.last_rental.max(record.date);
            acc.total += u64::from(record.total);
            acc.months.insert(record.month());
        }

        by_customer
            .into_iter()
            .map(|(customer, acc)| CustomerMetrics {
                customer,
                registration_month: acc.first_month,
                last_rental: acc.last_rental,
                recency_days: (reference - acc.last_rental).num_days(),
                total_rentals: acc.total,
                active_months: acc.months.len(),
            })
            .collect()
    }

    pub fn frequency(&self) -> f64 {
        self.total_rentals as f64
    }

    pub fn monetary(&self) -> f64 {
        self.total_rentals as f64
    }

    pub fn avg_monthly_rentals(&self) -> f64 {
        self.total_rentals as f64 / self.active_months.max(1) as f64
    }
}

// ============================================================================
// QUARTILE BINNING
// ============================================================================

/// Quantile edges at 0, 25, 50, 75 and 100 percent. Fails when two edges
/// coincide, which happens when the values have too little spread.
pub fn quartile_edges(values: &[f64], measure: &'static str) -> Result<[f64; 5], RenderError> {
    let sorted = sorted_values(values.iter().copied());
    let distinct = {
        let mut d = sorted.clone();
        d.dedup();
        d.len()
    };

    let collapsed = RenderError::QuartileBinning { measure, distinct };
    let mut edges = [0.0; 5];
    for (i, edge) in edges.iter_mut().enumerate() {
        *edge = quantile(&sorted, i as f64 / 4.0).ok_or_else(|| collapsed.clone())?;
    }

    if edges.windows(2).any(|w| w[0] >= w[1]) {
        return Err(collapsed);
    }

    Ok(edges)
}

/// Zero-based quartile of `value`. Bins are right-closed and the lowest edge
/// belongs to the first bin.
pub fn quartile_of(value: f64, edges: &[f64; 5]) -> usize {
    edges[1..]
        .iter()
        .position(|edge| value <= *edge)
        .unwrap_or(3)
}

/// `Recency`, `Frequency`, `Monetary` quartile labels joined into a code
pub fn segment_codes(customers: &[CustomerMetrics]) -> Result<Vec<String>, RenderError> {
    let recency: Vec<f64> = customers.iter().map(|c| c.recency_days as f64).collect();
    let frequency: Vec<f64> = customers.iter().map(CustomerMetrics::frequency).collect();
    let monetary: Vec<f64> = customers.iter().map(CustomerMetrics::monetary).collect();

    let r_edges = quartile_edges(&recency, "recency")?;
    let f_edges = quartile_edges(&frequency, "frequency")?;
    let m_edges = quartile_edges(&monetary, "monetary")?;

    Ok((0..customers.len())
        .map(|i| {
            // Lower recency is better, so its labels run 4..1
            let r = 4 - quartile_of(recency[i], &r_edges);
            let f = quartile_of(frequency[i], &f_edges) + 1;
            let m = quartile_of(monetary[i], &m_edges) + 1;
            format!("{r}{f}{m}")
        })
        .collect())
}

/// Summed monetary value per segment code, codes in lexical order
pub fn segment_revenue(customers: &[CustomerMetrics]) -> Result<BTreeMap<String, f64>, RenderError> {
    let mut revenue = BTreeMap::new();
    for (customer, code) in customers.iter().zip(segment_codes(customers)?) {
        *revenue.entry(code).or_insert(0.0) += customer.monetary();
    }
    Ok(revenue)
}

// ============================================================================
// DISTRIBUTIONS
// ============================================================================

/// Box statistics per group, Tukey whiskers at 1.5 IQR
pub fn box_stats(label: String, values: &[f64]) -> Option<BoxStats> {
    let sorted = sorted_values(values.iter().copied());
    let q1 = quantile(&sorted, 0.25)?;
    let median = quantile(&sorted, 0.5)?;
    let q3 = quantile(&sorted, 0.75)?;
    let iqr = q3 - q1;
    let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

    let inside: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| *v >= lo_fence && *v <= hi_fence)
        .collect();
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < lo_fence || *v > hi_fence)
        .collect();

    Some(BoxStats {
        label,
        lower_whisker: inside.first().copied().unwrap_or(q1),
        q1,
        median,
        q3,
        upper_whisker: inside.last().copied().unwrap_or(q3),
        outliers,
        count: sorted.len(),
    })
}

/// Recency distribution for each registration month, months ascending
pub fn recency_by_registration_month(customers: &[CustomerMetrics]) -> Vec<BoxStats> {
    let mut groups: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for customer in customers {
        groups
            .entry(customer.registration_month)
            .or_default()
            .push(customer.recency_days as f64);
    }

    groups
        .into_iter()
        .filter_map(|(month, values)| box_stats(month_label(month).to_string(), &values))
        .collect()
}

/// Equal-width histogram. A single repeated value spreads over `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = if min == max { (min - 0.5, max + 0.5) } else { (min, max) };
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: lo + width * i as f64,
            end: lo + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for value in values {
        // Last bin is closed on the right
        let index = (((value - lo) / width).floor() as usize).min(bins - 1);
        out[index].count += 1;
    }

    out
}

// ============================================================================
// RENDERER
// ============================================================================

pub struct RfmRenderer {
    histogram_bins: usize,
}

impl RfmRenderer {
    pub fn new(histogram_bins: usize) -> Self {
        Self { histogram_bins }
    }
}

impl Default for RfmRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTOGRAM_BINS)
    }
}

impl ChartRenderer for RfmRenderer {
    fn id(&self) -> &'static str {
        "rfm"
    }

    fn title(&self) -> &'static str {
        "RFM Customer Analysis"
    }

    fn render(&self, view: &FilteredView<'_>) -> Result<ChartGroup, RenderError> {
        let customers = CustomerMetrics::from_records(view.records());

        let revenue = if customers.is_empty() {
            BTreeMap::new()
        } else {
            segment_revenue(&customers)?
        };

        let averages: Vec<f64> = customers.iter().map(CustomerMetrics::avg_monthly_rentals).collect();

        Ok(self.group(vec![
            Chart::new(
                "Recency by Registration Month",
                "Registration month",
                "Recency (days)",
                ChartKind::BoxPlot {
                    boxes: recency_by_registration_month(&customers),
                },
            ),
            Chart::new(
                "Average Monthly Rentals per Customer",
                "Average rentals per month",
                "Customers",
                ChartKind::Histogram {
                    bins: histogram(&averages, self.histogram_bins),
                },
            ),
            Chart::new(
                "Total Revenue per Segment",
                "RFM segment",
                "Total revenue",
                ChartKind::Bar {
                    bars: revenue
                        .into_iter()
                        .map(|(code, value)| Bar::new(code, value))
                        .collect(),
                    horizontal: false,
                },
            ),
        ]))
    }
}
