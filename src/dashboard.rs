// Dashboard - runs every chart renderer over one date range
//
// Each renderer is isolated: a failing group is reported in place and the
// remaining groups still render.

use crate::charts::{default_renderers, ChartGroup, ChartRenderer};
use crate::config::DashboardConfig;
use crate::data::Dataset;
use crate::filter::{DateRange, RentalSummary};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GroupOutcome {
    Rendered(ChartGroup),
    Failed {
        id: String,
        title: String,
        message: String,
    },
}

impl GroupOutcome {
    pub fn id(&self) -> &str {
        match self {
            GroupOutcome::Rendered(group) => &group.id,
            GroupOutcome::Failed { id, .. } => id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            GroupOutcome::Rendered(group) => &group.title,
            GroupOutcome::Failed { title, .. } => title,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, GroupOutcome::Failed { .. })
    }
}

/// Everything a shell needs to draw one screen
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub header: String,
    pub subheader: String,
    pub logo_url: String,
    pub min_date: chrono::NaiveDate,
    pub max_date: chrono::NaiveDate,
    pub range: DateRange,
    pub summary: RentalSummary,
    pub groups: Vec<GroupOutcome>,
}

pub struct Dashboard {
    dataset: Dataset,
    config: DashboardConfig,
    renderers: Vec<Box<dyn ChartRenderer>>,
}

impl Dashboard {
    pub fn new(dataset: Dataset, config: DashboardConfig) -> Self {
        let renderers = default_renderers(config.histogram_bins);
        Self::with_renderers(dataset, config, renderers)
    }

    pub fn with_renderers(
        dataset: Dataset,
        config: DashboardConfig,
        renderers: Vec<Box<dyn ChartRenderer>>,
    ) -> Self {
        Self {
            dataset,
            config,
            renderers,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn full_range(&self) -> DateRange {
        DateRange::full(&self.dataset)
    }

    /// Clamp the requested range to the data, filter, and render every group
    pub fn render(&self, requested: DateRange) -> DashboardView {
        let range = requested.clamp_to(self.dataset.min_date(), self.dataset.max_date());
        let view = self.dataset.filter(&range);

        tracing::debug!(start = %range.start, end = %range.end, rows = view.len(), "rendering dashboard");

        let groups = self
            .renderers
            .iter()
            .map(|renderer| match renderer.render(&view) {
                Ok(group) => GroupOutcome::Rendered(group),
                Err(err) => {
                    tracing::warn!(group = renderer.id(), error = %err, "chart group failed");
                    GroupOutcome::Failed {
                        id: renderer.id().to_string(),
                        title: renderer.title().to_string(),
                        message: err.to_string(),
                    }
                }
            })
            .collect();

        DashboardView {
            header: self.config.header.clone(),
            subheader: self.config.subheader.clone(),
            logo_url: self.config.logo_url.clone(),
            min_date: self.dataset.min_date(),
            max_date: self.dataset.max_date(),
            range,
            summary: view.summary(),
            groups,
        }
    }
}
