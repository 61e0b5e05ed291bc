// Dashboard selection domain model
use super::chart::ChartSuggestion;

/// The ordered set of charts the user has picked for the dashboard.
/// Membership is decided by (title, chart_type), not object identity.
#[derive(Debug, Clone, Default)]
pub struct DashboardSelection {
    charts: Vec<ChartSuggestion>,
}

impl DashboardSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, chart: &ChartSuggestion) -> bool {
        self.charts
            .iter()
            .any(|c| c.selection_key() == chart.selection_key())
    }

    /// Append a chart unless one with the same key is already selected.
    /// Returns whether the chart was added.
    pub fn add(&mut self, chart: ChartSuggestion) -> bool {
        if self.contains(&chart) {
            return false;
        }
        self.charts.push(chart);
        true
    }

    /// Remove the chart at `index`, if there is one.
    pub fn remove(&mut self, index: usize) -> Option<ChartSuggestion> {
        if index < self.charts.len() {
            Some(self.charts.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.charts.clear();
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn charts(&self) -> &[ChartSuggestion] {
        &self.charts
    }
}
