// Chart suggestion domain models
use serde::{Deserialize, Serialize};

/// One visualization recommended by the external analysis program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSuggestion {
    pub title: String,
    pub chart_type: ChartType,
    #[serde(default)]
    pub insight: String,
    #[serde(default)]
    pub parameters: ChartParameters,
    /// Pre-extracted rows for this chart, passed through untouched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<serde_json::Value>,
}

impl ChartSuggestion {
    /// Selection identity: two suggestions are the "same chart" when both
    /// the title and the chart type match.
    pub fn selection_key(&self) -> (&str, ChartType) {
        (self.title.as_str(), self.chart_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
    Scatter,
}

/// Axis bindings for a suggestion. The analyzer names columns of the
/// uploaded file; pie charts may use category/value instead of axes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}
