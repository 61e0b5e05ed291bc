// Client session state machine
use super::chart::ChartSuggestion;
use super::selection::DashboardSelection;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Step {
    #[default]
    Upload,
    Loading,
    Analysis,
    Dashboard,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("transition not allowed from the {0:?} step")]
    WrongStep(Step),
    #[error("at least one chart must be selected before viewing the dashboard")]
    EmptySelection,
}

/// Explicit state for one client flow: which step is shown, the analysis
/// results, and the charts picked for the dashboard. Every transition is a
/// method so each one can be tested on its own; a page reload is just a
/// fresh `Session`.
#[derive(Debug, Clone, Default)]
pub struct Session {
    step: Step,
    file_name: Option<String>,
    results: Vec<ChartSuggestion>,
    selection: DashboardSelection,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn results(&self) -> &[ChartSuggestion] {
        &self.results
    }

    pub fn selection(&self) -> &DashboardSelection {
        &self.selection
    }

    /// Upload -> Loading: the user submitted a valid file.
    pub fn begin_analysis(&mut self, file_name: String) -> Result<(), TransitionError> {
        if self.step != Step::Upload {
            return Err(TransitionError::WrongStep(self.step));
        }
        self.file_name = Some(file_name);
        self.step = Step::Loading;
        Ok(())
    }

    /// Loading -> Analysis: the endpoint answered with suggestions.
    pub fn analysis_ready(
        &mut self,
        results: Vec<ChartSuggestion>,
    ) -> Result<(), TransitionError> {
        if self.step != Step::Loading {
            return Err(TransitionError::WrongStep(self.step));
        }
        self.results = results;
        self.step = Step::Analysis;
        Ok(())
    }

    /// Loading -> Upload: the endpoint failed or the network dropped.
    /// Nothing is retained; the client shows a blocking alert.
    pub fn analysis_failed(&mut self) -> Result<(), TransitionError> {
        if self.step != Step::Loading {
            return Err(TransitionError::WrongStep(self.step));
        }
        self.file_name = None;
        self.step = Step::Upload;
        Ok(())
    }

    /// Analysis -> Dashboard: requires at least one selected chart.
    pub fn view_dashboard(&mut self) -> Result<(), TransitionError> {
        if self.step != Step::Analysis {
            return Err(TransitionError::WrongStep(self.step));
        }
        if self.selection.is_empty() {
            return Err(TransitionError::EmptySelection);
        }
        self.step = Step::Dashboard;
        Ok(())
    }

    /// Dashboard -> Analysis.
    pub fn back_to_analysis(&mut self) -> Result<(), TransitionError> {
        if self.step != Step::Dashboard {
            return Err(TransitionError::WrongStep(self.step));
        }
        self.step = Step::Analysis;
        Ok(())
    }

    /// Analysis|Dashboard -> Upload, discarding results and selections.
    pub fn start_over(&mut self) -> Result<(), TransitionError> {
        if self.step != Step::Analysis && self.step != Step::Dashboard {
            return Err(TransitionError::WrongStep(self.step));
        }
        *self = Session::new();
        Ok(())
    }

    /// Add a chart to the dashboard selection. Allowed while the results
    /// are visible (Analysis or Dashboard). Returns whether it was added;
    /// a duplicate (title, chart_type) is a no-op.
    pub fn add_chart(&mut self, chart: ChartSuggestion) -> Result<bool, TransitionError> {
        if self.step != Step::Analysis && self.step != Step::Dashboard {
            return Err(TransitionError::WrongStep(self.step));
        }
        Ok(self.selection.add(chart))
    }

    /// Remove the selected chart at `index`.
    pub fn remove_chart(
        &mut self,
        index: usize,
    ) -> Result<Option<ChartSuggestion>, TransitionError> {
        if self.step != Step::Analysis && self.step != Step::Dashboard {
            return Err(TransitionError::WrongStep(self.step));
        }
        Ok(self.selection.remove(index))
    }
}
