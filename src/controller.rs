use crate::data::model::LaunchDataset;
use crate::error::SelectionError;
use crate::selection::{PayloadRange, SiteSelection};

// ---------------------------------------------------------------------------
// Chart binding: input → pure builder → published chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeState {
    Idle,
    Recomputing,
}

/// Pure chart builder bound to one display region.
pub type BuildFn<I, C> = fn(&LaunchDataset, &I) -> Result<C, SelectionError>;

/// Inputs of the payload correlation chart.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationInput {
    pub site: SiteSelection,
    pub range: PayloadRange,
}

/// Binds one chart to its inputs.
///
/// Every call to [`ChartBinding::recompute`] runs the builder to completion
/// before returning, so at most one recompute per binding is ever active.
/// A failed recompute leaves the previously published chart in place.
pub struct ChartBinding<I, C> {
    name: &'static str,
    build: BuildFn<I, C>,
    state: RecomputeState,
    published: Option<C>,
    revision: u64,
    last_error: Option<SelectionError>,
}

impl<I, C> ChartBinding<I, C> {
    pub fn new(name: &'static str, build: BuildFn<I, C>) -> Self {
        Self {
            name,
            build,
            state: RecomputeState::Idle,
            published: None,
            revision: 0,
            last_error: None,
        }
    }

    /// Rebuild the chart for `input` and republish it.
    pub fn recompute(&mut self, dataset: &LaunchDataset, input: &I) -> Result<&C, SelectionError> {
        debug_assert_eq!(self.state, RecomputeState::Idle);
        self.state = RecomputeState::Recomputing;
        let result = (self.build)(dataset, input);
        self.state = RecomputeState::Idle;

        match result {
            Ok(chart) => {
                self.revision += 1;
                self.last_error = None;
                log::debug!("{} chart republished (revision {})", self.name, self.revision);
                Ok(self.published.insert(chart))
            }
            Err(e) => {
                log::warn!("{} chart kept at revision {}: {e}", self.name, self.revision);
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> RecomputeState {
        self.state
    }

    /// The most recently published chart, if any recompute has succeeded.
    pub fn published(&self) -> Option<&C> {
        self.published.as_ref()
    }

    /// Number of successful publishes so far. The display keys its plot
    /// memory on it, so a new chart starts from fresh bounds.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Error of the latest recompute, when it failed and the published
    /// chart is therefore stale.
    pub fn last_error(&self) -> Option<&SelectionError> {
        self.last_error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{build_outcome_chart, PieChart};
    use crate::data::fixtures::scenario_dataset;

    fn outcome_binding() -> ChartBinding<SiteSelection, PieChart> {
        ChartBinding::new("outcome", build_outcome_chart)
    }

    #[test]
    fn starts_idle_and_unpublished() {
        let binding = outcome_binding();
        assert_eq!(binding.state(), RecomputeState::Idle);
        assert!(binding.published().is_none());
        assert_eq!(binding.revision(), 0);
    }

    #[test]
    fn recompute_publishes_and_returns_to_idle() {
        let ds = scenario_dataset();
        let mut binding = outcome_binding();

        let chart = binding.recompute(&ds, &SiteSelection::All).unwrap();
        assert_eq!(chart.slices.len(), 2);
        assert_eq!(binding.state(), RecomputeState::Idle);
        assert_eq!(binding.revision(), 1);

        binding.recompute(&ds, &SiteSelection::Site("siteA".into())).unwrap();
        assert_eq!(binding.revision(), 2);
        assert_eq!(binding.published().unwrap().title, "Success vs Failure Launches for siteA");
    }

    #[test]
    fn failed_recompute_keeps_previous_chart() {
        let ds = scenario_dataset();
        let mut binding = outcome_binding();
        binding.recompute(&ds, &SiteSelection::All).unwrap();

        let err = binding
            .recompute(&ds, &SiteSelection::Site("siteC".into()))
            .unwrap_err();
        assert_eq!(err, SelectionError::InvalidSelection("siteC".into()));
        assert_eq!(binding.state(), RecomputeState::Idle);
        assert_eq!(binding.revision(), 1);
        assert_eq!(binding.last_error(), Some(&err));
        assert_eq!(binding.published().unwrap().title, "Total Success Launches by Site");
    }

    #[test]
    fn identical_inputs_publish_identical_charts() {
        let ds = scenario_dataset();
        let mut binding = outcome_binding();
        let first = binding.recompute(&ds, &SiteSelection::All).unwrap().clone();
        let second = binding.recompute(&ds, &SiteSelection::All).unwrap().clone();
        assert_eq!(first, second);
    }
}
