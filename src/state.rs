use std::sync::Arc;

use crate::chart::{build_correlation_chart, build_outcome_chart, PieChart, ScatterChart};
use crate::color::ColorMap;
use crate::controller::{ChartBinding, CorrelationInput};
use crate::data::model::LaunchDataset;
use crate::error::SelectionError;
use crate::selection::{PayloadRange, SiteSelection};

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering.
///
/// The site selector feeds both charts; the payload range feeds only the
/// correlation chart.
pub struct AppState {
    /// Loaded once at startup, never mutated.
    dataset: Arc<LaunchDataset>,

    site: SiteSelection,
    payload_range: PayloadRange,

    outcome_chart: ChartBinding<SiteSelection, PieChart>,
    correlation_chart: ChartBinding<CorrelationInput, ScatterChart>,

    /// Colours per booster category, fixed for the dataset.
    pub category_colors: ColorMap,

    /// Last rejected selection, shown in the top bar. Chart rebuild errors
    /// are kept by the bindings themselves.
    pub status_message: Option<String>,
}

fn correlation_chart(dataset: &LaunchDataset, input: &CorrelationInput) -> Result<ScatterChart, SelectionError> {
    build_correlation_chart(dataset, &input.site, &input.range)
}

impl AppState {
    /// State with the default selection: all sites, data-derived payload range.
    pub fn new(dataset: Arc<LaunchDataset>) -> Self {
        let payload_range = PayloadRange::from_dataset(&dataset);
        let category_colors = ColorMap::new(dataset.booster_categories().iter());

        let mut state = Self {
            dataset,
            site: SiteSelection::All,
            payload_range,
            outcome_chart: ChartBinding::new("outcome", build_outcome_chart),
            correlation_chart: ChartBinding::new("correlation", correlation_chart),
            category_colors,
            status_message: None,
        };
        state.recompute_outcome();
        state.recompute_correlation();
        state
    }

    /// State with an explicit initial selection, e.g. from the command line.
    pub fn with_selection(
        dataset: Arc<LaunchDataset>,
        site: &str,
        payload_range: Option<PayloadRange>,
    ) -> Result<Self, SelectionError> {
        let mut state = Self::new(dataset);
        if let Some(range) = payload_range {
            state.select_payload_range(range.low(), range.high())?;
        }
        state.select_site(site)?;
        Ok(state)
    }

    /// Apply a site selector value and refresh both charts.
    ///
    /// An unknown site leaves the selection and both charts unchanged.
    pub fn select_site(&mut self, value: &str) -> Result<(), SelectionError> {
        let site = match SiteSelection::parse(value, &self.dataset) {
            Ok(site) => site,
            Err(e) => return Err(self.reject(e)),
        };
        self.site = site;
        self.status_message = None;
        self.recompute_outcome();
        self.recompute_correlation();
        Ok(())
    }

    /// Apply a payload range and refresh the correlation chart.
    ///
    /// An invalid range leaves the selection and the chart unchanged.
    pub fn select_payload_range(&mut self, low: f64, high: f64) -> Result<(), SelectionError> {
        self.apply_payload_range(PayloadRange::new(low, high))
    }

    /// Apply bounds coming from the range sliders, clamped to the payload
    /// domain first.
    pub fn slide_payload_range(&mut self, low: f64, high: f64) -> Result<(), SelectionError> {
        self.apply_payload_range(PayloadRange::clamped(low, high))
    }

    /// Go back to the dataset's payload bounds, limited to the domain the
    /// range control can show.
    pub fn reset_payload_range(&mut self) -> Result<(), SelectionError> {
        let (low, high) = (self.dataset.min_payload(), self.dataset.max_payload());
        self.apply_payload_range(PayloadRange::clamped(low, high))
    }

    fn apply_payload_range(&mut self, range: Result<PayloadRange, SelectionError>) -> Result<(), SelectionError> {
        let range = match range {
            Ok(range) => range,
            Err(e) => return Err(self.reject(e)),
        };
        self.payload_range = range;
        self.status_message = None;
        self.recompute_correlation();
        Ok(())
    }

    fn reject(&mut self, e: SelectionError) -> SelectionError {
        log::warn!("Rejected selection: {e}");
        self.status_message = Some(format!("Error: {e}"));
        e
    }

    fn recompute_outcome(&mut self) {
        // A failure is recorded on the binding and shown next to the chart.
        let _ = self.outcome_chart.recompute(&self.dataset, &self.site);
    }

    fn recompute_correlation(&mut self) {
        let input = CorrelationInput {
            site: self.site.clone(),
            range: self.payload_range,
        };
        let _ = self.correlation_chart.recompute(&self.dataset, &input);
    }

    pub fn dataset(&self) -> &LaunchDataset {
        &self.dataset
    }

    pub fn site(&self) -> &SiteSelection {
        &self.site
    }

    pub fn payload_range(&self) -> PayloadRange {
        self.payload_range
    }

    pub fn outcome_chart(&self) -> &ChartBinding<SiteSelection, PieChart> {
        &self.outcome_chart
    }

    pub fn correlation_chart(&self) -> &ChartBinding<CorrelationInput, ScatterChart> {
        &self.correlation_chart
    }

    /// Number of launches in the published correlation chart.
    pub fn shown_launch_count(&self) -> usize {
        self.correlation_chart.published().map_or(0, ScatterChart::point_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::scenario_dataset;
    use crate::data::model::{LaunchRecord, Outcome};

    fn state() -> AppState {
        AppState::new(Arc::new(scenario_dataset()))
    }

    #[test]
    fn initial_state_renders_both_charts() {
        let state = state();
        assert_eq!(state.site(), &SiteSelection::All);
        assert_eq!(state.payload_range(), PayloadRange::from_dataset(state.dataset()));
        assert_eq!(state.outcome_chart().revision(), 1);
        assert_eq!(state.correlation_chart().revision(), 1);
        assert_eq!(state.correlation_chart().published().unwrap().point_count(), 4);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn site_change_refreshes_both_charts() {
        let mut state = state();
        state.select_site("siteB").unwrap();

        assert_eq!(state.outcome_chart().revision(), 2);
        assert_eq!(state.correlation_chart().revision(), 2);
        assert_eq!(
            state.outcome_chart().published().unwrap().title,
            "Success vs Failure Launches for siteB"
        );
        assert_eq!(state.shown_launch_count(), 2);
    }

    #[test]
    fn payload_change_refreshes_only_correlation_chart() {
        let mut state = state();
        state.select_payload_range(1000.0, 5000.0).unwrap();

        assert_eq!(state.outcome_chart().revision(), 1);
        assert_eq!(state.correlation_chart().revision(), 2);
        let chart = state.correlation_chart().published().unwrap();
        let payloads: Vec<f64> = chart.launches().iter().map(|(_, p)| p.payload_mass_kg).collect();
        assert_eq!(payloads, [1500.0, 3000.0]);
    }

    #[test]
    fn invalid_site_keeps_previous_state() {
        let mut state = state();
        state.select_site("siteA").unwrap();

        let err = state.select_site("siteC").unwrap_err();
        assert_eq!(err, SelectionError::InvalidSelection("siteC".into()));
        assert_eq!(state.site(), &SiteSelection::Site("siteA".into()));
        assert_eq!(state.outcome_chart().revision(), 2);
        assert_eq!(state.dataset().len(), 4);
        assert!(state.status_message.as_deref().unwrap().contains("siteC"));
    }

    #[test]
    fn invalid_range_keeps_previous_chart() {
        let mut state = state();
        let before = state.correlation_chart().published().unwrap().clone();

        assert!(matches!(
            state.select_payload_range(6000.0, 1000.0),
            Err(SelectionError::InvalidRange { .. })
        ));
        assert_eq!(state.correlation_chart().revision(), 1);
        assert_eq!(state.correlation_chart().published(), Some(&before));

        // A later valid change clears the error.
        state.select_payload_range(0.0, 10_000.0).unwrap();
        assert!(state.status_message.is_none());
    }

    #[test]
    fn explicit_initial_selection() {
        let ds = Arc::new(scenario_dataset());
        let range = PayloadRange::new(2000.0, 8000.0).ok();
        let state = AppState::with_selection(ds.clone(), "siteB", range).unwrap();
        assert_eq!(state.shown_launch_count(), 2);

        assert!(AppState::with_selection(ds, "siteZ", None).is_err());
    }

    fn heavy_dataset() -> Arc<LaunchDataset> {
        Arc::new(
            LaunchDataset::from_records(vec![
                LaunchRecord::new("siteA", 500.0, "FT", Outcome::Success),
                LaunchRecord::new("siteB", 4000.0, "B4", Outcome::Failure),
                LaunchRecord::new("siteB", 15_600.0, "B5", Outcome::Success),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn sliders_stay_usable_when_data_exceeds_domain() {
        let mut state = AppState::new(heavy_dataset());
        assert_eq!(state.payload_range().high(), 15_600.0);
        assert_eq!(state.shown_launch_count(), 3);

        // Moving only the low slider carries the out-of-domain high bound along.
        let high = state.payload_range().high();
        state.slide_payload_range(1000.0, high).unwrap();
        assert_eq!(state.payload_range(), PayloadRange::new(1000.0, 10_000.0).unwrap());
        assert_eq!(state.shown_launch_count(), 1);
        assert!(state.status_message.is_none());

        state.reset_payload_range().unwrap();
        assert_eq!(state.payload_range(), PayloadRange::new(500.0, 10_000.0).unwrap());
        assert_eq!(state.correlation_chart().revision(), 3);

        // The strict entry point still refuses out-of-domain bounds.
        assert!(state.select_payload_range(500.0, 15_600.0).is_err());
        assert_eq!(state.correlation_chart().revision(), 3);
    }
}
