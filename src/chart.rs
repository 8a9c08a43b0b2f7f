//! Chart specifications handed to the display surface.
//!
//! Builders here only reshape aggregation output; drawing happens in
//! [`crate::ui::plot`]. Both specs serialize to JSON for headless use.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::aggregate::{aggregate_outcomes, OutcomeBreakdown};
use crate::data::filter::correlation_subset;
use crate::data::model::{LaunchDataset, LaunchRecord, Outcome};
use crate::error::SelectionError;
use crate::selection::{PayloadRange, SiteSelection};

/// Fraction of the pie radius left empty in the middle.
pub const PIE_HOLE: f32 = 0.3;

pub const PAYLOAD_AXIS_LABEL: &str = "Payload Mass (kg)";
pub const OUTCOME_AXIS_LABEL: &str = "Launch Outcome (1=Success, 0=Failure)";

// ---------------------------------------------------------------------------
// Outcome (donut) chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub legend_title: Option<String>,
    pub hole: f32,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn total(&self) -> usize {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Share of slice `i` in `[0, 1]`; zero when the chart is empty.
    pub fn share(&self, i: usize) -> f64 {
        let total = self.total();
        match self.slices.get(i) {
            Some(slice) if total > 0 => slice.value as f64 / total as f64,
            _ => 0.0,
        }
    }
}

/// Translate an outcome breakdown into a donut chart.
pub fn outcome_pie(breakdown: &OutcomeBreakdown) -> PieChart {
    match breakdown {
        OutcomeBreakdown::SuccessBySite { counts } => PieChart {
            title: "Total Success Launches by Site".to_string(),
            legend_title: None,
            hole: PIE_HOLE,
            slices: counts
                .iter()
                .map(|(site, &value)| PieSlice {
                    label: site.clone(),
                    value,
                })
                .collect(),
        },
        OutcomeBreakdown::SiteOutcomes {
            site,
            success,
            failure,
        } => PieChart {
            title: format!("Success vs Failure Launches for {site}"),
            legend_title: Some("Outcome".to_string()),
            hole: PIE_HOLE,
            slices: vec![
                PieSlice {
                    label: Outcome::Success.to_string(),
                    value: *success,
                },
                PieSlice {
                    label: Outcome::Failure.to_string(),
                    value: *failure,
                },
            ],
        },
    }
}

/// Aggregate and build the outcome chart in one step.
pub fn build_outcome_chart(
    dataset: &LaunchDataset,
    site: &SiteSelection,
) -> Result<PieChart, SelectionError> {
    let breakdown = aggregate_outcomes(dataset, site)?;
    log::debug!("outcome breakdown for {site}: {} launches counted", breakdown.total());
    Ok(outcome_pie(&breakdown))
}

// ---------------------------------------------------------------------------
// Payload correlation (scatter) chart
// ---------------------------------------------------------------------------

/// One scatter point: payload on x, outcome class on y.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub class: u8,
    pub site: String,
    pub flight_number: Option<u32>,
    pub booster_version: Option<String>,
}

impl From<&LaunchRecord> for ScatterPoint {
    fn from(rec: &LaunchRecord) -> Self {
        Self {
            payload_mass_kg: rec.payload_mass_kg,
            class: rec.outcome.class(),
            site: rec.site.clone(),
            flight_number: rec.flight_number,
            booster_version: rec.booster_version.clone(),
        }
    }
}

/// Points sharing a booster category (one colour in the chart).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub booster_category: String,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ScatterSeries>,
}

impl ScatterChart {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// Every point with its booster category, ordered by flight number and
    /// then payload. Feeds the launch table under the chart.
    pub fn launches(&self) -> Vec<(&str, &ScatterPoint)> {
        let mut rows: Vec<(&str, &ScatterPoint)> = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(move |p| (s.booster_category.as_str(), p)))
            .collect();
        rows.sort_by(|a, b| {
            a.1.flight_number
                .cmp(&b.1.flight_number)
                .then(a.1.payload_mass_kg.total_cmp(&b.1.payload_mass_kg))
        });
        rows
    }
}

/// Group a filtered subset by booster category. Series are sorted by
/// category; points keep dataset order.
pub fn payload_scatter(subset: &[&LaunchRecord], site: &SiteSelection) -> ScatterChart {
    let mut by_category: BTreeMap<&str, Vec<ScatterPoint>> = BTreeMap::new();
    for &rec in subset {
        by_category
            .entry(rec.booster_category.as_str())
            .or_default()
            .push(ScatterPoint::from(rec));
    }

    let title = match site {
        SiteSelection::All => "Payload vs. Launch Outcome for All Sites".to_string(),
        SiteSelection::Site(name) => format!("Payload vs. Launch Outcome for {name}"),
    };

    ScatterChart {
        title,
        x_label: PAYLOAD_AXIS_LABEL.to_string(),
        y_label: OUTCOME_AXIS_LABEL.to_string(),
        series: by_category
            .into_iter()
            .map(|(category, points)| ScatterSeries {
                booster_category: category.to_string(),
                points,
            })
            .collect(),
    }
}

/// Filter and build the correlation chart in one step.
pub fn build_correlation_chart(
    dataset: &LaunchDataset,
    site: &SiteSelection,
    range: &PayloadRange,
) -> Result<ScatterChart, SelectionError> {
    correlation_subset(dataset, site, range).map(|subset| payload_scatter(&subset, site))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::scenario_dataset;

    #[test]
    fn all_sites_pie_has_one_slice_per_successful_site() {
        let ds = scenario_dataset();
        let chart = build_outcome_chart(&ds, &SiteSelection::All).unwrap();

        assert_eq!(chart.title, "Total Success Launches by Site");
        assert_eq!(chart.legend_title, None);
        let slices: Vec<(&str, usize)> =
            chart.slices.iter().map(|s| (s.label.as_str(), s.value)).collect();
        assert_eq!(slices, [("siteA", 1), ("siteB", 2)]);
        assert!((chart.share(1) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn site_pie_lists_success_and_failure() {
        let ds = scenario_dataset();
        let chart = build_outcome_chart(&ds, &SiteSelection::Site("siteB".into())).unwrap();

        assert_eq!(chart.title, "Success vs Failure Launches for siteB");
        assert_eq!(chart.legend_title.as_deref(), Some("Outcome"));
        assert_eq!(chart.slices[0], PieSlice { label: "Success".into(), value: 2 });
        assert_eq!(chart.slices[1], PieSlice { label: "Failure".into(), value: 0 });
        assert_eq!(chart.share(0), 1.0);
    }

    #[test]
    fn empty_pie_has_zero_shares() {
        let chart = PieChart {
            title: String::new(),
            legend_title: None,
            hole: PIE_HOLE,
            slices: Vec::new(),
        };
        assert_eq!(chart.share(0), 0.0);
    }

    #[test]
    fn scatter_groups_by_booster_category() {
        let ds = scenario_dataset();
        let range = PayloadRange::new(1000.0, 5000.0).unwrap();
        let chart = build_correlation_chart(&ds, &SiteSelection::All, &range).unwrap();

        assert_eq!(chart.title, "Payload vs. Launch Outcome for All Sites");
        assert_eq!(chart.y_label, OUTCOME_AXIS_LABEL);
        assert_eq!(chart.point_count(), 2);
        let categories: Vec<&str> = chart.series.iter().map(|s| s.booster_category.as_str()).collect();
        assert_eq!(categories, ["FT", "v1.1"]);
        assert_eq!(chart.series[1].points[0].payload_mass_kg, 1500.0);
        assert_eq!(chart.series[1].points[0].class, 0);
    }

    #[test]
    fn scatter_title_names_the_site() {
        let ds = scenario_dataset();
        let range = PayloadRange::from_dataset(&ds);
        let chart = build_correlation_chart(&ds, &SiteSelection::Site("siteA".into()), &range).unwrap();
        assert_eq!(chart.title, "Payload vs. Launch Outcome for siteA");
        assert_eq!(chart.point_count(), 2);
    }

    #[test]
    fn launch_rows_come_from_published_points() {
        let mut early = LaunchRecord::new("siteA", 6000.0, "v1.0", Outcome::Success);
        early.flight_number = Some(3);
        let mut late = LaunchRecord::new("siteA", 200.0, "FT", Outcome::Failure);
        late.flight_number = Some(40);
        let ds = LaunchDataset::from_records(vec![late, early]).unwrap();

        let range = PayloadRange::new(0.0, 10_000.0).unwrap();
        let chart = build_correlation_chart(&ds, &SiteSelection::All, &range).unwrap();
        let rows: Vec<(&str, Option<u32>)> = chart
            .launches()
            .into_iter()
            .map(|(category, p)| (category, p.flight_number))
            .collect();
        assert_eq!(rows, [("v1.0", Some(3)), ("FT", Some(40))]);
        assert_eq!(rows.len(), chart.point_count());
    }

    #[test]
    fn charts_serialize_to_json() {
        let ds = scenario_dataset();
        let pie = build_outcome_chart(&ds, &SiteSelection::All).unwrap();
        let json = serde_json::to_value(&pie).unwrap();
        assert_eq!(json["slices"][1]["label"], "siteB");
        assert_eq!(json["slices"][1]["value"], 2);
    }
}
