use std::collections::BTreeMap;

use serde::Serialize;

use super::model::LaunchDataset;
use crate::error::SelectionError;
use crate::selection::SiteSelection;

/// Grouped outcome counts feeding the outcome chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OutcomeBreakdown {
    /// Successful launches per site. Sites without a single success do not
    /// appear, since only success rows are grouped.
    SuccessBySite { counts: BTreeMap<String, usize> },
    /// Success and failure counts within one site. Both are always present.
    SiteOutcomes {
        site: String,
        success: usize,
        failure: usize,
    },
}

impl OutcomeBreakdown {
    /// Sum of every count in the breakdown.
    pub fn total(&self) -> usize {
        match self {
            OutcomeBreakdown::SuccessBySite { counts } => counts.values().sum(),
            OutcomeBreakdown::SiteOutcomes { success, failure, .. } => success + failure,
        }
    }
}

/// Group launch outcomes for the current site selection.
///
/// * `All` – count successful launches per site.
/// * a site – count successes and failures at that site.
pub fn aggregate_outcomes(
    dataset: &LaunchDataset,
    site: &SiteSelection,
) -> Result<OutcomeBreakdown, SelectionError> {
    site.validate(dataset)?;

    let breakdown = match site {
        SiteSelection::All => {
            let mut counts: BTreeMap<String, usize> = BTreeMap::new();
            for rec in dataset.records().iter().filter(|r| r.outcome.is_success()) {
                *counts.entry(rec.site.clone()).or_default() += 1;
            }
            OutcomeBreakdown::SuccessBySite { counts }
        }
        SiteSelection::Site(name) => {
            let (success, failure) = dataset
                .records()
                .iter()
                .filter(|r| &r.site == name)
                .fold((0, 0), |(s, f), r| {
                    if r.outcome.is_success() {
                        (s + 1, f)
                    } else {
                        (s, f + 1)
                    }
                });
            OutcomeBreakdown::SiteOutcomes {
                site: name.clone(),
                success,
                failure,
            }
        }
    };

    Ok(breakdown)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::data::fixtures::{arb_dataset, scenario_dataset};
    use crate::data::model::{LaunchRecord, Outcome};

    #[test]
    fn all_sites_scenario() {
        let ds = scenario_dataset();
        let counts = BTreeMap::from([("siteA".to_string(), 1), ("siteB".to_string(), 2)]);
        assert_eq!(
            aggregate_outcomes(&ds, &SiteSelection::All),
            Ok(OutcomeBreakdown::SuccessBySite { counts })
        );
    }

    #[test]
    fn single_site_keeps_zero_failures() {
        let ds = scenario_dataset();
        assert_eq!(
            aggregate_outcomes(&ds, &SiteSelection::Site("siteB".into())),
            Ok(OutcomeBreakdown::SiteOutcomes {
                site: "siteB".into(),
                success: 2,
                failure: 0,
            })
        );
    }

    #[test]
    fn zero_success_site_is_omitted_in_all_mode() {
        let ds = LaunchDataset::from_records(vec![
            LaunchRecord::new("siteA", 500.0, "FT", Outcome::Success),
            LaunchRecord::new("siteD", 800.0, "FT", Outcome::Failure),
        ])
        .unwrap();

        match aggregate_outcomes(&ds, &SiteSelection::All).unwrap() {
            OutcomeBreakdown::SuccessBySite { counts } => {
                assert_eq!(counts.len(), 1);
                assert!(!counts.contains_key("siteD"));
            }
            other => panic!("unexpected breakdown {other:?}"),
        }
    }

    #[test]
    fn unknown_site_is_rejected() {
        let ds = scenario_dataset();
        assert_eq!(
            aggregate_outcomes(&ds, &SiteSelection::Site("siteC".into())),
            Err(SelectionError::InvalidSelection("siteC".into()))
        );
        assert_eq!(ds.len(), 4);
    }

    proptest! {
        #[test]
        fn all_mode_counts_every_success(ds in arb_dataset()) {
            let total_success = ds.records().iter().filter(|r| r.outcome.is_success()).count();
            let breakdown = aggregate_outcomes(&ds, &SiteSelection::All).unwrap();
            prop_assert_eq!(breakdown.total(), total_success);
        }

        #[test]
        fn site_mode_partitions_the_site(ds in arb_dataset()) {
            for site in ds.sites() {
                let selection = SiteSelection::Site(site.clone());
                let site_total = ds.records().iter().filter(|r| &r.site == site).count();
                let breakdown = aggregate_outcomes(&ds, &selection).unwrap();
                prop_assert_eq!(breakdown.total(), site_total);
            }
        }

        #[test]
        fn aggregation_is_idempotent(ds in arb_dataset()) {
            for selection in crate::selection::site_options(&ds) {
                prop_assert_eq!(
                    aggregate_outcomes(&ds, &selection),
                    aggregate_outcomes(&ds, &selection)
                );
            }
        }
    }
}
