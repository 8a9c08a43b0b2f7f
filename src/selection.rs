use std::fmt;

use serde::Serialize;

use crate::data::model::LaunchDataset;
use crate::error::SelectionError;

/// Selector value meaning "every site".
pub const ALL_SITES: &str = "ALL";

/// Fixed domain of the payload range control, independent of the data.
pub const PAYLOAD_DOMAIN: (f64, f64) = (0.0, 10_000.0);

/// Step and mark spacing of the payload range control.
pub const PAYLOAD_STEP: f64 = 1_000.0;

// ---------------------------------------------------------------------------
// Site selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    /// Parse a selector value against the sites present in `dataset`.
    ///
    /// Unknown sites are rejected, never replaced with `All`.
    pub fn parse(value: &str, dataset: &LaunchDataset) -> Result<Self, SelectionError> {
        if value == ALL_SITES {
            return Ok(SiteSelection::All);
        }
        let selection = SiteSelection::Site(value.to_string());
        selection.validate(dataset)?;
        Ok(selection)
    }

    /// Check that a specific site exists in `dataset`.
    pub fn validate(&self, dataset: &LaunchDataset) -> Result<(), SelectionError> {
        match self {
            SiteSelection::Site(site) if !dataset.has_site(site) => {
                Err(SelectionError::InvalidSelection(site.clone()))
            }
            _ => Ok(()),
        }
    }

    /// The raw selector value (`ALL` or the site name).
    pub fn value(&self) -> &str {
        match self {
            SiteSelection::All => ALL_SITES,
            SiteSelection::Site(site) => site,
        }
    }

    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(selected) => selected == site,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteSelection::All => write!(f, "All Sites"),
            SiteSelection::Site(site) => write!(f, "{site}"),
        }
    }
}

/// Options offered by the site selector: `All Sites` first, then every
/// site in order of first appearance.
pub fn site_options(dataset: &LaunchDataset) -> Vec<SiteSelection> {
    std::iter::once(SiteSelection::All)
        .chain(dataset.sites().iter().cloned().map(SiteSelection::Site))
        .collect()
}

// ---------------------------------------------------------------------------
// Payload range
// ---------------------------------------------------------------------------

/// Inclusive payload mass range in kg. Always `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayloadRange {
    low: f64,
    high: f64,
}

impl PayloadRange {
    /// Validate a range coming from the range control or another caller.
    ///
    /// Bounds must be finite, ordered and inside [`PAYLOAD_DOMAIN`].
    pub fn new(low: f64, high: f64) -> Result<Self, SelectionError> {
        let reject = |reason| SelectionError::InvalidRange { low, high, reason };

        if !low.is_finite() || !high.is_finite() {
            return Err(reject("bounds must be numeric"));
        }
        if low > high {
            return Err(reject("low bound exceeds high bound"));
        }
        let (min, max) = PAYLOAD_DOMAIN;
        if low < min || high > max {
            return Err(reject("bounds outside the 0..=10000 kg domain"));
        }
        Ok(Self { low, high })
    }

    /// Like [`PayloadRange::new`], but first pulls finite bounds into
    /// [`PAYLOAD_DOMAIN`], the way the range control itself clamps.
    ///
    /// Used for values coming from the slider and reset paths, whose start
    /// value may be a data-derived range wider than the domain.
    pub fn clamped(low: f64, high: f64) -> Result<Self, SelectionError> {
        if !low.is_finite() || !high.is_finite() {
            return Self::new(low, high);
        }
        let (min, max) = PAYLOAD_DOMAIN;
        Self::new(low.clamp(min, max), high.clamp(min, max))
    }

    /// Parse a `low,high` pair of text bounds.
    pub fn parse(text: &str) -> Result<Self, SelectionError> {
        let reject = SelectionError::InvalidRange {
            low: f64::NAN,
            high: f64::NAN,
            reason: "expected two numeric bounds as LOW,HIGH",
        };
        let (low, high) = text.split_once(',').ok_or_else(|| reject.clone())?;
        let low = low.trim().parse::<f64>().map_err(|_| reject.clone())?;
        let high = high.trim().parse::<f64>().map_err(|_| reject)?;
        Self::new(low, high)
    }

    /// The data-derived default: the dataset's true payload bounds.
    ///
    /// This may lie strictly inside [`PAYLOAD_DOMAIN`], and is not clamped
    /// to it either.
    pub fn from_dataset(dataset: &LaunchDataset) -> Self {
        Self {
            low: dataset.min_payload(),
            high: dataset.max_payload(),
        }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn contains(&self, payload_mass_kg: f64) -> bool {
        self.low <= payload_mass_kg && payload_mass_kg <= self.high
    }
}

impl fmt::Display for PayloadRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={} kg", self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::scenario_dataset;

    #[test]
    fn parse_accepts_sentinel_and_known_sites() {
        let ds = scenario_dataset();
        assert_eq!(SiteSelection::parse("ALL", &ds), Ok(SiteSelection::All));
        assert_eq!(
            SiteSelection::parse("siteB", &ds),
            Ok(SiteSelection::Site("siteB".into()))
        );
    }

    #[test]
    fn unknown_site_is_rejected_not_substituted() {
        let ds = scenario_dataset();
        assert_eq!(
            SiteSelection::parse("siteC", &ds),
            Err(SelectionError::InvalidSelection("siteC".into()))
        );
        // The sentinel is case sensitive.
        assert!(SiteSelection::parse("all", &ds).is_err());
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn options_start_with_all_sites() {
        let ds = scenario_dataset();
        let labels: Vec<String> = site_options(&ds).iter().map(|s| s.to_string()).collect();
        assert_eq!(labels, ["All Sites", "siteA", "siteB"]);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = PayloadRange::new(6000.0, 1000.0).unwrap_err();
        assert!(matches!(
            err,
            SelectionError::InvalidRange { low, high, .. } if low == 6000.0 && high == 1000.0
        ));
    }

    #[test]
    fn non_numeric_and_out_of_domain_ranges_are_rejected() {
        assert!(PayloadRange::new(f64::NAN, 1000.0).is_err());
        assert!(PayloadRange::new(0.0, f64::INFINITY).is_err());
        assert!(PayloadRange::new(-1.0, 1000.0).is_err());
        assert!(PayloadRange::new(0.0, 10_001.0).is_err());
        assert!(PayloadRange::parse("heavy,1000").is_err());
        assert!(PayloadRange::parse("1000").is_err());
    }

    #[test]
    fn parse_text_bounds() {
        let range = PayloadRange::parse(" 1000, 5000 ").unwrap();
        assert_eq!((range.low(), range.high()), (1000.0, 5000.0));
        assert!(matches!(
            PayloadRange::parse("6000,1000"),
            Err(SelectionError::InvalidRange { .. })
        ));
    }

    #[test]
    fn default_range_is_data_derived() {
        let ds = scenario_dataset();
        let range = PayloadRange::from_dataset(&ds);
        assert_eq!((range.low(), range.high()), (500.0, 7000.0));
        assert!(range.low() > PAYLOAD_DOMAIN.0);
        assert!(range.high() < PAYLOAD_DOMAIN.1);
    }

    #[test]
    fn clamped_range_pulls_bounds_into_domain() {
        let range = PayloadRange::clamped(500.0, 15_600.0).unwrap();
        assert_eq!((range.low(), range.high()), (500.0, 10_000.0));

        let range = PayloadRange::clamped(-20.0, 12_000.0).unwrap();
        assert_eq!((range.low(), range.high()), (0.0, 10_000.0));

        // Clamping never hides a non-numeric or inverted pair.
        assert!(PayloadRange::clamped(f64::NAN, 1000.0).is_err());
        assert!(PayloadRange::clamped(0.0, f64::INFINITY).is_err());
        assert!(PayloadRange::clamped(6000.0, 1000.0).is_err());
    }

    #[test]
    fn range_is_inclusive() {
        let range = PayloadRange::new(1000.0, 5000.0).unwrap();
        assert!(range.contains(1000.0));
        assert!(range.contains(5000.0));
        assert!(!range.contains(999.9));
        assert!(!range.contains(5000.1));
    }
}
