use super::model::{LaunchDataset, LaunchRecord};
use crate::error::SelectionError;
use crate::selection::{PayloadRange, SiteSelection};

// ---------------------------------------------------------------------------
// Row filters feeding the payload correlation chart
// ---------------------------------------------------------------------------

/// Launches whose payload mass lies inside `range` (inclusive), in dataset order.
pub fn filter_by_payload<'a>(dataset: &'a LaunchDataset, range: &PayloadRange) -> Vec<&'a LaunchRecord> {
    dataset
        .records()
        .iter()
        .filter(|rec| range.contains(rec.payload_mass_kg))
        .collect()
}

/// Narrow a subset to a single site. `All` keeps every row.
pub fn filter_by_site<'a>(subset: Vec<&'a LaunchRecord>, site: &SiteSelection) -> Vec<&'a LaunchRecord> {
    match site {
        SiteSelection::All => subset,
        SiteSelection::Site(_) => subset.into_iter().filter(|rec| site.matches(&rec.site)).collect(),
    }
}

/// Payload filter followed by the site filter, after checking the site
/// against `dataset`.
pub fn correlation_subset<'a>(
    dataset: &'a LaunchDataset,
    site: &SiteSelection,
    range: &PayloadRange,
) -> Result<Vec<&'a LaunchRecord>, SelectionError> {
    site.validate(dataset)?;
    Ok(filter_by_site(filter_by_payload(dataset, range), site))
}
