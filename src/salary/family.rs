//! Job families and the band edits applied to them.
//!
//! Every operation returns a new family. After an edit the family is synced
//! from its leading band, so auto bands always reflect the latest anchors.

use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use super::SalaryError;
use super::bands::{DEFAULT_MIDPOINT, DEFAULT_SPREAD, SalaryBand, next_midpoint};
use super::sync::perform_sync;

/// A named set of salary bands.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobFamily {
    pub id: String,
    pub name: String,
    pub salary_bands: Vec<SalaryBand>,
}

/// Partial update of a band. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BandEdit {
    pub name: Option<String>,
    pub midpoint: Option<f64>,
    pub spread: Option<f64>,
    pub is_auto_calculated: Option<bool>,
    pub is_leading: Option<bool>,
}

impl BandEdit {
    fn apply(&self, band: &SalaryBand) -> SalaryBand {
        let mut next = band.clone();
        if let Some(name) = &self.name {
            next.name = name.clone();
        }
        if let Some(midpoint) = self.midpoint {
            next.midpoint = midpoint;
        }
        if let Some(spread) = self.spread {
            next.spread = spread;
        }
        if let Some(auto) = self.is_auto_calculated {
            next.is_auto_calculated = auto;
        }
        if let Some(leading) = self.is_leading {
            next.is_leading = leading;
        }
        next
    }
}

impl JobFamily {
    /// An empty family.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            salary_bands: Vec::new(),
        }
    }

    pub fn band(&self, id: &str) -> Option<&SalaryBand> {
        self.salary_bands.iter().find(|b| b.id == id)
    }

    /// Bands without a parent, in band order.
    pub fn top_level_bands(&self) -> impl Iterator<Item = &SalaryBand> {
        self.salary_bands.iter().filter(|b| b.parent_id.is_none())
    }

    /// The leading manual band, if any.
    pub fn leader(&self) -> Option<&SalaryBand> {
        self.salary_bands
            .iter()
            .find(|b| b.is_leading && !b.is_auto_calculated)
    }

    fn with_bands(&self, salary_bands: Vec<SalaryBand>) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            salary_bands,
        }
    }

    fn require(&self, id: &str) -> Result<&SalaryBand, SalaryError> {
        self.band(id)
            .ok_or_else(|| SalaryError::UnknownBand(id.to_string()))
    }

    // =========================================================================
    // Band Operations
    // =========================================================================

    /// Edit a band and re-sync.
    ///
    /// A manual band that is edited becomes the leader. Editing an auto band
    /// re-syncs from the current leader, or from the first manual band.
    pub fn update_band(&self, id: &str, edit: &BandEdit) -> Result<Self, SalaryError> {
        self.require(id)?;
        let mut bands: Vec<SalaryBand> = self
            .salary_bands
            .iter()
            .map(|b| if b.id == id { edit.apply(b) } else { b.clone() })
            .collect();

        let Some(updated) = bands.iter().find(|b| b.id == id) else {
            return Err(SalaryError::UnknownBand(id.to_string()));
        };

        let leader_id = if !updated.is_auto_calculated {
            let leader = updated.id.clone();
            for band in &mut bands {
                band.is_leading = band.id == leader;
            }
            Some(leader)
        } else {
            bands
                .iter()
                .find(|b| b.is_leading && !b.is_auto_calculated)
                .or_else(|| bands.iter().find(|b| !b.is_auto_calculated))
                .map(|b| b.id.clone())
        };

        if let Some(leader) = leader_id {
            debug!("salary: syncing family {} from {leader}", self.id);
            bands = perform_sync(&bands, &leader);
        }
        Ok(self.with_bands(bands))
    }

    /// Flip a band between manual and auto-calculated.
    pub fn toggle_auto(&self, id: &str) -> Result<Self, SalaryError> {
        let band = self.require(id)?;
        let edit = BandEdit {
            is_auto_calculated: Some(!band.is_auto_calculated),
            is_leading: Some(false),
            ..Default::default()
        };
        self.update_band(id, &edit)
    }

    /// Make a manual band the leader and re-sync from it.
    pub fn set_leading(&self, id: &str) -> Result<Self, SalaryError> {
        if self.require(id)?.is_auto_calculated {
            return Err(SalaryError::AutoBandCannotLead(id.to_string()));
        }
        let bands: Vec<SalaryBand> = self
            .salary_bands
            .iter()
            .map(|b| SalaryBand {
                is_leading: b.id == id,
                ..b.clone()
            })
            .collect();
        Ok(self.with_bands(perform_sync(&bands, id)))
    }

    /// Add a band.
    ///
    /// Under a parent the band is auto-calculated one level above it.
    /// Top-level bands start manual at the default midpoint and spread. The
    /// first band of a family leads.
    pub fn add_band(
        &self,
        id: &str,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<Self, SalaryError> {
        if self.band(id).is_some() {
            return Err(SalaryError::DuplicateBand(id.to_string()));
        }

        let mut band = SalaryBand::manual(id, name, DEFAULT_MIDPOINT, DEFAULT_SPREAD);
        if let Some(parent_id) = parent_id {
            band.parent_id = Some(parent_id.to_string());
            if let Some(parent) = self.band(parent_id) {
                band.midpoint = next_midpoint(parent.midpoint, parent.spread);
                band.spread = parent.spread;
                band.is_auto_calculated = true;
            }
        }
        band.is_leading = self.salary_bands.is_empty();

        let mut bands = self.salary_bands.clone();
        bands.push(band);

        let leader = bands
            .iter()
            .find(|b| b.is_leading)
            .or_else(|| bands.first())
            .map(|b| b.id.clone());
        if let Some(leader) = leader {
            bands = perform_sync(&bands, &leader);
        }
        Ok(self.with_bands(bands))
    }

    /// Remove a band and every band above it in the progression.
    ///
    /// If the leader is removed, the first remaining manual band (or the first
    /// band) takes over.
    pub fn remove_band(&self, id: &str) -> Result<Self, SalaryError> {
        self.require(id)?;

        let mut doomed: HashSet<&str> = HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !doomed.insert(current) {
                continue;
            }
            for band in &self.salary_bands {
                if band.parent_id.as_deref() == Some(current) {
                    stack.push(band.id.as_str());
                }
            }
        }

        let mut bands: Vec<SalaryBand> = self
            .salary_bands
            .iter()
            .filter(|b| !doomed.contains(b.id.as_str()))
            .cloned()
            .collect();

        if !bands.is_empty() && !bands.iter().any(|b| b.is_leading) {
            let leader = bands
                .iter()
                .find(|b| !b.is_auto_calculated)
                .or_else(|| bands.first())
                .map(|b| b.id.clone());
            if let Some(leader) = leader {
                for band in &mut bands {
                    band.is_leading = band.id == leader;
                }
            }
        }

        debug!("salary: removed {} band(s) from family {}", doomed.len(), self.id);
        Ok(self.with_bands(bands))
    }
}

// =============================================================================
// Family Collections
// =============================================================================

/// Find a family by id.
pub fn find_family<'a>(families: &'a [JobFamily], id: &str) -> Option<&'a JobFamily> {
    families.iter().find(|f| f.id == id)
}

/// Append a new empty family.
pub fn add_family(families: &[JobFamily], id: &str, name: &str) -> Result<Vec<JobFamily>, SalaryError> {
    if find_family(families, id).is_some() {
        return Err(SalaryError::DuplicateFamily(id.to_string()));
    }
    let mut next = families.to_vec();
    next.push(JobFamily::new(id, name));
    Ok(next)
}

/// Remove a family by id.
pub fn remove_family(families: &[JobFamily], id: &str) -> Result<Vec<JobFamily>, SalaryError> {
    if find_family(families, id).is_none() {
        return Err(SalaryError::UnknownFamily(id.to_string()));
    }
    Ok(families.iter().filter(|f| f.id != id).cloned().collect())
}

/// Replace the family with the same id.
pub fn replace_family(families: &[JobFamily], family: JobFamily) -> Result<Vec<JobFamily>, SalaryError> {
    if find_family(families, &family.id).is_none() {
        return Err(SalaryError::UnknownFamily(family.id));
    }
    Ok(families
        .iter()
        .map(|f| if f.id == family.id { family.clone() } else { f.clone() })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::salary::bands::previous_midpoint;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    /// junior (manual, leading) <- mid (auto) <- senior (auto)
    fn ladder() -> JobFamily {
        JobFamily::new("eng", "Engineering")
            .add_band("junior", "Junior", None)
            .and_then(|f| f.add_band("mid", "Mid", Some("junior")))
            .and_then(|f| f.add_band("senior", "Senior", Some("mid")))
            .unwrap()
    }

    #[test]
    fn test_add_band_defaults() {
        let family = ladder();
        let junior = family.band("junior").unwrap();
        assert_eq!(junior.midpoint, DEFAULT_MIDPOINT);
        assert_eq!(junior.spread, DEFAULT_SPREAD);
        assert!(junior.is_leading);
        assert!(!junior.is_auto_calculated);

        let mid = family.band("mid").unwrap();
        assert!(mid.is_auto_calculated);
        assert!(!mid.is_leading);
        assert!(close(mid.midpoint, next_midpoint(DEFAULT_MIDPOINT, DEFAULT_SPREAD)));
        assert_eq!(family.top_level_bands().count(), 1);
    }

    #[test]
    fn test_add_band_rejects_duplicates() {
        assert_eq!(
            ladder().add_band("mid", "Again", None),
            Err(SalaryError::DuplicateBand("mid".into()))
        );
    }

    #[test]
    fn test_manual_edit_takes_the_lead() {
        let family = ladder().toggle_auto("senior").unwrap();
        assert_eq!(family.leader().map(|b| b.id.as_str()), Some("senior"));

        let edit = BandEdit {
            midpoint: Some(100_000.0),
            ..Default::default()
        };
        let family = family.update_band("senior", &edit).unwrap();
        let senior = family.band("senior").unwrap();
        assert!(senior.is_leading);
        assert!(!family.band("junior").unwrap().is_leading);
        assert!(close(
            family.band("mid").unwrap().midpoint,
            previous_midpoint(100_000.0, DEFAULT_SPREAD)
        ));
    }

    #[test]
    fn test_editing_auto_band_resyncs_from_leader() {
        let edit = BandEdit {
            midpoint: Some(1.0),
            ..Default::default()
        };
        let family = ladder().update_band("mid", &edit).unwrap();
        assert!(close(
            family.band("mid").unwrap().midpoint,
            next_midpoint(DEFAULT_MIDPOINT, DEFAULT_SPREAD)
        ));
    }

    #[test]
    fn test_toggle_auto_clears_leading() {
        let family = ladder().toggle_auto("junior").unwrap();
        let junior = family.band("junior").unwrap();
        assert!(junior.is_auto_calculated);
        assert!(!junior.is_leading);
        assert!(family.leader().is_none());
    }

    #[test]
    fn test_set_leading() {
        let family = ladder().toggle_auto("senior").unwrap();
        let family = family.set_leading("junior").unwrap();
        assert_eq!(family.leader().map(|b| b.id.as_str()), Some("junior"));
        assert_eq!(
            family.set_leading("mid"),
            Err(SalaryError::AutoBandCannotLead("mid".into()))
        );
    }

    #[test]
    fn test_remove_band_cascades_and_reelects() {
        let family = ladder().add_band("lead", "Lead", None).unwrap();
        let family = family.remove_band("junior").unwrap();
        let ids: Vec<&str> = family.salary_bands.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["lead"]);
        assert!(family.band("lead").unwrap().is_leading);
        assert!(matches!(family.remove_band("ghost"), Err(SalaryError::UnknownBand(_))));
    }

    #[test]
    fn test_family_collection() {
        let families = add_family(&[], "eng", "Engineering").unwrap();
        let families = add_family(&families, "design", "Design").unwrap();
        assert!(add_family(&families, "eng", "Again").is_err());
        assert_eq!(find_family(&families, "design").map(|f| f.name.as_str()), Some("Design"));

        let updated = replace_family(&families, ladder()).unwrap();
        assert_eq!(find_family(&updated, "eng").unwrap().salary_bands.len(), 3);

        let families = remove_family(&updated, "eng").unwrap();
        assert_eq!(families.len(), 1);
        assert!(remove_family(&families, "eng").is_err());
    }
}
