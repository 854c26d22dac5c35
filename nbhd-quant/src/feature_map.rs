use std::str::FromStr;

use nbhd_coverage::FeatureTrack;

use crate::errors::{QuantError, Result};

/// Labels starting with this prefix drop it in the replicate-averaged column names.
pub const FEATURE_PREFIX: &str = "feature_";

/// Column label used for the averaged columns of `feature`.
pub fn summary_label(feature: &str) -> &str {
    feature.strip_prefix(FEATURE_PREFIX).unwrap_or(feature)
}

/// One feature and its replicate tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureEntry {
    pub label: String,
    pub tracks: Vec<FeatureTrack>,
}

impl FeatureEntry {
    /// Column prefix for one replicate of this feature: `{label}.{track basename}`.
    pub fn replicate_key(&self, track: &FeatureTrack) -> String {
        replicate_key(&self.label, track)
    }
}

pub(crate) fn replicate_key(feature: &str, track: &FeatureTrack) -> String {
    format!("{}.{}", feature, track.basename())
}

impl FromStr for FeatureEntry {
    type Err = QuantError;

    /// `H3K27ac=rep1.bam,rep2.bam`
    fn from_str(s: &str) -> Result<Self> {
        let (label, tracks) = s
            .split_once('=')
            .ok_or_else(|| QuantError::BadFeatureSpec(s.to_string()))?;
        let label = label.trim();
        if label.is_empty() {
            return Err(QuantError::BadFeatureSpec(s.to_string()));
        }
        let tracks = tracks
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(FeatureTrack::new)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        if tracks.is_empty() {
            return Err(QuantError::EmptyFeature(label.to_string()));
        }
        Ok(FeatureEntry {
            label: label.to_string(),
            tracks,
        })
    }
}

///
/// Ordered mapping from feature label to one or more replicate tracks. Iteration follows
/// insertion order; inserting an existing label appends to its tracks.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureMap {
    entries: Vec<FeatureEntry>,
}

impl FeatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, tracks: Vec<FeatureTrack>) -> Result<()> {
        let label = label.into();
        if tracks.is_empty() {
            return Err(QuantError::EmptyFeature(label));
        }
        match self.entries.iter_mut().find(|e| e.label == label) {
            Some(entry) => entry.tracks.extend(tracks),
            None => self.entries.push(FeatureEntry { label, tracks }),
        }
        Ok(())
    }

    pub fn get(&self, label: &str) -> Option<&FeatureEntry> {
        self.entries.iter().find(|e| e.label == label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeatureEntry> {
        self.entries.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    /// Total number of (feature, track) pairs.
    pub fn track_count(&self) -> usize {
        self.entries.iter().map(|e| e.tracks.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<FeatureEntry> for FeatureMap {
    fn from_iter<T: IntoIterator<Item = FeatureEntry>>(iter: T) -> Self {
        let mut map = FeatureMap::new();
        for entry in iter {
            // entries from FromStr are never empty
            let _ = map.insert(entry.label, entry.tracks);
        }
        map
    }
}

impl<'a> IntoIterator for &'a FeatureMap {
    type Item = &'a FeatureEntry;
    type IntoIter = std::slice::Iter<'a, FeatureEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
