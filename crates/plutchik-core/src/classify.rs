use std::collections::BTreeSet;
use tracing::debug;

use crate::error::FlowerError;
use crate::registry::{lookup, CategorySpec, ScoreKind};
use crate::score::{ScoreEntry, ScoreMap};

/// A validated score map together with the family all of its keys belong to.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub kind: ScoreKind,
    /// Keyed by canonical (lowercase) category names.
    pub scores: ScoreMap,
}

impl Classified {
    pub fn get(&self, spec: &CategorySpec) -> Option<&ScoreEntry> {
        self.scores.get(spec.name)
    }

    /// Scored categories of the active kind, in slot order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static CategorySpec, &ScoreEntry)> + '_ {
        self.kind
            .categories()
            .iter()
            .filter_map(move |spec| self.get(spec).map(|entry| (spec, entry)))
    }

    /// Largest cumulative score, handy as a normalization ceiling.
    pub fn max_total(&self) -> f64 {
        self.scores.values().map(ScoreEntry::total).fold(0.0, f64::max)
    }
}

/// Decides which family a score map belongs to and validates every entry.
///
/// Keys are matched case-insensitively. Checks run in order: empty map,
/// unknown key, mixed families, duplicate after case folding, then score
/// bounds.
pub fn classify(scores: &ScoreMap) -> Result<Classified, FlowerError> {
    if scores.is_empty() {
        debug!("rejecting empty score map");
        return Err(FlowerError::EmptyScoreMap);
    }

    let mut resolved = Vec::with_capacity(scores.len());
    for (key, entry) in scores {
        let canonical = key.trim().to_lowercase();
        let spec = lookup(&canonical).map_err(|_| {
            debug!(key = %key, "rejecting unknown category");
            FlowerError::UnknownCategory(key.clone())
        })?;
        resolved.push((key, spec, *entry));
    }

    let kinds: BTreeSet<ScoreKind> = resolved.iter().map(|(_, spec, _)| spec.kind).collect();
    // `ScoreKind`'s ordering is the classification priority.
    let kind = *kinds.iter().next().ok_or(FlowerError::EmptyScoreMap)?;
    if let Some((key, spec, _)) = resolved.iter().find(|(_, spec, _)| spec.kind != kind) {
        debug!(expected = %kind, found = %spec.kind, "rejecting mixed score map");
        return Err(FlowerError::MixedCategoryKinds {
            category: (*key).clone(),
            expected: kind,
            found: spec.kind,
        });
    }

    let mut canonical = ScoreMap::new();
    for (_, spec, entry) in resolved {
        if canonical.insert(spec.name.to_string(), entry).is_some() {
            debug!(category = %spec.name, "rejecting duplicate category");
            return Err(FlowerError::DuplicateCategory(spec.name.to_string()));
        }
    }

    for (name, entry) in &canonical {
        entry.validate().map_err(|reason| {
            debug!(category = %name, %reason, "rejecting score");
            FlowerError::invalid_score(name.as_str(), reason)
        })?;
    }

    debug!(kind = %kind, categories = canonical.len(), "classified score map");
    Ok(Classified {
        kind,
        scores: canonical,
    })
}
