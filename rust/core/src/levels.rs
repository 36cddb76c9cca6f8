// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Level ordering and reference (first floor) selection.

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::types::{Level, LevelId};

/// Levels ordered by elevation, with the level counted as floor 1.
///
/// Built once per run and passed by reference; floor numbers computed from it
/// do not depend on the order in which views are processed.
#[derive(Debug, Clone)]
pub struct LevelIndex {
    ordered: Vec<Level>,
    positions: FxHashMap<LevelId, usize>,
    reference_offset: usize,
}

impl LevelIndex {
    /// Orders `levels` by elevation and picks the reference level.
    ///
    /// The reference is the level at elevation exactly zero. Without one, the
    /// first level in enumeration order whose name ends with
    /// `reference_suffix` is used.
    pub fn resolve(levels: Vec<Level>, reference_suffix: &str) -> Result<Self> {
        let by_suffix = levels
            .iter()
            .find(|level| level.name.ends_with(reference_suffix))
            .map(|level| level.id);

        let mut ordered = levels;
        // Stable: equal elevations keep enumeration order.
        ordered.sort_by(|a, b| a.elevation.total_cmp(&b.elevation));

        let positions: FxHashMap<LevelId, usize> = ordered
            .iter()
            .enumerate()
            .map(|(i, level)| (level.id, i))
            .collect();

        let reference = ordered
            .iter()
            .find(|level| level.elevation == 0.0)
            .map(|level| level.id)
            .or(by_suffix)
            .ok_or_else(|| Error::ReferenceLevelNotFound {
                suffix: reference_suffix.to_string(),
            })?;

        let reference_offset = positions[&reference];

        tracing::info!(
            levels = ordered.len(),
            reference = %ordered[reference_offset].name,
            reference_offset,
            "Resolved level index"
        );

        Ok(Self {
            ordered,
            positions,
            reference_offset,
        })
    }

    /// All levels, ascending by elevation.
    pub fn ordered_levels(&self) -> &[Level] {
        &self.ordered
    }

    /// The level counted as floor 1.
    pub fn reference_level(&self) -> &Level {
        &self.ordered[self.reference_offset]
    }

    /// Position of the reference level in [`LevelIndex::ordered_levels`].
    pub fn reference_offset(&self) -> usize {
        self.reference_offset
    }

    pub fn position(&self, level: LevelId) -> Option<usize> {
        self.positions.get(&level).copied()
    }

    pub fn level(&self, level: LevelId) -> Option<&Level> {
        self.position(level).map(|i| &self.ordered[i])
    }
}
