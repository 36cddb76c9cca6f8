// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Level to floor-number translation.

use crate::levels::LevelIndex;
use crate::types::{Level, LevelId};

/// Translates a level's position in the elevation order into a floor number.
///
/// The reference level is floor 1, the level right below it floor 0, the one
/// below that floor -1, and so on.
#[derive(Debug, Clone, Copy)]
pub struct FloorNumberResolver<'a> {
    index: &'a LevelIndex,
}

impl<'a> FloorNumberResolver<'a> {
    pub fn new(index: &'a LevelIndex) -> Self {
        Self { index }
    }

    /// Floor number of a level, or `None` for a level outside the index.
    pub fn floor_index(&self, level: LevelId) -> Option<i64> {
        self.index
            .position(level)
            .map(|i| i as i64 - self.index.reference_offset() as i64 + 1)
    }

    /// Floor number as text. Levels missing from the index fall back to their
    /// display name.
    pub fn resolve(&self, level: &Level) -> String {
        match self.floor_index(level.id) {
            Some(floor) => floor.to_string(),
            None => {
                tracing::warn!(level = %level.name, "Level missing from index, using its name");
                level.name.clone()
            }
        }
    }
}
