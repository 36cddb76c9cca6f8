// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room synthesis for unoccupied enclosed regions.

use crate::error::HostError;
use crate::host::{HostModel, UnitOfWork};
use crate::types::{EnclosedRegion, Level};

/// Creates rooms in enclosed regions that have none.
#[derive(Debug, Clone, Copy)]
pub struct RegionSynthesizer {
    area_threshold: f64,
}

impl RegionSynthesizer {
    pub fn new(area_threshold: f64) -> Self {
        Self { area_threshold }
    }

    /// Whether a room should be created for `region`.
    pub fn is_candidate(&self, region: &EnclosedRegion) -> bool {
        region.area >= self.area_threshold && !region.has_room
    }

    /// Creates rooms on `level` and returns how many were created.
    ///
    /// Regions are computed at the last construction phase. Rooms are named
    /// "0", "1", ... in creation order; a rejected region does not consume a
    /// name. All creations share one unit of work.
    pub fn synthesize<H: HostModel + ?Sized>(
        &self,
        host: &mut H,
        level: &Level,
    ) -> Result<usize, HostError> {
        let phase = host.phases()?.pop().ok_or(HostError::NoPhases)?;
        let regions = host.compute_enclosed_regions(level.id, phase.id)?;

        tracing::debug!(
            level = %level.name,
            phase = %phase.name,
            regions = regions.len(),
            "Computed enclosed regions"
        );

        let mut uow = UnitOfWork::begin(host, format!("Place rooms on level {}", level.name))?;
        let mut created = 0usize;

        for region in &regions {
            if !self.is_candidate(region) {
                tracing::debug!(
                    index = region.index,
                    area = region.area,
                    has_room = region.has_room,
                    "Skipping region"
                );
                continue;
            }

            match uow.host().create_room(region, &created.to_string()) {
                Ok(room) => {
                    tracing::debug!(room = %room.id, name = %room.name, area = region.area, "Room created");
                    created += 1;
                }
                Err(err) => {
                    tracing::warn!(index = region.index, area = region.area, error = %err, "Room creation rejected");
                }
            }
        }

        uow.commit()?;

        tracing::info!(level = %level.name, created, "Placed rooms");
        Ok(created)
    }
}
