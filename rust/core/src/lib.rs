// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # RoomTag Core
//!
//! Floor numbering and room tagging for building models.
//!
//! ## Overview
//!
//! - **Level index**: levels ordered by elevation, with the level at elevation
//!   0 (or named "... 1") counted as floor 1
//! - **Floor numbers**: a level's position relative to floor 1, so the level
//!   right below it is floor 0 and the next one floor -1
//! - **Room synthesis**: rooms created in unoccupied enclosed regions larger
//!   than an area threshold
//! - **Tagging**: each room receives its floor number and a tag on the plan
//!   view of its level
//!
//! The model itself is reached through the [`HostModel`] and [`HostUi`]
//! traits; every mutation happens inside a [`UnitOfWork`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use roomtag_core::{AutoPlaceRooms, Orchestrator, RunOptions, Scope, TaggingConfig};
//!
//! let config = TaggingConfig::from_env();
//! let summary = Orchestrator::new(&config).execute(
//!     &mut host,
//!     &mut ui,
//!     RunOptions {
//!         scope: Scope::WholeProject,
//!         auto_place_rooms: AutoPlaceRooms::Run,
//!     },
//! )?;
//! println!("{} rooms, {} tags", summary.rooms_created, summary.tags_placed);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for model elements

pub mod config;
pub mod error;
pub mod floor_number;
pub mod host;
pub mod levels;
pub mod orchestrator;
pub mod regions;
pub mod tags;
pub mod types;

#[cfg(test)]
mod test_support;

pub use config::TaggingConfig;
pub use error::{Error, HostError, Result};
pub use floor_number::FloorNumberResolver;
pub use host::{ChoiceOption, HostModel, HostUi, UnitOfWork};
pub use levels::LevelIndex;
pub use orchestrator::{
    AutoPlaceRooms, Orchestrator, RunOptions, RunPreset, RunSummary, Scope, Step, StepFailure,
};
pub use regions::RegionSynthesizer;
pub use tags::TagPlacer;
pub use types::{
    EnclosedRegion, LabelType, LabelTypeId, Level, LevelId, Phase, PhaseId, PlanView, Point2D,
    Room, RoomId, Tag, TagId, ViewId,
};
