// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model elements read from and written to the host.

use std::collections::BTreeMap;
use std::fmt;

macro_rules! element_id {
    ($($(#[$meta:meta])* $name:ident;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
            #[cfg_attr(
                feature = "serde",
                derive(serde::Serialize, serde::Deserialize),
                serde(transparent)
            )]
            pub struct $name(pub u32);

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "#{}", self.0)
                }
            }
        )*
    };
}

element_id! {
    /// Identity of a level.
    LevelId;

    /// Identity of a construction phase.
    PhaseId;

    /// Identity of a plan view.
    ViewId;

    /// Identity of a room.
    RoomId;

    /// Identity of a room tag.
    TagId;

    /// Identity of a room tag type.
    LabelTypeId;
}

/// A point in plan coordinates (model units).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A building story.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Level {
    pub id: LevelId,
    pub name: String,
    /// Elevation in model units.
    pub elevation: f64,
}

impl Level {
    pub fn new(id: LevelId, name: impl Into<String>, elevation: f64) -> Self {
        Self {
            id,
            name: name.into(),
            elevation,
        }
    }
}

/// A construction phase. Hosts list phases in construction order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Phase {
    pub id: PhaseId,
    pub name: String,
}

/// A drawing view showing one level from above.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanView {
    pub id: ViewId,
    pub name: String,
    pub level: LevelId,
    /// Templates only carry view settings and are never tagged.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_template: bool,
}

/// A room tag type, looked up by name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabelType {
    pub id: LabelTypeId,
    pub name: String,
}

/// A room placed on a level.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    pub id: RoomId,
    pub level: LevelId,
    pub name: String,
    /// Representative point. Absent on malformed rooms.
    #[cfg_attr(feature = "serde", serde(default))]
    pub location: Option<Point2D>,
    /// Free-text instance parameters, keyed by parameter name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameters: BTreeMap<String, String>,
}

impl Room {
    /// Returns the value of a named parameter.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }
}

/// A tag labelling a room on a plan view.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag {
    pub id: TagId,
    pub room: RoomId,
    pub anchor: Point2D,
    pub view: ViewId,
    pub label_type: LabelTypeId,
}

/// A closed boundary loop found on a level at a given phase.
///
/// Regions are recomputed on demand and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct EnclosedRegion {
    pub level: LevelId,
    pub phase: PhaseId,
    /// Position of the region within one computation.
    pub index: usize,
    /// Enclosed area in square model units.
    pub area: f64,
    /// Whether a room already occupies the region.
    pub has_room: bool,
    /// A point strictly inside the region, if one could be found.
    pub location: Option<Point2D>,
}
