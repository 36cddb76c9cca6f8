// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tagging configuration loaded from environment variables.

/// Name suffix that marks the first-floor level when no level sits at 0.
pub const DEFAULT_REFERENCE_SUFFIX: &str = " 1";

/// Regions smaller than this are shafts and voids, not rooms.
pub const DEFAULT_AREA_THRESHOLD: f64 = 10.0;

/// Room tag type placed on every room.
pub const DEFAULT_LABEL_TYPE: &str = "Room Tag Floor_Number";

/// Room parameter receiving the floor number.
pub const DEFAULT_FLOOR_NUMBER_PARAMETER: &str = "Floor_Number";

/// Tagging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggingConfig {
    /// Suffix of the first-floor level name (e.g. "Level 1").
    pub reference_suffix: String,
    /// Minimum enclosed area for a synthesized room.
    pub area_threshold: f64,
    /// Name of the room tag type.
    pub label_type_name: String,
    /// Name of the room parameter that stores the floor number.
    pub floor_number_parameter: String,
    /// Skip rooms that already carry a tag on the view being processed.
    pub skip_tagged_rooms: bool,
}

impl TaggingConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup, falling back to the
    /// defaults for missing or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            reference_suffix: lookup("ROOMTAG_REFERENCE_SUFFIX")
                .unwrap_or_else(|| DEFAULT_REFERENCE_SUFFIX.into()),
            area_threshold: lookup("ROOMTAG_AREA_THRESHOLD")
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .unwrap_or(DEFAULT_AREA_THRESHOLD),
            label_type_name: lookup("ROOMTAG_LABEL_TYPE")
                .unwrap_or_else(|| DEFAULT_LABEL_TYPE.into()),
            floor_number_parameter: lookup("ROOMTAG_FLOOR_PARAMETER")
                .unwrap_or_else(|| DEFAULT_FLOOR_NUMBER_PARAMETER.into()),
            skip_tagged_rooms: lookup("ROOMTAG_SKIP_TAGGED")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(true),
        }
    }
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            reference_suffix: DEFAULT_REFERENCE_SUFFIX.into(),
            area_threshold: DEFAULT_AREA_THRESHOLD,
            label_type_name: DEFAULT_LABEL_TYPE.into(),
            floor_number_parameter: DEFAULT_FLOOR_NUMBER_PARAMETER.into(),
            skip_tagged_rooms: true,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
