// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command-line arguments.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use roomtag_core::{AutoPlaceRooms, RunPreset, Scope, TaggingConfig};

/// Number and tag the rooms of a building model by floor.
#[derive(Parser, Debug)]
#[command(name = "roomtag", author, version, about, long_about = None)]
pub struct Args {
    /// Path to the JSON model file
    pub model: PathBuf,

    /// Plans to tag; prompted for when omitted
    #[arg(long, value_enum)]
    pub scope: Option<ScopeArg>,

    /// Create rooms in empty enclosed regions first; prompted for when omitted
    #[arg(long, value_enum)]
    pub auto_place_rooms: Option<YesNo>,

    /// Where to write the updated model (defaults to the input file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Level name suffix marking floor 1 when no level sits at elevation 0
    #[arg(long)]
    pub reference_suffix: Option<String>,

    /// Smallest region area that receives a room, in square model units
    #[arg(long, value_parser = parse_area_threshold)]
    pub area_threshold: Option<f64>,

    /// Name of the room tag type to place
    #[arg(long)]
    pub label_type: Option<String>,

    /// Room parameter receiving the floor number
    #[arg(long)]
    pub floor_parameter: Option<String>,

    /// Tag rooms again even when they already carry a tag on the plan
    #[arg(long)]
    pub allow_duplicate_tags: bool,

    /// Run without writing the model back
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeArg {
    CurrentView,
    WholeProject,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
}

impl Args {
    /// Choices given on the command line.
    pub fn preset(&self) -> RunPreset {
        RunPreset {
            scope: self.scope.map(|scope| match scope {
                ScopeArg::CurrentView => Scope::SingleView,
                ScopeArg::WholeProject => Scope::WholeProject,
            }),
            auto_place_rooms: self.auto_place_rooms.map(|answer| match answer {
                YesNo::Yes => AutoPlaceRooms::Run,
                YesNo::No => AutoPlaceRooms::Skip,
            }),
        }
    }

    /// Applies flag overrides on top of `config`.
    pub fn apply(&self, config: &mut TaggingConfig) {
        if let Some(suffix) = &self.reference_suffix {
            config.reference_suffix = suffix.clone();
        }
        if let Some(threshold) = self.area_threshold {
            config.area_threshold = threshold;
        }
        if let Some(name) = &self.label_type {
            config.label_type_name = name.clone();
        }
        if let Some(name) = &self.floor_parameter {
            config.floor_number_parameter = name.clone();
        }
        if self.allow_duplicate_tags {
            config.skip_tagged_rooms = false;
        }
    }

    pub fn output_path(&self) -> &Path {
        self.output.as_deref().unwrap_or(&self.model)
    }
}

fn parse_area_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|err| format!("{err}"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("expected a finite, non-negative area, got {s}"))
    }
}
