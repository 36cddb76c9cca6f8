// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Run sequencing: scope selection, room synthesis, tagging.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::config::TaggingConfig;
use crate::error::{Error, HostError, Result};
use crate::floor_number::FloorNumberResolver;
use crate::host::{ChoiceOption, HostModel, HostUi};
use crate::levels::LevelIndex;
use crate::regions::RegionSynthesizer;
use crate::tags::TagPlacer;
use crate::types::{Level, PlanView};

const SCOPE_OPTIONS: [ChoiceOption<'static>; 2] = [
    ChoiceOption::new("Current view", Some("The active view, which must be a floor plan")),
    ChoiceOption::new("All plans", Some("Every floor plan in the project")),
];

const AUTO_PLACE_OPTIONS: [ChoiceOption<'static>; 2] = [
    ChoiceOption::new("No", None),
    ChoiceOption::new("Yes", None),
];

/// Which views a run processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The active plan view only.
    SingleView,
    /// Every non-template plan view.
    WholeProject,
}

impl Scope {
    /// Asks the user. A dismissed prompt selects [`Scope::SingleView`].
    pub fn prompt<U: HostUi + ?Sized>(ui: &mut U) -> Self {
        match ui.prompt_choice("Choose", "Where should tags be placed?", &SCOPE_OPTIONS) {
            Some(1) => Scope::WholeProject,
            _ => Scope::SingleView,
        }
    }
}

/// Whether rooms are synthesized before tagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoPlaceRooms {
    Skip,
    Run,
}

impl AutoPlaceRooms {
    /// Asks the user. A dismissed prompt selects [`AutoPlaceRooms::Skip`].
    pub fn prompt<U: HostUi + ?Sized>(ui: &mut U) -> Self {
        match ui.prompt_choice("Choose", "Place rooms automatically?", &AUTO_PLACE_OPTIONS) {
            Some(1) => AutoPlaceRooms::Run,
            _ => AutoPlaceRooms::Skip,
        }
    }
}

/// The two choices that drive a run, fixed before any processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub scope: Scope,
    pub auto_place_rooms: AutoPlaceRooms,
}

/// Choices already known before a run; the rest are prompted for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunPreset {
    pub scope: Option<Scope>,
    pub auto_place_rooms: Option<AutoPlaceRooms>,
}

impl RunPreset {
    pub fn resolve<U: HostUi + ?Sized>(self, ui: &mut U) -> RunOptions {
        let scope = match self.scope {
            Some(scope) => scope,
            None => Scope::prompt(ui),
        };
        let auto_place_rooms = match self.auto_place_rooms {
            Some(auto) => auto,
            None => AutoPlaceRooms::prompt(ui),
        };
        RunOptions {
            scope,
            auto_place_rooms,
        }
    }
}

/// Pipeline step that failed without stopping the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    PlaceRooms,
    PlaceTags,
}

/// A recovered per-level or per-view failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub step: Step,
    /// Level name for room placement, view name for tagging.
    pub element: String,
    pub error: HostError,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self.step {
            Step::PlaceRooms => "room placement on level",
            Step::PlaceTags => "tag placement on plan",
        };
        write!(f, "{step} {} failed: {}", self.element, self.error)
    }
}

/// Totals of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub rooms_created: usize,
    pub tags_placed: usize,
    pub failures: Vec<StepFailure>,
}

/// Sequences level indexing, room synthesis and tagging over a host.
#[derive(Debug, Clone, Copy)]
pub struct Orchestrator<'c> {
    config: &'c TaggingConfig,
}

impl<'c> Orchestrator<'c> {
    pub fn new(config: &'c TaggingConfig) -> Self {
        Self { config }
    }

    /// Command entry point: asks both questions, then executes.
    pub fn run<H, U>(&self, host: &mut H, ui: &mut U) -> Result<RunSummary>
    where
        H: HostModel + ?Sized,
        U: HostUi + ?Sized,
    {
        self.run_with(host, ui, RunPreset::default())
    }

    /// Like [`Orchestrator::run`], prompting only for choices missing from
    /// `preset`. A fatal error is reported to the user once and returned.
    pub fn run_with<H, U>(&self, host: &mut H, ui: &mut U, preset: RunPreset) -> Result<RunSummary>
    where
        H: HostModel + ?Sized,
        U: HostUi + ?Sized,
    {
        let options = preset.resolve(ui);
        self.execute(host, ui, options).inspect_err(|err| {
            tracing::error!(error = %err, "Room tagging failed");
            ui.report("Room tagging failed", &err.to_string());
        })
    }

    /// Runs the pipeline with fixed options.
    ///
    /// The level index, the views in scope and the label type are resolved
    /// before the first unit of work opens, so fatal errors leave the model
    /// untouched. Failures on one level or view are recorded in the summary
    /// and the run goes on.
    pub fn execute<H, U>(&self, host: &mut H, ui: &mut U, options: RunOptions) -> Result<RunSummary>
    where
        H: HostModel + ?Sized,
        U: HostUi + ?Sized,
    {
        tracing::info!(
            scope = ?options.scope,
            auto_place_rooms = ?options.auto_place_rooms,
            "Starting room tagging"
        );

        let index = LevelIndex::resolve(host.list_levels()?, &self.config.reference_suffix)?;
        ui.report(
            "Reference level",
            &format!("Floor 1 is taken from level {}", index.reference_level().name),
        );

        let views = views_in_scope(host, options.scope)?;
        let label_type = host
            .find_label_type(&self.config.label_type_name)?
            .ok_or_else(|| Error::MissingLabelType {
                name: self.config.label_type_name.clone(),
            })?;

        let mut summary = RunSummary::default();

        if options.auto_place_rooms == AutoPlaceRooms::Run {
            let synthesizer = RegionSynthesizer::new(self.config.area_threshold);
            for level in levels_in_scope(&index, &views, &mut summary) {
                match synthesizer.synthesize(host, level) {
                    Ok(created) => summary.rooms_created += created,
                    Err(error) => {
                        tracing::warn!(level = %level.name, error = %error, "Room placement failed");
                        summary.failures.push(StepFailure {
                            step: Step::PlaceRooms,
                            element: level.name.clone(),
                            error,
                        });
                    }
                }
            }
            ui.report(
                "Room placement complete",
                &format!("Rooms placed: {}", summary.rooms_created),
            );
        }

        let placer = TagPlacer::new(
            FloorNumberResolver::new(&index),
            &self.config.floor_number_parameter,
        )
        .skip_tagged_rooms(self.config.skip_tagged_rooms);

        for view in &views {
            let Some(level) = index.level(view.level) else {
                summary.failures.push(StepFailure {
                    step: Step::PlaceTags,
                    element: view.name.clone(),
                    error: HostError::ElementNotFound(format!("level {}", view.level)),
                });
                continue;
            };

            match placer.place(host, view, level, &label_type) {
                Ok(placed) => summary.tags_placed += placed,
                Err(error) => {
                    tracing::warn!(view = %view.name, error = %error, "Tag placement failed");
                    summary.failures.push(StepFailure {
                        step: Step::PlaceTags,
                        element: view.name.clone(),
                        error,
                    });
                }
            }
        }

        ui.report(
            "Tag placement complete",
            &format!("Tags placed: {}", summary.tags_placed),
        );

        tracing::info!(
            rooms_created = summary.rooms_created,
            tags_placed = summary.tags_placed,
            failures = summary.failures.len(),
            "Room tagging finished"
        );

        Ok(summary)
    }
}

fn views_in_scope<H: HostModel + ?Sized>(host: &H, scope: Scope) -> Result<Vec<PlanView>> {
    match scope {
        Scope::SingleView => {
            let view = host
                .active_view()?
                .filter(|view| !view.is_template)
                .ok_or(Error::InvalidActiveView)?;
            Ok(vec![view])
        }
        Scope::WholeProject => Ok(host
            .list_plan_views()?
            .into_iter()
            .filter(|view| !view.is_template)
            .collect()),
    }
}

/// Distinct levels shown by `views`, in first-seen order.
fn levels_in_scope<'i>(
    index: &'i LevelIndex,
    views: &[PlanView],
    summary: &mut RunSummary,
) -> Vec<&'i Level> {
    let mut seen = FxHashSet::default();
    let mut levels = Vec::new();

    for view in views {
        if !seen.insert(view.level) {
            continue;
        }
        match index.level(view.level) {
            Some(level) => levels.push(level),
            None => summary.failures.push(StepFailure {
                step: Step::PlaceRooms,
                element: view.name.clone(),
                error: HostError::ElementNotFound(format!("level {}", view.level)),
            }),
        }
    }

    levels
}
