// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scripted host and UI used by the unit tests.

use std::cell::Cell;
use std::collections::{BTreeMap, VecDeque};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::HostError;
use crate::host::{ChoiceOption, HostModel, HostUi};
use crate::types::*;

#[derive(Debug, Default)]
pub struct FakeHost {
    pub levels: Vec<Level>,
    pub views: Vec<PlanView>,
    pub active: Option<ViewId>,
    pub phases: Vec<Phase>,
    pub label_types: Vec<LabelType>,
    pub rooms: Vec<Room>,
    pub tags: Vec<Tag>,
    /// Regions returned per level, regardless of phase.
    pub regions: FxHashMap<LevelId, Vec<EnclosedRegion>>,
    /// Region indices whose room creation is rejected.
    pub rejected_regions: FxHashSet<usize>,
    /// Levels whose region computation fails.
    pub failing_levels: FxHashSet<LevelId>,
    /// Unit-of-work descriptions whose commit fails.
    pub failing_commits: FxHashSet<String>,
    /// Rooms whose tag lookup fails.
    pub failing_tag_queries: FxHashSet<RoomId>,
    /// Phase passed to the last region computation.
    pub last_phase: Cell<Option<PhaseId>>,
    pub open: Option<String>,
    pub committed: Vec<String>,
    pub aborted: Vec<String>,
    snapshot: Option<(Vec<Room>, Vec<Tag>)>,
    next_id: u32,
}

impl FakeHost {
    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        1000 + self.next_id
    }

    fn require_open(&self) -> Result<(), HostError> {
        self.open.as_ref().map(|_| ()).ok_or(HostError::NoUnitOfWork)
    }

    pub fn add_level(&mut self, id: u32, name: &str, elevation: f64) -> Level {
        let level = Level::new(LevelId(id), name, elevation);
        self.levels.push(level.clone());
        level
    }

    pub fn add_view(&mut self, id: u32, name: &str, level: LevelId, is_template: bool) -> PlanView {
        let view = PlanView {
            id: ViewId(id),
            name: name.to_string(),
            level,
            is_template,
        };
        self.views.push(view.clone());
        view
    }

    pub fn add_room(&mut self, id: u32, level: LevelId, location: Option<Point2D>) -> RoomId {
        self.rooms.push(Room {
            id: RoomId(id),
            level,
            name: format!("Room {id}"),
            location,
            parameters: BTreeMap::new(),
        });
        RoomId(id)
    }

    pub fn add_region(&mut self, level: LevelId, area: f64, has_room: bool) {
        let regions = self.regions.entry(level).or_default();
        let index = regions.len();
        regions.push(EnclosedRegion {
            level,
            phase: PhaseId(0),
            index,
            area,
            has_room,
            location: Some(Point2D::new(index as f64, 0.0)),
        });
    }

    pub fn with_defaults() -> Self {
        let mut host = Self::default();
        host.phases.push(Phase {
            id: PhaseId(1),
            name: "Existing".into(),
        });
        host.phases.push(Phase {
            id: PhaseId(2),
            name: "New Construction".into(),
        });
        host.label_types.push(LabelType {
            id: LabelTypeId(900),
            name: crate::config::DEFAULT_LABEL_TYPE.into(),
        });
        host
    }

    pub fn room(&self, id: RoomId) -> &Room {
        self.rooms.iter().find(|r| r.id == id).unwrap()
    }
}

impl HostModel for FakeHost {
    fn list_levels(&self) -> Result<Vec<Level>, HostError> {
        Ok(self.levels.clone())
    }

    fn list_plan_views(&self) -> Result<Vec<PlanView>, HostError> {
        Ok(self.views.clone())
    }

    fn active_view(&self) -> Result<Option<PlanView>, HostError> {
        Ok(self
            .active
            .and_then(|id| self.views.iter().find(|v| v.id == id).cloned()))
    }

    fn list_rooms(&self, level: LevelId) -> Result<Vec<Room>, HostError> {
        Ok(self.rooms.iter().filter(|r| r.level == level).cloned().collect())
    }

    fn phases(&self) -> Result<Vec<Phase>, HostError> {
        Ok(self.phases.clone())
    }

    fn compute_enclosed_regions(
        &self,
        level: LevelId,
        phase: PhaseId,
    ) -> Result<Vec<EnclosedRegion>, HostError> {
        self.last_phase.set(Some(phase));
        if self.failing_levels.contains(&level) {
            return Err(HostError::Other(format!("topology failed on {level}")));
        }
        Ok(self
            .regions
            .get(&level)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|r| EnclosedRegion { phase, ..r })
            .collect())
    }

    fn find_label_type(&self, name: &str) -> Result<Option<LabelType>, HostError> {
        Ok(self.label_types.iter().find(|t| t.name == name).cloned())
    }

    fn create_room(&mut self, region: &EnclosedRegion, name: &str) -> Result<Room, HostError> {
        self.require_open()?;
        if self.rejected_regions.contains(&region.index) {
            return Err(HostError::RoomRejected(format!("region {}", region.index)));
        }
        let room = Room {
            id: RoomId(self.next_id()),
            level: region.level,
            name: name.to_string(),
            location: region.location,
            parameters: BTreeMap::new(),
        };
        self.rooms.push(room.clone());
        Ok(room)
    }

    fn set_room_parameter(
        &mut self,
        room: RoomId,
        name: &str,
        value: &str,
    ) -> Result<(), HostError> {
        self.require_open()?;
        let room = self
            .rooms
            .iter_mut()
            .find(|r| r.id == room)
            .ok_or_else(|| HostError::ElementNotFound(room.to_string()))?;
        room.parameters.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn has_tag(&self, room: RoomId, view: ViewId) -> Result<bool, HostError> {
        if self.failing_tag_queries.contains(&room) {
            return Err(HostError::Other(format!("tag lookup failed for {room}")));
        }
        Ok(self.tags.iter().any(|t| t.room == room && t.view == view))
    }

    fn create_tag(
        &mut self,
        room: RoomId,
        anchor: Point2D,
        view: ViewId,
        label_type: LabelTypeId,
    ) -> Result<Tag, HostError> {
        self.require_open()?;
        let tag = Tag {
            id: TagId(self.next_id()),
            room,
            anchor,
            view,
            label_type,
        };
        self.tags.push(tag.clone());
        Ok(tag)
    }

    fn begin_unit_of_work(&mut self, description: &str) -> Result<(), HostError> {
        if let Some(open) = &self.open {
            return Err(HostError::UnitOfWorkAlreadyOpen(open.clone()));
        }
        self.open = Some(description.to_string());
        self.snapshot = Some((self.rooms.clone(), self.tags.clone()));
        Ok(())
    }

    fn commit_unit_of_work(&mut self) -> Result<(), HostError> {
        if let Some(open) = self.open.as_ref().filter(|d| self.failing_commits.contains(*d)) {
            return Err(HostError::Other(format!("commit of \"{open}\" refused")));
        }
        let description = self.open.take().ok_or(HostError::NoUnitOfWork)?;
        self.snapshot = None;
        self.committed.push(description);
        Ok(())
    }

    fn abort_unit_of_work(&mut self) {
        if let Some(description) = self.open.take() {
            if let Some((rooms, tags)) = self.snapshot.take() {
                self.rooms = rooms;
                self.tags = tags;
            }
            self.aborted.push(description);
        }
    }
}

/// UI that answers prompts from a script and records notices.
#[derive(Debug, Default)]
pub struct ScriptUi {
    pub answers: VecDeque<Option<usize>>,
    pub questions: Vec<String>,
    pub reports: Vec<(String, String)>,
}

impl ScriptUi {
    pub fn answering(answers: &[Option<usize>]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl HostUi for ScriptUi {
    fn prompt_choice(
        &mut self,
        _title: &str,
        question: &str,
        _options: &[ChoiceOption<'_>],
    ) -> Option<usize> {
        self.questions.push(question.to_string());
        self.answers.pop_front().flatten()
    }

    fn report(&mut self, title: &str, message: &str) {
        self.reports.push((title.to_string(), message.to_string()));
    }
}
