// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory building model backed by a JSON model file.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::hash::Hash;
use std::io::BufReader;
use std::path::Path;

use nalgebra::Point2;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use roomtag_core::{
    EnclosedRegion, HostError, HostModel, LabelType, LabelTypeId, Level, LevelId, Phase, PhaseId,
    PlanView, Point2D, Room, RoomId, Tag, TagId, ViewId,
};

use crate::circuits::{detect_circuits, Segment};
use crate::error::{ModelError, Result};

/// Default distance below which wall endpoints are joined.
pub const DEFAULT_VERTEX_TOLERANCE: f64 = 1e-3;

/// A wall centerline on a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub level: LevelId,
    pub start: Point2D,
    pub end: Point2D,
    /// Phase in which the wall was built. Walls without one exist in every
    /// phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<PhaseId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    #[serde(default = "default_vertex_tolerance")]
    pub vertex_tolerance: f64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            vertex_tolerance: DEFAULT_VERTEX_TOLERANCE,
        }
    }
}

fn default_vertex_tolerance() -> f64 {
    DEFAULT_VERTEX_TOLERANCE
}

/// Outcome of a closed unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitOfWorkRecord {
    pub description: String,
    pub committed: bool,
}

#[derive(Debug, Clone)]
struct OpenUnitOfWork {
    description: String,
    rooms: Vec<Room>,
    tags: Vec<Tag>,
    next_id: u32,
}

/// A building model held in memory.
///
/// Elements share one id counter. Rooms and tags change only inside a unit
/// of work; everything else is authored through the `add_*` builders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    name: String,
    #[serde(default)]
    levels: Vec<Level>,
    #[serde(default)]
    phases: Vec<Phase>,
    #[serde(default)]
    plan_views: Vec<PlanView>,
    #[serde(default)]
    active_view: Option<ViewId>,
    #[serde(default)]
    label_types: Vec<LabelType>,
    #[serde(default)]
    walls: Vec<Wall>,
    #[serde(default)]
    rooms: Vec<Room>,
    #[serde(default)]
    tags: Vec<Tag>,
    #[serde(default)]
    next_id: u32,
    #[serde(default)]
    settings: ModelSettings,
    #[serde(skip)]
    open: Option<OpenUnitOfWork>,
    #[serde(skip)]
    history: Vec<UnitOfWorkRecord>,
}

impl Document {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            next_id: 1,
            ..Self::default()
        }
    }

    /// Reads a model file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path)?;
        let mut document: Self = serde_json::from_reader(BufReader::new(file))?;
        document.validate()?;
        tracing::info!(
            path = %path.display(),
            levels = document.levels.len(),
            walls = document.walls.len(),
            rooms = document.rooms.len(),
            tags = document.tags.len(),
            "Model loaded"
        );
        Ok(document)
    }

    /// Writes the model file as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        tracing::info!(path = %path.display(), "Model saved");
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let mut document: Self = serde_json::from_str(json)?;
        document.validate()?;
        Ok(document)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks id uniqueness and cross references, and repairs the id
    /// counter.
    fn validate(&mut self) -> Result<()> {
        let levels = unique_ids("level", self.levels.iter().map(|l| l.id))?;
        let phases = unique_ids("phase", self.phases.iter().map(|p| p.id))?;
        let views = unique_ids("plan view", self.plan_views.iter().map(|v| v.id))?;
        let label_types = unique_ids("label type", self.label_types.iter().map(|t| t.id))?;
        let rooms = unique_ids("room", self.rooms.iter().map(|r| r.id))?;
        unique_ids("tag", self.tags.iter().map(|t| t.id))?;

        let missing = |what: &str, id: &dyn fmt::Display, owner: String| {
            ModelError::InvalidReference(format!("{owner} refers to missing {what} {id}"))
        };

        for view in &self.plan_views {
            if !levels.contains(&view.level) {
                return Err(missing("level", &view.level, format!("plan view {}", view.name)));
            }
        }
        if let Some(active) = self.active_view {
            if !views.contains(&active) {
                return Err(missing("view", &active, "active view".to_string()));
            }
        }
        for (i, wall) in self.walls.iter().enumerate() {
            if !levels.contains(&wall.level) {
                return Err(missing("level", &wall.level, format!("wall {i}")));
            }
            if let Some(phase) = wall.phase.filter(|p| !phases.contains(p)) {
                return Err(missing("phase", &phase, format!("wall {i}")));
            }
        }
        for room in &self.rooms {
            if !levels.contains(&room.level) {
                return Err(missing("level", &room.level, format!("room {}", room.id)));
            }
        }
        for tag in &self.tags {
            if !rooms.contains(&tag.room) {
                return Err(missing("room", &tag.room, format!("tag {}", tag.id)));
            }
            if !views.contains(&tag.view) {
                return Err(missing("view", &tag.view, format!("tag {}", tag.id)));
            }
            if !label_types.contains(&tag.label_type) {
                return Err(missing("label type", &tag.label_type, format!("tag {}", tag.id)));
            }
        }

        let highest = self
            .levels
            .iter()
            .map(|l| l.id.0)
            .chain(self.phases.iter().map(|p| p.id.0))
            .chain(self.plan_views.iter().map(|v| v.id.0))
            .chain(self.label_types.iter().map(|t| t.id.0))
            .chain(self.rooms.iter().map(|r| r.id.0))
            .chain(self.tags.iter().map(|t| t.id.0))
            .max()
            .unwrap_or(0);
        let first_free = highest.checked_add(1).ok_or(ModelError::IdSpaceExhausted)?;
        self.next_id = self.next_id.max(first_free);
        Ok(())
    }

    /// Next free element id, or `None` once the id space is used up.
    fn try_allocate_id(&mut self) -> Option<u32> {
        let id = self.next_id.max(1);
        self.next_id = id.checked_add(1)?;
        Some(id)
    }

    /// Id for an authored element. Authoring past the end of the id space
    /// keeps returning the last id.
    fn allocate_id(&mut self) -> u32 {
        self.try_allocate_id().unwrap_or(u32::MAX)
    }

    // Authoring

    pub fn add_level(&mut self, name: impl Into<String>, elevation: f64) -> LevelId {
        let id = LevelId(self.allocate_id());
        self.levels.push(Level::new(id, name, elevation));
        id
    }

    /// Appends a phase after every existing one.
    pub fn add_phase(&mut self, name: impl Into<String>) -> PhaseId {
        let id = PhaseId(self.allocate_id());
        self.phases.push(Phase {
            id,
            name: name.into(),
        });
        id
    }

    pub fn add_plan_view(&mut self, name: impl Into<String>, level: LevelId) -> ViewId {
        self.push_view(name.into(), level, false)
    }

    pub fn add_view_template(&mut self, name: impl Into<String>, level: LevelId) -> ViewId {
        self.push_view(name.into(), level, true)
    }

    fn push_view(&mut self, name: String, level: LevelId, is_template: bool) -> ViewId {
        let id = ViewId(self.allocate_id());
        self.plan_views.push(PlanView {
            id,
            name,
            level,
            is_template,
        });
        id
    }

    /// Sets the view the user is looking at. `None` models a non-plan view.
    pub fn set_active_view(&mut self, view: Option<ViewId>) {
        self.active_view = view;
    }

    pub fn add_label_type(&mut self, name: impl Into<String>) -> LabelTypeId {
        let id = LabelTypeId(self.allocate_id());
        self.label_types.push(LabelType {
            id,
            name: name.into(),
        });
        id
    }

    pub fn add_wall(&mut self, level: LevelId, start: Point2D, end: Point2D) {
        self.walls.push(Wall {
            level,
            start,
            end,
            phase: None,
        });
    }

    pub fn add_wall_in_phase(
        &mut self,
        level: LevelId,
        start: Point2D,
        end: Point2D,
        phase: PhaseId,
    ) {
        self.walls.push(Wall {
            level,
            start,
            end,
            phase: Some(phase),
        });
    }

    /// Adds four walls around the axis-aligned box spanned by two corners.
    pub fn add_rectangle(&mut self, level: LevelId, min: Point2D, max: Point2D) {
        let corners = [
            min,
            Point2D::new(max.x, min.y),
            max,
            Point2D::new(min.x, max.y),
        ];
        for i in 0..4 {
            self.add_wall(level, corners[i], corners[(i + 1) % 4]);
        }
    }

    /// Adds a room directly, outside any unit of work.
    pub fn add_room(
        &mut self,
        level: LevelId,
        name: impl Into<String>,
        location: Option<Point2D>,
    ) -> RoomId {
        let id = RoomId(self.allocate_id());
        self.rooms.push(Room {
            id,
            level,
            name: name.into(),
            location,
            parameters: BTreeMap::new(),
        });
        id
    }

    pub fn set_vertex_tolerance(&mut self, tolerance: f64) {
        self.settings.vertex_tolerance = tolerance;
    }

    // Queries

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn plan_views(&self) -> &[PlanView] {
        &self.plan_views
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn tags_on(&self, view: ViewId) -> impl Iterator<Item = &Tag> {
        self.tags.iter().filter(move |t| t.view == view)
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    /// Units of work closed since the document was created or loaded.
    pub fn history(&self) -> &[UnitOfWorkRecord] {
        &self.history
    }

    pub fn is_unit_of_work_open(&self) -> bool {
        self.open.is_some()
    }

    fn level(&self, id: LevelId) -> Option<&Level> {
        self.levels.iter().find(|l| l.id == id)
    }

    fn phase_position(&self, id: PhaseId) -> Option<usize> {
        self.phases.iter().position(|p| p.id == id)
    }

    fn require_open(&self) -> std::result::Result<(), HostError> {
        self.open.as_ref().map(|_| ()).ok_or(HostError::NoUnitOfWork)
    }

    fn wall_segments(&self, level: LevelId, phase_position: usize) -> Vec<Segment> {
        self.walls
            .iter()
            .filter(|w| w.level == level)
            .filter(|w| match w.phase {
                None => true,
                Some(built) => self
                    .phase_position(built)
                    .is_some_and(|p| p <= phase_position),
            })
            .map(|w| Segment::new(to_point(w.start), to_point(w.end)))
            .collect()
    }
}

fn unique_ids<T>(what: &str, ids: impl Iterator<Item = T>) -> Result<FxHashSet<T>>
where
    T: Copy + Eq + Hash + fmt::Display,
{
    let mut seen = FxHashSet::default();
    for id in ids {
        if !seen.insert(id) {
            return Err(ModelError::DuplicateId(format!("{what} {id}")));
        }
    }
    Ok(seen)
}

fn id_space_exhausted() -> HostError {
    HostError::Other("element id space exhausted".to_string())
}

fn to_point(p: Point2D) -> Point2<f64> {
    Point2::new(p.x, p.y)
}

fn from_point(p: Point2<f64>) -> Point2D {
    Point2D::new(p.x, p.y)
}

type HostResult<T> = std::result::Result<T, HostError>;

impl HostModel for Document {
    fn list_levels(&self) -> HostResult<Vec<Level>> {
        Ok(self.levels.clone())
    }

    fn list_plan_views(&self) -> HostResult<Vec<PlanView>> {
        Ok(self.plan_views.clone())
    }

    fn active_view(&self) -> HostResult<Option<PlanView>> {
        Ok(self
            .active_view
            .and_then(|id| self.plan_views.iter().find(|v| v.id == id).cloned()))
    }

    fn list_rooms(&self, level: LevelId) -> HostResult<Vec<Room>> {
        Ok(self.rooms.iter().filter(|r| r.level == level).cloned().collect())
    }

    fn phases(&self) -> HostResult<Vec<Phase>> {
        Ok(self.phases.clone())
    }

    fn compute_enclosed_regions(
        &self,
        level: LevelId,
        phase: PhaseId,
    ) -> HostResult<Vec<EnclosedRegion>> {
        if self.level(level).is_none() {
            return Err(HostError::ElementNotFound(format!("level {level}")));
        }
        let phase_position = self
            .phase_position(phase)
            .ok_or_else(|| HostError::ElementNotFound(format!("phase {phase}")))?;

        let segments = self.wall_segments(level, phase_position);
        let circuits = detect_circuits(&segments, self.settings.vertex_tolerance);
        let occupants: Vec<Point2<f64>> = self
            .rooms
            .iter()
            .filter(|r| r.level == level)
            .filter_map(|r| r.location.map(to_point))
            .collect();

        tracing::debug!(
            level = %level,
            phase = %phase,
            walls = segments.len(),
            circuits = circuits.len(),
            "Detected circuits"
        );

        Ok(circuits
            .iter()
            .enumerate()
            .map(|(index, circuit)| EnclosedRegion {
                level,
                phase,
                index,
                area: circuit.area,
                has_room: occupants.iter().any(|p| circuit.contains(p)),
                location: circuit.interior_point().map(from_point),
            })
            .collect())
    }

    fn find_label_type(&self, name: &str) -> HostResult<Option<LabelType>> {
        Ok(self.label_types.iter().find(|t| t.name == name).cloned())
    }

    fn create_room(&mut self, region: &EnclosedRegion, name: &str) -> HostResult<Room> {
        self.require_open()?;
        if self.level(region.level).is_none() {
            return Err(HostError::ElementNotFound(format!("level {}", region.level)));
        }
        if region.has_room {
            return Err(HostError::RoomRejected(format!(
                "region {} already holds a room",
                region.index
            )));
        }
        let Some(location) = region.location else {
            return Err(HostError::RoomRejected(format!(
                "region {} has no interior point",
                region.index
            )));
        };
        if self
            .rooms
            .iter()
            .any(|r| r.level == region.level && r.location == Some(location))
        {
            return Err(HostError::RoomRejected(format!(
                "a room already sits at the interior point of region {}",
                region.index
            )));
        }

        let id = self.try_allocate_id().ok_or_else(id_space_exhausted)?;
        let room = Room {
            id: RoomId(id),
            level: region.level,
            name: name.to_string(),
            location: Some(location),
            parameters: BTreeMap::new(),
        };
        self.rooms.push(room.clone());
        Ok(room)
    }

    fn set_room_parameter(&mut self, room: RoomId, name: &str, value: &str) -> HostResult<()> {
        self.require_open()?;
        let room = self
            .rooms
            .iter_mut()
            .find(|r| r.id == room)
            .ok_or_else(|| HostError::ElementNotFound(format!("room {room}")))?;
        room.parameters.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn has_tag(&self, room: RoomId, view: ViewId) -> HostResult<bool> {
        Ok(self.tags.iter().any(|t| t.room == room && t.view == view))
    }

    fn create_tag(
        &mut self,
        room: RoomId,
        anchor: Point2D,
        view: ViewId,
        label_type: LabelTypeId,
    ) -> HostResult<Tag> {
        self.require_open()?;
        let room_level = self
            .room(room)
            .map(|r| r.level)
            .ok_or_else(|| HostError::ElementNotFound(format!("room {room}")))?;
        let plan = self
            .plan_views
            .iter()
            .find(|v| v.id == view)
            .ok_or_else(|| HostError::ElementNotFound(format!("view {view}")))?;
        if plan.is_template {
            return Err(HostError::TagRejected(format!(
                "view {} is a template",
                plan.name
            )));
        }
        if plan.level != room_level {
            return Err(HostError::TagRejected(format!(
                "room {room} is not on the level shown by {}",
                plan.name
            )));
        }
        if !self.label_types.iter().any(|t| t.id == label_type) {
            return Err(HostError::ElementNotFound(format!("label type {label_type}")));
        }

        let id = self.try_allocate_id().ok_or_else(id_space_exhausted)?;
        let tag = Tag {
            id: TagId(id),
            room,
            anchor,
            view,
            label_type,
        };
        self.tags.push(tag.clone());
        Ok(tag)
    }

    fn begin_unit_of_work(&mut self, description: &str) -> HostResult<()> {
        if let Some(open) = &self.open {
            return Err(HostError::UnitOfWorkAlreadyOpen(open.description.clone()));
        }
        self.open = Some(OpenUnitOfWork {
            description: description.to_string(),
            rooms: self.rooms.clone(),
            tags: self.tags.clone(),
            next_id: self.next_id,
        });
        Ok(())
    }

    fn commit_unit_of_work(&mut self) -> HostResult<()> {
        let open = self.open.take().ok_or(HostError::NoUnitOfWork)?;
        self.history.push(UnitOfWorkRecord {
            description: open.description,
            committed: true,
        });
        Ok(())
    }

    fn abort_unit_of_work(&mut self) {
        if let Some(open) = self.open.take() {
            self.rooms = open.rooms;
            self.tags = open.tags;
            self.next_id = open.next_id;
            self.history.push(UnitOfWorkRecord {
                description: open.description,
                committed: false,
            });
        }
    }
}
