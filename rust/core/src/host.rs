// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host collaborator interfaces.
//!
//! The tagging pipeline never touches a model directly. It reads levels,
//! views and rooms through [`HostModel`], mutates the model only inside a
//! [`UnitOfWork`], and talks to the user through [`HostUi`].

use crate::error::HostError;
use crate::types::{
    EnclosedRegion, LabelType, LabelTypeId, Level, LevelId, Phase, PhaseId, PlanView, Point2D,
    Room, RoomId, Tag, ViewId,
};

/// Element queries, mutations and transactions provided by the host model.
///
/// Mutating operations are only valid while a unit of work is open.
pub trait HostModel {
    fn list_levels(&self) -> Result<Vec<Level>, HostError>;

    fn list_plan_views(&self) -> Result<Vec<PlanView>, HostError>;

    /// Returns the active view, or `None` when it is not a plan view.
    fn active_view(&self) -> Result<Option<PlanView>, HostError>;

    fn list_rooms(&self, level: LevelId) -> Result<Vec<Room>, HostError>;

    /// Construction phases in construction order.
    fn phases(&self) -> Result<Vec<Phase>, HostError>;

    fn compute_enclosed_regions(
        &self,
        level: LevelId,
        phase: PhaseId,
    ) -> Result<Vec<EnclosedRegion>, HostError>;

    fn find_label_type(&self, name: &str) -> Result<Option<LabelType>, HostError>;

    /// Creates a room filling `region`. Fails with
    /// [`HostError::RoomRejected`] when the region cannot hold a room.
    fn create_room(&mut self, region: &EnclosedRegion, name: &str) -> Result<Room, HostError>;

    fn set_room_parameter(&mut self, room: RoomId, name: &str, value: &str)
        -> Result<(), HostError>;

    /// Whether `room` already carries a tag on `view`.
    fn has_tag(&self, room: RoomId, view: ViewId) -> Result<bool, HostError>;

    fn create_tag(
        &mut self,
        room: RoomId,
        anchor: Point2D,
        view: ViewId,
        label_type: LabelTypeId,
    ) -> Result<Tag, HostError>;

    fn begin_unit_of_work(&mut self, description: &str) -> Result<(), HostError>;

    fn commit_unit_of_work(&mut self) -> Result<(), HostError>;

    /// Discards every mutation since the matching begin. A no-op when no unit
    /// of work is open.
    fn abort_unit_of_work(&mut self);
}

/// One entry of a modal choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOption<'a> {
    pub label: &'a str,
    pub detail: Option<&'a str>,
}

impl<'a> ChoiceOption<'a> {
    pub const fn new(label: &'a str, detail: Option<&'a str>) -> Self {
        Self { label, detail }
    }
}

/// User interaction provided by the host.
pub trait HostUi {
    /// Shows a blocking choice and returns the selected option index, or
    /// `None` when the user dismissed the prompt.
    fn prompt_choice(
        &mut self,
        title: &str,
        question: &str,
        options: &[ChoiceOption<'_>],
    ) -> Option<usize>;

    /// Shows a non-blocking notice.
    fn report(&mut self, title: &str, message: &str);
}

/// An open, all-or-nothing mutation scope on a host.
///
/// Dropping the guard without calling [`UnitOfWork::commit`] aborts the unit
/// of work, so every exit path releases it.
pub struct UnitOfWork<'h, H: HostModel + ?Sized> {
    host: &'h mut H,
    description: String,
    open: bool,
}

impl<'h, H: HostModel + ?Sized> UnitOfWork<'h, H> {
    /// Opens a unit of work on `host`.
    pub fn begin(host: &'h mut H, description: impl Into<String>) -> Result<Self, HostError> {
        let description = description.into();
        host.begin_unit_of_work(&description)?;
        tracing::debug!(description = %description, "Unit of work opened");
        Ok(Self {
            host,
            description,
            open: true,
        })
    }

    /// The host, for mutations inside this unit of work.
    pub fn host(&mut self) -> &mut H {
        &mut *self.host
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Persists every mutation made inside this unit of work.
    pub fn commit(mut self) -> Result<(), HostError> {
        self.open = false;
        match self.host.commit_unit_of_work() {
            Ok(()) => {
                tracing::debug!(description = %self.description, "Unit of work committed");
                Ok(())
            }
            Err(err) => {
                self.host.abort_unit_of_work();
                tracing::warn!(description = %self.description, error = %err, "Commit failed, unit of work discarded");
                Err(err)
            }
        }
    }
}

impl<H: HostModel + ?Sized> Drop for UnitOfWork<'_, H> {
    fn drop(&mut self) {
        if self.open {
            self.host.abort_unit_of_work();
            tracing::warn!(description = %self.description, "Unit of work dropped without commit, discarded");
        }
    }
}
