// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor-number tagging of rooms on a plan view.

use crate::error::HostError;
use crate::floor_number::FloorNumberResolver;
use crate::host::{HostModel, UnitOfWork};
use crate::types::{LabelType, Level, PlanView};

/// Writes floor numbers onto rooms and tags them on a plan view.
#[derive(Debug, Clone, Copy)]
pub struct TagPlacer<'a> {
    resolver: FloorNumberResolver<'a>,
    floor_number_parameter: &'a str,
    skip_tagged_rooms: bool,
}

impl<'a> TagPlacer<'a> {
    pub fn new(resolver: FloorNumberResolver<'a>, floor_number_parameter: &'a str) -> Self {
        Self {
            resolver,
            floor_number_parameter,
            skip_tagged_rooms: true,
        }
    }

    /// When disabled, a room that already carries a tag on the view receives
    /// another one.
    pub fn skip_tagged_rooms(mut self, skip: bool) -> Self {
        self.skip_tagged_rooms = skip;
        self
    }

    /// Tags every room of `level` on `view` and returns the number of tags
    /// placed.
    ///
    /// Every room gets its floor-number parameter written, including rooms
    /// without a location, which are never tagged. A level without rooms
    /// returns 0 and opens no unit of work.
    pub fn place<H: HostModel + ?Sized>(
        &self,
        host: &mut H,
        view: &PlanView,
        level: &Level,
        label_type: &LabelType,
    ) -> Result<usize, HostError> {
        let rooms = host.list_rooms(level.id)?;
        if rooms.is_empty() {
            tracing::debug!(view = %view.name, level = %level.name, "No rooms on plan");
            return Ok(0);
        }

        let floor = self.resolver.resolve(level);
        let mut uow = UnitOfWork::begin(host, format!("Place tags on plan {}", view.name))?;
        let mut placed = 0usize;

        for room in &rooms {
            if let Err(err) =
                uow.host()
                    .set_room_parameter(room.id, self.floor_number_parameter, &floor)
            {
                tracing::warn!(room = %room.id, parameter = self.floor_number_parameter, error = %err, "Floor number not written");
            }

            let Some(anchor) = room.location else {
                tracing::debug!(room = %room.id, name = %room.name, "Room has no location, not tagged");
                continue;
            };

            if self.skip_tagged_rooms {
                match uow.host().has_tag(room.id, view.id) {
                    Ok(false) => {}
                    Ok(true) => {
                        tracing::debug!(room = %room.id, view = %view.name, "Room already tagged");
                        continue;
                    }
                    Err(err) => {
                        tracing::warn!(room = %room.id, view = %view.name, error = %err, "Tag lookup failed, room not tagged");
                        continue;
                    }
                }
            }

            match uow.host().create_tag(room.id, anchor, view.id, label_type.id) {
                Ok(_) => placed += 1,
                Err(err) => {
                    tracing::warn!(room = %room.id, view = %view.name, error = %err, "Tag creation rejected");
                }
            }
        }

        uow.commit()?;

        tracing::info!(view = %view.name, floor = %floor, rooms = rooms.len(), placed, "Placed tags");
        Ok(placed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_FLOOR_NUMBER_PARAMETER;
    use crate::levels::LevelIndex;
    use crate::test_support::FakeHost;
    use crate::types::{LabelTypeId, LevelId, Point2D};

    struct Fixture {
        host: FakeHost,
        index: LevelIndex,
        view: PlanView,
        label: LabelType,
    }

    fn fixture() -> Fixture {
        let mut host = FakeHost::with_defaults();
        host.add_level(1, "Basement", -3000.0);
        let ground = host.add_level(2, "Level 1", 0.0);
        let view = host.add_view(10, "Level 1", ground.id, false);
        let index = LevelIndex::resolve(host.levels.clone(), " 1").unwrap();
        Fixture {
            host,
            index,
            view,
            label: LabelType {
                id: LabelTypeId(900),
                name: "Room Tag Floor_Number".into(),
            },
        }
    }

    #[test]
    fn rooms_without_location_get_floor_number_but_no_tag() {
        let Fixture {
            mut host,
            index,
            view,
            label,
        } = fixture();
        let a = host.add_room(100, view.level, Some(Point2D::new(1.0, 1.0)));
        let b = host.add_room(101, view.level, None);
        let c = host.add_room(102, view.level, Some(Point2D::new(5.0, 1.0)));
        let level = index.level(view.level).unwrap().clone();

        let placer = TagPlacer::new(FloorNumberResolver::new(&index), DEFAULT_FLOOR_NUMBER_PARAMETER);
        let placed = placer.place(&mut host, &view, &level, &label).unwrap();

        assert_eq!(placed, 2);
        for room in [a, b, c] {
            assert_eq!(host.room(room).parameter(DEFAULT_FLOOR_NUMBER_PARAMETER), Some("1"));
        }
        assert!(host.tags.iter().all(|t| t.room != b));
        let anchors: Vec<Point2D> = host.tags.iter().map(|t| t.anchor).collect();
        assert_eq!(anchors, vec![Point2D::new(1.0, 1.0), Point2D::new(5.0, 1.0)]);
        assert!(host.tags.iter().all(|t| t.view == view.id && t.label_type == label.id));
    }

    #[test]
    fn empty_level_returns_zero_without_unit_of_work() {
        let Fixture {
            mut host,
            index,
            view,
            label,
        } = fixture();
        let level = index.level(view.level).unwrap().clone();

        let placer = TagPlacer::new(FloorNumberResolver::new(&index), DEFAULT_FLOOR_NUMBER_PARAMETER);
        assert_eq!(placer.place(&mut host, &view, &level, &label).unwrap(), 0);
        assert!(host.committed.is_empty());
        assert!(host.aborted.is_empty());
    }

    #[test]
    fn basement_rooms_get_floor_zero() {
        let Fixture {
            mut host,
            index,
            label,
            ..
        } = fixture();
        let basement_view = host.add_view(11, "Basement", LevelId(1), false);
        let room = host.add_room(100, LevelId(1), Some(Point2D::new(0.0, 0.0)));
        let level = index.level(LevelId(1)).unwrap().clone();

        let placer = TagPlacer::new(FloorNumberResolver::new(&index), "Storey");
        placer.place(&mut host, &basement_view, &level, &label).unwrap();

        assert_eq!(host.room(room).parameter("Storey"), Some("0"));
    }

    #[test]
    fn rerun_does_not_duplicate_tags() {
        let Fixture {
            mut host,
            index,
            view,
            label,
        } = fixture();
        host.add_room(100, view.level, Some(Point2D::new(1.0, 1.0)));
        let level = index.level(view.level).unwrap().clone();
        let placer = TagPlacer::new(FloorNumberResolver::new(&index), DEFAULT_FLOOR_NUMBER_PARAMETER);

        assert_eq!(placer.place(&mut host, &view, &level, &label).unwrap(), 1);
        assert_eq!(placer.place(&mut host, &view, &level, &label).unwrap(), 0);
        assert_eq!(host.tags.len(), 1);
    }

    #[test]
    fn failed_tag_lookup_skips_only_that_room() {
        let Fixture {
            mut host,
            index,
            view,
            label,
        } = fixture();
        let a = host.add_room(100, view.level, Some(Point2D::new(1.0, 1.0)));
        let b = host.add_room(101, view.level, Some(Point2D::new(3.0, 1.0)));
        let c = host.add_room(102, view.level, Some(Point2D::new(5.0, 1.0)));
        host.failing_tag_queries.insert(b);
        let level = index.level(view.level).unwrap().clone();

        let placer = TagPlacer::new(FloorNumberResolver::new(&index), DEFAULT_FLOOR_NUMBER_PARAMETER);
        let placed = placer.place(&mut host, &view, &level, &label).unwrap();

        assert_eq!(placed, 2);
        for room in [a, b, c] {
            assert_eq!(host.room(room).parameter(DEFAULT_FLOOR_NUMBER_PARAMETER), Some("1"));
        }
        let tagged: Vec<_> = host.tags.iter().map(|t| t.room).collect();
        assert_eq!(tagged, vec![a, c]);
        assert_eq!(host.committed, vec!["Place tags on plan Level 1".to_string()]);
    }

    #[test]
    fn rerun_duplicates_tags_when_check_is_disabled() {
        let Fixture {
            mut host,
            index,
            view,
            label,
        } = fixture();
        host.add_room(100, view.level, Some(Point2D::new(1.0, 1.0)));
        let level = index.level(view.level).unwrap().clone();
        let placer = TagPlacer::new(FloorNumberResolver::new(&index), DEFAULT_FLOOR_NUMBER_PARAMETER)
            .skip_tagged_rooms(false);

        placer.place(&mut host, &view, &level, &label).unwrap();
        placer.place(&mut host, &view, &level, &label).unwrap();
        assert_eq!(host.tags.len(), 2);
    }
}
