// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end tagging runs against an in-memory document.

use roomtag_core::{
    AutoPlaceRooms, Error, HostModel, LevelId, Orchestrator, Point2D, RunOptions, RunPreset, Scope,
    TaggingConfig, ViewId,
};
use roomtag_model::{Document, ScriptedUi};

const FLOOR: &str = "Floor_Number";

struct House {
    doc: Document,
    basement: LevelId,
    ground: LevelId,
    upper: LevelId,
    ground_plan: ViewId,
}

/// Three stories with one furnished room each and a plan per story.
fn house() -> House {
    let mut doc = Document::new("House");
    doc.add_phase("Existing");
    doc.add_phase("New Construction");
    doc.add_label_type("Room Tag Floor_Number");

    let upper = doc.add_level("Level 2", 3000.0);
    let ground = doc.add_level("Level 1", 0.0);
    let basement = doc.add_level("Basement", -3000.0);

    let mut ground_plan = ViewId(0);
    for level in [basement, ground, upper] {
        let name = doc
            .levels()
            .iter()
            .find(|l| l.id == level)
            .map(|l| l.name.clone())
            .unwrap();
        let plan = doc.add_plan_view(name, level);
        if level == ground {
            ground_plan = plan;
        }
        doc.add_rectangle(level, Point2D::new(0.0, 0.0), Point2D::new(6.0, 4.0));
        doc.add_room(level, "Hall", Some(Point2D::new(3.0, 2.0)));
    }
    doc.add_view_template("Presentation", ground);
    doc.set_active_view(Some(ground_plan));

    House {
        doc,
        basement,
        ground,
        upper,
        ground_plan,
    }
}

fn whole_project(auto_place_rooms: AutoPlaceRooms) -> RunOptions {
    RunOptions {
        scope: Scope::WholeProject,
        auto_place_rooms,
    }
}

fn floor_of(doc: &Document, level: LevelId) -> Vec<String> {
    doc.rooms()
        .iter()
        .filter(|r| r.level == level)
        .map(|r| r.parameter(FLOOR).unwrap_or("").to_string())
        .collect()
}

#[test]
fn floors_count_from_the_zero_elevation_level() {
    let House {
        mut doc,
        basement,
        ground,
        upper,
        ..
    } = house();
    let config = TaggingConfig::default();
    let mut ui = ScriptedUi::default();

    let summary = Orchestrator::new(&config)
        .execute(&mut doc, &mut ui, whole_project(AutoPlaceRooms::Skip))
        .unwrap();

    assert_eq!(summary.tags_placed, 3);
    assert!(summary.failures.is_empty());
    assert_eq!(floor_of(&doc, basement), ["0"]);
    assert_eq!(floor_of(&doc, ground), ["1"]);
    assert_eq!(floor_of(&doc, upper), ["2"]);
    assert_eq!(
        ui.notice("Reference level"),
        Some("Floor 1 is taken from level Level 1")
    );
    assert_eq!(ui.notice("Tag placement complete"), Some("Tags placed: 3"));
}

#[test]
fn reference_falls_back_to_the_suffix_match() {
    let mut doc = Document::new("Offices");
    doc.add_phase("New Construction");
    doc.add_label_type("Room Tag Floor_Number");
    let lower = doc.add_level("Office 0", 150.0);
    let first = doc.add_level("Office 1", 3150.0);
    let plan = doc.add_plan_view("Office 1", first);
    doc.add_plan_view("Office 0", lower);
    doc.add_room(first, "Open space", Some(Point2D::new(1.0, 1.0)));
    doc.add_room(lower, "Lobby", Some(Point2D::new(1.0, 1.0)));
    doc.set_active_view(Some(plan));

    let config = TaggingConfig::default();
    let mut ui = ScriptedUi::default();
    let summary = Orchestrator::new(&config)
        .run_with(
            &mut doc,
            &mut ui,
            RunPreset {
                scope: Some(Scope::WholeProject),
                auto_place_rooms: Some(AutoPlaceRooms::Skip),
            },
        )
        .unwrap();

    assert_eq!(summary.tags_placed, 2);
    assert_eq!(floor_of(&doc, first), ["1"]);
    assert_eq!(floor_of(&doc, lower), ["0"]);
}

#[test]
fn missing_reference_level_leaves_the_model_untouched() {
    let mut doc = Document::new("Offices");
    doc.add_phase("New Construction");
    doc.add_label_type("Room Tag Floor_Number");
    let level = doc.add_level("Ground", 150.0);
    doc.add_plan_view("Ground", level);
    doc.add_room(level, "Lobby", Some(Point2D::new(1.0, 1.0)));
    let before = doc.to_json().unwrap();

    let config = TaggingConfig::default();
    let mut ui = ScriptedUi::default();
    let err = Orchestrator::new(&config)
        .run_with(
            &mut doc,
            &mut ui,
            RunPreset {
                scope: Some(Scope::WholeProject),
                auto_place_rooms: Some(AutoPlaceRooms::Run),
            },
        )
        .unwrap_err();

    assert!(matches!(err, Error::ReferenceLevelNotFound { .. }));
    assert!(ui.notice("Room tagging failed").is_some());
    assert_eq!(doc.to_json().unwrap(), before);
    assert!(doc.history().is_empty());
}

#[test]
fn only_regions_above_the_threshold_get_rooms() {
    let mut doc = Document::new("Annex");
    doc.add_phase("New Construction");
    doc.add_label_type("Room Tag Floor_Number");
    let level = doc.add_level("Level 1", 0.0);
    let plan = doc.add_plan_view("Level 1", level);
    doc.set_active_view(Some(plan));
    doc.add_rectangle(level, Point2D::new(0.0, 0.0), Point2D::new(2.0, 4.0));
    doc.add_rectangle(level, Point2D::new(10.0, 0.0), Point2D::new(15.0, 5.0));

    let config = TaggingConfig::default();
    // Current view, place rooms.
    let mut ui = ScriptedUi::new([Some(0), Some(1)]);
    let summary = Orchestrator::new(&config).run(&mut doc, &mut ui).unwrap();

    assert_eq!(summary.rooms_created, 1);
    assert_eq!(summary.tags_placed, 1);
    assert_eq!(doc.rooms().len(), 1);

    let room = &doc.rooms()[0];
    assert_eq!(room.name, "0");
    assert_eq!(room.parameter(FLOOR), Some("1"));
    let location = room.location.unwrap();
    assert!(location.x > 10.0 && location.x < 15.0);
    assert_eq!(doc.tags()[0].anchor, location);
    assert_eq!(
        ui.questions(),
        ["Where should tags be placed?", "Place rooms automatically?"]
    );
}

#[test]
fn rooms_without_location_are_numbered_but_not_tagged() {
    let mut doc = Document::new("Flat");
    doc.add_phase("New Construction");
    doc.add_label_type("Room Tag Floor_Number");
    let level = doc.add_level("Level 1", 0.0);
    let plan = doc.add_plan_view("Level 1", level);
    doc.set_active_view(Some(plan));
    doc.add_room(level, "Kitchen", Some(Point2D::new(1.0, 1.0)));
    let unplaced = doc.add_room(level, "Store", None);
    doc.add_room(level, "Bath", Some(Point2D::new(4.0, 1.0)));

    let config = TaggingConfig::default();
    let mut ui = ScriptedUi::default();
    let summary = Orchestrator::new(&config)
        .execute(
            &mut doc,
            &mut ui,
            RunOptions {
                scope: Scope::SingleView,
                auto_place_rooms: AutoPlaceRooms::Skip,
            },
        )
        .unwrap();

    assert_eq!(summary.tags_placed, 2);
    assert_eq!(floor_of(&doc, level), ["1", "1", "1"]);
    assert!(!doc.has_tag(unplaced, plan).unwrap());
}

#[test]
fn rerun_adds_nothing() {
    let House { mut doc, .. } = house();
    // A second, empty room on the ground floor.
    let ground = doc
        .levels()
        .iter()
        .find(|l| l.name == "Level 1")
        .map(|l| l.id)
        .unwrap();
    doc.add_rectangle(ground, Point2D::new(6.0, 0.0), Point2D::new(12.0, 4.0));

    let config = TaggingConfig::default();
    let orchestrator = Orchestrator::new(&config);

    let first = orchestrator
        .execute(&mut doc, &mut ScriptedUi::default(), whole_project(AutoPlaceRooms::Run))
        .unwrap();
    assert_eq!(first.rooms_created, 1);
    assert_eq!(first.tags_placed, 4);

    let second = orchestrator
        .execute(&mut doc, &mut ScriptedUi::default(), whole_project(AutoPlaceRooms::Run))
        .unwrap();
    assert_eq!(second.rooms_created, 0);
    assert_eq!(second.tags_placed, 0);
    assert_eq!(doc.rooms().len(), 4);
    assert_eq!(doc.tags().len(), 4);
}

#[test]
fn duplicate_tags_when_the_check_is_disabled() {
    let House { mut doc, .. } = house();
    let config = TaggingConfig {
        skip_tagged_rooms: false,
        ..TaggingConfig::default()
    };
    let orchestrator = Orchestrator::new(&config);

    for _ in 0..2 {
        orchestrator
            .execute(&mut doc, &mut ScriptedUi::default(), whole_project(AutoPlaceRooms::Skip))
            .unwrap();
    }
    assert_eq!(doc.tags().len(), 6);
}

#[test]
fn single_view_needs_a_plan() {
    let House {
        mut doc,
        ground_plan,
        ..
    } = house();
    let config = TaggingConfig::default();
    let options = RunOptions {
        scope: Scope::SingleView,
        auto_place_rooms: AutoPlaceRooms::Skip,
    };

    doc.set_active_view(None);
    let err = Orchestrator::new(&config)
        .execute(&mut doc, &mut ScriptedUi::default(), options)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidActiveView));
    assert!(doc.tags().is_empty());

    doc.set_active_view(Some(ground_plan));
    let summary = Orchestrator::new(&config)
        .execute(&mut doc, &mut ScriptedUi::default(), options)
        .unwrap();
    assert_eq!(summary.tags_placed, 1);
    assert!(doc.tags().iter().all(|t| t.view == ground_plan));
}

#[test]
fn templates_are_never_tagged() {
    let House {
        mut doc, ground, ..
    } = house();
    let config = TaggingConfig::default();
    Orchestrator::new(&config)
        .execute(&mut doc, &mut ScriptedUi::default(), whole_project(AutoPlaceRooms::Skip))
        .unwrap();

    let templates: Vec<ViewId> = doc
        .plan_views()
        .iter()
        .filter(|v| v.is_template && v.level == ground)
        .map(|v| v.id)
        .collect();
    assert_eq!(templates.len(), 1);
    assert!(doc.tags().iter().all(|t| !templates.contains(&t.view)));
}

#[test]
fn synthesis_sees_walls_of_the_last_phase() {
    let mut doc = Document::new("Renovation");
    doc.add_phase("Existing");
    let new = doc.add_phase("New Construction");
    doc.add_label_type("Room Tag Floor_Number");
    let level = doc.add_level("Level 1", 0.0);
    doc.add_plan_view("Level 1", level);
    doc.add_rectangle(level, Point2D::new(0.0, 0.0), Point2D::new(10.0, 5.0));
    doc.add_wall_in_phase(level, Point2D::new(4.0, 0.0), Point2D::new(4.0, 5.0), new);

    let config = TaggingConfig::default();
    let summary = Orchestrator::new(&config)
        .execute(&mut doc, &mut ScriptedUi::default(), whole_project(AutoPlaceRooms::Run))
        .unwrap();

    assert_eq!(summary.rooms_created, 2);
    let mut names: Vec<&str> = doc.rooms().iter().map(|r| r.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["0", "1"]);
}

#[test]
fn committed_work_survives_a_save() {
    let House { mut doc, upper, .. } = house();
    let config = TaggingConfig::default();
    Orchestrator::new(&config)
        .execute(&mut doc, &mut ScriptedUi::default(), whole_project(AutoPlaceRooms::Skip))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("house.json");
    doc.save(&path).unwrap();
    let loaded = Document::load(&path).unwrap();

    assert_eq!(loaded.tags(), doc.tags());
    assert_eq!(floor_of(&loaded, upper), ["2"]);
    assert!(doc.history().iter().all(|record| record.committed));
    assert_eq!(doc.history().len(), 3);
}
