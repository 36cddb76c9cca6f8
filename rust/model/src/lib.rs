// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # RoomTag Model
//!
//! An in-memory building model that implements [`roomtag_core::HostModel`].
//!
//! Levels, phases, plan views, label types and wall centerlines are authored
//! up front or loaded from a JSON model file. Enclosed regions are computed
//! on demand by tracing the planar graph formed by the walls of a level; see
//! [`circuits`].
//!
//! ```rust,ignore
//! use roomtag_model::{Document, ScriptedUi};
//!
//! let mut doc = Document::load("house.json")?;
//! let mut ui = ScriptedUi::new([Some(1), Some(1)]);
//! roomtag_core::Orchestrator::new(&config).run(&mut doc, &mut ui)?;
//! doc.save("house.json")?;
//! ```

pub mod circuits;
pub mod document;
pub mod error;
pub mod spatial;
pub mod ui;

pub use circuits::{detect_circuits, Circuit, Segment};
pub use document::{
    Document, ModelSettings, UnitOfWorkRecord, Wall, DEFAULT_VERTEX_TOLERANCE,
};
pub use error::{ModelError, Result};
pub use spatial::VertexGrid;
pub use ui::{Notice, ScriptedUi};
