// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for room tagging runs and host operations.

use thiserror::Error;

/// Result type for a tagging run.
pub type Result<T> = std::result::Result<T, Error>;

/// Conditions that abort a whole run.
///
/// Every variant except [`Error::Host`] is detected before the first unit of
/// work opens, so a failed run leaves the model untouched.
#[derive(Debug, Error)]
pub enum Error {
    /// No level sits at elevation zero and no level name carries the
    /// first-floor suffix.
    #[error(
        "no level at elevation 0 and no level whose name ends with \"{suffix}\": \
         load or rename the first-floor level"
    )]
    ReferenceLevelNotFound { suffix: String },

    /// Single-view scope was requested but the active view is not a plan.
    #[error("the active view is not a floor plan: open a plan view and run again")]
    InvalidActiveView,

    /// The room tag type is not loaded in the model.
    #[error("room tag type \"{name}\" is not loaded in the model")]
    MissingLabelType { name: String },

    /// The host failed while the run was being prepared.
    #[error("host error: {0}")]
    Host(#[from] HostError),
}

/// Errors reported by a host model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("the model has no construction phases")]
    NoPhases,

    /// The host refused to create a room for an enclosed region.
    #[error("room rejected: {0}")]
    RoomRejected(String),

    /// The host refused to create a tag.
    #[error("tag rejected: {0}")]
    TagRejected(String),

    #[error("unit of work \"{0}\" is still open")]
    UnitOfWorkAlreadyOpen(String),

    #[error("no unit of work is open")]
    NoUnitOfWork,

    #[error("{0}")]
    Other(String),
}
