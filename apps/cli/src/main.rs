// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RoomTag CLI - floor numbering and room tagging for JSON building models.
//!
//! Loads a model file, asks where to tag and whether to place rooms (unless
//! given as flags), runs the tagging pipeline and writes the model back.
//!
//! Defaults come from `ROOMTAG_*` environment variables and are overridden by
//! flags. Logging goes to stderr and honours `RUST_LOG`.

use anyhow::Context;
use clap::Parser;

use roomtag_core::{Orchestrator, TaggingConfig};
use roomtag_model::Document;

mod args;
mod terminal;

use args::Args;
use terminal::TerminalUi;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,roomtag_core=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = TaggingConfig::from_env();
    args.apply(&mut config);

    tracing::info!(
        model = %args.model.display(),
        reference_suffix = %config.reference_suffix,
        area_threshold = config.area_threshold,
        label_type = %config.label_type_name,
        floor_parameter = %config.floor_number_parameter,
        skip_tagged_rooms = config.skip_tagged_rooms,
        "Starting RoomTag"
    );

    let mut document = Document::load(&args.model)
        .with_context(|| format!("failed to load model {}", args.model.display()))?;
    let mut ui = TerminalUi::stdio();

    let summary = Orchestrator::new(&config).run_with(&mut document, &mut ui, args.preset())?;

    for failure in &summary.failures {
        eprintln!("warning: {failure}");
    }

    if args.dry_run {
        tracing::info!("Dry run, model not written");
    } else {
        let output = args.output_path();
        document
            .save(output)
            .with_context(|| format!("failed to write model {}", output.display()))?;
    }

    println!(
        "Rooms created: {}, tags placed: {}, failures: {}",
        summary.rooms_created,
        summary.tags_placed,
        summary.failures.len()
    );
    Ok(())
}
