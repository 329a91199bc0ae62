// Copyright 2024 Viktor Reusch
//
// This file is part of health_gpx_export.
//
// health_gpx_export is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// health_gpx_export is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License
// for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with health_gpx_export. If not, see <https://www.gnu.org/licenses/>.

//! This is a very simple command-line interface for the Apple Health to GPX
//! converter.

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use health_gpx_export::{pipeline, Layout};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
/// Convert the running workouts of an Apple Health export to GPX files
struct Args {
    /// Apple Health export archive
    #[clap(value_name = "ZIP")]
    archive: PathBuf,

    /// Unpack the archive here instead of next to it
    #[clap(long, value_name = "DIR")]
    extract_dir: Option<PathBuf>,

    /// Prefix of the written GPX files
    #[clap(long, value_name = "PREFIX")]
    output_prefix: Option<PathBuf>,
}

impl Args {
    fn layout(&self) -> Layout {
        let mut layout = Layout::for_archive(&self.archive);
        if let Some(ref dir) = self.extract_dir {
            layout = layout.with_extract_dir(dir);
        }
        if let Some(ref prefix) = self.output_prefix {
            layout = layout.with_output_prefix(prefix);
        }
        layout
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match pipeline::run_with_layout(&args.archive, &args.layout()) {
        Ok(report) => {
            println!("{}", report.message());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Conversion failed with: {err}");
            ExitCode::FAILURE
        }
    }
}
