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

//! Dialog-based front end for the Apple Health to GPX converter.
//!
//! The user repeatedly picks an export archive. Every pick is converted right
//! away and the outcome is shown in a message box. Cancelling the file picker
//! exits.

use std::path::{Path, PathBuf};

use health_gpx_export::{pipeline, Error, Report};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const PICKER_TITLE: &str = "Select Apple Health ZIP Export";

/// One interactive session, alive from start-up until the user exits.
#[derive(Debug, Default)]
struct Session {
    /// Directory of the last picked archive, offered again on the next pick.
    last_dir: Option<PathBuf>,
}

impl Session {
    fn run(mut self) {
        while let Some(archive) = self.pick_archive() {
            self.last_dir = archive.parent().map(Path::to_path_buf);
            let outcome = pipeline::run(&archive);
            notify(&outcome);
        }
        info!("exiting");
    }

    /// Show the file picker. `None` means the user wants to exit.
    fn pick_archive(&self) -> Option<PathBuf> {
        let mut dialog = FileDialog::new()
            .set_title(PICKER_TITLE)
            .add_filter("ZIP Files", &["zip"]);
        if let Some(ref dir) = self.last_dir {
            dialog = dialog.set_directory(dir);
        }
        dialog.pick_file()
    }
}

/// Show the outcome of one conversion in a modal message box.
fn notify(outcome: &Result<Report, Error>) {
    let (level, title, description) = match outcome {
        Ok(report) => (MessageLevel::Info, "Success", report.message()),
        Err(err) => {
            error!("conversion failed: {err}");
            (MessageLevel::Error, "Error", err.to_string())
        }
    };

    MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    Session::default().run();
}
