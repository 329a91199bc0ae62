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

//! Running the whole conversion for one export archive.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{archive, workout, Error};

/// Directory next to the archive which receives the unpacked export.
pub const EXTRACT_DIR_NAME: &str = "extracted_files";
/// Name of the export document inside the extraction directory.
pub const DOCUMENT_NAME: &str = "export.xml";
/// Prefix of the GPX files written next to the archive.
pub const OUTPUT_PREFIX_NAME: &str = "converted_run";

/// Locations used while converting one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Directory the archive is unpacked to.
    pub extract_dir: PathBuf,
    /// Export document read after unpacking.
    pub document: PathBuf,
    /// Prefix of the written GPX files.
    pub output_prefix: PathBuf,
}

impl Layout {
    /// Place everything next to `archive`.
    pub fn for_archive(archive: &Path) -> Self {
        let parent = archive.parent().unwrap_or_else(|| Path::new(""));
        let extract_dir = parent.join(EXTRACT_DIR_NAME);
        Layout {
            document: extract_dir.join(DOCUMENT_NAME),
            extract_dir,
            output_prefix: parent.join(OUTPUT_PREFIX_NAME),
        }
    }

    /// Unpack to `dir` and read the export document from there.
    pub fn with_extract_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extract_dir = dir.into();
        self.document = self.extract_dir.join(DOCUMENT_NAME);
        self
    }

    pub fn with_output_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.output_prefix = prefix.into();
        self
    }

    /// Directory which receives the GPX files.
    pub fn output_dir(&self) -> &Path {
        match self.output_prefix.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub output_dir: PathBuf,
    /// Written GPX files in document order.
    pub tracks: Vec<PathBuf>,
}

impl Report {
    /// Message shown to the user after a successful run.
    pub fn message(&self) -> String {
        format!(
            "GPX files created successfully in:\n{}",
            self.output_dir.display()
        )
    }
}

/// Convert the export archive at `archive` using [`Layout::for_archive`].
pub fn run(archive: &Path) -> Result<Report, Error> {
    run_with_layout(archive, &Layout::for_archive(archive))
}

/// Unpack `archive` and convert its export document according to `layout`.
///
/// The extraction directory is created before the archive is looked at, so
/// it exists even if the archive turns out to be missing. Running twice
/// overwrites the files of the previous run.
pub fn run_with_layout(archive: &Path, layout: &Layout) -> Result<Report, Error> {
    fs::create_dir_all(&layout.extract_dir)?;
    archive::extract(archive, &layout.extract_dir)?;
    let tracks = workout::convert(&layout.document, &layout.output_prefix)?;
    debug!(
        "converted {} running workouts from {}",
        tracks.len(),
        archive.display()
    );

    Ok(Report {
        output_dir: layout.output_dir().to_path_buf(),
        tracks,
    })
}
