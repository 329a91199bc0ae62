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

//! Library for turning an [Apple Health](https://www.apple.com/ios/health/)
//! export archive into [GPX](https://www.topografix.com/gpx.asp) files.
//!
//! The export archive is unpacked with [`archive::extract`], the contained
//! `export.xml` is scanned by [`workout::convert`], and one GPX file is
//! written per running workout. [`pipeline::run`] chains both steps the way
//! the front ends use them.
//!
//! The written GPX files only carry the workout's start time. No track points
//! are taken over from the export.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub mod archive;
pub mod pipeline;
pub mod workout;

pub use pipeline::{run, Layout, Report};

/// Error returned from the operations of this crate.
///
/// Errors of the underlying ZIP and XML libraries are passed through with
/// their own message.
#[derive(Error, Debug)]
pub enum Error {
    /// The export archive does not exist.
    #[error("The ZIP file '{}' does not exist.", .0.display())]
    MissingArchive(PathBuf),
    /// The export document was not found.
    #[error("The XML file '{}' does not exist.", .0.display())]
    MissingDocument(PathBuf),
    /// The archive is corrupt or uses an unsupported feature.
    #[error(transparent)]
    Archive(#[from] zip::result::ZipError),
    /// The export document is not well-formed XML.
    #[error(transparent)]
    Document(#[from] xml::reader::Error),
    /// Writing GPX failed.
    #[error("writing GPX failed: {0}")]
    Emit(#[from] xml::writer::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Whether the user pointed at an input which does not exist.
    pub fn is_missing_input(&self) -> bool {
        matches!(self, Error::MissingArchive(_) | Error::MissingDocument(_))
    }
}
