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

//! Conversion of workouts in the Apple Health `export.xml` to GPX.
//!
//! Only the root's direct `Workout` children are looked at. A workout counts
//! as a run if its `workoutActivityType` is [`RUNNING`]. Output files are
//! numbered by the workout's position among *all* workouts, so the numbers of
//! the written files have gaps wherever other activities sit in between.

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use xml::common::XmlVersion;
use xml::reader::{self, EventReader};
use xml::writer::{self, EmitterConfig};

use crate::Error;

/// Activity type of running workouts.
pub const RUNNING: &str = "HKWorkoutActivityTypeRunning";
/// Namespace which may be bound to the elements of the export document.
pub const HEALTH_NS: &str = "http://www.apple.com/health";

const WORKOUT_TAG: &str = "Workout";
const ACTIVITY_TYPE_ATTR: &str = "workoutActivityType";
const START_DATE_ATTR: &str = "startDate";

/// Namespace of the `<gpx>` tag.
const GPX_NS: &str = "http://www.topografix.com/GPX/1/1";
const GPX_VERSION: &str = "1.1";
const GPX_CREATOR: &str = "Apple Health Export";
/// Name of the single track in every written file.
const TRACK_NAME: &str = "Apple Health Run";

/// The parts of a `Workout` element this crate cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workout {
    pub activity_type: Option<String>,
    /// Kept as written in the export. It is neither parsed nor validated.
    pub start_date: Option<String>,
}

impl Workout {
    pub fn is_running(&self) -> bool {
        self.activity_type.as_deref() == Some(RUNNING)
    }
}

/// Convert the running workouts of the export document at `document`.
///
/// Each run is written to `{prefix}_run_{n}.gpx` where `n` is the 1-based
/// position of the workout among all workouts of the document. The paths of
/// the written files are returned in document order. A document without runs
/// writes nothing and is not an error.
///
/// The whole document is read before the first file is written, so a
/// malformed document leaves no output behind.
pub fn convert(document: &Path, prefix: &Path) -> Result<Vec<PathBuf>, Error> {
    if !document.exists() {
        return Err(Error::MissingDocument(document.to_path_buf()));
    }

    let workouts = read_workouts(BufReader::new(File::open(document)?))?;

    let mut written = vec![];
    for (index, workout) in workouts.iter().enumerate() {
        if !workout.is_running() {
            debug!(
                "skipping workout {} of type {:?}",
                index + 1,
                workout.activity_type
            );
            continue;
        }

        let path = track_path(prefix, index + 1);
        let mut sink = BufWriter::new(File::create(&path)?);
        write_track(workout, &mut sink)?;
        sink.flush()?;
        info!("GPX file saved: {}", path.display());
        written.push(path);
    }

    Ok(written)
}

/// Read all `Workout` elements directly below the root of the export
/// document in `source`.
///
/// Nested `Workout` elements and workouts in foreign namespaces are ignored.
pub fn read_workouts(source: impl Read) -> Result<Vec<Workout>, Error> {
    let mut workouts = vec![];
    let mut depth = 0usize;

    for event in EventReader::new(source) {
        match event? {
            reader::XmlEvent::StartElement {
                name, attributes, ..
            } => {
                depth += 1;
                if depth != 2 || name.local_name != WORKOUT_TAG {
                    continue;
                }
                if !matches!(name.namespace.as_deref(), None | Some(HEALTH_NS)) {
                    continue;
                }

                let mut workout = Workout::default();
                for attribute in attributes {
                    match attribute.name.local_name.as_str() {
                        ACTIVITY_TYPE_ATTR => workout.activity_type = Some(attribute.value),
                        START_DATE_ATTR => workout.start_date = Some(attribute.value),
                        _ => {}
                    }
                }
                workouts.push(workout);
            }
            reader::XmlEvent::EndElement { .. } => depth -= 1,
            _ => {}
        }
    }

    Ok(workouts)
}

/// Write the GPX file for a single `workout` to `sink`.
///
/// The file holds the workout's start date as metadata time and a single
/// track with one empty segment.
///
/// # Example
/// ```
/// # use health_gpx_export::workout::{write_track, Workout};
/// #
/// let workout = Workout {
///     activity_type: Some("HKWorkoutActivityTypeRunning".to_string()),
///     start_date: Some("2023-05-01T08:00:00Z".to_string()),
/// };
/// let mut sink = vec![];
///
/// write_track(&workout, &mut sink).expect("writing GPX failed");
///
/// let gpx = String::from_utf8(sink).expect("GPX data is not valid UTF-8");
/// assert!(gpx.contains(r#"creator="Apple Health Export""#));
/// assert!(gpx.contains("<time>2023-05-01T08:00:00Z</time>"));
/// assert!(gpx.contains("<trkseg"));
/// ```
pub fn write_track(workout: &Workout, sink: impl Write) -> Result<(), Error> {
    let mut writer = EmitterConfig::new()
        .perform_indent(true)
        .create_writer(sink);

    writer.write(writer::XmlEvent::StartDocument {
        version: XmlVersion::Version10,
        encoding: Some("UTF-8"),
        standalone: None,
    })?;
    writer.write(
        writer::XmlEvent::start_element("gpx")
            .attr("version", GPX_VERSION)
            .attr("creator", GPX_CREATOR)
            .default_ns(GPX_NS),
    )?;

    if let Some(ref time) = workout.start_date {
        writer.write(writer::XmlEvent::start_element("metadata"))?;
        writer.write(writer::XmlEvent::start_element("time"))?;
        writer.write(writer::XmlEvent::characters(time))?;
        writer.write(writer::XmlEvent::end_element())?;
        writer.write(writer::XmlEvent::end_element())?;
    }

    writer.write(writer::XmlEvent::start_element("trk"))?;
    writer.write(writer::XmlEvent::start_element("name"))?;
    writer.write(writer::XmlEvent::characters(TRACK_NAME))?;
    writer.write(writer::XmlEvent::end_element())?;
    writer.write(writer::XmlEvent::start_element("trkseg"))?;
    writer.write(writer::XmlEvent::end_element())?;
    writer.write(writer::XmlEvent::end_element())?;
    writer.write(writer::XmlEvent::end_element())?;

    writeln!(writer.into_inner())?;
    Ok(())
}

/// Path of the GPX file for the workout at 1-based `position`.
fn track_path(prefix: &Path, position: usize) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(format!("_run_{position}.gpx"));
    PathBuf::from(name)
}
