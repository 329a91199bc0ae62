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

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use health_gpx_export::{run, Error};
use tempfile::tempdir;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<HealthData locale="en_US">
 <Workout workoutActivityType="HKWorkoutActivityTypeCycling" startDate="2023-04-30T18:00:00Z"/>
 <Workout workoutActivityType="HKWorkoutActivityTypeRunning" startDate="2023-05-01T08:00:00Z"/>
</HealthData>
"#;

fn write_archive(path: &Path, export: &str) {
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    writer
        .add_directory("workout-routes/", SimpleFileOptions::default())
        .unwrap();
    writer
        .start_file("export.xml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(export.as_bytes()).unwrap();
    writer.finish().unwrap();
}

/// Log output collected by a test subscriber.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn gpx_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".gpx"))
        .collect();
    names.sort();
    names
}

#[test]
fn converts_single_run() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("export.zip");
    write_archive(&archive, EXPORT);

    let report = run(&archive).unwrap();

    assert_eq!(report.output_dir, dir.path());
    assert_eq!(gpx_files(dir.path()), ["converted_run_run_2.gpx"]);
    assert!(dir.path().join("extracted_files/export.xml").is_file());
    assert!(dir.path().join("extracted_files/workout-routes").is_dir());

    let content = fs::read_to_string(dir.path().join("converted_run_run_2.gpx")).unwrap();
    assert!(content.contains("<time>2023-05-01T08:00:00Z</time>"));
    let gpx = gpx::read(content.as_bytes()).unwrap();
    assert_eq!(gpx.tracks.len(), 1);
    assert_eq!(gpx.tracks[0].segments.len(), 1);
    assert!(gpx.tracks[0].segments[0].points.is_empty());
}

#[test]
fn rerun_overwrites_output() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("export.zip");
    write_archive(&archive, EXPORT);

    let first = run(&archive).unwrap();
    let before = fs::read(&first.tracks[0]).unwrap();
    let second = run(&archive).unwrap();

    assert_eq!(first, second);
    assert_eq!(gpx_files(dir.path()), ["converted_run_run_2.gpx"]);
    assert_eq!(fs::read(&second.tracks[0]).unwrap(), before);
}

#[test]
fn export_without_workouts() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("export.zip");
    write_archive(&archive, "<HealthData locale=\"en_US\"/>");

    let report = run(&archive).unwrap();

    assert!(report.tracks.is_empty());
    assert!(gpx_files(dir.path()).is_empty());
}

#[test]
fn missing_archive_still_creates_extract_dir() {
    let dir = tempdir().unwrap();

    let err = run(&dir.path().join("export.zip")).unwrap_err();

    assert!(matches!(err, Error::MissingArchive(_)));
    assert!(dir.path().join("extracted_files").is_dir());
}

#[test]
fn archive_without_export_document() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("export.zip");
    let mut writer = ZipWriter::new(File::create(&archive).unwrap());
    writer
        .start_file("readme.txt", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"nothing here").unwrap();
    writer.finish().unwrap();

    let err = run(&archive).unwrap_err();

    assert!(matches!(err, Error::MissingDocument(_)));
    assert!(err.to_string().starts_with("The XML file '"));
}

#[test]
fn logs_one_info_line_per_written_file() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("export.zip");
    write_archive(&archive, EXPORT);
    let captured = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .with_writer(captured.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || run(&archive).unwrap());

    let log = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    let lines: Vec<_> = log.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("GPX file saved"));
    assert!(lines[0].contains("converted_run_run_2.gpx"));
}
