// Copyright (c) 2023 Franco Solleza, Intel Corporation, Brown University
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Catalog → range resolution and point selection → table emission.

use crate::{
    catalog::{self, SegmentCatalog},
    constants::*,
    dataset,
    emit::{Progress, TableEmitter},
    points::{self, PointRange, PointSelection},
    range::{self, RangeNotFound, Resolution, Selection, SelectionWindow},
    run::{self, Run},
    segment,
};
use log::info;
use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

#[derive(Debug)]
pub enum Error {
    Range(range::Error),
    Catalog(catalog::Error),
    Points(points::Error),
    IO(std::io::Error),
}

impl From<range::Error> for Error {
    fn from(item: range::Error) -> Self {
        Error::Range(item)
    }
}

impl From<catalog::Error> for Error {
    fn from(item: catalog::Error) -> Self {
        Error::Catalog(item)
    }
}

impl From<points::Error> for Error {
    fn from(item: points::Error) -> Self {
        Error::Points(item)
    }
}

impl From<std::io::Error> for Error {
    fn from(item: std::io::Error) -> Self {
        Error::IO(item)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Range(range::Error::ConflictingSelection) => write!(
                f,
                "Please select a range to process either via timesteps or time, but not via both."
            ),
            Error::Range(range::Error::InvalidRange(s)) => {
                write!(f, "Could not parse range \"{}\".", s)
            }
            Error::Catalog(catalog::Error::NoDataFound(_)) => {
                write!(f, "No sampling data files found. Exiting.")
            }
            Error::Catalog(catalog::Error::Segment { path, err }) => match err {
                segment::Error::MalformedSegment { field, reason } => write!(
                    f,
                    "Malformed sampling data file {}: {}: {}",
                    path.display(),
                    field,
                    reason
                ),
                segment::Error::Dataset(dataset::Error::NetCdfDisabled) => write!(
                    f,
                    "Sampling data file {} is NetCDF; rebuild with the netcdf feature to read it.",
                    path.display()
                ),
                segment::Error::Dataset(x) => write!(
                    f,
                    "Could not read sampling data file {}: {:?}",
                    path.display(),
                    x
                ),
            },
            Error::Catalog(catalog::Error::Run(run::Error::InconsistentSegment {
                segment,
                points,
                variables,
            })) => write!(
                f,
                "Sampling data file {} has {} points and {} variables, unlike the first file.",
                segment, points, variables
            ),
            Error::Catalog(x) => write!(f, "Could not list sampling data files: {:?}", x),
            Error::Points(x) => write!(f, "{}", x),
            Error::IO(x) => write!(f, "{}", x),
        }
    }
}

impl std::error::Error for Error {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Output {
    Stdout,
    File(PathBuf),
}

impl Output {
    pub fn parse(s: &str) -> Self {
        if s == STDOUT {
            Output::Stdout
        } else {
            Output::File(PathBuf::from(s))
        }
    }
}

#[derive(Clone, Debug)]
pub struct ExtractConfig {
    pub input_dir: PathBuf,
    pub file_prefix: String,
    pub file_number: String,
    pub points: String,
    pub timestep_range: String,
    pub time_range: String,
    pub output: Output,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        ExtractConfig {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            file_prefix: String::from(DEFAULT_FILE_PREFIX),
            file_number: String::from(DEFAULT_FILE_NUMBER),
            points: String::from(ALL),
            timestep_range: String::from(ALL),
            time_range: String::from(ALL),
            output: Output::Stdout,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub window: SelectionWindow,
    pub points: usize,
    pub rows: usize,
    pub warnings: Vec<RangeNotFound>,
}

/// A loaded run with its resolved window and selected points, ready to be
/// written out.
pub struct Extraction {
    run: Run,
    points: PointSelection,
    resolution: Resolution,
}

impl Extraction {
    /// Validates the selection, loads the run and resolves both selections.
    /// Nothing is written.
    pub fn prepare(config: &ExtractConfig) -> Result<Self, Error> {
        // checked before touching the file system
        let selection = Selection::from_args(&config.timestep_range, &config.time_range)?;
        let catalog =
            SegmentCatalog::new(&config.input_dir, &config.file_prefix, &config.file_number);
        let run = catalog.load()?;

        let range = PointRange::parse(&config.points, run.point_count())?;
        let points = points::select(&range, run.sort_index())?;
        let resolution = range::resolve(&run, &selection);
        Ok(Extraction {
            run,
            points,
            resolution,
        })
    }

    pub fn emit<W: Write>(&self, out: &mut W, progress: &mut Progress) -> Result<Summary, Error> {
        let emitter =
            TableEmitter::new(&self.run, self.run.schema(), self.resolution.window, &self.points);
        let rows = emitter.emit(out, progress)?;
        info!("Wrote {} rows for {} points", rows, self.points.len());
        Ok(Summary {
            window: self.resolution.window,
            points: self.points.len(),
            rows,
            warnings: self.resolution.warnings.clone(),
        })
    }
}

/// Runs the extraction and writes the table to the configured output. The
/// output file is only created once every selection has been validated.
pub fn extract(config: &ExtractConfig) -> Result<Summary, Error> {
    let extraction = Extraction::prepare(config)?;
    match &config.output {
        Output::Stdout => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            extraction.emit(&mut out, &mut Progress::for_output(true))
        }
        Output::File(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            extraction.emit(&mut out, &mut Progress::for_output(false))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::*;
    use std::fs;

    fn config_for(dir: &std::path::Path) -> ExtractConfig {
        ExtractConfig {
            input_dir: dir.to_path_buf(),
            ..ExtractConfig::default()
        }
    }

    fn extract_string(config: &ExtractConfig) -> (Summary, String) {
        let mut out = Vec::new();
        let summary = Extraction::prepare(config)
            .unwrap()
            .emit(&mut out, &mut Progress::hidden())
            .unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn defaults_mirror_the_command_line() {
        let config = ExtractConfig::default();
        assert_eq!(config.input_dir, PathBuf::from("."));
        assert_eq!(config.file_prefix, "point_data_");
        assert_eq!(config.file_number, "0");
        assert_eq!(config.points, "all");
        assert_eq!(config.output, Output::Stdout);
        assert_eq!(Output::parse("stdout"), Output::Stdout);
        assert_eq!(Output::parse("out.txt"), Output::File(PathBuf::from("out.txt")));
    }

    #[test]
    fn extracts_time_window_for_point_range() {
        init_logging();
        let dir = tempfile::tempdir().unwrap();
        write_run(dir.path(), "point_data_", "0", &two_segment_run(&reversed_ids(10), 2));
        let config = ExtractConfig {
            points: "1:3".into(),
            time_range: "0.1:0.3".into(),
            ..config_for(dir.path())
        };
        let (summary, table) = extract_string(&config);
        assert_eq!(summary.window, SelectionWindow::new(1, 3));
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.points, 3);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "time_step time v0_p1 v1_p1 v0_p2 v1_p2 v0_p3 v1_p3 ");
        assert_eq!(lines[1], "1 0.1 10.0 11.0 1010.0 1011.0 2010.0 2011.0 ");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn conflicting_selection_fails_before_loading() {
        // no data at all: the selection error must come first
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("table.txt");
        let config = ExtractConfig {
            timestep_range: "1:2".into(),
            time_range: "0.1".into(),
            output: Output::File(out.clone()),
            ..config_for(dir.path())
        };
        assert!(matches!(
            extract(&config),
            Err(Error::Range(range::Error::ConflictingSelection))
        ));
        assert!(!out.exists());
    }

    #[test]
    fn no_files_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        match Extraction::prepare(&config_for(dir.path())) {
            Err(e @ Error::Catalog(catalog::Error::NoDataFound(_))) => {
                assert_eq!(e.to_string(), "No sampling data files found. Exiting.")
            }
            Err(e) => panic!("unexpected error {:?}", e),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn invalid_point_range_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_run(dir.path(), "point_data_", "0", &two_segment_run(&reversed_ids(4), 1));
        for points in ["0:2", "2:5", "3:2"] {
            let config = ExtractConfig {
                points: points.into(),
                ..config_for(dir.path())
            };
            assert!(matches!(
                Extraction::prepare(&config),
                Err(Error::Points(_))
            ));
        }
    }

    #[test]
    fn writes_file_output() {
        let dir = tempfile::tempdir().unwrap();
        write_run(dir.path(), "point_data_", "0", &two_segment_run(&reversed_ids(2), 1));
        let out = dir.path().join("table.txt");
        let config = ExtractConfig {
            timestep_range: "2".into(),
            output: Output::File(out.clone()),
            ..config_for(dir.path())
        };
        let summary = extract(&config).unwrap();
        assert_eq!(summary.rows, 1);
        let table = fs::read_to_string(&out).unwrap();
        assert_eq!(table, "time_step time v0_p1 v0_p2 \n2 0.2 20.0 1020.0 \n");
    }

    #[test]
    fn missing_bounds_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        write_run(dir.path(), "point_data_", "0", &two_segment_run(&reversed_ids(2), 1));
        let config = ExtractConfig {
            timestep_range: "7:9".into(),
            ..config_for(dir.path())
        };
        let (summary, _) = extract_string(&config);
        assert_eq!(summary.warnings, vec![RangeNotFound::Start, RangeNotFound::End]);
        assert_eq!(summary.rows, 5);
    }
}
