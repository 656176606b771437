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

use crate::{
    run::{self, Run},
    segment::{self, Segment},
};
use glob::{glob, Pattern};
use log::info;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum Error {
    NoDataFound(String),
    Pattern(glob::PatternError),
    Glob(glob::GlobError),
    Segment { path: PathBuf, err: segment::Error },
    Run(run::Error),
}

impl From<glob::PatternError> for Error {
    fn from(item: glob::PatternError) -> Self {
        Error::Pattern(item)
    }
}

impl From<glob::GlobError> for Error {
    fn from(item: glob::GlobError) -> Self {
        Error::Glob(item)
    }
}

impl From<run::Error> for Error {
    fn from(item: run::Error) -> Self {
        Error::Run(item)
    }
}

/// The segment files `<dir>/<prefix><file_number>_*` of one sampling run.
#[derive(Clone, Debug)]
pub struct SegmentCatalog {
    dir: PathBuf,
    prefix: String,
    file_number: String,
}

impl SegmentCatalog {
    pub fn new<P: AsRef<Path>>(dir: P, prefix: &str, file_number: &str) -> Self {
        SegmentCatalog {
            dir: dir.as_ref().to_path_buf(),
            prefix: prefix.into(),
            file_number: file_number.into(),
        }
    }

    pub fn pattern(&self) -> String {
        let dir = Pattern::escape(&self.dir.to_string_lossy());
        let name = Pattern::escape(&format!("{}{}_", self.prefix, self.file_number));
        Path::new(&dir)
            .join(format!("{}*", name))
            .to_string_lossy()
            .into_owned()
    }

    /// Matching files sorted by name.
    pub fn discover(&self) -> Result<Vec<PathBuf>, Error> {
        let pattern = self.pattern();
        let mut files = Vec::new();
        for entry in glob(&pattern)? {
            let path = entry?;
            if path.is_file() {
                files.push(path);
            }
        }
        if files.is_empty() {
            return Err(Error::NoDataFound(pattern));
        }
        files.sort();
        info!("Found {} segment files matching {}", files.len(), pattern);
        Ok(files)
    }

    /// Reads every discovered segment into memory. Each file is closed as
    /// soon as it has been read.
    pub fn load(&self) -> Result<Run, Error> {
        let mut segments = Vec::new();
        for path in self.discover()? {
            let segment = match Segment::load(&path) {
                Ok(x) => x,
                Err(err) => return Err(Error::Segment { path, err }),
            };
            info!("Loaded {:?}: {} samples", path, segment.len());
            segments.push(segment);
        }
        Ok(Run::new(segments)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::*;
    use std::fs;

    #[test]
    fn discovers_sorted_matching_files() {
        init_logging();
        let dir = tempfile::tempdir().unwrap();
        let run = two_segment_run(&reversed_ids(3), 2);
        write_run(dir.path(), "point_data_", "0", &run);
        // other run numbers and prefixes are ignored
        write_run(dir.path(), "point_data_", "1", &run);
        write_run(dir.path(), "surface_data_", "0", &run);
        fs::create_dir(dir.path().join("point_data_0_dir")).unwrap();

        let catalog = SegmentCatalog::new(dir.path(), "point_data_", "0");
        let files = catalog.discover().unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["point_data_0_000", "point_data_0_001"]);
    }

    #[test]
    fn loads_segments_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let run = two_segment_run(&reversed_ids(3), 2);
        // write the later segment first so creation order differs from name order
        run.segments()[1].write(dir.path().join("point_data_0_b")).unwrap();
        run.segments()[0].write(dir.path().join("point_data_0_a")).unwrap();

        let loaded = SegmentCatalog::new(dir.path(), "point_data_", "0").load().unwrap();
        assert_eq!(loaded.total_samples(), 5);
        assert_eq!(loaded.segments()[0].time_steps(), &[0, 1, 2]);
        assert_eq!(loaded.segments()[1].time_steps(), &[3, 4]);
        assert_eq!(loaded.schema().names(), run.schema().names());
    }

    #[test]
    fn empty_directory_has_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = SegmentCatalog::new(dir.path(), "point_data_", "0");
        assert!(matches!(catalog.discover(), Err(Error::NoDataFound(_))));
        assert!(matches!(catalog.load(), Err(Error::NoDataFound(_))));
    }

    #[test]
    fn corrupt_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("point_data_0_000");
        fs::write(&bad, b"garbage").unwrap();
        match SegmentCatalog::new(dir.path(), "point_data_", "0").load() {
            Err(Error::Segment { path, .. }) => assert_eq!(path, bad),
            x => panic!("unexpected result {:?}", x),
        }
    }
}
