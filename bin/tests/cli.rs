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

use pointdata::id::PointId;
use pointdata::segment::{Segment, VariableSchema};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const EXTRACT: &str = env!("CARGO_BIN_EXE_process-point-data");
const GENERATE: &str = env!("CARGO_BIN_EXE_generate-particles");

fn segment(steps: &[i64], times: &[f64], npoints: usize) -> Segment {
    // slot i holds identity npoints - 1 - i
    let ids: Vec<PointId> = (0..npoints).rev().map(PointId).collect();
    let mut states = Vec::new();
    for id in ids.iter() {
        for step in steps {
            states.push((id.inner() * 100) as f64 + *step as f64);
        }
    }
    Segment::new(
        steps.to_vec(),
        times.to_vec(),
        ids,
        VariableSchema::new(vec!["Density".into()]),
        states,
    )
    .unwrap()
}

fn write_fixture(dir: &Path) {
    segment(&[0, 1, 2], &[0.0, 0.1, 0.2], 10)
        .write(dir.join("point_data_0_000"))
        .unwrap();
    segment(&[3, 4], &[0.3, 0.4], 10)
        .write(dir.join("point_data_0_001"))
        .unwrap();
}

fn extract(dir: &Path, args: &[&str]) -> Output {
    Command::new(EXTRACT)
        .arg("-i")
        .arg(dir)
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn time_range_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let out = extract(dir.path(), &["-t", "0.1:0.3", "-p", "1:2"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert_eq!(
        stdout,
        "time_step time Density_p1 Density_p2 \n\
         1 0.1 1.0 101.0 \n\
         2 0.2 2.0 102.0 \n\
         3 0.3 3.0 103.0 \n"
    );
}

#[test]
fn conflicting_ranges_exit_with_one() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let table = dir.path().join("table.txt");
    let out = extract(
        dir.path(),
        &["-s", "1:2", "-t", "0.1:0.2", "-o", table.to_str().unwrap()],
    );
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8(out.stderr).unwrap().contains("ERROR"));
    assert!(!table.exists());
}

#[test]
fn missing_files_exit_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let out = extract(dir.path(), &[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8(out.stderr)
        .unwrap()
        .contains("No sampling data files found"));
}

#[test]
fn invalid_points_exit_with_one() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    for points in ["0:3", "5:11", "4:2"] {
        let out = extract(dir.path(), &["-p", points]);
        assert_eq!(out.status.code(), Some(1), "points {}", points);
        assert!(out.stdout.is_empty());
    }
}

#[test]
fn file_output_gets_trailing_newline_on_stdout() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let table = dir.path().join("table.txt");
    let out = extract(dir.path(), &["-s", "4", "-o", table.to_str().unwrap()]);
    assert!(out.status.success());
    assert_eq!(out.stdout, b"\n".to_vec());
    let written = fs::read_to_string(&table).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].split_whitespace().count(), 2 + 10);
    assert!(lines[1].starts_with("4 0.4 "));
}

#[test]
fn generates_seeded_particles() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    for path in [&a, &b] {
        let status = Command::new(GENERATE)
            .args(["--count", "25", "--seed", "3", "--with-velocity", "-o"])
            .arg(path)
            .status()
            .unwrap();
        assert!(status.success());
    }
    let text = fs::read_to_string(&a).unwrap();
    assert_eq!(text, fs::read_to_string(&b).unwrap());
    assert_eq!(text.lines().count(), 25);
    assert!(text.lines().all(|l| l.split('\t').count() == 8));
}

#[test]
fn rejects_bad_particle_parameters() {
    let dir = tempfile::tempdir().unwrap();
    let out = Command::new(GENERATE)
        .args(["--position", "sphere", "--radius", "-1", "-o"])
        .arg(dir.path().join("p.txt"))
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn rejects_unsampleable_particle_ranges() {
    let dir = tempfile::tempdir().unwrap();
    let cases: [&[&str]; 3] = [
        &["--max-velocity", "inf"],
        &["--position", "sphere", "--radius", "1e308"],
        &["--bounds", "-1e308,1e308,0,1,0,1"],
    ];
    for (i, args) in cases.iter().enumerate() {
        let path = dir.path().join(format!("p{}.txt", i));
        let out = Command::new(GENERATE)
            .args(*args)
            .arg("-o")
            .arg(&path)
            .output()
            .unwrap();
        assert_eq!(out.status.code(), Some(1), "{:?}", args);
        assert!(String::from_utf8_lossy(&out.stderr).contains("ERROR:"));
        assert!(!path.exists());
    }
}
