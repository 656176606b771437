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
    id::PointId,
    run::Run,
    segment::{Segment, VariableSchema},
};
use rand::{seq::SliceRandom, Rng};
use std::path::Path;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Deterministic state value so tests can check what landed in a row.
pub fn state_value(identity: usize, step: i64, var: usize) -> f64 {
    (identity * 1000) as f64 + (step * 10) as f64 + var as f64
}

pub fn var_names(nvars: usize) -> Vec<String> {
    (0..nvars).map(|i| format!("v{}", i)).collect()
}

/// Slot i holds identity n - 1 - i.
pub fn reversed_ids(n: usize) -> Vec<PointId> {
    (0..n).rev().map(PointId).collect()
}

pub fn shuffled_ids<R: Rng>(n: usize, rng: &mut R) -> Vec<PointId> {
    let mut ids: Vec<PointId> = (0..n).map(PointId).collect();
    ids.shuffle(rng);
    ids
}

pub fn segment_with(steps: &[i64], times: &[f64], ids: &[PointId], nvars: usize) -> Segment {
    let mut states = Vec::with_capacity(ids.len() * steps.len() * nvars);
    for id in ids {
        for step in steps {
            for var in 0..nvars {
                states.push(state_value(id.inner(), *step, var));
            }
        }
    }
    Segment::new(
        steps.to_vec(),
        times.to_vec(),
        ids.to_vec(),
        VariableSchema::new(var_names(nvars)),
        states,
    )
    .unwrap()
}

/// Two segments: steps [0,1,2] at t=[0.0,0.1,0.2] and [3,4] at t=[0.3,0.4].
pub fn two_segment_run(ids: &[PointId], nvars: usize) -> Run {
    Run::new(vec![
        segment_with(&[0, 1, 2], &[0.0, 0.1, 0.2], ids, nvars),
        segment_with(&[3, 4], &[0.3, 0.4], ids, nvars),
    ])
    .unwrap()
}

/// A run of `lengths.len()` segments with steps counting up from 0 and
/// time = step * dt.
pub fn run_with_lengths(lengths: &[usize], dt: f64, ids: &[PointId], nvars: usize) -> Run {
    let mut step = 0i64;
    let mut segments = Vec::new();
    for len in lengths {
        let steps: Vec<i64> = (step..step + *len as i64).collect();
        let times: Vec<f64> = steps.iter().map(|s| *s as f64 * dt).collect();
        segments.push(segment_with(&steps, &times, ids, nvars));
        step += *len as i64;
    }
    Run::new(segments).unwrap()
}

pub fn write_run<P: AsRef<Path>>(dir: P, prefix: &str, file_number: &str, run: &Run) {
    for (i, seg) in run.segments().iter().enumerate() {
        let name = format!("{}{}_{:03}", prefix, file_number, i);
        seg.write(dir.as_ref().join(name)).unwrap();
    }
}
