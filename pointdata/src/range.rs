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

//! Resolution of a step or time range into a window of absolute sample
//! indices spanning all segments of a run.

use crate::{constants::*, run::Run, segment::Segment};
use log::{debug, warn};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    ConflictingSelection,
    InvalidRange(String),
}

/// A value a range can be expressed in.
pub trait RangeValue: Copy + PartialOrd + fmt::Debug {
    fn series(segment: &Segment) -> &[Self];

    /// Whether a sample hits the requested end exactly.
    fn matches(self, end: Self) -> bool;
}

impl RangeValue for i64 {
    fn series(segment: &Segment) -> &[i64] {
        segment.time_steps()
    }

    fn matches(self, end: i64) -> bool {
        self == end
    }
}

impl RangeValue for f64 {
    fn series(segment: &Segment) -> &[f64] {
        segment.times()
    }

    fn matches(self, end: f64) -> bool {
        is_close(self, end)
    }
}

/// `|a - b| <= atol + rtol * |b|`
pub fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= TIME_ATOL + TIME_RTOL * b.abs()
}

/// `start` alone, or `start:end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSpec<T> {
    pub start: T,
    pub end: Option<T>,
}

impl<T: FromStr> RangeSpec<T> {
    pub fn parse(s: &str) -> Result<Self, Error> {
        let parse = |x: &str| {
            x.trim()
                .parse::<T>()
                .map_err(|_| Error::InvalidRange(s.to_string()))
        };
        match s.split(':').collect::<Vec<&str>>().as_slice() {
            &[start] => Ok(RangeSpec {
                start: parse(start)?,
                end: None,
            }),
            &[start, end] => Ok(RangeSpec {
                start: parse(start)?,
                end: Some(parse(end)?),
            }),
            _ => Err(Error::InvalidRange(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    All,
    Steps(RangeSpec<i64>),
    Time(RangeSpec<f64>),
}

impl Selection {
    /// Builds a selection from the timestep and time range arguments, each
    /// either `all` or a range. Only one of them may be set.
    pub fn from_args(timestep_range: &str, time_range: &str) -> Result<Self, Error> {
        match (timestep_range == ALL, time_range == ALL) {
            (true, true) => Ok(Selection::All),
            (false, true) => Ok(Selection::Steps(RangeSpec::parse(timestep_range)?)),
            (true, false) => Ok(Selection::Time(RangeSpec::parse(time_range)?)),
            (false, false) => Err(Error::ConflictingSelection),
        }
    }
}

/// Inclusive window of absolute sample indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionWindow {
    start: usize,
    // exclusive
    stop: usize,
}

impl SelectionWindow {
    /// Window `[start, end]`, both inclusive.
    pub fn new(start: usize, end: usize) -> Self {
        SelectionWindow {
            start,
            stop: (end + 1).max(start),
        }
    }

    pub fn empty() -> Self {
        SelectionWindow { start: 0, stop: 0 }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Last selected index, none if the window is empty.
    pub fn end(&self) -> Option<usize> {
        if self.stop > self.start {
            Some(self.stop - 1)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.stop - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, absolute: usize) -> bool {
        self.start <= absolute && absolute < self.stop
    }
}

/// A requested bound that never showed up in the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeNotFound {
    Start,
    End,
}

impl fmt::Display for RangeNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeNotFound::Start => write!(
                f,
                "Could not find selected beginning. Selecting start of recorded data."
            ),
            RangeNotFound::End => write!(
                f,
                "Could not find selected end. Selecting end of recorded data."
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub window: SelectionWindow,
    pub warnings: Vec<RangeNotFound>,
}

pub fn resolve(run: &Run, selection: &Selection) -> Resolution {
    let resolution = match selection {
        Selection::All => Resolution {
            window: all(run),
            warnings: Vec::new(),
        },
        Selection::Steps(spec) => resolve_spec(run, spec),
        Selection::Time(spec) => resolve_spec(run, spec),
    };
    for w in resolution.warnings.iter() {
        warn!("{}", w);
    }
    debug!("Resolved {:?} to {:?}", selection, resolution.window);
    resolution
}

fn all(run: &Run) -> SelectionWindow {
    match run.total_samples() {
        0 => SelectionWindow::empty(),
        n => SelectionWindow::new(0, n - 1),
    }
}

/// Single linear pass over every sample in run order. The first sample
/// `>= start` opens the window. The window closes on the sample before the
/// first one `> end`, or on the first sample matching `end`, whichever is
/// seen first.
pub fn resolve_spec<T: RangeValue>(run: &Run, spec: &RangeSpec<T>) -> Resolution {
    let mut window_start: Option<usize> = None;
    let mut window_end: Option<usize> = None;
    let mut absolute = 0;

    for segment in run.segments() {
        for &v in T::series(segment) {
            if window_start.is_none() && v >= spec.start {
                window_start = Some(absolute);
            }
            if let Some(end) = spec.end {
                if window_end.is_none() && v > end {
                    window_end = Some(absolute.saturating_sub(1));
                }
                if window_end.is_none() && v.matches(end) {
                    window_end = Some(absolute);
                }
            }
            absolute += 1;
        }
    }

    let mut warnings = Vec::new();
    let start = window_start.unwrap_or_else(|| {
        warnings.push(RangeNotFound::Start);
        0
    });
    let end = match spec.end {
        None => Some(start),
        Some(_) => match window_end {
            Some(x) => Some(x),
            None => {
                warnings.push(RangeNotFound::End);
                absolute.checked_sub(1)
            }
        },
    };

    let window = match end {
        Some(end) if absolute > 0 => SelectionWindow::new(start, end),
        _ => SelectionWindow::empty(),
    };
    Resolution { window, warnings }
}
