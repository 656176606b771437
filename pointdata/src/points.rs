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
    constants::ALL,
    id::{PointId, Slot},
};
use log::{debug, warn};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Unparsable(String),
    EndBeforeStart { start: usize, end: usize },
    StartBelowOne,
    EndBeyondPoints { end: usize, points: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Unparsable(s) => write!(f, "Could not parse point index range \"{}\"!", s),
            Error::EndBeforeStart { .. } => write!(
                f,
                "Point index range end is larger than point index range start!"
            ),
            Error::StartBelowOne => write!(f, "Point index of less than 1 is invalid!"),
            Error::EndBeyondPoints { .. } => write!(
                f,
                "Point index range end is larger than there are points!"
            ),
        }
    }
}

/// A one-based inclusive range of point numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointRange {
    pub start: i64,
    pub end: i64,
}

impl PointRange {
    /// Parses `all`, `n` or `start:end`.
    pub fn parse(s: &str, point_count: usize) -> Result<Self, Error> {
        if s == ALL {
            return Ok(PointRange {
                start: 1,
                end: point_count as i64,
            });
        }
        let parse = |x: &str| {
            x.trim()
                .parse::<i64>()
                .map_err(|_| Error::Unparsable(s.to_string()))
        };
        match s.split(':').collect::<Vec<&str>>().as_slice() {
            &[n] => {
                let n = parse(n)?;
                Ok(PointRange { start: n, end: n })
            }
            &[start, end] => Ok(PointRange {
                start: parse(start)?,
                end: parse(end)?,
            }),
            _ => Err(Error::Unparsable(s.to_string())),
        }
    }

    pub fn validate(&self, point_count: usize) -> Result<(), Error> {
        if self.end < self.start {
            return Err(Error::EndBeforeStart {
                start: self.start.max(0) as usize,
                end: self.end.max(0) as usize,
            });
        }
        if self.start < 1 {
            return Err(Error::StartBelowOne);
        }
        if self.end as usize > point_count {
            return Err(Error::EndBeyondPoints {
                end: self.end as usize,
                points: point_count,
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        (self.end - self.start + 1).max(0) as usize
    }
}

/// Storage slots of the selected points, ordered by ascending identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointSelection {
    points: Vec<(Slot, PointId)>,
}

impl PointSelection {
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.points.iter().map(|(s, _)| *s)
    }

    pub fn ids(&self) -> impl Iterator<Item = PointId> + '_ {
        self.points.iter().map(|(_, id)| *id)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Validates `range` against the mapping and collects the slots whose
/// identity falls inside it.
pub fn select(range: &PointRange, sort_index: &[PointId]) -> Result<PointSelection, Error> {
    range.validate(sort_index.len())?;
    let lo = (range.start - 1) as usize;
    let hi = (range.end - 1) as usize;

    let mut points: Vec<(Slot, PointId)> = sort_index
        .iter()
        .enumerate()
        .filter(|(_, id)| lo <= id.inner() && id.inner() <= hi)
        .map(|(slot, id)| (Slot(slot), *id))
        .collect();
    points.sort_by_key(|(_, id)| *id);

    if points.len() != range.len() {
        warn!(
            "Requested {} points but found {} in the sort index",
            range.len(),
            points.len()
        );
    }
    debug!("Selected {} point slots", points.len());
    Ok(PointSelection { points })
}
