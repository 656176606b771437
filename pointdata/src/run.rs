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
    segment::{Segment, VariableSchema},
};
use log::debug;

#[derive(Debug)]
pub enum Error {
    NoSegments,
    InconsistentSegment {
        segment: usize,
        points: usize,
        variables: usize,
    },
}

/// Ordered segments of one sampling run, numbered by a run-wide absolute
/// sample index.
#[derive(Debug)]
pub struct Run {
    segments: Vec<Segment>,
    // offsets[i] is the absolute index of segment i's first sample,
    // offsets[segments.len()] the total sample count
    offsets: Vec<usize>,
}

impl Run {
    pub fn new(segments: Vec<Segment>) -> Result<Self, Error> {
        let first = segments.first().ok_or(Error::NoSegments)?;
        let points = first.point_count();
        let variables = first.schema().len();
        for (i, seg) in segments.iter().enumerate().skip(1) {
            if seg.point_count() != points || seg.schema().len() != variables {
                return Err(Error::InconsistentSegment {
                    segment: i,
                    points: seg.point_count(),
                    variables: seg.schema().len(),
                });
            }
        }

        let mut offsets = Vec::with_capacity(segments.len() + 1);
        let mut offset = 0;
        offsets.push(offset);
        for seg in segments.iter() {
            offset += seg.len();
            offsets.push(offset);
        }
        debug!("Run offsets: {:?}", offsets);

        Ok(Run { segments, offsets })
    }

    pub fn segments(&self) -> &[Segment] {
        self.segments.as_slice()
    }

    pub fn total_samples(&self) -> usize {
        self.offsets[self.segments.len()]
    }

    pub fn schema(&self) -> &VariableSchema {
        self.segments[0].schema()
    }

    pub fn point_count(&self) -> usize {
        self.segments[0].point_count()
    }

    /// Identity mapping of the first segment, assumed for the whole run.
    pub fn sort_index(&self) -> &[PointId] {
        self.segments[0].sort_index()
    }

    /// Segment number and local sample of an absolute sample index.
    pub fn locate(&self, absolute: usize) -> Option<(usize, usize)> {
        if absolute >= self.total_samples() {
            return None;
        }
        // first offset strictly greater than absolute, minus one
        let seg = self.offsets.partition_point(|&o| o <= absolute) - 1;
        Some((seg, absolute - self.offsets[seg]))
    }
}
