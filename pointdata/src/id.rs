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

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Stable identity of a sample point, zero-based as stored in `sortIndex`.
#[derive(Copy, Clone, Eq, Debug, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct PointId(pub usize);

impl Deref for PointId {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PointId {
    pub fn inner(&self) -> usize {
        self.0
    }

    /// One-based number used on the command line and in column names.
    pub fn number(&self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Physical position of a point's data inside a segment.
#[derive(Copy, Clone, Eq, Debug, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Slot(pub usize);

impl Deref for Slot {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Slot {
    pub fn inner(&self) -> usize {
        self.0
    }
}
