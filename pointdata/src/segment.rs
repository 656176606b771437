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
    constants::*,
    dataset::{self, Data, Dataset, Variable},
    id::{PointId, Slot},
};
use log::debug;
use std::path::Path;

#[derive(Debug)]
pub enum Error {
    Dataset(dataset::Error),
    MalformedSegment { field: String, reason: String },
}

impl From<dataset::Error> for Error {
    fn from(item: dataset::Error) -> Self {
        Error::Dataset(item)
    }
}

fn malformed(field: &str, reason: impl Into<String>) -> Error {
    Error::MalformedSegment {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Ordered variable names of the per-point state array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableSchema {
    names: Vec<String>,
}

impl VariableSchema {
    pub fn new(names: Vec<String>) -> Self {
        VariableSchema { names }
    }

    /// Attribute values of every key containing `var_`, in attribute order.
    pub fn from_attributes(attributes: &[(String, String)]) -> Self {
        let names = attributes
            .iter()
            .filter(|(k, _)| k.contains(VAR_ATTR_TAG))
            .map(|(_, v)| v.clone())
            .collect();
        VariableSchema { names }
    }

    pub fn names(&self) -> &[String] {
        self.names.as_slice()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

/// One file's worth of recorded samples.
#[derive(Clone, Debug)]
pub struct Segment {
    time_steps: Vec<i64>,
    times: Vec<f64>,
    sort_index: Vec<PointId>,
    schema: VariableSchema,
    // point-slot x sample x variable, row-major
    states: Vec<f64>,
}

impl Segment {
    pub fn new(
        time_steps: Vec<i64>,
        times: Vec<f64>,
        sort_index: Vec<PointId>,
        schema: VariableSchema,
        states: Vec<f64>,
    ) -> Result<Self, Error> {
        if time_steps.len() != times.len() {
            return Err(malformed(
                TIME_VAR,
                format!("{} time values for {} time steps", times.len(), time_steps.len()),
            ));
        }
        let expected = state_count(sort_index.len(), time_steps.len(), schema.len())?;
        if states.len() != expected {
            return Err(malformed(
                POINT_STATES_VAR,
                format!("expected {} values, found {}", expected, states.len()),
            ));
        }
        Ok(Segment {
            time_steps,
            times,
            sort_index,
            schema,
            states,
        })
    }

    /// Loads a native or NetCDF segment file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let dataset = Dataset::open(path)?;
        Self::from_dataset(&dataset)
    }

    pub fn from_dataset(ds: &Dataset) -> Result<Self, Error> {
        let time_steps = required(ds, TIME_STEP_VAR)?
            .data
            .as_i64()
            .ok_or_else(|| malformed(TIME_STEP_VAR, "expected integer data"))?
            .to_vec();
        let times = required(ds, TIME_VAR)?
            .data
            .as_f64()
            .ok_or_else(|| malformed(TIME_VAR, "expected floating point data"))?
            .to_vec();

        let sort_index = required(ds, SORT_INDEX_VAR)?
            .data
            .as_i64()
            .ok_or_else(|| malformed(SORT_INDEX_VAR, "expected integer data"))?
            .iter()
            .map(|&x| {
                usize::try_from(x)
                    .map(PointId)
                    .map_err(|_| malformed(SORT_INDEX_VAR, format!("negative identity {}", x)))
            })
            .collect::<Result<Vec<PointId>, Error>>()?;

        let states_var = required(ds, POINT_STATES_VAR)?;
        if states_var.dimensions.len() != 3 {
            return Err(malformed(
                POINT_STATES_VAR,
                format!("expected 3 dimensions, found {}", states_var.dimensions.len()),
            ));
        }
        let sample_dim = states_var.dimensions[1].as_str();
        let samples = ds.dimension(sample_dim).ok_or_else(|| {
            malformed(POINT_STATES_VAR, format!("unknown dimension {}", sample_dim))
        })?;
        if samples != time_steps.len() {
            return Err(malformed(
                TIME_STEP_VAR,
                format!("{} time steps for {} samples", time_steps.len(), samples),
            ));
        }
        let states = states_var
            .data
            .as_f64()
            .ok_or_else(|| malformed(POINT_STATES_VAR, "expected floating point data"))?
            .to_vec();
        let schema = VariableSchema::from_attributes(&states_var.attributes);

        let segment = Segment::new(time_steps, times, sort_index, schema, states)?;
        debug!(
            "Segment with {} points, {} samples, {} variables",
            segment.point_count(),
            segment.len(),
            segment.schema.len()
        );
        Ok(segment)
    }

    pub fn to_dataset(&self) -> Dataset {
        let mut ds = Dataset::new();
        ds.add_dimension(POINT_DIM, self.point_count());
        ds.add_dimension(SAMPLE_DIM, self.len());
        ds.add_dimension(VARIABLE_DIM, self.schema.len());
        ds.add_variable(Variable::new(
            TIME_STEP_VAR,
            &[SAMPLE_DIM],
            Data::I64(self.time_steps.clone()),
        ));
        ds.add_variable(Variable::new(TIME_VAR, &[SAMPLE_DIM], Data::F64(self.times.clone())));
        ds.add_variable(Variable::new(
            SORT_INDEX_VAR,
            &[POINT_DIM],
            Data::I64(self.sort_index.iter().map(|x| x.inner() as i64).collect()),
        ));
        let mut states = Variable::new(
            POINT_STATES_VAR,
            &[POINT_DIM, SAMPLE_DIM, VARIABLE_DIM],
            Data::F64(self.states.clone()),
        );
        for (i, name) in self.schema.names().iter().enumerate() {
            states = states.with_attribute(&format!("{}{}", VAR_ATTR_TAG, i), name);
        }
        ds.add_variable(states);
        ds
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        Ok(self.to_dataset().write(path)?)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.time_steps.len()
    }

    pub fn point_count(&self) -> usize {
        self.sort_index.len()
    }

    pub fn time_steps(&self) -> &[i64] {
        self.time_steps.as_slice()
    }

    pub fn times(&self) -> &[f64] {
        self.times.as_slice()
    }

    /// Slot to identity mapping.
    pub fn sort_index(&self) -> &[PointId] {
        self.sort_index.as_slice()
    }

    pub fn schema(&self) -> &VariableSchema {
        &self.schema
    }

    /// All variable values of one point at one sample.
    pub fn states(&self, slot: Slot, sample: usize) -> &[f64] {
        let nvars = self.schema.len();
        let start = (slot.inner() * self.len() + sample) * nvars;
        &self.states[start..start + nvars]
    }
}

fn state_count(points: usize, samples: usize, variables: usize) -> Result<usize, Error> {
    points
        .checked_mul(samples)
        .and_then(|x| x.checked_mul(variables))
        .ok_or_else(|| {
            malformed(
                POINT_STATES_VAR,
                format!(
                    "{} points x {} samples x {} variables overflows",
                    points, samples, variables
                ),
            )
        })
}

fn required<'a>(ds: &'a Dataset, name: &str) -> Result<&'a Variable, Error> {
    ds.variable(name)
        .ok_or_else(|| malformed(name, "variable is missing"))
}
