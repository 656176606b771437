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

// Segment file container
pub const MAGIC: &[u8; 8] = b"PNTDATA1";
// followed by a version byte of 1, 2 or 5
pub const NETCDF_CLASSIC_MAGIC: &[u8] = b"CDF";
// NetCDF-4
pub const HDF5_MAGIC: &[u8] = b"\x89HDF";

// Variable names inside a segment dataset
pub const TIME_STEP_VAR: &str = "timeStep";
pub const TIME_VAR: &str = "time";
pub const SORT_INDEX_VAR: &str = "sortIndex";
pub const POINT_STATES_VAR: &str = "pointStates";
pub const VAR_ATTR_TAG: &str = "var_";

// Dimension names used when writing segments
pub const POINT_DIM: &str = "nPoints";
pub const SAMPLE_DIM: &str = "nSamples";
pub const VARIABLE_DIM: &str = "nVars";

// CLI defaults
pub const DEFAULT_INPUT_DIR: &str = ".";
pub const DEFAULT_FILE_PREFIX: &str = "point_data_";
pub const DEFAULT_FILE_NUMBER: &str = "0";
pub const ALL: &str = "all";
pub const STDOUT: &str = "stdout";

// Closeness for time comparisons
pub const TIME_RTOL: f64 = 1e-5;
pub const TIME_ATOL: f64 = 1e-8;

// Progress bar
pub const PROGRESS_WIDTH: usize = 70;

// Particle generator defaults
pub const PARTICLE_COUNT: usize = 200_000;
pub const PARTICLE_DENSITY: f64 = 1000.0;
pub const MAX_VELOCITY_MAGNITUDE: f64 = 0.15;
pub const LOG_NORMAL_SCALE: f64 = 1e-4;
pub const DIAMETER_CHOICES: [f64; 6] = [1e-1, 1e-2, 1e-3, 1e-4, 1e-5, 1e-6];
pub const BOX_MIN: [f64; 3] = [-20.0, -70.0, -50.0];
pub const BOX_MAX: [f64; 3] = [20.0, -30.0, -10.0];
