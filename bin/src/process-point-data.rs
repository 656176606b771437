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

use clap::Parser;
use log::debug;
use pointdata::constants::*;
use pointdata::extract::{self, ExtractConfig, Output};
use std::path::PathBuf;
use std::process;

const ABOUT: &str = "Processes files produced by the point/surface/volume data sampling feature.
Provide all ranges separated by a colon (eg. 3:5.2).
You can also pass a single value.
You can either select via timestep range or via the time range,
but not via both.

Example:
Extract recorded states from points 5 to 20
from time range 0.7 to 2.1 seconds.
Files are at ~/scratch/stuff/out:

  process-point-data -i ~/scratch/stuff/out -t 0.7:2.1 -p 5:20";

#[derive(Parser, Debug, Clone)]
#[clap(about = ABOUT)]
pub struct Args {
    /// input directory
    #[clap(short, long = "input", default_value_t = String::from(DEFAULT_INPUT_DIR))]
    pub input_path: String,

    /// file prefix
    #[clap(short, long, default_value_t = String::from(DEFAULT_FILE_PREFIX))]
    pub file_prefix: String,

    /// number of input file
    #[clap(short = 'n', long, default_value_t = String::from(DEFAULT_FILE_NUMBER))]
    pub filenumber: String,

    /// input points index range, starts at 1 (e.g. "3" or "3:10")
    #[clap(short = 'p', long = "points", default_value_t = String::from(ALL))]
    pub input_points: String,

    /// select range of timesteps to output (e.g. "3" or "3:10")
    #[clap(short = 's', long, default_value_t = String::from(ALL), allow_hyphen_values = true)]
    pub timestep_range: String,

    /// select range of simulation time to output (e.g. "3.2" or "3:10.1")
    #[clap(short = 't', long, default_value_t = String::from(ALL), allow_hyphen_values = true)]
    pub time_range: String,

    /// output file path
    #[clap(short, long, default_value_t = String::from(STDOUT))]
    pub output: String,
}

impl Args {
    fn config(&self) -> ExtractConfig {
        ExtractConfig {
            input_dir: PathBuf::from(&self.input_path),
            file_prefix: self.file_prefix.clone(),
            file_number: self.filenumber.clone(),
            points: self.input_points.clone(),
            timestep_range: self.timestep_range.clone(),
            time_range: self.time_range.clone(),
            output: Output::parse(&self.output),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let config = args.config();
    debug!("{:?}", config);

    match extract::extract(&config) {
        Ok(summary) => {
            debug!("{:?}", summary);
            // ends the progress bar line
            if config.output != Output::Stdout {
                println!();
            }
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    }
}
