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

use clap::{ArgEnum, Parser};
use log::info;
use pointdata::constants::*;
use pointdata::particles::{self, DiameterMethod, ParticleConfig, PositionMethod};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs::File;
use std::io::BufWriter;
use std::process;

#[derive(ArgEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diameter {
    LogNormal,
    Uniform,
}

#[derive(ArgEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Box,
    Sphere,
}

/// Generates an initial particle table: diameter, density and position
/// (optionally velocity) per line, tab separated.
#[derive(Parser, Debug, Clone)]
pub struct Args {
    #[clap(short, long, default_value_t = PARTICLE_COUNT)]
    pub count: usize,

    #[clap(short, long, default_value_t = String::from("part.txt"))]
    pub output: String,

    /// Seed for reproducible tables, random when absent
    #[clap(long)]
    pub seed: Option<u64>,

    #[clap(long, default_value_t = PARTICLE_DENSITY)]
    pub density: f64,

    #[clap(long, arg_enum, default_value = "uniform")]
    pub diameter: Diameter,

    /// log-normal mean of the underlying normal
    #[clap(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub mean: f64,

    /// log-normal sigma of the underlying normal
    #[clap(long, default_value_t = 1.0)]
    pub sigma: f64,

    /// comma separated diameters for the uniform method
    #[clap(long, default_value_t = String::from("1e-1,1e-2,1e-3,1e-4,1e-5,1e-6"))]
    pub choices: String,

    #[clap(long, arg_enum, default_value = "box")]
    pub position: Position,

    /// xmin,xmax,ymin,ymax,zmin,zmax
    #[clap(long, default_value_t = String::from("-20,20,-70,-30,-50,-10"), allow_hyphen_values = true)]
    pub bounds: String,

    /// x,y,z of the sphere center
    #[clap(long, default_value_t = String::from("0,0,0"), allow_hyphen_values = true)]
    pub center: String,

    #[clap(long, default_value_t = 1.0, allow_hyphen_values = true)]
    pub radius: f64,

    #[clap(long, default_value_t = MAX_VELOCITY_MAGNITUDE)]
    pub max_velocity: f64,

    /// append vx vy vz columns
    #[clap(long)]
    pub with_velocity: bool,
}

fn parse_list(s: &str) -> Result<Vec<f64>, particles::Error> {
    s.split(',')
        .map(|x| {
            x.trim()
                .parse::<f64>()
                .map_err(|_| particles::Error::InvalidParameter(format!("not a number: {}", x)))
        })
        .collect()
}

fn parse_fixed<const N: usize>(s: &str) -> Result<[f64; N], particles::Error> {
    let v = parse_list(s)?;
    v.as_slice().try_into().map_err(|_| {
        particles::Error::InvalidParameter(format!("expected {} values, got {}", N, v.len()))
    })
}

impl Args {
    fn config(&self) -> Result<ParticleConfig, particles::Error> {
        let diameter = match self.diameter {
            Diameter::LogNormal => DiameterMethod::log_normal(self.mean, self.sigma)?,
            Diameter::Uniform => DiameterMethod::uniform(parse_list(&self.choices)?)?,
        };
        let position = match self.position {
            Position::Box => {
                let b: [f64; 6] = parse_fixed(&self.bounds)?;
                PositionMethod::bounding_box([b[0], b[2], b[4]], [b[1], b[3], b[5]])?
            }
            Position::Sphere => PositionMethod::sphere(parse_fixed(&self.center)?, self.radius)?,
        };
        let config = ParticleConfig {
            count: self.count,
            density: self.density,
            diameter,
            position,
            max_velocity: self.max_velocity,
            include_velocity: self.with_velocity,
        };
        config.validate()?;
        Ok(config)
    }
}

fn run(args: &Args) -> Result<usize, particles::Error> {
    let config = args.config()?;
    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut out = BufWriter::new(File::create(&args.output)?);
    info!("Writing {} particles to {}", config.count, args.output);
    config.generate(&mut rng, &mut out)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        match e {
            particles::Error::InvalidParameter(x) => eprintln!("ERROR: {}", x),
            particles::Error::IO(x) => eprintln!("ERROR: {}", x),
        }
        process::exit(1);
    }
}
