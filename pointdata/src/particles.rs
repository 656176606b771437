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

//! Initial particle tables for seeding simulations: one particle per line,
//! `diameter density x y z [vx vy vz]`, tab separated.

use crate::constants::*;
use log::info;
use rand::{seq::SliceRandom, Rng};
use rand_distr::{Distribution, LogNormal, StandardNormal};
use std::io::{self, Write};

#[derive(Debug)]
pub enum Error {
    InvalidParameter(String),
    IO(std::io::Error),
}

impl From<std::io::Error> for Error {
    fn from(item: std::io::Error) -> Self {
        Error::IO(item)
    }
}

/// How particle diameters are drawn.
#[derive(Debug, Clone)]
pub enum DiameterMethod {
    /// Log-normal with the given parameters of the underlying normal,
    /// scaled by 1e-4.
    LogNormal(LogNormal<f64>),
    /// Uniform pick from a fixed set of diameters.
    Uniform(Vec<f64>),
}

impl DiameterMethod {
    pub fn log_normal(mean: f64, sigma: f64) -> Result<Self, Error> {
        if !mean.is_finite() || !sigma.is_finite() || sigma < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "log-normal diameter needs a finite mean and sigma >= 0, got mean {} sigma {}",
                mean, sigma
            )));
        }
        LogNormal::new(mean, sigma)
            .map(DiameterMethod::LogNormal)
            .map_err(|e| Error::InvalidParameter(format!("{:?}", e)))
    }

    pub fn uniform(choices: Vec<f64>) -> Result<Self, Error> {
        if choices.is_empty() {
            return Err(Error::InvalidParameter(
                "uniform diameter needs at least one choice".into(),
            ));
        }
        Ok(DiameterMethod::Uniform(choices))
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        match self {
            DiameterMethod::LogNormal(dist) => LOG_NORMAL_SCALE * dist.sample(rng),
            // never empty, checked in `uniform`
            DiameterMethod::Uniform(choices) => *choices.choose(rng).unwrap_or(&0.0),
        }
    }
}

impl Default for DiameterMethod {
    fn default() -> Self {
        DiameterMethod::Uniform(DIAMETER_CHOICES.to_vec())
    }
}

/// Where particles are placed.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionMethod {
    Box { min: [f64; 3], max: [f64; 3] },
    Sphere { center: [f64; 3], radius: f64 },
}

impl PositionMethod {
    pub fn bounding_box(min: [f64; 3], max: [f64; 3]) -> Result<Self, Error> {
        let method = PositionMethod::Box { min, max };
        method.validate()?;
        Ok(method)
    }

    pub fn sphere(center: [f64; 3], radius: f64) -> Result<Self, Error> {
        let method = PositionMethod::Sphere { center, radius };
        method.validate()?;
        Ok(method)
    }

    /// Every sampled coordinate range must be finite and ordered.
    pub fn validate(&self) -> Result<(), Error> {
        match self {
            PositionMethod::Box { min, max } => {
                for axis in 0..3 {
                    if !(min[axis] <= max[axis]) {
                        return Err(Error::InvalidParameter(format!(
                            "box axis {} has min {} above max {}",
                            axis, min[axis], max[axis]
                        )));
                    }
                    if !(max[axis] - min[axis]).is_finite() {
                        return Err(Error::InvalidParameter(format!(
                            "box axis {} spans {} to {}, which is not a finite width",
                            axis, min[axis], max[axis]
                        )));
                    }
                }
            }
            PositionMethod::Sphere { center, radius } => {
                if !(*radius > 0.0) || !(2.0 * radius).is_finite() {
                    return Err(Error::InvalidParameter(format!(
                        "sphere radius must be positive with a finite diameter, got {}",
                        radius
                    )));
                }
                if !center.iter().all(|c| c.is_finite()) {
                    return Err(Error::InvalidParameter(format!(
                        "sphere center must be finite, got {:?}",
                        center
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> [f64; 3] {
        match self {
            PositionMethod::Box { min, max } => {
                let mut p = [0.0; 3];
                for axis in 0..3 {
                    p[axis] = if min[axis] < max[axis] {
                        rng.gen_range(min[axis]..max[axis])
                    } else {
                        min[axis]
                    };
                }
                p
            }
            PositionMethod::Sphere { center, radius } => loop {
                let p: [f64; 3] = [
                    rng.gen_range(-radius..*radius),
                    rng.gen_range(-radius..*radius),
                    rng.gen_range(-radius..*radius),
                ];
                if norm(&p) <= *radius {
                    break [p[0] + center[0], p[1] + center[1], p[2] + center[2]];
                }
            },
        }
    }
}

impl Default for PositionMethod {
    fn default() -> Self {
        PositionMethod::Box {
            min: BOX_MIN,
            max: BOX_MAX,
        }
    }
}

fn norm(p: &[f64; 3]) -> f64 {
    (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt()
}

/// Isotropic direction with a magnitude uniform in `[0, max_magnitude)`.
fn sample_velocity<R: Rng>(rng: &mut R, max_magnitude: f64) -> [f64; 3] {
    let direction = loop {
        let d: [f64; 3] = [
            rng.sample(StandardNormal),
            rng.sample(StandardNormal),
            rng.sample(StandardNormal),
        ];
        let n = norm(&d);
        if n > 0.0 {
            break [d[0] / n, d[1] / n, d[2] / n];
        }
    };
    let magnitude = if max_magnitude > 0.0 && max_magnitude.is_finite() {
        rng.gen_range(0.0..max_magnitude)
    } else {
        0.0
    };
    [
        direction[0] * magnitude,
        direction[1] * magnitude,
        direction[2] * magnitude,
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub diameter: f64,
    pub density: f64,
    pub position: [f64; 3],
    pub velocity: [f64; 3],
}

#[derive(Debug, Clone)]
pub struct ParticleConfig {
    pub count: usize,
    pub density: f64,
    pub diameter: DiameterMethod,
    pub position: PositionMethod,
    pub max_velocity: f64,
    pub include_velocity: bool,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        ParticleConfig {
            count: PARTICLE_COUNT,
            density: PARTICLE_DENSITY,
            diameter: DiameterMethod::default(),
            position: PositionMethod::default(),
            max_velocity: MAX_VELOCITY_MAGNITUDE,
            include_velocity: false,
        }
    }
}

impl ParticleConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if !self.max_velocity.is_finite() || self.max_velocity < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "maximum velocity must be finite and >= 0, got {}",
                self.max_velocity
            )));
        }
        if !self.density.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "density must be finite, got {}",
                self.density
            )));
        }
        self.position.validate()
    }

    pub fn particle<R: Rng>(&self, rng: &mut R) -> Particle {
        let diameter = self.diameter.sample(rng);
        let position = self.position.sample(rng);
        let velocity = sample_velocity(rng, self.max_velocity);
        Particle {
            diameter,
            density: self.density,
            position,
            velocity,
        }
    }

    /// Writes `count` particles, returning how many were written.
    pub fn generate<R: Rng, W: Write>(
        &self,
        rng: &mut R,
        out: &mut W,
    ) -> Result<usize, Error> {
        self.validate()?;
        for _ in 0..self.count {
            let p = self.particle(rng);
            write_row(out, &p, self.include_velocity)?;
        }
        out.flush()?;
        info!("Generated {} particles", self.count);
        Ok(self.count)
    }
}

pub fn write_row<W: Write>(out: &mut W, p: &Particle, include_velocity: bool) -> io::Result<()> {
    let mut row = vec![p.diameter, p.density];
    row.extend_from_slice(&p.position);
    if include_velocity {
        row.extend_from_slice(&p.velocity);
    }
    let line: Vec<String> = row.iter().map(|v| format!("{:.6}", v)).collect();
    writeln!(out, "{}", line.join("\t"))
}
