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
    constants::PROGRESS_WIDTH,
    points::PointSelection,
    range::SelectionWindow,
    run::Run,
    segment::VariableSchema,
};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, Write};

/// Best-effort progress bar, drawn apart from the table.
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    pub fn hidden() -> Self {
        Progress { bar: None }
    }

    pub fn with_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(None, target);
        let template = format!("Progress: [{{bar:{}}}]", PROGRESS_WIDTH);
        let style = ProgressStyle::default_bar()
            .template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars(". ");
        bar.set_style(style);
        Progress { bar: Some(bar) }
    }

    /// Drawn on stdout only when the table goes elsewhere. The draw target
    /// stays silent when stdout is not a terminal.
    pub fn for_output(table_on_stdout: bool) -> Self {
        if table_on_stdout {
            Self::hidden()
        } else {
            Self::with_target(ProgressDrawTarget::stdout())
        }
    }

    fn start(&self, len: u64) {
        if let Some(bar) = &self.bar {
            bar.set_length(len);
            bar.set_position(0);
        }
    }

    fn inc(&self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish();
        }
    }

    /// Steps done so far, none when hidden.
    pub fn position(&self) -> Option<u64> {
        self.bar.as_ref().map(|b| b.position())
    }
}

/// Renders a float the way Python prints one: `0.1`, `1.0`, `1e-05`,
/// `1.5e+16`, `nan`, `inf`.
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        return String::from("nan");
    }
    if v.is_infinite() {
        return String::from(if v > 0.0 { "inf" } else { "-inf" });
    }
    // shortest round trip, scientific below 1e-4 and from 1e16 up
    let s = format!("{:?}", v);
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => s,
    }
}

/// Writes the selected window and points as a space separated table.
pub struct TableEmitter<'a> {
    run: &'a Run,
    schema: &'a VariableSchema,
    window: SelectionWindow,
    points: &'a PointSelection,
}

impl<'a> TableEmitter<'a> {
    pub fn new(
        run: &'a Run,
        schema: &'a VariableSchema,
        window: SelectionWindow,
        points: &'a PointSelection,
    ) -> Self {
        TableEmitter {
            run,
            schema,
            window,
            points,
        }
    }

    /// `time_step time <var>_p<id> ...`, point-major.
    pub fn header(&self) -> Vec<String> {
        let mut columns = vec![String::from("time_step"), String::from("time")];
        for id in self.points.ids() {
            for var in self.schema.names() {
                columns.push(format!("{}_p{}", var, id));
            }
        }
        columns
    }

    pub fn write_header<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for column in self.header() {
            write!(out, "{} ", column)?;
        }
        writeln!(out)
    }

    /// Writes the header and one row per sample in the window. Returns the
    /// number of rows written.
    pub fn emit<W: Write>(&self, out: &mut W, progress: &mut Progress) -> io::Result<usize> {
        self.write_header(out)?;

        let total = self.window.len();
        let npoints = self.points.len();
        progress.start((total * npoints.max(1)) as u64);

        let (first, mut local) = match self.run.locate(self.window.start()) {
            Some(x) if total > 0 => x,
            _ => {
                out.flush()?;
                return Ok(0);
            }
        };
        let mut rows = 0;
        'segments: for segment in &self.run.segments()[first..] {
            while local < segment.len() {
                if rows == total {
                    break 'segments;
                }
                write!(out, "{} ", segment.time_steps()[local])?;
                write!(out, "{} ", format_float(segment.times()[local]))?;
                for slot in self.points.slots() {
                    for value in segment.states(slot, local) {
                        write!(out, "{} ", format_float(*value))?;
                    }
                    progress.inc();
                }
                if npoints == 0 {
                    progress.inc();
                }
                writeln!(out)?;
                rows += 1;
                local += 1;
            }
            local = 0;
        }
        progress.finish();
        out.flush()?;
        Ok(rows)
    }
}
