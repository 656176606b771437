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

//! Self-describing container for one segment file: named dimensions and
//! named variables carrying attributes and a flat data array. Files are
//! either the native `PNTDATA1` container or, with the `netcdf` feature,
//! NetCDF classic / NetCDF-4 files.

use crate::constants::{HDF5_MAGIC, MAGIC, NETCDF_CLASSIC_MAGIC};
use bincode::{deserialize_from, serialize_into};
use serde::{Deserialize, Serialize};
use std::{
    fs::{File, OpenOptions},
    io::{prelude::*, BufReader, BufWriter},
    path::Path,
};

#[derive(Debug)]
pub enum Error {
    IO(std::io::Error),
    Bincode(bincode::Error),
    UnrecognizedMagic,
    NetCdfDisabled,
    #[cfg(feature = "netcdf")]
    NetCdf(netcdf::Error),
}

impl From<std::io::Error> for Error {
    fn from(item: std::io::Error) -> Self {
        Error::IO(item)
    }
}

impl From<bincode::Error> for Error {
    fn from(item: bincode::Error) -> Self {
        Error::Bincode(item)
    }
}

#[cfg(feature = "netcdf")]
impl From<netcdf::Error> for Error {
    fn from(item: netcdf::Error) -> Self {
        Error::NetCdf(item)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Format {
    Native,
    NetCdf,
}

impl Format {
    /// Guesses the format from the leading bytes of a file.
    pub fn sniff(head: &[u8]) -> Option<Self> {
        if head.starts_with(&MAGIC[..]) {
            Some(Format::Native)
        } else if head.starts_with(NETCDF_CLASSIC_MAGIC)
            && matches!(head.get(3).copied(), Some(1) | Some(2) | Some(5))
        {
            Some(Format::NetCdf)
        } else if head.starts_with(HDF5_MAGIC) {
            Some(Format::NetCdf)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Data {
    I64(Vec<i64>),
    F64(Vec<f64>),
}

impl Data {
    pub fn as_i64(&self) -> Option<&[i64]> {
        match self {
            Data::I64(x) => Some(x.as_slice()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            Data::F64(x) => Some(x.as_slice()),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub len: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub dimensions: Vec<String>,
    // insertion order is significant
    pub attributes: Vec<(String, String)>,
    pub data: Data,
}

impl Variable {
    pub fn new(name: &str, dimensions: &[&str], data: Data) -> Self {
        Variable {
            name: name.into(),
            dimensions: dimensions.iter().map(|x| String::from(*x)).collect(),
            attributes: Vec::new(),
            data,
        }
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub dimensions: Vec<Dimension>,
    pub variables: Vec<Variable>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dimension(&mut self, name: &str, len: usize) {
        self.dimensions.push(Dimension {
            name: name.into(),
            len,
        });
    }

    pub fn add_variable(&mut self, variable: Variable) {
        self.variables.push(variable);
    }

    pub fn dimension(&self, name: &str) -> Option<usize> {
        self.dimensions.iter().find(|d| d.name == name).map(|d| d.len)
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        writer.write_all(&MAGIC[..])?;
        serialize_into(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, Error> {
        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic[..])?;
        if &magic != MAGIC {
            return Err(Error::UnrecognizedMagic);
        }
        Ok(deserialize_from(reader)?)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        self.to_writer(BufWriter::new(file))
    }

    /// Reads the whole file and closes it before returning.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Reads a segment file in whichever format its leading bytes announce.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let mut head = Vec::with_capacity(MAGIC.len());
        File::open(path)?
            .take(MAGIC.len() as u64)
            .read_to_end(&mut head)?;
        match Format::sniff(&head) {
            Some(Format::Native) => Self::read(path),
            Some(Format::NetCdf) => Self::read_netcdf(path),
            None => Err(Error::UnrecognizedMagic),
        }
    }

    #[cfg(not(feature = "netcdf"))]
    pub fn read_netcdf<P: AsRef<Path>>(_path: P) -> Result<Self, Error> {
        Err(Error::NetCdfDisabled)
    }

    /// Copies every dimension and the integer and floating point variables
    /// with their string attributes. Other variables are skipped.
    #[cfg(feature = "netcdf")]
    pub fn read_netcdf<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        use netcdf::{types::NcVariableType, AttributeValue};

        let file = netcdf::open(path)?;
        let mut ds = Dataset::new();
        for dim in file.dimensions() {
            ds.add_dimension(&dim.name(), dim.len());
        }
        for var in file.variables() {
            let data = match var.vartype() {
                NcVariableType::Float(_) => Data::F64(var.get_values::<f64, _>(..)?),
                NcVariableType::Int(_) => Data::I64(var.get_values::<i64, _>(..)?),
                _ => continue,
            };
            let mut variable = Variable {
                name: var.name(),
                dimensions: var.dimensions().iter().map(|d| d.name()).collect(),
                attributes: Vec::new(),
                data,
            };
            for attr in var.attributes() {
                if let AttributeValue::Str(value) = attr.value()? {
                    variable.attributes.push((attr.name().into(), value));
                }
            }
            ds.add_variable(variable);
        }
        Ok(ds)
    }
}
