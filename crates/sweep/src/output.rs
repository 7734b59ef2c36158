//! Flat-text sweep output.
//!
//! The first line holds the six grid scalars
//! `n_min n_max n_step m_min m_max m_step`; every following line holds the
//! space separated column means of one grid point, neighbourhood size
//! outermost.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::config::{RateRange, SizeRange, SweepConfig};
use crate::grid::GridResult;

/// The six grid scalars heading a sweep file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridHeader {
    pub neighbourhood_sizes: SizeRange,
    pub mobility_rates: RateRange,
}

impl GridHeader {
    pub fn from_config(config: &SweepConfig) -> Self {
        Self {
            neighbourhood_sizes: config.neighbourhood_sizes,
            mobility_rates: config.mobility_rates,
        }
    }

    fn parse(line: &str) -> Result<Self, OutputError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(OutputError::malformed(1, format!("expected 6 header fields, got {}", fields.len())));
        }
        let size = |i: usize| -> Result<usize, OutputError> {
            fields[i]
                .parse()
                .map_err(|_| OutputError::malformed(1, format!("invalid neighbourhood size {:?}", fields[i])))
        };
        let rate = |i: usize| -> Result<f64, OutputError> {
            fields[i]
                .parse()
                .map_err(|_| OutputError::malformed(1, format!("invalid mobility rate {:?}", fields[i])))
        };

        Ok(Self {
            neighbourhood_sizes: SizeRange {
                min: size(0)?,
                max: size(1)?,
                step: size(2)?,
            },
            mobility_rates: RateRange {
                min: rate(3)?,
                max: rate(4)?,
                step: rate(5)?,
            },
        })
    }
}

/// Errors reading or writing sweep files.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },
}

impl OutputError {
    fn malformed(line: usize, message: impl Into<String>) -> Self {
        OutputError::Malformed {
            line,
            message: message.into(),
        }
    }
}

/// Streams a sweep file: the header on creation, then one line per result.
pub struct SweepWriter<W: Write> {
    writer: W,
    rows_written: usize,
}

impl SweepWriter<BufWriter<File>> {
    /// Creates the file at `path`, creating parent directories as needed.
    pub fn create(path: &Path, header: &GridHeader) -> Result<Self, OutputError> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        Self::new(BufWriter::new(File::create(path)?), header)
    }
}

impl<W: Write> SweepWriter<W> {
    pub fn new(mut writer: W, header: &GridHeader) -> Result<Self, OutputError> {
        let sizes = header.neighbourhood_sizes;
        let rates = header.mobility_rates;
        writeln!(
            writer,
            "{} {} {} {} {} {}",
            sizes.min, sizes.max, sizes.step, rates.min, rates.max, rates.step
        )?;
        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    pub fn write_result(&mut self, result: &GridResult) -> Result<(), OutputError> {
        let row: Vec<String> = result.means.iter().map(|v| v.to_string()).collect();
        writeln!(self.writer, "{}", row.join(" "))?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(mut self) -> Result<W, OutputError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// A parsed sweep file.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepTable {
    pub header: GridHeader,
    /// Column means per grid point, in file order
    pub rows: Vec<[f64; 7]>,
}

impl SweepTable {
    pub fn read(path: &Path) -> Result<Self, OutputError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, OutputError> {
        let mut lines = reader.lines();
        let header = match lines.next() {
            Some(line) => GridHeader::parse(&line?)?,
            None => return Err(OutputError::malformed(1, "missing header")),
        };

        let mut rows = Vec::new();
        for (i, line) in lines.enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let number = i + 2;
            let values = line
                .split_whitespace()
                .map(|v| v.parse::<f64>())
                .collect::<Result<Vec<f64>, _>>()
                .map_err(|e| OutputError::malformed(number, e.to_string()))?;
            let row: [f64; 7] = values
                .try_into()
                .map_err(|v: Vec<f64>| OutputError::malformed(number, format!("expected 7 values, got {}", v.len())))?;
            rows.push(row);
        }
        Ok(Self { header, rows })
    }

    fn num_sizes(&self) -> usize {
        self.header.neighbourhood_sizes.values().len()
    }

    fn num_rates(&self) -> usize {
        self.header.mobility_rates.count()
    }

    /// Column `column` averaged over neighbourhood sizes, one value per
    /// mobility rate.
    pub fn mean_by_mobility(&self, column: usize) -> Vec<f64> {
        let (sizes, rates) = (self.num_sizes(), self.num_rates());
        (0..rates)
            .map(|m| {
                let values: Vec<f64> = (0..sizes)
                    .filter_map(|n| self.rows.get(n * rates + m))
                    .map(|row| row[column])
                    .collect();
                mean(&values)
            })
            .collect()
    }

    /// Column `column` averaged over mobility rates, one value per
    /// neighbourhood size.
    pub fn mean_by_neighbourhood_size(&self, column: usize) -> Vec<f64> {
        let (sizes, rates) = (self.num_sizes(), self.num_rates());
        (0..sizes)
            .map(|n| {
                let values: Vec<f64> = (0..rates)
                    .filter_map(|m| self.rows.get(n * rates + m))
                    .map(|row| row[column])
                    .collect();
                mean(&values)
            })
            .collect()
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
