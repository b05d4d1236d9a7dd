/*!
# IO

Utilities for reading networks from files.

## Input Formats

Currently supported input formats:
- **EdgeList**: Represents the network as a list of edges `u v` separated by line breaks.
  Nodes are 0-based, the number of nodes follows from the largest node id.

## Traits

To generalize over reading:
- [`GraphReader`] is implemented by readers for a specific format.
- [`GraphRead`] abstracts over reading using a given [`FileFormat`].
*/

pub mod edge_list;

use std::{
    fs::File,
    io::{BufRead, BufReader, ErrorKind, Result},
    path::Path,
    str::FromStr,
};

use crate::prelude::*;

pub use edge_list::*;

/// Identifier for a network file format.
///
/// Used in [`GraphRead`] to determine the correct parser to use.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum FileFormat {
    /// Edge list format
    #[default]
    EdgeList,
}

impl FileFormat {
    /// Guesses the format from the extension of `path`
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        match extension.to_lowercase().as_str() {
            "txt" | "edges" | "el" => Ok(FileFormat::EdgeList),
            _ => Err(io_error!(
                ErrorKind::InvalidInput,
                format!("Cannot detect FileFormat of {}", path.as_ref().display())
            )),
        }
    }
}

impl FromStr for FileFormat {
    type Err = std::io::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "edgelist" | "edge_list" | "edges" => Ok(FileFormat::EdgeList),
            _ => Err(io_error!(
                ErrorKind::InvalidInput,
                format!("Unknown FileFormat: {s}")
            )),
        }
    }
}

/// Trait for types that can read networks in a specific format.
///
/// This trait provides both a low-level method to read from any
/// [`BufRead`] instance and a convenience wrapper to read directly
/// from files.
pub trait GraphReader<G> {
    /// Reads a network from the given reader according to the settings in `self`.
    ///
    /// # Errors
    /// Returns an error if the input is not a valid representation
    /// of a network in the expected format.
    fn try_read_graph<R>(&self, reader: R) -> Result<G>
    where
        R: BufRead;

    /// Reads a network from a file according to the settings in `self`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or if its contents
    /// are not a valid representation of a network in the expected format.
    fn try_read_graph_file<P>(&self, path: P) -> Result<G>
    where
        P: AsRef<Path>,
    {
        self.try_read_graph(BufReader::new(File::open(path)?))
    }
}

/// Trait for reading networks when only a [`FileFormat`] is known.
pub trait GraphRead: Sized {
    /// Reads a network from the given reader according to the specified [`FileFormat`].
    fn try_from_reader<R>(reader: R, format: FileFormat) -> Result<Self>
    where
        R: BufRead;

    /// Reads a network from the given file according to the specified [`FileFormat`].
    fn try_from_file<P>(path: P, format: FileFormat) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        Self::try_from_reader(BufReader::new(File::open(path)?), format)
    }
}

impl<G> GraphRead for G
where
    G: EdgeListRead,
{
    fn try_from_reader<R>(reader: R, format: FileFormat) -> Result<Self>
    where
        R: BufRead,
    {
        match format {
            FileFormat::EdgeList => Self::try_read_edge_list(reader),
        }
    }
}

/// Shorthand for creating a new IO-error
macro_rules! io_error {
    ($kind: expr, $info: expr) => {
        std::io::Error::new($kind, $info)
    };
}

/// Shorthand for returning `Err(std::io::Error)` early when a condition fails
macro_rules! raise_error_unless {
    ($cond : expr, $kind : expr, $info : expr) => {
        if !($cond) {
            return Err(io_error!($kind, $info));
        }
    };
}

/// Tries to parse the next value in an iterator and returns early if it fails
macro_rules! parse_next_value {
    ($iterator : expr, $name : expr, $line : expr) => {{
        let Some(token) = $iterator.next() else {
            return Err(io_error!(
                ErrorKind::InvalidData,
                format!("Premature end of line {} when parsing {}.", $line, $name)
            ));
        };

        match token.parse() {
            Ok(value) => value,
            Err(_) => {
                return Err(io_error!(
                    ErrorKind::InvalidData,
                    format!("Invalid value `{token}` in line {}. Cannot parse {}.", $line, $name)
                ));
            }
        }
    }};
}

use io_error;
use parse_next_value;
use raise_error_unless;
