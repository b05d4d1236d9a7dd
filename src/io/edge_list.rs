//! # EdgeList
//!
//! The EdgeList-Format consists of non-comment-lines `u v` representing an edge `Edge(u, v)`
//! with 0-based node ids. Blank lines and lines starting with the comment identifier are
//! skipped, further tokens after the two endpoints are ignored. There is no header: the
//! number of nodes is one more than the largest node id found. Ids at or beyond the reader's
//! node limit are rejected, as every id up to the largest one gets its own incidence lists.

use std::{
    fs::File,
    io::{BufRead, BufReader, ErrorKind},
    path::Path,
};

use super::*;
use crate::ops::GraphFromScratch;

/// A GraphReader for the EdgeList-Format
#[derive(Debug, Clone)]
pub struct EdgeListReader {
    /// Lines starting with `comment_identifier` are skipped when reading
    comment_identifier: String,
    /// Lower bound on the number of nodes, for isolated nodes with large ids
    min_nodes: NumNodes,
    /// Node ids must stay below this bound
    max_nodes: NumNodes,
    /// Whether `u v` means `u -> v` or `{u, v}`
    directed: bool,
}

/// Default upper bound on the number of nodes a reader accepts
pub const DEFAULT_MAX_NODES: NumNodes = 1 << 27;

impl Default for EdgeListReader {
    fn default() -> Self {
        Self {
            comment_identifier: "#".to_string(),
            min_nodes: 0,
            max_nodes: DEFAULT_MAX_NODES,
            directed: true,
        }
    }
}

impl EdgeListReader {
    /// Creates a new (default) reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the comment identifier
    pub fn comment_identifier<S: Into<String>>(mut self, c: S) -> EdgeListReader {
        self.comment_identifier = c.into();
        self
    }

    /// The network gets at least `n` nodes
    pub fn min_nodes(mut self, n: NumNodes) -> EdgeListReader {
        self.min_nodes = n;
        self
    }

    /// Rejects node ids of `n` or more
    pub fn max_nodes(mut self, n: NumNodes) -> EdgeListReader {
        self.max_nodes = n;
        self
    }

    /// Reads the edges as directed (default) or undirected
    pub fn directed(mut self, directed: bool) -> EdgeListReader {
        self.directed = directed;
        self
    }

    fn is_comment(&self, line: &str) -> bool {
        !self.comment_identifier.is_empty() && line.starts_with(&self.comment_identifier)
    }

    /// Parses all edges and returns them together with the number of nodes
    pub fn try_read_edges<R: BufRead>(&self, reader: R) -> Result<(NumNodes, Vec<Edge>)> {
        let mut edges = Vec::new();
        let mut n = self.min_nodes;

        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || self.is_comment(line) {
                continue;
            }

            let line_number = line_number + 1;
            let mut parts = line.split_whitespace();
            let u: Node = parse_next_value!(parts, "source node", line_number);
            let v: Node = parse_next_value!(parts, "target node", line_number);

            raise_error_unless!(
                u < INVALID_NODE && v < INVALID_NODE,
                ErrorKind::InvalidData,
                format!("Node id out of range in line {line_number}.")
            );
            raise_error_unless!(
                u < self.max_nodes && v < self.max_nodes,
                ErrorKind::InvalidData,
                format!(
                    "Node id {} in line {line_number} exceeds the limit of {} nodes.",
                    u.max(v),
                    self.max_nodes
                )
            );

            n = n.max(u + 1).max(v + 1);
            edges.push(Edge(u, v));
        }

        Ok((n, edges))
    }
}

impl<G: GraphFromScratch> GraphReader<G> for EdgeListReader {
    fn try_read_graph<R: BufRead>(&self, reader: R) -> Result<G> {
        let (n, edges) = self.try_read_edges(reader)?;
        Ok(if self.directed {
            G::from_edges(n, edges)
        } else {
            G::from_undirected_edges(n, edges)
        })
    }
}

/// Trait for creating networks from an EdgeListReader.
/// Used as shorthand for default EdgeListReader settings
pub trait EdgeListRead: Sized {
    /// Tries to read the network from a given reader
    fn try_read_edge_list<R: BufRead>(reader: R) -> Result<Self>;

    /// Tries to read the network from a given file
    fn try_read_edge_list_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::try_read_edge_list(BufReader::new(File::open(path)?))
    }
}

impl<G> EdgeListRead for G
where
    G: GraphFromScratch,
{
    fn try_read_edge_list<R: BufRead>(reader: R) -> Result<Self> {
        EdgeListReader::default().try_read_graph(reader)
    }
}
