#![forbid(unsafe_code)]

//! A generic in-memory directed, weighted multigraph.
//!
//! Nodes are unique `Ord` values and are always reported in ascending order. Edges join an
//! ordered pair of nodes and carry an `Ord` weight; the same pair may be joined several times
//! with different weights. Edges are traversed in ascending `(from, to, weight)` order, either
//! with the bidirectional [`Cursor`] or the double-ended [`Edges`] iterator.
//!
//! ```
//! use dwgraph::Graph;
//!
//! let mut g: Graph<i32, i32> = Graph::from([1, 3, 4, 2]);
//! g.insert_edge(&1, &4, 3)?;
//! g.insert_edge(&2, &4, 2)?;
//! g.insert_edge(&1, &1, 2)?;
//!
//! assert_eq!(g.nodes(), vec![1, 2, 3, 4]);
//! let edges: Vec<_> = g.iter().map(|e| (*e.from, *e.to, *e.weight)).collect();
//! assert_eq!(edges, vec![(1, 1, 2), (1, 4, 3), (2, 4, 2)]);
//! # Ok::<(), dwgraph::Error>(())
//! ```
//!
//! Value storage is interned: a node or weight value that appears in many places is stored once.

mod adjacency;
pub mod cursor;
pub mod edge;
pub mod error;
pub mod graph;
mod store;

pub use cursor::{Cursor, Edges, Position};
pub use edge::{Edge, EdgeRef};
pub use error::{Error, Result};
pub use graph::Graph;
