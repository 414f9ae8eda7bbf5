//! Bidirectional traversal over the flattened edge set.
//!
//! A [`Cursor`] borrows its graph, so the graph cannot be mutated while the cursor is alive.
//! To erase through a cursor, detach it with [`Cursor::position`] and hand the [`Position`] to
//! [`Graph::erase_edge_at`]. Positions are stamped with the identity of the graph they came from
//! and its mutation generation. They are rejected by any other graph, and by their own graph once
//! it has changed, except for the successor returned by the erase itself.

use crate::adjacency::Coords;
use crate::edge::{Edge, EdgeRef};
use crate::graph::Graph;
use std::fmt;
use std::iter::FusedIterator;

/// A cursor location detached from the graph borrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) at: Option<Coords>,
    pub(crate) owner: u64,
    pub(crate) generation: u64,
}

impl Position {
    pub fn is_end(&self) -> bool {
        self.at.is_none()
    }
}

/// A position in the ascending `(from, to, weight)` edge sequence of a [`Graph`], or its end.
pub struct Cursor<'g, N, E> {
    graph: &'g Graph<N, E>,
    at: Option<Coords>,
}

impl<'g, N, E> Cursor<'g, N, E> {
    pub(crate) fn new(graph: &'g Graph<N, E>, at: Option<Coords>) -> Self {
        Self { graph, at }
    }

    pub fn is_end(&self) -> bool {
        self.at.is_none()
    }

    /// The edge under the cursor, or `None` at the end.
    pub fn get(&self) -> Option<EdgeRef<'g, N, E>> {
        self.at.map(|at| self.graph.edge_at(at))
    }

    pub fn position(&self) -> Position {
        self.graph.position(self.at)
    }
}

impl<N: Ord, E: Ord> Cursor<'_, N, E> {
    /// Advances to the next edge. At the end this does nothing.
    pub fn move_next(&mut self) {
        if let Some(at) = self.at {
            self.at = self.graph.step_next(at);
        }
    }

    /// Steps back one edge; from the end this lands on the last edge.
    ///
    /// Returns `false` (and stays put) when there is no previous edge, i.e. at `begin()` or on an
    /// edgeless graph.
    pub fn move_prev(&mut self) -> bool {
        match self.graph.step_prev(self.at) {
            Some(at) => {
                self.at = Some(at);
                true
            }
            None => false,
        }
    }
}

impl<N: Clone, E: Clone> Cursor<'_, N, E> {
    /// The edge under the cursor as an owned value.
    pub fn value(&self) -> Option<Edge<N, E>> {
        self.get().map(|e| e.to_edge())
    }
}

impl<N, E> Clone for Cursor<'_, N, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N, E> Copy for Cursor<'_, N, E> {}

impl<N, E> PartialEq for Cursor<'_, N, E> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.at == other.at
    }
}

impl<N, E> Eq for Cursor<'_, N, E> {}

impl<N: fmt::Debug, E: fmt::Debug> fmt::Debug for Cursor<'_, N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(edge) => f.debug_tuple("Cursor").field(&edge).finish(),
            None => f.write_str("Cursor(end)"),
        }
    }
}

/// Double-ended iterator over every edge of a graph in ascending order.
///
/// Both ends step with the same algorithm as [`Cursor`]; `remaining` keeps them from crossing.
pub struct Edges<'g, N, E> {
    graph: &'g Graph<N, E>,
    front: Option<Coords>,
    // Exclusive: the back end points one past the next edge `next_back` yields.
    back: Option<Coords>,
    remaining: usize,
}

impl<'g, N: Ord, E: Ord> Edges<'g, N, E> {
    pub(crate) fn new(graph: &'g Graph<N, E>) -> Self {
        Self {
            graph,
            front: graph.adjacency().first(),
            back: None,
            remaining: graph.edge_count(),
        }
    }
}

impl<'g, N: Ord, E: Ord> Iterator for Edges<'g, N, E> {
    type Item = EdgeRef<'g, N, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let at = self.front?;
        self.remaining -= 1;
        self.front = self.graph.step_next(at);
        Some(self.graph.edge_at(at))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<N: Ord, E: Ord> DoubleEndedIterator for Edges<'_, N, E> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let at = self.graph.step_prev(self.back)?;
        self.remaining -= 1;
        self.back = Some(at);
        Some(self.graph.edge_at(at))
    }
}

impl<N: Ord, E: Ord> ExactSizeIterator for Edges<'_, N, E> {}

impl<N: Ord, E: Ord> FusedIterator for Edges<'_, N, E> {}

impl<N, E> Clone for Edges<'_, N, E> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}
