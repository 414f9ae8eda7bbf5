//! Edge value types.

use std::fmt;

/// An owned edge: `from -> to` carrying `weight`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge<N, E> {
    pub from: N,
    pub to: N,
    pub weight: E,
}

impl<N, E> Edge<N, E> {
    pub fn new(from: N, to: N, weight: E) -> Self {
        Self { from, to, weight }
    }
}

impl<N, E> From<(N, N, E)> for Edge<N, E> {
    fn from((from, to, weight): (N, N, E)) -> Self {
        Self { from, to, weight }
    }
}

/// A borrowed view of a stored edge, as yielded by cursors and [`Edges`](crate::Edges).
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeRef<'g, N, E> {
    pub from: &'g N,
    pub to: &'g N,
    pub weight: &'g E,
}

impl<N, E> Clone for EdgeRef<'_, N, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N, E> Copy for EdgeRef<'_, N, E> {}

impl<N: fmt::Debug, E: fmt::Debug> fmt::Debug for EdgeRef<'_, N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeRef")
            .field("from", self.from)
            .field("to", self.to)
            .field("weight", self.weight)
            .finish()
    }
}

impl<N: Clone, E: Clone> EdgeRef<'_, N, E> {
    pub fn to_edge(&self) -> Edge<N, E> {
        Edge {
            from: self.from.clone(),
            to: self.to.clone(),
            weight: self.weight.clone(),
        }
    }
}

impl<N: PartialEq, E: PartialEq> PartialEq<Edge<N, E>> for EdgeRef<'_, N, E> {
    fn eq(&self, other: &Edge<N, E>) -> bool {
        *self.from == other.from && *self.to == other.to && *self.weight == other.weight
    }
}

impl<N: PartialEq, E: PartialEq> PartialEq<EdgeRef<'_, N, E>> for Edge<N, E> {
    fn eq(&self, other: &EdgeRef<'_, N, E>) -> bool {
        other == self
    }
}

impl<N: PartialEq, E: PartialEq> PartialEq<(N, N, E)> for EdgeRef<'_, N, E> {
    fn eq(&self, (from, to, weight): &(N, N, E)) -> bool {
        self.from == from && self.to == to && self.weight == weight
    }
}
