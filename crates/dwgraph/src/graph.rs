//! The [`Graph`] container.
//!
//! Nodes live in an interning store whose value-ordered index doubles as the node registry. Edges
//! live in [`Adjacency`], three ordered levels of interned keys. Every public mutation validates
//! before it touches storage, and bumps the generation that detached [`Position`]s are checked
//! against.

use crate::adjacency::{Adjacency, Coords, Triple};
use crate::cursor::{Cursor, Edges, Position};
use crate::edge::EdgeRef;
use crate::error::{Error, Result};
use crate::store::{Handle, ValueStore};
use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::BuildHasher;

const TRACE_TARGET: &str = "dwgraph::graph";

fn missing(operation: &'static str, requirement: &'static str) -> Error {
    Error::MissingNode {
        operation,
        requirement,
    }
}

/// A fresh identity for a graph instance. Each `RandomState` is keyed differently, so two calls
/// practically never agree.
fn instance_tag() -> u64 {
    RandomState::new().hash_one(TRACE_TARGET)
}

/// A directed, weighted multigraph with ascending node and edge order.
///
/// Two edges may join the same ordered pair of nodes as long as their weights differ.
pub struct Graph<N, E> {
    nodes: ValueStore<N>,
    weights: ValueStore<E>,
    edges: Adjacency<N, E>,
    edge_count: usize,
    owner: u64,
    generation: u64,
}

impl<N, E> Graph<N, E> {
    pub fn new() -> Self {
        Self {
            nodes: ValueStore::new(),
            weights: ValueStore::new(),
            edges: Adjacency::default(),
            edge_count: 0,
            owner: instance_tag(),
            generation: 0,
        }
    }

    /// Moves the contents out, leaving `self` empty.
    ///
    /// Positions taken before the move are accepted by the returned graph and rejected by `self`.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Nodes in ascending order, borrowed.
    pub fn node_iter(&self) -> impl DoubleEndedIterator<Item = &N> + ExactSizeIterator + '_ {
        self.nodes.values()
    }

    pub fn end(&self) -> Cursor<'_, N, E> {
        Cursor::new(self, None)
    }

    pub(crate) fn adjacency(&self) -> &Adjacency<N, E> {
        &self.edges
    }

    pub(crate) fn edge_at(&self, at: Coords) -> EdgeRef<'_, N, E> {
        let (src, dst, weight) = at.triple();
        EdgeRef {
            from: self.nodes.get(src),
            to: self.nodes.get(dst),
            weight: self.weights.get(weight),
        }
    }

    pub(crate) fn position(&self, at: Option<Coords>) -> Position {
        Position {
            at,
            owner: self.owner,
            generation: self.generation,
        }
    }
}

impl<N, E> Graph<N, E>
where
    N: Ord,
    E: Ord,
{
    /// Edges in ascending `(from, to, weight)` order.
    pub fn iter(&self) -> Edges<'_, N, E> {
        Edges::new(self)
    }

    /// Cursor at the first edge, or at the end if there are no edges.
    pub fn begin(&self) -> Cursor<'_, N, E> {
        Cursor::new(self, self.edges.first())
    }

    /// Re-attaches a detached position.
    pub fn cursor_at(&self, position: Position) -> Result<Cursor<'_, N, E>> {
        self.check_position(position, "cursor_at")?;
        Ok(Cursor::new(self, position.at))
    }

    pub(crate) fn step_next(&self, at: Coords) -> Option<Coords> {
        self.edges.next(&self.nodes, &self.weights, at)
    }

    pub(crate) fn step_prev(&self, at: Option<Coords>) -> Option<Coords> {
        self.edges.prev(&self.nodes, &self.weights, at)
    }

    fn check_position(&self, position: Position, operation: &'static str) -> Result<()> {
        let current = position.owner == self.owner && position.generation == self.generation;
        let in_range = position
            .at
            .is_none_or(|at| self.edges.contains(&self.nodes, &self.weights, at));
        if !current || !in_range {
            return Err(Error::StalePosition { operation });
        }
        Ok(())
    }
}

impl<N, E> Graph<N, E>
where
    N: Ord + Clone,
    E: Ord + Clone,
{
    pub fn from_nodes<I: IntoIterator<Item = N>>(nodes: I) -> Self {
        let mut g = Self::new();
        g.extend(nodes);
        g
    }

    /// Adds `value` as a node. Returns `false` if it was already present.
    pub fn insert_node(&mut self, value: N) -> bool {
        if self.nodes.contains(&value) {
            return false;
        }
        self.nodes.intern(value);
        self.touch();
        true
    }

    /// Adds the edge `src -> dst` with `weight`. Both nodes must already exist.
    ///
    /// Returns `Ok(false)` if this exact edge is already stored.
    pub fn insert_edge<Q>(&mut self, src: &Q, dst: &Q, weight: E) -> Result<bool>
    where
        N: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (Some(src), Some(dst)) = (self.nodes.lookup(src), self.nodes.lookup(dst)) else {
            return Err(missing(
                "insert_edge",
                "when either src or dst node does not exist",
            ));
        };
        let (weight, _) = self.weights.intern(weight);
        let inserted = self.link(src, dst, weight);
        self.weights.release(weight);
        if inserted {
            self.touch();
        }
        Ok(inserted)
    }

    /// Relabels `old` as `new`, keeping every edge.
    ///
    /// Returns `Ok(false)` without changing anything if `new` is already a node.
    pub fn replace_node<Q>(&mut self, old: &Q, new: N) -> Result<bool>
    where
        N: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(node) = self.nodes.lookup(old) else {
            return Err(missing("replace_node", "on a node that doesn't exist"));
        };
        let Some(previous) = self.nodes.relabel(node, new) else {
            return Ok(false);
        };
        self.edges.rekey(&previous, self.nodes.key(node));
        tracing::trace!(target: TRACE_TARGET, "relabeled node");
        self.touch();
        Ok(true)
    }

    /// Re-points every edge touching `old` at `new`, then erases `old`.
    ///
    /// Edges that become identical to one already incident to `new` collapse into it.
    pub fn merge_replace_node<Q>(&mut self, old: &Q, new: &Q) -> Result<()>
    where
        N: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (Some(old), Some(new)) = (self.nodes.lookup(old), self.nodes.lookup(new)) else {
            return Err(missing(
                "merge_replace_node",
                "on old or new data if they don't exist in the graph",
            ));
        };
        if old == new {
            return Ok(());
        }

        let incident = self.edges.incident(old);
        let mut collapsed = 0usize;
        for &(src, dst, weight) in &incident {
            let src = if src == old { new } else { src };
            let dst = if dst == old { new } else { dst };
            if !self.link(src, dst, weight) {
                collapsed += 1;
            }
        }
        self.unlink_node(old);
        tracing::debug!(
            target: TRACE_TARGET,
            moved = incident.len(),
            collapsed,
            "merged node into existing node"
        );
        self.touch();
        Ok(())
    }

    /// Removes `value` and every edge to or from it. Returns `false` if it was not a node.
    pub fn erase_node<Q>(&mut self, value: &Q) -> bool
    where
        N: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(node) = self.nodes.lookup(value) else {
            return false;
        };
        self.unlink_node(node);
        self.touch();
        true
    }

    /// Removes the edge `src -> dst` with `weight`. Both nodes must exist.
    pub fn erase_edge<Q, R>(&mut self, src: &Q, dst: &Q, weight: &R) -> Result<bool>
    where
        N: Borrow<Q>,
        E: Borrow<R>,
        Q: Ord + ?Sized,
        R: Ord + ?Sized,
    {
        let (Some(src), Some(dst)) = (self.nodes.lookup(src), self.nodes.lookup(dst)) else {
            return Err(missing(
                "erase_edge",
                "on src or dst if they don't exist in the graph",
            ));
        };
        let Some(weight) = self.weights.lookup(weight) else {
            return Ok(false);
        };
        let Some(at) = self.locate((src, dst, weight)) else {
            return Ok(false);
        };
        self.unlink_at(at);
        self.touch();
        Ok(true)
    }

    /// Removes the edge at `position` and returns the position of the edge that followed it.
    ///
    /// Erasing at the end is a no-op that returns the end.
    pub fn erase_edge_at(&mut self, position: Position) -> Result<Position> {
        self.check_position(position, "erase_edge_at")?;
        let Some(at) = position.at else {
            return Ok(position);
        };
        let next = self.unlink_at(at);
        self.touch();
        Ok(self.position(next))
    }

    /// Removes every edge in `[first, last)` and returns the position now holding `last`'s edge.
    pub fn erase_edge_range(&mut self, first: Position, last: Position) -> Result<Position> {
        self.check_position(first, "erase_edge_range")?;
        self.check_position(last, "erase_edge_range")?;

        let mut span = 0usize;
        let mut at = first.at;
        while at != last.at {
            let Some(c) = at else {
                return Err(Error::InvalidRange {
                    operation: "erase_edge_range",
                });
            };
            span += 1;
            at = self.step_next(c);
        }
        if span == 0 {
            return Ok(first);
        }

        let mut at = first.at;
        for _ in 0..span {
            let Some(c) = at else {
                debug_assert!(false, "range walk ended before reaching its last position");
                break;
            };
            at = self.unlink_at(c);
        }
        tracing::trace!(target: TRACE_TARGET, erased = span, "erased edge range");
        self.touch();
        Ok(self.position(at))
    }

    /// Removes all nodes and edges.
    pub fn clear(&mut self) {
        tracing::trace!(
            target: TRACE_TARGET,
            nodes = self.nodes.len(),
            edges = self.edge_count,
            "cleared graph"
        );
        self.nodes.clear();
        self.weights.clear();
        self.edges.clear();
        self.edge_count = 0;
        self.touch();
    }

    pub fn is_node<Q>(&self, value: &Q) -> bool
    where
        N: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.nodes.contains(value)
    }

    /// Whether at least one edge runs from `src` to `dst`. Both nodes must exist.
    pub fn is_connected<Q>(&self, src: &Q, dst: &Q) -> Result<bool>
    where
        N: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (Some(src), Some(dst)) = (self.nodes.lookup(src), self.nodes.lookup(dst)) else {
            return Err(missing(
                "is_connected",
                "if src or dst node don't exist in the graph",
            ));
        };
        let mut weights = self
            .edges
            .weights_between(self.nodes.key(src), self.nodes.key(dst));
        Ok(weights.next().is_some())
    }

    /// A sorted snapshot of every node.
    pub fn nodes(&self) -> Vec<N> {
        self.nodes.values().cloned().collect()
    }

    /// Sorted weights of the edges from `src` to `dst`. Both nodes must exist.
    pub fn weights<Q>(&self, src: &Q, dst: &Q) -> Result<Vec<E>>
    where
        N: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (Some(src), Some(dst)) = (self.nodes.lookup(src), self.nodes.lookup(dst)) else {
            return Err(missing(
                "weights",
                "if src or dst node don't exist in the graph",
            ));
        };
        Ok(self
            .edges
            .weights_between(self.nodes.key(src), self.nodes.key(dst))
            .map(|w| w.value().clone())
            .collect())
    }

    /// Sorted distinct destinations of edges leaving `src`.
    pub fn connections<Q>(&self, src: &Q) -> Result<Vec<N>>
    where
        N: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(src) = self.nodes.lookup(src) else {
            return Err(missing(
                "connections",
                "if src doesn't exist in the graph",
            ));
        };
        Ok(self
            .edges
            .destinations(self.nodes.key(src))
            .map(|t| t.value().clone())
            .collect())
    }

    /// Cursor at the edge `src -> dst` with `weight`, or the end if there is none.
    pub fn find<Q, R>(&self, src: &Q, dst: &Q, weight: &R) -> Cursor<'_, N, E>
    where
        N: Borrow<Q>,
        E: Borrow<R>,
        Q: Ord + ?Sized,
        R: Ord + ?Sized,
    {
        let triple = self
            .nodes
            .lookup(src)
            .zip(self.nodes.lookup(dst))
            .zip(self.weights.lookup(weight));
        let at = triple.and_then(|((src, dst), weight)| self.locate((src, dst, weight)));
        Cursor::new(self, at)
    }

    fn locate(&self, (src, dst, weight): Triple<N, E>) -> Option<Coords> {
        self.edges.locate(
            self.nodes.key(src),
            self.nodes.key(dst),
            self.weights.key(weight),
        )
    }

    /// Stores a triple of live handles, taking a weight reference if it is new.
    fn link(&mut self, src: Handle<N>, dst: Handle<N>, weight: Handle<E>) -> bool {
        let inserted = self.edges.insert(
            self.nodes.key(src),
            self.nodes.key(dst),
            self.weights.key(weight),
        );
        if !inserted {
            return false;
        }
        self.weights.retain(weight);
        self.edge_count += 1;
        true
    }

    fn unlink_at(&mut self, at: Coords) -> Option<Coords> {
        let next = self.edges.remove_at(&self.nodes, &self.weights, at);
        let (_, _, weight) = at.triple::<N, E>();
        self.weights.release(weight);
        self.edge_count -= 1;
        next
    }

    fn unlink_node(&mut self, node: Handle<N>) {
        let released = self.edges.detach(self.nodes.key(node));
        for &weight in &released {
            self.weights.release(weight);
        }
        self.edge_count -= released.len();
        self.nodes.release(node);
        tracing::trace!(
            target: TRACE_TARGET,
            incident_edges = released.len(),
            "erased node"
        );
    }

    /// Ends a successful mutation.
    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        debug_assert!(self.is_consistent(), "graph invariants violated");
    }

    fn is_consistent(&self) -> bool {
        let mut edges = 0usize;
        for targets in self.edges.sources().values() {
            if targets.is_empty() {
                return false;
            }
            for set in targets.values() {
                if set.is_empty() {
                    return false;
                }
                edges += set.len();
            }
        }
        let registered = self.edges.node_handles().into_iter().all(|h| {
            self.nodes
                .try_key(h)
                .is_some_and(|key| self.nodes.lookup(key.value()) == Some(h))
        });
        registered && edges == self.edge_count
    }
}

/// Deep copy with a fresh identity: positions from `self` are not accepted by the clone.
impl<N, E> Clone for Graph<N, E>
where
    N: Ord + Clone,
    E: Ord + Clone,
{
    fn clone(&self) -> Self {
        let nodes = self.nodes.clone();
        let weights = self.weights.clone();
        let edges = self.edges.rebuild(&nodes, &weights);
        Self {
            nodes,
            weights,
            edges,
            edge_count: self.edge_count,
            owner: instance_tag(),
            generation: 0,
        }
    }
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> Extend<N> for Graph<N, E>
where
    N: Ord + Clone,
    E: Ord + Clone,
{
    fn extend<I: IntoIterator<Item = N>>(&mut self, iter: I) {
        for node in iter {
            self.insert_node(node);
        }
    }
}

impl<N, E> FromIterator<N> for Graph<N, E>
where
    N: Ord + Clone,
    E: Ord + Clone,
{
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self::from_nodes(iter)
    }
}

impl<N, E, const K: usize> From<[N; K]> for Graph<N, E>
where
    N: Ord + Clone,
    E: Ord + Clone,
{
    fn from(nodes: [N; K]) -> Self {
        Self::from_nodes(nodes)
    }
}

impl<N, E> From<&[N]> for Graph<N, E>
where
    N: Ord + Clone,
    E: Ord + Clone,
{
    fn from(nodes: &[N]) -> Self {
        Self::from_nodes(nodes.iter().cloned())
    }
}

impl<'g, N: Ord, E: Ord> IntoIterator for &'g Graph<N, E> {
    type Item = EdgeRef<'g, N, E>;
    type IntoIter = Edges<'g, N, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<N: Ord, E: Ord> PartialEq for Graph<N, E> {
    fn eq(&self, other: &Self) -> bool {
        // Lengths first, so the pairwise walks below never outrun either side.
        if self.node_count() != other.node_count() || self.edge_count() != other.edge_count() {
            return false;
        }
        self.node_iter().zip(other.node_iter()).all(|(a, b)| a == b)
            && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<N: Ord, E: Ord> Eq for Graph<N, E> {}

impl<N: Ord + fmt::Debug, E: Ord + fmt::Debug> fmt::Debug for Graph<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.node_iter().collect::<Vec<_>>())
            .field(
                "edges",
                &self
                    .iter()
                    .map(|e| (e.from, e.to, e.weight))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// One bracketed block per node, ascending:
///
/// ```text
/// 1 (
///   4 | 3
///   4 | 5
/// )
/// 3 (
/// )
/// ```
impl<N: Ord + fmt::Display, E: Ord + fmt::Display> fmt::Display for Graph<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut edges = self.iter().peekable();
        for node in self.node_iter() {
            writeln!(f, "{node} (")?;
            while let Some(edge) = edges.next_if(|e| e.from == node) {
                writeln!(f, "  {} | {}", edge.to, edge.weight)?;
            }
            writeln!(f, ")")?;
        }
        Ok(())
    }
}
