//! Edge storage: source entries -> destination entries -> weight sets.
//!
//! Each level is a `BTreeMap`/`BTreeSet` keyed by [`Interned`] handles, so it is ordered by the
//! values behind them and inserts in logarithmic time. Empty levels never survive a removal: a
//! destination whose weight set empties is dropped, and so is a source with no destinations.
//! The cursor relies on this to step without skipping.

use crate::store::{Handle, Interned, ValueStore};
use rustc_hash::FxHashSet;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound::{Excluded, Unbounded};

/// The handles of one edge, in a form that does not borrow the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Coords {
    source: u32,
    target: u32,
    weight: u32,
}

impl Coords {
    fn of<N, E>(source: &Interned<N>, target: &Interned<N>, weight: &Interned<E>) -> Self {
        Self {
            source: source.handle().raw(),
            target: target.handle().raw(),
            weight: weight.handle().raw(),
        }
    }

    pub(crate) fn triple<N, E>(self) -> Triple<N, E> {
        (
            Handle::from_raw(self.source),
            Handle::from_raw(self.target),
            Handle::from_raw(self.weight),
        )
    }
}

/// An edge as three handles.
pub(crate) type Triple<N, E> = (Handle<N>, Handle<N>, Handle<E>);

pub(crate) type Targets<N, E> = BTreeMap<Interned<N>, BTreeSet<Interned<E>>>;

#[derive(Debug)]
pub(crate) struct Adjacency<N, E> {
    sources: BTreeMap<Interned<N>, Targets<N, E>>,
}

impl<N, E> Default for Adjacency<N, E> {
    fn default() -> Self {
        Self {
            sources: BTreeMap::new(),
        }
    }
}

fn keys<'s, N, E>(
    nodes: &'s ValueStore<N>,
    weights: &'s ValueStore<E>,
    at: Coords,
) -> (&'s Interned<N>, &'s Interned<N>, &'s Interned<E>) {
    let (source, target, weight) = at.triple();
    (nodes.key(source), nodes.key(target), weights.key(weight))
}

fn first_edge<N: Ord, E: Ord>(source: &Interned<N>, targets: &Targets<N, E>) -> Option<Coords> {
    let (target, set) = targets.first_key_value()?;
    Some(Coords::of(source, target, set.first()?))
}

fn last_edge<N: Ord, E: Ord>(source: &Interned<N>, targets: &Targets<N, E>) -> Option<Coords> {
    let (target, set) = targets.last_key_value()?;
    Some(Coords::of(source, target, set.last()?))
}

impl<N, E> Adjacency<N, E> {
    pub(crate) fn clear(&mut self) {
        self.sources.clear();
    }

    pub(crate) fn sources(&self) -> &BTreeMap<Interned<N>, Targets<N, E>> {
        &self.sources
    }

    /// Every triple with `node` as source or destination, in ascending order.
    pub(crate) fn incident(&self, node: Handle<N>) -> Vec<Triple<N, E>> {
        let mut out = Vec::new();
        for (source, targets) in &self.sources {
            for (target, set) in targets {
                if source.handle() == node || target.handle() == node {
                    out.extend(
                        set.iter()
                            .map(|w| (source.handle(), target.handle(), w.handle())),
                    );
                }
            }
        }
        out
    }

    /// Distinct node handles used as keys on either level.
    pub(crate) fn node_handles(&self) -> FxHashSet<Handle<N>> {
        let mut out = FxHashSet::default();
        for (source, targets) in &self.sources {
            out.insert(source.handle());
            out.extend(targets.keys().map(Interned::handle));
        }
        out
    }
}

impl<N: Ord, E: Ord> Adjacency<N, E> {
    pub(crate) fn first(&self) -> Option<Coords> {
        let (source, targets) = self.sources.first_key_value()?;
        first_edge(source, targets)
    }

    pub(crate) fn last(&self) -> Option<Coords> {
        let (source, targets) = self.sources.last_key_value()?;
        last_edge(source, targets)
    }

    /// `true` if `at` addresses a stored edge. Never panics, even for handles of freed values.
    pub(crate) fn contains(
        &self,
        nodes: &ValueStore<N>,
        weights: &ValueStore<E>,
        at: Coords,
    ) -> bool {
        let (source, target, weight) = at.triple();
        let (Some(source), Some(target), Some(weight)) = (
            nodes.try_key(source),
            nodes.try_key(target),
            weights.try_key(weight),
        ) else {
            return false;
        };
        self.sources
            .get(source)
            .and_then(|targets| targets.get(target))
            .is_some_and(|set| set.contains(weight))
    }

    pub(crate) fn locate(
        &self,
        source: &Interned<N>,
        target: &Interned<N>,
        weight: &Interned<E>,
    ) -> Option<Coords> {
        let set = self.sources.get(source)?.get(target)?;
        let weight = set.get(weight)?;
        Some(Coords::of(source, target, weight))
    }

    /// Forward step. `None` is the end state.
    pub(crate) fn next(
        &self,
        nodes: &ValueStore<N>,
        weights: &ValueStore<E>,
        at: Coords,
    ) -> Option<Coords> {
        let (source, target, weight) = keys(nodes, weights, at);
        let targets = &self.sources[source];
        let heavier = targets[target]
            .range::<Interned<E>, _>((Excluded(weight), Unbounded))
            .next();
        if let Some(weight) = heavier {
            return Some(Coords::of(source, target, weight));
        }
        let later = targets
            .range::<Interned<N>, _>((Excluded(target), Unbounded))
            .next();
        if let Some((target, set)) = later {
            return set.first().map(|weight| Coords::of(source, target, weight));
        }
        let (source, targets) = self
            .sources
            .range::<Interned<N>, _>((Excluded(source), Unbounded))
            .next()?;
        first_edge(source, targets)
    }

    /// Backward step. From the end state this lands on the last edge; from the first edge there
    /// is nowhere to go and `None` is returned.
    pub(crate) fn prev(
        &self,
        nodes: &ValueStore<N>,
        weights: &ValueStore<E>,
        at: Option<Coords>,
    ) -> Option<Coords> {
        let Some(at) = at else {
            return self.last();
        };
        let (source, target, weight) = keys(nodes, weights, at);
        let targets = &self.sources[source];
        let lighter = targets[target]
            .range::<Interned<E>, _>((Unbounded, Excluded(weight)))
            .next_back();
        if let Some(weight) = lighter {
            return Some(Coords::of(source, target, weight));
        }
        let earlier = targets
            .range::<Interned<N>, _>((Unbounded, Excluded(target)))
            .next_back();
        if let Some((target, set)) = earlier {
            return set.last().map(|weight| Coords::of(source, target, weight));
        }
        let (source, targets) = self
            .sources
            .range::<Interned<N>, _>((Unbounded, Excluded(source)))
            .next_back()?;
        last_edge(source, targets)
    }

    /// Destinations of edges leaving `source`, ascending.
    pub(crate) fn destinations<'a>(
        &'a self,
        source: &Interned<N>,
    ) -> impl Iterator<Item = &'a Interned<N>> + 'a {
        self.sources.get(source).into_iter().flat_map(|t| t.keys())
    }

    /// Weights of the edges `source -> target`, ascending.
    pub(crate) fn weights_between<'a>(
        &'a self,
        source: &Interned<N>,
        target: &Interned<N>,
    ) -> impl Iterator<Item = &'a Interned<E>> + 'a {
        self.sources
            .get(source)
            .and_then(|targets| targets.get(target))
            .into_iter()
            .flatten()
    }

    /// Inserts an edge. Returns `false` if it was already stored; the keys are cloned only when
    /// a level gains an entry.
    pub(crate) fn insert(
        &mut self,
        source: &Interned<N>,
        target: &Interned<N>,
        weight: &Interned<E>,
    ) -> bool {
        let set = self
            .sources
            .entry(source.clone())
            .or_default()
            .entry(target.clone())
            .or_default();
        if set.contains(weight) {
            return false;
        }
        set.insert(weight.clone())
    }

    /// Removes the edge at `at`, pruning emptied levels.
    ///
    /// Returns the coordinates of the next edge in ascending order. Its handles are unaffected by
    /// the removal, so they stay valid.
    pub(crate) fn remove_at(
        &mut self,
        nodes: &ValueStore<N>,
        weights: &ValueStore<E>,
        at: Coords,
    ) -> Option<Coords> {
        let next = self.next(nodes, weights, at);
        let (source, target, weight) = keys(nodes, weights, at);
        let Some(targets) = self.sources.get_mut(source) else {
            debug_assert!(false, "removing an edge whose source is not stored");
            return next;
        };
        if let Some(set) = targets.get_mut(target) {
            set.remove(weight);
            if set.is_empty() {
                targets.remove(target);
            }
        }
        if targets.is_empty() {
            self.sources.remove(source);
        }
        next
    }

    /// Drops every edge incident to `node` and returns the weight handles they held.
    pub(crate) fn detach(&mut self, node: &Interned<N>) -> Vec<Handle<E>> {
        let mut released = Vec::new();
        if let Some(targets) = self.sources.remove(node) {
            for set in targets.into_values() {
                released.extend(set.iter().map(Interned::handle));
            }
        }
        self.sources.retain(|_, targets| {
            if let Some(set) = targets.remove(node) {
                released.extend(set.iter().map(Interned::handle));
            }
            !targets.is_empty()
        });
        released
    }

    /// Moves every entry keyed by `previous` under `current` after a relabel.
    pub(crate) fn rekey(&mut self, previous: &Interned<N>, current: &Interned<N>) {
        if let Some(targets) = self.sources.remove(previous) {
            self.sources.insert(current.clone(), targets);
        }
        for targets in self.sources.values_mut() {
            if let Some(set) = targets.remove(previous) {
                targets.insert(current.clone(), set);
            }
        }
    }

    /// Rebuilds this structure over the keys of another pair of stores that share its handles.
    pub(crate) fn rebuild(&self, nodes: &ValueStore<N>, weights: &ValueStore<E>) -> Self {
        let sources = self
            .sources
            .iter()
            .map(|(source, targets)| {
                let targets: Targets<N, E> = targets
                    .iter()
                    .map(|(target, set)| {
                        let set: BTreeSet<Interned<E>> = set
                            .iter()
                            .map(|w| weights.key(w.handle()).clone())
                            .collect();
                        (nodes.key(target.handle()).clone(), set)
                    })
                    .collect();
                (nodes.key(source.handle()).clone(), targets)
            })
            .collect();
        Self { sources }
    }
}
