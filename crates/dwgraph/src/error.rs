#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An operation that requires existing nodes was given one that is not in the graph.
    #[error("cannot call Graph::{operation} {requirement}")]
    MissingNode {
        operation: &'static str,
        requirement: &'static str,
    },

    /// A detached [`Position`](crate::Position) from before the graph's last mutation.
    #[error("cannot call Graph::{operation} with a position from an earlier generation of the graph")]
    StalePosition { operation: &'static str },

    #[error("cannot call Graph::{operation} with a last position that precedes the first")]
    InvalidRange { operation: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
