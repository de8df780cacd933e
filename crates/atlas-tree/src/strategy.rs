//! Contracts consumed by the tree builder.
//!
//! The clustering strategy decides how entries are distributed across
//! leaves and buckets; the build algorithm turns the strategy's
//! accumulated state into a persisted [`RevTree`]. Both are external
//! collaborators: this crate defines their contracts and ships only a
//! leaf-form reference implementation (see [`crate::flat`]).

use atlas_model::{Node, RevTree};
use atlas_store::ObjectStore;

use crate::error::TreeResult;

/// Cooperative cancellation signal: a plain predicate polled at bounded
/// intervals by build algorithms, typically flipped from another thread.
/// No preemptive interruption is required or assumed.
pub type AbortPredicate<'a> = &'a (dyn Fn() -> bool + Sync);

/// Mutation sink deciding how tree entries cluster into leaves/buckets.
///
/// All implementations must satisfy these invariants:
/// - `put` reports a delta of `1` (newly inserted) or `0` (replaced an
///   entry with the same name). Any other delta is an invariant violation
///   the builder treats as fatal.
/// - `remove` reports whether an entry was actually removed.
/// - `update` reports the net entry-count change of replacing `old` with
///   `new`.
/// - `dispose` releases all resources and is called exactly once by the
///   builder, on every exit path.
pub trait ClusteringStrategy: Send {
    /// Stage a node for insertion. Delta: `1` if newly inserted, `0` if it
    /// replaced an existing entry of the same name.
    fn put(&mut self, node: &Node) -> i32;

    /// Stage a node for removal. Returns `true` if an entry was removed.
    fn remove(&mut self, node: &Node) -> bool;

    /// Replace `old` with `new`, which may differ in name. Returns the net
    /// entry-count change.
    fn update(&mut self, old: &Node, new: &Node) -> i32;

    /// Release all resources held by the strategy.
    fn dispose(&mut self);
}

/// Materializes the strategy's accumulated state into a new, persisted
/// revision tree.
///
/// Contract:
/// - Polls `abort` at bounded intervals and returns `Ok(None)` when it
///   fires, leaving no obligation on the store.
/// - On success, the returned tree has been written to `store` before the
///   call returns; the builder re-verifies this and treats a miss as a
///   fatal invariant violation.
pub trait TreeBuildAlgorithm<S: ClusteringStrategy>: Send {
    fn build(
        &self,
        strategy: &mut S,
        store: &dyn ObjectStore,
        abort: AbortPredicate<'_>,
    ) -> TreeResult<Option<RevTree>>;
}
