use std::fmt;
use std::sync::Arc;

use atlas_model::{Node, RevTree};
use atlas_store::ObjectStore;

use crate::error::{TreeError, TreeResult};
use crate::strategy::{ClusteringStrategy, TreeBuildAlgorithm};

/// Lifecycle of a [`TreeBuilder`]: open for mutation, then terminally
/// built or disposed. The transition happens exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuilderState {
    Open,
    Built,
    Disposed,
}

impl fmt::Display for BuilderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Built => write!(f, "built"),
            Self::Disposed => write!(f, "disposed"),
        }
    }
}

/// One-shot orchestrator turning accumulated mutations into a new
/// persisted revision tree.
///
/// Mutations (`put`/`remove`/`update`) are delegated to the clustering
/// strategy while the builder is open; `build` hands the strategy, the
/// store, and the abort predicate to the build algorithm, verifies the
/// result actually landed in the store, and releases the strategy on
/// every exit path.
///
/// The builder is single-owner: `&mut self` receivers make concurrent
/// mutation unrepresentable, so the one-shot transition needs no atomics.
/// Cancellation is the one cross-thread interaction: the abort predicate
/// handed to [`TreeBuilder::build_with`] is `Sync` and may be flipped from
/// a timer or another thread; the algorithm polls it at bounded intervals
/// and unwinds cleanly.
pub struct TreeBuilder<S, A>
where
    S: ClusteringStrategy,
    A: TreeBuildAlgorithm<S>,
{
    store: Arc<dyn ObjectStore>,
    tree: RevTree,
    strategy: Option<S>,
    algorithm: A,
    state: BuilderState,
}

impl<S, A> TreeBuilder<S, A>
where
    S: ClusteringStrategy,
    A: TreeBuildAlgorithm<S>,
{
    /// Start a builder amending `original` through `strategy`.
    pub fn new(store: Arc<dyn ObjectStore>, original: RevTree, strategy: S, algorithm: A) -> Self {
        Self {
            store,
            tree: original,
            strategy: Some(strategy),
            algorithm,
            state: BuilderState::Open,
        }
    }

    /// The builder's current tree: the original until a successful build,
    /// the built result afterwards.
    pub fn tree(&self) -> &RevTree {
        &self.tree
    }

    pub fn state(&self) -> BuilderState {
        self.state
    }

    fn strategy_mut(&mut self) -> TreeResult<&mut S> {
        if self.state != BuilderState::Open {
            return Err(TreeError::IllegalState { state: self.state });
        }
        // Invariant: the strategy is only taken when leaving Open.
        Ok(self.strategy.as_mut().expect("strategy present while open"))
    }

    /// Stage a node for insertion. Returns `true` if it was newly inserted
    /// rather than replacing an entry with the same name.
    pub fn put(&mut self, node: &Node) -> TreeResult<bool> {
        let delta = self.strategy_mut()?.put(node);
        tracing::trace!(name = node.name(), delta, "builder put");
        match delta {
            1 => Ok(true),
            0 => Ok(false),
            other => Err(TreeError::InvariantViolation(format!(
                "clustering strategy reported impossible delta {other} on put of \"{}\"",
                node.name()
            ))),
        }
    }

    /// Stage a node for removal. Returns `true` if an entry was removed.
    pub fn remove(&mut self, node: &Node) -> TreeResult<bool> {
        let removed = self.strategy_mut()?.remove(node);
        tracing::trace!(name = node.name(), removed, "builder remove");
        Ok(removed)
    }

    /// Replace `old` with `new`. Returns `true` if the strategy recorded a
    /// net change.
    pub fn update(&mut self, old: &Node, new: &Node) -> TreeResult<bool> {
        let delta = self.strategy_mut()?.update(old, new);
        tracing::trace!(old = old.name(), new = new.name(), delta, "builder update");
        Ok(delta != 0)
    }

    /// Build the new tree, polling `abort` cooperatively.
    ///
    /// Transitions the builder out of the open state exactly once; a
    /// second call is an illegal-state error. Returns `Ok(None)` when the
    /// predicate aborted the run, in which case the current tree is left
    /// untouched. The strategy is disposed on every exit path.
    pub fn build_with<F>(&mut self, abort: F) -> TreeResult<Option<RevTree>>
    where
        F: Fn() -> bool + Sync,
    {
        if self.state != BuilderState::Open {
            return Err(TreeError::IllegalState { state: self.state });
        }
        self.state = BuilderState::Built;
        let mut strategy = self.strategy.take().expect("strategy present while open");

        let result = self
            .algorithm
            .build(&mut strategy, self.store.as_ref(), &abort);
        // Resource release happens regardless of how the algorithm exited.
        strategy.dispose();

        match result? {
            Some(tree) => {
                if !self.store.exists(&tree.id())? {
                    return Err(TreeError::InvariantViolation(format!(
                        "built tree {} is not present in the object store",
                        tree.id()
                    )));
                }
                tracing::debug!(id = %tree.id(), size = tree.size(), "tree built");
                self.tree = tree.clone();
                Ok(Some(tree))
            }
            None => {
                tracing::debug!("tree build aborted");
                Ok(None)
            }
        }
    }

    /// Build with a never-firing abort predicate.
    pub fn build(&mut self) -> TreeResult<RevTree> {
        match self.build_with(|| false)? {
            Some(tree) => Ok(tree),
            None => Err(TreeError::InvariantViolation(
                "build aborted without an abort signal".to_owned(),
            )),
        }
    }

    /// Release the clustering strategy without producing a tree.
    ///
    /// Runs the build algorithm with an always-abort predicate purely so
    /// the strategy's resources are released through the normal path. A
    /// no-op once the builder has been built or disposed.
    pub fn dispose(&mut self) {
        if self.state != BuilderState::Open {
            return;
        }
        self.state = BuilderState::Disposed;
        if let Some(mut strategy) = self.strategy.take() {
            let _ = self
                .algorithm
                .build(&mut strategy, self.store.as_ref(), &|| true);
            strategy.dispose();
        }
    }
}

impl<S, A> Drop for TreeBuilder<S, A>
where
    S: ClusteringStrategy,
    A: TreeBuildAlgorithm<S>,
{
    fn drop(&mut self) {
        self.dispose();
    }
}
