use atlas_store::StoreError;

use crate::builder::BuilderState;

/// Errors from tree building.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// The builder was used after it transitioned out of the open state.
    /// A one-shot contract violation is a programming error, never retried.
    #[error("tree builder is {state}; no further operations are allowed")]
    IllegalState { state: BuilderState },

    /// A collaborator broke its contract: an impossible clustering delta,
    /// or a freshly built tree missing from the object store. Fatal and
    /// unrecoverable; indicates a collaborator bug, not a transient
    /// condition.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Error from the underlying object store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Invalid object construction while materializing a tree.
    #[error(transparent)]
    Model(#[from] atlas_model::ModelError),
}

/// Result alias for tree building operations.
pub type TreeResult<T> = Result<T, TreeError>;
