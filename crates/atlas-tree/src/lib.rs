//! Tree building for the Atlas revision model.
//!
//! A new version of a versioned collection is produced by a
//! [`TreeBuilder`]: mutations accumulate in a [`ClusteringStrategy`], and a
//! single `build` call hands the strategy, the object store, and a
//! cooperative abort predicate to a [`TreeBuildAlgorithm`], which returns
//! the new persisted [`RevTree`](atlas_model::RevTree).
//!
//! The builder is strictly one-shot (`open → built | disposed`) and
//! guarantees the strategy's resources are released on every exit path,
//! including cancellation and failure.
//!
//! The production clustering algorithm (the component that decides when a
//! tree graduates from leaf form to hash fan-out buckets) is an external
//! collaborator. [`FlatLeafStrategy`] and [`LeafBuildAlgorithm`] are the
//! in-crate leaf-only reference implementation.

pub mod builder;
pub mod error;
pub mod flat;
pub mod strategy;

pub use builder::{BuilderState, TreeBuilder};
pub use error::{TreeError, TreeResult};
pub use flat::{FlatLeafStrategy, LeafBuildAlgorithm};
pub use strategy::{AbortPredicate, ClusteringStrategy, TreeBuildAlgorithm};
