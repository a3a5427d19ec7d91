//! # docqa-vector
//!
//! A small in-memory vector index used by docqa to rank document chunks
//! against a query embedding.
//!
//! The index is exhaustive (every stored vector is scored) and meant to be
//! built, queried and dropped within a single request.
//!
//! ```rust
//! use docqa_vector::{DistanceMetric, FlatIndex};
//!
//! let index = FlatIndex::build(
//!     vec![("sky", vec![1.0, 0.0]), ("grass", vec![0.0, 1.0])],
//!     DistanceMetric::Cosine,
//! )?;
//!
//! let hits = index.top_k(&[0.9, 0.1], 1)?;
//! assert_eq!(*hits[0].item, "sky");
//! # Ok::<(), docqa_vector::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod distance;
pub mod error;
pub mod index;

pub use distance::DistanceMetric;
pub use error::{Error, Result};
pub use index::{FlatIndex, SearchHit};
