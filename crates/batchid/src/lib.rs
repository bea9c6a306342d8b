//! Batched, monotonic, scope-partitioned unique ID allocation over any
//! optimistic-concurrency state store.
//!
//! A [`UniqueIdGenerator`] reserves a private batch of numbers per scope with
//! a single store round trip and serves strictly increasing IDs from it
//! without further contact. When the batch runs out it claims the next one
//! with a conditional write keyed on an opaque [`VersionToken`], retrying lost
//! races against other processes up to a configurable budget. Any store that
//! can express "write if the token still matches" can back it by implementing
//! [`OptimisticStore`] (or [`AsyncOptimisticStore`] with the `futures`
//! feature, on by default).
//!
//! IDs within one scope and process are gap-free and strictly increasing;
//! across processes, ranges never overlap but carry no ordering, and the
//! unused tail of a batch is lost when its process exits.
//!
//! ```
//! use batchid::{GeneratorOptions, MemoryStore, UniqueIdGenerator};
//!
//! let options = GeneratorOptions::new().batch_size(500)?;
//! let generator = UniqueIdGenerator::with_options(MemoryStore::new(), options);
//!
//! assert_eq!(generator.next_id("invoices")?, 1);
//! assert_eq!(generator.next_id("invoices")?, 2);
//! assert_eq!(generator.next_id("orders")?, 1);
//! # Ok::<(), batchid::Error>(())
//! ```

mod error;
mod generator;
mod mutex;
mod options;
mod state;
mod store;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::options::*;
pub use crate::state::*;
pub use crate::store::*;
