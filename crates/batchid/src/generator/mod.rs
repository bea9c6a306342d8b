#[cfg(feature = "futures")]
mod future;
mod scope;
mod sync;

#[cfg(feature = "futures")]
pub use future::*;
pub use sync::*;
