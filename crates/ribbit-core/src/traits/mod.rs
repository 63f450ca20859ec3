//! Core traits for ribbit collaborators.

mod clock;
mod composer;
mod source;
mod store;
mod transport;

pub use clock::*;
pub use composer::*;
pub use source::*;
pub use store::*;
pub use transport::*;
