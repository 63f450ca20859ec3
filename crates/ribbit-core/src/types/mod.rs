//! Core types for ribbit.

mod datetime;
mod digest;
mod job;
mod reminder;
mod research;

pub use datetime::parse_datetime;
pub use digest::*;
pub use job::*;
pub use reminder::*;
pub use research::*;
