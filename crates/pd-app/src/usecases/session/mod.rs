//! Session use cases.

mod current;
mod finalize;

pub use current::CurrentSession;
pub use finalize::FinalizeSession;
