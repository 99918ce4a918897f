pub mod session;
pub mod time;

pub use session::{FileSessionStore, InMemorySessionStore};
pub use time::SystemClock;
