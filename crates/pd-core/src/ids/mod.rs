//! ID type wrappers for type safety.

mod id_macro;

pub mod handle_id;
pub mod user_id;

pub use handle_id::HandleId;
pub use user_id::UserId;
