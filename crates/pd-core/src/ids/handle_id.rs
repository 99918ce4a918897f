use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Identifier of one acquired resource handle.
///
/// A fresh id is minted per acquisition, so a replaced handle and its
/// replacement never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandleId(String);

impl_id!(HandleId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_handle_ids_are_unique() {
        assert_ne!(HandleId::new(), HandleId::new());
    }
}
