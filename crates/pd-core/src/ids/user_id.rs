use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// User identifier as issued by the authentication backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl_id!(UserId);
