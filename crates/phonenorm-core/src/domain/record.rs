use crate::domain::ids::PhoneId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneRecord {
    pub id: PhoneId,
    pub value: String,
}

impl PhoneRecord {
    pub fn new(id: PhoneId, value: impl Into<String>) -> Self {
        Self {
            id,
            value: value.into(),
        }
    }
}
