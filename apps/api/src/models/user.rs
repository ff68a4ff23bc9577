use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

impl User {
    /// The id is derived from the email, so a restored session names the same user.
    pub fn from_email(email: &str) -> Self {
        Self {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, email.as_bytes()).to_string(),
            email: email.to_string(),
        }
    }
}
