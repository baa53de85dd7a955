//! UserAccount - signed-in identity as seen by the domain

use serde::{Deserialize, Serialize};

use super::UserId;
use crate::value_objects::Email;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub email: Email,
    pub email_verified: bool,
}

impl UserAccount {
    pub fn new(id: UserId, email: Email, email_verified: bool) -> Self {
        Self {
            id,
            email,
            email_verified,
        }
    }
}
