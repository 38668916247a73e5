use serde::Deserialize;

use crate::{
    auth::repo_types::UserChanges,
    error::AppError,
    validation::{require_email, Validate},
};

#[derive(Debug, Default, Deserialize)]
pub struct EditUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl Validate for EditUserRequest {
    fn validate(&self) -> Result<(), AppError> {
        match &self.email {
            Some(email) => require_email("email", email),
            None => Ok(()),
        }
    }
}

impl From<EditUserRequest> for UserChanges {
    fn from(r: EditUserRequest) -> Self {
        Self {
            email: r.email,
            first_name: r.first_name,
            last_name: r.last_name,
        }
    }
}
