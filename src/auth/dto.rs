use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    validation::{require_email, require_non_empty, Validate},
};

/// Request body for both signup and signin.
#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

impl Validate for AuthRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_email("email", &self.email)?;
        require_non_empty("password", &self.password)
    }
}

/// Response returned after signup or signin.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(email: &str, password: &str) -> AuthRequest {
        AuthRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn empty_fields_are_rejected() {
        assert!(req("", "pw").validate().is_err());
        assert!(req("a@x.com", "").validate().is_err());
        assert!(req("", "").validate().is_err());
    }

    #[test]
    fn valid_body_passes() {
        assert!(req("a@x.com", "1234").validate().is_ok());
    }
}
