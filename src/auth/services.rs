use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::AccessToken,
        jwt::JwtKeys,
        password::{hash_password_blocking, verify_dummy_password, verify_password_blocking},
    },
    error::{AppError, StoreError},
    state::AppState,
};

/// Registers a new account and returns a token for it.
pub async fn signup(st: &AppState, email: &str, password: &str) -> Result<AccessToken, AppError> {
    let hash = hash_password_blocking(password.to_string()).await?;

    let user = match st.users.create(email, &hash).await {
        Ok(u) => u,
        Err(StoreError::UniqueViolation) => {
            warn!(email = %email, "email already registered");
            return Err(AppError::CredentialsTaken);
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(e.into());
        }
    };

    info!(user_id = %user.id, "user registered");
    sign_token(&st.jwt, user.id, &user.email)
}

/// Authenticates an existing account and returns a fresh token.
pub async fn signin(st: &AppState, email: &str, password: &str) -> Result<AccessToken, AppError> {
    let Some(user) = st.users.find_by_email(email).await? else {
        verify_dummy_password(password.to_string()).await?;
        warn!(email = %email, "signin unknown email");
        return Err(AppError::CredentialsIncorrect);
    };

    let ok = verify_password_blocking(password.to_string(), user.password_hash.clone()).await?;
    if !ok {
        warn!(user_id = %user.id, "signin invalid password");
        return Err(AppError::CredentialsIncorrect);
    }

    info!(user_id = %user.id, "user signed in");
    sign_token(&st.jwt, user.id, &user.email)
}

pub fn sign_token(keys: &JwtKeys, user_id: Uuid, email: &str) -> Result<AccessToken, AppError> {
    let access_token = keys.sign(user_id, email).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        AppError::Internal(e)
    })?;
    Ok(AccessToken { access_token })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn signup_returns_token_for_new_user() {
        let st = AppState::fake();
        let token = signup(&st, "a@x.com", "pw1").await.unwrap();
        let claims = st.jwt.verify(&token.access_token).unwrap();
        let user = st.users.find_by_id(claims.sub).await.unwrap().unwrap();
        assert_eq!(user.email, "a@x.com");
        assert_eq!(claims.email, "a@x.com");
        assert_ne!(user.password_hash, "pw1");
    }

    #[tokio::test]
    async fn signup_twice_is_credentials_taken() {
        let st = AppState::fake();
        signup(&st, "a@x.com", "pw1").await.unwrap();
        let err = signup(&st, "a@x.com", "different").await.unwrap_err();
        assert!(matches!(err, AppError::CredentialsTaken));

        // the original password still works
        signin(&st, "a@x.com", "pw1").await.unwrap();
        assert!(matches!(
            signin(&st, "a@x.com", "different").await,
            Err(AppError::CredentialsIncorrect)
        ));
    }

    #[tokio::test]
    async fn signin_embeds_user_identity() {
        let st = AppState::fake();
        let first = signup(&st, "a@x.com", "pw1").await.unwrap();
        let first_sub = st.jwt.verify(&first.access_token).unwrap().sub;

        let token = signin(&st, "a@x.com", "pw1").await.unwrap();
        let claims = st.jwt.verify(&token.access_token).unwrap();
        assert_eq!(claims.sub, first_sub);
        assert_eq!(claims.email, "a@x.com");
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_are_indistinguishable() {
        let st = AppState::fake();
        signup(&st, "a@x.com", "pw1").await.unwrap();

        let unknown = signin(&st, "b@x.com", "pw1").await.unwrap_err();
        let wrong = signin(&st, "a@x.com", "pw2").await.unwrap_err();
        assert!(matches!(unknown, AppError::CredentialsIncorrect));
        assert!(matches!(wrong, AppError::CredentialsIncorrect));
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert_eq!(unknown.status_code(), wrong.status_code());
    }
}
