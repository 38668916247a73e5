use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::repo_types::{User, UserChanges},
    error::{AppError, StoreError},
    state::AppState,
};

/// Loads the caller's profile. A token whose subject no longer exists is unauthorized.
pub async fn me(st: &AppState, user_id: Uuid) -> Result<User, AppError> {
    st.users.find_by_id(user_id).await?.ok_or_else(|| {
        warn!(%user_id, "token subject not found");
        AppError::Unauthorized("User not found".into())
    })
}

pub async fn edit(st: &AppState, user_id: Uuid, changes: UserChanges) -> Result<User, AppError> {
    let user = match st.users.update(user_id, changes).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(%user_id, "token subject not found");
            return Err(AppError::Unauthorized("User not found".into()));
        }
        Err(StoreError::UniqueViolation) => {
            warn!(%user_id, "email already registered");
            return Err(AppError::CredentialsTaken);
        }
        Err(e) => return Err(e.into()),
    };
    info!(%user_id, "profile updated");
    Ok(user)
}
