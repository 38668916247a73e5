use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    bookmarks::{
        dto::DeletedBookmark,
        repo_types::{Bookmark, BookmarkChanges, NewBookmark},
    },
    error::AppError,
    state::AppState,
};

// Every operation takes an already authenticated `user_id`.

pub async fn create(st: &AppState, user_id: Uuid, new: NewBookmark) -> Result<Bookmark, AppError> {
    let bookmark = st.bookmarks.create(user_id, new).await?;
    info!(%user_id, bookmark_id = %bookmark.id, "bookmark created");
    Ok(bookmark)
}

pub async fn list(st: &AppState, user_id: Uuid) -> Result<Vec<Bookmark>, AppError> {
    Ok(st.bookmarks.list_by_user(user_id).await?)
}

/// A foreign bookmark reads the same as a missing one.
pub async fn get_by_id(
    st: &AppState,
    user_id: Uuid,
    bookmark_id: Uuid,
) -> Result<Option<Bookmark>, AppError> {
    Ok(st.bookmarks.find_owned(user_id, bookmark_id).await?)
}

pub async fn edit_by_id(
    st: &AppState,
    user_id: Uuid,
    bookmark_id: Uuid,
    changes: BookmarkChanges,
) -> Result<Bookmark, AppError> {
    ensure_owner(st, user_id, bookmark_id).await?;
    let bookmark = st
        .bookmarks
        .update(bookmark_id, changes)
        .await?
        .ok_or(AppError::AccessDenied)?;
    info!(%user_id, %bookmark_id, "bookmark edited");
    Ok(bookmark)
}

pub async fn delete_by_id(
    st: &AppState,
    user_id: Uuid,
    bookmark_id: Uuid,
) -> Result<DeletedBookmark, AppError> {
    ensure_owner(st, user_id, bookmark_id).await?;
    let title = st
        .bookmarks
        .delete(bookmark_id)
        .await?
        .ok_or(AppError::AccessDenied)?;
    info!(%user_id, %bookmark_id, "bookmark deleted");
    Ok(DeletedBookmark { title })
}

// Owner is immutable after insert, so the read-then-write needs no transaction.
async fn ensure_owner(st: &AppState, user_id: Uuid, bookmark_id: Uuid) -> Result<(), AppError> {
    match st.bookmarks.find_by_id(bookmark_id).await? {
        Some(b) if b.user_id == user_id => Ok(()),
        Some(_) => {
            warn!(%user_id, %bookmark_id, "bookmark owned by another user");
            Err(AppError::AccessDenied)
        }
        None => {
            warn!(%user_id, %bookmark_id, "bookmark not found");
            Err(AppError::AccessDenied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewBookmark {
        NewBookmark {
            title: "t".into(),
            description: Some("d".into()),
            link: "http://x".into(),
        }
    }

    #[tokio::test]
    async fn owner_can_read_edit_and_delete() {
        let st = AppState::fake();
        let owner = Uuid::new_v4();
        let b = create(&st, owner, sample()).await.unwrap();
        assert_eq!(b.user_id, owner);

        assert_eq!(get_by_id(&st, owner, b.id).await.unwrap(), Some(b.clone()));
        assert_eq!(list(&st, owner).await.unwrap().len(), 1);

        let edited = edit_by_id(
            &st,
            owner,
            b.id,
            BookmarkChanges {
                title: Some("u".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(edited.title, "u");

        let deleted = delete_by_id(&st, owner, b.id).await.unwrap();
        assert_eq!(deleted, DeletedBookmark { title: "u".into() });
    }

    #[tokio::test]
    async fn other_user_sees_absent_and_is_denied() {
        let st = AppState::fake();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let bm = create(&st, a, sample()).await.unwrap();

        assert_eq!(get_by_id(&st, b, bm.id).await.unwrap(), None);
        assert!(list(&st, b).await.unwrap().is_empty());
        assert!(matches!(
            edit_by_id(&st, b, bm.id, BookmarkChanges::default()).await,
            Err(AppError::AccessDenied)
        ));
        assert!(matches!(
            delete_by_id(&st, b, bm.id).await,
            Err(AppError::AccessDenied)
        ));

        // untouched for the owner
        assert_eq!(get_by_id(&st, a, bm.id).await.unwrap(), Some(bm));
    }

    #[tokio::test]
    async fn missing_and_foreign_ids_fail_identically() {
        let st = AppState::fake();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let bm = create(&st, a, sample()).await.unwrap();

        let foreign = delete_by_id(&st, b, bm.id).await.unwrap_err();
        let missing = delete_by_id(&st, b, Uuid::new_v4()).await.unwrap_err();
        assert_eq!(foreign.to_string(), missing.to_string());
        assert_eq!(foreign.status_code(), missing.status_code());
    }

    #[tokio::test]
    async fn partial_edit_keeps_other_fields() {
        let st = AppState::fake();
        let owner = Uuid::new_v4();
        let b = create(&st, owner, sample()).await.unwrap();
        let edited = edit_by_id(
            &st,
            owner,
            b.id,
            BookmarkChanges {
                title: Some("X".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(edited.title, "X");
        assert_eq!(edited.description.as_deref(), Some("d"));
        assert_eq!(edited.link, "http://x");
        assert_eq!(edited.user_id, owner);
        assert_eq!(edited.created_at, b.created_at);
    }

    #[tokio::test]
    async fn description_can_be_replaced_and_cleared() {
        let st = AppState::fake();
        let owner = Uuid::new_v4();
        let b = create(&st, owner, sample()).await.unwrap();

        let replaced = edit_by_id(
            &st,
            owner,
            b.id,
            BookmarkChanges {
                description: Some(Some("e".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(replaced.description.as_deref(), Some("e"));

        let cleared = edit_by_id(
            &st,
            owner,
            b.id,
            BookmarkChanges {
                description: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(cleared.description, None);
        assert_eq!(cleared.title, b.title);
        assert_eq!(cleared.link, b.link);
    }

    #[tokio::test]
    async fn delete_is_permanent() {
        let st = AppState::fake();
        let owner = Uuid::new_v4();
        let b = create(&st, owner, sample()).await.unwrap();
        delete_by_id(&st, owner, b.id).await.unwrap();

        assert_eq!(get_by_id(&st, owner, b.id).await.unwrap(), None);
        assert!(matches!(
            delete_by_id(&st, owner, b.id).await,
            Err(AppError::AccessDenied)
        ));
    }
}
