use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    bookmarks::repo_types::{Bookmark, BookmarkChanges, NewBookmark},
    error::StoreError,
};

/// Persistence for bookmarks. Update and delete take no owner predicate;
/// ownership is checked by the caller.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    async fn create(&self, user_id: Uuid, new: NewBookmark) -> Result<Bookmark, StoreError>;
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Bookmark>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Bookmark>, StoreError>;
    async fn find_owned(&self, user_id: Uuid, id: Uuid) -> Result<Option<Bookmark>, StoreError>;
    async fn update(
        &self,
        id: Uuid,
        changes: BookmarkChanges,
    ) -> Result<Option<Bookmark>, StoreError>;
    /// Returns the title of the removed row.
    async fn delete(&self, id: Uuid) -> Result<Option<String>, StoreError>;
}

#[derive(Clone)]
pub struct PgBookmarkStore {
    db: PgPool,
}

impl PgBookmarkStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookmarkStore for PgBookmarkStore {
    async fn create(&self, user_id: Uuid, new: NewBookmark) -> Result<Bookmark, StoreError> {
        let row = sqlx::query_as::<_, Bookmark>(
            r#"
            INSERT INTO bookmarks (id, user_id, title, description, link)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, description, link, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(new.title)
        .bind(new.description)
        .bind(new.link)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Bookmark>, StoreError> {
        let rows = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, user_id, title, description, link, created_at, updated_at
            FROM bookmarks
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Bookmark>, StoreError> {
        let row = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, user_id, title, description, link, created_at, updated_at
            FROM bookmarks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_owned(&self, user_id: Uuid, id: Uuid) -> Result<Option<Bookmark>, StoreError> {
        let row = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, user_id, title, description, link, created_at, updated_at
            FROM bookmarks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: BookmarkChanges,
    ) -> Result<Option<Bookmark>, StoreError> {
        let row = sqlx::query_as::<_, Bookmark>(
            r#"
            UPDATE bookmarks
               SET title       = COALESCE($2, title),
                   description = CASE WHEN $5 THEN $3 ELSE description END,
                   link        = COALESCE($4, link),
                   updated_at  = now()
             WHERE id = $1
            RETURNING id, user_id, title, description, link, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.description.clone().flatten())
        .bind(changes.link)
        .bind(changes.description.is_some())
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<String>, StoreError> {
        let title = sqlx::query_scalar::<_, String>(
            r#"
            DELETE FROM bookmarks
             WHERE id = $1
            RETURNING title
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(title)
    }
}

/// Process-local bookmark store; keeps insertion order.
#[derive(Default)]
pub struct InMemoryBookmarkStore {
    rows: RwLock<Vec<Bookmark>>,
}

impl InMemoryBookmarkStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookmarkStore for InMemoryBookmarkStore {
    async fn create(&self, user_id: Uuid, new: NewBookmark) -> Result<Bookmark, StoreError> {
        let now = OffsetDateTime::now_utc();
        let row = Bookmark {
            id: Uuid::new_v4(),
            user_id,
            title: new.title,
            description: new.description,
            link: new.link,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Bookmark>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|b| b.user_id == user_id).cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Bookmark>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|b| b.id == id).cloned())
    }

    async fn find_owned(&self, user_id: Uuid, id: Uuid) -> Result<Option<Bookmark>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|b| b.id == id && b.user_id == user_id)
            .cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        changes: BookmarkChanges,
    ) -> Result<Option<Bookmark>, StoreError> {
        let mut rows = self.rows.write().await;
        let Some(row) = rows.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            row.title = title;
        }
        if let Some(description) = changes.description {
            row.description = description;
        }
        if let Some(link) = changes.link {
            row.link = link;
        }
        row.updated_at = OffsetDateTime::now_utc();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<String>, StoreError> {
        let mut rows = self.rows.write().await;
        let Some(pos) = rows.iter().position(|b| b.id == id) else {
            return Ok(None);
        };
        Ok(Some(rows.remove(pos).title))
    }
}
