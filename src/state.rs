use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    auth::{
        jwt::JwtKeys,
        repo::{InMemoryUserStore, PgUserStore, UserStore},
    },
    bookmarks::repo::{BookmarkStore, InMemoryBookmarkStore, PgBookmarkStore},
    config::{AppConfig, JwtConfig},
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub bookmarks: Arc<dyn BookmarkStore>,
    pub jwt: JwtKeys,
}

impl AppState {
    pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")
    }

    pub fn postgres(db: PgPool, config: &AppConfig) -> Self {
        Self {
            users: Arc::new(PgUserStore::new(db.clone())),
            bookmarks: Arc::new(PgBookmarkStore::new(db)),
            jwt: JwtKeys::new(&config.jwt),
        }
    }

    pub fn in_memory(jwt: &JwtConfig) -> Self {
        Self {
            users: Arc::new(InMemoryUserStore::new()),
            bookmarks: Arc::new(InMemoryBookmarkStore::new()),
            jwt: JwtKeys::new(jwt),
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::in_memory(&JwtConfig {
            secret: "test".into(),
        })
    }
}
