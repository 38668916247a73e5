use serde::{Deserialize, Serialize};

use crate::{
    bookmarks::repo_types::{BookmarkChanges, NewBookmark},
    error::AppError,
    validation::{double_option, require_non_empty, Validate},
};

#[derive(Debug, Deserialize)]
pub struct CreateBookmarkRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub link: String,
}

impl Validate for CreateBookmarkRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_empty("title", &self.title)?;
        require_non_empty("link", &self.link)
    }
}

impl From<CreateBookmarkRequest> for NewBookmark {
    fn from(r: CreateBookmarkRequest) -> Self {
        Self {
            title: r.title,
            description: r.description,
            link: r.link,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EditBookmarkRequest {
    #[serde(default)]
    pub title: Option<String>,
    // `null` clears the description, absence keeps it.
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub link: Option<String>,
}

impl Validate for EditBookmarkRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(title) = &self.title {
            require_non_empty("title", title)?;
        }
        if let Some(link) = &self.link {
            require_non_empty("link", link)?;
        }
        Ok(())
    }
}

impl From<EditBookmarkRequest> for BookmarkChanges {
    fn from(r: EditBookmarkRequest) -> Self {
        Self {
            title: r.title,
            description: r.description,
            link: r.link,
        }
    }
}

/// What is left of a bookmark after deletion.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DeletedBookmark {
    pub title: String,
}
