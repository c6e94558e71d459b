use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use folio_api_types::PostMeta;
use thiserror::Error;

use crate::domain::error::DomainError;

/// Immutable, newest-first snapshot of one locale's posts.
pub type PostSnapshot = Arc<[PostMeta]>;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("invalid locale `{locale}`")]
    InvalidLocale { locale: String },
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse `{path}`: {message}")]
    Parse { path: PathBuf, message: String },
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl RepoError {
    pub fn invalid_locale(locale: impl Into<String>) -> Self {
        Self::InvalidLocale {
            locale: locale.into(),
        }
    }
}

/// Source of post metadata for a locale.
///
/// Implementations must return published posts sorted by date, newest first.
#[async_trait]
pub trait PostsSource: Send + Sync {
    async fn all_posts_meta(&self, locale: &str) -> Result<PostSnapshot, RepoError>;
}
