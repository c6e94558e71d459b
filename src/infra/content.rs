//! File-backed post metadata store.
//!
//! Each locale lives in `<root>/<locale>/posts.toml` as a list of `[[posts]]`
//! tables. A missing file is an empty collection.

use std::{
    collections::HashSet,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use folio_api_types::PostMeta;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    application::repos::{PostSnapshot, PostsSource, RepoError},
    domain::{
        error::DomainError,
        posts::{parse_post_date, sort_newest_first},
    },
};

pub const POSTS_FILE: &str = "posts.toml";
const MAX_LOCALE_LEN: usize = 35;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PostsFile {
    posts: Vec<PostMeta>,
}

#[derive(Debug, Clone)]
pub struct FileContentStore {
    root: PathBuf,
}

impl FileContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn locale_file(&self, locale: &str) -> Result<PathBuf, RepoError> {
        if !is_valid_locale(locale) {
            return Err(RepoError::invalid_locale(locale));
        }
        Ok(self.root.join(locale).join(POSTS_FILE))
    }
}

/// Locale tags are used as directory names, so only BCP 47-ish characters pass.
pub fn is_valid_locale(locale: &str) -> bool {
    !locale.is_empty()
        && locale.len() <= MAX_LOCALE_LEN
        && locale
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[async_trait]
impl PostsSource for FileContentStore {
    async fn all_posts_meta(&self, locale: &str) -> Result<PostSnapshot, RepoError> {
        let path = self.locale_file(locale)?;

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(
                    target = "folio::content",
                    locale,
                    path = %path.display(),
                    "No content file for locale"
                );
                return Ok(Vec::new().into());
            }
            Err(source) => return Err(RepoError::Io { path, source }),
        };

        let posts = parse_posts(&raw, &path)?;
        debug!(
            target = "folio::content",
            locale,
            posts = posts.len(),
            "Loaded post metadata"
        );
        Ok(posts.into())
    }
}

/// Parse a posts file, keeping published posts sorted newest first.
pub fn parse_posts(raw: &str, path: &Path) -> Result<Vec<PostMeta>, RepoError> {
    let file: PostsFile = toml::from_str(raw).map_err(|err| RepoError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    let mut seen = HashSet::with_capacity(file.posts.len());
    let mut posts = Vec::with_capacity(file.posts.len());

    for post in file.posts {
        if post.slug.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "post titled `{}` has an empty slug",
                post.title
            ))
            .into());
        }
        if !seen.insert(post.slug.clone()) {
            return Err(DomainError::invariant(format!("duplicate slug `{}`", post.slug)).into());
        }
        if parse_post_date(&post.date).is_none() {
            warn!(
                target = "folio::content",
                slug = %post.slug,
                date = %post.date,
                path = %path.display(),
                "Post date is not ISO-8601; it will sort last"
            );
        }
        if post.published {
            posts.push(post);
        }
    }

    sort_newest_first(&mut posts);
    Ok(posts)
}
