//! Blog post domain model

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{CoreError, Result};

/// A stored blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    /// Public URL of the uploaded image, if any
    pub image: Option<String>,
    pub content: String,
    pub category: Option<String>,
    pub keyword: Option<String>,
    pub meta_description: Option<String>,
    pub image_description: Option<String>,
    /// Comma-separated list of URLs, stored verbatim
    pub external_links: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Text fields of a post as submitted by a client.
///
/// Every field is optional at this level; [`PostFields::into_new_post`] and
/// [`PostFields::into_patch`] decide which ones must be present.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFields {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub image_description: Option<String>,
    #[serde(default)]
    pub external_links: Option<String>,
}

impl PostFields {
    /// Build a new post, requiring a non-blank title and content
    pub fn into_new_post(self, image: Option<String>) -> Result<NewBlogPost> {
        let title = require("title", self.title)?;
        let content = require("content", self.content)?;

        Ok(NewBlogPost {
            title,
            image,
            content,
            category: self.category,
            keyword: self.keyword,
            meta_description: self.meta_description,
            image_description: self.image_description,
            external_links: self.external_links,
        })
    }

    /// Build a partial update. Absent fields are left untouched by storage;
    /// a title or content that is supplied must not be blank.
    pub fn into_patch(self, image: Option<String>) -> Result<BlogPostPatch> {
        let title = self.title.map(|t| require("title", Some(t))).transpose()?;
        let content = self
            .content
            .map(|c| require("content", Some(c)))
            .transpose()?;

        Ok(BlogPostPatch {
            title,
            image,
            content,
            category: self.category,
            keyword: self.keyword,
            meta_description: self.meta_description,
            image_description: self.image_description,
            external_links: self.external_links,
        })
    }

    /// Check required fields without consuming the input
    pub fn validate_new(&self) -> Result<()> {
        require_ref("title", self.title.as_deref())?;
        require_ref("content", self.content.as_deref())?;
        Ok(())
    }
}

/// Input for inserting a post
#[derive(Debug, Clone, PartialEq)]
pub struct NewBlogPost {
    pub title: String,
    pub image: Option<String>,
    pub content: String,
    pub category: Option<String>,
    pub keyword: Option<String>,
    pub meta_description: Option<String>,
    pub image_description: Option<String>,
    pub external_links: Option<String>,
}

impl NewBlogPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image: None,
            content: content.into(),
            category: None,
            keyword: None,
            meta_description: None,
            image_description: None,
            external_links: None,
        }
    }

    pub fn with_image(mut self, image: String) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Merge-style update: `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogPostPatch {
    pub title: Option<String>,
    pub image: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub keyword: Option<String>,
    pub meta_description: Option<String>,
    pub image_description: Option<String>,
    pub external_links: Option<String>,
}

impl BlogPostPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn require(field: &'static str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(CoreError::Validation { field }),
    }
}

fn require_ref(field: &'static str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(CoreError::Validation { field }),
    }
}
