//! Input shapes and validation for post creation and editing.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::model::{Category, Post};

/// Image links must point at a raster format the frontend can render.
static IMAGE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    // The pattern is a literal alternation, it cannot fail to compile.
    Regex::new(r"(?i)\.(jpg|jpeg|png|webp)$").unwrap()
});

pub const MAX_CATEGORIES: usize = 3;

/// Why a draft or patch was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingFields,
    #[error("Image URL must end with .jpg, .jpeg, .png or .webp")]
    InvalidImageLink,
    #[error("A post must carry between 1 and {MAX_CATEGORIES} categories")]
    CategoryCount,
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

/// Raw create-post payload as it arrives over the wire.
///
/// Every field is optional at the serde level so that an incomplete body
/// surfaces as [`ValidationError::MissingFields`] instead of a generic
/// deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PostDraft {
    pub title: Option<String>,
    pub author_name: Option<String>,
    pub image_link: Option<String>,
    pub categories: Option<Vec<String>>,
    pub description: Option<String>,
    pub is_featured: Option<bool>,
}

/// A fully validated draft, ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub author_name: String,
    pub image_link: String,
    pub categories: Vec<Category>,
    pub description: String,
    pub is_featured: bool,
}

impl PostDraft {
    /// Checks presence of every required field, the image suffix and the
    /// category list, in that order.
    pub fn validate(self) -> Result<NewPost, ValidationError> {
        let (Some(title), Some(author_name), Some(image_link), Some(categories), Some(description)) = (
            self.title,
            self.author_name,
            self.image_link,
            self.categories,
            self.description,
        ) else {
            return Err(ValidationError::MissingFields);
        };
        if title.trim().is_empty()
            || author_name.trim().is_empty()
            || image_link.trim().is_empty()
            || description.trim().is_empty()
        {
            return Err(ValidationError::MissingFields);
        }
        if !IMAGE_SUFFIX.is_match(&image_link) {
            return Err(ValidationError::InvalidImageLink);
        }
        let categories = parse_categories(&categories)?;

        Ok(NewPost {
            title,
            author_name,
            image_link,
            categories,
            description,
            is_featured: self.is_featured.unwrap_or(false),
        })
    }
}

/// Partial update for an existing post. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PostPatch {
    pub title: Option<String>,
    pub author_name: Option<String>,
    pub image_link: Option<String>,
    pub categories: Option<Vec<String>>,
    pub description: Option<String>,
    pub is_featured: Option<bool>,
}

impl PostPatch {
    /// Validates the provided fields and applies them to `post` in place.
    pub fn apply(self, post: &mut Post) -> Result<(), ValidationError> {
        if let Some(image_link) = &self.image_link
            && !IMAGE_SUFFIX.is_match(image_link)
        {
            return Err(ValidationError::InvalidImageLink);
        }
        let categories = match &self.categories {
            Some(raw) => Some(parse_categories(raw)?),
            None => None,
        };

        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(author_name) = self.author_name {
            post.author_name = author_name;
        }
        if let Some(image_link) = self.image_link {
            post.image_link = image_link;
        }
        if let Some(categories) = categories {
            post.categories = categories;
        }
        if let Some(description) = self.description {
            post.description = description;
        }
        if let Some(is_featured) = self.is_featured {
            post.is_featured = is_featured;
        }
        Ok(())
    }
}

fn parse_categories(raw: &[String]) -> Result<Vec<Category>, ValidationError> {
    if raw.is_empty() || raw.len() > MAX_CATEGORIES {
        return Err(ValidationError::CategoryCount);
    }
    raw.iter().map(|s| s.parse()).collect()
}
