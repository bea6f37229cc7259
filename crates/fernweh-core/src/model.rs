//! Core entities: users, posts and the closed category set.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Authorization role attached to every user account.
///
/// New accounts always start as [`Role::User`]; promotion to
/// [`Role::Admin`] happens out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed set of categories a post may be filed under.
///
/// Membership is closed: request payloads carrying a category outside
/// this set are rejected during validation rather than stored verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Travel,
    Nature,
    City,
    Adventure,
    Food,
    Technology,
    Culture,
    Lifestyle,
    Wildlife,
    Beaches,
    Mountains,
    Photography,
}

impl Category {
    /// Every known category, in display order.
    pub const ALL: [Category; 12] = [
        Category::Travel,
        Category::Nature,
        Category::City,
        Category::Adventure,
        Category::Food,
        Category::Technology,
        Category::Culture,
        Category::Lifestyle,
        Category::Wildlife,
        Category::Beaches,
        Category::Mountains,
        Category::Photography,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Travel => "Travel",
            Category::Nature => "Nature",
            Category::City => "City",
            Category::Adventure => "Adventure",
            Category::Food => "Food",
            Category::Technology => "Technology",
            Category::Culture => "Culture",
            Category::Lifestyle => "Lifestyle",
            Category::Wildlife => "Wildlife",
            Category::Beaches => "Beaches",
            Category::Mountains => "Mountains",
            Category::Photography => "Photography",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = crate::validate::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::validate::ValidationError::UnknownCategory(s.to_string()))
    }
}

/// A registered account.
///
/// Credential material never leaves the process: `password_hash` and the
/// persisted tokens are skipped during serialization, so handlers can
/// return the struct directly without scrubbing it first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    /// Ids of the posts this user authored, newest last.
    pub posts: Vec<Uuid>,
    /// Most recently issued refresh token, if any. At most one is live
    /// per user; rotation overwrites it.
    #[serde(skip_serializing, default)]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing, default)]
    pub reset_token: Option<String>,
    #[serde(skip_serializing, default)]
    pub reset_token_expiry: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    #[must_use]
    pub fn new(username: String, full_name: String, email: String, password_hash: String) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            username,
            full_name,
            email,
            password_hash,
            role: Role::default(),
            posts: Vec::new(),
            refresh_token: None,
            reset_token: None,
            reset_token_expiry: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the record as modified. Call before persisting any change.
    pub fn touch(&mut self) {
        self.updated_at = OffsetDateTime::now_utc();
    }
}

/// A published blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub author_name: String,
    pub image_link: String,
    pub categories: Vec<Category>,
    pub description: String,
    pub is_featured: bool,
    pub author_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Post {
    #[must_use]
    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}
