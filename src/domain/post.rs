//! Post entity and its validated inputs.

use super::error::ValidationError;

/// A stored post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Object id rendered as a 24-character hex string.
    pub id: String,
    pub title: String,
    pub body: String,
}

/// Validated input for creating a post.
///
/// Both fields are trimmed and must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    title: String,
    body: String,
}

impl NewPost {
    /// Creates a new post input, rejecting blank fields.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Result<Self, ValidationError> {
        let title = non_blank("title", title.into())?;
        let body = non_blank("body", body.into())?;
        Ok(Self { title, body })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Validated partial update for a post.
///
/// Absent fields are left untouched; provided fields must be non-blank and
/// at least one field must be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPatch {
    title: Option<String>,
    body: Option<String>,
}

impl PostPatch {
    /// Creates a patch, rejecting blank values and all-empty updates.
    pub fn new(title: Option<String>, body: Option<String>) -> Result<Self, ValidationError> {
        let title = title.map(|v| non_blank("title", v)).transpose()?;
        let body = body.map(|v| non_blank("body", v)).transpose()?;
        if title.is_none() && body.is_none() {
            return Err(ValidationError::EmptyUpdate);
        }
        Ok(Self { title, body })
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

fn non_blank(field: &'static str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(trimmed.to_string())
}
