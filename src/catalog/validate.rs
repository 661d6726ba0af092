use thiserror::Error;

use super::meal::{MealPatch, NewMeal};

pub const MIN_TITLE_CHARS: usize = 3;
pub const MIN_DESCRIPTION_CHARS: usize = 10;

/// User input rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title must be at least {} characters", MIN_TITLE_CHARS)]
    TitleTooShort,

    #[error("Description must be at least {} characters", MIN_DESCRIPTION_CHARS)]
    DescriptionTooShort,

    #[error("A cover image is required")]
    MissingThumbnail,

    #[error("Nothing to update")]
    EmptyPatch,
}

fn check_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().chars().count() < MIN_TITLE_CHARS {
        return Err(ValidationError::TitleTooShort);
    }
    Ok(())
}

fn check_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
        return Err(ValidationError::DescriptionTooShort);
    }
    Ok(())
}

impl NewMeal {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_title(&self.title)?;
        check_description(&self.description)?;
        if self.thumbnail_url.trim().is_empty() {
            return Err(ValidationError::MissingThumbnail);
        }
        Ok(())
    }
}

impl MealPatch {
    /// Validates only the fields being changed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyPatch);
        }
        if let Some(title) = &self.title {
            check_title(title)?;
        }
        if let Some(description) = &self.description {
            check_description(description)?;
        }
        if matches!(&self.thumbnail_url, Some(url) if url.trim().is_empty()) {
            return Err(ValidationError::MissingThumbnail);
        }
        Ok(())
    }
}
