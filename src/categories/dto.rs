use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;

/// Body for create and update. On update, a present `id` must match the path.
#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub title: String,
}

impl CategoryPayload {
    pub fn validate(&mut self) -> Result<(), AppError> {
        self.title = self.title.trim().to_string();
        let len = self.title.chars().count();
        if !(3..=60).contains(&len) {
            return Err(AppError::ValidationFailed(
                "title must be 3-60 characters".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_trimmed_and_bounded() {
        let mut ok = CategoryPayload { id: None, title: "  Books  ".into() };
        ok.validate().unwrap();
        assert_eq!(ok.title, "Books");

        let mut short = CategoryPayload { id: None, title: " ab ".into() };
        assert!(short.validate().is_err());

        let mut long = CategoryPayload { id: None, title: "x".repeat(61) };
        assert!(long.validate().is_err());
    }
}
