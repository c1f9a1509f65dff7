use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Single-field JSON body carrying a human-readable message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

impl MessageRes {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Confirmation returned after a successful delete, e.g. `"Recipe deleted successfully"`.
    pub fn deleted(entity: &str) -> Self {
        Self::new(format!("{} deleted successfully", entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deleted_message_format() {
        assert_eq!(
            MessageRes::deleted("Ingredient").message,
            "Ingredient deleted successfully"
        );
    }

    #[test]
    fn test_serialises_as_message_object() {
        let json = serde_json::to_string(&MessageRes::new("Recipe not found")).unwrap();
        assert_eq!(json, r#"{"message":"Recipe not found"}"#);
    }
}
