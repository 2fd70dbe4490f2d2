use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuctionFinanceError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid field values: {}", .0.join(", "))]
    InvalidFields(Vec<String>),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Non-finite result in {context}")]
    NonFinite { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Coarse classification used at the JSON boundary to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller sent something unusable; fix the request.
    Validation,
    /// Inputs were well-formed but the arithmetic degenerated.
    Computation,
    Internal,
}

impl ErrorCategory {
    pub fn status_code(self) -> u16 {
        match self {
            ErrorCategory::Validation => 400,
            ErrorCategory::Computation => 422,
            ErrorCategory::Internal => 500,
        }
    }
}

impl AuctionFinanceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AuctionFinanceError::InvalidInput { .. }
            | AuctionFinanceError::MissingFields(_)
            | AuctionFinanceError::InvalidFields(_) => ErrorCategory::Validation,
            AuctionFinanceError::DivisionByZero { .. } | AuctionFinanceError::NonFinite { .. } => {
                ErrorCategory::Computation
            }
            AuctionFinanceError::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    /// Field names implicated in a validation failure, if any.
    pub fn fields(&self) -> Vec<String> {
        match self {
            AuctionFinanceError::InvalidInput { field, .. } => vec![field.clone()],
            AuctionFinanceError::MissingFields(f) | AuctionFinanceError::InvalidFields(f) => {
                f.clone()
            }
            _ => Vec::new(),
        }
    }
}

impl From<serde_json::Error> for AuctionFinanceError {
    fn from(e: serde_json::Error) -> Self {
        AuctionFinanceError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_map_to_status() {
        let missing = AuctionFinanceError::MissingFields(vec!["property_value".into()]);
        assert_eq!(missing.category().status_code(), 400);

        let dz = AuctionFinanceError::DivisionByZero {
            context: "level payment".into(),
        };
        assert_eq!(dz.category().status_code(), 422);

        let ser = AuctionFinanceError::SerializationError("boom".into());
        assert_eq!(ser.category().status_code(), 500);
    }

    #[test]
    fn test_missing_fields_message_lists_names() {
        let e = AuctionFinanceError::MissingFields(vec!["a".into(), "b".into()]);
        assert_eq!(e.to_string(), "Missing required fields: a, b");
        assert_eq!(e.fields(), vec!["a".to_string(), "b".to_string()]);
    }
}
