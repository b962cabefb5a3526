//! Uniform response envelope for every registration outcome

use serde::{Deserialize, Serialize};

use super::error::{DuplicateFlags, RegistrationError};
use super::validation::FieldFlags;

pub const SUCCESS_MESSAGE: &str = "Successful registration";

/// `{success, msg?, error?}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

/// Failure detail carried by the envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub status: u16,
    pub msg: String,
    /// Validation messages in field order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incorrect: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incorrect_fields: Option<FieldFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate: Option<DuplicateFlags>,
}

impl RegistrationEnvelope {
    pub fn success() -> Self {
        Self {
            success: true,
            msg: Some(SUCCESS_MESSAGE.to_string()),
            error: None,
        }
    }

    pub fn failure(error: &RegistrationError) -> Self {
        Self {
            success: false,
            msg: None,
            error: Some(ErrorPayload::from(error)),
        }
    }

    /// Status of the outcome: 200 on success, the embedded status otherwise
    pub fn status(&self) -> u16 {
        self.error.as_ref().map_or(200, |error| error.status)
    }
}

impl From<&RegistrationError> for ErrorPayload {
    fn from(error: &RegistrationError) -> Self {
        let mut payload = Self {
            status: error.status(),
            msg: error.message(),
            incorrect: None,
            incorrect_fields: None,
            duplicate: None,
        };

        match error {
            RegistrationError::Validation(failure) => {
                payload.incorrect = Some(failure.messages().to_vec());
                payload.incorrect_fields = Some(*failure.fields());
            }
            RegistrationError::Conflict(flags) => payload.duplicate = Some(*flags),
            RegistrationError::Store(_) => {}
        }

        payload
    }
}

impl From<Result<(), RegistrationError>> for RegistrationEnvelope {
    fn from(result: Result<(), RegistrationError>) -> Self {
        match result {
            Ok(()) => Self::success(),
            Err(error) => Self::failure(&error),
        }
    }
}
