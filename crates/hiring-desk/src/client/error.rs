use serde_json::Value;

/// Failure of a backend call, already reduced to the string shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },
    /// No response was received.
    #[error("{0}")]
    Transport(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
    /// Rejected locally before any request was made.
    #[error("{0}")]
    Invalid(String),
}

impl ApiError {
    /// Builds the error for a non-success response. The message is the body's `detail`, else
    /// `error`, else `message`, else the raw body, else a generic status line.
    pub fn from_response(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            message: response_message(status, body),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub fn response_message(status: u16, body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if let Some(message) = message_field(&value) {
            return message;
        }
        if !value.is_null() {
            return value.to_string();
        }
    } else if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    format!("Request failed with status code {status}")
}

fn message_field(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    ["detail", "error", "message"].iter().find_map(|key| {
        match object.get(*key)? {
            Value::String(text) if !text.is_empty() => Some(text.clone()),
            Value::Null => None,
            Value::String(_) => None,
            other => Some(other.to_string()),
        }
    })
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Decode(value.to_string())
        } else {
            Self::Transport(value.to_string())
        }
    }
}
