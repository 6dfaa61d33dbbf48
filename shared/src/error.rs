use thiserror::Error;

/// Reasons a picked file is not accepted as the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("Please sign in to upload")]
    SignInRequired,
    #[error("Only PNG or JPEG images are allowed")]
    NoFile,
    #[error("Only PNG or JPEG images are allowed")]
    UnsupportedType(String),
    #[error("An image is being generated, please wait")]
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("Unknown parameter: {0}")]
    UnknownName(String),
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The storage service answered with an error body.
    #[error("{0}")]
    Rejected(String),
    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("{0}")]
    Network(String),
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Terminal outcome of a submission attempt. The display text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Please upload an image")]
    NoSelection,
    #[error("Please sign in to upload")]
    SignInRequired,
    #[error("An image is already being generated")]
    AlreadySubmitting,
    #[error("Upload failed: {0}")]
    Upload(StorageError),
    #[error("Failed to generate image: {0}")]
    Generation(GenerationError),
    #[error("Failed to generate image: invalid image payload ({0})")]
    InvalidPayload(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Auth server error: {status} - {message}")]
    Server { status: u16, message: String },
    #[error("Failed to parse auth response: {0}")]
    Parse(String),
    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),
    #[error("Session storage error: {0}")]
    Storage(String),
}

impl AuthError {
    /// The stored token was refused, so the session is no longer valid.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AuthError::Server { status: 401 | 403, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_error_message() {
        let err = SubmitError::Upload(StorageError::Rejected("quota exceeded".into()));
        assert_eq!(err.to_string(), "Upload failed: quota exceeded");
    }

    #[test]
    fn test_generation_error_uses_server_message() {
        let err = SubmitError::Generation(GenerationError::Server {
            status: 500,
            message: "model offline".into(),
        });
        assert_eq!(err.to_string(), "Failed to generate image: model offline");
    }

    #[test]
    fn test_unauthorized() {
        let err = AuthError::Server { status: 401, message: "jwt expired".into() };
        assert!(err.is_unauthorized());
        assert!(!AuthError::Network("offline".into()).is_unauthorized());
    }
}
