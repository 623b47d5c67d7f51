//! Error type shared by every gateway call.

/// Result alias for gateway operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// What went wrong talking to the backend.
///
/// `Status` carries the server's own message verbatim whenever the error
/// body had one; callers surface it to the user unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
	#[error("{message}")]
	Status { status: u16, message: String },
	#[error("network error: {0}")]
	Network(String),
	#[error("unexpected response: {0}")]
	Decode(String),
}

impl ApiError {
	pub fn status(&self) -> Option<u16> {
		match self {
			ApiError::Status { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Duplicate-key rejections, e.g. an existing property number or email.
	pub fn is_conflict(&self) -> bool {
		self.status() == Some(409)
	}

	pub fn is_unauthorized(&self) -> bool {
		self.status() == Some(401)
	}

	pub fn is_not_found(&self) -> bool {
		self.status() == Some(404)
	}
}
