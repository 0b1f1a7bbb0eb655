pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Qdrant error: {message}")]
	Qdrant { message: String },
}
impl Error {
	pub(crate) fn invalid(message: impl Into<String>) -> Self {
		Self::InvalidRequest { message: message.into() }
	}

	pub(crate) fn provider(message: impl Into<String>) -> Self {
		Self::Provider { message: message.into() }
	}
}

impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<ptg_storage::Error> for Error {
	fn from(err: ptg_storage::Error) -> Self {
		match err {
			ptg_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			ptg_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			ptg_storage::Error::Qdrant(inner) => Self::Qdrant { message: inner.to_string() },
		}
	}
}

impl From<ptg_providers::Error> for Error {
	fn from(err: ptg_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<qdrant_client::QdrantError> for Error {
	fn from(err: qdrant_client::QdrantError) -> Self {
		Self::Qdrant { message: err.to_string() }
	}
}
