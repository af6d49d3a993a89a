use thiserror::Error;

/// Failure reported by a [`Mailer`](super::Mailer).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MailError {
	#[error("mail transport not configured: {0}")]
	NotConfigured(&'static str),

	#[error("mail transport failed: {0}")]
	Transport(String),

	#[error("mail API rejected the message with status {0}")]
	Rejected(u16),
}

/// Why a contact submission was not delivered.
#[derive(Error, Debug)]
pub enum ContactError {
	#[error("request body is not a contact form: {0}")]
	MalformedBody(#[from] serde_json::Error),

	#[error("missing required field `{0}`")]
	MissingField(&'static str),

	#[error(transparent)]
	Dispatch(#[from] MailError),
}

impl ContactError {
	/// HTTP status the endpoint answers with.
	pub fn status(&self) -> u16 {
		match self {
			Self::MissingField(_) => 400,
			Self::MalformedBody(_) | Self::Dispatch(_) => 500,
		}
	}

	/// Message shown to the visitor; internal details stay in the logs.
	pub fn public_message(&self) -> &'static str {
		match self {
			Self::MissingField(_) => "All fields are required",
			Self::MalformedBody(_) | Self::Dispatch(_) => "Failed to send email",
		}
	}
}

pub type Result<T> = std::result::Result<T, ContactError>;
