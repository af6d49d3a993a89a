use serde::{Deserialize, Serialize};

use super::error::{ContactError, Result};

pub const DEFAULT_CONTACT_EMAIL: &str = "contact@nextgensupercomputing.org";
pub const CONFIRMATION_SUBJECT: &str = "We received your message - NextGen SuperComputing";

/// Fields posted by the contact page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ContactForm {
	pub name: String,
	pub email: String,
	pub subject: String,
	pub message: String,
}

impl ContactForm {
	/// Rejects the form if any field is empty or only whitespace.
	pub fn validate(&self) -> Result<()> {
		let fields = [
			("name", &self.name),
			("email", &self.email),
			("subject", &self.subject),
			("message", &self.message),
		];
		match fields.iter().find(|(_, value)| value.trim().is_empty()) {
			Some((field, _)) => Err(ContactError::MissingField(*field)),
			None => Ok(()),
		}
	}
}

/// JSON body of the endpoint's answer; exactly one field is set.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContactResponse {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl ContactResponse {
	pub fn ok(message: impl Into<String>) -> Self {
		Self {
			message: Some(message.into()),
			error: None,
		}
	}

	pub fn error(error: impl Into<String>) -> Self {
		Self {
			message: None,
			error: Some(error.into()),
		}
	}
}

/// Status code and body, ready for whatever HTTP layer hosts the handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactReply {
	pub status: u16,
	pub body: ContactResponse,
}

impl ContactReply {
	pub fn to_json(&self) -> String {
		serde_json::to_string(&self.body).unwrap_or_else(|_| String::from("{}"))
	}
}

/// A single outgoing HTML email.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Email {
	pub from: String,
	pub to: String,
	pub subject: String,
	pub html: String,
}

/// Where mail goes and how it is sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailConfig {
	/// Sender of the confirmation email.
	pub email_user: Option<String>,
	/// Inbox that receives submissions.
	pub contact_email: String,
	pub api_url: Option<String>,
	pub api_key: Option<String>,
}

impl Default for MailConfig {
	fn default() -> Self {
		Self {
			email_user: None,
			contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
			api_url: None,
			api_key: None,
		}
	}
}

impl MailConfig {
	/// Reads `EMAIL_USER`, `CONTACT_EMAIL`, `MAIL_API_URL` and `MAIL_API_KEY`.
	pub fn from_env() -> Self {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
		let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
		Self {
			email_user: get("EMAIL_USER"),
			contact_email: get("CONTACT_EMAIL").unwrap_or_else(|| DEFAULT_CONTACT_EMAIL.to_string()),
			api_url: get("MAIL_API_URL"),
			api_key: get("MAIL_API_KEY"),
		}
	}

	/// Confirmation sender, falling back to the contact inbox.
	pub fn sender(&self) -> &str {
		self.email_user.as_deref().unwrap_or(&self.contact_email)
	}
}
