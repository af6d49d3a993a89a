use std::time::Duration;

use log::debug;

use super::error::MailError;
use super::handler::Mailer;
use super::types::{Email, MailConfig};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Sends mail through a transactional-mail HTTP API: each email is POSTed as
/// JSON with a bearer token.
pub struct HttpMailer {
	agent: ureq::Agent,
	api_url: String,
	api_key: String,
}

impl HttpMailer {
	pub fn from_config(config: &MailConfig) -> Result<Self, MailError> {
		let api_url = config
			.api_url
			.clone()
			.ok_or(MailError::NotConfigured("MAIL_API_URL is not set"))?;
		let api_key = config
			.api_key
			.clone()
			.ok_or(MailError::NotConfigured("MAIL_API_KEY is not set"))?;
		let agent: ureq::Agent = ureq::Agent::config_builder()
			.timeout_global(Some(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
			.http_status_as_error(false)
			.build()
			.into();
		Ok(Self {
			agent,
			api_url,
			api_key,
		})
	}
}

impl Mailer for HttpMailer {
	fn send(&self, email: &Email) -> Result<(), MailError> {
		debug!("mail: posting '{}' to {}", email.subject, self.api_url);
		let response = self
			.agent
			.post(&self.api_url)
			.header("Authorization", &format!("Bearer {}", self.api_key))
			.send_json(email)
			.map_err(|e| MailError::Transport(e.to_string()))?;
		let status = response.status().as_u16();
		if (200..300).contains(&status) {
			Ok(())
		} else {
			Err(MailError::Rejected(status))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn requires_api_settings() {
		let err = HttpMailer::from_config(&MailConfig::default()).err();
		assert_eq!(err, Some(MailError::NotConfigured("MAIL_API_URL is not set")));

		let config = MailConfig {
			api_url: Some("https://mail.example.org/send".into()),
			..MailConfig::default()
		};
		assert!(matches!(
			HttpMailer::from_config(&config),
			Err(MailError::NotConfigured("MAIL_API_KEY is not set"))
		));
	}
}
