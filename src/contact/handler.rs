use log::{info, warn};

use super::error::{ContactError, MailError, Result};
use super::types::{CONFIRMATION_SUBJECT, ContactForm, ContactReply, ContactResponse, Email, MailConfig};

/// Delivers one email. Implemented by [`HttpMailer`](super::HttpMailer) on
/// native targets and by fakes in tests.
pub trait Mailer {
	fn send(&self, email: &Email) -> std::result::Result<(), MailError>;
}

/// Escapes text for interpolation into HTML element content.
pub fn escape_html(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			c => out.push(c),
		}
	}
	out
}

/// Email to the site team carrying the whole submission.
pub fn notification(form: &ContactForm, config: &MailConfig) -> Email {
	let message = escape_html(&form.message)
		.replace("\r\n", "<br>")
		.replace('\n', "<br>");
	Email {
		from: form.email.clone(),
		to: config.contact_email.clone(),
		subject: format!("New Contact Form: {}", form.subject),
		html: format!(
			"<h2>New Contact Form Submission</h2>\
			 <p><strong>Name:</strong> {}</p>\
			 <p><strong>Email:</strong> {}</p>\
			 <p><strong>Subject:</strong> {}</p>\
			 <p><strong>Message:</strong></p>\
			 <p>{message}</p>",
			escape_html(&form.name),
			escape_html(&form.email),
			escape_html(&form.subject),
		),
	}
}

/// Acknowledgement sent back to the visitor.
pub fn confirmation(form: &ContactForm, config: &MailConfig) -> Email {
	Email {
		from: config.sender().to_string(),
		to: form.email.clone(),
		subject: CONFIRMATION_SUBJECT.to_string(),
		html: format!(
			"<h2>Thank you for reaching out!</h2>\
			 <p>Hi {},</p>\
			 <p>We've received your message and will get back to you as soon as possible.</p>\
			 <p>Best regards,<br>NextGen SuperComputing Team</p>",
			escape_html(&form.name),
		),
	}
}

fn submit(body: &str, config: &MailConfig, mailer: &impl Mailer) -> Result<()> {
	let form: ContactForm = serde_json::from_str(body)?;
	form.validate()?;
	mailer.send(&notification(&form, config))?;
	// No rollback if the notification went out but this one fails.
	mailer.send(&confirmation(&form, config))?;
	Ok(())
}

/// Handles one POST of the contact form.
///
/// Replies 200 after both the notification and the confirmation were sent,
/// and 400 without sending anything when a field is missing or blank. A body
/// that does not parse as a form, or a failed send, replies 500.
pub fn handle_submission(body: &str, config: &MailConfig, mailer: &impl Mailer) -> ContactReply {
	match submit(body, config, mailer) {
		Ok(()) => {
			info!("contact: submission delivered to {}", config.contact_email);
			ContactReply {
				status: 200,
				body: ContactResponse::ok("Email sent successfully"),
			}
		}
		Err(e) => {
			match &e {
				ContactError::MissingField(_) => info!("contact: rejected submission: {e}"),
				_ => warn!("contact: error sending email: {e}"),
			}
			ContactReply {
				status: e.status(),
				body: ContactResponse::error(e.public_message()),
			}
		}
	}
}
