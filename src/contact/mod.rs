//! Contact form endpoint: validates a posted form, mails the site team and
//! sends the visitor a confirmation.
//!
//! [`handle_submission`] is independent of any HTTP framework; the host
//! passes the raw request body and a [`Mailer`], and writes back the returned
//! [`ContactReply`].

mod error;
mod handler;
#[cfg(not(target_arch = "wasm32"))]
mod http;
mod types;

pub use error::{ContactError, MailError};
pub use handler::{Mailer, confirmation, escape_html, handle_submission, notification};
#[cfg(not(target_arch = "wasm32"))]
pub use http::HttpMailer;
pub use types::{ContactForm, ContactReply, ContactResponse, Email, MailConfig};
