//! Outgoing admin mail.
//!
//! The admin only sends one message, the password reset instructions. Delivery
//! sits behind the `Mailer` trait; `LogMailer` writes the message to the log,
//! which is what development and test setups use.

use crate::error::AppError;

pub trait Mailer: Send + Sync {
    fn send_reset_password_instructions(
        &self,
        recipient: &str,
        reset_url: &str,
    ) -> Result<(), AppError>;
}

/// Renders the plain-text reset instructions body.
pub fn reset_password_instructions(recipient: &str, reset_url: &str) -> String {
    format!(
        "Hello {},\n\n\
         Someone has requested a link to change your password. \
         You can do this through the link below.\n\n\
         {}\n\n\
         If you didn't request this, please ignore this email.\n\
         Your password won't change until you access the link above and create a new one.\n",
        recipient, reset_url
    )
}

pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

impl Mailer for LogMailer {
    fn send_reset_password_instructions(
        &self,
        recipient: &str,
        reset_url: &str,
    ) -> Result<(), AppError> {
        log::info!(
            "mail from {} to {}: Reset password instructions\n{}",
            self.from,
            recipient,
            reset_password_instructions(recipient, reset_url)
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_log_mailer_accepts_messages() {
        let mailer = LogMailer::new("noreply@taskadmin.local");
        assert!(mailer
            .send_reset_password_instructions("a@b.com", "http://localhost/reset")
            .is_ok());
    }

    #[test]
    fn test_instructions_contain_link() {
        let body = reset_password_instructions("a@b.com", "http://localhost/reset?t=1");
        assert!(body.starts_with("Hello a@b.com"));
        assert!(body.contains("http://localhost/reset?t=1"));
    }
}
