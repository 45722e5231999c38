//! Email messages the service sends, and their HTML templates.
//!
//! Every user-supplied string is HTML-escaped before it is interpolated.

use adoptly_domain::application::ApplicationStatus;

/// Display name on notices sent on the platform's own behalf.
pub const SUPPORT_SENDER: &str = "Adoptly Support";
/// Display name on messages relayed between users.
pub const PLATFORM_SENDER: &str = "Adoptly Platform";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from_name: &'static str,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A message from one user to another. Replies go straight to the sender.
pub fn contact_message(
    to: &str,
    sender_name: &str,
    sender_email: &str,
    subject: &str,
    message: &str,
) -> OutgoingEmail {
    let sender_name = escape_html(sender_name);
    let html = format!(
        r#"<div style="font-family: sans-serif; padding: 20px; border: 1px solid #ddd; border-radius: 8px;">
  <h2 style="color: #333;">New Message via Adoptly</h2>
  <p>You have received a new message regarding: <strong>{subject}</strong></p>
  <hr style="border-top: 1px solid #eee;">
  <p><strong>From:</strong> {sender_name}</p>
  <div style="background-color: #f9f9f9; padding: 15px; border-radius: 5px; margin-top: 10px;">
    <p style="white-space: pre-wrap; margin: 0;">{message}</p>
  </div>
  <p style="margin-top: 20px;">You can reply directly to this email to respond to {sender_name}.</p>
</div>"#,
        subject = escape_html(subject),
        message = escape_html(message),
    );
    OutgoingEmail {
        from_name: PLATFORM_SENDER,
        to: to.to_string(),
        reply_to: Some(sender_email.to_string()),
        subject: format!("Adoptly Message: {subject}"),
        html,
    }
}

/// Tells an applicant how their application for `pet_name` was decided.
///
/// Only `Approved` gets the congratulation copy; anything else is worded as a rejection.
pub fn decision_notice(to: &str, pet_name: &str, status: ApplicationStatus) -> OutgoingEmail {
    let pet = escape_html(pet_name);
    let html = match status {
        ApplicationStatus::Approved => format!(
            r#"<div style="font-family: sans-serif; padding: 20px;">
  <h2>Congratulations!</h2>
  <p>We are thrilled to inform you that your adoption application for <strong>{pet}</strong> has been approved!</p>
  <p>The pet's owner will be in touch with you shortly to arrange the next steps.</p>
  <p>Thank you for choosing to adopt.</p>
</div>"#
        ),
        _ => format!(
            r#"<div style="font-family: sans-serif; padding: 20px;">
  <h2>Application Update</h2>
  <p>Thank you for your interest in adopting <strong>{pet}</strong>.</p>
  <p>After careful consideration, the owner has decided to proceed with another applicant at this time. We encourage you to continue browsing other wonderful pets on Adoptly.</p>
  <p>We wish you the best of luck in finding your new companion.</p>
</div>"#
        ),
    };
    OutgoingEmail {
        from_name: SUPPORT_SENDER,
        to: to.to_string(),
        reply_to: None,
        subject: format!("Update on your application for {pet_name} | Adoptly"),
        html,
    }
}

/// Password-reset link valid for one hour.
pub fn password_reset(to: &str, reset_url: &str) -> OutgoingEmail {
    let url = escape_html(reset_url);
    let html = format!(
        r#"<div style="font-family: sans-serif; padding: 20px;">
  <h2>Reset your Adoptly password</h2>
  <p>We received a request to reset your password. The link below is valid for 1 hour.</p>
  <p><a href="{url}">{url}</a></p>
  <p>If you did not request this, please ignore this email.</p>
</div>"#
    );
    OutgoingEmail {
        from_name: SUPPORT_SENDER,
        to: to.to_string(),
        reply_to: None,
        subject: "Reset your Adoptly password".to_string(),
        html,
    }
}
