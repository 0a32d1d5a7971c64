use chrono::{DateTime, Utc};
use entourage_core::WaitlistEntry;
use serde::Serialize;

/// Addressing shared by every signup notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTemplate {
    pub from: String,
    pub to: String,
    pub subject: String,
}

/// A rendered message in the shape the email API expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerNotification {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

pub fn signup_notification(
    template: &NotificationTemplate,
    entry: &WaitlistEntry,
    submitted_at: DateTime<Utc>,
) -> OwnerNotification {
    let mut rows = vec![detail_row("Email", &entry.email)];
    if let Some(name) = entry.name.as_deref() {
        rows.push(detail_row("Name", name));
    }
    if let Some(company) = entry.company.as_deref() {
        rows.push(detail_row("Company", company));
    }
    let signed_up = submitted_at.format("%Y-%m-%d %H:%M:%S UTC").to_string();

    let html = format!(
        concat!(
            "<div style=\"font-family: system-ui, sans-serif; max-width: 600px; margin: 0 auto;\">",
            "<h2 style=\"color: #000; margin-bottom: 24px;\">New Waitlist Signup</h2>",
            "<div style=\"background: #f9f9f9; padding: 20px; border: 1px solid #e5e5e5;\">",
            "{rows}",
            "<p style=\"margin: 0; color: #666;\"><strong>Signed up:</strong> {signed_up}</p>",
            "</div></div>"
        ),
        rows = rows.concat(),
        signed_up = signed_up,
    );

    OwnerNotification {
        from: template.from.clone(),
        to: template.to.clone(),
        subject: template.subject.clone(),
        html,
    }
}

fn detail_row(label: &str, value: &str) -> String {
    format!(
        "<p style=\"margin: 0 0 12px 0;\"><strong>{label}:</strong> {}</p>",
        escape_html(value)
    )
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
