//! Card-style invitation renderer.
//!
//! One shared layout with inline CSS for email-client compatibility: a
//! gradient header with the kind badge, the topic with a priority badge, a
//! detail grid (date, time, duration, speaker), then link, location, agenda
//! and attendee sections that render only when the form provides them.

use chrono::{Datelike, Utc};

use smartmeet_core::entities::Priority;

use crate::kinds::TemplateKind;

/// User input for one invitation.
#[derive(Clone, Debug, Default)]
pub struct InviteForm {
    /// Meeting topic (required upstream).
    pub meeting_topic: String,
    /// Speaker or host.
    pub speaker_name: Option<String>,
    /// Meeting date (`YYYY-MM-DD`).
    pub meeting_date: Option<String>,
    /// Meeting time (`HH:MM`).
    pub meeting_time: Option<String>,
    /// Human-entered duration label (`30 minutes`).
    pub duration_label: Option<String>,
    /// Join link.
    pub meeting_link: Option<String>,
    /// Physical location.
    pub location: Option<String>,
    /// Attendee display names.
    pub attendees: Vec<String>,
    /// Agenda / additional notes.
    pub notes: Option<String>,
    /// Priority badge.
    pub priority: Priority,
}

/// A rendered invitation.
#[derive(Clone, Debug)]
pub struct Invite {
    /// List title (the topic).
    pub title: String,
    /// Email subject line.
    pub subject: String,
    /// Card HTML body.
    pub html: String,
}

/// Render an invitation for the given kind.
pub fn render(kind: TemplateKind, form: &InviteForm) -> Invite {
    let topic = escape(&form.meeting_topic);
    let priority = form.priority;
    let day = Utc::now().day();

    let mut html = String::with_capacity(4096);
    html.push_str(&format!(
        r#"<div style="font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; max-width: 600px; margin: 0 auto; background: white; border-radius: 20px; box-shadow: 0 20px 40px rgba(0, 0, 0, 0.1); overflow: hidden; border: 1px solid #e9ecef;">
<div style="background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); padding: 2rem; color: white;">
  <div style="display: flex; align-items: center; justify-content: space-between; gap: 1rem; flex-wrap: wrap;">
    <div style="position: relative; width: 60px; height: 60px; background: rgba(255, 255, 255, 0.2); border-radius: 12px; display: flex; align-items: center; justify-content: center;">
      <span style="font-size: 1.5rem; color: white;">&#128197;</span>
      <span style="position: absolute; top: -5px; right: -5px; background: #dc3545; color: white; border-radius: 50%; width: 20px; height: 20px; display: flex; align-items: center; justify-content: center; font-size: 0.75rem; font-weight: bold;">{day}</span>
    </div>
    <div style="flex: 1; min-width: 200px;">
      <h1 style="font-size: 2rem; font-weight: 700; margin: 0 0 0.5rem 0; color: white;">Meeting Invitation</h1>
      <p style="font-size: 0.9rem; opacity: 0.9; margin: 0;">Smartmeet &bull; Professional Meeting Coordination</p>
    </div>
    <div style="background: rgba(255, 255, 255, 0.2); color: white; padding: 0.5rem 1rem; border-radius: 20px; font-size: 0.8rem; font-weight: 600; text-transform: uppercase; letter-spacing: 0.5px;">{badge}</div>
  </div>
</div>
<div style="padding: 2rem; background: #f8f9fa; display: flex; align-items: center; justify-content: space-between; gap: 1rem; flex-wrap: wrap;">
  <h2 style="font-size: 1.5rem; font-weight: 700; color: #2c3e50; margin: 0; flex: 1; min-width: 200px;">{topic}</h2>
  <div style="background-color: {priority_color}; color: white; padding: 0.5rem 1rem; border-radius: 20px; font-size: 0.8rem; font-weight: 600; text-transform: uppercase; letter-spacing: 0.5px;">{priority_label} PRIORITY</div>
</div>
"#,
        badge = kind.badge(),
        priority_color = priority.color(),
        priority_label = priority.as_str().to_uppercase(),
    ));

    html.push_str(r#"<div style="padding: 2rem;">"#);
    html.push_str(&section_heading("&#128203;", "Meeting Details"));
    html.push_str(
        r#"<div style="display: grid; grid-template-columns: repeat(auto-fit, minmax(250px, 1fr)); gap: 1rem;">"#,
    );
    html.push_str(&detail_cell("&#128197;", "DATE", form.meeting_date.as_deref()));
    html.push_str(&detail_cell("&#128336;", "TIME", form.meeting_time.as_deref()));
    html.push_str(&detail_cell(
        "&#9201;",
        "DURATION",
        form.duration_label.as_deref().or(Some("30 minutes")),
    ));
    html.push_str(&detail_cell("&#127908;", "SPEAKER", form.speaker_name.as_deref()));
    html.push_str("</div></div>\n");

    if let Some(link) = non_empty(form.meeting_link.as_deref()) {
        html.push_str(&format!(
            r#"<div style="padding: 0 2rem 2rem;">{heading}<a href="{link}" style="display: inline-block; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 0.75rem 1.5rem; border-radius: 8px; text-decoration: none; font-weight: 600;">Join Meeting</a></div>
"#,
            heading = section_heading("&#128279;", "Meeting Link"),
            link = escape(link),
        ));
    }

    if let Some(location) = non_empty(form.location.as_deref()) {
        html.push_str(&format!(
            r#"<div style="padding: 0 2rem 2rem;">{heading}<p style="color: #2c3e50; font-weight: 500; margin: 0; font-size: 1rem;">{location}</p></div>
"#,
            heading = section_heading("&#128205;", "Location"),
            location = escape(location),
        ));
    }

    if let Some(notes) = non_empty(form.notes.as_deref()) {
        html.push_str(&format!(
            r#"<div style="padding: 0 2rem 2rem;">{heading}<p style="color: #2c3e50; margin: 0; line-height: 1.6;">{notes}</p></div>
"#,
            heading = section_heading("&#128196;", "Agenda"),
            notes = escape(notes),
        ));
    }

    if !form.attendees.is_empty() {
        let list = escape(&form.attendees.join(", "));
        html.push_str(&format!(
            r#"<div style="padding: 0 2rem 2rem;">{heading}<p style="color: #2c3e50; margin: 0; font-weight: 500;">{list}</p></div>
"#,
            heading = section_heading("&#128101;", "Attendees"),
        ));
    }

    html.push_str(
        r##"<div style="padding: 2rem; text-align: center; background: #f8f9fa;">
  <a href="#" style="display: inline-block; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 1rem 2rem; border-radius: 12px; font-size: 1rem; font-weight: 600; text-decoration: none;">Confirm Attendance</a>
</div>
<div style="background: #343a40; color: white; padding: 1.5rem 2rem; text-align: center;">
  <p style="margin: 0.25rem 0; font-size: 0.9rem; opacity: 0.9;">Generated by Smartmeet &bull; Professional Meeting Coordination</p>
  <p style="margin: 0.25rem 0; font-size: 0.9rem; opacity: 0.9;">Please respond to confirm your attendance</p>
</div>
</div>"##,
    );

    Invite {
        title: if form.meeting_topic.is_empty() {
            "Meeting Invitation".to_string()
        } else {
            form.meeting_topic.clone()
        },
        subject: kind.subject(&form.meeting_topic),
        html,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal
// ─────────────────────────────────────────────────────────────────────────────

fn section_heading(icon: &str, title: &str) -> String {
    format!(
        r#"<div style="display: flex; align-items: center; gap: 0.75rem; margin-bottom: 1.5rem;"><span style="color: #667eea; font-size: 1.2rem;">{icon}</span><h3 style="color: #2c3e50; font-weight: 600; margin: 0; font-size: 1.1rem;">{title}</h3></div>"#,
    )
}

fn detail_cell(icon: &str, label: &str, value: Option<&str>) -> String {
    let value = non_empty(value).map_or_else(|| "TBD".to_string(), escape);
    format!(
        r#"<div style="background: #f8f9fa; border-radius: 12px; padding: 1.5rem; display: flex; align-items: center; gap: 1rem; border: 1px solid #e9ecef;"><span style="color: #667eea; font-size: 1.5rem; width: 30px; text-align: center;">{icon}</span><div style="display: flex; flex-direction: column; gap: 0.25rem;"><span style="font-size: 0.75rem; color: #6c757d; font-weight: 600; text-transform: uppercase; letter-spacing: 0.5px;">{label}</span><span style="font-size: 1rem; color: #2c3e50; font-weight: 600;">{value}</span></div></div>"#,
    )
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
