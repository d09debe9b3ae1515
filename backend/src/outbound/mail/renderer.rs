//! Plain-text and HTML bodies for expiry notices.

use std::fmt::Write as _;

use crate::domain::notifications::{ExpiringItem, RecordKind};
use crate::domain::ports::{NotificationRenderer, RenderContext, RenderError, RenderedBody};

/// Renders a greeting, one line per record and a footer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNotificationRenderer;

fn heading(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::License => "Software licences expiring soon",
        RecordKind::Warranty => "Asset warranties expiring soon",
    }
}

fn noun(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::License => "licence(s)",
        RecordKind::Warranty => "warranty(ies)",
    }
}

fn days_left(item: &ExpiringItem, context: &RenderContext) -> i64 {
    (item.expires_on - context.current_time.date_naive()).num_days()
}

fn describe(item: &ExpiringItem) -> String {
    match item.detail.as_deref() {
        Some(detail) => format!("{} ({detail})", item.label),
        None => item.label.clone(),
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn render_text(context: &RenderContext) -> Result<String, std::fmt::Error> {
    let mut text = String::new();
    writeln!(text, "Dear {},", context.recipient_display_name)?;
    writeln!(text)?;
    writeln!(
        text,
        "The following {} expire within the next {} days:",
        noun(context.kind),
        context.window_days
    )?;
    writeln!(text)?;
    for item in &context.records {
        writeln!(
            text,
            "- {} expires on {} ({} days left)",
            describe(item),
            item.expires_on.format("%Y-%m-%d"),
            days_left(item, context)
        )?;
    }
    writeln!(text)?;
    writeln!(text, "Please arrange a renewal or replacement with the IT team.")?;
    write!(
        text,
        "Generated {}",
        context.current_time.format("%Y-%m-%d %H:%M UTC")
    )?;
    Ok(text)
}

fn render_html(context: &RenderContext) -> Result<String, std::fmt::Error> {
    let mut html = String::new();
    writeln!(html, "<h2>{}</h2>", heading(context.kind))?;
    writeln!(
        html,
        "<p>Dear {},</p>",
        escape_html(&context.recipient_display_name)
    )?;
    writeln!(
        html,
        "<p>The following {} expire within the next {} days:</p>",
        noun(context.kind),
        context.window_days
    )?;
    writeln!(
        html,
        "<table><thead><tr><th>Item</th><th>Expires</th><th>Days left</th></tr></thead><tbody>"
    )?;
    for item in &context.records {
        writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&describe(item)),
            item.expires_on.format("%Y-%m-%d"),
            days_left(item, context)
        )?;
    }
    writeln!(html, "</tbody></table>")?;
    write!(
        html,
        "<p><small>Generated {}</small></p>",
        context.current_time.format("%Y-%m-%d %H:%M UTC")
    )?;
    Ok(html)
}

impl NotificationRenderer for TextNotificationRenderer {
    fn render(&self, context: &RenderContext) -> Result<RenderedBody, RenderError> {
        let text = render_text(context).map_err(|err| RenderError::template(err.to_string()))?;
        let html = render_html(context).map_err(|err| RenderError::template(err.to_string()))?;
        Ok(RenderedBody { text, html })
    }
}
