use super::models::CalendarEvent;
use std::fmt::Write;

/// Render the digest: the header line, then `summary (start)` per event, in order.
/// Every line, the header included, ends with a newline.
pub fn format_events(header: &str, events: &[CalendarEvent]) -> String {
    let mut message = String::with_capacity(header.len() + 1 + events.len() * 48);
    message.push_str(header);
    message.push('\n');

    for event in events {
        let summary = event.summary.as_deref().unwrap_or("");
        // Writing to a String cannot fail
        let _ = writeln!(message, "{} ({})", summary, event.start.label());
    }

    message
}
