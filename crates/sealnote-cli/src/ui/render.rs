//! Rendering primitives for CLI output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{ASCII_MARKDOWN, UTF8_FULL};
use comfy_table::{ContentArrangement, Table as ComfyTable};

use sealnote_core::NoteSummary;

use super::context::UiContext;
use super::format::format_datetime;
use super::theme::{styled, styles, Badge};

/// Render a badge with optional message.
pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    let colored_badge = styled(kind.display(ctx.unicode), kind.style(), ctx.color);

    if message.is_empty() {
        colored_badge
    } else {
        format!("{} {}", colored_badge, message)
    }
}

/// Render a hint line.
pub fn hint(ctx: &UiContext, text: &str) -> String {
    let label = styled("Hint:", styles::dim(), ctx.color);
    format!("{} {}", label, text)
}

/// Render a key-value pair with a dim key.
pub fn kv(ctx: &UiContext, key: &str, value: &str) -> String {
    let styled_key = styled(&format!("{}:", key), styles::dim(), ctx.color);
    format!("{} {}", styled_key, value)
}

/// Render a receipt (summary block after an action).
pub fn receipt(ctx: &UiContext, title: &str, items: &[(&str, &str)]) -> String {
    let mut lines = vec![badge(ctx, Badge::Ok, title)];
    for (key, value) in items {
        lines.push(format!("  {}", kv(ctx, key, value)));
    }
    lines.join("\n")
}

/// Render an error message with optional hint.
pub fn error_message(ctx: &UiContext, message: &str, error_hint: Option<&str>) -> String {
    let mut lines = vec![badge(ctx, Badge::Err, message)];
    if let Some(h) = error_hint {
        lines.push(hint(ctx, h));
    }
    lines.join("\n")
}

/// Render an integrity alarm: data that failed authentication.
pub fn alarm_message(ctx: &UiContext, message: &str, error_hint: &str) -> String {
    let text = styled(message, styles::alarm(), ctx.color);
    format!(
        "{}\n{}",
        badge(ctx, Badge::Err, &format!("SECURITY WARNING: {}", text)),
        hint(ctx, error_hint)
    )
}

/// Render the note list as a table.
pub fn notes_table(ctx: &UiContext, notes: &[NoteSummary]) -> String {
    if notes.is_empty() {
        return badge(ctx, Badge::Info, "No notes yet.");
    }

    let mut table = ComfyTable::new();
    if ctx.unicode {
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS);
    } else {
        table.load_preset(ASCII_MARKDOWN);
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["NAME", "LAST MODIFIED"]);
    for note in notes {
        table.add_row(vec![
            note.name.to_string(),
            format_datetime(&note.last_modified),
        ]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use sealnote_core::NoteName;

    use super::*;

    #[test]
    fn test_badge_plain() {
        let ctx = UiContext::plain();
        assert_eq!(badge(&ctx, Badge::Ok, "Saved"), "[OK] Saved");
        assert_eq!(badge(&ctx, Badge::Warn, ""), "[WARN]");
    }

    #[test]
    fn test_error_message_with_hint() {
        let ctx = UiContext::plain();
        let out = error_message(&ctx, "Note not found", Some("Type `list`"));
        assert_eq!(out, "[ERR] Note not found\nHint: Type `list`");
    }

    #[test]
    fn test_alarm_message_is_loud() {
        let ctx = UiContext::plain();
        let out = alarm_message(&ctx, "tampered", "run check");
        assert!(out.starts_with("[ERR] SECURITY WARNING: tampered"));
    }

    #[test]
    fn test_notes_table_lists_names() {
        let ctx = UiContext::plain();
        let notes = vec![NoteSummary {
            name: NoteName::new("groceries").unwrap(),
            last_modified: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
        }];
        let out = notes_table(&ctx, &notes);
        assert!(out.contains("groceries"));
        assert!(out.contains("2024-03-01 12:30"));
    }

    #[test]
    fn test_notes_table_empty() {
        let ctx = UiContext::plain();
        assert_eq!(notes_table(&ctx, &[]), "[INFO] No notes yet.");
    }
}
