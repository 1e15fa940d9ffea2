use crate::StudyNotes;
use serde_json::Value;

/// A displayable view of an insight payload.
///
/// The notes and summary endpoints return whatever the model produced:
/// structured notes, a markdown string, or JSON wrapped in a code fence
/// inside a string field. [`normalize_insight`] folds all of those shapes
/// into one of these variants.
#[derive(Debug, Clone, PartialEq)]
pub enum InsightView {
    /// Nothing to display.
    Empty,
    /// Markdown text.
    Markdown(String),
    /// A plain list, one bullet per item.
    Bullets(Vec<String>),
    /// Structured study notes with at least one populated section.
    Study(StudyNotes),
    /// A bare scalar, displayed as text.
    Text(String),
    /// Pretty-printed JSON for payloads with no recognized shape.
    Dump(String),
}

/// Normalize a raw insight payload into a displayable view.
///
/// Strings are decoded first: a string holding a fenced or braced JSON
/// object is parsed and normalized again, anything else is markdown.
/// Objects resolve in precedence order: study note sections, then a
/// `summary` string, then a raw `notes` string (itself decoded when it
/// hides a JSON object), then a pretty-printed dump.
#[must_use]
pub fn normalize_insight(value: &Value) -> InsightView {
    match value {
        Value::Null => InsightView::Empty,
        Value::String(text) => match parse_possible_json(text) {
            Some(parsed) => normalize_insight(&parsed),
            None => InsightView::Markdown(text.clone()),
        },
        Value::Array(items) => InsightView::Bullets(items.iter().map(bullet_text).collect()),
        Value::Object(_) => normalize_object(value),
        other => InsightView::Text(other.to_string()),
    }
}

/// Parse text as a JSON object, stripping a surrounding ```json code fence
/// first. Returns `None` unless the remaining text is a braced object that
/// parses cleanly.
#[must_use]
pub fn parse_possible_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    let candidate = strip_json_fence(trimmed).unwrap_or(trimmed);

    if !(candidate.starts_with('{') && candidate.ends_with('}')) {
        return None;
    }

    serde_json::from_str(candidate).ok()
}

/// Decode structured study notes out of a payload. Returns `None` when the
/// payload is not an object or none of its sections hold content.
#[must_use]
pub fn extract_study_notes(value: &Value) -> Option<StudyNotes> {
    let notes: StudyNotes = serde_json::from_value(value.clone()).ok()?;
    notes.has_sections().then_some(notes)
}

fn normalize_object(value: &Value) -> InsightView {
    if let Some(notes) = extract_study_notes(value) {
        return InsightView::Study(notes);
    }

    if let Some(Value::String(summary)) = value.get("summary") {
        return InsightView::Markdown(summary.clone());
    }

    // A raw `notes` string sometimes hides fenced JSON. If the decoded
    // object has no study sections the raw text is kept as markdown.
    if let Some(Value::String(raw)) = value.get("notes") {
        if let Some(parsed) = parse_possible_json(raw) {
            if let Some(notes) = extract_study_notes(&parsed) {
                return InsightView::Study(notes);
            }
        }
        return InsightView::Markdown(raw.clone());
    }

    InsightView::Dump(
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
    )
}

fn bullet_text(item: &Value) -> String {
    match item {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn strip_json_fence(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("```")?;
    let tag = rest.get(..4)?;
    if !tag.eq_ignore_ascii_case("json") {
        return None;
    }
    Some(rest[4..].strip_suffix("```")?.trim())
}
