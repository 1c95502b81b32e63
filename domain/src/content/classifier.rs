//! Message content classification.
//!
//! The backend tags content inline rather than with a structured field:
//! `SQL:` marks query output that must be shown verbatim, and a leading
//! `USER: ` is a provenance tag echoed back from the originating turn.
//! [`classify`] is a pure function: same input, same output, no state.

/// Presentation category of a message's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Contains the `SQL:` marker; rendered as a verbatim code block.
    SqlResult,
    /// Everything else; rendered as markdown rich text.
    Narrative,
}

/// A classified message content: category plus the payload to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified<'a> {
    pub kind: ContentKind,
    pub payload: &'a str,
}

/// Marker for SQL query output, matched anywhere in the content.
const SQL_MARKER: &str = "SQL:";
/// Prefix stripped from SQL content, only when it starts the string.
const SQL_PREFIX: &str = "SQL: ";
/// Provenance prefix stripped from narrative content.
const USER_PREFIX: &str = "USER: ";

/// Classify a message's content and extract the payload to render.
///
/// A mid-string `SQL:` still classifies the content as [`ContentKind::SqlResult`]
/// but the payload is left untouched; only an exact leading `"SQL: "` is
/// stripped. This mirrors the backend's tagging behavior as observed.
pub fn classify(content: &str) -> Classified<'_> {
    if content.contains(SQL_MARKER) {
        let payload = content.strip_prefix(SQL_PREFIX).unwrap_or(content);
        return Classified {
            kind: ContentKind::SqlResult,
            payload,
        };
    }

    let payload = content.strip_prefix(USER_PREFIX).unwrap_or(content);
    Classified {
        kind: ContentKind::Narrative,
        payload,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sql_prefix_is_classified_and_stripped() {
        let c = classify("SQL: SELECT 1");
        assert_eq!(c.kind, ContentKind::SqlResult);
        assert_eq!(c.payload, "SELECT 1");
    }

    #[test]
    fn mid_string_sql_marker_classifies_without_stripping() {
        let c = classify("Here is the query. SQL: SELECT * FROM t");
        assert_eq!(c.kind, ContentKind::SqlResult);
        assert_eq!(c.payload, "Here is the query. SQL: SELECT * FROM t");
    }

    #[test]
    fn bare_marker_without_trailing_space_is_not_stripped() {
        let c = classify("SQL:SELECT 1");
        assert_eq!(c.kind, ContentKind::SqlResult);
        assert_eq!(c.payload, "SQL:SELECT 1");
    }

    #[test]
    fn user_prefix_is_stripped_from_narrative() {
        let c = classify("USER: hi there");
        assert_eq!(c.kind, ContentKind::Narrative);
        assert_eq!(c.payload, "hi there");
    }

    #[test]
    fn plain_content_is_narrative_unchanged() {
        let c = classify("no markers");
        assert_eq!(c.kind, ContentKind::Narrative);
        assert_eq!(c.payload, "no markers");
    }

    #[test]
    fn mid_string_user_tag_is_not_stripped() {
        let c = classify("see USER: tag");
        assert_eq!(c.kind, ContentKind::Narrative);
        assert_eq!(c.payload, "see USER: tag");
    }

    #[test]
    fn empty_content_is_narrative() {
        let c = classify("");
        assert_eq!(c.kind, ContentKind::Narrative);
        assert_eq!(c.payload, "");
    }
}
