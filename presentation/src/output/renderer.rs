//! Per-message presentation.
//!
//! Dispatches on the domain's content classification: SQL output is
//! shown as a labeled verbatim block (no markdown interpretation — SQL
//! text routinely contains characters markdown would mangle), everything
//! else goes through the markdown renderer.

use crate::output::markdown::render_markdown;
use colored::Colorize;
use tabletalk_domain::{ContentKind, Message, Role, classify};

const SQL_INDENT: &str = "  ";

/// Formats conversation messages for terminal display
pub struct MessageRenderer;

impl MessageRenderer {
    /// Display label for a message role.
    ///
    /// Unrecognized roles fall back to the raw role string with its
    /// first letter capitalized, so new backend roles degrade gracefully.
    pub fn role_label(role: &Role) -> String {
        match role {
            Role::User => "You".to_string(),
            Role::Assistant => "Assistant".to_string(),
            Role::System => "System".to_string(),
            Role::Other(raw) => capitalize_first(raw),
        }
    }

    /// Render one message: a styled role line followed by its content.
    pub fn render(message: &Message) -> String {
        let mut out = String::new();
        out.push_str(&Self::header(&message.role));
        out.push('\n');

        let classified = classify(&message.content);
        match classified.kind {
            ContentKind::SqlResult => {
                out.push_str(&format!("{}\n", "SQL query".yellow().bold()));
                out.push_str(&Self::verbatim_block(classified.payload));
            }
            ContentKind::Narrative => {
                out.push_str(&render_markdown(classified.payload));
            }
        }
        out
    }

    fn header(role: &Role) -> String {
        let label = Self::role_label(role);
        match role {
            Role::User => label.blue().bold().to_string(),
            Role::Assistant => label.green().bold().to_string(),
            Role::System => label.dimmed().bold().to_string(),
            Role::Other(_) => label.bold().to_string(),
        }
    }

    /// Fixed-width block shown exactly as received, one line per line.
    fn verbatim_block(text: &str) -> String {
        let mut out = String::new();
        for line in text.lines() {
            out.push_str(SQL_INDENT);
            out.push_str(line);
            out.push('\n');
        }
        if text.is_empty() {
            out.push('\n');
        }
        out
    }
}

fn capitalize_first(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_color() {
        colored::control::set_override(false);
    }

    #[test]
    fn known_roles_map_to_display_names() {
        assert_eq!(MessageRenderer::role_label(&Role::User), "You");
        assert_eq!(MessageRenderer::role_label(&Role::Assistant), "Assistant");
        assert_eq!(MessageRenderer::role_label(&Role::System), "System");
    }

    #[test]
    fn unknown_role_is_capitalized_raw_string() {
        assert_eq!(
            MessageRenderer::role_label(&Role::Other("tool".to_string())),
            "Tool"
        );
        assert_eq!(
            MessageRenderer::role_label(&Role::Other("".to_string())),
            ""
        );
    }

    #[test]
    fn sql_message_is_rendered_verbatim() {
        no_color();
        let out = MessageRenderer::render(&Message::assistant("SQL: SELECT * FROM t"));
        assert!(out.starts_with("Assistant\n"));
        assert!(out.contains("SQL query\n"));
        assert!(out.contains("  SELECT * FROM t\n"));
    }

    #[test]
    fn sql_content_is_not_markdown_interpreted() {
        no_color();
        // Underscores and asterisks would be emphasis in markdown.
        let out = MessageRenderer::render(&Message::assistant("SQL: SELECT a_b, c*d FROM t"));
        assert!(out.contains("SELECT a_b, c*d FROM t"));
    }

    #[test]
    fn narrative_user_prefix_is_stripped() {
        no_color();
        let out = MessageRenderer::render(&Message::user("USER: hi there"));
        assert!(out.starts_with("You\n"));
        assert!(out.contains("hi there"));
        assert!(!out.contains("USER:"));
    }

    #[test]
    fn system_welcome_scenario() {
        no_color();
        let out = MessageRenderer::render(&Message::system("Welcome"));
        assert!(out.starts_with("System\n"));
        assert!(out.contains("Welcome"));
    }
}
