//! Markdown-to-ANSI rendering for narrative turns.
//!
//! Walks the pulldown-cmark event stream and emits terminal text styled
//! with `colored`: bold cyan headings, yellow inline code, dimmed and
//! indented fenced blocks, bulleted and numbered lists. Narrative
//! content is trusted; nothing is sanitized here.

use colored::Colorize;
use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

const CODE_INDENT: &str = "    ";

/// Render markdown to ANSI-styled terminal text.
pub fn render_markdown(text: &str) -> String {
    let mut out = String::new();
    let mut code_buffer: Option<String> = None;
    // One entry per open list: None = bulleted, Some(n) = next number.
    let mut lists: Vec<Option<u64>> = Vec::new();
    let mut strong = 0u32;
    let mut emphasis = 0u32;
    let mut heading = 0u32;
    let mut link_url: Option<String> = None;

    for event in Parser::new(text) {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                ensure_blank_line(&mut out);
                heading += 1;
            }
            Event::End(TagEnd::Heading(_)) => {
                heading = heading.saturating_sub(1);
                out.push_str("\n\n");
            }
            Event::Start(Tag::Paragraph) => {}
            Event::End(TagEnd::Paragraph) => out.push_str("\n\n"),
            Event::Start(Tag::CodeBlock(kind)) => {
                ensure_blank_line(&mut out);
                if let CodeBlockKind::Fenced(lang) = &kind
                    && !lang.is_empty()
                {
                    out.push_str(&format!("{}\n", lang.dimmed().italic()));
                }
                code_buffer = Some(String::new());
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(code) = code_buffer.take() {
                    for line in code.lines() {
                        out.push_str(CODE_INDENT);
                        out.push_str(&line.dimmed().to_string());
                        out.push('\n');
                    }
                    out.push('\n');
                }
            }
            Event::Start(Tag::List(start)) => lists.push(start),
            Event::End(TagEnd::List(_)) => {
                lists.pop();
                if lists.is_empty() {
                    out.push('\n');
                }
            }
            Event::Start(Tag::Item) => {
                let depth = lists.len().saturating_sub(1);
                out.push_str(&"  ".repeat(depth));
                match lists.last_mut() {
                    Some(Some(n)) => {
                        out.push_str(&format!("{}. ", n));
                        *n += 1;
                    }
                    _ => out.push_str("• "),
                }
            }
            Event::End(TagEnd::Item) => {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            Event::Start(Tag::Strong) => strong += 1,
            Event::End(TagEnd::Strong) => strong = strong.saturating_sub(1),
            Event::Start(Tag::Emphasis) => emphasis += 1,
            Event::End(TagEnd::Emphasis) => emphasis = emphasis.saturating_sub(1),
            Event::Start(Tag::Link { dest_url, .. }) => {
                link_url = Some(dest_url.to_string());
            }
            Event::End(TagEnd::Link) => {
                if let Some(url) = link_url.take() {
                    out.push_str(&format!(" ({})", url).dimmed().to_string());
                }
            }
            Event::Text(t) => {
                if let Some(code) = code_buffer.as_mut() {
                    code.push_str(&t);
                } else {
                    out.push_str(&style_inline(&t, heading > 0, strong > 0, emphasis > 0));
                }
            }
            Event::Code(code) => out.push_str(&code.yellow().to_string()),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::Rule => {
                ensure_blank_line(&mut out);
                out.push_str(&"─".repeat(40).dimmed().to_string());
                out.push_str("\n\n");
            }
            _ => {}
        }
    }

    let trimmed = out.trim_end();
    format!("{}\n", trimmed)
}

fn style_inline(text: &str, heading: bool, strong: bool, emphasis: bool) -> String {
    if heading {
        return text.cyan().bold().to_string();
    }
    match (strong, emphasis) {
        (true, _) => text.bold().to_string(),
        (false, true) => text.italic().to_string(),
        (false, false) => text.to_string(),
    }
}

fn ensure_blank_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with("\n\n") {
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push('\n');
    }
}
