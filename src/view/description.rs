//! Turn a trail description (Markdown, possibly with inline HTML) into
//! plain terminal lines.
//!
//! Uses pulldown-cmark for the Markdown structure.  HTML passes through
//! pulldown-cmark untouched, so tags are stripped here: `<br>` starts a new
//! line, block-level tags start a new paragraph, everything else is dropped.
//! Named and numeric entities are decoded with `html_escape`.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

pub fn description_lines(source: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for event in Parser::new_ext(source, Options::empty()) {
        match event {
            Event::Text(text) | Event::Code(text) => current.push_str(&text),
            Event::Html(html) | Event::InlineHtml(html) => {
                push_html(&html, &mut current, &mut lines);
            }
            Event::SoftBreak => current.push(' '),
            Event::HardBreak => flush(&mut current, &mut lines),
            Event::Start(Tag::Item) => current.push_str("• "),
            Event::End(TagEnd::Item) => flush(&mut current, &mut lines),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::HtmlBlock) => {
                paragraph_break(&mut current, &mut lines);
            }
            _ => {}
        }
    }

    flush(&mut current, &mut lines);
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

fn flush(current: &mut String, lines: &mut Vec<String>) {
    let line = current.split_whitespace().collect::<Vec<_>>().join(" ");
    if !line.is_empty() {
        lines.push(line);
    }
    current.clear();
}

fn paragraph_break(current: &mut String, lines: &mut Vec<String>) {
    flush(current, lines);
    if lines.last().is_some_and(|l| !l.is_empty()) {
        lines.push(String::new());
    }
}

fn push_html(html: &str, current: &mut String, lines: &mut Vec<String>) {
    let mut text = String::new();
    let mut chars = html.chars();

    while let Some(c) = chars.next() {
        if c != '<' {
            text.push(if c == '\n' { ' ' } else { c });
            continue;
        }

        let tag: String = chars.by_ref().take_while(|&c| c != '>').collect();
        let name = tag
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();

        match name.as_str() {
            "br" => {
                current.push_str(&html_escape::decode_html_entities(&text));
                text.clear();
                flush(current, lines);
            }
            "p" | "div" | "ul" | "ol" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                current.push_str(&html_escape::decode_html_entities(&text));
                text.clear();
                paragraph_break(current, lines);
            }
            "li" if !tag.starts_with('/') => {
                current.push_str(&html_escape::decode_html_entities(&text));
                text.clear();
                flush(current, lines);
                current.push_str("• ");
            }
            _ => {}
        }
    }

    current.push_str(&html_escape::decode_html_entities(&text));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_paragraphs() {
        let lines = description_lines("First paragraph\nwraps here.\n\nSecond one.");
        assert_eq!(lines, vec!["First paragraph wraps here.", "", "Second one."]);
    }

    #[test]
    fn test_html_paragraphs_and_breaks() {
        let lines = description_lines("<p>Start at the lake.<br>Climb to the ridge.</p><p>Return &amp; rest.</p>");
        assert_eq!(
            lines,
            vec!["Start at the lake.", "Climb to the ridge.", "", "Return & rest."]
        );
    }

    #[test]
    fn test_named_and_numeric_entities_decode() {
        let lines = description_lines("<p>Caf&eacute; at the col &#8211; 2&nbsp;km</p>");
        assert_eq!(lines, vec!["Café at the col – 2 km"]);
    }

    #[test]
    fn test_entities_in_markdown_text_decode() {
        let lines = description_lines("Refuge du Col &#8211; open June&ndash;Sept");
        assert_eq!(lines, vec!["Refuge du Col – open June–Sept"]);
    }

    #[test]
    fn test_inline_markup_is_dropped() {
        let lines = description_lines("A <b>steep</b> climb with *great* views.");
        assert_eq!(lines, vec!["A steep climb with great views."]);
    }

    #[test]
    fn test_list_items() {
        let lines = description_lines("- water\n- map");
        assert_eq!(lines, vec!["• water", "• map"]);
    }

    #[test]
    fn test_empty_description() {
        assert!(description_lines("").is_empty());
    }
}
