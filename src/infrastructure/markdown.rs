use comrak::{markdown_to_html, Options};

// Tags whose boundaries separate lines of readable text
const BLOCK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul", "ol", "blockquote", "pre", "table",
    "thead", "tbody", "tr", "br", "hr", "div", "dl", "dt", "dd",
];

// Cells sit on the same line but must not run together
const SPACED_TAGS: &[&str] = &["td", "th"];

/// Parses a Markdown string and returns its plain text representation.
///
/// The Markdown is rendered to HTML with comrak (tables, strikethrough, task
/// lists and autolinks enabled; raw HTML omitted), then every tag is removed
/// and the entities comrak escapes are decoded. Block-level tags become line
/// breaks, whitespace inside a line is collapsed and blank lines are dropped.
///
/// The output is a pure function of the input.
pub fn parse_markdown_to_text(markdown: &str) -> String {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options.extension.autolink = true;

    let html = markdown_to_html(markdown, &options);
    html_to_text(&html)
}

fn html_to_text(html: &str) -> String {
    let mut raw = String::with_capacity(html.len());
    let mut tag = String::new();
    let mut in_tag = false;
    let mut in_pre = false;

    for c in html.chars() {
        match c {
            '<' if !in_tag => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                let name = tag_name(&tag);
                if name == "pre" {
                    in_pre = !tag.starts_with('/');
                }
                if BLOCK_TAGS.contains(&name) {
                    raw.push('\n');
                } else if SPACED_TAGS.contains(&name) {
                    raw.push(' ');
                }
            }
            _ if in_tag => tag.push(c),
            // comrak separates elements with newlines; only <pre> content keeps them
            '\n' if !in_pre => raw.push(' '),
            _ => raw.push(c),
        }
    }

    decode_entities(&raw)
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

// "/p" -> "p", "br /" -> "br", "a href=..." -> "a"
fn tag_name(tag: &str) -> &str {
    tag.trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("")
}

fn decode_entities(text: &str) -> String {
    const ENTITIES: &[(&str, char)] = &[
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&#39;", '\''),
        ("&#x27;", '\''),
    ];

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, decoded)) => {
                out.push(*decoded);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_markdown() {
        let markdown = "# Header\n\nThis is **bold** text.";
        assert_eq!(parse_markdown_to_text(markdown), "Header\nThis is bold text.");
    }

    #[test]
    fn test_parse_markdown_with_link() {
        let markdown = "Visit [Google](https://google.com)!";
        assert_eq!(parse_markdown_to_text(markdown), "Visit Google!");
    }

    #[test]
    fn test_parse_markdown_with_list() {
        let markdown = "* Item 1\n* Item 2";
        assert_eq!(parse_markdown_to_text(markdown), "Item 1\nItem 2");
    }

    #[test]
    fn test_entities_are_decoded() {
        let markdown = "Fish & Chips <3 \"quoted\"";
        assert_eq!(parse_markdown_to_text(markdown), "Fish & Chips <3 \"quoted\"");
    }

    #[test]
    fn test_no_tags_survive() {
        let markdown = "| a | b |\n|---|---|\n| 1 | 2 |\n\n- [x] done\n\n~~gone~~ `code`";
        let text = parse_markdown_to_text(markdown);
        assert!(!text.contains('<'), "tags leaked into {:?}", text);
        assert!(text.contains("a b"));
        assert!(text.contains("1 2"));
        assert!(text.contains("done"));
        assert!(text.contains("gone code"));
    }

    #[test]
    fn test_code_block_keeps_lines() {
        let markdown = "```\nlet a = 1;\nlet b = 2;\n```";
        assert_eq!(parse_markdown_to_text(markdown), "let a = 1;\nlet b = 2;");
    }

    #[test]
    fn test_soft_breaks_join_into_one_line() {
        assert_eq!(parse_markdown_to_text("first line\nsecond line"), "first line second line");
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let markdown = "## Plans\n\nSome *notes* with [[wiki links]] and a list:\n\n1. one\n2. two\n";
        assert_eq!(parse_markdown_to_text(markdown), parse_markdown_to_text(markdown));
    }

    #[test]
    fn test_plain_sentence_passes_through() {
        assert_eq!(
            parse_markdown_to_text("Paris is the capital of France."),
            "Paris is the capital of France."
        );
    }

    #[test]
    fn test_tag_name() {
        assert_eq!(tag_name("/p"), "p");
        assert_eq!(tag_name("br /"), "br");
        assert_eq!(tag_name("a href=\"x\""), "a");
        assert_eq!(tag_name("!-- raw HTML omitted --"), "!--");
    }
}
