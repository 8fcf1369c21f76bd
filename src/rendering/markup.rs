use std::collections::HashSet;

/// Sanitize post markup produced by the rich-text editor before handing it
/// to a client for rendering.
///
/// Keeps ammonia's default allow-list (formatting, lists, links, images) and
/// strips scripts, event handlers and unknown tags.
pub fn sanitize_html(raw: &str) -> String {
    ammonia::clean(raw)
}

/// Elements whose boundaries separate words. Inline formatting such as
/// `<b>` or `<em>` does not.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre",
    "table", "tr", "td", "th", "hr", "figure", "figcaption",
];

/// Put a space after every opening or closing block-level tag.
fn space_block_boundaries(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find('<') {
        let Some(len) = rest[start..].find('>') else {
            break;
        };
        let tag = &rest[start..=start + len];
        out.push_str(&rest[..=start + len]);

        let name: String = tag[1..]
            .trim_start_matches('/')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        if BLOCK_TAGS.contains(&name.as_str()) {
            out.push(' ');
        }

        rest = &rest[start + len + 1..];
    }

    out.push_str(rest);
    out
}

/// Reduce markup to the text a reader would see, with whitespace collapsed.
/// Used for narration.
pub fn plain_text(raw: &str) -> String {
    let spaced = space_block_boundaries(raw);

    let cleaned = ammonia::Builder::empty()
        .clean_content_tags(HashSet::from(["script", "style"]))
        .clean(&spaced)
        .to_string();

    unescape_entities(&cleaned)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn unescape_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
