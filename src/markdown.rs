//! Release-notes converter.
//!
//! Covers the markdown that shows up in release notes: headers, emphasis,
//! links, code and flat lists. Every construct is a whole-text substitution
//! applied in a fixed order, followed by a single line scan for lists and
//! paragraphs. It is not a CommonMark parser: nothing nests, nothing is
//! escaped, and earlier passes are free to rewrite text a later pass would
//! have matched (emphasis markers inside code spans are converted, for one).

use std::sync::LazyLock;

use regex::Regex;

/// Ordered substitutions run before the line scan.
static PASSES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?m)^### (.*?)$", "<h3>${1}</h3>"),
        (r"(?m)^## (.*?)$", "<h2>${1}</h2>"),
        (r"(?m)^# (.*?)$", "<h1>${1}</h1>"),
        (r"\*\*\*(.+?)\*\*\*", "<strong><em>${1}</em></strong>"),
        (r"\*\*(.+?)\*\*", "<strong>${1}</strong>"),
        (r"\*(.+?)\*", "<em>${1}</em>"),
        (r"__(.+?)__", "<strong>${1}</strong>"),
        (r"_(.+?)_", "<em>${1}</em>"),
        (r"\[(.+?)\]\((.+?)\)", r#"<a href="${2}">${1}</a>"#),
        (r"(?s)```\w*\n(.*?)\n```", "<pre><code>${1}</code></pre>"),
        (r"`(.+?)`", "<code>${1}</code>"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

/// Matches the marker of an ordered list item (`1. `).
static ORDERED_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\. ").unwrap());

const UNORDERED_MARKERS: [&str; 3] = ["* ", "- ", "+ "];

/// Converts release notes to an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> String {
    let html = PASSES
        .iter()
        .fold(markdown.to_string(), |text, (regex, replacement)| {
            regex.replace_all(&text, *replacement).into_owned()
        });

    wrap_blocks(&html)
}

/// Groups list lines into `<ul>`/`<ol>` and wraps other non-blank lines in `<p>`.
fn wrap_blocks(text: &str) -> String {
    let mut in_ul = false;
    let mut in_ol = false;
    let mut out: Vec<String> = Vec::new();

    for line in text.split('\n') {
        if UNORDERED_MARKERS.iter().any(|marker| line.starts_with(marker)) {
            if !in_ul {
                out.push("<ul>".to_string());
                in_ul = true;
            }
            out.push(format!("<li>{}</li>", line[2..].trim()));
        } else if let Some(marker) = ORDERED_ITEM.find(line) {
            if !in_ol {
                out.push("<ol>".to_string());
                in_ol = true;
            }
            out.push(format!("<li>{}</li>", line[marker.end()..].trim()));
        } else {
            close_lists(&mut out, &mut in_ul, &mut in_ol);
            if !line.trim().is_empty() {
                out.push(format!("<p>{}</p>", line));
            }
        }
    }
    close_lists(&mut out, &mut in_ul, &mut in_ol);

    out.join("\n")
}

fn close_lists(out: &mut Vec<String>, in_ul: &mut bool, in_ol: &mut bool) {
    if *in_ul {
        out.push("</ul>".to_string());
        *in_ul = false;
    }
    if *in_ol {
        out.push("</ol>".to_string());
        *in_ol = false;
    }
}
