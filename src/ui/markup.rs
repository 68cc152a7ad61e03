//! Converts bot replies into displayable segments.
//!
//! Replies from `/chat` carry a little HTML (`<a href>` links and `<br/>`). Nothing is
//! rendered as live markup: links and line breaks are recognised, every other tag is
//! dropped, and the remaining text is shown verbatim.

use std::sync::LazyLock;

use regex::Regex;

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(/?)([a-z][a-z0-9]*)([^>]*)>").expect("tag pattern is valid")
});

static HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\bhref\s*=\s*(?:'([^']*)'|"([^"]*)")"#).expect("href pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    LineBreak,
    Link { label: String, url: String },
}

struct OpenLink {
    url: String,
    label: String,
}

#[derive(Default)]
struct Builder {
    segments: Vec<Segment>,
    link: Option<OpenLink>,
}

impl Builder {
    fn text(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        let text = decode_entities(raw);
        if let Some(link) = self.link.as_mut() {
            link.label.push_str(&text);
        } else {
            self.push_text(text);
        }
    }

    /// Appends already-decoded text outside any link.
    fn push_text(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(Segment::Text(previous)) => previous.push_str(&text),
            _ => self.segments.push(Segment::Text(text)),
        }
    }

    fn line_break(&mut self) {
        if let Some(link) = self.link.as_mut() {
            link.label.push(' ');
        } else {
            self.segments.push(Segment::LineBreak);
        }
    }

    fn open_link(&mut self, attributes: &str) {
        self.close_link();
        let url = HREF
            .captures(attributes)
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| decode_entities(m.as_str().trim()))
            .unwrap_or_default();
        self.link = Some(OpenLink {
            url,
            label: String::new(),
        });
    }

    fn close_link(&mut self) {
        let Some(OpenLink { url, label }) = self.link.take() else {
            return;
        };
        let label = label.trim().to_string();
        if is_web_url(&url) {
            let label = if label.is_empty() { url.clone() } else { label };
            self.segments.push(Segment::Link { label, url });
        } else {
            self.push_text(label);
        }
    }

    fn finish(mut self) -> Vec<Segment> {
        self.close_link();
        self.segments
    }
}

/// Splits `input` into text, line breaks and http(s) links.
pub fn parse(input: &str) -> Vec<Segment> {
    let mut builder = Builder::default();
    let mut cursor = 0;

    for caps in TAG.captures_iter(input) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        builder.text(&input[cursor..whole.start()]);
        cursor = whole.end();

        let closing = !caps[1].is_empty();
        let name = caps[2].to_ascii_lowercase();
        let attributes = caps.get(3).map_or("", |m| m.as_str());

        match (name.as_str(), closing) {
            ("br", _) => builder.line_break(),
            ("a", false) => builder.open_link(attributes),
            ("a", true) => builder.close_link(),
            _ => {}
        }
    }
    builder.text(&input[cursor..]);

    builder.finish()
}

fn is_web_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("https://") || lower.starts_with("http://")
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
