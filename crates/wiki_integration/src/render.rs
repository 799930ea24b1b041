//! Terminal rendering of parsed article HTML.
//!
//! The output is an isolated, navigation-free view: outbound links collapse to
//! their text and only same-page anchors survive, as `text[#target]`.

use scraper::{ElementRef, Html, Node};

pub const SITE_SUBTITLE: &str = "From Wikipedia, the free encyclopedia";

const SKIPPED_TAGS: &[&str] = &["style", "script", "noscript", "link", "meta", "img"];
const SKIPPED_CLASSES: &[&str] = &["mw-editsection", "noprint", "navbox", "mw-empty-elt"];
const BLOCK_TAGS: &[&str] = &[
    "p",
    "div",
    "section",
    "ul",
    "ol",
    "li",
    "dl",
    "dt",
    "dd",
    "table",
    "tr",
    "blockquote",
    "figure",
    "figcaption",
    "pre",
];
const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub title: String,
    pub subtitle: String,
    pub base_url: String,
    pub body: String,
    /// Same-page anchor targets kept in `body`.
    pub anchors: Vec<String>,
}

pub fn render_html(title: &str, language: &str, html: &str) -> RenderedDocument {
    let fragment = Html::parse_fragment(html);
    let mut writer = TextWriter::default();
    walk(fragment.root_element(), &mut writer);

    RenderedDocument {
        title: title.to_string(),
        subtitle: SITE_SUBTITLE.to_string(),
        base_url: format!("https://{language}.wikipedia.org"),
        body: writer.body.trim().to_string(),
        anchors: writer.anchors,
    }
}

fn walk(element: ElementRef<'_>, writer: &mut TextWriter) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            write_element(child_element, writer);
        } else if let Node::Text(text) = child.value() {
            writer.push_text(text);
        }
    }
}

fn write_element(element: ElementRef<'_>, writer: &mut TextWriter) {
    let value = element.value();
    let name = value.name();
    if SKIPPED_TAGS.contains(&name) || value.classes().any(|c| SKIPPED_CLASSES.contains(&c)) {
        return;
    }
    // Citation markers only; other superscripts carry content.
    if name == "sup" && value.classes().any(|c| c == "reference") {
        return;
    }
    if name == "br" {
        writer.newline();
        return;
    }

    let heading = HEADING_TAGS.contains(&name);
    let block = BLOCK_TAGS.contains(&name);
    if heading {
        writer.blank_line();
    } else if block {
        writer.newline();
    }
    if name == "li" {
        writer.push_raw("- ");
    }

    let anchor = if name == "a" {
        value
            .attr("href")
            .and_then(|href| href.strip_prefix('#'))
            .filter(|target| !target.is_empty())
    } else {
        None
    };

    walk(element, writer);

    if let Some(target) = anchor {
        writer.push_raw(&format!("[#{target}]"));
        writer.anchors.push(target.to_string());
    }
    if heading {
        writer.blank_line();
    } else if block {
        writer.newline();
    }
}

#[derive(Default)]
struct TextWriter {
    body: String,
    anchors: Vec<String>,
    pending_space: bool,
}

impl TextWriter {
    fn push_text(&mut self, text: &str) {
        if text.starts_with(char::is_whitespace) {
            self.pending_space = true;
        }
        for (i, word) in text.split_whitespace().enumerate() {
            if i > 0 {
                self.pending_space = true;
            }
            self.push_word(word);
        }
        if text.ends_with(char::is_whitespace) {
            self.pending_space = true;
        }
    }

    fn push_word(&mut self, word: &str) {
        if self.pending_space && !self.at_line_start() && !self.body.ends_with(' ') {
            self.body.push(' ');
        }
        self.pending_space = false;
        self.body.push_str(word);
    }

    fn push_raw(&mut self, raw: &str) {
        self.pending_space = false;
        self.body.push_str(raw);
    }

    fn at_line_start(&self) -> bool {
        self.body.is_empty() || self.body.ends_with('\n')
    }

    fn newline(&mut self) {
        self.pending_space = false;
        if !self.at_line_start() {
            self.body.push('\n');
        }
    }

    fn blank_line(&mut self) {
        self.newline();
        if !self.body.is_empty() && !self.body.ends_with("\n\n") {
            self.body.push('\n');
        }
    }
}
