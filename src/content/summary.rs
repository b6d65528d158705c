//! Plain-text statistics derived from a markdown body

use pulldown_cmark::{Event, Options, Parser, TagEnd};
use serde::Serialize;

/// Reading speed used for [`Summary::reading_time`]
pub const WORDS_PER_MINUTE: usize = 200;

const MORE_MARKERS: &[&str] = &["<!--more-->", "<!-- more -->"];

/// Word count, reading time and excerpt of a body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub word_count: usize,
    /// Minutes, rounded up
    pub reading_time: usize,
    /// Plain-text excerpt
    pub excerpt: String,
    /// Excerpt came from a `<!--more-->` marker
    pub manual_excerpt: bool,
}

impl Summary {
    pub fn of(markdown: &str) -> Self {
        let blocks = text_blocks(markdown);
        let word_count: usize = blocks
            .iter()
            .map(|b| b.text.split_whitespace().count())
            .sum();

        let reading_time = if word_count == 0 {
            0
        } else {
            word_count.div_ceil(WORDS_PER_MINUTE)
        };

        let (excerpt, manual_excerpt) = match split_more(markdown) {
            Some(lead) => {
                let text = text_blocks(lead)
                    .into_iter()
                    .map(|b| b.text)
                    .collect::<Vec<_>>()
                    .join(" ");
                (text, true)
            }
            None => {
                let first = blocks
                    .into_iter()
                    .find(|b| b.paragraph)
                    .map(|b| b.text)
                    .unwrap_or_default();
                (first, false)
            }
        };

        Self {
            word_count,
            reading_time,
            excerpt,
            manual_excerpt,
        }
    }
}

/// Text before the first more-marker, if any
fn split_more(markdown: &str) -> Option<&str> {
    MORE_MARKERS
        .iter()
        .filter_map(|marker| markdown.find(marker))
        .min()
        .map(|pos| &markdown[..pos])
}

struct TextBlock {
    text: String,
    paragraph: bool,
}

fn text_blocks(markdown: &str) -> Vec<TextBlock> {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let mut blocks = Vec::new();
    let mut buf = String::new();

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Text(text) | Event::Code(text) => buf.push_str(&text),
            Event::SoftBreak | Event::HardBreak => buf.push(' '),
            Event::End(end) => {
                let paragraph = match end {
                    TagEnd::Paragraph => true,
                    TagEnd::Heading(_)
                    | TagEnd::Item
                    | TagEnd::CodeBlock
                    | TagEnd::TableCell => false,
                    _ => continue,
                };
                push_block(&mut blocks, &mut buf, paragraph);
            }
            _ => {}
        }
    }
    push_block(&mut blocks, &mut buf, false);

    blocks
}

fn push_block(blocks: &mut Vec<TextBlock>, buf: &mut String, paragraph: bool) {
    let text = buf.trim();
    if !text.is_empty() {
        blocks.push(TextBlock {
            text: text.to_string(),
            paragraph,
        });
    }
    buf.clear();
}
