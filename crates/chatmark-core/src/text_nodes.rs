//! Rewriting the character data of an HTML fragment.
//!
//! Chat content is already HTML, so wrapping CJK runs or guarding markup
//! delimiters may only touch text nodes. html5ever's tokenizer separates
//! those from tags, comments and raw-text elements (`style`, `script`,
//! `textarea`, ...), which are passed through.
//!
//! Fragments that need no change are returned as-is. Rewritten fragments
//! are re-serialized from tokens, so they are equivalent to the input
//! rather than byte-identical (attribute quoting, character references).

use std::borrow::Cow;
use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::TokenizerResult;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

use crate::cjk::{cjk_runs, is_cjk_ideograph};
use crate::markup::is_delimiter;

/// What to change in text nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRewrite<'a> {
    /// Wrap CJK ideograph runs in `<span class="...">`.
    pub cjk_class: Option<&'a str>,
    /// Replace markup delimiters with numeric character references.
    pub encode_delimiters: bool,
}

/// Applies `rewrite` to the text nodes of `html`.
///
/// Text inside `<rt>` and inside spans already carrying the CJK class is
/// never wrapped again, so wrapping is idempotent.
pub fn rewrite_text_nodes<'a>(html: &'a str, rewrite: &TextRewrite<'_>) -> Cow<'a, str> {
    let wraps = rewrite.cjk_class.is_some() && html.chars().any(is_cjk_ideograph);
    let encodes = rewrite.encode_delimiters && html.chars().any(is_delimiter);
    if !wraps && !encodes {
        return Cow::Borrowed(html);
    }

    let sink = TextNodeSink {
        rewrite,
        state: RefCell::default(),
    };
    let tokenizer = Tokenizer::new(
        sink,
        TokenizerOpts {
            discard_bom: false,
            ..TokenizerOpts::default()
        },
    );
    let input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(html));
    match tokenizer.feed(&input) {
        TokenizerResult::Done | TokenizerResult::Script(()) => {}
    }
    tokenizer.end();

    let mut state = tokenizer.sink.state.take();
    state.flush(rewrite);
    Cow::Owned(state.out)
}

/// Replaces markup delimiters in already escaped text with numeric references.
pub(crate) fn encode_delimiters(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_delimiter) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match delimiter_reference(ch) {
            Some(reference) => out.push_str(reference),
            None => out.push(ch),
        }
    }
    Cow::Owned(out)
}

fn delimiter_reference(ch: char) -> Option<&'static str> {
    match ch {
        '*' => Some("&#42;"),
        '~' => Some("&#126;"),
        '[' => Some("&#91;"),
        ']' => Some("&#93;"),
        '|' => Some("&#124;"),
        _ => None,
    }
}

/// Serializes decoded character data.
fn push_character_data(out: &mut String, text: &str, encode_delimiters: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => match delimiter_reference(ch).filter(|_| encode_delimiters) {
                Some(reference) => out.push_str(reference),
                None => out.push(ch),
            },
        }
    }
}

fn push_attribute_value(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

/// Tokenizer state each raw-text element switches to, and whether its
/// text arrives with character references decoded.
fn raw_text_kind(name: &str) -> Option<(RawKind, bool)> {
    match name {
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => Some((RawKind::Rawtext, false)),
        "script" => Some((RawKind::ScriptData, false)),
        "textarea" | "title" => Some((RawKind::Rcdata, true)),
        _ => None,
    }
}

struct TextNodeSink<'r, 'c> {
    rewrite: &'r TextRewrite<'c>,
    state: RefCell<SinkState>,
}

#[derive(Default)]
struct SinkState {
    out: String,
    /// Character data not yet written; tokens may split one text node.
    pending: String,
    raw: Option<RawElement>,
    skip: Option<SkipScope>,
}

struct RawElement {
    name: String,
    decoded: bool,
}

/// Element whose text must not be wrapped, with its nesting depth.
struct SkipScope {
    name: String,
    depth: usize,
}

impl TokenSink for TextNodeSink<'_, '_> {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        let mut state = self.state.borrow_mut();
        match token {
            Token::CharacterTokens(text) => state.pending.push_str(&text),
            Token::TagToken(tag) => {
                state.flush(self.rewrite);
                return state.push_tag(&tag, self.rewrite.cjk_class);
            }
            Token::CommentToken(text) => {
                state.flush(self.rewrite);
                state.out.push_str("<!--");
                state.out.push_str(&text);
                state.out.push_str("-->");
            }
            Token::DoctypeToken(doctype) => {
                state.flush(self.rewrite);
                state.out.push_str("<!DOCTYPE");
                if let Some(name) = &doctype.name {
                    state.out.push(' ');
                    state.out.push_str(name);
                }
                state.out.push('>');
            }
            Token::EOFToken => state.flush(self.rewrite),
            // Dropped from text nodes, as an HTML parser does.
            Token::NullCharacterToken | Token::ParseError(_) => {}
        }
        TokenSinkResult::Continue
    }
}

impl SinkState {
    fn flush(&mut self, rewrite: &TextRewrite<'_>) {
        if self.pending.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending);

        match &self.raw {
            Some(raw) if raw.decoded => push_character_data(&mut self.out, &text, false),
            Some(_) => self.out.push_str(&text),
            None => {
                let class = rewrite.cjk_class.filter(|_| self.skip.is_none());
                let Some(class) = class else {
                    push_character_data(&mut self.out, &text, rewrite.encode_delimiters);
                    return;
                };
                for run in cjk_runs(&text) {
                    if run.cjk {
                        self.out.push_str("<span class=\"");
                        self.out.push_str(class);
                        self.out.push_str("\">");
                    }
                    push_character_data(&mut self.out, run.text, rewrite.encode_delimiters);
                    if run.cjk {
                        self.out.push_str("</span>");
                    }
                }
            }
        }
    }

    fn push_tag(&mut self, tag: &Tag, class: Option<&str>) -> TokenSinkResult<()> {
        let name: &str = &tag.name;
        match tag.kind {
            TagKind::StartTag => {
                self.out.push('<');
                self.out.push_str(name);
                for attr in &tag.attrs {
                    self.out.push(' ');
                    self.out.push_str(&attr.name.local);
                    self.out.push_str("=\"");
                    push_attribute_value(&mut self.out, &attr.value);
                    self.out.push('"');
                }
                if tag.self_closing {
                    self.out.push_str(" />");
                    return TokenSinkResult::Continue;
                }
                self.out.push('>');

                if let Some((kind, decoded)) = raw_text_kind(name) {
                    self.raw = Some(RawElement {
                        name: name.to_string(),
                        decoded,
                    });
                    return TokenSinkResult::RawData(kind);
                }
                self.enter(name, tag, class);
            }
            TagKind::EndTag => {
                self.out.push_str("</");
                self.out.push_str(name);
                self.out.push('>');
                if self.raw.as_ref().is_some_and(|raw| raw.name == name) {
                    self.raw = None;
                }
                self.leave(name);
            }
        }
        TokenSinkResult::Continue
    }

    fn enter(&mut self, name: &str, tag: &Tag, class: Option<&str>) {
        if let Some(scope) = &mut self.skip {
            if scope.name == name {
                scope.depth += 1;
            }
            return;
        }
        let skips = name == "rt"
            || (name == "span" && class.is_some_and(|class| has_class(tag, class)));
        if skips {
            self.skip = Some(SkipScope {
                name: name.to_string(),
                depth: 1,
            });
        }
    }

    fn leave(&mut self, name: &str) {
        if let Some(scope) = &mut self.skip
            && scope.name == name
        {
            scope.depth -= 1;
            if scope.depth == 0 {
                self.skip = None;
            }
        }
    }
}

fn has_class(tag: &Tag, class: &str) -> bool {
    tag.attrs.iter().any(|attr| {
        &*attr.name.local == "class" && attr.value.split_whitespace().any(|name| name == class)
    })
}
