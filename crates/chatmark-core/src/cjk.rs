//! CJK ideograph runs.
//!
//! Han characters often need a dedicated font, so runs of them are marked
//! with their own class. Only the unified ideograph blocks count: kana,
//! hangul and CJK punctuation are left alone.

use std::borrow::Cow;

use crate::text_nodes::{TextRewrite, rewrite_text_nodes};

/// Returns true for CJK Unified Ideographs, Extension A, and Compatibility Ideographs.
pub fn is_cjk_ideograph(ch: char) -> bool {
    matches!(
        ch as u32,
        0x4E00..=0x9FFF | 0x3400..=0x4DBF | 0xF900..=0xFAFF
    )
}

/// A maximal run of characters sharing one classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharRun<'a> {
    pub text: &'a str,
    pub cjk: bool,
}

/// Splits `text` into alternating CJK and non-CJK runs.
///
/// Every character lands in exactly one run and adjacent runs always
/// differ in class.
pub fn cjk_runs(text: &str) -> Vec<CharRun<'_>> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;

    for (index, ch) in text.char_indices() {
        let cjk = is_cjk_ideograph(ch);
        match current {
            Some(class) if class == cjk => {}
            Some(class) => {
                runs.push(CharRun {
                    text: &text[start..index],
                    cjk: class,
                });
                start = index;
                current = Some(cjk);
            }
            None => current = Some(cjk),
        }
    }

    if let Some(class) = current {
        runs.push(CharRun {
            text: &text[start..],
            cjk: class,
        });
    }
    runs
}

/// Wraps CJK runs found in the text nodes of an HTML fragment.
///
/// Tags, comments and raw-text elements such as `<style>` are left alone.
/// Text inside `<rt>` (ruby glosses) and inside spans already carrying
/// `class` is skipped, so applying this twice yields the same result as
/// applying it once.
pub fn wrap_cjk_html<'a>(html: &'a str, class: &str) -> Cow<'a, str> {
    rewrite_text_nodes(
        html,
        &TextRewrite {
            cjk_class: Some(class),
            encode_delimiters: false,
        },
    )
}
