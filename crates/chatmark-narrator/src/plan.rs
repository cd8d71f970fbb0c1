use chatmark_core::markup::Markup;
use chatmark_core::render::{Reveal, UnitRenderer};

/// One character becoming visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealStep {
    /// Zero-based display index of the revealed character.
    pub index: usize,
    pub ch: char,
    /// Non-whitespace steps are the ones that get a typing sound.
    pub audible: bool,
}

/// A narrator line prepared for a typewriter reveal.
///
/// Frames are rendered on demand from the parsed markup, so frame `n` is
/// always the `n`-character prefix of the full render.
#[derive(Debug, Clone)]
pub struct RevealPlan<R> {
    markup: Markup,
    chars: Vec<char>,
    renderer: R,
}

impl<R: UnitRenderer> RevealPlan<R> {
    pub fn new(markup: Markup, renderer: R) -> Self {
        let chars = markup.display_chars().collect();
        Self {
            markup,
            chars,
            renderer,
        }
    }

    pub fn markup(&self) -> &Markup {
        &self.markup
    }

    /// Number of reveal steps.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Output with the first `revealed` display characters visible.
    pub fn frame(&self, revealed: usize) -> String {
        self.renderer.render(&self.markup, Reveal::Prefix(revealed))
    }

    pub fn full(&self) -> String {
        self.renderer.render(&self.markup, Reveal::Full)
    }

    pub fn step(&self, index: usize) -> Option<RevealStep> {
        self.chars.get(index).map(|&ch| RevealStep {
            index,
            ch,
            audible: !ch.is_whitespace(),
        })
    }

    pub fn steps(&self) -> impl Iterator<Item = RevealStep> + '_ {
        (0..self.chars.len()).filter_map(|index| self.step(index))
    }
}
