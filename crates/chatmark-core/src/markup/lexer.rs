use tracing::trace;

use super::rules::{RULES, Rule};
use super::token::{MarkupToken, Span};

/// Stands in for a claimed token in the text a later rule scans.
///
/// Not a delimiter, so a rule body may run across it. A single char, so a
/// match boundary never falls inside it.
const OPAQUE: char = '\u{FFFC}';

/// Either a source range still open to later rules or a claimed token.
enum Segment {
    Open(Span),
    Claimed(MarkupToken),
}

impl Segment {
    fn span(&self) -> Span {
        match self {
            Segment::Open(span) => *span,
            Segment::Claimed(token) => token.span,
        }
    }

    fn into_token(self, source: &str) -> MarkupToken {
        match self {
            Segment::Open(span) => MarkupToken::plain(&source[span.start..span.end], span),
            Segment::Claimed(token) => token,
        }
    }
}

/// What a rule pass scans: open ranges verbatim, claimed tokens as [`OPAQUE`].
struct View {
    text: String,
    /// Offset in `text` at which each segment starts.
    starts: Vec<usize>,
}

impl View {
    fn new(source: &str, segments: &[Segment]) -> Self {
        let mut text = String::with_capacity(source.len());
        let mut starts = Vec::with_capacity(segments.len());
        for segment in segments {
            starts.push(text.len());
            match segment {
                Segment::Open(span) => text.push_str(&source[span.start..span.end]),
                Segment::Claimed(_) => text.push(OPAQUE),
            }
        }
        Self { text, starts }
    }

    /// Segments covering `start..end` of the view, with open ranges cut to fit.
    fn slice(&self, segments: &[Segment], start: usize, end: usize) -> Vec<Segment> {
        let mut out = Vec::new();
        if start >= end {
            return out;
        }

        let first = self
            .starts
            .partition_point(|&offset| offset <= start)
            .saturating_sub(1);
        for (index, segment) in segments.iter().enumerate().skip(first) {
            let seg_start = self.starts[index];
            if seg_start >= end {
                break;
            }
            let seg_end = self
                .starts
                .get(index + 1)
                .copied()
                .unwrap_or(self.text.len());
            let from = start.max(seg_start);
            let to = end.min(seg_end);
            if from >= to {
                continue;
            }
            out.push(match segment {
                Segment::Open(span) => Segment::Open(Span::new(
                    span.start + (from - seg_start),
                    span.start + (to - seg_start),
                )),
                Segment::Claimed(token) => Segment::Claimed(token.clone()),
            });
        }
        out
    }
}

/// Splits `source` into tokens that exactly tile it.
///
/// Rules are applied one pass at a time, each over the result of the
/// previous pass. Tokens claimed earlier are opaque body text to later
/// rules: a later match may wrap them whole (they become its children)
/// but never matches inside them, so a ruby gloss is never rescanned.
pub(crate) fn tokenize(source: &str) -> Vec<MarkupToken> {
    if source.is_empty() {
        return Vec::new();
    }

    let mut segments = vec![Segment::Open(Span::new(0, source.len()))];
    for rule in &RULES {
        segments = apply_rule(source, rule, segments);
    }

    segments
        .into_iter()
        .map(|segment| segment.into_token(source))
        .collect()
}

fn apply_rule(source: &str, rule: &Rule, segments: Vec<Segment>) -> Vec<Segment> {
    let view = View::new(source, &segments);
    let mut out = Vec::with_capacity(segments.len());
    let mut cursor = 0;

    for caps in rule.regex().captures_iter(&view.text) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let covered = view.slice(&segments, whole.start(), whole.end());
        let (Some(first), Some(last)) = (covered.first(), covered.last()) else {
            continue;
        };
        let span = Span::new(first.span().start, last.span().end);
        out.extend(view.slice(&segments, cursor, whole.start()));

        let mut token = claim(
            source,
            rule,
            view.slice(&segments, body.start(), body.end()),
            span,
        );
        if let Some(gloss) = caps.get(2) {
            token.gloss = Some(joined_text(
                source,
                view.slice(&segments, gloss.start(), gloss.end()),
            ));
        }
        trace!(
            kind = rule.kind.label(),
            start = span.start,
            end = span.end,
            nested = token.children.len(),
            "claimed"
        );
        out.push(Segment::Claimed(token));
        cursor = whole.end();
    }

    if cursor == 0 {
        return segments;
    }
    out.extend(view.slice(&segments, cursor, view.text.len()));
    out
}

/// Builds the token for a match whose body covers `body`.
fn claim(source: &str, rule: &Rule, body: Vec<Segment>, span: Span) -> MarkupToken {
    if let [Segment::Open(text)] = body.as_slice() {
        return MarkupToken::leaf(rule.kind, &source[text.start..text.end], span);
    }
    MarkupToken::nested(
        rule.kind,
        body.into_iter()
            .map(|segment| segment.into_token(source))
            .collect(),
        span,
    )
}

fn joined_text(source: &str, segments: Vec<Segment>) -> String {
    segments
        .into_iter()
        .map(|segment| segment.into_token(source).body)
        .collect()
}
