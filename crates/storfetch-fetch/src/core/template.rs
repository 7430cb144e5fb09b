use std::sync::LazyLock;

use regex::Regex;
use storfetch_verify::Sha256Digest;

use crate::error::{Error, Result};

pub const DEFAULT_TEMPLATE: &str = "{prefix1}/{prefix2}/{prefix3}/{digest}";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([^{}]*)\}").expect("placeholder pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Digest,
    /// Two hex characters starting at `2 * n`.
    Prefix(usize),
}

/// Relative object path built from a digest.
///
/// Placeholders:
/// - `{digest}` - full lowercase hex digest
/// - `{prefix1}`, `{prefix2}`, `{prefix3}` - successive two-character hex segments
///
/// ```
/// use storfetch_fetch::PathTemplate;
///
/// let digest = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855".parse().unwrap();
/// let template = PathTemplate::parse("objects/{prefix1}/{digest}").unwrap();
///
/// assert_eq!(
///     template.render(&digest),
///     "objects/e3/e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    source:   String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    pub fn parse(template: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidTemplate {
            template: template.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(template) {
            let Some(whole) = caps.get(0) else { continue };
            push_literal(&mut segments, &template[last..whole.start()]).map_err(invalid)?;

            let segment = match &caps[1] {
                "digest" => Segment::Digest,
                "prefix1" => Segment::Prefix(0),
                "prefix2" => Segment::Prefix(1),
                "prefix3" => Segment::Prefix(2),
                other => return Err(invalid(format!("unknown placeholder {{{other}}}"))),
            };
            segments.push(segment);
            last = whole.end();
        }
        push_literal(&mut segments, &template[last..]).map_err(invalid)?;

        Ok(Self {
            source: template.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str { &self.source }

    pub fn render(&self, digest: &Sha256Digest) -> String {
        let hex = digest.to_hex();
        let mut path = String::with_capacity(self.source.len() + hex.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Digest => path.push_str(&hex),
                Segment::Prefix(n) => path.push_str(&hex[2 * n..2 * n + 2]),
            }
        }
        path
    }
}

impl Default for PathTemplate {
    fn default() -> Self {
        Self {
            source:   DEFAULT_TEMPLATE.to_string(),
            segments: vec![
                Segment::Prefix(0),
                Segment::Literal("/".to_string()),
                Segment::Prefix(1),
                Segment::Literal("/".to_string()),
                Segment::Prefix(2),
                Segment::Literal("/".to_string()),
                Segment::Digest,
            ],
        }
    }
}

impl std::str::FromStr for PathTemplate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

fn push_literal(segments: &mut Vec<Segment>, text: &str) -> std::result::Result<(), String> {
    if text.contains(['{', '}']) {
        return Err(format!("unbalanced brace in {text:?}"));
    }
    if !text.is_empty() {
        segments.push(Segment::Literal(text.to_string()));
    }
    Ok(())
}
