use std::sync::LazyLock;

use qv_core::{NodeId, Operator, ParsedLine};
use regex::Regex;

/// Optional origin, operator, optional destination.
///
/// The origin is lazy, so the first `>` or `^` on the line is the operator and
/// the destination keeps any later operator characters verbatim.
static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<origin>.*?)\s*(?P<operator>[>^])\s*(?P<destination>.*?)\s*$")
        .expect("shorthand line pattern is valid")
});

/// Split one raw line into origin, operator and destination.
///
/// Returns `None` when the line has no operator. Empty captures come back as
/// absent endpoints.
#[must_use]
pub fn tokenize_line(line: &str) -> Option<ParsedLine> {
    let captures = LINE_RE.captures(line)?;
    let operator = captures
        .name("operator")
        .and_then(|m| m.as_str().chars().next())
        .and_then(Operator::from_char)?;

    Some(ParsedLine {
        origin: captures.name("origin").and_then(|m| NodeId::new(m.as_str())),
        operator,
        destination: captures
            .name("destination")
            .and_then(|m| NodeId::new(m.as_str())),
    })
}
