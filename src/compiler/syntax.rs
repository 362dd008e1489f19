use std::fmt;
use crate::common::span::Span;

/// Represents a static error: a malformed token, an unexpected symbol, a
/// shape the standardizer doesn't recognize. Anything caught before the
/// machine starts stepping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    pub reason: String,
    pub span: Span,
}

impl Syntax {
    pub fn error(reason: &str, span: &Span) -> Syntax {
        Syntax { reason: reason.to_string(), span: span.clone() }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.span.is_empty() {
            fmt::Display::fmt(&self.span, f)?;
        }
        write!(f, "Syntax Error: {}", self.reason)
    }
}

impl std::error::Error for Syntax {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::source::Source;

    #[test]
    fn error() {
        let source = Source::source("let x = 3 in @ + 1");
        let error = Syntax::error(
            "unexpected token '@'",
            &Span::new(&source, 13, 1),
        );

        let target = "Line 1:14\n  \
            |\n\
          1 | let x = 3 in @ + 1\n  \
            |              ^\n\
        Syntax Error: unexpected token '@'";

        let result = format!("{}", error);
        assert_eq!(result, target);
    }
}
