use std::fmt;
use std::rc::Rc;

use crate::common::source::Source;

/// A `Span` refers to a section of a `Source`, much like a `&str` but with
/// a reference-counted pointer back to the source it came from rather than
/// an owned copy of the text. `Span`s are attached to tokens, tree nodes,
/// and errors so diagnostics can point at the exact offending text.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Span {
    source: Option<Rc<Source>>,
    offset: usize,
    length: usize,
}

impl Span {
    /// Creates a new `Span` from an offset and a length.
    pub fn new(source: &Rc<Source>, offset: usize, length: usize) -> Span {
        Span { source: Some(Rc::clone(source)), offset, length }
    }

    /// A `Span` that points at a single character.
    pub fn point(source: &Rc<Source>, offset: usize) -> Span {
        Span { source: Some(Rc::clone(source)), offset, length: 1 }
    }

    /// An empty `Span`, used for synthesized nodes that have no source
    /// text of their own (e.g. nodes introduced by standardization).
    pub fn empty() -> Span {
        Span { source: None, offset: 0, length: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_none()
    }

    /// Merges two `Span`s into the smallest `Span` that contains both.
    pub fn combine(a: &Span, b: &Span) -> Span {
        if a.is_empty() { return b.clone(); }
        if b.is_empty() { return a.clone(); }

        if a.source != b.source {
            panic!("Can't combine two Spans with separate sources");
        }

        let offset = a.offset.min(b.offset);
        let end = (a.offset + a.length).max(b.offset + b.length);

        Span::new(a.source.as_ref().unwrap(), offset, end - offset)
    }

    pub fn contents(&self) -> &str {
        if self.is_empty() { return ""; }
        let source = self.source.as_ref().unwrap();
        &source.contents[self.offset..(self.offset + self.length)]
    }

    fn line_col(&self, at: usize) -> (usize, usize) {
        let source = self.source.as_ref().unwrap();
        let up_to = &source.contents[..at.min(source.contents.len())];
        let line = up_to.matches('\n').count();
        let col = match up_to.rfind('\n') {
            Some(nl) => at - nl - 1,
            None => at,
        };
        (line, col)
    }
}

impl fmt::Display for Span {
    /// Renders a caret-annotated excerpt, e.g.:
    /// ```plain
    /// Line 1:5
    ///   |
    /// 1 | x = blatant error
    ///   |     ^^^^^
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }

        let source = self.source.as_ref().unwrap();
        let (line, col) = self.line_col(self.offset);
        let text = source.contents.lines().nth(line).unwrap_or("");
        let readable_line = (line + 1).to_string();
        let padding = " ".repeat(readable_line.len());

        writeln!(f, "Line {}:{}", readable_line, col + 1)?;
        writeln!(f, "{} |", padding)?;
        writeln!(f, "{} | {}", readable_line, text)?;
        writeln!(f, "{} | {}{}", padding, " ".repeat(col), "^".repeat(self.length.max(1)))
    }
}

/// Wraps a value with the `Span` it was parsed from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Spanned<T> {
    pub item: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(item: T, span: Span) -> Spanned<T> {
        Spanned { item, span }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn combination() {
        let source = Source::source("heck, that's awesome");
        let a = Span::new(&source, 0, 5);
        let b = Span::new(&source, 11, 2);

        assert_eq!(Span::combine(&a, &b), Span::new(&source, 0, 13));
    }

    #[test]
    fn contents() {
        let source = Source::source("hello, world!");
        let span = Span::new(&source, 7, 5);
        assert_eq!(span.contents(), "world");
    }

    #[test]
    fn empty_is_identity() {
        let source = Source::source("abc");
        let a = Span::new(&source, 0, 1);
        assert_eq!(Span::combine(&a, &Span::empty()), a);
        assert_eq!(Span::combine(&Span::empty(), &a), a);
    }
}
