//! Data structures and procedures for handling source locations.

use std::{
    fmt,
    ops::{Add, Range, Sub},
};

pub use source_map::{SourceFile, SourceMap, SrcFileIdx};

pub mod source_map;

/// A byte index into the source map.
///
/// Index `0` is never mapped to a file (files are padded on their left),
/// freeing it up for the *unknown location* (see [`Span::default`]).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
pub struct ByteIndex(u32);

impl ByteIndex {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }
}

impl Add<u32> for ByteIndex {
    type Output = Self;

    fn add(self, offset: u32) -> Self::Output {
        Self(self.0 + offset)
    }
}

impl Sub for ByteIndex {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self(self.0 - other.0)
    }
}

/// A byte span of source code.
///
/// The default span starts at the unmapped index `0` and is empty; it is
/// interpreted as an *unknown location*.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Span {
    /// The start of the span, inclusive.
    start: ByteIndex,
    /// The end of the span, exclusive.
    end: ByteIndex,
}

impl Span {
    #[cfg_attr(debug_assertions, track_caller)]
    pub fn new(start: ByteIndex, end: ByteIndex) -> Self {
        debug_assert!(
            start <= end,
            "span start ({}) > span end ({})",
            start.0,
            end.0
        );

        Self { start, end }
    }

    /// Create an empty span at the given index.
    pub fn empty(index: ByteIndex) -> Self {
        Self::new(index, index)
    }

    pub fn with_length(start: ByteIndex, length: u32) -> Self {
        Self::new(start, ByteIndex(start.0 + length))
    }

    pub fn start(self) -> ByteIndex {
        self.start
    }

    pub fn end(self) -> ByteIndex {
        self.end
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub fn contains(self, index: ByteIndex) -> bool {
        self.start <= index && index <= self.end
    }

    #[must_use]
    pub fn merge(self, other: impl Spanning) -> Self {
        let other = other.span();
        Self::new(self.start, other.end)
    }

    /// Shift the span into the local coordinates of the given file.
    pub(crate) fn local(self, file: &SourceFile) -> Range<usize> {
        let offset = file.span().start;
        (self.start - offset).0 as usize..(self.end - offset).0 as usize
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.0, self.end.0)
    }
}

impl Spanning for Span {
    fn span(&self) -> Self {
        *self
    }
}

/// Convenience function for constructing a span in test code.
pub fn span(start: u32, end: u32) -> Span {
    Span::new(ByteIndex::new(start), ByteIndex::new(end))
}

pub trait Spanning {
    fn span(&self) -> Span;
}

impl<S: Spanning> Spanning for &S {
    fn span(&self) -> Span {
        (**self).span()
    }
}

/// A value attached to its source location.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Spanned<Bare> {
    pub bare: Bare,
    pub span: Span,
}

impl<Bare> Spanned<Bare> {
    pub const fn new(span: Span, bare: Bare) -> Self {
        Self { bare, span }
    }
}

impl<Bare> Spanning for Spanned<Bare> {
    fn span(&self) -> Span {
        self.span
    }
}

impl<Bare: fmt::Debug> fmt::Debug for Spanned<Bare> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.bare, self.span)
    }
}

impl<Bare: fmt::Display> fmt::Display for Spanned<Bare> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.bare.fmt(f)
    }
}
