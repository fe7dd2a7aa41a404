use span::{Span, Spanned, Spanning};
use std::{fmt, hash::Hash};
use utility::Atom;

/// A name together with its source location.
///
/// Equality and hashing are based on the name alone, not the location.
#[derive(Clone, Copy)]
pub struct Ident(Spanned<Atom>);

impl Ident {
    pub const fn new(span: Span, atom: Atom) -> Self {
        Self(Spanned::new(span, atom))
    }

    pub fn bare(self) -> Atom {
        self.0.bare
    }

    pub fn to_str(self) -> &'static str {
        self.0.bare.to_str()
    }
}

impl Spanning for Ident {
    fn span(&self) -> Span {
        self.0.span
    }
}

impl PartialEq for Ident {
    fn eq(&self, other: &Self) -> bool {
        self.bare() == other.bare()
    }
}

impl Eq for Ident {}

impl Hash for Ident {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.bare().hash(state);
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.bare)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.bare)
    }
}
