use ast::Ident;
use diagnostics::{error::Result, reporter::ErasedReportedError, Diag, Reporter};
use span::{ByteIndex, SourceMap, Span, Spanning, SrcFileIdx};
use utility::{Atom, Str};

/// The parser.
///
/// A deterministic top-down machine over the raw characters of a single
/// source file. The only mutable state is the cursor.
pub(crate) struct Parser<'a> {
    source: &'a str,
    /// Where the file starts inside the source map, for globalizing spans.
    offset: ByteIndex,
    /// The cursor, a file-local byte position.
    position: usize,
    pub(crate) rep: &'a Reporter,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(file: SrcFileIdx, map: &'a SourceMap, rep: &'a Reporter) -> Self {
        let file = &map[file];
        Self {
            source: file.content(),
            offset: file.span().start(),
            position: 0,
            rep,
        }
    }

    fn rest(&self) -> &str {
        &self.source[self.position..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The cursor as a global byte index.
    pub(crate) fn index(&self) -> ByteIndex {
        self.offset + u32::try_from(self.position).unwrap()
    }

    /// An empty span at the cursor.
    pub(crate) fn here(&self) -> Span {
        Span::empty(self.index())
    }

    pub(crate) fn span_from(&self, start: ByteIndex) -> Span {
        Span::new(start, self.index())
    }

    /// Whether the given literal is next, without consuming anything.
    pub(crate) fn at(&self, literal: &str) -> bool {
        self.rest().starts_with(literal)
    }

    fn eat(&mut self, literal: &str) -> bool {
        if self.at(literal) {
            self.position += literal.len();
            true
        } else {
            false
        }
    }

    fn eat_char_if(&mut self, predicate: impl FnOnce(char) -> bool) -> Option<char> {
        let character = self.peek().filter(|&character| predicate(character))?;
        self.position += character.len_utf8();
        Some(character)
    }

    /// Skip whitespace and comments.
    ///
    /// Line comments run to the end of the line, block comments do not
    /// nest. An unterminated block comment is a parse error.
    pub(crate) fn trivia(&mut self) -> Result<()> {
        loop {
            if self.eat_char_if(is_whitespace).is_some() {
                continue;
            }

            if self.eat("//") {
                while self.eat_char_if(|character| character != '\n').is_some() {}
                continue;
            }

            if self.eat("/*") {
                while !self.at("*/") {
                    if self.eat_char_if(|_| true).is_none() {
                        return Err(self.expected("*/"));
                    }
                }
                self.eat("*/");
                continue;
            }

            return Ok(());
        }
    }

    /// Match the given punctuation, skipping leading trivia.
    pub(crate) fn token(&mut self, literal: &str) -> Result<bool> {
        self.trivia()?;
        Ok(self.eat(literal))
    }

    /// Match the given operator, skipping leading trivia.
    ///
    /// The match is rejected when the operator is immediately followed by
    /// the forbidden character (`=` must not match the start of `==`).
    pub(crate) fn operator(&mut self, operator: &str, forbidden_next: Option<char>) -> Result<bool> {
        self.trivia()?;

        if !self.at(operator) {
            return Ok(false);
        }

        if let Some(forbidden) = forbidden_next {
            if self.rest()[operator.len()..].starts_with(forbidden) {
                return Ok(false);
            }
        }

        self.position += operator.len();
        Ok(true)
    }

    /// Match the given keyword, skipping leading trivia.
    ///
    /// A keyword only matches when the following character is not an
    /// identifier-continue character (`letx` is an identifier, not `let`).
    pub(crate) fn keyword(&mut self, keyword: &str) -> Result<bool> {
        self.trivia()?;

        if !self.at(keyword) {
            return Ok(false);
        }

        if self.rest()[keyword.len()..]
            .chars()
            .next()
            .is_some_and(is_ident_continue)
        {
            return Ok(false);
        }

        self.position += keyword.len();
        Ok(true)
    }

    pub(crate) fn at_digit(&self) -> bool {
        self.peek().is_some_and(|character| character.is_ascii_digit())
    }

    pub(crate) fn eat_digit(&mut self) -> Option<i32> {
        self.eat_char_if(|character| character.is_ascii_digit())
            .map(|digit| (digit as u8 - b'0') as i32)
    }

    /// Match an identifier, skipping leading trivia.
    pub(crate) fn ident(&mut self) -> Result<Option<Ident>> {
        self.trivia()?;

        let begin = self.position;
        let start = self.index();

        if self.eat_char_if(is_ident_start).is_none() {
            return Ok(None);
        }
        while self.eat_char_if(is_ident_continue).is_some() {}

        let atom = Atom::from(&self.source[begin..self.position]);
        Ok(Some(Ident::new(self.span_from(start), atom)))
    }

    pub(crate) fn expect_ident(&mut self) -> Result<Ident> {
        match self.ident()? {
            Some(ident) => Ok(ident),
            None => Err(self.error("expected an identifier")),
        }
    }

    /// Match the given literal or upgrade the failure to an error.
    pub(crate) fn expect(&mut self, literal: &str) -> Result<()> {
        self.trivia()?;

        if self.eat(literal) {
            Ok(())
        } else {
            Err(self.expected(literal))
        }
    }

    pub(crate) fn expected(&self, literal: &str) -> ErasedReportedError {
        self.error(format!("expected \u{2018}{literal}\u{2019}"))
    }

    /// Report a parse error at the cursor.
    pub(crate) fn error(&self, message: impl Into<Str>) -> ErasedReportedError {
        Diag::error()
            .message(message)
            .primary_span(self.here())
            .report(self.rep)
    }

    /// Whether only trivia remains, consuming it.
    pub(crate) fn at_end(&mut self) -> Result<bool> {
        self.trivia()?;
        Ok(self.at_raw_end())
    }

    /// Whether the input is exhausted, without skipping trivia.
    pub(crate) fn at_raw_end(&self) -> bool {
        self.position == self.source.len()
    }
}

const fn is_whitespace(character: char) -> bool {
    matches!(character, ' ' | '\t' | '\n' | '\r')
}

const fn is_ident_start(character: char) -> bool {
    character.is_ascii_alphabetic() || character == '_'
}

const fn is_ident_continue(character: char) -> bool {
    character.is_ascii_alphanumeric() || character == '_'
}
