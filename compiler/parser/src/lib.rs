//! The parser.
//!
//! There is no separate token stream: character classes, keywords and
//! punctuation are recognized inline by matching primitives on a single
//! cursor. Each primitive has one of three outcomes:
//!
//! * **success** — the cursor advanced past the match,
//! * **failure** — the cursor is unchanged and the caller may try an
//!   alternative,
//! * **error** — a diagnostic was reported at the cursor and the parse is
//!   aborted (no further alternatives are tried).
//!
//! Failures surface as `false`/`None` values, errors as
//! [`Err`](diagnostics::error::Result)s carrying the usual
//! already-reported witness.

use base::Parser;
use diagnostics::{error::Result, Reporter};
use span::{SourceMap, SrcFileIdx};

mod base;
mod decl;
mod expr;
mod stmt;

#[cfg(test)]
mod test;

/// Parse the given source file into its syntactic program.
pub fn parse(file: SrcFileIdx, map: &SourceMap, rep: &Reporter) -> Result<ast::Program> {
    Parser::new(file, map, rep).parse_program()
}
