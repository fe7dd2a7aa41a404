use super::{ByteIndex, Span, Spanning};
use std::{
    io,
    path::{Path, PathBuf},
};
use unicode_width::UnicodeWidthStr;

#[cfg(test)]
mod test;

/// A mapping from [index](SrcFileIdx) to [source file](SourceFile).
///
/// The source files are laid out next to each other and padded on their left
/// (at their start) by one byte to reserve space for *end of input* virtual
/// locations. Additionally, this frees up the byte index `0` and allows the
/// [default `Span`](Span::default) — starting at this unmapped index and
/// empty — to be interpreted as an *unknown location*.
///
/// # Visualization
///
/// ```text
/// | |  f0  | |  f1  | ...
///  ^ ^      ^ ^      ^
///  | |      | |      |
///  | |      | |      padding   f1.span().end()
///  | |      | source file f1   f1.span()
///  | |      padding            f0.span().end()
///  | source file f0            f0.span()
///  padding, unknown location   Span::default()
/// ```
#[derive(Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    fn next_offset(&self) -> ByteIndex {
        const PADDING: u32 = 1;

        self.files
            .last()
            .map(|file| file.span().end())
            .unwrap_or_default()
            + PADDING
    }

    /// Open a file given its path and add it as a [`SourceFile`] to the map.
    pub fn load(&mut self, path: PathBuf) -> Result<SrcFileIdx, io::Error> {
        let source = std::fs::read_to_string(&path)?;
        Ok(self.add(Some(path), source))
    }

    /// Add text to the map creating a [`SourceFile`] in the process.
    pub fn add(&mut self, path: Option<PathBuf>, source: String) -> SrcFileIdx {
        let index = SrcFileIdx(self.files.len());
        self.files
            .push(SourceFile::new(path, source, self.next_offset()));
        index
    }

    pub fn file(&self, span: Span) -> &SourceFile {
        debug_assert!(span != Span::default());

        self.files
            .iter()
            .find(|file| file.span().contains(span.start()))
            .unwrap()
    }

    /// Resolve a span to the string content it points to.
    ///
    /// This treats line breaks verbatim.
    pub fn snippet(&self, span: Span) -> &str {
        let file = self.file(span);
        &file.content()[span.local(file)]
    }

    /// Resolve a span to the line(s) containing it together with highlight geometry.
    pub fn lines_with_highlight(&self, span: Span) -> LinesWithHighlight<'_> {
        let file = self.file(span);
        let local = span.local(file);
        let content = file.content();

        let mut current_line = InterimLine::new(1);
        let mut first_line = None; // the first line of the highlight
        let mut last_line = None; // the last line of the highlight

        for (index, character) in content.char_indices() {
            if current_line.start.is_none() {
                current_line.start = Some(index);

                if first_line.is_some() {
                    // the first line of the highlight has been found,
                    // prepare for finding the final line (which might coincide with the first)
                    current_line.highlight = Some(InterimHighlight {
                        start: index,
                        end: None,
                    });
                }
            }

            if index == local.start {
                current_line.highlight = Some(InterimHighlight {
                    start: index,
                    end: None,
                });
            }

            if index == local.end {
                if let Some(highlight) = &mut current_line.highlight {
                    highlight.end = Some(index);
                }
            }

            if character == '\n' {
                current_line.end = Some(index);
                let line_number = current_line.number;

                if let Some(highlight) = &mut current_line.highlight {
                    if first_line.is_none() {
                        if highlight.end.is_none() {
                            highlight.end = current_line.end;
                        }
                        first_line = Some(current_line.reset(line_number));
                    } else if highlight.end.is_some() {
                        last_line = Some(current_line.reset(line_number));
                        break;
                    }
                }

                if index + 1 != local.end {
                    // unless this line break is the last character of the highlight

                    current_line.start = None;
                    current_line.end = None;
                    current_line.number += 1;
                }
            }
        }

        {
            let index = content.len();

            if current_line.start.is_none() {
                current_line.start = Some(index);
            }

            if index == local.start {
                current_line.highlight = Some(InterimHighlight {
                    start: index,
                    end: None,
                });
            }

            if index == local.end {
                if let Some(highlight) = &mut current_line.highlight {
                    highlight.end = Some(index);
                }
            }

            if current_line.end.is_none() {
                // no trailing line break
                current_line.end = Some(index);
            }

            if let Some(highlight) = &mut current_line.highlight {
                if first_line.is_none() {
                    if local.end <= index {
                        if highlight.end.is_none() {
                            highlight.end = current_line.end;
                        }
                        first_line = Some(current_line);
                    }
                } else if highlight.end.is_some() {
                    last_line = Some(current_line);
                }
            }
        }

        LinesWithHighlight {
            path: file.path(),
            first: first_line.unwrap().resolve(content).unwrap(),
            last: last_line.map(|line| line.resolve(content).unwrap()),
        }
    }
}

impl std::ops::Index<SrcFileIdx> for SourceMap {
    type Output = SourceFile;

    fn index(&self, index: SrcFileIdx) -> &Self::Output {
        &self.files[index.0]
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SrcFileIdx(usize);

struct InterimLine {
    /// One-indexed line number.
    number: u32,
    start: Option<usize>,
    end: Option<usize>,
    highlight: Option<InterimHighlight>,
}

impl InterimLine {
    fn new(line_number: u32) -> Self {
        Self {
            number: line_number,
            start: None,
            end: None,
            highlight: None,
        }
    }

    fn reset(&mut self, line_number: u32) -> Self {
        std::mem::replace(self, Self::new(line_number))
    }

    fn resolve(self, content: &str) -> Option<LineWithHighlight<'_>> {
        let line_start = self.start?;
        let line_end = self.end?;
        let highlight = self.highlight?;
        let highlight_start = highlight.start;
        let highlight_end = highlight.end?;

        let highlight_prefix = &content[line_start..highlight_start];
        let highlight = &content[highlight_start..highlight_end];

        let start = highlight_prefix.chars().count() + 1;
        let end = start + highlight.chars().count();

        Some(LineWithHighlight {
            number: self.number,
            content: &content[line_start..line_end],
            highlight: Highlight {
                start: start.try_into().unwrap(),
                end: end.try_into().unwrap(),
                width: highlight.width(),
                prefix_width: highlight_prefix.width(),
            },
        })
    }
}

struct InterimHighlight {
    start: usize,
    end: Option<usize>,
}

#[derive(Debug)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub struct LinesWithHighlight<'a> {
    pub path: Option<&'a Path>,
    pub first: LineWithHighlight<'a>,
    /// This is `None` if the last line is the first line.
    pub last: Option<LineWithHighlight<'a>>,
}

#[derive(Debug)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub struct LineWithHighlight<'a> {
    /// One-indexed line number.
    pub number: u32,
    /// The content of the entire line that contains the to-be-highlighted snippet.
    ///
    /// It may contain the whole snippet or only the starting or the ending part of it
    /// if the snippet spans multiple lines.
    pub content: &'a str,
    pub highlight: Highlight,
}

/// Highlight geometry within a [line](LineWithHighlight).
///
/// `start` and `end` are one-indexed column numbers; the widths are
/// Unicode display widths.
#[derive(Debug)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub struct Highlight {
    pub start: u32,
    pub end: u32,
    pub width: usize,
    pub prefix_width: usize,
}

/// A source file.
///
/// Obtained by and contained within a [source map](SourceMap).
pub struct SourceFile {
    path: Option<PathBuf>,
    content: String,
    span: Span,
}

impl SourceFile {
    /// Create a new source file.
    ///
    /// The [byte index](ByteIndex) `start` locates the file in a [source map](SourceMap).
    fn new(path: Option<PathBuf>, content: String, start: ByteIndex) -> Self {
        Self {
            span: Span::with_length(start, content.len().try_into().unwrap()),
            path,
            content,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Spanning for SourceFile {
    fn span(&self) -> Span {
        self.span
    }
}
