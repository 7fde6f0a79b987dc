//! Line grammar of the deck dialect.
//!
//! ```markdown
//! # Deck Title
//! ## Category
//! Question :: Answer
//! - Statement :: true
//! - Multiple-choice stem
//!   - Option A
//!   - Option B
//!   > Option B
//! ```
//!
//! [`Scanner`] turns a document into [`Block`]s. The parser and the
//! validator both consume these blocks, so the dialect is defined once: the
//! parser keeps what it can build cards from, the validator reports on
//! everything else.
//!
//! Scanner transitions:
//!
//! | state            | token          | action                          | next            |
//! |------------------|----------------|---------------------------------|-----------------|
//! | Document         | Stem           | open multiple-choice block      | AwaitingOption  |
//! | Document         | other          | emit block (blank lines skipped)| Document        |
//! | AwaitingOption   | Choice         | collect option                  | AwaitingAnswer  |
//! | AwaitingAnswer   | Choice         | collect option                  | AwaitingAnswer  |
//! | Awaiting*        | Answer         | record answer, emit block       | Document        |
//! | Awaiting*        | anything else  | emit block, line not consumed   | Document        |

use std::iter::{Enumerate, Peekable};
use std::str::Lines;

use crate::types::CardType;

/// Separator between front and back of a simple card.
pub const SEPARATOR: &str = " :: ";

/// Scanner state; decides how indented lines are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Document,
    AwaitingOption,
    AwaitingAnswer,
}

/// Classification of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineToken<'a> {
    Blank,
    Title(&'a str),
    Category(&'a str),
    Pair {
        front: &'a str,
        back: &'a str,
        extra_separators: usize,
    },
    Stem(&'a str),
    Choice(&'a str),
    Answer(&'a str),
    Unknown { indented: bool },
}

/// Classify a raw line given the scanner state.
///
/// Inside a multiple-choice block option and answer lines take priority.
/// At document level the order is: heading, `::` pair, indented option,
/// answer marker, stem.
pub fn classify(line: &str, state: ScanState) -> LineToken<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineToken::Blank;
    }
    let indented = line.starts_with(char::is_whitespace);

    if state != ScanState::Document {
        if let Some(text) = choice_text(trimmed, indented) {
            return LineToken::Choice(text);
        }
        if let Some(text) = answer_text(trimmed) {
            return LineToken::Answer(text);
        }
    }

    if let Some(name) = heading(trimmed, "##") {
        return LineToken::Category(name);
    }
    if let Some(title) = heading(trimmed, "#") {
        return LineToken::Title(title);
    }

    let bullet = strip_bullet(trimmed);
    if let Some((front, back, extra_separators)) = split_pair(bullet.unwrap_or(trimmed)) {
        return LineToken::Pair {
            front,
            back,
            extra_separators,
        };
    }

    if let Some(text) = choice_text(trimmed, indented) {
        return LineToken::Choice(text);
    }
    if let Some(text) = answer_text(trimmed) {
        return LineToken::Answer(text);
    }
    match bullet {
        Some(text) => LineToken::Stem(text),
        None => LineToken::Unknown { indented },
    }
}

/// Card type for a `::` pair: `true`/`false` answers make a true/false card.
pub fn pair_card_type(back: &str) -> CardType {
    if back.eq_ignore_ascii_case("true") || back.eq_ignore_ascii_case("false") {
        CardType::TrueFalse
    } else {
        CardType::Simple
    }
}

fn heading<'a>(trimmed: &'a str, marker: &str) -> Option<&'a str> {
    let rest = trimmed.strip_prefix(marker)?;
    if rest.is_empty() {
        return Some("");
    }
    rest.strip_prefix(' ').map(str::trim)
}

fn strip_bullet(trimmed: &str) -> Option<&str> {
    if trimmed == "-" {
        return Some("");
    }
    trimmed.strip_prefix("- ").map(str::trim)
}

fn choice_text(trimmed: &str, indented: bool) -> Option<&str> {
    if indented {
        strip_bullet(trimmed)
    } else {
        None
    }
}

fn answer_text(trimmed: &str) -> Option<&str> {
    trimmed.strip_prefix('>').map(str::trim)
}

/// Split on the first separator. A dangling separator at either end counts
/// as a pair with an empty side.
fn split_pair(text: &str) -> Option<(&str, &str, usize)> {
    if let Some(idx) = text.find(SEPARATOR) {
        let back = &text[idx + SEPARATOR.len()..];
        return Some((text[..idx].trim(), back.trim(), back.matches(SEPARATOR).count()));
    }
    if text == "::" {
        return Some(("", "", 0));
    }
    if let Some(front) = text.strip_suffix(" ::") {
        return Some((front.trim(), "", 0));
    }
    text.strip_prefix(":: ").map(|back| ("", back.trim(), 0))
}

/// Text found on a given 1-based line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineText<'a> {
    pub text: &'a str,
    pub line: usize,
}

/// A multiple-choice stem with the option and answer lines that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceBlock<'a> {
    pub stem: LineText<'a>,
    pub choices: Vec<LineText<'a>>,
    pub answer: Option<LineText<'a>>,
}

impl ChoiceBlock<'_> {
    /// Index of the option the answer line designates.
    ///
    /// An exact match wins; otherwise the first option equal to the answer
    /// ignoring case and surrounding whitespace.
    pub fn correct_index(&self) -> Option<usize> {
        let answer = self.answer?.text;
        self.choices
            .iter()
            .position(|c| c.text == answer)
            .or_else(|| {
                self.choices
                    .iter()
                    .position(|c| c.text.trim().to_lowercase() == answer.trim().to_lowercase())
            })
    }
}

/// A structural unit of a deck document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    Title(LineText<'a>),
    Category(LineText<'a>),
    Pair {
        front: &'a str,
        back: &'a str,
        extra_separators: usize,
        line: usize,
    },
    MultipleChoice(ChoiceBlock<'a>),
    /// Option line with no stem before it.
    StrayChoice(LineText<'a>),
    /// Answer marker with no stem before it.
    StrayAnswer(LineText<'a>),
    Unknown {
        text: &'a str,
        indented: bool,
        line: usize,
    },
}

/// Iterator over the blocks of a document. Blank lines produce nothing.
pub struct Scanner<'a> {
    lines: Peekable<Enumerate<Lines<'a>>>,
}

impl<'a> Scanner<'a> {
    pub fn new(markdown: &'a str) -> Self {
        Self {
            lines: markdown.lines().enumerate().peekable(),
        }
    }

    fn scan_choices(&mut self, stem: LineText<'a>) -> ChoiceBlock<'a> {
        let mut block = ChoiceBlock {
            stem,
            choices: Vec::new(),
            answer: None,
        };
        let mut state = ScanState::AwaitingOption;

        while let Some(&(idx, raw)) = self.lines.peek() {
            match classify(raw, state) {
                LineToken::Choice(text) => {
                    block.choices.push(LineText {
                        text,
                        line: idx + 1,
                    });
                    state = ScanState::AwaitingAnswer;
                }
                LineToken::Answer(text) => {
                    block.answer = Some(LineText {
                        text,
                        line: idx + 1,
                    });
                    self.lines.next();
                    break;
                }
                _ => break,
            }
            self.lines.next();
        }

        block
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Block<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (idx, raw) = self.lines.next()?;
            let line = idx + 1;

            let block = match classify(raw, ScanState::Document) {
                LineToken::Blank => continue,
                LineToken::Title(text) => Block::Title(LineText { text, line }),
                LineToken::Category(text) => Block::Category(LineText { text, line }),
                LineToken::Pair {
                    front,
                    back,
                    extra_separators,
                } => Block::Pair {
                    front,
                    back,
                    extra_separators,
                    line,
                },
                LineToken::Stem(text) => {
                    Block::MultipleChoice(self.scan_choices(LineText { text, line }))
                }
                LineToken::Choice(text) => Block::StrayChoice(LineText { text, line }),
                LineToken::Answer(text) => Block::StrayAnswer(LineText { text, line }),
                LineToken::Unknown { indented } => Block::Unknown {
                    text: raw.trim(),
                    indented,
                    line,
                },
            };
            return Some(block);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_headings() {
        assert_eq!(classify("# Deck", ScanState::Document), LineToken::Title("Deck"));
        assert_eq!(
            classify("## Verbs ", ScanState::Document),
            LineToken::Category("Verbs")
        );
        assert_eq!(classify("#", ScanState::Document), LineToken::Title(""));
        assert_eq!(classify("## ", ScanState::Document), LineToken::Category(""));
        assert_eq!(
            classify("### Deep", ScanState::Document),
            LineToken::Unknown { indented: false }
        );
    }

    #[test]
    fn pair_splits_on_first_separator() {
        assert_eq!(
            classify("- a :: b :: c", ScanState::Document),
            LineToken::Pair {
                front: "a",
                back: "b :: c",
                extra_separators: 1
            }
        );
    }

    #[test]
    fn dangling_separator_is_an_empty_side() {
        assert_eq!(
            classify("Question :: ", ScanState::Document),
            LineToken::Pair {
                front: "Question",
                back: "",
                extra_separators: 0
            }
        );
        assert_eq!(
            classify(":: Answer", ScanState::Document),
            LineToken::Pair {
                front: "",
                back: "Answer",
                extra_separators: 0
            }
        );
    }

    #[test]
    fn indented_lines_depend_on_state() {
        assert_eq!(
            classify("  - 4", ScanState::AwaitingOption),
            LineToken::Choice("4")
        );
        assert_eq!(
            classify("  - 4", ScanState::Document),
            LineToken::Choice("4")
        );
        assert_eq!(
            classify("  - a :: b", ScanState::Document),
            LineToken::Pair {
                front: "a",
                back: "b",
                extra_separators: 0
            }
        );
        assert_eq!(
            classify("  - a :: b", ScanState::AwaitingAnswer),
            LineToken::Choice("a :: b")
        );
        assert_eq!(classify("> 4", ScanState::AwaitingAnswer), LineToken::Answer("4"));
    }

    #[test]
    fn top_level_bullet_is_a_stem() {
        assert_eq!(
            classify("- What is 2+2?", ScanState::Document),
            LineToken::Stem("What is 2+2?")
        );
        assert_eq!(classify("-", ScanState::Document), LineToken::Stem(""));
    }

    #[test]
    fn true_false_detection_is_case_insensitive() {
        assert_eq!(pair_card_type("TRUE"), CardType::TrueFalse);
        assert_eq!(pair_card_type("False"), CardType::TrueFalse);
        assert_eq!(pair_card_type("truth"), CardType::Simple);
    }

    #[test]
    fn scanner_collects_choice_block() {
        let doc = "- What is 2+2?\n  - 3\n  - 4\n  - 5\n> 4\nNext :: card";
        let blocks: Vec<_> = Scanner::new(doc).collect();
        assert_eq!(blocks.len(), 2);

        let Block::MultipleChoice(block) = &blocks[0] else {
            panic!("expected multiple choice block");
        };
        assert_eq!(block.stem.text, "What is 2+2?");
        assert_eq!(block.choices.len(), 3);
        assert_eq!(block.answer.map(|a| a.line), Some(5));
        assert_eq!(block.correct_index(), Some(1));
        assert!(matches!(blocks[1], Block::Pair { line: 6, .. }));
    }

    #[test]
    fn scanner_stops_choices_at_blank_line() {
        let doc = "- Stem\n  - a\n\n  - b";
        let blocks: Vec<_> = Scanner::new(doc).collect();
        assert!(matches!(&blocks[0], Block::MultipleChoice(b) if b.choices.len() == 1 && b.answer.is_none()));
        assert!(matches!(blocks[1], Block::StrayChoice(LineText { text: "b", line: 4 })));
    }

    #[test]
    fn correct_index_falls_back_to_case_insensitive() {
        let doc = "- Capital of France?\n  - Paris\n  - Lyon\n  > paris ";
        let Some(Block::MultipleChoice(block)) = Scanner::new(doc).next() else {
            panic!("expected multiple choice block");
        };
        assert_eq!(block.correct_index(), Some(0));
    }
}
