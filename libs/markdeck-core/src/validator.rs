//! Structural validation of deck markdown.
//!
//! Reads the same block stream as the parser but reports every problem it
//! finds with a line number. Errors block saving a deck; warnings and info
//! messages are advisory. All diagnostics are collected in one pass.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grammar::{Block, ChoiceBlock, LineText, Scanner};
use crate::parser;
use crate::types::{Diagnostic, DiagnosticKind};

const EXPECTED_SYNTAX: &str = "Expected \"Question :: Answer\", or \"- Question\" followed by \
     indented \"  - Option\" lines and a \"  > Correct option\" line";

/// Thresholds used by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationLimits {
    /// Questions or answers longer than this (in characters) get a warning.
    pub max_text_len: usize,
    pub min_options: usize,
    /// More options than this get a warning.
    pub max_options: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_text_len: 200,
            min_options: 2,
            max_options: 6,
        }
    }
}

/// Outcome of validating a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub card_count: usize,
    pub category_count: usize,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }
}

/// Validate deck markdown with the default limits.
pub fn validate(markdown: &str) -> ValidationReport {
    validate_with(markdown, &ValidationLimits::default())
}

/// Validate deck markdown.
pub fn validate_with(markdown: &str, limits: &ValidationLimits) -> ValidationReport {
    if markdown.trim().is_empty() {
        return ValidationReport {
            is_valid: false,
            diagnostics: vec![Diagnostic::error("Document is empty", None)],
            card_count: 0,
            category_count: 0,
        };
    }

    let mut validation = Validation::new(limits);
    for block in Scanner::new(markdown) {
        validation.check(&block);
    }

    let parsed = parser::parse(markdown).len();
    let report = validation.finish(parsed);
    debug!(
        valid = report.is_valid,
        cards = report.card_count,
        diagnostics = report.diagnostics.len(),
        "validated deck markdown"
    );
    report
}

struct Validation<'l> {
    limits: &'l ValidationLimits,
    diagnostics: Vec<Diagnostic>,
    card_count: usize,
    categories: BTreeSet<String>,
    saw_title: bool,
}

impl<'l> Validation<'l> {
    fn new(limits: &'l ValidationLimits) -> Self {
        Self {
            limits,
            diagnostics: Vec::new(),
            card_count: 0,
            categories: BTreeSet::new(),
            saw_title: false,
        }
    }

    fn error(&mut self, message: impl Into<String>, line: usize) {
        self.diagnostics.push(Diagnostic::error(message, Some(line)));
    }

    fn warning(&mut self, message: impl Into<String>, line: usize) {
        self.diagnostics.push(Diagnostic::warning(message, Some(line)));
    }

    fn errors_so_far(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    fn check(&mut self, block: &Block<'_>) {
        match block {
            Block::Title(title) => self.check_title(title),
            Block::Category(name) => {
                if name.text.is_empty() {
                    self.error("Category name is empty", name.line);
                } else {
                    self.categories.insert(name.text.to_string());
                }
            }
            Block::Pair {
                front,
                back,
                extra_separators,
                line,
            } => self.check_pair(front, back, *extra_separators, *line),
            Block::MultipleChoice(choice) => self.check_choice(choice),
            Block::StrayChoice(choice) => {
                self.error("Option line has no question above it", choice.line);
            }
            Block::StrayAnswer(answer) => {
                self.error("Correct-answer line has no question above it", answer.line);
            }
            Block::Unknown {
                text,
                indented,
                line,
            } => {
                if *indented {
                    self.warning(
                        format!("Indented line is not an option or answer: \"{}\"", text),
                        *line,
                    );
                } else {
                    self.warning(format!("Unrecognized line: \"{}\"", text), *line);
                }
            }
        }
    }

    fn check_title(&mut self, title: &LineText<'_>) {
        if title.text.is_empty() {
            self.error("Deck title is empty", title.line);
        } else if self.saw_title {
            self.warning("Deck already has a title; this one is ignored", title.line);
        }
        self.saw_title = true;
    }

    fn check_pair(&mut self, front: &str, back: &str, extra_separators: usize, line: usize) {
        let errors_before = self.errors_so_far();

        if front.is_empty() && back.is_empty() {
            self.error("Card line is empty", line);
        } else if front.is_empty() {
            self.error("Question is empty", line);
        } else if back.is_empty() {
            self.error("Answer is empty", line);
        }

        let max = self.limits.max_text_len;
        if front.chars().count() > max {
            self.warning(format!("Question is longer than {} characters", max), line);
        }
        if back.chars().count() > max {
            self.warning(format!("Answer is longer than {} characters", max), line);
        }
        if extra_separators > 0 {
            self.warning(
                "Line contains more than one \" :: \"; only the first one separates question and answer",
                line,
            );
        }

        if self.errors_so_far() == errors_before {
            self.card_count += 1;
        }
    }

    fn check_choice(&mut self, block: &ChoiceBlock<'_>) {
        let errors_before = self.errors_so_far();
        let line = block.stem.line;

        if block.stem.text.is_empty() {
            self.error("Card line is empty", line);
        }

        if block.choices.is_empty() {
            self.error("Invalid card format", line);
            self.diagnostics
                .push(Diagnostic::info(EXPECTED_SYNTAX, Some(line)));
            return;
        }

        for choice in &block.choices {
            if choice.text.is_empty() {
                self.error("Option is empty", choice.line);
            }
        }

        let count = block.choices.len();
        if count < self.limits.min_options {
            self.error(
                format!(
                    "Multiple-choice question needs at least {} options (found {})",
                    self.limits.min_options, count
                ),
                line,
            );
        } else if count > self.limits.max_options {
            self.warning(
                format!(
                    "Multiple-choice question has {} options; more than {} is hard to study",
                    count, self.limits.max_options
                ),
                line,
            );
        }

        match block.answer {
            None => self.error(
                "Missing correct answer: add a \"  > option\" line after the options",
                line,
            ),
            Some(answer) if block.correct_index().is_none() => self.warning(
                format!("Correct answer \"{}\" does not match any option", answer.text),
                answer.line,
            ),
            Some(_) => {}
        }

        if self.errors_so_far() == errors_before {
            self.card_count += 1;
        }
    }

    fn finish(mut self, parsed_cards: usize) -> ValidationReport {
        if !self.saw_title {
            self.diagnostics.push(Diagnostic::warning(
                "No deck title found; add a \"# Title\" line",
                None,
            ));
        }

        if self.card_count == 0 {
            self.diagnostics
                .push(Diagnostic::error("No cards found", None));
        } else if parsed_cards == 0 {
            self.diagnostics.push(Diagnostic::error(
                format!(
                    "Parser produced no cards although {} card lines were found",
                    self.card_count
                ),
                None,
            ));
        }
        if parsed_cards != self.card_count && parsed_cards > 0 {
            self.diagnostics.push(Diagnostic::warning(
                format!(
                    "Parser produced {} cards but {} were expected; some cards may be lost",
                    parsed_cards, self.card_count
                ),
                None,
            ));
        }

        let is_valid = !self.diagnostics.iter().any(Diagnostic::is_error);
        let category_count = self.categories.len();

        if is_valid && self.diagnostics.is_empty() {
            self.diagnostics.push(Diagnostic::info(
                format!(
                    "Found {} cards in {} categories",
                    self.card_count, category_count
                ),
                None,
            ));
        }

        ValidationReport {
            is_valid,
            diagnostics: self.diagnostics,
            card_count: self.card_count,
            category_count,
        }
    }
}
