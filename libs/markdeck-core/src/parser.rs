//! Markdown parser for deck files.
//!
//! The parser is lenient: lines it cannot turn into a card are skipped and
//! parsing never fails. Strict checks live in [`crate::validator`].
//!
//! # Format
//! ```markdown
//! # Spanish Basics
//! ## Greetings
//! Hola :: Hello
//! - Adiós means goodbye :: true
//! - Which word means "thanks"?
//!   - Gracias
//!   - Por favor
//!   > Gracias
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grammar::{pair_card_type, Block, ChoiceBlock, Scanner};
use crate::ids::{CardIdStrategy, IdGenerator};
use crate::types::{Card, CardOption, CardType, Diagnostic};

/// Parser settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    #[serde(default)]
    pub id_strategy: CardIdStrategy,
}

/// Everything the parser extracts from a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub title: Option<String>,
    pub cards: Vec<Card>,
    /// Warnings about content that did not become a card.
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse markdown into cards with content-derived ids.
///
/// A multiple-choice answer line selects the option with exactly the same
/// text. When no option matches exactly, the first option equal to the
/// answer ignoring case and surrounding whitespace is taken; when none
/// matches at all the card is skipped.
pub fn parse(markdown: &str) -> Vec<Card> {
    parse_document(markdown, &ParseOptions::default()).cards
}

/// Parse markdown into cards, the deck title and parser warnings.
///
/// Answer matching follows [`parse`]; skipped cards are reported in
/// [`ParsedDocument::diagnostics`].
pub fn parse_document(markdown: &str, options: &ParseOptions) -> ParsedDocument {
    let mut builder = DocumentBuilder::new(&options.id_strategy);
    for block in Scanner::new(markdown) {
        builder.push(block);
    }

    let document = builder.finish();
    debug!(
        cards = document.cards.len(),
        skipped = document.diagnostics.len(),
        "parsed deck markdown"
    );
    document
}

struct DocumentBuilder<'a> {
    ids: IdGenerator<'a>,
    title: Option<String>,
    category: Option<String>,
    cards: Vec<Card>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> DocumentBuilder<'a> {
    fn new(strategy: &'a CardIdStrategy) -> Self {
        Self {
            ids: IdGenerator::new(strategy),
            title: None,
            category: None,
            cards: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn push(&mut self, block: Block<'_>) {
        match block {
            Block::Title(title) => {
                if self.title.is_none() && !title.text.is_empty() {
                    self.title = Some(title.text.to_string());
                }
            }
            Block::Category(name) => {
                self.category = (!name.text.is_empty()).then(|| name.text.to_string());
            }
            Block::Pair {
                front, back, line, ..
            } => self.push_pair(front, back, line),
            Block::MultipleChoice(block) => self.push_choice(&block),
            Block::StrayChoice(_) | Block::StrayAnswer(_) | Block::Unknown { .. } => {}
        }
    }

    fn push_pair(&mut self, front: &str, back: &str, line: usize) {
        if front.is_empty() || back.is_empty() {
            self.skip("card has an empty question or answer", line);
            return;
        }

        let card_type = pair_card_type(back);
        let id = self.ids.next_id(card_type, front, back, None);
        self.cards.push(Card {
            id,
            front: front.to_string(),
            back: back.to_string(),
            card_type,
            category: self.category.clone(),
            options: None,
            metadata: None,
            line,
        });
    }

    fn push_choice(&mut self, block: &ChoiceBlock<'_>) {
        let line = block.stem.line;
        if block.stem.text.is_empty() {
            self.skip("multiple-choice question is empty", line);
            return;
        }
        if block.answer.is_none() {
            self.skip("multiple-choice question has no correct answer line", line);
            return;
        }
        let Some(correct) = block.correct_index() else {
            self.skip("correct answer does not match any option", line);
            return;
        };

        let options: Vec<CardOption> = block
            .choices
            .iter()
            .enumerate()
            .filter(|(_, choice)| !choice.text.is_empty())
            .map(|(idx, choice)| CardOption {
                text: choice.text.to_string(),
                is_correct: idx == correct,
            })
            .collect();

        if options.len() < 2 {
            self.skip("multiple-choice question needs at least 2 options", line);
            return;
        }
        let Some(back) = options.iter().find(|o| o.is_correct).map(|o| o.text.clone()) else {
            self.skip("correct answer does not match any option", line);
            return;
        };

        let front = block.stem.text;
        let id = self
            .ids
            .next_id(CardType::MultipleChoice, front, &back, Some(&options));
        self.cards.push(Card {
            id,
            front: front.to_string(),
            back,
            card_type: CardType::MultipleChoice,
            category: self.category.clone(),
            options: Some(options),
            metadata: None,
            line,
        });
    }

    fn skip(&mut self, reason: &str, line: usize) {
        debug!(line, reason, "skipped card");
        self.diagnostics
            .push(Diagnostic::warning(format!("Skipped card: {}", reason), Some(line)));
    }

    fn finish(self) -> ParsedDocument {
        ParsedDocument {
            title: self.title,
            cards: self.cards,
            diagnostics: self.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sequential() -> ParseOptions {
        ParseOptions {
            id_strategy: CardIdStrategy::Sequential {
                prefix: "c".to_string(),
            },
        }
    }

    #[test]
    fn parse_simple_card() {
        let cards = parse("What is Rust? :: A systems programming language.");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].front, "What is Rust?");
        assert_eq!(cards[0].back, "A systems programming language.");
        assert_eq!(cards[0].card_type, CardType::Simple);
        assert_eq!(cards[0].category, None);
        assert_eq!(cards[0].line, 1);
    }

    #[test]
    fn parse_bulleted_true_false_card() {
        let cards = parse("- The sky is green :: FALSE");
        assert_eq!(cards[0].front, "The sky is green");
        assert_eq!(cards[0].back, "FALSE");
        assert_eq!(cards[0].card_type, CardType::TrueFalse);
    }

    #[test]
    fn only_first_separator_is_honored() {
        let cards = parse("a :: b :: c");
        assert_eq!(cards[0].front, "a");
        assert_eq!(cards[0].back, "b :: c");
    }

    #[test]
    fn categories_scope_following_cards() {
        let cards = parse("## Cat\nA :: B\n## Cat2\nC :: D");
        assert_eq!(cards[0].category.as_deref(), Some("Cat"));
        assert_eq!(cards[1].category.as_deref(), Some("Cat2"));
    }

    #[test]
    fn title_is_not_a_card() {
        let document = parse_document("# Deck\nQ :: A", &ParseOptions::default());
        assert_eq!(document.title.as_deref(), Some("Deck"));
        assert_eq!(document.cards.len(), 1);
        assert_eq!(document.cards[0].category, None);
    }

    #[test]
    fn parse_multiple_choice() {
        let input = "- What is 2+2?\n  - 3\n  - 4\n  - 5\n> 4";
        let cards = parse(input);
        assert_eq!(cards.len(), 1);
        let card = &cards[0];
        assert_eq!(card.card_type, CardType::MultipleChoice);
        assert_eq!(card.back, "4");
        assert_eq!(
            card.options.as_deref(),
            Some(
                &[
                    CardOption {
                        text: "3".into(),
                        is_correct: false
                    },
                    CardOption {
                        text: "4".into(),
                        is_correct: true
                    },
                    CardOption {
                        text: "5".into(),
                        is_correct: false
                    },
                ][..]
            )
        );
    }

    #[test]
    fn consumed_option_lines_are_not_reparsed() {
        let input = "- Pick\n  - a :: b\n  - c\n  > c\nX :: Y";
        let cards = parse_document(input, &sequential()).cards;
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].options.as_ref().map(Vec::len), Some(2));
        assert_eq!(cards[1].front, "X");
        assert_eq!(cards[1].id, "c-2");
    }

    #[test]
    fn multiple_choice_without_answer_is_dropped() {
        let document = parse_document("- Pick one\n  - a\n  - b", &ParseOptions::default());
        assert!(document.cards.is_empty());
        assert_eq!(document.diagnostics.len(), 1);
        assert_eq!(document.diagnostics[0].line, Some(1));
    }

    #[test]
    fn answer_falls_back_to_case_insensitive_match() {
        let cards = parse("- Capital of France?\n  - Paris\n  - paris \n  > PARIS");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].back, "Paris");

        let exact = parse("- Pick\n  - Paris\n  - paris\n  > paris");
        assert_eq!(exact[0].back, "paris");
        assert_eq!(exact[0].options.as_ref().map(|o| o[1].is_correct), Some(true));
    }

    #[test]
    fn mismatched_answer_drops_card() {
        let document = parse_document("- Pick\n  - a\n  - b\n  > z", &ParseOptions::default());
        assert!(document.cards.is_empty());
        assert!(document.diagnostics[0].message.contains("does not match"));
    }

    #[test]
    fn unrecognized_lines_are_ignored() {
        let cards = parse("just some prose\n\nQ :: A\n  stray indent");
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn empty_input_yields_no_cards() {
        assert!(parse("").is_empty());
        assert!(parse("   \n\n").is_empty());
    }

    #[test]
    fn parsing_is_idempotent() {
        let input = "# T\n## C\nQ1 :: A1\nQ1 :: A1\n- S\n  - x\n  - y\n  > y";
        let first = parse(input);
        let second = parse(input);
        assert_eq!(first, second);
        assert_ne!(first[0].id, first[1].id);
    }

    #[test]
    fn random_ids_differ_but_content_matches() {
        let options = ParseOptions {
            id_strategy: CardIdStrategy::Random,
        };
        let first = parse_document("Q :: A", &options).cards;
        let second = parse_document("Q :: A", &options).cards;
        assert_ne!(first[0].id, second[0].id);
        assert!(first[0].same_content(&second[0]));
    }

    #[test]
    fn content_ids_survive_unrelated_edits() {
        let before = parse("Q1 :: A1\nQ2 :: A2");
        let after = parse("Q0 :: A0\nQ1 :: A1\nQ2 :: changed");
        assert_eq!(before[0].id, after[1].id);
        assert_ne!(before[1].id, after[2].id);
    }
}
