//! Decks: named, validated collections of cards.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DeckError, Result};
use crate::export;
use crate::parser::{parse_document, ParseOptions};
use crate::types::{Card, CardReview};
use crate::validator::{validate, ValidationReport};

/// Per-deck study settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSettings {
    #[serde(default)]
    pub shuffle_on_study: bool,
}

/// Descriptive fields supplied when creating a deck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckInfo {
    /// Falls back to the markdown title when absent.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub settings: DeckSettings,
}

/// A deck owns its cards; editing means re-parsing the whole markdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub settings: DeckSettings,
    pub cards: Vec<Card>,
}

impl Deck {
    /// Build a deck from markdown, refusing markdown that fails validation.
    ///
    /// Returns the validation report alongside the deck so callers can show
    /// warnings.
    pub fn from_markdown(
        info: DeckInfo,
        markdown: &str,
        options: &ParseOptions,
        now: DateTime<Utc>,
    ) -> Result<(Self, ValidationReport)> {
        let report = validate(markdown);
        if !report.is_valid {
            return Err(DeckError::Invalid(report));
        }

        let document = parse_document(markdown, options);
        let name = info
            .name
            .filter(|n| !n.trim().is_empty())
            .or(document.title)
            .ok_or(DeckError::MissingName)?;

        let deck = Self {
            id: Uuid::new_v4(),
            name,
            description: info.description,
            emoji: info.emoji,
            tags: info.tags,
            created_at: now,
            updated_at: now,
            settings: info.settings,
            cards: document.cards,
        };
        Ok((deck, report))
    }

    /// Replace all cards by re-parsing new markdown.
    ///
    /// The deck is left untouched when the markdown is invalid.
    pub fn replace_content(
        &mut self,
        markdown: &str,
        options: &ParseOptions,
        now: DateTime<Utc>,
    ) -> Result<ValidationReport> {
        let report = validate(markdown);
        if !report.is_valid {
            return Err(DeckError::Invalid(report));
        }

        self.cards = parse_document(markdown, options).cards;
        self.updated_at = now;
        Ok(report)
    }

    /// Cards due for study: cards whose review is due, plus cards that have
    /// never been reviewed.
    pub fn due_cards(&self, reviews: &[CardReview], now: DateTime<Utc>) -> Vec<&Card> {
        let by_card: HashMap<&str, &CardReview> =
            reviews.iter().map(|r| (r.card_id.as_str(), r)).collect();

        self.cards
            .iter()
            .filter(|card| {
                by_card
                    .get(card.id.as_str())
                    .map_or(true, |review| review.next_review <= now)
            })
            .collect()
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for category in self.cards.iter().filter_map(|c| c.category.as_deref()) {
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    /// Render the deck back to markdown, using the deck name as title.
    pub fn to_markdown(&self) -> String {
        export::to_markdown(Some(&self.name), &self.cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::initialize_card;
    use chrono::{Duration, TimeZone};

    const MARKDOWN: &str = "# Capitals\n## Europe\nFrance :: Paris\nItaly :: Rome\n## Asia\nJapan :: Tokyo";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap()
    }

    #[test]
    fn name_falls_back_to_title() {
        let (deck, report) =
            Deck::from_markdown(DeckInfo::default(), MARKDOWN, &ParseOptions::default(), now())
                .unwrap();
        assert_eq!(deck.name, "Capitals");
        assert_eq!(deck.cards.len(), 3);
        assert_eq!(deck.categories(), vec!["Europe", "Asia"]);
        assert!(report.is_valid);
        assert_eq!(deck.created_at, now());
    }

    #[test]
    fn explicit_name_wins() {
        let info = DeckInfo {
            name: Some("Geo".to_string()),
            tags: vec!["geography".to_string()],
            ..Default::default()
        };
        let (deck, _) =
            Deck::from_markdown(info, MARKDOWN, &ParseOptions::default(), now()).unwrap();
        assert_eq!(deck.name, "Geo");
        assert_eq!(deck.tags, vec!["geography"]);
    }

    #[test]
    fn invalid_markdown_is_rejected() {
        let result = Deck::from_markdown(
            DeckInfo::default(),
            "# Empty deck",
            &ParseOptions::default(),
            now(),
        );
        match result {
            Err(DeckError::Invalid(report)) => assert!(report.error_count() > 0),
            other => panic!("expected invalid deck, got {:?}", other),
        }
    }

    #[test]
    fn untitled_deck_needs_a_name() {
        let result = Deck::from_markdown(
            DeckInfo::default(),
            "Q :: A",
            &ParseOptions::default(),
            now(),
        );
        assert!(matches!(result, Err(DeckError::MissingName)));
    }

    #[test]
    fn replace_content_reparses_and_keeps_unchanged_ids() {
        let (mut deck, _) =
            Deck::from_markdown(DeckInfo::default(), MARKDOWN, &ParseOptions::default(), now())
                .unwrap();
        let france_id = deck.cards[0].id.clone();

        let later = now() + Duration::hours(1);
        let edited = "# Capitals\n## Europe\nFrance :: Paris\nSpain :: Madrid";
        deck.replace_content(edited, &ParseOptions::default(), later)
            .unwrap();

        assert_eq!(deck.cards.len(), 2);
        assert_eq!(deck.cards[0].id, france_id);
        assert_eq!(deck.updated_at, later);
        assert_eq!(deck.created_at, now());
    }

    #[test]
    fn replace_content_with_invalid_markdown_keeps_cards() {
        let (mut deck, _) =
            Deck::from_markdown(DeckInfo::default(), MARKDOWN, &ParseOptions::default(), now())
                .unwrap();
        assert!(deck
            .replace_content("", &ParseOptions::default(), now())
            .is_err());
        assert_eq!(deck.cards.len(), 3);
    }

    #[test]
    fn due_cards_include_new_and_due() {
        let (deck, _) =
            Deck::from_markdown(DeckInfo::default(), MARKDOWN, &ParseOptions::default(), now())
                .unwrap();

        let mut due = initialize_card(&deck.cards[0].id, now() - Duration::days(3));
        due.next_review = now() - Duration::days(1);
        let not_due = initialize_card(&deck.cards[1].id, now());

        let cards = deck.due_cards(&[due, not_due], now());
        let fronts: Vec<_> = cards.iter().map(|c| c.front.as_str()).collect();
        assert_eq!(fronts, vec!["France", "Japan"]);
    }

    #[test]
    fn markdown_roundtrip_uses_deck_name() {
        let (deck, _) =
            Deck::from_markdown(DeckInfo::default(), MARKDOWN, &ParseOptions::default(), now())
                .unwrap();
        assert!(deck.to_markdown().starts_with("# Capitals\n\n## Europe\n- France :: Paris\n"));
    }
}
