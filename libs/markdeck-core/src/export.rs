//! Render cards back to deck markdown.

use crate::types::{Card, CardType};

/// Render a title and cards as deck markdown.
///
/// Cards without a category are written first because the dialect has no
/// way to leave a category once one has been opened. Otherwise document
/// order is kept and a `## Category` header is written whenever the
/// category changes.
pub fn to_markdown(title: Option<&str>, cards: &[Card]) -> String {
    let mut out = String::new();
    if let Some(title) = title.filter(|t| !t.is_empty()) {
        out.push_str("# ");
        out.push_str(title);
        out.push('\n');
    }

    let ordered = cards
        .iter()
        .filter(|c| c.category.is_none())
        .chain(cards.iter().filter(|c| c.category.is_some()));

    let mut current: Option<&str> = None;
    for card in ordered {
        let category = card.category.as_deref();
        if category.is_some() && category != current {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str("## ");
            out.push_str(category.unwrap_or_default());
            out.push('\n');
            current = category;
        }
        write_card(&mut out, card);
    }

    out
}

fn write_card(out: &mut String, card: &Card) {
    match card.card_type {
        CardType::Simple | CardType::TrueFalse => {
            out.push_str(&format!("- {} :: {}\n", card.front, card.back));
        }
        CardType::MultipleChoice => {
            out.push_str(&format!("- {}\n", card.front));
            for option in card.options.iter().flatten() {
                out.push_str(&format!("  - {}\n", option.text));
            }
            out.push_str(&format!("  > {}\n", card.back));
        }
    }
}
