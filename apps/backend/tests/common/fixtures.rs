//! Test fixtures and factory functions for creating test data.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

/// A valid deck covering every card type.
pub const SAMPLE_DECK: &str = "# Spanish Basics
## Greetings
Hola :: Hello
- Adiós means goodbye :: true
## Manners
- Which word means \"thanks\"?
  - Gracias
  - Por favor
  - De nada
  > Gracias
";

/// Fixed clock for deterministic review tests.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Generate deck markdown with a specified number of simple cards.
pub fn sample_md_content(num_cards: usize) -> String {
    let cards = (0..num_cards)
        .map(|i| format!("Question {} :: Answer {}", i + 1, i + 1))
        .collect::<Vec<_>>()
        .join("\n");
    format!("# Generated\n{}\n", cards)
}

/// Review record JSON due `offset` from the fixed clock.
pub fn review_json(card_id: &str, offset: Duration) -> Value {
    json!({
        "card_id": card_id,
        "next_review": now() + offset,
        "interval": 3,
        "repetitions": 2,
        "ease_factor": 2.5,
        "lapses": 0,
    })
}
