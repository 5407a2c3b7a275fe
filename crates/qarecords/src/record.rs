//! The question/answer record.
//!
//! A [`Record`] is the only entity the application stores. Its id is either
//! generated locally or supplied verbatim by an imported CSV row.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of base36 characters in the random part of a generated id.
const ID_SUFFIX_LEN: usize = 9;

/// A question paired with its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Identifier, unique within a collection.
    pub id: String,

    /// The question text.
    pub question: String,

    /// The answer text.
    pub answer: String,
}

impl Record {
    /// Create a record with a freshly generated id.
    #[must_use]
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self::with_id(generate_id(), question, answer)
    }

    /// Create a record that keeps the given id.
    #[must_use]
    pub fn with_id(
        id: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Check whether the question contains `term`, ignoring case.
    ///
    /// Only the question is searched; answers are never matched.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        self.question
            .to_lowercase()
            .contains(&term.to_lowercase())
    }

    /// Check whether this record asks the same question, ignoring case and
    /// surrounding whitespace.
    #[must_use]
    pub fn same_question(&self, question: &str) -> bool {
        self.question.trim().to_lowercase() == question.trim().to_lowercase()
    }
}

/// Generate a new record id.
///
/// The id is the current Unix time in milliseconds, a dash, and nine
/// lowercase base36 characters taken from a random UUID.
#[must_use]
pub fn generate_id() -> String {
    let mut bits = Uuid::new_v4().as_u128();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| {
            let digit = u32::try_from(bits % 36).unwrap_or(0);
            bits /= 36;
            char::from_digit(digit, 36).unwrap_or('0')
        })
        .collect();
    format!("{}-{suffix}", Utc::now().timestamp_millis())
}
