//! Fuzzy match scorer
//!
//! A single greedy left-to-right subsequence scan: each text character that
//! equals the next pending query character is consumed. This is not an
//! optimal alignment and must stay that way, since ranking output is
//! expected to be reproducible.
//!
//! Scoring over matched indices `idx` of a text of `L` chars and a query of
//! `Q` chars (both lower-cased):
//!
//! | term        | value                                               |
//! |-------------|-----------------------------------------------------|
//! | base        | `100 - L`                                           |
//! | consecutive | `+15` per index exactly one past the previous index |
//! | start       | `+30` if `idx[0] == 0`                              |
//! | boundary    | `+20` per index preceded by ` `, `-`, `_`, `/`, `.` |
//! | camel       | `+20` per index whose folded char is not lowercase  |
//! | early       | `+(10 - i)` per index `i < 10`                      |
//! | coverage    | `+(Q / L) * 50`                                     |
//!
//! The camel term is evaluated on the already-folded text, so in practice it
//! never fires. Changing that would change every ranking.

const WORD_BOUNDARIES: [char; 5] = [' ', '-', '_', '/', '.'];

const CONSECUTIVE_BONUS: f64 = 15.0;
const START_BONUS: f64 = 30.0;
const BOUNDARY_BONUS: f64 = 20.0;
const CAMEL_BONUS: f64 = 20.0;
const EARLY_WINDOW: usize = 10;
const COVERAGE_WEIGHT: f64 = 50.0;

/// A successful fuzzy match
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    /// Unnormalized score, higher is better
    pub score: f64,
    /// Strictly increasing char indices into the lower-cased text
    pub positions: Vec<usize>,
}

impl FuzzyMatch {
    /// Trivial match used for an empty query
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            score: 0.0,
            positions: Vec::new(),
        }
    }
}

/// Score `query` against `text`, case-insensitively.
///
/// Returns `None` when the query is not a subsequence of the text. An empty
/// query matches everything with score 0 and no positions.
#[must_use]
pub fn fuzzy_match(text: &str, query: &str) -> Option<FuzzyMatch> {
    if query.is_empty() {
        return Some(FuzzyMatch::empty());
    }

    let text: Vec<char> = text.to_lowercase().chars().collect();
    let query: Vec<char> = query.to_lowercase().chars().collect();

    let mut positions = Vec::with_capacity(query.len());
    let mut pending = query.iter().peekable();
    for (index, ch) in text.iter().enumerate() {
        match pending.peek() {
            Some(&&wanted) if wanted == *ch => {
                positions.push(index);
                pending.next();
            }
            Some(_) => {}
            None => break,
        }
    }

    if pending.peek().is_some() {
        return None;
    }

    let score = score_positions(&text, query.len(), &positions);
    Some(FuzzyMatch { score, positions })
}

#[allow(clippy::cast_precision_loss)]
fn score_positions(text: &[char], query_len: usize, positions: &[usize]) -> f64 {
    let text_len = text.len();
    let mut score = 100.0 - text_len as f64;

    for pair in positions.windows(2) {
        if pair[1] == pair[0] + 1 {
            score += CONSECUTIVE_BONUS;
        }
    }

    if positions.first() == Some(&0) {
        score += START_BONUS;
    }

    for &index in positions {
        if index == 0 {
            continue;
        }
        let prev = text[index - 1];
        if WORD_BOUNDARIES.contains(&prev) {
            score += BOUNDARY_BONUS;
        }
        if is_lowercase_form(prev) && !is_lowercase_form(text[index]) {
            score += CAMEL_BONUS;
        }
    }

    for &index in positions {
        if index < EARLY_WINDOW {
            score += (EARLY_WINDOW - index) as f64;
        }
    }

    score + (query_len as f64 / text_len as f64) * COVERAGE_WEIGHT
}

/// Whether a char is unchanged by lower-casing
fn is_lowercase_form(ch: char) -> bool {
    let mut lowered = ch.to_lowercase();
    lowered.next() == Some(ch) && lowered.next().is_none()
}
