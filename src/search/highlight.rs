//! Split text into matched and unmatched runs for highlighting

/// A run of text that is either entirely matched or entirely unmatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub matched: bool,
}

/// Split `text` into runs according to fuzzy match `positions`.
///
/// Positions index the chars of the lower-cased text. When lower-casing
/// keeps the char count, the original characters are returned so the
/// display keeps its case; otherwise the lower-cased text is used so
/// positions still line up. Out-of-range positions are ignored.
#[must_use]
pub fn segments(text: &str, positions: &[usize]) -> Vec<Segment> {
    let original: Vec<char> = text.chars().collect();
    let lowered: Vec<char> = text.to_lowercase().chars().collect();
    let chars = if lowered.len() == original.len() {
        original
    } else {
        lowered
    };

    let mut out: Vec<Segment> = Vec::new();
    let mut next = positions.iter().peekable();
    for (index, ch) in chars.into_iter().enumerate() {
        let matched = next.peek() == Some(&&index);
        if matched {
            next.next();
        }
        match out.last_mut() {
            Some(last) if last.matched == matched => last.text.push(ch),
            _ => out.push(Segment {
                text: ch.to_string(),
                matched,
            }),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::fuzzy_match;

    fn render(segments: &[Segment]) -> String {
        segments
            .iter()
            .map(|s| {
                if s.matched {
                    format!("[{}]", s.text)
                } else {
                    s.text.clone()
                }
            })
            .collect()
    }

    #[test]
    fn test_no_positions_is_one_plain_run() {
        let segs = segments("Hello", &[]);
        assert_eq!(segs.len(), 1);
        assert!(!segs[0].matched);
        assert_eq!(segs[0].text, "Hello");
    }

    #[test]
    fn test_runs_keep_original_case() {
        let m = fuzzy_match("Rust Docs", "rudo").unwrap();
        assert_eq!(render(&segments("Rust Docs", &m.positions)), "[Ru]st [Do]cs");
    }

    #[test]
    fn test_empty_text() {
        assert!(segments("", &[0]).is_empty());
    }
}
