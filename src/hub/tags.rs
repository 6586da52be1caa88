//! Tag Ledger leaf: recent tag usage frequency.
//!
//! Every sanitized tag that goes through `join` is recorded here; the
//! stats broadcast asks for the most-used tags inside a sliding window.

use std::collections::HashMap;

use time::{Duration, OffsetDateTime};

/// How far back a tag use still counts.
const WINDOW: Duration = Duration::hours(1);

#[derive(Debug, Default)]
pub struct TagLedger {
    uses: HashMap<String, Vec<OffsetDateTime>>,
}

impl TagLedger {
    pub fn record(&mut self, tag: &str, now: OffsetDateTime) {
        self.uses.entry(tag.to_owned()).or_default().push(now);
    }

    /// The `n` most-used tags within the window, most frequent first.
    /// Prunes stale uses as a side effect.
    pub fn top(&mut self, n: usize, now: OffsetDateTime) -> Vec<(String, usize)> {
        let cutoff = now - WINDOW;
        self.uses.retain(|_, times| {
            times.retain(|t| *t >= cutoff);
            !times.is_empty()
        });

        let mut counts: Vec<(String, usize)> = self
            .uses
            .iter()
            .map(|(tag, times)| (tag.clone(), times.len()))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts.truncate(n);
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_counts_within_window() {
        let now = OffsetDateTime::now_utc();
        let mut ledger = TagLedger::default();
        ledger.record("gaming", now);
        ledger.record("gaming", now);
        ledger.record("movies", now);

        assert_eq!(
            ledger.top(2, now),
            vec![("gaming".to_owned(), 2), ("movies".to_owned(), 1)]
        );
    }

    #[test]
    fn stale_uses_fall_out_of_the_window() {
        let now = OffsetDateTime::now_utc();
        let mut ledger = TagLedger::default();
        ledger.record("gaming", now - Duration::hours(2));
        ledger.record("movies", now);

        assert_eq!(ledger.top(5, now), vec![("movies".to_owned(), 1)]);
    }
}
