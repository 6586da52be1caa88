//! Moderation Engine bookkeeping: report records, ban records, escalation.
//!
//! Pure state plus time arithmetic; the hub drives it and performs the
//! side effects (notifications, teardown, forced disconnect, evidence
//! persistence).

use std::collections::HashMap;

use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Reports inside this window accumulate; a gap this long resets the count.
const REPORT_WINDOW: Duration = Duration::hours(24);

/// Content-filter violations before an automatic ban.
const VIOLATION_LIMIT: u32 = 3;

/// Escalation outcome of a report increment. Thresholds are evaluated in
/// ascending order and only the highest one met applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BanTerm {
    Minutes30,
    Hours24,
    Permanent,
}

impl BanTerm {
    /// `None` means permanent.
    pub fn duration(self) -> Option<Duration> {
        match self {
            BanTerm::Minutes30 => Some(Duration::minutes(30)),
            BanTerm::Hours24 => Some(Duration::hours(24)),
            BanTerm::Permanent => None,
        }
    }

    pub fn duration_minutes(self) -> Option<u64> {
        self.duration().map(|d| d.whole_minutes() as u64)
    }
}

fn threshold_met(count: u32) -> Option<BanTerm> {
    if count >= 30 {
        Some(BanTerm::Permanent)
    } else if count >= 20 {
        Some(BanTerm::Hours24)
    } else if count >= 10 {
        Some(BanTerm::Minutes30)
    } else {
        None
    }
}

/// Per-identity moderation counters. Never destroyed, only reset or
/// superseded by a ban.
#[derive(Debug, Default, Clone)]
pub struct ReportRecord {
    pub reports: u32,
    pub violations: u32,
    pub last_report_at: Option<OffsetDateTime>,
}

/// What a ban is keyed by. Fingerprint keys stop trivial reconnects under
/// a fresh connection-id from the same device/network.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BanKey {
    Identity(Uuid),
    Fingerprint(String),
}

#[derive(Debug, Clone)]
pub struct BanRecord {
    pub reason: String,
    pub start: OffsetDateTime,
    /// `None` means permanent.
    pub duration: Option<Duration>,
    /// Fingerprint banned alongside this identity, removed together on unban.
    pub linked_fingerprint: Option<String>,
}

impl BanRecord {
    fn expired(&self, now: OffsetDateTime) -> bool {
        match self.duration {
            Some(d) => now >= self.start + d,
            None => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct Moderation {
    records: HashMap<Uuid, ReportRecord>,
    bans: HashMap<BanKey, BanRecord>,
}

impl Moderation {
    /// Count one peer report against `target`. Returns the new count and
    /// the ban term it escalates to, if any.
    pub fn note_report(&mut self, target: Uuid, now: OffsetDateTime) -> (u32, Option<BanTerm>) {
        let record = self.records.entry(target).or_default();
        if let Some(last) = record.last_report_at {
            if now - last >= REPORT_WINDOW {
                record.reports = 0;
            }
        }
        record.reports += 1;
        record.last_report_at = Some(now);
        (record.reports, threshold_met(record.reports))
    }

    /// Count one content-filter violation against `sender`. Returns the ban
    /// term once the limit is reached.
    pub fn note_violation(&mut self, sender: Uuid) -> (u32, Option<BanTerm>) {
        let record = self.records.entry(sender).or_default();
        record.violations += 1;
        let term = (record.violations >= VIOLATION_LIMIT).then_some(BanTerm::Minutes30);
        if term.is_some() {
            record.violations = 0;
        }
        (record.violations, term)
    }

    pub fn record(&self, identity: &Uuid) -> Option<&ReportRecord> {
        self.records.get(identity)
    }

    /// Ban an identity, and its fingerprint when known.
    pub fn ban(
        &mut self,
        identity: Uuid,
        fingerprint: Option<String>,
        reason: String,
        duration: Option<Duration>,
        now: OffsetDateTime,
    ) {
        if let Some(fp) = &fingerprint {
            self.bans.insert(
                BanKey::Fingerprint(fp.clone()),
                BanRecord {
                    reason: reason.clone(),
                    start: now,
                    duration,
                    linked_fingerprint: None,
                },
            );
        }
        self.bans.insert(
            BanKey::Identity(identity),
            BanRecord { reason, start: now, duration, linked_fingerprint: fingerprint },
        );
    }

    /// Active ban for `key`, clearing it lazily when expired.
    pub fn active_ban(&mut self, key: &BanKey, now: OffsetDateTime) -> Option<&BanRecord> {
        if self.bans.get(key).is_some_and(|b| b.expired(now)) {
            self.bans.remove(key);
        }
        self.bans.get(key)
    }

    /// Clear the ban and reset the report record. Idempotent.
    pub fn unban(&mut self, identity: Uuid) {
        if let Some(record) = self.bans.remove(&BanKey::Identity(identity)) {
            if let Some(fp) = record.linked_fingerprint {
                self.bans.remove(&BanKey::Fingerprint(fp));
            }
        }
        self.records.remove(&identity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    #[test]
    fn escalation_picks_highest_threshold_met() {
        assert_eq!(threshold_met(9), None);
        assert_eq!(threshold_met(10), Some(BanTerm::Minutes30));
        assert_eq!(threshold_met(19), Some(BanTerm::Minutes30));
        assert_eq!(threshold_met(20), Some(BanTerm::Hours24));
        assert_eq!(threshold_met(29), Some(BanTerm::Hours24));
        assert_eq!(threshold_met(30), Some(BanTerm::Permanent));
    }

    #[test]
    fn ten_reports_inside_window_escalate() {
        let mut m = Moderation::default();
        let target = Uuid::now_v7();
        let t0 = now();
        for i in 1..=9 {
            let (count, term) = m.note_report(target, t0 + Duration::minutes(i));
            assert_eq!(count, i as u32);
            assert_eq!(term, None);
        }
        let (count, term) = m.note_report(target, t0 + Duration::minutes(10));
        assert_eq!(count, 10);
        assert_eq!(term, Some(BanTerm::Minutes30));
    }

    #[test]
    fn report_count_resets_after_quiet_day() {
        let mut m = Moderation::default();
        let target = Uuid::now_v7();
        let t0 = now();
        for i in 0..9 {
            m.note_report(target, t0 + Duration::minutes(i));
        }
        let (count, term) = m.note_report(target, t0 + Duration::hours(25));
        assert_eq!(count, 1);
        assert_eq!(term, None);
    }

    #[test]
    fn twenty_nine_to_thirty_is_permanent_not_daily() {
        let mut m = Moderation::default();
        let target = Uuid::now_v7();
        let t0 = now();
        for _ in 0..29 {
            m.note_report(target, t0);
        }
        let (count, term) = m.note_report(target, t0);
        assert_eq!(count, 30);
        assert_eq!(term, Some(BanTerm::Permanent));
    }

    #[test]
    fn third_violation_trips_a_short_ban() {
        let mut m = Moderation::default();
        let sender = Uuid::now_v7();
        assert_eq!(m.note_violation(sender).1, None);
        assert_eq!(m.note_violation(sender).1, None);
        assert_eq!(m.note_violation(sender).1, Some(BanTerm::Minutes30));
        // Counter reset after tripping.
        assert_eq!(m.note_violation(sender).1, None);
    }

    #[test]
    fn finite_ban_expires_lazily() {
        let mut m = Moderation::default();
        let id = Uuid::now_v7();
        let t0 = now();
        m.ban(id, None, "test".into(), Some(Duration::minutes(30)), t0);

        let key = BanKey::Identity(id);
        assert!(m.active_ban(&key, t0 + Duration::minutes(29)).is_some());
        assert!(m.active_ban(&key, t0 + Duration::minutes(30)).is_none());
        // Cleared for good, not just hidden.
        assert!(m.active_ban(&key, t0).is_none());
    }

    #[test]
    fn permanent_ban_never_expires() {
        let mut m = Moderation::default();
        let id = Uuid::now_v7();
        let t0 = now();
        m.ban(id, None, "test".into(), None, t0);
        assert!(m.active_ban(&BanKey::Identity(id), t0 + Duration::days(3650)).is_some());
    }

    #[test]
    fn unban_clears_ban_fingerprint_and_record() {
        let mut m = Moderation::default();
        let id = Uuid::now_v7();
        let t0 = now();
        m.note_report(id, t0);
        m.ban(id, Some("fp-1".into()), "test".into(), None, t0);

        m.unban(id);
        assert!(m.active_ban(&BanKey::Identity(id), t0).is_none());
        assert!(m.active_ban(&BanKey::Fingerprint("fp-1".into()), t0).is_none());
        assert!(m.record(&id).is_none());

        // Idempotent.
        m.unban(id);
    }
}
