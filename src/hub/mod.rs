//! The hub: one mutual-exclusion domain over sessions, the waiting set,
//! the pairing table, and moderation records.
//!
//! Cross-identity invariants (a user is never waiting and paired at once,
//! a pairing's members are never in another pairing) make per-entry locks
//! deadlock bait, so everything mutates under a single mutex. Nothing
//! inside the lock blocks: evidence persistence goes out through an
//! unbounded channel to the store task, and notifications go out through
//! per-connection unbounded channels.

pub mod error;
pub mod filter;
pub mod matchmaker;
pub mod moderation;
pub mod pairing;
pub mod session;
pub mod tags;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use time::OffsetDateTime;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::protocol::{ClientEvent, ServerEvent};
use crate::store::{EvidenceEntry, StoreEvent};

pub use error::HubError;
pub use matchmaker::MatchPolicy;
use moderation::{BanKey, Moderation};
use pairing::{Countdown, LogBody, Pairing};
use session::{SessionRegistry, User};
use tags::TagLedger;

const BLOCKED_MARKER: &str = "[message removed by content filter]";
const COUNTDOWN_START: u8 = 5;

/// Why a pairing is being torn down. Decides who gets which notification.
#[derive(Debug, Clone, Copy)]
enum TeardownCause {
    /// Countdown expired; the leaver is re-submitted to matchmaking.
    Leave(Uuid),
    /// Transport loss or idempotent re-join; the named identity gets nothing.
    Disconnect(Uuid),
    /// The named identity was banned and already notified.
    Ban(Uuid),
}

#[derive(Default)]
struct HubState {
    sessions: SessionRegistry,
    /// Identities waiting for a partner, insertion order.
    waiting: Vec<Uuid>,
    pairings: HashMap<Uuid, Pairing>,
    moderation: Moderation,
    tag_ledger: TagLedger,
    messages_sent: u64,
    reports_filed: u64,
}

pub struct Hub {
    state: Mutex<HubState>,
    store: mpsc::UnboundedSender<StoreEvent>,
    match_policy: MatchPolicy,
    /// Handle to ourselves for the countdown tasks we spawn.
    self_ref: Weak<Hub>,
}

/// Aggregate snapshot for the periodic admin broadcast.
#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    pub online_users: usize,
    pub active_pairings: usize,
    pub messages_sent: u64,
    pub reports_filed: u64,
    pub top_tags: Vec<(String, usize)>,
}

impl Hub {
    pub fn new(match_policy: MatchPolicy, store: mpsc::UnboundedSender<StoreEvent>) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            state: Mutex::new(HubState::default()),
            store,
            match_policy,
            self_ref: me.clone(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, HubState> {
        self.state.lock().expect("hub state lock poisoned")
    }

    fn persist(&self, event: StoreEvent) {
        // The store task outlives the hub in normal operation; a closed
        // channel only happens during shutdown.
        let _ = self.store.send(event);
    }

    /// Register a fresh connection. Refuses fingerprint-banned callers.
    pub fn connect(
        &self,
        fingerprint: Option<String>,
        is_admin: bool,
        tx: mpsc::UnboundedSender<ServerEvent>,
    ) -> Result<Uuid, HubError> {
        let now = OffsetDateTime::now_utc();
        let mut state = self.lock();

        if let Some(fp) = &fingerprint {
            if let Some(ban) = state.moderation.active_ban(&BanKey::Fingerprint(fp.clone()), now) {
                return Err(HubError::Banned {
                    reason: ban.reason.clone(),
                    duration: ban.duration,
                });
            }
        }

        let user = User {
            id: Uuid::now_v7(),
            alias: session::random_alias(),
            tags: Vec::new(),
            strict: true,
            pairing: None,
            fingerprint,
            is_admin,
            observing: Default::default(),
            tx,
        };
        let id = user.id;
        info!(%id, alias = %user.alias, is_admin, "connection registered");
        state.sessions.insert(user);
        Ok(id)
    }

    /// Route one inbound event. Recoverable errors go back to the caller
    /// as an `error` notification; nothing here terminates the connection
    /// except a ban, which closes it by dropping the session channel.
    pub fn dispatch(&self, id: Uuid, event: ClientEvent) {
        let result = match event {
            ClientEvent::Join { tags } => self.join(id, &tags),
            ClientEvent::Message { text } => self.send_message(id, &text),
            ClientEvent::Typing { flag } => {
                self.typing(id, flag);
                Ok(())
            }
            ClientEvent::Report { reason } => self.report(id, reason),
            ClientEvent::ToggleStrictness { flag, age_confirmed } => {
                self.set_strictness(id, flag, age_confirmed)
            }
            ClientEvent::Leave => self.leave(id),
            ClientEvent::CancelLeave => self.cancel_leave(id),
            ClientEvent::AdminAttach { pairing_id } => self.attach(id, pairing_id),
            ClientEvent::AdminDetach { pairing_id } => self.detach(id, pairing_id),
            ClientEvent::AdminBan { identity, duration_minutes } => {
                self.admin_ban(id, identity, duration_minutes)
            }
            ClientEvent::AdminUnban { identity } => self.admin_unban(id, identity),
        };

        if let Err(err) = result {
            debug!(%id, %err, "request refused");
            self.lock().sessions.notify(&id, ServerEvent::Error { reason: err.to_string() });
        }
    }

    /// Report a boundary-level rejection (e.g. an unparsable frame) back to
    /// the originating connection.
    pub fn reject(&self, id: Uuid, reason: &str) {
        self.lock().sessions.notify(&id, ServerEvent::Error { reason: reason.to_owned() });
    }

    /// Enter matchmaking. Idempotent over a previous waiting entry or
    /// pairing: the old one is dropped first.
    pub fn join(&self, id: Uuid, raw_tags: &[String]) -> Result<(), HubError> {
        let tags = matchmaker::sanitize_tags(raw_tags);
        if tags.is_empty() {
            return Err(HubError::invalid("at least one tag is required"));
        }
        let now = OffsetDateTime::now_utc();
        let mut state = self.lock();
        if !state.sessions.contains(&id) {
            return Err(HubError::invalid("unknown session"));
        }
        for tag in &tags {
            state.tag_ledger.record(tag, now);
        }
        self.join_locked(&mut state, id, tags, now);
        Ok(())
    }

    fn join_locked(&self, state: &mut HubState, id: Uuid, tags: Vec<String>, now: OffsetDateTime) {
        state.waiting.retain(|w| *w != id);
        if let Some(pairing_id) = state.sessions.get(&id).and_then(|u| u.pairing) {
            self.teardown(state, pairing_id, TeardownCause::Disconnect(id));
        }

        let (strict, alias) = {
            let Some(user) = state.sessions.get_mut(&id) else { return };
            user.tags = tags.clone();
            (user.strict, user.alias.clone())
        };

        let found = matchmaker::best_match(
            &state.sessions,
            &state.waiting,
            id,
            &tags,
            strict,
            self.match_policy,
        );

        match found {
            Some(partner_id) => {
                state.waiting.retain(|w| *w != partner_id);
                let pairing = Pairing::new(id, partner_id, now);
                let pairing_id = pairing.id;
                debug!(%pairing_id, a = %id, b = %partner_id, "paired");

                let partner_alias = state
                    .sessions
                    .get(&partner_id)
                    .map(|p| p.alias.clone())
                    .unwrap_or_default();
                if let Some(user) = state.sessions.get_mut(&id) {
                    user.pairing = Some(pairing_id);
                }
                if let Some(partner) = state.sessions.get_mut(&partner_id) {
                    partner.pairing = Some(pairing_id);
                }
                state.pairings.insert(pairing_id, pairing);
                state.sessions.notify(&id, ServerEvent::Paired { partner_alias });
                state.sessions.notify(&partner_id, ServerEvent::Paired { partner_alias: alias });
            }
            None => {
                state.waiting.push(id);
                state.sessions.notify(&id, ServerEvent::Waiting);
            }
        }
    }

    /// Deliver a message to the partner, subject to sanitization and the
    /// looser-wins content filter.
    pub fn send_message(&self, id: Uuid, raw: &str) -> Result<(), HubError> {
        let now = OffsetDateTime::now_utc();
        let mut state = self.lock();

        let pairing_id =
            state.sessions.get(&id).and_then(|u| u.pairing).ok_or(HubError::NotPaired)?;
        let text = pairing::sanitize_message(raw).ok_or(HubError::EmptyMessage)?;

        let pairing = state.pairings.get(&pairing_id).ok_or(HubError::NotPaired)?;
        let partner_id = pairing.partner_of(id).ok_or(HubError::NotPaired)?;

        // Looser-wins: the filter applies when either member is strict.
        let strict = state.sessions.get(&id).is_some_and(|u| u.strict)
            || state.sessions.get(&partner_id).is_some_and(|u| u.strict);

        // Filter the raw text: escaping rewrites punctuation into entities,
        // which would hide separator evasion from the collapsed match.
        if filter::is_disallowed(raw.trim(), strict) {
            if let Some(pairing) = state.pairings.get_mut(&pairing_id) {
                pairing.log_redaction(id, BLOCKED_MARKER.to_owned(), now);
            }
            self.mirror(&state, pairing_id, id, BLOCKED_MARKER);
            state
                .sessions
                .notify(&id, ServerEvent::Error { reason: "message blocked by content filter".into() });

            let (violations, term) = state.moderation.note_violation(id);
            debug!(%id, violations, "content-filter violation");
            if let Some(term) = term {
                self.apply_ban(&mut state, id, term.duration(), "repeated content-filter violations", now);
            }
            return Ok(());
        }

        if let Some(pairing) = state.pairings.get_mut(&pairing_id) {
            pairing.log_text(id, text.clone(), now);
        }
        state.messages_sent += 1;
        state.sessions.notify(&partner_id, ServerEvent::Message { text: text.clone() });
        self.mirror(&state, pairing_id, id, &text);
        Ok(())
    }

    /// Forward a typing indicator. Ephemeral: silently ignored when unpaired.
    pub fn typing(&self, id: Uuid, flag: bool) {
        let state = self.lock();
        let partner = state
            .sessions
            .get(&id)
            .and_then(|u| u.pairing)
            .and_then(|pid| state.pairings.get(&pid))
            .and_then(|p| p.partner_of(id));
        if let Some(partner_id) = partner {
            state.sessions.notify(&partner_id, ServerEvent::Typing { flag });
        }
    }

    /// Copy a delivered (or redacted) payload to every attached observer.
    fn mirror(&self, state: &HubState, pairing_id: Uuid, sender: Uuid, text: &str) {
        let Some(pairing) = state.pairings.get(&pairing_id) else { return };
        for observer in &pairing.observers {
            state.sessions.notify(
                observer,
                ServerEvent::ObservedMessage { pairing_id, sender, text: text.to_owned() },
            );
        }
    }

    /// Report the current partner. Escalates per the ban thresholds.
    pub fn report(&self, reporter: Uuid, reason: Option<String>) -> Result<(), HubError> {
        let now = OffsetDateTime::now_utc();
        let mut state = self.lock();

        let pairing_id =
            state.sessions.get(&reporter).and_then(|u| u.pairing).ok_or(HubError::NotPaired)?;
        let target = state
            .pairings
            .get(&pairing_id)
            .and_then(|p| p.partner_of(reporter))
            .ok_or(HubError::NotPaired)?;

        if let Some(pairing) = state.pairings.get_mut(&pairing_id) {
            pairing.report_count += 1;
            pairing.log_redaction(target, format!("[user {target} was reported]"), now);
        }
        state.reports_filed += 1;

        let (count, term) = state.moderation.note_report(target, now);
        info!(%reporter, %target, count, "report filed");
        self.persist(StoreEvent::Report { pairing_id, reporter, reported: target, reason, count, at: now });

        if let Some(term) = term {
            self.apply_ban(&mut state, target, term.duration(), "reported by peers", now);
        }
        Ok(())
    }

    /// Toggle the strictness flag. Disabling the filter needs an explicit
    /// age confirmation.
    pub fn set_strictness(&self, id: Uuid, flag: bool, age_confirmed: bool) -> Result<(), HubError> {
        if !flag && !age_confirmed {
            return Err(HubError::invalid("disabling the content filter requires age confirmation"));
        }
        let mut state = self.lock();
        let user = state.sessions.get_mut(&id).ok_or(HubError::invalid("unknown session"))?;
        user.strict = flag;
        Ok(())
    }

    /// Start the graceful-leave countdown. A second `leave` while one is
    /// already running is a no-op.
    pub fn leave(&self, id: Uuid) -> Result<(), HubError> {
        let (pairing_id, generation) = {
            let mut state = self.lock();
            let pairing_id =
                state.sessions.get(&id).and_then(|u| u.pairing).ok_or(HubError::NotPaired)?;
            let pairing = state.pairings.get_mut(&pairing_id).ok_or(HubError::NotPaired)?;
            if pairing.countdown.is_some() {
                return Ok(());
            }
            pairing.countdown_generation += 1;
            let generation = pairing.countdown_generation;
            pairing.countdown = Some(Countdown { leaver: id, generation });
            (pairing_id, generation)
        };

        // The hub sits in an Arc for the whole process lifetime; a failed
        // upgrade only happens during shutdown, when skipping the countdown
        // is harmless.
        let Some(hub) = self.self_ref.upgrade() else { return Ok(()) };
        tokio::spawn(async move {
            for n in (0..=COUNTDOWN_START).rev() {
                if !hub.countdown_tick(pairing_id, generation, n) {
                    return;
                }
                if n > 0 {
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                }
            }
            hub.countdown_expired(pairing_id, generation);
        });
        Ok(())
    }

    /// Emit one countdown tick to both members. Returns false when the
    /// pairing is gone or the countdown was superseded; a stale tick is a
    /// no-op, not an error.
    fn countdown_tick(&self, pairing_id: Uuid, generation: u64, n: u8) -> bool {
        let state = self.lock();
        let Some(pairing) = state.pairings.get(&pairing_id) else { return false };
        if pairing.countdown.is_none_or(|c| c.generation != generation) {
            return false;
        }
        for member in pairing.members {
            state.sessions.notify(&member, ServerEvent::Countdown { n });
        }
        true
    }

    /// Countdown reached zero uncancelled: tear down and re-queue the leaver.
    fn countdown_expired(&self, pairing_id: Uuid, generation: u64) {
        let mut state = self.lock();
        let Some(pairing) = state.pairings.get(&pairing_id) else { return };
        let Some(countdown) = pairing.countdown else { return };
        if countdown.generation != generation {
            return;
        }
        self.teardown(&mut state, pairing_id, TeardownCause::Leave(countdown.leaver));
    }

    /// Abort a running countdown. Idempotent: with no countdown running this
    /// does nothing and emits nothing.
    pub fn cancel_leave(&self, id: Uuid) -> Result<(), HubError> {
        let mut state = self.lock();
        let pairing_id =
            state.sessions.get(&id).and_then(|u| u.pairing).ok_or(HubError::NotPaired)?;
        let Some(pairing) = state.pairings.get_mut(&pairing_id) else {
            return Err(HubError::NotPaired);
        };
        if pairing.countdown.is_none() {
            return Ok(());
        }
        pairing.countdown = None;
        pairing.countdown_generation += 1;
        let members = pairing.members;
        for member in members {
            state.sessions.notify(&member, ServerEvent::CountdownCancelled);
        }
        Ok(())
    }

    /// Mirror a live pairing. Replays the backlog in log order before any
    /// new traffic.
    pub fn attach(&self, observer: Uuid, pairing_id: Uuid) -> Result<(), HubError> {
        let mut state = self.lock();
        if !state.sessions.get(&observer).is_some_and(|u| u.is_admin) {
            return Err(HubError::NotAuthorized);
        }
        let pairing = state.pairings.get_mut(&pairing_id).ok_or(HubError::UnknownPairing)?;
        if !pairing.observers.contains(&observer) {
            pairing.observers.push(observer);
        }
        let backlog: Vec<(Uuid, String)> = pairing
            .log
            .iter()
            .map(|e| (e.sender, e.body.observed().to_owned()))
            .collect();
        if let Some(user) = state.sessions.get_mut(&observer) {
            user.observing.insert(pairing_id);
        }
        for (sender, text) in backlog {
            state
                .sessions
                .notify(&observer, ServerEvent::ObservedMessage { pairing_id, sender, text });
        }
        Ok(())
    }

    /// Stop mirroring. Idempotent; detaching the last observer leaves no
    /// per-pairing observer bookkeeping behind.
    pub fn detach(&self, observer: Uuid, pairing_id: Uuid) -> Result<(), HubError> {
        let mut state = self.lock();
        if !state.sessions.get(&observer).is_some_and(|u| u.is_admin) {
            return Err(HubError::NotAuthorized);
        }
        if let Some(pairing) = state.pairings.get_mut(&pairing_id) {
            pairing.observers.retain(|o| *o != observer);
        }
        if let Some(user) = state.sessions.get_mut(&observer) {
            user.observing.remove(&pairing_id);
        }
        Ok(())
    }

    /// Privileged ban over the event channel.
    pub fn admin_ban(
        &self,
        actor: Uuid,
        identity: Uuid,
        duration_minutes: Option<u64>,
    ) -> Result<(), HubError> {
        {
            let state = self.lock();
            if !state.sessions.get(&actor).is_some_and(|u| u.is_admin) {
                return Err(HubError::NotAuthorized);
            }
        }
        self.ban_identity(identity, None, duration_minutes, "banned by moderator");
        Ok(())
    }

    /// Privileged unban over the event channel.
    pub fn admin_unban(&self, actor: Uuid, identity: Uuid) -> Result<(), HubError> {
        let state = self.lock();
        if !state.sessions.get(&actor).is_some_and(|u| u.is_admin) {
            return Err(HubError::NotAuthorized);
        }
        drop(state);
        self.unban_identity(identity);
        Ok(())
    }

    /// Ban an identity regardless of whether it is currently connected.
    /// Shared by the WS admin events and the HTTP surface (which does its
    /// own authorization). For a live session the fingerprint it connected
    /// with is used; `fingerprint` covers identities that are already
    /// offline, where only a fingerprint ban can stop a reconnect under a
    /// fresh identity.
    pub fn ban_identity(
        &self,
        identity: Uuid,
        fingerprint: Option<String>,
        duration_minutes: Option<u64>,
        reason: &str,
    ) {
        let now = OffsetDateTime::now_utc();
        let duration = duration_minutes.map(|m| time::Duration::minutes(m as i64));
        let mut state = self.lock();
        if state.sessions.contains(&identity) {
            self.apply_ban(&mut state, identity, duration, reason, now);
        } else {
            state.moderation.ban(identity, fingerprint.clone(), reason.to_owned(), duration, now);
            self.persist(StoreEvent::Ban {
                identity,
                fingerprint,
                reason: reason.to_owned(),
                duration_minutes,
                at: now,
            });
        }
    }

    /// Lift a ban and reset the report record. Idempotent.
    pub fn unban_identity(&self, identity: Uuid) {
        let now = OffsetDateTime::now_utc();
        self.lock().moderation.unban(identity);
        self.persist(StoreEvent::Unban { identity, at: now });
        info!(%identity, "unbanned");
    }

    /// Record the ban, notify the target, persist evidence, tear down its
    /// pairing, and force the transport closed by dropping its session.
    fn apply_ban(
        &self,
        state: &mut HubState,
        identity: Uuid,
        duration: Option<time::Duration>,
        reason: &str,
        now: OffsetDateTime,
    ) {
        let fingerprint = state.sessions.get(&identity).and_then(|u| u.fingerprint.clone());
        let duration_minutes = duration.map(|d| d.whole_minutes() as u64);
        warn!(%identity, ?duration_minutes, reason, "applying ban");

        state.moderation.ban(identity, fingerprint.clone(), reason.to_owned(), duration, now);
        self.persist(StoreEvent::Ban {
            identity,
            fingerprint,
            reason: reason.to_owned(),
            duration_minutes,
            at: now,
        });

        state
            .sessions
            .notify(&identity, ServerEvent::Banned { reason: reason.to_owned(), duration_minutes });

        if let Some(pairing_id) = state.sessions.get(&identity).and_then(|u| u.pairing) {
            if let Some(pairing) = state.pairings.get(&pairing_id) {
                let entries: Vec<EvidenceEntry> = pairing
                    .log
                    .iter()
                    .map(|e| EvidenceEntry {
                        sender: e.sender,
                        body: e.body.observed().to_owned(),
                        redacted: matches!(e.body, LogBody::Redacted(_)),
                        at: e.at,
                    })
                    .collect();
                self.persist(StoreEvent::Evidence { pairing_id, entries });
            }
            self.teardown(state, pairing_id, TeardownCause::Ban(identity));
        }

        state.waiting.retain(|w| *w != identity);
        // Dropping the session drops its notification channel; the socket
        // task drains the banned event and closes the connection.
        if let Some(user) = state.sessions.remove(&identity) {
            for observed in user.observing {
                if let Some(pairing) = state.pairings.get_mut(&observed) {
                    pairing.observers.retain(|o| *o != identity);
                }
            }
        }
    }

    /// Destroy a pairing atomically: both members' references cleared, the
    /// log discarded, observers detached. Safe to call with a stale id.
    fn teardown(&self, state: &mut HubState, pairing_id: Uuid, cause: TeardownCause) {
        let Some(pairing) = state.pairings.remove(&pairing_id) else { return };
        debug!(%pairing_id, ?cause, "pairing torn down");

        for observer in &pairing.observers {
            if let Some(user) = state.sessions.get_mut(observer) {
                user.observing.remove(&pairing_id);
            }
        }

        let spared = match cause {
            TeardownCause::Leave(id) | TeardownCause::Disconnect(id) | TeardownCause::Ban(id) => id,
        };
        for member in pairing.members {
            if let Some(user) = state.sessions.get_mut(&member) {
                if user.pairing == Some(pairing_id) {
                    user.pairing = None;
                }
            }
            if member != spared {
                state.sessions.notify(&member, ServerEvent::Disconnected);
            }
        }

        if let TeardownCause::Leave(leaver) = cause {
            let tags = state.sessions.get(&leaver).map(|u| u.tags.clone()).unwrap_or_default();
            if !tags.is_empty() && state.sessions.contains(&leaver) {
                state.sessions.notify(&leaver, ServerEvent::Rejoin);
                self.join_locked(state, leaver, tags, OffsetDateTime::now_utc());
            }
        }
    }

    /// Transport-level loss: same teardown as countdown expiry, minus the
    /// countdown. Idempotent; banned sessions are already gone by the time
    /// their socket task calls this.
    pub fn disconnect(&self, id: Uuid) {
        let mut state = self.lock();
        if !state.sessions.contains(&id) {
            return;
        }
        state.waiting.retain(|w| *w != id);
        if let Some(pairing_id) = state.sessions.get(&id).and_then(|u| u.pairing) {
            self.teardown(&mut state, pairing_id, TeardownCause::Disconnect(id));
        }
        if let Some(user) = state.sessions.remove(&id) {
            for pairing_id in user.observing {
                if let Some(pairing) = state.pairings.get_mut(&pairing_id) {
                    pairing.observers.retain(|o| *o != id);
                }
            }
        }
        info!(%id, "connection removed");
    }

    pub fn stats(&self) -> StatsSnapshot {
        let now = OffsetDateTime::now_utc();
        let mut state = self.lock();
        let top_tags = state.tag_ledger.top(5, now);
        StatsSnapshot {
            online_users: state.sessions.len(),
            active_pairings: state.pairings.len(),
            messages_sent: state.messages_sent,
            reports_filed: state.reports_filed,
            top_tags,
        }
    }

    /// Push the aggregate snapshot to every connected admin.
    pub fn broadcast_stats(&self) {
        let snapshot = self.stats();
        let state = self.lock();
        for admin in state.sessions.admins() {
            admin.notify(ServerEvent::Stats {
                online_users: snapshot.online_users,
                active_pairings: snapshot.active_pairings,
                messages_sent: snapshot.messages_sent,
                reports_filed: snapshot.reports_filed,
                top_tags: snapshot.top_tags.clone(),
            });
        }
    }
}

#[cfg(test)]
impl Hub {
    fn pairing_of(&self, id: Uuid) -> Option<Uuid> {
        self.lock().sessions.get(&id).and_then(|u| u.pairing)
    }

    fn is_waiting(&self, id: Uuid) -> bool {
        self.lock().waiting.contains(&id)
    }

    fn is_connected(&self, id: Uuid) -> bool {
        self.lock().sessions.contains(&id)
    }

    fn pairing_exists(&self, pairing_id: Uuid) -> bool {
        self.lock().pairings.contains_key(&pairing_id)
    }

    fn observers_of(&self, pairing_id: Uuid) -> Vec<Uuid> {
        self.lock()
            .pairings
            .get(&pairing_id)
            .map(|p| p.observers.clone())
            .unwrap_or_default()
    }
}
