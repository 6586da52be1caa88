//! Wire-level event types.
//!
//! Every frame on the socket is one JSON object tagged by `type`. Both
//! directions use closed enums so anything malformed is rejected at the
//! boundary before it can reach the hub.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events sent by a client over its connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Enter the matchmaking pool with a set of interest tags.
    Join { tags: Vec<String> },
    /// Send a chat message to the current partner.
    Message { text: String },
    /// Typing indicator, forwarded to the partner.
    Typing { flag: bool },
    /// Report the current partner.
    Report {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// Toggle the content-filter strictness flag. Turning the filter off
    /// requires an explicit age confirmation.
    ToggleStrictness { flag: bool, age_confirmed: bool },
    /// Start the graceful-leave countdown.
    Leave,
    /// Abort a running leave countdown.
    CancelLeave,
    /// Observer-only: mirror a live pairing.
    AdminAttach { pairing_id: Uuid },
    /// Observer-only: stop mirroring a pairing.
    AdminDetach { pairing_id: Uuid },
    /// Observer-only: ban an identity. `duration_minutes: None` is permanent.
    AdminBan {
        identity: Uuid,
        #[serde(default)]
        duration_minutes: Option<u64>,
    },
    /// Observer-only: lift a ban and reset the report record.
    AdminUnban { identity: Uuid },
}

/// Events sent by the server to a connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// A partner was found.
    Paired { partner_alias: String },
    /// No partner yet; the client is in the waiting pool.
    Waiting,
    /// Chat message from the partner.
    Message { text: String },
    /// Partner's typing indicator.
    Typing { flag: bool },
    /// The pairing is gone (partner left, disconnected, or was banned).
    Disconnected,
    /// Leave countdown tick, counting 5 down to 0.
    Countdown { n: u8 },
    /// The leave countdown was aborted.
    CountdownCancelled,
    /// The client is being re-submitted to matchmaking with its last tags.
    Rejoin,
    /// A recoverable error, reported to the originating connection only.
    Error { reason: String },
    /// The client is banned. `duration_minutes: None` is permanent.
    /// The connection is closed right after this event.
    Banned {
        reason: String,
        duration_minutes: Option<u64>,
    },
    /// Observer-only: a delivered (or redacted) message in a mirrored pairing.
    ObservedMessage {
        pairing_id: Uuid,
        sender: Uuid,
        text: String,
    },
    /// Observer-only: periodic aggregate snapshot.
    Stats {
        online_users: usize,
        active_pairings: usize,
        messages_sent: u64,
        reports_filed: u64,
        top_tags: Vec<(String, usize)>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_event_tags_are_camel_case() {
        let ev: ClientEvent =
            serde_json::from_str(r#"{"type":"join","tags":["Movies","gaming"]}"#).unwrap();
        assert!(matches!(ev, ClientEvent::Join { .. }));

        let ev: ClientEvent =
            serde_json::from_str(r#"{"type":"toggleStrictness","flag":false,"ageConfirmed":true}"#)
                .unwrap();
        assert!(matches!(
            ev,
            ClientEvent::ToggleStrictness { flag: false, age_confirmed: true }
        ));
    }

    #[test]
    fn unknown_event_is_rejected() {
        assert!(serde_json::from_str::<ClientEvent>(r#"{"type":"selfDestruct"}"#).is_err());
    }

    #[test]
    fn banned_event_serializes_duration() {
        let json = serde_json::to_value(ServerEvent::Banned {
            reason: "reported by peers".into(),
            duration_minutes: Some(30),
        })
        .unwrap();
        assert_eq!(json["type"], "banned");
        assert_eq!(json["durationMinutes"], 30);
    }
}
