//! Session Registry: connection-id -> per-user state.

use std::collections::{HashMap, HashSet};

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::protocol::ServerEvent;

/// State for one connected user. Owned by the hub; all mutation happens
/// under the hub lock, driven by that connection's event stream.
#[derive(Debug)]
pub struct User {
    pub id: Uuid,
    /// Random display name shown to the partner instead of the identity.
    pub alias: String,
    /// Sanitized, ordered, deduplicated interest tags from the last join.
    pub tags: Vec<String>,
    /// When true, disallowed content involving this user is blocked.
    pub strict: bool,
    /// The active pairing, if any.
    pub pairing: Option<Uuid>,
    /// Device/network hint from the transport layer, used for ban keying.
    pub fingerprint: Option<String>,
    pub is_admin: bool,
    /// Pairings this user mirrors (admins only).
    pub observing: HashSet<Uuid>,
    /// Outbound notification channel, drained by the connection's socket task.
    pub tx: mpsc::UnboundedSender<ServerEvent>,
}

impl User {
    /// Queue an event for delivery. A closed channel means the socket task
    /// is already gone; the disconnect path cleans up, so this never fails.
    pub fn notify(&self, event: ServerEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    users: HashMap<Uuid, User>,
}

impl SessionRegistry {
    pub fn insert(&mut self, user: User) {
        self.users.insert(user.id, user);
    }

    pub fn get(&self, id: &Uuid) -> Option<&User> {
        self.users.get(id)
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut User> {
        self.users.get_mut(id)
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<User> {
        self.users.remove(id)
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.users.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn admins(&self) -> impl Iterator<Item = &User> {
        self.users.values().filter(|u| u.is_admin)
    }

    pub fn notify(&self, id: &Uuid, event: ServerEvent) {
        if let Some(user) = self.users.get(id) {
            user.notify(event);
        }
    }
}

/// Anonymous adjective-noun alias, fresh per connection.
pub fn random_alias() -> String {
    use rand::seq::IndexedRandom;

    let adjectives = [
        "Quick", "Lazy", "Mysterious", "Jolly", "Brave", "Silent", "Witty", "Fierce", "Clever",
        "Gentle", "Wild", "Calm", "Bold", "Shy", "Proud", "Happy", "Eager", "Rusty", "Golden",
        "Lucky",
    ];
    let nouns = [
        "Fox", "Bear", "Eagle", "Wolf", "Dragon", "Tiger", "Lion", "Owl", "Rabbit", "Falcon",
        "Hawk", "Shark", "Panda", "Phoenix", "Griffin", "Turtle", "Dolphin", "Whale", "Zebra",
        "Otter",
    ];

    let mut rng = rand::rng();
    format!(
        "{} {}",
        adjectives.choose(&mut rng).unwrap_or(&"Silent"),
        nouns.choose(&mut rng).unwrap_or(&"Owl"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_has_two_words() {
        let alias = random_alias();
        assert_eq!(alias.split_whitespace().count(), 2);
    }
}
