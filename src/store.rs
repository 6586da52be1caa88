//! Moderation evidence store.
//!
//! The hub never touches sqlite directly: it pushes `StoreEvent`s onto an
//! unbounded channel and this task writes them out. A slow or failing
//! write can therefore never stall the hub lock or leave the pairing
//! table half-updated.

use sqlx::SqlitePool;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tokio::sync::mpsc;
use tracing::{error, warn};
use uuid::Uuid;

/// One log entry snapshotted as evidence when a ban tears a pairing down.
#[derive(Debug, Clone)]
pub struct EvidenceEntry {
    pub sender: Uuid,
    pub body: String,
    pub redacted: bool,
    pub at: OffsetDateTime,
}

#[derive(Debug)]
pub enum StoreEvent {
    Report {
        pairing_id: Uuid,
        reporter: Uuid,
        reported: Uuid,
        reason: Option<String>,
        count: u32,
        at: OffsetDateTime,
    },
    Ban {
        identity: Uuid,
        fingerprint: Option<String>,
        reason: String,
        /// `None` means permanent.
        duration_minutes: Option<u64>,
        at: OffsetDateTime,
    },
    Unban {
        identity: Uuid,
        at: OffsetDateTime,
    },
    Evidence {
        pairing_id: Uuid,
        entries: Vec<EvidenceEntry>,
    },
}

pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS reports (
            id TEXT PRIMARY KEY,
            pairing_id TEXT NOT NULL,
            reporter TEXT NOT NULL,
            reported TEXT NOT NULL,
            reason TEXT,
            count INTEGER NOT NULL,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS bans (
            id TEXT PRIMARY KEY,
            identity TEXT NOT NULL,
            fingerprint TEXT,
            reason TEXT NOT NULL,
            duration_minutes INTEGER,
            lifted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS evidence (
            id TEXT PRIMARY KEY,
            pairing_id TEXT NOT NULL,
            sender TEXT NOT NULL,
            body TEXT NOT NULL,
            redacted INTEGER NOT NULL,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Spawn the writer task. Returns the channel the hub feeds.
pub fn spawn(pool: SqlitePool) -> mpsc::UnboundedSender<StoreEvent> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let Err(err) = write(&pool, event).await {
                error!(%err, "evidence write failed");
            }
        }
    });
    tx
}

fn stamp(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_else(|_| at.to_string())
}

async fn write(pool: &SqlitePool, event: StoreEvent) -> Result<(), sqlx::Error> {
    match event {
        StoreEvent::Report { pairing_id, reporter, reported, reason, count, at } => {
            sqlx::query(
                "INSERT INTO reports (id,pairing_id,reporter,reported,reason,count,created_at)
                 VALUES (?,?,?,?,?,?,?)",
            )
            .bind(Uuid::now_v7().to_string())
            .bind(pairing_id.to_string())
            .bind(reporter.to_string())
            .bind(reported.to_string())
            .bind(reason)
            .bind(count as i64)
            .bind(stamp(at))
            .execute(pool)
            .await?;
        }
        StoreEvent::Ban { identity, fingerprint, reason, duration_minutes, at } => {
            sqlx::query(
                "INSERT INTO bans (id,identity,fingerprint,reason,duration_minutes,created_at)
                 VALUES (?,?,?,?,?,?)",
            )
            .bind(Uuid::now_v7().to_string())
            .bind(identity.to_string())
            .bind(fingerprint)
            .bind(reason)
            .bind(duration_minutes.map(|m| m as i64))
            .bind(stamp(at))
            .execute(pool)
            .await?;
        }
        StoreEvent::Unban { identity, at } => {
            let updated = sqlx::query("UPDATE bans SET lifted=1 WHERE identity=? AND lifted=0")
                .bind(identity.to_string())
                .execute(pool)
                .await?;
            if updated.rows_affected() == 0 {
                warn!(%identity, at = %stamp(at), "unban with no stored ban");
            }
        }
        StoreEvent::Evidence { pairing_id, entries } => {
            for entry in entries {
                sqlx::query(
                    "INSERT INTO evidence (id,pairing_id,sender,body,redacted,created_at)
                     VALUES (?,?,?,?,?,?)",
                )
                .bind(Uuid::now_v7().to_string())
                .bind(pairing_id.to_string())
                .bind(entry.sender.to_string())
                .bind(entry.body)
                .bind(entry.redacted)
                .bind(stamp(entry.at))
                .execute(pool)
                .await?;
            }
        }
    }
    Ok(())
}
