use std::future::Future;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::db;
use crate::parser::Event;

/// Snapshot database, opened on first use. A fetch that needs neither the
/// cache, the store nor the fallback never touches it.
pub struct Store {
    path: String,
    conn: Option<Connection>,
}

impl Store {
    pub fn lazy(path: &str) -> Self {
        Self { path: path.to_string(), conn: None }
    }

    #[cfg(test)]
    fn open_with(conn: Connection) -> Self {
        Self { path: String::new(), conn: Some(conn) }
    }

    fn conn(&mut self) -> Result<&Connection> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                let conn = db::connect(&self.path)?;
                db::init_schema(&conn)?;
                conn
            }
        };
        Ok(self.conn.insert(conn))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Policy {
    /// Reuse a snapshot younger than this many seconds. 0 disables.
    pub ttl_secs: u64,
    /// Serve the latest snapshot of the same URL when `fetch` fails.
    pub fallback: bool,
    /// Store successful fetches as a new snapshot.
    pub store: bool,
}

/// Fresh snapshot for `url` if one is within the TTL, otherwise `fetch`.
/// `fetch` is only awaited when the cache misses.
pub async fn fetch_with_store<F>(
    store: &mut Store,
    url: &str,
    policy: Policy,
    now: DateTime<Utc>,
    fetch: F,
) -> Result<Vec<Event>>
where
    F: Future<Output = Result<Vec<Event>>>,
{
    if let Some(ttl) = ttl(policy.ttl_secs)? {
        if let Some(snap) = db::latest_snapshot_for(store.conn()?, url)? {
            let age = snap.age(now);
            if age < ttl {
                info!(snapshot = snap.id, age_secs = age.num_seconds(), "using cached snapshot");
                return Ok(snap.events);
            }
        }
    }

    match fetch.await {
        Ok(events) => {
            if policy.store {
                match store.conn().and_then(|conn| db::save_snapshot(conn, url, now, &events)) {
                    Ok(id) => info!(snapshot = id, "stored snapshot"),
                    Err(e) => warn!("Could not store snapshot: {:#}", e),
                }
            }
            Ok(events)
        }
        Err(e) if policy.fallback => {
            match store.conn().and_then(|conn| db::latest_snapshot_for(conn, url)) {
                Ok(Some(snap)) => {
                    warn!(
                        "Fetch failed ({:#}); falling back to snapshot {} from {}",
                        e, snap.id, snap.fetched_at
                    );
                    Ok(snap.events)
                }
                Ok(None) => Err(e),
                Err(db_err) => {
                    warn!("No fallback available: {:#}", db_err);
                    Err(e)
                }
            }
        }
        Err(e) => Err(e),
    }
}

fn ttl(secs: u64) -> Result<Option<Duration>> {
    if secs == 0 {
        return Ok(None);
    }
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .map(Some)
        .ok_or_else(|| anyhow!("cache_ttl_secs is out of range: {secs}"))
}
