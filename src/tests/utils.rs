//! Test fixtures: a controllable clock, session stores and wired clients

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::client::{BaseClient, HttpClient};
use crate::config::Config;
use crate::storage::MemoryStore;
use crate::store::{Credential, TokenStore};
use crate::tests::mocks::MockTransport;

/// Clock that only moves when told to
#[derive(Debug)]
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: Duration) {
        let delta = TimeDelta::from_std(delta).unwrap();
        *self.lock_clock() += delta;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap()
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
}

pub fn admin_credential(token: &str) -> Credential {
    Credential {
        token: token.to_string(),
        user_id: 7,
        username: "admin".to_string(),
    }
}

/// Token store over an in-memory backend with a controllable clock
pub fn token_store_at(now: DateTime<Utc>) -> (TokenStore, Arc<MemoryStore>, Arc<MutableClock>) {
    let backend = Arc::new(MemoryStore::new());
    let clock = Arc::new(MutableClock::new(now));
    let store = TokenStore::with_clock(backend.clone(), clock.clone());
    (store, backend, clock)
}

pub fn test_config() -> Config {
    Config {
        base_url: "http://localhost:8000".to_string(),
        ..Config::default()
    }
}

/// Client with no session, wired to `transport`
pub fn client_with(transport: MockTransport) -> (HttpClient<MockTransport>, Arc<MutableClock>) {
    let (tokens, _backend, clock) = token_store_at(fixture_timestamp());
    let base = BaseClient::with_transport(test_config(), transport).unwrap();
    (HttpClient::from_parts(base, tokens), clock)
}

/// Client already logged in as `admin` with `token`
pub fn authenticated_client(
    transport: MockTransport,
    token: &str,
) -> (HttpClient<MockTransport>, Arc<MutableClock>) {
    let (client, clock) = client_with(transport);
    client.tokens().set_auth(&admin_credential(token)).unwrap();
    (client, clock)
}
