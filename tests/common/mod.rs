#![allow(dead_code)]

use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use short_url::application::services::{KeyGenerator, LinkSettings};
use short_url::domain::clock::ManualClock;
use short_url::domain::entities::{NewShortLink, NewUser, Owner, ShortLink, User};
use short_url::domain::repositories::{ShortLinkRepository, UserRepository};
use short_url::infrastructure::memory::{MemoryShortLinkRepository, MemoryUserRepository};
use short_url::routes;
use short_url::state::{AppState, StateDeps};
use sqlx::PgPool;
use std::sync::Arc;

pub const BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_EXPIRY_DAYS: i64 = 30;

pub struct TestApp {
    pub server: TestServer,
    pub clock: ManualClock,
    pub links: Arc<MemoryShortLinkRepository>,
    pub users: Arc<MemoryUserRepository>,
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
}

pub fn create_test_state() -> (
    AppState,
    ManualClock,
    Arc<MemoryShortLinkRepository>,
    Arc<MemoryUserRepository>,
) {
    let clock = ManualClock::new(start_time());
    let links = Arc::new(MemoryShortLinkRepository::new());
    let users = Arc::new(MemoryUserRepository::new());

    let state = AppState::new(
        StateDeps {
            link_repository: links.clone(),
            user_repository: users.clone(),
            key_generator: Arc::new(KeyGenerator::seeded(7)),
            clock: Arc::new(clock.clone()),
            url_validator: None,
        },
        LinkSettings {
            default_expiry_days: DEFAULT_EXPIRY_DAYS,
            key_insert_attempts: 5,
            base_url: BASE_URL.to_string(),
        },
        10,
    );

    (state, clock, links, users)
}

/// Starts a test server over in-memory storage, without rate limiting.
pub fn spawn_app() -> TestApp {
    let (state, clock, links, users) = create_test_state();
    let server = TestServer::new(routes::routes().with_state(state)).unwrap();

    TestApp {
        server,
        clock,
        links,
        users,
    }
}

pub async fn create_user(users: &dyn UserRepository, name: &str) -> User {
    users
        .create(NewUser {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
        })
        .await
        .unwrap()
}

/// Creates users until one with the wanted id exists.
pub async fn create_user_with_id(users: &dyn UserRepository, id: i64) -> User {
    let mut attempt = 0;
    loop {
        attempt += 1;
        let user = users
            .create(NewUser {
                name: format!("User {id}"),
                email: format!("user{id}-{attempt}@example.com"),
            })
            .await
            .unwrap();
        if user.id >= id {
            return user;
        }
    }
}

pub async fn insert_link(
    links: &dyn ShortLinkRepository,
    short_key: &str,
    owner: Option<&User>,
    is_private: bool,
    created_at: DateTime<Utc>,
) -> ShortLink {
    links
        .create(NewShortLink {
            short_key: short_key.to_string(),
            original_url: format!("https://example.com/{short_key}"),
            is_private,
            expires_at: None,
            owner: owner.map(|u| Owner {
                id: u.id,
                name: u.name.clone(),
            }),
            created_at,
        })
        .await
        .unwrap()
}

pub async fn create_db_user(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(format!("{}@example.com", name.to_lowercase()))
        .fetch_one(pool)
        .await
        .unwrap()
}
