#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use serde_json::{json, Value};

use civic_site::app::{build_router, AppState};
use civic_site::cache::tags::TagCache;
use civic_site::config::AppConfig;
use civic_site::contact::mailer::{Mailer, OutgoingEmail};
use civic_site::content::client::ContentStore;
use civic_site::content::queries::NAVIGATION_AREAS_QUERY;
use civic_site::error::AppError;
use civic_site::revalidate::signature::{self, SIGNATURE_HEADER};

pub const SECRET: &str = "test-secret";

/// In-memory content store serving a replaceable snapshot.
pub struct StubContentStore {
    snapshot: Mutex<Value>,
    areas: Mutex<Value>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl StubContentStore {
    pub fn new(snapshot: Value) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            areas: Mutex::new(default_areas()),
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_snapshot(&self, snapshot: Value) {
        *self.snapshot.lock().unwrap() = snapshot;
    }

    pub fn set_areas(&self, areas: Value) {
        *self.areas.lock().unwrap() = areas;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl ContentStore for StubContentStore {
    async fn query(&self, groq: &str) -> Result<Value, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Upstream("content store unavailable".into()));
        }
        if groq == NAVIGATION_AREAS_QUERY {
            Ok(self.areas.lock().unwrap().clone())
        } else {
            Ok(self.snapshot.lock().unwrap().clone())
        }
    }
}

/// Mailer that records every message instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    failing: AtomicBool,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Mail("mail API returned 500".into()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// A realistic snapshot covering every searchable kind.
pub fn sample_snapshot() -> Value {
    json!({
        "politicians": [
            {
                "_id": "p1",
                "name": "Anna Andersson",
                "slug": { "_type": "slug", "current": "anna-andersson" },
                "image": { "asset": { "_ref": "image-anna" } },
                "searchText": "Anna Andersson anna@example.se"
            },
            {
                "_id": "p2",
                "name": "Erik Lind",
                "slug": { "current": "erik-lind" }
            }
        ],
        "events": [
            {
                "_id": "e1",
                "title": "Torgmöte i Fisksätra",
                "slug": { "current": "torgmote-fisksatra" },
                "description": "Kom och prata politik på torget."
            }
        ],
        "news": [
            {
                "_id": "n1",
                "title": "Ny skola i Orminge",
                "slug": { "current": "ny-skola-orminge" },
                "excerpt": "Kommunen bygger en ny skola.",
                "mainImage": { "asset": { "_ref": "image-main" } },
                "image": { "asset": { "_ref": "image-other" } }
            },
            {
                "_id": "n2",
                "title": "Budget för 2026",
                "slug": { "current": "budget-2026" },
                "excerpt": "Sänkt skatt och fler poliser."
            }
        ],
        "politicalAreas": [
            {
                "_id": "pa1",
                "name": "Trygghet",
                "slug": { "current": "trygghet" },
                "description": "Fler poliser och bättre belysning."
            }
        ],
        "geographicalAreas": [
            {
                "_id": "ga1",
                "name": "Saltsjöbaden",
                "slug": { "current": "saltsjobaden" }
            }
        ],
        "politicalIssues": [
            {
                "_id": "pi1",
                "question": "Ska vi bygga fler skolor?",
                "slug": { "current": "fler-skolor" },
                "description": "Om skolor i Nacka.",
                "featured": true,
                "fulfilled": true
            },
            {
                "_id": "pi2",
                "question": "Sänkt skatt?",
                "slug": { "current": "sankt-skatt" },
                "featured": true
            }
        ]
    })
}

pub fn default_areas() -> Value {
    json!({
        "politicalAreas": [
            { "name": "Trygghet", "slug": "trygghet", "icon": { "name": "shield" } },
            { "name": "Utkast", "slug": "$1" }
        ],
        "geographicalAreas": [
            { "name": "Fisksätra", "slug": "fisksatra" },
            { "name": "Saltsjöbaden", "slug": "saltsjobaden" }
        ]
    })
}

/// Router wired to in-memory collaborators.
pub struct TestEnv {
    pub router: Router,
    pub store: Arc<StubContentStore>,
    pub mailer: Arc<RecordingMailer>,
    pub cache: Arc<TagCache>,
}

impl TestEnv {
    /// Secret and mailer configured, sample content loaded.
    pub fn start() -> Self {
        Self::build(
            &format!("sanity_project_id = \"test\"\nsanity_revalidate_secret = \"{SECRET}\""),
            true,
        )
    }

    /// No webhook secret configured.
    pub fn without_secret() -> Self {
        Self::build("sanity_project_id = \"test\"", true)
    }

    /// No mail API key configured.
    pub fn without_mailer() -> Self {
        Self::build(
            &format!("sanity_project_id = \"test\"\nsanity_revalidate_secret = \"{SECRET}\""),
            false,
        )
    }

    fn build(config_toml: &str, with_mailer: bool) -> Self {
        let config = AppConfig::from_toml(config_toml).expect("Failed to build test config");
        let store = Arc::new(StubContentStore::new(sample_snapshot()));
        let mailer = Arc::new(RecordingMailer::default());
        let cache = Arc::new(TagCache::new());

        let state = AppState {
            content_store: store.clone(),
            cache: cache.clone(),
            mailer: with_mailer.then(|| mailer.clone() as Arc<dyn Mailer>),
            config: Arc::new(config),
        };
        let router = build_router(state).expect("Failed to build router");

        Self {
            router,
            store,
            mailer,
            cache,
        }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .expect_success_by_default()
            .build(self.router.clone())
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .build(self.router.clone())
    }

    /// Helper: post a webhook body signed with the test secret.
    pub async fn revalidate(
        &self,
        server: &axum_test::TestServer,
        body: &str,
    ) -> axum_test::TestResponse {
        let header = signature::signature_header(SECRET, "1700000000000", body.as_bytes())
            .expect("Failed to sign body");
        server
            .post("/api/revalidate")
            .add_header(
                HeaderName::from_static(SIGNATURE_HEADER),
                HeaderValue::from_str(&header).expect("Invalid header value"),
            )
            .text(body.to_string())
            .await
    }

    /// Helper: submit the contact form from `ip`.
    pub async fn contact(
        &self,
        server: &axum_test::TestServer,
        ip: &str,
        payload: &Value,
    ) -> axum_test::TestResponse {
        server
            .post("/api/contact")
            .add_header(
                HeaderName::from_static("x-forwarded-for"),
                HeaderValue::from_str(ip).expect("Invalid header value"),
            )
            .json(payload)
            .await
    }
}
