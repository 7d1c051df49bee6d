//! In-memory adapters for driving the assembled HTTP stack in tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use actix_web::web;
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use mockable::DefaultClock;
use serde_json::{Map, Value};

use symptom_tracker::domain::ports::{
    IdentityProvider, IdentityProviderError, SummariserError, SymptomLogRepository,
    SymptomRepository, SymptomSummariser, TokenVerificationError, TokenVerifier,
    TrackerRepository, TrackingPersistenceError, UserRepository,
};
use symptom_tracker::domain::{
    AccountService, AuthTokens, Claims, Confirmation, Credentials, InsightsService,
    MAX_TRACKERS_PER_USER, SignUpDetails, Subject, Symptom, SymptomLog, Tracker, TrackerId,
    TrackingService, User, UserId,
};
use symptom_tracker::inbound::http::health::HealthState;
use symptom_tracker::inbound::http::state::HttpState;

/// Password the stub identity provider accepts.
pub const PASSWORD: &str = "correct horse battery staple";

/// Bearer token the stub verifier maps to `subject`.
pub fn bearer_for(subject: &str) -> String {
    format!("Bearer token:{subject}")
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// One store backing all four repositories.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    trackers: Mutex<Vec<Tracker>>,
    symptoms: Mutex<Vec<Symptom>>,
    logs: Mutex<Vec<SymptomLog>>,
}

impl MemoryStore {
    pub fn log_count(&self) -> usize {
        lock(&self.logs).len()
    }

    pub fn tracker_count(&self) -> usize {
        lock(&self.trackers).len()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User) -> Result<(), TrackingPersistenceError> {
        let mut users = lock(&self.users);
        if users.iter().any(|u| u.subject() == user.subject()) {
            return Err(TrackingPersistenceError::conflict("users_cognito_sub_key"));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_subject(
        &self,
        subject: &Subject,
    ) -> Result<Option<User>, TrackingPersistenceError> {
        Ok(lock(&self.users)
            .iter()
            .find(|u| u.subject() == subject)
            .cloned())
    }
}

#[async_trait]
impl TrackerRepository for MemoryStore {
    async fn insert(&self, tracker: &Tracker) -> Result<(), TrackingPersistenceError> {
        let mut trackers = lock(&self.trackers);
        let owned: Vec<&Tracker> = trackers
            .iter()
            .filter(|t| t.user_id == tracker.user_id)
            .collect();
        if owned.len() >= MAX_TRACKERS_PER_USER {
            return Err(TrackingPersistenceError::limit_reached(
                "trackers_per_user_limit",
            ));
        }
        if owned.iter().any(|t| t.name == tracker.name) {
            return Err(TrackingPersistenceError::conflict(
                "trackers_user_id_name_key",
            ));
        }
        trackers.push(tracker.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &TrackerId,
    ) -> Result<Option<Tracker>, TrackingPersistenceError> {
        Ok(lock(&self.trackers).iter().find(|t| t.id == *id).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Tracker>, TrackingPersistenceError> {
        Ok(lock(&self.trackers)
            .iter()
            .filter(|t| t.user_id == *user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SymptomRepository for MemoryStore {
    async fn insert(&self, symptom: &Symptom) -> Result<(), TrackingPersistenceError> {
        lock(&self.symptoms).push(symptom.clone());
        Ok(())
    }

    async fn list_for_tracker(
        &self,
        tracker_id: &TrackerId,
    ) -> Result<Vec<Symptom>, TrackingPersistenceError> {
        Ok(lock(&self.symptoms)
            .iter()
            .filter(|s| s.tracker_id == *tracker_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SymptomLogRepository for MemoryStore {
    async fn insert(&self, log: &SymptomLog) -> Result<(), TrackingPersistenceError> {
        lock(&self.logs).push(log.clone());
        Ok(())
    }

    async fn list_for_tracker(
        &self,
        tracker_id: &TrackerId,
    ) -> Result<Vec<SymptomLog>, TrackingPersistenceError> {
        let mut logs: Vec<SymptomLog> = lock(&self.logs)
            .iter()
            .filter(|l| l.tracker_id == *tracker_id)
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.log_time.cmp(&a.log_time));
        Ok(logs)
    }
}

/// Accepts `token:<sub>` and rejects everything else.
pub struct StaticTokenVerifier;

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, TokenVerificationError> {
        let sub = token
            .strip_prefix("token:")
            .ok_or_else(|| TokenVerificationError::invalid("unknown test token"))?;
        let mut raw = Map::new();
        raw.insert("sub".into(), Value::String(sub.to_owned()));
        raw.insert("email".into(), Value::String(format!("{sub}@example.com")));
        Claims::from_map(raw).ok_or_else(TokenVerificationError::missing_subject)
    }
}

/// Identity provider holding accounts in memory.
#[derive(Default)]
pub struct StubIdentityProvider {
    signed_up: Mutex<Vec<String>>,
}

impl StubIdentityProvider {
    pub fn signed_up(&self) -> Vec<String> {
        lock(&self.signed_up).clone()
    }

    fn tokens_for(subject: &str, refresh_token: Option<&str>) -> AuthTokens {
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"{subject}"}}"#));
        AuthTokens {
            access_token: format!("token:{subject}"),
            id_token: format!("eyJhbGciOiJSUzI1NiJ9.{payload}.c2ln"),
            refresh_token: refresh_token.map(str::to_owned),
            expires_in: 3600,
            token_type: "Bearer".into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
    async fn sign_up(&self, details: &SignUpDetails) -> Result<(), IdentityProviderError> {
        let username = details.credentials.username().to_owned();
        let mut signed_up = lock(&self.signed_up);
        if signed_up.contains(&username) {
            return Err(IdentityProviderError::username_taken());
        }
        signed_up.push(username);
        Ok(())
    }

    async fn confirm_sign_up(
        &self,
        confirmation: &Confirmation,
    ) -> Result<(), IdentityProviderError> {
        if confirmation.code() == "123456" {
            Ok(())
        } else {
            Err(IdentityProviderError::not_authorized("invalid code"))
        }
    }

    async fn resend_confirmation_code(&self, username: &str) -> Result<(), IdentityProviderError> {
        if lock(&self.signed_up).iter().any(|u| u == username) {
            Ok(())
        } else {
            Err(IdentityProviderError::unknown_user())
        }
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthTokens, IdentityProviderError> {
        if credentials.password() != PASSWORD {
            return Err(IdentityProviderError::not_authorized("incorrect username or password"));
        }
        let subject = format!("sub-{}", credentials.username());
        Ok(Self::tokens_for(&subject, Some("refresh-1")))
    }

    async fn refresh(
        &self,
        subject: &Subject,
        refresh_token: &str,
    ) -> Result<AuthTokens, IdentityProviderError> {
        if refresh_token != "refresh-1" {
            return Err(IdentityProviderError::not_authorized("invalid refresh token"));
        }
        Ok(Self::tokens_for(subject.as_str(), None))
    }
}

/// Summariser returning a fixed reply and remembering the last prompt.
#[derive(Default)]
pub struct CannedSummariser {
    last_prompt: Mutex<Option<String>>,
}

impl CannedSummariser {
    pub fn last_prompt(&self) -> Option<String> {
        lock(&self.last_prompt).clone()
    }
}

#[async_trait]
impl SymptomSummariser for CannedSummariser {
    async fn summarise(&self, prompt: &str) -> Result<String, SummariserError> {
        *lock(&self.last_prompt) = Some(prompt.to_owned());
        Ok("Patterns observed: headaches follow coffee.".to_owned())
    }
}

/// Stub adapters plus the real domain services built over them.
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub identity: Arc<StubIdentityProvider>,
    pub summariser: Arc<CannedSummariser>,
    pub health: web::Data<HealthState>,
}

impl Harness {
    pub fn new() -> Self {
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        Self {
            store: Arc::new(MemoryStore::default()),
            identity: Arc::new(StubIdentityProvider::default()),
            summariser: Arc::new(CannedSummariser::default()),
            health,
        }
    }

    pub fn http_state(&self) -> web::Data<HttpState> {
        let tracking = Arc::new(TrackingService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.store),
            Arc::clone(&self.store),
            Arc::clone(&self.store),
            Arc::new(DefaultClock),
        ));
        web::Data::new(HttpState::new(
            Arc::new(AccountService::new(Arc::clone(&self.identity))),
            tracking.clone(),
            tracking,
            Arc::new(InsightsService::new(Arc::clone(&self.summariser))),
        ))
    }

    pub fn verifier(&self) -> Arc<dyn TokenVerifier> {
        Arc::new(StaticTokenVerifier)
    }
}

/// Initialise the full application, middleware included, over a harness.
macro_rules! init_app {
    ($harness:expr, $bucket:expr) => {{
        let harness = &$harness;
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(harness.health.clone())
                .app_data(harness.http_state())
                .configure(symptom_tracker::inbound::http::routes::configure(
                    harness.verifier(),
                ))
                .wrap(symptom_tracker::middleware::RateLimit::new($bucket))
                .wrap(symptom_tracker::middleware::Trace)
                .wrap(symptom_tracker::middleware::Cors),
        )
        .await
    }};
}

pub(crate) use init_app;
