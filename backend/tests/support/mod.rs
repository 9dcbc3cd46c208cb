//! Full-application harness for integration tests.
//!
//! Builds the production handler set over an in-memory contact store, a
//! users file inside a temporary directory and real JWT tokens.

pub mod cluster;

use std::collections::HashMap;
use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test, web};
use mockable::{Clock, DefaultClock, MockEnv};
use serde_json::{Value, json};
use tempfile::TempDir;

use contact_registry::Trace;
use contact_registry::config::AppSettings;
use contact_registry::domain::ports::AccessTokens;
use contact_registry::domain::{AccountService, ContactService, TRACE_ID_HEADER};
use contact_registry::inbound::http::configure_api;
use contact_registry::inbound::http::health::{HealthState, live, ready};
use contact_registry::inbound::http::state::HttpState;
use contact_registry::outbound::memory::InMemoryContactStore;
use contact_registry::outbound::tokens::JwtAccessTokens;
use contact_registry::outbound::users::JsonUserDirectory;
use contact_registry::selector::sheets_authorization;

/// Settings read from `vars` plus file paths inside `dir`.
pub fn settings(dir: &TempDir, vars: &[(&str, &str)]) -> AppSettings {
    let mut values: HashMap<String, String> = vars
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect();
    for (key, file) in [
        ("USERS_FILE", "users.json"),
        ("GOOGLE_SERVICE_ACCOUNT_KEY_FILE", "service-account.json"),
        ("GOOGLE_OAUTH_TOKEN_FILE", "oauth-token.json"),
    ] {
        values
            .entry(key.to_owned())
            .or_insert_with(|| dir.path().join(file).display().to_string());
    }
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| values.get(key).cloned());
    AppSettings::from_env(&env).expect("settings")
}

/// Handler state and the pieces tests inspect.
pub struct TestApp {
    pub state: HttpState,
    pub health: web::Data<HealthState>,
    pub store: Arc<InMemoryContactStore>,
    pub dir: TempDir,
}

impl TestApp {
    /// Application configured from `vars`.
    pub fn with_env(vars: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let settings = settings(&dir, vars);
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let store = Arc::new(InMemoryContactStore::new(clock.clone()));
        let contacts = Arc::new(ContactService::new(store.clone()));
        let tokens: Arc<dyn AccessTokens> = Arc::new(JwtAccessTokens::new(
            settings.jwt_secret.as_bytes(),
            clock.clone(),
        ));
        let accounts = Arc::new(
            AccountService::new(
                Arc::new(JsonUserDirectory::load(settings.users_file.clone())),
                tokens.clone(),
                contacts.clone(),
                clock.clone(),
            )
            .with_registration_open(settings.allow_public_registration),
        );
        let google = sheets_authorization(&settings.google, clock).expect("google adapter");
        let state = HttpState::new(contacts, accounts, tokens, google)
            .with_public_contacts(settings.allow_public_contacts);
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        Self {
            state,
            health,
            store,
            dir,
        }
    }

    /// Application with default settings.
    pub fn new() -> Self {
        Self::with_env(&[])
    }

    /// Initialise the service stack the binary serves.
    pub async fn service(
        &self,
    ) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
        actix_test::init_service(
            App::new()
                .app_data(self.health.clone())
                .app_data(web::Data::new(self.state.clone()))
                .wrap(Trace)
                .service(web::scope("/api").configure(configure_api))
                .service(ready)
                .service(live),
        )
        .await
    }
}

/// Decoded response.
pub struct Reply {
    pub status: StatusCode,
    pub trace_id: Option<String>,
    pub body: Value,
}

/// Send `request`, optionally with a bearer token, and decode the reply.
pub async fn send<S, B>(
    service: &S,
    request: actix_test::TestRequest,
    token: Option<&str>,
) -> Reply
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = match token {
        Some(token) => request.insert_header((AUTHORIZATION, format!("Bearer {token}"))),
        None => request,
    };
    let response = actix_test::call_service(service, request.to_request()).await;
    let status = response.status();
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = actix_test::read_body(response).await;
    Reply {
        status,
        trace_id,
        body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
    }
}

/// Log in and return the bearer token.
pub async fn login<S, B>(service: &S, username: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let reply = send(
        service,
        actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": username, "password": password })),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "login failed: {}", reply.body);
    reply.body["token"].as_str().expect("token").to_owned()
}
