//! Environment-driven application settings.
//!
//! Every setting is read once at startup through [`mockable::Env`] so tests
//! can inject values without touching the process environment. Blank values
//! count as unset.

use std::path::PathBuf;

use mockable::{DefaultEnv, Env};
use tracing::warn;
use zeroize::Zeroizing;

const PORT_ENV: &str = "PORT";
const JWT_SECRET_ENV: &str = "JWT_SECRET";
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const DATABASE_MAX_CONNECTIONS_ENV: &str = "DATABASE_MAX_CONNECTIONS";
const SPREADSHEET_ID_ENV: &str = "GOOGLE_SHEETS_SPREADSHEET_ID";
const SHEET_TITLE_ENV: &str = "GOOGLE_SHEETS_SHEET_TITLE";
const SERVICE_ACCOUNT_JSON_ENV: &str = "GOOGLE_SERVICE_ACCOUNT_KEY_JSON";
const SERVICE_ACCOUNT_FILE_ENV: &str = "GOOGLE_SERVICE_ACCOUNT_KEY_FILE";
const OAUTH_CLIENT_ID_ENV: &str = "GOOGLE_OAUTH_CLIENT_ID";
const OAUTH_CLIENT_SECRET_ENV: &str = "GOOGLE_OAUTH_CLIENT_SECRET";
const OAUTH_REDIRECT_URI_ENV: &str = "GOOGLE_OAUTH_REDIRECT_URI";
const OAUTH_TOKEN_JSON_ENV: &str = "GOOGLE_OAUTH_TOKEN_JSON";
const OAUTH_TOKEN_FILE_ENV: &str = "GOOGLE_OAUTH_TOKEN_FILE";
const USERS_FILE_ENV: &str = "USERS_FILE";
const ALLOW_PUBLIC_CONTACTS_ENV: &str = "ALLOW_PUBLIC_CONTACTS";
const ALLOW_PUBLIC_REGISTRATION_ENV: &str = "ALLOW_PUBLIC_REGISTRATION";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_JWT_SECRET: &str = "dev_secret";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_SHEET_TITLE: &str = "Contacts";
const DEFAULT_SERVICE_ACCOUNT_FILE: &str = "credentials/service-account.json";
const DEFAULT_REDIRECT_URI: &str = "http://localhost:3000/";
const DEFAULT_OAUTH_TOKEN_FILE: &str = "credentials/oauth-token.json";
const DEFAULT_USERS_FILE: &str = "config/users.json";

/// Errors raised while reading settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Table-backed store settings; present only when `DATABASE_URL` is set.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// Connection string.
    pub url: Zeroizing<String>,
    /// Pool size.
    pub max_connections: u32,
}

/// OAuth client registration.
#[derive(Debug, Clone)]
pub struct OAuthClientSettings {
    pub client_id: String,
    pub client_secret: Zeroizing<String>,
}

/// Spreadsheet store and credential settings.
#[derive(Debug, Clone)]
pub struct GoogleSettings {
    /// Target spreadsheet; the sheet store fails per call without it.
    pub spreadsheet_id: Option<String>,
    /// Tab title used in ranges.
    pub sheet_title: String,
    /// Inline service-account key JSON.
    pub service_account_key_json: Option<Zeroizing<String>>,
    /// Service-account key file path.
    pub service_account_key_file: PathBuf,
    /// OAuth client; both id and secret must be set.
    pub oauth_client: Option<OAuthClientSettings>,
    /// Redirect registered with the OAuth client.
    pub oauth_redirect_uri: String,
    /// Inline OAuth token JSON.
    pub oauth_token_json: Option<Zeroizing<String>>,
    /// OAuth token file path; written by the OAuth callback.
    pub oauth_token_file: PathBuf,
}

/// Settings for the whole process.
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// HTTP listen port.
    pub port: u16,
    /// HS256 secret for access tokens.
    pub jwt_secret: Zeroizing<String>,
    /// Present when the table-backed store is selected.
    pub database: Option<DatabaseSettings>,
    pub google: GoogleSettings,
    /// User directory file.
    pub users_file: PathBuf,
    /// Anonymous callers may check and add contacts.
    pub allow_public_contacts: bool,
    /// Self-service registration is open.
    pub allow_public_registration: bool,
}

impl AppSettings {
    /// Read settings from the process environment.
    ///
    /// # Errors
    /// See [`AppSettings::from_env`].
    pub fn from_process_env() -> Result<Self, ConfigError> {
        Self::from_env(&DefaultEnv::new())
    }

    /// Read settings from `env`, applying defaults.
    ///
    /// # Errors
    /// [`ConfigError::InvalidEnv`] for unparsable numeric values.
    ///
    /// # Examples
    /// ```
    /// use contact_registry::config::AppSettings;
    /// use mockable::MockEnv;
    ///
    /// let mut env = MockEnv::new();
    /// env.expect_string().returning(|name| match name {
    ///     "PORT" => Some("8080".to_owned()),
    ///     "JWT_SECRET" => Some("s3cret".to_owned()),
    ///     _ => None,
    /// });
    /// let settings = AppSettings::from_env(&env).expect("valid settings");
    /// assert_eq!(settings.port, 8080);
    /// assert!(settings.database.is_none());
    /// ```
    pub fn from_env<E: Env>(env: &E) -> Result<Self, ConfigError> {
        let port = parse_number(env, PORT_ENV, DEFAULT_PORT, "a TCP port")?;
        let jwt_secret = Zeroizing::new(non_blank(env, JWT_SECRET_ENV).unwrap_or_else(|| {
            warn!("JWT_SECRET not set; using the development secret");
            DEFAULT_JWT_SECRET.to_owned()
        }));
        let database = match non_blank(env, DATABASE_URL_ENV) {
            Some(url) => Some(DatabaseSettings {
                url: Zeroizing::new(url),
                max_connections: parse_number(
                    env,
                    DATABASE_MAX_CONNECTIONS_ENV,
                    DEFAULT_MAX_CONNECTIONS,
                    "a positive integer",
                )?,
            }),
            None => None,
        };

        Ok(Self {
            port,
            jwt_secret,
            database,
            google: google_from_env(env),
            users_file: path_or(env, USERS_FILE_ENV, DEFAULT_USERS_FILE),
            allow_public_contacts: env.string(ALLOW_PUBLIC_CONTACTS_ENV).as_deref() == Some("true"),
            allow_public_registration: env.string(ALLOW_PUBLIC_REGISTRATION_ENV).as_deref()
                != Some("false"),
        })
    }
}

fn google_from_env<E: Env>(env: &E) -> GoogleSettings {
    let oauth_client = match (
        non_blank(env, OAUTH_CLIENT_ID_ENV),
        non_blank(env, OAUTH_CLIENT_SECRET_ENV),
    ) {
        (Some(client_id), Some(client_secret)) => Some(OAuthClientSettings {
            client_id,
            client_secret: Zeroizing::new(client_secret),
        }),
        _ => None,
    };
    GoogleSettings {
        spreadsheet_id: non_blank(env, SPREADSHEET_ID_ENV),
        sheet_title: non_blank(env, SHEET_TITLE_ENV)
            .unwrap_or_else(|| DEFAULT_SHEET_TITLE.to_owned()),
        service_account_key_json: non_blank(env, SERVICE_ACCOUNT_JSON_ENV).map(Zeroizing::new),
        service_account_key_file: path_or(
            env,
            SERVICE_ACCOUNT_FILE_ENV,
            DEFAULT_SERVICE_ACCOUNT_FILE,
        ),
        oauth_client,
        oauth_redirect_uri: non_blank(env, OAUTH_REDIRECT_URI_ENV)
            .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_owned()),
        oauth_token_json: non_blank(env, OAUTH_TOKEN_JSON_ENV).map(Zeroizing::new),
        oauth_token_file: path_or(env, OAUTH_TOKEN_FILE_ENV, DEFAULT_OAUTH_TOKEN_FILE),
    }
}

fn non_blank<E: Env>(env: &E, name: &str) -> Option<String> {
    env.string(name).filter(|value| !value.trim().is_empty())
}

fn path_or<E: Env>(env: &E, name: &str, default: &str) -> PathBuf {
    PathBuf::from(non_blank(env, name).unwrap_or_else(|| default.to_owned()))
}

fn parse_number<E, T>(
    env: &E,
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError>
where
    E: Env,
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(raw) = non_blank(env, name) else {
        return Ok(default);
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(ConfigError::InvalidEnv {
            name,
            value: raw,
            expected,
        }),
    }
}
