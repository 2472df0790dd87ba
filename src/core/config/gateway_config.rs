// Gateway configuration - everything the service reads from the environment.
//
// Parsing goes through a lookup closure instead of `std::env` directly, so the
// same code path is used by `main` and by the tests below.

use lazy_static::lazy_static;
use regex::Regex;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8088;
pub const DEFAULT_BLOCK_THRESHOLD: f64 = 0.80;
pub const DEFAULT_REVIEW_THRESHOLD: f64 = 0.45;
const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";
const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_HF_MODEL: &str = "google/flan-t5-small";
const DEFAULT_HF_BASE_URL: &str = "https://api-inference.huggingface.co/models";
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 15;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z0-9_]+$").unwrap();
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be a number, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key} must only contain letters, digits and underscores, got {value:?}")]
    InvalidIdentifier { key: &'static str, value: String },
}

/// Credentials and model for the primary chat-completion provider.
#[derive(Debug, Clone)]
pub struct GroqSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

/// Credentials and model for the secondary text-generation provider.
#[derive(Debug, Clone)]
pub struct HuggingFaceSettings {
    pub api_token: String,
    pub model: String,
    pub base_url: String,
}

/// Where blocked events are persisted.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub uri: String,
    pub name: String,
    pub collection: String,
}

impl DatabaseSettings {
    /// Table holding the audit collection, namespaced by the database name.
    pub fn table_name(&self) -> String {
        format!("{}_{}", self.name, self.collection)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind_addr: String,
    pub port: u16,
    pub groq: Option<GroqSettings>,
    pub huggingface: Option<HuggingFaceSettings>,
    pub provider_timeout: Duration,
    pub database: Option<DatabaseSettings>,
    pub mock_mode: bool,
    pub block_threshold: f64,
    pub review_threshold: f64,
    pub cors_origins: CorsOrigins,
    pub expose_debug_env: bool,
}

impl GatewayConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key/value source.
    ///
    /// Empty values count as unset, so `GROQ_API_KEY=` in a `.env` file
    /// disables the provider instead of sending an empty bearer token.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT").or_else(|| get("RENDER_PORT")) {
            Some(raw) => parse_number::<u16>("PORT", &raw)?,
            None => DEFAULT_PORT,
        };

        let groq = get("GROQ_API_KEY").map(|api_key| GroqSettings {
            api_key,
            model: get("GROQ_MODEL").unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
            base_url: get("GROQ_BASE_URL").unwrap_or_else(|| DEFAULT_GROQ_BASE_URL.to_string()),
        });

        let huggingface = get("HF_API_TOKEN").map(|api_token| HuggingFaceSettings {
            api_token,
            model: get("HF_MODEL").unwrap_or_else(|| DEFAULT_HF_MODEL.to_string()),
            base_url: get("HF_BASE_URL").unwrap_or_else(|| DEFAULT_HF_BASE_URL.to_string()),
        });

        let provider_timeout = match get("PROVIDER_TIMEOUT_SECS") {
            // A zero timeout would fail every provider call instantly.
            Some(raw) => match parse_number::<u64>("PROVIDER_TIMEOUT_SECS", &raw)? {
                0 => {
                    return Err(ConfigError::InvalidNumber {
                        key: "PROVIDER_TIMEOUT_SECS",
                        value: raw,
                    })
                }
                secs => Duration::from_secs(secs),
            },
            None => Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
        };

        let database = match get("DATABASE_URI").or_else(|| get("DATABASE_URL")) {
            Some(uri) => {
                let name = get("DATABASE_NAME").unwrap_or_else(|| "textsense".to_string());
                let collection =
                    get("DATABASE_COLLECTION").unwrap_or_else(|| "serve_logs".to_string());
                check_identifier("DATABASE_NAME", &name)?;
                check_identifier("DATABASE_COLLECTION", &collection)?;
                Some(DatabaseSettings {
                    uri,
                    name,
                    collection,
                })
            }
            None => None,
        };

        let block_threshold = match get("BLOCK_THRESHOLD") {
            Some(raw) => parse_number::<f64>("BLOCK_THRESHOLD", &raw)?,
            None => DEFAULT_BLOCK_THRESHOLD,
        };
        let review_threshold = match get("REVIEW_THRESHOLD") {
            Some(raw) => parse_number::<f64>("REVIEW_THRESHOLD", &raw)?,
            None => DEFAULT_REVIEW_THRESHOLD,
        };

        let cors_origins = match get("CORS_ALLOW_ORIGINS") {
            Some(raw) if raw.trim() != "*" => CorsOrigins::List(
                raw.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect(),
            ),
            _ => CorsOrigins::Any,
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            groq,
            huggingface,
            provider_timeout,
            database,
            mock_mode: get("MOCK_MODE").map(|v| parse_flag(&v)).unwrap_or(false),
            block_threshold,
            review_threshold,
            cors_origins,
            expose_debug_env: get("EXPOSE_DEBUG_ENV")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: raw.to_string(),
    })
}

fn check_identifier(key: &'static str, value: &str) -> Result<(), ConfigError> {
    if IDENTIFIER.is_match(value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidIdentifier {
            key,
            value: value.to_string(),
        })
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Shortens a connection string to its first and last `keep` characters.
///
/// Anything too short to hide its middle is masked entirely.
pub fn mask_uri(uri: Option<&str>, keep: usize) -> Option<String> {
    let uri = uri.filter(|u| !u.is_empty())?;
    let chars: Vec<char> = uri.chars().collect();
    if chars.len() <= keep * 2 {
        return Some("***".to_string());
    }
    let head: String = chars[..keep].iter().collect();
    let tail: String = chars[chars.len() - keep..].iter().collect();
    Some(format!("{}...{}", head, tail))
}
