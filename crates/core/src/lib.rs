pub mod domain;
pub mod ingest;
pub mod pagination;
pub mod render;
pub mod time;

pub mod config {
    use anyhow::Context;
    use std::fmt;

    pub const DEFAULT_NASA_BASE_URL: &str = "https://api.nasa.gov";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub nasa_api_key: Option<String>,
        pub nasa_base_url: Option<String>,
        pub nasa_timeout_secs: Option<u64>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let nasa_timeout_secs = match std::env::var("NASA_TIMEOUT_SECS") {
                Ok(v) => Some(
                    v.trim()
                        .parse::<u64>()
                        .with_context(|| format!("NASA_TIMEOUT_SECS is not a number: {v}"))?,
                ),
                Err(_) => None,
            };

            Ok(Self {
                nasa_api_key: std::env::var("NASA_API_KEY").ok(),
                nasa_base_url: std::env::var("NASA_API_BASE_URL").ok(),
                nasa_timeout_secs,
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_nasa_api_key(&self) -> anyhow::Result<ApiKey> {
            let raw = self
                .nasa_api_key
                .as_deref()
                .context("NASA_API_KEY is required")?;
            ApiKey::new(raw)
        }

        pub fn nasa_base_url(&self) -> &str {
            self.nasa_base_url
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_NASA_BASE_URL)
        }

        pub fn nasa_timeout_secs(&self) -> u64 {
            self.nasa_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
        }
    }

    /// A validated, non-empty NASA API key.
    ///
    /// `Debug` is redacted so the key never reaches logs.
    #[derive(Clone, PartialEq, Eq)]
    pub struct ApiKey(String);

    impl ApiKey {
        pub fn new(raw: &str) -> anyhow::Result<Self> {
            let key = raw.trim();
            anyhow::ensure!(!key.is_empty(), "NASA_API_KEY must be non-empty");
            Ok(Self(key.to_string()))
        }

        pub fn expose(&self) -> &str {
            &self.0
        }
    }

    impl fmt::Debug for ApiKey {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("ApiKey(***)")
        }
    }

}
