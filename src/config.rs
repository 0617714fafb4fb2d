use std::env;
use std::net::SocketAddr;

use chrono::Duration;

use crate::error::{config_error, Error};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_SESSION_TTL_SECS: i64 = 8 * 60 * 60;

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the remote load-board REST service.
    pub api_base: String,
    pub bind_addr: SocketAddr,
    /// Idle time after which a session is dropped.
    pub session_ttl: Duration,
}

impl Config {
    /// Reads `LOADBOARD_API_BASE`, `LOADBOARD_BIND_ADDR` and
    /// `LOADBOARD_SESSION_TTL_SECS`, after loading a `.env` file if one
    /// exists.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        Self::build(
            Some(env::var("LOADBOARD_API_BASE")?),
            env::var("LOADBOARD_BIND_ADDR").ok(),
            env::var("LOADBOARD_SESSION_TTL_SECS").ok(),
        )
    }

    fn build(
        api_base: Option<String>,
        bind_addr: Option<String>,
        session_ttl: Option<String>,
    ) -> Result<Self, Error> {
        let api_base = api_base
            .filter(|x| !x.trim().is_empty())
            .ok_or_else(|| config_error("LOADBOARD_API_BASE must be set"))?;

        let bind_addr = match bind_addr {
            Some(raw) => raw
                .parse()
                .map_err(|_| config_error(format!("{} is not a socket address", raw)))?,
            None => {
                tracing::info!("LOADBOARD_BIND_ADDR not set, using default: {}", DEFAULT_BIND_ADDR);
                DEFAULT_BIND_ADDR
                    .parse()
                    .map_err(|_| config_error("invalid default bind address"))?
            }
        };

        let ttl_secs = match session_ttl {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    config_error(format!("{} is not a positive number of seconds", raw))
                })?,
            None => DEFAULT_SESSION_TTL_SECS,
        };

        Ok(Self {
            api_base,
            bind_addr,
            session_ttl: Duration::seconds(ttl_secs),
        })
    }
}

#[test]
fn build_config_test() {
    let config = Config::build(Some("http://api.test".into()), None, None).unwrap();
    assert_eq!(config.api_base, "http://api.test");
    assert_eq!(config.bind_addr.port(), 3000);
    assert_eq!(config.session_ttl, Duration::hours(8));

    let config = Config::build(
        Some("http://api.test".into()),
        Some("0.0.0.0:8080".into()),
        Some("900".into()),
    )
    .unwrap();
    assert_eq!(config.bind_addr.port(), 8080);
    assert_eq!(config.session_ttl, Duration::minutes(15));

    assert!(Config::build(None, None, None).is_err());
    assert!(Config::build(Some(" ".into()), None, None).is_err());
    assert!(Config::build(Some("http://api.test".into()), Some("nope".into()), None).is_err());
    assert!(Config::build(Some("http://api.test".into()), None, Some("0".into())).is_err());
    assert!(Config::build(Some("http://api.test".into()), None, Some("soon".into())).is_err());
}
