use chrono::NaiveTime;
use chrono_tz::Tz;
use dotenv::dotenv;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CANDLE_API_URL: &str = "https://api.upstox.com/v2/market/candle/intraday";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name}: unknown time zone `{value}`")]
    InvalidTimezone { name: &'static str, value: String },

    #[error("{name}: expected HH:MM, got `{value}`")]
    InvalidTime { name: &'static str, value: String },

    #[error("{name} must be at least {min}, got {value}")]
    OutOfRange { name: &'static str, value: u64, min: u64 },

    #[error("MARKET_OPEN ({open}) must be before MARKET_CLOSE ({close})")]
    InvertedSession { open: String, close: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub access_token: Option<String>,
    pub api_key: Option<String>,
    pub candle_api_url: String,
    pub instrument_key: String,
    pub instrument_name: String,
    pub candle_interval: String,
    pub candle_window: usize,
    pub ema_period: usize,
    pub poll_interval: Duration,
    pub http_timeout: Duration,
    pub market_tz: Tz,
    pub market_open: NaiveTime,
    pub market_close: NaiveTime,
    pub debug_mode: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup; unset and blank values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let str_or = |name: &str, default: &str| get(name).unwrap_or_else(|| default.to_string());
        let u64_or = |name: &str, default: u64| {
            get(name).and_then(|v| v.parse().ok()).unwrap_or(default)
        };

        let market_tz = match get("MARKET_TZ") {
            Some(value) => value
                .parse::<Tz>()
                .map_err(|_| ConfigError::InvalidTimezone { name: "MARKET_TZ", value })?,
            None => chrono_tz::Asia::Kolkata,
        };
        let market_open = parse_hhmm("MARKET_OPEN", &str_or("MARKET_OPEN", "09:15"))?;
        let market_close = parse_hhmm("MARKET_CLOSE", &str_or("MARKET_CLOSE", "15:15"))?;
        if market_open >= market_close {
            return Err(ConfigError::InvertedSession {
                open: market_open.format("%H:%M").to_string(),
                close: market_close.format("%H:%M").to_string(),
            });
        }

        let ema_period = u64_or("EMA_PERIOD", 5);
        if ema_period < 1 {
            return Err(ConfigError::OutOfRange { name: "EMA_PERIOD", value: ema_period, min: 1 });
        }
        let poll_secs = u64_or("POLL_INTERVAL_SECS", 300);
        if poll_secs < 1 {
            return Err(ConfigError::OutOfRange { name: "POLL_INTERVAL_SECS", value: poll_secs, min: 1 });
        }
        let timeout_secs = u64_or("HTTP_TIMEOUT_SECS", 10);
        if timeout_secs < 1 {
            return Err(ConfigError::OutOfRange { name: "HTTP_TIMEOUT_SECS", value: timeout_secs, min: 1 });
        }
        // the window always holds the EMA period plus the forming candle
        let candle_window = u64_or("CANDLE_WINDOW", 10).max(ema_period + 1);

        Ok(Config {
            telegram_token: get("TELEGRAM_TOKEN"),
            telegram_chat_id: get("TELEGRAM_CHAT_ID"),
            access_token: get("UPSTOX_ACCESS_TOKEN"),
            api_key: get("UPSTOX_API_KEY"),
            candle_api_url: str_or("CANDLE_API_URL", DEFAULT_CANDLE_API_URL),
            instrument_key: str_or("INSTRUMENT_KEY", "BSE_INDEX|SENSEX"),
            instrument_name: str_or("INSTRUMENT_NAME", "SENSEX"),
            candle_interval: str_or("CANDLE_INTERVAL", "5minute"),
            candle_window: candle_window as usize,
            ema_period: ema_period as usize,
            poll_interval: Duration::from_secs(poll_secs),
            http_timeout: Duration::from_secs(timeout_secs),
            market_tz,
            market_open,
            market_close,
            debug_mode: get("DEBUG_MODE")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
                .unwrap_or(false),
        })
    }

    /// Bot token and chat id, when both are present
    pub fn telegram_credentials(&self) -> Option<(&str, &str)> {
        match (&self.telegram_token, &self.telegram_chat_id) {
            (Some(token), Some(chat_id)) => Some((token.as_str(), chat_id.as_str())),
            _ => None,
        }
    }

    /// Names of the notifier variables that are unset
    pub fn missing_telegram_vars(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.telegram_token.is_none() {
            missing.push("TELEGRAM_TOKEN");
        }
        if self.telegram_chat_id.is_none() {
            missing.push("TELEGRAM_CHAT_ID");
        }
        missing
    }
}

fn parse_hhmm(name: &'static str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| ConfigError::InvalidTime {
        name,
        value: value.to_string(),
    })
}
