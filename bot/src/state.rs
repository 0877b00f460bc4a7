use crate::services::TelegramNotifier;
use shared::Config;
use signal_engine::prelude::*;
use std::sync::Arc;

/// Process-wide wiring built once at startup
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub fn new() -> Result<Self, anyhow::Error> {
        let config = Config::from_env()?;
        tracing::info!(
            "Configuration loaded: {} ({}) every {}s, EMA{}, debug_mode={}",
            config.instrument_name,
            config.instrument_key,
            config.poll_interval.as_secs(),
            config.ema_period,
            config.debug_mode
        );
        if config.access_token.is_none() {
            tracing::warn!("UPSTOX_ACCESS_TOKEN not set, candle requests will be unauthenticated");
        }
        Ok(AppState { config })
    }

    /// Assemble the polling engine from configuration
    pub fn build_engine(&self) -> Result<AlertEngine, anyhow::Error> {
        let config = &self.config;

        let source = HttpCandleSource::new(CandleRequest {
            url: config.candle_api_url.clone(),
            instrument_key: config.instrument_key.clone(),
            interval: config.candle_interval.clone(),
            access_token: config.access_token.clone(),
            api_key: config.api_key.clone(),
            window: config.candle_window,
            timeout: config.http_timeout,
            timezone: config.market_tz,
        })?;
        let hours = MarketHours::new(config.market_tz, config.market_open, config.market_close)?;
        let ema = ClosedCandleEma::new(config.ema_period)?;

        Ok(AlertEngine::new(
            Box::new(source),
            self.build_notifier(),
            Arc::new(SystemClock),
            hours,
            ema,
            EngineSettings {
                instrument_name: config.instrument_name.clone(),
                poll_interval: config.poll_interval,
                debug_mode: config.debug_mode,
            },
        ))
    }

    /// Telegram when credentials are present, otherwise a logging no-op
    fn build_notifier(&self) -> Box<dyn Notifier> {
        let Some((token, chat_id)) = self.config.telegram_credentials() else {
            let missing = self.config.missing_telegram_vars().join(", ");
            tracing::warn!("{} not set, alerts will only be logged", missing);
            return Box::new(DisabledNotifier::new(format!("{} not set", missing)));
        };

        match TelegramNotifier::new(token, chat_id, self.config.http_timeout) {
            Ok(notifier) => Box::new(notifier),
            Err(e) => {
                tracing::warn!("Telegram notifier unavailable, alerts will only be logged: {}", e);
                Box::new(DisabledNotifier::new(e.to_string()))
            }
        }
    }
}
