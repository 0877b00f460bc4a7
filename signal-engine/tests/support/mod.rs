#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use chrono_tz::Asia::Kolkata;
use signal_engine::prelude::*;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Candle source replaying scripted windows; repeats the last one when drained
pub struct ScriptedSource {
    windows: Mutex<VecDeque<Vec<Candle>>>,
    last: Mutex<Vec<Candle>>,
    pub calls: Arc<Mutex<usize>>,
}

impl ScriptedSource {
    pub fn new(windows: Vec<Vec<Candle>>) -> Self {
        Self {
            windows: Mutex::new(windows.into()),
            last: Mutex::new(Vec::new()),
            calls: Arc::new(Mutex::new(0)),
        }
    }
}

#[async_trait]
impl CandleSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch_candles(&self) -> Vec<Candle> {
        *self.calls.lock().unwrap() += 1;
        let mut windows = self.windows.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        if let Some(next) = windows.pop_front() {
            *last = next;
        }
        last.clone()
    }
}

/// Notifier that records every message, optionally failing each delivery
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(message.to_string());
        if self.fail {
            return Err(NotifyError::Delivery("HTTP 502".to_string()));
        }
        Ok(())
    }
}

/// Clock whose sleep advances "now" instantly and records the request
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
    pub sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        let mut now = self.now.lock().unwrap();
        *now = *now + ChronoDuration::from_std(duration).unwrap();
    }
}

/// Exchange-local instant in March 2024 (the 4th is a Monday)
pub fn ist(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Kolkata
        .with_ymd_and_hms(2024, 3, day, hour, minute, 0)
        .unwrap()
        .with_timezone(&Utc)
}

/// Session 09:15–15:15 IST
pub fn sensex_hours() -> MarketHours {
    MarketHours::new(
        Kolkata,
        chrono::NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
        chrono::NaiveTime::from_hms_opt(15, 15, 0).unwrap(),
    )
    .unwrap()
}

/// 5-minute candles from `(low, close)` pairs, starting 09:15 IST Monday
pub fn candles(rows: &[(f64, f64)]) -> Vec<Candle> {
    let start = ist(4, 9, 15);
    rows.iter()
        .enumerate()
        .map(|(i, &(low, close))| {
            Candle::new(
                start + ChronoDuration::minutes(5 * i as i64),
                close,
                close.max(low) + 1.0,
                low,
                close,
            )
        })
        .collect()
}

pub struct Harness {
    pub engine: AlertEngine,
    pub clock: Arc<ManualClock>,
    pub sent: Arc<Mutex<Vec<String>>>,
    pub fetches: Arc<Mutex<usize>>,
}

pub fn harness(source: ScriptedSource, notifier: RecordingNotifier, now: DateTime<Utc>, debug_mode: bool) -> Harness {
    let clock = Arc::new(ManualClock::at(now));
    let sent = notifier.sent.clone();
    let fetches = source.calls.clone();
    let engine = AlertEngine::new(
        Box::new(source),
        Box::new(notifier),
        clock.clone(),
        sensex_hours(),
        ClosedCandleEma::new(5).unwrap(),
        EngineSettings {
            debug_mode,
            ..EngineSettings::default()
        },
    );
    Harness {
        engine,
        clock,
        sent,
        fetches,
    }
}
