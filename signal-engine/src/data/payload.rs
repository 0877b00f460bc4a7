//! Vendor payload normalization
//!
//! Every supported vendor returns JSON with a list of candles, but the list
//! lives in different places and the rows come in two shapes:
//!
//! - positional arrays: `[ts, open, high, low, close, volume, ...]`
//! - keyed objects: `{"time": ..., "open": ..., "high": ..., "low": ..., "close": ...}`
//!
//! [`parse_candles`] folds both into [`Candle`]. Prices may be numbers or
//! numeric strings. Timestamps may be RFC 3339, naive local date-times (read
//! in the exchange zone), or epoch seconds/milliseconds.

use crate::data::{Candle, CandleSeries};
use crate::error::FetchError;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::Value;

/// Epoch values above this are milliseconds (year ~5138 in seconds).
const EPOCH_MILLIS_THRESHOLD: u64 = 100_000_000_000;

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a vendor response body into candles sorted oldest to newest.
///
/// Fails on the first malformed row; a partial window would silently shift
/// the EMA alignment.
pub fn parse_candles(body: &Value, tz: Tz) -> Result<CandleSeries, FetchError> {
    let rows = locate_rows(body)
        .ok_or_else(|| FetchError::Payload("no candle list found in response".to_string()))?;

    let candles = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            parse_row(row, tz).map_err(|reason| FetchError::Row { index, reason })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CandleSeries::from_vec(candles))
}

/// Find the candle array: `data.candles`, `data`, `candles`, or the root.
fn locate_rows(body: &Value) -> Option<&Vec<Value>> {
    if let Some(data) = body.get("data") {
        if let Some(rows) = data.get("candles").and_then(Value::as_array) {
            return Some(rows);
        }
        if let Some(rows) = data.as_array() {
            return Some(rows);
        }
    }
    if let Some(rows) = body.get("candles").and_then(Value::as_array) {
        return Some(rows);
    }
    body.as_array()
}

fn parse_row(row: &Value, tz: Tz) -> Result<Candle, String> {
    match row {
        Value::Array(fields) => {
            if fields.len() < 5 {
                return Err(format!("expected at least 5 fields, got {}", fields.len()));
            }
            let mut candle = Candle::new(
                parse_timestamp(&fields[0], tz)?,
                parse_price(&fields[1], "open")?,
                parse_price(&fields[2], "high")?,
                parse_price(&fields[3], "low")?,
                parse_price(&fields[4], "close")?,
            );
            candle.volume = parse_volume(fields.get(5))?;
            Ok(candle)
        }
        Value::Object(map) => {
            let field = |name: &'static str| {
                map.get(name).ok_or_else(|| format!("missing field `{}`", name))
            };
            let ts = map
                .get("time")
                .or_else(|| map.get("timestamp"))
                .ok_or_else(|| "missing field `time`".to_string())?;
            let mut candle = Candle::new(
                parse_timestamp(ts, tz)?,
                parse_price(field("open")?, "open")?,
                parse_price(field("high")?, "high")?,
                parse_price(field("low")?, "low")?,
                parse_price(field("close")?, "close")?,
            );
            candle.volume = parse_volume(map.get("volume"))?;
            Ok(candle)
        }
        other => Err(format!("unsupported row shape: {}", other)),
    }
}

fn parse_price(value: &Value, field: &str) -> Result<f64, String> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(format!("invalid {} value: {}", field, value)),
    }
}

fn parse_volume(value: Option<&Value>) -> Result<Option<f64>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => parse_price(v, "volume").map(Some),
    }
}

fn parse_timestamp(value: &Value, tz: Tz) -> Result<DateTime<Utc>, String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(from_epoch)
            .ok_or_else(|| format!("invalid epoch timestamp: {}", n)),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Ok(dt.with_timezone(&Utc));
            }
            for format in NAIVE_FORMATS {
                if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                    return tz
                        .from_local_datetime(&naive)
                        .earliest()
                        .map(|local| local.with_timezone(&Utc))
                        .ok_or_else(|| format!("nonexistent local time: {}", s));
                }
            }
            s.parse::<i64>()
                .ok()
                .and_then(from_epoch)
                .ok_or_else(|| format!("unrecognised timestamp: {}", s))
        }
        other => Err(format!("invalid timestamp: {}", other)),
    }
}

fn from_epoch(raw: i64) -> Option<DateTime<Utc>> {
    if raw.unsigned_abs() > EPOCH_MILLIS_THRESHOLD {
        Utc.timestamp_millis_opt(raw).single()
    } else {
        Utc.timestamp_opt(raw, 0).single()
    }
}
