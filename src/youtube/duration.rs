//! ISO-8601 durations as the Data API reports them (`PT4M13S`, `P1DT2H`).
use std::sync::OnceLock;

use anyhow::{anyhow, Result};
use regex::Regex;

const DURATION_PATTERN: &str =
    r"^P(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$";

static DURATION_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn duration_re() -> Result<&'static Regex> {
    DURATION_RE
        .get_or_init(|| Regex::new(DURATION_PATTERN))
        .as_ref()
        .map_err(|e| anyhow!("duration pattern: {e}"))
}

/// Parse into total seconds. Years and months are rejected: the API never
/// emits them and they have no fixed length.
pub fn parse_iso8601_seconds(raw: &str) -> Result<f64> {
    let s = raw.trim();
    let caps = duration_re()?
        .captures(s)
        .ok_or_else(|| anyhow!("invalid ISO-8601 duration {raw:?}"))?;
    if s == "P" || s.ends_with('T') {
        return Err(anyhow!("invalid ISO-8601 duration {raw:?}"));
    }

    let units = [7.0 * 86_400.0, 86_400.0, 3_600.0, 60.0, 1.0];
    let mut total = 0.0;
    for (idx, unit) in units.iter().enumerate() {
        if let Some(m) = caps.get(idx + 1) {
            let n: f64 = m
                .as_str()
                .parse()
                .map_err(|e| anyhow!("invalid duration component in {raw:?}: {e}"))?;
            total += n * unit;
        }
    }
    Ok(total)
}

pub fn parse_iso8601_minutes(raw: &str) -> Result<f64> {
    Ok(parse_iso8601_seconds(raw)? / 60.0)
}
