// SPDX-License-Identifier: MIT
//
// Runtime configuration.
//
// No flags, no files: a handful of environment variables read once at
// start-up. A value that doesn't parse keeps the default and is remembered
// in `rejected`, so it can be logged once logging exists (the log file is
// itself configured here).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const TICK_VAR: &str = "N_SNOW_TICK_MS";
pub const SEED_VAR: &str = "N_SNOW_SEED";
pub const AUTO_VAR: &str = "N_SNOW_AUTO";
pub const LOG_VAR: &str = "N_SNOW_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// How long each tick waits for a key. This is the frame clock.
    pub tick: Duration,
    /// Fixed seed; `None` seeds from the clock.
    pub seed: Option<u32>,
    /// Start with auto-snow on.
    pub auto_spawn: bool,
    /// Where logs go; `None` disables logging.
    pub log_file: Option<PathBuf>,
    /// `(variable, value)` pairs that were set but couldn't be used.
    pub rejected: Vec<(&'static str, String)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(100),
            seed: None,
            auto_spawn: false,
            log_file: None,
            rejected: Vec::new(),
        }
    }
}

impl Config {
    /// Read the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(TICK_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.tick = Duration::from_millis(ms),
                _ => config.rejected.push((TICK_VAR, raw)),
            }
        }

        if let Some(raw) = lookup(SEED_VAR) {
            match raw.trim().parse::<u32>() {
                Ok(seed) => config.seed = Some(seed),
                Err(_) => config.rejected.push((SEED_VAR, raw)),
            }
        }

        if let Some(raw) = lookup(AUTO_VAR) {
            match parse_flag(&raw) {
                Some(on) => config.auto_spawn = on,
                None => config.rejected.push((AUTO_VAR, raw)),
            }
        }

        config.log_file = lookup(LOG_VAR)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        config
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    let v = raw.trim();
    if v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("on") {
        Some(true)
    } else if v == "0" || v.eq_ignore_ascii_case("false") || v.eq_ignore_ascii_case("off") {
        Some(false)
    } else {
        None
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn empty_environment_is_default() {
        assert_eq!(config_from(&[]), Config::default());
    }

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.tick, Duration::from_millis(100));
        assert_eq!(c.seed, None);
        assert!(!c.auto_spawn);
        assert_eq!(c.log_file, None);
    }

    #[test]
    fn every_variable_is_read() {
        let c = config_from(&[
            (TICK_VAR, "50"),
            (SEED_VAR, "1234"),
            (AUTO_VAR, "on"),
            (LOG_VAR, "/tmp/snow.log"),
        ]);
        assert_eq!(c.tick, Duration::from_millis(50));
        assert_eq!(c.seed, Some(1234));
        assert!(c.auto_spawn);
        assert_eq!(c.log_file, Some(PathBuf::from("/tmp/snow.log")));
        assert!(c.rejected.is_empty());
    }

    #[test]
    fn bad_values_keep_defaults() {
        let c = config_from(&[(TICK_VAR, "fast"), (SEED_VAR, "-1"), (AUTO_VAR, "maybe")]);
        assert_eq!(c.tick, Duration::from_millis(100));
        assert_eq!(c.seed, None);
        assert!(!c.auto_spawn);
        assert_eq!(
            c.rejected,
            vec![
                (TICK_VAR, "fast".to_string()),
                (SEED_VAR, "-1".to_string()),
                (AUTO_VAR, "maybe".to_string()),
            ]
        );
    }

    #[test]
    fn zero_tick_is_rejected() {
        let c = config_from(&[(TICK_VAR, "0")]);
        assert_eq!(c.tick, Duration::from_millis(100));
        assert_eq!(c.rejected.len(), 1);
    }

    #[test]
    fn flag_spellings() {
        for on in ["1", "true", "TRUE", "on", " On "] {
            assert_eq!(parse_flag(on), Some(true), "{on:?}");
        }
        for off in ["0", "false", "off"] {
            assert_eq!(parse_flag(off), Some(false), "{off:?}");
        }
        assert_eq!(parse_flag("yes please"), None);
    }

    #[test]
    fn blank_log_path_disables_logging() {
        assert_eq!(config_from(&[(LOG_VAR, "  ")]).log_file, None);
    }
}
