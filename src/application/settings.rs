//! Functions for loading launch settings.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::*;

use super::host::Interval;

/// A structure containing configuration data for scheduling the application on
/// the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// The cadence of frames. `0` in serialized form means the natural cadence of host.
    pub interval: Interval,
    /// Keeps the process alive after the registering call returns.
    pub keep_alive: bool,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            interval: Interval::Natural,
            keep_alive: true,
        }
    }
}

impl Params {
    /// Parses params from json text. Missing fields fallback to defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let params = serde_json::from_str(text)?;
        Ok(params)
    }

    /// Loads params from a json file.
    pub fn load<T: AsRef<Path>>(path: T) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)
            .map_err(|err| err_format!("Failed to open {}. {}", path.display(), err))?;

        let mut text = String::new();
        file.read_to_string(&mut text)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String> {
        let text = serde_json::to_string(self)?;
        Ok(text)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;

    #[test]
    fn defaults() {
        let params = Params::from_json("{}").unwrap();
        assert_eq!(params, Params::default());
        assert_eq!(params.interval, Interval::Natural);
        assert!(params.keep_alive);
    }

    #[test]
    fn natural_sentinel_survives() {
        let params = Params::from_json(r#"{ "interval": 0, "keep_alive": true }"#).unwrap();
        assert_eq!(params.interval, Interval::Natural);

        let text = params.to_json().unwrap();
        assert!(text.contains("\"interval\":0"));
    }

    #[test]
    fn fixed() {
        let params = Params::from_json(r#"{ "interval": 33, "keep_alive": false }"#).unwrap();
        assert_eq!(params.interval, Interval::Fixed(Duration::from_millis(33)));
        assert!(!params.keep_alive);
    }

    #[test]
    fn malformed() {
        assert!(Params::from_json(r#"{ "interval": -1 }"#).is_err());
        assert!(Params::from_json("[").is_err());
        assert!(Params::load("this/file/does/not/exist.json").is_err());
    }
}
