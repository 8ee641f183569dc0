extern crate anyhow;
extern crate serde;
extern crate serde_json;

use anyhow::Context;
use crate::result;
use crate::rtt;

#[derive(Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TIPLOC of the observation point.
    pub station: String,
    pub poll_interval_secs: u64,
    pub connect_retry_secs: u64,
    pub contrast: u8,
    /// Red, green, blue.
    pub backlight_rgb: [u8; 3],
}

impl Default for Config {
    fn default() -> Config {
        return Config{
            station: rtt::DEFAULT_STATION.to_string(),
            poll_interval_secs: 5,
            connect_retry_secs: 2,
            contrast: 50,
            backlight_rgb: [255, 255, 255],
        };
    }
}

pub fn config_from_file<P: AsRef<std::path::Path>>(path: P) -> result::RttDashResult<Config> {
    let debug_path = path.as_ref().to_str().map(|x| x.to_string());
    let file = std::fs::File::open(path)
        .with_context(|| format!("Opening config from '{:?}'", debug_path))?;
    let reader = std::io::BufReader::new(file);
    let config: Config = serde_json::from_reader(reader)
        .with_context(|| format!("while parsing config"))?;
    return Ok(config);
}
