use serde::Serialize;

use crate::utils::{
    BROWSER_GEOLOCATION, BROWSER_LOCALE, BROWSER_TIMEZONE, VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
};

/// Consumer-browser identity presented by the automated browser
///
/// Serialized verbatim into the stealth script, so field names are the
/// camelCase keys the script reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fingerprint {
    pub accept_language: String,
    pub platform: String,
    pub language: String,
    pub languages: Vec<String>,
    pub screen_width: u32,
    pub screen_height: u32,
    pub webgl_vendor: String,
    pub webgl_renderer: String,
    pub hardware_concurrency: u32,
    pub timezone: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Hex seed of the canvas noise, fresh per browser session
    pub session_seed: String,
}

impl Default for Fingerprint {
    fn default() -> Self {
        let (latitude, longitude) = BROWSER_GEOLOCATION;
        Self {
            accept_language: "en-US,en;q=0.9".to_string(),
            platform: "Win32".to_string(),
            language: BROWSER_LOCALE.to_string(),
            languages: vec![BROWSER_LOCALE.to_string(), "en".to_string()],
            screen_width: VIEWPORT_WIDTH,
            screen_height: VIEWPORT_HEIGHT,
            webgl_vendor: "Intel Inc.".to_string(),
            webgl_renderer: "Intel(R) UHD Graphics".to_string(),
            hardware_concurrency: 8,
            timezone: BROWSER_TIMEZONE.to_string(),
            latitude,
            longitude,
            session_seed: new_session_seed(),
        }
    }
}

fn new_session_seed() -> String {
    let seed: [u8; 16] = rand::random();
    hex::encode(seed)
}
