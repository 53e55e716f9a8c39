//! # Player Configuration
//!
//! Options accepted when the player is first created and per `play` call.
//! Both deserialize from the camelCase shapes JavaScript callers pass
//! (`{ baseUrl, volumn }`, `{ loop, volumn }`).

use serde::{Deserialize, Serialize};

/// Player-wide options.
///
/// `volumn` keeps the historical spelling of the public option name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerOptions {
    /// Prefix joined to every filename with `/`. Empty means filenames are
    /// used as URLs verbatim.
    #[serde(default)]
    pub base_url: String,

    /// Default volume for `play` calls without an override.
    #[serde(default = "default_volumn")]
    pub volumn: f32,

    /// Treat non-2xx responses as request failures.
    #[serde(default = "default_reject_http_errors")]
    pub reject_http_errors: bool,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            volumn: default_volumn(),
            reject_http_errors: default_reject_http_errors(),
        }
    }
}

impl PlayerOptions {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_volumn(mut self, volumn: f32) -> Self {
        self.volumn = volumn;
        self
    }

    pub fn with_reject_http_errors(mut self, reject: bool) -> Self {
        self.reject_http_errors = reject;
        self
    }

    /// Validate the options.
    pub fn validate(&self) -> Result<(), String> {
        if !self.volumn.is_finite() || !(0.0..=1.0).contains(&self.volumn) {
            return Err(format!(
                "volumn must be between 0.0 and 1.0, got {}",
                self.volumn
            ));
        }
        Ok(())
    }

    /// URL fetched for `filename`.
    pub fn asset_url(&self, filename: &str) -> String {
        if self.base_url.is_empty() {
            filename.to_string()
        } else {
            format!("{}/{}", self.base_url, filename)
        }
    }
}

fn default_volumn() -> f32 {
    1.0
}

fn default_reject_http_errors() -> bool {
    true
}

/// Options for a single `play` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayOptions {
    /// Repeat the buffer until stopped.
    #[serde(rename = "loop", default)]
    pub looping: bool,

    /// Volume override; `None` falls back to [`PlayerOptions::volumn`].
    #[serde(default)]
    pub volumn: Option<f32>,
}

impl PlayOptions {
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_volumn(mut self, volumn: f32) -> Self {
        self.volumn = Some(volumn);
        self
    }

    /// Volume to apply, honouring an explicit zero.
    pub fn resolve_volumn(&self, default: f32) -> f32 {
        self.volumn.unwrap_or(default)
    }
}
