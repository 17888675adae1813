//! Configuration for the digest
//!
//! OAuth credentials are loaded from (in order of priority):
//! 1. Compile-time embedded credentials
//! 2. JSON file in the config directory (Google Cloud Console format)
//! 3. Runtime environment variables
//!
//! Digest settings come from an optional `settings.json` in the config
//! directory; missing fields take their defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::decode::{DecodeOptions, PART_SEPARATOR};
use crate::gmail::GmailClient;

/// Credentials filename in the config directory
const CREDENTIALS_FILE: &str = "google-credentials.json";

/// Settings filename in the config directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Read-only Gmail scope, enough to search and fetch
pub const GMAIL_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/gmail.readonly";

/// OAuth credentials for Gmail API access
#[derive(Debug, Clone)]
pub struct GmailCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Google Cloud Console credential file format
#[derive(Deserialize)]
struct GoogleCredentialFile {
    installed: Option<ClientSection>,
    web: Option<ClientSection>,
}

#[derive(Deserialize)]
struct ClientSection {
    client_id: String,
    client_secret: String,
}

impl GmailCredentials {
    /// Load credentials from the first available source
    pub fn load() -> Result<Self> {
        if let Some(creds) = Self::from_compile_time() {
            return Ok(creds);
        }

        if config::config_exists(CREDENTIALS_FILE) {
            let file: GoogleCredentialFile = config::load_json(CREDENTIALS_FILE)?;
            return Self::from_credential_file(file);
        }

        Self::from_env()
    }

    /// Credentials embedded at build time via GOOGLE_CLIENT_ID / GOOGLE_CLIENT_SECRET
    pub fn from_compile_time() -> Option<Self> {
        let client_id = option_env!("GOOGLE_CLIENT_ID")?;
        let client_secret = option_env!("GOOGLE_CLIENT_SECRET")?;

        if client_id.is_empty() || client_secret.is_empty() {
            return None;
        }

        Some(Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }

    /// Load credentials from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file: GoogleCredentialFile = config::load_json_file(path)?;
        Self::from_credential_file(file)
    }

    /// Parse credentials from JSON (Google Cloud Console format)
    pub fn from_json(json: &str) -> Result<Self> {
        let file: GoogleCredentialFile =
            serde_json::from_str(json).context("Failed to parse credentials JSON")?;
        Self::from_credential_file(file)
    }

    /// Accept both "installed" (desktop) and "web" client types
    fn from_credential_file(file: GoogleCredentialFile) -> Result<Self> {
        let section = file
            .installed
            .or(file.web)
            .context("Credentials file missing 'installed' or 'web' section")?;

        Ok(Self {
            client_id: section.client_id,
            client_secret: section.client_secret,
        })
    }

    /// Load credentials from GMAIL_CLIENT_ID / GMAIL_CLIENT_SECRET
    pub fn from_env() -> Result<Self> {
        let client_id = std::env::var("GMAIL_CLIENT_ID")
            .context("GMAIL_CLIENT_ID environment variable not set")?;
        let client_secret = std::env::var("GMAIL_CLIENT_SECRET")
            .context("GMAIL_CLIENT_SECRET environment variable not set")?;

        Ok(Self {
            client_id,
            client_secret,
        })
    }

    /// Default credentials file path (~/.config/maildigest/google-credentials.json)
    pub fn default_credentials_path() -> Option<PathBuf> {
        config::config_path(CREDENTIALS_FILE)
    }
}

/// Tunable behavior of a digest run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestSettings {
    /// Maximum number of messages to fetch per search
    pub max_results: u32,
    /// Normalize extracted text
    pub normalize: bool,
    /// Separator between texts of different MIME parts
    pub part_separator: String,
    /// OAuth scopes requested during authentication
    pub scopes: Vec<String>,
}

impl Default for DigestSettings {
    fn default() -> Self {
        Self {
            max_results: 10,
            normalize: true,
            part_separator: PART_SEPARATOR.to_string(),
            scopes: vec![GMAIL_READONLY_SCOPE.to_string()],
        }
    }
}

impl DigestSettings {
    /// Load settings from the config directory, or defaults when absent
    pub fn load() -> Result<Self> {
        config::load_json_or_default(SETTINGS_FILE)
    }

    /// Load settings from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        config::load_json_file(path)
    }

    /// `max_results` clamped to what the search API accepts
    pub fn effective_max_results(&self) -> u32 {
        self.max_results.clamp(1, GmailClient::MAX_RESULTS_LIMIT)
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            normalize: self.normalize,
            part_separator: self.part_separator.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_installed_credentials() {
        let json = r#"{
            "installed": {
                "client_id": "test-client-id.apps.googleusercontent.com",
                "client_secret": "test-secret",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": "https://oauth2.googleapis.com/token"
            }
        }"#;

        let creds = GmailCredentials::from_json(json).unwrap();
        assert_eq!(creds.client_id, "test-client-id.apps.googleusercontent.com");
        assert_eq!(creds.client_secret, "test-secret");
    }

    #[test]
    fn test_parse_web_credentials() {
        let json = r#"{"web": {"client_id": "web-id", "client_secret": "web-secret"}}"#;
        let creds = GmailCredentials::from_json(json).unwrap();
        assert_eq!(creds.client_id, "web-id");
    }

    #[test]
    fn test_invalid_credentials_json() {
        assert!(GmailCredentials::from_json(r#"{ "other": {} }"#).is_err());
    }

    #[test]
    fn test_settings_defaults() {
        let settings = DigestSettings::default();
        assert_eq!(settings.max_results, 10);
        assert!(settings.normalize);
        assert_eq!(settings.scopes, vec![GMAIL_READONLY_SCOPE.to_string()]);
        assert_eq!(settings.decode_options(), DecodeOptions::default());
    }

    #[test]
    fn test_settings_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, r#"{"max_results": 50, "normalize": false}"#).unwrap();

        let settings = DigestSettings::from_file(&path).unwrap();
        assert_eq!(settings.max_results, 50);
        assert!(!settings.normalize);
        assert_eq!(settings.part_separator, PART_SEPARATOR);
    }

    #[test]
    fn test_effective_max_results() {
        let mut settings = DigestSettings::default();
        settings.max_results = 0;
        assert_eq!(settings.effective_max_results(), 1);
        settings.max_results = 9000;
        assert_eq!(settings.effective_max_results(), 500);
    }
}
