//! Main settings module

use config::{Config, Environment};
use serde::Deserialize;

use crate::ConfigError;

/// Barge-in threshold bounds: below 3 chars one-syllable noise recognitions
/// trigger it, above 5 real interruptions get missed.
const BARGE_IN_MIN: usize = 3;
const BARGE_IN_MAX: usize = 5;

/// Application settings, one field per environment variable.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Runtime profile; `production` switches logs to JSON.
    #[serde(default = "default_env")]
    pub env: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Port the primary gRPC surface listens on.
    #[serde(rename = "callflow_grpc_port", default = "default_grpc_port")]
    pub grpc_port: u16,

    /// Port the HTTP health endpoint listens on.
    #[serde(rename = "callflow_http_port", default = "default_http_port")]
    pub http_port: u16,

    /// mTLS material. The variables are mandatory; the files may be missing
    /// on disk, which downgrades the transport to plaintext.
    #[serde(rename = "callflow_cert_path", default)]
    pub cert_path: String,
    #[serde(rename = "callflow_key_path", default)]
    pub key_path: String,
    #[serde(rename = "grpc_tls_ca_path", default)]
    pub tls_ca_path: String,

    /// Upstream targets, `host:port` after scheme stripping.
    #[serde(rename = "media_service_target_grpc_url", default = "default_media_url")]
    pub media_url: String,
    #[serde(rename = "stt_gateway_target_grpc_url", default = "default_stt_url")]
    pub stt_url: String,
    #[serde(rename = "tts_gateway_target_grpc_url", default = "default_tts_url")]
    pub tts_url: String,
    #[serde(rename = "dialog_service_target_grpc_url", default = "default_dialog_url")]
    pub dialog_url: String,
    #[serde(rename = "sip_signaling_target_grpc_url", default = "default_sip_url")]
    pub sip_url: String,

    /// Target PCM sample rate (Hz) for both capture and synthesis.
    #[serde(default = "default_sample_rate")]
    pub pipeline_sample_rate: u32,

    /// Minimum trimmed-partial length (chars) that counts as barge-in.
    #[serde(default = "default_barge_in_min_chars")]
    pub barge_in_min_chars: usize,

    /// Pre-recorded announcement played when the TTS gateway is down.
    #[serde(default = "default_fallback_audio_path")]
    pub fallback_audio_path: String,

    /// Voice used for pipeline synthesis (SpeakText callers supply their own).
    #[serde(default = "default_tts_voice")]
    pub default_tts_voice: String,
}

fn default_env() -> String {
    "production".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_grpc_port() -> u16 {
    13111
}

fn default_http_port() -> u16 {
    13110
}

fn default_media_url() -> String {
    "media-service:13031".to_string()
}

fn default_stt_url() -> String {
    "stt-gateway-service:15021".to_string()
}

fn default_tts_url() -> String {
    "tts-gateway-service:14011".to_string()
}

fn default_dialog_url() -> String {
    "dialog-service:12061".to_string()
}

fn default_sip_url() -> String {
    "sip-signaling-service:13021".to_string()
}

fn default_sample_rate() -> u32 {
    16000
}

fn default_barge_in_min_chars() -> usize {
    BARGE_IN_MIN
}

fn default_fallback_audio_path() -> String {
    "assets/audio/technical_difficulty.wav".to_string()
}

fn default_tts_voice() -> String {
    "coqui:default".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            env: default_env(),
            log_level: default_log_level(),
            grpc_port: default_grpc_port(),
            http_port: default_http_port(),
            cert_path: String::new(),
            key_path: String::new(),
            tls_ca_path: String::new(),
            media_url: default_media_url(),
            stt_url: default_stt_url(),
            tts_url: default_tts_url(),
            dialog_url: default_dialog_url(),
            sip_url: default_sip_url(),
            pipeline_sample_rate: default_sample_rate(),
            barge_in_min_chars: default_barge_in_min_chars(),
            fallback_audio_path: default_fallback_audio_path(),
            default_tts_voice: default_tts_voice(),
        }
    }
}

impl Settings {
    /// Load from the process environment, normalize and validate.
    pub fn load() -> Result<Self, ConfigError> {
        let cfg = Config::builder()
            .add_source(Environment::default().try_parsing(true))
            .build()?;

        let mut settings: Settings = cfg.try_deserialize()?;
        settings.normalize();
        settings.validate()?;
        Ok(settings)
    }

    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }

    /// Strip URL schemes and clamp tunables into their valid ranges.
    fn normalize(&mut self) {
        for url in [
            &mut self.media_url,
            &mut self.stt_url,
            &mut self.tts_url,
            &mut self.dialog_url,
            &mut self.sip_url,
        ] {
            *url = strip_scheme(url).to_string();
        }
        self.barge_in_min_chars = self.barge_in_min_chars.clamp(BARGE_IN_MIN, BARGE_IN_MAX);
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.cert_path.is_empty() {
            return Err(ConfigError::MissingVar("CALLFLOW_CERT_PATH"));
        }
        if self.key_path.is_empty() {
            return Err(ConfigError::MissingVar("CALLFLOW_KEY_PATH"));
        }
        if self.tls_ca_path.is_empty() {
            return Err(ConfigError::MissingVar("GRPC_TLS_CA_PATH"));
        }
        Ok(())
    }
}

/// Drop a leading `http://` / `https://` (or any scheme); tonic endpoints
/// are dialed as bare `host:port`.
fn strip_scheme(url: &str) -> &str {
    match url.split_once("://") {
        Some((_, rest)) => rest,
        None => url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_http_and_https_schemes() {
        assert_eq!(strip_scheme("http://media-service:13031"), "media-service:13031");
        assert_eq!(strip_scheme("https://stt:15021"), "stt:15021");
        assert_eq!(strip_scheme("dialog-service:12061"), "dialog-service:12061");
    }

    #[test]
    fn defaults_match_the_deployment_contract() {
        let s = Settings::default();
        assert_eq!(s.grpc_port, 13111);
        assert_eq!(s.http_port, 13110);
        assert_eq!(s.pipeline_sample_rate, 16000);
        assert_eq!(s.barge_in_min_chars, 3);
        assert!(s.is_production());
    }

    #[test]
    fn barge_in_threshold_is_clamped() {
        let mut s = Settings {
            barge_in_min_chars: 50,
            ..Settings::default()
        };
        s.normalize();
        assert_eq!(s.barge_in_min_chars, 5);

        let mut s = Settings {
            barge_in_min_chars: 0,
            ..Settings::default()
        };
        s.normalize();
        assert_eq!(s.barge_in_min_chars, 3);
    }

    #[test]
    fn missing_tls_material_is_rejected() {
        let s = Settings::default();
        assert!(matches!(
            s.validate(),
            Err(ConfigError::MissingVar("CALLFLOW_CERT_PATH"))
        ));
    }

    #[test]
    fn normalize_strips_schemes_in_place() {
        let mut s = Settings {
            media_url: "http://media:1".to_string(),
            dialog_url: "https://dialog:2".to_string(),
            ..Settings::default()
        };
        s.normalize();
        assert_eq!(s.media_url, "media:1");
        assert_eq!(s.dialog_url, "dialog:2");
    }
}
