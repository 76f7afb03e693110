//! Voice catalog and voice directory access.
//!
//! A `VoiceCatalog` maps a `(Locale, Gender)` pair to the voice name placed in
//! the SSML payload. The catalog is either the built-in table shipped with
//! the crate or built from the service's voice directory for a region.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use azure_tts_common::auth::Credential;
use azure_tts_common::error::{Error, Result};
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::properties::{Gender, Locale, VoiceCategory};

/// How long a voice directory request may take.
pub const VOICE_LIST_TIMEOUT: Duration = Duration::from_secs(2);

/// Lookup key for a voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceKey {
    /// Spoken locale
    pub locale: Locale,
    /// Voice gender
    pub gender: Gender,
}

impl VoiceKey {
    /// Create a key.
    pub fn new(locale: Locale, gender: Gender) -> Self {
        Self { locale, gender }
    }
}

/// One entry of the voice directory response.
///
/// Fields are kept as the raw strings the service returns. Unknown fields are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoiceDescriptor {
    /// Full service name of the voice
    pub name: String,
    /// Short voice name used in SSML, e.g. `en-US-ZiraRUS`
    pub short_name: String,
    /// `Male` or `Female`
    pub gender: String,
    /// Locale code, e.g. `en-US`
    pub locale: String,
    /// Native sample rate, as reported
    #[serde(default)]
    pub sample_rate_hertz: String,
    /// `Standard` or `Neural`
    #[serde(default)]
    pub voice_type: String,
}

impl VoiceDescriptor {
    /// The catalog key for this voice, if its locale and gender are known.
    pub fn key(&self) -> Option<VoiceKey> {
        let locale = self.locale.parse().ok()?;
        let gender = self.gender.parse().ok()?;
        Some(VoiceKey::new(locale, gender))
    }

    /// The voice family, if recognised.
    pub fn category(&self) -> Option<VoiceCategory> {
        self.voice_type.parse().ok()
    }
}

/// Immutable `(Locale, Gender)` to voice name mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceCatalog {
    voices: HashMap<VoiceKey, String>,
}

static BUILTIN: LazyLock<Arc<VoiceCatalog>> = LazyLock::new(|| {
    Arc::new(VoiceCatalog::from_entries(BUILTIN_VOICES.iter().copied()))
});

impl VoiceCatalog {
    /// The built-in table of standard voices, shared process-wide.
    pub fn builtin() -> Arc<VoiceCatalog> {
        Arc::clone(&BUILTIN)
    }

    /// Build a catalog from explicit entries. Later entries win.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Locale, Gender, S)>,
        S: Into<String>,
    {
        let voices = entries
            .into_iter()
            .map(|(locale, gender, voice)| (VoiceKey::new(locale, gender), voice.into()))
            .collect();
        Self { voices }
    }

    /// Build a catalog from voice directory entries of one category.
    ///
    /// Entries of other categories, or with a locale or gender outside the
    /// known tables, are skipped. When several voices share a key the last
    /// one wins.
    pub fn from_descriptors<'a, I>(descriptors: I, category: VoiceCategory) -> Self
    where
        I: IntoIterator<Item = &'a VoiceDescriptor>,
    {
        let mut voices = HashMap::new();
        let mut skipped = 0usize;

        for descriptor in descriptors {
            if descriptor.category() != Some(category) {
                continue;
            }
            match descriptor.key() {
                Some(key) => {
                    voices.insert(key, descriptor.short_name.clone());
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!(skipped, "Skipped voices with unrecognised locale or gender");
        }

        Self { voices }
    }

    /// Voice name for a pair, if any.
    pub fn get(&self, locale: Locale, gender: Gender) -> Option<&str> {
        self.voices
            .get(&VoiceKey::new(locale, gender))
            .map(String::as_str)
    }

    /// Voice name for a pair.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedVoice` when the pair has no voice.
    pub fn resolve(&self, locale: Locale, gender: Gender) -> Result<&str> {
        self.get(locale, gender)
            .ok_or_else(|| Error::unsupported_voice(locale.as_str(), gender.as_str()))
    }

    /// Number of known pairs.
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    /// Whether the catalog has no voices.
    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Iterate over all pairs and their voice names.
    pub fn iter(&self) -> impl Iterator<Item = (&VoiceKey, &str)> {
        self.voices.iter().map(|(k, v)| (k, v.as_str()))
    }
}

/// Fetch the voice directory for a region.
///
/// # Errors
///
/// - `Error::Request` / `Error::Timeout` if the endpoint cannot be reached
/// - `Error::Api` for a non-200 status
/// - `Error::Decode` if the body is not a JSON array of voices
#[instrument(level = "debug", name = "fetch_voices", skip(http, credential))]
pub async fn fetch_voices(
    http: &reqwest::Client,
    endpoint: &str,
    credential: &Credential,
) -> Result<Vec<VoiceDescriptor>> {
    let response = http
        .get(endpoint)
        .header(AUTHORIZATION, credential.bearer())
        .timeout(VOICE_LIST_TIMEOUT)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                Error::timeout(VOICE_LIST_TIMEOUT)
            } else {
                Error::request(endpoint, e)
            }
        })?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        warn!(status = status.as_u16(), "Voice directory request failed");
        return Err(Error::api(endpoint, status.as_u16()));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| Error::request(endpoint, e))?;

    let voices: Vec<VoiceDescriptor> = serde_json::from_slice(&body)
        .map_err(|e| Error::decode(endpoint, format!("unable to decode voice list: {}", e)))?;

    info!(count = voices.len(), "Fetched voice directory");
    Ok(voices)
}

/// Standard voices known without consulting the directory.
const BUILTIN_VOICES: &[(Locale, Gender, &str)] = &[
    (Locale::ArEg, Gender::Female, "ar-EG-Hoda"),
    (Locale::ArSa, Gender::Male, "ar-SA-Naayf"),
    (Locale::BgBg, Gender::Male, "bg-BG-Ivan"),
    (Locale::CaEs, Gender::Female, "ca-ES-HerenaRUS"),
    (Locale::CsCz, Gender::Male, "cs-CZ-Jakub"),
    (Locale::DaDk, Gender::Female, "da-DK-HelleRUS"),
    (Locale::DeAt, Gender::Male, "de-AT-Michael"),
    (Locale::DeCh, Gender::Male, "de-CH-Karsten"),
    (Locale::DeDe, Gender::Female, "de-DE-HeddaRUS"),
    (Locale::DeDe, Gender::Male, "de-DE-Stefan-Apollo"),
    (Locale::ElGr, Gender::Male, "el-GR-Stefanos"),
    (Locale::EnAu, Gender::Female, "en-AU-Catherine"),
    (Locale::EnCa, Gender::Female, "en-CA-Linda"),
    (Locale::EnGb, Gender::Female, "en-GB-Susan-Apollo"),
    (Locale::EnGb, Gender::Male, "en-GB-George-Apollo"),
    (Locale::EnIe, Gender::Male, "en-IE-Sean"),
    (Locale::EnIn, Gender::Female, "en-IN-Heera-Apollo"),
    (Locale::EnIn, Gender::Male, "en-IN-Ravi-Apollo"),
    (Locale::EnUs, Gender::Female, "en-US-ZiraRUS"),
    (Locale::EnUs, Gender::Male, "en-US-BenjaminRUS"),
    (Locale::EsEs, Gender::Female, "es-ES-Laura-Apollo"),
    (Locale::EsEs, Gender::Male, "es-ES-Pablo-Apollo"),
    (Locale::EsMx, Gender::Female, "es-MX-HildaRUS"),
    (Locale::EsMx, Gender::Male, "es-MX-Raul-Apollo"),
    (Locale::FiFi, Gender::Female, "fi-FI-HeidiRUS"),
    (Locale::FrCa, Gender::Female, "fr-CA-Caroline"),
    (Locale::FrCh, Gender::Male, "fr-CH-Guillaume"),
    (Locale::FrFr, Gender::Female, "fr-FR-Julie-Apollo"),
    (Locale::FrFr, Gender::Male, "fr-FR-Paul-Apollo"),
    (Locale::HeIl, Gender::Male, "he-IL-Asaf"),
    (Locale::HiIn, Gender::Female, "hi-IN-Kalpana-Apollo"),
    (Locale::HiIn, Gender::Male, "hi-IN-Hemant"),
    (Locale::HrHr, Gender::Male, "hr-HR-Matej"),
    (Locale::HuHu, Gender::Male, "hu-HU-Szabolcs"),
    (Locale::IdId, Gender::Male, "id-ID-Andika"),
    (Locale::ItIt, Gender::Female, "it-IT-LuciaRUS"),
    (Locale::ItIt, Gender::Male, "it-IT-Cosimo-Apollo"),
    (Locale::JaJp, Gender::Female, "ja-JP-Ayumi-Apollo"),
    (Locale::JaJp, Gender::Male, "ja-JP-Ichiro-Apollo"),
    (Locale::KoKr, Gender::Female, "ko-KR-HeamiRUS"),
    (Locale::MsMy, Gender::Male, "ms-MY-Rizwan"),
    (Locale::NbNo, Gender::Female, "nb-NO-HuldaRUS"),
    (Locale::NlNl, Gender::Female, "nl-NL-HannaRUS"),
    (Locale::PlPl, Gender::Female, "pl-PL-PaulinaRUS"),
    (Locale::PtBr, Gender::Female, "pt-BR-HeloisaRUS"),
    (Locale::PtBr, Gender::Male, "pt-BR-Daniel-Apollo"),
    (Locale::PtPt, Gender::Female, "pt-PT-HeliaRUS"),
    (Locale::RoRo, Gender::Male, "ro-RO-Andrei"),
    (Locale::RuRu, Gender::Female, "ru-RU-Irina-Apollo"),
    (Locale::RuRu, Gender::Male, "ru-RU-Pavel-Apollo"),
    (Locale::SkSk, Gender::Male, "sk-SK-Filip"),
    (Locale::SlSi, Gender::Male, "sl-SI-Lado"),
    (Locale::SvSe, Gender::Female, "sv-SE-HedvigRUS"),
    (Locale::TaIn, Gender::Male, "ta-IN-Valluvar"),
    (Locale::TeIn, Gender::Female, "te-IN-Chitra"),
    (Locale::ThTh, Gender::Male, "th-TH-Pattara"),
    (Locale::TrTr, Gender::Female, "tr-TR-SedaRUS"),
    (Locale::ViVn, Gender::Male, "vi-VN-An"),
    (Locale::ZhCn, Gender::Female, "zh-CN-HuihuiRUS"),
    (Locale::ZhCn, Gender::Male, "zh-CN-Kangkang-Apollo"),
    (Locale::ZhHk, Gender::Female, "zh-HK-TracyRUS"),
    (Locale::ZhHk, Gender::Male, "zh-HK-Danny-Apollo"),
    (Locale::ZhTw, Gender::Female, "zh-TW-HanHanRUS"),
    (Locale::ZhTw, Gender::Male, "zh-TW-Zhiwei-Apollo"),
];


#[cfg(test)]
mod fetch_tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VOICE_LIST: &str = r#"[
        {"Name": "a", "ShortName": "en-US-ZiraRUS", "Gender": "Female", "Locale": "en-US", "SampleRateHertz": "16000", "VoiceType": "Standard"},
        {"Name": "b", "ShortName": "en-US-BenjaminRUS", "Gender": "Male", "Locale": "en-US", "SampleRateHertz": "16000", "VoiceType": "Standard"}
    ]"#;

    #[tokio::test]
    async fn test_fetch_sends_bearer_and_decodes() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cognitiveservices/voices/list"))
            .and(header("Authorization", "Bearer SYS49152"))
            .respond_with(ResponseTemplate::new(200).set_body_string(VOICE_LIST))
            .expect(1)
            .mount(&mock_server)
            .await;

        let endpoint = format!("{}/cognitiveservices/voices/list", mock_server.uri());
        let voices = fetch_voices(&reqwest::Client::new(), &endpoint, &Credential::new("SYS49152"))
            .await
            .unwrap();

        assert_eq!(voices.len(), 2);
        let catalog = VoiceCatalog::from_descriptors(&voices, VoiceCategory::Standard);
        assert_eq!(catalog.get(Locale::EnUs, Gender::Male), Some("en-US-BenjaminRUS"));
    }

    #[tokio::test]
    async fn test_fetch_maps_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let err = fetch_voices(&reqwest::Client::new(), &mock_server.uri(), &Credential::new("t"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(429));
        assert!(matches!(
            err,
            Error::Api {
                kind: azure_tts_common::ApiErrorKind::TooManyRequests,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_fetch_rejects_malformed_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"not\": \"a list\"}"))
            .mount(&mock_server)
            .await;

        let err = fetch_voices(&reqwest::Client::new(), &mock_server.uri(), &Credential::new("t"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("[]")
                    .set_delay(VOICE_LIST_TIMEOUT + Duration::from_secs(1)),
            )
            .mount(&mock_server)
            .await;

        let err = fetch_voices(&reqwest::Client::new(), &mock_server.uri(), &Credential::new("t"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(d) if d == VOICE_LIST_TIMEOUT), "{:?}", err);
    }
}
