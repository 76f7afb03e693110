//! Text-to-speech client.
//!
//! `TextToSpeech` ties together the token manager, the voice catalog and the
//! synthesis endpoint. Construction performs the initial token fetch and
//! starts a background refresher that keeps the token valid until the client
//! is shut down.
//!
//! # Example
//!
//! ```no_run
//! use azure_tts::{AudioFormat, Gender, Locale, Region, TextToSpeech};
//!
//! # async fn run() -> azure_tts::Result<()> {
//! let tts = TextToSpeech::new("my-subscription-key", Region::WestUs2).await?;
//! let audio = tts
//!     .synthesize(
//!         "Hello from the speech service",
//!         Locale::EnUs,
//!         Gender::Female,
//!         AudioFormat::Audio16khz32kbitrateMonoMp3,
//!     )
//!     .await?;
//! tokio::fs::write("hello.mp3", &audio).await?;
//! tts.shutdown().await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use azure_tts_common::auth::{
    Credential, DEFAULT_REFRESH_INTERVAL, HttpTokenIssuer, RefreshHandle, TokenIssuer,
    TokenManager,
};
use azure_tts_common::config::{Config, REGION_VAR};
use azure_tts_common::error::{ConfigError, Error, Result};
use reqwest::header::{self, AUTHORIZATION, CONTENT_TYPE};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::properties::{AudioFormat, Gender, Locale, VoiceCategory};
use crate::region::Region;
use crate::ssml;
use crate::voices::{self, VoiceCatalog, VoiceDescriptor};

/// Upper bound on a whole synthesis call made through `synthesize`.
pub const SYNTHESIZE_TIMEOUT: Duration = Duration::from_secs(30);

/// `User-Agent` sent with synthesis requests.
pub const CLIENT_USER_AGENT: &str = "azuretts";

/// Header selecting the audio encoding of the response.
pub const OUTPUT_FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";

/// Content type of the synthesis request body.
pub const SSML_CONTENT_TYPE: &str = "application/ssml+xml";

/// URLs the client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Synthesis endpoint (POST)
    pub synthesis: String,
    /// Token issuance endpoint (POST)
    pub token: String,
    /// Voice directory endpoint (GET)
    pub voices: String,
}

impl Endpoints {
    /// Public endpoints of a region.
    pub fn for_region(region: Region) -> Self {
        Self {
            synthesis: region.synthesis_url(),
            token: region.token_url(),
            voices: region.voices_list_url(),
        }
    }
}

/// Where the voice catalog comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceSource {
    /// The table shipped with the crate.
    #[default]
    Builtin,
    /// The region's voice directory, fetched once at construction.
    Directory,
}

/// Builder for [`TextToSpeech`].
pub struct TextToSpeechBuilder {
    subscription_key: String,
    endpoints: Endpoints,
    voice_source: VoiceSource,
    voice_category: VoiceCategory,
    refresh_interval: Duration,
    synthesize_timeout: Duration,
    http: Option<reqwest::Client>,
    issuer: Option<Arc<dyn TokenIssuer>>,
}

impl TextToSpeechBuilder {
    fn new(subscription_key: impl Into<String>) -> Self {
        Self {
            subscription_key: subscription_key.into(),
            endpoints: Endpoints::for_region(Region::default()),
            voice_source: VoiceSource::default(),
            voice_category: VoiceCategory::default(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            synthesize_timeout: SYNTHESIZE_TIMEOUT,
            http: None,
            issuer: None,
        }
    }

    /// Use the public endpoints of a region.
    pub fn region(mut self, region: Region) -> Self {
        self.endpoints = Endpoints::for_region(region);
        self
    }

    /// Use explicit endpoints.
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Choose the voice catalog source.
    pub fn voice_source(mut self, source: VoiceSource) -> Self {
        self.voice_source = source;
        self
    }

    /// Voice family kept when building the catalog from the directory.
    pub fn voice_category(mut self, category: VoiceCategory) -> Self {
        self.voice_category = category;
        self
    }

    /// Interval between background token refreshes.
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Bound applied by `synthesize`.
    pub fn synthesize_timeout(mut self, timeout: Duration) -> Self {
        self.synthesize_timeout = timeout;
        self
    }

    /// Share an existing HTTP client.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Replace the HTTP token issuer.
    pub fn token_issuer(mut self, issuer: Arc<dyn TokenIssuer>) -> Self {
        self.issuer = Some(issuer);
        self
    }

    /// Fetch the initial token, load the voice catalog and start the refresher.
    ///
    /// # Errors
    ///
    /// - `Error::Config` if the refresh interval is zero
    /// - `Error::Auth` if the initial token cannot be obtained
    /// - any `fetch_voices` error when the catalog comes from the directory
    #[instrument(level = "debug", name = "tts_build", skip_all)]
    pub async fn build(self) -> Result<TextToSpeech> {
        if self.refresh_interval.is_zero() {
            return Err(
                ConfigError::invalid_value("refresh_interval", "must be greater than zero").into(),
            );
        }

        let http = self.http.unwrap_or_default();
        let issuer: Arc<dyn TokenIssuer> = match self.issuer {
            Some(issuer) => issuer,
            None => Arc::new(HttpTokenIssuer::with_client(
                http.clone(),
                &self.endpoints.token,
                self.subscription_key,
            )),
        };

        let tokens = Arc::new(TokenManager::new(issuer).await?);

        let voices = match self.voice_source {
            VoiceSource::Builtin => VoiceCatalog::builtin(),
            VoiceSource::Directory => {
                let credential = tokens.credential().await;
                let descriptors =
                    voices::fetch_voices(&http, &self.endpoints.voices, &credential).await?;
                Arc::new(VoiceCatalog::from_descriptors(
                    &descriptors,
                    self.voice_category,
                ))
            }
        };

        let refresher = tokens.start_refresher(self.refresh_interval);

        info!(
            endpoint = %self.endpoints.synthesis,
            voices = voices.len(),
            "Text-to-speech client ready"
        );

        Ok(TextToSpeech {
            http,
            endpoints: self.endpoints,
            tokens,
            voices,
            synthesize_timeout: self.synthesize_timeout,
            refresher,
        })
    }
}

/// Client for the text-to-speech REST API.
///
/// All operations take `&self`; wrap the client in an `Arc` to share it
/// between tasks. Call [`TextToSpeech::shutdown`] when done to stop the
/// background token refresher.
pub struct TextToSpeech {
    http: reqwest::Client,
    endpoints: Endpoints,
    tokens: Arc<TokenManager>,
    voices: Arc<VoiceCatalog>,
    synthesize_timeout: Duration,
    refresher: RefreshHandle,
}

impl TextToSpeech {
    /// Start configuring a client.
    pub fn builder(subscription_key: impl Into<String>) -> TextToSpeechBuilder {
        TextToSpeechBuilder::new(subscription_key)
    }

    /// Create a client for a region with the built-in voice table.
    pub async fn new(subscription_key: impl Into<String>, region: Region) -> Result<Self> {
        Self::builder(subscription_key).region(region).build().await
    }

    /// Create a client from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configured region is unknown, otherwise
    /// the errors of [`TextToSpeechBuilder::build`].
    pub async fn from_config(config: &Config) -> Result<Self> {
        let region: Region = config
            .region
            .parse()
            .map_err(|e| ConfigError::invalid_value(REGION_VAR, format!("{}", e)))?;

        let voice_source = if config.voice_directory {
            VoiceSource::Directory
        } else {
            VoiceSource::Builtin
        };

        Self::builder(config.subscription_key.clone())
            .region(region)
            .refresh_interval(config.refresh_interval)
            .voice_source(voice_source)
            .build()
            .await
    }

    /// Synthesize `text` into audio bytes.
    ///
    /// The call is bounded by the client's synthesis timeout (30 seconds by
    /// default).
    ///
    /// # Errors
    ///
    /// - `Error::UnsupportedVoice` if no voice exists for the pair (no request is sent)
    /// - `Error::Timeout` if the bound elapses
    /// - `Error::Request` on transport failure
    /// - `Error::Api` for a non-200 status
    #[instrument(level = "info", name = "synthesize", skip_all, fields(locale = %locale, gender = %gender, format = %format))]
    pub async fn synthesize(
        &self,
        text: &str,
        locale: Locale,
        gender: Gender,
        format: AudioFormat,
    ) -> Result<Vec<u8>> {
        let payload = self.payload(text, locale, gender)?;

        match tokio::time::timeout(self.synthesize_timeout, self.post_ssml(payload, format)).await
        {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout = ?self.synthesize_timeout, "Synthesis timed out");
                Err(Error::timeout(self.synthesize_timeout))
            }
        }
    }

    /// Synthesize `text`, aborting when `cancel` fires.
    ///
    /// No timeout is applied; the caller owns the deadline.
    ///
    /// # Errors
    ///
    /// As [`TextToSpeech::synthesize`], with `Error::Cancelled` in place of
    /// `Error::Timeout`.
    #[instrument(level = "info", name = "synthesize_with_cancel", skip_all, fields(locale = %locale, gender = %gender, format = %format))]
    pub async fn synthesize_with_cancel(
        &self,
        text: &str,
        locale: Locale,
        gender: Gender,
        format: AudioFormat,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>> {
        let payload = self.payload(text, locale, gender)?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Synthesis cancelled");
                Err(Error::Cancelled)
            }
            result = self.post_ssml(payload, format) => result,
        }
    }

    /// Fetch a new token now, outside the refresh schedule.
    ///
    /// Useful after an `Unauthorized` response. On failure the previous token
    /// stays in use.
    pub async fn refresh_token(&self) -> Result<Arc<Credential>> {
        Ok(self.tokens.acquire().await?)
    }

    /// The credential currently attached to requests.
    pub async fn credential(&self) -> Arc<Credential> {
        self.tokens.credential().await
    }

    /// The voice catalog used to resolve `(locale, gender)` pairs.
    pub fn voices(&self) -> &VoiceCatalog {
        &self.voices
    }

    /// The endpoints this client talks to.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Fetch the current voice directory for this client's region.
    pub async fn fetch_voices(&self) -> Result<Vec<VoiceDescriptor>> {
        let credential = self.tokens.credential().await;
        voices::fetch_voices(&self.http, &self.endpoints.voices, &credential).await
    }

    /// Signal the background refresher to stop without waiting for it.
    ///
    /// Synthesis keeps working with the last token until it expires.
    pub fn stop_refresh(&self) {
        self.refresher.stop();
    }

    /// Whether the background refresher has been told to stop.
    pub fn is_refresh_stopped(&self) -> bool {
        self.refresher.is_stopped()
    }

    /// Stop the background refresher and wait for it to exit.
    pub async fn shutdown(self) {
        self.refresher.shutdown().await;
        info!("Text-to-speech client shut down");
    }

    fn payload(&self, text: &str, locale: Locale, gender: Gender) -> Result<String> {
        let voice = self.voices.resolve(locale, gender)?;
        Ok(ssml::render(text, voice, locale, gender))
    }

    async fn post_ssml(&self, payload: String, format: AudioFormat) -> Result<Vec<u8>> {
        let credential = self.tokens.credential().await;
        let endpoint = &self.endpoints.synthesis;
        debug!(endpoint = %endpoint, "Calling synthesis endpoint");

        let response = self
            .http
            .post(endpoint)
            .header(OUTPUT_FORMAT_HEADER, format.as_str())
            .header(CONTENT_TYPE, SSML_CONTENT_TYPE)
            .header(AUTHORIZATION, credential.bearer())
            .header(header::USER_AGENT, CLIENT_USER_AGENT)
            .body(payload)
            .send()
            .await
            .map_err(|e| Error::request(endpoint, e))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!(status = status.as_u16(), "Synthesis request failed");
            return Err(Error::api(endpoint, status.as_u16()));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| Error::request(endpoint, e))?;

        info!(bytes = audio.len(), "Received synthesized audio");
        Ok(audio.to_vec())
    }
}

impl std::fmt::Debug for TextToSpeech {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextToSpeech")
            .field("endpoints", &self.endpoints)
            .field("voices", &self.voices.len())
            .field("synthesize_timeout", &self.synthesize_timeout)
            .field("refresher", &self.refresher)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn endpoints(server: &MockServer) -> Endpoints {
        Endpoints {
            synthesis: format!("{}/cognitiveservices/v1", server.uri()),
            token: format!("{}/sts/v1.0/issueToken", server.uri()),
            voices: format!("{}/cognitiveservices/voices/list", server.uri()),
        }
    }

    async fn mount_token(server: &MockServer, token: &str) {
        Mock::given(method("POST"))
            .and(path("/sts/v1.0/issueToken"))
            .respond_with(ResponseTemplate::new(200).set_body_string(token))
            .mount(server)
            .await;
    }

    #[test]
    fn test_endpoints_for_region() {
        let endpoints = Endpoints::for_region(Region::EastUs);
        assert_eq!(
            endpoints.synthesis,
            "https://eastus.tts.speech.microsoft.com/cognitiveservices/v1"
        );
        assert_eq!(
            endpoints.token,
            "https://eastus.api.cognitive.microsoft.com/sts/v1.0/issueToken"
        );
        assert_eq!(
            endpoints.voices,
            "https://eastus.tts.speech.microsoft.com/cognitiveservices/voices/list"
        );
    }

    #[test]
    fn test_builder_defaults() {
        let builder = TextToSpeech::builder("key");
        assert_eq!(builder.endpoints, Endpoints::for_region(Region::WestUs2));
        assert_eq!(builder.voice_source, VoiceSource::Builtin);
        assert_eq!(builder.voice_category, VoiceCategory::Standard);
        assert_eq!(builder.refresh_interval, DEFAULT_REFRESH_INTERVAL);
        assert_eq!(builder.synthesize_timeout, SYNTHESIZE_TIMEOUT);
    }

    #[tokio::test]
    async fn test_build_uses_builtin_catalog() {
        let server = MockServer::start().await;
        mount_token(&server, "SYS49152").await;

        let tts = TextToSpeech::builder("SYS64738")
            .endpoints(endpoints(&server))
            .build()
            .await
            .unwrap();

        assert_eq!(tts.credential().await.token(), "SYS49152");
        assert_eq!(tts.voices().len(), VoiceCatalog::builtin().len());
        assert!(!tts.is_refresh_stopped());

        tts.stop_refresh();
        assert!(tts.is_refresh_stopped());
        tts.shutdown().await;
    }

    #[tokio::test]
    async fn test_build_rejects_zero_refresh_interval() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sts/v1.0/issueToken"))
            .respond_with(ResponseTemplate::new(200).set_body_string("t"))
            .expect(0)
            .mount(&server)
            .await;

        let err = TextToSpeech::builder("k")
            .endpoints(endpoints(&server))
            .refresh_interval(Duration::ZERO)
            .build()
            .await
            .unwrap_err();

        match err {
            Error::Config(ConfigError::InvalidValue(var, reason)) => {
                assert_eq!(var, "refresh_interval");
                assert!(reason.contains("greater than zero"));
            }
            other => panic!("expected config error, got {:?}", other),
        }
        server.verify().await;
    }

    #[tokio::test]
    async fn test_from_config_rejects_unknown_region() {
        let config = Config {
            subscription_key: "k".to_string(),
            region: "atlantis".to_string(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            voice_directory: false,
        };

        let err = TextToSpeech::from_config(&config).await.unwrap_err();
        match err {
            Error::Config(ConfigError::InvalidValue(var, reason)) => {
                assert_eq!(var, REGION_VAR);
                assert!(reason.contains("atlantis"));
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unsupported_pair_checked_before_timeout_or_cancel() {
        let server = MockServer::start().await;
        mount_token(&server, "t").await;

        let tts = TextToSpeech::builder("k")
            .endpoints(endpoints(&server))
            .build()
            .await
            .unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = tts
            .synthesize_with_cancel("x", Locale::DeCh, Gender::Female, AudioFormat::default(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedVoice { .. }), "{:?}", err);

        tts.shutdown().await;
    }

    #[tokio::test]
    async fn test_debug_omits_key() {
        let server = MockServer::start().await;
        mount_token(&server, "t").await;

        let tts = TextToSpeech::builder("very-secret")
            .endpoints(endpoints(&server))
            .build()
            .await
            .unwrap();

        let debug_str = format!("{:?}", tts);
        assert!(debug_str.contains("TextToSpeech"));
        assert!(!debug_str.contains("very-secret"));
        tts.shutdown().await;
    }
}
