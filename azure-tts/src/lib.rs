//! Azure Text-to-Speech Client
//!
//! Async client for the Azure Cognitive Services speech synthesis REST API.
//! It renders an SSML payload for a `(locale, gender)` voice, posts it with a
//! bearer token, and returns the encoded audio. The bearer token is refreshed
//! in the background for the lifetime of the client.

pub mod client;
pub mod properties;
pub mod region;
pub mod ssml;
pub mod voices;

pub use azure_tts_common::{ApiErrorKind, AuthError, Config, ConfigError, Credential, Error, Result};
pub use client::{Endpoints, TextToSpeech, TextToSpeechBuilder, VoiceSource};
pub use properties::{AudioFormat, Gender, Locale, ParseEnumError, VoiceCategory};
pub use region::Region;
pub use voices::{VoiceCatalog, VoiceDescriptor, VoiceKey};
