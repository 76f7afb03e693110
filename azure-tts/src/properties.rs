//! Closed sets of values understood by the speech service.
//!
//! Each enum carries the exact wire string the service expects, renders it via
//! `Display`, and parses it back (case-insensitively) via `FromStr`.
//!
//! # Example
//!
//! ```
//! use azure_tts::properties::{AudioFormat, Gender, Locale};
//!
//! let locale: Locale = "en-us".parse().unwrap();
//! assert_eq!(locale, Locale::EnUs);
//! assert_eq!(locale.to_string(), "en-US");
//! assert_eq!(Gender::Female.as_str(), "Female");
//! assert_eq!(
//!     AudioFormat::Audio16khz32kbitrateMonoMp3.as_str(),
//!     "audio-16khz-32kbitrate-mono-mp3"
//! );
//! ```

use thiserror::Error;

/// Error returned when a string does not name a known value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    /// Which table was searched (e.g. `locale`)
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Declares a fieldless enum whose variants map one-to-one onto wire strings.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The string sent to the service.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::properties::ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| $crate::properties::ParseEnumError::new($kind, s))
            }
        }
    };
}

pub(crate) use wire_enum;

wire_enum! {
    /// Output encodings the synthesis endpoint can produce.
    ///
    /// Sent in the `X-Microsoft-OutputFormat` header.
    pub enum AudioFormat("audio format") {
        Riff8khz8bitMonoMulaw => "riff-8khz-8bit-mono-mulaw",
        Riff16khz16bitMonoPcm => "riff-16khz-16bit-mono-pcm",
        Riff16khz16kbpsMonoSiren => "riff-16khz-16kbps-mono-siren",
        Riff24khz16bitMonoPcm => "riff-24khz-16bit-mono-pcm",
        Raw8khz8bitMonoMulaw => "raw-8khz-8bit-mono-mulaw",
        Raw16khz16bitMonoPcm => "raw-16khz-16bit-mono-pcm",
        Raw24khz16bitMonoPcm => "raw-24khz-16bit-mono-pcm",
        Ssml16khz16bitMonoTts => "ssml-16khz-16bit-mono-tts",
        Audio16khz16kbpsMonoSiren => "audio-16khz-16kbps-mono-siren",
        Audio16khz32kbitrateMonoMp3 => "audio-16khz-32kbitrate-mono-mp3",
        Audio16khz64kbitrateMonoMp3 => "audio-16khz-64kbitrate-mono-mp3",
        Audio16khz128kbitrateMonoMp3 => "audio-16khz-128kbitrate-mono-mp3",
        Audio24khz48kbitrateMonoMp3 => "audio-24khz-48kbitrate-mono-mp3",
        Audio24khz96kbitrateMonoMp3 => "audio-24khz-96kbitrate-mono-mp3",
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        AudioFormat::Audio16khz32kbitrateMonoMp3
    }
}

wire_enum! {
    /// Voice gender as used in the `xml:gender` attribute.
    pub enum Gender("gender") {
        Male => "Male",
        Female => "Female",
    }
}

wire_enum! {
    /// Voice family reported by the voice directory.
    pub enum VoiceCategory("voice category") {
        Standard => "Standard",
        Neural => "Neural",
    }
}

impl Default for VoiceCategory {
    fn default() -> Self {
        VoiceCategory::Standard
    }
}

wire_enum! {
    /// Language and region of the spoken output.
    pub enum Locale("locale") {
        ArEg => "ar-EG",
        ArSa => "ar-SA",
        BgBg => "bg-BG",
        CaEs => "ca-ES",
        CsCz => "cs-CZ",
        DaDk => "da-DK",
        DeAt => "de-AT",
        DeCh => "de-CH",
        DeDe => "de-DE",
        ElGr => "el-GR",
        EnAu => "en-AU",
        EnCa => "en-CA",
        EnGb => "en-GB",
        EnIe => "en-IE",
        EnIn => "en-IN",
        EnUs => "en-US",
        EsEs => "es-ES",
        EsMx => "es-MX",
        EtEe => "et-EE",
        FiFi => "fi-FI",
        FrCa => "fr-CA",
        FrCh => "fr-CH",
        FrFr => "fr-FR",
        GaIe => "ga-IE",
        HeIl => "he-IL",
        HiIn => "hi-IN",
        HrHr => "hr-HR",
        HuHu => "hu-HU",
        IdId => "id-ID",
        ItIt => "it-IT",
        JaJp => "ja-JP",
        KoKr => "ko-KR",
        LtLt => "lt-LT",
        LvLv => "lv-LV",
        MtMt => "mt-MT",
        MrIn => "mr-IN",
        MsMy => "ms-MY",
        NbNo => "nb-NO",
        NlNl => "nl-NL",
        PlPl => "pl-PL",
        PtBr => "pt-BR",
        PtPt => "pt-PT",
        RoRo => "ro-RO",
        RuRu => "ru-RU",
        SkSk => "sk-SK",
        SlSi => "sl-SI",
        SvSe => "sv-SE",
        TaIn => "ta-IN",
        TeIn => "te-IN",
        ThTh => "th-TH",
        TrTr => "tr-TR",
        ViVn => "vi-VN",
        ZhCn => "zh-CN",
        ZhHk => "zh-HK",
        ZhTw => "zh-TW",
    }
}
