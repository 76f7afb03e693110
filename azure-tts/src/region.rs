//! Service regions and their endpoint URLs.
//!
//! # Example
//!
//! ```
//! use azure_tts::region::Region;
//!
//! let region: Region = "westeurope".parse().unwrap();
//! assert_eq!(
//!     region.synthesis_url(),
//!     "https://westeurope.tts.speech.microsoft.com/cognitiveservices/v1"
//! );
//! assert_eq!(
//!     region.token_url(),
//!     "https://westeurope.api.cognitive.microsoft.com/sts/v1.0/issueToken"
//! );
//! ```

use crate::properties::wire_enum;

wire_enum! {
    /// Regions hosting the text-to-speech service.
    pub enum Region("region") {
        AustraliaEast => "australiaeast",
        BrazilSouth => "brazilsouth",
        CanadaCentral => "canadacentral",
        CentralUs => "centralus",
        EastAsia => "eastasia",
        EastUs => "eastus",
        EastUs2 => "eastus2",
        FranceCentral => "francecentral",
        IndiaCentral => "indiacentral",
        JapanEast => "japaneast",
        JapanWest => "japanwest",
        KoreaCentral => "koreacentral",
        NorthCentralUs => "northcentralus",
        NorthEurope => "northeurope",
        SouthCentralUs => "southcentralus",
        SoutheastAsia => "southeastasia",
        UkSouth => "uksouth",
        WestEurope => "westeurope",
        WestUs => "westus",
        WestUs2 => "westus2",
    }
}

impl Default for Region {
    fn default() -> Self {
        Region::WestUs2
    }
}

impl Region {
    /// Synthesis endpoint.
    ///
    /// Format: `https://<region>.tts.speech.microsoft.com/cognitiveservices/v1`
    pub fn synthesis_url(&self) -> String {
        format!("https://{}.tts.speech.microsoft.com/cognitiveservices/v1", self.as_str())
    }

    /// Token issuance endpoint.
    ///
    /// Format: `https://<region>.api.cognitive.microsoft.com/sts/v1.0/issueToken`
    pub fn token_url(&self) -> String {
        format!(
            "https://{}.api.cognitive.microsoft.com/sts/v1.0/issueToken",
            self.as_str()
        )
    }

    /// Voice directory endpoint.
    ///
    /// Format: `https://<region>.tts.speech.microsoft.com/cognitiveservices/voices/list`
    pub fn voices_list_url(&self) -> String {
        format!(
            "https://{}.tts.speech.microsoft.com/cognitiveservices/voices/list",
            self.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_count() {
        assert_eq!(Region::ALL.len(), 20);
    }

    #[test]
    fn test_default_region() {
        assert_eq!(Region::default().as_str(), "westus2");
    }

    #[test]
    fn test_endpoint_urls() {
        let region = Region::SoutheastAsia;
        assert_eq!(
            region.synthesis_url(),
            "https://southeastasia.tts.speech.microsoft.com/cognitiveservices/v1"
        );
        assert_eq!(
            region.token_url(),
            "https://southeastasia.api.cognitive.microsoft.com/sts/v1.0/issueToken"
        );
        assert_eq!(
            region.voices_list_url(),
            "https://southeastasia.tts.speech.microsoft.com/cognitiveservices/voices/list"
        );
    }

    #[test]
    fn test_all_urls_use_https() {
        for region in Region::ALL {
            assert!(region.synthesis_url().starts_with("https://"));
            assert!(region.token_url().starts_with("https://"));
            assert!(region.voices_list_url().contains(region.as_str()));
        }
    }

    #[test]
    fn test_parse_region() {
        assert_eq!("WestUS2".parse::<Region>().unwrap(), Region::WestUs2);
        assert_eq!("uksouth".parse::<Region>().unwrap(), Region::UkSouth);

        let err = "moon-base".parse::<Region>().unwrap_err();
        assert_eq!(err.kind, "region");
    }
}
