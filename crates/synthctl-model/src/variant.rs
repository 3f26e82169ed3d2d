use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of synthetic test kinds.
///
/// The variant determines which fields are legal inside the `configuration`
/// sub-document and which finalize-time validations apply. The
/// bundle-vs-inline distinction for script kinds is not part of the variant
/// tag; it is carried separately by [`TestConfigBuilder`](crate::TestConfigBuilder)
/// and signaled on the wire by `scripts{bundle,scriptFile}` versus `script`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyntheticType {
    HttpAction,
    HttpScript,
    BrowserScript,
    WebpageScript,
    WebpageAction,
    SslCertificate,
}

impl SyntheticType {
    /// All variants in the numeric order used by `create test -t <n>`.
    pub const ALL: [SyntheticType; 6] = [
        SyntheticType::HttpAction,
        SyntheticType::HttpScript,
        SyntheticType::BrowserScript,
        SyntheticType::WebpageScript,
        SyntheticType::WebpageAction,
        SyntheticType::SslCertificate,
    ];

    /// The `syntheticType` wire name for this variant family.
    pub fn as_str(self) -> &'static str {
        match self {
            SyntheticType::HttpAction => "HTTPAction",
            SyntheticType::HttpScript => "HTTPScript",
            SyntheticType::BrowserScript => "BrowserScript",
            SyntheticType::WebpageScript => "WebpageScript",
            SyntheticType::WebpageAction => "WebpageAction",
            SyntheticType::SslCertificate => "SSLCertificate",
        }
    }

    /// Map the numeric index accepted by `create test --type`.
    pub fn from_index(index: u8) -> Result<Self, ModelError> {
        Self::ALL
            .get(usize::from(index))
            .copied()
            .ok_or_else(|| ModelError::UnknownSyntheticType(index.to_string()))
    }

    /// Kinds that carry a script (inline or bundled).
    pub fn is_script_kind(self) -> bool {
        matches!(
            self,
            SyntheticType::HttpScript | SyntheticType::BrowserScript | SyntheticType::WebpageScript
        )
    }

    /// Kinds that accept a zip bundle instead of an inline script.
    pub fn is_bundle_capable(self) -> bool {
        matches!(
            self,
            SyntheticType::HttpScript | SyntheticType::BrowserScript
        )
    }

    /// Kinds that take a ping URL / HTTP operation / headers / body.
    pub fn is_action_kind(self) -> bool {
        matches!(
            self,
            SyntheticType::HttpAction | SyntheticType::WebpageAction
        )
    }

    /// Default test frequency in minutes for this variant.
    pub fn default_frequency(self) -> u32 {
        match self {
            SyntheticType::SslCertificate => 1440,
            _ => 15,
        }
    }

    /// Upper bound of the accepted frequency range in minutes.
    pub fn max_frequency(self) -> u32 {
        match self {
            SyntheticType::SslCertificate => 1440,
            _ => 120,
        }
    }
}

impl fmt::Display for SyntheticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyntheticType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ModelError::UnknownSyntheticType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_mapping_matches_cli_contract() {
        assert_eq!(SyntheticType::from_index(0).unwrap(), SyntheticType::HttpAction);
        assert_eq!(SyntheticType::from_index(3).unwrap(), SyntheticType::WebpageScript);
        assert_eq!(SyntheticType::from_index(5).unwrap(), SyntheticType::SslCertificate);
        assert!(SyntheticType::from_index(6).is_err());
    }

    #[test]
    fn wire_names_are_exact() {
        assert_eq!(SyntheticType::HttpAction.as_str(), "HTTPAction");
        assert_eq!(SyntheticType::SslCertificate.as_str(), "SSLCertificate");
        assert_eq!("httpscript".parse::<SyntheticType>().unwrap(), SyntheticType::HttpScript);
    }

    #[test]
    fn capability_predicates() {
        assert!(SyntheticType::HttpScript.is_script_kind());
        assert!(SyntheticType::WebpageScript.is_script_kind());
        assert!(!SyntheticType::WebpageScript.is_bundle_capable());
        assert!(SyntheticType::BrowserScript.is_bundle_capable());
        assert!(SyntheticType::WebpageAction.is_action_kind());
        assert!(!SyntheticType::HttpScript.is_action_kind());
    }

    #[test]
    fn frequency_bounds_per_variant() {
        assert_eq!(SyntheticType::HttpAction.default_frequency(), 15);
        assert_eq!(SyntheticType::SslCertificate.default_frequency(), 1440);
        assert_eq!(SyntheticType::BrowserScript.max_frequency(), 120);
        assert_eq!(SyntheticType::SslCertificate.max_frequency(), 1440);
    }
}
