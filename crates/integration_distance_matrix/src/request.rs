//! Request URL construction and signing

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use domain::{Coordinate, TravelMode, UnitSystem, join_coordinates};
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use sha1::Sha1;
use url::form_urlencoded;

use crate::config::{Credentials, DistanceMatrixConfig};
use crate::error::DistanceMatrixError;

type HmacSha1 = Hmac<Sha1>;

/// Path of the JSON distance matrix endpoint
pub const DISTANCE_MATRIX_PATH: &str = "/maps/api/distancematrix/json";

/// Builds fully encoded, authenticated request URLs
#[derive(Debug)]
pub struct RequestBuilder {
    base_url: String,
    language: String,
    units: UnitSystem,
    credentials: Credentials,
}

impl RequestBuilder {
    /// Create a builder from a configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` for invalid configuration or an
    /// undecodable signing key.
    pub fn new(config: &DistanceMatrixConfig) -> Result<Self, DistanceMatrixError> {
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            units: config.units,
            credentials: config.credentials()?,
        })
    }

    /// Query parameters for one call, without authentication
    fn query_params(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
        mode: TravelMode,
    ) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("destinations", join_coordinates(destinations)),
            ("language", self.language.clone()),
            ("mode", mode.as_str().to_string()),
            ("origins", join_coordinates(origins)),
            ("units", self.units.as_str().to_string()),
        ])
    }

    /// Render the authenticated URL for a call
    ///
    /// Parameters are encoded in key order. With signed credentials the
    /// `client` parameter is included before signing and `signature` is
    /// appended last.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the signing key cannot key the HMAC.
    pub fn url(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
        mode: TravelMode,
    ) -> Result<String, DistanceMatrixError> {
        let mut params = self.query_params(origins, destinations, mode);

        match &self.credentials {
            Credentials::ApiKey(key) => {
                params.insert("key", key.expose_secret().to_string());
                let query = encode(&params);
                Ok(format!("{}{DISTANCE_MATRIX_PATH}?{query}", self.base_url))
            },
            Credentials::Signed { client_id, key } => {
                params.insert("client", client_id.clone());
                let query = encode(&params);
                let signature = sign(DISTANCE_MATRIX_PATH, &query, key.expose_secret())?;
                Ok(format!(
                    "{}{DISTANCE_MATRIX_PATH}?{query}&signature={signature}",
                    self.base_url
                ))
            },
        }
    }
}

/// Encode parameters as `application/x-www-form-urlencoded`
fn encode(params: &BTreeMap<&'static str, String>) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish()
}

/// URL-safe base64 HMAC-SHA1 of `path?query`
fn sign(path: &str, query: &str, key: &[u8]) -> Result<String, DistanceMatrixError> {
    let mut mac = HmacSha1::new_from_slice(key)
        .map_err(|e| DistanceMatrixError::ConfigurationError(format!("invalid signing key: {e}")))?;
    mac.update(path.as_bytes());
    mac.update(b"?");
    mac.update(query.as_bytes());
    Ok(URL_SAFE.encode(mac.finalize().into_bytes()))
}

/// Strip the query string so URLs can be logged without credentials
#[must_use]
pub fn redact(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_origins() -> Vec<Coordinate> {
        vec![Coordinate::new_unchecked(55.853_551, -4.311_093)]
    }

    fn sample_destinations() -> Vec<Coordinate> {
        vec![
            Coordinate::new_unchecked(53.472_028_6, -2.330_823_7),
            Coordinate::new_unchecked(51.556_021, -0.279_519),
        ]
    }

    #[test]
    fn test_api_key_url() {
        let config = DistanceMatrixConfig {
            language: "en-GB".to_string(),
            units: UnitSystem::Imperial,
            ..DistanceMatrixConfig::with_api_key("my-key")
        };
        let builder = RequestBuilder::new(&config).unwrap();
        let url = builder
            .url(&sample_origins(), &sample_destinations(), TravelMode::Driving)
            .unwrap();

        assert_eq!(
            url,
            "https://maps.googleapis.com/maps/api/distancematrix/json?\
             destinations=53.4720286%2C-2.3308237%7C51.556021%2C-0.279519\
             &key=my-key&language=en-GB&mode=driving\
             &origins=55.853551%2C-4.311093&units=imperial"
        );
    }

    #[test]
    fn test_trailing_slash_in_base_url() {
        let config = DistanceMatrixConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..DistanceMatrixConfig::with_api_key("k")
        };
        let builder = RequestBuilder::new(&config).unwrap();
        let url = builder
            .url(&sample_origins(), &sample_destinations(), TravelMode::Walking)
            .unwrap();
        assert!(url.starts_with("http://localhost:8080/maps/api/distancematrix/json?"));
        assert!(url.contains("mode=walking"));
    }

    #[test]
    fn test_signed_url() {
        let config = DistanceMatrixConfig::with_client_signature(
            "clientID",
            "vNIXE0xscrmjlyV-12Nj_BvUPaw=",
        );
        let builder = RequestBuilder::new(&config).unwrap();
        let url = builder
            .url(&sample_origins(), &sample_destinations(), TravelMode::Driving)
            .unwrap();

        assert!(url.contains("client=clientID"));
        assert!(!url.contains("key="));
        let (unsigned, signature) = url.rsplit_once("&signature=").unwrap();
        let query = unsigned.split_once('?').unwrap().1;
        let key = URL_SAFE.decode("vNIXE0xscrmjlyV-12Nj_BvUPaw=").unwrap();
        assert_eq!(signature, sign(DISTANCE_MATRIX_PATH, query, &key).unwrap());
    }

    #[test]
    fn test_sign_known_vector() {
        // Published URL signing test vector
        let key = URL_SAFE.decode("vNIXE0xscrmjlyV-12Nj_BvUPaw=").unwrap();
        let signature = sign(
            "/maps/api/geocode/json",
            "address=New+York&client=clientID",
            &key,
        )
        .unwrap();
        assert_eq!(signature, "chaRF2hTJKOScPr-RQCEhZbSzIE=");
    }

    #[test]
    fn test_invalid_signing_key_rejected_at_construction() {
        let config = DistanceMatrixConfig::with_client_signature("clientID", "%%%");
        assert!(RequestBuilder::new(&config).is_err());
    }

    #[test]
    fn test_redact() {
        assert_eq!(
            redact("https://example.com/maps/api/distancematrix/json?key=secret"),
            "https://example.com/maps/api/distancematrix/json"
        );
        assert_eq!(redact("https://example.com"), "https://example.com");
    }
}
