use sha2::{Digest, Sha256};
use wordhoard_config::translator::TranslatorConfig;
use wordhoard_types::PartOfSpeech;

use crate::{PhoneticInfo, Phonetics, TranslateError, Translation, Translator};

/// Primary provider: a signed open-platform translate API (v3 signature
/// scheme, SHA-256 over key + truncated query + salt + curtime +
/// secret).
#[derive(Clone)]
pub struct SignedProvider {
    client: reqwest::Client,
    app_key: String,
    app_secret: String,
    api_url: String,
}

impl SignedProvider {
    pub fn new(config: &TranslatorConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            app_key: config.app_key.clone(),
            app_secret: config.app_secret.clone(),
            api_url: config.api_url.clone(),
        }
    }
}

/// Signature input truncation per the provider's signing rules: short
/// queries go in whole, long ones as first 10 chars + length + last 10.
fn truncate_for_signature(q: &str) -> String {
    let chars: Vec<char> = q.chars().collect();
    if chars.len() <= 20 {
        return q.to_string();
    }
    let head: String = chars[..10].iter().collect();
    let tail: String = chars[chars.len() - 10..].iter().collect();
    format!("{head}{}{tail}", chars.len())
}

fn sha256_hex(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[async_trait::async_trait]
impl Translator for SignedProvider {
    async fn translate(&self, text: &str) -> Result<Translation, TranslateError> {
        if self.app_key.is_empty() || self.app_secret.is_empty() {
            return Err(TranslateError::AuthenticationError);
        }

        let salt = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis().to_string())
            .unwrap_or_default();
        let curtime = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs().to_string())
            .unwrap_or_default();

        let sign_input = format!(
            "{}{}{}{}{}",
            self.app_key,
            truncate_for_signature(text),
            salt,
            curtime,
            self.app_secret
        );
        let sign = sha256_hex(&sign_input);

        let params = [
            ("q", text),
            ("from", "auto"),
            ("to", "zh-CHS"),
            ("appKey", &self.app_key),
            ("salt", &salt),
            ("sign", &sign),
            ("signType", "v3"),
            ("curtime", &curtime),
        ];

        let response = self.client.post(&self.api_url).form(&params).send().await?;

        if response.status() == 429 {
            return Err(TranslateError::RateLimitExceeded);
        }
        if response.status() == 403 {
            return Err(TranslateError::AuthenticationError);
        }
        if !response.status().is_success() {
            return Err(TranslateError::ApiError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::ApiError(format!("failed to parse response: {e}")))?;

        let error_code = json["errorCode"].as_str().unwrap_or("unknown");
        if error_code != "0" {
            return Err(TranslateError::ApiError(format!(
                "provider error code {error_code}"
            )));
        }

        let translated = json["translation"]
            .get(0)
            .and_then(|t| t.as_str())
            .ok_or_else(|| TranslateError::ApiError("no translation in response".to_string()))?;

        Ok(Translation {
            text: translated.to_string(),
            provider: self.name().to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "signed"
    }
}

/// Free fallback provider queried when the primary fails; no
/// credentials, fixed en -> zh-CN pair.
#[derive(Clone)]
pub struct FallbackProvider {
    client: reqwest::Client,
    base_url: String,
}

impl FallbackProvider {
    pub fn new(config: &TranslatorConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.fallback_url.clone(),
        }
    }
}

#[async_trait::async_trait]
impl Translator for FallbackProvider {
    async fn translate(&self, text: &str) -> Result<Translation, TranslateError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", text), ("langpair", "en|zh-CN")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TranslateError::ApiError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::ApiError(format!("failed to parse response: {e}")))?;

        let translated = json["responseData"]["translatedText"]
            .as_str()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| TranslateError::ApiError("no translation in response".to_string()))?;

        Ok(Translation {
            text: translated.to_string(),
            provider: self.name().to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}

/// Free dictionary API for phonetics and part of speech.
#[derive(Clone)]
pub struct DictApiPhonetics {
    client: reqwest::Client,
    base_url: String,
}

impl DictApiPhonetics {
    pub fn new(config: &TranslatorConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.dictionary_url.clone(),
        }
    }
}

#[async_trait::async_trait]
impl Phonetics for DictApiPhonetics {
    async fn lookup(&self, word: &str) -> Result<PhoneticInfo, TranslateError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), word);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(TranslateError::ApiError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::ApiError(format!("failed to parse response: {e}")))?;

        let Some(entry) = json.get(0) else {
            return Ok(PhoneticInfo::default());
        };

        // Prefer the top-level phonetic, else the first non-empty text
        // in the phonetics array.
        let phonetic = entry["phonetic"]
            .as_str()
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .or_else(|| {
                entry["phonetics"].as_array().and_then(|list| {
                    list.iter()
                        .filter_map(|p| p["text"].as_str())
                        .find(|t| !t.is_empty())
                        .map(str::to_string)
                })
            });

        let part_of_speech = entry["meanings"]
            .get(0)
            .and_then(|m| m["partOfSpeech"].as_str())
            .and_then(PartOfSpeech::parse);

        Ok(PhoneticInfo {
            phonetic,
            part_of_speech,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_truncation_matches_provider_rule() {
        assert_eq!(truncate_for_signature("short text"), "short text");

        let exactly_20 = "abcdefghijklmnopqrst";
        assert_eq!(truncate_for_signature(exactly_20), exactly_20);

        let long = "abcdefghijklmnopqrstuvwxyz";
        assert_eq!(truncate_for_signature(long), "abcdefghij26qrstuvwxyz");
    }

    #[test]
    fn sha256_hex_is_lowercase_hex() {
        let hash = sha256_hex("hello");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[tokio::test]
    async fn signed_provider_without_credentials_fails_fast() {
        let config = TranslatorConfig {
            app_key: String::new(),
            app_secret: String::new(),
            api_url: "https://example.invalid/api".to_string(),
            fallback_url: String::new(),
            dictionary_url: String::new(),
        };
        let provider = SignedProvider::new(&config);
        assert!(matches!(
            provider.translate("hello").await,
            Err(TranslateError::AuthenticationError)
        ));
    }
}
