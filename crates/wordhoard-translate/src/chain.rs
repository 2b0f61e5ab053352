use std::sync::Arc;

use crate::{TRANSLATION_FAILED, TranslateError, Translation, Translator};

/// Ordered provider chain: try each translator in turn, falling through
/// on any error. The popup and content flows never see a translate
/// failure as an error; `translate_or_sentinel` degrades to a sentinel
/// value instead.
pub struct TranslatorChain {
    providers: Vec<Arc<dyn Translator>>,
}

impl TranslatorChain {
    pub fn new(providers: Vec<Arc<dyn Translator>>) -> Self {
        Self { providers }
    }

    pub async fn translate(&self, text: &str) -> Result<Translation, TranslateError> {
        let mut last_error = TranslateError::ApiError("no providers configured".to_string());

        for provider in &self.providers {
            match provider.translate(text).await {
                Ok(translation) => {
                    tracing::debug!(provider = provider.name(), "translation succeeded");
                    return Ok(translation);
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "provider failed, trying next");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    /// Like `translate`, but total failure yields the user-visible
    /// sentinel instead of an error. The sentinel still flows into the
    /// vocabulary so the word is not silently dropped.
    pub async fn translate_or_sentinel(&self, text: &str) -> Translation {
        match self.translate(text).await {
            Ok(translation) => translation,
            Err(e) => {
                tracing::error!(error = %e, "all translation providers failed");
                Translation {
                    text: TRANSLATION_FAILED.to_string(),
                    provider: "none".to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedProvider {
        name: &'static str,
        result: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl FixedProvider {
        fn ok(name: &'static str, text: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                result: Some(text),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                result: None,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait::async_trait]
    impl Translator for FixedProvider {
        async fn translate(&self, _text: &str) -> Result<Translation, TranslateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.result {
                Some(text) => Ok(Translation {
                    text: text.to_string(),
                    provider: self.name.to_string(),
                }),
                None => Err(TranslateError::ApiError("boom".to_string())),
            }
        }

        fn name(&self) -> &'static str {
            self.name
        }
    }

    #[tokio::test]
    async fn first_success_wins_and_stops_the_chain() {
        let primary = FixedProvider::ok("primary", "你好");
        let fallback = FixedProvider::ok("fallback", "您好");
        let chain = TranslatorChain::new(vec![primary.clone(), fallback.clone()]);

        let translation = chain.translate("hello").await.unwrap();
        assert_eq!(translation.text, "你好");
        assert_eq!(translation.provider, "primary");
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failure_falls_through_to_next_provider() {
        let primary = FixedProvider::failing("primary");
        let fallback = FixedProvider::ok("fallback", "你好");
        let chain = TranslatorChain::new(vec![primary.clone(), fallback]);

        let translation = chain.translate("hello").await.unwrap();
        assert_eq!(translation.provider, "fallback");
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn total_failure_degrades_to_sentinel() {
        let chain = TranslatorChain::new(vec![
            FixedProvider::failing("primary") as Arc<dyn Translator>,
            FixedProvider::failing("fallback"),
        ]);

        let translation = chain.translate_or_sentinel("hello").await;
        assert_eq!(translation.text, TRANSLATION_FAILED);
        assert_eq!(translation.provider, "none");
    }

    #[tokio::test]
    async fn empty_chain_reports_no_providers() {
        let chain = TranslatorChain::new(vec![]);
        assert!(matches!(
            chain.translate("hello").await,
            Err(TranslateError::ApiError(msg)) if msg.contains("no providers")
        ));
    }
}
