use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use game_core::WordValidator;
use game_persistence::GameRepository;

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("Dictionary request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Dictionary lookup timed out after {0:?}")]
    Timeout(Duration),
    #[error("Unexpected dictionary response status {0}")]
    UnexpectedStatus(u16),
    #[error("Dictionary unavailable: {0}")]
    Unavailable(String),
}

/// External source of truth for whether a word exists.
#[async_trait]
pub trait DictionaryOracle: Send + Sync {
    async fn lookup(&self, word: &str) -> Result<bool, DictionaryError>;
}

/// `GET {base_url}/{word}`: 200 means the word exists, 404 means it does not.
pub struct HttpDictionaryOracle {
    client: Client,
    base_url: String,
}

impl HttpDictionaryOracle {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DictionaryOracle for HttpDictionaryOracle {
    async fn lookup(&self, word: &str) -> Result<bool, DictionaryError> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            word.to_lowercase()
        );
        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(DictionaryError::UnexpectedStatus(status.as_u16())),
        }
    }
}

/// What to assume when the oracle cannot answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Authoritative gate: unanswered words are invalid.
    Strict,
    /// Client preview: unanswered words are valid.
    Lenient,
}

impl ValidationPolicy {
    fn fallback(self) -> bool {
        matches!(self, ValidationPolicy::Lenient)
    }
}

/// Curated two-letter list locally, the oracle for everything longer, with
/// definitive answers cached in the key-value store.
pub struct DictionaryValidator {
    oracle: Arc<dyn DictionaryOracle>,
    repository: GameRepository,
    timeout: Duration,
}

impl DictionaryValidator {
    pub fn new(oracle: Arc<dyn DictionaryOracle>, repository: GameRepository, timeout: Duration) -> Self {
        Self {
            oracle,
            repository,
            timeout,
        }
    }

    pub async fn is_valid(&self, word: &str, policy: ValidationPolicy) -> bool {
        let word = WordValidator::normalize(word);
        self.validate_all([word.as_str()], policy)
            .await
            .get(&word)
            .copied()
            .unwrap_or(policy.fallback())
    }

    /// Verdict for every distinct word, keyed by its uppercased form.
    pub async fn validate_all<'a>(
        &self,
        words: impl IntoIterator<Item = &'a str>,
        policy: ValidationPolicy,
    ) -> BTreeMap<String, bool> {
        let (mut verdicts, pending) = WordValidator::partition(words);

        let lookups = pending.iter().map(|word| self.lookup_word(word, policy));
        let results = join_all(lookups).await;
        verdicts.extend(pending.into_iter().zip(results));

        verdicts
    }

    async fn lookup_word(&self, word: &str, policy: ValidationPolicy) -> bool {
        match self.repository.cached_word_validity(word).await {
            Ok(Some(valid)) => {
                debug!("Dictionary cache hit for {}: {}", word, valid);
                return valid;
            }
            Ok(None) => {}
            Err(e) => warn!("Dictionary cache read failed for {}: {}", word, e),
        }

        let answer = match tokio::time::timeout(self.timeout, self.oracle.lookup(word)).await {
            Ok(result) => result,
            Err(_) => Err(DictionaryError::Timeout(self.timeout)),
        };

        match answer {
            Ok(valid) => {
                if let Err(e) = self.repository.cache_word_validity(word, valid).await {
                    warn!("Failed to cache dictionary result for {}: {}", word, e);
                }
                valid
            }
            Err(e) => {
                let fallback = policy.fallback();
                warn!(
                    "Dictionary lookup for {} failed ({}), treating as {}",
                    word,
                    e,
                    if fallback { "valid" } else { "invalid" }
                );
                fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_persistence::MemoryKvStore;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingOracle {
        words: HashSet<&'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DictionaryOracle for CountingOracle {
        async fn lookup(&self, word: &str) -> Result<bool, DictionaryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.words.contains(word))
        }
    }

    struct BrokenOracle;

    #[async_trait]
    impl DictionaryOracle for BrokenOracle {
        async fn lookup(&self, _word: &str) -> Result<bool, DictionaryError> {
            Err(DictionaryError::Unavailable("offline".to_string()))
        }
    }

    fn validator(oracle: Arc<dyn DictionaryOracle>) -> DictionaryValidator {
        let repository = GameRepository::new(Arc::new(MemoryKvStore::new()));
        DictionaryValidator::new(oracle, repository, Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_two_letter_words_skip_oracle() {
        let oracle = Arc::new(CountingOracle {
            words: HashSet::new(),
            calls: AtomicUsize::new(0),
        });
        let validator = validator(oracle.clone());

        assert!(validator.is_valid("qi", ValidationPolicy::Strict).await);
        assert!(!validator.is_valid("zz", ValidationPolicy::Lenient).await);
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_results_are_cached() {
        let oracle = Arc::new(CountingOracle {
            words: HashSet::from(["CAT"]),
            calls: AtomicUsize::new(0),
        });
        let validator = validator(oracle.clone());

        let verdicts = validator
            .validate_all(["cat", "XQZ", "CAT"], ValidationPolicy::Strict)
            .await;
        assert_eq!(verdicts.get("CAT"), Some(&true));
        assert_eq!(verdicts.get("XQZ"), Some(&false));
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 2);

        validator
            .validate_all(["CAT", "XQZ"], ValidationPolicy::Strict)
            .await;
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_policy_is_asymmetric() {
        let validator = validator(Arc::new(BrokenOracle));
        assert!(!validator.is_valid("house", ValidationPolicy::Strict).await);
        assert!(validator.is_valid("house", ValidationPolicy::Lenient).await);
    }
}
