use std::fmt;
use std::sync::Arc;
use bn_core::{EmbeddingModel, Error};
use tracing::{debug, warn};

/// Outcome of a batched embedding request.
#[derive(Debug, Clone, PartialEq)]
pub enum Embeddings {
    /// One vector per input, in input order, all the same length.
    Available(Vec<Vec<f32>>),
    /// The provider could not be used; the string records why.
    Unavailable(String),
}

impl Embeddings {
    pub fn is_available(&self) -> bool {
        matches!(self, Embeddings::Available(_))
    }

    pub fn into_vectors(self) -> Option<Vec<Vec<f32>>> {
        match self {
            Embeddings::Available(vectors) => Some(vectors),
            Embeddings::Unavailable(_) => None,
        }
    }
}

/// Wraps the embedding provider so that every failure, including content
/// policy rejections, surfaces as `Embeddings::Unavailable` instead of an
/// error. The gateway never retries.
#[derive(Clone)]
pub struct EmbeddingGateway {
    model: Option<Arc<dyn EmbeddingModel>>,
}

impl fmt::Debug for EmbeddingGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddingGateway")
            .field("model", &self.model.as_ref().map(|m| m.name().to_string()))
            .finish()
    }
}

impl EmbeddingGateway {
    pub fn new(model: Arc<dyn EmbeddingModel>) -> Self {
        Self { model: Some(model) }
    }

    /// A gateway with no provider behind it.
    pub fn disabled() -> Self {
        Self { model: None }
    }

    pub async fn embed(&self, texts: &[String]) -> Embeddings {
        if texts.is_empty() {
            return Embeddings::Available(Vec::new());
        }

        let Some(model) = &self.model else {
            return Embeddings::Unavailable("no embedding provider configured".to_string());
        };

        debug!("🔢 Requesting {} embeddings from {}", texts.len(), model.name());
        match model.embed(texts).await {
            Ok(vectors) if vectors.len() != texts.len() => {
                warn!(
                    provider = model.name(),
                    expected = texts.len(),
                    received = vectors.len(),
                    "⚠️ Embedding count mismatch, treating embeddings as unavailable"
                );
                Embeddings::Unavailable(format!(
                    "expected {} embeddings, received {}",
                    texts.len(),
                    vectors.len()
                ))
            }
            Ok(vectors) => {
                let dims = vectors[0].len();
                if dims == 0 || vectors.iter().any(|v| v.len() != dims) {
                    warn!(provider = model.name(), "⚠️ Embeddings have inconsistent dimensions");
                    return Embeddings::Unavailable("inconsistent embedding dimensions".to_string());
                }
                Embeddings::Available(vectors)
            }
            Err(Error::PolicyRejected(reason)) => {
                warn!(provider = model.name(), %reason, "⚠️ Embedding provider rejected input on policy grounds");
                Embeddings::Unavailable(format!("policy rejection: {}", reason))
            }
            Err(e) => {
                warn!(provider = model.name(), error = %e, "⚠️ Embedding provider unavailable");
                Embeddings::Unavailable(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bn_core::Result;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    enum Script {
        Echo,
        Short,
        Ragged,
        Policy,
        Down,
    }

    #[derive(Debug)]
    struct ScriptedModel {
        script: Script,
        calls: AtomicUsize,
    }

    impl ScriptedModel {
        fn new(script: Script) -> Arc<Self> {
            Arc::new(Self { script, calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl EmbeddingModel for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.script {
                Script::Echo => Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect()),
                Script::Short => Ok(vec![vec![1.0, 0.0]]),
                Script::Ragged => Ok(texts.iter().enumerate().map(|(i, _)| vec![1.0; i + 1]).collect()),
                Script::Policy => Err(Error::PolicyRejected("flagged".to_string())),
                Script::Down => Err(Error::Inference("connection refused".to_string())),
            }
        }
    }

    fn texts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("headline {}", i)).collect()
    }

    #[tokio::test]
    async fn test_empty_input_skips_provider() {
        let model = ScriptedModel::new(Script::Echo);
        let gateway = EmbeddingGateway::new(model.clone());
        assert_eq!(gateway.embed(&[]).await, Embeddings::Available(vec![]));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_available() {
        let gateway = EmbeddingGateway::new(ScriptedModel::new(Script::Echo));
        let vectors = gateway.embed(&texts(3)).await.into_vectors().unwrap();
        assert_eq!(vectors.len(), 3);
    }

    #[tokio::test]
    async fn test_failures_become_unavailable() {
        for script in [Script::Short, Script::Ragged, Script::Policy, Script::Down] {
            let gateway = EmbeddingGateway::new(ScriptedModel::new(script));
            let result = gateway.embed(&texts(3)).await;
            assert!(!result.is_available());
        }
    }

    #[tokio::test]
    async fn test_policy_rejection_reason() {
        let gateway = EmbeddingGateway::new(ScriptedModel::new(Script::Policy));
        match gateway.embed(&texts(2)).await {
            Embeddings::Unavailable(reason) => assert!(reason.contains("policy")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_disabled_gateway() {
        let gateway = EmbeddingGateway::disabled();
        assert!(!gateway.embed(&texts(1)).await.is_available());
    }
}
