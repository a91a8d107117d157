//! AI gateway: turns a user message (and optional image) into a reply string.
//!
//! The gateway never fails. Without a provider it echoes in offline mode, and
//! any provider or image error becomes the reply text itself.

use std::path::Path;

use gemchat_types::llm::{CompletionRequest, ContentPart, LlmError, Message, MessageRole};
use tracing::{Instrument, debug, info_span, warn};

use super::box_provider::BoxLlmProvider;
use crate::service::fs::FileSystem;

/// Prefix used for replies generated without a provider.
pub const OFFLINE_PREFIX: &str = "(offline)";

/// MIME type sent when an image extension is not recognised.
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Reply boundary used by the HTTP layer.
pub struct AiGateway<F: FileSystem> {
    provider: Option<BoxLlmProvider>,
    fs: F,
    max_tokens: u32,
}

impl<F: FileSystem> AiGateway<F> {
    /// Gateway backed by a live provider.
    pub fn new(provider: BoxLlmProvider, fs: F, max_tokens: u32) -> Self {
        Self {
            provider: Some(provider),
            fs,
            max_tokens,
        }
    }

    /// Gateway with no credential configured.
    pub fn offline(fs: F) -> Self {
        Self {
            provider: None,
            fs,
            max_tokens: 0,
        }
    }

    pub fn provider(&self) -> Option<&BoxLlmProvider> {
        self.provider.as_ref()
    }

    pub fn is_offline(&self) -> bool {
        self.provider.is_none()
    }

    /// Produce a reply for `text`, attaching the image at `image_path` when it exists.
    pub async fn ask(&self, text: &str, image_path: Option<&Path>) -> String {
        let Some(provider) = &self.provider else {
            return format!("{OFFLINE_PREFIX} {text}");
        };

        let span = info_span!(
            "gen_ai.chat",
            gen_ai.system = provider.name(),
            gen_ai.request.model = provider.model(),
            gen_ai.request.max_tokens = self.max_tokens,
            gen_ai.request.has_image = image_path.is_some(),
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
            gen_ai.response.finish_reasons = tracing::field::Empty,
        );

        async {
            match self.complete(provider, text, image_path).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "Model call failed");
                    format!("{} error: {e}", provider.name())
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn complete(
        &self,
        provider: &BoxLlmProvider,
        text: &str,
        image_path: Option<&Path>,
    ) -> Result<String, LlmError> {
        let mut parts = vec![ContentPart::Text {
            text: text.to_string(),
        }];

        let image_path = match image_path {
            Some(path) => self.fs.exists(path).await.then_some(path),
            None => None,
        };
        if let Some(path) = image_path {
            let data = self
                .fs
                .read_file(path)
                .await
                .map_err(|e| LlmError::InvalidRequest(format!("cannot read image: {e}")))?;
            debug!(path = %path.display(), bytes = data.len(), "Attaching image");
            parts.push(ContentPart::Image {
                mime_type: mime_for_path(path).to_string(),
                data,
            });
        }

        let request = CompletionRequest {
            model: provider.model().to_string(),
            messages: vec![Message {
                role: MessageRole::User,
                parts,
            }],
            system: None,
            max_tokens: self.max_tokens,
            temperature: None,
        };

        let response = provider.complete(&request).await?;

        let span = tracing::Span::current();
        span.record("gen_ai.usage.input_tokens", response.usage.input_tokens);
        span.record("gen_ai.usage.output_tokens", response.usage.output_tokens);
        span.record(
            "gen_ai.response.finish_reasons",
            response.stop_reason.to_string().as_str(),
        );

        Ok(response.content)
    }
}

/// Image MIME type from a file extension, case-insensitive.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => DEFAULT_IMAGE_MIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use gemchat_types::llm::{CompletionResponse, ProviderCapabilities, StopReason, Usage};

    use crate::llm::provider::LlmProvider;
    use crate::service::fs::tests::MemoryFileSystem;

    /// Provider that records requests and returns a canned result.
    struct FakeProvider {
        capabilities: ProviderCapabilities,
        fail: bool,
        seen: std::sync::Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl FakeProvider {
        fn new(fail: bool) -> (Self, std::sync::Arc<Mutex<Vec<CompletionRequest>>>) {
            let seen = std::sync::Arc::new(Mutex::new(Vec::new()));
            let provider = Self {
                capabilities: ProviderCapabilities {
                    vision: true,
                    max_context_tokens: 1_000,
                    max_output_tokens: 100,
                },
                fail,
                seen: seen.clone(),
            };
            (provider, seen)
        }
    }

    impl LlmProvider for FakeProvider {
        fn name(&self) -> &str {
            "fake"
        }

        fn model(&self) -> &str {
            "fake-model"
        }

        fn capabilities(&self) -> &ProviderCapabilities {
            &self.capabilities
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.seen.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(LlmError::AuthenticationFailed);
            }
            Ok(CompletionResponse {
                id: "resp-1".to_string(),
                content: format!("echo: {}", request.messages[0].text()),
                model: request.model.clone(),
                stop_reason: StopReason::EndTurn,
                usage: Usage {
                    input_tokens: 3,
                    output_tokens: 2,
                },
            })
        }
    }

    #[tokio::test]
    async fn test_offline_echo() {
        let gateway = AiGateway::offline(MemoryFileSystem::default());
        assert!(gateway.is_offline());
        assert_eq!(gateway.ask("hello", None).await, "(offline) hello");
        assert_eq!(gateway.ask("", None).await, "(offline) ");
    }

    #[tokio::test]
    async fn test_offline_ignores_image() {
        let fs = MemoryFileSystem::default();
        fs.insert("/up/cat.png", b"png");
        let gateway = AiGateway::offline(fs);
        let reply = gateway.ask("look", Some(Path::new("/up/cat.png"))).await;
        assert_eq!(reply, "(offline) look");
    }

    #[tokio::test]
    async fn test_reply_from_provider() {
        let (provider, seen) = FakeProvider::new(false);
        let gateway = AiGateway::new(BoxLlmProvider::new(provider), MemoryFileSystem::default(), 256);

        let reply = gateway.ask("hi there", None).await;
        assert_eq!(reply, "echo: hi there");

        let requests = seen.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "fake-model");
        assert_eq!(requests[0].max_tokens, 256);
        assert!(!requests[0].messages[0].has_image());
    }

    #[tokio::test]
    async fn test_provider_error_becomes_reply() {
        let (provider, _) = FakeProvider::new(true);
        let gateway = AiGateway::new(BoxLlmProvider::new(provider), MemoryFileSystem::default(), 256);

        let reply = gateway.ask("hi", None).await;
        assert_eq!(reply, "fake error: authentication failed");
    }

    #[tokio::test]
    async fn test_existing_image_is_attached() {
        let fs = MemoryFileSystem::default();
        fs.insert("/up/cat.PNG", &[1, 2, 3]);
        let (provider, seen) = FakeProvider::new(false);
        let gateway = AiGateway::new(BoxLlmProvider::new(provider), fs, 256);

        gateway.ask("what is this", Some(Path::new("/up/cat.PNG"))).await;

        let requests = seen.lock().unwrap();
        let parts = &requests[0].messages[0].parts;
        assert_eq!(parts.len(), 2);
        assert_eq!(
            parts[1],
            ContentPart::Image {
                mime_type: "image/png".to_string(),
                data: vec![1, 2, 3],
            }
        );
    }

    #[tokio::test]
    async fn test_missing_image_sends_text_only() {
        let (provider, seen) = FakeProvider::new(false);
        let gateway = AiGateway::new(BoxLlmProvider::new(provider), MemoryFileSystem::default(), 256);

        let reply = gateway.ask("where", Some(Path::new("/up/gone.jpg"))).await;
        assert_eq!(reply, "echo: where");
        assert!(!seen.lock().unwrap()[0].messages[0].has_image());
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("a.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("a.GIF")), "image/gif");
        assert_eq!(mime_for_path(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a.webp")), DEFAULT_IMAGE_MIME);
        assert_eq!(mime_for_path(Path::new("noext")), DEFAULT_IMAGE_MIME);
    }
}
