use crate::DigestResult;

/// Seam to the generative text service.
///
/// One stateless request/response call: prompt in, completion text out.
/// `max_tokens` caps the response length per call site.
pub trait TextGenerator: Send + Sync {
    fn id(&self) -> &str;
    fn generate(&self, prompt: &str, max_tokens: u32) -> DigestResult<String>;
}
