pub mod batch;
pub mod environment;
pub mod logging;
pub mod org;
pub mod prompts;
pub mod routing;
pub mod text;
pub mod translator;

use async_openai::{config::OpenAIConfig, Client as OpenAIClient};
use ollama_rs::Ollama;

pub use org::{render_org_name, OrgNameRenderer, RuleTables};
pub use routing::{is_likely_org_name, translate_smart, Route};
pub use text::{normalize, transliterate_name, transliterate_token};
pub use translator::{LlmTranslator, StatisticalTranslator, TranslatorError};

pub const TARGET_RENDER: &str = "org_render";
pub const TARGET_ROUTING: &str = "routing";
pub const TARGET_LLM_REQUEST: &str = "llm_request";

#[derive(Clone, Debug)]
pub enum LLMClient {
    Ollama(Ollama),
    OpenAI(OpenAIClient<OpenAIConfig>),
}

#[derive(Clone, Debug)]
pub struct LLMParams {
    pub llm_client: LLMClient,
    pub model: String,
    pub temperature: f32,
}
