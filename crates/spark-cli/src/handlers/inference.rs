//! `status`, `chat` and `complete` against either backend.

use spark_core::{Backend, ChatMessage};
use spark_gateway::{ChatParams, CompleteParams};

use crate::bootstrap::CliContext;

pub struct ChatArgs {
    pub backend: Backend,
    pub message: String,
    pub system_prompt: Option<String>,
    pub temperature: f64,
    pub max_tokens: i64,
    pub model: Option<String>,
}

impl ChatArgs {
    fn into_params(self) -> ChatParams {
        ChatParams {
            messages: vec![ChatMessage::user(self.message)],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            system_prompt: self.system_prompt,
            model: self.model,
        }
    }
}

pub struct CompleteArgs {
    pub backend: Backend,
    pub prompt: String,
    pub temperature: f64,
    pub max_tokens: i64,
    pub stop: Vec<String>,
    pub model: Option<String>,
}

impl CompleteArgs {
    fn into_params(self) -> CompleteParams {
        CompleteParams {
            prompt: self.prompt,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stop: (!self.stop.is_empty()).then_some(self.stop),
            model: self.model,
        }
    }
}

pub async fn status(ctx: &CliContext, backend: Backend) {
    println!("{}", ctx.tools(backend).status().await);
}

pub async fn chat(ctx: &CliContext, args: ChatArgs) {
    let tools = ctx.tools(args.backend);
    println!("{}", tools.chat(args.into_params()).await);
}

pub async fn complete(ctx: &CliContext, args: CompleteArgs) {
    let tools = ctx.tools(args.backend);
    println!("{}", tools.complete(args.into_params()).await);
}
