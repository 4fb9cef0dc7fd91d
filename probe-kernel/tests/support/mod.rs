#![allow(dead_code)]

use std::collections::VecDeque;
use std::future;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use probe_adapters::traits::{
    AdapterError, AdapterMetadata, AdapterResult, AssistantTurn, InferenceRequest, ModelAdapter,
    NativeToolCall,
};
use probe_kernel::ConversationDriver;
use probe_tools::registry::ToolRegistry;
use serde_json::Value;
use tokio::sync::Notify;

/// One scripted endpoint reaction.
pub enum Step {
    Reply(AssistantTurn),
    Fail(AdapterError),
    /// Never answers; signals `hung` first.
    Hang,
}

/// In-memory adapter replaying a fixed script and recording every request.
pub struct ScriptedAdapter {
    metadata: AdapterMetadata,
    script: Mutex<VecDeque<Step>>,
    repeat: Option<AssistantTurn>,
    requests: Mutex<Vec<InferenceRequest>>,
    hung: Arc<Notify>,
}

impl ScriptedAdapter {
    pub fn new(script: impl IntoIterator<Item = Step>) -> Self {
        Self {
            metadata: AdapterMetadata::new("scripted", "scripted-model"),
            script: Mutex::new(script.into_iter().collect()),
            repeat: None,
            requests: Mutex::new(Vec::new()),
            hung: Arc::new(Notify::new()),
        }
    }

    /// Answers every request with `turn`.
    pub fn repeating(turn: AssistantTurn) -> Self {
        let mut adapter = Self::new([]);
        adapter.repeat = Some(turn);
        adapter
    }

    pub fn requests(&self) -> Vec<InferenceRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn hung(&self) -> Arc<Notify> {
        Arc::clone(&self.hung)
    }
}

#[async_trait]
impl ModelAdapter for ScriptedAdapter {
    fn metadata(&self) -> &AdapterMetadata {
        &self.metadata
    }

    async fn infer(&self, request: InferenceRequest) -> AdapterResult<AssistantTurn> {
        self.requests.lock().unwrap().push(request);

        if let Some(turn) = &self.repeat {
            return Ok(turn.clone());
        }

        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Step::Reply(turn)) => Ok(turn),
            Some(Step::Fail(err)) => Err(err),
            Some(Step::Hang) => {
                self.hung.notify_one();
                future::pending::<AdapterResult<AssistantTurn>>().await
            }
            None => Ok(AssistantTurn::default()),
        }
    }
}

pub fn reply(content: &str) -> Step {
    Step::Reply(AssistantTurn::text(content))
}

pub fn native(name: &str, arguments: Value) -> Step {
    Step::Reply(AssistantTurn::default().with_tool_call(NativeToolCall::new(name, arguments)))
}

pub fn fenced(name: &str, arguments: &Value) -> String {
    format!(
        "Sure.\n```json\n{}\n```",
        serde_json::json!({ "name": name, "arguments": arguments })
    )
}

pub fn driver(adapter: &Arc<ScriptedAdapter>) -> ConversationDriver {
    let tools = Arc::new(ToolRegistry::builtin().unwrap());
    ConversationDriver::new(Arc::clone(adapter) as Arc<dyn ModelAdapter>, tools)
}
