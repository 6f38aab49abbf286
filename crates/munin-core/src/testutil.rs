//! Scripted generator for unit tests. Replays canned responses in order and
//! records every prompt it was asked.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::GeneratorError;
use crate::provider::TextGenerator;

pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// All-success script.
    pub fn new(responses: Vec<&str>) -> Self {
        Self::with_results(responses.into_iter().map(Ok).collect())
    }

    /// Mixed script; `Err` entries surface as backend status errors.
    pub fn with_results(responses: Vec<Result<&str, &str>>) -> Self {
        let script = responses
            .into_iter()
            .map(|r| r.map(str::to_string).map_err(str::to_string))
            .collect();
        Self {
            script: Mutex::new(script),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Number of generate calls made so far.
    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Every prompt seen, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, _temperature: f32) -> Result<String, GeneratorError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(body)) => Ok(body),
            Some(Err(body)) => Err(GeneratorError::Status { status: 500, body }),
            None => Err(GeneratorError::EmptyCompletion),
        }
    }
}
