//! Step contract
//!
//! A step is one unit of conversation. The sequencer only ever calls its
//! hooks; it never looks inside.

use async_trait::async_trait;
use crate::models::Message;

/// Result of a step's completion check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// Move on to the next step
    pub done: bool,
    /// Shown instead of advancing when non-empty (e.g. "invalid input, try again")
    pub prompt: String,
}

impl Completion {
    pub fn done() -> Self {
        Self {
            done: true,
            prompt: String::new(),
        }
    }

    /// Not complete; the next message goes to the input hook
    pub fn pending() -> Self {
        Self::default()
    }

    /// Not complete; show `prompt` and skip the input hook
    pub fn retry(prompt: impl Into<String>) -> Self {
        Self {
            done: false,
            prompt: prompt.into(),
        }
    }
}

impl From<(bool, String)> for Completion {
    fn from((done, prompt): (bool, String)) -> Self {
        Self { done, prompt }
    }
}

/// Behavior hooks of a single step
///
/// * `on_entry` runs once per visit and returns the prompt shown to the user.
///   Do any preparation (searches, lookups) here.
/// * `on_input` consumes a message. It must not steer the flow and must
///   handle its own errors; log them, never panic.
/// * `on_complete` decides whether the flow moves on. It may supply a prompt
///   to show instead, in which case `on_input` is not called.
/// * `memory_key` names a remembered preference that, once stored, lets the
///   sequencer skip this step.
#[async_trait]
pub trait Step: Send + Sync {
    async fn on_entry(&self, msg: &Message) -> String;

    async fn on_input(&self, msg: &Message);

    async fn on_complete(&self, msg: &Message) -> Completion;

    fn memory_key(&self) -> Option<&str> {
        None
    }
}

type EntryFn = Box<dyn Fn(&Message) -> String + Send + Sync>;
type InputFn = Box<dyn Fn(&Message) + Send + Sync>;
type CompleteFn = Box<dyn Fn(&Message) -> Completion + Send + Sync>;

/// A step assembled from plain closures
///
/// Handy for steps that keep no async state. Defaults: input is ignored and
/// the step never completes on its own.
pub struct StepRecord {
    on_entry: EntryFn,
    on_input: InputFn,
    on_complete: CompleteFn,
    memory: Option<String>,
}

impl StepRecord {
    pub fn new<F>(on_entry: F) -> Self
    where
        F: Fn(&Message) -> String + Send + Sync + 'static,
    {
        Self {
            on_entry: Box::new(on_entry),
            on_input: Box::new(|_| {}),
            on_complete: Box::new(|_| Completion::pending()),
            memory: None,
        }
    }

    /// Step that always shows the same prompt
    pub fn prompt(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |_| text.clone())
    }

    pub fn on_input<F>(mut self, f: F) -> Self
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        self.on_input = Box::new(f);
        self
    }

    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: Fn(&Message) -> Completion + Send + Sync + 'static,
    {
        self.on_complete = Box::new(f);
        self
    }

    pub fn memory(mut self, key: impl Into<String>) -> Self {
        self.memory = Some(key.into());
        self
    }

    pub fn boxed(self) -> Box<dyn Step> {
        Box::new(self)
    }
}

#[async_trait]
impl Step for StepRecord {
    async fn on_entry(&self, msg: &Message) -> String {
        (self.on_entry)(msg)
    }

    async fn on_input(&self, msg: &Message) {
        (self.on_input)(msg)
    }

    async fn on_complete(&self, msg: &Message) -> Completion {
        (self.on_complete)(msg)
    }

    fn memory_key(&self) -> Option<&str> {
        self.memory.as_deref()
    }
}

impl std::fmt::Debug for StepRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepRecord")
            .field("memory", &self.memory)
            .finish_non_exhaustive()
    }
}
