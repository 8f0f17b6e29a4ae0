//! Step sequencer
//!
//! Drives one skill for one user through its ordered steps. Each inbound
//! message goes through [`Sequencer::next`], which either shows a prompt,
//! advances, re-prompts, skips steps already answered from memory, or hands
//! the message to the current step's input hook.
//!
//! The sequencer is not synchronized. Callers serialize access per
//! conversation (see [`crate::state::SessionRegistry`]).

use std::sync::Arc;
use serde::Serialize;
use tracing::{info_span, Instrument, Span};
use crate::memory::{Memory, MemoryStore};
use crate::models::{MemoryEntry, Message};
use crate::utils::logging::{log_empty_prompt, log_memory_skip, log_sequence_reset, log_step_transition};
use super::step::Step;

/// Callback invoked on every reset
pub type ResetHook = Box<dyn Fn(&Message) + Send + Sync>;

pub struct Sequencer {
    index: usize,
    entered: bool,
    steps: Vec<Box<dyn Step>>,
    package_id: String,
    memory: Memory,
    reset_hook: ResetHook,
    span: Span,
}

impl Sequencer {
    /// Create an empty sequencer for `package_id` backed by `store`
    pub fn new(package_id: impl Into<String>, store: Arc<dyn MemoryStore>) -> Self {
        let package_id = package_id.into();
        let span = info_span!("sequencer", pkg = %package_id);

        Self {
            index: 0,
            entered: false,
            steps: Vec::new(),
            memory: Memory::new(store, package_id.clone()),
            package_id,
            reset_hook: Box::new(|_| {}),
            span,
        }
    }

    /// Append one or more step sequences, in order
    pub fn set_steps<I, S>(&mut self, sequences: I)
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = Box<dyn Step>>,
    {
        for sequence in sequences {
            self.steps.extend(sequence);
        }
    }

    pub fn set_reset_hook<F>(&mut self, hook: F)
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        self.reset_hook = Box::new(hook);
    }

    /// Handle one inbound message and return the prompt to show.
    ///
    /// An empty string means the message was consumed and nothing needs to
    /// be shown.
    ///
    /// # Panics
    ///
    /// Panics when no steps have been registered.
    pub async fn next(&mut self, msg: &Message) -> String {
        let span = self.span.clone();
        self.drive(msg).instrument(span).await
    }

    async fn drive(&mut self, msg: &Message) -> String {
        assert!(
            !self.steps.is_empty(),
            "sequencer for package {} driven with no steps registered",
            self.package_id
        );

        // Checked before `entered`: a single-step sequence restarts on every call.
        if self.index + 1 >= self.steps.len() {
            self.reset(msg);
            return self.enter(msg).await;
        }

        if !self.entered {
            return self.enter(msg).await;
        }

        let completion = self.steps[self.index].on_complete(msg).await;
        if completion.done {
            log_step_transition(&self.package_id, msg.user.id, self.index, self.index + 1);
            self.index += 1;
            return self.enter(msg).await;
        }
        if !completion.prompt.is_empty() {
            return completion.prompt;
        }

        match self.remembered_key(msg).await {
            Some(key) => self.skip_remembered(msg, key).await,
            None => {
                self.steps[self.index].on_input(msg).await;
                String::new()
            }
        }
    }

    /// Show the current step's entry prompt and mark it entered
    async fn enter(&mut self, msg: &Message) -> String {
        self.entered = true;
        let prompt = self.steps[self.index].on_entry(msg).await;
        if prompt.is_empty() {
            log_empty_prompt(&self.package_id, self.index);
        }
        prompt
    }

    /// Memory key of the current step, if the user already has a value for it
    async fn remembered_key(&self, msg: &Message) -> Option<String> {
        let key = self.steps[self.index].memory_key()?;
        if self.memory.has_memory(msg, key).await {
            Some(key.to_string())
        } else {
            None
        }
    }

    /// Skip the current step and every following step whose memory is
    /// already satisfied, then enter the first one that is not.
    ///
    /// Bounded by the number of steps left; the last step is always entered.
    async fn skip_remembered(&mut self, msg: &Message, mut key: String) -> String {
        let remaining = self.steps.len() - self.index - 1;

        for _ in 0..remaining {
            log_memory_skip(&self.package_id, msg.user.id, self.index, &key);
            log_step_transition(&self.package_id, msg.user.id, self.index, self.index + 1);
            self.index += 1;

            if self.index + 1 >= self.steps.len() {
                break;
            }
            match self.remembered_key(msg).await {
                Some(next) => key = next,
                None => break,
            }
        }

        self.enter(msg).await
    }

    /// Pass a message straight to the current step's input hook
    ///
    /// # Panics
    ///
    /// Panics when no steps have been registered.
    pub async fn forward_input(&mut self, msg: &Message) {
        self.steps[self.index].on_input(msg).instrument(self.span.clone()).await;
    }

    /// Return to the first step and run the reset hook
    pub fn reset(&mut self, msg: &Message) {
        log_sequence_reset(&self.package_id, msg.user.id);
        self.index = 0;
        self.entered = false;
        (self.reset_hook)(msg);
    }

    pub async fn remember<T: Serialize + ?Sized>(&self, msg: &Message, key: &str, value: &T) {
        self.memory.remember(msg, key, value).await
    }

    pub async fn recall(&self, msg: &Message, key: &str) -> MemoryEntry {
        self.memory.recall(msg, key).await
    }

    pub async fn has_memory(&self, msg: &Message, key: &str) -> bool {
        self.memory.has_memory(msg, key).await
    }

    /// Package-scoped memory handle, for steps that persist preferences
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn package_id(&self) -> &str {
        &self.package_id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn entered(&self) -> bool {
        self.entered
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl std::fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequencer")
            .field("package_id", &self.package_id)
            .field("index", &self.index)
            .field("entered", &self.entered)
            .field("steps", &self.steps.len())
            .finish_non_exhaustive()
    }
}
