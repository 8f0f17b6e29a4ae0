//! Recording step for driving the sequencer in tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use skillflow::{Completion, Message, Sequencer, Skill, Step};

/// Step that counts hook calls and returns a completion the test controls
#[derive(Clone)]
pub struct RecordingStep {
    pub name: String,
    entries: Arc<AtomicUsize>,
    inputs: Arc<AtomicUsize>,
    completion: Arc<Mutex<Completion>>,
    memory: Option<String>,
}

impl RecordingStep {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Arc::new(AtomicUsize::new(0)),
            inputs: Arc::new(AtomicUsize::new(0)),
            completion: Arc::new(Mutex::new(Completion::pending())),
            memory: None,
        }
    }

    pub fn remembering(mut self, key: &str) -> Self {
        self.memory = Some(key.to_string());
        self
    }

    pub fn always_done(self) -> Self {
        self.complete_with(Completion::done());
        self
    }

    pub fn complete_with(&self, completion: Completion) {
        *self.completion.lock().unwrap() = completion;
    }

    pub fn prompt(&self) -> String {
        format!("{} prompt", self.name)
    }

    pub fn entries(&self) -> usize {
        self.entries.load(Ordering::SeqCst)
    }

    pub fn inputs(&self) -> usize {
        self.inputs.load(Ordering::SeqCst)
    }

    pub fn boxed(&self) -> Box<dyn Step> {
        Box::new(self.clone())
    }
}

#[async_trait]
impl Step for RecordingStep {
    async fn on_entry(&self, _msg: &Message) -> String {
        self.entries.fetch_add(1, Ordering::SeqCst);
        self.prompt()
    }

    async fn on_input(&self, _msg: &Message) {
        self.inputs.fetch_add(1, Ordering::SeqCst);
    }

    async fn on_complete(&self, _msg: &Message) -> Completion {
        self.completion.lock().unwrap().clone()
    }

    fn memory_key(&self) -> Option<&str> {
        self.memory.as_deref()
    }
}

/// Skill made of recording steps
pub struct RecordingSkill {
    pub package: String,
    pub steps: Vec<RecordingStep>,
}

impl RecordingSkill {
    pub fn new(package: &str, steps: &[&RecordingStep]) -> Self {
        Self {
            package: package.to_string(),
            steps: steps.iter().map(|s| (*s).clone()).collect(),
        }
    }
}

impl Skill for RecordingSkill {
    fn package_id(&self) -> &str {
        &self.package
    }

    fn build(&self, sequencer: &mut Sequencer) {
        sequencer.set_steps([self.steps.iter().map(|s| s.boxed()).collect::<Vec<_>>()]);
    }
}
