//! Shirt preferences skill
//!
//! Asks for a favourite colour and a shirt size, confirms, then searches
//! for matching products. Both answers are remembered per user, so a
//! returning user skips straight past questions they already answered.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, error, warn};
use crate::memory::Memory;
use crate::models::Message;
use crate::search::SearchClient;
use crate::state::{Completion, Sequencer, Skill, Step};
use crate::utils::errors::{Result, SkillflowError};

pub const PACKAGE_ID: &str = "preferences";
pub const COLOR_KEY: &str = "color";
pub const SIZE_KEY: &str = "size";

const PRODUCT_TYPE: &str = "shirts";
const MAX_RESULTS: usize = 3;

/// Answers given during the current conversation
#[derive(Debug, Clone, Default)]
struct Answers(Arc<Mutex<HashMap<String, String>>>);

impl Answers {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.lock().insert(key.to_string(), value);
    }

    fn clear(&self) {
        self.lock().clear();
    }

    /// Answer from this conversation, or the remembered one
    async fn resolve(&self, memory: &Memory, msg: &Message, key: &str) -> Option<String> {
        if let Some(answer) = self.get(key) {
            return Some(answer);
        }
        match memory.recall(msg, key).await.decode::<String>() {
            Ok(value) => value,
            Err(e) => {
                warn!(pkg = memory.package_id(), key = key, error = %e, "Remembered value has unexpected shape");
                None
            }
        }
    }
}

/// Question whose validated answer is remembered under `key`
struct QuestionStep {
    key: &'static str,
    question: &'static str,
    retry: &'static str,
    pattern: Regex,
    uppercase: bool,
    answers: Answers,
    memory: Memory,
}

impl QuestionStep {
    fn normalize(&self, input: &str) -> String {
        if self.uppercase {
            input.to_uppercase()
        } else {
            input.to_lowercase()
        }
    }
}

#[async_trait]
impl Step for QuestionStep {
    async fn on_entry(&self, _msg: &Message) -> String {
        self.question.to_string()
    }

    async fn on_input(&self, _msg: &Message) {
        debug!(key = self.key, "Waiting for an answer");
    }

    /// A valid reply answers the question and is remembered right away.
    /// A remembered answer leaves the step pending so the sequencer skips it.
    async fn on_complete(&self, msg: &Message) -> Completion {
        if self.answers.get(self.key).is_some() {
            return Completion::done();
        }
        if self.memory.has_memory(msg, self.key).await {
            return Completion::pending();
        }

        let input = msg.sentence();
        if input.is_empty() {
            return Completion::pending();
        }
        if !self.pattern.is_match(input) {
            return Completion::retry(self.retry);
        }

        let answer = self.normalize(input);
        self.answers.set(self.key, answer.clone());
        self.memory.remember(msg, self.key, &answer).await;
        Completion::done()
    }

    fn memory_key(&self) -> Option<&str> {
        Some(self.key)
    }
}

struct ConfirmStep {
    answers: Answers,
    memory: Memory,
}

#[async_trait]
impl Step for ConfirmStep {
    async fn on_entry(&self, msg: &Message) -> String {
        let color = self.answers.resolve(&self.memory, msg, COLOR_KEY).await;
        let size = self.answers.resolve(&self.memory, msg, SIZE_KEY).await;

        match (color, size) {
            (Some(color), Some(size)) => {
                self.answers.set(COLOR_KEY, color.clone());
                self.answers.set(SIZE_KEY, size.clone());
                format!("So you'd like a {} shirt in size {}. Shall I look for one? (yes/no)", color, size)
            }
            _ => String::new(),
        }
    }

    async fn on_input(&self, _msg: &Message) {}

    async fn on_complete(&self, msg: &Message) -> Completion {
        match msg.sentence().to_lowercase().as_str() {
            "yes" | "y" => Completion::done(),
            "no" | "n" => Completion::retry("No problem. Send /forget to change your answers."),
            _ => Completion::retry("Please answer yes or no."),
        }
    }
}

struct ResultsStep {
    answers: Answers,
    search: Option<SearchClient>,
}

#[async_trait]
impl Step for ResultsStep {
    async fn on_entry(&self, _msg: &Message) -> String {
        let color = self.answers.get(COLOR_KEY).unwrap_or_default();
        let size = self.answers.get(SIZE_KEY).unwrap_or_default();

        let Some(search) = &self.search else {
            return format!("Thanks! I'll remember you like {} shirts in size {}.", color, size);
        };

        let query = format!("{} shirt {}", color, size);
        match search.find_products(&query, PRODUCT_TYPE, MAX_RESULTS).await {
            Ok(products) if products.is_empty() => {
                format!("I couldn't find any {} shirts right now, but I'll remember your size.", color)
            }
            Ok(products) => {
                let mut reply = format!("Here's what I found for a {} shirt in {}:", color, size);
                for product in products {
                    reply.push_str(&format!("\n- {} (${}.{:02})", product.name, product.price / 100, product.price % 100));
                }
                reply
            }
            Err(e) => {
                error!(pkg = PACKAGE_ID, error = %e, "Product search failed");
                "Sorry, I can't search the shop right now. Please try again later.".to_string()
            }
        }
    }

    async fn on_input(&self, _msg: &Message) {}

    async fn on_complete(&self, _msg: &Message) -> Completion {
        Completion::pending()
    }
}

/// Skill asking for shirt colour and size
#[derive(Clone, Debug)]
pub struct PreferencesSkill {
    color_pattern: Regex,
    size_pattern: Regex,
    search: Option<SearchClient>,
}

impl PreferencesSkill {
    pub fn new(search: Option<SearchClient>) -> Result<Self> {
        let color_pattern = Regex::new(r"^[a-zA-Z][a-zA-Z ]{2,19}$")
            .map_err(|e| SkillflowError::Config(format!("Invalid colour pattern: {}", e)))?;
        let size_pattern = Regex::new(r"^(?i)(xs|s|m|l|xl|xxl)$")
            .map_err(|e| SkillflowError::Config(format!("Invalid size pattern: {}", e)))?;

        Ok(Self {
            color_pattern,
            size_pattern,
            search,
        })
    }
}

impl Skill for PreferencesSkill {
    fn package_id(&self) -> &str {
        PACKAGE_ID
    }

    fn build(&self, sequencer: &mut Sequencer) {
        let answers = Answers::default();
        let memory = sequencer.memory().clone();

        let color = QuestionStep {
            key: COLOR_KEY,
            question: "What's your favourite colour?",
            retry: "That doesn't look like a colour. Try something like \"navy blue\".",
            pattern: self.color_pattern.clone(),
            uppercase: false,
            answers: answers.clone(),
            memory: memory.clone(),
        };
        let size = QuestionStep {
            key: SIZE_KEY,
            question: "What shirt size do you wear? (XS, S, M, L, XL, XXL)",
            retry: "Please pick one of XS, S, M, L, XL or XXL.",
            pattern: self.size_pattern.clone(),
            uppercase: true,
            answers: answers.clone(),
            memory: memory.clone(),
        };
        let confirm = ConfirmStep {
            answers: answers.clone(),
            memory,
        };
        let results = ResultsStep {
            answers: answers.clone(),
            search: self.search.clone(),
        };

        sequencer.set_steps([vec![
            Box::new(color) as Box<dyn Step>,
            Box::new(size),
            Box::new(confirm),
            Box::new(results),
        ]]);
        sequencer.set_reset_hook(move |_| answers.clear());
    }
}
