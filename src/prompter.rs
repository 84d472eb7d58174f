/*!
 * Operator interaction.
 *
 * Review operations ask the operator for names and confirmations through
 * the `Prompter` trait. A declined or empty answer is `None`/`false` and
 * callers abort quietly.
 */

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Source of operator answers
pub trait Prompter: Send + Sync {
    /// Ask for a line of text, offering `default`
    ///
    /// Returns `None` when the operator declines; the answer is trimmed.
    fn prompt(&self, message: &str, default: Option<&str>) -> Option<String>;

    /// Ask a yes/no question
    fn confirm(&self, message: &str) -> bool;
}

/// Prompter reading answers from standard input
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    fn read_line(&self, label: &str) -> Option<String> {
        let mut stderr = io::stderr();
        let _ = write!(stderr, "{}", label);
        let _ = stderr.flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn prompt(&self, message: &str, default: Option<&str>) -> Option<String> {
        let label = match default {
            Some(value) if !value.is_empty() => format!("{} [{}]: ", message, value),
            _ => format!("{}: ", message),
        };

        let answer = self.read_line(&label)?;
        if answer.is_empty() {
            return default.map(str::to_string).filter(|d| !d.is_empty());
        }
        Some(answer)
    }

    fn confirm(&self, message: &str) -> bool {
        self.read_line(&format!("{} [y/N]: ", message))
            .map(|answer| matches!(answer.to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false)
    }
}

/// Prompter answering from a fixed script, for tests and batch runs
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<Option<String>>>,
    confirmations: Mutex<VecDeque<bool>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    /// Create a prompter with no queued answers
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for the next `prompt`; `None` declines
    pub fn answer(self, answer: Option<&str>) -> Self {
        self.answers.lock().push_back(answer.map(str::to_string));
        self
    }

    /// Queue an answer for the next `confirm`
    pub fn confirmation(self, accepted: bool) -> Self {
        self.confirmations.lock().push_back(accepted);
        self
    }

    /// Messages shown so far, prompts and confirmations alike
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&self, message: &str, _default: Option<&str>) -> Option<String> {
        self.asked.lock().push(message.to_string());
        self.answers
            .lock()
            .pop_front()
            .flatten()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
    }

    fn confirm(&self, message: &str) -> bool {
        self.asked.lock().push(message.to_string());
        self.confirmations.lock().pop_front().unwrap_or(false)
    }
}
