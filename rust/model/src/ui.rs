// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Non-interactive user interface.

use std::collections::VecDeque;

use roomtag_core::{ChoiceOption, HostUi};

/// A notice shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

/// Answers prompts from a fixed script and records every notice.
///
/// Once the script runs out, prompts are treated as dismissed.
#[derive(Debug, Default)]
pub struct ScriptedUi {
    answers: VecDeque<Option<usize>>,
    questions: Vec<String>,
    notices: Vec<Notice>,
}

impl ScriptedUi {
    pub fn new(answers: impl IntoIterator<Item = Option<usize>>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Questions asked so far, in order.
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Message of the first notice with `title`.
    pub fn notice(&self, title: &str) -> Option<&str> {
        self.notices
            .iter()
            .find(|n| n.title == title)
            .map(|n| n.message.as_str())
    }
}

impl HostUi for ScriptedUi {
    fn prompt_choice(
        &mut self,
        title: &str,
        question: &str,
        options: &[ChoiceOption<'_>],
    ) -> Option<usize> {
        self.questions.push(question.to_string());
        let answer = self
            .answers
            .pop_front()
            .flatten()
            .filter(|&i| i < options.len());
        tracing::debug!(title, question, ?answer, "Scripted answer");
        answer
    }

    fn report(&mut self, title: &str, message: &str) {
        tracing::info!(title, message, "Notice");
        self.notices.push(Notice {
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}
