// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line-based prompts on a terminal.

use std::io::{self, BufRead, Write};

use roomtag_core::{ChoiceOption, HostUi};

/// Asks numbered questions on `output` and reads answers from `input`.
///
/// An empty line, `q` or end of input dismisses a prompt.
pub struct TerminalUi<R, W> {
    input: R,
    output: W,
}

impl TerminalUi<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalUi<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(
        &mut self,
        title: &str,
        question: &str,
        options: &[ChoiceOption<'_>],
    ) -> io::Result<Option<usize>> {
        writeln!(self.output, "\n{title}: {question}")?;
        for (i, option) in options.iter().enumerate() {
            match option.detail {
                Some(detail) => {
                    writeln!(self.output, "  {}) {} - {}", i + 1, option.label, detail)?
                }
                None => writeln!(self.output, "  {}) {}", i + 1, option.label)?,
            }
        }

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let answer = line.trim();
            if answer.is_empty() || answer.eq_ignore_ascii_case("q") {
                return Ok(None);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => writeln!(self.output, "Enter a number from 1 to {}", options.len())?,
            }
        }
    }
}

impl<R: BufRead, W: Write> HostUi for TerminalUi<R, W> {
    fn prompt_choice(
        &mut self,
        title: &str,
        question: &str,
        options: &[ChoiceOption<'_>],
    ) -> Option<usize> {
        self.ask(title, question, options).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Prompt failed, treating it as dismissed");
            None
        })
    }

    fn report(&mut self, title: &str, message: &str) {
        if let Err(err) = writeln!(self.output, "{title}: {message}") {
            tracing::warn!(error = %err, title, message, "Notice not shown");
        }
    }
}
