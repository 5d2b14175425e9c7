//! Operator prompt backed by the process's standard streams.

use std::io::{self, Write};

use async_trait::async_trait;
use tenantctl_core::{CoreError, CoreResult, Prompt};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::cli::OutputFormat;

/// Reads answers from stdin one line at a time.
///
/// Questions and informational lines go to stdout in text mode and to stderr
/// in JSON mode, so stdout carries only the JSON document.
pub(crate) struct StdinPrompt {
    lines: Lines<BufReader<Stdin>>,
    to_stderr: bool,
}

impl StdinPrompt {
    pub(crate) fn new(output: OutputFormat) -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            to_stderr: output == OutputFormat::Json,
        }
    }

    fn write(&self, text: &str) {
        if self.to_stderr {
            let mut stderr = io::stderr().lock();
            let _ = stderr.write_all(text.as_bytes());
            let _ = stderr.flush();
        } else {
            let mut stdout = io::stdout().lock();
            let _ = stdout.write_all(text.as_bytes());
            let _ = stdout.flush();
        }
    }
}

#[async_trait]
impl Prompt for StdinPrompt {
    async fn ask(&mut self, question: &str) -> CoreResult<String> {
        self.write(&format!("{question}: "));
        match self.lines.next_line().await {
            Ok(Some(line)) => Ok(line.trim().to_string()),
            Ok(None) => Err(CoreError::PromptClosed {
                question: question.to_string(),
            }),
            Err(source) => Err(CoreError::Prompt { source }),
        }
    }

    fn tell(&mut self, message: &str) {
        self.write(&format!("{message}\n"));
    }
}
