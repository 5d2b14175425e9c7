//! Operator interaction seam.

use async_trait::async_trait;

use crate::error::CoreResult;

/// Line-oriented conversation with the operator.
#[async_trait]
pub trait Prompt: Send {
    /// Show `question` and read one line, trimmed of surrounding whitespace.
    ///
    /// # Errors
    ///
    /// [`CoreError::PromptClosed`](crate::CoreError::PromptClosed) at end of
    /// input, [`CoreError::Prompt`](crate::CoreError::Prompt) on read failures.
    async fn ask(&mut self, question: &str) -> CoreResult<String>;

    /// Show an informational line.
    fn tell(&mut self, message: &str);
}

/// How an answer is matched against the affirmative token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    token: &'static str,
    case_sensitive: bool,
}

impl Confirmation {
    /// Guards organization deletion: only an exact lowercase `y` proceeds.
    pub const DESTRUCTIVE: Self = Self::strict("y");
    /// Guards key creation: `y` or `Y`.
    pub const CASUAL: Self = Self::lenient("y");

    /// Answer must equal `token` exactly.
    #[must_use]
    pub const fn strict(token: &'static str) -> Self {
        Self {
            token,
            case_sensitive: true,
        }
    }

    /// Answer must equal `token` ignoring ASCII case.
    #[must_use]
    pub const fn lenient(token: &'static str) -> Self {
        Self {
            token,
            case_sensitive: false,
        }
    }

    /// Whether matching is case-sensitive.
    #[must_use]
    pub const fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Whether `answer` (already trimmed or not) confirms.
    #[must_use]
    pub fn accepts(&self, answer: &str) -> bool {
        let answer = answer.trim();
        if self.case_sensitive {
            answer == self.token
        } else {
            answer.eq_ignore_ascii_case(self.token)
        }
    }
}
