use dialoguer::Confirm;
use tracing::warn;

/// Yes/no gate in front of destructive operations.
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Always approves; used for `--yes`.
pub struct AssumeYes;

impl Confirmation for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Always declines.
pub struct AssumeNo;

impl Confirmation for AssumeNo {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

/// Asks on the terminal. Any prompt failure (closed stdin, no tty) counts as "no".
pub struct TerminalPrompt;

impl Confirmation for TerminalPrompt {
    fn confirm(&self, prompt: &str) -> bool {
        match Confirm::new().with_prompt(prompt).default(false).interact() {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Confirmation prompt failed, treating as declined: {}", e);
                false
            }
        }
    }
}
