// ── SSL warning confirmation ──
//
// Turning SSL on shows an informational warning about self-signed
// certificates. The warning never blocks or reverts the toggle; it only
// has to have been surfaced once per editing session.

/// Help page explaining how to set up SSL on the server.
pub const LEARN_MORE_URL: &str = "https://github.com/clangen/musikcube/wiki/ssl-server-setup";

/// How the warning dialog was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResponse {
    Ok,
    /// Open [`LEARN_MORE_URL`], then close.
    LearnMore,
    /// Closed without pressing a button.
    Dismissed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SslConfirmation {
    #[default]
    Idle,
    PromptShown,
    Acknowledged,
}

impl SslConfirmation {
    /// A new prompt may only be shown from `Idle`.
    pub fn needs_prompt(self) -> bool {
        self == Self::Idle
    }

    pub fn prompt_shown(self) -> Self {
        match self {
            Self::Idle => Self::PromptShown,
            other => other,
        }
    }

    pub fn close(self, response: DialogResponse) -> Self {
        match (self, response) {
            (Self::PromptShown, DialogResponse::Ok | DialogResponse::LearnMore) => {
                Self::Acknowledged
            }
            (Self::PromptShown, DialogResponse::Dismissed) => Self::Idle,
            (other, _) => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_and_learn_more_acknowledge() {
        for response in [DialogResponse::Ok, DialogResponse::LearnMore] {
            let state = SslConfirmation::Idle.prompt_shown().close(response);
            assert_eq!(state, SslConfirmation::Acknowledged);
            assert!(!state.needs_prompt());
        }
    }

    #[test]
    fn dismissal_returns_to_idle() {
        let state = SslConfirmation::Idle
            .prompt_shown()
            .close(DialogResponse::Dismissed);
        assert_eq!(state, SslConfirmation::Idle);
        assert!(state.needs_prompt());
    }

    #[test]
    fn no_second_prompt_while_one_is_showing() {
        let shown = SslConfirmation::Idle.prompt_shown();
        assert!(!shown.needs_prompt());
        assert_eq!(shown.prompt_shown(), SslConfirmation::PromptShown);
    }

    #[test]
    fn closing_without_prompt_is_ignored() {
        assert_eq!(
            SslConfirmation::Idle.close(DialogResponse::Ok),
            SslConfirmation::Idle
        );
        assert_eq!(
            SslConfirmation::Acknowledged.close(DialogResponse::Dismissed),
            SslConfirmation::Acknowledged
        );
    }
}
