use crate::cpf::{clean_cpf, format_cpf, is_valid_cpf, CPF_LEN};
use crate::errors::{INVALID_CPF_MESSAGE, REQUEST_FAILED_MESSAGE};
use crate::models::CreditProfile;
use crate::services::CreditAnalysisService;

/// What happened to a call to [`CreditForm::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A submission was already in flight; nothing was done.
    Busy,
    /// The CPF failed validation; no request was sent, previous results kept.
    Invalid,
    /// The webhook answered and `data` holds the new profile.
    Loaded,
    /// The webhook call failed; `data` was cleared.
    Failed,
}

/// State of the CPF form: input text, in-flight flag, inline error and results.
///
/// One instance per form. At most one submission runs at a time: `submit` refuses to
/// start while `loading` is set. Dropping the future returned by `submit` abandons the
/// request and leaves `loading` set; every later `submit` returns
/// [`SubmitOutcome::Busy`] until [`CreditForm::cancel`] is called.
#[derive(Debug, Clone, Default)]
pub struct CreditForm {
    cpf: String,
    loading: bool,
    data: Option<CreditProfile>,
    error: Option<String>,
}

impl CreditForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keystroke handler: keeps at most 11 digits, formatted once complete.
    ///
    /// Input that would exceed 11 digits is ignored and the previous value kept.
    pub fn on_input(&mut self, raw: &str) {
        let cleaned = clean_cpf(raw);
        if cleaned.len() <= CPF_LEN {
            self.cpf = format_cpf(&cleaned);
        }
    }

    pub fn cpf(&self) -> &str {
        &self.cpf
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn data(&self) -> Option<&CreditProfile> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Clears the in-flight flag of an abandoned submission.
    ///
    /// Returns whether a submission was marked as in flight.
    pub fn cancel(&mut self) -> bool {
        std::mem::replace(&mut self.loading, false)
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.cpf.trim().is_empty()
    }

    /// Validates the current input and, if valid, runs one analysis.
    pub async fn submit(&mut self, service: &CreditAnalysisService) -> SubmitOutcome {
        if self.loading {
            tracing::debug!("Submission ignored: request already in flight");
            return SubmitOutcome::Busy;
        }

        if !is_valid_cpf(&self.cpf) {
            tracing::debug!("Submission blocked: invalid CPF {:?}", self.cpf);
            self.error = Some(INVALID_CPF_MESSAGE.to_string());
            return SubmitOutcome::Invalid;
        }

        self.loading = true;
        self.error = None;
        self.data = None;

        let outcome = match service.analyze(&self.cpf).await {
            Ok(profile) => {
                self.data = Some(profile);
                SubmitOutcome::Loaded
            }
            Err(e) => {
                tracing::debug!("Credit analysis failed: {}", e);
                self.error = Some(REQUEST_FAILED_MESSAGE.to_string());
                SubmitOutcome::Failed
            }
        };

        self.loading = false;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_is_reformatted_on_every_keystroke() {
        let mut form = CreditForm::new();

        form.on_input("111");
        assert_eq!(form.cpf(), "111");

        form.on_input("111.4447");
        assert_eq!(form.cpf(), "1114447");

        form.on_input("11144477735");
        assert_eq!(form.cpf(), "111.444.777-35");
    }

    #[test]
    fn test_input_beyond_eleven_digits_is_ignored() {
        let mut form = CreditForm::new();
        form.on_input("11144477735");
        form.on_input("111.444.777-359");

        assert_eq!(form.cpf(), "111.444.777-35");
    }

    #[test]
    fn test_submit_enabled_only_with_input() {
        let mut form = CreditForm::new();
        assert!(!form.can_submit());

        form.on_input("1");
        assert!(form.can_submit());

        form.on_input("abc");
        assert!(!form.can_submit());
    }
}
