//! Free-analysis wizard — a linear, one-question-per-step state machine.
//!
//! Progression is gated by [`fields::validate`]: `advance` refuses to move
//! past an invalid step, and reaching the end runs a full-form pass that
//! jumps back to the first failing step. Submission goes through the
//! [`LeadSubmitter`] seam so the network side can be stubbed in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SubmitError;
use crate::fields::{self, FieldDef, FREE_ANALYSIS_STEPS};

/// Discriminator tag attached to every wizard submission.
const LEAD_TYPE: &str = "free-analysis";

/// The wizard's network seam: delivers a completed lead to the backend.
#[async_trait]
pub trait LeadSubmitter: Send + Sync {
    async fn submit(&self, lead: Value) -> Result<(), SubmitError>;
}

/// Submits leads over HTTP to the backend's lead endpoint.
pub struct HttpLeadSubmitter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpLeadSubmitter {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl LeadSubmitter for HttpLeadSubmitter {
    async fn submit(&self, lead: Value) -> Result<(), SubmitError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&lead)
            .send()
            .await
            .map_err(|e| SubmitError(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(SubmitError(format!("backend returned {}", resp.status())));
        }
        Ok(())
    }
}

/// Outcome of an [`Wizard::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Current value failed validation; index unchanged, error recorded.
    Invalid,
    /// Moved forward one step.
    Moved,
    /// Full-form validation failed; jumped to the first failing step.
    JumpedBack,
    /// Every step validated; the caller should now call [`Wizard::submit`].
    ReadyToSubmit,
}

/// Outcome of a [`Wizard::submit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend accepted the lead; the wizard is now terminal.
    Accepted,
    /// A field failed full-form validation; index moved to the first failure.
    Invalid,
    /// The backend call failed; entered values are retained for a retry.
    Failed,
    /// A submission is already in flight or has already succeeded.
    Skipped,
}

/// Per-session wizard state. One instance per dialog lifecycle; `reset`
/// returns it to the initial state on close or "start over".
#[derive(Debug)]
pub struct Wizard {
    steps: &'static [FieldDef],
    current: usize,
    values: HashMap<String, String>,
    errors: HashMap<String, String>,
    submitting: bool,
    submitted: bool,
}

impl Wizard {
    /// Wizard over the canonical free-analysis step list.
    pub fn new() -> Self {
        Self::with_steps(FREE_ANALYSIS_STEPS)
    }

    /// Wizard over a custom ordered step list.
    pub fn with_steps(steps: &'static [FieldDef]) -> Self {
        Self {
            steps,
            current: 0,
            values: HashMap::new(),
            errors: HashMap::new(),
            submitting: false,
            submitted: false,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> &FieldDef {
        &self.steps[self.current]
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Progress through the steps as a percentage, for the progress bar.
    pub fn progress(&self) -> f32 {
        (self.current + 1) as f32 / self.steps.len() as f32 * 100.0
    }

    pub fn value(&self, key: &str) -> &str {
        self.values.get(key).map_or("", String::as_str)
    }

    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    /// Store a value. If the key already carries an error it is recomputed
    /// immediately so the message clears as soon as the input becomes valid.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if self.errors.contains_key(key) {
            if let Some(def) = self.steps.iter().find(|s| s.key == key) {
                match fields::validate(def, &value) {
                    Some(msg) => self.errors.insert(key.to_string(), msg),
                    None => self.errors.remove(key),
                };
            }
        }
        self.values.insert(key.to_string(), value);
    }

    /// Validate the current step and move forward; at the last step run the
    /// full-form pass instead.
    pub fn advance(&mut self) -> Advance {
        let step = &self.steps[self.current];
        if let Some(msg) = fields::validate(step, self.value(step.key)) {
            self.errors.insert(step.key.to_string(), msg);
            return Advance::Invalid;
        }

        if self.current < self.steps.len() - 1 {
            self.current += 1;
            return Advance::Moved;
        }

        match self.validate_all() {
            Some(first_bad) => {
                self.current = first_bad;
                Advance::JumpedBack
            }
            None => Advance::ReadyToSubmit,
        }
    }

    /// Go back one step. No validation — partially typed input stays put.
    pub fn retreat(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Submit the collected values through `submitter`.
    ///
    /// Re-runs full-form validation first, so calling this directly is as
    /// safe as going through `advance`. The `submitting` flag gates
    /// double-clicks: a second call while one is in flight (or after
    /// success) is a no-op.
    pub async fn submit<S>(&mut self, submitter: &S) -> SubmitOutcome
    where
        S: LeadSubmitter + ?Sized,
    {
        if self.submitting || self.submitted {
            return SubmitOutcome::Skipped;
        }
        if let Some(first_bad) = self.validate_all() {
            self.current = first_bad;
            return SubmitOutcome::Invalid;
        }

        self.submitting = true;
        let result = submitter.submit(self.lead_body()).await;
        self.submitting = false;

        match result {
            Ok(()) => {
                self.submitted = true;
                self.errors.clear();
                SubmitOutcome::Accepted
            }
            Err(e) => {
                // Values stay intact so the user can retry without retyping.
                tracing::warn!(error = %e, "Lead submission failed");
                SubmitOutcome::Failed
            }
        }
    }

    /// Return to the initial state — used on dialog close and "start over".
    pub fn reset(&mut self) {
        self.current = 0;
        self.values.clear();
        self.errors.clear();
        self.submitting = false;
        self.submitted = false;
    }

    /// Validate every step, recording all errors. Returns the index of the
    /// first failing step, or `None` when the whole form is valid.
    fn validate_all(&mut self) -> Option<usize> {
        let mut first_bad = None;
        for (i, step) in self.steps.iter().enumerate() {
            match fields::validate(step, self.values.get(step.key).map_or("", String::as_str)) {
                Some(msg) => {
                    self.errors.insert(step.key.to_string(), msg);
                    first_bad.get_or_insert(i);
                }
                None => {
                    self.errors.remove(step.key);
                }
            }
        }
        first_bad
    }

    /// The JSON body sent to the backend: the type tag plus every
    /// non-empty collected value.
    fn lead_body(&self) -> Value {
        let mut body = serde_json::Map::new();
        body.insert("type".to_string(), Value::String(LEAD_TYPE.to_string()));
        for step in self.steps {
            if let Some(v) = self.values.get(step.key) {
                body.insert(step.key.to_string(), Value::String(v.clone()));
            }
        }
        Value::Object(body)
    }
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Stub submitter: records bodies and answers from a canned script.
    struct StubSubmitter {
        calls: AtomicUsize,
        bodies: Mutex<Vec<Value>>,
        fail: bool,
    }

    impl StubSubmitter {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                bodies: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self { fail: true, ..Self::ok() }
        }
    }

    #[async_trait]
    impl LeadSubmitter for StubSubmitter {
        async fn submit(&self, lead: Value) -> Result<(), SubmitError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.bodies.lock().unwrap().push(lead);
            if self.fail {
                Err(SubmitError("backend returned 502".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn fill_valid(wizard: &mut Wizard) {
        wizard.set_value("name", "Ana Anić");
        wizard.set_value("email", "ana@x.com");
        wizard.set_value("goal90", "+30% leadova");
        wizard.set_value("unitProfit", "35");
        wizard.set_value("url", "https://primer.com");
    }

    #[test]
    fn advance_blocks_on_invalid_required_field() {
        let mut wizard = Wizard::new();
        assert_eq!(wizard.advance(), Advance::Invalid);
        assert_eq!(wizard.current_index(), 0);
        assert!(wizard.error("name").is_some());
    }

    #[test]
    fn advance_walks_valid_steps() {
        let mut wizard = Wizard::new();
        fill_valid(&mut wizard);
        for expected in 1..FREE_ANALYSIS_STEPS.len() {
            assert_eq!(wizard.advance(), Advance::Moved);
            assert_eq!(wizard.current_index(), expected);
        }
        assert_eq!(wizard.advance(), Advance::ReadyToSubmit);
    }

    #[test]
    fn last_step_jumps_to_first_invalid_step() {
        let mut wizard = Wizard::new();
        fill_valid(&mut wizard);
        // Walk to the last step, then blank out the email.
        for _ in 1..FREE_ANALYSIS_STEPS.len() {
            assert_eq!(wizard.advance(), Advance::Moved);
        }
        wizard.set_value("email", "");
        assert_eq!(wizard.advance(), Advance::JumpedBack);
        assert_eq!(wizard.current_index(), 1, "email is step 1");
        assert!(wizard.error("email").is_some());
        assert!(!wizard.is_submitted());
    }

    #[test]
    fn set_value_recomputes_only_existing_errors() {
        let mut wizard = Wizard::new();
        // No error yet: typing garbage records nothing.
        wizard.set_value("email", "broken");
        assert_eq!(wizard.error("email"), None);

        wizard.set_value("name", "Ana");
        assert_eq!(wizard.advance(), Advance::Moved);
        assert_eq!(wizard.advance(), Advance::Invalid);
        assert!(wizard.error("email").is_some());

        // Now that an error exists, a fixed value clears it on keystroke.
        wizard.set_value("email", "ana@x.com");
        assert_eq!(wizard.error("email"), None);
    }

    #[test]
    fn retreat_stops_at_first_step() {
        let mut wizard = Wizard::new();
        wizard.retreat();
        assert_eq!(wizard.current_index(), 0);

        wizard.set_value("name", "Ana");
        assert_eq!(wizard.advance(), Advance::Moved);
        wizard.retreat();
        assert_eq!(wizard.current_index(), 0);
    }

    #[tokio::test]
    async fn submit_sends_tagged_values() {
        let mut wizard = Wizard::new();
        fill_valid(&mut wizard);
        let stub = StubSubmitter::ok();

        assert_eq!(wizard.submit(&stub).await, SubmitOutcome::Accepted);
        assert!(wizard.is_submitted());
        assert!(!wizard.is_submitting());

        let bodies = stub.bodies.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["type"], "free-analysis");
        assert_eq!(bodies[0]["name"], "Ana Anić");
        assert_eq!(bodies[0]["unitProfit"], "35");
    }

    #[tokio::test]
    async fn failed_submit_retains_values() {
        let mut wizard = Wizard::new();
        fill_valid(&mut wizard);
        let stub = StubSubmitter::failing();

        assert_eq!(wizard.submit(&stub).await, SubmitOutcome::Failed);
        assert!(!wizard.is_submitted());
        assert!(!wizard.is_submitting());
        assert_eq!(wizard.value("email"), "ana@x.com");

        // Retry without retyping succeeds.
        let retry = StubSubmitter::ok();
        assert_eq!(wizard.submit(&retry).await, SubmitOutcome::Accepted);
    }

    #[tokio::test]
    async fn submit_after_success_is_skipped() {
        let mut wizard = Wizard::new();
        fill_valid(&mut wizard);
        let stub = StubSubmitter::ok();

        assert_eq!(wizard.submit(&stub).await, SubmitOutcome::Accepted);
        assert_eq!(wizard.submit(&stub).await, SubmitOutcome::Skipped);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn submit_revalidates_the_whole_form() {
        let mut wizard = Wizard::new();
        fill_valid(&mut wizard);
        wizard.set_value("unitProfit", "-5");
        let stub = StubSubmitter::ok();

        assert_eq!(wizard.submit(&stub).await, SubmitOutcome::Invalid);
        assert_eq!(wizard.current_index(), 3, "unitProfit is step 3");
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut wizard = Wizard::new();
        fill_valid(&mut wizard);
        assert_eq!(wizard.advance(), Advance::Moved);
        wizard.reset();

        assert_eq!(wizard.current_index(), 0);
        assert_eq!(wizard.value("name"), "");
        assert_eq!(wizard.error("name"), None);
        assert!(!wizard.is_submitted());
        assert!(!wizard.is_submitting());
    }

    #[test]
    fn progress_spans_the_step_list() {
        let mut wizard = Wizard::new();
        let first = wizard.progress();
        assert!(first > 0.0 && first < 100.0);
        fill_valid(&mut wizard);
        for _ in 1..FREE_ANALYSIS_STEPS.len() {
            wizard.advance();
        }
        assert!((wizard.progress() - 100.0).abs() < f32::EPSILON);
    }
}
