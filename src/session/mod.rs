use crate::actions::{self, ActionContext};
use crate::context::{AnswerInput, Feedback, GatheringContext};
use crate::flow::FlowConfig;
use crate::wire::{AffirmationsResult, ScreenResult, SummaryKind};

/// What the controller wants to do after an answer is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    FetchScreen,
    GenerateAffirmations,
}

/// One session's state machine. Owns the gathering context and the review
/// feedback; one outstanding agent request at a time, `is_generating` set
/// before each dispatch and cleared on every path. No cancellation; retry is
/// the caller re-invoking the same fetch.
pub struct SessionController {
    pub ctx: GatheringContext,
    pub feedback: Feedback,
    pub is_generating: bool,
    flow: FlowConfig,
    last_agent_ready: bool,
}

impl SessionController {
    pub fn new(name: impl Into<String>, flow: FlowConfig) -> Self {
        Self {
            ctx: GatheringContext::new(name),
            feedback: Feedback::default(),
            is_generating: false,
            flow,
            last_agent_ready: false,
        }
    }

    pub fn flow(&self) -> &FlowConfig {
        &self.flow
    }

    /// The 1-indexed number of the step about to be fetched, counting
    /// skipped steps.
    pub fn current_screen(&self) -> u32 {
        self.ctx.current_step()
    }

    pub async fn fetch_screen(&mut self, acx: &ActionContext<'_>) -> ScreenResult {
        self.is_generating = true;
        let result = actions::generate_screen(acx, &self.ctx).await;
        self.is_generating = false;
        if result.error.is_none() {
            self.last_agent_ready = result.ready_for_affirmations;
        }
        result
    }

    /// Record the answer for `question` and decide what happens next. The
    /// exchange is appended and the counter bumped before the policy runs, so
    /// the table sees the count including this answer.
    pub fn submit_answer(&mut self, question: &str, answer: AnswerInput) -> NextStep {
        self.ctx.record_answer(question, answer);
        if self.flow.should_proceed(self.ctx.screen_number, self.last_agent_ready) {
            NextStep::GenerateAffirmations
        } else {
            NextStep::FetchScreen
        }
    }

    /// A skipped step produces no exchange, but the step counter still
    /// advances so the next fetch targets the step after it. Returns whether
    /// the screen was skipped.
    pub fn handle_skip(&mut self, screen: &ScreenResult) -> bool {
        if screen.error.is_none() && screen.skip {
            self.ctx.record_skip();
            true
        } else {
            false
        }
    }

    pub async fn fetch_affirmations(&mut self, acx: &ActionContext<'_>) -> AffirmationsResult {
        self.is_generating = true;
        let result = actions::generate_affirmations(acx, &self.ctx, &self.feedback).await;
        self.is_generating = false;
        result
    }

    pub async fn fetch_summary(&mut self, acx: &ActionContext<'_>, kind: SummaryKind) -> String {
        self.is_generating = true;
        let result = actions::generate_summary(acx, &self.ctx, kind).await;
        self.is_generating = false;
        result
    }

    /// One reviewed affirmation, kept or passed over.
    pub fn review(&mut self, affirmation: String, approved: bool) {
        if approved {
            self.feedback.approved.push(affirmation);
        } else {
            self.feedback.skipped.push(affirmation);
        }
    }

    pub fn reset(&mut self) {
        self.ctx.reset();
        self.feedback = Feedback::default();
        self.last_agent_ready = false;
        self.is_generating = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::VariantKind;
    use crate::provider::{AffirmationAgent, GenerateOptions};
    use crate::template::TomlTemplateStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedAgent {
        replies: Mutex<Vec<anyhow::Result<String>>>,
    }

    impl ScriptedAgent {
        fn new(replies: Vec<anyhow::Result<String>>) -> Self {
            let mut replies = replies;
            replies.reverse();
            Self { replies: Mutex::new(replies) }
        }
    }

    #[async_trait]
    impl AffirmationAgent for ScriptedAgent {
        async fn generate(
            &self,
            _prompt: &str,
            _opts: &GenerateOptions,
            _debug: bool,
        ) -> anyhow::Result<String> {
            self.replies
                .lock()
                .expect("lock")
                .pop()
                .unwrap_or_else(|| Err(anyhow::anyhow!("script exhausted")))
        }
    }

    fn screen_json(ready: bool) -> String {
        serde_json::json!({
            "question": "And what else?",
            "initialChips": ["calm"],
            "expandedChips": ["calm", "rest"],
            "readyForAffirmations": ready,
            "reflectiveStatement": ""
        })
        .to_string()
    }

    fn answer() -> AnswerInput {
        AnswerInput { text: "something".into(), selected: vec![] }
    }

    #[tokio::test]
    async fn minimum_two_screens_even_when_agent_is_ready() {
        let agent = ScriptedAgent::new(vec![Ok(screen_json(true))]);
        let flow = FlowConfig::preset(VariantKind::Fo01);
        let store = TomlTemplateStore::empty("fo-01");
        let mut ctrl = SessionController::new("Aria", flow.clone());
        let acx = ActionContext {
            agent: &agent,
            templates: &store,
            flow: &flow,
            log: None,
            default_temperature: 0.9,
            debug: false,
        };

        let screen = ctrl.fetch_screen(&acx).await;
        assert!(screen.error.is_none());
        assert!(screen.ready_for_affirmations);
        // First answer submitted; agent readiness cannot beat the minimum.
        assert_eq!(ctrl.submit_answer(&screen.question, answer()), NextStep::FetchScreen);
        assert_eq!(ctrl.ctx.screen_number, 1);
    }

    #[tokio::test]
    async fn agent_readiness_decides_in_the_middle_band() {
        let agent = ScriptedAgent::new(vec![Ok(screen_json(false)), Ok(screen_json(true))]);
        let flow = FlowConfig::preset(VariantKind::Fo01);
        let store = TomlTemplateStore::empty("fo-01");
        let mut ctrl = SessionController::new("Aria", flow.clone());
        let acx = ActionContext {
            agent: &agent,
            templates: &store,
            flow: &flow,
            log: None,
            default_temperature: 0.9,
            debug: false,
        };

        let s1 = ctrl.fetch_screen(&acx).await;
        assert_eq!(ctrl.submit_answer(&s1.question, answer()), NextStep::FetchScreen);

        let s2 = ctrl.fetch_screen(&acx).await;
        assert!(s2.ready_for_affirmations);
        // Second answer, agent ready: proceed.
        assert_eq!(
            ctrl.submit_answer(&s2.question, answer()),
            NextStep::GenerateAffirmations
        );
    }

    #[tokio::test]
    async fn hard_cap_forces_affirmations_at_five() {
        let replies = (0..5).map(|_| Ok(screen_json(false))).collect();
        let agent = ScriptedAgent::new(replies);
        let flow = FlowConfig::preset(VariantKind::Fo01);
        let store = TomlTemplateStore::empty("fo-01");
        let mut ctrl = SessionController::new("Aria", flow.clone());
        let acx = ActionContext {
            agent: &agent,
            templates: &store,
            flow: &flow,
            log: None,
            default_temperature: 0.9,
            debug: false,
        };

        for expected_screen in 1..=4 {
            assert_eq!(ctrl.current_screen(), expected_screen);
            let s = ctrl.fetch_screen(&acx).await;
            assert_eq!(ctrl.submit_answer(&s.question, answer()), NextStep::FetchScreen);
        }
        let s5 = ctrl.fetch_screen(&acx).await;
        assert!(!s5.ready_for_affirmations);
        // Fifth answer: cap wins over the agent's reluctance.
        assert_eq!(
            ctrl.submit_answer(&s5.question, answer()),
            NextStep::GenerateAffirmations
        );
    }

    #[tokio::test]
    async fn generating_flag_clears_on_error_too() {
        let agent = ScriptedAgent::new(vec![Err(anyhow::anyhow!("down"))]);
        let flow = FlowConfig::preset(VariantKind::Fo01);
        let store = TomlTemplateStore::empty("fo-01");
        let mut ctrl = SessionController::new("Aria", flow.clone());
        let acx = ActionContext {
            agent: &agent,
            templates: &store,
            flow: &flow,
            log: None,
            default_temperature: 0.9,
            debug: false,
        };

        let screen = ctrl.fetch_screen(&acx).await;
        assert!(screen.error.is_some());
        assert!(!ctrl.is_generating);
    }

    #[tokio::test]
    async fn review_feeds_the_feedback_lists() {
        let flow = FlowConfig::preset(VariantKind::Fo01);
        let mut ctrl = SessionController::new("Aria", flow);
        ctrl.review("I am steady".into(), true);
        ctrl.review("I am loud".into(), false);
        assert_eq!(ctrl.feedback.approved, vec!["I am steady"]);
        assert_eq!(ctrl.feedback.skipped, vec!["I am loud"]);
    }

    #[tokio::test]
    async fn skipped_step_advances_to_the_next_step() {
        let mut with_skip =
            serde_json::from_str::<serde_json::Value>(&screen_json(false)).expect("json");
        with_skip["skip"] = serde_json::json!(true);
        // Step 1 and step 3 payloads carry no skip field; only step 2 is
        // skippable in FO-11, and the agent skips it.
        let agent = ScriptedAgent::new(vec![
            Ok(screen_json(false)),
            Ok(with_skip.to_string()),
            Ok(screen_json(false)),
        ]);
        let flow = FlowConfig::preset(VariantKind::Fo11);
        let store = TomlTemplateStore::empty("fo-11");
        let mut ctrl = SessionController::new("Aria", flow.clone());
        let acx = ActionContext {
            agent: &agent,
            templates: &store,
            flow: &flow,
            log: None,
            default_temperature: 0.9,
            debug: false,
        };

        let s1 = ctrl.fetch_screen(&acx).await;
        assert!(s1.error.is_none());
        assert!(!ctrl.handle_skip(&s1));
        assert_eq!(ctrl.submit_answer(&s1.question, answer()), NextStep::FetchScreen);
        assert_eq!(ctrl.current_screen(), 2);

        let s2 = ctrl.fetch_screen(&acx).await;
        assert!(s2.error.is_none());
        assert!(s2.skip);
        assert!(ctrl.handle_skip(&s2));
        // No exchange for the skipped step, but the flow moves on to step 3.
        assert_eq!(ctrl.ctx.screen_number, 1);
        assert_eq!(ctrl.current_screen(), 3);

        // Step 3 is not skippable, so its payload validates without a skip
        // flag. Were the skipped step re-requested, this fetch would fail
        // the skip-field requirement instead.
        let s3 = ctrl.fetch_screen(&acx).await;
        assert!(s3.error.is_none());
        assert!(!ctrl.handle_skip(&s3));
        assert_eq!(ctrl.current_screen(), 3);
    }

    #[tokio::test]
    async fn agent_cannot_pin_the_wizard_on_a_skippable_step() {
        // An agent that always says skip for step 2 must not be asked for
        // step 2 twice.
        let mut with_skip =
            serde_json::from_str::<serde_json::Value>(&screen_json(false)).expect("json");
        with_skip["skip"] = serde_json::json!(true);
        let agent = ScriptedAgent::new(vec![
            Ok(screen_json(false)),
            Ok(with_skip.to_string()),
            Ok(with_skip.to_string()),
        ]);
        let flow = FlowConfig::preset(VariantKind::Fo11);
        let store = TomlTemplateStore::empty("fo-11");
        let mut ctrl = SessionController::new("Aria", flow.clone());
        let acx = ActionContext {
            agent: &agent,
            templates: &store,
            flow: &flow,
            log: None,
            default_temperature: 0.9,
            debug: false,
        };

        let s1 = ctrl.fetch_screen(&acx).await;
        ctrl.submit_answer(&s1.question, answer());

        let s2 = ctrl.fetch_screen(&acx).await;
        assert!(ctrl.handle_skip(&s2));

        // Step 3 does not honor the agent's skip flag even if it sends one.
        let s3 = ctrl.fetch_screen(&acx).await;
        assert!(s3.error.is_none());
        assert!(!s3.skip);
        assert!(!ctrl.handle_skip(&s3));
        assert_eq!(ctrl.current_screen(), 3);
    }

    #[test]
    fn reset_returns_to_a_fresh_session() {
        let flow = FlowConfig::preset(VariantKind::Fo01);
        let mut ctrl = SessionController::new("Aria", flow);
        ctrl.ctx.record_answer("q", answer());
        ctrl.review("kept".into(), true);
        ctrl.reset();
        assert_eq!(ctrl.ctx.screen_number, 0);
        assert!(ctrl.feedback.is_empty());
        assert!(!ctrl.is_generating);
    }
}
