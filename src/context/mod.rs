use serde::{Deserialize, Serialize};

/// How familiar the user says they are with affirmations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Familiarity {
    New,
    Some,
    Very,
}

impl Familiarity {
    pub fn describe(&self) -> &'static str {
        match self {
            Familiarity::New => "new to affirmations",
            Familiarity::Some => "has some experience with affirmations",
            Familiarity::Very => "very experienced with affirmations",
        }
    }
}

/// What the user submitted for one discovery screen: free text, selected
/// suggestions, or both. Either side may be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerInput {
    pub text: String,
    pub selected: Vec<String>,
}

impl AnswerInput {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.selected.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub question: String,
    pub answer: AnswerInput,
}

/// Accumulated onboarding state for one session. Memory-only: created fresh
/// per run, never persisted, owned by the controller. Agent calls get a
/// read-only borrow and return derived values without touching it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatheringContext {
    pub name: String,
    pub familiarity: Option<Familiarity>,
    pub topic: Option<String>,
    pub exchanges: Vec<Exchange>,
    /// Count of discovery screens already answered. Bumped by exactly one per
    /// recorded answer; only a full reset brings it back down.
    pub screen_number: u32,
    /// Count of steps passed over via the agent's skip flag. A skipped step
    /// produces no exchange but still moves the flow forward.
    #[serde(default)]
    pub skipped_steps: u32,
}

impl GatheringContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            familiarity: None,
            topic: None,
            exchanges: Vec::new(),
            screen_number: 0,
            skipped_steps: 0,
        }
    }

    /// The 1-indexed number of the step about to be fetched: answered screens
    /// plus skipped steps, plus one.
    pub fn current_step(&self) -> u32 {
        self.screen_number + self.skipped_steps + 1
    }

    /// Append the answered exchange and advance the screen counter. The
    /// continuation policy inspects the counter after this call.
    pub fn record_answer(&mut self, question: impl Into<String>, answer: AnswerInput) {
        self.exchanges.push(Exchange {
            question: question.into(),
            answer,
        });
        self.screen_number += 1;
    }

    /// Mark the current step as skipped, so the next fetch targets the step
    /// after it. No exchange is recorded and `screen_number` is untouched.
    pub fn record_skip(&mut self) {
        self.skipped_steps += 1;
    }

    /// Full session reset; keeps the name, drops everything gathered.
    pub fn reset(&mut self) {
        self.familiarity = None;
        self.topic = None;
        self.exchanges.clear();
        self.screen_number = 0;
        self.skipped_steps = 0;
    }
}

/// Review outcomes accumulated across affirmation batches, fed back into
/// later batch prompts so the agent avoids repeats.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Feedback {
    pub approved: Vec<String>,
    pub skipped: Vec<String>,
}

impl Feedback {
    pub fn is_empty(&self) -> bool {
        self.approved.is_empty() && self.skipped.is_empty()
    }

    /// Everything already shown to the user, approved or not.
    pub fn seen(&self) -> Vec<String> {
        let mut all = self.approved.clone();
        all.extend(self.skipped.iter().cloned());
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_answer_appends_and_increments() {
        let mut ctx = GatheringContext::new("Aria");
        assert_eq!(ctx.screen_number, 0);

        ctx.record_answer("What matters most right now?", AnswerInput {
            text: "sleep".into(),
            selected: vec![],
        });
        assert_eq!(ctx.screen_number, 1);
        assert_eq!(ctx.exchanges.len(), 1);

        ctx.record_answer("Tell me more", AnswerInput::default());
        assert_eq!(ctx.screen_number, 2);
        assert_eq!(ctx.exchanges.len(), 2);
        // Order is insertion order.
        assert_eq!(ctx.exchanges[0].question, "What matters most right now?");
    }

    #[test]
    fn reset_clears_everything_but_name() {
        let mut ctx = GatheringContext::new("Aria");
        ctx.familiarity = Some(Familiarity::New);
        ctx.topic = Some("confidence".into());
        ctx.record_answer("q", AnswerInput::default());
        ctx.record_skip();

        ctx.reset();
        assert_eq!(ctx.name, "Aria");
        assert!(ctx.familiarity.is_none());
        assert!(ctx.topic.is_none());
        assert!(ctx.exchanges.is_empty());
        assert_eq!(ctx.screen_number, 0);
        assert_eq!(ctx.skipped_steps, 0);
    }

    #[test]
    fn skipped_step_advances_the_step_but_not_the_counter() {
        let mut ctx = GatheringContext::new("Aria");
        ctx.record_answer("q1", AnswerInput::default());
        assert_eq!(ctx.current_step(), 2);

        ctx.record_skip();
        assert_eq!(ctx.screen_number, 1);
        assert!(ctx.exchanges.len() == 1);
        // The next fetch targets step 3, not step 2 again.
        assert_eq!(ctx.current_step(), 3);
    }

    #[test]
    fn feedback_seen_is_union_in_order() {
        let fb = Feedback {
            approved: vec!["a".into()],
            skipped: vec!["b".into(), "c".into()],
        };
        assert_eq!(fb.seen(), vec!["a", "b", "c"]);
        assert!(!fb.is_empty());
        assert!(Feedback::default().is_empty());
    }

    #[test]
    fn empty_answer_detection() {
        assert!(AnswerInput::default().is_empty());
        assert!(AnswerInput { text: "  ".into(), selected: vec![] }.is_empty());
        assert!(!AnswerInput { text: "".into(), selected: vec!["calm".into()] }.is_empty());
    }
}
