use crate::context::{Feedback, GatheringContext};
use crate::errors::{message_or_default, FlowError};
use crate::flow::FlowConfig;
use crate::log::SessionLog;
use crate::parse;
use crate::prompt;
use crate::provider::{AffirmationAgent, GenerateOptions};
use crate::template::{temperature_for, TemplateStore};
use crate::wire::{AffirmationsResult, ScreenResult, SummaryKind};

/// Everything an entry point needs besides the session state itself. Mirrors
/// the server-action boundary: inputs are read-only, results are plain
/// structs with an optional `error`, and nothing in here ever panics or
/// returns `Err` to the caller.
pub struct ActionContext<'a> {
    pub agent: &'a dyn AffirmationAgent,
    pub templates: &'a dyn TemplateStore,
    pub flow: &'a FlowConfig,
    pub log: Option<&'a SessionLog>,
    pub default_temperature: f32,
    pub debug: bool,
}

impl<'a> ActionContext<'a> {
    fn save_stage(&self, stage: &str, prompt_text: &str, response_text: &str) {
        // Artifacts are debug output; failure to write them never fails the call.
        if let Some(log) = self.log {
            let _ = log.save_stage(stage, prompt_text, response_text);
        }
    }

    async fn call_agent(&self, stage: &str, prompt_text: &str) -> anyhow::Result<String> {
        let opts = GenerateOptions {
            temperature: temperature_for(self.templates, stage, self.default_temperature),
        };
        let text = self.agent.generate(prompt_text, &opts, self.debug).await?;
        self.save_stage(stage, prompt_text, &text);
        Ok(text)
    }
}

fn screen_vars(ctx: &GatheringContext) -> Vec<(&'static str, String)> {
    vec![
        ("name", ctx.name.clone()),
        ("screen_number", ctx.current_step().to_string()),
    ]
}

/// Fetch the next discovery screen.
pub async fn generate_screen(acx: &ActionContext<'_>, ctx: &GatheringContext) -> ScreenResult {
    if ctx.name.trim().is_empty() {
        return ScreenResult::failed(FlowError::Missing("Name").to_string());
    }

    // Skipped steps count toward the step number, so a skip is never
    // re-requested.
    let next_step = ctx.current_step();
    let needs_skip = acx.flow.step_is_skippable(next_step);
    let prompt_text = acx
        .templates
        .render("screen", &screen_vars(ctx))
        .unwrap_or_else(|| prompt::screen_prompt(ctx, acx.flow));

    let text = match acx.call_agent("screen", &prompt_text).await {
        Ok(t) => t,
        Err(e) => return ScreenResult::failed(FlowError::Agent(message_or_default(&e)).to_string()),
    };

    match parse::parse_screen(&text, needs_skip) {
        Some(mut screen) => {
            // The agent's skip flag is only trusted on designated steps.
            screen.skip = acx.flow.allow_skip(next_step, screen.skip);
            ScreenResult::from_screen(screen)
        }
        None => ScreenResult::failed(FlowError::UnparseableScreen.to_string()),
    }
}

/// Generate one batch of affirmations from the gathered context.
pub async fn generate_affirmations(
    acx: &ActionContext<'_>,
    ctx: &GatheringContext,
    feedback: &Feedback,
) -> AffirmationsResult {
    if ctx.name.trim().is_empty() {
        return AffirmationsResult::failed(FlowError::Missing("Name").to_string());
    }
    if ctx.exchanges.is_empty() {
        return AffirmationsResult::failed(FlowError::Missing("At least one exchange").to_string());
    }

    let prompt_text = acx
        .templates
        .render("batch", &screen_vars(ctx))
        .unwrap_or_else(|| prompt::affirmations_prompt(ctx, acx.flow, feedback));

    let text = match acx.call_agent("batch", &prompt_text).await {
        Ok(t) => t,
        Err(e) => return AffirmationsResult::failed(FlowError::Agent(message_or_default(&e)).to_string()),
    };

    let affirmations = parse::parse_affirmations(&text);
    if affirmations.is_empty() {
        // Parsed-but-empty reads the same as unparseable to the user, but the
        // agent did answer; keep the parse-failure message distinct from
        // network failures above.
        return AffirmationsResult::failed(FlowError::UnparseableAffirmations.to_string());
    }
    AffirmationsResult::ok(affirmations)
}

/// Decorative summaries never block the flow: every failure, including bad
/// input, collapses into an empty string.
pub async fn generate_summary(
    acx: &ActionContext<'_>,
    ctx: &GatheringContext,
    kind: SummaryKind,
) -> String {
    if ctx.name.trim().is_empty() {
        return String::new();
    }

    let prompt_text = acx
        .templates
        .render(kind.stage_name(), &screen_vars(ctx))
        .unwrap_or_else(|| prompt::summary_prompt(ctx, kind));

    match acx.call_agent(kind.stage_name(), &prompt_text).await {
        Ok(text) => text.trim().to_string(),
        Err(_) => String::new(),
    }
}
