use crate::context::{Feedback, GatheringContext};
use crate::flow::{FlowConfig, InputMode};
use crate::wire::SummaryKind;

/// Deterministic prompt serialization. Pure string building, no I/O: the same
/// context and feedback always produce byte-identical output, so these are
/// asserted against exact fixtures in tests.

fn profile_block(ctx: &GatheringContext) -> String {
    let mut out = String::new();
    out.push_str("User profile:\n");
    out.push_str(&format!("Name: {}\n", ctx.name));
    if let Some(f) = ctx.familiarity {
        out.push_str(&format!("Familiarity: {}\n", f.describe()));
    }
    if let Some(topic) = &ctx.topic {
        out.push_str(&format!("Topic of focus: {}\n", topic));
    }
    out
}

fn history_block(ctx: &GatheringContext) -> String {
    if ctx.exchanges.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str("\nConversation so far:\n");
    for exchange in &ctx.exchanges {
        out.push_str(&format!("Q: {}\n", exchange.question));
        if exchange.answer.is_empty() {
            out.push_str("A: (no response provided)\n");
            continue;
        }
        if !exchange.answer.text.trim().is_empty() {
            out.push_str(&format!("A: {}\n", exchange.answer.text.trim()));
        }
        if !exchange.answer.selected.is_empty() {
            out.push_str(&format!("Selected: {}\n", exchange.answer.selected.join(", ")));
        }
    }
    out
}

fn numbered(items: &[String]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, item));
    }
    out
}

/// Approved, skipped, and their union as numbered lists, for dedup
/// instructions in later batches. Entirely omitted when there is no feedback.
fn feedback_block(feedback: &Feedback) -> String {
    if feedback.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str("\nAffirmations the user kept:\n");
    out.push_str(&numbered(&feedback.approved));
    out.push_str("\nAffirmations the user skipped:\n");
    out.push_str(&numbered(&feedback.skipped));
    out.push_str("\nDo not repeat any of these:\n");
    out.push_str(&numbered(&feedback.seen()));
    out
}

fn suggestion_noun(mode: InputMode) -> &'static str {
    match mode {
        InputMode::Chips => "chips",
        InputMode::Fragments => "fragments",
    }
}

fn list_keys(mode: InputMode) -> (&'static str, &'static str) {
    match mode {
        InputMode::Chips => ("initialChips", "expandedChips"),
        InputMode::Fragments => ("initialFragments", "expandedFragments"),
    }
}

/// Prompt for the next discovery screen.
pub fn screen_prompt(ctx: &GatheringContext, flow: &FlowConfig) -> String {
    let (initial_key, expanded_key) = list_keys(flow.input_mode);
    let noun = suggestion_noun(flow.input_mode);
    let next_screen = ctx.current_step();
    let skip_field = if flow.step_is_skippable(next_screen) {
        ", \"skip\": boolean"
    } else {
        ""
    };

    format!(
        "You are guiding a short onboarding conversation for a personalized affirmation app.\n\
        \n{profile}{history}\n\
        This is discovery screen {next_screen}. Ask one warm, specific question that deepens \
        your understanding of what the user needs, and suggest {noun} they can tap instead of typing.\n\
        Set \"readyForAffirmations\" to true only when you have enough context to write \
        affirmations that feel personal.\n\
        {reflective}\n\
        Return ONLY a JSON object of the form {{\"question\": string, \
        \"{initial_key}\": array of {initial} strings, \"{expanded_key}\": array of {expanded} strings, \
        \"readyForAffirmations\": boolean, \"reflectiveStatement\": string{skip_field}}}.",
        profile = profile_block(ctx),
        history = history_block(ctx),
        next_screen = next_screen,
        noun = noun,
        reflective = if ctx.exchanges.is_empty() {
            "Leave \"reflectiveStatement\" empty on this first screen."
        } else {
            "Open \"reflectiveStatement\" with one short sentence acknowledging the last answer."
        },
        initial_key = initial_key,
        initial = flow.initial_suggestions,
        expanded_key = expanded_key,
        expanded = flow.expanded_suggestions,
        skip_field = skip_field,
    )
}

/// Prompt for one batch of affirmations.
pub fn affirmations_prompt(ctx: &GatheringContext, flow: &FlowConfig, feedback: &Feedback) -> String {
    format!(
        "Write personalized affirmations for the user below.\n\
        \n{profile}{history}{feedback}\n\
        Each affirmation is one short present-tense sentence in the user's own voice, \
        grounded in what they shared above.\n\
        Return ONLY a JSON array of {n} strings.",
        profile = profile_block(ctx),
        history = history_block(ctx),
        feedback = feedback_block(feedback),
        n = flow.batch_size,
    )
}

/// Prompt for a decorative one-or-two sentence summary shown around the flow.
pub fn summary_prompt(ctx: &GatheringContext, kind: SummaryKind) -> String {
    let ask = match kind {
        SummaryKind::Pre => {
            "Write one warm sentence telling the user their affirmations are being prepared, \
            reflecting what they shared."
        }
        SummaryKind::Post => {
            "Write two warm sentences summarizing what the user shared and what their \
            affirmations will focus on."
        }
        SummaryKind::Review => {
            "Write one encouraging sentence inviting the user to review and keep the \
            affirmations that resonate."
        }
    };
    format!(
        "{profile}{history}\n{ask}\nReturn ONLY the sentence text, no quotes and no JSON.",
        profile = profile_block(ctx),
        history = history_block(ctx),
        ask = ask,
    )
}
