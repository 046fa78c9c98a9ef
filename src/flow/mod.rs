use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::cli::VariantKind;

/// Decide whether enough discovery screens have been answered to move on to
/// affirmation generation.
///
/// `screen_number` is the count of screens already answered, including the one
/// just submitted (the caller appends the exchange and bumps the counter
/// before asking). Below two screens we never proceed, at five we always do,
/// in between the agent's readiness signal decides.
pub fn should_proceed_to_affirmations(screen_number: u32, agent_ready: bool) -> bool {
    if screen_number < 2 {
        return false;
    }
    if screen_number >= 5 {
        return true;
    }
    agent_ready
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Clickable tags that replace typed input.
    Chips,
    /// Sentence starters appended to free text.
    Fragments,
}

/// Per-variant knobs for the discovery loop. The eleven onboarding
/// experiments share one protocol; only these parameters differ.
#[derive(Debug, Clone)]
pub struct FlowConfig {
    pub min_screens: u32,
    pub max_screens: u32,
    pub batch_size: usize,
    pub input_mode: InputMode,
    pub initial_suggestions: usize,
    pub expanded_suggestions: usize,
    /// Screen numbers (1-indexed, the screen about to be shown) whose `skip`
    /// flag from the agent is honored. All other screens force skip off.
    pub skippable_steps: HashSet<u32>,
}

impl FlowConfig {
    pub fn preset(kind: VariantKind) -> Self {
        let base = Self {
            min_screens: 2,
            max_screens: 5,
            batch_size: 10,
            input_mode: InputMode::Chips,
            initial_suggestions: 6,
            expanded_suggestions: 12,
            skippable_steps: HashSet::new(),
        };
        match kind {
            VariantKind::Fo01 => Self { batch_size: 5, ..base },
            VariantKind::Fo03 => Self {
                input_mode: InputMode::Fragments,
                initial_suggestions: 5,
                expanded_suggestions: 8,
                ..base
            },
            VariantKind::Fo05 => Self { batch_size: 20, ..base },
            VariantKind::Fo07 => Self {
                input_mode: InputMode::Fragments,
                batch_size: 10,
                initial_suggestions: 8,
                expanded_suggestions: 15,
                ..base
            },
            VariantKind::Fo08 => Self { batch_size: 5, initial_suggestions: 5, ..base },
            VariantKind::Fo09 => base,
            VariantKind::Fo11 => Self {
                batch_size: 10,
                skippable_steps: HashSet::from([2]),
                ..base
            },
        }
    }

    /// Same decision table as [`should_proceed_to_affirmations`], with the
    /// variant's own bounds.
    pub fn should_proceed(&self, screen_number: u32, agent_ready: bool) -> bool {
        if screen_number < self.min_screens {
            return false;
        }
        if screen_number >= self.max_screens {
            return true;
        }
        agent_ready
    }

    /// Whether this step requires a `skip` flag in the agent's payload.
    pub fn step_is_skippable(&self, step: u32) -> bool {
        self.skippable_steps.contains(&step)
    }

    /// The agent's skip signal is only trusted for designated steps; anything
    /// else is forced to false.
    pub fn allow_skip(&self, step: u32, agent_skip: bool) -> bool {
        self.step_is_skippable(step) && agent_skip
    }
}
