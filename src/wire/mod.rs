use serde::{Deserialize, Serialize};

/// ========================================
/// Agent result shapes
/// ========================================
///
/// Everything that crosses the entry-point boundary is one of these plain
/// serializable structs. Failures never propagate as `Err`: data fields are
/// present-but-empty and `error` carries the message instead.

/// One discovery screen as validated out of the agent's free text. Canonical
/// field names are chip-shaped; fragment-shaped payloads are renamed into
/// these during validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicScreenResponse {
    pub question: String,
    pub initial_chips: Vec<String>,
    pub expanded_chips: Vec<String>,
    pub ready_for_affirmations: bool,
    /// Empty on the first screen, a short acknowledgment afterwards.
    #[serde(default)]
    pub reflective_statement: String,
    /// Only meaningful on steps the variant designates skippable.
    #[serde(default)]
    pub skip: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenResult {
    pub question: String,
    pub initial_chips: Vec<String>,
    pub expanded_chips: Vec<String>,
    pub ready_for_affirmations: bool,
    pub reflective_statement: String,
    pub skip: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScreenResult {
    pub fn from_screen(screen: DynamicScreenResponse) -> Self {
        Self {
            question: screen.question,
            initial_chips: screen.initial_chips,
            expanded_chips: screen.expanded_chips,
            ready_for_affirmations: screen.ready_for_affirmations,
            reflective_statement: screen.reflective_statement,
            skip: screen.skip,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            question: String::new(),
            initial_chips: Vec::new(),
            expanded_chips: Vec::new(),
            ready_for_affirmations: false,
            reflective_statement: String::new(),
            skip: false,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffirmationsResult {
    pub affirmations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AffirmationsResult {
    pub fn ok(affirmations: Vec<String>) -> Self {
        Self { affirmations, error: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            affirmations: Vec::new(),
            error: Some(message.into()),
        }
    }
}

/// Which decorative summary is being generated. All of them degrade to an
/// empty string on failure rather than surfacing an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryKind {
    Pre,
    Post,
    Review,
}

impl SummaryKind {
    pub fn stage_name(&self) -> &'static str {
        match self {
            SummaryKind::Pre => "summary.pre",
            SummaryKind::Post => "summary.post",
            SummaryKind::Review => "summary.review",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_screen_has_empty_data_and_message() {
        let r = ScreenResult::failed("Name is required");
        assert!(r.question.is_empty());
        assert!(r.initial_chips.is_empty());
        assert!(!r.ready_for_affirmations);
        assert_eq!(r.error.as_deref(), Some("Name is required"));
    }

    #[test]
    fn ok_results_serialize_without_error_field() {
        let json = serde_json::to_string(&AffirmationsResult::ok(vec!["I am enough".into()]))
            .expect("serialize");
        assert!(!json.contains("error"));
    }

    #[test]
    fn screen_response_uses_camel_case_on_the_wire() {
        let screen = DynamicScreenResponse {
            question: "q".into(),
            initial_chips: vec![],
            expanded_chips: vec![],
            ready_for_affirmations: true,
            reflective_statement: String::new(),
            skip: false,
        };
        let json = serde_json::to_string(&screen).expect("serialize");
        assert!(json.contains("readyForAffirmations"));
        assert!(json.contains("initialChips"));
    }
}
