use serde::Serialize;
use std::fmt;

use super::rules::{extract, BusinessKind, Extraction};
use crate::analysis::{AnalysisRequest, Daypart};
use crate::scoring::PriceTier;

const ANALYZE_PHRASES: [&str; 6] = [
    "analyze locations",
    "show locations",
    "start analysis",
    "let's analyze",
    "begin analysis",
    "proceed",
];

const AFFIRMATIVE_WORDS: [&str; 7] = ["yes", "yeah", "yep", "sure", "ok", "okay", "affirmative"];

/// The next piece of information the conversation is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    BusinessType,
    Location,
    Budget,
    Hours,
    Demographics,
    Ready,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::BusinessType => "business_type",
            Stage::Location => "location",
            Stage::Budget => "budget",
            Stage::Hours => "hours",
            Stage::Demographics => "demographics",
            Stage::Ready => "ready",
        };
        f.write_str(s)
    }
}

/// What has been learned so far. Never mutated; each turn yields a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversationContext {
    pub business: Option<BusinessKind>,
    pub location: Option<String>,
    pub budget: Option<PriceTier>,
    pub hours: Option<Daypart>,
    pub demographics: Vec<&'static str>,
    pub requirements: Vec<&'static str>,
}

fn union(existing: &[&'static str], new: &[&'static str]) -> Vec<&'static str> {
    let mut out = existing.to_vec();
    for value in new {
        if !out.contains(value) {
            out.push(value);
        }
    }
    out
}

impl ConversationContext {
    /// Merge an extraction: new single values replace old ones, lists are
    /// unioned.
    pub fn absorb(&self, extraction: &Extraction) -> Self {
        Self {
            business: extraction.business.or(self.business),
            location: extraction
                .location
                .map(str::to_string)
                .or_else(|| self.location.clone()),
            budget: extraction.budget.or(self.budget),
            hours: extraction.hours.or(self.hours),
            demographics: union(&self.demographics, &extraction.demographics),
            requirements: union(&self.requirements, &extraction.requirements),
        }
    }

    fn with_location(&self, location: &str) -> Self {
        Self {
            location: Some(location.to_string()),
            ..self.clone()
        }
    }

    /// First missing field, in asking order.
    pub fn stage(&self) -> Stage {
        if self.business.is_none() {
            Stage::BusinessType
        } else if self.location.is_none() {
            Stage::Location
        } else if self.budget.is_none() {
            Stage::Budget
        } else if self.hours.is_none() {
            Stage::Hours
        } else if self.demographics.is_empty() {
            Stage::Demographics
        } else {
            Stage::Ready
        }
    }

    /// Analysis request for the known business and location, if both are set.
    pub fn to_request(&self) -> Option<AnalysisRequest> {
        let business = self.business?;
        let location = self.location.as_ref()?;
        let mut request = AnalysisRequest::new(business.name, location.as_str());
        request.price_tier = self.budget.unwrap_or_default();
        request.daypart = self.hours.unwrap_or_default();
        Some(request)
    }

    /// Follow-up question for the current stage.
    pub fn question(&self) -> String {
        let business = self
            .business
            .map(|b| b.name.to_lowercase())
            .unwrap_or_else(|| "business".to_string());
        match self.stage() {
            Stage::BusinessType => "What type of business are you planning?".to_string(),
            Stage::Location => format!("Where are you thinking of opening this {}?", business),
            Stage::Budget => "What's your budget range for rent and setup?".to_string(),
            Stage::Hours => "What hours are you planning to operate?".to_string(),
            Stage::Demographics => "Who's your target customer?".to_string(),
            Stage::Ready => format!(
                "Would you like me to analyze potential locations for your {}?",
                business
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Ask(String),
    Analyze(AnalysisRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub context: ConversationContext,
    pub stage: Stage,
    pub reply: Reply,
}

pub fn is_affirmative(message: &str) -> bool {
    message
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| AFFIRMATIVE_WORDS.contains(&word))
}

pub fn is_analyze_request(message: &str) -> bool {
    let lowered = message.to_lowercase();
    ANALYZE_PHRASES.iter().any(|p| lowered.contains(p))
}

/// Process one user message against the current context.
///
/// While a location is being asked for, a message that names none of the
/// known location keywords is taken verbatim as the place.
pub fn advance(ctx: &ConversationContext, message: &str) -> Turn {
    let extraction = extract(message);
    let wants_analysis = is_analyze_request(message) || is_affirmative(message);

    let mut context = ctx.absorb(&extraction);
    let trimmed = message.trim();
    if ctx.stage() == Stage::Location
        && extraction.location.is_none()
        && extraction.business.is_none()
        && !wants_analysis
        && !trimmed.is_empty()
    {
        context = context.with_location(trimmed);
    }

    let stage = context.stage();
    let reply = match context.to_request() {
        Some(request) if wants_analysis => Reply::Analyze(request),
        _ => Reply::Ask(context.question()),
    };

    tracing::debug!(%stage, "conversation turn");
    Turn {
        context,
        stage,
        reply,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_progression() {
        let ctx = ConversationContext::default();
        assert_eq!(ctx.stage(), Stage::BusinessType);

        let turn = advance(&ctx, "I want to open a barbershop");
        assert_eq!(turn.stage, Stage::Location);
        assert_eq!(
            turn.reply,
            Reply::Ask("Where are you thinking of opening this barbershop?".to_string())
        );

        let turn = advance(&turn.context, "downtown");
        assert_eq!(turn.stage, Stage::Budget);

        let turn = advance(&turn.context, "something affordable");
        assert_eq!(turn.stage, Stage::Hours);

        let turn = advance(&turn.context, "evenings mostly");
        assert_eq!(turn.stage, Stage::Demographics);

        let turn = advance(&turn.context, "young professionals");
        assert_eq!(turn.stage, Stage::Ready);
        assert_eq!(turn.context.demographics, vec!["young adults", "professionals"]);
        assert_eq!(
            turn.reply,
            Reply::Ask(
                "Would you like me to analyze potential locations for your barbershop?"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_absorb_does_not_mutate_prior_context() {
        let ctx = ConversationContext::default();
        let before = ctx.clone();
        let next = ctx.absorb(&extract("coffee shop with parking"));
        assert_eq!(ctx, before);
        assert_eq!(next.business.map(|b| b.name), Some("Coffee Shop"));
        assert_eq!(next.requirements, vec!["parking space"]);
    }

    #[test]
    fn test_new_single_values_replace_old() {
        let ctx = ConversationContext::default().absorb(&extract("cheap coffee"));
        assert_eq!(ctx.budget, Some(PriceTier::Budget));

        let ctx = ctx.absorb(&extract("actually go luxury"));
        assert_eq!(ctx.budget, Some(PriceTier::Premium));
        assert_eq!(ctx.business.map(|b| b.name), Some("Coffee Shop"));
    }

    #[test]
    fn test_free_text_location() {
        let turn = advance(&ConversationContext::default(), "a coffee shop");
        let turn = advance(&turn.context, "Providence, RI");
        assert_eq!(turn.context.location.as_deref(), Some("Providence, RI"));
        assert_eq!(turn.stage, Stage::Budget);
    }

    #[test]
    fn test_location_containing_mid_leaves_budget_open() {
        let turn = advance(&ConversationContext::default(), "a coffee shop");
        let turn = advance(&turn.context, "Midtown Manhattan");
        assert_eq!(turn.context.location.as_deref(), Some("Midtown Manhattan"));
        assert_eq!(turn.context.budget, None);
        assert_eq!(turn.stage, Stage::Budget);
    }

    #[test]
    fn test_affirmative_triggers_analysis() {
        let turn = advance(&ConversationContext::default(), "gym near me");
        let turn = advance(&turn.context, "Yes, please!");
        match turn.reply {
            Reply::Analyze(request) => {
                assert_eq!(request.business, "Fitness Center");
                assert_eq!(request.location, "near me");
                assert_eq!(request.price_tier, PriceTier::Mid);
                assert_eq!(request.daypart, Daypart::Both);
            }
            other => panic!("expected analysis, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_phrase_triggers_analysis() {
        let ctx = ConversationContext::default().absorb(&extract("salon downtown premium"));
        let turn = advance(&ctx, "let's analyze");
        assert!(matches!(
            turn.reply,
            Reply::Analyze(ref r) if r.price_tier == PriceTier::Premium
        ));
    }

    #[test]
    fn test_analysis_needs_business_and_location() {
        let turn = advance(&ConversationContext::default(), "proceed");
        assert_eq!(turn.stage, Stage::BusinessType);
        assert_eq!(
            turn.reply,
            Reply::Ask("What type of business are you planning?".to_string())
        );
    }

    #[test]
    fn test_affirmative_is_word_based() {
        assert!(is_affirmative("ok"));
        assert!(is_affirmative("Sure thing"));
        assert!(!is_affirmative("token"));
        assert!(!is_affirmative("yesterday"));
    }
}
