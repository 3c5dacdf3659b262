use serde::Serialize;
use std::fmt;

use crate::analysis::Daypart;
use crate::scoring::PriceTier;

/// Confidence reported when no business rule matched.
pub const FALLBACK_CONFIDENCE: u8 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessCategory {
    Service,
    Restaurant,
    Retail,
    Healthcare,
    Automotive,
    Other,
}

impl BusinessCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessCategory::Service => "service",
            BusinessCategory::Restaurant => "restaurant",
            BusinessCategory::Retail => "retail",
            BusinessCategory::Healthcare => "healthcare",
            BusinessCategory::Automotive => "automotive",
            BusinessCategory::Other => "other",
        }
    }
}

impl fmt::Display for BusinessCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BusinessKind {
    pub name: &'static str,
    pub category: BusinessCategory,
    pub confidence: u8,
}

/// What a matching rule contributes to an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extracted {
    Business(BusinessKind),
    Location(&'static str),
    Budget(PriceTier),
    Hours(Daypart),
    Demographic(&'static str),
    Requirement(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub keywords: &'static [&'static str],
    /// Match keywords only as whole words rather than substrings.
    pub whole_word: bool,
    pub yields: Extracted,
}

impl Rule {
    fn matches(&self, lowered: &str) -> bool {
        if self.whole_word {
            lowered
                .split(|c: char| !c.is_alphanumeric())
                .any(|word| self.keywords.iter().any(|k| *k == word))
        } else {
            self.keywords.iter().any(|k| lowered.contains(k))
        }
    }
}

const fn business(
    keywords: &'static [&'static str],
    name: &'static str,
    category: BusinessCategory,
    confidence: u8,
) -> Rule {
    Rule {
        keywords,
        whole_word: false,
        yields: Extracted::Business(BusinessKind {
            name,
            category,
            confidence,
        }),
    }
}

const fn rule(keywords: &'static [&'static str], yields: Extracted) -> Rule {
    Rule {
        keywords,
        whole_word: false,
        yields,
    }
}

const fn word_rule(keywords: &'static [&'static str], yields: Extracted) -> Rule {
    Rule {
        keywords,
        whole_word: true,
        yields,
    }
}

use BusinessCategory::*;

// Order matters: "barbershop" contains "shop", "all day" contains "day".
// "mid" would otherwise match "Midtown" and "midnight".
pub const RULES: &[Rule] = &[
    business(&["barber", "barbershop"], "Barbershop", Service, 90),
    business(&["coffee", "cafe"], "Coffee Shop", Restaurant, 90),
    business(&["restaurant", "food"], "Restaurant", Restaurant, 85),
    business(&["retail", "store", "shop"], "Retail Store", Retail, 80),
    business(&["gym", "fitness"], "Fitness Center", Healthcare, 85),
    business(&["clinic", "medical"], "Medical Practice", Healthcare, 90),
    business(&["salon", "beauty"], "Beauty Salon", Service, 85),
    business(&["auto", "car"], "Auto Repair", Automotive, 80),
    rule(&["near me"], Extracted::Location("near me")),
    rule(&["downtown", "city center"], Extracted::Location("downtown")),
    rule(
        &["neighborhood", "residential"],
        Extracted::Location("neighborhood"),
    ),
    rule(&["suburb"], Extracted::Location("suburban")),
    rule(
        &["budget", "cheap", "affordable"],
        Extracted::Budget(PriceTier::Budget),
    ),
    rule(
        &["premium", "luxury", "high-end"],
        Extracted::Budget(PriceTier::Premium),
    ),
    word_rule(&["mid", "medium"], Extracted::Budget(PriceTier::Mid)),
    rule(&["all day", "both"], Extracted::Hours(Daypart::Both)),
    rule(&["morning", "day"], Extracted::Hours(Daypart::Day)),
    rule(&["evening", "night"], Extracted::Hours(Daypart::Evening)),
    rule(&["family", "kids"], Extracted::Demographic("families")),
    rule(&["young", "millennial"], Extracted::Demographic("young adults")),
    rule(
        &["professional", "office"],
        Extracted::Demographic("professionals"),
    ),
    rule(&["senior", "elderly"], Extracted::Demographic("seniors")),
    rule(&["student", "college"], Extracted::Demographic("students")),
    rule(
        &["mix", "everyone", "anyone"],
        Extracted::Demographic("general population"),
    ),
    rule(&["parking"], Extracted::Requirement("parking space")),
    rule(
        &["accessibility", "wheelchair"],
        Extracted::Requirement("accessibility"),
    ),
    rule(&["outdoor", "patio"], Extracted::Requirement("outdoor space")),
    rule(&["delivery"], Extracted::Requirement("delivery service")),
    rule(
        &["wifi", "internet"],
        Extracted::Requirement("high-speed internet"),
    ),
];

/// Everything the rule table found in one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub business: Option<BusinessKind>,
    pub location: Option<&'static str>,
    pub budget: Option<PriceTier>,
    pub hours: Option<Daypart>,
    pub demographics: Vec<&'static str>,
    pub requirements: Vec<&'static str>,
}

impl Extraction {
    pub fn confidence(&self) -> u8 {
        self.business
            .map(|b| b.confidence)
            .unwrap_or(FALLBACK_CONFIDENCE)
    }
}

fn push_unique(values: &mut Vec<&'static str>, value: &'static str) {
    if !values.contains(&value) {
        values.push(value);
    }
}

/// Walk the rule table in order over the lowercased message.
pub fn extract(message: &str) -> Extraction {
    let lowered = message.to_lowercase();
    let mut out = Extraction::default();

    for rule in RULES.iter().filter(|r| r.matches(&lowered)) {
        match rule.yields {
            Extracted::Business(b) => {
                out.business.get_or_insert(b);
            }
            Extracted::Location(l) => {
                out.location.get_or_insert(l);
            }
            Extracted::Budget(t) => {
                out.budget.get_or_insert(t);
            }
            Extracted::Hours(h) => {
                out.hours.get_or_insert(h);
            }
            Extracted::Demographic(d) => push_unique(&mut out.demographics, d),
            Extracted::Requirement(r) => push_unique(&mut out.requirements, r),
        }
    }

    out
}

/// Category for a free-text business description.
pub fn business_category(business: &str) -> BusinessCategory {
    extract(business)
        .business
        .map(|b| b.category)
        .unwrap_or(BusinessCategory::Other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("I want to open a barbershop", "Barbershop", 90)]
    #[case("a small coffee place", "Coffee Shop", 90)]
    #[case("Thai FOOD truck", "Restaurant", 85)]
    #[case("a gift shop", "Retail Store", 80)]
    #[case("fitness studio", "Fitness Center", 85)]
    #[case("walk-in clinic", "Medical Practice", 90)]
    #[case("nail salon", "Beauty Salon", 85)]
    #[case("car wash", "Auto Repair", 80)]
    fn test_business_rules(#[case] message: &str, #[case] name: &str, #[case] confidence: u8) {
        let extraction = extract(message);
        let business = extraction.business.unwrap();
        assert_eq!(business.name, name);
        assert_eq!(extraction.confidence(), confidence);
    }

    #[test]
    fn test_first_business_rule_wins() {
        // "barbershop" also contains "shop"
        let extraction = extract("barbershop");
        assert_eq!(extraction.business.unwrap().name, "Barbershop");

        // coffee precedes retail even when "store" comes first in the text
        let extraction = extract("store that sells coffee");
        assert_eq!(extraction.business.unwrap().name, "Coffee Shop");
    }

    #[test]
    fn test_no_business_falls_back() {
        let extraction = extract("something downtown");
        assert!(extraction.business.is_none());
        assert_eq!(extraction.confidence(), FALLBACK_CONFIDENCE);
        assert_eq!(extraction.location, Some("downtown"));
    }

    #[rstest]
    #[case("open all day", Daypart::Both)]
    #[case("both shifts", Daypart::Both)]
    #[case("mostly morning", Daypart::Day)]
    #[case("late night crowd", Daypart::Evening)]
    fn test_hours_rules(#[case] message: &str, #[case] expected: Daypart) {
        assert_eq!(extract(message).hours, Some(expected));
    }

    #[rstest]
    #[case("something cheap", PriceTier::Budget)]
    #[case("high-end finish", PriceTier::Premium)]
    #[case("medium budget", PriceTier::Budget)]
    #[case("a medium spend", PriceTier::Mid)]
    #[case("something mid-range", PriceTier::Mid)]
    fn test_budget_rules(#[case] message: &str, #[case] expected: PriceTier) {
        assert_eq!(extract(message).budget, Some(expected));
    }

    #[test]
    fn test_mid_matches_whole_words_only() {
        assert_eq!(extract("Midtown Manhattan").budget, None);

        let extraction = extract("open until midnight");
        assert_eq!(extraction.budget, None);
        assert_eq!(extraction.hours, Some(Daypart::Evening));
    }

    #[test]
    fn test_multi_valued_slots_collect_all() {
        let extraction =
            extract("families and students, kids too, need parking and wifi and a patio");
        assert_eq!(extraction.demographics, vec!["families", "students"]);
        assert_eq!(
            extraction.requirements,
            vec!["parking space", "outdoor space", "high-speed internet"]
        );
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(extract(""), Extraction::default());
        assert_eq!(extract("hello there"), Extraction::default());
    }

    #[test]
    fn test_business_category() {
        assert_eq!(business_category("Coffee Shop"), BusinessCategory::Restaurant);
        assert_eq!(business_category("auto body"), BusinessCategory::Automotive);
        assert_eq!(business_category("bakery"), BusinessCategory::Other);
    }
}
