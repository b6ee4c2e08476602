use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::{
    common::{Currency, Money},
    component::Category,
};

/// What a chat message is asking for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    ComponentInfo,
    ComponentRecommendation,
    BestComponent,
    Compatibility,
    Budget,
    GamingUsage,
    OfficeUsage,
    DesignUsage,
    DevelopmentUsage,
    BuildRequest,
    Unknown,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ComponentInfo => "component_info",
            Self::ComponentRecommendation => "component_recommendation",
            Self::BestComponent => "best_component",
            Self::Compatibility => "compatibility",
            Self::Budget => "budget",
            Self::GamingUsage => "gaming_usage",
            Self::OfficeUsage => "office_usage",
            Self::DesignUsage => "design_usage",
            Self::DevelopmentUsage => "development_usage",
            Self::BuildRequest => "build_request",
            Self::Unknown => "unknown",
        }
    }

    /// Labels from external classifiers. `work_usage` is accepted for design work.
    /// Anything unrecognized is [`Intent::Unknown`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "component_info" => Self::ComponentInfo,
            "component_recommendation" => Self::ComponentRecommendation,
            "best_component" => Self::BestComponent,
            "compatibility" => Self::Compatibility,
            "budget" => Self::Budget,
            "gaming_usage" => Self::GamingUsage,
            "office_usage" => Self::OfficeUsage,
            "design_usage" | "work_usage" => Self::DesignUsage,
            "development_usage" => Self::DevelopmentUsage,
            "build_request" => Self::BuildRequest,
            _ => Self::Unknown,
        }
    }

    /// The usage profile a usage intent stands for.
    pub fn usage_profile(self) -> Option<&'static str> {
        match self {
            Self::GamingUsage => Some("gaming"),
            Self::OfficeUsage => Some("office"),
            Self::DesignUsage => Some("design"),
            Self::DevelopmentUsage => Some("development"),
            _ => None,
        }
    }
}

impl FromStr for Intent {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Classification {
    pub intent: String,
    /// 0.0 to 1.0.
    pub confidence: f64,
}

/// An intent model living outside this crate.
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, message: &str) -> anyhow::Result<Classification>;
}

lazy_static! {
    static ref PATTERNS: Vec<(Regex, Intent)> = vec![
        (
            Regex::new(r"(?i)\b(?:which|what)(?:'s| is| are)? the (?:best|good|top) (\w+)").unwrap(),
            Intent::BestComponent
        ),
        (
            Regex::new(r"(?i)\b(?:recommend|suggest)\b").unwrap(),
            Intent::ComponentRecommendation
        ),
        (
            Regex::new(r"(?i)\bwhat(?:'s| is| are) (?:an? |the )?(\w+)").unwrap(),
            Intent::ComponentInfo
        ),
        (Regex::new(r"(?i)compatib").unwrap(), Intent::Compatibility),
        (Regex::new(r"(?i)\b(?:budget|afford|price range)\b").unwrap(), Intent::Budget),
        (Regex::new(r"(?i)\b(?:gaming|games?|gamer)\b").unwrap(), Intent::GamingUsage),
        (
            Regex::new(r"(?i)\b(?:design|rendering|video editing|workstation|professional)\b").unwrap(),
            Intent::DesignUsage
        ),
        (
            Regex::new(r"(?i)\b(?:development|programming|coding|compiling)\b").unwrap(),
            Intent::DevelopmentUsage
        ),
        (Regex::new(r"(?i)\b(?:office|basic|browsing|spreadsheets)\b").unwrap(), Intent::OfficeUsage),
    ];
    static ref BUILD: Regex = Regex::new(r"(?i)\b(?:build|rig|pc|computer|setup)\b").unwrap();
    static ref AMOUNT: Regex = Regex::new(
        r"(?i)([$€]\s*\d[\d,]*(?:\.\d+)?|\d[\d,]*(?:\.\d+)?\s*(?:€|\$|usd\b|eur\b|euros?\b|dollars?\b)|\d[\d,]*(?:\.\d+)?)"
    )
    .unwrap();
}

/// Keyword matching, used when no external classifier is confident enough.
#[derive(Clone, Copy, Debug, Default)]
pub struct PatternClassifier;

impl PatternClassifier {
    pub fn detect(&self, message: &str) -> Intent {
        if BUILD.is_match(message) && extract_budget(message).is_some() {
            return Intent::BuildRequest;
        }
        PATTERNS
            .iter()
            .find(|(pattern, _)| pattern.is_match(message))
            .map_or(Intent::Unknown, |(_, intent)| *intent)
    }

    /// A usage profile named anywhere in the message.
    pub fn detect_usage(&self, message: &str) -> Option<&'static str> {
        PATTERNS
            .iter()
            .filter_map(|(pattern, intent)| intent.usage_profile().map(|p| (pattern, p)))
            .find(|(pattern, _)| pattern.is_match(message))
            .map(|(_, profile)| profile)
    }
}

impl IntentClassifier for PatternClassifier {
    fn classify(&self, message: &str) -> anyhow::Result<Classification> {
        let intent = self.detect(message);
        Ok(Classification {
            intent: intent.as_str().to_string(),
            confidence: if intent == Intent::Unknown { 0.0 } else { 1.0 },
        })
    }
}

/// The budget mentioned in a message.
///
/// Amounts written with a currency (`$1,200`, `900€`, `750 USD`) win over bare numbers;
/// among bare numbers the largest is taken, so `16GB of RAM for 1000` gives 1000.
pub fn extract_budget(message: &str) -> Option<Money> {
    let mut bare: Option<Money> = None;
    for found in AMOUNT.find_iter(message) {
        let text = found.as_str();
        let money = match Money::from_str(text) {
            Ok(money) if money.1 > 0.0 => money,
            _ => continue,
        };
        if text.chars().any(|c| c.is_alphabetic() || c == '$' || c == '€') {
            return Some(money);
        }
        if bare.map_or(true, |b| money.1 > b.1) {
            bare = Some(Money(Currency::default(), money.1));
        }
    }
    bare
}

const COMPONENT_TERMS: &[(&str, Category)] = &[
    ("graphics card", Category::Gpu),
    ("video card", Category::Gpu),
    ("power supply", Category::Psu),
    ("hard drive", Category::Storage),
    ("cpu cooler", Category::Cooler),
    ("processor", Category::Cpu),
    ("cpu", Category::Cpu),
    ("gpu", Category::Gpu),
    ("graphics", Category::Gpu),
    ("memory", Category::Ram),
    ("ram", Category::Ram),
    ("storage", Category::Storage),
    ("ssd", Category::Storage),
    ("hdd", Category::Storage),
    ("nvme", Category::Storage),
    ("motherboard", Category::Motherboard),
    ("mainboard", Category::Motherboard),
    ("psu", Category::Psu),
    ("case", Category::Case),
    ("chassis", Category::Case),
    ("cooler", Category::Cooler),
];

/// The first component category mentioned in `message`, matching whole words only.
pub fn extract_component(message: &str) -> Option<Category> {
    let words: Vec<String> = message
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    let padded = format!(" {} ", words.join(" "));
    COMPONENT_TERMS
        .iter()
        .find(|(term, _)| padded.contains(&format!(" {} ", term)))
        .map(|(_, category)| *category)
}

#[cfg(test)]
mod tests {
    use super::{extract_budget, extract_component, Intent, PatternClassifier};
    use crate::{common::Currency, component::Category};

    #[test]
    fn test_detect() {
        let classifier = PatternClassifier;
        assert_eq!(classifier.detect("What is a GPU?"), Intent::ComponentInfo);
        assert_eq!(classifier.detect("what's the best cpu"), Intent::BestComponent);
        assert_eq!(classifier.detect("can you recommend some RAM"), Intent::ComponentRecommendation);
        assert_eq!(classifier.detect("are these compatible?"), Intent::Compatibility);
        assert_eq!(classifier.detect("I mostly play games"), Intent::GamingUsage);
        assert_eq!(classifier.detect("I do video editing"), Intent::DesignUsage);
        assert_eq!(classifier.detect("just for office work"), Intent::OfficeUsage);
        assert_eq!(classifier.detect("build me a PC for $1200"), Intent::BuildRequest);
        assert_eq!(classifier.detect("hello there"), Intent::Unknown);
        assert_eq!(classifier.detect_usage("a rig for coding, 900 dollars"), Some("development"));
        assert_eq!(classifier.detect_usage("a pc for 900"), None);
    }

    #[test]
    fn test_intent_labels() {
        assert_eq!(Intent::from_label("work_usage"), Intent::DesignUsage);
        assert_eq!(Intent::from_label(" Budget "), Intent::Budget);
        assert_eq!(Intent::from_label("order_pizza"), Intent::Unknown);
        assert_eq!(Intent::GamingUsage.usage_profile(), Some("gaming"));
        assert_eq!(Intent::Budget.usage_profile(), None);
    }

    #[test]
    fn test_extract_budget() {
        let money = extract_budget("a gaming pc for $1,200 please").unwrap();
        assert_eq!(money.0, Currency::USD);
        assert_eq!(money.1, 1200.0);

        let money = extract_budget("I have 900€").unwrap();
        assert_eq!(money.0, Currency::EUR);
        assert_eq!(money.1, 900.0);

        assert_eq!(extract_budget("750 USD is my limit").unwrap().1, 750.0);
        assert_eq!(extract_budget("16GB of ram and a build for 1000").unwrap().1, 1000.0);
        assert!(extract_budget("no numbers here").is_none());
    }

    #[test]
    fn test_extract_component() {
        assert_eq!(extract_component("which graphics card?"), Some(Category::Gpu));
        assert_eq!(extract_component("Tell me about the Power Supply"), Some(Category::Psu));
        assert_eq!(extract_component("what does RAM do"), Some(Category::Ram));
        // no substring matches
        assert_eq!(extract_component("I like programming"), None);
    }
}
