//! A small rule-based assistant on top of the engine.
//!
//! Intent detection can be delegated to an external [`IntentClassifier`]; its answer is
//! used only when it is confident, otherwise the built-in [`PatternClassifier`] decides.

pub mod intent;
pub mod knowledge;
pub mod session;

use std::fmt::Write;
use tracing::{debug, warn};

pub use self::{
    intent::{Classification, Intent, IntentClassifier, PatternClassifier},
    session::{ChatMessage, Role, Session},
};
use crate::{
    catalog::CatalogAccess,
    component::Category,
    preferences::PreferenceSet,
    recommend::{Engine, RecommendationRequest},
};

pub struct Assistant<'a, C: CatalogAccess + ?Sized> {
    engine: &'a Engine,
    catalog: &'a C,
    classifier: Option<Box<dyn IntentClassifier + 'a>>,
    confidence_threshold: f64,
}

impl<'a, C: CatalogAccess + ?Sized> Assistant<'a, C> {
    pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.6;

    pub fn new(engine: &'a Engine, catalog: &'a C) -> Self {
        Self {
            engine,
            catalog,
            classifier: None,
            confidence_threshold: Self::DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }

    pub fn with_classifier<I: IntentClassifier + 'a>(mut self, classifier: I) -> Self {
        self.classifier = Some(Box::new(classifier));
        self
    }

    /// External predictions at or below this confidence are ignored.
    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn detect_intent(&self, message: &str) -> Intent {
        if let Some(classifier) = &self.classifier {
            match classifier.classify(message) {
                Ok(c) if c.confidence > self.confidence_threshold => {
                    return Intent::from_label(&c.intent);
                }
                Ok(c) => debug!(intent = %c.intent, confidence = c.confidence, "classifier not confident"),
                Err(error) => warn!(%error, "intent classifier failed"),
            }
        }
        PatternClassifier.detect(message)
    }

    /// Answer `message`, recording both sides of the exchange in `session`.
    pub async fn respond(&self, session: &mut Session, message: &str) -> String {
        session.push(Role::User, message);
        let intent = self.detect_intent(message);
        debug!(session = %session.id, %intent, "handling chat message");

        let reply = match intent {
            Intent::ComponentInfo => self.component_info(intent::extract_component(message)),
            Intent::ComponentRecommendation | Intent::BestComponent => {
                self.component_advice(intent, intent::extract_component(message), session)
            }
            Intent::Compatibility => knowledge::COMPATIBILITY.to_string(),
            Intent::Budget => knowledge::BUDGET.to_string(),
            Intent::GamingUsage
            | Intent::OfficeUsage
            | Intent::DesignUsage
            | Intent::DevelopmentUsage => {
                let profile = intent.usage_profile().unwrap_or("gaming");
                session.usage_type = Some(profile.to_string());
                self.usage_info(profile)
            }
            Intent::BuildRequest => self.build(message, session).await,
            Intent::Unknown => knowledge::HELP.to_string(),
        };

        session.push(Role::Assistant, reply.clone());
        reply
    }

    fn component_info(&self, category: Option<Category>) -> String {
        match category.and_then(knowledge::topic) {
            Some(topic) => format!(
                "{}\n\nImportant specs: {}.",
                topic.description,
                topic.important_specs.join(", ")
            ),
            None => knowledge::UNKNOWN_COMPONENT.to_string(),
        }
    }

    fn component_advice(&self, intent: Intent, category: Option<Category>, session: &Session) -> String {
        let category = match category.filter(|c| knowledge::topic(*c).is_some()) {
            Some(category) => category,
            None => return knowledge::UNKNOWN_COMPONENT.to_string(),
        };
        match session.usage_type.as_deref() {
            Some(usage) => knowledge::advice(category, usage)
                .map(str::to_string)
                .unwrap_or_else(|| knowledge::UNKNOWN_COMPONENT.to_string()),
            None if intent == Intent::BestComponent => format!(
                "The best {} depends on how you'll use it. Is it for gaming, office work, design or development?",
                category
            ),
            None => format!(
                "To recommend a {}, I need to know whether it's for gaming, office work, design or development.",
                category
            ),
        }
    }

    fn usage_info(&self, profile: &str) -> String {
        let (label, table) = self.engine.allocator().resolve(profile);
        let mut shares: Vec<_> = table.iter().collect();
        shares.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut reply = format!("For a {} PC, I'd split the budget like this:\n\n", label);
        for (category, weight) in shares {
            let _ = writeln!(reply, "- {}: {:.0}%", category.as_str().to_uppercase(), weight * 100.0);
        }
        reply.push_str("\nDo you have a budget in mind, or a component you'd like to know more about?");
        reply
    }

    async fn build(&self, message: &str, session: &mut Session) -> String {
        let budget = match intent::extract_budget(message) {
            Some(budget) => budget,
            None => return knowledge::BUDGET.to_string(),
        };
        if let Some(profile) = PatternClassifier.detect_usage(message) {
            session.usage_type = Some(profile.to_string());
        }
        let usage_type = session
            .usage_type
            .clone()
            .unwrap_or_else(|| "gaming".to_string());

        let request = RecommendationRequest::new(budget.1, usage_type).with_preferences(preferences_in(message));
        let recommendation = match self.engine.recommend(self.catalog, &request).await {
            Ok(recommendation) => recommendation,
            Err(error) => {
                warn!(%error, "could not build recommendation for chat");
                return format!("Sorry, I couldn't put a build together: {}", error);
            }
        };

        let symbol = budget.0.symbol();
        let mut reply = format!(
            "For a budget of {}{:.2} and {} use, I'd go with:\n\n",
            symbol, budget.1, recommendation.usage_type
        );
        for component in &recommendation.components {
            let _ = writeln!(
                reply,
                "- {}: {} - {}{:.2}",
                component.category.as_str().to_uppercase(),
                component.name,
                symbol,
                component.price
            );
        }
        let _ = write!(reply, "\nEstimated total: {}{:.2}", symbol, recommendation.total_price);
        if !recommendation.compatibility_details.compatible {
            let _ = write!(
                reply,
                "\n\nHeads up: {}.",
                recommendation.compatibility_details.issues.join("; ")
            );
        }
        reply
    }
}

fn preferences_in(message: &str) -> PreferenceSet {
    let lower = message.to_lowercase();
    let mut preferences = PreferenceSet::new();
    if lower.contains("performance") || lower.contains("fast") {
        preferences.set("prefer_performance", true);
    }
    if lower.contains("storage") || lower.contains("space") {
        preferences.set("prefer_storage", true);
    }
    if lower.contains("quiet") || lower.contains("silent") {
        preferences.set("prefer_silence", true);
    }
    preferences
}

#[cfg(test)]
mod tests {
    use super::{Assistant, Classification, Intent, IntentClassifier, Role, Session};
    use crate::{recommend::Engine, sample};

    struct Fixed(&'static str, f64);

    impl IntentClassifier for Fixed {
        fn classify(&self, _: &str) -> anyhow::Result<Classification> {
            Ok(Classification {
                intent: self.0.to_string(),
                confidence: self.1,
            })
        }
    }

    struct Broken;

    impl IntentClassifier for Broken {
        fn classify(&self, _: &str) -> anyhow::Result<Classification> {
            anyhow::bail!("model file missing")
        }
    }

    #[test]
    fn test_classifier_confidence() {
        let engine = Engine::default();
        let catalog = sample::catalog().unwrap();

        let confident = Assistant::new(&engine, &catalog).with_classifier(Fixed("budget", 0.9));
        assert_eq!(confident.detect_intent("what is a gpu"), Intent::Budget);

        let unsure = Assistant::new(&engine, &catalog).with_classifier(Fixed("budget", 0.6));
        assert_eq!(unsure.detect_intent("what is a gpu"), Intent::ComponentInfo);

        let broken = Assistant::new(&engine, &catalog).with_classifier(Broken);
        assert_eq!(broken.detect_intent("what is a gpu"), Intent::ComponentInfo);
    }

    #[tokio::test]
    async fn test_conversation() {
        let engine = Engine::default();
        let catalog = sample::catalog().unwrap();
        let assistant = Assistant::new(&engine, &catalog);
        let mut session = Session::new("test");

        let reply = assistant.respond(&mut session, "What is a motherboard?").await;
        assert!(reply.contains("CPU socket"));

        let reply = assistant.respond(&mut session, "which is the best gpu").await;
        assert!(reply.starts_with("The best gpu depends"));

        let reply = assistant.respond(&mut session, "I mostly play games").await;
        assert!(reply.contains("GPU: 35%"));
        assert_eq!(session.usage_type.as_deref(), Some("gaming"));

        let reply = assistant.respond(&mut session, "which is the best gpu").await;
        assert!(reply.contains("target resolution"));

        let reply = assistant.respond(&mut session, "build me a pc for $1000").await;
        assert!(reply.contains("For a budget of $1000.00 and gaming use"));
        assert!(reply.contains("Estimated total: $"));
        assert!(reply.contains("- CPU: "));

        assert_eq!(session.messages.len(), 10);
        assert_eq!(session.messages[0].role, Role::User);
        assert_eq!(session.last_reply(), Some(reply.as_str()));
    }

    #[tokio::test]
    async fn test_build_request_picks_up_usage() {
        let engine = Engine::default();
        let catalog = sample::catalog().unwrap();
        let assistant = Assistant::new(&engine, &catalog);
        let mut session = Session::new("office");

        let reply = assistant
            .respond(&mut session, "I need an office computer, about 700 USD")
            .await;
        assert!(reply.contains("office use"));
        assert_eq!(session.usage_type.as_deref(), Some("office"));
    }
}
