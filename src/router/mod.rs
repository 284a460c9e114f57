pub mod city;
pub mod intent;

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::jokes;
use crate::llm::TextGenerator;
use crate::weather::WeatherLookup;
use crate::router::intent::{classify, Intent};

/// Context used when a chat request does not supply one.
pub const DEFAULT_CONTEXT: &str = "This is a default context.";

/// Reply when a weather question names no recognizable city.
pub const SPECIFY_CITY_REPLY: &str =
    "Please tell me which city you'd like the weather for, e.g. \"what's the weather in London?\"";

/// Reminders are managed through their own endpoints, not through chat.
pub const REMINDER_STUB_REPLY: &str =
    "I can't manage reminders from chat yet. Please use the reminders panel instead.";

/// Soft fallback when the dialogue backend fails.
pub const APOLOGY_REPLY: &str =
    "Sorry, I'm having trouble coming up with a reply right now. Please try again in a moment.";

/// One free-text message submitted for routing. Immutable input to a single
/// routing decision; nothing about it persists across requests.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub text: String,
    pub context: String,
}

impl IncomingMessage {
    pub fn with_context(text: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context: context.into(),
        }
    }
}

/// The uniform reply shape, regardless of which capability produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
}

#[derive(Debug, Error)]
pub enum RouteError {
    /// Rejected before classification runs.
    #[error("message text is empty")]
    EmptyMessage,
    /// Poem generation has no graceful fallback; the failure is the caller's
    /// to surface.
    #[error("poem generation failed: {0}")]
    PoemUnavailable(#[source] anyhow::Error),
}

/// Intent-routed dispatcher: classifies one message and hands it to the
/// matching capability, normalizing every outcome into a [`Reply`].
///
/// Stateless and reentrant; collaborators are injected at construction so
/// tests can substitute fakes.
pub struct ChatRouter {
    poem: Arc<dyn TextGenerator>,
    dialogue: Arc<dyn TextGenerator>,
    weather: Arc<dyn WeatherLookup>,
}

impl ChatRouter {
    pub fn new(
        poem: Arc<dyn TextGenerator>,
        dialogue: Arc<dyn TextGenerator>,
        weather: Arc<dyn WeatherLookup>,
    ) -> Self {
        Self {
            poem,
            dialogue,
            weather,
        }
    }

    /// Route one message to its capability.
    ///
    /// Failure policy differs per intent and is part of the contract:
    /// weather and dialogue failures soft-degrade into fixed replies, poem
    /// failures propagate as [`RouteError::PoemUnavailable`].
    pub async fn route(&self, msg: &IncomingMessage) -> Result<Reply, RouteError> {
        if msg.text.trim().is_empty() {
            return Err(RouteError::EmptyMessage);
        }

        let intent = classify(&msg.text);
        debug!(
            "Classified message as {:?}: {} (context: {})",
            intent, msg.text, msg.context
        );

        let text = match intent {
            Intent::Weather => match city::extract_city(&msg.text) {
                None => SPECIFY_CITY_REPLY.to_string(),
                Some(city) => match self.weather.lookup(&city).await {
                    Some(report) => format!(
                        "The weather in {} is {}°C and {}.",
                        city, report.temperature, report.description
                    ),
                    None => format!("Could not retrieve weather for {}.", city),
                },
            },
            Intent::Reminder => REMINDER_STUB_REPLY.to_string(),
            Intent::Poem => self
                .poem
                .generate(&msg.text)
                .await
                .map_err(RouteError::PoemUnavailable)?,
            Intent::Joke => jokes::pick().to_string(),
            // Love has no handler of its own; it shares the conversation path.
            Intent::Love | Intent::GeneralConversation => {
                match self.dialogue.generate(&msg.text).await {
                    Ok(reply) => reply,
                    Err(e) => {
                        warn!("Dialogue generation failed, sending apology: {:#}", e);
                        APOLOGY_REPLY.to_string()
                    }
                }
            }
        };

        Ok(Reply { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::WeatherReport;
    use anyhow::anyhow;
    use async_trait::async_trait;

    struct FixedGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            Err(anyhow!("backend unreachable"))
        }
    }

    struct FixedWeather(Option<WeatherReport>);

    #[async_trait]
    impl WeatherLookup for FixedWeather {
        async fn lookup(&self, _city: &str) -> Option<WeatherReport> {
            self.0.clone()
        }
    }

    fn msg(text: &str) -> IncomingMessage {
        IncomingMessage::with_context(text, DEFAULT_CONTEXT)
    }

    fn router(
        poem: impl TextGenerator + 'static,
        dialogue: impl TextGenerator + 'static,
        weather: impl WeatherLookup + 'static,
    ) -> ChatRouter {
        ChatRouter::new(Arc::new(poem), Arc::new(dialogue), Arc::new(weather))
    }

    fn default_router() -> ChatRouter {
        router(
            FixedGenerator("a poem"),
            FixedGenerator("a chat reply"),
            FixedWeather(None),
        )
    }

    #[tokio::test]
    async fn test_weather_with_city_renders_report() {
        let r = router(
            FixedGenerator("unused"),
            FixedGenerator("unused"),
            FixedWeather(Some(WeatherReport {
                temperature: 18.5,
                description: "clear sky".to_string(),
            })),
        );
        let reply = r
            .route(&msg("what's the weather in Paris?"))
            .await
            .unwrap();
        assert_eq!(reply.text, "The weather in Paris is 18.5°C and clear sky.");
    }

    #[tokio::test]
    async fn test_weather_without_city_asks_for_one() {
        let reply = default_router()
            .route(&msg("weather please"))
            .await
            .unwrap();
        assert_eq!(reply.text, SPECIFY_CITY_REPLY);
    }

    #[tokio::test]
    async fn test_weather_lookup_failure_is_soft() {
        let reply = default_router()
            .route(&msg("what's the weather in Paris?"))
            .await
            .unwrap();
        assert_eq!(reply.text, "Could not retrieve weather for Paris.");
    }

    #[tokio::test]
    async fn test_reminder_intent_is_a_stub() {
        let reply = default_router()
            .route(&msg("set a reminder for tomorrow"))
            .await
            .unwrap();
        assert_eq!(reply.text, REMINDER_STUB_REPLY);
    }

    #[tokio::test]
    async fn test_joke_reply_comes_from_the_fixed_list() {
        let r = default_router();
        for _ in 0..20 {
            let reply = r
                .route(&msg("Tell me a joke"))
                .await
                .unwrap();
            assert!(jokes::JOKES.contains(&reply.text.as_str()));
        }
    }

    #[tokio::test]
    async fn test_poem_uses_the_poem_generator() {
        let r = router(
            FixedGenerator("roses are red"),
            FixedGenerator("not this one"),
            FixedWeather(None),
        );
        let reply = r
            .route(&msg("write me a poem about rust"))
            .await
            .unwrap();
        assert_eq!(reply.text, "roses are red");
    }

    #[tokio::test]
    async fn test_poem_failure_is_a_hard_error() {
        let r = router(
            FailingGenerator,
            FixedGenerator("unused"),
            FixedWeather(None),
        );
        let result = r
            .route(&msg("write me a poem about rust"))
            .await;
        assert!(matches!(result, Err(RouteError::PoemUnavailable(_))));
    }

    #[tokio::test]
    async fn test_dialogue_failure_soft_degrades_to_apology() {
        let r = router(
            FixedGenerator("unused"),
            FailingGenerator,
            FixedWeather(None),
        );
        let reply = r
            .route(&msg("hello there"))
            .await
            .unwrap();
        assert_eq!(reply.text, APOLOGY_REPLY);
    }

    #[tokio::test]
    async fn test_love_shares_the_conversation_path() {
        let r = router(
            FixedGenerator("unused"),
            FixedGenerator("let's talk about that"),
            FixedWeather(None),
        );
        let reply = r
            .route(&msg("I love rainy days"))
            .await
            .unwrap();
        assert_eq!(reply.text, "let's talk about that");
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected_before_classification() {
        let result = default_router().route(&msg("   ")).await;
        assert!(matches!(result, Err(RouteError::EmptyMessage)));
    }
}
