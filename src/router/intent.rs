/// The discrete category a free-text message is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Weather,
    Reminder,
    Poem,
    Joke,
    Love,
    GeneralConversation,
}

/// Classify a message by ordered, case-insensitive substring rules.
///
/// The rule order is a deliberate tie-break policy: a message mentioning both
/// "weather" and "joke" is always Weather. Substrings match inside larger
/// words ("lovely" classifies as Love); callers rely on that behavior.
pub fn classify(text: &str) -> Intent {
    let lower = text.to_lowercase();

    if lower.contains("weather") {
        Intent::Weather
    } else if lower.contains("reminder") {
        Intent::Reminder
    } else if lower.contains("poem") {
        Intent::Poem
    } else if lower.contains("joke") {
        Intent::Joke
    } else if lower.contains("love") || lower.contains("feelings") {
        Intent::Love
    } else {
        Intent::GeneralConversation
    }
}
