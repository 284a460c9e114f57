/// Pull a city name out of a weather question.
///
/// Rules, first applicable wins:
/// 1. everything after the last "weather in";
/// 2. everything after the last "weather of";
/// 3. everything after the first standalone word "in" or "of".
///
/// The tail is stripped of a trailing "?" and trimmed; an empty result is
/// treated as no city at all. Phrase matching ignores case but the returned
/// city keeps the original casing.
pub fn extract_city(text: &str) -> Option<String> {
    for phrase in ["weather in", "weather of"] {
        if let Some(idx) = rfind_ignore_ascii_case(text, phrase) {
            return clean(&text[idx + phrase.len()..]);
        }
    }

    // No "weather in/of" phrase: fall back to the first "in"/"of" word and
    // take the rest of the message, whatever it turns out to be.
    let words: Vec<&str> = text.split_whitespace().collect();
    let pos = words
        .iter()
        .position(|w| w.eq_ignore_ascii_case("in") || w.eq_ignore_ascii_case("of"))?;
    clean(&words[pos + 1..].join(" "))
}

/// Byte offset of the last case-insensitive occurrence of an ASCII needle.
/// Avoids `to_lowercase`, whose output can shift byte offsets for non-ASCII
/// input.
fn rfind_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .rposition(|window| window.eq_ignore_ascii_case(needle))
}

fn clean(raw: &str) -> Option<String> {
    let city = raw.trim().trim_end_matches('?').trim();
    if city.is_empty() {
        None
    } else {
        Some(city.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_in_extracts_city() {
        assert_eq!(
            extract_city("What's the weather in San Francisco?"),
            Some("San Francisco".to_string())
        );
    }

    #[test]
    fn test_weather_of_extracts_city() {
        assert_eq!(
            extract_city("weather of New York"),
            Some("New York".to_string())
        );
    }

    #[test]
    fn test_last_occurrence_of_phrase_wins() {
        assert_eq!(
            extract_city("is the weather in London like the weather in Tokyo?"),
            Some("Tokyo".to_string())
        );
    }

    #[test]
    fn test_phrase_match_ignores_case_but_keeps_city_casing() {
        assert_eq!(
            extract_city("WEATHER IN Toronto"),
            Some("Toronto".to_string())
        );
    }

    #[test]
    fn test_no_city_phrase_yields_none() {
        assert_eq!(extract_city("weather please"), None);
        assert_eq!(extract_city(""), None);
    }

    #[test]
    fn test_empty_tail_yields_none() {
        assert_eq!(extract_city("what's the weather in ?"), None);
        assert_eq!(extract_city("weather in"), None);
    }

    #[test]
    fn test_fallback_word_rule() {
        assert_eq!(
            extract_city("how warm is it in Berlin?"),
            Some("Berlin".to_string())
        );
    }

    #[test]
    fn test_fallback_first_word_wins_regardless_of_which() {
        // "of" appears before "in"; the rest of the message rides along.
        assert_eq!(
            extract_city("is it cold of late in Oslo?"),
            Some("late in Oslo".to_string())
        );
    }

    #[test]
    fn test_fallback_with_nothing_after_the_word() {
        assert_eq!(extract_city("what is it in"), None);
    }
}
