use rand::Rng;

/// Fixed joke list, read-only at dispatch time. Order matters only for
/// reproducibility of the set itself; selection is uniform.
pub const JOKES: &[&str] = &[
    "Why don't scientists trust atoms? Because they make up everything!",
    "Why did the scarecrow win an award? Because he was outstanding in his field!",
    "What do you call a bear with no teeth? A gummy bear!",
    "Why don't eggs tell jokes? They'd crack each other up!",
    "What do you call a fake noodle? An impasta!",
    "Why did the bicycle fall over? Because it was two-tired!",
];

/// Pick one joke uniformly at random. `thread_rng` is per-thread, so this is
/// safe to call from concurrent request handlers.
pub fn pick() -> &'static str {
    let idx = rand::thread_rng().gen_range(0..JOKES.len());
    JOKES[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_is_non_empty() {
        assert!(!JOKES.is_empty());
    }

    #[test]
    fn test_pick_always_returns_a_member() {
        for _ in 0..100 {
            assert!(JOKES.contains(&pick()));
        }
    }
}
