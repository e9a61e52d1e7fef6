//! Voice command classification

/// Category of a recognized voice command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Change the HUD accent color
    ChangeColor,
    /// Restart the runner game
    ResetGame,
    /// Anything else: answered conversationally
    General,
}

const COLOR_KEYWORDS: [&str; 3] = ["color", "scheme", "theme"];
const RESET_KEYWORDS: [&str; 2] = ["reset game", "restart"];

/// Classifies an utterance by keyword, case-insensitively
///
/// Color keywords take precedence over reset keywords.
pub fn classify(utterance: &str) -> Intent {
    let lowered = utterance.to_lowercase();
    if COLOR_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        Intent::ChangeColor
    } else if RESET_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        Intent::ResetGame
    } else {
        Intent::General
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_intent() {
        assert_eq!(classify("Change color to green"), Intent::ChangeColor);
        assert_eq!(classify("switch the THEME"), Intent::ChangeColor);
        assert_eq!(classify("new colour scheme please"), Intent::ChangeColor);
    }

    #[test]
    fn test_reset_intent() {
        assert_eq!(classify("Reset game"), Intent::ResetGame);
        assert_eq!(classify("please restart"), Intent::ResetGame);
        // "reset" alone is conversation
        assert_eq!(classify("reset"), Intent::General);
    }

    #[test]
    fn test_color_beats_reset() {
        assert_eq!(classify("restart with a red theme"), Intent::ChangeColor);
    }

    #[test]
    fn test_general_fallback() {
        assert_eq!(classify("what time is it"), Intent::General);
        assert_eq!(classify(""), Intent::General);
    }
}
