//! Prompt templates sent to the language model

use super::color::AccentColor;

/// Prompt asking the model for a single hex code matching the request
pub fn color_prompt(utterance: &str) -> String {
    let presets = AccentColor::PRESETS
        .iter()
        .map(|(name, hex)| format!("{name} ({hex})"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "The user wants to change the UI color scheme. User input: \"{utterance}\".\n\
         Available preset colors: {presets}.\n\
         If they specified a color, extract it and return ONLY the hex code.\n\
         If they didn't specify, pick a \"cool futuristic\" one.\n\
         Respond with JUST the hex code, no other text."
    )
}

/// Prompt for a short in-character reply
pub fn conversation_prompt(utterance: &str) -> String {
    format!(
        "You are JARVIS, a sophisticated AI. The user just said: \"{utterance}\". \
         Respond briefly and professionally in a futuristic AI tone. Keep it under 20 words."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_prompt_lists_presets() {
        let prompt = color_prompt("make it gold");
        assert!(prompt.contains("\"make it gold\""));
        assert!(prompt.contains("Gold (#ffd700)"));
        assert!(prompt.contains("Emerald (#50c878)"));
    }

    #[test]
    fn test_conversation_prompt_embeds_utterance() {
        let prompt = conversation_prompt("hello there");
        assert!(prompt.contains("\"hello there\""));
        assert!(prompt.contains("under 20 words"));
    }
}
