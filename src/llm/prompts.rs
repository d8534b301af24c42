//! Prompt construction for the AI insight endpoint.
//!
//! One fixed template: the growth-analyst role, the hardcoded business
//! milestones, and the user's question interpolated verbatim. There is no
//! input sanitization; the insight box is a demo surface, not a security
//! boundary.

/// Build the composite insight prompt around the user's message.
pub fn build_insight_prompt(message: &str) -> String {
    format!(
        "\
You are the Growth Analyst for an audiobook streaming platform.

Recent milestones:
- Audiobooks catalog: 500,000+ titles (tripled)
- Available in 14 markets
- 52% of listeners aged 18-34
- 10% MoM listening growth in France, Netherlands, and Germany
- 36% YoY increase in audiobook starts
- 37% YoY increase in listening hours
- Audiobooks+ users: +18% consumption in 30 days
- UK audiobook revenue: +31% YoY (GBP 268M)
- US digital audio: +14% adult, +48% kids/teens growth

User question: \"{message}\"

Write a 2-3 sentence data-driven insight that explains what's driving \
growth and how the platform is reimagining audiobooks for the next \
generation.\n"
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_interpolates_message_verbatim() {
        let prompt = build_insight_prompt("Why is audiobook growth accelerating?");
        assert!(prompt.contains("User question: \"Why is audiobook growth accelerating?\""));
    }

    #[test]
    fn prompt_carries_the_milestone_statistics() {
        let prompt = build_insight_prompt("anything");
        assert!(prompt.contains("500,000+ titles"));
        assert!(prompt.contains("10% MoM listening growth"));
        assert!(prompt.contains("+31% YoY"));
        assert!(prompt.contains("2-3 sentence"));
    }

    #[test]
    fn empty_message_still_produces_a_prompt() {
        let prompt = build_insight_prompt("");
        assert!(prompt.contains("User question: \"\""));
    }
}
