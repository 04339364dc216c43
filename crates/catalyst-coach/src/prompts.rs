//! Prompt text for each coaching operation.

use catalyst_core::cycle::Goal;

fn goals_json(goals: &[Goal]) -> String {
    serde_json::to_string(goals).unwrap_or_else(|_| "[]".to_string())
}

pub fn feedback(vision: &str, goals: &[Goal]) -> String {
    format!(
        "Analyze this 12 Week Year plan as a performance coach.\n\
         Vision: {vision}\n\
         Goals: {}\n\n\
         Give me a concise critique and 3 \"Power Actions\" to ensure 85% execution.",
        goals_json(goals)
    )
}

pub fn corrective_action(score: u32, week_number: u32, goals: &[Goal]) -> String {
    format!(
        "The user's execution score was {score}% in week {week_number}.\n\
         Based on these goals: {},\n\
         suggest a \"Corrective Recovery Plan\" for next week to get back to 85%+.\n\
         Focus on removing obstacles and simplifying tactics.",
        goals_json(goals)
    )
}

pub fn vision_prompts() -> String {
    "Generate 5 thought-provoking questions to help someone define a '12 Week Year' \
     compelling vision. Make them challenging and future-focused.\n\n\
     IMPORTANT: Respond ONLY with a JSON array of 5 strings. No other text.\n\
     Example format: [\"Question 1?\", \"Question 2?\", \"Question 3?\", \"Question 4?\", \"Question 5?\"]"
        .to_string()
}

pub fn refine_vision(draft: &str) -> String {
    format!(
        "Refine this vision statement into a compelling, clear, and emotional 1-page vision.\n\
         Vision draft: \"{draft}\"\n\
         Make it punchy, present-tense, and highly motivating. Use markdown if necessary."
    )
}

pub fn suggest_tactics(goal_title: &str) -> String {
    format!(
        "Suggest 3-5 high-impact tactics for a 12-week goal: \"{goal_title}\".\n\
         Tactics must be daily or weekly repeatable actions. Lead indicators only.\n\n\
         IMPORTANT: Respond ONLY with a JSON array of objects with these properties:\n\
         - description (string): what the tactic is\n\
         - frequency (string): either \"daily\" or \"weekly\"\n\
         - target (number): how many times to complete per week\n\n\
         Example format: [{{\"description\": \"Write for 30 minutes\", \"frequency\": \"daily\", \"target\": 1}}]"
    )
}
