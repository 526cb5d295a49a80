//! Sample prompts written by `DataService::seed`.

use crate::wire::CreatePromptReq;

struct SamplePrompt {
    title: &'static str,
    content: &'static str,
    description: &'static str,
    is_favorite: bool,
}

const SAMPLE_PROMPTS: &[SamplePrompt] = &[
    SamplePrompt {
        title: "Generate Code Documentation",
        content: "Please generate comprehensive documentation for the following code:\n\n{CODE}\n\nInclude:\n- Function/method descriptions\n- Parameter explanations\n- Return value descriptions\n- Usage examples\n- Any important notes or warnings",
        description: "A prompt for generating detailed code documentation",
        is_favorite: true,
    },
    SamplePrompt {
        title: "Code Review Assistant",
        content: "Please review the following code and provide feedback on:\n\n{CODE}\n\n1. Code quality and readability\n2. Potential bugs or issues\n3. Performance optimizations\n4. Best practices adherence\n5. Suggestions for improvement",
        description: "A comprehensive code review prompt",
        is_favorite: false,
    },
    SamplePrompt {
        title: "Explain Complex Concept",
        content: "Please explain the following concept in simple terms:\n\n{CONCEPT}\n\nBreak it down into:\n1. Basic definition\n2. Key components or parts\n3. How it works\n4. Real-world examples\n5. Why it's important",
        description: "Help explain complex topics in an understandable way",
        is_favorite: true,
    },
    SamplePrompt {
        title: "Meeting Summary Generator",
        content: "Please create a comprehensive summary of the following meeting notes:\n\n{MEETING_NOTES}\n\nInclude:\n- Key discussion points\n- Decisions made\n- Action items with owners\n- Next steps\n- Important deadlines",
        description: "Generate structured meeting summaries",
        is_favorite: false,
    },
    SamplePrompt {
        title: "Email Composer",
        content: "Please help me compose a professional email with the following details:\n\nRecipient: {RECIPIENT}\nSubject: {SUBJECT}\nPurpose: {PURPOSE}\nKey Points: {KEY_POINTS}\nTone: {TONE}\n\nCreate a well-structured, professional email that clearly communicates the message.",
        description: "Compose professional emails efficiently",
        is_favorite: false,
    },
    SamplePrompt {
        title: "Bug Report Template",
        content: "Create a detailed bug report with the following information:\n\n**Bug Description:** {BUG_DESCRIPTION}\n**Steps to Reproduce:** {STEPS}\n**Expected Behavior:** {EXPECTED}\n**Actual Behavior:** {ACTUAL}\n**Environment:** {ENVIRONMENT}\n**Additional Notes:** {NOTES}\n\nFormat this as a clear, actionable bug report.",
        description: "Template for creating structured bug reports",
        is_favorite: true,
    },
    SamplePrompt {
        title: "Creative Writing Prompt",
        content: "Write a creative piece based on the following prompt:\n\n{CREATIVE_PROMPT}\n\nStyle: {STYLE}\nLength: {LENGTH}\nTone: {TONE}\n\nFocus on vivid descriptions, character development, and engaging storytelling.",
        description: "Generate creative writing based on prompts",
        is_favorite: false,
    },
    SamplePrompt {
        title: "Data Analysis Prompt",
        content: "Analyze the following data and provide insights:\n\n{DATA}\n\nPlease provide:\n1. Key trends and patterns\n2. Statistical insights\n3. Potential correlations\n4. Actionable recommendations\n5. Data visualization suggestions",
        description: "Comprehensive data analysis and insights",
        is_favorite: true,
    },
];

pub fn sample_prompts() -> Vec<CreatePromptReq> {
    SAMPLE_PROMPTS
        .iter()
        .map(|p| CreatePromptReq {
            title: p.title.to_string(),
            content: p.content.to_string(),
            description: Some(p.description.to_string()),
            is_favorite: p.is_favorite,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_prompt_text;

    #[test]
    fn test_sample_prompts_are_valid() {
        let prompts = sample_prompts();
        assert_eq!(prompts.len(), 8);
        for prompt in &prompts {
            validate_prompt_text(&prompt.title, &prompt.content).unwrap();
        }
        assert_eq!(prompts.iter().filter(|p| p.is_favorite).count(), 4);
    }
}
