//! Evaluation prompt rendering.

/// Render the instruction prompt for one requirement.
///
/// The requirement is embedded verbatim between double quotes; callers pass
/// the trimmed text.
#[must_use]
pub fn build_evaluation_prompt(requirement: &str) -> String {
    format!(
        r#"You are an expert software requirements analyst. Analyze the following
software requirement and provide a structured evaluation.

Requirement to evaluate:
"{requirement}"

Evaluate the requirement and respond with ONLY valid JSON in this exact format:
{{
    "ambiguity_detected": true/false,
    "ambiguity_details": "explanation of any ambiguous terms or phrases, or 'None' if clear",
    "testable": true/false,
    "testability_details": "explanation of whether the requirement can be objectively tested",
    "completeness_score": 1-10,
    "completeness_details": "explanation of what information may be missing",
    "issues": ["list", "of", "specific", "issues"],
    "suggestions": ["list", "of", "improvement", "suggestions"]
}}

Important guidelines:
- ambiguity_detected: true if the requirement contains vague, unclear, or subjective language
- testable: true if the requirement has measurable, verifiable acceptance criteria
- completeness_score: 1 (very incomplete) to 10 (fully complete)
- Be specific and actionable in your feedback

Respond with ONLY the JSON object, no additional text."#
    )
}
