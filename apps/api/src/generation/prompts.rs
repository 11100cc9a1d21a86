// Prompt constants and builders for document generation.
// The output-format contract at the end of the user prompt is load-bearing:
// `parser::parse_tagged_sections` depends on those exact tag names.

use crate::generation::input::CandidateInput;

/// System prompt for every generation call.
pub const WRITER_SYSTEM: &str = "You are an expert resume and cover letter writer. \
    Follow the user's format instructions exactly.";

const NOT_PROVIDED: &str = "Not provided";

/// Builds the single user prompt from validated candidate details.
/// Deterministic: the same input always yields the same prompt.
pub fn build_prompt(input: &CandidateInput) -> String {
    format!(
        "\
Use create-document style output quality for professional job application writing.

Candidate Details:
- Full Name: {full_name}
- Desired Role: {desired_role}
- Experience Summary: {experience_summary}
- Previous Roles: {previous_roles}
- Skills: {skills}
- Education: {education}
- Achievements: {achievements}
- Target Company: {target_company}

Instructions:
1) Create a tailored, ATS-friendly resume text for the desired role.
2) Create a tailored cover letter text for the same role and target company.
3) Keep claims realistic and grounded in supplied details.
4) Resume should include clear sections and bullet points.
5) Cover letter should be concise and persuasive.

Return output in this exact format:
<resume>
[resume text only]
</resume>
<cover_letter>
[cover letter text only]
</cover_letter>",
        full_name = or_placeholder(&input.full_name),
        desired_role = or_placeholder(&input.desired_role),
        experience_summary = or_placeholder(&input.experience_summary),
        previous_roles = or_placeholder(&input.previous_roles),
        skills = or_placeholder(&input.skills),
        education = or_placeholder(&input.education),
        achievements = or_placeholder(&input.achievements),
        target_company = or_placeholder(&input.target_company),
    )
}

fn or_placeholder(value: &str) -> &str {
    if value.is_empty() {
        NOT_PROVIDED
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_input() -> CandidateInput {
        CandidateInput {
            full_name: "Jane Doe".to_string(),
            desired_role: "Backend Engineer".to_string(),
            experience_summary: "Five years of Rust services.".to_string(),
            previous_roles: String::new(),
            skills: String::new(),
            education: String::new(),
            achievements: String::new(),
            target_company: String::new(),
        }
    }

    #[test]
    fn empty_optionals_render_as_not_provided() {
        let prompt = build_prompt(&minimal_input());
        assert!(prompt.contains("- Previous Roles: Not provided"));
        assert!(prompt.contains("- Skills: Not provided"));
        assert!(prompt.contains("- Target Company: Not provided"));
        assert!(prompt.contains("- Full Name: Jane Doe"));
    }

    #[test]
    fn prompt_carries_the_output_format_contract() {
        let prompt = build_prompt(&minimal_input());
        assert!(prompt.contains("<resume>"));
        assert!(prompt.contains("</resume>"));
        assert!(prompt.contains("<cover_letter>"));
        assert!(prompt.contains("</cover_letter>"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let input = minimal_input();
        assert_eq!(build_prompt(&input), build_prompt(&input));
    }
}
