// All LLM prompt constants for the screening pipeline.
// Reuses the JSON-only fragment from llm_client::prompts.

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// Schema description sent to the model. Keys must match `REQUIRED_FIELDS`.
pub const CANDIDATE_SCHEMA: &str = r#"{
  "name": "Candidate's full name",
  "area": "Main area or sector the candidate works in. Classify into exactly one: Development, Marketing, Sales, Finance, Administrative, Other",
  "summary": "Objective summary of the candidate's professional profile",
  "skills": ["skill 1", "skill 2", "..."],
  "education": "Summary of the most relevant academic background",
  "interview_questions": ["At least 3 useful interview questions based on the résumé, to clarify a point or explore it further"],
  "strengths": ["Strengths and aspects that indicate alignment with the profile or the position"],
  "areas_for_development": ["Points that indicate possible gaps, weaknesses or development needs"],
  "important_considerations": ["Specific observations that deserve verification or extra care"],
  "final_recommendations": "Final evaluative summary with suggested next steps (e.g. proceed to interview, refer to another position)",
  "score": 0.0
}"#;

/// Scoring rubric interpolated as `{prompt_score}`.
pub const SCORE_RUBRIC: &str = "\
Based on the specific position, compute the final score (from 0.0 to 10.0).
This field must contain only the final score (x.x) with no other text or notes.
Be fair and strict when scoring. A 10.0 is only for applications that exceed every expectation of the position.
Evaluation criteria:
1. Experience (weight: 35% of the total): previous positions, time in role and similarity with the position's responsibilities.
2. Technical skills (weight: 25% of the total): alignment of technical skills with the requirements listed in the position.
3. Education (weight: 15% of the total): relevance of degrees and certifications to the role, including institutions and years of study.
4. Strengths (weight: 15% of the total): relevance of the strengths (or alignments) to the position.
5. Weaknesses (discount of up to 10%): severity of the weaknesses (or misalignments) for the position.";

/// Screening prompt template. Replace `{schema}`, `{prompt_score}`, `{cv}`
/// and `{job}` before sending.
pub const SCREENING_PROMPT_TEMPLATE: &str = "\
You are a Human Resources specialist with extensive experience in résumé analysis.
Your task is to analyze the following content and extract the data in the format below, for each field.
{json_only}
Desired schema:
{schema}
---
To compute the score field:
{prompt_score}
---
Résumé to analyze:
'{cv}'
---
Position the candidate is applying for:
'{job}'";

/// Fills the screening template.
///
/// `{cv}` is substituted last so text inside the résumé that happens to look
/// like a placeholder is never expanded.
pub fn build_screening_prompt(schema: &str, prompt_score: &str, cv: &str, job: &str) -> String {
    SCREENING_PROMPT_TEMPLATE
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{schema}", schema)
        .replace("{prompt_score}", prompt_score)
        .replace("{job}", job)
        .replace("{cv}", cv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::REQUIRED_FIELDS;

    #[test]
    fn test_prompt_interpolates_every_placeholder() {
        let prompt = build_screening_prompt("SCHEMA", "RUBRIC", "CV TEXT", "JOB TEXT");
        for needle in ["SCHEMA", "RUBRIC", "'CV TEXT'", "'JOB TEXT'", JSON_ONLY_INSTRUCTION] {
            assert!(prompt.contains(needle), "prompt missing {needle}");
        }
        assert!(!prompt.contains("{schema}"));
        assert!(!prompt.contains("{cv}"));
    }

    #[test]
    fn test_placeholders_inside_cv_are_left_alone() {
        let prompt = build_screening_prompt("SCHEMA", "RUBRIC", "I love {job} templates", "JOB");
        assert!(prompt.contains("I love {job} templates"));
    }

    #[test]
    fn test_schema_is_valid_json_with_required_keys() {
        let schema: serde_json::Value = serde_json::from_str(CANDIDATE_SCHEMA).unwrap();
        for (field, _) in REQUIRED_FIELDS {
            assert!(schema.get(*field).is_some(), "schema missing {field}");
        }
    }
}
