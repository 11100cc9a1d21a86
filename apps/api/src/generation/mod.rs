//! Document generation pipeline: prompt → provider call → tagged-section
//! parse → two parallel PDF renders.

pub mod handlers;
pub mod input;
pub mod parser;
pub mod pdf;
pub mod prompts;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use tokio::try_join;

use crate::errors::GenerateError;
use crate::generation::input::CandidateInput;
use crate::llm_client::{LlmClient, ProviderConfig};

/// Everything one successful request returns. Built once, serialized into
/// the 200 body, never persisted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub provider: &'static str,
    pub model: String,
    pub resume_text: String,
    pub cover_letter_text: String,
    pub resume_file_name: String,
    pub cover_letter_file_name: String,
    pub resume_pdf_base64: String,
    pub cover_letter_pdf_base64: String,
}

/// Runs the full pipeline for one validated candidate against one resolved
/// provider. The two PDF renders share no state and run concurrently on the
/// blocking pool; either failure aborts the pair.
pub async fn generate_documents(
    llm: &LlmClient,
    provider: ProviderConfig,
    input: &CandidateInput,
) -> Result<GenerationResult, GenerateError> {
    let prompt = prompts::build_prompt(input);
    let response = llm
        .complete(&provider, prompts::WRITER_SYSTEM, &prompt)
        .await?;

    let raw_text = parser::extract_output_text(&response)?;
    let sections = parser::parse_tagged_sections(&raw_text)?;

    let (resume_pdf, cover_letter_pdf) = try_join!(
        render_on_blocking_pool(
            format!("{} - Tailored Resume", input.full_name),
            sections.resume_text.clone(),
        ),
        render_on_blocking_pool(
            format!("{} - Cover Letter", input.full_name),
            sections.cover_letter_text.clone(),
        ),
    )?;

    Ok(GenerationResult {
        provider: provider.provider,
        model: provider.model,
        resume_text: sections.resume_text,
        cover_letter_text: sections.cover_letter_text,
        resume_file_name: make_file_name(&input.full_name, "resume"),
        cover_letter_file_name: make_file_name(&input.full_name, "cover-letter"),
        resume_pdf_base64: STANDARD.encode(&resume_pdf),
        cover_letter_pdf_base64: STANDARD.encode(&cover_letter_pdf),
    })
}

async fn render_on_blocking_pool(title: String, body: String) -> Result<Vec<u8>, GenerateError> {
    tokio::task::spawn_blocking(move || pdf::render_pdf(&title, &body))
        .await
        .map_err(|e| GenerateError::Render(format!("render task failed: {e}")))?
}

/// Download file name: lowercase, non-alphanumeric runs collapsed to `-`,
/// edge hyphens stripped, `candidate` when nothing survives.
pub fn make_file_name(base_name: &str, suffix: &str) -> String {
    let mut normalized = String::new();
    let mut gap = false;
    for ch in base_name.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            if gap && !normalized.is_empty() {
                normalized.push('-');
            }
            gap = false;
            normalized.push(ch);
        } else {
            gap = true;
        }
    }

    if normalized.is_empty() {
        normalized = "candidate".to_string();
    }
    format!("{normalized}-{suffix}.pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_normalizes_punctuation_to_hyphens() {
        assert_eq!(
            make_file_name("Jane O'Brien!!", "resume"),
            "jane-o-brien-resume.pdf"
        );
        assert_eq!(
            make_file_name("Jane  Doe", "cover-letter"),
            "jane-doe-cover-letter.pdf"
        );
    }

    #[test]
    fn file_name_falls_back_for_symbol_only_names() {
        assert_eq!(make_file_name("!!!", "resume"), "candidate-resume.pdf");
        assert_eq!(make_file_name("", "resume"), "candidate-resume.pdf");
    }

    #[test]
    fn file_name_strips_edge_hyphens() {
        assert_eq!(make_file_name("--Jane--", "resume"), "jane-resume.pdf");
    }
}
