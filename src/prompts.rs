//! Prompts for LLM-based form extraction.
//!
//! Callers can override the default via
//! [`crate::config::ExtractionConfig::system_prompt`] or per call through
//! [`crate::service::ExtractionService::extract_raw`]; the constants here are
//! used only when no override is provided.

/// Default system prompt for turning extracted form text into JSON.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a highly accurate data extraction agent.
Your task is to extract all the information from the provided document text into a structured JSON format.

Rules:
1. Identify all fields in the form (labels and values).
2. Use a detailed nested structure for sections (e.g., "Personal Information", "Education").
3. Represent checkboxes as booleans (true/false) or string values if applicable.
4. Handle tables by creating lists of objects.
5. If a field is empty, represent it as null or an empty string.
6. Return ONLY the JSON string. Do not include markdown formatting (like ```json ... ```) or explanations."#;

/// Build the user message carrying the document text.
pub fn user_message(document_text: &str) -> String {
    format!("Here is the form content to extract:\n\n{}", document_text)
}
