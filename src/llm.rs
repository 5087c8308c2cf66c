// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Generative-text adapter and the structured prompts built on top of it.
///
/// Every prompt asks for a JSON document described by a response schema. The
/// reply is decoded strictly: anything that is not exactly the expected
/// document (extra prose, markdown fences, unknown keys, blank values) is a
/// failed call, which the aggregator then replaces with its fallback.
use std::time::Duration;

use masterror::AppError;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::debug;

use crate::fallback::SourceResult;

/// Model used when the configuration does not name one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Default API root.
pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Prompt plus the JSON schema the reply must follow.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt:          String,
    pub response_schema: Value
}

/// Operations the aggregator needs from the generative-text service.
#[allow(async_fn_in_trait)]
pub trait TextGenerator {
    /// Returns the raw text of the model's reply.
    async fn generate_text(&self, request: &GenerationRequest) -> SourceResult<String>;
}

/// Inputs of the bio prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BioInput {
    pub top_language: String,
    pub latest_repo:  String,
    pub total_hours:  u64,
    pub username:     String
}

/// Inputs of the project description prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub repo_name:  String,
    pub language:   String,
    pub stars:      u64,
    pub has_readme: bool,
    pub file_count: u64
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BioResponse {
    bio: String
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectDescriptionResponse {
    description: String
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TechStackResponse {
    #[serde(rename = "techStack")]
    tech_stack: Vec<String>
}

/// Decodes a reply that must be exactly one JSON document of type `T`.
///
/// # Errors
///
/// Returns a validation [`AppError`] when the text is not valid JSON for `T`.
pub fn parse_structured<T>(text: &str) -> SourceResult<T>
where
    T: DeserializeOwned
{
    serde_json::from_str(text.trim())
        .map_err(|e| AppError::validation(format!("generated text does not match the response schema: {e}")))
}

/// Generates a one-sentence profile bio.
pub async fn generate_bio<G>(generator: &G, input: &BioInput) -> SourceResult<String>
where
    G: TextGenerator
{
    let request = GenerationRequest {
        prompt:          format!(
            "Based on the following data, generate a dynamic, engaging one-sentence bio for a \
             GitHub profile. Make it personal, enthusiastic, and showcase the developer's passion \
             for coding. Include their top language and coding hours.\n\nData: {}",
            encode_input(input)?
        ),
        response_schema: object_schema(
            "bio",
            json!({
                "type": "STRING",
                "description": "A dynamic, engaging one-sentence bio for a GitHub profile"
            })
        )
    };

    let response: BioResponse = parse_structured(&generator.generate_text(&request).await?)?;
    non_blank("bio", response.bio)
}

/// Generates a description for a repository that has none.
pub async fn generate_project_description<G>(generator: &G, input: &ProjectInput) -> SourceResult<String>
where
    G: TextGenerator
{
    let request = GenerationRequest {
        prompt:          format!(
            "Based on the following repository information, generate an engaging, professional \
             project description. Make it sound interesting and highlight what makes this project \
             special.\n\nRepository Data: {}\n\nGuidelines:\n- Make it engaging and professional\n\
             - Highlight the technology stack\n- Mention what makes it unique or interesting\n\
             - Keep it concise but informative\n- Don't use generic phrases like \"amazing project\"",
            encode_input(input)?
        ),
        response_schema: object_schema(
            "description",
            json!({
                "type": "STRING",
                "description": "An engaging, professional project description"
            })
        )
    };

    let response: ProjectDescriptionResponse = parse_structured(&generator.generate_text(&request).await?)?;
    non_blank("description", response.description)
}

/// Expands raw language names into associated frameworks and tools.
pub async fn generate_tech_stack<G>(generator: &G, languages: &[String]) -> SourceResult<Vec<String>>
where
    G: TextGenerator
{
    let request = GenerationRequest {
        prompt:          format!(
            "Based on the following GitHub repository language data, generate an enhanced tech \
             stack. Analyze the languages and suggest related technologies, frameworks, and tools \
             that would typically be used together.\n\nLanguage Data: {}\n\nInclude popular \
             frameworks, databases, and tools that complement the languages.",
            encode_input(&json!({ "languages": languages }))?
        ),
        response_schema: object_schema(
            "techStack",
            json!({
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Array of technology names that complement the detected languages"
            })
        )
    };

    let response: TechStackResponse = parse_structured(&generator.generate_text(&request).await?)?;
    let stack: Vec<String> = response
        .tech_stack
        .into_iter()
        .map(|item| item.trim().to_owned())
        .filter(|item| !item.is_empty())
        .collect();

    if stack.is_empty() {
        return Err(AppError::validation("generated tech stack is empty"));
    }
    Ok(stack)
}

fn encode_input<T>(input: &T) -> SourceResult<String>
where
    T: Serialize
{
    serde_json::to_string(input).map_err(|e| AppError::internal(format!("failed to encode prompt data: {e}")))
}

fn object_schema(property: &str, schema: Value) -> Value {
    json!({
        "type": "OBJECT",
        "properties": { property: schema },
        "required": [property]
    })
}

fn non_blank(field: &str, value: String) -> SourceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("generated {field} is blank")));
    }
    Ok(trimmed.to_owned())
}

/// [`TextGenerator`] backed by the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http:     reqwest::Client,
    api_key:  String,
    model:    String,
    base_url: String
}

impl GeminiClient {
    /// Builds a client for `model`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] when the HTTP client cannot be built.
    pub fn new(api_key: &str, model: &str) -> SourceResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::internal(format!("failed to build LLM client: {e}")))?;

        Ok(Self {
            http,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url: GEMINI_API_URL.to_owned()
        })
    }

    /// Overrides the API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl TextGenerator for GeminiClient {
    async fn generate_text(&self, request: &GenerationRequest) -> SourceResult<String> {
        debug!("Requesting generation from {}", self.model);
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(request))
            .send()
            .await
            .map_err(|e| AppError::service(format!("LLM request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::service(format!("LLM API returned {status}: {body}")));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::validation(format!("unexpected LLM payload: {e}")))?;

        body.into_text()
    }
}

fn request_body(request: &GenerationRequest) -> Value {
    json!({
        "contents": [ { "parts": [ { "text": request.prompt } ] } ],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": request.response_schema
        }
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: Option<String>
}

impl GenerateContentResponse {
    fn into_text(self) -> SourceResult<String> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AppError::validation("LLM response has no candidates"))?;

        let text: String = candidate
            .content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        if text.trim().is_empty() {
            return Err(AppError::validation("LLM response has no text"));
        }
        Ok(text)
    }
}
