// GeminiProvider - Gemini generateContent REST backend
//
// Default endpoint: https://generativelanguage.googleapis.com/v1beta
// Requires API key.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::provider::{
    Candidate, FunctionCallingMode, GenerativeModel, ModelRequest, ModelResponse, RequestPart,
    ResponsePart,
};

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Generative model provider backed by the Gemini REST API.
pub struct GeminiProvider {
    api_key: String,
    endpoint: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT.to_string())
    }

    /// Override the API endpoint (e.g. for a proxy or a local stub server).
    pub fn with_endpoint(api_key: String, endpoint: String) -> Self {
        Self {
            api_key,
            endpoint,
            client: Client::new(),
        }
    }

    fn api_url(&self, model: &str) -> String {
        let base = self.endpoint.trim_end_matches('/');
        format!("{}/models/{}:generateContent?key={}", base, model, self.api_key)
    }
}

// ── Gemini API request/response shapes ──

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GeminiTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_config: Option<GeminiToolConfig>,
}

#[derive(Serialize, Deserialize, Debug)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

/// A part carries exactly one of text, inlineData, or functionCall.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<GeminiInlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    function_declarations: Vec<GeminiFunctionDeclaration>,
}

#[derive(Serialize)]
struct GeminiFunctionDeclaration {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiToolConfig {
    function_calling_config: GeminiFunctionCallingConfig,
}

#[derive(Serialize)]
struct GeminiFunctionCallingConfig {
    mode: String,
}

#[derive(Serialize, Deserialize, Debug)]
struct GeminiFunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Deserialize, Debug)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    error: Option<GeminiErrorDetail>,
}

#[derive(Deserialize, Debug)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize, Debug)]
struct GeminiErrorDetail {
    message: String,
}

// ── Domain <-> wire conversion ──

fn mode_str(mode: FunctionCallingMode) -> &'static str {
    match mode {
        FunctionCallingMode::Auto => "AUTO",
        FunctionCallingMode::None => "NONE",
        FunctionCallingMode::Any => "ANY",
    }
}

fn to_wire_request(request: &ModelRequest) -> GeminiRequest {
    let parts = request
        .parts
        .iter()
        .map(|part| match part {
            RequestPart::Text(text) => GeminiPart {
                text: Some(text.clone()),
                ..Default::default()
            },
            RequestPart::InlineAudio { mime_type, data } => GeminiPart {
                inline_data: Some(GeminiInlineData {
                    mime_type: mime_type.clone(),
                    data: data.clone(),
                }),
                ..Default::default()
            },
        })
        .collect();

    let tools = if request.tools.is_empty() {
        None
    } else {
        Some(vec![GeminiTool {
            function_declarations: request
                .tools
                .iter()
                .map(|decl| GeminiFunctionDeclaration {
                    name: decl.name.clone(),
                    description: decl.description.clone(),
                    parameters: decl.parameters.clone(),
                })
                .collect(),
        }])
    };

    GeminiRequest {
        system_instruction: GeminiContent {
            role: None,
            parts: vec![GeminiPart {
                text: Some(request.system_instruction.clone()),
                ..Default::default()
            }],
        },
        contents: vec![GeminiContent {
            role: Some("user".to_string()),
            parts,
        }],
        tools,
        tool_config: Some(GeminiToolConfig {
            function_calling_config: GeminiFunctionCallingConfig {
                mode: mode_str(request.mode).to_string(),
            },
        }),
    }
}

/// Map the wire response into domain candidates, preserving part order.
fn to_model_response(response: GeminiResponse) -> Result<ModelResponse, String> {
    if let Some(error) = response.error {
        return Err(format!("Gemini API error: {}", error.message));
    }

    let candidates = response
        .candidates
        .into_iter()
        .map(|candidate| {
            let parts = candidate
                .content
                .map(|content| content.parts)
                .unwrap_or_default()
                .into_iter()
                .filter_map(|part| {
                    if let Some(call) = part.function_call {
                        Some(ResponsePart::FunctionCall {
                            name: call.name,
                            args: call.args,
                        })
                    } else {
                        part.text.map(ResponsePart::Text)
                    }
                })
                .collect();
            Candidate { parts }
        })
        .collect();

    Ok(ModelResponse { candidates })
}

#[async_trait]
impl GenerativeModel for GeminiProvider {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse, String> {
        eprintln!(
            "Intelligence/Gemini: generate model={} parts={}",
            request.model,
            request.parts.len()
        );

        let wire_request = to_wire_request(request);

        let response = self
            .client
            .post(self.api_url(&request.model))
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| format!("Gemini API request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            eprintln!("Intelligence/Gemini: API error {} — {}", status, body);
            return Err(format!("Gemini API returned {}: {}", status, body));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse Gemini response: {}", e))?;

        to_model_response(gemini_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_parsing_keeps_part_order() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "functionCall": { "name": "tellUser", "args": { "message": "A" } } },
                        { "text": "done" },
                        { "functionCall": { "name": "createFile", "args": { "path": "x/y.md", "content": "hi" } } }
                    ]
                }
            }]
        });

        let wire: GeminiResponse = serde_json::from_value(raw).unwrap();
        let response = to_model_response(wire).unwrap();

        assert_eq!(response.candidates.len(), 1);
        let parts = &response.candidates[0].parts;
        assert_eq!(parts.len(), 3);
        assert!(matches!(&parts[0], ResponsePart::FunctionCall { name, .. } if name == "tellUser"));
        assert!(matches!(&parts[1], ResponsePart::Text(t) if t == "done"));
        assert!(matches!(&parts[2], ResponsePart::FunctionCall { name, .. } if name == "createFile"));
    }

    #[test]
    fn test_response_error_field_is_surfaced() {
        let wire: GeminiResponse =
            serde_json::from_value(json!({ "error": { "message": "API key not valid" } })).unwrap();

        let err = to_model_response(wire).unwrap_err();
        assert!(err.contains("API key not valid"));
    }

    #[test]
    fn test_empty_candidates_is_an_empty_response() {
        let wire: GeminiResponse = serde_json::from_value(json!({})).unwrap();
        let response = to_model_response(wire).unwrap();
        assert!(response.candidates.is_empty());
    }

    #[test]
    fn test_request_serialization_shape() {
        use crate::intelligence::provider::FunctionDeclaration;

        let request = ModelRequest {
            model: "gemini-pro".into(),
            system_instruction: "manage the vault".into(),
            tools: vec![FunctionDeclaration {
                name: "tellUser".into(),
                description: "notify".into(),
                parameters: json!({ "type": "object" }),
            }],
            mode: FunctionCallingMode::Auto,
            parts: vec![
                RequestPart::InlineAudio {
                    mime_type: "audio/wav".into(),
                    data: "UklGRg==".into(),
                },
            ],
        };

        let wire = serde_json::to_value(to_wire_request(&request)).unwrap();

        assert_eq!(wire["systemInstruction"]["parts"][0]["text"], "manage the vault");
        assert_eq!(wire["contents"][0]["role"], "user");
        assert_eq!(wire["contents"][0]["parts"][0]["inlineData"]["mimeType"], "audio/wav");
        assert_eq!(wire["tools"][0]["functionDeclarations"][0]["name"], "tellUser");
        assert_eq!(wire["toolConfig"]["functionCallingConfig"]["mode"], "AUTO");
    }
}
