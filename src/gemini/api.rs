use crate::{
    config::GeminiConfig,
    error::{Result, StudioError},
    models::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse},
};
use reqwest::Client;

/// Thin wrapper over `POST /v1beta/models/{model}:generateContent`.
#[derive(Debug)]
pub struct ContentApi {
    http: Client,
    base_url: String,
    api_key: String,
}

impl ContentApi {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| StudioError::ConfigError("Gemini API key is required".into()))?;

        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| StudioError::ClientError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            api_key,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        log::debug!("Calling generateContent on {}", model);

        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            log::error!("{} returned {}: {}", model, status.as_u16(), message);
            return Err(StudioError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Part;

    fn api(server: &mockito::Server) -> ContentApi {
        ContentApi::new(
            &GeminiConfig::new()
                .with_api_key("test-key")
                .with_base_url(server.url()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_serialization_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/m:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let request = GenerateContentRequest::new(vec![Part::text("hi")]);
        let result = api(&server).generate_content("m", &request).await;
        assert!(matches!(result, Err(StudioError::SerializationError(_))));
    }

    #[tokio::test]
    async fn test_error_body_message_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/m:generateContent")
            .with_status(400)
            .with_body(
                r#"{"error":{"code":400,"message":"bad ratio","status":"INVALID_ARGUMENT"}}"#,
            )
            .create_async()
            .await;

        let request = GenerateContentRequest::new(vec![Part::text("hi")]);
        let result = api(&server).generate_content("m", &request).await;
        assert!(matches!(
            result,
            Err(StudioError::ApiError { status: 400, ref message }) if message == "bad ratio"
        ));
    }
}
