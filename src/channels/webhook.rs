use std::sync::Arc;

use crate::{
    channels::{error::ChannelError, template::TemplateService, traits::NotificationChannel},
    models::{alert::AlertEvent, channel::WebhookConfig},
};

/// A channel that posts a rendered JSON payload to a configured endpoint.
pub struct WebhookChannel {
    config: WebhookConfig,
    method: reqwest::Method,
    http_client: reqwest::Client,
    template_service: Arc<TemplateService>,
}

impl WebhookChannel {
    /// Creates a new `WebhookChannel`, resolving the HTTP method up front so
    /// a bad method string fails at startup.
    pub fn new(
        config: WebhookConfig,
        http_client: reqwest::Client,
        template_service: Arc<TemplateService>,
    ) -> Result<Self, ChannelError> {
        let method = match &config.method {
            Some(method) => reqwest::Method::from_bytes(method.as_bytes()).map_err(|_| {
                ChannelError::ConfigError(format!("Invalid HTTP method '{}'", method))
            })?,
            None => reqwest::Method::POST,
        };

        Ok(Self { config, method, http_client, template_service })
    }
}

#[async_trait::async_trait]
impl NotificationChannel for WebhookChannel {
    async fn notify(&self, event: &AlertEvent) -> Result<(), ChannelError> {
        let context = serde_json::to_value(event)?;
        let title = self.template_service.render(&self.config.message.title, &context)?;
        let body = self.template_service.render(&self.config.message.body, &context)?;

        let payload = serde_json::json!({
            "title": title,
            "body": body,
        });

        let mut request = self
            .http_client
            .request(self.method.clone(), self.config.url.clone())
            .json(&payload);

        if let Some(headers) = &self.config.headers {
            for (name, value) in headers {
                request = request.header(name.as_str(), value.as_str());
            }
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ChannelError::ResponseStatus(response.status()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::models::notification::NotificationMessage;

    fn webhook_config(method: Option<&str>) -> WebhookConfig {
        WebhookConfig {
            url: Url::parse("http://localhost/hook").unwrap(),
            method: method.map(str::to_string),
            headers: None,
            message: NotificationMessage {
                title: "Occupancy alert".to_string(),
                body: "Peak {{ aggregate }}".to_string(),
            },
        }
    }

    #[test]
    fn new_defaults_to_post() {
        let channel = WebhookChannel::new(
            webhook_config(None),
            reqwest::Client::new(),
            Arc::new(TemplateService::new()),
        )
        .unwrap();
        assert_eq!(channel.method, reqwest::Method::POST);
    }

    #[test]
    fn new_accepts_a_custom_method() {
        let channel = WebhookChannel::new(
            webhook_config(Some("PUT")),
            reqwest::Client::new(),
            Arc::new(TemplateService::new()),
        )
        .unwrap();
        assert_eq!(channel.method, reqwest::Method::PUT);
    }

    #[test]
    fn new_rejects_a_malformed_method() {
        let result = WebhookChannel::new(
            webhook_config(Some("SEND IT")),
            reqwest::Client::new(),
            Arc::new(TemplateService::new()),
        );
        assert!(matches!(result, Err(ChannelError::ConfigError(_))));
    }
}
