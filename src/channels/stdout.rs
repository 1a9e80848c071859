use std::sync::Arc;

use crate::{
    channels::{error::ChannelError, template::TemplateService, traits::NotificationChannel},
    models::{alert::AlertEvent, channel::StdoutConfig},
};

/// A channel that prints rendered alerts to standard output.
pub struct StdoutChannel {
    config: StdoutConfig,
    template_service: Arc<TemplateService>,
}

impl StdoutChannel {
    /// Creates a new `StdoutChannel` with the given configuration and
    /// template service.
    pub fn new(config: StdoutConfig, template_service: Arc<TemplateService>) -> Self {
        Self { config, template_service }
    }
}

#[async_trait::async_trait]
impl NotificationChannel for StdoutChannel {
    async fn notify(&self, event: &AlertEvent) -> Result<(), ChannelError> {
        let context = serde_json::to_value(event)?;

        if let Some(message) = &self.config.message {
            let rendered_title = self.template_service.render(&message.title, &context)?;
            let rendered_body = self.template_service.render(&message.body, &context)?;
            println!("=== {} ===\n{}\n", rendered_title, rendered_body);
        } else {
            println!("=== Occupancy alert ===\n{}\n", context);
        }
        Ok(())
    }
}
