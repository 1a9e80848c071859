use std::{path::Path, sync::Arc};

use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
    channels::{error::ChannelError, template::TemplateService, traits::NotificationChannel},
    models::{alert::AlertEvent, channel::EmailConfig},
};

/// Maps an attachment path onto a MIME type by extension.
fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// A channel that sends alert mail through an SMTP relay, with optional
/// image attachments.
pub struct EmailChannel {
    config: EmailConfig,
    from: Mailbox,
    to: Vec<Mailbox>,
    transport: AsyncSmtpTransport<Tokio1Executor>,
    template_service: Arc<TemplateService>,
}

impl EmailChannel {
    /// Creates a new `EmailChannel`, parsing addresses and building the SMTP
    /// transport up front so a bad address or relay host fails at startup
    /// rather than on the first alert.
    pub fn new(
        config: EmailConfig,
        template_service: Arc<TemplateService>,
    ) -> Result<Self, ChannelError> {
        let from: Mailbox = config.from.parse()?;
        let to = config
            .to
            .iter()
            .map(|address| address.parse())
            .collect::<Result<Vec<Mailbox>, _>>()?;

        let builder = match (&config.username, &config.password) {
            (Some(username), Some(password)) =>
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
                    .credentials(Credentials::new(username.clone(), password.clone())),
            // An unauthenticated relay is assumed to be a trusted local one.
            _ => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host),
        };
        let transport = builder.port(config.smtp_port).build();

        Ok(Self { from, to, transport, config, template_service })
    }

    /// Reads one attachment from disk. A missing or unreadable attachment is
    /// logged and skipped; the email still goes out without it.
    async fn load_attachment(&self, path: &Path) -> Option<SinglePart> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(attachment = %path.display(), error = %e, "Skipping unreadable attachment.");
                return None;
            }
        };

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());

        let content_type = match ContentType::parse(mime_for(path)) {
            Ok(content_type) => content_type,
            Err(e) => {
                tracing::warn!(attachment = %path.display(), error = %e, "Skipping attachment with unusable content type.");
                return None;
            }
        };

        Some(Attachment::new(filename).body(bytes, content_type))
    }
}

#[async_trait::async_trait]
impl NotificationChannel for EmailChannel {
    async fn notify(&self, event: &AlertEvent) -> Result<(), ChannelError> {
        let context = serde_json::to_value(event)?;
        let subject = self.template_service.render(&self.config.message.title, &context)?;
        let body = self.template_service.render(&self.config.message.body, &context)?;

        let mut builder = Message::builder().from(self.from.clone()).subject(subject);
        for mailbox in &self.to {
            builder = builder.to(mailbox.clone());
        }

        let mut multipart = MultiPart::mixed().singlepart(SinglePart::plain(body));
        for path in &self.config.attachments {
            if let Some(part) = self.load_attachment(path).await {
                multipart = multipart.singlepart(part);
            }
        }

        let email = builder.multipart(multipart)?;
        self.transport.send(email).await?;

        Ok(())
    }
}
