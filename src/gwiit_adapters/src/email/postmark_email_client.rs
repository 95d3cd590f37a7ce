use gwiit_core::{Email, EmailClient};
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

const MESSAGE_STREAM: &str = "outbound";
const POSTMARK_AUTH_HEADER: &str = "X-Postmark-Server-Token";

#[derive(Debug, thiserror::Error)]
#[error("Invalid Postmark base URL {url}: {reason}")]
pub struct InvalidBaseUrl {
    url: String,
    reason: String,
}

/// Delivers plain-text mail through the Postmark HTTP API.
pub struct PostmarkEmailClient {
    http_client: Client,
    endpoint: Url,
    sender: Email,
    authorization_token: Secret<String>,
}

impl PostmarkEmailClient {
    pub fn new(
        base_url: &str,
        sender: Email,
        authorization_token: Secret<String>,
        http_client: Client,
    ) -> Result<Self, InvalidBaseUrl> {
        let endpoint = Url::parse(base_url)
            .and_then(|base| base.join("/email"))
            .map_err(|e| InvalidBaseUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            http_client,
            endpoint,
            sender,
            authorization_token,
        })
    }
}

#[async_trait::async_trait]
impl EmailClient for PostmarkEmailClient {
    #[tracing::instrument(name = "Sending email through Postmark", skip_all)]
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), String> {
        let message = OutboundMessage {
            from: self.sender.as_str(),
            to: recipient.as_str(),
            subject,
            text_body: content,
            message_stream: MESSAGE_STREAM,
        };

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .header(
                POSTMARK_AUTH_HEADER,
                self.authorization_token.expose_secret(),
            )
            .json(&message)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        // Postmark explains rejections in the body; fall back to the status alone.
        match response.json::<PostmarkRejection>().await {
            Ok(rejection) => Err(format!(
                "Postmark rejected the message ({status}, code {}): {}",
                rejection.error_code, rejection.message
            )),
            Err(_) => Err(format!("Postmark rejected the message ({status})")),
        }
    }
}

/// Credentials mail is line-oriented text, so only `TextBody` is sent.
#[derive(Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct OutboundMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
    message_stream: &'a str,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct PostmarkRejection {
    error_code: i64,
    message: String,
}
