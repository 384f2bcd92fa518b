//! Outbound contact email relay.
//!
//! Posts a templated message to an EmailJS-style HTTP endpoint. When the
//! relay is disabled in config the message is logged and reported as sent,
//! which keeps dev environments working without credentials.

use serde::Serialize;
use tracing::{info, warn};

use crate::CoreError;

#[derive(Debug, Clone, Serialize)]
pub struct ContactMessage {
    pub from_name: String,
    pub reply_to: String,
    pub message: String,
    pub to_email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationMessage {
    pub to_email: String,
    pub confirm_url: String,
}

#[derive(Serialize)]
struct RelayPayload<'a, P: Serialize> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a P,
}

#[derive(Clone)]
pub struct Mailer {
    cfg: configs::EmailConfig,
    client: reqwest::Client,
}

impl Mailer {
    pub fn new(cfg: configs::EmailConfig) -> Self {
        Self { cfg, client: reqwest::Client::new() }
    }

    /// Relay a contact message to the provider's business email.
    pub async fn send_contact(&self, msg: &ContactMessage) -> Result<(), CoreError> {
        if !self.cfg.enabled {
            warn!(to = %msg.to_email, "email relay disabled; dropping contact message");
            return Ok(());
        }
        self.relay(msg).await?;
        info!(to = %msg.to_email, "contact email relayed");
        Ok(())
    }

    /// Send the account-confirmation link after signup. With the relay
    /// disabled the link is logged so local signups stay confirmable.
    pub async fn send_confirmation(&self, msg: &ConfirmationMessage) -> Result<(), CoreError> {
        if !self.cfg.enabled {
            warn!(to = %msg.to_email, url = %msg.confirm_url, "email relay disabled; confirmation link logged only");
            return Ok(());
        }
        self.relay(msg).await?;
        info!(to = %msg.to_email, "confirmation email relayed");
        Ok(())
    }

    async fn relay<P: Serialize>(&self, params: &P) -> Result<(), CoreError> {
        let payload = RelayPayload {
            service_id: &self.cfg.service_id,
            template_id: &self.cfg.template_id,
            user_id: &self.cfg.public_key,
            template_params: params,
        };
        let resp = self
            .client
            .post(&self.cfg.api_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CoreError::Network(e.to_string()))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.map_err(|e| CoreError::Parse(e.to_string()))?;
            return Err(CoreError::Network(format!("relay returned {status}: {body}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_relay_is_a_no_op() {
        let mailer = Mailer::new(configs::EmailConfig::default());
        let msg = ContactMessage {
            from_name: "Alice".into(),
            reply_to: "alice@example.com".into(),
            message: "Need a plumber".into(),
            to_email: "biz@example.com".into(),
        };
        assert!(mailer.send_contact(&msg).await.is_ok());
    }

    #[tokio::test]
    async fn failing_relay_surfaces_status_and_body() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = sock.read(&mut buf).await;
            let _ = sock
                .write_all(
                    b"HTTP/1.1 502 Bad Gateway\r\ncontent-length: 8\r\nconnection: close\r\n\r\nupstream",
                )
                .await;
        });

        let cfg = configs::EmailConfig {
            enabled: true,
            api_url: format!("http://{addr}/api/v1.0/email/send"),
            ..configs::EmailConfig::default()
        };
        let msg = ContactMessage {
            from_name: "Alice".into(),
            reply_to: "alice@example.com".into(),
            message: "Need a plumber".into(),
            to_email: "biz@example.com".into(),
        };
        let err = Mailer::new(cfg).send_contact(&msg).await.unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("502"), "got: {rendered}");
        assert!(rendered.contains("upstream"), "got: {rendered}");
    }
}
