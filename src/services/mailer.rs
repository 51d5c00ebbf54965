use serde_json::json;

use crate::config::Config;
use crate::domain::KanbanError;

/// Transactional email through a Resend-compatible HTTP API. Email is
/// best-effort: a missing API key or a failed send is logged and never
/// fails the request that triggered it.
#[derive(Clone)]
pub struct Mailer {
    http_client: reqwest::Client,
    api_url: String,
    api_key: String,
    sender: String,
    app_url: String,
}

impl Mailer {
    pub fn new(http_client: reqwest::Client, config: &Config) -> Self {
        Self {
            http_client,
            api_url: config.resend_api_url.clone(),
            api_key: config.resend_api_key.clone(),
            sender: config.resend_sender_email.clone(),
            app_url: config.app_url.clone(),
        }
    }

    pub async fn send_invite(
        &self,
        email: &str,
        board_title: &str,
        owner_name: &str,
    ) -> Result<(), KanbanError> {
        let register_url = format!("{}/register", self.app_url);
        let html = format!(
            "<p>{owner} invited you to collaborate on the board <strong>{board}</strong>.</p>\
             <p><a href=\"{url}\">Create a free account</a> with this email ({email}) to access it. \
             Already registered? The board will show up under \"Shared with me\" after login.</p>",
            owner = owner_name,
            board = board_title,
            url = register_url,
            email = email,
        );

        self.send(
            email,
            &format!("{} invited you to collaborate on Kanban", owner_name),
            &html,
        )
        .await
    }

    pub async fn send_verification(&self, email: &str, token: &str) -> Result<(), KanbanError> {
        let verify_url = format!(
            "{}/verify-email?token={}&email={}",
            self.app_url, token, email
        );
        let html = format!(
            "<p>Confirm your email address to finish setting up your Kanban account.</p>\
             <p><a href=\"{url}\">Verify email</a> (link expires in 24 hours)</p>",
            url = verify_url,
        );

        self.send(email, "Verify your Kanban email address", &html)
            .await
    }

    pub async fn send_welcome(&self, email: &str) -> Result<(), KanbanError> {
        let html = format!(
            "<p>Your account is verified. Welcome to Kanban!</p>\
             <p><a href=\"{url}/dashboard\">Open your dashboard</a></p>",
            url = self.app_url,
        );

        self.send(email, "Welcome to Kanban!", &html).await
    }

    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), KanbanError> {
        if self.api_key.is_empty() {
            tracing::warn!(to, subject, "Email service not configured, skipping send");
            return Ok(());
        }

        let body = json!({
            "from": format!("Kanban <{}>", self.sender),
            "to": to,
            "subject": subject,
            "html": html,
        });

        let response = self
            .http_client
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| KanbanError::Internal(format!("Email send failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(KanbanError::Internal(format!(
                "Email provider returned {}",
                response.status()
            )));
        }

        tracing::info!(to, subject, "Email sent");
        Ok(())
    }
}
