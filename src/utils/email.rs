use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, instrument};

use crate::config::email::EmailConfig;
use crate::utils::errors::AppError;

pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    #[instrument(skip(self))]
    pub async fn send_welcome_email(&self, to_email: &str, to_name: &str) -> Result<(), AppError> {
        let login_link = format!("{}/api/auth/login", self.config.base_url);

        let html_body = self.welcome_template(to_name, &login_link);
        let text_body = format!(
            "Welcome, {}!\n\n\
             Your account is ready. You can now browse movies and series,\n\
             build your watchlist, and get personal recommendations.\n\n\
             Log in here: {}\n\n\
             Need help? Email support@chillmovie.com",
            to_name, login_link
        );

        self.send_email(to_email, "Welcome to Chill Movie", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self, verification_token))]
    pub async fn send_verification_email(
        &self,
        to_email: &str,
        to_name: &str,
        verification_token: &str,
    ) -> Result<(), AppError> {
        let verification_link = format!(
            "{}/api/auth/verify-email?token={}",
            self.config.base_url, verification_token
        );

        let html_body = self.verification_template(to_name, &verification_link);
        let text_body = format!(
            "Hi {},\n\n\
             Thanks for signing up. Verify your email address by opening the\n\
             link below:\n\
             {}\n\n\
             The link is valid for 24 hours.\n\n\
             If you didn't create an account, you can ignore this email.",
            to_name, verification_link
        );

        self.send_email(
            to_email,
            "Verify your email - Chill Movie",
            &text_body,
            &html_body,
        )
        .await
    }

    #[instrument(skip(self, reset_token))]
    pub async fn send_password_reset_email(
        &self,
        to_email: &str,
        to_name: &str,
        reset_token: &str,
    ) -> Result<(), AppError> {
        let reset_link = format!(
            "{}/api/auth/reset-password?token={}",
            self.config.base_url, reset_token
        );

        let html_body = self.password_reset_template(to_name, &reset_link);
        let text_body = format!(
            "Hi {},\n\n\
             A password reset was requested for your account. Open the link\n\
             below to set a new password:\n\
             {}\n\n\
             The link is valid for 1 hour.\n\n\
             If you didn't request this, you can ignore this email.",
            to_name, reset_link
        );

        self.send_email(
            to_email,
            "Reset your password - Chill Movie",
            &text_body,
            &html_body,
        )
        .await
    }

    #[instrument(skip(self, html_body, text_body))]
    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        if !self.config.enabled {
            debug!(to = %to_email, subject = %subject, "SMTP disabled, skipping email");
            return Ok(());
        }

        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid from email: {}", e)))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid to email: {}", e)))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to build email: {}", e)))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| {
                    AppError::internal(anyhow::anyhow!("Failed to create SMTP relay: {}", e))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal(anyhow::anyhow!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to send email: {}", e)))?;

        Ok(())
    }

    fn welcome_template(&self, name: &str, login_link: &str) -> String {
        format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
    <div style="background: #2563eb; padding: 30px; text-align: center;">
        <h1 style="color: white; margin: 0;">Chill Movie</h1>
    </div>
    <div style="background: #f9f9f9; padding: 30px;">
        <h2>Welcome, {}!</h2>
        <p>Your account is ready. You can now:</p>
        <ul style="line-height: 2;">
            <li>Browse movies and series</li>
            <li>Build your watchlist</li>
            <li>Get personal recommendations</li>
        </ul>
        <div style="text-align: center; margin: 30px 0;">
            <a href="{}" style="background: #2563eb; color: white; padding: 12px 30px; text-decoration: none; border-radius: 5px; display: inline-block;">
                Start Watching
            </a>
        </div>
        <hr style="border: none; border-top: 1px solid #ddd; margin: 30px 0;">
        <p style="color: #666; font-size: 12px;">
            Need help? Email support@chillmovie.com
        </p>
    </div>
</div>"#,
            name, login_link
        )
    }

    fn verification_template(&self, name: &str, verification_link: &str) -> String {
        format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
    <div style="background: #2563eb; padding: 30px; text-align: center;">
        <h1 style="color: white; margin: 0;">Chill Movie</h1>
    </div>
    <div style="background: #f9f9f9; padding: 30px;">
        <h2>Hi {}!</h2>
        <p>Thanks for signing up. Click the button below to verify your email:</p>
        <div style="text-align: center; margin: 30px 0;">
            <a href="{}" style="background: #2563eb; color: white; padding: 12px 30px; text-decoration: none; border-radius: 5px; display: inline-block;">
                Verify Email
            </a>
        </div>
        <p>Or copy this link into your browser:</p>
        <p style="background: #f0f0f0; padding: 10px; word-break: break-all;">{}</p>
        <p>The link is valid for 24 hours.</p>
        <hr style="border: none; border-top: 1px solid #ddd; margin: 30px 0;">
        <p style="color: #666; font-size: 12px;">
            If you didn't create an account, you can ignore this email.
        </p>
    </div>
</div>"#,
            name, verification_link, verification_link
        )
    }

    fn password_reset_template(&self, name: &str, reset_link: &str) -> String {
        format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
    <div style="background: #2563eb; padding: 30px; text-align: center;">
        <h1 style="color: white; margin: 0;">Chill Movie</h1>
    </div>
    <div style="background: #f9f9f9; padding: 30px;">
        <h2>Reset Password</h2>
        <p>Hi {},</p>
        <p>A password reset was requested for your account. Click the button below if that was you:</p>
        <div style="text-align: center; margin: 30px 0;">
            <a href="{}" style="background: #2563eb; color: white; padding: 12px 30px; text-decoration: none; border-radius: 5px; display: inline-block;">
                Reset Password
            </a>
        </div>
        <p>Or copy this link:</p>
        <p style="background: #f0f0f0; padding: 10px; word-break: break-all;">{}</p>
        <p>The link is valid for 1 hour.</p>
        <hr style="border: none; border-top: 1px solid #ddd; margin: 30px 0;">
        <p style="color: #666; font-size: 12px;">
            If you didn't request this, you can ignore this email.
        </p>
    </div>
</div>"#,
            name, reset_link, reset_link
        )
    }
}
