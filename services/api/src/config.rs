use adoptly_core::config::{ConfigError, optional, required};

/// SMTP relay settings. Port 465 uses implicit TLS; any other port upgrades with STARTTLS.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    /// Bare address used in the `From` header (display name is added per template).
    pub from: String,
}

/// Cloudinary account used for signed direct uploads.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for session JWTs.
    pub jwt_secret: String,
    /// Browser origin allowed by CORS; also the base of password-reset links.
    pub frontend_url: String,
    /// TCP port to listen on. Env var: `PORT` (default 3000).
    pub port: u16,
    /// Root directory for uploaded files and static serving.
    /// Env var: `UPLOAD_DIR` (default `public`).
    pub upload_dir: String,
    /// Mark the session cookie `Secure`. Env var: `COOKIE_SECURE` (default false).
    pub cookie_secure: bool,
    /// Apply pending migrations at startup. Env var: `RUN_MIGRATIONS` (default true).
    pub run_migrations: bool,
    pub smtp: SmtpConfig,
    pub cloudinary: CloudinaryConfig,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let email_port = required("EMAIL_PORT")?;
        let smtp_port = email_port
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid {
                key: "EMAIL_PORT".into(),
                value: email_port.clone(),
            })?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            frontend_url: required("FRONTEND_URL")?,
            port: optional("PORT", 3000)?,
            upload_dir: optional("UPLOAD_DIR", "public".to_string())?,
            cookie_secure: optional("COOKIE_SECURE", false)?,
            run_migrations: optional("RUN_MIGRATIONS", true)?,
            smtp: SmtpConfig {
                host: required("EMAIL_HOST")?,
                port: smtp_port,
                user: required("EMAIL_USER")?,
                pass: required("EMAIL_PASS")?,
                from: required("EMAIL_FROM")?,
            },
            cloudinary: CloudinaryConfig {
                cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
                api_key: required("CLOUDINARY_API_KEY")?,
                api_secret: required("CLOUDINARY_API_SECRET")?,
            },
        })
    }
}
