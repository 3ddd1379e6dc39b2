use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// The single privileged account, pinned to deployment configuration.
/// `policy::is_admin` re-checks this email on every authorization decision.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    /// Base under which uploaded objects are publicly reachable.
    pub public_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: String,
    pub from_address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
    pub storage: StorageConfig,
    pub mail: MailConfig,
    pub ai: AiConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "inkpress".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "inkpress-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        let admin = AdminConfig {
            email: std::env::var("ADMIN_EMAIL")?.trim().to_lowercase(),
            password: std::env::var("ADMIN_PASSWORD")?,
        };
        let storage = StorageConfig {
            endpoint: std::env::var("S3_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:9000".into()),
            bucket: std::env::var("S3_BUCKET").unwrap_or_else(|_| "inkpress".into()),
            access_key: std::env::var("S3_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".into()),
            secret_key: std::env::var("S3_SECRET_KEY").unwrap_or_else(|_| "minioadmin".into()),
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
            public_base_url: std::env::var("S3_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:9000/inkpress".into()),
        };
        let mail = MailConfig {
            api_url: std::env::var("MAIL_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com/emails".into()),
            api_key: std::env::var("MAIL_API_KEY").unwrap_or_default(),
            from_address: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "no-reply@inkpress.local".into()),
        };
        let ai = AiConfig {
            api_url: std::env::var("AI_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".into()),
            api_key: std::env::var("AI_API_KEY").unwrap_or_default(),
            model: std::env::var("AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
        };
        Ok(Self {
            database_url,
            jwt,
            admin,
            storage,
            mail,
            ai,
        })
    }
}
