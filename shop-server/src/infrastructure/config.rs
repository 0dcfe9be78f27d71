use std::path::PathBuf;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_UPLOAD_MAX_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
    pub upload_dir: PathBuf,
    pub upload_max_bytes: usize,
    pub public_base_url: String,
    pub mail: Option<MailConfig>,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?,
            None => DEFAULT_PORT,
        };
        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let jwt_secret =
            lookup("JWT_SECRET").ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let upload_dir = lookup("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("upload/images"));
        let upload_max_bytes = match lookup("UPLOAD_MAX_BYTES") {
            Some(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid UPLOAD_MAX_BYTES: {}", e))?,
            None => DEFAULT_UPLOAD_MAX_BYTES,
        };
        let public_base_url = lookup("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        let mail = match lookup("MAIL_HOST").filter(|h| !h.is_empty()) {
            Some(host) => Some(MailConfig {
                host,
                port: match lookup("MAIL_PORT") {
                    Some(raw) => raw
                        .parse()
                        .map_err(|e| anyhow::anyhow!("invalid MAIL_PORT: {}", e))?,
                    None => DEFAULT_SMTP_PORT,
                },
                username: lookup("MAIL_USERNAME").unwrap_or_default(),
                password: lookup("MAIL_PASSWORD").unwrap_or_default(),
                from: lookup("MAIL_FROM").unwrap_or_else(|| "no-reply@localhost".into()),
            }),
            None => None,
        };

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            cors_origins,
            upload_dir,
            upload_max_bytes,
            public_base_url,
            mail,
        })
    }
}
