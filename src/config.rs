use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Which face detection runtime backs the analyzer.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DetectorProvider {
    Seetaface,
}

impl std::str::FromStr for DetectorProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "seetaface" | "rustface" => Ok(Self::Seetaface),
            other => anyhow::bail!("unsupported face detector provider: {other}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetectorConfig {
    pub provider: DetectorProvider,
    pub model_path: String,
    /// Longest image side handed to the detector; larger inputs are downscaled.
    pub detect_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
    pub storage_dir: String,
    pub detector: DetectorConfig,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

pub(crate) fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty() && *o != "*")
        .map(String::from)
        .collect()
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "skinscore".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "skinscore-users".into()),
            ttl_minutes: env_parse("ACCESS_TOKEN_EXPIRE_MINUTES", 60),
            refresh_ttl_minutes: env_parse::<i64>("REFRESH_TOKEN_EXPIRE_DAYS", 7) * 60 * 24,
        };
        let cors_origins = parse_origins(&std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()));
        let storage_dir = std::env::var("STORAGE_DIR").unwrap_or_else(|_| "./uploads".into());
        let detector = DetectorConfig {
            provider: std::env::var("FACE_DETECTOR_PROVIDER")
                .unwrap_or_else(|_| "seetaface".into())
                .parse()?,
            model_path: std::env::var("FACE_MODEL_PATH")
                .unwrap_or_else(|_| "./model/seeta_fd_frontal_v1.0.bin".into()),
            detect_size: env_parse("DETECT_SIZE", 640),
        };
        Ok(Self {
            database_url,
            jwt,
            cors_origins,
            storage_dir,
            detector,
        })
    }
}
