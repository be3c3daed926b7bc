use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key, sent as the `api_key` query parameter
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Image CDN base URL; size token and image path are appended to it
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Comma-separated hosts remote images may be loaded from
    #[serde(default = "default_image_hosts")]
    pub image_hosts: String,

    /// Redis connection URL. The banner index is kept in memory when unset.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Seconds between automatic banner rotations
    #[serde(default = "default_banner_rotate_secs")]
    pub banner_rotate_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_image_hosts() -> String {
    "image.tmdb.org".to_string()
}

fn default_banner_rotate_secs() -> u64 {
    8
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the image CDN is on the image host allow-list
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.banner_rotate_secs == 0 {
            anyhow::bail!("BANNER_ROTATE_SECS must be greater than zero");
        }

        let image_url = reqwest::Url::parse(&self.tmdb_image_url)
            .map_err(|e| anyhow::anyhow!("Invalid TMDB_IMAGE_URL: {}", e))?;
        let host = image_url
            .host_str()
            .ok_or_else(|| anyhow::anyhow!("TMDB_IMAGE_URL has no host"))?;

        if !self.allowed_image_hosts().any(|allowed| allowed == host) {
            anyhow::bail!("Image host {} is not listed in IMAGE_HOSTS", host);
        }

        Ok(())
    }

    pub fn allowed_image_hosts(&self) -> impl Iterator<Item = &str> {
        self.image_hosts
            .split(',')
            .map(str::trim)
            .filter(|h| !h.is_empty())
    }

    pub fn banner_period(&self) -> Duration {
        Duration::from_secs(self.banner_rotate_secs)
    }
}
