use std::fmt::Display;

/// Image size tokens understood by the catalog image CDN
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSize {
    /// Full resolution, used for the hero banner
    Original,
    /// 500px wide, used for row thumbnails
    W500,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Original => "original",
            ImageSize::W500 => "w500",
        }
    }
}

impl Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Builds image URLs from catalog image paths
#[derive(Debug, Clone)]
pub struct ImageCdn {
    base_url: String,
}

impl ImageCdn {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `{base}/{size}{path}`; catalog paths already start with `/`
    pub fn url(&self, size: ImageSize, path: &str) -> String {
        format!("{}/{}{}", self.base_url, size, path)
    }
}

impl Default for ImageCdn {
    fn default() -> Self {
        Self::new("https://image.tmdb.org/t/p")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_url() {
        let cdn = ImageCdn::default();
        assert_eq!(
            cdn.url(ImageSize::Original, "/abc.jpg"),
            "https://image.tmdb.org/t/p/original/abc.jpg"
        );
    }

    #[test]
    fn test_thumbnail_url_trims_trailing_slash() {
        let cdn = ImageCdn::new("http://cdn.local/t/p/");
        assert_eq!(cdn.url(ImageSize::W500, "/p.jpg"), "http://cdn.local/t/p/w500/p.jpg");
    }
}
