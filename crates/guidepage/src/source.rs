//! Where guide markdown comes from.
//!
//! A [`ContentSource`] is one candidate location. The loader tries its sources in order with
//! [`fetch_first`]; the first one that delivers wins and the rest are never touched.
use crate::error::FetchError;
use crate::error::LoadError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Human-readable location, for logs.
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<String, FetchError>;
}

#[derive(Clone, Debug)]
pub struct LocalFileSource {
    path: PathBuf,
}

impl LocalFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ContentSource for LocalFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String, FetchError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.describe(),
                source,
            })
    }
}

#[derive(Clone, Debug)]
pub struct HttpSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpSource {
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<String, FetchError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: self.describe(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.describe(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Http {
            url: self.describe(),
            source,
        })
    }
}

/// A configured source string, resolved against the page location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentLocation {
    File(PathBuf),
    Http(Url),
}

impl ContentLocation {
    /// Absolute URLs are used as is; anything else is relative to `base` when there is one, and a
    /// filesystem path otherwise.
    pub fn resolve(location: &str, base: Option<&Url>) -> Result<Self, FetchError> {
        let invalid = |reason: String| FetchError::InvalidLocation {
            location: location.to_string(),
            reason,
        };

        let url = match Url::parse(location) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => match base {
                Some(base) => base.join(location).map_err(|e| invalid(e.to_string()))?,
                None => return Ok(ContentLocation::File(PathBuf::from(location))),
            },
            Err(e) => return Err(invalid(e.to_string())),
        };

        match url.scheme() {
            "http" | "https" => Ok(ContentLocation::Http(url)),
            "file" => url
                .to_file_path()
                .map(ContentLocation::File)
                .map_err(|()| invalid("not a local file path".to_string())),
            other => Err(invalid(format!("unsupported scheme `{other}`"))),
        }
    }

    pub fn into_source(self, client: &reqwest::Client) -> Box<dyn ContentSource> {
        match self {
            ContentLocation::File(path) => Box::new(LocalFileSource::new(path)),
            ContentLocation::Http(url) => Box::new(HttpSource::new(client.clone(), url)),
        }
    }
}

/// Resolves every configured location; unusable ones are logged and left out.
pub fn sources_from_locations(
    locations: &[String],
    base: Option<&Url>,
    client: &reqwest::Client,
) -> Vec<Box<dyn ContentSource>> {
    locations
        .iter()
        .filter_map(|loc| match ContentLocation::resolve(loc, base) {
            Ok(location) => Some(location.into_source(client)),
            Err(err) => {
                tracing::warn!(error = %err, "skipping content source");
                None
            }
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fetched {
    pub index: usize,
    pub source: String,
    pub body: String,
}

/// Tries `sources` in order and returns the first body delivered.
pub async fn fetch_first(
    sources: &[Box<dyn ContentSource>],
    timeout: Option<Duration>,
) -> Result<Fetched, LoadError> {
    for (index, source) in sources.iter().enumerate() {
        let described = source.describe();
        let result = match timeout {
            Some(limit) => tokio::time::timeout(limit, source.fetch())
                .await
                .unwrap_or_else(|_| {
                    Err(FetchError::Timeout {
                        location: described.clone(),
                        seconds: limit.as_secs(),
                    })
                }),
            None => source.fetch().await,
        };
        match result {
            Ok(body) => {
                tracing::info!(source = %described, bytes = body.len(), "loaded guide content");
                return Ok(Fetched {
                    index,
                    source: described,
                    body,
                });
            }
            Err(err) => tracing::warn!(source = %described, error = %err, "failed to fetch guide"),
        }
    }
    Err(LoadError::NoSourceAvailable {
        attempted: sources.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_against_page() {
        let base = Url::parse("https://example.com/docs/index.html").unwrap();
        assert_eq!(
            ContentLocation::resolve("../GUIDE.md", Some(&base)).unwrap(),
            ContentLocation::Http(Url::parse("https://example.com/GUIDE.md").unwrap())
        );
    }

    #[test]
    fn resolves_relative_file_page() {
        let base = Url::parse("file:///srv/site/docs/index.html").unwrap();
        assert_eq!(
            ContentLocation::resolve("../GUIDE.md", Some(&base)).unwrap(),
            ContentLocation::File(PathBuf::from("/srv/site/GUIDE.md"))
        );
    }

    #[test]
    fn relative_without_page_is_a_path() {
        assert_eq!(
            ContentLocation::resolve("../GUIDE.md", None).unwrap(),
            ContentLocation::File(PathBuf::from("../GUIDE.md"))
        );
    }

    #[test]
    fn absolute_url_ignores_base() {
        let base = Url::parse("file:///srv/index.html").unwrap();
        let loc = ContentLocation::resolve("https://raw.example.com/GUIDE.md", Some(&base));
        assert!(matches!(loc, Ok(ContentLocation::Http(_))));
    }

    #[test]
    fn unsupported_scheme_is_invalid() {
        let err = ContentLocation::resolve("ftp://example.com/GUIDE.md", None).unwrap_err();
        assert!(matches!(err, FetchError::InvalidLocation { .. }));
    }

    #[tokio::test]
    async fn local_file_source_reads_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("GUIDE.md");
        std::fs::write(&path, "# Guide").unwrap();

        let ok = LocalFileSource::new(&path).fetch().await.unwrap();
        assert_eq!(ok, "# Guide");

        let missing = LocalFileSource::new(dir.path().join("nope.md")).fetch().await;
        assert!(matches!(missing, Err(FetchError::Io { .. })));
    }

    #[tokio::test]
    async fn first_readable_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("GUIDE.md");
        std::fs::write(&path, "found").unwrap();

        let sources: Vec<Box<dyn ContentSource>> = vec![
            Box::new(LocalFileSource::new(dir.path().join("missing.md"))),
            Box::new(LocalFileSource::new(&path)),
        ];
        let fetched = fetch_first(&sources, None).await.unwrap();
        assert_eq!(fetched.index, 1);
        assert_eq!(fetched.body, "found");
    }

    #[tokio::test]
    async fn nothing_available() {
        let err = fetch_first(&[], None).await.unwrap_err();
        assert!(matches!(err, LoadError::NoSourceAvailable { attempted: 0 }));
    }
}
