//! Article text extraction from web pages.
//!
//! Fetches a page and keeps the text of its paragraphs, preferring those
//! inside an `<article>` or `<main>` element when the page has one.

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;

/// URL to plain article text.
#[async_trait]
pub trait ArticleExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<String>;
}

/// Extractor that downloads the page with reqwest and parses it with scraper.
pub struct HttpArticleExtractor {
    http_client: reqwest::Client,
}

impl HttpArticleExtractor {
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(concat!("reviewlens/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl ArticleExtractor for HttpArticleExtractor {
    async fn extract(&self, url: &str) -> Result<String> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(anyhow::anyhow!("URL must start with 'http://' or 'https://'"));
        }

        debug!("Downloading article from {}", url);
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to download {}", url))?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("{} returned {}", url, response.status()));
        }

        let html = response
            .text()
            .await
            .context("Failed to read response body")?;

        Ok(extract_article_text(&html))
    }
}

/// Pull readable paragraph text out of an HTML document.
///
/// Paragraphs are joined with blank lines. Returns an empty string when the
/// page has no paragraph text.
pub fn extract_article_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let scoped = ["article p", "main p", "p"];
    for selector in scoped {
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };
        let paragraphs: Vec<String> = document
            .select(&selector)
            .map(|p| normalize_whitespace(&p.text().collect::<String>()))
            .filter(|p| !p.is_empty())
            .collect();
        if !paragraphs.is_empty() {
            return paragraphs.join("\n\n");
        }
    }

    String::new()
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_prefers_article_paragraphs() {
        let html = r#"
            <html><body>
              <nav><p>Home | About</p></nav>
              <article>
                <h1>Title</h1>
                <p>First   paragraph
                   of the story.</p>
                <p>Second <b>bold</b> paragraph.</p>
              </article>
              <footer><p>Copyright</p></footer>
            </body></html>
        "#;

        assert_eq!(
            extract_article_text(html),
            "First paragraph of the story.\n\nSecond bold paragraph."
        );
    }

    #[test]
    fn test_extract_falls_back_to_all_paragraphs() {
        let html = "<html><body><p>One</p><div><p>Two</p></div></body></html>";
        assert_eq!(extract_article_text(html), "One\n\nTwo");
    }

    #[test]
    fn test_extract_without_paragraphs_is_empty() {
        let html = "<html><body><div>   </div><p>  </p></body></html>";
        assert_eq!(extract_article_text(html), "");
    }

    #[tokio::test]
    async fn test_extract_rejects_non_http_url() {
        let extractor = HttpArticleExtractor::new(5).unwrap();
        assert!(extractor.extract("ftp://example.com/story").await.is_err());
    }
}
