//! Article page extraction.
//!
//! Each field is looked up independently, so a page missing its lead
//! paragraph still yields a title and body. Only a failed fetch turns the
//! whole article into an error.

use super::SiteProfile;
use crate::error::ScrapeError;
use crate::fetcher::FetchPage;
use crate::models::ArticleRecord;
use crate::utils::truncate_for_log;
use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

/// Pull title, subtitle and body out of an already loaded article page.
///
/// Missing elements become empty strings; this never fails.
pub fn parse_article(profile: &SiteProfile, document: &Html) -> ArticleRecord {
    let title = first_text(document, &profile.title);
    let subtitle = first_text(document, &profile.subtitle);
    let content = document
        .select(&profile.content)
        .map(element_text)
        .join("\n");

    ArticleRecord {
        title,
        subtitle,
        content,
    }
}

/// Fetch `url` and extract its [`ArticleRecord`].
///
/// # Errors
///
/// Only fetch failures are reported; a page that loads always produces a
/// record, possibly with empty fields.
#[instrument(level = "debug", skip(fetcher, profile))]
pub async fn extract_article<F: FetchPage>(
    fetcher: &F,
    profile: &SiteProfile,
    url: &str,
) -> Result<ArticleRecord, ScrapeError> {
    let document = fetcher.fetch(url).await?;
    let record = parse_article(profile, &document);
    debug!(
        title = %truncate_for_log(&record.title, 80),
        bytes = record.content.len(),
        "Parsed article"
    );
    Ok(record)
}

fn first_text(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteSelectors;
    use crate::fetcher::{DEFAULT_USER_AGENT, HttpFetcher};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FULL_ARTICLE: &str = r#"
        <html><body>
          <header><h1>Desmatamento na Amazônia cai 30%</h1></header>
          <p class="lead font-italic mb-5">Dados do <b>Deter</b> mostram queda</p>
          <div class="article">
            <p>Primeiro parágrafo.</p>
            <p>Segundo, com <a href="/x">link</a>.</p>
            <div class="box"><p>Legenda fora do corpo</p></div>
          </div>
          <h1>Outro título</h1>
        </body></html>
    "#;

    fn profile() -> SiteProfile {
        SiteProfile::compile(&SiteSelectors::default()).unwrap()
    }

    #[test]
    fn test_parse_full_article() {
        let record = parse_article(&profile(), &Html::parse_document(FULL_ARTICLE));
        assert_eq!(record.title, "Desmatamento na Amazônia cai 30%");
        assert_eq!(record.subtitle, "Dados do Deter mostram queda");
        assert_eq!(record.content, "Primeiro parágrafo.\nSegundo, com link.");
    }

    #[test]
    fn test_parse_without_h1_gives_empty_title() {
        let html = r#"
            <p class="lead font-italic mb-5">Só o subtítulo</p>
            <div class="article"><p>Corpo.</p></div>
        "#;
        let record = parse_article(&profile(), &Html::parse_document(html));
        assert_eq!(record.title, "");
        assert_eq!(record.subtitle, "Só o subtítulo");
        assert_eq!(record.content, "Corpo.");
    }

    #[test]
    fn test_parse_empty_page_gives_empty_record() {
        let record = parse_article(&profile(), &Html::parse_document("<html></html>"));
        assert_eq!(record, ArticleRecord::default());
    }

    #[test]
    fn test_subtitle_requires_exact_class() {
        let html = r#"<h1>T</h1><p class="lead font-italic">Parecido</p>"#;
        let record = parse_article(&profile(), &Html::parse_document(html));
        assert_eq!(record.title, "T");
        assert_eq!(record.subtitle, "");
    }

    #[tokio::test]
    async fn test_extract_article_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/noticias/desmatamento"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FULL_ARTICLE))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(DEFAULT_USER_AGENT).unwrap();
        let url = format!("{}/noticias/desmatamento", server.uri());
        let record = extract_article(&fetcher, &profile(), &url).await.unwrap();
        assert_eq!(record.title, "Desmatamento na Amazônia cai 30%");
    }

    #[tokio::test]
    async fn test_extract_article_fetch_failure_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/noticias/quebrada"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(DEFAULT_USER_AGENT).unwrap();
        let url = format!("{}/noticias/quebrada", server.uri());
        let err = extract_article(&fetcher, &profile(), &url).await.unwrap_err();
        assert!(err.is_http());
    }
}
