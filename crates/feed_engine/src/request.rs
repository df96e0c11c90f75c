use feed_core::{Page, Query};
use reqwest::header::HeaderValue;
use thiserror::Error;
use url::Url;

/// Header carrying the API key. The key never appears in the URL.
pub const API_KEY_HEADER: &str = "X-Api-Key";
/// Fixed result language.
pub const LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// How the transport should treat cached responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Serve cached data when it is still valid.
    #[default]
    PreferCached,
    /// Always revalidate with the origin.
    Revalidate,
}

/// A fully composed, authenticated GET request.
#[derive(Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub url: Url,
    pub api_key: HeaderValue,
    pub cache_policy: CachePolicy,
}

impl std::fmt::Debug for FeedRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedRequest")
            .field("url", &self.url.as_str())
            .field("api_key", &"<redacted>")
            .field("cache_policy", &self.cache_policy)
            .finish()
    }
}

/// Parses and checks a base endpoint: absolute http(s) URL.
pub fn parse_endpoint(raw: &str) -> Result<Url, RequestError> {
    let url = Url::parse(raw.trim()).map_err(|err| RequestError::InvalidUrl(err.to_string()))?;
    check_endpoint(&url)?;
    Ok(url)
}

fn check_endpoint(url: &Url) -> Result<(), RequestError> {
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(RequestError::InvalidUrl(format!(
            "'{url}' is not an http(s) endpoint"
        )));
    }
    Ok(())
}

/// Builds the URL for `page` of `query`: `language=en`, then `q`, then
/// exactly one `page` parameter. Existing parameters on the endpoint are
/// replaced.
pub fn page_url(endpoint: &Url, query: &str, page: Page) -> Result<Url, RequestError> {
    check_endpoint(endpoint)?;
    let mut url = query_url(endpoint, query);
    set_page(&mut url, page);
    Ok(url)
}

fn query_url(endpoint: &Url, query: &str) -> Url {
    let mut url = endpoint.clone();
    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("language", LANGUAGE);
        if !query.is_empty() {
            pairs.append_pair("q", query);
        }
    }
    url
}

fn set_page(url: &mut Url, page: Page) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| name != "page")
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("page", &page.to_string());
}

/// Composes authenticated requests for one API key.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestBuilder {
    api_key: HeaderValue,
    cache_policy: CachePolicy,
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("cache_policy", &self.cache_policy)
            .finish_non_exhaustive()
    }
}

impl RequestBuilder {
    pub fn new(api_key: HeaderValue, cache_policy: CachePolicy) -> Self {
        let mut api_key = api_key;
        api_key.set_sensitive(true);
        Self {
            api_key,
            cache_policy,
        }
    }

    pub fn build(&self, query: &Query, page: Page) -> Result<FeedRequest, RequestError> {
        Ok(FeedRequest {
            url: page_url(query.endpoint(), query.text(), page)?,
            api_key: self.api_key.clone(),
            cache_policy: self.cache_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> Url {
        parse_endpoint("https://newsapi.org/v2/everything").unwrap()
    }

    fn page(n: u32) -> Page {
        Page::new(n).unwrap()
    }

    #[test]
    fn url_carries_language_query_and_page() {
        let url = page_url(&endpoint(), "apple pie", page(3)).unwrap();
        assert_eq!(
            url.as_str(),
            "https://newsapi.org/v2/everything?language=en&q=apple+pie&page=3"
        );
    }

    #[test]
    fn empty_query_omits_q() {
        let url = page_url(&endpoint(), "", page(1)).unwrap();
        assert_eq!(url.query(), Some("language=en&page=1"));
    }

    #[test]
    fn existing_page_parameters_are_replaced() {
        let mut url = page_url(&endpoint(), "apple", page(1)).unwrap();
        url.query_pairs_mut().append_pair("page", "9");
        set_page(&mut url, page(2));
        let pages: Vec<_> = url.query_pairs().filter(|(k, _)| k == "page").collect();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].1, "2");
    }

    #[test]
    fn endpoint_parameters_are_dropped() {
        let base = parse_endpoint("https://newsapi.org/v2/everything?page=7&apiKey=x").unwrap();
        let url = page_url(&base, "apple", page(2)).unwrap();
        assert_eq!(url.query(), Some("language=en&q=apple&page=2"));
    }

    #[test]
    fn non_http_endpoints_are_rejected() {
        assert!(matches!(
            parse_endpoint("mailto:someone@example.com"),
            Err(RequestError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_endpoint("not a url"),
            Err(RequestError::InvalidUrl(_))
        ));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let builder =
            RequestBuilder::new(HeaderValue::from_static("secret"), CachePolicy::default());
        let query = Query::new("apple", endpoint()).unwrap();
        let request = builder.build(&query, page(1)).unwrap();
        assert!(!format!("{request:?}").contains("secret"));
        assert!(!format!("{builder:?}").contains("secret"));
    }

    #[test]
    fn query_and_page_decode_back_from_built_url() {
        let base = parse_endpoint("https://newsapi.org/v2/everything?page=3").unwrap();
        for (text, n) in [("c++ & rust=#1 ü", 7), ("page=9&q=x", 2), ("apple", 1)] {
            let url = page_url(&base, text, page(n)).unwrap();
            let values = |name: &str| -> Vec<String> {
                url.query_pairs()
                    .filter(|(key, _)| key == name)
                    .map(|(_, value)| value.into_owned())
                    .collect()
            };
            assert_eq!(values("q"), vec![text.to_string()]);
            assert_eq!(values("page"), vec![n.to_string()]);
            assert_eq!(values("language"), vec![LANGUAGE.to_string()]);
        }
    }
}
