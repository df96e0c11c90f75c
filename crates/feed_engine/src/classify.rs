use feed_core::{FeedItem, Outcome};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const STATUS_OK: &str = "ok";
const STATUS_ERROR: &str = "error";

/// Response envelope. `status` is the only mandatory field.
#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default, deserialize_with = "lenient_string")]
    message: Option<String>,
    #[serde(default)]
    articles: Option<Vec<RawArticle>>,
}

/// One article record; every field falls back to `None` when absent or of
/// the wrong type.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawArticle {
    #[serde(deserialize_with = "lenient_string")]
    title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    author: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    url: Option<String>,
    #[serde(rename = "urlToImage", deserialize_with = "lenient_string")]
    url_to_image: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

impl From<RawArticle> for FeedItem {
    fn from(raw: RawArticle) -> Self {
        FeedItem::new(raw.title, raw.author)
            .with_detail_url(raw.url)
            .with_thumbnail_url(raw.url_to_image)
    }
}

/// Decodes a response body and classifies it.
///
/// The body's `status` field, not the HTTP status, decides the outcome:
/// `"ok"` yields the (possibly empty) item list, anything else is an orderly
/// end of feed, and an undecodable body is malformed.
pub fn classify(body: &[u8]) -> Outcome {
    let envelope: Envelope = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(err) => return Outcome::Malformed(err.to_string()),
    };

    match envelope.status.as_str() {
        STATUS_OK => Outcome::Items(
            envelope
                .articles
                .unwrap_or_default()
                .into_iter()
                .map(FeedItem::from)
                .collect(),
        ),
        STATUS_ERROR => Outcome::Exhausted(
            envelope
                .message
                .unwrap_or_else(|| finished_with(&envelope.status)),
        ),
        other => Outcome::Exhausted(finished_with(other)),
    }
}

fn finished_with(status: &str) -> String {
    format!("response finished with status '{status}'")
}
