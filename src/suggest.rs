use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error(
        "no suggestion endpoint configured. Run: farmbook login <email> --suggest-url <url> (or set FARMBOOK_SUGGEST_URL)"
    )]
    NotConfigured,

    #[error("suggestion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("suggestion service returned an empty reply")]
    EmptyReply,
}

#[derive(Debug, Serialize)]
struct SuggestRequest<'a> {
    description: &'a str,
    options: &'a [String],
}

#[derive(Debug, Deserialize)]
struct SuggestReply {
    suggestion: Option<String>,
}

/// Asks the external classifier which known category best fits
/// `description`. Best-effort: the reply may name an unknown category, so
/// callers validate it before applying.
pub fn suggest_category(
    configured_url: Option<&str>,
    description: &str,
    options: &[String],
) -> Result<String, SuggestError> {
    let url = match std::env::var("FARMBOOK_SUGGEST_URL") {
        Ok(v) if !v.trim().is_empty() => v,
        _ => configured_url
            .map(str::to_string)
            .ok_or(SuggestError::NotConfigured)?,
    };

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message("Asking the category suggestion service...");

    let result = request_suggestion(&url, description, options);
    pb.finish_and_clear();
    result
}

fn request_suggestion(
    url: &str,
    description: &str,
    options: &[String],
) -> Result<String, SuggestError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let mut req = client
        .post(url)
        .header("User-Agent", "farmbook-suggest")
        .json(&SuggestRequest {
            description,
            options,
        });
    if let Ok(key) = std::env::var("FARMBOOK_API_KEY") {
        if !key.trim().is_empty() {
            req = req.bearer_auth(key.trim());
        }
    }

    let resp = req.send()?.error_for_status()?;
    let parsed: SuggestReply = resp.json()?;

    parsed
        .suggestion
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(SuggestError::EmptyReply)
}
