use crate::error::{AppError, Result};
use crate::model::{CreatePermalinkRequest, PermalinkResponse, ResolvedPermalinkResponse};
use crate::state::AppState;
use axum::extract::{Path, RawQuery, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use permalink_core::{PermalinkError, PermalinkId, StorageError};
use tracing::debug;
use url::form_urlencoded;

const MAKE_REDIR: &str = "make_redir";
const DO_REDIR: &str = "do_redir";

/// A `key=value` pair of a raw query string, with the key decoded and the
/// original bytes kept.
struct QueryPair<'a> {
    key: String,
    value: String,
    raw: &'a str,
}

fn split_query(query: &str) -> Vec<QueryPair<'_>> {
    query
        .split('&')
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            let (key, value) = form_urlencoded::parse(raw.as_bytes())
                .next()
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .unwrap_or_default();
            QueryPair { key, value, raw }
        })
        .collect()
}

/// Builds the query string a `make_redir` request links to.
///
/// Every pair other than `make_redir` is kept verbatim and in order. When
/// there are none, the decoded `make_redir` value is the query itself, so
/// both `?make_redir=1&a=1&b=2` and `?make_redir=a%3D1%26b%3D2` link to
/// `a=1&b=2`.
fn link_query(pairs: &[QueryPair<'_>], make_redir: &str) -> Option<String> {
    let kept: Vec<&str> = pairs
        .iter()
        .filter(|pair| pair.key != MAKE_REDIR)
        .map(|pair| pair.raw)
        .collect();

    if !kept.is_empty() {
        return Some(kept.join("&"));
    }

    let value = make_redir.trim_start_matches(['?', '&']);
    (!value.is_empty()).then(|| value.to_string())
}

fn found(url: String) -> Result<Response> {
    let location = HeaderValue::try_from(url).map_err(|e| {
        AppError::Permalink(PermalinkError::Storage(StorageError::InvalidData(format!(
            "stored url is not a valid Location header: {e}"
        ))))
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

async fn make_permalink(state: &AppState, url: String) -> Result<PermalinkResponse> {
    let id = state.store().get_or_create(&url).await?;

    Ok(PermalinkResponse {
        id,
        permalink: state.permalink_url(id),
        url,
    })
}

/// The reporter's query interface: `?do_redir=<id>` redirects through a
/// permalink, `?make_redir=...` creates one.
pub async fn reporter_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response> {
    let query = query.unwrap_or_default();
    let pairs = split_query(&query);

    if let Some(pair) = pairs.iter().find(|pair| pair.key == DO_REDIR) {
        let id: PermalinkId = pair.value.parse()?;
        let url = state.store().resolve(id).await?;
        debug!(%id, url, "redirecting through permalink");
        return found(url);
    }

    if let Some(pair) = pairs.iter().find(|pair| pair.key == MAKE_REDIR) {
        let query = link_query(&pairs, &pair.value).ok_or_else(|| {
            AppError::BadRequest(format!("{MAKE_REDIR} needs query parameters to link to"))
        })?;
        let response = make_permalink(&state, state.target_url(&query)).await?;
        return Ok(Json(response).into_response());
    }

    Err(AppError::BadRequest(format!(
        "expected a {MAKE_REDIR} or {DO_REDIR} parameter"
    )))
}

pub async fn create_permalink_handler(
    State(state): State<AppState>,
    Json(request): Json<CreatePermalinkRequest>,
) -> Result<(StatusCode, Json<PermalinkResponse>)> {
    let response = make_permalink(&state, request.url).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_permalink_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ResolvedPermalinkResponse>> {
    let id: PermalinkId = id.parse()?;
    let url = state.store().resolve(id).await?;
    Ok(Json(ResolvedPermalinkResponse { id, url }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_pairs_are_kept_verbatim() {
        let query = "make_redir=1&go=Table&maf_phase=Past+24+Hours&x=%2F";
        let pairs = split_query(query);

        assert_eq!(
            link_query(&pairs, "1").as_deref(),
            Some("go=Table&maf_phase=Past+24+Hours&x=%2F")
        );
    }

    #[test]
    fn make_redir_value_is_the_query_when_alone() {
        let pairs = split_query("make_redir=a%3D1%26b%3D2");

        assert_eq!(link_query(&pairs, &pairs[0].value).as_deref(), Some("a=1&b=2"));
    }

    #[test]
    fn empty_segments_are_dropped() {
        let pairs = split_query("&&make_redir=1&&a=1&");

        assert_eq!(pairs.len(), 2);
        assert_eq!(link_query(&pairs, "1").as_deref(), Some("a=1"));
    }

    #[test]
    fn nothing_to_link() {
        let pairs = split_query("make_redir=");

        assert!(link_query(&pairs, "").is_none());
    }

    #[test]
    fn keys_are_decoded_for_matching() {
        let pairs = split_query("do%5Fredir=7");

        assert_eq!(pairs[0].key, DO_REDIR);
        assert_eq!(pairs[0].value, "7");
    }
}
