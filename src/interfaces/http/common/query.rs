//! Query-string extractor that rejects with the API's `{"message"}` body.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::ApiError;

/// Like `axum::extract::Query<T>`, but a malformed query string is a 400
/// `ApiError` instead of a plain-text rejection.
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::bad_request(format!("Invalid query: {}", rejection.body_text()))
            })?;
        Ok(QueryParams(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use serde::Deserialize;
    use serde_json::Value;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize)]
    struct Filter {
        sort: Option<String>,
        limit: Option<u32>,
    }

    async fn handler(QueryParams(filter): QueryParams<Filter>) -> String {
        format!("{:?}/{:?}", filter.sort, filter.limit)
    }

    async fn get_uri(uri: &str) -> (StatusCode, Vec<u8>) {
        let app = Router::new().route("/items", get(handler));
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn well_formed_query_is_extracted() {
        let (status, body) = get_uri("/items?sort=title&limit=5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"Some(\"title\")/Some(5)");
    }

    #[tokio::test]
    async fn malformed_query_is_a_json_400() {
        for uri in ["/items?limit=many", "/items?sort=a&sort=b"] {
            let (status, body) = get_uri(uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            let body: Value = serde_json::from_slice(&body).unwrap();
            assert!(body["message"]
                .as_str()
                .unwrap()
                .starts_with("Invalid query"));
        }
    }
}
