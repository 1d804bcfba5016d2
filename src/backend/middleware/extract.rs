/**
 * Request Extractors
 *
 * Thin wrappers over axum's `Json`, `Path` and `Query` whose rejections
 * are `BackendError`s, so a body or parameter that fails to parse gets the
 * same `{error, status}` response as every other failure.
 *
 * - syntax errors, wrong content type, unparsable path -> `MalformedInput`
 * - well-formed JSON or query string of the wrong shape -> `Validation`
 */

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::backend::error::BackendError;

/// JSON body
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

/// Path parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(ApiPath(value))
    }
}

/// Query string
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(ApiQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::error::ErrorKind;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Ids {
        message_ids: Vec<i64>,
    }

    fn json_request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_json_rejections_become_backend_errors() {
        let err = ApiJson::<Ids>::from_request(json_request("{oops"), &())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);

        let err = ApiJson::<Ids>::from_request(json_request(r#"{"message_ids":"all"}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let ApiJson(ids) = ApiJson::<Ids>::from_request(json_request(r#"{"message_ids":[1]}"#), &())
            .await
            .unwrap();
        assert_eq!(ids.message_ids, vec![1]);
    }

    #[tokio::test]
    async fn test_query_rejection_is_validation() {
        #[derive(Debug, Deserialize)]
        struct Page {
            #[allow(dead_code)]
            page: Option<i64>,
        }

        let request = axum::http::Request::builder()
            .uri("/?page=first")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let err = ApiQuery::<Page>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
