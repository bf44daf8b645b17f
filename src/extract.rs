use axum::{
    Form, Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{header::CONTENT_TYPE, request::Parts},
};
use serde::de::DeserializeOwned;
use serde::de::value::{Error as ValueError, MapDeserializer};

use crate::errors::ApiError;

/// A request body sent either as a urlencoded form or as JSON
///
/// Browsers post forms; scripts post JSON. The `Content-Type` header picks the
/// decoder. A request without one decodes as an empty form, so every field
/// reads as missing. A body that fails to decode becomes an [`ApiError`].
#[derive(Debug, Clone, Default)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        match content_type.as_deref() {
            None => {
                let empty = MapDeserializer::<_, ValueError>::new(std::iter::empty::<(&str, &str)>());
                T::deserialize(empty)
                    .map(Payload)
                    .map_err(|e| ApiError::invalid(e.to_string()))
            }
            Some(value) if value.starts_with("application/json") => {
                let Json(value) = Json::<T>::from_request(req, state)
                    .await
                    .map_err(|rejection| ApiError::invalid(rejection.body_text()))?;
                Ok(Payload(value))
            }
            Some(_) => {
                let Form(value) = Form::<T>::from_request(req, state)
                    .await
                    .map_err(|rejection| ApiError::invalid(rejection.body_text()))?;
                Ok(Payload(value))
            }
        }
    }
}

/// Query string parameters
///
/// Same as axum's `Query`, but a query string that does not decode (a
/// repeated `type`, say) is an [`ApiError`] like every other route failure.
#[derive(Debug, Clone, Default)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::invalid(rejection.body_text()))?;
        Ok(QueryParams(value))
    }
}
