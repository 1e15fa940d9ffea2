use crate::ApiError;
use reqwest::{header::HeaderMap, multipart::Form, Client};
use serde::{de::DeserializeOwned, Serialize};

/// Create a GET request, parse the JSON response.
/// Throws error on non OK status code.
pub async fn get_json<R: DeserializeOwned>(
    client: &Client,
    url: &str,
    headers: HeaderMap,
) -> Result<R, ApiError> {
    let response = client.get(url).headers(headers).send().await?;
    if !response.status().is_success() {
        Err(ApiError::StatusCode(
            response.status(),
            response.text().await.unwrap_or_default(),
        ))
    } else {
        Ok(response.json::<R>().await?)
    }
}

/// Create a JSON request, parse the response.
/// Throws error on non OK status code.
pub async fn send_json<T: Serialize, R: DeserializeOwned>(
    client: &Client,
    url: &str,
    data: &T,
    headers: HeaderMap,
) -> Result<R, ApiError> {
    let response = client.post(url).headers(headers).json(data).send().await?;
    if !response.status().is_success() {
        Err(ApiError::StatusCode(
            response.status(),
            response.text().await.unwrap_or_default(),
        ))
    } else {
        Ok(response.json::<R>().await?)
    }
}

/// Create a POST request with no body, parse the JSON response.
/// Throws error on non OK status code.
pub async fn post_empty<R: DeserializeOwned>(
    client: &Client,
    url: &str,
    headers: HeaderMap,
) -> Result<R, ApiError> {
    let response = client.post(url).headers(headers).send().await?;
    if !response.status().is_success() {
        Err(ApiError::StatusCode(
            response.status(),
            response.text().await.unwrap_or_default(),
        ))
    } else {
        Ok(response.json::<R>().await?)
    }
}

/// Create a multipart form request, parse the JSON response.
/// Throws error on non OK status code.
pub async fn send_multipart<R: DeserializeOwned>(
    client: &Client,
    url: &str,
    form: Form,
    headers: HeaderMap,
) -> Result<R, ApiError> {
    let response = client
        .post(url)
        .headers(headers)
        .multipart(form)
        .send()
        .await?;
    if !response.status().is_success() {
        Err(ApiError::StatusCode(
            response.status(),
            response.text().await.unwrap_or_default(),
        ))
    } else {
        Ok(response.json::<R>().await?)
    }
}
