use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::capabilities::{HttpError, HttpRequest, HttpResponse};
use crate::session::{Secret, TokenGrant};
use crate::{AppError, API_BASE_URL, API_KEY, API_KEY_HEADER, TOKEN_REFRESH_URL};

pub const PAYMENTS_PATH: &str = "/v1/Payments";

/// Absolute URL for a documented API path.
#[must_use]
pub fn endpoint(path: &str) -> String {
    format!("{API_BASE_URL}{path}")
}

fn with_standard_headers(
    request: HttpRequest,
    token: Option<&Secret>,
) -> Result<HttpRequest, HttpError> {
    let request = request
        .with_header("accept", "*/*")?
        .with_header(API_KEY_HEADER, API_KEY)?;
    match token {
        Some(token) => {
            request.with_header("Authorization", &format!("Bearer {}", token.expose()))
        }
        None => Ok(request),
    }
}

pub fn get(path: &str, token: &Secret) -> Result<HttpRequest, AppError> {
    let request = HttpRequest::get(endpoint(path))?;
    Ok(with_standard_headers(request, Some(token))?)
}

pub fn post_json<T: Serialize>(
    path: &str,
    body: &T,
    token: &Secret,
) -> Result<HttpRequest, AppError> {
    let request = HttpRequest::post(endpoint(path))?.with_json(body)?;
    Ok(with_standard_headers(request, Some(token))?)
}

pub fn put_json<T: Serialize>(
    path: &str,
    body: &T,
    token: &Secret,
) -> Result<HttpRequest, AppError> {
    let request = HttpRequest::put(endpoint(path))?.with_json(body)?;
    Ok(with_standard_headers(request, Some(token))?)
}

pub fn delete(path: &str, token: &Secret) -> Result<HttpRequest, AppError> {
    let request = HttpRequest::delete(endpoint(path))?;
    Ok(with_standard_headers(request, Some(token))?)
}

#[derive(Serialize)]
struct RefreshBody<'a> {
    #[serde(rename = "refreshToken")]
    refresh_token: &'a str,
}

/// The token refresh call. Goes to a fixed absolute URL rather than a path
/// under [`API_BASE_URL`], and carries no `Authorization` header: the access
/// token being dead is the whole reason this request exists.
pub fn refresh_request(refresh_token: &Secret) -> Result<HttpRequest, AppError> {
    let body = RefreshBody {
        refresh_token: refresh_token.expose(),
    };
    let request = HttpRequest::post(TOKEN_REFRESH_URL)?.with_json(&body)?;
    Ok(with_standard_headers(request, None)?)
}

/// Strict decoder for read endpoints: any 2xx body must parse as JSON.
pub fn decode_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, AppError> {
    if !response.is_success() {
        return Err(AppError::Http {
            status: response.status,
        });
    }
    Ok(response.json()?)
}

/// Decoder for write endpoints. A 2xx that declares JSON parses strictly;
/// 204s, empty bodies and non-JSON payloads collapse to an empty object so
/// callers get a uniform value.
pub fn decode_write(response: &HttpResponse) -> Result<serde_json::Value, AppError> {
    if !response.is_success() {
        return Err(AppError::Http {
            status: response.status,
        });
    }
    if response.declares_json() {
        Ok(response.json()?)
    } else {
        Ok(serde_json::Value::Object(serde_json::Map::new()))
    }
}

/// Decoder for the refresh endpoint. Any non-2xx is a refresh failure, in
/// the exact wording sessions have always surfaced for it.
pub fn decode_refresh(response: &HttpResponse) -> Result<TokenGrant, AppError> {
    if !response.is_success() {
        return Err(AppError::RefreshFailed);
    }
    Ok(response.json()?)
}
