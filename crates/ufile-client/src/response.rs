//! Normalization of UFile responses.
//!
//! UFile answers in three shapes: a raw body on a successful `GET`, headers
//! only on `HEAD`/`PUT`, and a JSON envelope (`{"RetCode": .., "ErrMsg": ..}`)
//! on failures. [`normalize`] folds all of them into a [`NormalizedResponse`]
//! whose payload is chosen from the status code, the verb, and the content
//! type:
//!
//! 1. `200`: `GET` keeps the body, `HEAD` and `PUT` keep nothing.
//! 2. `404` on `HEAD`: a "not found" answer, the body is ignored.
//! 3. Anything else: a JSON content type with a positive content length is
//!    decoded as an [`ErrorEnvelope`]; otherwise the raw body is kept. `HEAD`
//!    failures always keep the (empty) raw body, since no envelope can arrive.

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, ETAG};
use http::{HeaderMap, Response, StatusCode};
use serde::Deserialize;
use ufile_auth::HttpVerb;

use crate::error::{UfileError, UfileResult};

/// Response header carrying the server-side request identifier.
pub const SESSION_ID_HEADER: &str = "x-sessionid";

/// JSON error body returned on failures.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorEnvelope {
    /// Remote return code.
    #[serde(rename = "RetCode", default)]
    pub ret_code: i64,
    /// Remote error message.
    #[serde(rename = "ErrMsg", default)]
    pub err_msg: String,
}

/// What a normalized response carries besides its headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePayload {
    /// No body kept (`HEAD`, `PUT`, `404` on `HEAD`).
    Empty,
    /// Raw body bytes: object content on success, opaque error body otherwise.
    Content(Bytes),
    /// Decoded JSON error envelope.
    Envelope(ErrorEnvelope),
}

/// Uniform view over every UFile response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// `Content-Length` header, when present and numeric.
    pub content_length: Option<u64>,
    /// `Content-Type` header.
    pub content_type: Option<String>,
    /// `ETag` header.
    pub etag: Option<String>,
    /// `X-SessionId` header.
    pub session_id: Option<String>,
    /// Body, selected by status and content type.
    pub payload: ResponsePayload,
}

impl NormalizedResponse {
    /// Whether the remote answered `200 OK`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Take the body bytes; empty unless the payload is [`ResponsePayload::Content`].
    #[must_use]
    pub fn into_content(self) -> Bytes {
        match self.payload {
            ResponsePayload::Content(bytes) => bytes,
            ResponsePayload::Empty | ResponsePayload::Envelope(_) => Bytes::new(),
        }
    }

    /// Convert an unsuccessful response into the matching remote error.
    #[must_use]
    pub fn into_remote_error(self) -> UfileError {
        match self.payload {
            ResponsePayload::Envelope(envelope) => UfileError::Remote {
                status: self.status,
                code: envelope.ret_code,
                message: envelope.err_msg,
                session_id: self.session_id,
            },
            ResponsePayload::Content(body) => UfileError::RemoteRaw {
                status: self.status,
                body,
                session_id: self.session_id,
            },
            ResponsePayload::Empty => UfileError::RemoteRaw {
                status: self.status,
                body: Bytes::new(),
                session_id: self.session_id,
            },
        }
    }
}

/// Normalize the response to a `verb` request.
///
/// # Errors
///
/// Returns [`UfileError::Parse`] when the body claims to be JSON but is not a
/// valid envelope.
pub fn normalize(verb: HttpVerb, response: Response<Bytes>) -> UfileResult<NormalizedResponse> {
    let (parts, body) = response.into_parts();
    let headers = &parts.headers;

    let mut normalized = NormalizedResponse {
        status: parts.status,
        content_length: header_str(headers, CONTENT_LENGTH.as_str())
            .and_then(|v| v.trim().parse().ok()),
        content_type: header_str(headers, CONTENT_TYPE.as_str()).map(ToOwned::to_owned),
        etag: header_str(headers, ETAG.as_str()).map(ToOwned::to_owned),
        session_id: header_str(headers, SESSION_ID_HEADER).map(ToOwned::to_owned),
        payload: ResponsePayload::Empty,
    };

    if normalized.status == StatusCode::OK {
        if verb == HttpVerb::Get {
            normalized.payload = ResponsePayload::Content(body);
        }
        return Ok(normalized);
    }

    if normalized.status == StatusCode::NOT_FOUND && verb == HttpVerb::Head {
        return Ok(normalized);
    }

    // HEAD answers never carry a body; their Content-Length describes the object.
    let has_json_body = verb != HttpVerb::Head
        && normalized.content_type.as_deref().is_some_and(is_json)
        && normalized.content_length.is_some_and(|len| len > 0);

    normalized.payload = if has_json_body {
        ResponsePayload::Envelope(serde_json::from_slice(&body)?)
    } else {
        ResponsePayload::Content(body)
    };

    Ok(normalized)
}

/// Whether a content type names JSON, ignoring parameters such as `charset`.
fn is_json(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .is_ok_and(|m| m.essence_str() == mime::APPLICATION_JSON.essence_str())
}

/// Extract a header value as a string, `None` if missing or not visible ASCII.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
