use actix_web::{HttpMessage, HttpRequest, HttpResponse};
use serde::de::DeserializeOwned;

use super::error::bad_request;

fn is_json(content_type: &str) -> bool {
    content_type == "application/json" || content_type.ends_with("+json")
}

/// Decode a request body that may be left out
///
/// An empty body yields `T::default()`. Anything else must be JSON of the
/// expected shape; a body that cannot be decoded is rejected with a 400,
/// never read as "no options".
pub fn optional_json_body<T>(req: &HttpRequest, body: &[u8]) -> Result<T, HttpResponse>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    let content_type = req.content_type();
    if !is_json(content_type) {
        tracing::debug!(content_type, "Rejected non-JSON request body");
        return Err(bad_request(format!(
            "Content type error: expected application/json, got '{}'",
            content_type
        )));
    }

    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Rejected malformed request body: {}", e);
        bad_request(format!("Json deserialize error: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;

    use crate::dto::SettleRequest;

    fn json_request() -> HttpRequest {
        TestRequest::default()
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .to_http_request()
    }

    #[test]
    fn test_empty_body_uses_defaults() {
        let req = TestRequest::default().to_http_request();
        let request: SettleRequest = optional_json_body(&req, b"").unwrap();
        assert!(request.finalize.is_none());

        let request: SettleRequest = optional_json_body(&req, b"  \n").unwrap();
        assert!(request.finalize.is_none());
    }

    #[test]
    fn test_json_body_is_decoded() {
        let request: SettleRequest =
            optional_json_body(&json_request(), br#"{"finalize":true}"#).unwrap();
        assert_eq!(request.finalize, Some(true));
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        let result = optional_json_body::<SettleRequest>(&json_request(), br#"{"finalize":"yes"}"#);
        assert_eq!(result.unwrap_err().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_non_json_content_type_is_rejected() {
        let req = TestRequest::default()
            .insert_header((header::CONTENT_TYPE, "text/plain"))
            .to_http_request();
        let result = optional_json_body::<SettleRequest>(&req, br#"{"finalize":true}"#);
        assert_eq!(result.unwrap_err().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_json_suffix_content_type_is_accepted() {
        assert!(is_json("application/json"));
        assert!(is_json("application/merge-patch+json"));
        assert!(!is_json("text/plain"));
        assert!(!is_json(""));
    }
}
