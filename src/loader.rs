//! API description loading from various sources.
//!
//! Handles loading documents from files, strings, and HTTP URLs.

use std::path::Path;

use serde_json::Value;

use crate::error::DocumentError;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Load a document from a file path.
///
/// # Errors
///
/// Returns `DocumentError::FileNotFound` if the file doesn't exist,
/// or `DocumentError::InvalidJson` if the file isn't valid JSON.
pub fn load_document(path: &Path) -> Result<Value, DocumentError> {
    if !path.exists() {
        return Err(DocumentError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| DocumentError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| DocumentError::InvalidJson { source })
}

/// Load a document from a JSON string.
///
/// # Errors
///
/// Returns `DocumentError::InvalidJson` if the string isn't valid JSON.
pub fn load_document_str(content: &str) -> Result<Value, DocumentError> {
    serde_json::from_str(content).map_err(|source| DocumentError::InvalidJson { source })
}

/// Load a document from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `DocumentError::NetworkError` if the request fails,
/// or `DocumentError::InvalidJson` if the response isn't valid JSON.
#[cfg(feature = "remote")]
pub fn load_document_url(url: &str) -> Result<Value, DocumentError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|source| DocumentError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    let response = client
        .get(url)
        .send()
        .map_err(|source| DocumentError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    // Check for HTTP errors before parsing
    let response = response
        .error_for_status()
        .map_err(|source| DocumentError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    response
        .json()
        .map_err(|source| DocumentError::NetworkError {
            url: url.to_string(),
            source,
        })
}

/// Load a document from a file path or URL, dispatching on the source string.
pub fn load_document_auto(source: &str) -> Result<Value, DocumentError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_document_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(DocumentError::RemoteDisabled {
                url: source.to_string(),
            })
        }
    } else {
        load_document(Path::new(source))
    }
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Navigate a JSON Pointer fragment (e.g., "#/components/schemas/pet").
///
/// Returns a reference to the value at the given pointer within the document.
/// The fragment should start with '#'.
pub fn navigate_pointer<'a>(document: &'a Value, pointer: &str) -> Result<&'a Value, DocumentError> {
    // Remove leading # and split by /
    let path = pointer.trim_start_matches('#').trim_start_matches('/');
    if path.is_empty() {
        return Ok(document);
    }

    let mut current = document;
    for part in path.split('/') {
        // Unescape JSON Pointer encoding (~1 = /, ~0 = ~)
        let key = part.replace("~1", "/").replace("~0", "~");
        current = current
            .get(&key)
            .ok_or_else(|| DocumentError::PointerNotFound {
                pointer: pointer.to_string(),
            })?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_document_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"openapi": "3.0.3", "paths": {{}}}}"#).unwrap();

        let doc = load_document(file.path()).unwrap();
        assert_eq!(doc["openapi"], "3.0.3");
    }

    #[test]
    fn load_document_missing_file() {
        let result = load_document(Path::new("/nonexistent/openapi.json"));
        assert!(matches!(result, Err(DocumentError::FileNotFound { .. })));
    }

    #[test]
    fn load_document_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{ not json }}").unwrap();

        let result = load_document(file.path());
        assert!(matches!(result, Err(DocumentError::InvalidJson { .. })));
    }

    #[test]
    fn load_document_str_valid() {
        let doc = load_document_str(r#"{"paths": {}}"#).unwrap();
        assert!(doc["paths"].is_object());
    }

    #[test]
    fn is_url_detection() {
        assert!(is_url("https://example.com/openapi.json"));
        assert!(is_url("http://localhost:8080/spec"));
        assert!(!is_url("./openapi.json"));
        assert!(!is_url("openapi.json"));
    }

    #[test]
    fn navigate_pointer_resolves() {
        let doc = json!({
            "components": {
                "schemas": {
                    "pet": { "type": "object" }
                }
            }
        });

        let value = navigate_pointer(&doc, "#/components/schemas/pet").unwrap();
        assert_eq!(value["type"], "object");
    }

    #[test]
    fn navigate_pointer_root() {
        let doc = json!({"a": 1});
        assert_eq!(navigate_pointer(&doc, "#").unwrap(), &doc);
    }

    #[test]
    fn navigate_pointer_missing() {
        let doc = json!({"components": {}});
        let result = navigate_pointer(&doc, "#/components/schemas/pet");
        assert!(matches!(result, Err(DocumentError::PointerNotFound { .. })));
    }

    #[test]
    fn navigate_pointer_unescapes() {
        let doc = json!({"paths": {"/pets": {"get": {}}}});
        let value = navigate_pointer(&doc, "#/paths/~1pets/get").unwrap();
        assert!(value.is_object());
    }

    #[test]
    fn json_type_names() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!(true)), "boolean");
        assert_eq!(json_type_name(&json!([])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
    }

    #[cfg(feature = "remote")]
    #[test]
    fn load_document_url_fetches() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/openapi.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"openapi": "3.0.3"}"#)
            .create();

        let url = format!("{}/openapi.json", server.url());
        let doc = load_document_url(&url).unwrap();
        assert_eq!(doc["openapi"], "3.0.3");
        mock.assert();
    }

    #[cfg(feature = "remote")]
    #[test]
    fn load_document_url_http_error() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/missing.json")
            .with_status(404)
            .create();

        let url = format!("{}/missing.json", server.url());
        let result = load_document_url(&url);
        assert!(matches!(result, Err(DocumentError::NetworkError { .. })));
    }
}
