//! Nonce injection into JSON request bodies.
//!
//! CoinSpot recomputes the signature from the literal bytes it receives, so
//! the augmented body is produced once and those same bytes are both signed
//! and sent.

use serde_json::{Map, Value};

use crate::error::CoinSpotError;

/// Return `body` with `"nonce": <nonce>` inserted as its first key.
///
/// The body must be a JSON object; an empty string is treated as `{}`.
/// Key order and number literals of the original object are preserved, and
/// the result is serialized compactly.
///
/// # Example
///
/// ```rust
/// use coinspot_updater::auth::inject_nonce;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let body = inject_nonce(r#"{"coin": "BTC"}"#, 1700000000)?;
/// assert_eq!(body, r#"{"nonce":1700000000,"coin":"BTC"}"#);
/// # Ok(())
/// # }
/// ```
pub fn inject_nonce(body: &str, nonce: u64) -> Result<String, CoinSpotError> {
    let fields = parse_body(body)?;
    with_nonce(fields, nonce)
}

/// Parse and validate a request body without adding a nonce.
///
/// Fails with [`CoinSpotError::MalformedBody`] on exactly the inputs
/// [`inject_nonce`] rejects, so a body can be checked before the nonce is
/// known.
pub fn parse_body(body: &str) -> Result<Map<String, Value>, CoinSpotError> {
    let trimmed = body.trim();
    let parsed: Value = if trimmed.is_empty() {
        Value::Object(Map::new())
    } else {
        serde_json::from_str(trimmed)
            .map_err(|e| CoinSpotError::MalformedBody(format!("not valid JSON: {e}")))?
    };

    let Value::Object(fields) = parsed else {
        return Err(CoinSpotError::MalformedBody(
            "body must be a JSON object".to_string(),
        ));
    };

    if fields.contains_key("nonce") {
        return Err(CoinSpotError::MalformedBody(
            "body already contains a nonce".to_string(),
        ));
    }

    Ok(fields)
}

/// Serialize `fields` compactly with `nonce` as the first key.
pub fn with_nonce(fields: Map<String, Value>, nonce: u64) -> Result<String, CoinSpotError> {
    let mut envelope = Map::with_capacity(fields.len() + 1);
    envelope.insert("nonce".to_string(), Value::from(nonce));
    envelope.extend(fields);

    Ok(serde_json::to_string(&Value::Object(envelope))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_into_single_key_body() {
        let body = inject_nonce(r#"{"coin":"BTC"}"#, 1700000000).unwrap();
        assert_eq!(body, r#"{"nonce":1700000000,"coin":"BTC"}"#);
    }

    #[test]
    fn test_inject_into_empty_object() {
        assert_eq!(inject_nonce("{}", 42).unwrap(), r#"{"nonce":42}"#);
        assert_eq!(inject_nonce(" { } ", 42).unwrap(), r#"{"nonce":42}"#);
        assert_eq!(inject_nonce("", 42).unwrap(), r#"{"nonce":42}"#);
    }

    #[test]
    fn test_inject_preserves_key_order_and_values() {
        let body = inject_nonce(
            r#"{"cointype": "ETH", "amount": 0.10, "rate": 1e3, "flag": true}"#,
            7,
        )
        .unwrap();
        assert_eq!(
            body,
            r#"{"nonce":7,"cointype":"ETH","amount":0.10,"rate":1e3,"flag":true}"#
        );
    }

    #[test]
    fn test_inject_handles_nested_values() {
        let body = inject_nonce(r#"{"filter":{"coins":["BTC","ETH"],"limit":5}}"#, 9).unwrap();
        let value: Value = serde_json::from_str(&body).unwrap();

        assert_eq!(value["nonce"], Value::from(9u64));
        assert_eq!(value["filter"]["coins"][1], "ETH");
        assert_eq!(value.as_object().unwrap().len(), 2);
        assert!(body.starts_with(r#"{"nonce":9,"#));
    }

    #[test]
    fn test_inject_rejects_malformed_json() {
        let err = inject_nonce(r#"{"coin":"BTC""#, 1).unwrap_err();
        assert!(matches!(err, CoinSpotError::MalformedBody(_)));
    }

    #[test]
    fn test_inject_rejects_non_object() {
        for body in [r#"["BTC"]"#, r#""BTC""#, "12"] {
            let err = inject_nonce(body, 1).unwrap_err();
            assert!(matches!(err, CoinSpotError::MalformedBody(_)), "{body}");
        }
    }

    #[test]
    fn test_parse_then_add_nonce_matches_inject() {
        let body = r#"{"coin":"BTC","amount":1.50}"#;
        let fields = parse_body(body).unwrap();

        assert_eq!(
            with_nonce(fields, 11).unwrap(),
            inject_nonce(body, 11).unwrap()
        );
        assert!(matches!(parse_body("[]"), Err(CoinSpotError::MalformedBody(_))));
    }

    #[test]
    fn test_inject_rejects_existing_nonce() {
        let err = inject_nonce(r#"{"nonce":5,"coin":"BTC"}"#, 1).unwrap_err();
        assert!(matches!(err, CoinSpotError::MalformedBody(_)));
    }
}
