// Checksum helpers
// djb2 over the compact JSON of a stored document

use serde_json::Value;

/// 32-bit djb2 over UTF-16 code units, as lowercase hex without padding.
pub fn djb2(input: &str) -> String {
    let hash = input
        .encode_utf16()
        .fold(5381u32, |hash, unit| {
            (hash << 5).wrapping_add(hash).wrapping_add(unit as u32)
        });
    format!("{:x}", hash)
}

/// Checksum of a JSON document. Object keys serialize in sorted order, so
/// the result does not depend on how the document was produced.
pub fn checksum_of(data: &Value) -> Result<String, serde_json::Error> {
    Ok(djb2(&serde_json::to_string(data)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("", "1505" ; "empty")]
    #[test_case("a", "2b606" ; "single char")]
    #[test_case("hello", "f923099" ; "word")]
    fn test_djb2(input: &str, expected: &str) {
        assert_eq!(djb2(input), expected);
    }

    #[test]
    fn test_wraps_at_32_bits() {
        let long = "x".repeat(1000);
        let hash = djb2(&long);
        assert!(hash.len() <= 8);
        assert_eq!(hash, djb2(&long));
    }

    #[test]
    fn test_checksum_ignores_key_order() {
        let a: Value = serde_json::from_str(r#"{"b":1,"a":2}"#).unwrap();
        let b = json!({"a": 2, "b": 1});
        assert_eq!(checksum_of(&a).unwrap(), checksum_of(&b).unwrap());
    }
}
