//! Canonical encoding of parameter sets.
//!
//! A signature is only as good as the byte string it covers. Each processor
//! defines its own rule for building that string:
//!
//! - [`EncodingPolicy::FixedOrderRaw`]: `key=value` pairs for a hard-coded
//!   field list, in that order, `&`-joined, values verbatim
//! - [`EncodingPolicy::LexicographicUrlEncoded`]: every supplied key, sorted
//!   byte-wise, key and value percent-encoded (RFC 3986), `&`-joined
//!
//! The two rules must never be mixed. The same parameter set and policy
//! always produce byte-identical output.

use std::fmt;

use crate::error::{CoreError, Result};
use crate::params::ParameterSet;

/// How a processor turns a [`ParameterSet`] into signed bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingPolicy {
    /// Walk a fixed field list; every listed field is required, others ignored.
    FixedOrderRaw(&'static [&'static str]),
    /// Sort all supplied keys and percent-encode keys and values.
    ///
    /// The caller strips signature fields before encoding.
    LexicographicUrlEncoded,
}

/// The exact byte sequence a signature is computed over.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CanonicalString(String);

impl CanonicalString {
    #[cfg(test)]
    pub(crate) fn from_raw(s: &str) -> Self {
        Self(s.to_string())
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Borrow as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Byte length.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the canonical string is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for CanonicalString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CanonicalString({:?})", self.0)
    }
}

impl fmt::Display for CanonicalString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<[u8]> for CanonicalString {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Encode a parameter set under the given policy.
///
/// Fails with [`CoreError::MissingField`] when a fixed-order field is absent.
pub fn encode(params: &ParameterSet, policy: EncodingPolicy) -> Result<CanonicalString> {
    match policy {
        EncodingPolicy::FixedOrderRaw(fields) => encode_fixed_order(params, fields),
        EncodingPolicy::LexicographicUrlEncoded => Ok(encode_lexicographic(params)),
    }
}

fn encode_fixed_order(params: &ParameterSet, fields: &[&str]) -> Result<CanonicalString> {
    let mut buf = String::new();
    for (i, field) in fields.iter().enumerate() {
        let value = params
            .get(field)
            .ok_or_else(|| CoreError::MissingField((*field).to_string()))?;
        if i > 0 {
            buf.push('&');
        }
        buf.push_str(field);
        buf.push('=');
        buf.push_str(value);
    }
    Ok(CanonicalString(buf))
}

fn encode_lexicographic(params: &ParameterSet) -> CanonicalString {
    let mut pairs: Vec<(&str, &str)> = params.iter().collect();
    // str ordering is byte-wise on UTF-8
    pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let encoded: Vec<String> = pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect();
    CanonicalString(encoded.join("&"))
}

/// RFC 3986 percent-encoding: unreserved characters kept, space becomes `%20`,
/// multi-byte characters are escaped byte by byte.
pub fn percent_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Render a parameter set as a sorted, percent-encoded query string.
///
/// Identical to the lexicographic canonical string; exposed for URL assembly.
pub fn query_string(params: &ParameterSet) -> String {
    encode_lexicographic(params).into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MOMO_FIELDS: &[&str] = &["accessKey", "amount", "extraData", "orderId"];

    #[test]
    fn test_fixed_order_ignores_insertion_order() {
        let params = ParameterSet::from_pairs([
            ("orderId", "O1"),
            ("extraData", ""),
            ("amount", "1000"),
            ("accessKey", "AK"),
            ("lang", "vi"),
        ]);
        let canonical = encode(&params, EncodingPolicy::FixedOrderRaw(MOMO_FIELDS)).unwrap();
        assert_eq!(
            canonical.as_str(),
            "accessKey=AK&amount=1000&extraData=&orderId=O1"
        );
    }

    #[test]
    fn test_fixed_order_values_are_raw() {
        let params = ParameterSet::from_pairs([
            ("accessKey", "a b"),
            ("amount", "1"),
            ("extraData", "x=y&z"),
            ("orderId", "https://x/r"),
        ]);
        let canonical = encode(&params, EncodingPolicy::FixedOrderRaw(MOMO_FIELDS)).unwrap();
        assert_eq!(
            canonical.as_str(),
            "accessKey=a b&amount=1&extraData=x=y&z&orderId=https://x/r"
        );
    }

    #[test]
    fn test_fixed_order_missing_field() {
        let params = ParameterSet::from_pairs([("accessKey", "AK"), ("amount", "1")]);
        let err = encode(&params, EncodingPolicy::FixedOrderRaw(MOMO_FIELDS)).unwrap_err();
        assert_eq!(err, CoreError::MissingField("extraData".into()));
    }

    #[test]
    fn test_lexicographic_sorts_bytewise() {
        let params = ParameterSet::from_pairs([("b", "2"), ("B", "1"), ("a", "3")]);
        let canonical = encode(&params, EncodingPolicy::LexicographicUrlEncoded).unwrap();
        // Uppercase sorts before lowercase
        assert_eq!(canonical.as_str(), "B=1&a=3&b=2");
    }

    #[test]
    fn test_lexicographic_percent_encodes() {
        let params = ParameterSet::from_pairs([
            ("vnp_OrderInfo", "Thanh toán đơn"),
            ("vnp_ReturnUrl", "https://x/r?a=1"),
        ]);
        let canonical = encode(&params, EncodingPolicy::LexicographicUrlEncoded).unwrap();
        assert_eq!(
            canonical.as_str(),
            "vnp_OrderInfo=Thanh%20to%C3%A1n%20%C4%91%C6%A1n&vnp_ReturnUrl=https%3A%2F%2Fx%2Fr%3Fa%3D1"
        );
    }

    #[test]
    fn test_lexicographic_keeps_unreserved() {
        assert_eq!(percent_encode("aZ09-._~"), "aZ09-._~");
        assert_eq!(percent_encode("a+b"), "a%2Bb");
    }

    #[test]
    fn test_lexicographic_empty_set() {
        let canonical =
            encode(&ParameterSet::new(), EncodingPolicy::LexicographicUrlEncoded).unwrap();
        assert!(canonical.is_empty());
    }

    #[test]
    fn test_lexicographic_vnpay_canonical_string() {
        let params = ParameterSet::from_pairs([("vnp_Command", "pay"), ("vnp_Amount", "100000")]);
        let canonical = encode(&params, EncodingPolicy::LexicographicUrlEncoded).unwrap();
        assert_eq!(canonical.as_str(), "vnp_Amount=100000&vnp_Command=pay");
    }

    fn pairs() -> impl Strategy<Value = Vec<(String, String)>> {
        prop::collection::btree_map("[A-Za-z_]{1,12}", "\\PC{0,16}", 0..10)
            .prop_map(|map| map.into_iter().collect())
    }

    proptest! {
        #[test]
        fn lexicographic_ignores_insertion_order(pairs in pairs()) {
            let forward = ParameterSet::from_pairs(pairs.clone());
            let backward = ParameterSet::from_pairs(pairs.into_iter().rev());
            prop_assert_eq!(
                encode(&forward, EncodingPolicy::LexicographicUrlEncoded).unwrap(),
                encode(&backward, EncodingPolicy::LexicographicUrlEncoded).unwrap()
            );
        }

        #[test]
        fn lexicographic_output_is_url_safe(pairs in pairs()) {
            let params = ParameterSet::from_pairs(pairs);
            let canonical = encode(&params, EncodingPolicy::LexicographicUrlEncoded).unwrap();
            prop_assert!(canonical
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "-._~%=&".contains(c)));
        }
    }
}
