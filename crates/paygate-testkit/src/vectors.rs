//! Golden test vectors for deterministic verification.
//!
//! Each vector pins both the canonical string and the hex signature, so a
//! change in field order, escaping or digest shows up as a failing vector.

use paygate_core::{
    encode, EncodingPolicy, HexCase, HmacAlgorithm, ParameterSet, SecretKey, SignatureEngine,
};
use paygate_momo::CREATE_FIELDS;

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub policy: EncodingPolicy,
    pub algorithm: HmacAlgorithm,
    pub secret: &'static str,
    /// Input fields, in no particular order.
    pub params: &'static [(&'static str, &'static str)],
    pub expected_canonical: &'static str,
    /// Expected lowercase hex signature.
    pub expected_signature: &'static str,
}

impl GoldenVector {
    /// The input fields as a parameter set.
    pub fn parameter_set(&self) -> ParameterSet {
        ParameterSet::from_pairs(self.params.iter().copied())
    }

    /// Canonicalize and sign the inputs, returning `(canonical, signature)`.
    pub fn compute(&self) -> (String, String) {
        let canonical = match encode(&self.parameter_set(), self.policy) {
            Ok(c) => c,
            Err(e) => return (format!("<{}>", e), String::new()),
        };
        let engine = match SignatureEngine::new(
            self.algorithm,
            HexCase::Lower,
            &SecretKey::new(self.secret),
        ) {
            Ok(engine) => engine,
            Err(e) => return (canonical.into_string(), format!("<{}>", e)),
        };
        let signature = engine.sign(&canonical).into_string();
        (canonical.into_string(), signature)
    }
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "MoMo create, fixed order, raw values",
            policy: EncodingPolicy::FixedOrderRaw(CREATE_FIELDS),
            algorithm: HmacAlgorithm::Sha256,
            secret: "secret",
            params: &[
                ("partnerCode", "P"),
                ("accessKey", "AK"),
                ("requestId", "R1"),
                ("amount", "1000"),
                ("orderId", "O1"),
                ("orderInfo", "pay"),
                ("redirectUrl", "https://x/r"),
                ("ipnUrl", "https://x/n"),
                ("extraData", ""),
                ("requestType", "T"),
            ],
            expected_canonical: "accessKey=AK&amount=1000&extraData=&ipnUrl=https://x/n\
                &orderId=O1&orderInfo=pay&partnerCode=P&redirectUrl=https://x/r\
                &requestId=R1&requestType=T",
            expected_signature: "bbb9a0056150efa4aa11dcc595c7eaa130b2b955f283dcfc4a7b8b8768cc1521",
        },
        GoldenVector {
            name: "MoMo create, Vietnamese order info",
            policy: EncodingPolicy::FixedOrderRaw(CREATE_FIELDS),
            algorithm: HmacAlgorithm::Sha256,
            secret: "K951B6PE1waDMi640xX08PD3vg6EKvLz",
            params: &[
                ("partnerCode", "MOMO"),
                ("accessKey", "F8BBA842ECF85"),
                ("requestId", "MM1540456472575"),
                ("amount", "50000"),
                ("orderId", "MM1540456472575"),
                ("orderInfo", "Thanh toán MoMo"),
                ("redirectUrl", "https://shop.example/return"),
                ("ipnUrl", "https://api.example/ipn"),
                ("extraData", ""),
                ("requestType", "captureWallet"),
            ],
            expected_canonical: "accessKey=F8BBA842ECF85&amount=50000&extraData=\
                &ipnUrl=https://api.example/ipn&orderId=MM1540456472575\
                &orderInfo=Thanh toán MoMo&partnerCode=MOMO\
                &redirectUrl=https://shop.example/return&requestId=MM1540456472575\
                &requestType=captureWallet",
            expected_signature: "850ae6fcc2396d861848e82ea6886695d1f24ea89ea3773e8ad94635f63ecc38",
        },
        GoldenVector {
            name: "VNPAY minimal, lexicographic",
            policy: EncodingPolicy::LexicographicUrlEncoded,
            algorithm: HmacAlgorithm::Sha512,
            secret: "VNPAYSECRET",
            params: &[("vnp_Command", "pay"), ("vnp_Amount", "100000")],
            expected_canonical: "vnp_Amount=100000&vnp_Command=pay",
            expected_signature: "b0f3c777bb3efb31a9111052e95c670063d7ebe078153cf3b45ad7ebd8a6f2e6\
                c60e1f0eda24a90063df155cdc05108cfadc76b6cff5823b2d93e1417596b29c",
        },
        GoldenVector {
            name: "VNPAY with escaped values",
            policy: EncodingPolicy::LexicographicUrlEncoded,
            algorithm: HmacAlgorithm::Sha512,
            secret: "VNPAYSECRET",
            params: &[
                ("vnp_ReturnUrl", "https://shop.example/vnpay-return"),
                ("vnp_OrderInfo", "Thanh toan don hang"),
                ("vnp_Locale", "vn"),
                ("vnp_Amount", "100000"),
            ],
            expected_canonical: "vnp_Amount=100000&vnp_Locale=vn\
                &vnp_OrderInfo=Thanh%20toan%20don%20hang\
                &vnp_ReturnUrl=https%3A%2F%2Fshop.example%2Fvnpay-return",
            expected_signature: "5ecba8b967c577c06a716cc3428d67191d0fb1fde73f9c94551943b5a291b155\
                e04e2e16713907d53e281e42f1896afce0ae01beaf20506718f0202316cbd121",
        },
    ]
}

/// Verify all golden vectors, reporting `(name, matches, computed signature)`.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let (canonical, signature) = v.compute();
            let matches =
                canonical == v.expected_canonical && signature == v.expected_signature;
            (v.name.to_string(), matches, signature)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, signature) in verify_all_vectors() {
            assert!(matches, "vector {:?} computed {}", name, signature);
        }
    }

    #[test]
    fn test_vector_names_unique() {
        let vectors = all_vectors();
        for (i, a) in vectors.iter().enumerate() {
            for b in &vectors[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }
}
