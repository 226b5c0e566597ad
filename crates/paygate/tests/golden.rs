//! Golden vectors for cross-implementation verification.
//!
//! Every implementation must produce identical canonical strings and
//! signatures for these inputs.

use paygate_core::{encode, HexCase, SecretKey, SignatureEngine};
use paygate_testkit::vectors::all_vectors;

#[test]
fn golden_vectors_canonicalize_and_sign() {
    for vector in all_vectors() {
        let canonical = encode(&vector.parameter_set(), vector.policy).unwrap();
        assert_eq!(
            canonical.as_str(),
            vector.expected_canonical,
            "canonical string of {:?}",
            vector.name
        );

        let engine =
            SignatureEngine::new(vector.algorithm, HexCase::Lower, &SecretKey::new(vector.secret))
                .unwrap();
        let signature = engine.sign(&canonical);
        assert_eq!(
            signature.as_str(),
            vector.expected_signature,
            "signature of {:?}",
            vector.name
        );
        assert_eq!(signature.as_str().len(), vector.algorithm.hex_len());
    }
}

#[test]
fn golden_vectors_verify_in_either_case() {
    for vector in all_vectors() {
        let canonical = encode(&vector.parameter_set(), vector.policy).unwrap();
        let engine =
            SignatureEngine::new(vector.algorithm, HexCase::Upper, &SecretKey::new(vector.secret))
                .unwrap();

        assert_eq!(
            engine.sign(&canonical).as_str(),
            vector.expected_signature.to_uppercase()
        );
        assert!(engine.verify(&canonical, vector.expected_signature));
        assert!(engine.verify(&canonical, &vector.expected_signature.to_uppercase()));
    }
}

#[test]
fn golden_vectors_reject_other_secrets() {
    for vector in all_vectors() {
        let canonical = encode(&vector.parameter_set(), vector.policy).unwrap();
        let engine =
            SignatureEngine::new(vector.algorithm, HexCase::Lower, &SecretKey::new("not-the-secret"))
                .unwrap();
        assert!(!engine.verify(&canonical, vector.expected_signature));
    }
}

#[test]
fn fixed_order_ignores_unlisted_fields() {
    for vector in all_vectors() {
        let with_extra = vector.parameter_set().with("lang", "vi").with("zzz", "1");
        let canonical = encode(&with_extra, vector.policy).unwrap();
        let listed_only = matches!(vector.policy, paygate_core::EncodingPolicy::FixedOrderRaw(_));
        assert_eq!(canonical.as_str() == vector.expected_canonical, listed_only);
    }
}
