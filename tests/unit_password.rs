use atrium_core::{BcryptDigest, DigestError, PasswordDigest, Sha256Digest, digest_from_name};

// bcrypt's minimum cost keeps these tests fast
const TEST_COST: u32 = 4;

#[test]
fn test_sha256_digest_is_hex_and_stable() {
    let digest = Sha256Digest.digest("testpassword123").unwrap();

    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(digest, Sha256Digest.digest("testpassword123").unwrap());
}

#[test]
fn test_sha256_known_value() {
    assert_eq!(
        Sha256Digest.digest("").unwrap(),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn test_sha256_verify() {
    let stored = Sha256Digest.digest("correctpassword").unwrap();

    assert!(Sha256Digest.verify("correctpassword", &stored).unwrap());
    assert!(!Sha256Digest.verify("wrongpassword", &stored).unwrap());
    assert!(!Sha256Digest.verify("correctpassword", "short").unwrap());
}

#[test]
fn test_sha256_verify_accepts_uppercase_hex() {
    let stored = Sha256Digest.digest("mixedcase").unwrap().to_uppercase();
    assert!(Sha256Digest.verify("mixedcase", &stored).unwrap());
}

#[test]
fn test_bcrypt_hash_and_verify() {
    let digest = BcryptDigest { cost: TEST_COST };
    let stored = digest.digest("correctpassword").unwrap();

    assert!(stored.starts_with("$2"));
    assert!(digest.verify("correctpassword", &stored).unwrap());
    assert!(!digest.verify("wrongpassword", &stored).unwrap());
}

#[test]
fn test_bcrypt_generates_unique_hashes() {
    let digest = BcryptDigest { cost: TEST_COST };
    let first = digest.digest("samepassword").unwrap();
    let second = digest.digest("samepassword").unwrap();

    assert_ne!(first, second);
    assert!(digest.verify("samepassword", &first).unwrap());
    assert!(digest.verify("samepassword", &second).unwrap());
}

#[test]
fn test_bcrypt_verify_invalid_hash() {
    let digest = BcryptDigest { cost: TEST_COST };
    assert!(matches!(
        digest.verify("password", "not_a_valid_bcrypt_hash"),
        Err(DigestError::Bcrypt(_))
    ));
}

#[test]
fn test_digest_from_name() {
    assert_eq!(digest_from_name("sha256").unwrap().name(), "sha256");
    assert_eq!(digest_from_name("").unwrap().name(), "sha256");
    assert_eq!(digest_from_name(" BCRYPT ").unwrap().name(), "bcrypt");
    assert!(matches!(
        digest_from_name("md5"),
        Err(DigestError::UnknownAlgorithm(name)) if name == "md5"
    ));
}
