use learnado_crypto::{
    decrypt, derive_key, encrypt, open, seal, CryptoError, SealedData,
    NONCE_SIZE, TAG_SIZE,
};

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = derive_key("HW-CIPHER");
    let plaintext = b"Hello, World!";
    let encrypted = encrypt(&key, plaintext).unwrap();
    let decrypted = decrypt(&key, &encrypted).unwrap();
    assert_eq!(decrypted, plaintext);
}

#[test]
fn seal_open_empty() {
    let key = derive_key("HW-A");
    let sealed = seal(&key, b"").unwrap();
    assert_eq!(sealed.len(), NONCE_SIZE + TAG_SIZE);
    assert_eq!(open(&key, &sealed).unwrap(), b"");
}

#[test]
fn sealed_layout_is_nonce_then_ciphertext() {
    let key = derive_key("HW-A");
    let sealed = encrypt(&key, b"payload").unwrap();
    let bytes = sealed.to_bytes();
    assert_eq!(&bytes[..NONCE_SIZE], &sealed.nonce);
    assert_eq!(&bytes[NONCE_SIZE..], sealed.ciphertext.as_slice());
    assert_eq!(bytes.len(), NONCE_SIZE + b"payload".len() + TAG_SIZE);
}

#[test]
fn wrong_key_fails_with_authentication_failure() {
    let sealed = seal(&derive_key("HW-A"), b"Secret").unwrap();
    let result = open(&derive_key("HW-B"), &sealed);
    assert!(matches!(result, Err(CryptoError::AuthenticationFailure)));
}

#[test]
fn tampered_tag_fails() {
    let key = derive_key("HW-A");
    let mut sealed = seal(&key, b"Secret").unwrap();
    if let Some(b) = sealed.last_mut() {
        *b ^= 0x01;
    }
    assert!(matches!(open(&key, &sealed), Err(CryptoError::AuthenticationFailure)));
}

#[test]
fn truncated_input_fails_without_panicking() {
    let key = derive_key("HW-A");
    let sealed = seal(&key, b"Secret").unwrap();
    for len in 0..sealed.len() {
        assert!(
            matches!(open(&key, &sealed[..len]), Err(CryptoError::AuthenticationFailure)),
            "truncation to {len} bytes was accepted"
        );
    }
}

#[test]
fn same_plaintext_produces_different_ciphertext() {
    let key = derive_key("HW-CIPHER");
    let e1 = encrypt(&key, b"Same").unwrap();
    let e2 = encrypt(&key, b"Same").unwrap();
    assert_ne!(e1.nonce, e2.nonce);
    assert_ne!(e1.ciphertext, e2.ciphertext);
}

// ── SealedData ───────────────────────────────────────────────────

#[test]
fn sealed_data_from_bytes_too_short() {
    let result = SealedData::from_bytes(&[0u8; NONCE_SIZE + TAG_SIZE - 1]);
    assert!(matches!(
        result,
        Err(CryptoError::Truncated {
            expected_at_least: 28,
            actual: 27
        })
    ));
}

#[test]
fn sealed_data_is_empty() {
    let sd = SealedData {
        nonce: [0u8; NONCE_SIZE],
        ciphertext: vec![],
    };
    assert!(sd.is_empty());
    assert_eq!(sd.len(), NONCE_SIZE);
}

#[test]
fn error_display_mentions_authentication() {
    let msg = CryptoError::AuthenticationFailure.to_string();
    assert!(msg.contains("authentication failed"));
}
