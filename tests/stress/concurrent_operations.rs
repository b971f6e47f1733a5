//! Concurrency test: parallel signing, agreement and encryption.
//!
//! Every operation draws randomness per call, so shared key material must
//! be usable from many threads at once with consistent results.

use std::sync::{Arc, Mutex};
use std::thread;

use iot_crypto::{agree, decrypt_to_string, encrypt, sign, verify, KeyPair};

#[test]
fn stress_16_concurrent_signers() {
    let pair = Arc::new(KeyPair::generate().expect("key generation"));
    let signatures = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for thread_id in 0..16 {
        let pair = Arc::clone(&pair);
        let signatures = Arc::clone(&signatures);
        handles.push(thread::spawn(move || {
            let private_key = pair.private_key_hex();
            for i in 0..25 {
                let message = format!("thread {thread_id} reading {i}");
                let signature = sign(&message, &private_key).expect("signing should succeed");
                signatures.lock().unwrap().push((message, signature));
            }
        }));
    }
    for h in handles {
        h.join().expect("signer thread panicked");
    }

    let signatures = signatures.lock().unwrap();
    assert_eq!(signatures.len(), 16 * 25);
    let public_key = pair.public_key_hex();
    for (message, signature) in signatures.iter() {
        assert!(verify(signature, message, &public_key), "{message} should verify");
    }
}

#[test]
fn stress_concurrent_agreement_is_consistent() {
    let hub = Arc::new(KeyPair::generate().unwrap());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let hub = Arc::clone(&hub);
            thread::spawn(move || {
                let device = KeyPair::generate().unwrap();
                let device_side = agree(&device.private_key_hex(), &hub.public_key_hex()).unwrap();
                let hub_side = agree(&hub.private_key_hex(), &device.public_key_hex()).unwrap();
                assert_eq!(device_side, hub_side);
                device_side
            })
        })
        .collect();

    let mut secrets: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    secrets.sort();
    secrets.dedup();
    assert_eq!(secrets.len(), 16, "each device should share a distinct secret");
}

#[test]
fn stress_concurrent_encryption_shared_key() {
    let key = Arc::new(
        "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08".to_string(),
    );
    let frames = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for thread_id in 0..8 {
        let key = Arc::clone(&key);
        let frames = Arc::clone(&frames);
        handles.push(thread::spawn(move || {
            for i in 0..50 {
                let plaintext = format!("frame {thread_id}/{i}");
                let encrypted = encrypt(&key, &plaintext).unwrap();
                frames.lock().unwrap().push((plaintext, encrypted));
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    let frames = frames.lock().unwrap();
    assert_eq!(frames.len(), 400);

    // Nonces drawn concurrently must still be unique.
    let mut nonces: Vec<&str> = frames.iter().map(|(_, e)| &e[..24]).collect();
    nonces.sort_unstable();
    nonces.dedup();
    assert_eq!(nonces.len(), 400);

    for (plaintext, encrypted) in frames.iter() {
        assert_eq!(&decrypt_to_string(&key, encrypted).unwrap(), plaintext);
    }
}
