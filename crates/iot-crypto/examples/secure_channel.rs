//! Secure Channel — two devices agree on a key, then sign and encrypt.
//!
//! Run with:
//!   cargo run --example secure_channel -p iot-crypto

use iot_crypto::{agree, decrypt_to_string, encrypt, sign, verify, KeyPair};

fn main() {
    // ── 1. Each device generates a key pair ─────────────────────────────────
    let sensor = KeyPair::generate().expect("sensor key generation");
    let gateway = KeyPair::generate().expect("gateway key generation");
    println!("Sensor public key:  {}", sensor.public_key_hex());
    println!("Gateway public key: {}", gateway.public_key_hex());
    println!();

    // ── 2. The sensor signs a reading ───────────────────────────────────────
    //
    // The gateway only needs the sensor's public key to check it.
    let reading = "temperature=21.5C";
    let signature = sign(reading, &sensor.private_key_hex()).expect("signing");
    println!("Signature: {signature}");
    assert!(verify(&signature, reading, &sensor.public_key_hex()));
    assert!(!verify(&signature, "temperature=99.9C", &sensor.public_key_hex()));
    println!("  Verified: OK (tampered reading rejected)");
    println!();

    // ── 3. Both sides derive the same shared secret ─────────────────────────
    let sensor_side = agree(&sensor.private_key_hex(), &gateway.public_key_hex())
        .expect("sensor-side agreement");
    let gateway_side = agree(&gateway.private_key_hex(), &sensor.public_key_hex())
        .expect("gateway-side agreement");
    assert_eq!(sensor_side, gateway_side);
    println!("Shared secret: {}...", &sensor_side[..16]);
    println!();

    // ── 4. Encrypt with one side's secret, decrypt with the other's ─────────
    let encrypted = encrypt(&sensor_side, reading).expect("encryption");
    println!("Encrypted frame: {encrypted}");
    let decrypted = decrypt_to_string(&gateway_side, &encrypted).expect("decryption");
    assert_eq!(decrypted, reading);
    println!("Decrypted: {decrypted}");
}
