//! Published known-answer vectors for every algorithm family.

use tesseract_provider::{Direction, InitializationVector, Provider, SymmetricKey};

fn digest(name: &str, message: &[u8]) -> String {
    let mut hash = Provider::default().create_hash(name).unwrap();
    hash.update(message);
    hex::encode(&hash.finalize()[..])
}

fn encrypt(name: &str, key: &str, iv: &str, plaintext: &str) -> String {
    let mut cipher = Provider::default().create_cipher(name).unwrap();
    let key = SymmetricKey::from(&hex::decode(key).unwrap()[..]);
    let iv = InitializationVector::from(&hex::decode(iv).unwrap()[..]);
    cipher.setup(Direction::Encode, &key, &iv).unwrap();

    let mut out = cipher.update(&hex::decode(plaintext).unwrap()).unwrap().to_vec();
    out.extend_from_slice(&cipher.finalize().unwrap());
    hex::encode(out)
}

#[test]
fn test_empty_digests() {
    assert_eq!(digest("sha1", b""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    assert_eq!(digest("md4", b""), "31d6cfe0d16ae931b73c59d7e0c089c0");
    assert_eq!(digest("md5", b""), "d41d8cd98f00b204e9800998ecf8427e");
    assert_eq!(
        digest("ripemd160", b""),
        "9c1185a5c5e9fc54612808977ee8f548b2258d31"
    );
    assert_eq!(
        digest("sha256", b""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn test_abc_digests() {
    assert_eq!(
        digest("sha256", b"abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(
        digest("sha384", b"abc"),
        "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed\
         8086072ba1e7cc2358baeca134c825a7"
    );
    assert_eq!(
        digest("sha512", b"abc"),
        "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
         2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
    );
}

#[test]
fn test_aes128_ecb_zero_block() {
    assert_eq!(
        encrypt(
            "aes128-ecb",
            "00000000000000000000000000000000",
            "",
            "00000000000000000000000000000000"
        ),
        "66e94bd4ef8a2c3b884cfa59ca342b2e"
    );
}

// NIST SP 800-38A, F.2.1 and F.3.13, first block
#[test]
fn test_aes128_cbc_and_cfb() {
    let key = "2b7e151628aed2a6abf7158809cf4f3c";
    let iv = "000102030405060708090a0b0c0d0e0f";
    let plaintext = "6bc1bee22e409f96e93d7e117393172a";
    assert_eq!(
        encrypt("aes128-cbc", key, iv, plaintext),
        "7649abac8119b246cee98e9b12e9197d"
    );
    assert_eq!(
        encrypt("aes128-cfb", key, iv, plaintext),
        "3b3fd92eb72dad20333449f8e83cfb4a"
    );
}

#[test]
fn test_des_family() {
    // "Now is t" under the classic 0123456789abcdef key
    assert_eq!(
        encrypt("des-ecb", "0123456789abcdef", "", "4e6f772069732074"),
        "3fa40e8a984d4815"
    );
    // EDE with three equal keys collapses to single DES
    assert_eq!(
        encrypt(
            "tripledes-ecb",
            "0123456789abcdef0123456789abcdef0123456789abcdef",
            "",
            "4e6f772069732074"
        ),
        "3fa40e8a984d4815"
    );
}

#[test]
fn test_blowfish_zero_block() {
    assert_eq!(
        encrypt("blowfish-ecb", "0000000000000000", "", "0000000000000000"),
        "4ef997456198dd78"
    );
}

// RFC 6070
#[test]
fn test_pbkdf2_sha1() {
    let kdf = Provider::default().create_kdf("pbkdf2(sha1)").unwrap();
    let salt = InitializationVector::from(&b"salt"[..]);

    let key = kdf.make_key(b"password", &salt, 20, 1);
    assert_eq!(hex::encode(&key[..]), "0c60c80f961f0e71f3a9b524af6012062fe037a6");

    let key = kdf.make_key(b"password", &salt, 20, 4096);
    assert_eq!(hex::encode(&key[..]), "4b007901b765489abead49d926f721d065a429c1");

    let salt = InitializationVector::from(&b"saltSALTsaltSALTsaltSALTsaltSALTsalt"[..]);
    let key = kdf.make_key(b"passwordPASSWORDpassword", &salt, 25, 4096);
    assert_eq!(
        hex::encode(&key[..]),
        "3d2eec4fe41c849b80c8d83662c0e44a8b291a964cf2f07038"
    );
}
