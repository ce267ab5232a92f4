use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Hex HMAC-SHA256 of `"{order_id}|{payment_id}"` keyed by the key secret.
pub fn expected_signature(order_id: &str, payment_id: &str, key_secret: &str) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(key_secret.as_bytes()).ok()?;
    mac.update(format!("{order_id}|{payment_id}").as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Check the signature the checkout widget returned for a payment.
pub fn verify_payment_signature(
    order_id: &str,
    payment_id: &str,
    signature: &str,
    key_secret: &str,
) -> bool {
    let Ok(provided) = hex::decode(signature) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(key_secret.as_bytes()) else {
        return false;
    };
    mac.update(format!("{order_id}|{payment_id}").as_bytes());

    // Constant-time comparison
    mac.verify_slice(&provided).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret";

    #[test]
    fn accepts_matching_signature() {
        let signature = expected_signature("order_abc", "pay_1", SECRET).unwrap();
        assert!(verify_payment_signature("order_abc", "pay_1", &signature, SECRET));
    }

    #[test]
    fn rejects_swapped_identifiers() {
        let signature = expected_signature("order_abc", "pay_1", SECRET).unwrap();
        assert!(!verify_payment_signature("pay_1", "order_abc", &signature, SECRET));
        assert!(!verify_payment_signature("order_abc", "pay_2", &signature, SECRET));
    }

    #[test]
    fn rejects_wrong_secret_and_garbage() {
        let signature = expected_signature("order_abc", "pay_1", SECRET).unwrap();
        assert!(!verify_payment_signature("order_abc", "pay_1", &signature, "other"));
        assert!(!verify_payment_signature("order_abc", "pay_1", "sig_xyz", SECRET));
        assert!(!verify_payment_signature("order_abc", "pay_1", "", SECRET));
    }
}
