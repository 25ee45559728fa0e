//! Gateway callback signatures.
//!
//! The gateway signs `"{gateway_order_id}|{gateway_payment_id}"` with HMAC-SHA256 under
//! the shared key secret. [`SignatureVerifier::verify`] is the only way to obtain a
//! [`VerifiedPayment`], and confirming a payment requires one.

use super::PaymentError;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Fields the checkout widget posts back after a successful payment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCallback {
    #[serde(alias = "razorpay_order_id")]
    pub gateway_order_id: String,
    #[serde(alias = "razorpay_payment_id")]
    pub gateway_payment_id: String,
    #[serde(alias = "razorpay_signature")]
    pub signature: String,
}

/// Proof that a callback carried a valid signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedPayment {
    gateway_order_id: String,
    gateway_payment_id: String,
}

impl VerifiedPayment {
    pub fn gateway_order_id(&self) -> &str {
        &self.gateway_order_id
    }

    pub fn gateway_payment_id(&self) -> &str {
        &self.gateway_payment_id
    }

    #[cfg(test)]
    pub(crate) fn for_tests(gateway_order_id: &str, gateway_payment_id: &str) -> Self {
        Self {
            gateway_order_id: gateway_order_id.into(),
            gateway_payment_id: gateway_payment_id.into(),
        }
    }
}

/// Keyed verifier. Cloning shares nothing mutable.
#[derive(Clone)]
pub struct SignatureVerifier {
    keyed: HmacSha256,
}

impl fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SignatureVerifier { .. }")
    }
}

impl SignatureVerifier {
    pub fn new(key_secret: &str) -> Result<Self, PaymentError> {
        let keyed = HmacSha256::new_from_slice(key_secret.as_bytes())
            .map_err(|_| PaymentError::InvalidKey)?;
        Ok(Self { keyed })
    }

    fn mac(&self, gateway_order_id: &str, gateway_payment_id: &str) -> HmacSha256 {
        let mut mac = self.keyed.clone();
        mac.update(gateway_order_id.as_bytes());
        mac.update(b"|");
        mac.update(gateway_payment_id.as_bytes());
        mac
    }

    /// Hex signature the gateway would send for this pair.
    pub fn sign(&self, gateway_order_id: &str, gateway_payment_id: &str) -> String {
        hex::encode(
            self.mac(gateway_order_id, gateway_payment_id)
                .finalize()
                .into_bytes(),
        )
    }

    /// Checks the callback signature in constant time.
    pub fn verify(&self, callback: &PaymentCallback) -> Result<VerifiedPayment, PaymentError> {
        let signature =
            hex::decode(callback.signature.trim()).map_err(|_| PaymentError::InvalidSignature)?;
        self.mac(&callback.gateway_order_id, &callback.gateway_payment_id)
            .verify_slice(&signature)
            .map_err(|_| PaymentError::InvalidSignature)?;

        Ok(VerifiedPayment {
            gateway_order_id: callback.gateway_order_id.clone(),
            gateway_payment_id: callback.gateway_payment_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn callback(signature: String) -> PaymentCallback {
        PaymentCallback {
            gateway_order_id: "order_G1".into(),
            gateway_payment_id: "pay_P1".into(),
            signature,
        }
    }

    #[test]
    fn test_known_vector() {
        // HMAC-SHA256("secret", "order_G1|pay_P1")
        let verifier = SignatureVerifier::new("secret").unwrap();
        let mut mac = HmacSha256::new_from_slice(b"secret").unwrap();
        mac.update(b"order_G1|pay_P1");
        let expected = hex::encode(mac.finalize().into_bytes());

        assert_eq!(verifier.sign("order_G1", "pay_P1"), expected);
    }

    #[test]
    fn test_valid_signature_verifies() {
        let verifier = SignatureVerifier::new("secret").unwrap();
        let signed = verifier.sign("order_G1", "pay_P1");

        let verified = verifier.verify(&callback(signed)).unwrap();
        assert_eq!(verified.gateway_order_id(), "order_G1");
        assert_eq!(verified.gateway_payment_id(), "pay_P1");
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let verifier = SignatureVerifier::new("secret").unwrap();
        let mut signed = verifier.sign("order_G1", "pay_P1");
        let last = if signed.ends_with('0') { "1" } else { "0" };
        signed.replace_range(signed.len() - 1.., last);

        assert!(matches!(
            verifier.verify(&callback(signed)),
            Err(PaymentError::InvalidSignature)
        ));
        assert!(matches!(
            verifier.verify(&callback("not-hex".into())),
            Err(PaymentError::InvalidSignature)
        ));
    }

    #[test]
    fn test_other_secret_is_rejected() {
        let gateway = SignatureVerifier::new("other").unwrap();
        let verifier = SignatureVerifier::new("secret").unwrap();
        let signed = gateway.sign("order_G1", "pay_P1");
        assert!(verifier.verify(&callback(signed)).is_err());
    }

    #[test]
    fn test_callback_accepts_gateway_field_names() {
        let parsed: PaymentCallback = serde_json::from_str(
            r#"{"razorpay_order_id":"order_G1","razorpay_payment_id":"pay_P1","razorpay_signature":"ab"}"#,
        )
        .unwrap();
        assert_eq!(parsed.gateway_order_id, "order_G1");
        assert_eq!(parsed.signature, "ab");
    }
}
