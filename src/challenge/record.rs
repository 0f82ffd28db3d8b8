use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

pub const ACME_CHALLENGE_LABEL: &str = "_acme-challenge";

/// TXT record answering a DNS-01 challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dns01Record {
    pub fqdn: String,
    pub value: String,
}

impl Dns01Record {
    pub fn new(domain: &str, key_auth: &str) -> Self {
        let domain = domain.strip_prefix("*.").unwrap_or(domain);
        let domain = domain.trim_end_matches('.');

        let digest = Sha256::digest(key_auth.as_bytes());

        Self {
            fqdn: format!("{ACME_CHALLENGE_LABEL}.{domain}."),
            value: URL_SAFE_NO_PAD.encode(digest),
        }
    }
}
