//! Content signatures.
//!
//! A signature is the lowercase hex SHA-256 of the canonical content payload:
//!
//! ```text
//! {"action":…,"camera":…,"category":…,"environment":…,"lighting":…,"name":…,"style":…,"subject":…}
//! ```
//!
//! Keys are serialized in sorted order (a `BTreeMap`), so the encoding, and
//! therefore the digest, is stable across runs. Tags are left out: editing
//! only the tags of a template never changes its signature.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::canonical::CanonicalDraft;
use crate::error::Result;

/// Length of a rendered signature (64 hex chars).
pub const SIGNATURE_LEN: usize = 64;

pub fn signature(canonical: &CanonicalDraft) -> Result<String> {
    let payload = signature_payload(canonical)?;
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

fn signature_payload(canonical: &CanonicalDraft) -> Result<String> {
    let mut fields: BTreeMap<&str, &str> = BTreeMap::new();
    fields.insert("name", &canonical.name);
    fields.insert("subject", &canonical.subject);
    fields.insert("action", &canonical.action);
    fields.insert("environment", &canonical.environment);
    fields.insert("style", &canonical.style);
    fields.insert("lighting", &canonical.lighting);
    fields.insert("camera", &canonical.camera);
    fields.insert("category", &canonical.category);
    Ok(serde_json::to_string(&fields)?)
}
