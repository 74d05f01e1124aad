//! Hashing - SHA-256 digests for rendered files and their manifests
//!
//! Manifests hash through canonical JSON so the same file always yields the same
//! audit hash.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::records::RecordCode;
use crate::totals::Trailer;
use crate::ENGINE_VERSION;

/// Lower-case hex SHA-256 digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    Sha256::digest(data)
        .iter()
        .fold(String::with_capacity(64), |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        })
}

/// JSON with object keys in byte order and no whitespace.
///
/// Two manifests with the same content always serialise to the same string.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let tree = serde_json::to_value(value)?;
    serde_json::to_string(&canonicalize(tree))
}

fn canonicalize(tree: Value) -> Value {
    match tree {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, inner)| (key, canonicalize(inner)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        leaf => leaf,
    }
}

/// Summary of one rendered file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileManifest {
    pub engine_version: String,
    /// Line counts per totalizable code, as written in the trailer.
    pub records: BTreeMap<RecordCode, usize>,
    pub grand_total: usize,
    pub trailer_lines: usize,
    pub byte_length: usize,
    pub content_hash: String,
}

impl FileManifest {
    pub fn new(rendered: &str, trailer: &Trailer) -> Self {
        Self {
            engine_version: ENGINE_VERSION.to_string(),
            records: trailer.counts.clone(),
            grand_total: trailer.grand_total,
            trailer_lines: trailer.line_count(),
            byte_length: rendered.len(),
            content_hash: sha256_hex(rendered.as_bytes()),
        }
    }

    /// Audit hash over the canonical JSON form of the manifest.
    pub fn hash(&self) -> Result<String, serde_json::Error> {
        compute_manifest_hash(self)
    }
}

pub fn compute_manifest_hash<T: Serialize>(manifest: &T) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(manifest)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": 2, "m": 3});
        let canonical = canonical_json(&obj).unwrap();
        assert_eq!(canonical, r#"{"a":2,"m":3,"z":1}"#);
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_manifest_counts_serialize_by_code() {
        let trailer = Trailer {
            slots: vec!["90".into()],
            counts: BTreeMap::from([(RecordCode::R50, 3), (RecordCode::R10, 1)]),
            grand_total: 6,
        };
        let manifest = FileManifest::new("body", &trailer);
        let canonical = canonical_json(&manifest).unwrap();

        assert!(canonical.contains(r#""records":{"10":1,"50":3}"#));
        assert_eq!(manifest.byte_length, 4);
        assert_eq!(manifest.hash().unwrap(), manifest.hash().unwrap());
    }
}
