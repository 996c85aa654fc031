//! # Bucket and Object Names
//!
//! Bucket names follow the S3 rules:
//! - 3 to 63 characters
//! - lowercase letters, digits, `-` and `.`
//! - start and end with a letter or digit
//! - no `..`, and not shaped like an IPv4 address

use std::net::Ipv4Addr;

use super::backend::ObjectStore;
use super::errors::{ObjectResult, ObjectStoreError};
use crate::observability::{log_event_with_fields, Event};

const MIN_BUCKET_LEN: usize = 3;
const MAX_BUCKET_LEN: usize = 63;

fn invalid(name: &str, reason: &'static str) -> ObjectStoreError {
    ObjectStoreError::InvalidBucketName {
        name: name.to_string(),
        reason,
    }
}

fn is_bucket_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.'
}

fn is_bucket_edge(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

/// Check a bucket name against the S3 naming rules
pub fn validate_bucket_name(name: &str) -> ObjectResult<()> {
    if name.len() < MIN_BUCKET_LEN || name.len() > MAX_BUCKET_LEN {
        return Err(invalid(name, "length must be between 3 and 63"));
    }
    if !name.chars().all(is_bucket_char) {
        return Err(invalid(
            name,
            "only lowercase letters, digits, '-' and '.' are allowed",
        ));
    }
    let starts_ok = name.chars().next().map_or(false, is_bucket_edge);
    let ends_ok = name.chars().last().map_or(false, is_bucket_edge);
    if !starts_ok || !ends_ok {
        return Err(invalid(name, "must start and end with a letter or digit"));
    }
    if name.contains("..") {
        return Err(invalid(name, "must not contain '..'"));
    }
    if name.parse::<Ipv4Addr>().is_ok() {
        return Err(invalid(name, "must not be formatted as an IP address"));
    }
    Ok(())
}

/// Derive a valid bucket name from a document namespace.
///
/// Lowercases, replaces disallowed characters with `-`, and trims or pads
/// to the allowed length. `1000410-28L` becomes `1000410-28l`.
pub fn bucket_name_for(namespace: &str) -> ObjectResult<String> {
    let mut name: String = namespace
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .map(|c| if is_bucket_char(c) { c } else { '-' })
        .collect();

    while name.contains("..") {
        name = name.replace("..", ".-");
    }
    name.truncate(MAX_BUCKET_LEN);
    let mut name = name
        .trim_matches(|c: char| !is_bucket_edge(c))
        .to_string();

    if name.parse::<Ipv4Addr>().is_ok() {
        name = format!("ip-{}", name.replace('.', "-"));
    }
    while name.len() < MIN_BUCKET_LEN {
        name.push('0');
    }

    validate_bucket_name(&name)?;
    Ok(name)
}

/// Check an object name: non-empty `/`-separated segments, none of which
/// is `.` or `..`.
pub fn validate_object_name(object: &str) -> ObjectResult<()> {
    let valid = !object.is_empty()
        && !object.contains('\\')
        && !object.contains('\0')
        && object
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
    if valid {
        Ok(())
    } else {
        Err(ObjectStoreError::InvalidObjectName(object.to_string()))
    }
}

/// Create `bucket` unless it already exists.
///
/// Returns `true` when the bucket was created by this call.
pub fn ensure_bucket(store: &dyn ObjectStore, bucket: &str) -> ObjectResult<bool> {
    if store.bucket_exists(bucket)? {
        log_event_with_fields(Event::BucketExists, &[("bucket", bucket)]);
        return Ok(false);
    }

    match store.make_bucket(bucket) {
        Ok(()) => {
            log_event_with_fields(Event::BucketCreated, &[("bucket", bucket)]);
            Ok(true)
        }
        // Lost a creation race: the bucket is there, which is all we need
        Err(ObjectStoreError::BucketAlreadyExists(_)) => Ok(false),
        Err(e) => Err(e),
    }
}
