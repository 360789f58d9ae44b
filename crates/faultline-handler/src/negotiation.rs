//! Accept header parsing and media type matching

use std::cmp::Ordering;

use http::HeaderMap;
use http::header::ACCEPT;
use mime::Mime;

/// Media types the client accepts, most preferred first
///
/// Entries are ordered by descending quality; ties keep the more specific
/// type first, then header order. Unparseable entries, entries with a
/// malformed quality and entries with `q=0` are dropped. Only a header with
/// no usable entry at all accepts anything; a header that refuses every type
/// yields an empty list.
pub fn accepted_media_types(headers: &HeaderMap) -> Vec<Mime> {
    let mut parsed = 0;
    let mut accepted: Vec<(Mime, u16)> = Vec::new();

    let entries = headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(split_entries)
        .map(str::trim)
        .filter(|entry| !entry.is_empty());

    for entry in entries {
        let media_type = match entry.parse::<Mime>() {
            Ok(media_type) => media_type,
            Err(e) => {
                tracing::debug!(entry, error = %e, "ignoring unparseable Accept entry");
                continue;
            }
        };

        let Some(quality) = quality(&media_type) else {
            tracing::debug!(entry, "ignoring Accept entry with malformed quality");
            continue;
        };

        parsed += 1;
        if quality > 0 {
            accepted.push((media_type, quality));
        }
    }

    if parsed == 0 {
        return vec![mime::STAR_STAR];
    }

    accepted.sort_by(|(a, qa), (b, qb)| qb.cmp(qa).then_with(|| compare_specificity(a, b)));

    accepted.into_iter().map(|(media_type, _)| media_type).collect()
}

/// Split a header value on commas outside quoted strings
fn split_entries(value: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;

    for (idx, c) in value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ',' if !quoted => {
                entries.push(&value[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }

    entries.push(&value[start..]);
    entries
}

/// Quality value scaled to thousandths; `None` when malformed
fn quality(media_type: &Mime) -> Option<u16> {
    let Some(raw) = media_type.get_param("q") else {
        return Some(1000);
    };

    let q = raw.as_str().parse::<f32>().ok().filter(|q| (0.0..=1.0).contains(q))?;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scaled = (q * 1000.0).round() as u16;
    Some(scaled)
}

/// More specific media types sort first
fn compare_specificity(a: &Mime, b: &Mime) -> Ordering {
    wildcard_rank(a)
        .cmp(&wildcard_rank(b))
        .then_with(|| parameter_count(b).cmp(&parameter_count(a)))
}

fn wildcard_rank(media_type: &Mime) -> u8 {
    if media_type.type_() == mime::STAR {
        2
    } else if media_type.subtype() == mime::STAR {
        1
    } else {
        0
    }
}

fn parameter_count(media_type: &Mime) -> usize {
    media_type.params().filter(|(name, _)| *name != "q").count()
}

/// Whether a requested media type admits a supported one
///
/// `*/*` admits anything and `type/*` admits any subtype of `type`.
pub fn includes(requested: &Mime, supported: &Mime) -> bool {
    if requested.type_() == mime::STAR {
        return true;
    }
    if requested.type_() != supported.type_() {
        return false;
    }
    requested.subtype() == mime::STAR || requested.subtype() == supported.subtype()
}

/// Content type to declare for a write
///
/// A wildcard request carries no concrete type, and a request for the
/// writer's own type may carry parameters the writer does not honor, such
/// as a different charset. Both declare the writer's default. Any other
/// concrete type is echoed without parameters.
pub fn content_type_for(requested: &Mime, default: &Mime) -> Mime {
    if requested.type_() == mime::STAR || requested.subtype() == mime::STAR {
        return default.clone();
    }

    if requested.essence_str() == default.essence_str() {
        return default.clone();
    }

    requested
        .essence_str()
        .parse()
        .unwrap_or_else(|_| default.clone())
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    fn accept(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(value));
        headers
    }

    fn essences(types: &[Mime]) -> Vec<&str> {
        types.iter().map(Mime::essence_str).collect()
    }

    #[test]
    fn missing_header_accepts_anything() {
        assert_eq!(accepted_media_types(&HeaderMap::new()), [mime::STAR_STAR]);
    }

    #[test]
    fn blank_header_accepts_anything() {
        assert_eq!(accepted_media_types(&accept("  ")), [mime::STAR_STAR]);
    }

    #[test]
    fn sorted_by_quality() {
        let types = accepted_media_types(&accept("text/plain;q=0.5, application/xml;q=0.9, application/json"));
        assert_eq!(essences(&types), ["application/json", "application/xml", "text/plain"]);
    }

    #[test]
    fn equal_quality_prefers_specific_types() {
        let types = accepted_media_types(&accept("*/*, text/*, text/html"));
        assert_eq!(essences(&types), ["text/html", "text/*", "*/*"]);
    }

    #[test]
    fn equal_quality_and_specificity_keeps_header_order() {
        let types = accepted_media_types(&accept("application/xml, application/json"));
        assert_eq!(essences(&types), ["application/xml", "application/json"]);
    }

    #[test]
    fn zero_quality_and_garbage_are_dropped() {
        let types = accepted_media_types(&accept("application/json;q=0, nonsense, text/plain"));
        assert_eq!(essences(&types), ["text/plain"]);
    }

    #[test]
    fn multiple_accept_headers_are_merged() {
        let mut headers = accept("text/plain;q=0.1");
        headers.append(ACCEPT, HeaderValue::from_static("application/json"));

        let types = accepted_media_types(&headers);
        assert_eq!(essences(&types), ["application/json", "text/plain"]);
    }

    #[test]
    fn wildcards_include_concrete_types() {
        let json = mime::APPLICATION_JSON;
        assert!(includes(&mime::STAR_STAR, &json));
        assert!(includes(&"application/*".parse().unwrap(), &json));
        assert!(includes(&json, &json));
        assert!(!includes(&mime::TEXT_STAR, &json));
        assert!(!includes(&mime::TEXT_PLAIN, &json));
    }

    #[test]
    fn wildcard_request_uses_writer_default() {
        let chosen = content_type_for(&mime::STAR_STAR, &mime::APPLICATION_JSON);
        assert_eq!(chosen, mime::APPLICATION_JSON);
    }

    #[test]
    fn requested_parameters_are_not_echoed() {
        let requested: Mime = "application/problem+json; charset=utf-16; q=0.8".parse().unwrap();
        let chosen = content_type_for(&requested, &mime::APPLICATION_JSON);
        assert_eq!(chosen.to_string(), "application/problem+json");
    }

    #[test]
    fn writer_charset_wins_over_requested_charset() {
        let requested: Mime = "text/plain; charset=iso-8859-1".parse().unwrap();
        let chosen = content_type_for(&requested, &mime::TEXT_PLAIN_UTF_8);
        assert_eq!(chosen.to_string(), "text/plain; charset=utf-8");
    }

    #[test]
    fn refusing_every_type_accepts_nothing() {
        assert!(accepted_media_types(&accept("application/json;q=0")).is_empty());
        assert!(accepted_media_types(&accept("*/*;q=0, text/plain;q=0.0")).is_empty());
    }

    #[test]
    fn only_garbage_accepts_anything() {
        assert_eq!(accepted_media_types(&accept("nonsense")), [mime::STAR_STAR]);
    }

    #[test]
    fn malformed_quality_is_dropped() {
        let types = accepted_media_types(&accept("application/json;q=abc, text/plain;q=0.5, text/html;q=2"));
        assert_eq!(essences(&types), ["text/plain"]);
    }

    #[test]
    fn commas_inside_quoted_parameters_do_not_split() {
        let types = accepted_media_types(&accept(r#"text/plain;format="a,b", application/json;q=0.5"#));
        assert_eq!(essences(&types), ["text/plain", "application/json"]);
        assert_eq!(types[0].get_param("format").unwrap().as_str(), "a,b");
    }
}
