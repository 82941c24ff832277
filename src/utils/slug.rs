//! Slug assignment
//!
//! Derives a unique, URL-safe identifier from a human-readable title. The
//! uniqueness check is supplied by the caller as an async predicate scoped to
//! the entity's collection, so the same loop serves venues, organizations and
//! events.

use std::future::Future;

use crate::utils::errors::{Result, SigoError};

/// Maximum slug length after normalization, matching the column width.
pub const MAX_SLUG_LEN: usize = 255;

/// Normalize a title into a URL-safe slug candidate.
///
/// Lowercases, collapses non-alphanumeric runs into single dashes and
/// truncates to [`MAX_SLUG_LEN`]. An empty or whitespace-only title yields an
/// empty string; callers are expected to fall back (see [`assign_slug`]).
pub fn slugify(title: &str) -> String {
    let mut candidate = slug::slugify(title);
    if candidate.len() > MAX_SLUG_LEN {
        // slugify output is ASCII, so byte truncation is safe
        candidate.truncate(MAX_SLUG_LEN);
        while candidate.ends_with('-') {
            candidate.pop();
        }
    }
    candidate
}

/// Derive a slug that is unique within a collection.
///
/// `exists` reports whether a candidate is already taken in the collection
/// (excluding the record being saved). If the normalized title is free it is
/// used verbatim; otherwise numeric suffixes `-1`, `-2`, ... are tried until
/// an unused combination is found. The loop terminates because the collection
/// is finite, but the result is only guaranteed unique at the instant of the
/// check; the storage-level unique constraint is the backstop and callers
/// retry on [`SigoError::DuplicateSlug`].
///
/// An empty title falls back to the slugified `fallback` seed. If both
/// normalize to nothing the call fails with [`SigoError::InvalidInput`].
pub async fn assign_slug<F, Fut>(title: &str, fallback: &str, exists: F) -> Result<String>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let mut base = slugify(title);
    if base.is_empty() {
        base = slugify(fallback);
    }
    if base.is_empty() {
        return Err(SigoError::InvalidInput(
            "cannot derive a slug from an empty title and fallback".to_string(),
        ));
    }

    if !exists(base.clone()).await? {
        return Ok(base);
    }

    let mut counter: u64 = 1;
    loop {
        let candidate = suffixed(&base, counter);
        if !exists(candidate.clone()).await? {
            return Ok(candidate);
        }
        counter += 1;
    }
}

/// Append a numeric suffix, trimming the stem so the result stays within
/// [`MAX_SLUG_LEN`].
fn suffixed(base: &str, counter: u64) -> String {
    let suffix = format!("-{counter}");
    let keep = MAX_SLUG_LEN.saturating_sub(suffix.len());
    let stem = if base.len() > keep {
        base[..keep].trim_end_matches('-')
    } else {
        base
    };
    format!("{stem}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    async fn assign(title: &str, fallback: &str, taken: &[&str]) -> Result<String> {
        let taken: Arc<HashSet<String>> =
            Arc::new(taken.iter().map(|s| s.to_string()).collect());
        assign_slug(title, fallback, move |candidate| {
            let taken = Arc::clone(&taken);
            async move { Ok(taken.contains(&candidate)) }
        })
        .await
    }

    #[test]
    fn test_slugify_normalizes() {
        assert_eq!(slugify("City Hall Forum"), "city-hall-forum");
        assert_eq!(slugify("  Rally!!  at 5th & Main  "), "rally-at-5th-main");
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("   "), "");
    }

    #[test]
    fn test_slugify_truncates() {
        let long = "a ".repeat(400);
        let slug = slugify(&long);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));
    }

    #[tokio::test]
    async fn test_free_title_used_verbatim() {
        let slug = assign("My Event", "event", &[]).await.unwrap();
        assert_eq!(slug, "my-event");
    }

    #[tokio::test]
    async fn test_collision_appends_suffix() {
        let slug = assign("My Event", "event", &["my-event"]).await.unwrap();
        assert_eq!(slug, "my-event-1");

        let slug = assign("My Event", "event", &["my-event", "my-event-1", "my-event-2"])
            .await
            .unwrap();
        assert_eq!(slug, "my-event-3");
    }

    #[tokio::test]
    async fn test_empty_title_falls_back() {
        let slug = assign("   ", "venue", &[]).await.unwrap();
        assert_eq!(slug, "venue");

        let slug = assign("", "venue", &["venue"]).await.unwrap();
        assert_eq!(slug, "venue-1");
    }

    #[tokio::test]
    async fn test_empty_title_and_fallback_fails() {
        let err = assign("", "", &[]).await.unwrap_err();
        assert!(matches!(err, SigoError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_suffix_respects_max_len() {
        let base = "x".repeat(MAX_SLUG_LEN);
        let candidate = suffixed(&base, 12);
        assert!(candidate.len() <= MAX_SLUG_LEN);
        assert!(candidate.ends_with("-12"));
    }

    proptest! {
        #[test]
        fn prop_slugify_is_url_safe(title in ".{0,512}") {
            let slug = slugify(&title);
            prop_assert!(slug.len() <= MAX_SLUG_LEN);
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
        }
    }
}
