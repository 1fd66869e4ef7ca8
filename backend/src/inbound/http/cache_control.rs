//! Cache-control policies shared by HTTP handlers.

/// Per-user responses must always be revalidated before reuse.
pub const PRIVATE_NO_CACHE_MUST_REVALIDATE: &str = "private, no-cache, must-revalidate";

/// Stored images never change once written; every upload gets a fresh name.
pub const PUBLIC_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Header tuple for responses that depend on the session user.
pub const fn private_no_cache_header() -> (&'static str, &'static str) {
    ("Cache-Control", PRIVATE_NO_CACHE_MUST_REVALIDATE)
}

/// Header tuple for content-addressed media.
pub const fn immutable_media_header() -> (&'static str, &'static str) {
    ("Cache-Control", PUBLIC_IMMUTABLE)
}
