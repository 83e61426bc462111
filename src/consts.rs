use axum::http::{header, HeaderName};

// ---------- PLACEHOLDERS ----------

/// force var name to be the same as its string value
macro_rules! constant {
  ($name:ident) => {
    pub const $name: &str = stringify!($name);
  }
}

// Tokens written into the SPA's static files and swapped for
// deployment values when served.
constant!(ORDERCLOUD_CLIENT_ID);
constant!(ORDERCLOUD_OPEN_ID_CONNECT_ID);
constant!(ORDERCLOUD_BASE_API_URL);
constant!(ORDERCLOUD_BUYER_ID);
constant!(ORDERCLOUD_ROLES);

// ---------- DIRECTORY ----------

/// Stored by OrderCloud in place of a claim the IDP didn't provide.
pub const NOT_AVAILABLE: &str = "NOT_AVAILABLE";

// ---------- NO CACHE HEADER ----------

// Sources:
//   https://developer.mozilla.org/en-US/docs/Web/HTTP/Headers/Cache-Control
//   https://developer.mozilla.org/en-US/docs/Web/HTTP/Headers/Pragma
pub const NO_CACHE_HEADER: [(HeaderName, &str); 2] = [
  (header::CACHE_CONTROL, "no-store"),
  (header::PRAGMA, "no-cache")
];
