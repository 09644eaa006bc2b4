//! API constants

/// Versioned prefix for every gallery route
pub const API_PREFIX: &str = "/api/v0";

/// Route prefix under which `?access_token=` is accepted in place of a bearer header.
pub const DOWNLOAD_PREFIX: &str = "/api/v0/download/";

/// Headroom on top of the upload limit for multipart framing and the caption field.
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;
