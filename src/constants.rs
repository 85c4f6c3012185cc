pub mod network {
    pub const TIMEOUT_REQUEST_MS: u64 = 10_000;
    /// Credential fetches at or above this status fail the hook.
    pub const CREDENTIAL_FAILURE_STATUS: u16 = 400;
}

pub mod headers {
    pub const AUTHORIZATION: &str = "Authorization";
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const BEARER_FORMAT: &str = "Bearer %s";
    pub const FORMAT_PLACEHOLDER: &str = "%s";
}

pub mod content_types {
    pub const JSON: &str = "application/json";
    pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
    pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";
    pub const OCTET_STREAM: &str = "application/octet-stream";
    pub const HTML: &str = "text/html";
    pub const PLAIN: &str = "text/plain";
}

pub mod cache {
    pub const TMP_MARKER: &str = "tmp";
    pub const FILE_MODE: u32 = 0o600;
}

pub mod logging {
    pub const LEVEL_ENV: &str = "METHOD_LOGGING_LEVEL";
}

pub mod protocols {
    pub const ALLOWED_HTTP: &[&str] = &["http:", "https:"];
}
