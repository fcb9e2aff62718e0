//! Velion SDK, a client library for the Velion Digital Knowledge Network gateway
//!
//! [`VelionClient`] wraps the gateway's REST routes with typed methods. It
//! keeps the bearer token between calls and refuses uploads the gateway would
//! reject (over 50 MB, or an unlisted MIME type) before sending anything.

pub mod client;
pub mod error;
pub mod models;

pub use client::{check_upload, VelionClient, ALLOWED_FILE_TYPES, DEFAULT_TIMEOUT, MAX_UPLOAD_BYTES};
pub use error::{SdkError, SdkResult};
pub use models::{
    GraphRequest, Health, NewWorkspace, Pagination, Registration, SearchPage, SearchRequest,
    Session, Upload,
};
