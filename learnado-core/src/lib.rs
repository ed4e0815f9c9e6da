//! Learnado course licensing service.
//!
//! Wires the record store, license issuer, entitlement registrar and bundle
//! pipeline behind the [`Learnado`] facade. Each external action takes a
//! typed request parsed from JSON:
//!
//! | Action             | Request                    |
//! |--------------------|----------------------------|
//! | `issue_licenses`   | [`IssueLicensesRequest`]   |
//! | `register_license` | [`RegisterLicenseRequest`] |
//! | `revoke_license`   | [`RevokeLicenseRequest`]   |
//! | `download`         | [`DownloadRequest`]        |
//!
//! Library crates here only emit `tracing` events; the embedding application
//! installs a subscriber.

mod config;
mod error;
mod requests;
mod service;

pub use config::LearnadoConfig;
pub use error::{CoreError, CoreResult};
pub use requests::{
    DownloadRequest, DownloadResponse, Fields, IssueLicensesRequest, IssueLicensesResponse,
    RegisterLicenseRequest, RegisterLicenseResponse, Request, RevokeLicenseRequest,
    RevokeLicenseResponse,
};
pub use service::Learnado;
