//! Learnado bundle packaging.
//!
//! A bundle is everything a device is entitled to, rendered into a static
//! site and shipped as one sealed file:
//!
//! 1. [`BundleBuilder::collect_content`] stages the site template, the
//!    device's courses and the homepage, runs the [`ContentRenderer`], and
//!    reads the rendered tree into a [`PathMap`].
//! 2. [`encode`] writes the map as a deterministic pathmap stream.
//! 3. [`compress`] gzips the stream.
//! 4. The stream is sealed with AES-256-GCM under the device's derived key.
//! 5. [`PackagingPipeline::package_for_device`] writes `<uuid>.pmap` only
//!    once every step above has succeeded.
//!
//! [`open_bundle`] reverses the chain for offline tooling and tests.

mod archive;
mod builder;
mod compress;
mod config;
mod error;
mod pipeline;
mod render;

pub use archive::{decode, encode, PathMap, FORMAT_VERSION, MAGIC};
pub use builder::{normalize_course_name, BundleBuilder};
pub use compress::{compress, decompress};
pub use config::{PackagingConfig, RendererConfig};
pub use error::{BundleError, BundleResult};
pub use pipeline::{open_bundle, PackagedBundle, PackagingPipeline, BUNDLE_EXTENSION};
pub use render::{ContentRenderer, HugoRenderer};
