//! Renders course and program completion certificates to single-page PDFs.
//!
//! The engine takes a fully loaded [`record::CertificateRecord`] and resolved
//! [`storage::CertificateAssets`], lays the page out with
//! [`composer::CertificateComposer`] and writes `{output_dir}/{reference}.pdf`.
pub mod composer;
pub mod config;
pub mod error;
pub mod layout;
pub mod pdf;
pub mod qr;
pub mod record;
pub mod state;
pub mod storage;

#[cfg(test)]
mod test_utils;

pub use composer::CertificateComposer;
pub use error::{RenderError, Result};
pub use state::RenderContext;
