//! Cloudinary upload client implementation.
//!
//! Hosts generated images via Cloudinary's signed upload endpoint. Images
//! are submitted as base64 data URIs with prompt metadata attached as
//! upload context, and every failure on this leg is reported as a storage
//! error so callers can tell it apart from generation failures.

mod client;
mod config;
mod upload;

pub use client::Cloudinary;
pub use config::CloudinaryConfig;
