//! Testing utilities for the Assetify workspace
//!
//! Shared fixtures, scenario documents and host wrappers.

#![allow(missing_docs)]

mod counting;
mod faulty;
mod fixtures;

pub use counting::CountingDocument;
pub use faulty::{FaultyDocument, HostOp};
pub use fixtures::{
    blog_scenario, file_asset, flat_image, landing_scenario, link_video_controls,
    upload_video_controls, wrapped_image, DocumentBuilder, ROOT_ID,
};
