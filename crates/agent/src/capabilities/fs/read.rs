//! File read capability.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;

use steward_core::contract::{ActionRequest, ActionResult, Origin};
use steward_core::intent::IntentKind;
use steward_core::registry::{CapabilityDescriptor, CapabilityHandler, CapabilityReply};

use super::resolver::resolve_files;
use super::search_root;

pub struct ReadFileHandler {
    descriptor: CapabilityDescriptor,
    base: PathBuf,
}

impl ReadFileHandler {
    pub fn new(base: PathBuf) -> Self {
        Self {
            descriptor: CapabilityDescriptor::new(IntentKind::ContentRead, "filesystem.read"),
            base,
        }
    }
}

#[async_trait]
impl CapabilityHandler for ReadFileHandler {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    async fn execute(&self, request: &ActionRequest, dry_run: bool) -> Result<CapabilityReply> {
        if dry_run {
            return Ok(CapabilityReply::Completed(ActionResult::ok(
                Origin::Capability,
                "(dry-run) file read planned",
            )));
        }

        let Some(filename) = request.param("filename") else {
            return Ok(CapabilityReply::Completed(ActionResult::failed(
                Origin::Capability,
                "No file name given.",
            )));
        };

        let root = search_root(&self.base, request.param("path"));
        let matches = resolve_files(&root, filename);
        let result = match matches.as_slice() {
            [] => ActionResult::failed(Origin::Capability, "No matching file found."),
            [path] => {
                let content = fs::read_to_string(path)?;
                ActionResult::ok(Origin::Capability, format!("Read {}.", path.display()))
                    .with_content(content)
            }
            many => ActionResult::failed(
                Origin::Capability,
                format!(
                    "Multiple files match; be more specific:\n{}",
                    many.iter()
                        .map(|path| format!("- {}", path.display()))
                        .collect::<Vec<_>>()
                        .join("\n")
                ),
            ),
        };
        Ok(CapabilityReply::Completed(result))
    }
}
