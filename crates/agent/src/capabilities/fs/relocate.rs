//! File move capability: plan shows source → destination, commit renames
//! one confirmed source at a time.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;

use steward_core::contract::{ActionPlan, ActionRequest, ActionResult, Origin, RiskLevel};
use steward_core::intent::IntentKind;
use steward_core::registry::{CapabilityDescriptor, CapabilityHandler, CapabilityReply};

use super::resolver::{resolve_dir, resolve_files};
use super::search_root;

pub struct MoveFileHandler {
    descriptor: CapabilityDescriptor,
    base: PathBuf,
}

impl MoveFileHandler {
    pub fn new(base: PathBuf) -> Self {
        Self {
            descriptor: CapabilityDescriptor::new(IntentKind::ContentMove, "filesystem.move")
                .with_risk(RiskLevel::Medium)
                .destructive(),
            base,
        }
    }

    fn destination_dir(&self, request: &ActionRequest) -> Option<PathBuf> {
        request.param("destination").and_then(|name| resolve_dir(&self.base, name))
    }
}

#[async_trait]
impl CapabilityHandler for MoveFileHandler {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    async fn execute(&self, request: &ActionRequest, dry_run: bool) -> Result<CapabilityReply> {
        let Some(filename) = request.param("filename") else {
            return Ok(CapabilityReply::Completed(ActionResult::failed(
                Origin::Capability,
                "No file name given.",
            )));
        };
        let Some(destination) = self.destination_dir(request) else {
            return Ok(CapabilityReply::Completed(ActionResult::failed(
                Origin::Capability,
                "Destination directory not found.",
            )));
        };

        if dry_run {
            let root = search_root(&self.base, request.param("source"));
            let matches = resolve_files(&root, filename);
            if matches.is_empty() {
                return Ok(CapabilityReply::Completed(ActionResult::failed(
                    Origin::Capability,
                    "No matching file found.",
                )));
            }
            return Ok(CapabilityReply::Planned(ActionPlan {
                action_name: "filesystem.move".to_string(),
                targets: matches.iter().map(|path| path.display().to_string()).collect(),
                destructive: true,
                description: format!("Move {filename} → {}", destination.display()),
            }));
        }

        let Some(source) = request.param("target") else {
            return Ok(CapabilityReply::Completed(ActionResult::failed(
                Origin::Capability,
                "Missing commit target.",
            )));
        };
        Ok(CapabilityReply::Completed(move_one(Path::new(source), &destination)))
    }
}

fn move_one(source: &Path, destination_dir: &Path) -> ActionResult {
    let Some(file_name) = source.file_name() else {
        return ActionResult::failed(Origin::Capability, "Invalid source path.");
    };
    let destination = destination_dir.join(file_name);
    if destination.exists() {
        return ActionResult::failed(
            Origin::Capability,
            format!("{} already exists at the destination.", destination.display()),
        );
    }
    match fs::rename(source, &destination) {
        Ok(()) => {
            ActionResult::ok(Origin::Capability, format!("moved to {}", destination.display()))
        }
        Err(error) => ActionResult::failed(Origin::Capability, format!("could not move: {error}")),
    }
}
