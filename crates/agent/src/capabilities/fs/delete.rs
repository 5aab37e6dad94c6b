//! File deletion capability. High risk; never commits without a confirmed
//! plan.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;

use steward_core::contract::{ActionPlan, ActionRequest, ActionResult, Origin, RiskLevel};
use steward_core::intent::IntentKind;
use steward_core::registry::{CapabilityDescriptor, CapabilityHandler, CapabilityReply};

use super::resolver::resolve_files;
use super::search_root;

pub struct DeleteFileHandler {
    descriptor: CapabilityDescriptor,
    base: PathBuf,
}

impl DeleteFileHandler {
    pub fn new(base: PathBuf) -> Self {
        Self {
            descriptor: CapabilityDescriptor::new(IntentKind::ContentDelete, "filesystem.delete")
                .with_risk(RiskLevel::High)
                .destructive(),
            base,
        }
    }
}

#[async_trait]
impl CapabilityHandler for DeleteFileHandler {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    async fn execute(&self, request: &ActionRequest, dry_run: bool) -> Result<CapabilityReply> {
        if dry_run {
            let Some(filename) = request.param("filename") else {
                return Ok(CapabilityReply::Completed(ActionResult::failed(
                    Origin::Capability,
                    "No file name given.",
                )));
            };
            let root = search_root(&self.base, request.param("path"));
            let matches = resolve_files(&root, filename);
            if matches.is_empty() {
                return Ok(CapabilityReply::Completed(ActionResult::failed(
                    Origin::Capability,
                    "No matching file found.",
                )));
            }
            return Ok(CapabilityReply::Planned(ActionPlan {
                action_name: "filesystem.delete".to_string(),
                targets: matches.iter().map(|path| path.display().to_string()).collect(),
                destructive: true,
                description: "Delete the following file(s):".to_string(),
            }));
        }

        let Some(target) = request.param("target") else {
            return Ok(CapabilityReply::Completed(ActionResult::failed(
                Origin::Capability,
                "Missing commit target.",
            )));
        };
        let result = match fs::remove_file(target) {
            Ok(()) => ActionResult::ok(Origin::Capability, "deleted"),
            Err(error) => {
                ActionResult::failed(Origin::Capability, format!("could not delete: {error}"))
            }
        };
        Ok(CapabilityReply::Completed(result))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use tempfile::tempdir;

    use steward_core::contract::ActionRequest;
    use steward_core::intent::{Intent, IntentKind};
    use steward_core::registry::{CapabilityHandler, CapabilityReply};

    use super::DeleteFileHandler;

    fn request(filename: &str) -> ActionRequest {
        let mut params = BTreeMap::new();
        params.insert("filename".to_string(), filename.to_string());
        ActionRequest::new(Intent::new(IntentKind::ContentDelete, "delete it"), params)
    }

    #[tokio::test]
    async fn dry_run_plans_without_deleting() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");
        std::fs::write(&path, "x").unwrap();
        let handler = DeleteFileHandler::new(dir.path().to_path_buf());

        let reply = handler.execute(&request("report.txt"), true).await.unwrap();
        let CapabilityReply::Planned(plan) = reply else { panic!("expected plan") };
        assert!(plan.destructive);
        assert_eq!(plan.targets.len(), 1);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn commit_deletes_the_confirmed_target() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");
        std::fs::write(&path, "x").unwrap();
        let handler = DeleteFileHandler::new(dir.path().to_path_buf());

        let req = request("report.txt").for_target(&path.display().to_string());
        let committed = handler.execute(&req, false);
        let CapabilityReply::Completed(result) = committed.await.unwrap() else {
            panic!("expected result")
        };
        assert!(result.succeeded);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn planning_a_missing_file_completes_with_a_failure() {
        let dir = tempdir().unwrap();
        let handler = DeleteFileHandler::new(dir.path().to_path_buf());

        let reply = handler.execute(&request("ghost.txt"), true).await.unwrap();
        let CapabilityReply::Completed(result) = reply else { panic!("expected result") };
        assert!(!result.succeeded);
    }
}
