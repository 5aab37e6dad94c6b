//! File creation and append capabilities. Both are destructive in the
//! contract sense: they plan with a diff-style preview and commit only
//! after confirmation.

use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;

use steward_core::contract::{ActionPlan, ActionRequest, ActionResult, Origin, RiskLevel};
use steward_core::intent::IntentKind;
use steward_core::registry::{CapabilityDescriptor, CapabilityHandler, CapabilityReply};

use super::resolver::resolve_files;
use super::search_root;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WriteMode {
    Create,
    Append,
}

pub struct WriteFileHandler {
    descriptor: CapabilityDescriptor,
    base: PathBuf,
    mode: WriteMode,
}

impl WriteFileHandler {
    pub fn create(base: PathBuf) -> Self {
        Self {
            descriptor: CapabilityDescriptor::new(IntentKind::ContentCreate, "filesystem.create")
                .with_risk(RiskLevel::Medium)
                .destructive(),
            base,
            mode: WriteMode::Create,
        }
    }

    pub fn append(base: PathBuf) -> Self {
        Self {
            descriptor: CapabilityDescriptor::new(IntentKind::ContentModify, "filesystem.append")
                .with_risk(RiskLevel::Medium)
                .destructive(),
            base,
            mode: WriteMode::Append,
        }
    }

    fn plan(&self, request: &ActionRequest) -> CapabilityReply {
        let Some(filename) = request.param("filename") else {
            return CapabilityReply::Completed(ActionResult::failed(
                Origin::Capability,
                "No file name given.",
            ));
        };
        let content = request.param("content").unwrap_or("");
        let root = search_root(&self.base, request.param("path"));

        match self.mode {
            WriteMode::Create => {
                let target = root.join(filename);
                if target.exists() {
                    return CapabilityReply::Completed(ActionResult::failed(
                        Origin::Capability,
                        format!("{} already exists.", target.display()),
                    ));
                }
                CapabilityReply::Planned(ActionPlan {
                    action_name: "filesystem.create".to_string(),
                    targets: vec![target.display().to_string()],
                    destructive: true,
                    description: format!(
                        "Create {} with:\n{}",
                        target.display(),
                        diff_preview(content)
                    ),
                })
            }
            WriteMode::Append => {
                if content.is_empty() {
                    return CapabilityReply::Completed(ActionResult::failed(
                        Origin::Capability,
                        "Nothing to append.",
                    ));
                }
                let matches = resolve_files(&root, filename);
                if matches.is_empty() {
                    return CapabilityReply::Completed(ActionResult::failed(
                        Origin::Capability,
                        "No matching file found.",
                    ));
                }
                CapabilityReply::Planned(ActionPlan {
                    action_name: "filesystem.append".to_string(),
                    targets: matches.iter().map(|path| path.display().to_string()).collect(),
                    destructive: true,
                    description: format!("Append to {filename}:\n{}", diff_preview(content)),
                })
            }
        }
    }

    fn commit(&self, request: &ActionRequest) -> ActionResult {
        let Some(target) = request.param("target") else {
            return ActionResult::failed(Origin::Capability, "Missing commit target.");
        };
        let content = request.param("content").unwrap_or("");
        let path = PathBuf::from(target);

        let outcome = match self.mode {
            WriteMode::Create => {
                if path.exists() {
                    Err(format!("{} already exists.", path.display()))
                } else {
                    fs::write(&path, content).map_err(|error| error.to_string())
                }
            }
            WriteMode::Append => OpenOptions::new()
                .append(true)
                .open(&path)
                .and_then(|mut file| writeln!(file, "{content}"))
                .map_err(|error| error.to_string()),
        };

        match outcome {
            Ok(()) => ActionResult::ok(Origin::Capability, format!("wrote {}", path.display())),
            Err(detail) => {
                ActionResult::failed(Origin::Capability, format!("could not write: {detail}"))
            }
        }
    }
}

fn diff_preview(content: &str) -> String {
    if content.is_empty() {
        return "+ (empty file)".to_string();
    }
    content.lines().map(|line| format!("+ {line}")).collect::<Vec<_>>().join("\n")
}

#[async_trait]
impl CapabilityHandler for WriteFileHandler {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    async fn execute(&self, request: &ActionRequest, dry_run: bool) -> Result<CapabilityReply> {
        if dry_run {
            Ok(self.plan(request))
        } else {
            Ok(CapabilityReply::Completed(self.commit(request)))
        }
    }
}
