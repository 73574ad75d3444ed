//! Wire requests and their resolution into engine descriptors.
//!
//! # Design
//! - [`OperationRequest`] carries the caller's arguments exactly as received.
//! - [`OperationRequest::resolve`] normalizes primary paths first, then checks secondary
//!   arguments; the first failure wins and nothing reaches the engine.

use filebus_jobs::{
    DelegateIdentity, JobDescriptor, ListFlags, OperationKind, TransferFlags, TransferRequest,
};
use url::Url;

use crate::error::{DispatchError, DispatchResult};
use crate::normalize::normalize;
use crate::templates::TemplateLocator;

/// Suffix every desktop-entry identifier must carry.
pub const DESKTOP_ENTRY_SUFFIX: &str = ".desktop";

/// Copy and move arguments as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferArgs {
    /// Source paths.
    pub sources: Vec<String>,
    /// Destination directory; empty means "let the engine decide".
    pub dest_dir: String,
    /// New name for a single source; empty keeps the source name.
    pub target_name: String,
    /// Raw transfer flags.
    pub flags: u32,
}

/// One remote call, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum OperationRequest {
    List {
        path: String,
        flags: i32,
    },
    Stat {
        path: String,
    },
    Delete {
        paths: Vec<String>,
        should_confirm: bool,
        ui: DelegateIdentity,
    },
    Trash {
        paths: Vec<String>,
        should_confirm: bool,
        ui: DelegateIdentity,
    },
    EmptyTrash {
        should_confirm: bool,
        ui: DelegateIdentity,
    },
    Chmod {
        path: String,
        permission: u32,
    },
    Chown {
        path: String,
        owner: String,
        group: String,
    },
    CreateFile {
        dest_dir: String,
        file_name: String,
        content: Vec<u8>,
        ui: DelegateIdentity,
    },
    CreateDirectory {
        dest_dir: String,
        dir_name: String,
        ui: DelegateIdentity,
    },
    CreateFileFromTemplate {
        dest_dir: String,
        template: String,
        ui: DelegateIdentity,
    },
    Link {
        source: String,
        dest_dir: String,
        ui: DelegateIdentity,
    },
    Rename {
        path: String,
        new_name: String,
    },
    GetDefaultLaunchApp {
        path: String,
        must_support_uri: bool,
    },
    GetRecommendedLaunchApps {
        path: String,
    },
    GetAllLaunchApps,
    SetDefaultLaunchApp {
        desktop_id: String,
        mime_type: String,
    },
    Copy {
        args: TransferArgs,
        ui: DelegateIdentity,
    },
    Move {
        args: TransferArgs,
        ui: DelegateIdentity,
    },
    GetTemplate,
}

/// A validated request ready for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    /// Typed engine parameters.
    pub descriptor: JobDescriptor,
    /// UI handler to bridge, for kinds that accept one.
    pub ui: Option<DelegateIdentity>,
}

impl OperationRequest {
    /// Operation kind of the request.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::List { .. } => OperationKind::List,
            Self::Stat { .. } => OperationKind::Stat,
            Self::Delete { .. } => OperationKind::Delete,
            Self::Trash { .. } => OperationKind::Trash,
            Self::EmptyTrash { .. } => OperationKind::EmptyTrash,
            Self::Chmod { .. } => OperationKind::Chmod,
            Self::Chown { .. } => OperationKind::Chown,
            Self::CreateFile { .. } => OperationKind::CreateFile,
            Self::CreateDirectory { .. } => OperationKind::CreateDirectory,
            Self::CreateFileFromTemplate { .. } => OperationKind::CreateFileFromTemplate,
            Self::Link { .. } => OperationKind::Link,
            Self::Rename { .. } => OperationKind::Rename,
            Self::GetDefaultLaunchApp { .. } => OperationKind::GetDefaultLaunchApp,
            Self::GetRecommendedLaunchApps { .. } => OperationKind::GetRecommendedLaunchApps,
            Self::GetAllLaunchApps => OperationKind::GetAllLaunchApps,
            Self::SetDefaultLaunchApp { .. } => OperationKind::SetDefaultLaunchApp,
            Self::Copy { .. } => OperationKind::Copy,
            Self::Move { .. } => OperationKind::Move,
            Self::GetTemplate => OperationKind::GetTemplate,
        }
    }

    /// Validate and normalize the request.
    ///
    /// # Errors
    ///
    /// Returns the first [`DispatchError`] raised by a path or argument check.
    pub fn resolve(self, templates: &TemplateLocator) -> DispatchResult<ResolvedRequest> {
        let kind = self.kind();
        let plain = |descriptor| ResolvedRequest {
            descriptor,
            ui: None,
        };
        let interactive = |descriptor, ui| ResolvedRequest {
            descriptor,
            ui: Some(ui),
        };

        let resolved = match self {
            Self::List { path, flags } => plain(JobDescriptor::List {
                target: path_arg(kind, "path", &path)?,
                flags: ListFlags::from_wire(flags),
            }),
            Self::Stat { path } => plain(JobDescriptor::Stat {
                target: path_arg(kind, "path", &path)?,
            }),
            Self::Delete {
                paths,
                should_confirm,
                ui,
            } => interactive(
                JobDescriptor::Delete {
                    targets: path_args(kind, "paths", &paths)?,
                    should_confirm,
                },
                ui,
            ),
            Self::Trash {
                paths,
                should_confirm,
                ui,
            } => interactive(
                JobDescriptor::Trash {
                    targets: path_args(kind, "paths", &paths)?,
                    should_confirm,
                },
                ui,
            ),
            Self::EmptyTrash { should_confirm, ui } => {
                interactive(JobDescriptor::EmptyTrash { should_confirm }, ui)
            }
            Self::Chmod { path, permission } => plain(JobDescriptor::Chmod {
                target: path_arg(kind, "path", &path)?,
                permission,
            }),
            Self::Chown { path, owner, group } => plain(JobDescriptor::Chown {
                target: path_arg(kind, "path", &path)?,
                owner,
                group,
            }),
            Self::CreateFile {
                dest_dir,
                file_name,
                content,
                ui,
            } => interactive(
                JobDescriptor::CreateFile {
                    dest_dir: path_arg(kind, "dest_dir", &dest_dir)?,
                    file_name,
                    content,
                },
                ui,
            ),
            Self::CreateDirectory {
                dest_dir,
                dir_name,
                ui,
            } => interactive(
                JobDescriptor::CreateDirectory {
                    dest_dir: path_arg(kind, "dest_dir", &dest_dir)?,
                    dir_name,
                },
                ui,
            ),
            Self::CreateFileFromTemplate {
                dest_dir,
                template,
                ui,
            } => {
                let dest_dir = path_arg(kind, "dest_dir", &dest_dir)?;
                let template = path_arg(kind, "template", &template)?;
                interactive(
                    JobDescriptor::CreateFileFromTemplate { dest_dir, template },
                    ui,
                )
            }
            Self::Link {
                source,
                dest_dir,
                ui,
            } => {
                let source = path_arg(kind, "source", &source)?;
                let dest_dir = path_arg(kind, "dest_dir", &dest_dir)?;
                interactive(JobDescriptor::Link { source, dest_dir }, ui)
            }
            Self::Rename { path, new_name } => plain(JobDescriptor::Rename {
                target: path_arg(kind, "path", &path)?,
                new_name,
            }),
            Self::GetDefaultLaunchApp {
                path,
                must_support_uri,
            } => plain(JobDescriptor::GetDefaultLaunchApp {
                target: path_arg(kind, "path", &path)?,
                must_support_uri,
            }),
            Self::GetRecommendedLaunchApps { path } => {
                plain(JobDescriptor::GetRecommendedLaunchApps {
                    target: path_arg(kind, "path", &path)?,
                })
            }
            Self::GetAllLaunchApps => plain(JobDescriptor::GetAllLaunchApps),
            Self::SetDefaultLaunchApp {
                desktop_id,
                mime_type,
            } => {
                if !desktop_id.ends_with(DESKTOP_ENTRY_SUFFIX) {
                    return Err(DispatchError::InvalidArgument {
                        operation: kind,
                        field: "desktop_id",
                        reason: "missing_desktop_suffix",
                        value: Some(desktop_id),
                    });
                }
                plain(JobDescriptor::SetDefaultLaunchApp {
                    desktop_id,
                    mime_type,
                })
            }
            Self::Copy { args, ui } => interactive(JobDescriptor::Copy(transfer(kind, args)?), ui),
            Self::Move { args, ui } => interactive(JobDescriptor::Move(transfer(kind, args)?), ui),
            Self::GetTemplate => {
                let dir = templates
                    .locate()
                    .ok_or(DispatchError::TemplatesUnavailable { operation: kind })?;
                let raw = dir.to_str().ok_or_else(|| DispatchError::InvalidArgument {
                    operation: kind,
                    field: "template_dir",
                    reason: "not_utf8",
                    value: Some(dir.to_string_lossy().into_owned()),
                })?;
                plain(JobDescriptor::GetTemplate {
                    template_dir: path_arg(kind, "template_dir", raw)?,
                })
            }
        };
        Ok(resolved)
    }
}

fn path_arg(operation: OperationKind, field: &'static str, raw: &str) -> DispatchResult<Url> {
    normalize(raw).map_err(|source| DispatchError::Normalize {
        operation,
        field,
        source,
    })
}

fn path_args(
    operation: OperationKind,
    field: &'static str,
    raw: &[String],
) -> DispatchResult<Vec<Url>> {
    raw.iter()
        .map(|path| path_arg(operation, field, path))
        .collect()
}

fn transfer(operation: OperationKind, args: TransferArgs) -> DispatchResult<TransferRequest> {
    let sources = path_args(operation, "sources", &args.sources)?;
    let dest_dir = if args.dest_dir.is_empty() {
        None
    } else {
        Some(path_arg(operation, "dest_dir", &args.dest_dir)?)
    };
    Ok(TransferRequest {
        sources,
        dest_dir,
        target_name: args.target_name,
        flags: TransferFlags::from_wire(args.flags),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NormalizeError;

    fn locator() -> TemplateLocator {
        TemplateLocator::new(Some("/home/user/Templates".into()))
    }

    fn ui() -> DelegateIdentity {
        DelegateIdentity::new("org.example.Ui", "/org/example/Ui", "org.example.Ui")
    }

    #[test]
    fn list_resolves_to_a_file_reference() {
        let resolved = OperationRequest::List {
            path: "/home/user/docs".to_string(),
            flags: 1,
        }
        .resolve(&locator())
        .expect("absolute path");
        let JobDescriptor::List { target, flags } = resolved.descriptor else {
            panic!("expected list descriptor");
        };
        assert_eq!(target.as_str(), "file:///home/user/docs");
        assert_eq!(flags, ListFlags::INCLUDE_HIDDEN);
        assert!(resolved.ui.is_none());
    }

    #[test]
    fn one_bad_path_rejects_the_whole_batch() {
        let err = OperationRequest::Trash {
            paths: vec!["/tmp/a".to_string(), "tmp/b".to_string()],
            should_confirm: false,
            ui: ui(),
        }
        .resolve(&locator())
        .expect_err("relative member");
        assert!(matches!(
            err,
            DispatchError::Normalize {
                operation: OperationKind::Trash,
                field: "paths",
                source: NormalizeError::NotAbsolute { .. },
            }
        ));
    }

    #[test]
    fn empty_transfer_destination_skips_normalization() {
        let resolved = OperationRequest::Copy {
            args: TransferArgs {
                sources: vec!["/tmp/a".to_string()],
                dest_dir: String::new(),
                target_name: String::new(),
                flags: 1,
            },
            ui: ui(),
        }
        .resolve(&locator())
        .expect("empty destination allowed");
        let JobDescriptor::Copy(request) = resolved.descriptor else {
            panic!("expected copy descriptor");
        };
        assert_eq!(request.dest_dir, None);
        assert_eq!(request.flags, TransferFlags::OVERWRITE);
        assert_eq!(resolved.ui, Some(ui()));
    }

    #[test]
    fn bad_transfer_destination_is_fatal() {
        let err = OperationRequest::Move {
            args: TransferArgs {
                sources: vec!["/tmp/a".to_string()],
                dest_dir: "elsewhere".to_string(),
                target_name: String::new(),
                flags: 0,
            },
            ui: ui(),
        }
        .resolve(&locator())
        .expect_err("relative destination");
        assert!(matches!(
            err,
            DispatchError::Normalize {
                field: "dest_dir",
                ..
            }
        ));
    }

    #[test]
    fn primary_path_is_checked_before_secondary_arguments() {
        let err = OperationRequest::Link {
            source: "rel".to_string(),
            dest_dir: "also-rel".to_string(),
            ui: ui(),
        }
        .resolve(&locator())
        .expect_err("relative source");
        assert!(matches!(
            err,
            DispatchError::Normalize {
                field: "source",
                ..
            }
        ));
    }

    #[test]
    fn desktop_ids_need_the_suffix() {
        let err = OperationRequest::SetDefaultLaunchApp {
            desktop_id: "firefox".to_string(),
            mime_type: "text/html".to_string(),
        }
        .resolve(&locator())
        .expect_err("missing suffix");
        assert!(matches!(
            err,
            DispatchError::InvalidArgument {
                field: "desktop_id",
                ..
            }
        ));

        assert!(
            OperationRequest::SetDefaultLaunchApp {
                desktop_id: "firefox.desktop".to_string(),
                mime_type: "text/html".to_string(),
            }
            .resolve(&locator())
            .is_ok()
        );
    }

    #[test]
    fn template_listing_uses_the_located_directory() {
        let resolved = OperationRequest::GetTemplate
            .resolve(&locator())
            .expect("templates located");
        assert_eq!(
            resolved.descriptor,
            JobDescriptor::GetTemplate {
                template_dir: Url::parse("file:///home/user/Templates").expect("url"),
            }
        );
    }

    #[test]
    fn kinds_match_their_descriptors() {
        let resolved = OperationRequest::EmptyTrash {
            should_confirm: true,
            ui: ui(),
        }
        .resolve(&locator())
        .expect("no paths");
        assert_eq!(resolved.descriptor.kind(), OperationKind::EmptyTrash);
        assert!(resolved.descriptor.confirmation_requested());
    }
}
