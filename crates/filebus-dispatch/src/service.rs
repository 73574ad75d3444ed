//! The `org.filebus.Operations` bus interface.
//!
//! Every method replies `(destination, object_path, interface)`. Recoverable failures never
//! surface as D-Bus errors: they are logged and answered with the sentinel address, whose empty
//! interface is the caller's failure signal.

use std::error::Error as _;

use filebus_jobs::DelegateIdentity;
use tracing::error;
use zbus::zvariant::OwnedObjectPath;

use crate::dispatcher::Dispatcher;
use crate::request::{OperationRequest, TransferArgs};

/// Interface name the backend is served under.
pub const OPERATIONS_INTERFACE: &str = "org.filebus.Operations";

/// Wire form of a job address.
pub type WireAddress = (String, OwnedObjectPath, String);

/// Bus-facing entry point of the dispatcher.
pub struct OperationBackend {
    dispatcher: Dispatcher,
}

impl OperationBackend {
    /// Serve requests through `dispatcher`.
    #[must_use]
    pub const fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Dispatch `request`, collapsing any failure into the sentinel address.
    pub async fn respond(&self, request: OperationRequest) -> WireAddress {
        match self.dispatcher.dispatch(request).await {
            Ok(address) => address.into_wire(),
            Err(err) => {
                error!(
                    error = %err,
                    cause = ?err.source(),
                    operation = %err.operation(),
                    "request produced no job; replying with sentinel address"
                );
                self.dispatcher.sentinel().into_wire()
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
#[zbus::interface(name = "org.filebus.Operations")]
impl OperationBackend {
    async fn new_list_job(&self, path: String, flags: i32) -> WireAddress {
        self.respond(OperationRequest::List { path, flags }).await
    }

    async fn new_stat_job(&self, path: String) -> WireAddress {
        self.respond(OperationRequest::Stat { path }).await
    }

    async fn new_delete_job(
        &self,
        paths: Vec<String>,
        should_confirm: bool,
        dest: String,
        obj_path: String,
        iface: String,
    ) -> WireAddress {
        self.respond(OperationRequest::Delete {
            paths,
            should_confirm,
            ui: DelegateIdentity::new(dest, obj_path, iface),
        })
        .await
    }

    async fn new_trash_job(
        &self,
        paths: Vec<String>,
        should_confirm: bool,
        dest: String,
        obj_path: String,
        iface: String,
    ) -> WireAddress {
        self.respond(OperationRequest::Trash {
            paths,
            should_confirm,
            ui: DelegateIdentity::new(dest, obj_path, iface),
        })
        .await
    }

    async fn new_empty_trash_job(
        &self,
        should_confirm: bool,
        dest: String,
        obj_path: String,
        iface: String,
    ) -> WireAddress {
        self.respond(OperationRequest::EmptyTrash {
            should_confirm,
            ui: DelegateIdentity::new(dest, obj_path, iface),
        })
        .await
    }

    async fn new_chmod_job(&self, path: String, permission: u32) -> WireAddress {
        self.respond(OperationRequest::Chmod { path, permission })
            .await
    }

    async fn new_chown_job(
        &self,
        path: String,
        new_owner: String,
        new_group: String,
    ) -> WireAddress {
        self.respond(OperationRequest::Chown {
            path,
            owner: new_owner,
            group: new_group,
        })
        .await
    }

    async fn new_create_file_job(
        &self,
        dest_dir: String,
        file_name: String,
        init_content: String,
        dest: String,
        obj_path: String,
        iface: String,
    ) -> WireAddress {
        self.respond(OperationRequest::CreateFile {
            dest_dir,
            file_name,
            content: init_content.into_bytes(),
            ui: DelegateIdentity::new(dest, obj_path, iface),
        })
        .await
    }

    async fn new_create_directory_job(
        &self,
        dest_dir: String,
        dir_name: String,
        dest: String,
        obj_path: String,
        iface: String,
    ) -> WireAddress {
        self.respond(OperationRequest::CreateDirectory {
            dest_dir,
            dir_name,
            ui: DelegateIdentity::new(dest, obj_path, iface),
        })
        .await
    }

    async fn new_create_file_from_template_job(
        &self,
        dest_dir: String,
        template_path: String,
        dest: String,
        obj_path: String,
        iface: String,
    ) -> WireAddress {
        self.respond(OperationRequest::CreateFileFromTemplate {
            dest_dir,
            template: template_path,
            ui: DelegateIdentity::new(dest, obj_path, iface),
        })
        .await
    }

    async fn new_link_job(
        &self,
        src: String,
        dest_dir: String,
        dest: String,
        obj_path: String,
        iface: String,
    ) -> WireAddress {
        self.respond(OperationRequest::Link {
            source: src,
            dest_dir,
            ui: DelegateIdentity::new(dest, obj_path, iface),
        })
        .await
    }

    async fn new_get_default_launch_app_job(
        &self,
        path: String,
        must_support_uri: bool,
    ) -> WireAddress {
        self.respond(OperationRequest::GetDefaultLaunchApp {
            path,
            must_support_uri,
        })
        .await
    }

    async fn new_get_recommended_launch_apps_job(&self, uri: String) -> WireAddress {
        self.respond(OperationRequest::GetRecommendedLaunchApps { path: uri })
            .await
    }

    async fn new_get_all_launch_apps_job(&self) -> WireAddress {
        self.respond(OperationRequest::GetAllLaunchApps).await
    }

    async fn new_set_default_launch_app_job(&self, id: String, mime_type: String) -> WireAddress {
        self.respond(OperationRequest::SetDefaultLaunchApp {
            desktop_id: id,
            mime_type,
        })
        .await
    }

    async fn new_copy_job(
        &self,
        srcs: Vec<String>,
        dest_dir: String,
        target_name: String,
        flags: u32,
        dest: String,
        obj_path: String,
        iface: String,
    ) -> WireAddress {
        self.respond(OperationRequest::Copy {
            args: TransferArgs {
                sources: srcs,
                dest_dir,
                target_name,
                flags,
            },
            ui: DelegateIdentity::new(dest, obj_path, iface),
        })
        .await
    }

    async fn new_move_job(
        &self,
        paths: Vec<String>,
        dest_dir: String,
        target_name: String,
        flags: u32,
        dest: String,
        obj_path: String,
        iface: String,
    ) -> WireAddress {
        self.respond(OperationRequest::Move {
            args: TransferArgs {
                sources: paths,
                dest_dir,
                target_name,
                flags,
            },
            ui: DelegateIdentity::new(dest, obj_path, iface),
        })
        .await
    }

    async fn new_rename_job(&self, file_url: String, new_name: String) -> WireAddress {
        self.respond(OperationRequest::Rename {
            path: file_url,
            new_name,
        })
        .await
    }

    async fn new_get_template_job(&self) -> WireAddress {
        self.respond(OperationRequest::GetTemplate).await
    }
}
