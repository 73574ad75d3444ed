//! Session-bus proxy, connection helpers, and CLI errors.

#![allow(clippy::too_many_arguments)]

use std::error::Error as _;

use thiserror::Error;
use zbus::proxy::CacheProperties;
use zbus::zvariant::OwnedObjectPath;
use zbus::{Connection, proxy};

/// Reply shape shared by every dispatcher method.
pub(crate) type WireReply = (String, OwnedObjectPath, String);

#[proxy(
    interface = "org.filebus.Operations",
    default_service = "org.filebus.Operations",
    default_path = "/org/filebus/Operations",
    gen_blocking = false
)]
pub(crate) trait Operations {
    fn new_list_job(&self, path: &str, flags: i32) -> zbus::Result<WireReply>;

    fn new_stat_job(&self, path: &str) -> zbus::Result<WireReply>;

    fn new_delete_job(
        &self,
        paths: &[String],
        should_confirm: bool,
        dest: &str,
        obj_path: &str,
        iface: &str,
    ) -> zbus::Result<WireReply>;

    fn new_trash_job(
        &self,
        paths: &[String],
        should_confirm: bool,
        dest: &str,
        obj_path: &str,
        iface: &str,
    ) -> zbus::Result<WireReply>;

    fn new_empty_trash_job(
        &self,
        should_confirm: bool,
        dest: &str,
        obj_path: &str,
        iface: &str,
    ) -> zbus::Result<WireReply>;

    fn new_chmod_job(&self, path: &str, permission: u32) -> zbus::Result<WireReply>;

    fn new_chown_job(&self, path: &str, new_owner: &str, new_group: &str)
    -> zbus::Result<WireReply>;

    fn new_create_file_job(
        &self,
        dest_dir: &str,
        file_name: &str,
        init_content: &str,
        dest: &str,
        obj_path: &str,
        iface: &str,
    ) -> zbus::Result<WireReply>;

    fn new_create_directory_job(
        &self,
        dest_dir: &str,
        dir_name: &str,
        dest: &str,
        obj_path: &str,
        iface: &str,
    ) -> zbus::Result<WireReply>;

    fn new_create_file_from_template_job(
        &self,
        dest_dir: &str,
        template_path: &str,
        dest: &str,
        obj_path: &str,
        iface: &str,
    ) -> zbus::Result<WireReply>;

    fn new_link_job(
        &self,
        src: &str,
        dest_dir: &str,
        dest: &str,
        obj_path: &str,
        iface: &str,
    ) -> zbus::Result<WireReply>;

    fn new_get_default_launch_app_job(
        &self,
        path: &str,
        must_support_uri: bool,
    ) -> zbus::Result<WireReply>;

    fn new_get_recommended_launch_apps_job(&self, uri: &str) -> zbus::Result<WireReply>;

    fn new_get_all_launch_apps_job(&self) -> zbus::Result<WireReply>;

    fn new_set_default_launch_app_job(&self, id: &str, mime_type: &str)
    -> zbus::Result<WireReply>;

    fn new_copy_job(
        &self,
        srcs: &[String],
        dest_dir: &str,
        target_name: &str,
        flags: u32,
        dest: &str,
        obj_path: &str,
        iface: &str,
    ) -> zbus::Result<WireReply>;

    fn new_move_job(
        &self,
        paths: &[String],
        dest_dir: &str,
        target_name: &str,
        flags: u32,
        dest: &str,
        obj_path: &str,
        iface: &str,
    ) -> zbus::Result<WireReply>;

    fn new_rename_job(&self, file_url: &str, new_name: &str) -> zbus::Result<WireReply>;

    fn new_get_template_job(&self) -> zbus::Result<WireReply>;
}

/// Build a proxy for the dispatcher at `destination` and `object_path`.
pub(crate) async fn operations_proxy<'a>(
    connection: &Connection,
    destination: &'a str,
    object_path: &'a str,
) -> CliResult<OperationsProxy<'a>> {
    OperationsProxy::builder(connection)
        .destination(destination)
        .and_then(|builder| builder.path(object_path))
        .map(|builder| builder.cache_properties(CacheProperties::No))
        .map_err(|source| CliError::Target {
            destination: destination.to_string(),
            object_path: object_path.to_string(),
            source,
        })?
        .build()
        .await
        .map_err(|source| CliError::Connect { source })
}

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("session bus connection failed")]
    Connect { source: zbus::Error },
    #[error("invalid dispatcher address")]
    Target {
        destination: String,
        object_path: String,
        source: zbus::Error,
    },
    #[error("dispatcher call failed")]
    Call {
        operation: &'static str,
        source: zbus::Error,
    },
    #[error(transparent)]
    Failure(anyhow::Error),
}

pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Connect { .. } | Self::Target { .. } | Self::Call { .. } | Self::Failure(_) => 1,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Failure(error) => format!("{error:#}"),
            Self::Call { operation, .. } => self.chain(&format!("{self} ({operation})")),
            Self::Target {
                destination,
                object_path,
                ..
            } => self.chain(&format!("{self} ({destination} {object_path})")),
            Self::Connect { .. } => self.chain(&self.to_string()),
        }
    }

    fn chain(&self, head: &str) -> String {
        let mut message = head.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}
