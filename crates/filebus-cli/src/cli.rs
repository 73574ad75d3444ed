//! Argument parsing and command dispatch.

use clap::{Args, Parser, Subcommand, ValueEnum};
use filebus_config::defaults::{
    DEFAULT_DESTINATION, DEFAULT_OBJECT_PATH, ENV_DESTINATION, ENV_OBJECT_PATH,
};
use filebus_jobs::{JobAddress, ListFlags, OperationKind, TransferFlags};
use zbus::Connection;

use crate::client::{CliError, CliResult, OperationsProxy, operations_proxy};
use crate::output::{exit_code, render_address};

/// Parses CLI arguments, asks the dispatcher for the job, and prints its address.
/// Returns the process exit code: 0 when a job was installed, 2 when the dispatcher
/// answered with its sentinel address, 1 when the bus could not be reached.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    match execute(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn execute(cli: Cli) -> CliResult<i32> {
    let Cli {
        destination,
        object_path,
        output,
        command,
    } = cli;
    let connection = Connection::session()
        .await
        .map_err(|source| CliError::Connect { source })?;
    let proxy = operations_proxy(&connection, &destination, &object_path).await?;

    let operation = command.kind();
    let address = invoke(&proxy, command)
        .await
        .map_err(|source| CliError::Call {
            operation: operation.as_str(),
            source,
        })?;
    println!("{}", render_address(operation, &address, output)?);
    Ok(exit_code(&address))
}

#[derive(Parser, Debug)]
#[command(
    name = "filebus",
    about = "Request file-operation jobs from the filebus dispatcher"
)]
pub(crate) struct Cli {
    /// Bus name the dispatcher owns.
    #[arg(long, global = true, env = ENV_DESTINATION, default_value = DEFAULT_DESTINATION)]
    destination: String,
    /// Object path the dispatcher is served at.
    #[arg(long, global = true, env = ENV_OBJECT_PATH, default_value = DEFAULT_OBJECT_PATH)]
    object_path: String,
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Caller-side handler that answers the job's prompts. Left empty, the job runs without one.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct UiArgs {
    /// Bus name of the UI handler.
    #[arg(long = "ui-destination", default_value = "")]
    destination: String,
    /// Object path of the UI handler.
    #[arg(long = "ui-path", default_value = "")]
    object_path: String,
    /// Interface the UI handler implements.
    #[arg(long = "ui-interface", default_value = "")]
    interface: String,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ListArgs {
    /// Directory to enumerate.
    path: String,
    /// Include dot-files.
    #[arg(long)]
    hidden: bool,
    /// Descend into subdirectories.
    #[arg(long)]
    recursive: bool,
}

impl ListArgs {
    fn flags(&self) -> ListFlags {
        let mut flags = ListFlags::empty();
        flags.set(ListFlags::INCLUDE_HIDDEN, self.hidden);
        flags.set(ListFlags::RECURSIVE, self.recursive);
        flags
    }
}

#[derive(Args, Debug, Clone)]
pub(crate) struct RemoveArgs {
    /// Files to remove.
    #[arg(required = true)]
    paths: Vec<String>,
    /// Ask the UI handler before removing anything.
    #[arg(long)]
    confirm: bool,
    #[command(flatten)]
    ui: UiArgs,
}

#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct TransferArgs {
    /// Files to transfer.
    #[arg(required = true)]
    sources: Vec<String>,
    /// Destination directory; omitted lets the engine choose.
    #[arg(long = "to", default_value = "")]
    dest_dir: String,
    /// New name for a single transferred file.
    #[arg(long = "name", default_value = "")]
    target_name: String,
    /// Replace existing targets.
    #[arg(long)]
    overwrite: bool,
    /// Keep a backup of replaced targets.
    #[arg(long)]
    backup: bool,
    /// Copy symbolic links instead of their targets.
    #[arg(long)]
    no_follow_symlinks: bool,
    /// Preserve all metadata.
    #[arg(long)]
    all_metadata: bool,
    /// Fail a move instead of falling back to copy and delete.
    #[arg(long)]
    no_fallback_for_move: bool,
    /// Give new files default permissions instead of the source's.
    #[arg(long)]
    target_default_perms: bool,
    #[command(flatten)]
    ui: UiArgs,
}

impl TransferArgs {
    fn flags(&self) -> TransferFlags {
        let mut flags = TransferFlags::empty();
        flags.set(TransferFlags::OVERWRITE, self.overwrite);
        flags.set(TransferFlags::BACKUP, self.backup);
        flags.set(TransferFlags::NOFOLLOW_SYMLINKS, self.no_follow_symlinks);
        flags.set(TransferFlags::ALL_METADATA, self.all_metadata);
        flags.set(TransferFlags::NO_FALLBACK_FOR_MOVE, self.no_fallback_for_move);
        flags.set(TransferFlags::TARGET_DEFAULT_PERMS, self.target_default_perms);
        flags
    }
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Command {
    /// Enumerate a directory.
    List(ListArgs),
    /// Query file metadata.
    Stat {
        /// File to inspect.
        path: String,
    },
    /// Delete files permanently.
    Delete(RemoveArgs),
    /// Move files to the trash.
    Trash(RemoveArgs),
    /// Empty the trash.
    EmptyTrash {
        /// Ask the UI handler first.
        #[arg(long)]
        confirm: bool,
        #[command(flatten)]
        ui: UiArgs,
    },
    /// Change permission bits.
    Chmod {
        /// File to change.
        path: String,
        /// Octal mode, e.g. 644.
        #[arg(value_parser = parse_mode)]
        mode: u32,
    },
    /// Change owner and group.
    Chown {
        /// File to change.
        path: String,
        /// New owner.
        owner: String,
        /// New group.
        group: String,
    },
    /// Create a file with optional initial content.
    CreateFile {
        /// Directory to create the file in.
        dest_dir: String,
        /// Name of the new file.
        name: String,
        /// Initial content.
        #[arg(long, default_value = "")]
        content: String,
        #[command(flatten)]
        ui: UiArgs,
    },
    /// Create a directory.
    Mkdir {
        /// Parent directory.
        dest_dir: String,
        /// Name of the new directory.
        name: String,
        #[command(flatten)]
        ui: UiArgs,
    },
    /// Create a file from a template.
    FromTemplate {
        /// Directory to create the file in.
        dest_dir: String,
        /// Template file to instantiate.
        template: String,
        #[command(flatten)]
        ui: UiArgs,
    },
    /// Create a symbolic link.
    Link {
        /// Link target.
        source: String,
        /// Directory receiving the link.
        dest_dir: String,
        #[command(flatten)]
        ui: UiArgs,
    },
    /// Look up the default application for a file.
    DefaultApp {
        /// File to look up.
        path: String,
        /// Only consider applications that accept URIs.
        #[arg(long)]
        must_support_uri: bool,
    },
    /// List recommended applications for a file.
    RecommendedApps {
        /// File to look up.
        uri: String,
    },
    /// List every installed application.
    AllApps,
    /// Set the default application for a MIME type.
    SetDefaultApp {
        /// Desktop entry id, e.g. org.gnome.TextEditor.desktop.
        desktop_id: String,
        /// MIME type to associate.
        mime_type: String,
    },
    /// Copy files.
    Copy(TransferArgs),
    /// Move files.
    Move(TransferArgs),
    /// Rename a file in place.
    Rename {
        /// File to rename.
        path: String,
        /// New base name.
        new_name: String,
    },
    /// Enumerate the templates directory.
    Templates,
}

impl Command {
    pub(crate) const fn kind(&self) -> OperationKind {
        match self {
            Self::List(_) => OperationKind::List,
            Self::Stat { .. } => OperationKind::Stat,
            Self::Delete(_) => OperationKind::Delete,
            Self::Trash(_) => OperationKind::Trash,
            Self::EmptyTrash { .. } => OperationKind::EmptyTrash,
            Self::Chmod { .. } => OperationKind::Chmod,
            Self::Chown { .. } => OperationKind::Chown,
            Self::CreateFile { .. } => OperationKind::CreateFile,
            Self::Mkdir { .. } => OperationKind::CreateDirectory,
            Self::FromTemplate { .. } => OperationKind::CreateFileFromTemplate,
            Self::Link { .. } => OperationKind::Link,
            Self::DefaultApp { .. } => OperationKind::GetDefaultLaunchApp,
            Self::RecommendedApps { .. } => OperationKind::GetRecommendedLaunchApps,
            Self::AllApps => OperationKind::GetAllLaunchApps,
            Self::SetDefaultApp { .. } => OperationKind::SetDefaultLaunchApp,
            Self::Copy(_) => OperationKind::Copy,
            Self::Move(_) => OperationKind::Move,
            Self::Rename { .. } => OperationKind::Rename,
            Self::Templates => OperationKind::GetTemplate,
        }
    }
}

/// Send `command` to the dispatcher and return the address it replied with.
pub(crate) async fn invoke(
    proxy: &OperationsProxy<'_>,
    command: Command,
) -> zbus::Result<JobAddress> {
    let reply = match command {
        Command::List(args) => proxy.new_list_job(&args.path, args.flags().bits()).await,
        Command::Stat { path } => proxy.new_stat_job(&path).await,
        Command::Delete(args) => {
            proxy
                .new_delete_job(
                    &args.paths,
                    args.confirm,
                    &args.ui.destination,
                    &args.ui.object_path,
                    &args.ui.interface,
                )
                .await
        }
        Command::Trash(args) => {
            proxy
                .new_trash_job(
                    &args.paths,
                    args.confirm,
                    &args.ui.destination,
                    &args.ui.object_path,
                    &args.ui.interface,
                )
                .await
        }
        Command::EmptyTrash { confirm, ui } => {
            proxy
                .new_empty_trash_job(confirm, &ui.destination, &ui.object_path, &ui.interface)
                .await
        }
        Command::Chmod { path, mode } => proxy.new_chmod_job(&path, mode).await,
        Command::Chown { path, owner, group } => proxy.new_chown_job(&path, &owner, &group).await,
        Command::CreateFile {
            dest_dir,
            name,
            content,
            ui,
        } => {
            proxy
                .new_create_file_job(
                    &dest_dir,
                    &name,
                    &content,
                    &ui.destination,
                    &ui.object_path,
                    &ui.interface,
                )
                .await
        }
        Command::Mkdir { dest_dir, name, ui } => {
            proxy
                .new_create_directory_job(
                    &dest_dir,
                    &name,
                    &ui.destination,
                    &ui.object_path,
                    &ui.interface,
                )
                .await
        }
        Command::FromTemplate {
            dest_dir,
            template,
            ui,
        } => {
            proxy
                .new_create_file_from_template_job(
                    &dest_dir,
                    &template,
                    &ui.destination,
                    &ui.object_path,
                    &ui.interface,
                )
                .await
        }
        Command::Link {
            source,
            dest_dir,
            ui,
        } => {
            proxy
                .new_link_job(
                    &source,
                    &dest_dir,
                    &ui.destination,
                    &ui.object_path,
                    &ui.interface,
                )
                .await
        }
        Command::DefaultApp {
            path,
            must_support_uri,
        } => {
            proxy
                .new_get_default_launch_app_job(&path, must_support_uri)
                .await
        }
        Command::RecommendedApps { uri } => proxy.new_get_recommended_launch_apps_job(&uri).await,
        Command::AllApps => proxy.new_get_all_launch_apps_job().await,
        Command::SetDefaultApp {
            desktop_id,
            mime_type,
        } => {
            proxy
                .new_set_default_launch_app_job(&desktop_id, &mime_type)
                .await
        }
        Command::Copy(args) => {
            proxy
                .new_copy_job(
                    &args.sources,
                    &args.dest_dir,
                    &args.target_name,
                    args.flags().bits(),
                    &args.ui.destination,
                    &args.ui.object_path,
                    &args.ui.interface,
                )
                .await
        }
        Command::Move(args) => {
            proxy
                .new_move_job(
                    &args.sources,
                    &args.dest_dir,
                    &args.target_name,
                    args.flags().bits(),
                    &args.ui.destination,
                    &args.ui.object_path,
                    &args.ui.interface,
                )
                .await
        }
        Command::Rename { path, new_name } => proxy.new_rename_job(&path, &new_name).await,
        Command::Templates => proxy.new_get_template_job().await,
    }?;
    Ok(JobAddress::from_wire(reply))
}

fn parse_mode(value: &str) -> Result<u32, String> {
    let digits = value.strip_prefix("0o").unwrap_or(value);
    match u32::from_str_radix(digits, 8) {
        Ok(mode) if mode <= 0o7777 => Ok(mode),
        _ => Err(format!("invalid octal mode: {value}")),
    }
}
