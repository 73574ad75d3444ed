//! Output renderers and exit codes for dispatcher replies.

use anyhow::anyhow;
use filebus_jobs::{JobAddress, OperationKind};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

/// Exit status when the dispatcher installed a job.
pub(crate) const EXIT_INSTALLED: i32 = 0;
/// Exit status when the dispatcher answered with the sentinel address.
pub(crate) const EXIT_SENTINEL: i32 = 2;

#[derive(Serialize)]
struct AddressReport<'a> {
    operation: OperationKind,
    installed: bool,
    #[serde(flatten)]
    address: &'a JobAddress,
}

pub(crate) fn render_address(
    operation: OperationKind,
    address: &JobAddress,
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => {
            let report = AddressReport {
                operation,
                installed: address.is_installed(),
                address,
            };
            serde_json::to_string_pretty(&report)
                .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
        }
        OutputFormat::Text if address.is_installed() => Ok(format!(
            "{operation} job installed\n  destination: {}\n  object path: {}\n  interface:   {}",
            address.destination,
            address.object_path.as_str(),
            address.interface
        )),
        OutputFormat::Text => Ok(format!(
            "{operation}: no job installed (dispatcher replied with {})",
            address.object_path.as_str()
        )),
    }
}

#[must_use]
pub(crate) fn exit_code(address: &JobAddress) -> i32 {
    if address.is_installed() {
        EXIT_INSTALLED
    } else {
        EXIT_SENTINEL
    }
}
