//! Session-bus implementation of [`JobBus`].
//!
//! # Design
//! - Wraps the one `zbus::Connection` opened at bootstrap; cloning shares it.
//! - Jobs export themselves through [`Job::export`], so each engine picks its own interface.
//! - Remote UI handlers are reached through an untyped proxy because their interface name is
//!   chosen by the caller.

use async_trait::async_trait;
use filebus_jobs::{
    BusError, BusResult, DelegateError, DelegateIdentity, DelegateResult, Job, JobAddress, JobBus,
    Prompt, UiDelegate, UiFlags, UiResponse,
};
use zbus::names::{BusName, InterfaceName};
use zbus::zvariant::ObjectPath;
use zbus::{Connection, Proxy};

/// Handle to the session bus shared by the dispatcher and every installed job.
#[derive(Debug, Clone)]
pub struct SessionBus {
    connection: Connection,
}

impl SessionBus {
    /// Wrap an established connection.
    #[must_use]
    pub const fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// Underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.connection
    }
}

#[async_trait]
impl JobBus for SessionBus {
    async fn install(&self, job: Box<dyn Job>) -> BusResult<JobAddress> {
        let address = job.bus_info();
        let object_path = address.object_path.as_str().to_string();
        let exported = job
            .export(self.connection.object_server())
            .await
            .map_err(|source| BusError::Export {
                object_path: object_path.clone(),
                source,
            })?;
        if !exported {
            return Err(BusError::AddressInUse { object_path });
        }
        Ok(address)
    }

    async fn ui_delegate(&self, identity: &DelegateIdentity) -> BusResult<Box<dyn UiDelegate>> {
        let destination = BusName::try_from(identity.destination.clone()).map_err(|source| {
            BusError::InvalidDelegate {
                field: "destination",
                value: identity.destination.clone(),
                source: source.into(),
            }
        })?;
        let path = ObjectPath::try_from(identity.object_path.clone()).map_err(|source| {
            BusError::InvalidDelegate {
                field: "object_path",
                value: identity.object_path.clone(),
                source: source.into(),
            }
        })?;
        let interface = InterfaceName::try_from(identity.interface.clone()).map_err(|source| {
            BusError::InvalidDelegate {
                field: "interface",
                value: identity.interface.clone(),
                source: source.into(),
            }
        })?;

        let proxy = Proxy::new(&self.connection, destination, path, interface)
            .await
            .map_err(|source| BusError::DelegateProxy { source })?;
        Ok(Box::new(RemoteUiDelegate { proxy }))
    }
}

/// UI delegate forwarding every prompt to a caller-side handler.
struct RemoteUiDelegate {
    proxy: Proxy<'static>,
}

impl RemoteUiDelegate {
    async fn dialog(
        &self,
        method: &'static str,
        prompt: &Prompt,
        flags: UiFlags,
    ) -> DelegateResult<UiResponse> {
        let reply: (i32, bool, String) = self
            .proxy
            .call(
                method,
                &(
                    prompt.primary.as_str(),
                    prompt.secondary.as_str(),
                    prompt.detail.as_str(),
                    flags.bits(),
                ),
            )
            .await
            .map_err(|source| DelegateError::Call { method, source })?;
        UiResponse::from_wire(method, reply)
    }
}

#[async_trait]
impl UiDelegate for RemoteUiDelegate {
    async fn ask_delete_confirmation(&self, prompt: &Prompt) -> DelegateResult<bool> {
        const METHOD: &str = "AskDeleteConfirmation";
        self.proxy
            .call(
                METHOD,
                &(
                    prompt.primary.as_str(),
                    prompt.secondary.as_str(),
                    prompt.detail.as_str(),
                ),
            )
            .await
            .map_err(|source| DelegateError::Call {
                method: METHOD,
                source,
            })
    }

    async fn ask_delete(&self, prompt: &Prompt, flags: UiFlags) -> DelegateResult<UiResponse> {
        self.dialog("AskDelete", prompt, flags).await
    }

    async fn ask_retry(&self, prompt: &Prompt, flags: UiFlags) -> DelegateResult<UiResponse> {
        self.dialog("AskRetry", prompt, flags).await
    }

    async fn ask_skip(&self, prompt: &Prompt, flags: UiFlags) -> DelegateResult<UiResponse> {
        self.dialog("AskSkip", prompt, flags).await
    }

    async fn conflict_dialog(&self) -> DelegateResult<UiResponse> {
        const METHOD: &str = "ConflictDialog";
        let reply: (i32, bool, String) =
            self.proxy
                .call(METHOD, &())
                .await
                .map_err(|source| DelegateError::Call {
                    method: METHOD,
                    source,
                })?;
        UiResponse::from_wire(METHOD, reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filebus_jobs::ResponseCode;
    use filebus_test_support::fixtures::{broken_identity, ui_identity};
    use std::error::Error;
    use std::sync::{Arc, Mutex};
    use tokio::net::UnixStream;
    use zbus::{Guid, connection};

    type TestResult = Result<(), Box<dyn Error>>;
    type PromptLog = Arc<Mutex<Vec<(String, i32)>>>;

    /// Caller-side handler with fixed answers; records the prompts it receives.
    struct ScriptedHandler {
        seen: PromptLog,
    }

    impl ScriptedHandler {
        fn record(&self, primary: String, flags: i32) {
            self.seen.lock().expect("prompt log").push((primary, flags));
        }
    }

    #[zbus::interface(name = "org.filebus.FileOperationsUi")]
    impl ScriptedHandler {
        async fn ask_delete_confirmation(
            &self,
            primary: String,
            _secondary: String,
            _detail: String,
        ) -> bool {
            self.record(primary, 0);
            true
        }

        async fn ask_delete(
            &self,
            primary: String,
            _secondary: String,
            _detail: String,
            flags: i32,
        ) -> (i32, bool, String) {
            self.record(primary, flags);
            (ResponseCode::Delete.code(), true, String::new())
        }

        async fn ask_retry(
            &self,
            primary: String,
            _secondary: String,
            _detail: String,
            flags: i32,
        ) -> (i32, bool, String) {
            self.record(primary, flags);
            (3, false, String::new())
        }

        async fn ask_skip(
            &self,
            primary: String,
            _secondary: String,
            _detail: String,
            flags: i32,
        ) -> (i32, bool, String) {
            self.record(primary, flags);
            (ResponseCode::Skip.code(), false, String::new())
        }

        async fn conflict_dialog(&self) -> (i32, bool, String) {
            (ResponseCode::Overwrite.code(), true, "renamed.txt".to_string())
        }
    }

    async fn bridged_handler()
    -> Result<(Box<dyn UiDelegate>, PromptLog, Connection), Box<dyn Error>> {
        let (client, server) = UnixStream::pair()?;
        let (client, server) = tokio::try_join!(
            connection::Builder::unix_stream(client).p2p().build(),
            connection::Builder::unix_stream(server)
                .server(Guid::generate())?
                .p2p()
                .build(),
        )?;
        let seen = Arc::new(Mutex::new(Vec::new()));
        let identity = ui_identity();
        server
            .object_server()
            .at(
                identity.object_path.as_str(),
                ScriptedHandler { seen: seen.clone() },
            )
            .await?;

        let delegate = SessionBus::new(client).ui_delegate(&identity).await?;
        Ok((delegate, seen, server))
    }

    #[tokio::test]
    async fn remote_delegate_forwards_prompts_and_decodes_replies() -> TestResult {
        let (delegate, seen, _server) = bridged_handler().await?;
        let prompt = Prompt::new("Delete notes.txt?", "It cannot be restored.", "/tmp/notes.txt");

        assert!(delegate.ask_delete_confirmation(&prompt).await?);

        let reply = delegate.ask_delete(&prompt, UiFlags::MULTI).await?;
        assert_eq!(reply.code, ResponseCode::Delete);
        assert!(reply.apply_to_all);

        let reply = delegate.ask_skip(&prompt, UiFlags::NO_RETRY).await?;
        assert_eq!(reply.code, ResponseCode::Skip);
        assert!(!reply.apply_to_all);

        let reply = delegate.conflict_dialog().await?;
        assert_eq!(
            reply,
            UiResponse {
                code: ResponseCode::Overwrite,
                apply_to_all: true,
                user_data: "renamed.txt".to_string(),
            }
        );

        let seen = seen.lock().expect("prompt log").clone();
        assert_eq!(
            seen,
            vec![
                ("Delete notes.txt?".to_string(), 0),
                ("Delete notes.txt?".to_string(), UiFlags::MULTI.bits()),
                ("Delete notes.txt?".to_string(), UiFlags::NO_RETRY.bits()),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn unknown_response_codes_are_rejected() -> TestResult {
        let (delegate, _seen, _server) = bridged_handler().await?;
        let err = delegate
            .ask_retry(&Prompt::new("Copy failed", "", ""), UiFlags::empty())
            .await
            .err()
            .ok_or("code 3 was accepted")?;
        assert!(matches!(
            err,
            DelegateError::InvalidResponse {
                method: "AskRetry",
                code: 3
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn malformed_identities_name_the_offending_field() -> TestResult {
        let (_delegate, _seen, server) = bridged_handler().await?;
        let bus = SessionBus::new(server);
        let err = bus
            .ui_delegate(&broken_identity())
            .await
            .err()
            .ok_or("empty identity was bound")?;
        assert!(matches!(
            err,
            BusError::InvalidDelegate {
                field: "destination",
                ..
            }
        ));

        let mut identity = ui_identity();
        identity.interface = "not an interface".to_string();
        let err = bus
            .ui_delegate(&identity)
            .await
            .err()
            .ok_or("bad interface was bound")?;
        assert!(matches!(
            err,
            BusError::InvalidDelegate {
                field: "interface",
                ..
            }
        ));
        Ok(())
    }
}
