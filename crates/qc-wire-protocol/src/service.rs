//! # Wire Protocol Service
//!
//! Implements [`WireProtocolApi`] on top of the domain codec, filling in our
//! Status from [`ChainInfoProvider`] and judging peers' fork ids through
//! [`ForkFilter`].
//!
//! ## Inbound Pipeline
//!
//! 1. Size limit (configured cap, at most 10 MiB)
//! 2. Registry check for the negotiated version
//! 3. Packet decode
//! 4. Envelope check (layout fixed by the version)
//! 5. Validation hooks
//!
//! Every rejection is logged at `debug` and returned; the service never
//! drops peers itself.

use std::sync::Arc;

use tracing::debug;

use crate::config::WireConfig;
use crate::domain::{
    sanity_check, verify_status, Message, ProtocolSession, ProtocolVersion, RawMessage,
    StatusPacket, WireError,
};
use crate::ports::inbound::WireProtocolApi;
use crate::ports::outbound::{ChainInfoProvider, ForkFilter};

/// Wire protocol service.
///
/// Stateless apart from its configuration; share it across connection
/// tasks via `Arc`. Per-connection state lives in [`ProtocolSession`].
pub struct WireProtocolService<C, F>
where
    C: ChainInfoProvider,
    F: ForkFilter,
{
    config: WireConfig,
    chain: Arc<C>,
    fork_filter: Arc<F>,
}

impl<C, F> WireProtocolService<C, F>
where
    C: ChainInfoProvider,
    F: ForkFilter,
{
    pub fn new(config: WireConfig, chain: Arc<C>, fork_filter: Arc<F>) -> Self {
        Self {
            config,
            chain,
            fork_filter,
        }
    }

    pub fn config(&self) -> &WireConfig {
        &self.config
    }

    /// Start a session with a peer advertising `remote` versions.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::NoCommonVersion`] if no configured version is
    /// advertised by the peer.
    pub fn open_session(&self, remote: &[u32]) -> Result<ProtocolSession, WireError> {
        let mut session = ProtocolSession::new();
        session
            .negotiate(&self.config.supported_versions, remote)
            .inspect_err(|err| debug!(?remote, error = %err, "Version negotiation failed"))?;
        Ok(session)
    }

    /// Admit, decode and validate one inbound blob on `session`.
    ///
    /// The peer's Status completes the handshake and is returned like any
    /// other message.
    ///
    /// # Errors
    ///
    /// Any session, decode, validation or handshake failure.
    pub fn handle_inbound(
        &self,
        session: &mut ProtocolSession,
        raw: &RawMessage,
    ) -> Result<Message, WireError> {
        session
            .check_inbound(raw.code)
            .inspect_err(|err| debug!(code = raw.code, error = %err, "Rejected inbound code"))?;
        let version = session.version().ok_or(WireError::NoStatusMsg)?;

        let message = self.decode_message(version, raw)?;
        if let Message::Status(theirs) = &message {
            let ours = self.local_status(version);
            session
                .complete_handshake(&ours, theirs, self.fork_filter.as_ref())
                .inspect_err(|err| {
                    debug!(version = %version, error = %err, "Rejected peer status")
                })?;
        }
        Ok(message)
    }
}

impl<C, F> WireProtocolApi for WireProtocolService<C, F>
where
    C: ChainInfoProvider,
    F: ForkFilter,
{
    fn decode_message(
        &self,
        version: ProtocolVersion,
        raw: &RawMessage,
    ) -> Result<Message, WireError> {
        let message = Message::decode_with_limit(version, raw, self.config.max_message_size)
            .and_then(|message| sanity_check(&message).map(|()| message))
            .inspect_err(|err| {
                debug!(
                    code = raw.code,
                    size = raw.size(),
                    version = %version,
                    error = %err,
                    "Rejected inbound message"
                )
            })?;

        debug!(
            kind = message.name(),
            size = raw.size(),
            request_id = ?message.request_id(),
            "Decoded message"
        );
        Ok(message)
    }

    fn encode_message(
        &self,
        version: ProtocolVersion,
        message: &Message,
    ) -> Result<RawMessage, WireError> {
        message.encode_with_limit(version, self.config.max_message_size)
    }

    fn local_status(&self, version: ProtocolVersion) -> StatusPacket {
        StatusPacket {
            protocol_version: version.number(),
            network_id: self.config.network_id,
            location: self.config.location.clone(),
            entropy: self.chain.head_entropy(),
            head: self.chain.head_hash(),
            genesis: self.chain.genesis_hash(),
            fork_id: self.chain.fork_id(),
        }
    }

    fn accept_status(
        &self,
        version: ProtocolVersion,
        theirs: &StatusPacket,
    ) -> Result<(), WireError> {
        verify_status(
            &self.local_status(version),
            theirs,
            version,
            self.fork_filter.as_ref(),
        )
        .inspect_err(|err| debug!(version = %version, error = %err, "Rejected peer status"))
    }
}
