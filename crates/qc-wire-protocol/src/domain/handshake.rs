//! # Version Negotiation and Status Handshake
//!
//! ## Connection Lifecycle
//!
//! ```text
//! Uninitialized --negotiate--> Negotiating(v) --Status--> Active(v)
//! ```
//!
//! 1. Capability exchange: pick the newest local version the peer also
//!    advertises
//! 2. The first in-band message must be Status
//! 3. Status filters: version, network, genesis, location, fork id
//! 4. `Active` is terminal; a second Status is a protocol violation
//!
//! Reference: EIP-2124 fork identifiers, go-ethereum `eth` handshake

use tracing::debug;

use super::errors::WireError;
use super::packets::StatusPacket;
use super::registry::{MessageKind, ProtocolVersion};
use crate::ports::outbound::ForkFilter;

// =============================================================================
// NEGOTIATION
// =============================================================================

/// Pick the first entry of `local` (newest first) that `remote` advertises.
///
/// # Errors
///
/// Returns [`WireError::NoCommonVersion`] if the sets do not intersect.
pub fn negotiate(local: &[ProtocolVersion], remote: &[u32]) -> Result<ProtocolVersion, WireError> {
    local
        .iter()
        .copied()
        .find(|version| remote.contains(&version.number()))
        .ok_or(WireError::NoCommonVersion)
}

// =============================================================================
// STATUS VERIFICATION
// =============================================================================

/// Verify a peer's Status against our own.
///
/// Filters run in order and the first failure is returned:
/// 1. Protocol version equals the negotiated one
/// 2. Network id
/// 3. Genesis hash
/// 4. Location
/// 5. Fork id, judged by `fork_filter`
pub fn verify_status<F>(
    ours: &StatusPacket,
    theirs: &StatusPacket,
    negotiated: ProtocolVersion,
    fork_filter: &F,
) -> Result<(), WireError>
where
    F: ForkFilter + ?Sized,
{
    if theirs.protocol_version != negotiated.number() {
        return Err(WireError::ProtocolVersionMismatch {
            ours: negotiated.number(),
            theirs: theirs.protocol_version,
        });
    }

    if theirs.network_id != ours.network_id {
        return Err(WireError::NetworkIdMismatch {
            ours: ours.network_id,
            theirs: theirs.network_id,
        });
    }

    if theirs.genesis != ours.genesis {
        return Err(WireError::GenesisMismatch {
            ours: ours.genesis,
            theirs: theirs.genesis,
        });
    }

    if theirs.location != ours.location {
        return Err(WireError::LocationMismatch {
            ours: ours.location.clone(),
            theirs: theirs.location.clone(),
        });
    }

    if !fork_filter.accepts(&theirs.fork_id) {
        return Err(WireError::ForkIdRejected(theirs.fork_id));
    }

    Ok(())
}

// =============================================================================
// SESSION STATE MACHINE
// =============================================================================

/// Protocol-level state of one connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Capabilities not yet exchanged.
    #[default]
    Uninitialized,
    /// Version agreed, waiting for the peer's Status.
    Negotiating(ProtocolVersion),
    /// Handshake complete.
    Active(ProtocolVersion),
}

/// Tracks one connection through negotiation and the Status handshake.
#[derive(Debug, Clone, Default)]
pub struct ProtocolSession {
    state: SessionState,
}

impl ProtocolSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Negotiated version, once capabilities have been exchanged.
    pub fn version(&self) -> Option<ProtocolVersion> {
        match self.state {
            SessionState::Uninitialized => None,
            SessionState::Negotiating(version) | SessionState::Active(version) => Some(version),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active(_))
    }

    /// Agree on a version with the peer and start waiting for its Status.
    ///
    /// # Errors
    ///
    /// - [`WireError::AlreadyNegotiated`] unless the session is uninitialized;
    ///   the agreed version holds for the life of the connection
    /// - [`WireError::NoCommonVersion`] if the sets do not intersect,
    ///   leaving the session uninitialized
    pub fn negotiate(
        &mut self,
        local: &[ProtocolVersion],
        remote: &[u32],
    ) -> Result<ProtocolVersion, WireError> {
        if let Some(current) = self.version() {
            return Err(WireError::AlreadyNegotiated(current));
        }
        let version = negotiate(local, remote)?;
        debug!(version = %version, ?remote, "Negotiated protocol version");
        self.state = SessionState::Negotiating(version);
        Ok(version)
    }

    /// Admit an inbound message code in the current state.
    ///
    /// # Errors
    ///
    /// - [`WireError::NoStatusMsg`] if anything but Status arrives first
    /// - [`WireError::ExtraStatusMsg`] for Status after the handshake
    /// - [`WireError::InvalidMessageCode`] for codes outside the version
    pub fn check_inbound(&self, code: u64) -> Result<MessageKind, WireError> {
        let status = u64::from(MessageKind::Status.code());
        match self.state {
            SessionState::Negotiating(_) if code == status => Ok(MessageKind::Status),
            SessionState::Uninitialized | SessionState::Negotiating(_) => {
                Err(WireError::NoStatusMsg)
            }
            SessionState::Active(_) if code == status => Err(WireError::ExtraStatusMsg),
            SessionState::Active(version) => version.kind_for_code(code),
        }
    }

    /// Verify the peer's Status and activate the session.
    ///
    /// # Errors
    ///
    /// Any status filter failure, [`WireError::NoStatusMsg`] before
    /// negotiation, or [`WireError::ExtraStatusMsg`] once active.
    pub fn complete_handshake<F>(
        &mut self,
        ours: &StatusPacket,
        theirs: &StatusPacket,
        fork_filter: &F,
    ) -> Result<ProtocolVersion, WireError>
    where
        F: ForkFilter + ?Sized,
    {
        let version = match self.state {
            SessionState::Negotiating(version) => version,
            SessionState::Uninitialized => return Err(WireError::NoStatusMsg),
            SessionState::Active(_) => return Err(WireError::ExtraStatusMsg),
        };
        verify_status(ours, theirs, version, fork_filter)?;

        debug!(
            version = %version,
            network_id = theirs.network_id,
            head = ?theirs.head,
            "Status handshake complete"
        );
        self.state = SessionState::Active(version);
        Ok(version)
    }
}
