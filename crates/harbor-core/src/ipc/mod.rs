//! Capability bridge between the loaded page and the host.
//!
//! The page can reach exactly the operations in [`Operation`]. Everything
//! else is rejected, and only the load target's origin may talk to the host.

pub mod errors;
pub mod protocol;
pub mod router;
pub mod script;

pub use errors::{ProtocolError, RejectedMessage};
pub use protocol::{
    BridgeReply, CapabilityRequest, CapabilityResponse, DirectorySelection, Inbound, Operation,
    ReplyOutcome, WindowCommand, WriteFileOutcome, is_trusted_origin, parse_inbound,
};
pub use router::{CapabilityRouter, DirectoryPicker};
pub use script::{bridge_script, reply_script};
