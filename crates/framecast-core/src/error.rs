use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Copy)]
pub enum DropReason {
    #[error("End of stream")]
    EndOfStream,

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Protocol error")]
    ProtocolError,

    #[error("Generic codec error")]
    CodecError,

    #[error("Oversized frame")]
    OversizedFrame,

    #[error("Missing buffer")]
    MissingBuffer,
}

impl DropReason {
    /// Terminal reasons end the pipeline: the component that sees one forwards the
    /// frame downstream and stops.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DropReason::EndOfStream | DropReason::ConnectionClosed | DropReason::ProtocolError
        )
    }
}
