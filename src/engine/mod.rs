//! Engine communication
//!
//! Everything between the game loop and the child process: the byte
//! channel fed by a reader thread, the transcript reader that waits for
//! sentinels, the command sender, the owned process handle and the
//! [`EngineSession`] that speaks UCI over them.

pub mod channel;
pub mod error;
pub mod process;
pub mod protocol;
pub mod sender;
pub mod session;
pub mod transcript;

pub use channel::{byte_channel, ByteReceiver, ReadOutcome};
pub use error::{EngineError, EngineResult};
pub use process::{EngineProcess, EnginePipes};
pub use protocol::BestMove;
pub use sender::CommandSender;
pub use session::EngineSession;
pub use transcript::TranscriptReader;
