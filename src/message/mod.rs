//! Message encoding and the signal protocol carried between sandboxes and
//! the coordinator.

mod codec;
mod signal;

pub use codec::{decode, decode_line, encode, encode_line, DecodeError};
pub use signal::{signal_channel, Signal, SignalReceiver, SignalSender};
