#![deny(missing_debug_implementations)]

//! Misuse-resistant data structures for the
//! [milter](https://www.postfix.org/MILTER_README.html) wire protocol.
//!
//! This crate only defines the message family, the flag bit-fields, and the
//! few small value types (connect addresses, macro stages) that make up a
//! milter session. It knows nothing about bytes on the wire; that is
//! `milter-codec`'s job.

pub mod address;
pub mod error;
pub mod flags;
pub mod macros;
pub mod message;
pub mod session;
pub mod utils;

pub use address::{ConnectAddress, Family};
pub use error::ValidationError;
pub use flags::{ActionFlags, ProtocolFlags};
pub use macros::MacroStage;
pub use message::Message;
pub use session::Phase;
