//! Concrete tasks and factories.
//!
//! - [`message`]: prints timestamped messages, one task per message.
//! - [`image`](self::image): adjusts image brightness, one task per file in a directory.
//! - [`registry`]: rebuilds these tasks from their payloads inside worker processes.

#![warn(missing_docs)]

pub mod image;
pub mod message;
pub mod registry;

pub use self::image::{AdjustBrightness, ImageTaskFactory};
pub use message::{MessageTaskFactory, SendMessage};
pub use registry::decode;
