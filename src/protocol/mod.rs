//! LPI protocol handling.
//!
//! This module implements parsing and serialization for the LPI (Lily Pad
//! Interface) line protocol: layout encoding for positions, action
//! notation, and the command parser for the main loop.

pub mod layout;
pub mod notation;
pub mod parser;

pub use layout::{encode_layout, parse_layout, LayoutError, STARTPOS};
pub use notation::{format_action, parse_action, parse_coord, NotationError};
pub use parser::{parse_command, Command, GoParams};
