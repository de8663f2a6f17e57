//! Command implementations.
//!
//! Each subcommand is implemented in its own module for clean separation.

pub(crate) mod completions;
pub(crate) mod ports;
pub(crate) mod switch;

pub(crate) use completions::cmd_completions;
pub(crate) use ports::cmd_list_ports;
pub(crate) use switch::{cmd_cycle, cmd_single};
