//! Shell command construction
//!
//! Every command fab runs is a script handed to `/bin/sh -c`. Runtime values
//! only reach a script as a [`SafePath`], which is validated once and always
//! single-quoted when interpolated.

pub mod command;
pub mod safe_path;

pub use command::{Command, CommandBuilder};
pub use safe_path::SafePath;
