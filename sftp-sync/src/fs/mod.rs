//! Local filesystem side of the synchronizer.

pub mod prune;
pub mod walker;

pub use prune::prune;
pub use walker::discover_terminal_folders;
