//! One module per subcommand.

pub mod audit_cmd;
pub mod backup;
pub mod check;
pub mod completions;
pub mod forget;
pub mod init;
pub mod repo_add;
pub mod repo_list;
pub mod repo_remove;
pub mod snapshots;
