//! Git plumbing for the publish pipeline

mod commands;
mod status;

pub use commands::{parse_ls_remote_heads, Author, GitCli};
pub use status::parse_porcelain;
