use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::config::LockMode;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Address the HTTP server binds to.
    #[arg(long)]
    pub http_addr: Option<SocketAddr>,
    /// Directory holding one JSON document per post.
    #[arg(long)]
    pub posts_dir: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub post_locks: Option<LockMode>,
}
