use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::metadata::PageMetadata;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the landing page over HTTP.
    Serve(ServeArgs),
    /// Render the landing page document once.
    Render(RenderArgs),
    /// Print the merged document metadata as JSON.
    Metadata(PageArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub addr: SocketAddr,

    /// Static assets directory (icons, manifest, social image). Served if it exists.
    #[arg(long, default_value = "public")]
    pub public_dir: PathBuf,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Output file path (default: stdout).
    #[arg(long)]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Args)]
pub struct PageArgs {
    /// Page title, substituted into the site title template.
    #[arg(long)]
    pub title: Option<String>,

    /// Page description (default: the site description).
    #[arg(long)]
    pub description: Option<String>,
}

impl PageArgs {
    pub fn to_page_metadata(&self) -> PageMetadata {
        PageMetadata {
            title: self.title.clone(),
            description: self.description.clone(),
            ..PageMetadata::default()
        }
    }
}
