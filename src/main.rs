use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

use invoice_landing::cli::{Cli, Command, RenderArgs};
use invoice_landing::config::SiteConfig;
use invoice_landing::site::Site;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    invoice_landing::logging::init().context("init logging")?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        Command::Serve(args) => {
            invoice_landing::server::run(args).await.context("serve")?;
        }
        Command::Render(args) => {
            render(args).context("render")?;
        }
        Command::Metadata(args) => {
            let site = Site::new(SiteConfig::from_env()).context("configure site")?;
            let metadata = site.document(&args.to_page_metadata()).metadata;
            let json = serde_json::to_string_pretty(&metadata).context("encode metadata")?;
            println!("{json}");
        }
    }

    Ok(())
}

fn render(args: RenderArgs) -> anyhow::Result<()> {
    let site = Site::new(SiteConfig::from_env()).context("configure site")?;
    let html = site.render(&args.page.to_page_metadata());

    match args.out {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir: {}", parent.display()))?;
            }
            std::fs::write(&path, html)
                .with_context(|| format!("write document: {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote document");
        }
        None => print!("{html}"),
    }

    Ok(())
}
