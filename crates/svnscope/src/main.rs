//! svnscope: browse Subversion history of a local working copy
//!
//! By default this binary serves the six bridge operations as MCP tools over
//! stdio. The `log` and `cat` subcommands run a single operation and print
//! its result.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::info;

use svnscope::config::{Command, Config};
use svnscope::context::AppContext;
use svnscope::handlers::{self, SvnLogInput};
use svnscope::router::Router;
use svnscope::server::{SvnScopeServer, serve_stdio};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    // Logs go to stderr; stdout belongs to the MCP transport
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    config.validate().context("Invalid configuration")?;
    let ctx = AppContext::from_config(&config)?;

    match config.command {
        Some(Command::Log { dir, days, author }) => {
            let input = SvnLogInput {
                dir_path: dir.display().to_string(),
                days,
                author,
            };
            let records = handlers::svn_log(&ctx, &input, Local::now().date_naive()).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Some(Command::Cat { file, revision }) => {
            let text = handlers::svn_file(&ctx, &file, &revision).await;
            print!("{text}");
        }
        None => {
            let router = Router::new()?;
            info!(tools = router.len(), "Starting svnscope MCP server...");
            serve_stdio(SvnScopeServer::new(ctx, router)).await?;
        }
    }

    Ok(())
}
