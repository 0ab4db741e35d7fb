mod config_file;
mod op;
mod ops;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use op::{Op, OpContext};
use ops::{InitConfig, Serve, Version};

/// Store and serve named binary blobs over HTTP
#[derive(Parser, Debug)]
#[command(name = "blobrepo", version)]
struct Args {
    /// TOML config file, see `blobrepo init-config`
    #[arg(long = "config", global = true)]
    config_path: Option<PathBuf>,

    #[command(flatten)]
    serve: Serve,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Print a default config file to stdout
    InitConfig,
    /// Print build information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let ctx = OpContext {
        config_path: args.config_path,
    };

    let output = match args.command {
        Some(Command::InitConfig) => InitConfig.execute(&ctx).await?,
        Some(Command::Version) => Version.execute(&ctx).await?,
        None => args.serve.execute(&ctx).await?,
    };
    println!("{}", output);

    Ok(())
}
