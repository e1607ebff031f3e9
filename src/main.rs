use anyhow::Result;
use clap::Parser;
use sdp_relation_data::cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sdp_relation_data=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
