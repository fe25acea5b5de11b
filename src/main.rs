use clap::Parser;
use sketch_enhancer::cli::commands::{cmd_normalize, cmd_serve, init_logging};
use sketch_enhancer::cli::config::{Cli, Commands, load_config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Serve {
            host,
            port,
            profile,
            mock_response,
            trace_file,
        } => {
            cmd_serve(
                &config,
                host.as_deref(),
                port,
                profile.as_deref(),
                mock_response.as_deref(),
                trace_file.as_deref(),
            )
            .await?;
        }
        Commands::Normalize {
            input,
            profile,
            pretty,
        } => {
            let output = cmd_normalize(&config, &input, profile.as_deref(), pretty)?;
            println!("{}", output);
        }
    }

    Ok(())
}
