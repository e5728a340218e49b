//! Sendoff CLI - serve the site and its AI content endpoint.

mod config;
mod error;
mod gemini;
mod proxy;
mod server;
mod site;

use clap::{Parser, Subcommand};
use config::Config;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sendoff")]
#[command(about = "Static server for the Sendoff site with its AI content endpoint")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the site and the AI endpoint
    Serve {
        /// Port to serve on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Site directory (overrides the config file)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Path to the config file
        #[arg(short, long, default_value = "sendoff.toml")]
        config: PathBuf,
    },

    /// Validate the config file and site directory
    Check {
        /// Path to the config file
        #[arg(default_value = "sendoff.toml")]
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Serve { port, dir, config } => Config::load(&config)
            .map(|c| c.with_overrides(port, dir))
            .map_err(error::ServeError::from)
            .and_then(server::serve)
            .map_err(|e| e.to_string()),
        Commands::Check { config } => check(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            log::error!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn check(path: &std::path::Path) -> Result<(), String> {
    let config = Config::load(path).map_err(|e| e.to_string())?;
    config.validate().map_err(|e| e.to_string())?;

    println!("✓ {} is valid", path.display());
    println!("  Site: {}", config.server.dir.display());
    println!("  Port: {}", config.server.port);
    println!("  Model: {}", config.ai.model);
    if config.ai.api_key().is_some() {
        println!("  API key: set ({})", config.ai.api_key_env);
    } else {
        println!("  API key: missing, export {}", config.ai.api_key_env);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::parse_from(["sendoff", "serve", "--port", "3000", "--dir", "public"]);
        match cli.command {
            Commands::Serve { port, dir, config } => {
                assert_eq!(port, Some(3000));
                assert_eq!(dir, Some(PathBuf::from("public")));
                assert_eq!(config, PathBuf::from("sendoff.toml"));
            }
            Commands::Check { .. } => panic!("Expected Serve"),
        }
    }

    #[test]
    fn test_check_valid_site() {
        let dir = tempfile::tempdir().expect("tempdir");
        let site = dir.path().join("site");
        std::fs::create_dir(&site).expect("mkdir");
        std::fs::write(site.join("index.html"), "<html></html>").expect("write");
        let config = dir.path().join("sendoff.toml");
        std::fs::write(&config, format!("[server]\ndir = {:?}\n", site.display().to_string()))
            .expect("write");
        assert!(check(&config).is_ok());
    }

    #[test]
    fn test_check_missing_site() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = dir.path().join("sendoff.toml");
        std::fs::write(&config, "[server]\ndir = \"/definitely/not/here\"\n").expect("write");
        let err = check(&config).expect_err("missing dir");
        assert!(err.contains("does not exist"));
    }
}
