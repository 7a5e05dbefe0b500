//! Command-line interface definitions for `pandoc-api`.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::ConfigOverrides;

/// Parsed CLI arguments for `pandoc-api`.
#[derive(Debug, Parser)]
#[command(name = "pandoc-api")]
#[command(about = "A simple RESTful server for converting documents with pandoc")]
#[command(version, disable_help_subcommand = true)]
pub struct Args {
    /// Configuration file to load.
    #[arg(long = "config", global = true, value_name = "path")]
    pub config_path: Option<Utf8PathBuf>,
    /// Command to run; usage is printed when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Args {
    /// Configuration overrides carried by these arguments.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        let address = match &self.command {
            Some(Command::Start { address: Some(address) }) => address.clone(),
            _ => ListenAddress::default(),
        };
        ConfigOverrides {
            config_path: self.config_path.clone(),
            host: address.host,
            port: address.port,
        }
    }
}

/// Top-level commands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Start the server, default to localhost:4000.
    Start {
        /// Address to listen on.
        #[arg(value_name = "hostname[:port]", value_parser = parse_listen_address)]
        address: Option<ListenAddress>,
    },
    /// Print usage, or the converter help with `help converter`.
    Help {
        /// Help topic to print.
        #[arg(value_enum)]
        topic: Option<HelpTopic>,
    },
}

/// Topics understood by the `help` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HelpTopic {
    /// The converter's option reference.
    Converter,
}

/// Host and port given to `start`; either part may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenAddress {
    /// Hostname or interface address.
    pub host: Option<String>,
    /// TCP port.
    pub port: Option<u16>,
}

/// Parses `hostname`, `port` or `hostname:port`.
///
/// A value without `:` is taken as a port when it parses as one.
///
/// # Errors
///
/// Returns a message when the value is empty or the port is not a valid
/// `u16`.
pub fn parse_listen_address(value: &str) -> Result<ListenAddress, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("listen address must not be empty".to_owned());
    }
    let Some((host, port)) = trimmed.rsplit_once(':') else {
        return Ok(trimmed.parse::<u16>().map_or_else(
            |_| ListenAddress {
                host: Some(trimmed.to_owned()),
                port: None,
            },
            |port| ListenAddress {
                host: None,
                port: Some(port),
            },
        ));
    };
    let parsed_port = port
        .parse::<u16>()
        .map_err(|err| format!("invalid port '{port}': {err}"))?;
    Ok(ListenAddress {
        host: (!host.is_empty()).then(|| host.to_owned()),
        port: Some(parsed_port),
    })
}
