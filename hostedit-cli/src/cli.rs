//! Command-line schema and argument helpers

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "hostedit")]
#[command(about = "Edit saved terminal hosts and their character encodings")]
#[command(version)]
pub struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Host store to use instead of the configured one
    #[arg(long, value_name = "FILE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the selectable character encodings
    Charsets,
    /// List saved hosts
    Hosts,
    /// Save a new SSH host
    Add {
        nickname: String,
        /// Connection target as user@host[:port] or user@[v6 address][:port]
        target: String,
        /// Encoding for the new host (configured default when omitted)
        #[arg(long, short = 'e')]
        encoding: Option<String>,
    },
    /// Change the encoding of a saved host
    SetEncoding {
        /// Host id as printed by `hosts`
        id: i64,
        /// Encoding name or display name as printed by `charsets`
        encoding: String,
    },
}

/// Parsed `user@host[:port]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub username: String,
    pub hostname: String,
    pub port: Option<u16>,
}

impl Target {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        let Some((username, rest)) = s.split_once('@') else {
            bail!("target must look like user@host[:port], got {s:?}");
        };
        if username.is_empty() {
            bail!("missing user name in {s:?}");
        }

        let (hostname, port) = if let Some(bracketed) = rest.strip_prefix('[') {
            // [v6 address] with an optional :port after the bracket
            let Some((host, after)) = bracketed.split_once(']') else {
                bail!("unclosed '[' in {s:?}");
            };
            let port = match after {
                "" => None,
                _ => match after.strip_prefix(':') {
                    Some(port) => Some(parse_port(port)?),
                    None => bail!("unexpected {after:?} after ']' in {s:?}"),
                },
            };
            (host, port)
        } else {
            match rest.rsplit_once(':') {
                Some((host, port)) => (host, Some(parse_port(port)?)),
                None => (rest, None),
            }
        };
        if hostname.is_empty() {
            bail!("missing host name in {s:?}");
        }

        Ok(Self {
            username: username.to_string(),
            hostname: hostname.to_string(),
            port,
        })
    }
}

fn parse_port(port: &str) -> anyhow::Result<u16> {
    port.parse::<u16>().with_context(|| format!("invalid port {port:?}"))
}
