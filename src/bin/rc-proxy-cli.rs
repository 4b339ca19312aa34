use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;

use rc_proxy::catalogue::{collect_portals, search_url, wrap_dump};

#[derive(Parser)]
#[command(name = "rc-proxy-cli")]
#[command(about = "Client tools for the Research Catalogue search proxy", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search through a running proxy and print the result
    Search {
        #[arg(short, long)]
        keyword: String,

        #[arg(short, long, default_value = "")]
        portal: String,

        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },
    /// Save a search result as {"<key>": [...]} for offline use
    Dump {
        #[arg(short, long)]
        keyword: String,

        #[arg(short, long, default_value = "")]
        portal: String,

        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,

        /// Top-level key of the dump; defaults to the keyword
        #[arg(long)]
        key: Option<String>,

        /// Write the dump here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the distinct portal names in a catalogue dump
    Portals {
        /// JSON dump shaped {"rc": [...]}
        #[arg(short, long)]
        input: PathBuf,

        /// Write the JSON array here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { keyword, portal, url } => {
            let url = search_url(&url, &keyword, &portal)?;
            let res = reqwest::get(url).await?;
            print_response(res).await?;
        }
        Commands::Dump { keyword, portal, url, key, output } => {
            let url = search_url(&url, &keyword, &portal)?;
            let res = reqwest::get(url).await?;
            let status = res.status();
            if !status.is_success() {
                anyhow::bail!("proxy returned status {}", status);
            }

            let results: Value = serde_json::from_str(&res.text().await?)
                .context("search result is not JSON")?;
            let dump = wrap_dump(key.as_deref().unwrap_or(&keyword), results);
            let json = serde_json::to_string_pretty(&dump)?;
            match output {
                Some(path) => fs::write(&path, json)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{}", json),
            }
        }
        Commands::Portals { input, output } => {
            let content = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let dump: Value = serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", input.display()))?;

            let portals = collect_portals(&dump)?;
            let json = serde_json::to_string(&portals)?;
            match output {
                Some(path) => fs::write(&path, json)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{}", json),
            }
            eprintln!("{} portals", portals.len());
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> anyhow::Result<()> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
        eprintln!("Response: {}", text);
        return Ok(());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
