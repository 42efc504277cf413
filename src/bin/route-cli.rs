use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Management CLI for route-sync", long_about = None)]
struct Cli {
    /// Base URL of the route-sync admin API.
    #[arg(short, long, default_value = "http://127.0.0.1:4000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List routes with fresh health status
    List,
    /// Add a route mapping a path prefix to an upstream
    Add {
        /// Path prefix, e.g. /blog
        path: String,
        /// Upstream address, e.g. 10.0.0.1:8080
        target: String,
    },
    /// Remove the route at the given index (as shown by `list`)
    Remove { index: usize },
    /// Clear and re-apply every route on the proxy
    Reload,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let api = format!("{}/admin/api", cli.url.trim_end_matches('/'));

    let res = match cli.command {
        Commands::List => client.get(format!("{}/routes", api)).send().await?,
        Commands::Add { path, target } => {
            client
                .post(format!("{}/routes", api))
                .json(&json!({ "path": path, "target": target }))
                .send()
                .await?
        }
        Commands::Remove { index } => client.delete(format!("{}/routes/{}", api, index)).send().await?,
        Commands::Reload => client.post(format!("{}/reload", api)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    let rendered = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if !status.is_success() {
        eprintln!("Error: admin API returned status {}", status);
        eprintln!("{}", rendered);
        std::process::exit(1);
    }

    println!("{}", rendered);
    Ok(())
}
