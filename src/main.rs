use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wifi_provisioner::{
    config::{self, Config, NetworkConfig},
    connection, scan, server, NetworkProvisioner,
};

#[derive(Parser)]
#[command(name = "wifi-provisioner")]
#[command(about = "Scan, inspect and join WiFi networks through netsh")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan for WiFi networks
    Scan,

    /// Show connection status
    Status,

    /// Connect to a WiFi network
    Connect {
        /// SSID of the network to connect to
        ssid: String,

        /// Password for the network (uses saved password if not provided)
        #[arg(short, long)]
        password: Option<String>,

        /// Save credentials to config file
        #[arg(short, long)]
        save: bool,
    },

    /// Start the HTTP API
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Save network credentials to config file
    SaveNetwork {
        /// SSID of the network
        ssid: String,

        /// Password for the network
        #[arg(short, long)]
        password: String,
    },

    /// Show saved configuration
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,wifi_provisioner=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan => cmd_scan().await,
        Commands::Status => cmd_status().await,
        Commands::Connect {
            ssid,
            password,
            save,
        } => cmd_connect(&ssid, password.as_deref(), save).await,
        Commands::Serve { host, port } => cmd_serve(host, port).await,
        Commands::SaveNetwork { ssid, password } => cmd_save_network(&ssid, &password),
        Commands::ShowConfig => cmd_show_config(),
    }
}

fn provisioner(cfg: &Config) -> NetworkProvisioner {
    let provisioner = NetworkProvisioner::system();
    match &cfg.profile_dir {
        Some(dir) => provisioner.with_profile_dir(dir),
        None => provisioner,
    }
}

async fn cmd_scan() -> Result<()> {
    let cfg = Config::load()?;
    println!("Scanning for networks...");
    println!();

    let result = provisioner(&cfg).scan().await;
    scan::display_networks(&result);

    Ok(())
}

async fn cmd_status() -> Result<()> {
    let cfg = Config::load()?;
    let status = provisioner(&cfg).status().await;
    connection::display_status(&status);

    Ok(())
}

async fn cmd_connect(ssid: &str, password: Option<&str>, save: bool) -> Result<()> {
    let mut cfg = Config::load().unwrap_or_default();

    // Fall back to saved credentials when no password was given
    let password = match password {
        Some(p) => Some(p.to_string()),
        None => cfg.find_network(ssid).map(|network| {
            println!("Using saved password for '{}'", ssid);
            network.password.clone()
        }),
    };

    println!("Connecting to '{}'...", ssid);
    let result = provisioner(&cfg).connect(ssid, password.as_deref()).await;
    if let Some(error) = result.error {
        bail!("{}", error);
    }
    println!("Connected successfully!");

    if save {
        match password {
            Some(password) => {
                cfg.add_network(NetworkConfig {
                    ssid: result.ssid.clone(),
                    password,
                });
                cfg.save()?;
                println!("Credentials saved to config.");
            }
            None => println!("No password given, nothing to save."),
        }
    }

    println!();
    let status = provisioner(&cfg).status().await;
    connection::display_status(&status);

    Ok(())
}

async fn cmd_serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let cfg = Config::load()?;
    let settings = cfg.server.clone();

    let config = server::ServerConfig {
        host: host.unwrap_or(settings.host),
        port: port.unwrap_or(settings.port),
        allowed_origins: settings.allowed_origins,
    };
    let provisioner = provisioner(&cfg);
    info!(platform = ?provisioner.platform(), "starting WiFi provisioner");

    server::run_server(provisioner, config).await
}

fn cmd_save_network(ssid: &str, password: &str) -> Result<()> {
    let mut cfg = Config::load().unwrap_or_default();

    cfg.add_network(NetworkConfig {
        ssid: ssid.to_string(),
        password: password.to_string(),
    });

    cfg.save()?;

    let path = config::config_path()?;
    println!("Saved network '{}' to {}", ssid, path.display());

    Ok(())
}

fn cmd_show_config() -> Result<()> {
    let path = config::config_path()?;
    println!("Config file: {}", path.display());
    println!();

    let cfg = Config::load()?;

    println!("Server:     {}:{}", cfg.server.host, cfg.server.port);
    println!("Origins:    {}", cfg.server.allowed_origins.join(", "));
    if let Some(dir) = &cfg.profile_dir {
        println!("Profiles:   {}", dir.display());
    }
    println!();

    if cfg.networks.is_empty() {
        println!("No saved networks.");
    } else {
        println!("{:<32} {}", "SSID", "PASSWORD");
        println!("{}", "-".repeat(48));
        for network in &cfg.networks {
            let masked_pw = "*".repeat(network.password.len().min(12));
            println!("{:<32} {}", network.ssid, masked_pw);
        }
    }

    Ok(())
}
