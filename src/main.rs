use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use imageflux::config::ProxyConfig;
use imageflux::image::ParseOptions;
use imageflux::proxy::Proxy;

/// Build, sign and inspect ImageFlux image URLs
#[derive(Parser, Debug)]
#[command(name = "imageflux")]
#[command(version, about, long_about = None)]
struct Args {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a (signed) URL from a parameter string and an image path
    Url {
        #[command(flatten)]
        target: Target,

        /// Parameters, e.g. "w=200,f=webp:auto"
        params: String,

        /// Image path on the origin, e.g. /images/1.jpg
        path: String,

        /// Separate parameters with %2C instead of ','
        #[arg(long)]
        without_comma: bool,
    },

    /// Decode a request path and verify its signature
    Parse {
        #[command(flatten)]
        target: Target,

        /// Request path, e.g. /c/w=200/images/1.jpg
        path: String,

        /// Signature supplied outside the path
        #[arg(long)]
        signature: Option<String>,
    },

    /// Load and validate a configuration file, then exit
    CheckConfig {
        /// Path to configuration file
        #[arg(short, long, default_value = "imageflux.yaml")]
        config: PathBuf,
    },
}

/// Where the proxy settings come from
#[derive(clap::Args, Debug)]
struct Target {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Proxy host name; overrides the configuration file
    #[arg(long)]
    host: Option<String>,

    /// Signing secret; overrides the configuration file
    #[arg(long, env = "IMAGEFLUX_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// Reject unknown parameter keys
    #[arg(long)]
    strict: bool,
}

impl Target {
    fn proxy(&self) -> Result<Proxy> {
        if let Some(path) = &self.config {
            let mut config = ProxyConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            if let Some(host) = &self.host {
                config.host = host.clone();
            }
            if let Some(secret) = &self.secret {
                config.secret = Some(secret.clone());
            }
            config.strict_keys |= self.strict;
            return config.proxy().context("Invalid configuration");
        }

        let host = self.host.clone().unwrap_or_default();
        let mut proxy = Proxy::new(host).with_options(ParseOptions::new().strict(self.strict));
        if let Some(secret) = &self.secret {
            proxy = proxy.with_secret(secret.clone());
        }
        Ok(proxy)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let logging = if args.json_logs {
        imageflux::logging::init_json_subscriber()
    } else {
        imageflux::logging::init_subscriber()
    };
    if let Err(e) = logging {
        bail!("Failed to initialize logging subsystem: {}", e);
    }

    match args.command {
        Command::Url {
            target,
            params,
            path,
            without_comma,
        } => {
            let proxy = target.proxy()?;
            if proxy.host().is_empty() {
                bail!("--host or --config is required to build a URL");
            }
            let (config, rest) = proxy
                .options()
                .parse(&params)
                .with_context(|| format!("Invalid parameters {:?}", params))?;
            if !rest.is_empty() {
                bail!("Unexpected path {:?} in parameters; pass the path separately", rest);
            }

            let image = proxy.image(path, Some(config));
            let url = if without_comma {
                image.signed_url_without_comma()
            } else {
                image.signed_url()
            };
            tracing::info!(signed = proxy.is_signing(), "URL generated");
            println!("{}", url);
        }
        Command::Parse {
            target,
            path,
            signature,
        } => {
            let proxy = target.proxy()?;
            let image = proxy
                .parse(&path, signature.as_deref())
                .with_context(|| format!("Failed to parse {:?}", path))?;
            let config = image.config.clone().unwrap_or_default();

            tracing::info!(
                path = %image.path,
                verified = proxy.is_signing(),
                "Path parsed"
            );
            println!("path: {}", image.path);
            println!("params: {}", config);
            println!("{:#?}", config);
        }
        Command::CheckConfig { config } => {
            let loaded = ProxyConfig::from_file(&config)
                .with_context(|| format!("Failed to load configuration {}", config.display()))?;
            loaded.validate().context("Invalid configuration")?;
            tracing::info!(
                config_file = %config.display(),
                host = %loaded.host,
                signing = loaded.secret.is_some(),
                strict_keys = loaded.strict_keys,
                ratio_scale = loaded.ratio_scale,
                "Configuration loaded successfully"
            );
            println!("configuration OK");
        }
    }

    Ok(())
}
