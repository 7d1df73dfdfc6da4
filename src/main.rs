//! Entry point for the **dyntable** command-line tool.
//!
//! ```text
//! dyntable [--config <path>] <scene.json>
//! ```
//!
//! Lays out the scene with a [`DynamicTableLayout`] configured from the
//! config file and prints the resulting report as JSON on stdout.  Use
//! `RUST_LOG=debug` to follow the layout passes.

use dyntable::config::Config;
use dyntable::scene::Scene;
use dyntable::table::DynamicTableLayout;
use log::{error, info};
use std::path::{Path, PathBuf};

/// Resolve the config directory (`$XDG_CONFIG_HOME/dyntable`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("dyntable")
}

/// Load the config from an explicit path, failing loudly, or from
/// `$XDG_CONFIG_HOME/dyntable/config.json`, falling back to compiled-in
/// defaults.
fn load_config(explicit: Option<&Path>) -> Result<Config, String> {
    if let Some(path) = explicit {
        return Config::load(path).map_err(|e| e.to_string());
    }
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            Ok(cfg)
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Ok(Config::default())
        }
    }
}

struct Args {
    config: Option<PathBuf>,
    scene: PathBuf,
}

fn parse_args() -> Result<Args, String> {
    let mut config = None;
    let mut scene = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or("--config requires a path")?;
                config = Some(PathBuf::from(path));
            }
            other if other.starts_with("--") => return Err(format!("unknown option {}", other)),
            other => scene = Some(PathBuf::from(other)),
        }
    }
    let scene = scene.ok_or("usage: dyntable [--config <path>] <scene.json>")?;
    Ok(Args { config, scene })
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let config = load_config(args.config.as_deref())?;

    let mut layout = DynamicTableLayout::from_config(&config.layout).map_err(|e| e.to_string())?;
    let scene = Scene::load(&args.scene)
        .map_err(|e| format!("failed to load {}: {}", args.scene.display(), e))?;

    let report = scene.run(&mut layout, config.layout.request_mode);
    let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        error!("{}", e);
        eprintln!("dyntable: {}", e);
        std::process::exit(1);
    }
}
