//! Configuration command implementation

use crate::config::{ConfigKey, GlobalConfig};
use anyhow::Result;
use colored::Colorize;

/// Arguments for the config command
#[derive(Debug, Default)]
pub struct ConfigArgs {
    pub key: Option<String>,
    pub value: Option<String>,
    pub list: bool,
    pub unset: bool,
    pub show_origin: bool,
    pub json: bool,
}

/// Execute the config command against the default config file
pub fn execute(args: ConfigArgs) -> Result<()> {
    let config_path = GlobalConfig::get_config_path()?;
    let mut config = GlobalConfig::load_from(&config_path)?;

    if args.show_origin {
        if args.json {
            println!(
                "{}",
                serde_json::json!({
                    "config_file": config_path.display().to_string(),
                    "exists": config_path.exists()
                })
            );
        } else {
            println!(
                "{}: {}",
                "Configuration file".bold(),
                config_path.display().to_string().cyan()
            );
            if config_path.exists() {
                println!("{}: {}", "Status".bold(), "exists".green());
            } else {
                println!("{}: {}", "Status".bold(), "not created yet".yellow());
            }
        }
        return Ok(());
    }

    if args.list {
        return list_configuration(&config, args.json);
    }

    let Some(key_str) = &args.key else {
        show_usage(args.json);
        return Ok(());
    };
    let key = ConfigKey::parse(key_str)?;

    if args.unset {
        config.unset(key);
        config.save_to(&config_path)?;

        if args.json {
            println!(
                "{}",
                serde_json::json!({
                    "action": "unset",
                    "key": key.as_str(),
                    "status": "success"
                })
            );
        } else {
            println!("{} {}", "✓".green(), format!("Unset {}", key.as_str()).bold());
        }
    } else if let Some(value) = &args.value {
        config.set(key, value)?;
        config.save_to(&config_path)?;

        if args.json {
            println!(
                "{}",
                serde_json::json!({
                    "action": "set",
                    "key": key.as_str(),
                    "value": value,
                    "status": "success"
                })
            );
        } else {
            println!("{} {} = {}", "✓".green(), key.as_str().bold(), value.cyan());
        }
    } else {
        match config.get(key) {
            Some(value) => {
                if args.json {
                    println!(
                        "{}",
                        serde_json::json!({
                            "key": key.as_str(),
                            "value": value
                        })
                    );
                } else {
                    println!("{}", value);
                }
            },
            None => {
                if args.json {
                    println!(
                        "{}",
                        serde_json::json!({
                            "key": key.as_str(),
                            "value": null,
                            "error": "not set"
                        })
                    );
                } else {
                    eprintln!(
                        "{}",
                        format!("Configuration key '{}' is not set", key.as_str()).yellow()
                    );
                }
                return Err(anyhow::anyhow!("Configuration key not set"));
            },
        }
    }

    Ok(())
}

/// List all configuration values
fn list_configuration(config: &GlobalConfig, json: bool) -> Result<()> {
    let entries = config.list();

    if json {
        let config_map: serde_json::Map<String, serde_json::Value> = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&config_map)?);
    } else if entries.is_empty() {
        println!("{}", "No configuration values set".yellow());
        println!();
        println!("{}", "To set configuration:".bold());
        println!("  {}", "layergen config aws.region us-east-1".cyan());
        println!("  {}", "layergen config tools.pip pip3".cyan());
    } else {
        println!("{}", "Global Configuration".green().bold());
        println!("{}", "═".repeat(40));
        println!();

        for (key, value) in entries {
            println!("{} = {}", key.bold(), value.cyan());
        }
    }

    Ok(())
}

fn show_usage(json: bool) {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "error": "No configuration key specified",
                "usage": "layergen config <key> [value] or --list"
            })
        );
        return;
    }

    println!("{}", "Configuration Management".green().bold());
    println!("{}", "═".repeat(40));
    println!();
    println!("{}", "Usage:".bold());
    println!("  {} Get value", "layergen config <key>".cyan());
    println!("  {} Set value", "layergen config <key> <value>".cyan());
    println!("  {} List all", "layergen config --list".cyan());
    println!("  {} Unset value", "layergen config --unset <key>".cyan());
    println!();
    println!("{}", "Keys:".bold());
    println!("  {} Default AWS region", "aws.region".green());
    println!("  {} AWS CLI named profile", "aws.profile".green());
    println!("  {} Path or name of the aws binary", "tools.aws".green());
    println!("  {} Path or name of the pip binary", "tools.pip".green());
    println!("  {} Path or name of the npm binary", "tools.npm".green());
    println!("  {} Lambda runtime for Python layers", "runtimes.python".green());
    println!("  {} Lambda runtime for Node.js layers", "runtimes.nodejs".green());
}
