//! `learnveda doctor`: diagnose configuration and provider health.

use std::path::Path;

use tracing::{info, warn};

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 LearnVeda Doctor");
    println!("===================\n");

    let mut issues = 0;

    let path = super::config_file(config_path);
    if path.exists() {
        println!("  ✅ Config file found: {}", path.display());
    } else if config_path.is_none() {
        println!("  ⚠️  No config file at {} (defaults in use), run `learnveda onboard`", path.display());
        issues += 1;
    }

    let config = match super::read_config(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Config check failed");
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config file and run doctor again.");
            return Ok(());
        }
    };

    if config.has_api_key() {
        println!("  ✅ API key configured for '{}'", config.default_provider);
    } else {
        println!(
            "  ⚠️  No API key for '{}'. Set api_key in the config or LEARNVEDA_API_KEY",
            config.default_provider
        );
        issues += 1;
    }

    match learnveda_providers::build_from_config(&config) {
        Ok(router) => {
            for name in router.list() {
                let Some(provider) = router.get(name) else {
                    continue;
                };
                match provider.health_check().await {
                    Ok(true) => println!("  ✅ Provider '{name}' reachable"),
                    Ok(false) => {
                        warn!(provider = %name, "Provider health check failed");
                        println!("  ❌ Provider '{name}' not reachable");
                        issues += 1;
                    }
                    Err(e) => {
                        warn!(provider = %name, error = %e, "Provider health check errored");
                        println!("  ❌ Provider '{name}': {e}");
                        issues += 1;
                    }
                }
            }
        }
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
        }
    }

    info!(issues, "Doctor finished");
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
