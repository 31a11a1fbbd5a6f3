//! Profile command implementation.

use crate::cli::{ProfileAction, ProfileArgs};
use crate::config::{Config, Profile};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use indexify_domain::DEFAULT_NAMESPACE;
use std::path::PathBuf;

/// Execute the profile command.
pub fn execute_profile(args: ProfileArgs, config: &mut Config, formatter: &Formatter) -> Result<()> {
    match args.action {
        ProfileAction::List => list_profiles(config, formatter),
        ProfileAction::Show => show_active_profile(config, formatter),
        ProfileAction::Switch { name } => {
            config.switch_profile(name.clone())?;
            config.save()?;
            println!("{}", formatter.success(&format!("Switched to profile '{}'", name)));
            Ok(())
        }
        ProfileAction::Set {
            name,
            service_url,
            default_namespace,
            tls_config,
        } => {
            let action = set_profile(config, name.clone(), service_url, default_namespace, tls_config);
            config.save()?;
            println!("{}", formatter.success(&format!("{} profile '{}'", action, name)));
            Ok(())
        }
        ProfileAction::Delete { name } => {
            if delete_profile(config, &name)? {
                config.save()?;
                println!("{}", formatter.success(&format!("Deleted profile '{}'", name)));
            } else {
                println!(
                    "{}",
                    formatter.warning(&format!("Profile '{}' does not exist", name))
                );
            }
            Ok(())
        }
    }
}

/// List all profiles.
fn list_profiles(config: &Config, formatter: &Formatter) -> Result<()> {
    if config.profiles.is_empty() {
        println!("{}", formatter.info("No profiles configured"));
        return Ok(());
    }

    println!("Available profiles:");
    for (name, profile) in &config.profiles {
        if name == &config.active_profile {
            println!("* {}", formatter.success(name));
        } else {
            println!("  {}", name);
        }
        print_profile(profile, "    ");
    }

    Ok(())
}

/// Show the active profile.
fn show_active_profile(config: &Config, formatter: &Formatter) -> Result<()> {
    let profile = config.get_active_profile()?;

    println!("Active profile: {}", formatter.success(&config.active_profile));
    print_profile(profile, "  ");

    Ok(())
}

fn print_profile(profile: &Profile, indent: &str) {
    println!("{}URL: {}", indent, profile.service_url);
    println!(
        "{}Namespace: {}",
        indent,
        profile.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    );
    if let Some(tls) = &profile.tls_config {
        println!("{}TLS config: {}", indent, tls.display());
    }
}

/// Create or update a profile; returns the verb for the confirmation.
fn set_profile(
    config: &mut Config,
    name: String,
    service_url: String,
    namespace: Option<String>,
    tls_config: Option<PathBuf>,
) -> &'static str {
    let profile = Profile {
        service_url: service_url.trim_end_matches('/').to_string(),
        namespace,
        tls_config,
    };

    let action = if config.profiles.contains_key(&name) {
        "Updated"
    } else {
        "Created"
    };

    config.set_profile(name, profile);
    action
}

/// Delete a profile; false when it did not exist.
fn delete_profile(config: &mut Config, name: &str) -> Result<bool> {
    if name == config.active_profile {
        return Err(CliError::NotPermitted(
            "Cannot delete the active profile".to_string(),
        ));
    }

    Ok(config.profiles.remove(name).is_some())
}
