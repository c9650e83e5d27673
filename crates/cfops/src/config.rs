//! CLI configuration: a thin wrapper around `cfops_config`.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--api, --org, --space, --token, ...).

use clap::ValueEnum;
use secrecy::SecretString;

use cfops_core::OperationsConfig;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use cfops_config::{Config, Defaults, Profile, config_path, load_config_or_default};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Build an `OperationsConfig` from the config file, active profile and
/// CLI overrides. Flags win over profile values, profile values over
/// `[defaults]`.
pub fn build_operations_config(
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<OperationsConfig, CliError> {
    let profile_name = cfg.active_profile_name(global.profile.as_deref());

    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
            names.sort_unstable();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if names.is_empty() {
                    "(none)".into()
                } else {
                    names.join(", ")
                },
            });
        }
        // No profile at all: flags / env vars must carry everything.
        None if global.api.is_none() => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
        None => Profile::default(),
    };

    resolve_profile(&profile, &profile_name, &cfg.defaults, global)
}

/// `--output` / `CFOPS_OUTPUT`, else `[defaults] output`.
pub fn output_format(
    flag: Option<&OutputFormat>,
    defaults: &Defaults,
) -> Result<OutputFormat, CliError> {
    if let Some(format) = flag {
        return Ok(format.clone());
    }
    <OutputFormat as ValueEnum>::from_str(&defaults.output, true).map_err(|_| {
        CliError::Validation {
            field: "defaults.output".into(),
            reason: format!(
                "unknown output format '{}'; expected table, json, json-compact, yaml or plain",
                defaults.output
            ),
        }
    })
}

/// Translate a `Profile` + global flags into an `OperationsConfig`.
///
/// Flags are written over a copy of the profile; anything still unset
/// falls back to `[defaults]` inside `cfops_config`.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<OperationsConfig, CliError> {
    let mut effective = profile.clone();
    if let Some(ref api) = global.api {
        effective.api.clone_from(api);
    }
    if let Some(ref org) = global.org {
        effective.organization.clone_from(org);
    }
    if global.space.is_some() {
        effective.space.clone_from(&global.space);
    }
    if global.insecure {
        effective.insecure = Some(true);
    }
    effective.timeout = global.timeout.or(profile.timeout);
    effective.poll_interval_ms = global.poll_interval.or(profile.poll_interval_ms);
    effective.job_timeout = global.job_timeout.or(profile.job_timeout);

    // --token / CFOPS_TOKEN short-circuits env, keyring and plaintext.
    let token = match global.token {
        Some(ref token) => SecretString::from(token.clone()),
        None => cfops_config::resolve_token(&effective, profile_name)?,
    };

    Ok(cfops_config::operations_config(
        &effective,
        profile_name,
        defaults,
        token,
    )?)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cfops_core::TlsVerification;
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["cfops"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["config", "path"]);
        Cli::try_parse_from(argv).expect("valid args").global
    }

    fn profile() -> Profile {
        Profile {
            api: "https://api.sys.example.com".into(),
            organization: "platform".into(),
            space: Some("routing".into()),
            token: Some("profile-token".into()),
            timeout: Some(12),
            ..Profile::default()
        }
    }

    #[test]
    fn flags_override_profile() {
        let global = global(&[
            "--org", "other-org", "--space", "dev", "--token", "flag-token", "--job-timeout", "9",
        ]);
        let ops = resolve_profile(&profile(), "test", &Defaults::default(), &global)
            .expect("operations config");

        assert_eq!(ops.organization, "other-org");
        assert_eq!(ops.space.as_deref(), Some("dev"));
        assert_eq!(ops.timeout, Duration::from_secs(12));
        assert_eq!(ops.job_poll.timeout, Duration::from_secs(9));
        assert_eq!(ops.job_poll.interval, Duration::from_secs(1));
    }

    #[test]
    fn insecure_flag_disables_verification() {
        let global = global(&["-k"]);
        let ops = resolve_profile(&profile(), "test", &Defaults::default(), &global)
            .expect("operations config");
        assert_eq!(ops.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn missing_organization_is_rejected() {
        let mut profile = profile();
        profile.organization = String::new();
        let err = resolve_profile(&profile, "test", &Defaults::default(), &global(&[]))
            .expect_err("no organization");
        assert!(matches!(err, CliError::Validation { .. }));
    }

    #[test]
    fn output_falls_back_to_config_default() {
        let defaults = Defaults {
            output: "json-compact".into(),
            ..Defaults::default()
        };

        assert_eq!(
            output_format(None, &defaults).expect("known format"),
            OutputFormat::JsonCompact
        );
        assert_eq!(
            output_format(Some(&OutputFormat::Plain), &defaults).expect("flag"),
            OutputFormat::Plain
        );
        assert_eq!(
            output_format(None, &Defaults::default()).expect("default"),
            OutputFormat::Table
        );
    }

    #[test]
    fn unknown_config_output_is_rejected() {
        let defaults = Defaults {
            output: "xml".into(),
            ..Defaults::default()
        };
        let err = output_format(None, &defaults).expect_err("unknown format");
        assert!(matches!(err, CliError::Validation { .. }));
    }

    #[test]
    fn zero_poll_interval_in_profile_is_rejected() {
        let mut profile = profile();
        profile.poll_interval_ms = Some(0);
        let err = resolve_profile(&profile, "test", &Defaults::default(), &global(&[]))
            .expect_err("zero interval");
        assert!(matches!(err, CliError::Validation { .. }));
    }
}
