//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
        ConfigCommand::Show => {
            let shown = config::load_config_or_default().redacted().to_toml()?;
            output::print_output(shown.trim_end(), global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{Config, Profile};

    #[test]
    fn tokens_are_masked() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "prod".into(),
            Profile {
                api: "https://api.example.com".into(),
                organization: "platform".into(),
                token: Some("super-secret".into()),
                ..Profile::default()
            },
        );

        let shown = cfg.redacted().to_toml().expect("serializable");
        assert!(shown.contains("[profiles.prod]"));
        assert!(shown.contains("token = \"****\""));
        assert!(!shown.contains("super-secret"));
        assert!(cfg.to_toml().expect("serializable").contains("super-secret"));
    }
}
