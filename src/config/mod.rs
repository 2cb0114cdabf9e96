pub mod toml_config;

use crate::core::report::ScoreWeights;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::path::PathBuf;
pub use toml_config::{ClientConfig, TomlConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Everything a session needs, merged from the TOML file and the command line.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub files: Vec<PathBuf>,
    pub clients: Vec<ClientConfig>,
    /// Restricts reports to one client by name.
    pub only_client: Option<String>,
    /// Restricts reports to one location by name.
    pub location: Option<String>,
    pub weights: ScoreWeights,
    pub output: OutputFormat,
    pub interactive: bool,
}

impl Settings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        Self {
            files: config.session.files.iter().map(PathBuf::from).collect(),
            clients: config.clients().to_vec(),
            only_client: None,
            location: config.report_location().map(str::to_string),
            weights: config.weights(),
            output: if config.report_format() == "json" {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            interactive: false,
        }
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_list("files", &self.files)?;
        for client in &self.clients {
            validation::validate_non_empty_string("clients.name", &client.name)?;
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use super::{ClientConfig, OutputFormat, Settings, TomlConfig};
    use crate::utils::error::Result;
    use crate::utils::validation::Validate;
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "imagelyn")]
    #[command(about = "Matches client preferences against the activities of a location")]
    pub struct CliConfig {
        /// Location files to load, in order
        pub files: Vec<PathBuf>,

        /// Path to a TOML session file
        #[arg(short, long)]
        pub config: Option<PathBuf>,

        /// Only report for this client (or define it together with --likes)
        #[arg(long)]
        pub client: Option<String>,

        /// Preferences of the --client, comma separated
        #[arg(long, value_delimiter = ',', requires = "client")]
        pub likes: Vec<String>,

        /// Only report on this location
        #[arg(long)]
        pub location: Option<String>,

        #[arg(long)]
        pub positive_weight: Option<u32>,

        #[arg(long)]
        pub negative_weight: Option<u32>,

        /// Emit reports as JSON
        #[arg(long)]
        pub json: bool,

        /// Ask which location to visit when several are loaded
        #[arg(short, long)]
        pub interactive: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl CliConfig {
        pub fn load_toml(&self) -> Result<Option<TomlConfig>> {
            match &self.config {
                Some(path) => {
                    let config = TomlConfig::from_file(path)?;
                    config.validate()?;
                    Ok(Some(config))
                }
                None => Ok(None),
            }
        }

        /// 命令列參數覆蓋 TOML 設定
        pub fn settings(&self, toml: Option<&TomlConfig>) -> Settings {
            let mut settings = toml.map(Settings::from_toml).unwrap_or_default();

            settings.files.extend(self.files.iter().cloned());

            if let Some(name) = &self.client {
                if !self.likes.is_empty() {
                    settings.clients.push(ClientConfig {
                        name: name.clone(),
                        preferences: self.likes.clone(),
                    });
                }
                settings.only_client = Some(name.clone());
            }

            if let Some(location) = &self.location {
                settings.location = Some(location.clone());
            }
            if let Some(weight) = self.positive_weight {
                settings.weights.positive = weight;
            }
            if let Some(weight) = self.negative_weight {
                settings.weights.negative = weight;
            }
            if self.json {
                settings.output = OutputFormat::Json;
            }
            settings.interactive = self.interactive;

            settings
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_cli_overrides_toml() {
            let toml = TomlConfig::from_toml_str(
                "[session]\nfiles = [\"park.loc\"]\n[scoring]\nnegative_weight = 4\n",
            )
            .unwrap();
            let cli = CliConfig::parse_from([
                "imagelyn",
                "beach.loc",
                "--client",
                "Ada",
                "--likes",
                "sun,quiet",
                "--positive-weight",
                "2",
                "--json",
            ]);

            let settings = cli.settings(Some(&toml));
            assert_eq!(
                settings.files,
                vec![PathBuf::from("park.loc"), PathBuf::from("beach.loc")]
            );
            assert_eq!(settings.clients.len(), 1);
            assert_eq!(settings.clients[0].preferences, vec!["sun", "quiet"]);
            assert_eq!(settings.only_client.as_deref(), Some("Ada"));
            assert_eq!(settings.weights.positive, 2);
            assert_eq!(settings.weights.negative, 4);
            assert_eq!(settings.output, OutputFormat::Json);
        }

        #[test]
        fn test_settings_require_files() {
            let cli = CliConfig::parse_from(["imagelyn"]);
            assert!(cli.settings(None).validate().is_err());
        }
    }
}
