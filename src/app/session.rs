use crate::adapters::memory::Catalog;
use crate::config::{OutputFormat, Settings};
use crate::core::report::unlocked_hints;
use crate::domain::model::{Client, LocationId};
use crate::domain::ports::LogSink;
use crate::utils::console::prompt_int;
use crate::utils::error::{ImagelynError, Result};
use std::io::{BufRead, Write};

/// One run of the tool: load files, register clients, print reports.
pub struct Session<'s> {
    settings: Settings,
    catalog: Catalog,
    console: &'s dyn LogSink,
}

impl<'s> Session<'s> {
    pub fn new(settings: Settings, console: &'s dyn LogSink) -> Self {
        Self {
            settings,
            catalog: Catalog::new(),
            console,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn run(&mut self) -> Result<Vec<String>> {
        self.load_files()?;
        self.register_clients()?;
        self.generate_reports()
    }

    /// Stops at the first file that fails to interpret.
    pub fn load_files(&mut self) -> Result<()> {
        for path in &self.settings.files {
            tracing::info!("📁 Loading {}", path.display());
            if !self.catalog.interpreter(self.console).load_file(path) {
                return Err(ImagelynError::LoadFailed {
                    path: path.display().to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn register_clients(&mut self) -> Result<()> {
        for config in &self.settings.clients {
            let preferences = self.catalog.preferences.resolve(&config.preferences)?;
            let known = self.catalog.clients.names();
            if !known.is_empty() && !known.contains(&config.name) {
                self.console.warn(&format!(
                    "Client ({}) is not declared by any name directive",
                    config.name
                ));
            }
            self.catalog
                .clients
                .add_client(Client::new(config.name.clone(), preferences));
        }
        Ok(())
    }

    /// Lets the user pick a location when several are loaded and none was
    /// selected up front.
    pub fn choose_location<R: BufRead, W: Write>(
        &mut self,
        reader: &mut R,
        writer: &mut W,
    ) -> Result<()> {
        if self.settings.location.is_some() || self.catalog.locations.len() < 2 {
            return Ok(());
        }

        let names: Vec<String> = self
            .catalog
            .locations
            .iter()
            .map(|(_, location)| location.name().to_string())
            .collect();
        for (i, name) in names.iter().enumerate() {
            writeln!(writer, "{}. {}", i + 1, name)?;
        }

        // 長度已檢查至少為 2
        let upper = u32::try_from(names.len()).unwrap_or(u32::MAX);
        let choice = prompt_int(reader, writer, 1, upper, "Choose a location")?;
        self.settings.location = names.into_iter().nth(choice as usize - 1);
        Ok(())
    }

    fn selected_locations(&self) -> Result<Vec<LocationId>> {
        match &self.settings.location {
            Some(name) => self
                .catalog
                .locations
                .find(name)
                .map(|id| vec![id])
                .ok_or_else(|| ImagelynError::UnknownLocation { name: name.clone() }),
            None => Ok(self.catalog.locations.iter().map(|(id, _)| id).collect()),
        }
    }

    fn selected_clients(&self) -> Result<Vec<Client>> {
        let clients: Vec<Client> = match &self.settings.only_client {
            Some(name) => vec![self
                .catalog
                .clients
                .find_client(name)
                .cloned()
                .ok_or_else(|| ImagelynError::UnknownClient { name: name.clone() })?],
            None => self.catalog.clients.clients().to_vec(),
        };

        if clients.is_empty() {
            return Err(ImagelynError::ConfigError {
                message: "no clients configured".to_string(),
            });
        }
        Ok(clients)
    }

    /// One rendered report per (client, location) pair.
    pub fn generate_reports(&mut self) -> Result<Vec<String>> {
        let locations = self.selected_locations()?;
        let clients = self.selected_clients()?;
        let mut rendered = Vec::new();

        for client in &clients {
            for &location in &locations {
                let activities = self.catalog.locations.activity_refs(location);
                let report = self.catalog.reports.generate(
                    client,
                    &activities,
                    &mut self.catalog.locations,
                    self.settings.weights,
                )?;

                let output = match self.settings.output {
                    OutputFormat::Json => {
                        report.to_json(&self.catalog.preferences, &self.catalog.locations)?
                    }
                    OutputFormat::Text => {
                        let mut text =
                            report.render(&self.catalog.preferences, &self.catalog.locations);
                        let hints = unlocked_hints(
                            &activities,
                            &self.catalog.preferences,
                            &self.catalog.locations,
                        );
                        if !hints.is_empty() {
                            text.push_str("\nHints:");
                            for hint in hints {
                                text.push_str("\n  * ");
                                text.push_str(&hint);
                            }
                        }
                        text
                    }
                };
                rendered.push(output);
            }
        }

        Ok(rendered)
    }
}
