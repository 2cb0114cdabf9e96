use crate::core::outcome::{Outcome, ParseError};
use crate::core::scanner::Scanner;
use crate::domain::model::{
    normalize_preference_name, Activity, Location, LocationId, Polarity, Preference,
};
use crate::domain::ports::{ClientNameStore, LocationStore, LogSink, PreferenceStore};
use std::path::Path;

/// What a successful load produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadSummary {
    pub location: Option<LocationId>,
    pub warnings: Vec<ParseError>,
}

/// Parser-local state, fresh for every load.
#[derive(Debug, Default)]
struct ParseState {
    current_location: Option<Location>,
    /// Index into `current_location`'s activities.
    current_activity: Option<usize>,
}

/// Interprets location files and registers what they define.
pub struct FileInterpreter<'a> {
    preferences: &'a mut dyn PreferenceStore,
    clients: &'a mut dyn ClientNameStore,
    locations: &'a mut dyn LocationStore,
    console: &'a dyn LogSink,
}

impl<'a> FileInterpreter<'a> {
    pub fn new(
        preferences: &'a mut dyn PreferenceStore,
        clients: &'a mut dyn ClientNameStore,
        locations: &'a mut dyn LocationStore,
        console: &'a dyn LogSink,
    ) -> Self {
        Self {
            preferences,
            clients,
            locations,
            console,
        }
    }

    /// Loads one file. Returns true iff it parsed without a fatal error.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.console
                    .error(&format!("Could not open file: {} ({})", path.display(), e));
                return false;
            }
        };

        self.load_bytes(&path.display().to_string(), &bytes).is_ok()
    }

    /// Interprets `bytes` in a single forward pass. The location is only
    /// registered once the whole stream has been consumed.
    pub fn load_bytes(&mut self, source: &str, bytes: &[u8]) -> Result<LoadSummary, ParseError> {
        let error_output = format!("Error reading file ({}): ", source);
        let mut scanner = Scanner::new(bytes);
        let mut state = ParseState::default();
        let mut warnings = Vec::new();

        loop {
            let keyword = match scanner.parse_keyword() {
                Ok(keyword) => keyword,
                Err(ParseError::EndOfInput) => break,
                Err(e) => {
                    self.check(Outcome::from(Err(e)), &error_output, &mut warnings)?;
                    continue;
                }
            };

            let outcome = Outcome::from(self.handle_keyword(&keyword, &mut scanner, &mut state));
            self.check(outcome, &error_output, &mut warnings)?;
        }

        self.console
            .info(&format!("File {} loaded successfully", source));

        let location = state
            .current_location
            .map(|location| self.locations.add_location(location));

        Ok(LoadSummary { location, warnings })
    }

    fn check(
        &self,
        outcome: Outcome,
        error_output: &str,
        warnings: &mut Vec<ParseError>,
    ) -> Result<(), ParseError> {
        match outcome {
            Outcome::Success => Ok(()),
            Outcome::Warning(warning) => {
                self.console.warn(&format!("{}{}", error_output, warning));
                warnings.push(warning);
                Ok(())
            }
            Outcome::Fatal(error) => {
                self.console.error(&format!("{}{}", error_output, error));
                Err(error)
            }
        }
    }

    fn handle_keyword(
        &mut self,
        keyword: &str,
        scanner: &mut Scanner<'_>,
        state: &mut ParseState,
    ) -> Result<(), ParseError> {
        tracing::debug!(keyword, offset = scanner.position(), "handling keyword");

        match keyword {
            "location" => {
                if state.current_location.is_some() {
                    return Err(ParseError::LocationRedefined);
                }
                let name = scanner.parse_string()?;
                state.current_location = Some(Location::new(name));
            }
            "activity" => {
                let location = state
                    .current_location
                    .as_mut()
                    .ok_or(ParseError::ActivityWithoutLocation)?;
                let name = scanner.parse_string()?;
                state.current_activity = Some(location.add_activity(Activity::new(name)));
            }
            "preference+" => self.attach_preference(scanner, state, Polarity::Positive)?,
            "preference-" => self.attach_preference(scanner, state, Polarity::Negative)?,
            "add_preference" => {
                let name = normalize_preference_name(&scanner.parse_string()?);
                if self.preferences.insert(Preference::new(&name)).is_none() {
                    return Err(ParseError::DuplicatePreference(name));
                }
            }
            "name" => {
                let name = scanner.parse_string()?;
                self.clients.add_name(name);
            }
            other => return Err(ParseError::UnknownKeyword(other.to_string())),
        }

        Ok(())
    }

    fn attach_preference(
        &mut self,
        scanner: &mut Scanner<'_>,
        state: &mut ParseState,
        polarity: Polarity,
    ) -> Result<(), ParseError> {
        let index = state
            .current_activity
            .ok_or(ParseError::PreferenceWithoutActivity)?;
        let name = normalize_preference_name(&scanner.parse_string()?);

        let preference = self
            .preferences
            .lookup(&name)
            .ok_or(ParseError::UndefinedPreference(name))?;

        let activity = state
            .current_location
            .as_mut()
            .and_then(|location| location.activity_mut(index))
            .ok_or(ParseError::PreferenceWithoutActivity)?;
        activity.add_preference(preference, polarity);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::Catalog;
    use crate::utils::console::MemorySink;

    fn load(catalog: &mut Catalog, sink: &MemorySink, text: &str) -> Result<LoadSummary, ParseError> {
        catalog.interpreter(sink).load_bytes("test.loc", text.as_bytes())
    }

    #[test]
    fn test_park_example() {
        let mut catalog = Catalog::new();
        let sink = MemorySink::default();
        let text = "location \"Park\"\nactivity \"Picnic\"\nadd_preference \"sun\"\npreference+ \"sun\"\n";

        let summary = load(&mut catalog, &sink, text).unwrap();
        let location = catalog.locations.get(summary.location.unwrap()).unwrap();
        assert_eq!(location.name(), "Park");
        assert_eq!(location.activities().len(), 1);

        let picnic = &location.activities()[0];
        assert_eq!(picnic.name(), "Picnic");
        let sun = catalog.preferences.lookup("sun").unwrap();
        assert_eq!(picnic.positive_preferences(), &[sun]);
        assert!(summary.warnings.is_empty());
        assert_eq!(sink.infos(), vec!["File test.loc loaded successfully"]);
    }

    #[test]
    fn test_preference_before_activity_is_fatal() {
        let mut catalog = Catalog::new();
        let sink = MemorySink::default();
        let text = "add_preference \"sun\"\nlocation \"Park\"\npreference- \"sun\"\n";

        assert_eq!(
            load(&mut catalog, &sink, text),
            Err(ParseError::PreferenceWithoutActivity)
        );
        assert!(catalog.locations.is_empty());
        assert_eq!(
            sink.errors(),
            vec!["Error reading file (test.loc): Activity must be defined before a preference"]
        );
    }

    #[test]
    fn test_unknown_keyword_is_fatal() {
        let mut catalog = Catalog::new();
        let sink = MemorySink::default();

        assert_eq!(
            load(&mut catalog, &sink, "location \"Park\"\nweather \"rain\"\n"),
            Err(ParseError::UnknownKeyword("weather".into()))
        );
        assert!(catalog.locations.is_empty());
    }

    #[test]
    fn test_non_utf8_preference_names_are_rejected() {
        let mut catalog = Catalog::new();
        let sink = MemorySink::default();

        let result = catalog
            .interpreter(&sink)
            .load_bytes("test.loc", b"add_preference \"\xff\"\nadd_preference \"\xfe\"\n");

        assert_eq!(result, Err(ParseError::InvalidEncoding));
        assert!(catalog.preferences.is_empty());
        assert_eq!(
            sink.errors(),
            vec!["Error reading file (test.loc): Text is not valid UTF-8"]
        );
    }

    #[test]
    fn test_name_is_not_lowercased() {
        let mut catalog = Catalog::new();
        let sink = MemorySink::default();

        load(&mut catalog, &sink, "name \"Ada Lovelace\"\nname \"BOB\"\n").unwrap();
        assert_eq!(catalog.clients.names(), &["Ada Lovelace", "BOB"]);
    }

    #[test]
    fn test_file_without_location_registers_nothing() {
        let mut catalog = Catalog::new();
        let sink = MemorySink::default();

        let summary = load(&mut catalog, &sink, "add_preference \"Sun\"\n").unwrap();
        assert_eq!(summary.location, None);
        assert!(catalog.locations.is_empty());
        assert!(catalog.preferences.lookup("sun").is_some());
    }

    #[test]
    fn test_state_resets_between_loads() {
        let mut catalog = Catalog::new();
        let sink = MemorySink::default();

        load(&mut catalog, &sink, "location \"Park\"\n").unwrap();
        load(&mut catalog, &sink, "location \"Beach\"\n").unwrap();
        assert_eq!(catalog.locations.len(), 2);

        // A second file cannot attach activities to the previous location.
        assert_eq!(
            load(&mut catalog, &sink, "activity \"Swim\"\n"),
            Err(ParseError::ActivityWithoutLocation)
        );
    }

    #[test]
    fn test_missing_file_fails() {
        let mut catalog = Catalog::new();
        let sink = MemorySink::default();

        assert!(!catalog.interpreter(&sink).load_file("/definitely/not/here.loc"));
        assert_eq!(sink.errors().len(), 1);
        assert!(sink.errors()[0].starts_with("Could not open file: "));
    }
}
