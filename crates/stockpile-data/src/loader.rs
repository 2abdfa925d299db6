//! Resolution pipeline: reads facility data files, resolves resource names,
//! and builds validated [`FacilityConfig`]s.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers.

use crate::schema::{FacilityData, InputData, ProductionData, SlotData};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use stockpile_core::config::{
    ConsumptionMode, FacilityConfig, InputConfig, OutputConfig, ProductionConfig, SlotConfig,
};
use stockpile_core::error::ConfigError;
use stockpile_core::fixed::Fixed64;
use stockpile_core::resource::ResourceType;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A resource name could not be resolved.
    #[error("unknown resource '{name}' in facility '{facility}' ({file})")]
    UnknownResource {
        file: PathBuf,
        facility: String,
        name: String,
    },

    /// A consumption mode other than `per_tick` or `per_second`.
    #[error("unknown consumption mode '{mode}' in facility '{facility}' ({file})")]
    UnknownConsumption {
        file: PathBuf,
        facility: String,
        mode: String,
    },

    /// A number that is NaN, infinite, or outside the fixed-point range.
    #[error("{field} {value} in facility '{facility}' is out of range ({file})")]
    OutOfRange {
        file: PathBuf,
        facility: String,
        field: &'static str,
        value: f64,
    },

    /// Two facilities share a name.
    #[error("duplicate facility '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// The facility resolved but its configuration is invalid.
    #[error("invalid facility '{facility}' in {file}: {source}")]
    Invalid {
        file: PathBuf,
        facility: String,
        #[source]
        source: ConfigError,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for `{base_name}.ron`, `.toml` or `.json`.
///
/// Returns `Ok(None)` if none exists, or `Err(ConflictingFormats)` if more
/// than one does.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Parse `content` as a list in the given format. TOML has no top-level
/// arrays, so for TOML the list is read from `toml_key` of the root table.
pub fn parse_list<T: DeserializeOwned>(
    content: &str,
    format: Format,
    toml_key: &str,
    file: &Path,
) -> Result<Vec<T>, DataLoadError> {
    let parse_err = |detail: String| DataLoadError::Parse {
        file: file.to_path_buf(),
        detail,
    };

    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Toml => {
            let table: toml::Table =
                toml::from_str(content).map_err(|e| parse_err(e.to_string()))?;
            let array = table
                .get(toml_key)
                .ok_or_else(|| parse_err(format!("missing key '{toml_key}' in TOML file")))?
                .clone();
            array
                .try_into()
                .map_err(|e: toml::de::Error| parse_err(e.to_string()))
        }
    }
}

/// Read a file and parse it as a list according to its extension.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_list(&content, format, toml_key, path)
}

// ===========================================================================
// Resolution
// ===========================================================================

/// Resolve and validate raw facility entries read from `file`.
pub fn resolve_facilities(
    data: Vec<FacilityData>,
    file: &Path,
) -> Result<Vec<FacilityConfig>, DataLoadError> {
    let mut configs: Vec<FacilityConfig> = Vec::with_capacity(data.len());

    for entry in data {
        if configs.iter().any(|c| c.name == entry.name) {
            return Err(DataLoadError::DuplicateName {
                file: file.to_path_buf(),
                name: entry.name,
            });
        }

        let resolver = Resolver {
            file,
            facility: &entry.name,
        };
        let config = FacilityConfig {
            name: entry.name.clone(),
            input: entry.input.as_ref().map(|i| resolver.input(i)).transpose()?,
            output: entry.output.as_ref().map(|o| resolver.output(o)).transpose()?,
            production: entry
                .production
                .as_ref()
                .map(|p| resolver.production(p))
                .transpose()?,
        };

        config.validate().map_err(|source| DataLoadError::Invalid {
            file: file.to_path_buf(),
            facility: entry.name.clone(),
            source,
        })?;
        if config.input.is_none() || config.output.is_none() || config.production.is_none() {
            log::info!("{}: facility '{}' is storage-only", file.display(), config.name);
        }
        configs.push(config);
    }

    Ok(configs)
}

/// Load every facility in a single data file.
pub fn load_facilities(path: &Path) -> Result<Vec<FacilityConfig>, DataLoadError> {
    let data: Vec<FacilityData> = deserialize_list(path, "facilities")?;
    resolve_facilities(data, path)
}

/// Load `facilities.{ron,toml,json}` from a data directory.
pub fn load_facilities_from_dir(dir: &Path) -> Result<Vec<FacilityConfig>, DataLoadError> {
    let path = require_data_file(dir, "facilities")?;
    load_facilities(&path)
}

struct Resolver<'a> {
    file: &'a Path,
    facility: &'a str,
}

impl Resolver<'_> {
    fn resource(&self, name: &str) -> Result<ResourceType, DataLoadError> {
        ResourceType::from_name(name).ok_or_else(|| DataLoadError::UnknownResource {
            file: self.file.to_path_buf(),
            facility: self.facility.to_string(),
            name: name.to_string(),
        })
    }

    fn number(&self, field: &'static str, value: f64) -> Result<Fixed64, DataLoadError> {
        Fixed64::checked_from_num(value).ok_or_else(|| DataLoadError::OutOfRange {
            file: self.file.to_path_buf(),
            facility: self.facility.to_string(),
            field,
            value,
        })
    }

    fn slot(&self, slot: &SlotData) -> Result<SlotConfig, DataLoadError> {
        Ok(
            SlotConfig::new(
                self.resource(slot.resource())?,
                self.number("capacity", slot.capacity())?,
            )
            .with_initial(self.number("initial", slot.initial())?),
        )
    }

    fn input(&self, input: &InputData) -> Result<InputConfig, DataLoadError> {
        let slots = input
            .slots
            .iter()
            .map(|s| self.slot(s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(InputConfig {
            slots,
            priority: input.priority,
            request_threshold: self.number("request_threshold", input.request_threshold)?,
            fulfill_threshold: self.number("fulfill_threshold", input.fulfill_threshold)?,
        })
    }

    fn output(&self, output: &SlotData) -> Result<OutputConfig, DataLoadError> {
        let slot = self.slot(output)?;
        Ok(OutputConfig {
            resource_type: slot.resource_type,
            capacity: slot.capacity,
            initial: slot.initial,
        })
    }

    fn production(&self, production: &ProductionData) -> Result<ProductionConfig, DataLoadError> {
        let consumption = match production.consumption.as_deref() {
            None | Some("per_tick") => ConsumptionMode::PerTick,
            Some("per_second") => ConsumptionMode::PerSecond,
            Some(other) => {
                return Err(DataLoadError::UnknownConsumption {
                    file: self.file.to_path_buf(),
                    facility: self.facility.to_string(),
                    mode: other.to_string(),
                });
            }
        };
        Ok(ProductionConfig {
            base_rate: self.number("base_rate", production.base_rate)?,
            per_module_rate: self.number("per_module_rate", production.per_module_rate)?,
            cost_per_cycle: self.number("cost_per_cycle", production.cost_per_cycle)?,
            consumption,
        })
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use stockpile_core::test_utils::fixed;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "stockpile_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Clean up a test directory.
    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    const SMELTER_RON: &str = r#"[
        (
            name: "smelter",
            input: Some((slots: [("iron_ore", 100.0), ("coal", 50.0)], priority: 4)),
            output: Some(("iron_ingot", 20.0)),
            production: Some((base_rate: 2.0, per_module_rate: 0.5)),
        ),
    ]"#;

    const SAWMILL_TOML: &str = r#"
        [[facilities]]
        name = "sawmill"
        output = { resource = "plank", capacity = 30.0 }
        production = { base_rate = 1.5, consumption = "per_second" }

        [facilities.input]
        slots = [{ resource = "wood", capacity = 40.0, initial = 40.0 }]
        request_threshold = 0.1
    "#;

    // -----------------------------------------------------------------------
    // detect_format
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("f.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("f.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("f.json")).unwrap(), Format::Json);
    }

    #[test]
    fn detect_format_unsupported() {
        for name in ["facilities.yaml", "facilities"] {
            assert!(matches!(
                detect_format(Path::new(name)),
                Err(DataLoadError::UnsupportedFormat { .. })
            ));
        }
    }

    // -----------------------------------------------------------------------
    // find_data_file / require_data_file
    // -----------------------------------------------------------------------

    #[test]
    fn find_data_file_missing_and_found() {
        let dir = make_test_dir("find");
        assert_eq!(find_data_file(&dir, "facilities").unwrap(), None);

        fs::write(dir.join("facilities.json"), "[]").unwrap();
        assert_eq!(
            find_data_file(&dir, "facilities").unwrap(),
            Some(dir.join("facilities.json"))
        );

        cleanup(&dir);
    }

    #[test]
    fn find_data_file_conflict() {
        let dir = make_test_dir("conflict");
        fs::write(dir.join("facilities.ron"), "[]").unwrap();
        fs::write(dir.join("facilities.json"), "[]").unwrap();

        assert!(matches!(
            find_data_file(&dir, "facilities"),
            Err(DataLoadError::ConflictingFormats { .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn require_data_file_missing() {
        let dir = make_test_dir("require_missing");
        let err = require_data_file(&dir, "facilities").unwrap_err();
        assert!(err.to_string().contains("'facilities' not found"), "got: {err}");
        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // Parsing and resolution
    // -----------------------------------------------------------------------

    #[test]
    fn ron_facility_resolves() {
        let file = Path::new("facilities.ron");
        let data: Vec<FacilityData> = parse_list(SMELTER_RON, Format::Ron, "facilities", file).unwrap();
        let configs = resolve_facilities(data, file).unwrap();

        assert_eq!(configs.len(), 1);
        let smelter = &configs[0];
        let input = smelter.input.as_ref().unwrap();
        assert_eq!(input.priority, 4);
        assert_eq!(input.slots[1].resource_type, ResourceType::Coal);
        assert_eq!(input.slots[1].capacity, fixed(50.0));
        assert_eq!(
            smelter.output.as_ref().unwrap().resource_type,
            ResourceType::IronIngot
        );
        let production = smelter.production.as_ref().unwrap();
        assert_eq!(production.per_module_rate, fixed(0.5));
        assert_eq!(production.consumption, ConsumptionMode::PerTick);
    }

    #[test]
    fn toml_facility_resolves() {
        let file = Path::new("facilities.toml");
        let data: Vec<FacilityData> =
            parse_list(SAWMILL_TOML, Format::Toml, "facilities", file).unwrap();
        let configs = resolve_facilities(data, file).unwrap();

        let sawmill = &configs[0];
        let input = sawmill.input.as_ref().unwrap();
        assert_eq!(input.slots[0].initial, fixed(40.0));
        assert_eq!(input.request_threshold, fixed(0.1));
        assert_eq!(
            sawmill.production.as_ref().unwrap().consumption,
            ConsumptionMode::PerSecond
        );
    }

    #[test]
    fn toml_missing_key() {
        let result: Result<Vec<FacilityData>, _> =
            parse_list("other = 1", Format::Toml, "facilities", Path::new("f.toml"));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("missing key 'facilities'"), "got: {err}");
    }

    #[test]
    fn unknown_resource_rejected() {
        let json = r#"[{ "name": "mint", "output": ["gold", 10.0] }]"#;
        let file = Path::new("facilities.json");
        let data: Vec<FacilityData> = parse_list(json, Format::Json, "facilities", file).unwrap();
        let err = resolve_facilities(data, file).unwrap_err();
        assert!(
            matches!(&err, DataLoadError::UnknownResource { name, .. } if name == "gold"),
            "got: {err}"
        );
    }

    #[test]
    fn unknown_consumption_rejected() {
        let json = r#"[{ "name": "mill", "production": { "base_rate": 1.0, "consumption": "per_fortnight" } }]"#;
        let file = Path::new("facilities.json");
        let data: Vec<FacilityData> = parse_list(json, Format::Json, "facilities", file).unwrap();
        assert!(matches!(
            resolve_facilities(data, file),
            Err(DataLoadError::UnknownConsumption { .. })
        ));
    }

    #[test]
    fn duplicate_names_rejected() {
        let json = r#"[{ "name": "depot" }, { "name": "depot" }]"#;
        let file = Path::new("facilities.json");
        let data: Vec<FacilityData> = parse_list(json, Format::Json, "facilities", file).unwrap();
        assert!(matches!(
            resolve_facilities(data, file),
            Err(DataLoadError::DuplicateName { .. })
        ));
    }

    #[test]
    fn invalid_thresholds_reported_with_facility() {
        let json = r#"[{
            "name": "kiln",
            "input": { "slots": [["stone", 10.0]], "request_threshold": 0.9, "fulfill_threshold": 0.5 }
        }]"#;
        let file = Path::new("facilities.json");
        let data: Vec<FacilityData> = parse_list(json, Format::Json, "facilities", file).unwrap();
        let err = resolve_facilities(data, file).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::Invalid {
                source: ConfigError::ThresholdOrder { .. },
                ..
            }
        ));
        assert!(err.to_string().contains("kiln"), "got: {err}");
    }

    #[test]
    fn huge_capacity_rejected() {
        let json = r#"[{ "name": "silo", "output": ["wood", 1e12] }]"#;
        let file = Path::new("facilities.json");
        let data: Vec<FacilityData> = parse_list(json, Format::Json, "facilities", file).unwrap();
        let err = resolve_facilities(data, file).unwrap_err();
        assert!(
            matches!(&err, DataLoadError::OutOfRange { field: "capacity", facility, .. } if facility == "silo"),
            "got: {err}"
        );
    }

    #[test]
    fn non_finite_numbers_rejected() {
        let ron_str = r#"[(name: "mill", production: Some((base_rate: inf)))]"#;
        let file = Path::new("facilities.ron");
        let data: Vec<FacilityData> = parse_list(ron_str, Format::Ron, "facilities", file).unwrap();
        assert!(matches!(
            resolve_facilities(data, file),
            Err(DataLoadError::OutOfRange { field: "base_rate", .. })
        ));

        let ron_str = r#"[(name: "kiln", input: Some((slots: [("stone", 10.0)], request_threshold: NaN)))]"#;
        let data: Vec<FacilityData> = parse_list(ron_str, Format::Ron, "facilities", file).unwrap();
        assert!(matches!(
            resolve_facilities(data, file),
            Err(DataLoadError::OutOfRange { field: "request_threshold", .. })
        ));
    }

    #[test]
    fn zero_capacity_rejected_at_load() {
        let json = r#"[{ "name": "bin", "output": ["plank", 0.0] }]"#;
        let file = Path::new("facilities.json");
        let data: Vec<FacilityData> = parse_list(json, Format::Json, "facilities", file).unwrap();
        assert!(matches!(
            resolve_facilities(data, file),
            Err(DataLoadError::Invalid {
                source: ConfigError::NonPositiveCapacity { .. },
                ..
            })
        ));
    }

    #[test]
    fn parse_error_names_file() {
        let result: Result<Vec<FacilityData>, _> =
            parse_list("[{", Format::Json, "facilities", Path::new("broken.json"));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("broken.json"), "got: {err}");
    }

    #[test]
    fn load_from_dir() {
        let dir = make_test_dir("load_dir");
        fs::write(dir.join("facilities.ron"), SMELTER_RON).unwrap();

        let configs = load_facilities_from_dir(&dir).unwrap();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].name, "smelter");

        cleanup(&dir);
    }
}
