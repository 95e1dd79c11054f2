//! High-level simulation session.
//!
//! A `Simulation` owns one configuration document, remembers the pristine
//! copy it was loaded from, and drives the whole exchange: validate,
//! serialize, send, classify. Collaborators (the protocol client) are
//! passed in explicitly; there is no process-wide state.

use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::config::{ConfigDocument, ConfigError, ConfigValue, Section};
use crate::protocol::{Client, ProtocolError};
use crate::result::ResultView;
use crate::templates;
use crate::validate::{Issue, validate};

/// Hard cap applied to `sensor_science.FieldOfView` on load.
///
/// Templates may request very large fields of view (2048 for MICADO) that
/// make the server time out. Values above the cap are reduced when a
/// document is loaded; callers can still raise the value afterwards via
/// [`Simulation::set`].
pub const MAX_FIELD_OF_VIEW: i64 = 512;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("no instrument template named '{name}'; available: {available}")]
    UnknownTemplate { name: String, available: String },
    #[error("config has errors:\n{}", format_issues(issues))]
    InvalidConfig { issues: Vec<Issue> },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

fn format_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(Issue::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// One changed parameter relative to the loaded document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    pub section: String,
    pub key: String,
    pub old: Option<ConfigValue>,
    pub new: Option<ConfigValue>,
}

#[derive(Debug)]
pub struct Simulation {
    instrument: Option<String>,
    document: ConfigDocument,
    original: ConfigDocument,
}

impl Simulation {
    /// Start from a bundled instrument template.
    pub fn from_template(name: &str) -> Result<Self, SimulationError> {
        let Some(text) = templates::find_instrument(name) else {
            return Err(SimulationError::UnknownTemplate {
                name: name.to_string(),
                available: templates::list_instruments().join(", "),
            });
        };
        let mut simulation = Self::from_ini_str(text)?;
        simulation.instrument = Some(name.strip_suffix(".ini").unwrap_or(name).to_string());
        Ok(simulation)
    }

    /// Start from a dialect file on disk.
    pub fn from_ini_path(path: &Path) -> Result<Self, SimulationError> {
        let document = ConfigDocument::from_path(path)?;
        Ok(Self::from_document(document))
    }

    /// Start from dialect text.
    pub fn from_ini_str(text: &str) -> Result<Self, SimulationError> {
        let document = ConfigDocument::parse(text)?;
        Ok(Self::from_document(document))
    }

    fn from_document(mut document: ConfigDocument) -> Self {
        cap_field_of_view(&mut document);
        Self {
            instrument: None,
            original: document.clone(),
            document,
        }
    }

    /// Template name this session was loaded from, if any.
    pub fn instrument(&self) -> Option<&str> {
        self.instrument.as_deref()
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut ConfigDocument {
        &mut self.document
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&ConfigValue> {
        self.document.get(section, key)
    }

    pub fn set(&mut self, section: &str, key: &str, value: impl Into<ConfigValue>) {
        self.document.set(section, key, value);
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.document.section(name)
    }

    /// The dialect text that would be sent to the service.
    pub fn ini_contents(&self) -> String {
        self.document.serialize()
    }

    /// Write the current document to a dialect file.
    pub fn save(&self, path: &Path) -> Result<(), SimulationError> {
        self.document.save(path)?;
        Ok(())
    }

    /// Discard all changes since load.
    pub fn reset(&mut self) {
        self.document = self.original.clone();
    }

    /// Changed, added, and removed keys relative to the loaded document.
    pub fn diff(&self) -> Vec<Change> {
        let mut changes = Vec::new();
        for (section, current) in self.document.sections() {
            for (key, new_value) in current {
                let old_value = self.original.get(section, key);
                if old_value != Some(new_value) {
                    changes.push(Change {
                        section: section.to_string(),
                        key: key.clone(),
                        old: old_value.cloned(),
                        new: Some(new_value.clone()),
                    });
                }
            }
        }
        for (section, original) in self.original.sections() {
            for (key, old_value) in original {
                if self.document.get(section, key).is_none() {
                    changes.push(Change {
                        section: section.to_string(),
                        key: key.clone(),
                        old: Some(old_value.clone()),
                        new: None,
                    });
                }
            }
        }
        changes
    }

    /// Check the current document without contacting the service.
    pub fn validate(&self) -> Vec<Issue> {
        validate(&self.document)
    }

    /// Science wavelengths in microns (stored in metres in the document).
    pub fn wavelengths(&self) -> Vec<f64> {
        numeric_list(self.document.get("sources_science", "Wavelength"))
            .into_iter()
            .map(|metres| metres * 1e6)
            .collect()
    }

    /// Set science wavelengths from values in microns.
    pub fn set_wavelengths(&mut self, microns: &[f64]) {
        let metres: Vec<f64> = microns.iter().map(|value| value * 1e-6).collect();
        self.document.set("sources_science", "Wavelength", metres);
    }

    /// Science source positions as Cartesian `(x, y)` arcsec, computed
    /// from the polar `Zenith`/`Azimuth` parameters.
    pub fn positions(&self) -> Vec<(f64, f64)> {
        let zeniths = numeric_list(self.document.get("sources_science", "Zenith"));
        let azimuths = numeric_list(self.document.get("sources_science", "Azimuth"));
        zeniths
            .iter()
            .zip(&azimuths)
            .map(|(zenith, azimuth)| {
                let azimuth_rad = azimuth.to_radians();
                (zenith * azimuth_rad.cos(), zenith * azimuth_rad.sin())
            })
            .collect()
    }

    /// Set science source positions from Cartesian `(x, y)` arcsec.
    pub fn set_positions(&mut self, positions: &[(f64, f64)]) {
        let mut zeniths = Vec::with_capacity(positions.len());
        let mut azimuths = Vec::with_capacity(positions.len());
        for &(x, y) in positions {
            zeniths.push(round6(x.hypot(y)));
            azimuths.push(round6(y.atan2(x).to_degrees()));
        }
        self.document.set("sources_science", "Zenith", zeniths);
        self.document.set("sources_science", "Azimuth", azimuths);
    }

    /// Validate, send to the service, and wrap the returned container.
    ///
    /// Any Error-severity validation issue aborts before the network call.
    pub fn generate_psf(
        &self,
        client: &Client,
        timeout: Duration,
    ) -> Result<ResultView, SimulationError> {
        let errors: Vec<Issue> = self
            .validate()
            .into_iter()
            .filter(Issue::is_error)
            .collect();
        if !errors.is_empty() {
            return Err(SimulationError::InvalidConfig { issues: errors });
        }
        let container = client.send(&self.ini_contents(), timeout)?;
        Ok(ResultView::new(container))
    }
}

fn cap_field_of_view(document: &mut ConfigDocument) {
    if let Some(fov) = document
        .get("sensor_science", "FieldOfView")
        .and_then(ConfigValue::as_f64)
    {
        if fov > MAX_FIELD_OF_VIEW as f64 {
            document.set("sensor_science", "FieldOfView", MAX_FIELD_OF_VIEW);
        }
    }
}

/// A numeric parameter that may be stored as a scalar or a list.
fn numeric_list(value: Option<&ConfigValue>) -> Vec<f64> {
    match value {
        Some(ConfigValue::List(items)) => {
            items.iter().filter_map(ConfigValue::as_f64).collect()
        }
        Some(scalar) => scalar.as_f64().into_iter().collect(),
        None => Vec::new(),
    }
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}
