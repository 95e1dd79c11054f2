//! Client library for the ESO TIPTOP PSF-simulation microservice.
//!
//! The crate covers the full exchange: the non-standard `.ini` dialect the
//! service accepts (`config`), the multipart wire protocol (`protocol`),
//! decoding of the returned FITS container (`fits`), and semantic access to
//! its frames (`result`). A `Simulation` session ties the pieces together
//! with bundled instrument templates and client-side validation.
//!
//! Invariants:
//! - Parsing the dialect is tolerant: unrecognized values degrade to
//!   strings, never to errors.
//! - Serialize→parse round-trips preserve section/key order and value
//!   equality for the supported domain.
//! - Service-reported failures always surface with full diagnostic
//!   context; nothing is retried automatically.
//! - Returned containers are fully materialized; no transport-scoped
//!   buffer outlives the call that produced it.
//!
//! # Examples
//! ```no_run
//! use tiptop_core::{Client, DEFAULT_TIMEOUT, Simulation};
//!
//! let mut simulation = Simulation::from_template("ERIS")?;
//! simulation.set("atmosphere", "Seeing", 0.6);
//! let client = Client::new();
//! let result = simulation.generate_psf(&client, DEFAULT_TIMEOUT)?;
//! println!("wavelengths: {}", result.n_wavelengths());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod fits;
mod protocol;
mod result;
mod simulation;
mod templates;
mod validate;

pub use config::{ConfigDocument, ConfigError, ConfigValue, Section};
pub use fits::{BinaryContainer, CardValue, DataArray, FitsError, Frame, Header};
pub use protocol::{
    Client, DEFAULT_TIMEOUT, MultipartError, PartSummary, ProtocolError, SERVICE_DESCRIPTOR,
};
pub use result::{ResultError, ResultView};
pub use simulation::{Change, MAX_FIELD_OF_VIEW, Simulation, SimulationError};
pub use templates::{find_instrument, list_instruments};
pub use validate::{Issue, Severity, validate};
