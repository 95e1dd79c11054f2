//! Semantic access to a decoded result container.
//!
//! The service returns one PSF-cube frame per requested wavelength plus
//! open-loop, diffraction-limited and radial-profile frames, each tagged
//! with a CONTENT marker card. Older service versions sent a three-frame
//! layout with no markers; those are classified by shape instead. Per-
//! position metrics (Strehl, FWHM) and coordinates come from indexed
//! header-card families on the cube frames.

pub mod classify;
pub mod error;

use classify::Classification;

use crate::fits::{BinaryContainer, DataArray, layout};

pub use error::ResultError;

/// Read-only classified view over a [`BinaryContainer`].
///
/// Classification happens once at construction; the view never mutates.
/// Concurrent reads are safe after construction completes.
#[derive(Debug)]
pub struct ResultView {
    container: BinaryContainer,
    classification: Classification,
}

impl ResultView {
    pub fn new(container: BinaryContainer) -> Self {
        let classification = classify::classify(&container);
        Self {
            container,
            classification,
        }
    }

    pub fn container(&self) -> &BinaryContainer {
        &self.container
    }

    /// Write the raw container bytes to a file.
    pub fn save(&self, path: &std::path::Path) -> std::io::Result<()> {
        self.container.save(path)
    }

    /// Number of wavelength channels (PSF-cube frames).
    pub fn n_wavelengths(&self) -> usize {
        self.classification.psf_cubes.len()
    }

    /// Number of simulated source positions.
    pub fn n_positions(&self) -> usize {
        if let Ok(xs) = self.x() {
            return xs.len();
        }
        match self.psf_cube(0) {
            Ok(cube) if cube.ndim() == 3 => cube.shape()[0],
            Ok(_) => 1,
            Err(_) => 0,
        }
    }

    /// The first wavelength's PSF data.
    pub fn psf(&self) -> Result<&DataArray, ResultError> {
        self.psf_cube(0)
    }

    /// PSF cube for one wavelength channel, shape `(positions, H, W)`.
    pub fn psf_cube(&self, wavelength_index: usize) -> Result<&DataArray, ResultError> {
        let count = self.classification.psf_cubes.len();
        let frame_index = *self
            .classification
            .psf_cubes
            .get(wavelength_index)
            .ok_or(ResultError::IndexOutOfRange {
                index: wavelength_index,
                count,
            })?;
        self.frame_data(frame_index, "PSF cube")
    }

    pub fn open_loop_psf(&self) -> Result<&DataArray, ResultError> {
        match self.classification.open_loop {
            Some(index) => self.frame_data(index, "open-loop PSF"),
            None => Err(ResultError::RoleNotFound {
                role: "open-loop PSF",
            }),
        }
    }

    pub fn diffraction_psf(&self) -> Result<&DataArray, ResultError> {
        match self.classification.diffraction {
            Some(index) => self.frame_data(index, "diffraction-limited PSF"),
            None => Err(ResultError::RoleNotFound {
                role: "diffraction-limited PSF",
            }),
        }
    }

    pub fn profiles(&self) -> Result<&DataArray, ResultError> {
        match self.classification.profile {
            Some(index) => self.frame_data(index, "radial profiles"),
            None => Err(ResultError::RoleNotFound {
                role: "radial profiles",
            }),
        }
    }

    /// X coordinates of the source positions, arcsec.
    pub fn x(&self) -> Result<Vec<f64>, ResultError> {
        self.coordinates(layout::COORD_X_PREFIX, 0)
    }

    /// Y coordinates of the source positions, arcsec.
    pub fn y(&self) -> Result<Vec<f64>, ResultError> {
        self.coordinates(layout::COORD_Y_PREFIX, 1)
    }

    /// Per-position Strehl ratios.
    pub fn strehl(&self) -> Result<Vec<f64>, ResultError> {
        self.metric_series(layout::STREHL_PREFIX, "Strehl ratios")
    }

    /// Per-position FWHM, milliarcseconds.
    pub fn fwhm(&self) -> Result<Vec<f64>, ResultError> {
        self.metric_series(layout::FWHM_PREFIX, "FWHM values")
    }

    /// The PSF image nearest to `(x, y)` in arcsec for one wavelength.
    ///
    /// Picks the minimum squared Euclidean distance over the known
    /// coordinates; a cube without a position axis is returned unchanged.
    pub fn nearest_psf(
        &self,
        x: f64,
        y: f64,
        wavelength_index: usize,
    ) -> Result<DataArray, ResultError> {
        let xs = self.x()?;
        let ys = self.y()?;
        if xs.is_empty() {
            return Err(ResultError::RoleNotFound {
                role: "source coordinates",
            });
        }

        let mut nearest = 0usize;
        let mut nearest_r2 = f64::INFINITY;
        for (index, (cx, cy)) in xs.iter().zip(&ys).enumerate() {
            let r2 = (x - cx).powi(2) + (y - cy).powi(2);
            if r2 < nearest_r2 {
                nearest = index;
                nearest_r2 = r2;
            }
        }

        let cube = self.psf_cube(wavelength_index)?;
        if cube.ndim() == 3 {
            cube.plane(nearest).ok_or(ResultError::IndexOutOfRange {
                index: nearest,
                count: cube.shape()[0],
            })
        } else {
            Ok(cube.clone())
        }
    }

    fn frame_data(&self, frame_index: usize, role: &'static str) -> Result<&DataArray, ResultError> {
        self.container
            .frame(frame_index)
            .and_then(|frame| frame.data.as_ref())
            .ok_or(ResultError::RoleNotFound { role })
    }

    /// Coordinates come from the first cube's indexed cards; legacy
    /// containers fall back to the 2-row coordinate table.
    fn coordinates(&self, prefix: &str, table_row: usize) -> Result<Vec<f64>, ResultError> {
        if let Some(&frame_index) = self.classification.psf_cubes.first() {
            if let Some(frame) = self.container.frame(frame_index) {
                let series = frame.header.indexed_series(prefix);
                if !series.is_empty() {
                    return Ok(series);
                }
            }
        }
        if let Some(table_index) = self.classification.coord_table {
            if let Some(row) = self
                .container
                .frame(table_index)
                .and_then(|frame| frame.data.as_ref())
                .and_then(|data| data.row(table_row))
            {
                return Ok(row.to_vec());
            }
        }
        Err(ResultError::RoleNotFound {
            role: "source coordinates",
        })
    }

    fn metric_series(
        &self,
        prefix: &str,
        role: &'static str,
    ) -> Result<Vec<f64>, ResultError> {
        let series = self
            .classification
            .psf_cubes
            .first()
            .and_then(|&frame_index| self.container.frame(frame_index))
            .map(|frame| frame.header.indexed_series(prefix))
            .unwrap_or_default();
        if series.is_empty() {
            return Err(ResultError::RoleNotFound { role });
        }
        Ok(series)
    }
}
