mod common;

use tiptop_core::{BinaryContainer, ResultError, ResultView};

fn marker_view() -> ResultView {
    let bytes = common::marker_container(2, 3, 64);
    let container = BinaryContainer::parse(bytes).expect("parse container");
    ResultView::new(container)
}

fn legacy_view() -> ResultView {
    let bytes = common::legacy_container(3, 32);
    let container = BinaryContainer::parse(bytes).expect("parse container");
    ResultView::new(container)
}

#[test]
fn marker_classification() {
    let view = marker_view();
    assert_eq!(view.n_wavelengths(), 2);
    assert_eq!(view.n_positions(), 3);
    assert_eq!(view.psf().expect("psf").shape(), &[3, 64, 64]);
    assert_eq!(view.open_loop_psf().expect("open loop").shape(), &[64, 64]);
    assert_eq!(view.diffraction_psf().expect("diffraction").shape(), &[64, 64]);
    assert_eq!(view.profiles().expect("profiles").shape(), &[2, 3, 32]);
}

#[test]
fn marker_metrics_and_coordinates() {
    let view = marker_view();
    let strehl = view.strehl().expect("strehl");
    assert_eq!(strehl.len(), 3);
    assert!((strehl[0] - 0.85).abs() < 1e-9);

    let fwhm = view.fwhm().expect("fwhm");
    assert!((fwhm[0] - 50.0).abs() < 1e-9);
    assert!((fwhm[2] - 54.0).abs() < 1e-9);

    let x = view.x().expect("x");
    let y = view.y().expect("y");
    assert_eq!(x, vec![0.0, 5.0, 10.0]);
    assert_eq!(y, vec![0.0, 3.0, 6.0]);
}

#[test]
fn psf_cube_out_of_range() {
    let view = marker_view();
    assert!(view.psf_cube(1).is_ok());
    let err = view.psf_cube(2).unwrap_err();
    assert!(matches!(
        err,
        ResultError::IndexOutOfRange { index: 2, count: 2 }
    ));
}

#[test]
fn nearest_psf_picks_minimum_distance() {
    let view = marker_view();
    // Positions are (0,0), (5,3), (10,6); (6, 4) is nearest to index 1.
    let psf = view.nearest_psf(6.0, 4.0, 0).expect("nearest");
    assert_eq!(psf.shape(), &[64, 64]);
    let cube = view.psf_cube(0).expect("cube");
    let expected = cube.plane(1).expect("plane");
    assert_eq!(psf, expected);
}

#[test]
fn legacy_classification_by_shape() {
    let view = legacy_view();
    assert_eq!(view.n_wavelengths(), 1);
    assert_eq!(view.psf().expect("psf").shape(), &[3, 32, 32]);

    // Coordinates come from the 2xN table.
    assert_eq!(view.x().expect("x"), vec![0.0, 5.0, 10.0]);
    assert_eq!(view.y().expect("y"), vec![0.0, 3.0, 6.0]);

    // Roles the legacy layout cannot carry.
    assert!(matches!(
        view.open_loop_psf().unwrap_err(),
        ResultError::RoleNotFound { .. }
    ));
    assert!(matches!(
        view.strehl().unwrap_err(),
        ResultError::RoleNotFound { .. }
    ));
}

#[test]
fn legacy_nearest_psf_uses_table_coordinates() {
    let view = legacy_view();
    let psf = view.nearest_psf(4.9, 3.1, 0).expect("nearest");
    let expected = view.psf().expect("psf").plane(1).expect("plane");
    assert_eq!(psf, expected);
}

#[test]
fn save_writes_raw_container_bytes() {
    let bytes = common::marker_container(1, 2, 16);
    let container = BinaryContainer::parse(bytes.clone()).expect("parse");
    let view = ResultView::new(container);

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("result.fits");
    view.save(&path).expect("save");
    let written = std::fs::read(&path).expect("read back");
    assert_eq!(written, bytes);

    let reloaded = BinaryContainer::parse(written).expect("reparse");
    assert_eq!(ResultView::new(reloaded).n_wavelengths(), 1);
}
