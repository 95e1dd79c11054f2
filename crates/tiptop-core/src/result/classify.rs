use crate::fits::{BinaryContainer, Frame, layout};

/// Marker substrings on the CONTENT card, matched case-insensitively.
pub(crate) const PSF_CUBE_MARKER: &str = "PSF CUBE";
pub(crate) const OPEN_LOOP_MARKER: &str = "OPEN-LOOP";
pub(crate) const DIFFRACTION_MARKER: &str = "DIFFRACTION";
pub(crate) const PROFILE_MARKER: &str = "PROFILE";

/// Frame indices by semantic role. Built once; frame 0 is never
/// classified.
#[derive(Debug, Clone, Default)]
pub(crate) struct Classification {
    pub psf_cubes: Vec<usize>,
    pub open_loop: Option<usize>,
    pub diffraction: Option<usize>,
    pub profile: Option<usize>,
    pub coord_table: Option<usize>,
}

pub(crate) fn classify(container: &BinaryContainer) -> Classification {
    let frames = container.frames();
    let tail = frames.iter().enumerate().skip(1);

    if frames
        .iter()
        .skip(1)
        .any(|frame| content_marker(frame).is_some())
    {
        classify_by_marker(tail)
    } else {
        classify_by_shape(tail)
    }
}

fn content_marker(frame: &Frame) -> Option<String> {
    frame
        .header
        .get_str(layout::CONTENT_KEYWORD)
        .map(str::to_ascii_uppercase)
}

fn classify_by_marker<'a>(
    frames: impl Iterator<Item = (usize, &'a Frame)>,
) -> Classification {
    let mut classification = Classification::default();
    for (index, frame) in frames {
        if frame.data.is_none() {
            continue;
        }
        let Some(marker) = content_marker(frame) else {
            continue;
        };
        if marker.contains(PSF_CUBE_MARKER) {
            classification.psf_cubes.push(index);
        } else if marker.contains(OPEN_LOOP_MARKER) {
            classification.open_loop.get_or_insert(index);
        } else if marker.contains(DIFFRACTION_MARKER) {
            classification.diffraction.get_or_insert(index);
        } else if marker.contains(PROFILE_MARKER) {
            classification.profile.get_or_insert(index);
        }
    }
    classification
}

/// Legacy responses carry no markers: a 3-D array with a square trailing
/// plane is a PSF cube, a 2-row table holds the source coordinates.
fn classify_by_shape<'a>(frames: impl Iterator<Item = (usize, &'a Frame)>) -> Classification {
    let mut classification = Classification::default();
    for (index, frame) in frames {
        let Some(data) = frame.data.as_ref() else {
            continue;
        };
        let shape = data.shape();
        if shape.len() == 3 && shape[1] == shape[2] {
            classification.psf_cubes.push(index);
        } else if shape.len() == 2 && shape[0] == 2 {
            classification.coord_table = Some(index);
        }
    }
    classification
}
