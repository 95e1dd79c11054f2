//! Validation rule tables for the TIPTOP parameter schema.
//!
//! Key sets follow the service's parameter documentation. An empty
//! `known_keys` slice means the section's keys are not checked (newer
//! sections whose parameter set is still moving).

pub struct SectionRule {
    pub name: &'static str,
    /// Core sections must be present for the service to run at all.
    pub core: bool,
    pub required_keys: &'static [&'static str],
    pub known_keys: &'static [&'static str],
}

const SENSOR_KEYS: &[&str] = &[
    "NumberLenslets",
    "SizeLenslets",
    "PixelScale",
    "FieldOfView",
    "NumberPhotons",
    "Binning",
    "WfsType",
    "SigmaRON",
    "Dark",
    "SkyBackground",
    "Gain",
    "ExcessNoiseFactor",
    "Dispersion",
    "SpectralBandwidth",
    "ThresholdWCoG",
    "WindowRadiusWCoG",
    "NewValueThrPix",
    "Transmittance",
    "NoiseVariance",
    "Modulation",
    "Algorithm",
    "SpotFWHM",
];

const SOURCE_KEYS: &[&str] = &["Wavelength", "Zenith", "Azimuth", "Height"];

pub const SECTION_RULES: &[SectionRule] = &[
    SectionRule {
        name: "telescope",
        core: true,
        required_keys: &["TelescopeDiameter", "Resolution"],
        known_keys: &[
            "TelescopeDiameter",
            "Resolution",
            "PupilAngle",
            "ObscurationRatio",
            "ZenithAngle",
            "TechnicalFoV",
            "PathPupil",
            "PathStaticOn",
            "PathStaticOff",
            "PathStaticPos",
            "PathApodizer",
            "PathStatModes",
        ],
    },
    SectionRule {
        name: "atmosphere",
        core: true,
        required_keys: &["Wavelength", "Seeing", "L0"],
        known_keys: &[
            "Wavelength",
            "Seeing",
            "L0",
            "Cn2Weights",
            "Cn2Heights",
            "WindSpeed",
            "WindDirection",
            "r0_Value",
            "testWindspeed",
        ],
    },
    SectionRule {
        name: "sources_science",
        core: true,
        required_keys: &["Wavelength", "Zenith", "Azimuth"],
        known_keys: &["Wavelength", "Zenith", "Azimuth"],
    },
    SectionRule {
        name: "sources_HO",
        core: true,
        required_keys: &["Wavelength"],
        known_keys: SOURCE_KEYS,
    },
    SectionRule {
        name: "sources_LO",
        core: false,
        required_keys: &["Wavelength"],
        known_keys: SOURCE_KEYS,
    },
    SectionRule {
        name: "sensor_science",
        core: true,
        required_keys: &["PixelScale", "FieldOfView"],
        known_keys: &["PixelScale", "FieldOfView", "Binning"],
    },
    SectionRule {
        name: "sensor_HO",
        core: true,
        required_keys: &["PixelScale", "FieldOfView", "NumberLenslets", "NumberPhotons", "SigmaRON"],
        known_keys: SENSOR_KEYS,
    },
    SectionRule {
        name: "sensor_LO",
        core: false,
        required_keys: &["PixelScale", "FieldOfView"],
        known_keys: SENSOR_KEYS,
    },
    SectionRule {
        name: "DM",
        core: true,
        required_keys: &["NumberActuators", "DmPitchs"],
        known_keys: &[
            "NumberActuators",
            "DmPitchs",
            "InfModel",
            "InfCoupling",
            "DmHeights",
            "OptimizationZenith",
            "OptimizationAzimuth",
            "OptimizationWeight",
            "OptimizationConditioning",
            "NumberReconstructedLayers",
            "AoArea",
        ],
    },
    SectionRule {
        name: "RTC",
        core: true,
        required_keys: &[],
        known_keys: &[
            "LoopGain_HO",
            "SensorFrameRate_HO",
            "LoopDelaySteps_HO",
            "LoopGain_LO",
            "SensorFrameRate_LO",
            "LoopDelaySteps_LO",
            "ResidualError",
        ],
    },
    SectionRule {
        name: "sources_Focus",
        core: false,
        required_keys: &[],
        known_keys: &[],
    },
    SectionRule {
        name: "sensor_Focus",
        core: false,
        required_keys: &[],
        known_keys: &[],
    },
];

/// Parameters that must be numeric when present.
pub const NUMERIC_PARAMS: &[(&str, &str)] = &[
    ("atmosphere", "Seeing"),
    ("atmosphere", "L0"),
    ("telescope", "TelescopeDiameter"),
    ("telescope", "ObscurationRatio"),
    ("telescope", "Resolution"),
];

/// Parameters that are typically lists; a scalar is suspicious but not
/// fatal.
pub const LIST_PARAMS: &[(&str, &str)] = &[
    ("sources_science", "Wavelength"),
    ("sources_science", "Zenith"),
    ("sources_science", "Azimuth"),
    ("DM", "NumberActuators"),
    ("DM", "DmPitchs"),
];

pub fn rule_for(section: &str) -> Option<&'static SectionRule> {
    SECTION_RULES.iter().find(|rule| rule.name == section)
}
