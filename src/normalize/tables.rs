//! Static field tables: display name -> synonym list, per image category

use crate::normalize::value::SectionKey;

/// One displayed field and the raw tag names that may carry it, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub display: &'static str,
    pub synonyms: &'static [&'static str],
}

const fn field(display: &'static str, synonyms: &'static [&'static str]) -> FieldSpec {
    FieldSpec { display, synonyms }
}

/// Where image lookups search, in order.
pub static IMAGE_SECTIONS: &[SectionKey] = &[
    SectionKey::Root,
    SectionKey::Named(FILE_SECTION),
    SectionKey::Named(JFIF_SECTION),
    SectionKey::Named(THUMBNAIL_SECTION),
    SectionKey::Named("exif"),
];

pub static IMAGE_MEDIA_FIELDS: &[FieldSpec] = &[
    field("Camera Make", &["Make"]),
    field("Camera Model", &["Model"]),
    field("Lens Model", &["LensModel"]),
    field("Software", &["Software"]),
    field("Date/Time", &["DateTime", "DateTimeOriginal", "DateTimeDigitized"]),
    field("F-Number", &["FNumber"]),
    field("Exposure Time", &["ExposureTime"]),
    field("ISO Speed", &["ISOSpeedRatings", "PhotographicSensitivity"]),
    field("Focal Length", &["FocalLength"]),
    field("Focal Length (35mm)", &["FocalLengthIn35mmFilm"]),
    field("Flash", &["Flash"]),
    field("White Balance", &["WhiteBalance"]),
    field("Metering Mode", &["MeteringMode"]),
    field("Exposure Mode", &["ExposureMode"]),
    field("Scene Type", &["SceneType"]),
    field("Exposure Program", &["ExposureProgram"]),
    field("Exposure Bias", &["ExposureBiasValue"]),
    field("Max Aperture", &["MaxApertureValue"]),
    field("Subject Distance", &["SubjectDistance"]),
    field("Digital Zoom", &["DigitalZoomRatio"]),
];

pub static IMAGE_TECHNICAL_FIELDS: &[FieldSpec] = &[
    field("Image Width", &["ImageWidth", "ExifImageWidth", "PixelXDimension"]),
    field(
        "Image Height",
        &["ImageHeight", "ImageLength", "ExifImageHeight", "PixelYDimension"],
    ),
    field("Color Space", &["ColorSpace"]),
    field("Orientation", &["Orientation"]),
    field("Resolution X", &["XResolution"]),
    field("Resolution Y", &["YResolution"]),
    field("Resolution Unit", &["ResolutionUnit"]),
    field("Compression", &["Compression"]),
    field("Bits Per Sample", &["BitsPerSample"]),
    field("Samples Per Pixel", &["SamplesPerPixel"]),
    field("Photometric Interpretation", &["PhotometricInterpretation"]),
    field("Planar Configuration", &["PlanarConfiguration"]),
    field("YCbCr Positioning", &["YCbCrPositioning"]),
    field("Reference Black/White", &["ReferenceBlackWhite"]),
];

pub static IMAGE_LOCATION_FIELDS: &[FieldSpec] = &[
    field("Latitude", &["GPSLatitude"]),
    field("Longitude", &["GPSLongitude"]),
    field("Altitude", &["GPSAltitude"]),
    field("Altitude Ref", &["GPSAltitudeRef"]),
    field("GPS Date/Time", &["GPSDateStamp"]),
    field("GPS Time", &["GPSTimeStamp"]),
    field("GPS Speed", &["GPSSpeed"]),
    field("GPS Direction", &["GPSImgDirection"]),
    field("GPS Processing Method", &["GPSProcessingMethod"]),
    field("GPS Area Information", &["GPSAreaInformation"]),
];

pub static IMAGE_COLOR_FIELDS: &[FieldSpec] = &[
    field("Color Profile", &["ColorSpace"]),
    field("White Point", &["WhitePoint"]),
    field("Primary Chromaticities", &["PrimaryChromaticities"]),
    field("YCbCr Coefficients", &["YCbCrCoefficients"]),
    field("Gamma", &["Gamma"]),
    field("Transfer Function", &["TransferFunction"]),
    field("Color Transform", &["ColorTransform"]),
];

pub static IMAGE_RIGHTS_FIELDS: &[FieldSpec] = &[
    field("Copyright", &["Copyright"]),
    field("Artist", &["Artist"]),
    field("Creator", &["Creator"]),
    field("Rights", &["Rights"]),
];

/// Forensic fields resolved by lookup. The counted and flag fields of the
/// forensics group are computed from the whole tag set instead.
pub static IMAGE_FORENSIC_FIELDS: &[FieldSpec] = &[
    field("User Comment", &["UserComment"]),
    field("Image Unique ID", &["ImageUniqueID"]),
    field("Camera Serial Number", &["CameraSerialNumber", "BodySerialNumber"]),
    field("Lens Serial Number", &["LensSerialNumber"]),
];

pub const GPS_TAGS: &[&str] = &["GPSLatitude", "GPSLongitude"];
pub const MAKER_NOTE_TAG: &str = "MakerNote";
pub const THUMBNAIL_SECTION: &str = "Thumbnail";
pub const FILE_SECTION: &str = "file";
pub const JFIF_SECTION: &str = "jfif";

/// Sections filled from the container header rather than an EXIF block.
pub const CONTAINER_SECTIONS: &[&str] = &[FILE_SECTION, JFIF_SECTION];
