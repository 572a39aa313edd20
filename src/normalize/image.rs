//! Image tags -> categorized metadata

use crate::input::descriptor::FileDescriptor;
use crate::normalize::lookup::{display_value, lookup};
use crate::normalize::metadata::{field_map, Category, DisplayValue, FieldMap, NormalizedMetadata};
use crate::normalize::tables::{
    FieldSpec, CONTAINER_SECTIONS, GPS_TAGS, IMAGE_COLOR_FIELDS, IMAGE_FORENSIC_FIELDS, IMAGE_LOCATION_FIELDS,
    IMAGE_MEDIA_FIELDS, IMAGE_RIGHTS_FIELDS, IMAGE_SECTIONS, IMAGE_TECHNICAL_FIELDS,
    MAKER_NOTE_TAG, THUMBNAIL_SECTION,
};
use crate::normalize::value::{RawSection, RawTags};
use crate::normalize::with_basic;

fn resolve(tags: &RawTags, table: &[FieldSpec]) -> FieldMap {
    table
        .iter()
        .map(|spec| {
            (
                spec.display.to_string(),
                lookup(tags, IMAGE_SECTIONS, spec.synonyms),
            )
        })
        .collect()
}

const NO_EXIF_NOTE: &str = "No EXIF metadata found";

/// Fields that came from an EXIF block, leaving out container header facts.
fn exif_tag_count(tags: &RawTags) -> usize {
    let container: usize = CONTAINER_SECTIONS
        .iter()
        .filter_map(|name| tags.sections.get(*name))
        .map(|section| section.len())
        .sum();
    tags.tag_count() - container
}

fn resolves(tags: &RawTags, name: &str) -> bool {
    lookup(tags, IMAGE_SECTIONS, &[name]).is_available()
}

pub fn normalize_image(descriptor: &FileDescriptor, tags: &RawTags) -> NormalizedMetadata {
    let mut metadata = with_basic(descriptor);
    metadata.set_category(Category::Technical, resolve(tags, IMAGE_TECHNICAL_FIELDS));
    metadata.set_category(Category::Media, resolve(tags, IMAGE_MEDIA_FIELDS));

    let exif_tags = exif_tag_count(tags);
    if exif_tags == 0 {
        metadata.insert(Category::Content, "note", NO_EXIF_NOTE);
    }

    let has_gps = GPS_TAGS.iter().any(|name| resolves(tags, name));
    if has_gps {
        metadata.insert_group("location", resolve(tags, IMAGE_LOCATION_FIELDS));
    }

    metadata.insert_group("color", resolve(tags, IMAGE_COLOR_FIELDS));

    if resolves(tags, "Copyright") || resolves(tags, "Artist") {
        metadata.insert_group("rights", resolve(tags, IMAGE_RIGHTS_FIELDS));
    }

    let mut forensics = field_map([
        ("Total EXIF Tags", DisplayValue::text(exif_tags.to_string())),
        ("Has Thumbnail", DisplayValue::yes_no(tags.has_section(THUMBNAIL_SECTION))),
        ("Has GPS Data", DisplayValue::yes_no(has_gps)),
        (
            "Maker Notes",
            DisplayValue::text(if tags.contains_field(MAKER_NOTE_TAG) {
                "Present"
            } else {
                "Not Present"
            }),
        ),
    ]);
    forensics.extend(resolve(tags, IMAGE_FORENSIC_FIELDS));
    metadata.insert_group("forensics", forensics);

    metadata.insert_group("rawTags", raw_tags_group(tags));
    metadata
}

/// Every raw field as a display value, sub-sections nested under their names.
fn raw_tags_group(tags: &RawTags) -> FieldMap {
    let mut group = section_group(&tags.root);
    for (name, section) in &tags.sections {
        group.insert(name.clone(), DisplayValue::Group(section_group(section)));
    }
    group
}

fn section_group(section: &RawSection) -> FieldMap {
    section
        .iter()
        .map(|(name, raw)| (name.clone(), display_value(raw)))
        .collect()
}

/// Record for an image that carries no tag block at all.
pub fn without_exif(descriptor: &FileDescriptor) -> NormalizedMetadata {
    let mut metadata = with_basic(descriptor);
    metadata.insert(Category::Content, "note", NO_EXIF_NOTE);
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::value::RawValue;

    fn descriptor() -> FileDescriptor {
        FileDescriptor::from_bytes("IMG_0042.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF])
    }

    fn canon_tags() -> RawTags {
        let mut tags = RawTags::new();
        tags.insert("Make", RawValue::described("Canon", "Canon"));
        tags.insert("Model", RawValue::described("EOS R5", "EOS R5"));
        tags.insert("FNumber", RawValue::described(2.8, "f/2.8"));
        tags.insert("PixelXDimension", RawValue::described(8192i64, "8192"));
        tags.insert("ColorSpace", RawValue::described(1i64, "sRGB"));
        tags
    }

    #[test]
    fn test_camera_fields_without_gps() {
        let metadata = normalize_image(&descriptor(), &canon_tags()).finish();

        assert_eq!(metadata.text(Category::Media, "Camera Make"), Some("Canon"));
        assert_eq!(metadata.text(Category::Media, "Camera Model"), Some("EOS R5"));
        assert_eq!(metadata.text(Category::Media, "F-Number"), Some("f/2.8"));
        assert_eq!(metadata.text(Category::Technical, "Image Width"), Some("8192"));
        assert!(metadata.group("location").is_none());
        assert!(metadata.group("rights").is_none());

        let forensics = metadata.group("forensics").unwrap();
        assert_eq!(forensics["Total EXIF Tags"].to_string(), "5");
        assert_eq!(forensics["Has GPS Data"].to_string(), "No");
        assert_eq!(forensics["Has Thumbnail"].to_string(), "No");
        assert_eq!(forensics["Maker Notes"].to_string(), "Not Present");

        let color = metadata.group("color").unwrap();
        assert_eq!(color["Color Profile"].to_string(), "sRGB");
    }

    #[test]
    fn test_gps_thumbnail_and_rights() {
        let mut tags = canon_tags();
        tags.insert("GPSLatitude", RawValue::described(51.5, "51 deg 30 min 0 sec N"));
        tags.insert("Artist", RawValue::text("J. Doe"));
        tags.insert("MakerNote", RawValue::Described { value: None, description: Some("2048 bytes of binary data".into()) });
        tags.insert_in("Thumbnail", "Compression", RawValue::described(6i64, "JPEG"));
        tags.insert_in("Thumbnail", "image", RawValue::EmbeddedBinary { len: 4096 });

        let metadata = normalize_image(&descriptor(), &tags).finish();

        let location = metadata.group("location").unwrap();
        assert_eq!(location["Latitude"].to_string(), "51 deg 30 min 0 sec N");
        assert_eq!(location["Longitude"], DisplayValue::NotAvailable);

        let rights = metadata.group("rights").unwrap();
        assert_eq!(rights["Artist"].to_string(), "J. Doe");
        assert_eq!(rights["Copyright"], DisplayValue::NotAvailable);

        // Thumbnail section is searched after the root
        assert_eq!(metadata.text(Category::Technical, "Compression"), Some("JPEG"));

        let forensics = metadata.group("forensics").unwrap();
        assert_eq!(forensics["Has Thumbnail"].to_string(), "Yes");
        assert_eq!(forensics["Has GPS Data"].to_string(), "Yes");
        assert_eq!(forensics["Maker Notes"].to_string(), "Present");
        assert_eq!(forensics["Total EXIF Tags"].to_string(), "10");

        let raw = metadata.group("rawTags").unwrap();
        let thumbnail = raw["Thumbnail"].as_group().unwrap();
        assert_eq!(thumbnail["image"].to_string(), "[Embedded Image]");
    }

    #[test]
    fn test_category_order() {
        let metadata = normalize_image(&descriptor(), &canon_tags()).finish();
        let order: Vec<Category> = metadata.categories().map(|(c, _)| *c).collect();
        assert_eq!(
            order,
            vec![Category::Basic, Category::Technical, Category::Media, Category::Custom]
        );
    }

    #[test]
    fn test_header_facts_without_exif() {
        let mut tags = RawTags::new();
        tags.insert_in("file", "FileType", RawValue::text("PNG"));
        tags.insert_in("file", "ImageWidth", RawValue::described(32i64, "32px"));
        tags.insert_in("file", "ImageHeight", RawValue::described(16i64, "16px"));
        tags.insert_in("file", "BitsPerSample", RawValue::described(8i64, "8"));
        tags.insert_in("jfif", "XResolution", RawValue::described(72i64, "72"));

        let metadata = normalize_image(&descriptor(), &tags).finish();

        assert_eq!(metadata.text(Category::Technical, "Image Width"), Some("32px"));
        assert_eq!(metadata.text(Category::Technical, "Image Height"), Some("16px"));
        assert_eq!(metadata.text(Category::Technical, "Bits Per Sample"), Some("8"));
        assert_eq!(metadata.text(Category::Technical, "Resolution X"), Some("72"));
        assert_eq!(metadata.text(Category::Content, "note"), Some("No EXIF metadata found"));
        assert_eq!(
            metadata.group("forensics").unwrap()["Total EXIF Tags"].to_string(),
            "0"
        );
    }

    #[test]
    fn test_without_exif_note() {
        let metadata = without_exif(&descriptor()).finish();
        assert_eq!(metadata.text(Category::Content, "note"), Some("No EXIF metadata found"));
        assert!(!metadata.has_category(Category::Media));
    }
}
