//! Maps a flat upstream object record onto [`CanonicalObject`].
//!
//! Upstream uses the empty string as its null sentinel. Every value is passed
//! through [`blank_to_null`] before any field is read, so no `""` survives
//! normalization. `0`, `false` and empty lists are kept as they are.
//!
//! Renamed fields:
//!
//! | upstream            | canonical        |
//! |---------------------|------------------|
//! | `objectID`          | `id`             |
//! | `objectDate`        | `date`           |
//! | `objectBeginDate`   | `beginDate`      |
//! | `objectEndDate`     | `endDate`        |
//! | `metadataDate`      | `updatedAfter`   |
//! | `objectURL`         | `url`            |
//! | `objectName`        | `physicalType`   |
//! | `artistXxx`         | `artist.xxx`     |
//! | `geographyType`     | `geography.type` |
//! | `city` .. `river`   | `geography.*`    |
//!
//! Any other known field keeps its name. Unknown fields are ignored.

use crate::types::{Artist, CanonicalObject, Constituent, Geography, RawObject};
use serde_json::{Map, Value};

pub fn normalize(raw: RawObject) -> CanonicalObject {
    let record = Record::new(raw.into_fields());

    CanonicalObject {
        id: record.integer("objectID").and_then(|id| u64::try_from(id).ok()),
        title: record.text("title"),
        date: record.text("objectDate"),
        begin_date: record.text("objectBeginDate"),
        end_date: record.text("objectEndDate"),
        updated_after: record.text("metadataDate"),
        url: record.text("objectURL"),
        primary_image: record.text("primaryImage"),
        primary_image_small: record.text("primaryImageSmall"),
        additional_images: record.texts("additionalImages"),
        is_highlight: record.flag("isHighlight"),
        is_public_domain: record.flag("isPublicDomain"),
        is_timeline_work: record.flag("isTimelineWork"),
        accession_number: record.text("accessionNumber"),
        accession_year: record.text("accessionYear"),
        department: record.text("department"),
        physical_type: record.text("objectName"),
        culture: record.text("culture"),
        period: record.text("period"),
        dynasty: record.text("dynasty"),
        reign: record.text("reign"),
        portfolio: record.text("portfolio"),
        medium: record.text("medium"),
        dimensions: record.text("dimensions"),
        credit_line: record.text("creditLine"),
        classification: record.text("classification"),
        rights_and_reproduction: record.text("rightsAndReproduction"),
        link_resource: record.text("linkResource"),
        repository: record.text("repository"),
        gallery_number: record.text("GalleryNumber"),
        object_wikidata_url: record.text("objectWikidata_URL"),
        artist: artist(&record),
        geography: geography(&record),
        constituents: record
            .records("constituents")
            .map(|items| items.iter().map(constituent).collect()),
    }
}

/// Replaces every empty string in `value`, including inside lists and nested
/// records, with `null`.
pub fn blank_to_null(value: &mut Value) {
    if value.as_str() == Some("") {
        *value = Value::Null;
        return;
    }

    match value {
        Value::Array(items) => items.iter_mut().for_each(blank_to_null),
        Value::Object(fields) => fields.values_mut().for_each(blank_to_null),
        _ => {}
    }
}

fn artist(record: &Record) -> Artist {
    Artist {
        role: record.text("artistRole"),
        prefix: record.text("artistPrefix"),
        display_name: record.text("artistDisplayName"),
        display_bio: record.text("artistDisplayBio"),
        suffix: record.text("artistSuffix"),
        alpha_sort: record.text("artistAlphaSort"),
        nationality: record.text("artistNationality"),
        begin_date: record.text("artistBeginDate"),
        end_date: record.text("artistEndDate"),
        gender: record.text("artistGender"),
        wikidata_url: record.text("artistWikidata_URL"),
        ulan_url: record.text("artistULAN_URL"),
    }
}

fn geography(record: &Record) -> Geography {
    Geography {
        kind: record.text("geographyType"),
        city: record.text("city"),
        state: record.text("state"),
        county: record.text("county"),
        country: record.text("country"),
        region: record.text("region"),
        subregion: record.text("subregion"),
        locale: record.text("locale"),
        locus: record.text("locus"),
        excavation: record.text("excavation"),
        river: record.text("river"),
    }
}

fn constituent(record: &Record) -> Constituent {
    Constituent {
        id: record.integer("constituentID"),
        role: record.text("role"),
        name: record.text("name"),
        gender: record.text("gender"),
        ulan_url: record.text("constituentULAN_URL"),
        wikidata_url: record.text("constituentWikidata_URL"),
    }
}

/// Null-normalized view over a flat record with lenient typed accessors.
struct Record {
    fields: Map<String, Value>,
}

impl Record {
    fn new(mut fields: Map<String, Value>) -> Self {
        fields.values_mut().for_each(blank_to_null);
        Record { fields }
    }

    fn value(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|value| !value.is_null())
    }

    // Numbers read as text are rendered the way a GraphQL String would coerce them.
    fn text(&self, key: &str) -> Option<String> {
        match self.value(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn integer(&self, key: &str) -> Option<i64> {
        match self.value(key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn flag(&self, key: &str) -> Option<bool> {
        self.value(key)?.as_bool()
    }

    fn texts(&self, key: &str) -> Option<Vec<Option<String>>> {
        let items = self.value(key)?.as_array()?;
        Some(
            items
                .iter()
                .map(|item| item.as_str().map(str::to_owned))
                .collect(),
        )
    }

    fn records(&self, key: &str) -> Option<Vec<Record>> {
        let items = self.value(key)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|item| item.as_object())
                .map(|fields| Record::new(fields.clone()))
                .collect(),
        )
    }
}
