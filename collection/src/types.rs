use async_graphql::{ComplexObject, ID, SimpleObject};
use serde_json::{Map, Value};

/// A record as returned by `GET /objects/{id}`, before any normalization.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawObject(Map<String, Value>);

impl RawObject {
    /// Anything other than a JSON object yields an empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => RawObject(map),
            _ => RawObject::default(),
        }
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

impl From<&Value> for RawObject {
    fn from(value: &Value) -> Self {
        RawObject::from_value(value.clone())
    }
}

/// A museum object in its normalized, nested form.
///
/// Upstream empty strings never reach this type: they are `None`.
#[derive(Clone, Debug, Default, PartialEq, SimpleObject)]
#[graphql(name = "Object", complex)]
pub struct CanonicalObject {
    /// Upstream `objectID`.
    #[graphql(skip)]
    pub id: Option<u64>,
    /// Title, identifying phrase, or name given to a work of art
    pub title: Option<String>,
    /// Year, span of years, or phrase describing when the work was created
    pub date: Option<String>,
    /// Year the work was started, as upstream reports it
    pub begin_date: Option<String>,
    /// Year the work was completed, as upstream reports it
    pub end_date: Option<String>,
    /// Date the metadata was last updated (upstream `metadataDate`)
    pub updated_after: Option<String>,
    /// URL to the object's page on metmuseum.org (upstream `objectURL`)
    pub url: Option<String>,
    pub primary_image: Option<String>,
    pub primary_image_small: Option<String>,
    /// Blank entries read as null; the list keeps its length.
    pub additional_images: Option<Vec<Option<String>>>,
    /// A popular and important artwork in the collection
    pub is_highlight: Option<bool>,
    pub is_public_domain: Option<bool>,
    pub is_timeline_work: Option<bool>,
    /// Identifying number, not always unique
    pub accession_number: Option<String>,
    pub accession_year: Option<String>,
    /// Curatorial department responsible for the artwork
    pub department: Option<String>,
    /// Physical type of the object (upstream `objectName`)
    pub physical_type: Option<String>,
    pub culture: Option<String>,
    pub period: Option<String>,
    pub dynasty: Option<String>,
    pub reign: Option<String>,
    pub portfolio: Option<String>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub credit_line: Option<String>,
    pub classification: Option<String>,
    pub rights_and_reproduction: Option<String>,
    pub link_resource: Option<String>,
    pub repository: Option<String>,
    pub gallery_number: Option<String>,
    pub object_wikidata_url: Option<String>,
    pub artist: Artist,
    pub geography: Geography,
    pub constituents: Option<Vec<Constituent>>,
}

#[ComplexObject]
impl CanonicalObject {
    /// Identifying number for each artwork, unique
    async fn id(&self) -> Option<ID> {
        self.id.map(|id| ID::from(id.to_string()))
    }
}

/// The `artist*` fields of an object record
#[derive(Clone, Debug, Default, PartialEq, SimpleObject)]
pub struct Artist {
    pub role: Option<String>,
    pub prefix: Option<String>,
    pub display_name: Option<String>,
    /// Nationality and life dates, with birth and death city when known
    pub display_bio: Option<String>,
    pub suffix: Option<String>,
    /// Last name, first name, middle name, suffix, honorific
    pub alpha_sort: Option<String>,
    pub nationality: Option<String>,
    pub begin_date: Option<String>,
    pub end_date: Option<String>,
    pub gender: Option<String>,
    pub wikidata_url: Option<String>,
    pub ulan_url: Option<String>,
}

/// Where an object was created or found
#[derive(Clone, Debug, Default, PartialEq, SimpleObject)]
pub struct Geography {
    /// Relationship of the place to the object (upstream `geographyType`)
    #[graphql(name = "type")]
    pub kind: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub county: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub locale: Option<String>,
    pub locus: Option<String>,
    pub excavation: Option<String>,
    pub river: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, SimpleObject)]
pub struct Constituent {
    pub id: Option<i64>,
    pub role: Option<String>,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub ulan_url: Option<String>,
    pub wikidata_url: Option<String>,
}

/// A window over the upstream object ID listing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Connection {
    /// Count reported by the upstream listing, independent of the window.
    pub total: u64,
    pub object_ids: Vec<u64>,
}
