//! Catalog item and artist profile data models.
//!
//! Items are decoded field-by-field from untyped remote records. The
//! wire names (`tattooName`, `imageURL`, ...) are vendor-era and kept
//! for compatibility with existing stored data. A record missing a
//! required field yields a `Decode` error; the loader contains that
//! per record and continues the batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use inkar_core::{ArtistId, Error, RawDocument, Result, TattooId};

/// Wire field holding the tattoo title.
pub const FIELD_TITLE: &str = "tattooName";
/// Wire field holding the image URL.
pub const FIELD_IMAGE_URL: &str = "imageURL";
/// Wire field holding the owning artist's display name.
pub const FIELD_OWNER_NAME: &str = "artistName";
/// Wire field holding the owning artist's ID.
pub const FIELD_OWNER_ID: &str = "artistId";
/// Wire field holding the tag list.
pub const FIELD_TAGS: &str = "tags";
/// Wire field holding the creation timestamp (RFC3339).
pub const FIELD_CREATED_AT: &str = "createdAt";

/// Display name used when an artist cannot be resolved.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// A single tattoo record available for browsing.
///
/// Immutable once loaded; the catalog replaces the whole collection on
/// reload. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Store-assigned record ID.
    pub id: TattooId,
    /// Tattoo title.
    pub title: String,
    /// URL of the tattoo image in the blob store.
    pub image_ref: String,
    /// Owning artist's display name.
    pub owner_name: String,
    /// Owning artist's ID (empty string when the record predates
    /// artist attribution).
    pub owner_id: String,
    /// Ordered tag list.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CatalogItem {
    /// Decodes an item from a raw record.
    ///
    /// Required: title and image URL (non-empty). Everything else
    /// defaults: owner name to [`UNKNOWN_ARTIST`], owner ID to empty,
    /// tags to an empty list with non-string entries skipped.
    ///
    /// # Errors
    ///
    /// Returns `Error::Decode` naming the missing field.
    pub fn decode(doc: &RawDocument) -> Result<Self> {
        let title = require_str(doc, FIELD_TITLE)?;
        let image_ref = require_str(doc, FIELD_IMAGE_URL)?;

        Ok(Self {
            id: TattooId::new(&doc.id)?,
            title,
            image_ref,
            owner_name: doc
                .get_str(FIELD_OWNER_NAME)
                .filter(|s| !s.is_empty())
                .unwrap_or(UNKNOWN_ARTIST)
                .to_string(),
            owner_id: doc.get_str(FIELD_OWNER_ID).unwrap_or_default().to_string(),
            tags: doc.get_str_array(FIELD_TAGS),
        })
    }

    /// Encodes the item back into a wire field map.
    #[must_use]
    pub fn to_fields(&self, created_at: DateTime<Utc>) -> serde_json::Map<String, serde_json::Value> {
        let mut fields = serde_json::Map::new();
        fields.insert(FIELD_TITLE.into(), self.title.clone().into());
        fields.insert(FIELD_IMAGE_URL.into(), self.image_ref.clone().into());
        fields.insert(FIELD_OWNER_NAME.into(), self.owner_name.clone().into());
        fields.insert(FIELD_OWNER_ID.into(), self.owner_id.clone().into());
        fields.insert(
            FIELD_TAGS.into(),
            serde_json::Value::Array(self.tags.iter().cloned().map(Into::into).collect()),
        );
        fields.insert(FIELD_CREATED_AT.into(), created_at.to_rfc3339().into());
        fields
    }
}

fn require_str(doc: &RawDocument, field: &'static str) -> Result<String> {
    doc.get_str(field)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::decode(field, format!("missing in document {}", doc.id)))
}

/// An artist profile as shown on the profile screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistProfile {
    /// Artist's user ID.
    pub id: ArtistId,
    /// Display name.
    pub display_name: String,
    /// Contact email, present only when the artist opted in to
    /// sharing it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
}

impl ArtistProfile {
    /// Decodes a profile from a user record.
    ///
    /// Email privacy rule: the email is exposed only when the record's
    /// `showPublicEmail` flag is true, preferring `publicEmail` and
    /// falling back to `email`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the document ID is empty.
    pub fn decode(doc: &RawDocument) -> Result<Self> {
        let contact_email = if doc.get_bool("showPublicEmail") {
            doc.get_str("publicEmail")
                .or_else(|| doc.get_str("email"))
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        } else {
            None
        };

        Ok(Self {
            id: ArtistId::new(&doc.id)?,
            display_name: doc
                .get_str("displayName")
                .filter(|s| !s.is_empty())
                .unwrap_or(UNKNOWN_ARTIST)
                .to_string(),
            contact_email,
        })
    }

    /// True when the profile exposes a contactable email.
    #[must_use]
    pub fn can_contact(&self) -> bool {
        self.contact_email.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    fn doc(id: &str, pairs: &[(&str, Value)]) -> RawDocument {
        let fields: Map<String, Value> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect();
        RawDocument::new(id, fields)
    }

    #[test]
    fn decode_full_record() {
        let raw = doc(
            "t1",
            &[
                (FIELD_TITLE, json!("Anchor")),
                (FIELD_IMAGE_URL, json!("https://img/anchor.png")),
                (FIELD_OWNER_NAME, json!("Alice")),
                (FIELD_OWNER_ID, json!("artist-1")),
                (FIELD_TAGS, json!(["ocean", "classic"])),
            ],
        );

        let item = CatalogItem::decode(&raw).expect("should decode");
        assert_eq!(item.id.as_str(), "t1");
        assert_eq!(item.title, "Anchor");
        assert_eq!(item.image_ref, "https://img/anchor.png");
        assert_eq!(item.owner_name, "Alice");
        assert_eq!(item.owner_id, "artist-1");
        assert_eq!(item.tags, vec!["ocean", "classic"]);
    }

    #[test]
    fn decode_missing_title_fails() {
        let raw = doc("t1", &[(FIELD_IMAGE_URL, json!("https://img/a.png"))]);
        let err = CatalogItem::decode(&raw).expect_err("should fail");
        assert!(matches!(
            err,
            Error::Decode {
                field: FIELD_TITLE,
                ..
            }
        ));
    }

    #[test]
    fn decode_missing_image_url_fails() {
        let raw = doc("t1", &[(FIELD_TITLE, json!("Anchor"))]);
        let err = CatalogItem::decode(&raw).expect_err("should fail");
        assert!(matches!(
            err,
            Error::Decode {
                field: FIELD_IMAGE_URL,
                ..
            }
        ));
    }

    #[test]
    fn decode_defaults_optional_fields() {
        let raw = doc(
            "t1",
            &[
                (FIELD_TITLE, json!("Anchor")),
                (FIELD_IMAGE_URL, json!("https://img/a.png")),
            ],
        );
        let item = CatalogItem::decode(&raw).expect("should decode");
        assert_eq!(item.owner_name, UNKNOWN_ARTIST);
        assert_eq!(item.owner_id, "");
        assert!(item.tags.is_empty());
    }

    #[test]
    fn fields_round_trip() {
        let raw = doc(
            "t1",
            &[
                (FIELD_TITLE, json!("Anchor")),
                (FIELD_IMAGE_URL, json!("https://img/a.png")),
                (FIELD_OWNER_NAME, json!("Alice")),
                (FIELD_OWNER_ID, json!("artist-1")),
                (FIELD_TAGS, json!(["ocean"])),
            ],
        );
        let item = CatalogItem::decode(&raw).expect("should decode");

        let fields = item.to_fields(Utc::now());
        let back = CatalogItem::decode(&RawDocument::new("t1", fields)).expect("should decode");
        assert_eq!(back, item);
    }

    #[test]
    fn profile_email_hidden_by_default() {
        let raw = doc(
            "artist-1",
            &[
                ("displayName", json!("Alice")),
                ("email", json!("alice@example.com")),
            ],
        );
        let profile = ArtistProfile::decode(&raw).expect("should decode");
        assert_eq!(profile.display_name, "Alice");
        assert!(profile.contact_email.is_none());
        assert!(!profile.can_contact());
    }

    #[test]
    fn profile_public_email_preferred() {
        let raw = doc(
            "artist-1",
            &[
                ("displayName", json!("Alice")),
                ("showPublicEmail", json!(true)),
                ("publicEmail", json!("booking@alice.ink")),
                ("email", json!("alice@example.com")),
            ],
        );
        let profile = ArtistProfile::decode(&raw).expect("should decode");
        assert_eq!(profile.contact_email.as_deref(), Some("booking@alice.ink"));
    }

    #[test]
    fn profile_falls_back_to_account_email() {
        let raw = doc(
            "artist-1",
            &[
                ("displayName", json!("Alice")),
                ("showPublicEmail", json!(true)),
                ("email", json!("alice@example.com")),
            ],
        );
        let profile = ArtistProfile::decode(&raw).expect("should decode");
        assert_eq!(
            profile.contact_email.as_deref(),
            Some("alice@example.com")
        );
    }

    #[test]
    fn profile_unknown_name_default() {
        let raw = doc("artist-1", &[]);
        let profile = ArtistProfile::decode(&raw).expect("should decode");
        assert_eq!(profile.display_name, UNKNOWN_ARTIST);
    }
}
