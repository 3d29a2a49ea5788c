//! Git tag object implementation.
//!
//! A stored tag takes one of two shapes:
//!
//! ```text
//! object <40-hex target>        <- annotated
//! type <kind>
//! tag <name>
//! tagger <name> <email> <epoch> <+hhmm>
//!
//! <message>
//! ```
//!
//! or a bare reference to the target: either its 20 raw bytes or its 40 hex
//! digits on a single line. Only the first shape carries annotation data.

use tracing::trace;

use super::oid::{try_normalize, Oid, OID_BYTES};
use super::reader::ObjectReader;
use super::signature::{strip_date, Contributor, GitTime};
use super::store::ObjectStore;
use super::{Object, ObjectType, StorableObject};
use crate::error::{Error, Result};

/// A Git tag object, lightweight or annotated.
#[derive(Debug, Clone)]
pub struct Tag {
    oid: Oid,
    target: Oid,
    target_kind: ObjectType,
    tagger: Option<Contributor>,
    date: Option<GitTime>,
    message: Option<String>,
}

impl Tag {
    /// Returns the id of the object this tag points to.
    pub fn target(&self) -> &Oid {
        &self.target
    }

    /// Returns the type of the target, as found when the tag was loaded.
    pub fn target_kind(&self) -> ObjectType {
        self.target_kind
    }

    /// Returns who created the tag, for annotated tags.
    pub fn tagger(&self) -> Option<&Contributor> {
        self.tagger.as_ref()
    }

    /// Returns when the tag was created, for annotated tags.
    pub fn date(&self) -> Option<GitTime> {
        self.date
    }

    /// Returns the tag message with trailing whitespace removed.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns true if tagger, date and a non-empty message are all present.
    pub fn is_annotated(&self) -> bool {
        self.message.as_deref().is_some_and(|m| !m.is_empty())
            && self.tagger.is_some()
            && self.date.is_some()
    }

    /// Loads the target object from `store`.
    pub fn object(&self, store: &ObjectStore) -> Result<Object> {
        store.read(&self.target)
    }

    fn parse_reference(oid: Oid, reader: &mut ObjectReader<'_>, store: &ObjectStore) -> Result<Self> {
        let rest = reader.read_to_end();
        let target = if rest.len() == OID_BYTES {
            Oid::from_slice(rest)
        } else {
            let text = rest.strip_suffix(b"\n").unwrap_or(rest);
            std::str::from_utf8(text).ok().and_then(try_normalize)
        }
        .ok_or_else(|| Error::parse("tag is neither annotated nor a raw object reference"))?;

        trace!(tag = %oid, target = %target, "lightweight tag");
        Ok(Tag {
            oid,
            target,
            target_kind: store.kind_of(&target)?,
            tagger: None,
            date: None,
            message: None,
        })
    }

    fn parse_annotated(oid: Oid, reader: &mut ObjectReader<'_>, store: &ObjectStore) -> Result<Self> {
        let target_line = reader.read_line()?;
        let target = std::str::from_utf8(target_line)
            .ok()
            .and_then(try_normalize)
            .ok_or_else(|| {
                Error::parse(format!(
                    "invalid tag target: {}",
                    String::from_utf8_lossy(target_line)
                ))
            })?;
        let target_kind = store.kind_of(&target)?;

        // `type` and `tag` lines
        reader.read_line()?;
        reader.read_line()?;

        let keyword = reader.read_word()?;
        if keyword != b"tagger" {
            return Err(Error::parse(format!(
                "expected tagger, found {}",
                String::from_utf8_lossy(keyword)
            )));
        }
        // tagger and message keep whatever encoding the tag was written in
        let tagger_line = String::from_utf8_lossy(reader.read_line()?);
        let (date, rest) = strip_date(&tagger_line)?;
        let tagger = Contributor::parse(rest)?;

        let message = if reader.is_at_end() {
            None
        } else {
            reader.read_bytes(1)?;
            Some(String::from_utf8_lossy(reader.read_to_end()).trim_end().to_string())
        };

        trace!(tag = %oid, target = %target, "annotated tag");
        Ok(Tag {
            oid,
            target,
            target_kind,
            tagger: Some(tagger),
            date: Some(date),
            message,
        })
    }
}

impl StorableObject for Tag {
    const KIND: ObjectType = ObjectType::Tag;

    fn oid(&self) -> &Oid {
        &self.oid
    }

    fn deserialize(
        oid: Option<Oid>,
        reader: &mut ObjectReader<'_>,
        store: &ObjectStore,
    ) -> Result<Self> {
        let oid = oid.unwrap_or_else(|| reader.compute_identifier());

        if reader.read_word()? == b"object" {
            Tag::parse_annotated(oid, reader, store)
        } else {
            reader.rewind()?;
            Tag::parse_reference(oid, reader, store)
        }
    }

    fn serialize(&self) -> Result<Vec<u8>> {
        Err(Error::NotImplemented("tag serialization".to_string()))
    }
}
