//! Bit-level record codec for the eight schema generations.
//!
//! Fixed-length generations (1.00 to 1.07) store every field at a constant
//! offset. Later generations gate each section on a flag or on the item type
//! and are walked top to bottom, recording each field in a [`FieldTable`].
pub(crate) mod decode;
pub(crate) mod encode;
mod error;
mod fields;
mod header;
pub(crate) mod layout;
mod properties;
mod quality;
mod record;
pub(crate) mod walker;

pub use decode::PropertyLists;
pub use error::CodecError;
pub use fields::{FieldId, FieldSlot, FieldTable};
pub use header::{ItemFlags, RawLocation};
pub use properties::{PROPERTY_TERMINATOR, RawProperty, STAT_ID_BITS};
pub use quality::{Quality, QualityData};
pub use record::{DurabilityRecord, EarRecord, ExtendedRecord, ItemRecord, RunewordRecord};

pub(crate) use properties::encode_list;
