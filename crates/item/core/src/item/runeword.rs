//! Runeword attachment.
use super::attributes::from_mods;
use super::error::ItemError;
use super::{Item, to_raw_list};
use crate::bits::BitBuffer;
use crate::codec::layout::{RUNEWORD_EXTRA, RUNEWORD_EXTRA_BITS, RUNEWORD_ID_BITS};
use crate::codec::{FieldId, ItemFlags, encode_list};
use crate::env::{AffixOracle, ItemCode, ItemEnv, RunewordDefinition};
use crate::error::Mutation;

impl Item {
    /// Type codes of the socketed children in socket order.
    pub fn socketed_codes(&self) -> Vec<ItemCode> {
        self.socketed.iter().map(Item::type_code).collect()
    }

    /// Checks every runeword rule without touching the record.
    pub fn can_apply_runeword<'a>(
        &self,
        id: u16,
        affixes: &'a dyn AffixOracle,
    ) -> Result<&'a RunewordDefinition, ItemError> {
        self.require_runeword_support()?;
        let def = affixes.runeword(id).ok_or(ItemError::UnknownRuneword(id))?;
        if !self.kind.flags.intersects(def.applies_to) {
            return Err(ItemError::RunewordNotAllowed {
                id,
                code: self.type_code(),
            });
        }
        let filled = self.is_socketed() && self.socketed.len() == usize::from(self.socket_count());
        if !filled || !def.matches(&self.socketed_codes()) {
            return Err(ItemError::RunewordMismatch(id));
        }
        Ok(def)
    }

    fn require_runeword_support(&self) -> Result<(), ItemError> {
        if !self.is_valid() {
            return Err(ItemError::InvalidItem);
        }
        if !self.version.supports_runewords() {
            return Err(ItemError::Unsupported {
                section: "runeword",
                version: self.version,
            });
        }
        if self.is_simple() {
            return Err(ItemError::SimpleRecord);
        }
        if !self.expansion {
            return Err(ItemError::RunewordRequiresExpansion);
        }
        let quality = self.quality();
        if !quality.accepts_runeword() {
            return Err(ItemError::RunewordQuality(quality));
        }
        Ok(())
    }

    /// Attaches runeword `id`. The socketed runes must spell the runeword in
    /// order and fill every socket; otherwise nothing is written.
    pub fn apply_runeword(&mut self, id: u16, env: &ItemEnv<'_>) -> Result<Mutation, ItemError> {
        let affixes = env.affixes()?;
        let def = self.can_apply_runeword(id, affixes)?;
        if self.runeword_id() == Some(id) {
            return Ok(Mutation::Unchanged);
        }

        let lines = from_mods(&def.mods, affixes, self.version, |m| m.max)?;
        let raw = to_raw_list(&lines);
        let (list, list_width) = encode_list(FieldId::RunewordProperties, &raw, affixes)?;
        let mut header = BitBuffer::new();
        let mut header_width = 0;
        header.set_bits(&mut header_width, RUNEWORD_ID_BITS, u32::from(id));
        header.set_bits(&mut header_width, RUNEWORD_EXTRA_BITS, u32::from(RUNEWORD_EXTRA));

        self.transaction(|item| {
            item.splice(FieldId::Runeword, &header, header_width);
            item.splice(FieldId::RunewordProperties, &list, list_width);
            item.properties.runeword = lines;
            item.set_flag(ItemFlags::RUNEWORD, true)
        })?;
        tracing::debug!(code = %self.type_code(), id, name = %def.name, "applied runeword");
        Ok(Mutation::Changed)
    }

    pub fn remove_runeword(&mut self) -> Result<Mutation, ItemError> {
        if !self.is_runeword() {
            return Ok(Mutation::Unchanged);
        }
        self.transaction(Item::strip_runeword)?;
        Ok(Mutation::Changed)
    }

    /// Removes the runeword id, its property list and flag when present.
    pub(crate) fn strip_runeword(&mut self) -> Result<(), ItemError> {
        if !self.is_runeword() {
            return Ok(());
        }
        let empty = BitBuffer::new();
        self.splice(FieldId::RunewordProperties, &empty, 0);
        self.splice(FieldId::Runeword, &empty, 0);
        self.properties.runeword.clear();
        self.set_flag(ItemFlags::RUNEWORD, false)
    }

    /// Catalogue runeword spelled by the current children, if any fits.
    pub(crate) fn matching_runeword(&self, affixes: &dyn AffixOracle) -> Option<u16> {
        let codes = self.socketed_codes();
        affixes
            .runewords()
            .into_iter()
            .filter(|def| def.matches(&codes))
            .find(|def| self.can_apply_runeword(def.id, affixes).is_ok())
            .map(|def| def.id)
    }
}
