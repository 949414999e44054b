//! Record mutations.
//!
//! Edits that keep a field's width are written in place. Edits that add,
//! remove or resize a section go through [`Item::splice`], which shifts the
//! tail of the record and patches every later marker in the field table.
use super::error::ItemError;
use super::{Item, MagicalAttribute, stat, to_raw_list};
use crate::bits::BitBuffer;
use crate::codec::encode::validate_text;
use crate::codec::layout::{
    LEGACY_DURABILITY_BITS, MAX_DURABILITY_BITS, QUANTITY_BITS, SOCKETS_BITS,
};
use crate::codec::{DurabilityRecord, FieldId, ItemFlags, encode_list};
use crate::container::Location;
use crate::env::{AffixOracle, ItemEnv, ItemTypeFlags, ModRange};
use crate::error::Mutation;

/// Largest value the 9-bit quantity field holds.
const MAX_QUANTITY: u16 = (1 << QUANTITY_BITS) - 1;

impl Item {
    /// Replaces the section of `field` with the first `width` bits of
    /// `section`. A zero width removes the section. Returns the signed change
    /// in record length.
    pub(crate) fn splice(&mut self, field: FieldId, section: &BitBuffer, width: usize) -> isize {
        let snapshot = self.data.clone();
        let slot = self.fields.get(field);
        let old_width = if slot.present { slot.width } else { 0 };
        let old_end = self.fields.end_bits();
        let tail_start = slot.marker + old_width;
        let tail = old_end.saturating_sub(tail_start);
        let delta = width as isize - old_width as isize;
        let new_end = old_end.saturating_add_signed(delta);

        self.data.resize_bits(new_end);
        if width > 0 {
            self.data.copy_bits_from(section, 0, slot.marker, width);
        }
        self.data.copy_bits_from(&snapshot, tail_start, slot.marker + width, tail);
        self.data.clear_bits_from(new_end);
        self.fields.resize(field, width);
        self.invalidate();

        tracing::trace!(%field, marker = slot.marker, delta, bits = new_end, "spliced record section");
        delta
    }

    /// Runs `edit` and restores the record when it fails.
    pub(crate) fn transaction<T>(
        &mut self,
        edit: impl FnOnce(&mut Self) -> Result<T, ItemError>,
    ) -> Result<T, ItemError> {
        let data = self.data.clone();
        let fields = self.fields.clone();
        let properties = self.properties.clone();
        let result = edit(self);
        if result.is_err() {
            self.data = data;
            self.fields = fields;
            self.properties = properties;
            self.invalidate();
        }
        result
    }

    pub(crate) fn set_flag(&mut self, flag: ItemFlags, on: bool) -> Result<(), ItemError> {
        let slot = self.fields.present(FieldId::Flags).ok_or(ItemError::InvalidItem)?;
        let mut flags = self.flags();
        flags.set(flag, on);
        self.data.update_bits(slot.marker, slot.width as u32, flags.bits())?;
        Ok(())
    }

    fn write_field(&mut self, id: FieldId, value: u32) -> Result<(), ItemError> {
        let slot = self.fields.present(id).ok_or(ItemError::SimpleRecord)?;
        self.data.update_bits(slot.marker, slot.width as u32, value)?;
        Ok(())
    }

    fn require_full(&self) -> Result<(), ItemError> {
        if !self.is_valid() {
            return Err(ItemError::InvalidItem);
        }
        if self.is_simple() {
            return Err(ItemError::SimpleRecord);
        }
        Ok(())
    }

    fn require_extended(&self, section: &'static str) -> Result<(), ItemError> {
        if !self.version.supports_extended_sections() {
            return Err(ItemError::Unsupported {
                section,
                version: self.version,
            });
        }
        Ok(())
    }

    // ===== personalization =====

    /// Stores an owner name on the item.
    pub fn personalize(&mut self, name: &str) -> Result<Mutation, ItemError> {
        self.require_full()?;
        self.require_extended("personalization")?;
        if !self.can_personalize() {
            return Err(ItemError::CannotPersonalize(self.type_code()));
        }
        let char_width = self.version.text_char_width();
        validate_text(name, char_width).map_err(|_| ItemError::InvalidName)?;
        if self.personalized_name().as_deref() == Some(name) {
            return Ok(Mutation::Unchanged);
        }

        let mut section = BitBuffer::new();
        let mut width = 0;
        section.write_text(&mut width, name, char_width);
        self.transaction(|item| {
            item.splice(FieldId::Personalization, &section, width);
            item.set_flag(ItemFlags::PERSONALIZED, true)
        })?;
        tracing::debug!(code = %self.type_code(), name, "personalized item");
        Ok(Mutation::Changed)
    }

    pub fn remove_personalization(&mut self) -> Result<Mutation, ItemError> {
        if !self.is_personalized() {
            return Ok(Mutation::Unchanged);
        }
        self.transaction(|item| {
            item.splice(FieldId::Personalization, &BitBuffer::new(), 0);
            item.set_flag(ItemFlags::PERSONALIZED, false)
        })?;
        Ok(Mutation::Changed)
    }

    // ===== sockets =====

    /// Sets the declared socket count.
    ///
    /// The count is clamped to the type maximum less any `+sockets` bonus and
    /// may not drop below the occupied sockets. Zero removes the socket
    /// section and strips an attached runeword.
    pub fn set_socket_count(&mut self, count: u8) -> Result<Mutation, ItemError> {
        self.require_full()?;
        if !self.can_have_sockets() {
            return Err(ItemError::SocketsNotAllowed(self.type_code()));
        }
        if !self.version.has_socket_count_field() {
            return Err(ItemError::Unsupported {
                section: "socket count",
                version: self.version,
            });
        }
        let max = self.max_socket_count().saturating_sub(self.bonus_sockets());
        let count = count.min(max);
        if usize::from(count) < self.socketed.len() {
            return Err(ItemError::SocketsOccupied {
                requested: count,
                occupied: self.socketed.len(),
            });
        }
        if count == self.socket_count() && (count > 0) == self.is_socketed() {
            return Ok(Mutation::Unchanged);
        }

        self.transaction(|item| {
            if item.version.is_legacy() {
                item.write_field(FieldId::SocketCount, u32::from(count))?;
            } else if count == 0 {
                item.strip_runeword()?;
                item.splice(FieldId::SocketCount, &BitBuffer::new(), 0);
            } else if item.fields.is_present(FieldId::SocketCount) {
                item.write_field(FieldId::SocketCount, u32::from(count))?;
            } else {
                let mut section = BitBuffer::new();
                let mut width = 0;
                section.set_bits(&mut width, SOCKETS_BITS, u32::from(count));
                item.splice(FieldId::SocketCount, &section, width);
            }
            item.set_flag(ItemFlags::SOCKETED, count > 0)
        })?;
        self.invalidate();
        tracing::debug!(code = %self.type_code(), count, "changed socket count");
        Ok(Mutation::Changed)
    }

    // ===== magic properties =====

    /// Adds the indestructible property to the item's own list.
    pub fn make_indestructible(&mut self, env: &ItemEnv<'_>) -> Result<Mutation, ItemError> {
        self.require_full()?;
        self.require_extended("magic properties")?;
        if !self.kind.has_durability() {
            return Err(ItemError::NoDurability(self.type_code()));
        }
        if self.is_indestructible() {
            return Ok(Mutation::Unchanged);
        }
        let affixes = env.affixes()?;
        self.insert_property(ModRange::fixed(stat::INDESTRUCTIBLE, 1), affixes)?;
        Ok(Mutation::Changed)
    }

    fn insert_property(&mut self, m: ModRange, affixes: &dyn AffixOracle) -> Result<(), ItemError> {
        let def = affixes.require_stat(m.stat)?;
        let mut lines = self.properties.magic.clone();
        lines.push(MagicalAttribute::from_mod(&m, m.max, def, self.version));
        let raw = to_raw_list(&lines);
        let (section, width) = encode_list(FieldId::MagicProperties, &raw, affixes)?;
        self.transaction(|item| {
            item.splice(FieldId::MagicProperties, &section, width);
            item.properties.magic = lines;
            Ok(())
        })
    }

    // ===== in-place edits =====

    pub fn set_quantity(&mut self, quantity: u16) -> Result<Mutation, ItemError> {
        if !self.is_stackable() || !self.fields.is_present(FieldId::Quantity) {
            return Err(ItemError::NotStackable(self.type_code()));
        }
        let max = self.kind.max_stack.min(MAX_QUANTITY);
        if quantity > max {
            return Err(ItemError::QuantityOutOfRange {
                requested: quantity,
                max,
            });
        }
        if quantity == self.quantity() {
            return Ok(Mutation::Unchanged);
        }
        self.write_field(FieldId::Quantity, u32::from(quantity))?;
        Ok(Mutation::Changed)
    }

    /// Sets current and maximum durability. In the variable layouts a zero
    /// maximum drops the current value from the record.
    pub fn set_durability(&mut self, durability: DurabilityRecord) -> Result<Mutation, ItemError> {
        let Some(slot) = self.fields.present(FieldId::Durability) else {
            return Err(ItemError::NoDurability(self.type_code()));
        };
        if durability.current > u16::from(durability.max) {
            return Err(ItemError::DurabilityOutOfRange {
                current: durability.current,
                max: durability.max,
            });
        }
        if durability == self.durability() {
            return Ok(Mutation::Unchanged);
        }

        if self.version.is_legacy() {
            let half = LEGACY_DURABILITY_BITS;
            self.data.update_bits(slot.marker, half, u32::from(durability.current))?;
            self.data
                .update_bits(slot.marker + half as usize, half, u32::from(durability.max))?;
        } else {
            let mut section = BitBuffer::new();
            let mut width = 0;
            section.set_bits(&mut width, MAX_DURABILITY_BITS, u32::from(durability.max));
            if durability.max > 0 {
                let current_width = self.version.current_durability_width();
                section.set_bits(&mut width, current_width, u32::from(durability.current));
            }
            if width == slot.width {
                self.data.copy_bits_from(&section, 0, slot.marker, width);
            } else {
                self.splice(FieldId::Durability, &section, width);
            }
        }
        self.invalidate();
        Ok(Mutation::Changed)
    }

    /// Restores current durability to the maximum.
    pub fn repair(&mut self) -> Result<Mutation, ItemError> {
        let DurabilityRecord { max, .. } = self.durability();
        self.set_durability(DurabilityRecord {
            max,
            current: u16::from(max),
        })
    }

    /// Raises maximum and current durability to the largest storable value.
    pub fn maximize_durability(&mut self) -> Result<Mutation, ItemError> {
        self.set_durability(DurabilityRecord {
            max: u8::MAX,
            current: u16::from(u8::MAX),
        })
    }

    /// Replaces a gem with the next grade.
    pub fn upgrade_gem(&mut self, env: &ItemEnv<'_>) -> Result<Mutation, ItemError> {
        self.upgrade(ItemTypeFlags::GEM, env)
    }

    /// Replaces a potion with the next strength.
    pub fn upgrade_potion(&mut self, env: &ItemEnv<'_>) -> Result<Mutation, ItemError> {
        self.upgrade(ItemTypeFlags::POTION, env)
    }

    fn upgrade(&mut self, category: ItemTypeFlags, env: &ItemEnv<'_>) -> Result<Mutation, ItemError> {
        if !self.kind.is(category) {
            return Err(ItemError::NoUpgrade(self.type_code()));
        }
        let next = self
            .kind
            .upgrade_to
            .ok_or(ItemError::NoUpgrade(self.type_code()))?;
        let kind = env.types()?.require_type(next)?.clone();
        if kind.is(ItemTypeFlags::EXPANSION) && !self.version.supports_expansion() {
            return Err(ItemError::NoUpgrade(self.type_code()));
        }
        self.write_field(FieldId::TypeCode, next.to_bits())?;
        tracing::debug!(from = %self.kind.code, to = %next, "upgraded item");
        self.kind = kind;
        self.invalidate();
        Ok(Mutation::Changed)
    }

    pub(crate) fn set_location(&mut self, location: Location) -> Result<(), ItemError> {
        if self.location() != location {
            self.write_field(FieldId::Location, location.to_raw().to_bits())?;
        }
        Ok(())
    }
}
