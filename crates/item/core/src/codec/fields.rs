//! Ordered table of field descriptors for one record.
//!
//! Every field of the variable layouts has a slot holding its bit offset
//! (`marker`), its width and whether the record carries it. Absent fields keep
//! the marker where they would be inserted, so a resize only has to shift the
//! slots that come after the pivot in layout order.

/// Field identifiers in layout order.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum FieldId {
    Marker,
    Flags,
    VersionTag,
    Location,
    Ear,
    TypeCode,
    SocketedCount,
    ItemId,
    Seed,
    Level,
    Quality,
    Picture,
    ClassAffix,
    QualityData,
    Runeword,
    Personalization,
    TomeCharge,
    Realm,
    Defense,
    Durability,
    Quantity,
    SocketCount,
    SetBonusMask,
    MagicProperties,
    SetProperties,
    RunewordProperties,
    End,
}

impl FieldId {
    pub const COUNT: usize = <Self as strum::EnumCount>::COUNT;

    const fn index(self) -> usize {
        self as usize
    }
}

/// Position and width of one field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldSlot {
    /// Bit offset of the field, or of its insertion point when absent.
    pub marker: usize,
    pub width: usize,
    pub present: bool,
}

impl FieldSlot {
    pub const fn present(marker: usize, width: usize) -> Self {
        Self {
            marker,
            width,
            present: true,
        }
    }

    pub const fn absent(marker: usize) -> Self {
        Self {
            marker,
            width: 0,
            present: false,
        }
    }

    /// First bit after the field.
    pub const fn end(&self) -> usize {
        self.marker + self.width
    }
}

/// Field descriptors for one record.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldTable {
    slots: [FieldSlot; FieldId::COUNT],
}

impl Default for FieldTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldTable {
    pub fn new() -> Self {
        Self {
            slots: [FieldSlot::absent(0); FieldId::COUNT],
        }
    }

    pub fn get(&self, id: FieldId) -> FieldSlot {
        self.slots[id.index()]
    }

    /// Slot of a field the record carries.
    pub fn present(&self, id: FieldId) -> Option<FieldSlot> {
        let slot = self.get(id);
        slot.present.then_some(slot)
    }

    pub fn is_present(&self, id: FieldId) -> bool {
        self.get(id).present
    }

    /// Bit length of the record.
    pub fn end_bits(&self) -> usize {
        self.get(FieldId::End).marker
    }

    /// Highest `marker + width` over present fields.
    pub fn required_bits(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.present)
            .map(FieldSlot::end)
            .max()
            .unwrap_or(0)
    }

    /// True when markers never decrease in layout order.
    pub fn is_monotonic(&self) -> bool {
        self.slots.windows(2).all(|w| w[0].marker <= w[1].marker)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, FieldSlot)> + '_ {
        use strum::IntoEnumIterator;
        FieldId::iter().map(|id| (id, self.get(id)))
    }

    pub(crate) fn set(&mut self, id: FieldId, slot: FieldSlot) {
        self.slots[id.index()] = slot;
    }

    pub(crate) fn mark(&mut self, id: FieldId, marker: usize, width: usize) {
        self.set(id, FieldSlot::present(marker, width));
    }

    pub(crate) fn skip(&mut self, id: FieldId, marker: usize) {
        self.set(id, FieldSlot::absent(marker));
    }

    /// Marks `from` and every later field absent at `marker`, then closes the
    /// record there.
    pub(crate) fn close_from(&mut self, from: FieldId, marker: usize) {
        for slot in &mut self.slots[from.index()..FieldId::End.index()] {
            *slot = FieldSlot::absent(marker);
        }
        self.set(FieldId::End, FieldSlot::present(marker, 0));
    }

    /// Changes a field's width in place and shifts every later slot by the
    /// difference. Returns the signed delta in bits.
    pub(crate) fn resize(&mut self, id: FieldId, width: usize) -> isize {
        let slot = self.get(id);
        let old = if slot.present { slot.width } else { 0 };
        let delta = width as isize - old as isize;
        self.set(
            id,
            FieldSlot {
                marker: slot.marker,
                width,
                present: width > 0,
            },
        );
        self.patch_after(id, delta);
        delta
    }

    /// Shifts the marker of every slot after `pivot` by `delta` bits.
    pub(crate) fn patch_after(&mut self, pivot: FieldId, delta: isize) {
        if delta == 0 {
            return;
        }
        tracing::trace!(%pivot, delta, "patching field markers");
        for slot in &mut self.slots[pivot.index() + 1..] {
            slot.marker = slot.marker.saturating_add_signed(delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FieldTable {
        let mut table = FieldTable::new();
        table.mark(FieldId::Flags, 16, 32);
        table.mark(FieldId::Location, 58, 18);
        table.skip(FieldId::Personalization, 156);
        table.mark(FieldId::Realm, 156, 1);
        table.mark(FieldId::MagicProperties, 174, 9);
        table.close_from(FieldId::SetProperties, 183);
        table
    }

    #[test]
    fn resize_shifts_only_later_fields() {
        let mut table = sample();
        let delta = table.resize(FieldId::Personalization, 77);
        assert_eq!(delta, 77);
        assert_eq!(table.get(FieldId::Personalization), FieldSlot::present(156, 77));
        assert_eq!(table.get(FieldId::Realm).marker, 233);
        assert_eq!(table.get(FieldId::MagicProperties).marker, 251);
        assert_eq!(table.end_bits(), 260);
        assert_eq!(table.get(FieldId::Location).marker, 58);
    }

    #[test]
    fn removing_a_field_restores_markers() {
        let mut table = sample();
        let _ = table.resize(FieldId::Personalization, 77);
        let delta = table.resize(FieldId::Personalization, 0);
        assert_eq!(delta, -77);
        assert_eq!(table, {
            let mut expected = sample();
            expected.skip(FieldId::Personalization, 156);
            expected
        });
    }

    #[test]
    fn required_bits_covers_present_fields() {
        let table = sample();
        assert_eq!(table.required_bits(), 183);
        assert!(table.end_bits() >= table.required_bits());
    }
}
