//! Socketed children.
//!
//! A parent exclusively owns its children. Each child carries a small
//! [`SocketContext`] describing how it applies to the parent; it is never
//! used to reach the parent itself.
use super::attributes::from_mods;
use super::error::ItemError;
use super::{CharacterContext, Item, MagicalAttribute};
use crate::codec::layout::CHILDREN_BITS;
use crate::codec::{CodecError, FieldId};
use crate::container::Location;
use crate::env::{AffixOracle, ItemEnv, SocketApply};

/// How a socketed child relates to its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SocketContext {
    pub apply: SocketApply,
    pub index: u8,
}

/// A child refused by [`Item::socket`], handed back to the caller.
#[derive(Debug)]
pub struct Rejected {
    pub error: ItemError,
    pub item: Box<Item>,
}

impl Rejected {
    fn new(error: ItemError, item: Item) -> Self {
        Self {
            error,
            item: Box::new(item),
        }
    }

    pub fn into_parts(self) -> (ItemError, Item) {
        (self.error, *self.item)
    }
}

impl Item {
    /// Checks whether `child` can go into the next free socket.
    pub fn can_socket(&self, child: &Item, ctx: CharacterContext) -> Result<(), ItemError> {
        if !self.is_valid() || !child.is_valid() {
            return Err(ItemError::InvalidItem);
        }
        if self.is_simple() {
            return Err(ItemError::SimpleRecord);
        }
        if !child.is_socket_filler() {
            return Err(ItemError::NotSocketFiller(child.type_code()));
        }
        if child.version != self.version {
            return Err(ItemError::VersionMismatch {
                parent: self.version,
                child: child.version,
            });
        }
        if !self.is_socketed() {
            return Err(ItemError::NotSocketed);
        }
        if self.socketed.len() >= usize::from(self.socket_count()) {
            return Err(ItemError::NoFreeSocket);
        }
        if self.location().is_equipped() {
            let allowed = self.required_level().max(ctx.level);
            let required = child.required_level();
            if required > allowed {
                return Err(ItemError::LevelTooHigh { required, allowed });
            }
        }
        Ok(())
    }

    /// Inserts `child` into the next free socket and returns its index.
    ///
    /// When the last socket is filled and the children spell a runeword the
    /// item accepts, the runeword is attached. On rejection the child is
    /// returned unchanged.
    pub fn socket(
        &mut self,
        mut child: Item,
        ctx: CharacterContext,
        env: &ItemEnv<'_>,
    ) -> Result<usize, Rejected> {
        if let Err(error) = self.can_socket(&child, ctx) {
            return Err(Rejected::new(error, child));
        }
        let affixes = match env.affixes() {
            Ok(affixes) => affixes,
            Err(err) => return Err(Rejected::new(err.into(), child)),
        };
        let bonus = match self.socket_bonus(&child, affixes) {
            Ok(bonus) => bonus,
            Err(err) => return Err(Rejected::new(err.into(), child)),
        };
        let index = self.socketed.len();
        // The child's snapshot is restored if either write fails.
        let placed = child.transaction(|child| {
            child.set_location(Location::Socket(index as u8))?;
            self.write_socketed_count(index + 1)
        });
        if let Err(error) = placed {
            return Err(Rejected::new(error, child));
        }

        child.parent = Some(SocketContext {
            apply: self.kind.socket_apply(),
            index: index as u8,
        });
        self.socketed.push(child);
        self.socket_bonuses.push(bonus);
        self.invalidate();
        tracing::debug!(parent = %self.type_code(), child = %self.socketed[index].type_code(), index, "socketed item");

        if self.socketed.len() == usize::from(self.socket_count()) && !self.is_runeword() {
            if let Some(id) = self.matching_runeword(affixes) {
                if let Err(err) = self.apply_runeword(id, env) {
                    tracing::warn!(id, %err, "failed to attach matching runeword");
                }
            }
        }
        Ok(index)
    }

    /// Removes the child at `index` and returns it in the staging location.
    /// Any runeword is stripped and later children move down one socket.
    pub fn unsocket(&mut self, index: usize) -> Result<Item, ItemError> {
        if index >= self.socketed.len() {
            return Err(ItemError::NoSocketAt(index));
        }
        self.transaction(|item| {
            item.strip_runeword()?;
            item.write_socketed_count(item.socketed.len() - 1)
        })?;

        let mut child = self.socketed.remove(index);
        self.socket_bonuses.remove(index);
        for (i, rest) in self.socketed.iter_mut().enumerate().skip(index) {
            rest.set_location(Location::Socket(i as u8))?;
            if let Some(parent) = rest.parent.as_mut() {
                parent.index = i as u8;
            }
        }
        child.set_location(Location::Buffer)?;
        child.parent = None;
        self.invalidate();
        tracing::debug!(parent = %self.type_code(), child = %child.type_code(), index, "unsocketed item");
        Ok(child)
    }

    /// Removes every child, last first, returning them in socket order.
    pub fn unsocket_all(&mut self) -> Result<Vec<Item>, ItemError> {
        let mut children = Vec::with_capacity(self.socketed.len());
        while !self.socketed.is_empty() {
            children.push(self.unsocket(self.socketed.len() - 1)?);
        }
        children.reverse();
        Ok(children)
    }

    /// Bonus `child` grants this item: the filler's list for this item's
    /// apply type plus the child's own properties.
    fn socket_bonus(
        &self,
        child: &Item,
        affixes: &dyn AffixOracle,
    ) -> Result<Vec<MagicalAttribute>, CodecError> {
        let mods = child.kind.socket_mods.for_apply(self.kind.socket_apply());
        let mut bonus = from_mods(mods, affixes, self.version, |m| m.max)?;
        bonus.extend_from_slice(child.magical_attributes());
        Ok(bonus)
    }

    /// Links a decoded child without touching the record.
    pub(crate) fn attach_child(&mut self, mut child: Item, env: &ItemEnv<'_>) -> Result<(), CodecError> {
        let bonus = self.socket_bonus(&child, env.affixes()?)?;
        let index = self.socketed.len();
        child.parent = Some(SocketContext {
            apply: self.kind.socket_apply(),
            index: index as u8,
        });
        self.socketed.push(child);
        self.socket_bonuses.push(bonus);
        self.invalidate();
        Ok(())
    }

    fn write_socketed_count(&mut self, count: usize) -> Result<(), ItemError> {
        let slot = self
            .fields
            .present(FieldId::SocketedCount)
            .ok_or(ItemError::SimpleRecord)?;
        self.data.update_bits(slot.marker, CHILDREN_BITS, count as u32)?;
        Ok(())
    }

    /// Number of sockets still free.
    pub fn free_sockets(&self) -> usize {
        usize::from(self.socket_count()).saturating_sub(self.socketed.len())
    }
}
