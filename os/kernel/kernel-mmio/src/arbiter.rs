//! Exclusive ownership of address windows.

use crate::{IoAddress, IoRegion};
use log::trace;

/// Error returned by [`RegionArbiter`] operations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClaimError {
    #[error("region {region} overlaps a region owned by {owner}")]
    Busy {
        region: IoRegion,
        owner: &'static str,
    },
    #[error("no free claim slots")]
    TableFull,
    #[error("region {region} is not claimed")]
    NotClaimed { region: IoRegion },
}

/// Grants and revokes exclusive ownership of [`IoRegion`]s.
///
/// Implementations must refuse a request that overlaps any outstanding claim,
/// whoever owns it, and must only release a region that was granted exactly
/// as named.
pub trait RegionArbiter {
    /// Claim `region` exclusively on behalf of `owner`.
    ///
    /// # Errors
    /// - [`ClaimError::Busy`] if any address in `region` is already claimed.
    /// - [`ClaimError::TableFull`] if the arbiter cannot track another claim.
    fn request_region(&mut self, region: IoRegion, owner: &'static str) -> Result<(), ClaimError>;

    /// Give up a claim previously granted by [`request_region`](Self::request_region).
    ///
    /// # Errors
    /// [`ClaimError::NotClaimed`] if no claim matches `region` exactly.
    fn release_region(&mut self, region: IoRegion) -> Result<(), ClaimError>;
}

impl<T: RegionArbiter + ?Sized> RegionArbiter for &mut T {
    #[inline]
    fn request_region(&mut self, region: IoRegion, owner: &'static str) -> Result<(), ClaimError> {
        (**self).request_region(region, owner)
    }

    #[inline]
    fn release_region(&mut self, region: IoRegion) -> Result<(), ClaimError> {
        (**self).release_region(region)
    }
}

/// An outstanding claim.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Claim {
    pub region: IoRegion,
    pub owner: &'static str,
}

/// Fixed-capacity [`RegionArbiter`] holding at most `N` claims.
///
/// Needs no heap; claims live in an inline slot array.
///
/// ```rust
/// # use kernel_mmio::*;
/// let mut table = RegionTable::<8>::new();
/// let w = IoRegion::new(IoAddress::new(0xF200_0100), 4);
/// table.request_region(w, "ht2020").unwrap();
/// assert!(table.request_region(w, "other").is_err());
/// table.release_region(w).unwrap();
/// assert!(table.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct RegionTable<const N: usize> {
    slots: [Option<Claim>; N],
}

impl<const N: usize> Default for RegionTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RegionTable<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: [None; N] }
    }

    /// Outstanding claims, in slot order.
    pub fn claims(&self) -> impl Iterator<Item = &Claim> {
        self.slots.iter().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.claims().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Whether exactly `region` is currently claimed.
    #[must_use]
    pub fn is_claimed(&self, region: IoRegion) -> bool {
        self.claims().any(|c| c.region == region)
    }

    /// Owner of the claim covering `address`, if any.
    #[must_use]
    pub fn owner_of(&self, address: IoAddress) -> Option<&'static str> {
        self.claims()
            .find(|c| c.region.contains(address))
            .map(|c| c.owner)
    }
}

impl<const N: usize> RegionArbiter for RegionTable<N> {
    fn request_region(&mut self, region: IoRegion, owner: &'static str) -> Result<(), ClaimError> {
        if let Some(held) = self.claims().find(|c| c.region.overlaps(&region)) {
            return Err(ClaimError::Busy {
                region,
                owner: held.owner,
            });
        }

        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.is_none())
            .ok_or(ClaimError::TableFull)?;
        *slot = Some(Claim { region, owner });
        trace!("claimed {region} for {owner}");
        Ok(())
    }

    fn release_region(&mut self, region: IoRegion) -> Result<(), ClaimError> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.is_some_and(|c| c.region == region))
            .ok_or(ClaimError::NotClaimed { region })?;
        *slot = None;
        trace!("released {region}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn window(start: u32) -> IoRegion {
        IoRegion::new(IoAddress::new(start), 4)
    }

    #[test]
    fn overlapping_request_reports_owner() {
        let mut t = RegionTable::<4>::new();
        t.request_region(IoRegion::new(IoAddress::new(0x102), 2), "uart")
            .unwrap();

        let err = t.request_region(window(0x100), "ht2020").unwrap_err();
        assert_eq!(
            err,
            ClaimError::Busy {
                region: window(0x100),
                owner: "uart"
            }
        );
        assert_eq!(t.owner_of(IoAddress::new(0x103)), Some("uart"));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn full_table_refuses_further_claims() {
        let mut t = RegionTable::<2>::new();
        t.request_region(window(0x100), "a").unwrap();
        t.request_region(window(0x104), "a").unwrap();
        assert_eq!(
            t.request_region(window(0x108), "a"),
            Err(ClaimError::TableFull)
        );

        // a freed slot is reused
        t.release_region(window(0x100)).unwrap();
        t.request_region(window(0x108), "a").unwrap();
        assert!(t.is_claimed(window(0x108)));
    }

    #[test]
    fn release_requires_exact_region() {
        let mut t = RegionTable::<2>::new();
        t.request_region(window(0x100), "a").unwrap();

        let partial = IoRegion::new(IoAddress::new(0x100), 2);
        assert_eq!(
            t.release_region(partial),
            Err(ClaimError::NotClaimed { region: partial })
        );
        assert!(t.is_claimed(window(0x100)));

        t.release_region(window(0x100)).unwrap();
        assert_eq!(
            t.release_region(window(0x100)),
            Err(ClaimError::NotClaimed {
                region: window(0x100)
            })
        );
    }
}
