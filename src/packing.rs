//! Packing of a 1-D physical extent onto fixed-width vector packs.
//!
//! A column of `N` levels is stored as `ceil(N / W)` packs of `W` lanes. When
//! `N` is not a multiple of `W` the last pack is ragged: only its first
//! `last_pack_len` lanes hold real levels and the rest are padding that no
//! loop or reduction may read as data.
//!
//! [`PackingInfo`] is the runtime form. [`ColInfo`] computes the same values
//! as associated constants, so a bad extent fails the build instead of
//! reaching a loop bound.

use serde::Serialize;
use std::iter::FusedIterator;
use std::ops::Range;

use crate::error::PackingError;
use crate::space::VECTOR_SIZE;

/// Derived pack layout of one physical extent at one vector width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PackingInfo {
    physical_extent: usize,
    vector_width: usize,
    num_packs: usize,
    last_pack: usize,
    last_pack_len: usize,
    last_pack_end: usize,
}

impl PackingInfo {
    /// Packs `physical_extent` logical units into packs of `vector_width`.
    ///
    /// Both inputs must be at least 1. Anything else is reported, never
    /// clamped, because a wrong pack count corrupts every loop bound built
    /// on it.
    pub const fn new(physical_extent: usize, vector_width: usize) -> Result<Self, PackingError> {
        if vector_width == 0 {
            return Err(PackingError::ZeroWidth);
        }
        if physical_extent == 0 {
            return Err(PackingError::EmptyExtent);
        }

        // Same as (extent + width - 1) / width for extent >= 1, without the
        // overflow near usize::MAX.
        let num_packs = (physical_extent - 1) / vector_width + 1;
        let last_pack = num_packs - 1;
        let last_pack_len = physical_extent - last_pack * vector_width;

        Ok(Self {
            physical_extent,
            vector_width,
            num_packs,
            last_pack,
            last_pack_len,
            last_pack_end: last_pack_len - 1,
        })
    }

    /// Packs `physical_extent` at this build's [`VECTOR_SIZE`].
    pub fn for_extent(physical_extent: usize) -> Result<Self, PackingError> {
        let info = Self::new(physical_extent, VECTOR_SIZE);
        match &info {
            Ok(info) => log::trace!("packed extent {}: {:?}", physical_extent, info),
            Err(e) => log::warn!("cannot pack extent {}: {}", physical_extent, e),
        }
        info
    }

    #[inline]
    pub const fn physical_extent(&self) -> usize {
        self.physical_extent
    }

    #[inline]
    pub const fn vector_width(&self) -> usize {
        self.vector_width
    }

    /// Number of packs covering the extent.
    #[inline]
    pub const fn num_packs(&self) -> usize {
        self.num_packs
    }

    /// Index of the last pack.
    #[inline]
    pub const fn last_pack(&self) -> usize {
        self.last_pack
    }

    /// Real lanes in the last pack, in `[1, vector_width]`.
    #[inline]
    pub const fn last_pack_len(&self) -> usize {
        self.last_pack_len
    }

    /// Lane index of the last real level inside the last pack.
    #[inline]
    pub const fn last_pack_end(&self) -> usize {
        self.last_pack_end
    }

    /// Padding lanes at the end of the last pack.
    #[inline]
    pub const fn padding_lanes(&self) -> usize {
        self.vector_width - self.last_pack_len
    }

    /// Storage length of the packed column, padding included. `None` when
    /// that length does not fit in a `usize`.
    #[inline]
    pub const fn padded_extent(&self) -> Option<usize> {
        self.num_packs.checked_mul(self.vector_width)
    }

    #[inline]
    pub const fn is_ragged(&self) -> bool {
        self.last_pack_len != self.vector_width
    }

    /// Real lanes in `pack`: full width for interior packs, the fill of the
    /// last pack, zero past the end.
    pub const fn valid_lanes(&self, pack: usize) -> usize {
        if pack < self.last_pack {
            self.vector_width
        } else if pack == self.last_pack {
            self.last_pack_len
        } else {
            0
        }
    }

    /// Pack and lane holding logical index `level`.
    pub const fn locate(&self, level: usize) -> Option<LaneIndex> {
        if level >= self.physical_extent {
            return None;
        }
        Some(LaneIndex {
            pack: level / self.vector_width,
            lane: level % self.vector_width,
        })
    }

    /// Logical index stored at (`pack`, `lane`), `None` for padding.
    pub const fn level(&self, pack: usize, lane: usize) -> Option<usize> {
        if lane >= self.valid_lanes(pack) {
            return None;
        }
        Some(pack * self.vector_width + lane)
    }

    /// Every pack with the levels it really holds.
    pub fn spans(&self) -> PackSpans {
        PackSpans {
            info: *self,
            next: 0,
        }
    }
}

/// Position of one logical unit inside a packed column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LaneIndex {
    pub pack: usize,
    pub lane: usize,
}

/// One pack and the real levels in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackSpan {
    pub pack: usize,
    /// First logical index in the pack.
    pub start: usize,
    /// Number of real lanes.
    pub len: usize,
}

impl PackSpan {
    #[inline]
    pub fn levels(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    #[inline]
    pub fn lanes(&self) -> Range<usize> {
        0..self.len
    }
}

/// Iterator returned by [`PackingInfo::spans`].
#[derive(Debug, Clone)]
pub struct PackSpans {
    info: PackingInfo,
    next: usize,
}

impl Iterator for PackSpans {
    type Item = PackSpan;

    fn next(&mut self) -> Option<PackSpan> {
        if self.next >= self.info.num_packs {
            return None;
        }
        let pack = self.next;
        self.next += 1;
        Some(PackSpan {
            pack,
            start: pack * self.info.vector_width,
            len: self.info.valid_lanes(pack),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.info.num_packs - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for PackSpans {}

impl FusedIterator for PackSpans {}

/// Compile-time packing of a `LENGTH`-unit dimension at `WIDTH` lanes.
///
/// Instantiate once per dimension of interest; each instance is independent.
///
/// ```
/// use column_pack::packing::ColInfo;
///
/// type Interface = ColInfo<26, 4>;
/// assert_eq!(Interface::NUM_PACKS, 7);
/// assert_eq!(Interface::LAST_PACK, 6);
/// assert_eq!(Interface::LAST_PACK_LEN, 2);
/// assert_eq!(Interface::LAST_PACK_END, 1);
/// ```
///
/// An empty dimension does not compile:
///
/// ```compile_fail
/// use column_pack::packing::ColInfo;
///
/// let _ = ColInfo::<0, 4>::NUM_PACKS;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ColInfo<const LENGTH: usize, const WIDTH: usize = VECTOR_SIZE>;

impl<const LENGTH: usize, const WIDTH: usize> ColInfo<LENGTH, WIDTH> {
    pub const INFO: PackingInfo = match PackingInfo::new(LENGTH, WIDTH) {
        Ok(info) => info,
        Err(PackingError::EmptyExtent) => panic!("column extent must be at least 1"),
        Err(PackingError::ZeroWidth) => panic!("vector width must be at least 1"),
    };

    pub const NUM_PACKS: usize = Self::INFO.num_packs();
    pub const LAST_PACK: usize = Self::INFO.last_pack();
    pub const LAST_PACK_LEN: usize = Self::INFO.last_pack_len();
    pub const LAST_PACK_END: usize = Self::INFO.last_pack_end();
}
