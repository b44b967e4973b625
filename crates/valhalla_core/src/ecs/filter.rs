//! # Filters
//!
//! A filter is an include/exclude predicate over component membership,
//! compiled down to two bitmasks. Matching a live entity is two mask ops.
//!
//! Filters hold no entity lists of their own: snapshots are recomputed
//! lazily each time a system selects, which is what makes structural
//! changes from earlier systems visible to later systems in the same tick.

use super::pool::Component;

/// An include/exclude component predicate.
///
/// Built once at system construction time with the const builder:
///
/// ```rust,ignore
/// const LIVE_UNITS: Filter = Filter::new()
///     .with::<Unit>()
///     .with::<Data>()
///     .without::<Dead>();
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    /// Bits of component types an entity must hold.
    include: u64,
    /// Bits of component types an entity must not hold.
    exclude: u64,
}

impl Filter {
    /// Creates an empty filter that matches every live entity.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            include: 0,
            exclude: 0,
        }
    }

    /// Requires component `C`.
    #[inline]
    #[must_use]
    pub const fn with<C: Component>(self) -> Self {
        Self {
            include: self.include | (1 << C::ID),
            exclude: self.exclude,
        }
    }

    /// Excludes component `C`.
    #[inline]
    #[must_use]
    pub const fn without<C: Component>(self) -> Self {
        Self {
            include: self.include,
            exclude: self.exclude | (1 << C::ID),
        }
    }

    /// Tests a component mask against this predicate.
    #[inline]
    #[must_use]
    pub const fn matches_mask(self, mask: u64) -> bool {
        (mask & self.include) == self.include && (mask & self.exclude) == 0
    }
}
