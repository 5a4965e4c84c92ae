//! Collision mask derivation
//!
//! The mask is indexed by GID and holds a bitmask per tile type. Only bit 0
//! (solid) is assigned today.

use crate::error::DataIntegrityError;
use crate::Result;

/// Bit set on solid GIDs
pub const COLLISION_SOLID: i32 = 0x1;

/// Largest GID a mask slot is allocated for
pub const MAX_MASK_GID: i32 = 1 << 20;

/// Build the per-GID collision flags for `tiles`.
///
/// The mask covers every GID up to the largest one found in either `tiles`
/// or `solid_gids`. Solid ids below zero have no slot and are skipped.
pub fn build_collision_flags(tiles: &[i32], solid_gids: &[i32]) -> Result<Vec<i32>> {
    let max_gid = tiles
        .iter()
        .chain(solid_gids)
        .copied()
        .fold(0, i32::max);

    if max_gid > MAX_MASK_GID {
        return Err(DataIntegrityError::GidLimitExceeded {
            gid: max_gid,
            limit: MAX_MASK_GID,
        }
        .into());
    }

    let mut flags = vec![0; max_gid as usize + 1];
    for &gid in solid_gids {
        if let Some(slot) = usize::try_from(gid).ok().and_then(|i| flags.get_mut(i)) {
            *slot |= COLLISION_SOLID;
        }
    }

    Ok(flags)
}

/// Whether `gid` is marked solid in `flags`
#[inline]
pub fn is_solid(flags: &[i32], gid: i32) -> bool {
    usize::try_from(gid)
        .ok()
        .and_then(|i| flags.get(i))
        .map_or(false, |bits| bits & COLLISION_SOLID != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LevelError;

    #[test]
    fn test_mask_length() {
        let flags = build_collision_flags(&[0, 3, 1], &[2]).unwrap();
        assert_eq!(flags, vec![0, 0, 1, 0]);

        let flags = build_collision_flags(&[1, 1], &[7]).unwrap();
        assert_eq!(flags.len(), 8);
        assert!(is_solid(&flags, 7));
        assert!(!is_solid(&flags, 1));
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(build_collision_flags(&[], &[]).unwrap(), vec![0]);
        assert_eq!(build_collision_flags(&[-4, -1], &[]).unwrap(), vec![0]);
    }

    #[test]
    fn test_negative_solid_ignored() {
        let flags = build_collision_flags(&[2], &[-1, 1, 1]).unwrap();
        assert_eq!(flags, vec![0, 1, 0]);
        assert!(!is_solid(&flags, -1));
        assert!(!is_solid(&flags, 99));
    }

    #[test]
    fn test_gid_limit() {
        assert!(matches!(
            build_collision_flags(&[1], &[i32::MAX]),
            Err(LevelError::DataIntegrity(DataIntegrityError::GidLimitExceeded { .. }))
        ));
    }
}
