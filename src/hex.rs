//! Hex grid coordinate systems.
//!
//! Two addressing schemes are in use:
//! - `AxialCoord` (q, r) for the unbounded exploration map. The implicit third
//!   cube coordinate is `s = -q - r`.
//! - `OffsetCoord` (x, y) for the bounded grid of the continuous biome map,
//!   where every odd column is shifted half a cell down.

use std::fmt;

/// The 6 axial directions: east, northeast, northwest, west, southwest, southeast
pub const AXIAL_DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Axial coordinate for the exploration hex map
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct AxialCoord {
    pub q: i32,
    pub r: i32,
}

impl AxialCoord {
    pub const ORIGIN: AxialCoord = AxialCoord { q: 0, r: 0 };

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Cube coordinate `s`
    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Cube distance: `max(|dq|, |dr|, |ds|)`
    pub fn distance(&self, other: &AxialCoord) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        dq.max(dr).max(ds)
    }

    pub fn distance_from_origin(&self) -> i32 {
        self.distance(&Self::ORIGIN)
    }

    /// The 6 adjacent coordinates, in `AXIAL_DIRECTIONS` order
    pub fn neighbors(&self) -> [AxialCoord; 6] {
        AXIAL_DIRECTIONS.map(|(dq, dr)| AxialCoord::new(self.q + dq, self.r + dr))
    }

    /// Every coordinate within `range` steps, including `self`.
    ///
    /// Enumerates `dq` outer, `dr` inner, so the order is stable. A negative
    /// range yields nothing.
    pub fn hexes_in_range(&self, range: i32) -> Vec<AxialCoord> {
        if range < 0 {
            return Vec::new();
        }

        let mut results = Vec::with_capacity(hex_count(range));
        for dq in -range..=range {
            let min_r = (-range).max(-dq - range);
            let max_r = range.min(-dq + range);
            for dr in min_r..=max_r {
                results.push(AxialCoord::new(self.q + dq, self.r + dr));
            }
        }
        results
    }

    /// Center plus its 6 neighbors: the footprint of a megagon
    pub fn megagon_cluster(&self) -> [AxialCoord; 7] {
        let n = self.neighbors();
        [*self, n[0], n[1], n[2], n[3], n[4], n[5]]
    }
}

impl fmt::Display for AxialCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

impl From<(i32, i32)> for AxialCoord {
    fn from((q, r): (i32, i32)) -> Self {
        Self::new(q, r)
    }
}

/// Number of hexes within `range` of a center: `3r(r+1) + 1`
pub fn hex_count(range: i32) -> usize {
    if range < 0 {
        return 0;
    }
    let r = range as usize;
    3 * r * (r + 1) + 1
}

/// Offset coordinate on the bounded biome grid (odd columns shifted)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OffsetCoord {
    pub x: i32,
    pub y: i32,
}

const EVEN_COLUMN_OFFSETS: [(i32, i32); 6] = [(1, 0), (0, -1), (-1, -1), (-1, 0), (-1, 1), (0, 1)];
const ODD_COLUMN_OFFSETS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (0, 1), (1, 1)];

impl OffsetCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn is_even_column(&self) -> bool {
        self.x.rem_euclid(2) == 0
    }

    /// The 6 adjacent grid positions (column parity decides the offsets)
    pub fn neighbors(&self) -> [OffsetCoord; 6] {
        let offsets = if self.is_even_column() {
            EVEN_COLUMN_OFFSETS
        } else {
            ODD_COLUMN_OFFSETS
        };
        offsets.map(|(dx, dy)| OffsetCoord::new(self.x + dx, self.y + dy))
    }

    /// Approximate hex distance for offset coordinates: `dx + max(0, (dy - dx) / 2)`
    pub fn distance(&self, other: &OffsetCoord) -> i32 {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        dx + 0.max((dy - dx) / 2)
    }
}

impl fmt::Display for OffsetCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_distance_is_symmetric_cube_distance() {
        let a = AxialCoord::new(0, 0);
        let b = AxialCoord::new(3, -1);
        assert_eq!(a.distance(&b), 3);
        assert_eq!(b.distance(&a), 3);

        let c = AxialCoord::new(-2, 5);
        assert_eq!(a.distance(&c), 5);
        assert_eq!(c.s(), -3);
    }

    #[test]
    fn test_neighbors_are_distance_one() {
        let center = AxialCoord::new(4, -7);
        let neighbors = center.neighbors();
        let unique: HashSet<_> = neighbors.iter().collect();
        assert_eq!(unique.len(), 6);
        for n in neighbors {
            assert_eq!(center.distance(&n), 1);
        }
    }

    #[test]
    fn test_hexes_in_range_counts() {
        let center = AxialCoord::new(1, 1);
        for range in 0..6 {
            let hexes = center.hexes_in_range(range);
            assert_eq!(hexes.len(), hex_count(range));
            assert!(hexes.iter().all(|h| h.distance(&center) <= range));
        }
        assert!(center.hexes_in_range(-1).is_empty());
    }

    #[test]
    fn test_megagon_cluster() {
        let cluster = AxialCoord::new(2, 2).megagon_cluster();
        assert_eq!(cluster[0], AxialCoord::new(2, 2));
        assert_eq!(cluster.iter().collect::<HashSet<_>>().len(), 7);
    }

    #[test]
    fn test_display() {
        assert_eq!(AxialCoord::new(-1, 3).to_string(), "(-1, 3)");
    }

    #[test]
    fn test_offset_neighbors_depend_on_column_parity() {
        let even = OffsetCoord::new(2, 2).neighbors();
        assert!(even.contains(&OffsetCoord::new(1, 1)));
        let odd = OffsetCoord::new(3, 2).neighbors();
        assert!(odd.contains(&OffsetCoord::new(4, 3)));
        // Negative odd columns use the odd offsets too
        let negative = OffsetCoord::new(-1, 0).neighbors();
        assert!(negative.contains(&OffsetCoord::new(0, 1)));
    }

    #[test]
    fn test_offset_distance() {
        let a = OffsetCoord::new(0, 0);
        assert_eq!(a.distance(&OffsetCoord::new(3, 0)), 3);
        assert_eq!(a.distance(&OffsetCoord::new(0, 4)), 2);
        assert_eq!(a.distance(&OffsetCoord::new(1, 5)), 3);
    }
}
