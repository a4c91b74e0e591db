//! Closed-form folds from interleaved cascades to the serial checksum.
//!
//! Lane `i` of a `K`-way kernel sees words `i, i + K, ...`. Expanding the
//! serial cascade over the interleaved word order gives fixed integer
//! weights per lane and level; the weights below are those expansions for
//! `K = 2` and `K = 4`. All arithmetic wraps modulo 2⁶⁴.

use std::num::Wrapping;

use super::Lanes;
use crate::Checksum;

type W = Wrapping<u64>;

fn wrapped<const K: usize>(lanes: &Lanes<K>) -> [[W; K]; 4] {
    lanes.levels().map(|level| level.map(Wrapping))
}

pub(crate) fn one_lane(lanes: &Lanes<1>) -> Checksum {
    let [[a], [b], [c], [d]] = *lanes.levels();
    Checksum::new(a, b, c, d)
}

pub(crate) fn two_lanes(lanes: &Lanes<2>) -> Checksum {
    let [[a0, a1], [b0, b1], [c0, c1], [d0, d1]] = wrapped(lanes);

    let a = a0 + a1;
    let b = Wrapping(2) * (b0 + b1) - a1;
    let c = Wrapping(4) * (c0 + c1) - b0 - Wrapping(3) * b1;
    let d = Wrapping(8) * (d0 + d1) - Wrapping(4) * c0 - Wrapping(8) * c1 + b1;

    Checksum::new(a.0, b.0, c.0, d.0)
}

pub(crate) fn four_lanes(lanes: &Lanes<4>) -> Checksum {
    let [
        [a0, a1, a2, a3],
        [b0, b1, b2, b3],
        [c0, c1, c2, c3],
        [d0, d1, d2, d3],
    ] = wrapped(lanes);

    let a = a0 + a1 + a2 + a3;
    let b = Wrapping(4) * (b0 + b1 + b2 + b3) - a1 - Wrapping(2) * a2 - Wrapping(3) * a3;
    let c = Wrapping(16) * (c0 + c1 + c2 + c3) + a2 + Wrapping(3) * a3
        - Wrapping(6) * b0
        - Wrapping(10) * b1
        - Wrapping(14) * b2
        - Wrapping(18) * b3;
    let d = Wrapping(64) * (d0 + d1 + d2 + d3)
        - Wrapping(48) * c0
        - Wrapping(64) * c1
        - Wrapping(80) * c2
        - Wrapping(96) * c3
        + Wrapping(4) * b0
        + Wrapping(10) * b1
        + Wrapping(20) * b2
        + Wrapping(34) * b3
        - a3;

    Checksum::new(a.0, b.0, c.0, d.0)
}
