use multirotor_lib::types::Vector3r;
use rand::Rng;

use crate::config::Bounds;

/// Sample `count` waypoints uniformly in `bounds` around `origin`
///
/// Each axis is sampled independently.
pub fn generate<R: Rng + ?Sized>(origin: Vector3r, count: usize, bounds: &Bounds, rng: &mut R) -> Vec<Vector3r> {
    (0..count)
        .map(|_| {
            let offset = Vector3r::new(
                rng.gen_range(-bounds.horizontal..=bounds.horizontal),
                rng.gen_range(-bounds.horizontal..=bounds.horizontal),
                rng.gen_range(bounds.z_min..=bounds.z_max),
            );
            origin + offset
        })
        .collect()
}
