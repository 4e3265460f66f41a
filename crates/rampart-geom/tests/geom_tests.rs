use rampart_geom::{Aabb, Dims, Vec3, rotate_yaw, rotate_yaw_inv};
use proptest::prelude::*;

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn vec3_approx_eq(a: Vec3, b: Vec3, eps: f32) -> bool {
    approx_eq(a.x, b.x, eps) && approx_eq(a.y, b.y, eps) && approx_eq(a.z, b.z, eps)
}

#[test]
fn aabb_extent_and_center() {
    let b = Aabb::new(Vec3::new(-1.0, 0.0, -2.0), Vec3::new(1.0, 3.0, 2.0));
    assert!(vec3_approx_eq(b.extent(), Vec3::new(2.0, 3.0, 4.0), 1e-6));
    assert!(vec3_approx_eq(b.center(), Vec3::new(0.0, 1.5, 0.0), 1e-6));
    let swapped = Aabb::new(b.max, b.min);
    assert_eq!(swapped.extent(), b.extent());
    assert!(approx_eq(b.extent().max_element(), 4.0, 1e-6));
}

#[test]
fn yaw_quarter_turn_maps_x_to_z() {
    let v = rotate_yaw(Vec3::new(1.0, 2.0, 0.0), 90.0);
    assert!(vec3_approx_eq(v, Vec3::new(0.0, 2.0, 1.0), 1e-6));
    let w = rotate_yaw(Vec3::new(0.0, 0.0, 1.0), 90.0);
    assert!(vec3_approx_eq(w, Vec3::new(-1.0, 0.0, 0.0), 1e-6));
}

#[test]
fn dims_index_layout() {
    let d = Dims::new(3, 2, 4);
    assert_eq!(d.len(), 24);
    assert_eq!(d.idx(0, 0, 0), 0);
    assert_eq!(d.idx(1, 0, 0), 1);
    assert_eq!(d.idx(0, 0, 1), 3);
    assert_eq!(d.idx(0, 1, 0), 12);
    assert!(d.contains(2, 1, 3));
    assert!(!d.contains(3, 0, 0));
    assert!(!d.contains(-1, 0, 0));
    assert!(Dims::new(0, 4, 4).is_empty());
}

#[test]
fn dims_len_does_not_overflow() {
    assert_eq!(Dims::new(3, 2, 4).checked_len(), Some(24));
    assert_eq!(Dims::new(usize::MAX, 2, 2).checked_len(), None);
    assert_eq!(Dims::new(usize::MAX, 2, 2).len(), usize::MAX);
    assert!(!Dims::new(usize::MAX, 2, 2).is_empty());
    assert_eq!(Dims::new(usize::MAX, 0, 2).checked_len(), Some(0));
}

fn dim() -> impl Strategy<Value = usize> {
    1usize..=8
}

fn bounded_f32() -> impl Strategy<Value = f32> {
    -1_000.0f32..1_000.0
}

proptest! {
    // idx and pos are inverse over the whole grid
    #[test]
    fn dims_idx_pos_roundtrip(sx in dim(), sy in dim(), sz in dim()) {
        let d = Dims::new(sx, sy, sz);
        let mut seen = vec![false; d.len()];
        for y in 0..sy { for z in 0..sz { for x in 0..sx {
            let i = d.idx(x, y, z);
            prop_assert!(i < d.len());
            prop_assert!(!seen[i]);
            seen[i] = true;
            prop_assert_eq!(d.pos(i), (x, y, z));
        }}}
    }

    // Yaw keeps Y and length; the inverse undoes it
    #[test]
    fn yaw_preserves_height_and_length(x in bounded_f32(), y in bounded_f32(), z in bounded_f32(), deg in -720.0f32..720.0) {
        let v = Vec3::new(x, y, z);
        let r = rotate_yaw(v, deg);
        prop_assert_eq!(r.y, v.y);
        let h0 = (v.x * v.x + v.z * v.z).sqrt();
        let h1 = (r.x * r.x + r.z * r.z).sqrt();
        prop_assert!(approx_eq(h0, h1, 1e-2));
        prop_assert!(vec3_approx_eq(rotate_yaw_inv(r, deg), v, 1e-2));
    }
}
