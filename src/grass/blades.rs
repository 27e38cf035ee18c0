//! GPU-visible grass data layouts and their CPU-side initial contents

use bytemuck::{Pod, Zeroable};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Maximum number of blades the field holds
pub const MAX_GRASS_BLADES: u32 = 64 * 1024 * 2;
/// Vertices generated per blade (4 stacked quads)
pub const GRASS_VERTICES_PER_BLADE: u32 = 16;
/// Indices per quad: two triangles
pub const INDICES_PER_QUAD: u32 = 6;
/// Indices generated per blade
pub const GRASS_INDICES_PER_BLADE: u32 = GRASS_VERTICES_PER_BLADE / 4 * INDICES_PER_QUAD;
/// Blades per row of the initial field
pub const FIELD_ROW_LENGTH: u32 = 256;
/// Compute workgroup size along x (must match the WGSL)
pub const WORKGROUP_SIZE: u32 = 64;
/// u32 slots in the draw-args buffer; the first five are the indirect args
pub const DRAW_ARGS_WORDS: u64 = 256;

/// One grass blade root (matches `Blade` in the WGSL)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GrassBlade {
    pub pos: [f32; 3],
    /// Packed RGBA8 tint
    pub col: u32,
    pub width: f32,
    pub height: f32,
    pub _pad: [f32; 2],
}

/// One generated vertex (matches `GrassVertex` in the WGSL)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GrassVertex {
    pub pos: [f32; 3],
    pub col: u32,
    pub norm: [f32; 3],
    /// 0 at the root, 1 at the tip
    pub height_t: f32,
}

/// Indexed indirect draw arguments as the GPU reads them
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawArgs {
    pub index_count: u32,
    pub instance_count: u32,
    pub first_index: u32,
    pub base_vertex: i32,
    pub first_instance: u32,
}

/// Lay blades out in rows of 256 going into -Z, with seeded jitter
pub fn initial_blades(count: u32, seed: u64) -> Vec<GrassBlade> {
    let mut rng = Pcg32::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let x = (i % FIELD_ROW_LENGTH) as f32 + rng.random_range(-0.4..0.4);
            let z = -((i / FIELD_ROW_LENGTH) as f32) + rng.random_range(-0.4..0.4);
            GrassBlade {
                pos: [x, 0.0, z],
                col: u32::MAX,
                width: rng.random_range(0.06..0.1),
                height: rng.random_range(0.6..1.2),
                _pad: [0.0; 2],
            }
        })
        .collect()
}

/// Static index buffer: quad `q` uses vertices `4q..4q+4` as (2,1,0), (2,3,1)
pub fn quad_indices(quads: u32) -> Vec<u32> {
    let mut indices = Vec::with_capacity((quads * INDICES_PER_QUAD) as usize);
    for q in 0..quads {
        let base = q * 4;
        indices.extend_from_slice(&[base + 2, base + 1, base, base + 2, base + 3, base + 1]);
    }
    indices
}

/// Workgroups needed to cover `count` invocations
pub fn workgroups_for(count: u32) -> u32 {
    count.div_ceil(WORKGROUP_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_sizes_match_wgsl() {
        assert_eq!(std::mem::size_of::<GrassBlade>(), 32);
        assert_eq!(std::mem::size_of::<GrassVertex>(), 32);
        assert_eq!(std::mem::size_of::<DrawArgs>(), 20);
    }

    #[test]
    fn test_initial_blades_grid() {
        let blades = initial_blades(600, 3);
        assert_eq!(blades.len(), 600);
        let b = blades[257];
        assert!((b.pos[0] - 1.0).abs() <= 0.4);
        assert!((b.pos[2] + 1.0).abs() <= 0.4);
        assert_eq!(b.pos[1], 0.0);
        assert_eq!(b.col, u32::MAX);
        assert!(blades.iter().all(|b| b.height >= 0.6 && b.height < 1.2));
    }

    #[test]
    fn test_quad_indices_pattern() {
        let indices = quad_indices(2);
        assert_eq!(indices, vec![2, 1, 0, 2, 3, 1, 6, 5, 4, 6, 7, 5]);
    }

    #[test]
    fn test_full_index_buffer_size() {
        let quads = MAX_GRASS_BLADES * GRASS_VERTICES_PER_BLADE / 4;
        assert_eq!(quad_indices(quads).len() as u32, MAX_GRASS_BLADES * GRASS_INDICES_PER_BLADE);
        assert_eq!(GRASS_INDICES_PER_BLADE, 24);
    }

    #[test]
    fn test_workgroups_cover_all_blades() {
        assert_eq!(workgroups_for(MAX_GRASS_BLADES), 2048);
        assert_eq!(workgroups_for(65), 2);
        assert_eq!(workgroups_for(0), 0);
    }
}
