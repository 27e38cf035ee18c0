//! Procedural grass field
//!
//! Three GPU stages per frame, each in its own pass so wgpu orders the
//! writes before the reads:
//! 1. `reset`: zero the indirect index count
//! 2. `generate`: one invocation per blade writes 16 vertices for blades
//!    in view and atomically reserves 24 indices
//! 3. draw: indexed indirect draw, counts read from the GPU-written args
//!
//! [`GrassField`] owns every buffer and pipeline; dropping it releases
//! them.

pub mod blades;
pub mod camera;

use glam::Vec3;
use wgpu::util::DeviceExt;

pub use blades::{
    DrawArgs, GRASS_INDICES_PER_BLADE, GRASS_VERTICES_PER_BLADE, GrassBlade, GrassVertex,
    MAX_GRASS_BLADES,
};
pub use camera::{CameraUniform, FlyCamera};

use crate::renderer::GpuContext;
use blades::{DRAW_ARGS_WORDS, initial_blades, quad_indices, workgroups_for};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const SKY: wgpu::Color = wgpu::Color {
    r: 0.45,
    g: 0.65,
    b: 0.85,
    a: 1.0,
};

fn storage_entry(binding: u32, visibility: wgpu::ShaderStages, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_depth_view(device: &wgpu::Device, size: (u32, u32)) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("grass_depth"),
        size: wgpu::Extent3d {
            width: size.0,
            height: size.1,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn compute_pipeline(
    device: &wgpu::Device,
    label: &str,
    source: &str,
    layout: &wgpu::BindGroupLayout,
) -> wgpu::ComputePipeline {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[layout],
        immediate_size: 0,
    });
    device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        module: &module,
        entry_point: Some("main"),
        compilation_options: Default::default(),
        cache: None,
    })
}

/// GPU context for the grass field
pub struct GrassField {
    blade_count: u32,
    camera: FlyCamera,
    elapsed: f32,

    camera_buffer: wgpu::Buffer,
    draw_args_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    // Only referenced through bind groups, kept to pin their lifetime here
    _blade_buffer: wgpu::Buffer,
    _vertex_buffer: wgpu::Buffer,

    reset_pipeline: wgpu::ComputePipeline,
    generate_pipeline: wgpu::ComputePipeline,
    render_pipeline: wgpu::RenderPipeline,
    reset_bind_group: wgpu::BindGroup,
    generate_bind_group: wgpu::BindGroup,
    render_bind_group: wgpu::BindGroup,

    depth_view: wgpu::TextureView,
}

impl GrassField {
    /// Allocate buffers, upload the initial field and build the pipelines
    pub fn new(gpu: &GpuContext, seed: u64) -> Self {
        let device = &gpu.device;
        let blade_count = MAX_GRASS_BLADES;

        let blades = initial_blades(blade_count, seed);
        let blade_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("grass_blades"),
            contents: bytemuck::cast_slice(&blades),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("grass_vertices"),
            size: (std::mem::size_of::<GrassVertex>() as u64)
                * u64::from(blade_count)
                * u64::from(GRASS_VERTICES_PER_BLADE),
            usage: wgpu::BufferUsages::STORAGE,
            mapped_at_creation: false,
        });

        let draw_args_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("grass_draw_args"),
            size: std::mem::size_of::<u32>() as u64 * DRAW_ARGS_WORDS,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::INDIRECT
                | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let indices = quad_indices(blade_count * GRASS_VERTICES_PER_BLADE / 4);
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("grass_indices"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let camera = FlyCamera::default();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("grass_camera"),
            contents: bytemuck::bytes_of(&CameraUniform::new(&camera, gpu.aspect(), 0.0, blade_count)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        log::info!(
            "Grass field: {} blades, {} MiB of vertex storage",
            blade_count,
            vertex_buffer.size() / (1024 * 1024)
        );

        // Reset stage
        let reset_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("grass_reset_layout"),
            entries: &[storage_entry(0, wgpu::ShaderStages::COMPUTE, false)],
        });
        let reset_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("grass_reset_bind_group"),
            layout: &reset_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: draw_args_buffer.as_entire_binding(),
            }],
        });
        let reset_pipeline = compute_pipeline(
            device,
            "grass_reset",
            include_str!("shaders/atomic_reset.wgsl"),
            &reset_layout,
        );

        // Generate stage
        let generate_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("grass_generate_layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::COMPUTE),
                storage_entry(1, wgpu::ShaderStages::COMPUTE, true),
                storage_entry(2, wgpu::ShaderStages::COMPUTE, false),
                storage_entry(3, wgpu::ShaderStages::COMPUTE, false),
            ],
        });
        let generate_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("grass_generate_bind_group"),
            layout: &generate_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: blade_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: vertex_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: draw_args_buffer.as_entire_binding(),
                },
            ],
        });
        let generate_pipeline = compute_pipeline(
            device,
            "grass_generate",
            include_str!("shaders/grass_generate.wgsl"),
            &generate_layout,
        );

        // Draw stage
        let render_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("grass_render_layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX),
                storage_entry(1, wgpu::ShaderStages::VERTEX, true),
            ],
        });
        let render_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("grass_render_bind_group"),
            layout: &render_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: vertex_buffer.as_entire_binding(),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("grass_render"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/grass_render.wgsl").into()),
        });
        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("grass_render_layout"),
            bind_group_layouts: &[&render_layout],
            immediate_size: 0,
        });
        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("grass_render"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // Vertices are pulled from storage
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            blade_count,
            camera,
            elapsed: 0.0,
            camera_buffer,
            draw_args_buffer,
            index_buffer,
            _blade_buffer: blade_buffer,
            _vertex_buffer: vertex_buffer,
            reset_pipeline,
            generate_pipeline,
            render_pipeline,
            reset_bind_group,
            generate_bind_group,
            render_bind_group,
            depth_view: create_depth_view(device, gpu.size),
        }
    }

    /// Recreate size-dependent targets after the surface was resized
    pub fn resize(&mut self, gpu: &GpuContext) {
        self.depth_view = create_depth_view(&gpu.device, gpu.size);
    }

    /// Fly the camera and upload the new matrices
    pub fn update(&mut self, gpu: &GpuContext, direction: Vec3, dt: f32) {
        self.elapsed += dt;
        self.camera.fly(direction, dt);
        let uniform = CameraUniform::new(&self.camera, gpu.aspect(), self.elapsed, self.blade_count);
        gpu.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Record the reset and generate passes
    pub fn compute(&self, encoder: &mut wgpu::CommandEncoder) {
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("grass_reset_pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.reset_pipeline);
            pass.set_bind_group(0, &self.reset_bind_group, &[]);
            pass.dispatch_workgroups(1, 1, 1);
        }
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("grass_generate_pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.generate_pipeline);
            pass.set_bind_group(0, &self.generate_bind_group, &[]);
            pass.dispatch_workgroups(workgroups_for(self.blade_count), 1, 1);
        }
    }

    /// Record the indirect draw into `view`
    pub fn draw(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("grass_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(SKY),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(0, &self.render_bind_group, &[]);
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed_indirect(&self.draw_args_buffer, 0);
    }

    /// Compute, draw and present one frame
    pub fn render(&self, gpu: &GpuContext) -> Result<(), wgpu::SurfaceError> {
        let output = gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("grass_encoder"),
            });
        self.compute(&mut encoder);
        self.draw(&mut encoder, &view);

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
