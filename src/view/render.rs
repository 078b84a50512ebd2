use wgpu::util::DeviceExt;
use wgpu::*;

use crate::controller::FrameSnapshot;
use crate::model::{Environment, SceneGeometry, SceneObject};
use crate::ui::PendingTextures;
use crate::utils::{MeshBuffer, Vertex};

pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    pub ambient: [f32; 4],
    pub sun_color: [f32; 4],
    pub sun_dir: [f32; 4],
}

impl LightingUniform {
    pub fn from_environment(env: &Environment) -> Self {
        Self {
            ambient: env.ambient.to_array(),
            sun_color: env.sun.color.extend(1.0).to_array(),
            sun_dir: env.sun.direction.extend(0.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub diffuse: [f32; 4],
}

pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d { width: width.max(1), height: height.max(1), depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
    (depth_texture, depth_view)
}

fn uniform_entry(binding: u32, visibility: ShaderStages) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility,
        ty: BindingType::Buffer {
            ty: BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

// Shared graphics setup used by native and web
pub struct CameraResources {
    pub camera_buffer: wgpu::Buffer,
    pub lighting_buffer: wgpu::Buffer,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub camera_bind_group: wgpu::BindGroup,
}

pub fn create_camera_resources(device: &wgpu::Device, env: &Environment) -> CameraResources {
    let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("camera_buffer"),
        size: std::mem::size_of::<CameraUniform>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let lighting_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("lighting_buffer"),
        contents: bytemuck::bytes_of(&LightingUniform::from_environment(env)),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("camera_bind_group_layout"),
        entries: &[
            uniform_entry(0, ShaderStages::VERTEX),
            uniform_entry(1, ShaderStages::FRAGMENT),
        ],
    });

    let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("camera_bind_group"),
        layout: &bind_group_layout,
        entries: &[
            wgpu::BindGroupEntry { binding: 0, resource: camera_buffer.as_entire_binding() },
            wgpu::BindGroupEntry { binding: 1, resource: lighting_buffer.as_entire_binding() },
        ],
    });

    CameraResources { camera_buffer, lighting_buffer, bind_group_layout, camera_bind_group }
}

/// One drawable scene object on the GPU
pub struct ObjectResources {
    pub mesh: MeshBuffer,
    pub diffuse: [f32; 4],
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl ObjectResources {
    fn new(device: &Device, layout: &BindGroupLayout, object: &SceneObject, label: &str) -> Self {
        let diffuse = object.diffuse.to_array();
        let uniform = ObjectUniform {
            model: glam::Mat4::IDENTITY.to_cols_array_2d(),
            diffuse,
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: uniform_buffer.as_entire_binding() }],
        });

        Self {
            mesh: object.mesh.upload(device),
            diffuse,
            uniform_buffer,
            bind_group,
        }
    }

    fn write_transform(&self, queue: &Queue, model: glam::Mat4) {
        let uniform = ObjectUniform {
            model: model.to_cols_array_2d(),
            diffuse: self.diffuse,
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    fn draw(&self, rp: &mut RenderPass<'_>) {
        rp.set_bind_group(1, &self.bind_group, &[]);
        rp.set_vertex_buffer(0, self.mesh.vertex_buffer.slice(..));
        rp.set_index_buffer(self.mesh.index_buffer.slice(..), IndexFormat::Uint32);
        rp.draw_indexed(0..self.mesh.index_count, 0, 0..1);
    }
}

pub fn create_mesh_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    camera_layout: &wgpu::BindGroupLayout,
    object_layout: &wgpu::BindGroupLayout,
) -> RenderPipeline {
    let shader_src = include_str!("shaders/mesh.wgsl");
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("mesh_shader"),
        source: wgpu::ShaderSource::Wgsl(shader_src.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("mesh_pipeline_layout"),
        bind_group_layouts: &[camera_layout, object_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("mesh_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    wgpu::VertexAttribute { offset: 0, shader_location: 0, format: wgpu::VertexFormat::Float32x3 },
                    wgpu::VertexAttribute { offset: 12, shader_location: 1, format: wgpu::VertexFormat::Float32x3 },
                ],
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState { format, blend: Some(wgpu::BlendState::REPLACE), write_mask: wgpu::ColorWrites::ALL })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
        multiview: None,
        cache: None,
    })
}

/// GPU-resident scene: meshes, pipeline and uniforms. Released exactly once, on drop.
pub struct SceneResources {
    pub pipeline: RenderPipeline,
    pub camera: CameraResources,
    pub block: ObjectResources,
    pub floor: ObjectResources,
    pub depth_texture: Texture,
    pub depth_view: TextureView,
}

impl SceneResources {
    pub fn new(
        device: &Device,
        format: TextureFormat,
        geometry: &SceneGeometry,
        env: &Environment,
        width: u32,
        height: u32,
    ) -> Self {
        let camera = create_camera_resources(device, env);
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_bind_group_layout"),
            entries: &[uniform_entry(0, ShaderStages::VERTEX | ShaderStages::FRAGMENT)],
        });
        let pipeline = create_mesh_pipeline(device, format, &camera.bind_group_layout, &object_layout);
        let block = ObjectResources::new(device, &object_layout, &geometry.block, "block_uniform");
        let floor = ObjectResources::new(device, &object_layout, &geometry.floor, "floor_uniform");
        let (depth_texture, depth_view) = create_depth_texture(device, width, height);

        tracing::info!(
            "scene resources created ({} + {} indices)",
            block.mesh.index_count,
            floor.mesh.index_count
        );

        Self { pipeline, camera, block, floor, depth_texture, depth_view }
    }
}

impl Drop for SceneResources {
    fn drop(&mut self) {
        self.depth_texture.destroy();
        self.block.mesh.vertex_buffer.destroy();
        self.block.mesh.index_buffer.destroy();
        self.floor.mesh.vertex_buffer.destroy();
        self.floor.mesh.index_buffer.destroy();
        tracing::info!("scene resources released");
    }
}

///////////////////////////////////////////////////////////////////////////////

/// UI primitives produced by egui for this frame
pub struct UiFrame {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub pixels_per_point: f32,
}

/// World pass resources plus the egui renderer that draws the touchpad on top
pub struct RenderState {
    pub width: u32,
    pub height: u32,
    pub clear_color: Color,
    pub scene: SceneResources,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl RenderState {
    pub fn new(
        device: &Device,
        format: TextureFormat,
        geometry: &SceneGeometry,
        env: &Environment,
        clear_color: [f64; 4],
        width: u32,
        height: u32,
    ) -> Self {
        let [r, g, b, a] = clear_color;
        Self {
            width,
            height,
            clear_color: Color { r, g, b, a },
            scene: SceneResources::new(device, format, geometry, env, width, height),
            egui_renderer: egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default()),
        }
    }

    pub fn resize(&mut self, device: &Device, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;
        let (depth_texture, depth_view) = create_depth_texture(device, width, height);
        self.scene.depth_texture.destroy();
        self.scene.depth_texture = depth_texture;
        self.scene.depth_view = depth_view;
    }

    /// Clear, draw the floor and block through the world viewport, then the overlay on top.
    /// Queued egui texture changes are only consumed once a surface texture is acquired.
    pub fn draw_frame(
        &mut self,
        device: &Device,
        queue: &Queue,
        surface: &Surface,
        snapshot: &FrameSnapshot,
        ui: UiFrame,
        textures: &mut PendingTextures,
    ) -> Result<(), SurfaceError> {
        let scene = &self.scene;

        let camera = CameraUniform { view_proj: snapshot.world_view_proj.to_cols_array_2d() };
        queue.write_buffer(&scene.camera.camera_buffer, 0, bytemuck::bytes_of(&camera));
        scene.floor.write_transform(queue, snapshot.floor_transform);
        scene.block.write_transform(queue, snapshot.block_transform);

        let frame = surface.get_current_texture()?;
        let textures_delta = textures.take();
        let view = frame.texture.create_view(&TextureViewDescriptor::default());
        let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("encoder"),
        });

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.width, self.height],
            pixels_per_point: ui.pixels_per_point,
        };

        // Upload egui textures
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        self.egui_renderer
            .update_buffers(device, queue, &mut encoder, &ui.primitives, &screen_descriptor);

        {
            let mut rp = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("world_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(self.clear_color),
                        store: StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                    view: &scene.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some((x, y, w, h)) = surface_rect(snapshot, self.width, self.height) {
                rp.set_viewport(x, y, w, h, 0.0, 1.0);
                rp.set_pipeline(&scene.pipeline);
                rp.set_bind_group(0, &scene.camera.camera_bind_group, &[]);
                scene.floor.draw(&mut rp);
                scene.block.draw(&mut rp);
            }
        }

        // Render egui overlay
        {
            let egui_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("ui_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Load,
                        store: StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer
                .render(&mut egui_pass.forget_lifetime(), &ui.primitives, &screen_descriptor);
        }

        // Free egui textures
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

/// World viewport in wgpu's top-left framebuffer space, clipped to the target
fn surface_rect(snapshot: &FrameSnapshot, width: u32, height: u32) -> Option<(f32, f32, f32, f32)> {
    let b = snapshot.world_viewport;
    if b.is_empty() {
        return None;
    }
    let x = b.x.max(0) as f32;
    let y = (height as i32 - b.y - b.height).max(0) as f32;
    let w = (b.width as f32).min(width as f32 - x);
    let h = (b.height as f32).min(height as f32 - y);
    (w > 0.0 && h > 0.0).then_some((x, y, w, h))
}
