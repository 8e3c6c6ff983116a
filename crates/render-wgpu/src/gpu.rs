use crate::shaders;
use bytemuck::{Pod, Zeroable};
use deskscene_common::{LIGHT_COUNT, LightField, PrimitiveKind, Uniform};
use deskscene_render::{
    MeshData, MeshLibrary, MeshVertex, RenderError, SamplerSettings, ShaderProgram, TexelFormat,
    TextureDevice, TextureFilter, TextureHandle, TextureUpload, TextureWrap, UniformState,
};
use glam::{Mat4, Vec2, Vec3, Vec4};
use std::collections::BTreeMap;
use wgpu::util::DeviceExt;

/// Byte distance between per-draw uniform slots; a multiple of the 256-byte
/// dynamic offset alignment every adapter supports.
const DRAW_SLOT_STRIDE: u64 = 512;
/// Draws a single frame may issue before further draws are dropped.
pub const MAX_DRAWS_PER_FRAME: usize = 256;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct GpuLight {
    position: [f32; 4],
    ambient_color: [f32; 4],
    diffuse_color: [f32; 4],
    specular: [f32; 4],
}

/// CPU mirror of the shader's `DrawUniforms` block.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct DrawUniforms {
    model: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    view_position: [f32; 4],
    object_color: [f32; 4],
    uv_scale: [f32; 4],
    flags: [i32; 4],
    material_ambient: [f32; 4],
    material_diffuse: [f32; 4],
    material_specular: [f32; 4],
    lights: [GpuLight; LIGHT_COUNT],
}

impl DrawUniforms {
    /// Pack the current uniform state. Names never written read as zero,
    /// except matrices (identity), UV scale (1) and object color (white).
    pub(crate) fn pack(state: &UniformState) -> Self {
        let mat = |u| state.mat4(u).unwrap_or(Mat4::IDENTITY).to_cols_array_2d();
        let v3 = |u| state.vec3(u).unwrap_or(Vec3::ZERO);
        let f = |u| state.float(u).unwrap_or(0.0);
        let with_w = |xyz: Vec3, w: f32| xyz.extend(w).to_array();

        let lights = std::array::from_fn(|i| GpuLight {
            position: with_w(v3(Uniform::Light(i, LightField::Position)), 1.0),
            ambient_color: with_w(v3(Uniform::Light(i, LightField::AmbientColor)), 0.0),
            diffuse_color: with_w(v3(Uniform::Light(i, LightField::DiffuseColor)), 0.0),
            specular: with_w(
                v3(Uniform::Light(i, LightField::SpecularColor)),
                f(Uniform::Light(i, LightField::SpecularIntensity)),
            ),
        });

        Self {
            model: mat(Uniform::Model),
            view: mat(Uniform::View),
            projection: mat(Uniform::Projection),
            view_position: with_w(v3(Uniform::ViewPosition), 1.0),
            object_color: state.vec4(Uniform::ObjectColor).unwrap_or(Vec4::ONE).to_array(),
            uv_scale: state
                .vec2(Uniform::UvScale)
                .unwrap_or(Vec2::ONE)
                .extend(0.0)
                .extend(0.0)
                .to_array(),
            flags: [
                state.int(Uniform::UseTexture).unwrap_or(0),
                state.int(Uniform::UseLighting).unwrap_or(0),
                0,
                0,
            ],
            material_ambient: with_w(
                v3(Uniform::MaterialAmbientColor),
                f(Uniform::MaterialAmbientStrength),
            ),
            material_diffuse: with_w(v3(Uniform::MaterialDiffuseColor), 0.0),
            material_specular: with_w(
                v3(Uniform::MaterialSpecularColor),
                f(Uniform::MaterialShininess),
            ),
            lights,
        }
    }
}

/// Expand tightly packed RGB8 to RGBA8 with opaque alpha.
pub(crate) fn expand_to_rgba(format: TexelFormat, pixels: &[u8]) -> Vec<u8> {
    match format {
        TexelFormat::Rgba8 => pixels.to_vec(),
        TexelFormat::Rgb8 => pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
    }
}

/// Full mip chain for an RGBA8 image, level 0 first, down to 1x1.
pub(crate) fn mip_chain(width: u32, height: u32, rgba: Vec<u8>) -> Vec<(u32, u32, Vec<u8>)> {
    let mut levels = vec![(width, height, rgba)];
    let Some(mut current) = image::RgbaImage::from_raw(width, height, levels[0].2.clone()) else {
        return levels;
    };
    while current.width() > 1 || current.height() > 1 {
        let w = (current.width() / 2).max(1);
        let h = (current.height() / 2).max(1);
        current = image::imageops::resize(&current, w, h, image::imageops::FilterType::Triangle);
        levels.push((w, h, current.as_raw().clone()));
    }
    levels
}

fn address_mode(wrap: TextureWrap) -> wgpu::AddressMode {
    match wrap {
        TextureWrap::Repeat => wgpu::AddressMode::Repeat,
        TextureWrap::ClampToEdge => wgpu::AddressMode::ClampToEdge,
    }
}

fn filter_mode(filter: TextureFilter) -> wgpu::FilterMode {
    match filter {
        TextureFilter::Linear => wgpu::FilterMode::Linear,
        TextureFilter::Nearest => wgpu::FilterMode::Nearest,
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct GpuTexture {
    label: String,
    bind_group: wgpu::BindGroup,
}

struct PendingDraw {
    kind: PrimitiveKind,
    texture: Option<TextureHandle>,
}

/// wgpu implementation of the shader, mesh and texture seams.
///
/// Uniform writes land in a `UniformState`; each `draw_mesh` snapshots it
/// into the next per-draw slot. `end_frame` uploads the slots and replays
/// every pending draw in one render pass.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    uniforms: UniformState,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    fallback_texture: wgpu::BindGroup,
    meshes: BTreeMap<PrimitiveKind, GpuMesh>,
    textures: BTreeMap<TextureHandle, GpuTexture>,
    units: BTreeMap<u32, TextureHandle>,
    next_texture: u32,
    slots: Vec<DrawUniforms>,
    pending: Vec<PendingDraw>,
    depth_view: wgpu::TextureView,
    clear_color: wgpu::Color,
}

impl WgpuBackend {
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let draw_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("draw_uniform_buffer"),
            size: DRAW_SLOT_STRIDE * MAX_DRAWS_PER_FRAME as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<DrawUniforms>() as u64
                    ),
                },
                count: None,
            }],
        });

        let draw_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw_bind_group"),
            layout: &draw_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &draw_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniforms>() as u64),
                }),
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("phong_pipeline_layout"),
            bind_group_layouts: &[&draw_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("phong_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::PHONG_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("phong_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<MeshVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                        2 => Float32x2,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                // Open cone bottoms and the mug rim are seen from inside.
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let fallback_texture = Self::create_texture_bind_group(
            &device,
            &queue,
            &texture_layout,
            "fallback_white",
            1,
            1,
            vec![255, 255, 255, 255],
            SamplerSettings::TILED,
        );
        let depth_view = Self::create_depth_texture(&device, width, height);

        Self {
            device,
            queue,
            pipeline,
            uniforms: UniformState::new(),
            draw_buffer,
            draw_bind_group,
            texture_layout,
            fallback_texture,
            meshes: BTreeMap::new(),
            textures: BTreeMap::new(),
            units: BTreeMap::new(),
            next_texture: 1,
            slots: Vec::with_capacity(MAX_DRAWS_PER_FRAME),
            pending: Vec::with_capacity(MAX_DRAWS_PER_FRAME),
            depth_view,
            clear_color: wgpu::Color::BLACK,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn set_clear_color(&mut self, rgba: [f64; 4]) {
        self.clear_color = wgpu::Color {
            r: rgba[0],
            g: rgba[1],
            b: rgba[2],
            a: rgba[3],
        };
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.depth_view = Self::create_depth_texture(&self.device, width, height);
    }

    /// Drop draws left over from an unfinished frame.
    pub fn begin_frame(&mut self) {
        self.slots.clear();
        self.pending.clear();
    }

    /// Render every draw issued since `begin_frame` into `target`.
    pub fn end_frame(&mut self, target: &wgpu::TextureView) {
        if !self.slots.is_empty() {
            let mut bytes = vec![0u8; self.slots.len() * DRAW_SLOT_STRIDE as usize];
            for (i, slot) in self.slots.iter().enumerate() {
                let start = i * DRAW_SLOT_STRIDE as usize;
                let raw = bytemuck::bytes_of(slot);
                bytes[start..start + raw.len()].copy_from_slice(raw);
            }
            self.queue.write_buffer(&self.draw_buffer, 0, &bytes);
        }

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            for (i, draw) in self.pending.iter().enumerate() {
                let Some(mesh) = self.meshes.get(&draw.kind) else {
                    continue;
                };
                let texture = draw
                    .texture
                    .and_then(|h| self.textures.get(&h))
                    .map(|t| &t.bind_group)
                    .unwrap_or(&self.fallback_texture);
                let offset = (i as u64 * DRAW_SLOT_STRIDE) as u32;
                pass.set_bind_group(0, &self.draw_bind_group, &[offset]);
                pass.set_bind_group(1, texture, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        tracing::trace!(draws = self.pending.len(), "frame submitted");
        self.slots.clear();
        self.pending.clear();
    }

    /// Texture the sampler uniform currently selects, if the unit is bound.
    fn sampled_texture(&self) -> Option<TextureHandle> {
        let unit = self.uniforms.int(Uniform::ObjectTexture)?;
        let unit = u32::try_from(unit).ok()?;
        self.units.get(&unit).copied()
    }

    #[allow(clippy::too_many_arguments)]
    fn create_texture_bind_group(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        width: u32,
        height: u32,
        rgba: Vec<u8>,
        sampler: SamplerSettings,
    ) -> wgpu::BindGroup {
        let levels = if sampler.generate_mipmaps {
            mip_chain(width, height, rgba)
        } else {
            vec![(width, height, rgba)]
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: levels.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (level, (w, h, data)) in levels.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                data,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * w),
                    rows_per_image: Some(*h),
                },
                wgpu::Extent3d {
                    width: *w,
                    height: *h,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&Default::default());
        let mipmap_filter = if sampler.generate_mipmaps {
            wgpu::FilterMode::Linear
        } else {
            wgpu::FilterMode::Nearest
        };
        let gpu_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: address_mode(sampler.wrap_u),
            address_mode_v: address_mode(sampler.wrap_v),
            mag_filter: filter_mode(sampler.mag_filter),
            min_filter: filter_mode(sampler.min_filter),
            mipmap_filter,
            ..Default::default()
        });

        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&gpu_sampler),
                },
            ],
        })
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

impl ShaderProgram for WgpuBackend {
    fn set_mat4_value(&mut self, name: &str, value: Mat4) {
        self.uniforms.set_mat4_value(name, value);
    }

    fn set_vec4_value(&mut self, name: &str, value: Vec4) {
        self.uniforms.set_vec4_value(name, value);
    }

    fn set_vec3_value(&mut self, name: &str, value: Vec3) {
        self.uniforms.set_vec3_value(name, value);
    }

    fn set_vec2_value(&mut self, name: &str, value: Vec2) {
        self.uniforms.set_vec2_value(name, value);
    }

    fn set_float_value(&mut self, name: &str, value: f32) {
        self.uniforms.set_float_value(name, value);
    }

    fn set_int_value(&mut self, name: &str, value: i32) {
        self.uniforms.set_int_value(name, value);
    }

    fn set_sampler2d_value(&mut self, name: &str, unit: i32) {
        self.uniforms.set_sampler2d_value(name, unit);
    }
}

impl MeshLibrary for WgpuBackend {
    fn load_mesh(&mut self, kind: PrimitiveKind) {
        if self.meshes.contains_key(&kind) {
            return;
        }
        let data = MeshData::primitive(kind);
        let label = kind.name();
        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        tracing::debug!(%kind, triangles = data.triangle_count(), "mesh uploaded");
        self.meshes.insert(
            kind,
            GpuMesh {
                vertex_buffer,
                index_buffer,
                index_count: data.indices.len() as u32,
            },
        );
    }

    fn draw_mesh(&mut self, kind: PrimitiveKind) {
        if !self.meshes.contains_key(&kind) {
            tracing::warn!(%kind, "draw of unloaded mesh skipped");
            return;
        }
        if self.pending.len() >= MAX_DRAWS_PER_FRAME {
            tracing::warn!(%kind, max = MAX_DRAWS_PER_FRAME, "per-frame draw limit reached");
            return;
        }
        self.slots.push(DrawUniforms::pack(&self.uniforms));
        self.pending.push(PendingDraw {
            kind,
            texture: self.sampled_texture(),
        });
    }
}

impl TextureDevice for WgpuBackend {
    fn upload_texture(&mut self, upload: &TextureUpload<'_>) -> Result<TextureHandle, RenderError> {
        upload.validate()?;
        let rgba = expand_to_rgba(upload.format, upload.pixels);
        let bind_group = Self::create_texture_bind_group(
            &self.device,
            &self.queue,
            &self.texture_layout,
            upload.label,
            upload.width,
            upload.height,
            rgba,
            upload.sampler,
        );
        let handle = TextureHandle(self.next_texture);
        self.next_texture += 1;
        self.textures.insert(
            handle,
            GpuTexture {
                label: upload.label.to_string(),
                bind_group,
            },
        );
        Ok(handle)
    }

    fn bind_texture_unit(&mut self, unit: u32, texture: TextureHandle) {
        self.units.insert(unit, texture);
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        if let Some(removed) = self.textures.remove(&texture) {
            tracing::debug!(label = %removed.label, "texture released");
            self.units.retain(|_, bound| *bound != texture);
        }
    }
}
