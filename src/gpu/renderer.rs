//! wgpu implementation of [`SceneRenderer`].
//!
//! One forward pass per frame: opaque items first in list order, then
//! translucent items (hotspot markers, badges) back to front. Every draw
//! shares one shader; per-draw parameters live in a single uniform buffer
//! bound at a dynamic offset.

use std::num::NonZeroU64;

use glam::Vec3;
use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use super::dynamic_buffer::{align_to, pack_strided, DynamicBuffer};
use super::lighting::{shader_color, DrawUniform, LightingUniform};
use super::pipeline_helpers::{
    create_mesh_pipeline, filtering_sampler, linear_sampler, texture_2d,
    uniform_buffer, BlendMode,
};
use super::render_context::RenderContext;
use crate::camera::{Camera, CameraUniform};
use crate::config::Color;
use crate::renderer::{
    Frame, GeometryHandle, GpuResources, MaterialDesc, MaterialHandle,
    RenderError, ResourceHandle, RgbaImage, SceneRenderer, TextureHandle,
    Viewport,
};
use crate::scene::{DrawItem, DrawKind, MeshData};

const DRAW_UNIFORM_SIZE: usize = size_of::<DrawUniform>();

struct GpuGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct GpuTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Which vertex data a draw uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DrawSource {
    Geometry(GeometryHandle),
    /// The shared unit quad.
    Quad,
}

/// A draw item resolved against the material table, ready to encode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PlannedDraw {
    pub(crate) source: DrawSource,
    pub(crate) texture: Option<TextureHandle>,
    pub(crate) uniform: DrawUniform,
    pub(crate) translucent: bool,
    /// Squared distance from the eye to the item origin.
    pub(crate) depth: f32,
}

/// Resolve `items` into encodable draws: opaque first in list order, then
/// translucent ones farthest first.
///
/// # Errors
///
/// Returns [`RenderError::UnknownResource`] for a material `material_of`
/// does not know.
pub(crate) fn plan_draws(
    items: &[DrawItem],
    eye: Vec3,
    srgb_target: bool,
    material_of: impl Fn(MaterialHandle) -> Option<MaterialDesc>,
) -> Result<Vec<PlannedDraw>, RenderError> {
    let mut draws = Vec::with_capacity(items.len());
    for item in items {
        let depth = item.transform.w_axis.truncate().distance_squared(eye);
        let model = item.transform.to_cols_array_2d();
        let draw = match item.kind {
            DrawKind::Mesh { geometry, material } => {
                let desc = material_of(material).ok_or(
                    RenderError::UnknownResource(ResourceHandle::Material(material)),
                )?;
                let color = shader_color(desc.color, srgb_target);
                let emissive = shader_color(desc.emissive, srgb_target);
                let k = desc.emissive_intensity;
                PlannedDraw {
                    source: DrawSource::Geometry(geometry),
                    texture: None,
                    uniform: DrawUniform {
                        model,
                        color,
                        emissive: [emissive[0] * k, emissive[1] * k, emissive[2] * k, 0.0],
                        params: [desc.opacity, 1.0, 0.0, 0.0],
                    },
                    translucent: desc.opacity < 1.0 || desc.color.a < 1.0,
                    depth,
                }
            }
            DrawKind::Sprite { texture } => PlannedDraw {
                source: DrawSource::Quad,
                texture: Some(texture),
                uniform: DrawUniform {
                    model,
                    color: Color::WHITE.to_array(),
                    emissive: [0.0; 4],
                    params: [1.0, 0.0, 0.0, 0.0],
                },
                translucent: true,
                depth,
            },
        };
        draws.push(draw);
    }

    // stable: opaque keep list order
    draws.sort_by(|a, b| match (a.translucent, b.translucent) {
        (false, false) => std::cmp::Ordering::Equal,
        (false, true) => std::cmp::Ordering::Less,
        (true, false) => std::cmp::Ordering::Greater,
        (true, true) => b.depth.total_cmp(&a.depth),
    });
    Ok(draws)
}

/// Forward renderer presenting to a [`RenderContext`] surface.
pub struct WgpuRenderer {
    context: RenderContext,
    opaque_pipeline: wgpu::RenderPipeline,
    translucent_pipeline: wgpu::RenderPipeline,

    camera_buffer: wgpu::Buffer,
    lighting_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,

    draw_layout: wgpu::BindGroupLayout,
    draw_buffer: DynamicBuffer,
    draw_bind_group: wgpu::BindGroup,
    draw_stride: usize,

    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white_texture: GpuTexture,
    quad: GpuGeometry,

    geometries: FxHashMap<u32, GpuGeometry>,
    materials: FxHashMap<u32, MaterialDesc>,
    textures: FxHashMap<u32, GpuTexture>,
    next_id: u32,
}

impl WgpuRenderer {
    /// Build pipelines and shared resources on `context`.
    pub fn new(context: RenderContext) -> Self {
        let device = &context.device;

        let scene_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Scene Layout"),
                entries: &[uniform_buffer(0, false), uniform_buffer(1, false)],
            });
        let draw_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Draw Layout"),
                entries: &[uniform_buffer(0, true)],
            });
        let texture_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Texture Layout"),
                entries: &[texture_2d(0), filtering_sampler(1)],
            });

        let camera_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform"),
                contents: bytemuck::bytes_of(&CameraUniform::new()),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let lighting_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Lighting Uniform"),
                contents: bytemuck::bytes_of(&LightingUniform::from(
                    &crate::renderer::Lighting::default(),
                )),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lighting_buffer.as_entire_binding(),
                },
            ],
        });

        let alignment = device.limits().min_uniform_buffer_offset_alignment as usize;
        let draw_stride = align_to(DRAW_UNIFORM_SIZE, alignment);
        let draw_buffer = DynamicBuffer::new(
            device,
            "Draw Uniforms",
            draw_stride * 64,
            wgpu::BufferUsages::UNIFORM,
        );
        let draw_bind_group = create_draw_bind_group(device, &draw_layout, &draw_buffer);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!("../../assets/shaders/mesh.wgsl").into(),
            ),
        });
        let layouts = [&scene_layout, &draw_layout, &texture_layout];
        let format = context.format();
        let opaque_pipeline = create_mesh_pipeline(
            device,
            "Opaque Mesh",
            &shader,
            format,
            BlendMode::Opaque,
            &layouts,
        );
        let translucent_pipeline = create_mesh_pipeline(
            device,
            "Translucent Mesh",
            &shader,
            format,
            BlendMode::Translucent,
            &layouts,
        );

        let sampler = linear_sampler(device, "Scene Sampler");
        let white_texture = upload_texture(
            device,
            &context.queue,
            &texture_layout,
            &sampler,
            &RgbaImage {
                width: 1,
                height: 1,
                pixels: vec![255; 4],
            },
        );
        let quad = upload_geometry(device, &MeshData::quad());
        log::info!("renderer ready: draw stride {draw_stride}");

        Self {
            context,
            opaque_pipeline,
            translucent_pipeline,
            camera_buffer,
            lighting_buffer,
            scene_bind_group,
            draw_layout,
            draw_buffer,
            draw_bind_group,
            draw_stride,
            texture_layout,
            sampler,
            white_texture,
            quad,
            geometries: FxHashMap::default(),
            materials: FxHashMap::default(),
            textures: FxHashMap::default(),
            next_id: 1,
        }
    }

    /// The device, queue and surface.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Number of live geometries, materials and textures.
    pub fn resource_count(&self) -> usize {
        self.geometries.len() + self.materials.len() + self.textures.len()
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    fn check_resources(&self, draws: &[PlannedDraw]) -> Result<(), RenderError> {
        for draw in draws {
            if let DrawSource::Geometry(handle) = draw.source {
                if !self.geometries.contains_key(&handle.0) {
                    return Err(RenderError::UnknownResource(ResourceHandle::Geometry(
                        handle,
                    )));
                }
            }
            if let Some(handle) = draw.texture {
                if !self.textures.contains_key(&handle.0) {
                    return Err(RenderError::UnknownResource(ResourceHandle::Texture(
                        handle,
                    )));
                }
            }
        }
        Ok(())
    }

    fn upload_uniforms(&mut self, camera: &Camera, frame: &Frame<'_>, draws: &[PlannedDraw]) {
        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(camera);
        let queue = &self.context.queue;
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&camera_uniform));
        queue.write_buffer(
            &self.lighting_buffer,
            0,
            bytemuck::bytes_of(&LightingUniform::from(&frame.lighting)),
        );

        let uniforms: Vec<DrawUniform> = draws.iter().map(|d| d.uniform).collect();
        let bytes = pack_strided(&uniforms, self.draw_stride);
        if self
            .draw_buffer
            .write_bytes(&self.context.device, &self.context.queue, &bytes)
        {
            self.draw_bind_group =
                create_draw_bind_group(&self.context.device, &self.draw_layout, &self.draw_buffer);
        }
    }

    fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        clear: Color,
        draws: &[PlannedDraw],
    ) {
        let c = shader_color(clear, self.context.format().is_srgb());
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: f64::from(c[0]),
                        g: f64::from(c[1]),
                        b: f64::from(c[2]),
                        a: f64::from(c[3]),
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: self.context.depth_view(),
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_bind_group(0, &self.scene_bind_group, &[]);
        let mut translucent = None;
        for (i, draw) in draws.iter().enumerate() {
            if translucent != Some(draw.translucent) {
                pass.set_pipeline(if draw.translucent {
                    &self.translucent_pipeline
                } else {
                    &self.opaque_pipeline
                });
                translucent = Some(draw.translucent);
            }
            let geometry = match draw.source {
                DrawSource::Quad => Some(&self.quad),
                DrawSource::Geometry(handle) => self.geometries.get(&handle.0),
            };
            let Some(geometry) = geometry.filter(|g| g.index_count > 0) else {
                continue;
            };
            let texture = draw
                .texture
                .and_then(|t| self.textures.get(&t.0))
                .unwrap_or(&self.white_texture);

            pass.set_bind_group(1, &self.draw_bind_group, &[(i * self.draw_stride) as u32]);
            pass.set_bind_group(2, &texture.bind_group, &[]);
            pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
            pass.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..geometry.index_count, 0, 0..1);
        }
    }
}

fn create_draw_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &DynamicBuffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Draw Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: buffer.buffer(),
                offset: 0,
                size: NonZeroU64::new(DRAW_UNIFORM_SIZE as u64),
            }),
        }],
    })
}

fn upload_geometry(device: &wgpu::Device, mesh: &MeshData) -> GpuGeometry {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Mesh Vertices"),
        contents: bytemuck::cast_slice(&mesh.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Mesh Indices"),
        contents: bytemuck::cast_slice(&mesh.indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    GpuGeometry {
        vertex_buffer,
        index_buffer,
        index_count: mesh.indices.len() as u32,
    }
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    image: &RgbaImage,
) -> GpuTexture {
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some("Image Texture"),
            size: wgpu::Extent3d {
                width: image.width.max(1),
                height: image.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        &image.pixels,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Image Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });
    GpuTexture {
        _texture: texture,
        bind_group,
    }
}

impl GpuResources for WgpuRenderer {
    fn create_geometry(&mut self, mesh: &MeshData) -> GeometryHandle {
        let id = self.allocate_id();
        let geometry = upload_geometry(&self.context.device, mesh);
        let _ = self.geometries.insert(id, geometry);
        GeometryHandle(id)
    }

    fn create_material(&mut self, desc: &MaterialDesc) -> MaterialHandle {
        let id = self.allocate_id();
        let _ = self.materials.insert(id, *desc);
        MaterialHandle(id)
    }

    fn create_texture(&mut self, image: &RgbaImage) -> TextureHandle {
        let id = self.allocate_id();
        let texture = upload_texture(
            &self.context.device,
            &self.context.queue,
            &self.texture_layout,
            &self.sampler,
            image,
        );
        let _ = self.textures.insert(id, texture);
        TextureHandle(id)
    }

    fn release(&mut self, handle: ResourceHandle) {
        let released = match handle {
            ResourceHandle::Geometry(h) => self.geometries.remove(&h.0).is_some(),
            ResourceHandle::Material(h) => self.materials.remove(&h.0).is_some(),
            ResourceHandle::Texture(h) => self.textures.remove(&h.0).is_some(),
        };
        if !released {
            log::trace!("release of unknown {handle:?} ignored");
        }
    }
}

impl SceneRenderer for WgpuRenderer {
    fn resize(&mut self, viewport: Viewport) {
        if self.context.resize(viewport) {
            log::debug!("surface and depth target now {}x{}", viewport.width, viewport.height);
        }
    }

    fn render(&mut self, camera: &Camera, frame: &Frame<'_>) -> Result<(), RenderError> {
        let srgb = self.context.format().is_srgb();
        let draws = plan_draws(frame.items, camera.eye, srgb, |m| {
            self.materials.get(&m.0).copied()
        })?;
        self.check_resources(&draws)?;

        let output = self.context.acquire_frame()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.upload_uniforms(camera, frame, &draws);
        self.context.submit_with("Scene Encoder", |encoder| {
            self.encode(encoder, &view, frame.clear_color, &draws);
        });
        output.present();
        Ok(())
    }
}
