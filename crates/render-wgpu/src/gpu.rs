use crate::camera::OrbitCamera;
use crate::mesh::{self, TorusShape, Vertex};
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use donutspace_kernel::Scene;
use glam::{Mat4, Quat, Vec3};
use wgpu::util::DeviceExt;

const DONUT_COLOR: [f32; 4] = [0.85, 0.55, 0.4, 1.0];
const TEXT_COLOR: [f32; 4] = [0.95, 0.93, 0.88, 1.0];
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.04,
    a: 1.0,
};

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
}

impl InstanceData {
    fn new(model: Mat4, color: [f32; 4]) -> Self {
        let cols = model.to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color,
        }
    }
}

/// Per-frame instance list: the text block first, then the donuts.
struct Instances {
    data: Vec<InstanceData>,
    text: u32,
}

impl Instances {
    fn from_scene(scene: &Scene, max_donuts: usize) -> Self {
        let mut data = Vec::with_capacity(scene.entity_count().min(max_donuts) + 1);
        let mut text = 0;
        if let (Some(label), Some(anchor)) = (scene.text(), scene.anchor()) {
            let e = label.extent;
            let size = Vec3::new(e.width, e.height, e.depth).max(Vec3::splat(1e-3));
            let model =
                Mat4::from_scale_rotation_translation(size, Quat::IDENTITY, anchor.position);
            data.push(InstanceData::new(model, TEXT_COLOR));
            text = 1;
        }
        data.extend(
            scene
                .entities()
                .values()
                .take(max_donuts)
                .map(|d| InstanceData::new(d.transform().model_matrix(), DONUT_COLOR)),
        );
        Self { data, text }
    }

    fn donuts(&self) -> std::ops::Range<u32> {
        self.text..self.data.len() as u32
    }
}

struct MeshBuffers {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn upload(
        device: &wgpu::Device,
        name: &str,
        (vertices, indices): (Vec<Vertex>, Vec<u16>),
    ) -> Self {
        let vertex_label = format!("{name}_vertex_buffer");
        let index_label = format!("{name}_index_buffer");
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(vertex_label.as_str()),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(index_label.as_str()),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertices: vertex_buffer,
            indices: index_buffer,
            index_count: indices.len() as u32,
        }
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>, instances: std::ops::Range<u32>) {
        if instances.is_empty() {
            return;
        }
        pass.set_vertex_buffer(0, self.vertices.slice(..));
        pass.set_index_buffer(self.indices.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..self.index_count, 0, instances);
    }
}

/// wgpu-based scene renderer.
pub struct WgpuRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    torus: MeshBuffers,
    text_block: MeshBuffers,
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        max_donuts: usize,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                view: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let torus = MeshBuffers::upload(device, "torus", mesh::torus_mesh(TorusShape::default()));
        let text_block = MeshBuffers::upload(device, "text_block", mesh::cube_mesh());

        // One slot for the text block, the rest for donuts.
        let max_instances = max_donuts.saturating_add(1).min(u32::MAX as usize) as u32;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (max_instances as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);
        tracing::debug!("wgpu renderer ready: {surface_format:?}, {max_instances} instance slots");

        Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            torus,
            text_block,
            instance_buffer,
            max_instances,
            depth_texture,
            surface_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Render one frame: the text block and the donuts.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &OrbitCamera,
        scene: &Scene,
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: camera.view_projection().to_cols_array_2d(),
                view: camera.view_matrix().to_cols_array_2d(),
            }),
        );

        let max_donuts = self.max_instances.saturating_sub(1) as usize;
        let instances = Instances::from_scene(scene, max_donuts);
        if !instances.data.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances.data));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            self.text_block.draw(&mut pass, 0..instances.text);
            self.torus.draw(&mut pass, instances.donuts());
        }

        queue.submit(std::iter::once(encoder.finish()));
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
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use donutspace_assets::FontAsset;
    use donutspace_common::ThreadRandom;

    const FONT: &str = r#"{
        "familyName": "Mono",
        "resolution": 1000,
        "boundingBox": { "xMin": 0, "xMax": 600, "yMin": -200, "yMax": 800 },
        "glyphs": { "?": { "ha": 600 } }
    }"#;

    #[test]
    fn empty_scene_has_no_instances() {
        let instances = Instances::from_scene(&Scene::default(), 100);
        assert!(instances.data.is_empty());
        assert_eq!(instances.text, 0);
        assert!(instances.donuts().is_empty());
    }

    #[test]
    fn text_block_comes_first() {
        let font = FontAsset::from_json("mono.json", FONT).unwrap();
        let mut scene = Scene::default();
        scene.populate(&font, &mut ThreadRandom::new());

        let instances = Instances::from_scene(&scene, 1000);
        assert_eq!(instances.text, 1);
        assert_eq!(instances.donuts(), 1..101);
        assert_eq!(instances.data[0].color, TEXT_COLOR);
        // Centered block: translation column is the anchor.
        assert_eq!(instances.data[0].model_3, [0.0, 0.0, 0.0, 1.0]);
        assert!(instances.data[1..].iter().all(|i| i.color == DONUT_COLOR));
    }

    #[test]
    fn donuts_are_capped() {
        let font = FontAsset::from_json("mono.json", FONT).unwrap();
        let mut scene = Scene::default();
        scene.populate(&font, &mut ThreadRandom::new());

        let instances = Instances::from_scene(&scene, 10);
        assert_eq!(instances.data.len(), 11);
        assert_eq!(instances.donuts(), 1..11);
    }
}
