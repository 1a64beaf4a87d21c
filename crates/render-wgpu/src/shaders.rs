/// WGSL shader for the donuts and the text block.
///
/// Shading is matcap-style: the view-space normal picks a point on a
/// procedural sphere gradient, so lighting turns with the camera.
pub const SCENE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) view_normal: vec3<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.view_normal = normalize((uniforms.view * vec4<f32>(world_normal, 0.0)).xyz);
    out.color = instance.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.view_normal);
    let uv = n.xy * 0.5 + vec2<f32>(0.5, 0.5);
    let key = smoothstep(0.2, 1.0, uv.y * 0.7 + uv.x * 0.3);
    let rim = pow(1.0 - max(n.z, 0.0), 3.0);
    let spec = pow(max(dot(n, normalize(vec3<f32>(-0.4, 0.6, 0.7))), 0.0), 24.0);
    let base = in.color.rgb * mix(0.25, 1.0, key);
    let lit = base + rim * 0.25 + vec3<f32>(spec * 0.6);
    return vec4<f32>(lit, in.color.a);
}
"#;
