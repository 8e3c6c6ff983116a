/// WGSL Phong program: three point lights, optional texture, per-draw uniforms.
///
/// Group 0 holds one `DrawUniforms` slot selected by dynamic offset.
/// Group 1 holds the texture sampled when `flags.x != 0`.
pub const PHONG_SHADER: &str = r#"
struct Light {
    position: vec4<f32>,
    ambient_color: vec4<f32>,
    diffuse_color: vec4<f32>,
    // xyz = color, w = intensity
    specular: vec4<f32>,
};

struct DrawUniforms {
    model: mat4x4<f32>,
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    view_position: vec4<f32>,
    object_color: vec4<f32>,
    uv_scale: vec4<f32>,
    // x = use texture, y = use lighting
    flags: vec4<i32>,
    // xyz = color, w = strength
    material_ambient: vec4<f32>,
    material_diffuse: vec4<f32>,
    // xyz = color, w = shininess
    material_specular: vec4<f32>,
    lights: array<Light, 3>,
};

@group(0) @binding(0)
var<uniform> u: DrawUniforms;

@group(1) @binding(0)
var object_texture: texture_2d<f32>;
@group(1) @binding(1)
var object_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world = u.model * vec4<f32>(vertex.position, 1.0);
    // Upper 3x3 of the model matrix; non-uniform scale is corrected by renormalising.
    let normal_matrix = mat3x3<f32>(u.model[0].xyz, u.model[1].xyz, u.model[2].xyz);

    var out: VertexOutput;
    out.clip_position = u.projection * u.view * world;
    out.world_position = world.xyz;
    out.world_normal = normal_matrix * vertex.normal;
    out.uv = vertex.uv;
    return out;
}

fn light_contribution(
    light: Light,
    normal: vec3<f32>,
    position: vec3<f32>,
    view_dir: vec3<f32>,
) -> vec3<f32> {
    let ambient = u.material_ambient.w * u.material_ambient.xyz * light.ambient_color.xyz;

    let light_dir = normalize(light.position.xyz - position);
    let impact = max(dot(normal, light_dir), 0.0);
    let diffuse = impact * u.material_diffuse.xyz * light.diffuse_color.xyz;

    let reflected = reflect(-light_dir, normal);
    let highlight = pow(max(dot(view_dir, reflected), 0.0), max(u.material_specular.w, 1.0));
    let specular = light.specular.w * highlight * u.material_specular.xyz * light.specular.xyz;

    return ambient + diffuse + specular;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    var base = u.object_color;
    let texel = textureSample(object_texture, object_sampler, in.uv * u.uv_scale.xy);
    if (u.flags.x != 0) {
        base = texel;
    }

    if (u.flags.y == 0) {
        return base;
    }

    let normal = normalize(in.world_normal);
    let view_dir = normalize(u.view_position.xyz - in.world_position);
    var phong = vec3<f32>(0.0);
    for (var i = 0u; i < 3u; i = i + 1u) {
        phong += light_contribution(u.lights[i], normal, in.world_position, view_dir);
    }
    return vec4<f32>(phong * base.rgb, base.a);
}
"#;
