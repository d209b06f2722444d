use anyhow::{Context, Result};
use glow::HasContext;
use log::{debug, warn};
use std::path::Path;

const VERT_PATH: &str = "assets/shaders/ui.vert.glsl";
const FRAG_PATH: &str = "assets/shaders/ui.frag.glsl";

const BUILTIN_VERT: &str = include_str!("../../assets/shaders/ui.vert.glsl");
const BUILTIN_FRAG: &str = include_str!("../../assets/shaders/ui.frag.glsl");

pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    /// Reads the shaders next to the working directory, falling back to the
    /// copies compiled into the binary.
    pub fn load() -> Self {
        Self {
            vertex: read_or_builtin(VERT_PATH, BUILTIN_VERT),
            fragment: read_or_builtin(FRAG_PATH, BUILTIN_FRAG),
        }
    }
}

fn read_or_builtin(path: &str, builtin: &str) -> String {
    let path = Path::new(path);
    if !path.exists() {
        debug!("{} not found, using built-in shader", path.display());
        return builtin.to_string();
    }
    match std::fs::read_to_string(path) {
        Ok(src) => src,
        Err(e) => {
            warn!("Failed to read {}: {}, using built-in shader", path.display(), e);
            builtin.to_string()
        }
    }
}

fn compile_shader(gl: &glow::Context, shader_type: u32, source: &str) -> Result<glow::Shader> {
    unsafe {
        let shader = gl
            .create_shader(shader_type)
            .map_err(|e| anyhow::anyhow!("Failed to create shader: {}", e))?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let info = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            anyhow::bail!("Shader compilation failed: {}", info);
        }

        Ok(shader)
    }
}

fn link_program(
    gl: &glow::Context,
    vertex_shader: glow::Shader,
    fragment_shader: glow::Shader,
) -> Result<glow::Program> {
    unsafe {
        let program = gl
            .create_program()
            .map_err(|e| anyhow::anyhow!("Failed to create program: {}", e))?;
        gl.attach_shader(program, vertex_shader);
        gl.attach_shader(program, fragment_shader);
        gl.link_program(program);

        let linked = gl.get_program_link_status(program);
        gl.detach_shader(program, vertex_shader);
        gl.detach_shader(program, fragment_shader);
        gl.delete_shader(vertex_shader);
        gl.delete_shader(fragment_shader);

        if !linked {
            let info = gl.get_program_info_log(program);
            gl.delete_program(program);
            anyhow::bail!("Program linking failed: {}", info);
        }

        Ok(program)
    }
}

pub fn load_shader_program(gl: &glow::Context, sources: &ShaderSources) -> Result<glow::Program> {
    let vertex_shader =
        compile_shader(gl, glow::VERTEX_SHADER, &sources.vertex).context("vertex shader")?;
    let fragment_shader = match compile_shader(gl, glow::FRAGMENT_SHADER, &sources.fragment) {
        Ok(shader) => shader,
        Err(e) => {
            unsafe { gl.delete_shader(vertex_shader) };
            return Err(e.context("fragment shader"));
        }
    };
    link_program(gl, vertex_shader, fragment_shader)
}
