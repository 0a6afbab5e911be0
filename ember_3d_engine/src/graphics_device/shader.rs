/// Shader stage and uniform types

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::graphics_device::{ProgramHandle, ShaderStageHandle};

/// Shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Lowercase stage name, as printed in diagnostics
    pub fn label(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

/// Result of compiling one stage
#[derive(Debug, Clone, PartialEq)]
pub struct StageCompilation {
    pub handle: ShaderStageHandle,
    /// Backend info log, present only when compilation failed
    pub log: Option<String>,
}

/// Result of linking a program
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramLink {
    pub handle: ProgramHandle,
    /// Backend info log, present only when linking failed
    pub log: Option<String>,
}

/// Value written to a uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        UniformValue::Int(value)
    }
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        UniformValue::Float(value)
    }
}

impl From<Vec2> for UniformValue {
    fn from(value: Vec2) -> Self {
        UniformValue::Vec2(value)
    }
}

impl From<Vec3> for UniformValue {
    fn from(value: Vec3) -> Self {
        UniformValue::Vec3(value)
    }
}

impl From<Vec4> for UniformValue {
    fn from(value: Vec4) -> Self {
        UniformValue::Vec4(value)
    }
}

impl From<Mat4> for UniformValue {
    fn from(value: Mat4) -> Self {
        UniformValue::Mat4(value)
    }
}
