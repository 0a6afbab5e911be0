/// Unit tests for render_context.rs

use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::error::Error;
use crate::graphics_device::{
    mock_graphics_device::MockGraphicsDevice, ClearFlags, FramebufferBinding,
    SharedGraphicsDevice, UniformValue,
};
use crate::render::RenderContext;
use crate::resource::{Color, RenderTarget, RenderTargetDesc, ShaderProgram, Texture};

const VS: &str = "#version 330 core\nuniform mat4 mvp;\nvoid main() {}\n";
const FS: &str = "#version 330 core\nuniform sampler2D first;\nuniform sampler2D second;\nuniform float time;\nvoid main() {}\n";

fn create_mock_device() -> (Arc<Mutex<MockGraphicsDevice>>, SharedGraphicsDevice) {
    let mock = Arc::new(Mutex::new(MockGraphicsDevice::new()));
    let shared: SharedGraphicsDevice = mock.clone();
    (mock, shared)
}

fn create_context(device: &SharedGraphicsDevice) -> RenderContext {
    RenderContext::new(device.clone(), &Config::default()).unwrap()
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

#[test]
fn test_slot_capacity_is_device_units_capped_by_config() {
    let mock = Arc::new(Mutex::new(MockGraphicsDevice::new().with_max_units(8)));
    let device: SharedGraphicsDevice = mock.clone();

    let ctx = RenderContext::new(device.clone(), &Config::default()).unwrap();
    assert_eq!(ctx.texture_slot_capacity(), 8);

    let ctx = RenderContext::new(device, &Config::default().with_max_texture_slots(4)).unwrap();
    assert_eq!(ctx.texture_slot_capacity(), 4);
}

#[test]
fn test_new_context_has_nothing_bound() {
    let (_mock, device) = create_mock_device();
    let ctx = create_context(&device);

    assert_eq!(ctx.active_program(), None);
    assert_eq!(ctx.bound_target(), None);
    assert!(!ctx.depth_test_enabled());
    assert_eq!(ctx.next_texture_slot(), 0);
}

// ============================================================================
// PROGRAMS AND UNIFORMS
// ============================================================================

#[test]
fn test_activate_uses_program() {
    let (mock, device) = create_mock_device();
    let mut ctx = create_context(&device);
    let program = ShaderProgram::compile(&device, "basic", VS, FS).unwrap();

    ctx.activate(&program).unwrap();

    assert_eq!(ctx.active_program(), Some(program.handle()));
    assert_eq!(mock.lock().unwrap().current_program, Some(program.handle()));
}

#[test]
fn test_set_uniform_writes_value() {
    let (mock, device) = create_mock_device();
    let mut ctx = create_context(&device);
    let program = ShaderProgram::compile(&device, "basic", VS, FS).unwrap();

    ctx.activate(&program).unwrap();
    ctx.set_uniform(&program, "time", 1.5f32).unwrap();
    ctx.set_uniform(&program, "mvp", glam::Mat4::IDENTITY).unwrap();

    let mock = mock.lock().unwrap();
    assert_eq!(mock.uniform_value(program.handle(), "time"), Some(UniformValue::Float(1.5)));
    assert_eq!(mock.uniform_value(program.handle(), "mvp"), Some(UniformValue::Mat4(glam::Mat4::IDENTITY)));
}

#[test]
fn test_unknown_uniform_is_noop() {
    let (mock, device) = create_mock_device();
    let mut ctx = create_context(&device);
    let program = ShaderProgram::compile(&device, "basic", VS, FS).unwrap();

    ctx.activate(&program).unwrap();
    assert!(ctx.set_uniform(&program, "doesNotExist", 3i32).is_ok());
    assert_eq!(mock.lock().unwrap().count_calls("set_uniform"), 0);
}

// ============================================================================
// TEXTURE SLOTS
// ============================================================================

#[test]
fn test_slots_restart_when_switching_programs() {
    let (mock, device) = create_mock_device();
    let mut ctx = create_context(&device);
    let first = ShaderProgram::compile(&device, "first", VS, FS).unwrap();
    let second = ShaderProgram::compile(&device, "second", VS, FS).unwrap();
    let red = Texture::blank(&device).unwrap();
    let green = Texture::blank(&device).unwrap();

    ctx.activate(&first).unwrap();
    assert_eq!(ctx.bind_texture(&first, "first", &red).unwrap(), 0);
    assert_eq!(ctx.bind_texture(&first, "second", &green).unwrap(), 1);

    ctx.activate(&second).unwrap();
    assert_eq!(ctx.bind_texture(&second, "first", &green).unwrap(), 0);

    let mock = mock.lock().unwrap();
    assert_eq!(mock.uniform_value(first.handle(), "second"), Some(UniformValue::Int(1)));
    assert_eq!(mock.uniform_value(second.handle(), "first"), Some(UniformValue::Int(0)));
    assert_eq!(mock.bound_textures[&0], green.handle().unwrap());
}

#[test]
fn test_clear_textures_restarts_at_zero() {
    let (mock, device) = create_mock_device();
    let mut ctx = create_context(&device);
    let texture = Texture::blank(&device).unwrap();

    assert_eq!(ctx.activate_texture(&texture).unwrap(), 0);
    assert_eq!(ctx.activate_texture(&texture).unwrap(), 1);
    assert_eq!(mock.lock().unwrap().active_unit, 1);

    ctx.clear_textures().unwrap();
    assert_eq!(ctx.next_texture_slot(), 0);
    assert_eq!(mock.lock().unwrap().active_unit, 0);
    assert_eq!(mock.lock().unwrap().count_calls("select_texture_unit(0)"), 1);
    assert_eq!(ctx.activate_texture(&texture).unwrap(), 0);
}

#[test]
fn test_slot_exhaustion_is_error() {
    let mock = Arc::new(Mutex::new(MockGraphicsDevice::new().with_max_units(2)));
    let device: SharedGraphicsDevice = mock.clone();
    let mut ctx = create_context(&device);
    let texture = Texture::blank(&device).unwrap();

    ctx.activate_texture(&texture).unwrap();
    ctx.activate_texture(&texture).unwrap();
    let result = ctx.activate_texture(&texture);

    assert!(matches!(result, Err(Error::InvalidResource(_))));
    assert_eq!(mock.lock().unwrap().count_calls("bind_texture"), 2);
}

#[test]
fn test_unuploaded_texture_cannot_be_bound() {
    let (_mock, device) = create_mock_device();
    let mut ctx = create_context(&device);

    let result = ctx.activate_texture(&Texture::new());
    assert!(matches!(result, Err(Error::InvalidResource(_))));
    assert_eq!(ctx.next_texture_slot(), 0);
}

// ============================================================================
// RENDER TARGETS
// ============================================================================

#[test]
fn test_enable_then_disable_restores_default() {
    let (mock, device) = create_mock_device();
    let mut ctx = create_context(&device);
    let target = RenderTarget::create(&device, &RenderTargetDesc::new(320, 240)).unwrap();

    ctx.enable_target(&target).unwrap();
    assert_eq!(ctx.bound_target(), Some(target.handle()));
    assert!(ctx.depth_test_enabled());
    assert_eq!(mock.lock().unwrap().draw_framebuffer, Some(target.handle()));

    ctx.disable_to_default().unwrap();
    assert_eq!(ctx.bound_target(), None);
    assert!(!ctx.depth_test_enabled());

    let mock = mock.lock().unwrap();
    assert_eq!(mock.draw_framebuffer, None);
    assert!(!mock.depth_test);
}

#[test]
fn test_enable_read_write_target_binds_both() {
    let (mock, device) = create_mock_device();
    let mut ctx = create_context(&device);
    let desc = RenderTargetDesc { read: true, ..RenderTargetDesc::new(64, 64) };
    let target = RenderTarget::create(&device, &desc).unwrap();
    assert_eq!(target.binding(), FramebufferBinding::ReadDraw);

    ctx.enable_target(&target).unwrap();

    let mock = mock.lock().unwrap();
    assert_eq!(mock.read_framebuffer, Some(target.handle()));
    assert_eq!(mock.draw_framebuffer, Some(target.handle()));
}

// ============================================================================
// FRAME OPERATIONS
// ============================================================================

#[test]
fn test_clear_clears_all_buffers() {
    let (mock, device) = create_mock_device();
    let mut ctx = create_context(&device);

    ctx.clear(Color::rgb(0.1, 0.2, 0.3)).unwrap();

    assert_eq!(mock.lock().unwrap().clears, vec![([0.1, 0.2, 0.3, 1.0], ClearFlags::all())]);
}

#[test]
fn test_set_viewport() {
    let (mock, device) = create_mock_device();
    let mut ctx = create_context(&device);

    ctx.set_viewport(0, 0, 1280, 720).unwrap();
    assert_eq!(mock.lock().unwrap().viewport, (0, 0, 1280, 720));
}
