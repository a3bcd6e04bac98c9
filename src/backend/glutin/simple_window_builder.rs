/*!

A utility to simplify context creation with glutin.

[`SimpleWindowBuilder`] targets the tutorial programs: one window, one OpenGL core context, no
special framebuffer requirements. Everything it does is driven by [`WindowOptions`], so that
no program has to re-derive the window setup.

*/
use std::num::NonZeroU32;

use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentContext};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasRawWindowHandle;
use winit::event_loop::EventLoopWindowTarget;
use winit::window::{Window, WindowBuilder};

use super::{Display, DisplayCreationError};

/// Everything needed to open a tutorial window.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowOptions {
    /// Title of the window.
    pub title: String,
    /// Initial width of the window, in physical pixels.
    pub width: u32,
    /// Initial height of the window, in physical pixels.
    pub height: u32,
    /// Whether the window can be resized by the user.
    pub resizable: bool,
    /// Wait for the vertical blank before presenting.
    pub vsync: bool,
    /// Requested OpenGL core version, as `(major, minor)`.
    pub gl_version: (u8, u8),
}

impl Default for WindowOptions {
    fn default() -> Self {
        WindowOptions {
            title: "LearnOpenGL".to_owned(),
            width: 800,
            height: 600,
            resizable: true,
            vsync: true,
            gl_version: (3, 3),
        }
    }
}

impl WindowOptions {
    /// Default options with a different title.
    pub fn with_title(title: &str) -> Self {
        WindowOptions {
            title: title.to_owned(),
            ..Default::default()
        }
    }
}

/// Builder to simplify learngl/glutin context creation.
pub struct SimpleWindowBuilder {
    options: WindowOptions,
    config_template_builder: ConfigTemplateBuilder,
}

impl Default for SimpleWindowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleWindowBuilder {
    /// Initializes a new builder with default values.
    pub fn new() -> Self {
        Self::from_options(WindowOptions::default())
    }

    /// Initializes a new builder from a set of options.
    pub fn from_options(options: WindowOptions) -> Self {
        Self {
            options,
            config_template_builder: ConfigTemplateBuilder::new(),
        }
    }

    /// Requests the window to be of a certain size.
    /// If this is not set, the builder defaults to 800x600.
    pub fn with_inner_size(mut self, width: u32, height: u32) -> Self {
        self.options.width = width;
        self.options.height = height;
        self
    }

    /// Set the initial title for the window.
    pub fn with_title(mut self, title: &str) -> Self {
        self.options.title = title.to_owned();
        self
    }

    /// Replace the used vsync configuration
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.options.vsync = vsync;
        self
    }

    /// Replace the used [`ConfigTemplateBuilder`],
    /// Can be used to configure among other things buffer sizes and number of samples for the window.
    pub fn with_config_template_builder(mut self, config_template_builder: ConfigTemplateBuilder) -> Self {
        self.config_template_builder = config_template_builder;
        self
    }

    /// Returns the options the window will be built with.
    pub fn options(&self) -> &WindowOptions {
        &self.options
    }

    /// Create a new [`Window`] and [`Display`]
    /// with the specified parameters.
    pub fn build<T>(self, event_loop: &EventLoopWindowTarget<T>)
        -> Result<(Window, Display), DisplayCreationError>
    {
        let SimpleWindowBuilder { options, config_template_builder } = self;

        // First we start by opening a new Window
        let window_builder = WindowBuilder::new()
            .with_title(options.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(options.width, options.height))
            .with_resizable(options.resizable);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(event_loop, config_template_builder, |mut configs| {
                // the picker must return a `Config`; glutin-winit reports an empty match as an
                // error before calling it, so the iterator always has a first element
                configs.next().expect("glutin-winit called the config picker with no configs")
            })
            .map_err(DisplayCreationError::WindowCreationError)?;
        let window = window.ok_or_else(|| {
            DisplayCreationError::WindowCreationError("no window was created".into())
        })?;

        let not_current_context = create_context(&window, &gl_config, options.gl_version)?;

        // Now we get the window size to use as the initial size of the Surface
        let (width, height): (u32, u32) = window.inner_size().into();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            window.raw_window_handle(),
            NonZeroU32::new(width).unwrap_or(NonZeroU32::MIN),
            NonZeroU32::new(height).unwrap_or(NonZeroU32::MIN),
        );

        // Finally we can create a Surface, use it to make a PossiblyCurrentContext and create the display
        let surface = unsafe { gl_config.display().create_window_surface(&gl_config, &attrs)? };
        let current_context = not_current_context.make_current(&surface)?;

        let swap_interval = if options.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(err) = surface.set_swap_interval(&current_context, swap_interval) {
            log::warn!("could not set the swap interval: {}", err);
        }

        let display = Display::from_context_surface(current_context, surface)?;

        Ok((window, display))
    }
}

/// Asks for a core context of the requested version, then whatever the driver prefers, then
/// OpenGL ES as a last resort.
fn create_context(window: &Window, gl_config: &glutin::config::Config, (major, minor): (u8, u8))
    -> Result<NotCurrentContext, DisplayCreationError>
{
    let raw_window_handle = window.raw_window_handle();
    let gl_display = gl_config.display();

    let core_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(glutin::context::Version::new(major, minor))))
        .with_profile(GlProfile::Core)
        .build(Some(raw_window_handle));
    let default_attributes = ContextAttributesBuilder::new().build(Some(raw_window_handle));
    let fallback_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::Gles(None))
        .build(Some(raw_window_handle));

    unsafe {
        gl_display.create_context(gl_config, &core_attributes)
            .or_else(|err| {
                log::warn!("OpenGL {}.{} core context refused ({}), using the default", major, minor, err);
                gl_display.create_context(gl_config, &default_attributes)
            })
            .or_else(|_| gl_display.create_context(gl_config, &fallback_attributes))
            .map_err(DisplayCreationError::from)
    }
}
