use crate::{
    foundation::error::FuResult,
    objects::node::concrete_wrapper,
    remote::host::RemoteHandle,
};

#[derive(Clone, Debug)]
/// Image parameter value, e.g. what an image output evaluates to.
///
/// Images carry no attributes; the resolver recognizes them by their label.
pub struct Image {
    handle: RemoteHandle,
}

concrete_wrapper!(Image);

impl Image {
    fn num(&self, prop: &str) -> FuResult<f64> {
        self.handle.get(prop)?.expect_f64(prop)
    }

    /// Width in pixels at the current proxy resolution.
    pub fn width(&self) -> FuResult<f64> {
        self.num("Width")
    }

    /// Height in pixels at the current proxy resolution.
    pub fn height(&self) -> FuResult<f64> {
        self.num("Height")
    }

    /// Unproxied width.
    pub fn original_width(&self) -> FuResult<f64> {
        self.num("OriginalWidth")
    }

    /// Unproxied height.
    pub fn original_height(&self) -> FuResult<f64> {
        self.num("OriginalHeight")
    }

    /// Depth indicator (not a bit count).
    pub fn depth(&self) -> FuResult<f64> {
        self.num("Depth")
    }

    /// Pixel X aspect.
    pub fn x_scale(&self) -> FuResult<f64> {
        self.num("XScale")
    }

    /// Pixel Y aspect.
    pub fn y_scale(&self) -> FuResult<f64> {
        self.num("YScale")
    }

    pub fn x_offset(&self) -> FuResult<f64> {
        self.num("XOffset")
    }

    pub fn y_offset(&self) -> FuResult<f64> {
        self.num("YOffset")
    }

    pub fn field(&self) -> FuResult<f64> {
        self.num("Field")
    }

    pub fn proxy_scale(&self) -> FuResult<f64> {
        self.num("ProxyScale")
    }
}

impl std::fmt::Display for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.handle.label() {
            Ok(label) => write!(f, "Image(\"{label}\")"),
            Err(_) => write!(f, "Image({})", self.handle.id()),
        }
    }
}
