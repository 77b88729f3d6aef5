//! Water surface compositor: reflection/refraction captures and the final
//! blended draw.

pub mod passes;
pub mod surface;

pub use passes::SceneDraw;
pub use surface::WaterSurface;
