mod raster;

pub use raster::{
    encode, export, render_scaled, thumbnail, ExportFormat, ExportScale, THUMBNAIL_SIZE,
};
