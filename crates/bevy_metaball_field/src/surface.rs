use bevy::asset::RenderAssetUsages;
use bevy::image::ImageSampler;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use metaball_field::prelude::{IndexedSurface, Palette};

/// Handles to the presented field: the image asset and the sprite showing it.
#[derive(Resource, Debug, Clone)]
pub struct FieldSurface {
    /// RGBA image the indexed surface is uploaded into every frame.
    pub image: Handle<Image>,
    /// Sprite entity displaying [`Self::image`].
    pub sprite: Entity,
}

/// Palette used to upload the indexed surface into the image.
#[derive(Resource, Debug, Clone, Default)]
pub struct FieldPalette(
    /// Palette index to RGBA mapping.
    pub Palette,
);

/// Creates a transparent RGBA image of `size` with nearest sampling.
pub fn create_field_image(size: UVec2) -> Image {
    let mut image = Image::new_fill(
        Extent3d {
            width: size.x,
            height: size.y,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[0, 0, 0, 0],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    );
    image.sampler = ImageSampler::nearest();
    image
}

/// Writes `surface` through `palette` into `image`.
/// Returns `false` if the image does not match the surface size or is not RGBA8.
pub fn upload_surface(surface: &IndexedSurface, palette: &Palette, image: &mut Image) -> bool {
    let size = surface.size();
    let extent = image.texture_descriptor.size;
    if extent.width != size.x || extent.height != size.y {
        return false;
    }
    if !matches!(
        image.texture_descriptor.format,
        TextureFormat::Rgba8Unorm | TextureFormat::Rgba8UnormSrgb
    ) {
        return false;
    }
    let Some(data) = image.data.as_mut() else {
        return false;
    };
    palette.write_rgba(surface, data);
    true
}
