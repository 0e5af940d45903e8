use core::result::Result;

use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext};
use bevy::prelude::*;
use bevy::reflect::TypePath;
use bevy::tasks::ConditionalSendFuture;
use metaball_field::prelude::WallGrid;
use serde::{Deserialize, Serialize};

/// Tile map asset: square cells of `cell_size` world units, one string per row, `#` marks a wall.
///
/// ```ron
/// (
///     cell_size: 16.0,
///     rows: [
///         "##########",
///         "#........#",
///         "##########",
///     ],
/// )
/// ```
#[derive(Asset, TypePath, Clone, Debug, Serialize, Deserialize)]
pub struct TileGridAsset {
    pub cell_size: f32,
    pub rows: Vec<String>,
}

impl TileGridAsset {
    /// Builds the in-memory wall grid.
    pub fn to_wall_grid(&self) -> metaball_field::prelude::Result<WallGrid> {
        WallGrid::from_ascii(self.cell_size, &self.rows)
    }
}

/// Asset loader for [`TileGridAsset`] using RON files with `.tiles` extension.
#[derive(TypePath)]
pub struct TileGridAssetLoader;

impl AssetLoader for TileGridAssetLoader {
    type Asset = TileGridAsset;
    type Settings = ();
    type Error = anyhow::Error;

    fn extensions(&self) -> &[&str] {
        &["tiles"]
    }

    fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _context: &mut LoadContext,
    ) -> impl ConditionalSendFuture<Output = Result<Self::Asset, Self::Error>> {
        Box::pin(async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            let asset: TileGridAsset =
                ron::de::from_bytes(&bytes).map_err(|e| anyhow::anyhow!(e))?;
            asset.to_wall_grid()?;
            Ok(asset)
        })
    }
}

impl FromWorld for TileGridAssetLoader {
    fn from_world(_: &mut World) -> Self {
        TileGridAssetLoader
    }
}

#[cfg(test)]
mod tests {
    use metaball_field::prelude::TileGrid;

    use super::*;

    #[test]
    fn parses_ron_tile_grid() {
        let src = r##"(cell_size: 8.0, rows: ["#.", ".#"])"##;
        let asset: TileGridAsset = ron::de::from_str(src).unwrap();
        let grid = asset.to_wall_grid().unwrap();
        assert_eq!(grid.size(), (2, 2));
        assert_eq!(grid.cell_size(), 8.0);
        assert!(grid.is_wall(1, 1));
        assert!(!grid.is_wall(1, 0));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let asset = TileGridAsset {
            cell_size: 8.0,
            rows: vec!["###".into(), "#".into()],
        };
        assert!(asset.to_wall_grid().is_err());
    }
}
