// This file is part of OpenGen.
//
// OpenGen is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// OpenGen is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with OpenGen.  If not, see <http://www.gnu.org/licenses/>.

// Texture and terrain-flag layers over the height map grid. This is the most
// version-sensitive asset in the container: a dozen optional grids appear and
// disappear across versions, three grids switch between 16- and 32-bit
// elements, and two record counts are stored off by one.
//
// None of the grids embed their own dimensions; they inherit them from the
// HeightMapData parsed earlier in the file.

use crate::assets::height_map::HeightMapData;
use crate::context::{ParsingContext, WritingContext};
use crate::stream::{Grid, Vec2};
use anyhow::{bail, ensure, Result};
use log::trace;

/// Element width of the blends / three-way-blends / cliff-textures grids.
fn blend_bit_size(version: u16) -> u32 {
    if (14..24).contains(&version) {
        32
    } else {
        16
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TileFlammability {
    #[default]
    FireResistant = 0,
    Grass = 1,
    HighlyFlammable = 2,
    Undefined = 3,
}

impl TileFlammability {
    pub fn from_byte(b: u8) -> Result<Self> {
        Ok(match b {
            0 => Self::FireResistant,
            1 => Self::Grass,
            2 => Self::HighlyFlammable,
            3 => Self::Undefined,
            _ => bail!("invalid tile flammability value: {}", b),
        })
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlendTileTexture {
    pub cell_start: u32,
    pub cell_count: u32,
    pub cell_size: u32,
    pub name: String,
}

impl BlendTileTexture {
    fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        let cell_start = ctx.stream.read_u32()?;
        let cell_count = ctx.stream.read_u32()?;
        let cell_size = ctx.stream.read_u32()?;
        ensure!(
            cell_size * cell_size == cell_count,
            "blend tile texture cell size {} squared is not cell count {}",
            cell_size,
            cell_count
        );
        let magic = ctx.stream.read_u32()?;
        ensure!(magic == 0, "expected zero after texture cells, got {}", magic);
        Ok(Self {
            cell_start,
            cell_count,
            cell_size,
            name: ctx.stream.read_ascii_string()?,
        })
    }

    fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.stream.write_u32(self.cell_start);
        ctx.stream.write_u32(self.cell_count);
        ctx.stream.write_u32(self.cell_size);
        ctx.stream.write_u32(0);
        ctx.stream.write_ascii_string(&self.name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlendDescription {
    pub secondary_texture_tile: u32,
    pub raw_blend_direction: [u8; 4],
    pub flags: u8,
    pub two_sided: bool,
    /// Varies across files (0xFFFFFFFF and 24 observed); kept verbatim.
    pub magic_value1: u32,
}

impl BlendDescription {
    const MAGIC_VALUE2: u32 = 0x7ADA_0000;

    fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        let secondary_texture_tile = ctx.stream.read_u32()?;
        let raw_blend_direction = ctx.stream.read_bytes(4)?.try_into()?;
        let flags = ctx.stream.read_u8()?;
        let two_sided = ctx.stream.read_bool()?;
        let magic_value1 = ctx.stream.read_u32()?;
        let magic_value2 = ctx.stream.read_u32()?;
        ensure!(
            magic_value2 == Self::MAGIC_VALUE2,
            "expected blend description tail {:#010X}, got {:#010X}",
            Self::MAGIC_VALUE2,
            magic_value2
        );
        Ok(Self {
            secondary_texture_tile,
            raw_blend_direction,
            flags,
            two_sided,
            magic_value1,
        })
    }

    fn write(&self, ctx: &mut WritingContext) {
        ctx.stream.write_u32(self.secondary_texture_tile);
        ctx.stream.write_bytes(&self.raw_blend_direction);
        ctx.stream.write_u8(self.flags);
        ctx.stream.write_bool(self.two_sided);
        ctx.stream.write_u32(self.magic_value1);
        ctx.stream.write_u32(Self::MAGIC_VALUE2);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CliffTextureMapping {
    pub texture_tile: u32,
    pub bottom_left: Vec2,
    pub bottom_right: Vec2,
    pub top_right: Vec2,
    pub top_left: Vec2,
    pub unknown: u16,
}

impl CliffTextureMapping {
    fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        Ok(Self {
            texture_tile: ctx.stream.read_u32()?,
            bottom_left: ctx.stream.read_vec2()?,
            bottom_right: ctx.stream.read_vec2()?,
            top_right: ctx.stream.read_vec2()?,
            top_left: ctx.stream.read_vec2()?,
            unknown: ctx.stream.read_u16()?,
        })
    }

    fn write(&self, ctx: &mut WritingContext) {
        ctx.stream.write_u32(self.texture_tile);
        ctx.stream.write_vec2(self.bottom_left);
        ctx.stream.write_vec2(self.bottom_right);
        ctx.stream.write_vec2(self.top_right);
        ctx.stream.write_vec2(self.top_left);
        ctx.stream.write_u16(self.unknown);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlendTileData {
    pub version: u16,
    pub tiles: Grid<u16>,
    pub blends: Grid<u32>,
    pub three_way_blends: Grid<u32>,
    pub cliff_textures: Grid<u32>,
    /// Version > 6. At version 7 exactly, the stored width is
    /// `((w + 1) / 8) * 8` with partial row bytes clipped, so this grid's
    /// own width may differ from the height map's.
    pub impassability: Option<Grid<bool>>,
    /// Version >= 10.
    pub impassability_to_players: Option<Grid<bool>>,
    /// Version >= 11.
    pub passage_widths: Option<Grid<bool>>,
    /// Versions 14..25.
    pub taintability: Option<Grid<bool>>,
    /// Version >= 15.
    pub extra_passability: Option<Grid<bool>>,
    /// Versions 16..25.
    pub flammability: Option<Grid<TileFlammability>>,
    /// Version >= 17; written with 0xFF row padding.
    pub visibility: Option<Grid<bool>>,
    /// Version >= 24, in this order on the wire.
    pub buildability: Option<Grid<bool>>,
    pub impassability_to_air_units: Option<Grid<bool>>,
    pub tiberium_growability: Option<Grid<bool>>,
    /// Version >= 25.
    pub dynamic_shrubbery_density: Option<Grid<u8>>,
    pub texture_cell_count: u32,
    /// The stored counts equal list length + 1 when records exist; files
    /// from some titles store 0 instead of 1 for empty lists, so the raw
    /// values are retained for write-back.
    pub raw_blend_count: u32,
    pub raw_cliff_mapping_count: u32,
    pub textures: Vec<BlendTileTexture>,
    /// Meaning unknown; varies across files and is preserved verbatim.
    pub magic_value1: u32,
    pub blend_descriptions: Vec<BlendDescription>,
    pub cliff_texture_mappings: Vec<CliffTextureMapping>,
}

impl BlendTileData {
    pub const ASSET_NAME: &'static str = "BlendTileData";

    const VISIBILITY_PAD: u8 = 0xFF;

    pub fn parse(ctx: &mut ParsingContext, height_map: &HeightMapData) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            ensure!(
                header.version >= 6,
                "unsupported BlendTileData version: {}",
                header.version
            );
            let width = height_map.width as usize;
            let height = height_map.height as usize;

            let tiles_count = ctx.stream.read_u32()?;
            ensure!(
                tiles_count as usize == width * height,
                "BlendTileData covers {} tiles, height map is {}x{}",
                tiles_count,
                width,
                height
            );
            let tiles = ctx.stream.read_u16_grid(width, height)?;

            let bits = blend_bit_size(header.version);
            let blends = ctx.stream.read_uint_grid(width, height, bits)?;
            let three_way_blends = ctx.stream.read_uint_grid(width, height, bits)?;
            let cliff_textures = ctx.stream.read_uint_grid(width, height, bits)?;

            let mut impassability = None;
            if header.version > 6 {
                let mut passability_width = width;
                if header.version == 7 {
                    // Generals clips each row of passability bits to whole
                    // bytes; the stored width replaces the logical one.
                    passability_width = (passability_width + 1) / 8 * 8;
                }
                impassability = Some(ctx.stream.read_bit_grid(passability_width, height)?);
            }

            let mut impassability_to_players = None;
            if header.version >= 10 {
                impassability_to_players = Some(ctx.stream.read_bit_grid(width, height)?);
            }

            let mut passage_widths = None;
            if header.version >= 11 {
                passage_widths = Some(ctx.stream.read_bit_grid(width, height)?);
            }

            let mut taintability = None;
            if (14..25).contains(&header.version) {
                taintability = Some(ctx.stream.read_bit_grid(width, height)?);
            }

            let mut extra_passability = None;
            if header.version >= 15 {
                extra_passability = Some(ctx.stream.read_bit_grid(width, height)?);
            }

            let mut flammability = None;
            if (16..25).contains(&header.version) {
                let raw = ctx.stream.read_byte_grid(width, height)?;
                let mut grid = Grid::new(width, height);
                for y in 0..height {
                    for x in 0..width {
                        grid.set(x, y, TileFlammability::from_byte(raw.get(x, y))?);
                    }
                }
                flammability = Some(grid);
            }

            let mut visibility = None;
            if header.version >= 17 {
                visibility = Some(ctx.stream.read_bit_grid(width, height)?);
            }

            let mut buildability = None;
            let mut impassability_to_air_units = None;
            let mut tiberium_growability = None;
            if header.version >= 24 {
                buildability = Some(ctx.stream.read_bit_grid(width, height)?);
                impassability_to_air_units = Some(ctx.stream.read_bit_grid(width, height)?);
                tiberium_growability = Some(ctx.stream.read_bit_grid(width, height)?);
            }

            let mut dynamic_shrubbery_density = None;
            if header.version >= 25 {
                dynamic_shrubbery_density = Some(ctx.stream.read_byte_grid(width, height)?);
            }

            let texture_cell_count = ctx.stream.read_u32()?;

            // Both counts store one more than the number of records that
            // actually follow, except in files that store a literal 0.
            let raw_blend_count = ctx.stream.read_u32()?;
            let blend_count = raw_blend_count.saturating_sub(1);
            let raw_cliff_mapping_count = ctx.stream.read_u32()?;
            let cliff_mapping_count = raw_cliff_mapping_count.saturating_sub(1);

            let texture_count = ctx.stream.read_u32()?;
            let mut textures = Vec::with_capacity(texture_count as usize);
            for _ in 0..texture_count {
                textures.push(BlendTileTexture::parse(ctx)?);
            }

            let magic_value1 = ctx.stream.read_u32()?;
            let magic_value2 = ctx.stream.read_u32()?;
            ensure!(
                magic_value2 == 0,
                "expected zero after blend tile magic, got {}",
                magic_value2
            );

            let mut blend_descriptions = Vec::with_capacity(blend_count as usize);
            for _ in 0..blend_count {
                blend_descriptions.push(BlendDescription::parse(ctx)?);
            }

            let mut cliff_texture_mappings = Vec::with_capacity(cliff_mapping_count as usize);
            for _ in 0..cliff_mapping_count {
                cliff_texture_mappings.push(CliffTextureMapping::parse(ctx)?);
            }

            trace!(
                "BlendTileData v{}: {} textures, {} blends, {} cliff mappings",
                header.version,
                textures.len(),
                blend_descriptions.len(),
                cliff_texture_mappings.len()
            );

            Ok(Self {
                version: header.version,
                tiles,
                blends,
                three_way_blends,
                cliff_textures,
                impassability,
                impassability_to_players,
                passage_widths,
                taintability,
                extra_passability,
                flammability,
                visibility,
                buildability,
                impassability_to_air_units,
                tiberium_growability,
                dynamic_shrubbery_density,
                texture_cell_count,
                raw_blend_count,
                raw_cliff_mapping_count,
                textures,
                magic_value1,
                blend_descriptions,
                cliff_texture_mappings,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.stream
                .write_u32((self.tiles.width() * self.tiles.height()) as u32);
            ctx.stream.write_u16_grid(&self.tiles);

            let bits = blend_bit_size(self.version);
            ctx.stream.write_uint_grid(&self.blends, bits)?;
            ctx.stream.write_uint_grid(&self.three_way_blends, bits)?;
            ctx.stream.write_uint_grid(&self.cliff_textures, bits)?;

            if self.version > 6 {
                let grid = required(&self.impassability, "impassability", self.version)?;
                ctx.stream.write_bit_grid(grid, 0);
            }
            if self.version >= 10 {
                let grid = required(
                    &self.impassability_to_players,
                    "impassability_to_players",
                    self.version,
                )?;
                ctx.stream.write_bit_grid(grid, 0);
            }
            if self.version >= 11 {
                let grid = required(&self.passage_widths, "passage_widths", self.version)?;
                ctx.stream.write_bit_grid(grid, 0);
            }
            if (14..25).contains(&self.version) {
                let grid = required(&self.taintability, "taintability", self.version)?;
                ctx.stream.write_bit_grid(grid, 0);
            }
            if self.version >= 15 {
                let grid = required(&self.extra_passability, "extra_passability", self.version)?;
                ctx.stream.write_bit_grid(grid, 0);
            }
            if (16..25).contains(&self.version) {
                let grid = required(&self.flammability, "flammability", self.version)?;
                for y in 0..grid.height() {
                    for x in 0..grid.width() {
                        ctx.stream.write_u8(grid.get(x, y).as_byte());
                    }
                }
            }
            if self.version >= 17 {
                let grid = required(&self.visibility, "visibility", self.version)?;
                ctx.stream.write_bit_grid(grid, Self::VISIBILITY_PAD);
            }
            if self.version >= 24 {
                let grid = required(&self.buildability, "buildability", self.version)?;
                ctx.stream.write_bit_grid(grid, 0);
                let grid = required(
                    &self.impassability_to_air_units,
                    "impassability_to_air_units",
                    self.version,
                )?;
                ctx.stream.write_bit_grid(grid, 0);
                let grid = required(
                    &self.tiberium_growability,
                    "tiberium_growability",
                    self.version,
                )?;
                ctx.stream.write_bit_grid(grid, 0);
            }
            if self.version >= 25 {
                let grid = required(
                    &self.dynamic_shrubbery_density,
                    "dynamic_shrubbery_density",
                    self.version,
                )?;
                ctx.stream.write_byte_grid(grid);
            }

            ctx.stream.write_u32(self.texture_cell_count);
            ctx.stream
                .write_u32(stored_count(&self.blend_descriptions, self.raw_blend_count));
            ctx.stream.write_u32(stored_count(
                &self.cliff_texture_mappings,
                self.raw_cliff_mapping_count,
            ));

            ctx.stream.write_u32(self.textures.len() as u32);
            for texture in &self.textures {
                texture.write(ctx)?;
            }

            ctx.stream.write_u32(self.magic_value1);
            ctx.stream.write_u32(0);

            for blend in &self.blend_descriptions {
                blend.write(ctx);
            }
            for mapping in &self.cliff_texture_mappings {
                mapping.write(ctx);
            }
            Ok(())
        })
    }
}

fn required<'a, T>(grid: &'a Option<T>, field: &str, version: u16) -> Result<&'a T> {
    match grid {
        Some(g) => Ok(g),
        None => bail!("BlendTileData version {} requires the {} layer", version, field),
    }
}

/// `len + 1` when records exist; the raw parsed value (0 or 1) otherwise.
fn stored_count<T>(records: &[T], raw: u32) -> u32 {
    if records.is_empty() {
        raw
    } else {
        records.len() as u32 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::NameTable;
    use crate::stream::{BinaryReader, BinaryWriter};

    fn height_map(width: u32, height: u32) -> HeightMapData {
        HeightMapData {
            version: 5,
            width,
            height,
            border_width: 0,
            borders: Vec::new(),
            area: width * height,
            min_height: 0,
            max_height: 0,
            elevations: Grid::new(width as usize, height as usize),
        }
    }

    fn bit_grid(width: usize, height: usize, seed: usize) -> Grid<bool> {
        let mut grid = Grid::new(width, height);
        for y in 0..height {
            for x in 0..width {
                grid.set(x, y, (x * 7 + y * 13 + seed) % 3 == 0);
            }
        }
        grid
    }

    fn reparse(data: &BlendTileData, hm: &HeightMapData) -> Result<(BlendTileData, Vec<u8>)> {
        let mut out = WritingContext::new(NameTable::new());
        data.write(&mut out)?;
        let bytes = out.stream.into_bytes();
        let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), NameTable::new());
        Ok((BlendTileData::parse(&mut ctx, hm)?, bytes))
    }

    fn base(version: u16, width: usize, height: usize) -> BlendTileData {
        let mut tiles = Grid::new(width, height);
        for y in 0..height {
            for x in 0..width {
                tiles.set(x, y, (x + y * width) as u16);
            }
        }
        BlendTileData {
            version,
            tiles,
            blends: Grid::new(width, height),
            three_way_blends: Grid::new(width, height),
            cliff_textures: Grid::new(width, height),
            impassability: None,
            impassability_to_players: None,
            passage_widths: None,
            taintability: None,
            extra_passability: None,
            flammability: None,
            visibility: None,
            buildability: None,
            impassability_to_air_units: None,
            tiberium_growability: None,
            dynamic_shrubbery_density: None,
            texture_cell_count: 4,
            raw_blend_count: 0,
            raw_cliff_mapping_count: 0,
            textures: vec![BlendTileTexture {
                cell_start: 0,
                cell_count: 4,
                cell_size: 2,
                name: "TGrass01".to_owned(),
            }],
            magic_value1: 0xFFFF_FFFF,
            blend_descriptions: Vec::new(),
            cliff_texture_mappings: Vec::new(),
        }
    }

    #[test]
    fn version_7_passability_rows_are_clipped_to_whole_bytes() -> Result<()> {
        // Width 13 stores ((13 + 1) / 8) * 8 = 8 columns of passability.
        let hm = height_map(13, 2);
        let mut data = base(7, 13, 2);
        data.impassability = Some(bit_grid(8, 2, 1));

        let (back, bytes) = reparse(&data, &hm)?;
        assert_eq!(back, data);

        let mut out = WritingContext::new(NameTable::new());
        back.write(&mut out)?;
        assert_eq!(out.stream.into_bytes(), bytes);
        Ok(())
    }

    #[test]
    fn version_7_passability_rounds_up_below_a_byte() -> Result<()> {
        // Width 7 stores ((7 + 1) / 8) * 8 = 8 columns: one spare column.
        let hm = height_map(7, 1);
        let mut data = base(7, 7, 1);
        data.impassability = Some(bit_grid(8, 1, 2));
        let (back, _) = reparse(&data, &hm)?;
        assert_eq!(back, data);
        Ok(())
    }

    #[test]
    fn version_8_passability_uses_the_logical_width() -> Result<()> {
        let hm = height_map(13, 2);
        let mut data = base(8, 13, 2);
        data.impassability = Some(bit_grid(13, 2, 3));
        let (back, _) = reparse(&data, &hm)?;
        assert_eq!(back, data);
        Ok(())
    }

    #[test]
    fn version_17_carries_every_generals_layer() -> Result<()> {
        let (w, h) = (9, 3);
        let hm = height_map(w as u32, h as u32);
        let mut data = base(17, w, h);
        data.impassability = Some(bit_grid(w, h, 1));
        data.impassability_to_players = Some(bit_grid(w, h, 2));
        data.passage_widths = Some(bit_grid(w, h, 3));
        data.taintability = Some(bit_grid(w, h, 4));
        data.extra_passability = Some(bit_grid(w, h, 5));
        let mut flammability = Grid::new(w, h);
        for y in 0..h {
            for x in 0..w {
                flammability.set(x, y, TileFlammability::from_byte(((x + y) % 4) as u8)?);
            }
        }
        data.flammability = Some(flammability);
        data.visibility = Some(bit_grid(w, h, 6));
        data.blend_descriptions = vec![BlendDescription {
            secondary_texture_tile: 3,
            raw_blend_direction: [0, 1, 0, 0],
            flags: 1,
            two_sided: true,
            magic_value1: 24,
        }];
        data.raw_blend_count = 2;
        data.cliff_texture_mappings = vec![CliffTextureMapping {
            texture_tile: 1,
            bottom_left: Vec2 { x: 0.0, y: 0.0 },
            bottom_right: Vec2 { x: 1.0, y: 0.0 },
            top_right: Vec2 { x: 1.0, y: 1.0 },
            top_left: Vec2 { x: 0.0, y: 1.0 },
            unknown: 0,
        }];
        data.raw_cliff_mapping_count = 2;

        // Versions 14..24 use 32-bit blend cells; 17 is in range.
        let (back, _) = reparse(&data, &hm)?;
        assert_eq!(back, data);
        Ok(())
    }

    #[test]
    fn raw_zero_counts_survive_write_back() -> Result<()> {
        let hm = height_map(2, 2);
        let mut data = base(6, 2, 2);
        data.raw_blend_count = 0;
        data.raw_cliff_mapping_count = 1;
        let (back, _) = reparse(&data, &hm)?;
        assert_eq!(back.raw_blend_count, 0);
        assert_eq!(back.raw_cliff_mapping_count, 1);
        Ok(())
    }

    #[test]
    fn versions_below_6_are_unsupported() {
        let mut w = BinaryWriter::new();
        w.write_u16(5);
        w.write_u32(0);
        let bytes = w.into_bytes();
        let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), NameTable::new());
        assert!(BlendTileData::parse(&mut ctx, &height_map(1, 1)).is_err());
    }
}
