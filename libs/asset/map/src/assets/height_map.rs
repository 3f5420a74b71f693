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

// The terrain elevation grid. Other assets (BlendTileData in particular)
// have no dimensions of their own and inherit width/height from here, which
// is why the container requires HeightMapData to come first.

use crate::context::{ParsingContext, WritingContext};
use crate::stream::Grid;
use anyhow::{ensure, Result};
use log::trace;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightMapBorder {
    /// Absent below version 6; read back as zero.
    pub corner1_x: u32,
    pub corner1_y: u32,
    pub x: u32,
    pub y: u32,
}

impl HeightMapBorder {
    fn parse(ctx: &mut ParsingContext, version: u16) -> Result<Self> {
        let (corner1_x, corner1_y) = if version >= 6 {
            (ctx.stream.read_u32()?, ctx.stream.read_u32()?)
        } else {
            (0, 0)
        };
        Ok(Self {
            corner1_x,
            corner1_y,
            x: ctx.stream.read_u32()?,
            y: ctx.stream.read_u32()?,
        })
    }

    fn write(&self, ctx: &mut WritingContext, version: u16) {
        if version >= 6 {
            ctx.stream.write_u32(self.corner1_x);
            ctx.stream.write_u32(self.corner1_y);
        }
        ctx.stream.write_u32(self.x);
        ctx.stream.write_u32(self.y);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeightMapData {
    pub version: u16,
    pub width: u32,
    pub height: u32,
    pub border_width: u32,
    pub borders: Vec<HeightMapBorder>,
    pub area: u32,
    /// Derived during parse; never recomputed on write.
    pub min_height: u16,
    pub max_height: u16,
    /// Elevation samples; u16 on the wire from version 5 on, u8 before.
    pub elevations: Grid<u16>,
}

impl HeightMapData {
    pub const ASSET_NAME: &'static str = "HeightMapData";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let width = ctx.stream.read_u32()?;
            let height = ctx.stream.read_u32()?;
            let border_width = ctx.stream.read_u32()?;

            let border_count = ctx.stream.read_u32()?;
            let mut borders = Vec::with_capacity(border_count as usize);
            for _ in 0..border_count {
                borders.push(HeightMapBorder::parse(ctx, header.version)?);
            }

            let area = ctx.stream.read_u32()?;
            ensure!(
                area == width * height,
                "HeightMapData area {} does not match {}x{}",
                area,
                width,
                height
            );

            let mut min_height = u16::MAX;
            let mut max_height = 0;
            let mut elevations = Grid::new(width as usize, height as usize);
            for y in 0..height as usize {
                for x in 0..width as usize {
                    let elevation = if header.version >= 5 {
                        ctx.stream.read_u16()?
                    } else {
                        ctx.stream.read_u8()? as u16
                    };
                    elevations.set(x, y, elevation);
                    min_height = min_height.min(elevation);
                    max_height = max_height.max(elevation);
                }
            }
            if area == 0 {
                min_height = 0;
            }
            trace!(
                "HeightMapData v{}: {}x{}, elevation {}..{}",
                header.version,
                width,
                height,
                min_height,
                max_height
            );

            Ok(Self {
                version: header.version,
                width,
                height,
                border_width,
                borders,
                area,
                min_height,
                max_height,
                elevations,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.stream.write_u32(self.width);
            ctx.stream.write_u32(self.height);
            ctx.stream.write_u32(self.border_width);

            ctx.stream.write_u32(self.borders.len() as u32);
            for border in &self.borders {
                border.write(ctx, self.version);
            }

            ctx.stream.write_u32(self.area);
            for y in 0..self.height as usize {
                for x in 0..self.width as usize {
                    let elevation = self.elevations.get(x, y);
                    if self.version >= 5 {
                        ctx.stream.write_u16(elevation);
                    } else {
                        ensure!(
                            elevation <= 0xFF,
                            "elevation {} does not fit the one-byte samples of version {}",
                            elevation,
                            self.version
                        );
                        ctx.stream.write_u8(elevation as u8);
                    }
                }
            }
            Ok(())
        })
    }
}
