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

// Scripting trigger geometry: flat polygon areas (TriggerAreas) and the
// older PolygonTriggers, which later versions extended into full river and
// water volume descriptions.

use crate::context::{ParsingContext, WritingContext};
use crate::stream::Vec2;
use anyhow::{bail, ensure, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct TriggerArea {
    pub name: String,
    pub layer_name: String,
    pub area_id: u32,
    pub points: Vec<Vec2>,
}

impl TriggerArea {
    fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        let name = ctx.stream.read_ascii_string()?;
        let layer_name = ctx.stream.read_ascii_string()?;
        let area_id = ctx.stream.read_u32()?;

        let point_count = ctx.stream.read_u32()?;
        let mut points = Vec::with_capacity(point_count as usize);
        for _ in 0..point_count {
            points.push(ctx.stream.read_vec2()?);
        }

        let unknown2 = ctx.stream.read_u32()?;
        ensure!(
            unknown2 == 0,
            "expected zero trigger area tail, got {}",
            unknown2
        );
        Ok(Self {
            name,
            layer_name,
            area_id,
            points,
        })
    }

    fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.stream.write_ascii_string(&self.name)?;
        ctx.stream.write_ascii_string(&self.layer_name)?;
        ctx.stream.write_u32(self.area_id);
        ctx.stream.write_u32(self.points.len() as u32);
        for point in &self.points {
            ctx.stream.write_vec2(*point);
        }
        ctx.stream.write_u32(0);
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TriggerAreas {
    pub version: u16,
    pub areas: Vec<TriggerArea>,
}

impl TriggerAreas {
    pub const ASSET_NAME: &'static str = "TriggerAreas";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let count = ctx.stream.read_u32()?;
            let mut areas = Vec::with_capacity(count as usize);
            for _ in 0..count {
                areas.push(TriggerArea::parse(ctx)?);
            }
            Ok(Self {
                version: header.version,
                areas,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.stream.write_u32(self.areas.len() as u32);
            for area in &self.areas {
                area.write(ctx)?;
            }
            Ok(())
        })
    }
}

/// The version >= 5 water/river texturing block of a polygon trigger.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonRiverData {
    pub river_texture: String,
    pub noise_texture: String,
    pub alpha_edge_texture: String,
    pub sparkle_texture: String,
    pub bump_map_texture: String,
    pub sky_texture: String,
    pub use_additive_blending: bool,
    pub river_color: (u8, u8, u8),
    pub unknown: u8,
    pub uv_scroll_speed: Vec2,
    pub river_alpha: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PolygonTrigger {
    pub name: String,
    /// Version >= 4.
    pub layer_name: Option<String>,
    pub trigger_id: u32,
    /// Version >= 2.
    pub is_water: bool,
    /// Version >= 3.
    pub is_river: bool,
    pub river_start: Option<bool>,
    /// Version >= 5.
    pub river_data: Option<PolygonRiverData>,
    pub points: Vec<(i32, i32, i32)>,
}

impl PolygonTrigger {
    fn parse(ctx: &mut ParsingContext, version: u16) -> Result<Self> {
        let name = ctx.stream.read_ascii_string()?;

        let layer_name = if version >= 4 {
            Some(ctx.stream.read_ascii_string()?)
        } else {
            None
        };

        let trigger_id = ctx.stream.read_u32()?;

        let is_water = if version >= 2 {
            ctx.stream.read_bool()?
        } else {
            false
        };

        let mut is_river = false;
        let mut river_start = None;
        if version >= 3 {
            is_river = ctx.stream.read_bool()?;
            river_start = Some(ctx.stream.read_bool_u32()?);
        }

        let river_data = if version >= 5 {
            Some(PolygonRiverData {
                river_texture: ctx.stream.read_ascii_string()?,
                noise_texture: ctx.stream.read_ascii_string()?,
                alpha_edge_texture: ctx.stream.read_ascii_string()?,
                sparkle_texture: ctx.stream.read_ascii_string()?,
                bump_map_texture: ctx.stream.read_ascii_string()?,
                sky_texture: ctx.stream.read_ascii_string()?,
                use_additive_blending: ctx.stream.read_bool()?,
                river_color: (
                    ctx.stream.read_u8()?,
                    ctx.stream.read_u8()?,
                    ctx.stream.read_u8()?,
                ),
                unknown: ctx.stream.read_u8()?,
                uv_scroll_speed: ctx.stream.read_vec2()?,
                river_alpha: ctx.stream.read_f32()?,
            })
        } else {
            None
        };

        let point_count = ctx.stream.read_u32()?;
        let mut points = Vec::with_capacity(point_count as usize);
        for _ in 0..point_count {
            points.push((
                ctx.stream.read_i32()?,
                ctx.stream.read_i32()?,
                ctx.stream.read_i32()?,
            ));
        }

        Ok(Self {
            name,
            layer_name,
            trigger_id,
            is_water,
            is_river,
            river_start,
            river_data,
            points,
        })
    }

    fn write(&self, ctx: &mut WritingContext, version: u16) -> Result<()> {
        ctx.stream.write_ascii_string(&self.name)?;

        if version >= 4 {
            ctx.stream
                .write_ascii_string(self.layer_name.as_deref().unwrap_or(""))?;
        }

        ctx.stream.write_u32(self.trigger_id);

        if version >= 2 {
            ctx.stream.write_bool(self.is_water);
        }
        if version >= 3 {
            ctx.stream.write_bool(self.is_river);
            ctx.stream.write_bool_u32(self.river_start.unwrap_or(false));
        }
        if version >= 5 {
            let Some(river) = &self.river_data else {
                bail!("polygon trigger {:?} is missing its v5 river block", self.name);
            };
            ctx.stream.write_ascii_string(&river.river_texture)?;
            ctx.stream.write_ascii_string(&river.noise_texture)?;
            ctx.stream.write_ascii_string(&river.alpha_edge_texture)?;
            ctx.stream.write_ascii_string(&river.sparkle_texture)?;
            ctx.stream.write_ascii_string(&river.bump_map_texture)?;
            ctx.stream.write_ascii_string(&river.sky_texture)?;
            ctx.stream.write_bool(river.use_additive_blending);
            ctx.stream.write_u8(river.river_color.0);
            ctx.stream.write_u8(river.river_color.1);
            ctx.stream.write_u8(river.river_color.2);
            ctx.stream.write_u8(river.unknown);
            ctx.stream.write_vec2(river.uv_scroll_speed);
            ctx.stream.write_f32(river.river_alpha);
        }

        ctx.stream.write_u32(self.points.len() as u32);
        for (x, y, z) in &self.points {
            ctx.stream.write_i32(*x);
            ctx.stream.write_i32(*y);
            ctx.stream.write_i32(*z);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PolygonTriggers {
    pub version: u16,
    pub triggers: Vec<PolygonTrigger>,
}

impl PolygonTriggers {
    pub const ASSET_NAME: &'static str = "PolygonTriggers";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let count = ctx.stream.read_u32()?;
            let mut triggers = Vec::with_capacity(count as usize);
            for _ in 0..count {
                triggers.push(PolygonTrigger::parse(ctx, header.version)?);
            }
            Ok(Self {
                version: header.version,
                triggers,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.stream.write_u32(self.triggers.len() as u32);
            for trigger in &self.triggers {
                trigger.write(ctx, self.version)?;
            }
            Ok(())
        })
    }
}
