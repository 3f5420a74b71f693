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

// Water bodies. BfME-era maps replaced the polygon-trigger water flags with
// dedicated area assets: standing water, shoreline wave bands and rivers.

use crate::context::{ParsingContext, WritingContext};
use crate::stream::Vec2;
use anyhow::{bail, ensure, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct WaterSettings {
    pub version: u16,
    pub reflection_on: bool,
    pub reflection_plane_z: f32,
}

impl WaterSettings {
    pub const ASSET_NAME: &'static str = "GlobalWaterSettings";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            Ok(Self {
                version: header.version,
                reflection_on: ctx.stream.read_bool()?,
                reflection_plane_z: ctx.stream.read_f32()?,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.stream.write_bool(self.reflection_on);
            ctx.stream.write_f32(self.reflection_plane_z);
            Ok(())
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StandingWaterArea {
    pub unique_id: u32,
    pub name: String,
    pub layer_name: String,
    pub uv_scroll_speed: f32,
    pub use_adaptive_blending: bool,
    pub bump_map_texture: String,
    pub sky_texture: String,
    pub points: Vec<Vec2>,
    pub water_height: u32,
    pub fx_shader: String,
    pub depth_colors: String,
}

impl StandingWaterArea {
    fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        let unique_id = ctx.stream.read_u32()?;
        let name = ctx.stream.read_ascii_string()?;
        let layer_name = ctx.stream.read_ascii_string()?;
        let uv_scroll_speed = ctx.stream.read_f32()?;
        let use_adaptive_blending = ctx.stream.read_bool()?;
        let bump_map_texture = ctx.stream.read_ascii_string()?;
        let sky_texture = ctx.stream.read_ascii_string()?;

        let point_count = ctx.stream.read_u32()?;
        let mut points = Vec::with_capacity(point_count as usize);
        for _ in 0..point_count {
            points.push(ctx.stream.read_vec2()?);
        }

        Ok(Self {
            unique_id,
            name,
            layer_name,
            uv_scroll_speed,
            use_adaptive_blending,
            bump_map_texture,
            sky_texture,
            points,
            water_height: ctx.stream.read_u32()?,
            fx_shader: ctx.stream.read_ascii_string()?,
            depth_colors: ctx.stream.read_ascii_string()?,
        })
    }

    fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.stream.write_u32(self.unique_id);
        ctx.stream.write_ascii_string(&self.name)?;
        ctx.stream.write_ascii_string(&self.layer_name)?;
        ctx.stream.write_f32(self.uv_scroll_speed);
        ctx.stream.write_bool(self.use_adaptive_blending);
        ctx.stream.write_ascii_string(&self.bump_map_texture)?;
        ctx.stream.write_ascii_string(&self.sky_texture)?;
        ctx.stream.write_u32(self.points.len() as u32);
        for point in &self.points {
            ctx.stream.write_vec2(*point);
        }
        ctx.stream.write_u32(self.water_height);
        ctx.stream.write_ascii_string(&self.fx_shader)?;
        ctx.stream.write_ascii_string(&self.depth_colors)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StandingWaterAreas {
    pub version: u16,
    pub areas: Vec<StandingWaterArea>,
}

impl StandingWaterAreas {
    pub const ASSET_NAME: &'static str = "StandingWaterAreas";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let count = ctx.stream.read_u32()?;
            let mut areas = Vec::with_capacity(count as usize);
            for _ in 0..count {
                areas.push(StandingWaterArea::parse(ctx)?);
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

/// Wave geometry parameters stored inline below version 3.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveShapeData {
    pub final_width: u32,
    pub final_height: u32,
    pub initial_width_fraction: u32,
    pub initial_height_fraction: u32,
    pub initial_velocity: u32,
    pub time_to_fade: u32,
    pub time_to_compress: u32,
    pub time_offset_second_wave: u32,
    pub distance_from_shore: u32,
    pub texture: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StandingWaveArea {
    pub unique_id: u32,
    pub name: String,
    pub layer_name: String,
    pub uv_scroll_speed: f32,
    pub use_adaptive_blending: bool,
    pub points: Vec<Vec2>,
    /// Version < 3.
    pub shape: Option<WaveShapeData>,
    /// Version == 2 only.
    pub enable_pca_wave: Option<bool>,
    /// Version >= 4.
    pub wave_particle_fx_name: Option<String>,
}

impl StandingWaveArea {
    fn parse(ctx: &mut ParsingContext, version: u16) -> Result<Self> {
        let unique_id = ctx.stream.read_u32()?;
        let name = ctx.stream.read_ascii_string()?;
        let layer_name = ctx.stream.read_ascii_string()?;
        let uv_scroll_speed = ctx.stream.read_f32()?;
        let use_adaptive_blending = ctx.stream.read_bool()?;

        let point_count = ctx.stream.read_u32()?;
        let mut points = Vec::with_capacity(point_count as usize);
        for _ in 0..point_count {
            points.push(ctx.stream.read_vec2()?);
        }

        let unknown = ctx.stream.read_u32()?;
        ensure!(unknown == 0, "expected zero wave area field, got {}", unknown);

        let shape = if version < 3 {
            Some(WaveShapeData {
                final_width: ctx.stream.read_u32()?,
                final_height: ctx.stream.read_u32()?,
                initial_width_fraction: ctx.stream.read_u32()?,
                initial_height_fraction: ctx.stream.read_u32()?,
                initial_velocity: ctx.stream.read_u32()?,
                time_to_fade: ctx.stream.read_u32()?,
                time_to_compress: ctx.stream.read_u32()?,
                time_offset_second_wave: ctx.stream.read_u32()?,
                distance_from_shore: ctx.stream.read_u32()?,
                texture: ctx.stream.read_ascii_string()?,
            })
        } else {
            None
        };

        let enable_pca_wave = if version == 2 {
            Some(ctx.stream.read_bool_u32()?)
        } else {
            None
        };

        let wave_particle_fx_name = if version >= 4 {
            Some(ctx.stream.read_ascii_string()?)
        } else {
            None
        };

        Ok(Self {
            unique_id,
            name,
            layer_name,
            uv_scroll_speed,
            use_adaptive_blending,
            points,
            shape,
            enable_pca_wave,
            wave_particle_fx_name,
        })
    }

    fn write(&self, ctx: &mut WritingContext, version: u16) -> Result<()> {
        ctx.stream.write_u32(self.unique_id);
        ctx.stream.write_ascii_string(&self.name)?;
        ctx.stream.write_ascii_string(&self.layer_name)?;
        ctx.stream.write_f32(self.uv_scroll_speed);
        ctx.stream.write_bool(self.use_adaptive_blending);
        ctx.stream.write_u32(self.points.len() as u32);
        for point in &self.points {
            ctx.stream.write_vec2(*point);
        }
        ctx.stream.write_u32(0);

        if version < 3 {
            let Some(shape) = &self.shape else {
                bail!("wave area {:?} is missing its pre-v3 shape block", self.name);
            };
            ctx.stream.write_u32(shape.final_width);
            ctx.stream.write_u32(shape.final_height);
            ctx.stream.write_u32(shape.initial_width_fraction);
            ctx.stream.write_u32(shape.initial_height_fraction);
            ctx.stream.write_u32(shape.initial_velocity);
            ctx.stream.write_u32(shape.time_to_fade);
            ctx.stream.write_u32(shape.time_to_compress);
            ctx.stream.write_u32(shape.time_offset_second_wave);
            ctx.stream.write_u32(shape.distance_from_shore);
            ctx.stream.write_ascii_string(&shape.texture)?;
        }
        if version == 2 {
            ctx.stream.write_bool_u32(self.enable_pca_wave.unwrap_or(false));
        }
        if version >= 4 {
            ctx.stream
                .write_ascii_string(self.wave_particle_fx_name.as_deref().unwrap_or(""))?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StandingWaveAreas {
    pub version: u16,
    pub areas: Vec<StandingWaveArea>,
}

impl StandingWaveAreas {
    pub const ASSET_NAME: &'static str = "StandingWaveAreas";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let count = ctx.stream.read_u32()?;
            let mut areas = Vec::with_capacity(count as usize);
            for _ in 0..count {
                areas.push(StandingWaveArea::parse(ctx, header.version)?);
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
                area.write(ctx, self.version)?;
            }
            Ok(())
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RiverArea {
    pub unique_id: u32,
    pub name: String,
    pub layer_name: String,
    pub uv_scroll_speed: f32,
    pub use_additive_blending: bool,
    pub river_texture: String,
    pub noise_texture: String,
    pub alpha_edge_texture: String,
    pub sparkle_texture: String,
    pub color: (u8, u8, u8),
    pub alpha: f32,
    pub water_height: u32,
    /// Version >= 3.
    pub river_type: Option<String>,
    pub minimum_water_lod: String,
    /// Segments as (start, end) pairs.
    pub lines: Vec<(Vec2, Vec2)>,
}

impl RiverArea {
    fn parse(ctx: &mut ParsingContext, version: u16) -> Result<Self> {
        let unique_id = ctx.stream.read_u32()?;
        let name = ctx.stream.read_ascii_string()?;
        let layer_name = ctx.stream.read_ascii_string()?;
        let uv_scroll_speed = ctx.stream.read_f32()?;
        let use_additive_blending = ctx.stream.read_bool()?;
        let river_texture = ctx.stream.read_ascii_string()?;
        let noise_texture = ctx.stream.read_ascii_string()?;
        let alpha_edge_texture = ctx.stream.read_ascii_string()?;
        let sparkle_texture = ctx.stream.read_ascii_string()?;
        let color = (
            ctx.stream.read_u8()?,
            ctx.stream.read_u8()?,
            ctx.stream.read_u8()?,
        );

        let unused_alpha = ctx.stream.read_u8()?;
        ensure!(
            unused_alpha == 0,
            "expected zero river color alpha, got {}",
            unused_alpha
        );

        let alpha = ctx.stream.read_f32()?;
        let water_height = ctx.stream.read_u32()?;

        let river_type = if version >= 3 {
            Some(ctx.stream.read_ascii_string()?)
        } else {
            None
        };

        let minimum_water_lod = ctx.stream.read_ascii_string()?;

        let line_count = ctx.stream.read_u32()?;
        let mut lines = Vec::with_capacity(line_count as usize);
        for _ in 0..line_count {
            lines.push((ctx.stream.read_vec2()?, ctx.stream.read_vec2()?));
        }

        Ok(Self {
            unique_id,
            name,
            layer_name,
            uv_scroll_speed,
            use_additive_blending,
            river_texture,
            noise_texture,
            alpha_edge_texture,
            sparkle_texture,
            color,
            alpha,
            water_height,
            river_type,
            minimum_water_lod,
            lines,
        })
    }

    fn write(&self, ctx: &mut WritingContext, version: u16) -> Result<()> {
        ctx.stream.write_u32(self.unique_id);
        ctx.stream.write_ascii_string(&self.name)?;
        ctx.stream.write_ascii_string(&self.layer_name)?;
        ctx.stream.write_f32(self.uv_scroll_speed);
        ctx.stream.write_bool(self.use_additive_blending);
        ctx.stream.write_ascii_string(&self.river_texture)?;
        ctx.stream.write_ascii_string(&self.noise_texture)?;
        ctx.stream.write_ascii_string(&self.alpha_edge_texture)?;
        ctx.stream.write_ascii_string(&self.sparkle_texture)?;
        ctx.stream.write_u8(self.color.0);
        ctx.stream.write_u8(self.color.1);
        ctx.stream.write_u8(self.color.2);
        ctx.stream.write_u8(0);
        ctx.stream.write_f32(self.alpha);
        ctx.stream.write_u32(self.water_height);
        if version >= 3 {
            ctx.stream
                .write_ascii_string(self.river_type.as_deref().unwrap_or(""))?;
        }
        ctx.stream.write_ascii_string(&self.minimum_water_lod)?;
        ctx.stream.write_u32(self.lines.len() as u32);
        for (start, end) in &self.lines {
            ctx.stream.write_vec2(*start);
            ctx.stream.write_vec2(*end);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RiverAreas {
    pub version: u16,
    pub areas: Vec<RiverArea>,
}

impl RiverAreas {
    pub const ASSET_NAME: &'static str = "RiverAreas";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let count = ctx.stream.read_u32()?;
            let mut areas = Vec::with_capacity(count as usize);
            for _ in 0..count {
                areas.push(RiverArea::parse(ctx, header.version)?);
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
                area.write(ctx, self.version)?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::NameTable;
    use crate::stream::BinaryReader;

    fn cycle<T, W, P>(value: &T, write: W, parse: P) -> Result<T>
    where
        W: Fn(&T, &mut WritingContext) -> Result<()>,
        P: Fn(&mut ParsingContext) -> Result<T>,
    {
        let mut out = WritingContext::new(NameTable::new());
        write(value, &mut out)?;
        let bytes = out.stream.into_bytes();
        let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), NameTable::new());
        parse(&mut ctx)
    }

    #[test]
    fn water_settings_round_trip() -> Result<()> {
        let settings = WaterSettings {
            version: 1,
            reflection_on: true,
            reflection_plane_z: 8.25,
        };
        let back = cycle(&settings, WaterSettings::write, WaterSettings::parse)?;
        assert_eq!(back, settings);
        Ok(())
    }

    #[test]
    fn standing_water_areas_round_trip() -> Result<()> {
        let areas = StandingWaterAreas {
            version: 2,
            areas: vec![StandingWaterArea {
                unique_id: 1,
                name: "lake01".to_owned(),
                layer_name: String::new(),
                uv_scroll_speed: 0.02,
                use_adaptive_blending: false,
                bump_map_texture: "WaterRipples.tga".to_owned(),
                sky_texture: "SkyClouds.tga".to_owned(),
                points: vec![Vec2 { x: 1.0, y: 2.0 }, Vec2 { x: 3.0, y: 4.0 }],
                water_height: 10,
                fx_shader: "FxWater".to_owned(),
                depth_colors: "0,0,64".to_owned(),
            }],
        };
        let back = cycle(&areas, StandingWaterAreas::write, StandingWaterAreas::parse)?;
        assert_eq!(back, areas);
        Ok(())
    }

    #[test]
    fn wave_areas_gate_on_version() -> Result<()> {
        for version in [1u16, 2, 3, 4] {
            let areas = StandingWaveAreas {
                version,
                areas: vec![StandingWaveArea {
                    unique_id: 3,
                    name: "shore".to_owned(),
                    layer_name: String::new(),
                    uv_scroll_speed: 0.0,
                    use_adaptive_blending: true,
                    points: vec![Vec2 { x: 0.0, y: 0.0 }],
                    shape: (version < 3).then(|| WaveShapeData {
                        final_width: 20,
                        final_height: 6,
                        initial_width_fraction: 2,
                        initial_height_fraction: 2,
                        initial_velocity: 1,
                        time_to_fade: 2000,
                        time_to_compress: 1000,
                        time_offset_second_wave: 2500,
                        distance_from_shore: 5,
                        texture: "wave256.tga".to_owned(),
                    }),
                    enable_pca_wave: (version == 2).then_some(true),
                    wave_particle_fx_name: (version >= 4).then(|| "FX_Wave".to_owned()),
                }],
            };
            let back = cycle(&areas, StandingWaveAreas::write, StandingWaveAreas::parse)?;
            assert_eq!(back, areas);
        }
        Ok(())
    }

    #[test]
    fn river_areas_round_trip() -> Result<()> {
        let areas = RiverAreas {
            version: 3,
            areas: vec![RiverArea {
                unique_id: 9,
                name: "Anduin".to_owned(),
                layer_name: String::new(),
                uv_scroll_speed: 0.1,
                use_additive_blending: false,
                river_texture: "TWRiver.tga".to_owned(),
                noise_texture: "Noise.tga".to_owned(),
                alpha_edge_texture: "AlphaEdge.tga".to_owned(),
                sparkle_texture: "Sparkle.tga".to_owned(),
                color: (20, 40, 80),
                alpha: 0.8,
                water_height: 12,
                river_type: Some("Lava".to_owned()),
                minimum_water_lod: "Low".to_owned(),
                lines: vec![(Vec2 { x: 0.0, y: 0.0 }, Vec2 { x: 5.0, y: 5.0 })],
            }],
        };
        let back = cycle(&areas, RiverAreas::write, RiverAreas::parse)?;
        assert_eq!(back, areas);

        // The unused alpha byte after the colour must be zero.
        let mut out = WritingContext::new(NameTable::new());
        areas.write(&mut out)?;
        let mut bytes = out.stream.into_bytes();
        // colour bytes follow four strings and the header; find them by
        // corrupting the known zero byte directly.
        let alpha_at = bytes.iter().position(|&b| b == 20).unwrap() + 3;
        bytes[alpha_at] = 1;
        let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), NameTable::new());
        assert!(RiverAreas::parse(&mut ctx).is_err());
        Ok(())
    }
}
