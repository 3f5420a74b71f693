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

// Campaign metadata (hotspots, objectives) and multiplayer start slots.

use crate::context::{ParsingContext, WritingContext};
use anyhow::{bail, ensure, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct MissionHotSpot {
    pub id: String,
    pub title: String,
    pub description: String,
}

impl MissionHotSpot {
    fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        Ok(Self {
            id: ctx.stream.read_ascii_string()?,
            title: ctx.stream.read_ascii_string()?,
            description: ctx.stream.read_ascii_string()?,
        })
    }

    fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.stream.write_ascii_string(&self.id)?;
        ctx.stream.write_ascii_string(&self.title)?;
        ctx.stream.write_ascii_string(&self.description)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MissionHotSpots {
    pub version: u16,
    pub hotspots: Vec<MissionHotSpot>,
}

impl MissionHotSpots {
    pub const ASSET_NAME: &'static str = "MissionHotSpots";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let count = ctx.stream.read_u32()?;
            let mut hotspots = Vec::with_capacity(count as usize);
            for _ in 0..count {
                hotspots.push(MissionHotSpot::parse(ctx)?);
            }
            Ok(Self {
                version: header.version,
                hotspots,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.stream.write_u32(self.hotspots.len() as u32);
            for hotspot in &self.hotspots {
                hotspot.write(ctx)?;
            }
            Ok(())
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissionObjectiveType {
    Attack = 0,
    Unknown1 = 1,
    Unknown2 = 2,
    Build = 3,
    Capture = 4,
    Protect = 5,
}

impl MissionObjectiveType {
    fn from_u32(v: u32) -> Result<Self> {
        Ok(match v {
            0 => Self::Attack,
            1 => Self::Unknown1,
            2 => Self::Unknown2,
            3 => Self::Build,
            4 => Self::Capture,
            5 => Self::Protect,
            _ => bail!("invalid mission objective type: {}", v),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MissionObjective {
    pub id: String,
    pub text: String,
    pub description: String,
    pub is_bonus_objective: bool,
    pub objective_type: MissionObjectiveType,
}

impl MissionObjective {
    fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        Ok(Self {
            id: ctx.stream.read_ascii_string()?,
            text: ctx.stream.read_ascii_string()?,
            description: ctx.stream.read_ascii_string()?,
            is_bonus_objective: ctx.stream.read_bool()?,
            objective_type: MissionObjectiveType::from_u32(ctx.stream.read_u32()?)?,
        })
    }

    fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.stream.write_ascii_string(&self.id)?;
        ctx.stream.write_ascii_string(&self.text)?;
        ctx.stream.write_ascii_string(&self.description)?;
        ctx.stream.write_bool(self.is_bonus_objective);
        ctx.stream.write_u32(self.objective_type as u32);
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MissionObjectives {
    pub version: u16,
    pub objectives: Vec<MissionObjective>,
}

impl MissionObjectives {
    pub const ASSET_NAME: &'static str = "MissionObjectives";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let count = ctx.stream.read_u32()?;
            let mut objectives = Vec::with_capacity(count as usize);
            for _ in 0..count {
                objectives.push(MissionObjective::parse(ctx)?);
            }
            Ok(Self {
                version: header.version,
                objectives,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.stream.write_u32(self.objectives.len() as u32);
            for objective in &self.objectives {
                objective.write(ctx)?;
            }
            Ok(())
        })
    }
}

/// One multiplayer start slot; a nested asset of MPPositionList.
#[derive(Clone, Debug, PartialEq)]
pub struct MPPosition {
    pub version: u16,
    pub is_human: bool,
    pub is_computer: bool,
    /// Version > 0.
    pub load_ai_script: bool,
    pub team: u32,
    /// Version > 0.
    pub side_restrictions: Vec<String>,
}

impl MPPosition {
    pub const ASSET_NAME: &'static str = "MPPositionInfo";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let is_human = ctx.stream.read_bool()?;
            let is_computer = ctx.stream.read_bool()?;
            let load_ai_script = if header.version > 0 {
                ctx.stream.read_bool()?
            } else {
                false
            };
            let team = ctx.stream.read_u32()?;
            let mut side_restrictions = Vec::new();
            if header.version > 0 {
                let count = ctx.stream.read_u32()?;
                for _ in 0..count {
                    side_restrictions.push(ctx.stream.read_ascii_string()?);
                }
            }
            Ok(Self {
                version: header.version,
                is_human,
                is_computer,
                load_ai_script,
                team,
                side_restrictions,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.stream.write_bool(self.is_human);
            ctx.stream.write_bool(self.is_computer);
            if self.version > 0 {
                ctx.stream.write_bool(self.load_ai_script);
            }
            ctx.stream.write_u32(self.team);
            if self.version > 0 {
                ctx.stream.write_u32(self.side_restrictions.len() as u32);
                for restriction in &self.side_restrictions {
                    ctx.stream.write_ascii_string(restriction)?;
                }
            }
            Ok(())
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MPPositionList {
    pub version: u16,
    pub positions: Vec<MPPosition>,
}

impl MPPositionList {
    pub const ASSET_NAME: &'static str = "MPPositionList";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let mut positions = Vec::new();
            while ctx.stream.position() < header.end {
                let name = ctx.parse_asset_name()?;
                ensure!(
                    name == MPPosition::ASSET_NAME,
                    "expected {} asset in MPPositionList, got {}",
                    MPPosition::ASSET_NAME,
                    name
                );
                positions.push(MPPosition::parse(ctx)?);
            }
            Ok(Self {
                version: header.version,
                positions,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            for position in &self.positions {
                ctx.write_asset_name(MPPosition::ASSET_NAME)?;
                position.write(ctx)?;
            }
            Ok(())
        })
    }
}
