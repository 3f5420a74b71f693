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

// Player sides, teams and per-faction base build-out lists. Two of these
// assets change shape depending on whether an AssetList appeared earlier in
// the container: with one present, faction names are inline strings and each
// build-list entry gains an extra flag; without one, faction names are
// property-key references into the name table.

use crate::context::{ParsingContext, Property, PropertyKey, WritingContext};
use crate::stream::Vec3;
use anyhow::{bail, ensure, Result};
use log::trace;

/// An inline property bag describing one team.
#[derive(Clone, Debug, PartialEq)]
pub struct Team {
    pub properties: Vec<Property>,
}

impl Team {
    fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        Ok(Self {
            properties: ctx.parse_properties()?,
        })
    }

    fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_properties(&self.properties)
    }
}

/// Standalone team list; maps from SidesList version 5 on store their teams
/// here instead of inside SidesList.
#[derive(Clone, Debug, PartialEq)]
pub struct Teams {
    pub version: u16,
    pub teams: Vec<Team>,
}

impl Teams {
    pub const ASSET_NAME: &'static str = "Teams";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let count = ctx.stream.read_u32()?;
            let mut teams = Vec::with_capacity(count as usize);
            for _ in 0..count {
                teams.push(Team::parse(ctx)?);
            }
            Ok(Self {
                version: header.version,
                teams,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.stream.write_u32(self.teams.len() as u32);
            for team in &self.teams {
                team.write(ctx)?;
            }
            Ok(())
        })
    }
}

/// One pre-placed structure in a faction's base build-out.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildListInfo {
    pub build_name: String,
    pub template_name: String,
    pub location: Vec3,
    pub angle: f32,
    pub is_initially_built: bool,
    /// Version >= 6, AssetList present only.
    pub unknown: Option<bool>,
    pub num_rebuilds: u32,
    pub script: String,
    pub health: i32,
    pub whiner: bool,
    pub unsellable: bool,
    pub repairable: bool,
}

impl BuildListInfo {
    fn parse(ctx: &mut ParsingContext, version: u16, has_asset_list: bool) -> Result<Self> {
        let build_name = ctx.stream.read_ascii_string()?;
        let template_name = ctx.stream.read_ascii_string()?;
        let location = ctx.stream.read_vec3()?;
        let angle = ctx.stream.read_f32()?;
        let is_initially_built = ctx.stream.read_bool()?;

        let unknown = if version >= 6 && has_asset_list {
            Some(ctx.stream.read_bool()?)
        } else {
            None
        };

        let num_rebuilds = ctx.stream.read_u32()?;
        let script = ctx.stream.read_ascii_string()?;
        let health = ctx.stream.read_i32()?;
        let whiner = ctx.stream.read_bool()?;
        let unsellable = ctx.stream.read_bool()?;
        let repairable = ctx.stream.read_bool()?;

        trace!("build list item {:?} ({})", build_name, template_name);
        Ok(Self {
            build_name,
            template_name,
            location,
            angle,
            is_initially_built,
            unknown,
            num_rebuilds,
            script,
            health,
            whiner,
            unsellable,
            repairable,
        })
    }

    fn write(&self, ctx: &mut WritingContext, version: u16, has_asset_list: bool) -> Result<()> {
        ctx.stream.write_ascii_string(&self.build_name)?;
        ctx.stream.write_ascii_string(&self.template_name)?;
        ctx.stream.write_vec3(self.location);
        ctx.stream.write_f32(self.angle);
        ctx.stream.write_bool(self.is_initially_built);

        if version >= 6 && has_asset_list {
            let Some(unknown) = self.unknown else {
                bail!("build list item {:?} is missing its AssetList-mode flag", self.build_name);
            };
            ctx.stream.write_bool(unknown);
        }

        ctx.stream.write_u32(self.num_rebuilds);
        ctx.stream.write_ascii_string(&self.script)?;
        ctx.stream.write_i32(self.health);
        ctx.stream.write_bool(self.whiner);
        ctx.stream.write_bool(self.unsellable);
        ctx.stream.write_bool(self.repairable);
        Ok(())
    }
}

/// How a build list names its owning faction; which form is on the wire
/// depends on whether the container carries an AssetList.
#[derive(Clone, Debug, PartialEq)]
pub enum FactionName {
    Inline(String),
    Key(PropertyKey),
}

#[derive(Clone, Debug, PartialEq)]
pub struct BuildList {
    pub faction: FactionName,
    pub items: Vec<BuildListInfo>,
}

impl BuildList {
    fn parse(ctx: &mut ParsingContext, version: u16, has_asset_list: bool) -> Result<Self> {
        let faction = if has_asset_list {
            FactionName::Inline(ctx.stream.read_ascii_string()?)
        } else {
            FactionName::Key(ctx.parse_property_key()?)
        };

        let count = ctx.stream.read_u32()?;
        let mut items = Vec::with_capacity(count as usize);
        for _ in 0..count {
            items.push(BuildListInfo::parse(ctx, version, has_asset_list)?);
        }
        Ok(Self { faction, items })
    }

    fn write(&self, ctx: &mut WritingContext, version: u16, has_asset_list: bool) -> Result<()> {
        match (&self.faction, has_asset_list) {
            (FactionName::Inline(name), true) => ctx.stream.write_ascii_string(name)?,
            (FactionName::Key(key), false) => ctx.write_property_key(key)?,
            (FactionName::Inline(_), false) => {
                bail!("build list faction needs a property key without an AssetList")
            }
            (FactionName::Key(_), true) => {
                bail!("build list faction needs an inline name with an AssetList")
            }
        }
        ctx.stream.write_u32(self.items.len() as u32);
        for item in &self.items {
            item.write(ctx, version, has_asset_list)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BuildLists {
    pub version: u16,
    pub build_lists: Vec<BuildList>,
}

impl BuildLists {
    pub const ASSET_NAME: &'static str = "BuildLists";

    pub fn parse(ctx: &mut ParsingContext, has_asset_list: bool) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let count = ctx.stream.read_u32()?;
            let mut build_lists = Vec::with_capacity(count as usize);
            for _ in 0..count {
                build_lists.push(BuildList::parse(ctx, header.version, has_asset_list)?);
            }
            Ok(Self {
                version: header.version,
                build_lists,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext, has_asset_list: bool) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.stream.write_u32(self.build_lists.len() as u32);
            for list in &self.build_lists {
                list.write(ctx, self.version, has_asset_list)?;
            }
            Ok(())
        })
    }
}

/// A player slot: its property bag plus its initial base build-out.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub properties: Vec<Property>,
    pub build_list_items: Vec<BuildListInfo>,
}

impl Player {
    fn parse(ctx: &mut ParsingContext, version: u16, has_asset_list: bool) -> Result<Self> {
        let properties = ctx.parse_properties()?;
        let count = ctx.stream.read_u32()?;
        let mut build_list_items = Vec::with_capacity(count as usize);
        for _ in 0..count {
            build_list_items.push(BuildListInfo::parse(ctx, version, has_asset_list)?);
        }
        Ok(Self {
            properties,
            build_list_items,
        })
    }

    fn write(&self, ctx: &mut WritingContext, version: u16, has_asset_list: bool) -> Result<()> {
        ctx.write_properties(&self.properties)?;
        ctx.stream.write_u32(self.build_list_items.len() as u32);
        for item in &self.build_list_items {
            item.write(ctx, version, has_asset_list)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SidesList {
    pub version: u16,
    /// Version >= 6.
    pub unknown1: bool,
    pub players: Vec<Player>,
    /// Versions 2..5 store teams inline; later maps use the Teams asset.
    pub teams: Vec<Team>,
}

impl SidesList {
    pub const ASSET_NAME: &'static str = "SidesList";

    pub fn parse(ctx: &mut ParsingContext, has_asset_list: bool) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let unknown1 = if header.version >= 6 {
                ctx.stream.read_bool()?
            } else {
                false
            };

            let player_count = ctx.stream.read_u32()?;
            let mut players = Vec::with_capacity(player_count as usize);
            for _ in 0..player_count {
                players.push(Player::parse(ctx, header.version, has_asset_list)?);
            }

            let mut teams = Vec::new();
            if header.version < 5 {
                if header.version >= 2 {
                    let team_count = ctx.stream.read_u32()?;
                    for _ in 0..team_count {
                        teams.push(Team::parse(ctx)?);
                    }
                }
                ensure!(
                    ctx.stream.position() == header.end,
                    "unexpected trailing data in SidesList"
                );
            }

            Ok(Self {
                version: header.version,
                unknown1,
                players,
                teams,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext, has_asset_list: bool) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            if self.version >= 6 {
                ctx.stream.write_bool(self.unknown1);
            }

            ctx.stream.write_u32(self.players.len() as u32);
            for player in &self.players {
                player.write(ctx, self.version, has_asset_list)?;
            }

            if (2..5).contains(&self.version) {
                ctx.stream.write_u32(self.teams.len() as u32);
                for team in &self.teams {
                    team.write(ctx)?;
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{NameTable, PropertyKind, PropertyValue};
    use crate::stream::BinaryReader;

    fn item(unknown: Option<bool>) -> BuildListInfo {
        BuildListInfo {
            build_name: "bldg 01".to_owned(),
            template_name: "AmericaBarracks".to_owned(),
            location: Vec3 { x: 100.0, y: 50.0, z: 0.0 },
            angle: 0.5,
            is_initially_built: true,
            unknown,
            num_rebuilds: 3,
            script: String::new(),
            health: 100,
            whiner: false,
            unsellable: false,
            repairable: true,
        }
    }

    #[test]
    fn build_lists_with_an_asset_list_use_inline_names() -> Result<()> {
        let lists = BuildLists {
            version: 6,
            build_lists: vec![BuildList {
                faction: FactionName::Inline("FactionAmerica".to_owned()),
                items: vec![item(Some(false))],
            }],
        };
        let mut out = WritingContext::new(NameTable::new());
        lists.write(&mut out, true)?;
        let bytes = out.stream.into_bytes();
        let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), out.names.clone());
        let back = BuildLists::parse(&mut ctx, true)?;
        assert_eq!(back, lists);
        Ok(())
    }

    #[test]
    fn build_lists_without_an_asset_list_use_property_keys() -> Result<()> {
        let mut names = NameTable::new();
        names.intern("FactionChina");
        let lists = BuildLists {
            version: 6,
            build_lists: vec![BuildList {
                faction: FactionName::Key(PropertyKey {
                    kind: PropertyKind::AsciiString,
                    name_index: 1,
                    name: Some("FactionChina".to_owned()),
                }),
                items: vec![item(None)],
            }],
        };
        let mut out = WritingContext::new(names);
        lists.write(&mut out, false)?;
        let bytes = out.stream.into_bytes();
        let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), out.names.clone());
        let back = BuildLists::parse(&mut ctx, false)?;
        assert_eq!(back, lists);

        // Writing the key form in AssetList mode must be refused.
        let mut out = WritingContext::new(NameTable::new());
        assert!(lists.write(&mut out, true).is_err());
        Ok(())
    }

    #[test]
    fn sides_list_round_trips_inline_teams() -> Result<()> {
        let sides = SidesList {
            version: 3,
            unknown1: false,
            players: vec![Player {
                properties: vec![Property {
                    name: "playerName".to_owned(),
                    value: PropertyValue::AsciiString("player0".to_owned()),
                }],
                build_list_items: vec![item(None)],
            }],
            teams: vec![Team {
                properties: vec![Property {
                    name: "teamName".to_owned(),
                    value: PropertyValue::AsciiString("teamAlpha".to_owned()),
                }],
            }],
        };
        let mut out = WritingContext::new(NameTable::new());
        sides.write(&mut out, false)?;
        let bytes = out.stream.into_bytes();
        let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), out.names.clone());
        let back = SidesList::parse(&mut ctx, false)?;
        assert_eq!(back, sides);
        Ok(())
    }

    #[test]
    fn version_6_sides_list_has_a_leading_flag() -> Result<()> {
        let sides = SidesList {
            version: 6,
            unknown1: true,
            players: Vec::new(),
            teams: Vec::new(),
        };
        let mut out = WritingContext::new(NameTable::new());
        sides.write(&mut out, true)?;
        let bytes = out.stream.into_bytes();
        // Header (6 bytes), then the flag byte, then the player count.
        assert_eq!(bytes[6], 1);
        let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), NameTable::new());
        let back = SidesList::parse(&mut ctx, true)?;
        assert_eq!(back, sides);
        Ok(())
    }
}
