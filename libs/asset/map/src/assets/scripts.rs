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

// The mission scripting tree:
//
//   PlayerScriptsList
//     ScriptList            one per player slot
//       ScriptGroup | Script   (groups nest arbitrarily)
//         Script
//           OrCondition        each holding Condition children
//           ScriptAction / ScriptActionFalse
//
// Children are dispatched by asset name in file order, and that order is
// significant: the game evaluates conditions and fires actions in sequence.
// Conditions and actions share one record layout, differing only in the
// versions at which optional fields appeared.

use crate::context::{ParsingContext, PropertyKey, WritingContext};
use crate::stream::Vec3;
use anyhow::{bail, ensure, Result};
use log::trace;

/// Script argument type ids, as stored on the wire. Kept as raw u32 so that
/// ids this list does not know about still round-trip.
pub mod argument_type {
    pub const INTEGER: u32 = 0;
    pub const REAL_NUMBER: u32 = 1;
    pub const SCRIPT_NAME: u32 = 2;
    pub const TEAM_NAME: u32 = 3;
    pub const COUNTER_NAME: u32 = 4;
    pub const FLAG_NAME: u32 = 5;
    pub const COMPARISON: u32 = 6;
    pub const WAYPOINT_NAME: u32 = 7;
    pub const BOOLEAN: u32 = 8;
    pub const TRIGGER_AREA_NAME: u32 = 9;
    pub const TEXT: u32 = 10;
    pub const PLAYER_NAME: u32 = 11;
    pub const SOUND_NAME: u32 = 12;
    pub const SUBROUTINE_NAME: u32 = 13;
    pub const UNIT_NAME: u32 = 14;
    pub const OBJECT_NAME: u32 = 15;
    pub const POSITION_COORDINATE: u32 = 16;
    pub const ANGLE: u32 = 17;
    pub const TEAM_STATE: u32 = 18;
    pub const RELATION: u32 = 19;
    pub const AI_MOOD: u32 = 20;
    pub const SPEECH_NAME: u32 = 21;
    pub const MUSIC_NAME: u32 = 22;
    pub const MOVIE_NAME: u32 = 23;
    pub const WAYPOINT_PATH_NAME: u32 = 24;
    pub const LOCALIZED_STRING_NAME: u32 = 25;
    pub const BRIDGE_NAME: u32 = 26;
    pub const UNIT_OR_STRUCTURE_KIND: u32 = 27;
    pub const ATTACK_PRIORITY_SET_NAME: u32 = 28;
    pub const RADAR_EVENT_TYPE: u32 = 29;
    pub const SPECIAL_POWER_NAME: u32 = 30;
    pub const SCIENCE_NAME: u32 = 31;
    pub const UPGRADE_NAME: u32 = 32;
    pub const UNIT_ABILITY_NAME: u32 = 33;
    pub const BOUNDARY_NAME: u32 = 34;
    pub const BUILDABILITY: u32 = 35;
    pub const SURFACE_TYPE: u32 = 36;
    pub const CAMERA_SHAKE_INTENSITY: u32 = 37;
    pub const COMMAND_BUTTON_NAME: u32 = 38;
    pub const FONT_NAME: u32 = 39;
    pub const OBJECT_STATUS: u32 = 40;
    pub const TEAM_ABILITY_NAME: u32 = 41;
    pub const SKIRMISH_APPROACH_PATH: u32 = 42;
    pub const COLOR: u32 = 43;
    pub const EMOTICON_NAME: u32 = 44;
    pub const OBJECT_PANEL_FLAG: u32 = 45;
    pub const FACTION_NAME: u32 = 46;
    pub const OBJECT_TYPE_LIST_NAME: u32 = 47;
    pub const MAP_REVEAL_NAME: u32 = 48;
    pub const SCIENCE_AVAILABILITY_NAME: u32 = 49;
    pub const EVACUATE_CONTAINER_SIDE: u32 = 50;
    pub const PERCENTAGE: u32 = 51;
    pub const PERCENTAGE2: u32 = 52;
    pub const UNIT_REFERENCE: u32 = 54;
    pub const TEAM_REFERENCE: u32 = 55;
    pub const NEAR_OR_FAR: u32 = 56;
    pub const MATH_OPERATOR: u32 = 57;
    pub const MODEL_CONDITION: u32 = 58;
    pub const AUDIO_NAME: u32 = 59;
    pub const REVERB_ROOM_TYPE: u32 = 60;
    pub const OBJECT_TYPE: u32 = 61;
    pub const HERO: u32 = 62;
    pub const EMOTION: u32 = 63;
    pub const OBJECTIVE_COMPLETE: u32 = 77;
}

/// Every argument type except position coordinates carries all three scalar
/// slots, used or not.
#[derive(Clone, Debug, PartialEq)]
pub enum ScriptArgumentValue {
    Position(Vec3),
    Scalar {
        int: i32,
        real: f32,
        string: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScriptArgument {
    pub kind: u32,
    pub value: ScriptArgumentValue,
}

impl ScriptArgument {
    fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        let kind = ctx.stream.read_u32()?;
        let value = if kind == argument_type::POSITION_COORDINATE {
            ScriptArgumentValue::Position(ctx.stream.read_vec3()?)
        } else {
            ScriptArgumentValue::Scalar {
                int: ctx.stream.read_i32()?,
                real: ctx.stream.read_f32()?,
                string: ctx.stream.read_ascii_string()?,
            }
        };
        Ok(Self { kind, value })
    }

    fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.stream.write_u32(self.kind);
        match (&self.value, self.kind == argument_type::POSITION_COORDINATE) {
            (ScriptArgumentValue::Position(v), true) => {
                ctx.stream.write_vec3(*v);
                Ok(())
            }
            (ScriptArgumentValue::Scalar { int, real, string }, false) => {
                ctx.stream.write_i32(*int);
                ctx.stream.write_f32(*real);
                ctx.stream.write_ascii_string(string)
            }
            _ => bail!(
                "script argument of type {} carries the wrong value shape",
                self.kind
            ),
        }
    }
}

/// Version gates for the shared condition/action record layout. Conditions
/// gained their optional fields two versions after actions did.
#[derive(Clone, Copy, Debug)]
pub struct ScriptEntryLayout {
    pub internal_name_version: u16,
    pub is_enabled_version: u16,
    pub has_is_inverted: bool,
}

impl ScriptEntryLayout {
    pub const ACTION: Self = Self {
        internal_name_version: 2,
        is_enabled_version: 3,
        has_is_inverted: false,
    };
    pub const CONDITION: Self = Self {
        internal_name_version: 4,
        is_enabled_version: 5,
        has_is_inverted: true,
    };
}

/// One condition or action record.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptEntry {
    pub version: u16,
    pub content_type: u32,
    pub internal_name: Option<PropertyKey>,
    pub arguments: Vec<ScriptArgument>,
    pub is_enabled: Option<bool>,
    pub is_inverted: Option<bool>,
}

impl ScriptEntry {
    pub fn parse(ctx: &mut ParsingContext, layout: ScriptEntryLayout) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let content_type = ctx.stream.read_u32()?;

            let internal_name = if header.version >= layout.internal_name_version {
                Some(ctx.parse_property_key()?)
            } else {
                None
            };

            let argument_count = ctx.stream.read_u32()?;
            let mut arguments = Vec::with_capacity(argument_count as usize);
            for _ in 0..argument_count {
                arguments.push(ScriptArgument::parse(ctx)?);
            }

            let mut is_enabled = None;
            let mut is_inverted = None;
            if header.version >= layout.is_enabled_version {
                is_enabled = Some(ctx.stream.read_bool_u32()?);
                if layout.has_is_inverted {
                    is_inverted = Some(ctx.stream.read_bool_u32()?);
                }
            }

            Ok(Self {
                version: header.version,
                content_type,
                internal_name,
                arguments,
                is_enabled,
                is_inverted,
            })
        })
    }

    pub fn write(
        &self,
        ctx: &mut WritingContext,
        asset_name: &str,
        layout: ScriptEntryLayout,
    ) -> Result<()> {
        ctx.write_asset(asset_name, self.version, |ctx| {
            ctx.stream.write_u32(self.content_type);

            if self.version >= layout.internal_name_version {
                let Some(key) = &self.internal_name else {
                    bail!("{} v{} requires an internal name key", asset_name, self.version);
                };
                ctx.write_property_key(key)?;
            }

            ctx.stream.write_u32(self.arguments.len() as u32);
            for argument in &self.arguments {
                argument.write(ctx)?;
            }

            if self.version >= layout.is_enabled_version {
                ctx.stream.write_bool_u32(self.is_enabled.unwrap_or(true));
                if layout.has_is_inverted {
                    ctx.stream.write_bool_u32(self.is_inverted.unwrap_or(false));
                }
            }
            Ok(())
        })
    }
}

/// A disjunction over `Condition` children; the script fires when any one
/// OrCondition has all of its conditions met.
#[derive(Clone, Debug, PartialEq)]
pub struct OrCondition {
    pub version: u16,
    pub conditions: Vec<ScriptEntry>,
}

impl OrCondition {
    pub const ASSET_NAME: &'static str = "OrCondition";
    pub const CONDITION_NAME: &'static str = "Condition";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let mut conditions = Vec::new();
            while ctx.stream.position() < header.end {
                let name = ctx.parse_asset_name()?;
                ensure!(
                    name == Self::CONDITION_NAME,
                    "expected Condition asset in OrCondition, got {}",
                    name
                );
                conditions.push(ScriptEntry::parse(ctx, ScriptEntryLayout::CONDITION)?);
            }
            Ok(Self {
                version: header.version,
                conditions,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            for condition in &self.conditions {
                ctx.write_asset_name(Self::CONDITION_NAME)?;
                condition.write(ctx, Self::CONDITION_NAME, ScriptEntryLayout::CONDITION)?;
            }
            Ok(())
        })
    }
}

const SEQUENTIAL_MODES: [&str; 3] = ["ALL", "Planning", "X"];

#[derive(Clone, Debug, PartialEq)]
pub struct Script {
    pub version: u16,
    pub name: String,
    pub comment: String,
    pub conditions_comment: String,
    pub actions_comment: String,
    pub is_active: bool,
    pub deactivate_upon_success: bool,
    pub active_in_easy: bool,
    pub active_in_medium: bool,
    pub active_in_hard: bool,
    pub is_subroutine: bool,
    /// Version >= 2.
    pub evaluation_interval: Option<u32>,
    /// Version == 5 only.
    pub uses_evaluation_interval_type: bool,
    pub evaluation_interval_type: u32,
    /// Version >= 3.
    pub actions_fire_sequentially: Option<bool>,
    pub loop_actions: Option<bool>,
    pub loop_count: Option<i32>,
    pub sequential_target_type: Option<bool>,
    pub sequential_target_name: Option<String>,
    /// Version >= 4; one of "ALL", "Planning", "X".
    pub unknown: Option<String>,
    /// Version >= 6.
    pub unknown2: Option<i32>,
    pub or_conditions: Vec<OrCondition>,
    pub actions_if_true: Vec<ScriptEntry>,
    pub actions_if_false: Vec<ScriptEntry>,
}

impl Script {
    pub const ASSET_NAME: &'static str = "Script";
    pub const ACTION_NAME: &'static str = "ScriptAction";
    pub const ACTION_FALSE_NAME: &'static str = "ScriptActionFalse";

    const DEFAULT_EVALUATION_INTERVAL_TYPE: u32 = 6;

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let name = ctx.stream.read_ascii_string()?;
            trace!("script {:?} v{}", name, header.version);
            let comment = ctx.stream.read_ascii_string()?;
            let conditions_comment = ctx.stream.read_ascii_string()?;
            let actions_comment = ctx.stream.read_ascii_string()?;

            let is_active = ctx.stream.read_bool()?;
            let deactivate_upon_success = ctx.stream.read_bool()?;
            let active_in_easy = ctx.stream.read_bool()?;
            let active_in_medium = ctx.stream.read_bool()?;
            let active_in_hard = ctx.stream.read_bool()?;
            let is_subroutine = ctx.stream.read_bool()?;

            let mut evaluation_interval = None;
            let mut uses_evaluation_interval_type = false;
            let mut evaluation_interval_type = Self::DEFAULT_EVALUATION_INTERVAL_TYPE;
            if header.version >= 2 {
                evaluation_interval = Some(ctx.stream.read_u32()?);
                if header.version == 5 {
                    uses_evaluation_interval_type = ctx.stream.read_bool()?;
                    evaluation_interval_type = ctx.stream.read_u32()?;
                }
            }

            let mut actions_fire_sequentially = None;
            let mut loop_actions = None;
            let mut loop_count = None;
            let mut sequential_target_type = None;
            let mut sequential_target_name = None;
            if header.version >= 3 {
                actions_fire_sequentially = Some(ctx.stream.read_bool()?);
                loop_actions = Some(ctx.stream.read_bool()?);
                loop_count = Some(ctx.stream.read_i32()?);
                sequential_target_type = Some(ctx.stream.read_bool()?);
                sequential_target_name = Some(ctx.stream.read_ascii_string()?);
            }

            let mut unknown = None;
            if header.version >= 4 {
                let value = ctx.stream.read_ascii_string()?;
                ensure!(
                    SEQUENTIAL_MODES.contains(&value.as_str()),
                    "unrecognised script mode string: {:?}",
                    value
                );
                unknown = Some(value);
            }

            let mut unknown2 = None;
            if header.version >= 6 {
                unknown2 = Some(ctx.stream.read_i32()?);
                let unknown3 = ctx.stream.read_u16()?;
                ensure!(unknown3 == 0, "expected zero script tail, got {}", unknown3);
            }

            let mut or_conditions = Vec::new();
            let mut actions_if_true = Vec::new();
            let mut actions_if_false = Vec::new();
            while ctx.stream.position() < header.end {
                let child = ctx.parse_asset_name()?;
                match child.as_str() {
                    OrCondition::ASSET_NAME => or_conditions.push(OrCondition::parse(ctx)?),
                    Self::ACTION_NAME => {
                        actions_if_true.push(ScriptEntry::parse(ctx, ScriptEntryLayout::ACTION)?)
                    }
                    Self::ACTION_FALSE_NAME => {
                        actions_if_false.push(ScriptEntry::parse(ctx, ScriptEntryLayout::ACTION)?)
                    }
                    _ => bail!("unexpected asset in Script: {}", child),
                }
            }

            Ok(Self {
                version: header.version,
                name,
                comment,
                conditions_comment,
                actions_comment,
                is_active,
                deactivate_upon_success,
                active_in_easy,
                active_in_medium,
                active_in_hard,
                is_subroutine,
                evaluation_interval,
                uses_evaluation_interval_type,
                evaluation_interval_type,
                actions_fire_sequentially,
                loop_actions,
                loop_count,
                sequential_target_type,
                sequential_target_name,
                unknown,
                unknown2,
                or_conditions,
                actions_if_true,
                actions_if_false,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.stream.write_ascii_string(&self.name)?;
            ctx.stream.write_ascii_string(&self.comment)?;
            ctx.stream.write_ascii_string(&self.conditions_comment)?;
            ctx.stream.write_ascii_string(&self.actions_comment)?;

            ctx.stream.write_bool(self.is_active);
            ctx.stream.write_bool(self.deactivate_upon_success);
            ctx.stream.write_bool(self.active_in_easy);
            ctx.stream.write_bool(self.active_in_medium);
            ctx.stream.write_bool(self.active_in_hard);
            ctx.stream.write_bool(self.is_subroutine);

            if self.version >= 2 {
                ctx.stream.write_u32(self.evaluation_interval.unwrap_or(0));
                if self.version == 5 {
                    ctx.stream.write_bool(self.uses_evaluation_interval_type);
                    ctx.stream.write_u32(self.evaluation_interval_type);
                }
            }

            if self.version >= 3 {
                ctx.stream.write_bool(self.actions_fire_sequentially.unwrap_or(false));
                ctx.stream.write_bool(self.loop_actions.unwrap_or(false));
                ctx.stream.write_i32(self.loop_count.unwrap_or(0));
                ctx.stream.write_bool(self.sequential_target_type.unwrap_or(false));
                ctx.stream
                    .write_ascii_string(self.sequential_target_name.as_deref().unwrap_or(""))?;
            }

            if self.version >= 4 {
                let value = self.unknown.as_deref().unwrap_or("ALL");
                ensure!(
                    SEQUENTIAL_MODES.contains(&value),
                    "unrecognised script mode string: {:?}",
                    value
                );
                ctx.stream.write_ascii_string(value)?;
            }

            if self.version >= 6 {
                ctx.stream.write_i32(self.unknown2.unwrap_or(0));
                ctx.stream.write_u16(0);
            }

            for or_condition in &self.or_conditions {
                ctx.write_asset_name(OrCondition::ASSET_NAME)?;
                or_condition.write(ctx)?;
            }
            for action in &self.actions_if_true {
                ctx.write_asset_name(Self::ACTION_NAME)?;
                action.write(ctx, Self::ACTION_NAME, ScriptEntryLayout::ACTION)?;
            }
            for action in &self.actions_if_false {
                ctx.write_asset_name(Self::ACTION_FALSE_NAME)?;
                action.write(ctx, Self::ACTION_FALSE_NAME, ScriptEntryLayout::ACTION)?;
            }
            Ok(())
        })
    }
}

/// A group's children are an ordered mix of nested groups and scripts.
#[derive(Clone, Debug, PartialEq)]
pub enum ScriptItem {
    Group(ScriptGroup),
    Script(Script),
}

impl ScriptItem {
    fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        let name = ctx.parse_asset_name()?;
        match name.as_str() {
            ScriptGroup::ASSET_NAME => Ok(Self::Group(ScriptGroup::parse(ctx)?)),
            Script::ASSET_NAME => Ok(Self::Script(Script::parse(ctx)?)),
            _ => bail!("expected ScriptGroup or Script asset, got {}", name),
        }
    }

    fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        match self {
            Self::Group(group) => {
                ctx.write_asset_name(ScriptGroup::ASSET_NAME)?;
                group.write(ctx)
            }
            Self::Script(script) => {
                ctx.write_asset_name(Script::ASSET_NAME)?;
                script.write(ctx)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScriptGroup {
    pub version: u16,
    pub name: String,
    pub is_active: bool,
    pub is_subroutine: bool,
    pub items: Vec<ScriptItem>,
}

impl ScriptGroup {
    pub const ASSET_NAME: &'static str = "ScriptGroup";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let name = ctx.stream.read_ascii_string()?;
            let is_active = ctx.stream.read_bool()?;
            let is_subroutine = ctx.stream.read_bool()?;
            let mut items = Vec::new();
            while ctx.stream.position() < header.end {
                items.push(ScriptItem::parse(ctx)?);
            }
            Ok(Self {
                version: header.version,
                name,
                is_active,
                is_subroutine,
                items,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.stream.write_ascii_string(&self.name)?;
            ctx.stream.write_bool(self.is_active);
            ctx.stream.write_bool(self.is_subroutine);
            for item in &self.items {
                item.write(ctx)?;
            }
            Ok(())
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScriptList {
    pub version: u16,
    pub items: Vec<ScriptItem>,
}

impl ScriptList {
    pub const ASSET_NAME: &'static str = "ScriptList";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            ensure!(
                header.version == 1,
                "unexpected ScriptList version: {}",
                header.version
            );
            let mut items = Vec::new();
            while ctx.stream.position() < header.end {
                items.push(ScriptItem::parse(ctx)?);
            }
            Ok(Self {
                version: header.version,
                items,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            for item in &self.items {
                item.write(ctx)?;
            }
            Ok(())
        })
    }
}

/// One ScriptList per player slot, in slot order.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerScriptsList {
    pub version: u16,
    pub script_lists: Vec<ScriptList>,
}

impl PlayerScriptsList {
    pub const ASSET_NAME: &'static str = "PlayerScriptsList";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let mut script_lists = Vec::new();
            while ctx.stream.position() < header.end {
                let name = ctx.parse_asset_name()?;
                ensure!(
                    name == ScriptList::ASSET_NAME,
                    "expected {} asset in PlayerScriptsList, got {}",
                    ScriptList::ASSET_NAME,
                    name
                );
                script_lists.push(ScriptList::parse(ctx)?);
            }
            Ok(Self {
                version: header.version,
                script_lists,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            for list in &self.script_lists {
                ctx.write_asset_name(ScriptList::ASSET_NAME)?;
                list.write(ctx)?;
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

    fn condition(n: i32) -> ScriptEntry {
        ScriptEntry {
            version: 5,
            content_type: 30 + n as u32,
            internal_name: Some(PropertyKey {
                kind: crate::context::PropertyKind::AsciiString,
                name_index: 2,
                name: Some("waitCondition".to_owned()),
            }),
            arguments: vec![ScriptArgument {
                kind: argument_type::COUNTER_NAME,
                value: ScriptArgumentValue::Scalar {
                    int: n,
                    real: 0.0,
                    string: format!("counter{n}"),
                },
            }],
            is_enabled: Some(true),
            is_inverted: Some(n % 2 == 0),
        }
    }

    fn action(name: &str) -> ScriptEntry {
        ScriptEntry {
            version: 3,
            content_type: 12,
            internal_name: Some(PropertyKey {
                kind: crate::context::PropertyKind::AsciiString,
                name_index: 3,
                name: Some("moveAction".to_owned()),
            }),
            arguments: vec![
                ScriptArgument {
                    kind: argument_type::POSITION_COORDINATE,
                    value: ScriptArgumentValue::Position(Vec3 { x: 1.0, y: 2.0, z: 3.0 }),
                },
                ScriptArgument {
                    kind: argument_type::TEAM_NAME,
                    value: ScriptArgumentValue::Scalar {
                        int: 0,
                        real: 0.0,
                        string: name.to_owned(),
                    },
                },
            ],
            is_enabled: Some(true),
            is_inverted: None,
        }
    }

    fn names() -> NameTable {
        let mut t = NameTable::new();
        for n in [
            PlayerScriptsList::ASSET_NAME,
            "waitCondition",
            "moveAction",
            ScriptList::ASSET_NAME,
            ScriptGroup::ASSET_NAME,
            Script::ASSET_NAME,
            OrCondition::ASSET_NAME,
            OrCondition::CONDITION_NAME,
            Script::ACTION_NAME,
            Script::ACTION_FALSE_NAME,
        ] {
            t.intern(n);
        }
        t
    }

    #[test]
    fn nested_tree_preserves_child_order() -> Result<()> {
        let script = Script {
            version: 2,
            name: "Intro".to_owned(),
            comment: String::new(),
            conditions_comment: String::new(),
            actions_comment: "fires once".to_owned(),
            is_active: true,
            deactivate_upon_success: true,
            active_in_easy: true,
            active_in_medium: true,
            active_in_hard: false,
            is_subroutine: false,
            evaluation_interval: Some(0),
            uses_evaluation_interval_type: false,
            evaluation_interval_type: 6,
            actions_fire_sequentially: None,
            loop_actions: None,
            loop_count: None,
            sequential_target_type: None,
            sequential_target_name: None,
            unknown: None,
            unknown2: None,
            or_conditions: vec![OrCondition {
                version: 1,
                conditions: vec![condition(1), condition(2)],
            }],
            actions_if_true: vec![action("teamAlpha"), action("teamBeta")],
            actions_if_false: vec![action("teamGamma")],
        };
        let list = PlayerScriptsList {
            version: 1,
            script_lists: vec![ScriptList {
                version: 1,
                items: vec![ScriptItem::Group(ScriptGroup {
                    version: 1,
                    name: "Player 1".to_owned(),
                    is_active: true,
                    is_subroutine: false,
                    items: vec![ScriptItem::Script(script)],
                })],
            }],
        };

        let mut out = WritingContext::new(names());
        list.write(&mut out)?;
        let bytes = out.stream.into_bytes();

        let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), out.names.clone());
        let back = PlayerScriptsList::parse(&mut ctx)?;
        assert_eq!(back, list);

        let mut out2 = WritingContext::new(names());
        back.write(&mut out2)?;
        let mut expected = WritingContext::new(names());
        list.write(&mut expected)?;
        assert_eq!(out2.stream.into_bytes(), expected.stream.into_bytes());
        Ok(())
    }

    #[test]
    fn unknown_argument_types_round_trip() -> Result<()> {
        let entry = ScriptEntry {
            version: 1,
            content_type: 99,
            internal_name: None,
            arguments: vec![ScriptArgument {
                kind: 200, // not in the known id list
                value: ScriptArgumentValue::Scalar {
                    int: -1,
                    real: 0.5,
                    string: "whatever".to_owned(),
                },
            }],
            is_enabled: None,
            is_inverted: None,
        };
        let mut out = WritingContext::new(NameTable::new());
        entry.write(&mut out, Script::ACTION_NAME, ScriptEntryLayout::ACTION)?;
        let bytes = out.stream.into_bytes();
        let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), NameTable::new());
        let back = ScriptEntry::parse(&mut ctx, ScriptEntryLayout::ACTION)?;
        assert_eq!(back, entry);
        Ok(())
    }

    #[test]
    fn version_6_scripts_check_their_tail() -> Result<()> {
        let script = Script {
            version: 6,
            name: "BfME".to_owned(),
            comment: String::new(),
            conditions_comment: String::new(),
            actions_comment: String::new(),
            is_active: true,
            deactivate_upon_success: false,
            active_in_easy: true,
            active_in_medium: true,
            active_in_hard: true,
            is_subroutine: false,
            evaluation_interval: Some(30),
            uses_evaluation_interval_type: false,
            evaluation_interval_type: 6,
            actions_fire_sequentially: Some(false),
            loop_actions: Some(false),
            loop_count: Some(0),
            sequential_target_type: Some(false),
            sequential_target_name: Some(String::new()),
            unknown: Some("Planning".to_owned()),
            unknown2: Some(-1),
            or_conditions: Vec::new(),
            actions_if_true: Vec::new(),
            actions_if_false: Vec::new(),
        };
        let mut out = WritingContext::new(names());
        script.write(&mut out)?;
        let bytes = out.stream.into_bytes();
        let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), out.names.clone());
        let back = Script::parse(&mut ctx)?;
        assert_eq!(back, script);
        Ok(())
    }
}
