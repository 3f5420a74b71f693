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

// Bookmarked cameras and scripted camera animations. Animation frame layout
// is selected by a FourCC tag per animation ("free" or "look"); both the tag
// and each frame's interpolation tag are stored byte-reversed on disk.

use crate::context::{ParsingContext, WritingContext};
use crate::stream::{Vec3, Vec4};
use anyhow::{bail, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct NamedCamera {
    pub look_at_point: Vec3,
    pub name: String,
    pub pitch: f32,
    pub roll: f32,
    pub yaw: f32,
    pub zoom: f32,
    pub fov: f32,
    pub unknown: f32,
}

impl NamedCamera {
    fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        Ok(Self {
            look_at_point: ctx.stream.read_vec3()?,
            name: ctx.stream.read_ascii_string()?,
            pitch: ctx.stream.read_f32()?,
            roll: ctx.stream.read_f32()?,
            yaw: ctx.stream.read_f32()?,
            zoom: ctx.stream.read_f32()?,
            fov: ctx.stream.read_f32()?,
            unknown: ctx.stream.read_f32()?,
        })
    }

    fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.stream.write_vec3(self.look_at_point);
        ctx.stream.write_ascii_string(&self.name)?;
        ctx.stream.write_f32(self.pitch);
        ctx.stream.write_f32(self.roll);
        ctx.stream.write_f32(self.yaw);
        ctx.stream.write_f32(self.zoom);
        ctx.stream.write_f32(self.fov);
        ctx.stream.write_f32(self.unknown);
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NamedCameras {
    pub version: u16,
    pub cameras: Vec<NamedCamera>,
}

impl NamedCameras {
    pub const ASSET_NAME: &'static str = "NamedCameras";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let count = ctx.stream.read_u32()?;
            let mut cameras = Vec::with_capacity(count as usize);
            for _ in 0..count {
                cameras.push(NamedCamera::parse(ctx)?);
            }
            Ok(Self {
                version: header.version,
                cameras,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.stream.write_u32(self.cameras.len() as u32);
            for camera in &self.cameras {
                camera.write(ctx)?;
            }
            Ok(())
        })
    }
}

/// Frame interpolation curve, stored as a reversed FourCC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterpolationType {
    CatmullRom,
    Linear,
}

impl InterpolationType {
    fn tag(self) -> &'static str {
        match self {
            Self::CatmullRom => "catm",
            Self::Linear => "line",
        }
    }

    fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        let tag = ctx.stream.read_four_cc_reversed()?;
        Ok(match tag.as_str() {
            "catm" => Self::CatmullRom,
            "line" => Self::Linear,
            _ => bail!("invalid interpolation type: {:?}", tag),
        })
    }

    fn write(self, ctx: &mut WritingContext) -> Result<()> {
        ctx.stream.write_four_cc_reversed(self.tag())
    }
}

/// Frame of a free camera animation: full position and orientation.
#[derive(Clone, Debug, PartialEq)]
pub struct FreeCameraFrame {
    pub frame_index: u32,
    pub interpolation: InterpolationType,
    pub position: Vec3,
    pub rotation: Vec4,
    pub fov: f32,
}

impl FreeCameraFrame {
    fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        Ok(Self {
            frame_index: ctx.stream.read_u32()?,
            interpolation: InterpolationType::parse(ctx)?,
            position: ctx.stream.read_vec3()?,
            rotation: ctx.stream.read_vec4()?,
            fov: ctx.stream.read_f32()?,
        })
    }

    fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.stream.write_u32(self.frame_index);
        self.interpolation.write(ctx)?;
        ctx.stream.write_vec3(self.position);
        ctx.stream.write_vec4(self.rotation);
        ctx.stream.write_f32(self.fov);
        Ok(())
    }
}

/// Camera frame of a look-at animation: position, roll and zoom only.
#[derive(Clone, Debug, PartialEq)]
pub struct LookAtCameraFrame {
    pub frame_index: u32,
    pub interpolation: InterpolationType,
    pub position: Vec3,
    pub roll: f32,
    pub fov: f32,
}

impl LookAtCameraFrame {
    fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        Ok(Self {
            frame_index: ctx.stream.read_u32()?,
            interpolation: InterpolationType::parse(ctx)?,
            position: ctx.stream.read_vec3()?,
            roll: ctx.stream.read_f32()?,
            fov: ctx.stream.read_f32()?,
        })
    }

    fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.stream.write_u32(self.frame_index);
        self.interpolation.write(ctx)?;
        ctx.stream.write_vec3(self.position);
        ctx.stream.write_f32(self.roll);
        ctx.stream.write_f32(self.fov);
        Ok(())
    }
}

/// Target frame of a look-at animation.
#[derive(Clone, Debug, PartialEq)]
pub struct LookAtFrame {
    pub frame_index: u32,
    pub interpolation: InterpolationType,
    pub look_at_point: Vec3,
}

impl LookAtFrame {
    fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        Ok(Self {
            frame_index: ctx.stream.read_u32()?,
            interpolation: InterpolationType::parse(ctx)?,
            look_at_point: ctx.stream.read_vec3()?,
        })
    }

    fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.stream.write_u32(self.frame_index);
        self.interpolation.write(ctx)?;
        ctx.stream.write_vec3(self.look_at_point);
        Ok(())
    }
}

/// The two animation layouts, discriminated by the reversed "free" / "look"
/// tag on the wire.
#[derive(Clone, Debug, PartialEq)]
pub enum CameraFrames {
    Free {
        frames: Vec<FreeCameraFrame>,
    },
    LookAt {
        camera_frames: Vec<LookAtCameraFrame>,
        look_at_frames: Vec<LookAtFrame>,
    },
}

impl CameraFrames {
    fn tag(&self) -> &'static str {
        match self {
            Self::Free { .. } => "free",
            Self::LookAt { .. } => "look",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CameraAnimation {
    pub name: String,
    pub num_frames: u32,
    pub start_offset: u32,
    pub frames: CameraFrames,
}

impl CameraAnimation {
    fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        let tag = ctx.stream.read_four_cc_reversed()?;
        let name = ctx.stream.read_ascii_string()?;
        let num_frames = ctx.stream.read_u32()?;
        let start_offset = ctx.stream.read_u32()?;

        let frames = match tag.as_str() {
            "free" => {
                let count = ctx.stream.read_u32()?;
                let mut frames = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    frames.push(FreeCameraFrame::parse(ctx)?);
                }
                CameraFrames::Free { frames }
            }
            "look" => {
                let count = ctx.stream.read_u32()?;
                let mut camera_frames = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    camera_frames.push(LookAtCameraFrame::parse(ctx)?);
                }
                let count = ctx.stream.read_u32()?;
                let mut look_at_frames = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    look_at_frames.push(LookAtFrame::parse(ctx)?);
                }
                CameraFrames::LookAt {
                    camera_frames,
                    look_at_frames,
                }
            }
            _ => bail!("unknown camera animation type: {:?}", tag),
        };

        Ok(Self {
            name,
            num_frames,
            start_offset,
            frames,
        })
    }

    fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.stream.write_four_cc_reversed(self.frames.tag())?;
        ctx.stream.write_ascii_string(&self.name)?;
        ctx.stream.write_u32(self.num_frames);
        ctx.stream.write_u32(self.start_offset);

        match &self.frames {
            CameraFrames::Free { frames } => {
                ctx.stream.write_u32(frames.len() as u32);
                for frame in frames {
                    frame.write(ctx)?;
                }
            }
            CameraFrames::LookAt {
                camera_frames,
                look_at_frames,
            } => {
                ctx.stream.write_u32(camera_frames.len() as u32);
                for frame in camera_frames {
                    frame.write(ctx)?;
                }
                ctx.stream.write_u32(look_at_frames.len() as u32);
                for frame in look_at_frames {
                    frame.write(ctx)?;
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CameraAnimationList {
    pub version: u16,
    pub animations: Vec<CameraAnimation>,
}

impl CameraAnimationList {
    pub const ASSET_NAME: &'static str = "CameraAnimationList";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let count = ctx.stream.read_u32()?;
            let mut animations = Vec::with_capacity(count as usize);
            for _ in 0..count {
                animations.push(CameraAnimation::parse(ctx)?);
            }
            Ok(Self {
                version: header.version,
                animations,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.stream.write_u32(self.animations.len() as u32);
            for animation in &self.animations {
                animation.write(ctx)?;
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

    #[test]
    fn both_animation_layouts_round_trip() -> Result<()> {
        let list = CameraAnimationList {
            version: 3,
            animations: vec![
                CameraAnimation {
                    name: "intro pan".to_owned(),
                    num_frames: 120,
                    start_offset: 0,
                    frames: CameraFrames::Free {
                        frames: vec![FreeCameraFrame {
                            frame_index: 0,
                            interpolation: InterpolationType::CatmullRom,
                            position: Vec3 { x: 1.0, y: 2.0, z: 3.0 },
                            rotation: Vec4 { x: 0.0, y: 0.0, z: 0.0, w: 1.0 },
                            fov: 45.0,
                        }],
                    },
                },
                CameraAnimation {
                    name: "tracking shot".to_owned(),
                    num_frames: 60,
                    start_offset: 120,
                    frames: CameraFrames::LookAt {
                        camera_frames: vec![LookAtCameraFrame {
                            frame_index: 0,
                            interpolation: InterpolationType::Linear,
                            position: Vec3 { x: 5.0, y: 5.0, z: 10.0 },
                            roll: 0.0,
                            fov: 50.0,
                        }],
                        look_at_frames: vec![LookAtFrame {
                            frame_index: 0,
                            interpolation: InterpolationType::CatmullRom,
                            look_at_point: Vec3 { x: 0.0, y: 0.0, z: 0.0 },
                        }],
                    },
                },
            ],
        };
        let mut out = WritingContext::new(NameTable::new());
        list.write(&mut out)?;
        let bytes = out.stream.into_bytes();

        // The animation tag is stored reversed: "free" as "eerf".
        let at = bytes.windows(4).position(|w| w == b"eerf");
        assert!(at.is_some());

        let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), NameTable::new());
        assert_eq!(CameraAnimationList::parse(&mut ctx)?, list);
        Ok(())
    }

    #[test]
    fn unknown_interpolation_tags_are_rejected() {
        let mut out = WritingContext::new(NameTable::new());
        out.write_asset("CameraAnimationList", 3, |ctx| {
            ctx.stream.write_u32(1);
            ctx.stream.write_four_cc_reversed("free")?;
            ctx.stream.write_ascii_string("bad")?;
            ctx.stream.write_u32(1);
            ctx.stream.write_u32(0);
            ctx.stream.write_u32(1); // one frame
            ctx.stream.write_u32(0); // frame index
            ctx.stream.write_four_cc_reversed("xxxx")?; // bad interpolation
            Ok(())
        })
        .unwrap();
        let bytes = out.stream.into_bytes();
        let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), NameTable::new());
        assert!(CameraAnimationList::parse(&mut ctx).is_err());
    }
}
