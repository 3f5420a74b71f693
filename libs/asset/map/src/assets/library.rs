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

use crate::context::{ParsingContext, WritingContext};
use anyhow::{ensure, Result};

/// A list of library map paths, nested inside LibraryMapLists.
#[derive(Clone, Debug, PartialEq)]
pub struct LibraryMaps {
    pub version: u16,
    pub values: Vec<String>,
}

impl LibraryMaps {
    pub const ASSET_NAME: &'static str = "LibraryMaps";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let count = ctx.stream.read_u32()?;
            let mut values = Vec::with_capacity(count as usize);
            for _ in 0..count {
                values.push(ctx.stream.read_ascii_string()?);
            }
            Ok(Self {
                version: header.version,
                values,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            ctx.stream.write_u32(self.values.len() as u32);
            for value in &self.values {
                ctx.stream.write_ascii_string(value)?;
            }
            Ok(())
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LibraryMapLists {
    pub version: u16,
    pub lists: Vec<LibraryMaps>,
}

impl LibraryMapLists {
    pub const ASSET_NAME: &'static str = "LibraryMapLists";

    pub fn parse(ctx: &mut ParsingContext) -> Result<Self> {
        ctx.read_asset(|ctx, header| {
            let mut lists = Vec::new();
            while ctx.stream.position() < header.end {
                let name = ctx.parse_asset_name()?;
                ensure!(
                    name == LibraryMaps::ASSET_NAME,
                    "expected {} asset in LibraryMapLists, got {}",
                    LibraryMaps::ASSET_NAME,
                    name
                );
                lists.push(LibraryMaps::parse(ctx)?);
            }
            Ok(Self {
                version: header.version,
                lists,
            })
        })
    }

    pub fn write(&self, ctx: &mut WritingContext) -> Result<()> {
        ctx.write_asset(Self::ASSET_NAME, self.version, |ctx| {
            for list in &self.lists {
                ctx.write_asset_name(LibraryMaps::ASSET_NAME)?;
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

    #[test]
    fn nested_library_lists_round_trip() -> Result<()> {
        let lists = LibraryMapLists {
            version: 1,
            lists: vec![
                LibraryMaps {
                    version: 1,
                    values: vec!["libraries/gondor.map".to_owned()],
                },
                LibraryMaps {
                    version: 1,
                    values: Vec::new(),
                },
            ],
        };
        let mut names = NameTable::new();
        names.intern(LibraryMaps::ASSET_NAME);
        let mut out = WritingContext::new(names);
        lists.write(&mut out)?;
        let bytes = out.stream.into_bytes();
        let mut ctx = ParsingContext::new(BinaryReader::new(&bytes), out.names.clone());
        assert_eq!(LibraryMapLists::parse(&mut ctx)?, lists);
        Ok(())
    }
}
