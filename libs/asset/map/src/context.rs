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

// The container's shared state: the asset name table that both the top-level
// asset records and the in-body property keys index into, plus the scoped
// header discipline every asset codec runs under (version + datasize on the
// way in, datasize back-patching on the way out).

use crate::stream::{BinaryReader, BinaryWriter};
use anyhow::{bail, ensure, Result};
use log::{debug, trace};
use std::collections::HashMap;

/// Bidirectional, append-only mapping between 1-based indices and asset
/// names. Shared between the container records and property keys.
#[derive(Clone, Debug, Default)]
pub struct NameTable {
    names: Vec<String>,
    index_of: HashMap<String, u32>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> u32 {
        self.names.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, index: u32) -> Option<&str> {
        if index == 0 {
            return None;
        }
        self.names.get(index as usize - 1).map(String::as_str)
    }

    pub fn index(&self, name: &str) -> Option<u32> {
        self.index_of.get(name).copied()
    }

    /// Return the index of `name`, appending it at `len + 1` if new.
    pub fn intern(&mut self, name: &str) -> u32 {
        if let Some(index) = self.index_of.get(name) {
            return *index;
        }
        self.names.push(name.to_owned());
        let index = self.names.len() as u32;
        self.index_of.insert(name.to_owned(), index);
        index
    }

    /// On-disk form: `u32 count`, then entries from index `count` down to 1,
    /// each a one-byte-length-prefixed name followed by its index.
    pub fn parse(r: &mut BinaryReader) -> Result<Self> {
        let count = r.read_u32()?;
        let mut names = vec![String::new(); count as usize];
        let mut index_of = HashMap::with_capacity(count as usize);
        for expected in (1..=count).rev() {
            let name = r.read_string()?;
            let index = r.read_u32()?;
            ensure!(
                index == expected,
                "asset name table out of order: expected index {}, got {}",
                expected,
                index
            );
            ensure!(
                !index_of.contains_key(&name),
                "duplicate asset name in table: {}",
                name
            );
            index_of.insert(name.clone(), index);
            names[index as usize - 1] = name;
        }
        trace!("parsed asset name table with {} entries", count);
        Ok(Self { names, index_of })
    }

    pub fn write(&self, w: &mut BinaryWriter) -> Result<()> {
        w.write_u32(self.len());
        for index in (1..=self.len()).rev() {
            w.write_string(&self.names[index as usize - 1])?;
            w.write_u32(index);
        }
        Ok(())
    }
}

/// Wire type tags of asset properties.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    Boolean = 0,
    Integer = 1,
    RealNumber = 2,
    AsciiString = 3,
    UnicodeString = 4,
    Unknown = 5,
}

impl PropertyKind {
    pub fn from_byte(b: u8) -> Result<Self> {
        Ok(match b {
            0 => Self::Boolean,
            1 => Self::Integer,
            2 => Self::RealNumber,
            3 => Self::AsciiString,
            4 => Self::UnicodeString,
            5 => Self::Unknown,
            _ => bail!("invalid property type tag: {}", b),
        })
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Boolean(bool),
    Integer(i32),
    RealNumber(f32),
    AsciiString(String),
    /// Parsed and written exactly like `AsciiString`, but keeps its tag.
    Unknown(String),
    UnicodeString(String),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Boolean(_) => PropertyKind::Boolean,
            Self::Integer(_) => PropertyKind::Integer,
            Self::RealNumber(_) => PropertyKind::RealNumber,
            Self::AsciiString(_) => PropertyKind::AsciiString,
            Self::Unknown(_) => PropertyKind::Unknown,
            Self::UnicodeString(_) => PropertyKind::UnicodeString,
        }
    }
}

/// A typed, named value. Lists of these keep their file order.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub name: String,
    pub value: PropertyValue,
}

/// A `(type tag, 24-bit name index)` reference into the name table, used for
/// embedded script and faction references. The index is retained verbatim;
/// `name` is the table lookup at parse time (None if the index was absent).
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyKey {
    pub kind: PropertyKind,
    pub name_index: u32,
    pub name: Option<String>,
}

/// Version and extent of the asset currently being parsed.
#[derive(Clone, Copy, Debug)]
pub struct AssetHeader {
    pub version: u16,
    pub datasize: u32,
    pub start: usize,
    pub end: usize,
}

pub struct ParsingContext<'a> {
    pub stream: BinaryReader<'a>,
    pub names: NameTable,
}

impl<'a> ParsingContext<'a> {
    pub fn new(stream: BinaryReader<'a>, names: NameTable) -> Self {
        Self { stream, names }
    }

    /// Read a u32 asset index and resolve it through the name table.
    pub fn parse_asset_name(&mut self) -> Result<String> {
        let index = self.stream.read_u32()?;
        let Some(name) = self.names.name(index) else {
            bail!(
                "asset index {} not in the name table ({} entries)",
                index,
                self.names.len()
            );
        };
        trace!("asset {} (index {})", name, index);
        Ok(name.to_owned())
    }

    /// Read the `u16 version` / `u32 datasize` header, run `body`, and check
    /// that it consumed exactly `datasize` bytes.
    pub fn read_asset<T>(
        &mut self,
        body: impl FnOnce(&mut Self, &AssetHeader) -> Result<T>,
    ) -> Result<T> {
        let version = self.stream.read_u16()?;
        let datasize = self.stream.read_u32()?;
        let start = self.stream.position();
        let header = AssetHeader {
            version,
            datasize,
            start,
            end: start + datasize as usize,
        };
        let out = body(self, &header)?;
        let read = self.stream.position() - start;
        ensure!(
            read == datasize as usize,
            "asset data size mismatch at offset 0x{:X}: header says {} bytes, codec read {}",
            start,
            datasize,
            read
        );
        Ok(out)
    }

    pub fn parse_property_key(&mut self) -> Result<PropertyKey> {
        let kind = PropertyKind::from_byte(self.stream.read_u8()?)?;
        let name_index = self.stream.read_u24()?;
        let name = self.names.name(name_index).map(str::to_owned);
        Ok(PropertyKey {
            kind,
            name_index,
            name,
        })
    }

    pub fn parse_property(&mut self) -> Result<Property> {
        let key = self.parse_property_key()?;
        let value = match key.kind {
            PropertyKind::Boolean => PropertyValue::Boolean(self.stream.read_bool()?),
            PropertyKind::Integer => PropertyValue::Integer(self.stream.read_i32()?),
            PropertyKind::RealNumber => PropertyValue::RealNumber(self.stream.read_f32()?),
            PropertyKind::AsciiString => PropertyValue::AsciiString(self.stream.read_ascii_string()?),
            PropertyKind::Unknown => PropertyValue::Unknown(self.stream.read_ascii_string()?),
            PropertyKind::UnicodeString => {
                PropertyValue::UnicodeString(self.stream.read_unicode_string()?)
            }
        };
        let Some(name) = key.name else {
            bail!(
                "property name index {} not in the name table",
                key.name_index
            );
        };
        debug!("property {} = {:?}", name, value);
        Ok(Property { name, value })
    }

    /// `u16 count`, then `count` properties. Names must be unique.
    pub fn parse_properties(&mut self) -> Result<Vec<Property>> {
        let count = self.stream.read_u16()?;
        let mut properties: Vec<Property> = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let property = self.parse_property()?;
            ensure!(
                !properties.iter().any(|p| p.name == property.name),
                "duplicate property name: {}",
                property.name
            );
            properties.push(property);
        }
        Ok(properties)
    }
}

pub struct WritingContext {
    pub stream: BinaryWriter,
    pub names: NameTable,
}

impl WritingContext {
    /// `names` is seeded from the source file's table so unedited maps
    /// round-trip byte-exactly; edits that introduce new names append.
    pub fn new(names: NameTable) -> Self {
        Self {
            stream: BinaryWriter::new(),
            names,
        }
    }

    pub fn write_asset_name(&mut self, name: &str) -> Result<()> {
        let index = self.names.intern(name);
        self.stream.write_u32(index);
        Ok(())
    }

    /// Write the `u16 version` header and a datasize placeholder, run `body`,
    /// then back-patch the placeholder with the number of bytes it wrote.
    pub fn write_asset<T>(
        &mut self,
        name: &str,
        version: u16,
        body: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        debug!("writing asset {} v{}", name, version);
        self.stream.write_u16(version);
        let size_at = self.stream.position();
        self.stream.write_u32(0);
        let body_start = self.stream.position();
        let out = body(self)?;
        let datasize = self.stream.position() - body_start;
        ensure!(
            datasize <= u32::MAX as usize,
            "asset {} body of {} bytes overflows the datasize field",
            name,
            datasize
        );
        self.stream.patch_u32(size_at, datasize as u32)?;
        Ok(out)
    }

    /// Re-emit a property key with its original index, untouched.
    pub fn write_property_key(&mut self, key: &PropertyKey) -> Result<()> {
        self.stream.write_u8(key.kind.as_byte());
        self.stream.write_u24(key.name_index)
    }

    pub fn write_properties(&mut self, properties: &[Property]) -> Result<()> {
        ensure!(
            properties.len() <= u16::MAX as usize,
            "{} properties overflow the u16 count",
            properties.len()
        );
        self.stream.write_u16(properties.len() as u16);
        for property in properties {
            let index = self.names.intern(&property.name);
            self.stream.write_u8(property.value.kind().as_byte());
            self.stream.write_u24(index)?;
            match &property.value {
                PropertyValue::Boolean(v) => self.stream.write_bool(*v),
                PropertyValue::Integer(v) => self.stream.write_i32(*v),
                PropertyValue::RealNumber(v) => self.stream.write_f32(*v),
                PropertyValue::AsciiString(v) | PropertyValue::Unknown(v) => {
                    self.stream.write_ascii_string(v)?
                }
                PropertyValue::UnicodeString(v) => self.stream.write_unicode_string(v)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(names: &[&str]) -> NameTable {
        let mut t = NameTable::new();
        for n in names {
            t.intern(n);
        }
        t
    }

    #[test]
    fn name_table_round_trips_in_reverse_index_order() -> Result<()> {
        let t = table(&["WorldInfo", "mapName", "weather"]);
        let mut w = BinaryWriter::new();
        t.write(&mut w)?;

        let bytes = w.into_bytes();
        // Count, then entry 3 first.
        assert_eq!(&bytes[..4], &3u32.to_le_bytes());
        assert_eq!(bytes[4] as usize, "weather".len());

        let mut r = BinaryReader::new(&bytes);
        let back = NameTable::parse(&mut r)?;
        assert_eq!(back.len(), 3);
        assert_eq!(back.name(1), Some("WorldInfo"));
        assert_eq!(back.index("weather"), Some(3));
        Ok(())
    }

    #[test]
    fn name_table_rejects_gaps() {
        let mut w = BinaryWriter::new();
        w.write_u32(2);
        w.write_string("A").unwrap();
        w.write_u32(2);
        w.write_string("B").unwrap();
        w.write_u32(2); // should be 1
        let bytes = w.into_bytes();
        assert!(NameTable::parse(&mut BinaryReader::new(&bytes)).is_err());
    }

    #[test]
    fn interning_appends_at_the_end() {
        let mut t = table(&["WorldInfo"]);
        assert_eq!(t.intern("WorldInfo"), 1);
        assert_eq!(t.intern("mapName"), 2);
        assert_eq!(t.intern("mapName"), 2);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn properties_round_trip_and_keep_order() -> Result<()> {
        let props = vec![
            Property {
                name: "mapName".to_owned(),
                value: PropertyValue::AsciiString("Alpha".to_owned()),
            },
            Property {
                name: "weather".to_owned(),
                value: PropertyValue::Integer(2),
            },
            Property {
                name: "cameraLocked".to_owned(),
                value: PropertyValue::Boolean(true),
            },
        ];
        let mut ctx = WritingContext::new(table(&["WorldInfo"]));
        ctx.write_properties(&props)?;

        let bytes = ctx.stream.into_bytes();
        let mut parse = ParsingContext::new(BinaryReader::new(&bytes), ctx.names.clone());
        let back = parse.parse_properties()?;
        assert_eq!(back, props);
        Ok(())
    }

    #[test]
    fn duplicate_property_names_are_rejected() {
        let mut ctx = WritingContext::new(NameTable::new());
        let prop = Property {
            name: "mapName".to_owned(),
            value: PropertyValue::Integer(1),
        };
        ctx.write_properties(&[prop.clone(), prop]).unwrap();
        let bytes = ctx.stream.into_bytes();
        let mut parse = ParsingContext::new(BinaryReader::new(&bytes), ctx.names.clone());
        assert!(parse.parse_properties().is_err());
    }

    #[test]
    fn asset_scope_checks_the_datasize() -> Result<()> {
        let mut ctx = WritingContext::new(NameTable::new());
        ctx.write_asset("GlobalWaterSettings", 1, |ctx| {
            ctx.stream.write_bool(true);
            ctx.stream.write_f32(9.5);
            Ok(())
        })?;
        let bytes = ctx.stream.into_bytes();
        assert_eq!(&bytes[2..6], &5u32.to_le_bytes());

        let mut parse = ParsingContext::new(BinaryReader::new(&bytes), NameTable::new());
        parse.read_asset(|ctx, header| {
            assert_eq!(header.version, 1);
            assert_eq!(header.datasize, 5);
            ctx.stream.read_bool()?;
            ctx.stream.read_f32()?;
            Ok(())
        })?;

        // A codec that reads too little must fail the scope check.
        let mut parse = ParsingContext::new(BinaryReader::new(&bytes), NameTable::new());
        let short = parse.read_asset(|ctx, _| ctx.stream.read_bool());
        assert!(short.is_err());
        Ok(())
    }
}
