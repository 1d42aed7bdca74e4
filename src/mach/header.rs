// Fri Jan 16 2026 - Alex

use crate::layout::{ByteOrder, LayoutError, PointerWidth, Value};
use crate::memory::Address;
use bitflags::bitflags;
use goblin::mach::header::{filetype_to_str, MH_MAGIC, MH_MAGIC_64};
use std::fmt;

/// Byte order and pointer width implied by the first four bytes of a header.
pub fn detect_target(magic: [u8; 4]) -> Option<(ByteOrder, PointerWidth)> {
    let le = u32::from_le_bytes(magic);
    let be = u32::from_be_bytes(magic);
    match (le, be) {
        (MH_MAGIC_64, _) => Some((ByteOrder::Little, PointerWidth::Bits64)),
        (_, MH_MAGIC_64) => Some((ByteOrder::Big, PointerWidth::Bits64)),
        (MH_MAGIC, _) => Some((ByteOrder::Little, PointerWidth::Bits32)),
        (_, MH_MAGIC) => Some((ByteOrder::Big, PointerWidth::Bits32)),
        _ => None,
    }
}

pub fn expected_magic(width: PointerWidth) -> u32 {
    match width {
        PointerWidth::Bits32 => MH_MAGIC,
        PointerWidth::Bits64 => MH_MAGIC_64,
    }
}

fn u32_field(value: &Value, name: &str) -> Result<u32, LayoutError> {
    match value.field(name)? {
        Value::U32(v) => Ok(*v),
        other => Err(LayoutError::TypeMismatch {
            expected: "u32",
            found: other.kind().to_string(),
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachHeader {
    pub magic: u32,
    pub cputype: i32,
    pub cpusubtype: i32,
    pub filetype: u32,
    pub ncmds: u32,
    pub sizeofcmds: u32,
    pub flags: u32,
}

impl MachHeader {
    pub fn from_value(value: &Value) -> Result<Self, LayoutError> {
        Ok(Self {
            magic: u32_field(value, "magic")?,
            cputype: value.field("cputype")?.as_i64()? as i32,
            cpusubtype: value.field("cpusubtype")?.as_i64()? as i32,
            filetype: u32_field(value, "filetype")?,
            ncmds: u32_field(value, "ncmds")?,
            sizeofcmds: u32_field(value, "sizeofcmds")?,
            flags: u32_field(value, "flags")?,
        })
    }

    pub fn file_type_name(&self) -> &'static str {
        filetype_to_str(self.filetype)
    }
}

impl fmt::Display for MachHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:#x} {} ncmds={} sizeofcmds={}",
            self.magic,
            self.file_type_name(),
            self.ncmds,
            self.sizeofcmds
        )
    }
}

/// Generic load command prefix and where it sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadCommand {
    pub cmd: u32,
    pub cmdsize: u32,
    pub address: Address,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VmProt: u32 {
        const READ = 0x1;
        const WRITE = 0x2;
        const EXECUTE = 0x4;
    }
}

impl fmt::Display for VmProt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |set: bool, c: char| if set { c } else { '-' };
        write!(
            f,
            "{}{}{}",
            flag(self.contains(Self::READ), 'r'),
            flag(self.contains(Self::WRITE), 'w'),
            flag(self.contains(Self::EXECUTE), 'x')
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachSegment {
    pub name: String,
    pub vm_address: Address,
    pub vm_size: u64,
    pub file_offset: u64,
    pub file_size: u64,
    pub max_prot: VmProt,
    pub init_prot: VmProt,
}

impl MachSegment {
    pub fn from_value(value: &Value) -> Result<Self, LayoutError> {
        let raw: Vec<u8> = value
            .field("segname")?
            .as_array()?
            .iter()
            .map(|b| b.as_u64().map(|b| b as u8))
            .collect::<Result<_, _>>()?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        Ok(Self {
            name: String::from_utf8_lossy(&raw[..end]).into_owned(),
            vm_address: Address::new(value.field("vmaddr")?.as_u64()?),
            vm_size: value.field("vmsize")?.as_u64()?,
            file_offset: value.field("fileoff")?.as_u64()?,
            file_size: value.field("filesize")?.as_u64()?,
            max_prot: VmProt::from_bits_truncate(u32_field(value, "maxprot")?),
            init_prot: VmProt::from_bits_truncate(u32_field(value, "initprot")?),
        })
    }
}

impl fmt::Display for MachSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<16} {} vmsize={:#x} fileoff={:#x} filesize={:#x} {}/{}",
            self.name,
            self.vm_address,
            self.vm_size,
            self.file_offset,
            self.file_size,
            self.init_prot,
            self.max_prot
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymtabCommand {
    pub symoff: u32,
    pub nsyms: u32,
    pub stroff: u32,
    pub strsize: u32,
}

impl SymtabCommand {
    pub fn from_value(value: &Value) -> Result<Self, LayoutError> {
        Ok(Self {
            symoff: u32_field(value, "symoff")?,
            nsyms: u32_field(value, "nsyms")?,
            stroff: u32_field(value, "stroff")?,
            strsize: u32_field(value, "strsize")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_target() {
        assert_eq!(
            detect_target([0xcf, 0xfa, 0xed, 0xfe]),
            Some((ByteOrder::Little, PointerWidth::Bits64))
        );
        assert_eq!(
            detect_target([0xfe, 0xed, 0xfa, 0xcf]),
            Some((ByteOrder::Big, PointerWidth::Bits64))
        );
        assert_eq!(
            detect_target([0xce, 0xfa, 0xed, 0xfe]),
            Some((ByteOrder::Little, PointerWidth::Bits32))
        );
        assert_eq!(detect_target(*b"\x7fELF"), None);
    }

    #[test]
    fn test_vm_prot_display() {
        assert_eq!((VmProt::READ | VmProt::EXECUTE).to_string(), "r-x");
        assert_eq!(VmProt::from_bits_truncate(0xff).to_string(), "rwx");
    }
}
