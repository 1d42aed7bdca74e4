// Fri Jan 16 2026 - Alex

use crate::layout::{DataReader, LayoutError, PointerWidth, TypeKey, Value};
use crate::mach::header::{expected_magic, LoadCommand, MachHeader, MachSegment, SymtabCommand};
use crate::mach::layouts::{LOAD_COMMAND, MACH_HEADER, NLIST, SEGMENT_COMMAND, SYMTAB_COMMAND};
use crate::mach::MachError;
use crate::memory::Address;
use goblin::mach::header::MH_DYLINKER;
use goblin::mach::load_command::{LC_SEGMENT, LC_SEGMENT_64, LC_SYMTAB};
use goblin::mach::symbols::N_STAB;
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use std::fmt;

/// How load-command file offsets translate into reader addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// The reader is the file itself; offsets are relative to the header.
    File,
    /// The reader is a process address space; offsets go through segments.
    Loaded,
}

/// A Mach-O object read lazily through a [`DataReader`], rooted at `base`.
pub struct MachView {
    reader: DataReader,
    base: Address,
    kind: ViewKind,
    header: OnceCell<MachHeader>,
    load_commands: OnceCell<Vec<LoadCommand>>,
    segments: OnceCell<Vec<MachSegment>>,
    symbols: OnceCell<IndexMap<String, Address>>,
}

impl MachView {
    pub fn new(reader: DataReader, base: Address, kind: ViewKind) -> Self {
        Self {
            reader,
            base,
            kind,
            header: OnceCell::new(),
            load_commands: OnceCell::new(),
            segments: OnceCell::new(),
            symbols: OnceCell::new(),
        }
    }

    pub fn loaded(reader: DataReader, base: Address) -> Self {
        Self::new(reader, base, ViewKind::Loaded)
    }

    pub fn reader(&self) -> &DataReader {
        &self.reader
    }

    pub fn base_address(&self) -> Address {
        self.base
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    /// Actual address the header was found at.
    pub fn load_address(&self) -> Address {
        self.base
    }

    fn pointer_width(&self) -> Result<PointerWidth, LayoutError> {
        let size = self.reader.registry().resolve(&TypeKey::Pointer)?.size();
        Ok(if size == 8 {
            PointerWidth::Bits64
        } else {
            PointerWidth::Bits32
        })
    }

    fn is_64(&self) -> Result<bool, LayoutError> {
        Ok(self.pointer_width()? == PointerWidth::Bits64)
    }

    pub fn is_valid(&self) -> bool {
        self.header().is_ok()
    }

    pub fn is_dylinker(&self) -> bool {
        matches!(self.header(), Ok(header) if header.filetype == MH_DYLINKER)
    }

    pub fn header(&self) -> Result<&MachHeader, MachError> {
        self.header.get_or_try_init(|| -> Result<MachHeader, MachError> {
            let magic = self.reader.read_u32(self.base)?;
            let expected = expected_magic(self.pointer_width()?);
            if magic != expected {
                return Err(MachError::Format(format!(
                    "bad Mach-O magic {:#x} at {} (expected {:#x})",
                    magic, self.base, expected
                )));
            }
            let value = self.reader.read(&MACH_HEADER, self.base)?;
            Ok(MachHeader::from_value(&value)?)
        })
    }

    pub fn file_type(&self) -> Result<u32, MachError> {
        Ok(self.header()?.filetype)
    }

    pub fn load_commands(&self) -> Result<&[LoadCommand], MachError> {
        self.load_commands
            .get_or_try_init(|| -> Result<Vec<LoadCommand>, MachError> {
                let header = *self.header()?;
                let header_size = self.reader.registry().resolve(&MACH_HEADER)?.size() as u64;
                let start = self.base + header_size;
                let end = start + u64::from(header.sizeofcmds);

                // Every load command is at least 8 bytes.
                if u64::from(header.ncmds) * 8 > u64::from(header.sizeofcmds) {
                    return Err(MachError::Format(format!(
                        "{} load commands cannot fit in {:#x} bytes",
                        header.ncmds, header.sizeofcmds
                    )));
                }

                let mut commands = Vec::new();
                let mut address = start;
                for index in 0..header.ncmds {
                    let value = self.reader.read(&LOAD_COMMAND, address)?;
                    let cmd = value.field("cmd")?.as_u64()? as u32;
                    let cmdsize = value.field("cmdsize")?.as_u64()? as u32;
                    if cmdsize < 8 || address + u64::from(cmdsize) > end {
                        return Err(MachError::Format(format!(
                            "load command {} at {} has bad size {:#x}",
                            index, address, cmdsize
                        )));
                    }
                    commands.push(LoadCommand { cmd, cmdsize, address });
                    address = address + u64::from(cmdsize);
                }
                Ok(commands)
            })
            .map(Vec::as_slice)
    }

    pub fn segments(&self) -> Result<&[MachSegment], MachError> {
        self.segments
            .get_or_try_init(|| -> Result<Vec<MachSegment>, MachError> {
                let segment_cmd = if self.is_64()? { LC_SEGMENT_64 } else { LC_SEGMENT };
                self.load_commands()?
                    .iter()
                    .filter(|lc| lc.cmd == segment_cmd)
                    .map(|lc| -> Result<MachSegment, MachError> {
                        let value = self.reader.read(&SEGMENT_COMMAND, lc.address)?;
                        Ok(MachSegment::from_value(&value)?)
                    })
                    .collect()
            })
            .map(Vec::as_slice)
    }

    pub fn segment(&self, name: &str) -> Result<Option<&MachSegment>, MachError> {
        Ok(self.segments()?.iter().find(|s| s.name == name))
    }

    /// Static base: the segment that maps the start of the file.
    pub fn preferred_base(&self) -> Result<Address, MachError> {
        self.segments()?
            .iter()
            .find(|s| s.file_offset == 0 && s.file_size != 0)
            .map(|s| s.vm_address)
            .ok_or_else(|| MachError::Format(format!("no segment maps the header at {}", self.base)))
    }

    pub fn slide(&self) -> Result<u64, MachError> {
        Ok(self
            .load_address()
            .as_u64()
            .wrapping_sub(self.preferred_base()?.as_u64()))
    }

    pub fn symtab(&self) -> Result<Option<SymtabCommand>, MachError> {
        let Some(lc) = self.load_commands()?.iter().find(|lc| lc.cmd == LC_SYMTAB) else {
            return Ok(None);
        };
        let value = self.reader.read(&SYMTAB_COMMAND, lc.address)?;
        Ok(Some(SymtabCommand::from_value(&value)?))
    }

    /// Reader address of a `__LINKEDIT`-relative file offset.
    fn linkedit_address(&self, file_offset: u32) -> Result<Address, MachError> {
        let file_offset = u64::from(file_offset);
        match self.kind {
            ViewKind::File => Ok(self.base + file_offset),
            ViewKind::Loaded => {
                let linkedit = self
                    .segment("__LINKEDIT")?
                    .ok_or_else(|| MachError::Format("missing __LINKEDIT segment".to_string()))?;
                let delta = file_offset.wrapping_sub(linkedit.file_offset);
                Ok(linkedit.vm_address + self.slide()? + delta)
            }
        }
    }

    /// Defined symbol names and their static values, first definition wins.
    pub fn symbols(&self) -> Result<&IndexMap<String, Address>, MachError> {
        self.symbols.get_or_try_init(|| -> Result<IndexMap<String, Address>, MachError> {
            let mut symbols = IndexMap::new();
            let Some(symtab) = self.symtab()? else {
                return Ok(symbols);
            };
            if symtab.nsyms == 0 {
                return Ok(symbols);
            }

            let entries_at = self.linkedit_address(symtab.symoff)?;
            let strings_at = self.linkedit_address(symtab.stroff)?;
            let entries = self
                .reader
                .read_array(&NLIST, symtab.nsyms as usize, entries_at)?;
            for entry in &entries {
                let strx = entry.field("n_strx")?.as_u64()?;
                let n_type = entry.field("n_type")?.as_u64()? as u8;
                if strx == 0 || strx >= u64::from(symtab.strsize) || n_type & N_STAB != 0 {
                    continue;
                }
                let name = self.reader.read_c_string(strings_at + strx)?;
                let value = Address::new(entry.field("n_value")?.as_u64()?);
                symbols.entry(name).or_insert(value);
            }
            log::debug!("Loaded {} symbols from image at {}", symbols.len(), self.base);
            Ok(symbols)
        })
    }

    /// Static value of `name`, trying the C-mangled `_name` as well.
    pub fn lookup_symbol(&self, name: &str) -> Result<Address, MachError> {
        let symbols = self.symbols()?;
        symbols
            .get(name)
            .or_else(|| symbols.get(&format!("_{}", name)))
            .copied()
            .ok_or_else(|| MachError::MissingSymbol(name.to_string()))
    }

    pub fn read(&self, key: &TypeKey, addr: Address) -> Result<Value, MachError> {
        Ok(self.reader.read(key, addr)?)
    }

    pub fn read_c_string(&self, addr: Address) -> Result<String, MachError> {
        Ok(self.reader.read_c_string(addr)?)
    }
}

impl fmt::Debug for MachView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachView")
            .field("base", &self.base)
            .field("kind", &self.kind)
            .field("header", &self.header.get())
            .finish()
    }
}
