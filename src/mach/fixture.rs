// Sat Jan 17 2026 - Alex

//! Synthetic 64-bit Mach-O cores for tests.

use crate::layout::ByteOrder;
use crate::memory::{Address, BufferSource, DataSource, MemoryError};
use goblin::mach::header::{MH_CORE, MH_DYLIB, MH_DYLINKER, MH_MAGIC_64};
use goblin::mach::load_command::{LC_SEGMENT_64, LC_SYMTAB};
use parking_lot::Mutex;
use std::ops::Range;

pub const SEGMENT_VM: u64 = 0x7000_0000;
pub const SEGMENT_FILE_OFFSET: u64 = 0x1000;
pub const SEGMENT_SIZE: u64 = 0x8000;
pub const DYLD_OFFSET: u64 = 0x2000;
pub const DYLD_ADDRESS: u64 = SEGMENT_VM + DYLD_OFFSET;
pub const INFO_ARRAY_ADDRESS: u64 = SEGMENT_VM + 0x5000;
pub const PATHS_ADDRESS: u64 = SEGMENT_VM + 0x5400;
pub const LIBRARY_ADDRESS: u64 = SEGMENT_VM + 0x7000;

const DYLD_SIZE: usize = 0x3000;
const LINKEDIT_OFFSET: u64 = 0x2000;
const STRINGS_OFFSET: u64 = 0x2100;
const CPU_TYPE_ARM64: u32 = 0x0100_000c;

struct Writer {
    buf: Vec<u8>,
    order: ByteOrder,
}

impl Writer {
    fn new(size: usize, order: ByteOrder) -> Self {
        Self {
            buf: vec![0; size],
            order,
        }
    }

    fn bytes(&mut self, offset: u64, data: &[u8]) {
        let start = offset as usize;
        self.buf[start..start + data.len()].copy_from_slice(data);
    }

    fn u32(&mut self, offset: u64, value: u32) {
        let data = match self.order {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        };
        self.bytes(offset, &data);
    }

    fn u64(&mut self, offset: u64, value: u64) {
        let data = match self.order {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        };
        self.bytes(offset, &data);
    }

    fn header(&mut self, offset: u64, filetype: u32, ncmds: u32, sizeofcmds: u32) {
        self.u32(offset, MH_MAGIC_64);
        self.u32(offset + 4, CPU_TYPE_ARM64);
        self.u32(offset + 12, filetype);
        self.u32(offset + 16, ncmds);
        self.u32(offset + 20, sizeofcmds);
    }

    #[allow(clippy::too_many_arguments)]
    fn segment(&mut self, offset: u64, name: &str, vmaddr: u64, vmsize: u64, fileoff: u64, filesize: u64, prot: u32) {
        self.u32(offset, LC_SEGMENT_64);
        self.u32(offset + 4, 72);
        self.bytes(offset + 8, name.as_bytes());
        self.u64(offset + 24, vmaddr);
        self.u64(offset + 32, vmsize);
        self.u64(offset + 40, fileoff);
        self.u64(offset + 48, filesize);
        self.u32(offset + 56, 7);
        self.u32(offset + 60, prot);
    }

    fn nlist(&mut self, offset: u64, strx: u32, n_type: u8, value: u64) {
        self.u32(offset, strx);
        self.buf[offset as usize + 4] = n_type;
        self.buf[offset as usize + 5] = 1;
        self.u64(offset + 8, value);
    }
}

/// The dynamic linker image as it sits in memory.
#[derive(Debug, Clone)]
pub struct DyldFixture {
    pub order: ByteOrder,
    pub file_type: u32,
    pub symbol: &'static str,
    /// Preferred base of `__TEXT`.
    pub text_vmaddr: u64,
    /// Offset of `dyld_all_image_infos` from the image start.
    pub symbol_offset: u64,
    pub version: u32,
    pub info_array_count: u32,
    pub info_array: u64,
}

impl Default for DyldFixture {
    fn default() -> Self {
        Self {
            order: ByteOrder::Little,
            file_type: MH_DYLINKER,
            symbol: "_dyld_all_image_infos",
            text_vmaddr: 0x7fff_5fc0_0000,
            symbol_offset: 0x800,
            version: 15,
            info_array_count: 0,
            info_array: 0,
        }
    }
}

impl DyldFixture {
    pub fn build(&self) -> Vec<u8> {
        let mut w = Writer::new(DYLD_SIZE, self.order);
        w.header(0, self.file_type, 3, 72 * 2 + 24);
        w.segment(32, "__TEXT", self.text_vmaddr, 0x2000, 0, 0x2000, 5);
        w.segment(104, "__LINKEDIT", self.text_vmaddr + LINKEDIT_OFFSET, 0x1000, LINKEDIT_OFFSET, 0x1000, 1);

        w.u32(176, LC_SYMTAB);
        w.u32(180, 24);
        w.u32(184, LINKEDIT_OFFSET as u32);
        w.u32(188, 3);
        w.u32(192, STRINGS_OFFSET as u32);
        w.u32(196, 0x80);

        let mut strings = b"\0_dyld_start\0".to_vec();
        let symbol_strx = strings.len() as u32;
        strings.extend_from_slice(self.symbol.as_bytes());
        strings.push(0);
        w.bytes(STRINGS_OFFSET, &strings);

        w.nlist(LINKEDIT_OFFSET, 1, 0x0f, self.text_vmaddr + 0x400);
        // Debugger stab sharing the name; must not shadow the real definition.
        w.nlist(LINKEDIT_OFFSET + 16, symbol_strx, 0x24, 0xdead_0000);
        w.nlist(LINKEDIT_OFFSET + 32, symbol_strx, 0x0f, self.text_vmaddr + self.symbol_offset);

        let infos = self.symbol_offset;
        w.u32(infos, self.version);
        w.u32(infos + 4, self.info_array_count);
        w.u64(infos + 8, self.info_array);
        w.buf
    }
}

/// A core file with one segment holding the dynamic linker, an image info
/// array, path strings and one library header.
#[derive(Debug, Clone)]
pub struct CoreFixture {
    pub dyld: DyldFixture,
    pub images: Vec<(u64, &'static str)>,
}

impl Default for CoreFixture {
    fn default() -> Self {
        Self {
            dyld: DyldFixture::default(),
            images: vec![
                (LIBRARY_ADDRESS, "/usr/lib/libSystem.B.dylib"),
                (0x1_8000_0000, "/usr/lib/libobjc.A.dylib"),
            ],
        }
    }
}

impl CoreFixture {
    pub fn with_order(order: ByteOrder) -> Self {
        let mut fixture = Self::default();
        fixture.dyld.order = order;
        fixture
    }

    pub fn build(&self) -> Vec<u8> {
        let order = self.dyld.order;
        let mut w = Writer::new((SEGMENT_FILE_OFFSET + SEGMENT_SIZE) as usize, order);
        w.header(0, MH_CORE, 1, 72);
        w.segment(32, "", SEGMENT_VM, SEGMENT_SIZE, SEGMENT_FILE_OFFSET, SEGMENT_SIZE, 3);

        let mut dyld = self.dyld.clone();
        dyld.info_array_count = self.images.len() as u32;
        dyld.info_array = INFO_ARRAY_ADDRESS;
        w.bytes(file_offset(DYLD_ADDRESS), &dyld.build());

        for (index, (load_address, path)) in self.images.iter().enumerate() {
            let entry = file_offset(INFO_ARRAY_ADDRESS) + index as u64 * 24;
            let path_address = PATHS_ADDRESS + index as u64 * 0x80;
            w.u64(entry, *load_address);
            w.u64(entry + 8, path_address);
            w.u64(entry + 16, 0x6000_0000 + index as u64);
            w.bytes(file_offset(path_address), path.as_bytes());
        }

        w.header(file_offset(LIBRARY_ADDRESS), MH_DYLIB, 0, 0);
        w.buf
    }
}

/// File offset of a virtual address inside the fixture segment.
pub fn file_offset(vm: u64) -> u64 {
    vm - SEGMENT_VM + SEGMENT_FILE_OFFSET
}

/// Buffer store that records every read and can be told to fail a range.
pub struct RecordingSource {
    inner: BufferSource,
    reads: Mutex<Vec<(u64, usize)>>,
    failing: Mutex<Option<Range<u64>>>,
}

impl RecordingSource {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            inner: BufferSource::new(data),
            reads: Mutex::new(Vec::new()),
            failing: Mutex::new(None),
        }
    }

    pub fn fail_range(&self, range: Option<Range<u64>>) {
        *self.failing.lock() = range;
    }

    pub fn touched(&self, range: Range<u64>) -> bool {
        self.reads
            .lock()
            .iter()
            .any(|&(addr, len)| addr < range.end && addr + len as u64 > range.start)
    }
}

impl DataSource for RecordingSource {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        self.reads.lock().push((addr.as_u64(), len));
        if let Some(range) = self.failing.lock().as_ref() {
            if addr.as_u64() < range.end && addr.as_u64() + len as u64 > range.start {
                return Err(MemoryError::ReadFailed(addr.as_u64()));
            }
        }
        self.inner.read_bytes(addr, len)
    }
}
