// Fri Jan 16 2026 - Alex

use crate::config::Config;
use crate::layout::{ByteOrder, DataReader, PointerWidth};
use crate::mach::header::detect_target;
use crate::mach::{layouts, MachDyld, MachError, MachLoadedImage, MachView, ViewKind};
use crate::memory::{Address, DataSource, MmapSource, SegmentAddressSpace};
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::Arc;

/// A Mach-O core file and the process state recovered from it.
///
/// Discovery runs in stages (dylinker address, dylinker view, loaded
/// images), each computed once on first access. Failures are returned and
/// not cached, so a later call retries the stage.
pub struct MachCore {
    file: MachView,
    page_size: u64,
    dylinker_hint: Option<Address>,
    address_space: OnceCell<DataReader>,
    dylinker_address: OnceCell<Address>,
    dylinker: OnceCell<MachDyld>,
    loaded_images: OnceCell<Vec<MachLoadedImage>>,
}

impl MachCore {
    pub fn open<P: AsRef<Path>>(path: P, config: &Config) -> Result<Self, MachError> {
        let source = MmapSource::from_file(path)?;
        Self::new(Arc::new(source), config)
    }

    pub fn new(source: Arc<dyn DataSource>, config: &Config) -> Result<Self, MachError> {
        config.validate().map_err(MachError::Config)?;

        let magic = source
            .read_bytes(Address::zero(), 4)
            .ok()
            .and_then(|bytes| <[u8; 4]>::try_from(bytes.as_slice()).ok());
        let (byte_order, pointer_width) = match magic.and_then(detect_target) {
            Some(target) => target,
            None => {
                log::warn!("Unrecognized Mach-O magic {:02x?}", magic);
                (ByteOrder::native(), PointerWidth::Bits64)
            }
        };
        log::debug!("Core target: {} {:?}", byte_order, pointer_width);

        let registry = Arc::new(layouts::target_registry(byte_order, pointer_width)?);
        let reader = DataReader::new(source, registry).with_max_string_length(config.max_string_length);

        Ok(Self {
            file: MachView::new(reader, Address::zero(), ViewKind::File),
            page_size: config.page_size,
            dylinker_hint: config.dylinker_hint.map(Address::new),
            address_space: OnceCell::new(),
            dylinker_address: OnceCell::new(),
            dylinker: OnceCell::new(),
            loaded_images: OnceCell::new(),
        })
    }

    pub fn is_valid_core_file(&self) -> bool {
        self.file.is_valid()
    }

    /// The core file's own Mach-O structure.
    pub fn file(&self) -> &MachView {
        &self.file
    }

    pub fn dylinker_hint(&self) -> Option<Address> {
        self.dylinker_hint
    }

    /// Process address space assembled from the core's segments.
    pub fn address_space(&self) -> Result<&DataReader, MachError> {
        self.address_space
            .get_or_try_init(|| -> Result<DataReader, MachError> {
                let mut space = SegmentAddressSpace::new(Arc::clone(self.file.reader().source()));
                for segment in self.file.segments()? {
                    space.add_mapping(segment.vm_address, segment.file_size, segment.file_offset);
                }
                Ok(self.file.reader().with_source(Arc::new(space)))
            })
    }

    pub fn dylinker_address(&self) -> Result<Address, MachError> {
        self.dylinker_address
            .get_or_try_init(|| self.find_dylinker())
            .copied()
    }

    fn is_dylinker_at(&self, space: &DataReader, address: Address) -> bool {
        MachView::loaded(space.clone(), address).is_dylinker()
    }

    fn find_dylinker(&self) -> Result<Address, MachError> {
        let space = self.address_space()?;

        if let Some(hint) = self.dylinker_hint.filter(|hint| !hint.is_null()) {
            if self.is_dylinker_at(space, hint) {
                log::debug!("Dylinker found at hint {}", hint);
                return Ok(hint);
            }
            log::debug!("Dylinker hint {} rejected, scanning segments", hint);
        }

        let segments = self.file.segments()?;
        for segment in segments {
            log::trace!("Scanning segment {}", segment);
            let mut offset = 0u64;
            while offset < segment.file_size {
                let Some(candidate) = segment.vm_address.checked_add(offset) else {
                    break;
                };
                if self.is_dylinker_at(space, candidate) {
                    log::debug!("Dylinker found at {}", candidate);
                    return Ok(candidate);
                }
                offset = match offset.checked_add(self.page_size) {
                    Some(next) => next,
                    None => break,
                };
            }
        }

        Err(MachError::DylinkerNotFound {
            segments: segments.len(),
        })
    }

    pub fn dylinker(&self) -> Result<&MachDyld, MachError> {
        self.dylinker.get_or_try_init(|| -> Result<MachDyld, MachError> {
            let address = self.dylinker_address()?;
            let space = self.address_space()?.clone();
            Ok(MachDyld::new(MachView::loaded(space, address)))
        })
    }

    pub fn loaded_images(&self) -> Result<&[MachLoadedImage], MachError> {
        self.loaded_images
            .get_or_try_init(|| -> Result<Vec<MachLoadedImage>, MachError> {
                let space = self.address_space()?;
                let images = self
                    .dylinker()?
                    .loaded_images()?
                    .iter()
                    .map(|image| {
                        MachLoadedImage::new(
                            MachView::loaded(space.clone(), image.load_address),
                            image.load_address,
                            image.path.clone(),
                        )
                    })
                    .collect::<Vec<_>>();
                log::info!("Resolved {} loaded images", images.len());
                Ok(images)
            })
            .map(Vec::as_slice)
    }
}
