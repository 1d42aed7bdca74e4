// Fri Jan 16 2026 - Alex

use crate::layout::{LayoutError, PrimitiveType, Value};
use crate::mach::layouts::{DYLD_ALL_IMAGE_INFOS, DYLD_IMAGE_INFO};
use crate::mach::{MachError, MachView};
use crate::memory::Address;
use once_cell::sync::OnceCell;
use std::ops::RangeInclusive;

pub const ALL_IMAGE_INFOS_SYMBOL: &str = "dyld_all_image_infos";

/// Accepted `dyld_all_image_infos` versions. Later versions only append
/// fields to the version 2 record, so 2 through 17 decode with the same
/// shape; anything else is `MachError::UnsupportedVersion`.
pub const SUPPORTED_ALL_IMAGE_INFOS_VERSIONS: RangeInclusive<u32> = 2..=17;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DyldAllImageInfos {
    pub version: u32,
    pub info_array_count: u32,
    pub info_array: Address,
    pub notification: Address,
    pub process_detached_from_shared_region: bool,
}

impl DyldAllImageInfos {
    pub fn from_value(value: &Value) -> Result<Self, LayoutError> {
        Ok(Self {
            version: value.field("version")?.as_u64()? as u32,
            info_array_count: value.field("info_array_count")?.as_u64()? as u32,
            info_array: Address::new(value.field("info_array")?.as_u64()?),
            notification: Address::new(value.field("notification")?.as_u64()?),
            process_detached_from_shared_region: value
                .field("process_detached_from_shared_region")?
                .as_bool()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DyldImageInfo {
    pub image_load_address: Address,
    pub image_file_path: Address,
    pub image_file_mod_date: u64,
}

impl DyldImageInfo {
    pub fn from_value(value: &Value) -> Result<Self, LayoutError> {
        Ok(Self {
            image_load_address: Address::new(value.field("image_load_address")?.as_u64()?),
            image_file_path: Address::new(value.field("image_file_path")?.as_u64()?),
            image_file_mod_date: value.field("image_file_mod_date")?.as_u64()?,
        })
    }
}

/// A module recorded by the dynamic linker, in its load order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DyldLoadedImage {
    pub path: String,
    pub load_address: Address,
}

/// The dynamic linker image of a process and the bookkeeping it holds.
///
/// Every derived value is computed on first access. A failed computation is
/// not cached; the next call runs it again.
#[derive(Debug)]
pub struct MachDyld {
    image: MachView,
    all_image_infos_address: OnceCell<Address>,
    all_image_infos: OnceCell<DyldAllImageInfos>,
    image_infos: OnceCell<Vec<DyldImageInfo>>,
    loaded_images: OnceCell<Vec<DyldLoadedImage>>,
}

impl MachDyld {
    pub fn new(image: MachView) -> Self {
        Self {
            image,
            all_image_infos_address: OnceCell::new(),
            all_image_infos: OnceCell::new(),
            image_infos: OnceCell::new(),
            loaded_images: OnceCell::new(),
        }
    }

    pub fn image(&self) -> &MachView {
        &self.image
    }

    /// Runtime address of `dyld_all_image_infos`: symbol value rebased from
    /// the linker's preferred base onto its load address.
    pub fn all_image_infos_address(&self) -> Result<Address, MachError> {
        self.all_image_infos_address
            .get_or_try_init(|| -> Result<Address, MachError> {
                let symbol = self.image.lookup_symbol(ALL_IMAGE_INFOS_SYMBOL)?;
                let preferred = self.image.preferred_base()?;
                let actual = self.image.load_address();
                let address = symbol.rebase(preferred, actual);
                log::debug!(
                    "{} = {:#x} - {:#x} + {:#x} = {}",
                    ALL_IMAGE_INFOS_SYMBOL,
                    symbol,
                    preferred,
                    actual,
                    address
                );
                Ok(address)
            })
            .copied()
    }

    pub fn all_image_infos(&self) -> Result<&DyldAllImageInfos, MachError> {
        self.all_image_infos
            .get_or_try_init(|| -> Result<DyldAllImageInfos, MachError> {
                let address = self.all_image_infos_address()?;
                let version = self
                    .image
                    .read(&PrimitiveType::U32.into(), address)?
                    .as_u64()? as u32;
                if !SUPPORTED_ALL_IMAGE_INFOS_VERSIONS.contains(&version) {
                    return Err(MachError::UnsupportedVersion(version));
                }
                let value = self.image.read(&DYLD_ALL_IMAGE_INFOS, address)?;
                let infos = DyldAllImageInfos::from_value(&value)?;
                log::debug!(
                    "dyld_all_image_infos v{}: {} images at {}",
                    infos.version,
                    infos.info_array_count,
                    infos.info_array
                );
                Ok(infos)
            })
    }

    pub fn image_infos(&self) -> Result<&[DyldImageInfo], MachError> {
        self.image_infos
            .get_or_try_init(|| -> Result<Vec<DyldImageInfo>, MachError> {
                let infos = *self.all_image_infos()?;
                if infos.info_array_count == 0 {
                    return Ok(Vec::new());
                }
                if infos.info_array.is_null() {
                    return Err(MachError::Format(format!(
                        "{} image infos at null address",
                        infos.info_array_count
                    )));
                }
                let entries = self.image.reader().read_array(
                    &DYLD_IMAGE_INFO,
                    infos.info_array_count as usize,
                    infos.info_array,
                )?;
                Ok(entries
                    .iter()
                    .map(DyldImageInfo::from_value)
                    .collect::<Result<Vec<_>, _>>()?)
            })
            .map(Vec::as_slice)
    }

    pub fn loaded_images(&self) -> Result<&[DyldLoadedImage], MachError> {
        self.loaded_images
            .get_or_try_init(|| -> Result<Vec<DyldLoadedImage>, MachError> {
                self.image_infos()?
                    .iter()
                    .map(|info| -> Result<DyldLoadedImage, MachError> {
                        Ok(DyldLoadedImage {
                            path: self.image.read_c_string(info.image_file_path)?,
                            load_address: info.image_load_address,
                        })
                    })
                    .collect()
            })
            .map(Vec::as_slice)
    }
}
