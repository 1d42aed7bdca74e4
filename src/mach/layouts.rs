// Fri Jan 16 2026 - Alex

//! Record layouts for the Mach-O and dyld structures this crate walks.
//!
//! They are served by a registry provider, so each one is built on first use
//! for the registry's own byte order and pointer width.

use crate::layout::{
    ByteOrder, Layout, LayoutError, LayoutRegistry, PointerWidth, PrimitiveType, StructBuilder,
    TypeKey,
};
use std::sync::Arc;

pub const MACH_HEADER: TypeKey = TypeKey::Named("mach_header");
pub const LOAD_COMMAND: TypeKey = TypeKey::Named("load_command");
pub const SEGMENT_COMMAND: TypeKey = TypeKey::Named("segment_command");
pub const SYMTAB_COMMAND: TypeKey = TypeKey::Named("symtab_command");
pub const NLIST: TypeKey = TypeKey::Named("nlist");
pub const DYLD_ALL_IMAGE_INFOS: TypeKey = TypeKey::Named("dyld_all_image_infos");
pub const DYLD_IMAGE_INFO: TypeKey = TypeKey::Named("dyld_image_info");

/// Registry for one Mach-O target: primitives, pointer, and the records above.
pub fn target_registry(byte_order: ByteOrder, pointer_width: PointerWidth) -> Result<LayoutRegistry, LayoutError> {
    let registry = LayoutRegistry::for_target(byte_order, pointer_width)?;
    install(&registry);
    Ok(registry)
}

pub fn install(registry: &LayoutRegistry) {
    registry.register_provider(|key, registry| match build(key, registry) {
        Ok(layout) => layout,
        Err(e) => {
            log::warn!("Failed to build layout for {}: {}", key, e);
            None
        }
    });
}

fn build(key: &TypeKey, registry: &LayoutRegistry) -> Result<Option<Arc<dyn Layout>>, LayoutError> {
    let &TypeKey::Named(name) = key else {
        return Ok(None);
    };
    let wide = registry.resolve(&TypeKey::Pointer)?.size() == 8;
    let word = if wide { PrimitiveType::U64 } else { PrimitiveType::U32 };
    let b = StructBuilder::new(name, registry);

    let layout = match name {
        "mach_header" => {
            let b = b
                .field("magic", PrimitiveType::U32)?
                .field("cputype", PrimitiveType::I32)?
                .field("cpusubtype", PrimitiveType::I32)?
                .field("filetype", PrimitiveType::U32)?
                .field("ncmds", PrimitiveType::U32)?
                .field("sizeofcmds", PrimitiveType::U32)?
                .field("flags", PrimitiveType::U32)?;
            if wide {
                b.field("reserved", PrimitiveType::U32)?.build()?
            } else {
                b.build()?
            }
        }
        "load_command" => b
            .field("cmd", PrimitiveType::U32)?
            .field("cmdsize", PrimitiveType::U32)?
            .build()?,
        "segment_command" => b
            .field("cmd", PrimitiveType::U32)?
            .field("cmdsize", PrimitiveType::U32)?
            .field("segname", TypeKey::array(PrimitiveType::U8.into(), 16))?
            .field("vmaddr", word)?
            .field("vmsize", word)?
            .field("fileoff", word)?
            .field("filesize", word)?
            .field("maxprot", PrimitiveType::U32)?
            .field("initprot", PrimitiveType::U32)?
            .field("nsects", PrimitiveType::U32)?
            .field("flags", PrimitiveType::U32)?
            .build()?,
        "symtab_command" => b
            .field("cmd", PrimitiveType::U32)?
            .field("cmdsize", PrimitiveType::U32)?
            .field("symoff", PrimitiveType::U32)?
            .field("nsyms", PrimitiveType::U32)?
            .field("stroff", PrimitiveType::U32)?
            .field("strsize", PrimitiveType::U32)?
            .build()?,
        "nlist" => b
            .field("n_strx", PrimitiveType::U32)?
            .field("n_type", PrimitiveType::U8)?
            .field("n_sect", PrimitiveType::U8)?
            .field("n_desc", PrimitiveType::U16)?
            .field("n_value", word)?
            .build()?,
        // Version 2 prefix; later versions only append fields.
        "dyld_all_image_infos" => b
            .field("version", PrimitiveType::U32)?
            .field("info_array_count", PrimitiveType::U32)?
            .field("info_array", TypeKey::Pointer)?
            .field("notification", TypeKey::Pointer)?
            .field("process_detached_from_shared_region", PrimitiveType::Bool)?
            .build()?,
        "dyld_image_info" => b
            .field("image_load_address", TypeKey::Pointer)?
            .field("image_file_path", TypeKey::Pointer)?
            .field("image_file_mod_date", TypeKey::Pointer)?
            .build()?,
        _ => return Ok(None),
    };
    Ok(Some(Arc::new(layout)))
}
