//! Wasmtime-backed module boundary.
//!
//! The pipeline treats a song module as an opaque capability: instantiate
//! bytes against an import table, call a named export, read a byte range out
//! of linear memory. Nothing here inspects the module's internal structure.

use wasmtime::{Engine, Instance, Linker, Memory, Module, Store, Trap, Val};

use crate::config::ImportTable;
use crate::error::{RenderError, Result};
use crate::host;

/// Name of the linear memory export song modules expose.
pub const MEMORY_EXPORT: &str = "m";

/// An instantiated song module together with its store.
#[derive(Debug)]
pub struct SongInstance {
    store: Store<()>,
    instance: Instance,
}

impl SongInstance {
    /// Compile `bytes` and instantiate it with the given import table.
    ///
    /// A malformed binary or an import the table does not satisfy is a
    /// `Module` error; a trap raised by a start function during
    /// instantiation is a `Runtime` error.
    pub fn instantiate(bytes: &[u8], imports: ImportTable) -> Result<Self> {
        let engine = Engine::default();
        let module = Module::new(&engine, bytes).map_err(RenderError::Module)?;

        let mut linker = Linker::new(&engine);
        host::add_imports(&mut linker, imports)?;

        let mut store = Store::new(&engine, ());
        let instance = linker.instantiate(&mut store, &module).map_err(|e| {
            if e.downcast_ref::<Trap>().is_some() {
                RenderError::Runtime(e)
            } else {
                RenderError::Module(e)
            }
        })?;

        Ok(SongInstance { store, instance })
    }

    /// Call the zero-argument export `name` if the instance has one.
    ///
    /// Returns `Ok(true)` when the export existed and ran to completion and
    /// `Ok(false)` when there is no such function export. A wrongly-typed
    /// export is a `Module` error; a trap during execution is `Runtime`.
    pub fn call(&mut self, name: &str) -> Result<bool> {
        let Some(func) = self.instance.get_func(&mut self.store, name) else {
            return Ok(false);
        };
        let func = func
            .typed::<(), ()>(&self.store)
            .map_err(RenderError::Module)?;
        func.call(&mut self.store, ())
            .map_err(RenderError::Runtime)?;
        Ok(true)
    }

    /// Read an exported integer value (an `i32` or `i64` global) by name.
    pub fn exported_int(&mut self, name: &str) -> Option<u64> {
        let global = self.instance.get_global(&mut self.store, name)?;
        match global.get(&mut self.store) {
            Val::I32(v) => Some(v as u32 as u64),
            Val::I64(v) => Some(v as u64),
            _ => None,
        }
    }

    /// Current byte extent of the instance's linear memory.
    pub fn memory_size(&mut self) -> Result<usize> {
        let memory = self.memory()?;
        Ok(memory.data_size(&self.store))
    }

    /// Copy `[start, start+len)` out of linear memory.
    ///
    /// A range outside the memory's current extent is a `Runtime` error;
    /// the host never grows or shrinks the buffer to make a range fit.
    pub fn read_memory(&mut self, start: usize, len: usize) -> Result<Vec<u8>> {
        let memory = self.memory()?;
        let data = memory.data(&self.store);
        let end = start.checked_add(len).ok_or_else(|| {
            RenderError::Runtime(anyhow::anyhow!(
                "memory range [{start}, {start}+{len}) overflows"
            ))
        })?;
        let slice = data.get(start..end).ok_or_else(|| {
            RenderError::Runtime(anyhow::anyhow!(
                "memory range [{start}, {end}) exceeds memory size {}",
                data.len()
            ))
        })?;
        Ok(slice.to_vec())
    }

    /// The memory export named `m`, falling back to the first exported
    /// memory when the module uses a different name.
    fn memory(&mut self) -> Result<Memory> {
        if let Some(memory) = self.instance.get_memory(&mut self.store, MEMORY_EXPORT) {
            return Ok(memory);
        }
        self.instance
            .exports(&mut self.store)
            .find_map(|export| export.into_memory())
            .ok_or_else(|| RenderError::Module(anyhow::anyhow!("module exports no memory")))
    }
}
